//! Report synthesis and comparison.
//!
//! The pipeline turns dictated findings into a completed report by resolving
//! a template (keyword classification first, optionally a delegated
//! classification call) and sending one deterministic instruction payload to
//! the generator. Comparison summarizes clinically significant interval
//! change between a current report and priors, optionally alongside a purely
//! mechanical line diff.

pub mod classify;
pub mod delegate;
pub mod diff;
pub mod orchestrator;
pub mod prompt;
pub mod sanitize;

pub use classify::KeywordClassifier;
pub use diff::{line_diff, render_diff, DiffLine};
pub use orchestrator::{ReportPipeline, TemplateChoice};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::llm::LlmError;
use crate::ollama_service::OllamaServiceError;
use crate::templates::TemplateSource;

/// A generated report draft, with enough metadata for a host to display,
/// file, or export it.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedReport {
    pub id: Uuid,
    pub template_name: String,
    pub template_source: TemplateSource,
    pub model: String,
    pub text: String,
    /// ISO 8601 generation timestamp.
    pub generated_at: String,
}

/// Result of a comparison run: the clinically filtered impression and,
/// when requested, the mechanical line diff. The two are never merged.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub impression: String,
    pub diff: Option<String>,
    pub model: String,
}

/// Errors from report generation and comparison.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No findings text was provided. Dictate or type findings before generating.")]
    EmptyInput,

    #[error("{}", template_not_found_message(.name.as_deref()))]
    TemplateNotFound { name: Option<String> },

    #[error("Report generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Automatic classification answered '{0}', which is not a known template. Select a template manually.")]
    ClassificationAmbiguous(String),

    #[error("Generation service unavailable: {0}")]
    Service(#[from] OllamaServiceError),
}

fn template_not_found_message(name: Option<&str>) -> String {
    match name {
        Some(name) => format!(
            "Template '{name}' was not found. Create it or select a template manually."
        ),
        None => "No template matched the findings. Create a template or select one manually."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_offers_remediation() {
        let err = ReportError::TemplateNotFound {
            name: Some("PET CT".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("PET CT"));
        assert!(msg.contains("Create it or select"));

        let err = ReportError::TemplateNotFound { name: None };
        assert!(err.to_string().contains("Create a template or select one manually"));
    }

    #[test]
    fn error_kinds_have_distinct_messages() {
        let errors = [
            ReportError::EmptyInput.to_string(),
            ReportError::TemplateNotFound { name: None }.to_string(),
            ReportError::Generation(LlmError::EmptyCompletion).to_string(),
            ReportError::ClassificationAmbiguous("CT Moon".into()).to_string(),
        ];
        for (i, a) in errors.iter().enumerate() {
            assert!(!a.is_empty());
            for b in errors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn synthesized_report_serializes() {
        let report = SynthesizedReport {
            id: Uuid::new_v4(),
            template_name: "CT Chest".into(),
            template_source: TemplateSource::BuiltIn,
            model: "medgemma:4b".into(),
            text: "Type of Study: CT Chest".into(),
            generated_at: "2026-08-29T10:00:00Z".into(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"template_name\":\"CT Chest\""));
        assert!(json.contains("\"built_in\""));
    }

    #[test]
    fn comparison_outcome_serializes() {
        let outcome = ComparisonOutcome {
            impression: "Interval growth of the lesion.".into(),
            diff: None,
            model: "medgemma:4b".into(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"diff\":null"));
        assert!(json.contains("Interval growth"));
    }
}
