//! The report pipeline: classify, resolve, request, post-process.
//!
//! Each invocation is a single synchronous unit of work. Any failure from
//! the generator is terminal for the invocation — no retry, no partial
//! result surfaced as success.

use uuid::Uuid;

use crate::llm::{LlmClient, LlmError};
use crate::report::delegate::{self, DelegatedReply};
use crate::report::diff::{line_diff, render_diff};
use crate::report::prompt::{build_comparison_messages, build_synthesis_messages, join_priors};
use crate::report::sanitize::sanitize_for_prompt;
use crate::report::{ComparisonOutcome, KeywordClassifier, ReportError, SynthesizedReport};
use crate::templates::TemplateStore;

/// How the template for a generation run is chosen.
#[derive(Debug, Clone)]
pub enum TemplateChoice {
    /// Classify the findings to pick a template.
    Auto,
    /// Use the named template directly.
    Named(String),
}

/// Single-shot generation/comparison pipeline over borrowed collaborators.
pub struct ReportPipeline<'a, C: LlmClient> {
    store: &'a TemplateStore,
    classifier: &'a KeywordClassifier,
    client: &'a C,
    model: String,
    delegate_classification: bool,
}

impl<'a, C: LlmClient> ReportPipeline<'a, C> {
    pub fn new(
        store: &'a TemplateStore,
        classifier: &'a KeywordClassifier,
        client: &'a C,
        model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            classifier,
            client,
            model: model.into(),
            delegate_classification: false,
        }
    }

    /// Allow a delegated classification call when the keyword rules yield
    /// nothing in `Auto` mode.
    pub fn with_delegated_classification(mut self, enabled: bool) -> Self {
        self.delegate_classification = enabled;
        self
    }

    /// Generate a report by merging `findings` into the chosen template.
    pub fn generate_report(
        &self,
        findings: &str,
        choice: TemplateChoice,
    ) -> Result<SynthesizedReport, ReportError> {
        // Empty findings fail before any store or network access.
        if findings.trim().is_empty() {
            return Err(ReportError::EmptyInput);
        }

        let name = match choice {
            TemplateChoice::Named(name) => name,
            TemplateChoice::Auto => self.classify_findings(findings)?,
        };

        let template = self
            .store
            .get(&name)
            .map_err(|_| ReportError::TemplateNotFound { name: Some(name.clone()) })?;

        let messages = build_synthesis_messages(&template.body, findings);
        let completion = self.client.chat(&self.model, &messages)?;
        let text = completion.trim();
        if text.is_empty() {
            return Err(ReportError::Generation(LlmError::EmptyCompletion));
        }

        tracing::info!(
            template = %template.name,
            source = %template.source,
            model = %self.model,
            "report synthesized"
        );

        Ok(SynthesizedReport {
            id: Uuid::new_v4(),
            template_name: template.name,
            template_source: template.source,
            model: self.model.clone(),
            text: text.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Compare the current report against one or more priors.
    pub fn compare_reports(
        &self,
        current: &str,
        priors: &[String],
        include_diff: bool,
    ) -> Result<ComparisonOutcome, ReportError> {
        if current.trim().is_empty() {
            return Err(ReportError::EmptyInput);
        }
        let priors: Vec<String> = priors
            .iter()
            .filter(|p| !p.trim().is_empty())
            .cloned()
            .collect();
        if priors.is_empty() {
            return Err(ReportError::EmptyInput);
        }

        // Both sides get the same cleaning, so the local diff compares what
        // the generator saw and stays symmetric under swapped inputs.
        let current = sanitize_for_prompt(current);
        let joined = join_priors(&priors);
        let messages = build_comparison_messages(&current, &joined);
        let completion = self.client.chat(&self.model, &messages)?;
        let impression = completion.trim();
        if impression.is_empty() {
            return Err(ReportError::Generation(LlmError::EmptyCompletion));
        }

        // The diff is computed locally and never merged with the impression.
        let diff = include_diff.then(|| render_diff(&line_diff(&joined, &current)));

        Ok(ComparisonOutcome {
            impression: impression.to_string(),
            diff,
            model: self.model.clone(),
        })
    }

    /// Keyword rules first, then (when enabled) one delegated call.
    fn classify_findings(&self, findings: &str) -> Result<String, ReportError> {
        if let Some(name) = self.classifier.classify(findings) {
            return Ok(name.to_string());
        }
        if !self.delegate_classification {
            return Err(ReportError::TemplateNotFound { name: None });
        }

        let candidates = self.store.known_names();
        match delegate::classify_delegated(self.client, &self.model, findings, &candidates)? {
            DelegatedReply::Match(name) => Ok(name),
            DelegatedReply::NoMatch => Err(ReportError::TemplateNotFound { name: None }),
            DelegatedReply::OutOfSet(reply) => Err(ReportError::ClassificationAmbiguous(reply)),
        }
    }
}
