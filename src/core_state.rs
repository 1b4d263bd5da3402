//! Transport-agnostic application state.
//!
//! `CoreState` is the single shared state a host (desktop shell, CLI, HTTP
//! layer) talks to. It owns the template store, the keyword classifier, and
//! the exclusive Ollama service, and exposes the caller-facing operations:
//! template CRUD, classification, report generation, and comparison.

use serde::Serialize;

use crate::llm;
use crate::ollama_service::{ActiveOperation, OllamaService, OperationKind};
use crate::report::delegate::{self, DelegatedReply};
use crate::report::{
    ComparisonOutcome, KeywordClassifier, ReportError, ReportPipeline, SynthesizedReport,
    TemplateChoice,
};
use crate::templates::{TemplateError, TemplateStore};

/// Generation backend status for a host's indicator.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorStatus {
    /// Whether the backend answered (or is currently serving an operation).
    pub reachable: bool,
    /// The model generation calls would use right now.
    pub model: Option<String>,
    /// The operation in flight, if any.
    pub active_operation: Option<ActiveOperation>,
}

/// Shared application state. Wrap in `Arc` to share with a host's transport
/// layer; all operations take `&self`.
pub struct CoreState {
    store: TemplateStore,
    classifier: KeywordClassifier,
    ollama: OllamaService,
    delegate_classification: bool,
}

impl CoreState {
    /// State with the default store tiers, rules, and delegated
    /// classification enabled.
    pub fn new() -> Self {
        Self::with_store(
            TemplateStore::open_default(),
            KeywordClassifier::with_default_rules(),
        )
    }

    /// State over explicit collaborators (tests use a tempdir-backed store).
    pub fn with_store(store: TemplateStore, classifier: KeywordClassifier) -> Self {
        Self {
            store,
            classifier,
            ollama: OllamaService::new(),
            delegate_classification: true,
        }
    }

    /// Disable or re-enable the delegated classification fallback.
    pub fn set_delegated_classification(&mut self, enabled: bool) {
        self.delegate_classification = enabled;
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn ollama(&self) -> &OllamaService {
        &self.ollama
    }

    // ── Template management ─────────────────────────────────

    /// Names of the locally stored templates, sorted.
    pub fn resolve_and_list(&self) -> Vec<String> {
        self.store.list()
    }

    pub fn add_template(&self, name: &str, body: &str) -> Result<(), TemplateError> {
        self.store.put(name, body)
    }

    /// Update an existing local template. Unlike `add_template`, editing a
    /// name with no local entry is `NotFound`.
    pub fn edit_template(&self, name: &str, body: &str) -> Result<(), TemplateError> {
        if !self.store.has_local(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        self.store.put(name, body)
    }

    pub fn delete_template(&self, name: &str) -> Result<(), TemplateError> {
        self.store.delete(name)
    }

    // ── Classification ──────────────────────────────────────

    /// Classify findings into a template name. Keyword rules run first; when
    /// they yield nothing and delegation is enabled, one generation call is
    /// made under the service guard.
    pub fn classify(&self, text: &str) -> Result<Option<String>, ReportError> {
        if let Some(name) = self.classifier.classify(text) {
            return Ok(Some(name.to_string()));
        }
        if !self.delegate_classification || text.trim().is_empty() {
            return Ok(None);
        }

        let client = OllamaService::client();
        let model = llm::resolve_model(&client)?;
        let _guard = self
            .ollama
            .acquire(OperationKind::TemplateClassification, &model)?;
        match delegate::classify_delegated(&client, &model, text, &self.store.known_names())? {
            DelegatedReply::Match(name) => Ok(Some(name)),
            DelegatedReply::NoMatch => Ok(None),
            DelegatedReply::OutOfSet(reply) => Err(ReportError::ClassificationAmbiguous(reply)),
        }
    }

    // ── Generation workflows ────────────────────────────────

    /// Generate a report from findings, holding exclusive generator access
    /// for the duration of the invocation.
    pub fn generate_report(
        &self,
        findings: &str,
        choice: TemplateChoice,
    ) -> Result<SynthesizedReport, ReportError> {
        // Fail fast before model resolution touches the network.
        if findings.trim().is_empty() {
            return Err(ReportError::EmptyInput);
        }

        let client = OllamaService::client();
        let model = llm::resolve_model(&client)?;
        let _guard = self.ollama.acquire(OperationKind::ReportSynthesis, &model)?;

        ReportPipeline::new(&self.store, &self.classifier, &client, model)
            .with_delegated_classification(self.delegate_classification)
            .generate_report(findings, choice)
    }

    /// Compare a current report against priors; the optional diff is
    /// computed locally.
    pub fn compare_reports(
        &self,
        current: &str,
        priors: &[String],
        include_diff: bool,
    ) -> Result<ComparisonOutcome, ReportError> {
        if current.trim().is_empty() || priors.iter().all(|p| p.trim().is_empty()) {
            return Err(ReportError::EmptyInput);
        }

        let client = OllamaService::client();
        let model = llm::resolve_model(&client)?;
        let _guard = self.ollama.acquire(OperationKind::ReportComparison, &model)?;

        ReportPipeline::new(&self.store, &self.classifier, &client, model)
            .compare_reports(current, priors, include_diff)
    }

    // ── Status ──────────────────────────────────────────────

    /// Backend reachability and the model generation would use.
    ///
    /// When an operation is already in flight, that operation is itself
    /// proof the backend is serving — no probe is sent.
    pub fn generator_status(&self) -> GeneratorStatus {
        let Some(_guard) = self.ollama.try_acquire(OperationKind::ModelVerification, "auto")
        else {
            let op = self.ollama.current_operation();
            return GeneratorStatus {
                reachable: true,
                model: op.as_ref().map(|o| o.model.clone()),
                active_operation: op,
            };
        };

        let client = OllamaService::client();
        match llm::resolve_model(&client) {
            Ok(model) => GeneratorStatus {
                reachable: true,
                model: Some(model),
                active_operation: None,
            },
            Err(e) => {
                tracing::debug!(error = %e, "generation backend not reachable");
                GeneratorStatus {
                    reachable: false,
                    model: None,
                    active_operation: None,
                }
            }
        }
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}
