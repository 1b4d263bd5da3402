//! Delegated template classification.
//!
//! When the keyword rules yield nothing, a single-shot chat request asks the
//! model to answer with exactly one name from a closed candidate set. The
//! reply is normalized and validated against that set before use — an
//! unknown reply is never used to resolve a template, so uncontrolled model
//! output cannot reach the template store as a key.

use crate::llm::{ChatMessage, LlmClient, LlmError};
use crate::report::sanitize::sanitize_for_prompt;

const CLASSIFICATION_SYSTEM_PROMPT: &str = "You classify radiology findings into a report \
template. Reply with exactly one template name from the candidate list, copied verbatim. \
If none of the candidates fits, reply with the single word NONE. Do not explain.";

/// Outcome of validating a delegated classification reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegatedReply {
    /// The reply matched a candidate exactly (after normalization).
    Match(String),
    /// The model answered NONE.
    NoMatch,
    /// The reply was outside the candidate set; carries the normalized reply.
    OutOfSet(String),
}

/// Build the single-shot classification request.
pub fn build_classification_messages(findings: &str, candidates: &[String]) -> Vec<ChatMessage> {
    let list = candidates.join("\n");
    let findings = sanitize_for_prompt(findings);
    vec![
        ChatMessage::system(CLASSIFICATION_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "CANDIDATE TEMPLATES:\n{list}\n\nFINDINGS:\n{findings}"
        )),
    ]
}

/// Normalize a model reply: trim whitespace, surrounding quotes and
/// backticks, and at most one trailing period.
fn normalize_reply(reply: &str) -> String {
    let trimmed = reply
        .trim()
        .trim_matches('`')
        .trim_matches('"')
        .trim_matches('\'')
        .trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed).trim().to_string()
}

/// Validate a normalized reply against the closed candidate set.
pub fn validate_reply(reply: &str, candidates: &[String]) -> DelegatedReply {
    let normalized = normalize_reply(reply);
    if normalized.eq_ignore_ascii_case("none") {
        return DelegatedReply::NoMatch;
    }
    if candidates.iter().any(|c| c == &normalized) {
        return DelegatedReply::Match(normalized);
    }
    DelegatedReply::OutOfSet(normalized)
}

/// Run one delegated classification call and validate its reply.
pub fn classify_delegated(
    client: &dyn LlmClient,
    model: &str,
    findings: &str,
    candidates: &[String],
) -> Result<DelegatedReply, LlmError> {
    let messages = build_classification_messages(findings, candidates);
    let reply = client.chat(model, &messages)?;
    let outcome = validate_reply(&reply, candidates);
    if let DelegatedReply::OutOfSet(ref normalized) = outcome {
        tracing::warn!(reply = %normalized, "delegated classification answered outside the candidate set");
    }
    Ok(outcome)
}
