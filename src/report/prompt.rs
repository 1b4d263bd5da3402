//! Instruction payload builders for synthesis and comparison.
//!
//! Both builders are pure: the same template/findings/reports in gives the
//! same message list out. The generator's output is where the
//! non-determinism lives, not here.

use crate::llm::ChatMessage;
use crate::report::sanitize::sanitize_for_prompt;

/// Fixed synthesis instruction.
pub const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a radiologist assistant. Merge the dictated \
findings into the report template.\n\
- Remove or rewrite any template line asserting a normal or negative finding that the findings \
contradict; never leave a normal line alongside a contradicting finding.\n\
- Insert findings not addressed by any template line under the appropriate section heading.\n\
- Always end with an Impression section that summarizes abnormal findings only; do not restate \
normal findings in the impression.\n\
- Output the completed report text only, with no commentary.";

/// Finding categories excluded from comparative impressions. A design
/// parameter, not inferred from the inputs.
pub const EXCLUDED_COMPARISON_FINDINGS: &[&str] = &[
    "osteophytes and degenerative bony change",
    "vascular or arterial calcification",
    "incidental artifacts or technical differences between studies",
];

/// Separator inserted between concatenated prior reports.
pub const PRIOR_REPORT_SEPARATOR: &str = "----- PRIOR REPORT -----";

/// Fixed comparison instruction, enumerating the excluded categories.
pub fn comparison_system_prompt() -> String {
    let excluded = EXCLUDED_COMPARISON_FINDINGS
        .iter()
        .map(|category| format!("- {category}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a radiologist. Compare the current report to the prior report(s) and summarize \
only the clinically significant changes as a comparative impression. Ignore findings in these \
categories:\n{excluded}\nOutput the comparative impression only."
    )
}

/// Escape tag-delimiter characters so operator text cannot close or open the
/// payload delimiters in the user message.
fn escape_delimiters(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build the synthesis request: fixed system instruction plus the template
/// and findings inside tag delimiters.
pub fn build_synthesis_messages(template_body: &str, findings: &str) -> Vec<ChatMessage> {
    let template = escape_delimiters(&sanitize_for_prompt(template_body));
    let findings = escape_delimiters(&sanitize_for_prompt(findings));
    vec![
        ChatMessage::system(SYNTHESIS_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "<template>\n{template}\n</template>\n\n<findings>\n{findings}\n</findings>"
        )),
    ]
}

/// Concatenate prior reports with a visible separator line.
pub fn join_priors(priors: &[String]) -> String {
    priors
        .iter()
        .map(|p| sanitize_for_prompt(p))
        .collect::<Vec<_>>()
        .join(&format!("\n{PRIOR_REPORT_SEPARATOR}\n"))
}

/// Build the comparison request over the current report and the
/// already-joined prior text.
pub fn build_comparison_messages(current: &str, priors_joined: &str) -> Vec<ChatMessage> {
    let current = escape_delimiters(&sanitize_for_prompt(current));
    let priors = escape_delimiters(priors_joined);
    vec![
        ChatMessage::system(comparison_system_prompt()),
        ChatMessage::user(format!(
            "<current_report>\n{current}\n</current_report>\n\n<prior_reports>\n{priors}\n</prior_reports>"
        )),
    ]
}
