// Clean operator-supplied text before prompt composition.
// Strips invisible Unicode, normalizes line endings, caps length.

/// Maximum input length to send to the generator (characters).
const MAX_INPUT_LENGTH: usize = 50_000;

/// Sanitize operator text for prompt composition. Logs counts on degraded
/// input but never the content itself (PHI risk).
pub fn sanitize_for_prompt(raw: &str) -> String {
    let (cleaned, stripped) = remove_invisible_chars(raw);
    if stripped > 0 {
        tracing::warn!(stripped_chars = stripped, "invisible characters stripped from input");
    }

    let normalized = cleaned.replace("\r\n", "\n").replace('\r', "\n");
    if normalized.len() > MAX_INPUT_LENGTH {
        tracing::warn!(
            length = normalized.len(),
            max = MAX_INPUT_LENGTH,
            "input truncated before prompt composition"
        );
    }
    truncate_to_max_length(&normalized, MAX_INPUT_LENGTH)
}

/// Remove invisible Unicode characters that could manipulate model behavior.
/// Preserves standard whitespace. Returns (cleaned, removed count).
fn remove_invisible_chars(text: &str) -> (String, usize) {
    let mut removed = 0usize;
    let cleaned = text
        .chars()
        .filter(|c| {
            if *c == ' ' || *c == '\n' || *c == '\t' || *c == '\r' {
                return true;
            }
            let invisible = matches!(
                *c,
                '\u{200B}'  // Zero-width space
                | '\u{200C}' // Zero-width non-joiner
                | '\u{200D}' // Zero-width joiner
                | '\u{200E}' // Left-to-right mark
                | '\u{200F}' // Right-to-left mark
                | '\u{202A}' // Left-to-right embedding
                | '\u{202B}' // Right-to-left embedding
                | '\u{202C}' // Pop directional formatting
                | '\u{202D}' // Left-to-right override
                | '\u{202E}' // Right-to-left override
                | '\u{2060}' // Word joiner
                | '\u{FEFF}' // BOM / zero-width no-break space
            ) || c.is_control();
            if invisible {
                removed += 1;
            }
            !invisible
        })
        .collect();
    (cleaned, removed)
}

/// Truncate to max length, breaking at the last word boundary.
fn truncate_to_max_length(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let truncated = &text[..cut];
    match truncated.rfind(|c: char| c.is_whitespace()) {
        Some(pos) => format!("{}…[TRUNCATED]", &text[..pos]),
        None => format!("{truncated}…[TRUNCATED]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_unchanged() {
        let input = "Liver: 2cm hypoechoic lesion in segment VI.\nSpleen: Normal.";
        assert_eq!(sanitize_for_prompt(input), input);
    }

    #[test]
    fn removes_zero_width_chars() {
        let input = "hypo\u{200B}echoic le\u{FEFF}sion";
        assert_eq!(sanitize_for_prompt(input), "hypoechoic lesion");
    }

    #[test]
    fn removes_bidi_overrides() {
        let input = "Normal \u{202E}desrever\u{202C} text";
        let result = sanitize_for_prompt(input);
        assert!(!result.contains('\u{202E}'));
        assert!(!result.contains('\u{202C}'));
    }

    #[test]
    fn normalizes_crlf() {
        let input = "Findings:\r\nLiver normal.\rSpleen normal.";
        assert_eq!(
            sanitize_for_prompt(input),
            "Findings:\nLiver normal.\nSpleen normal."
        );
    }

    #[test]
    fn control_chars_removed() {
        let input = "Liver:\x01 normal\x02";
        let result = sanitize_for_prompt(input);
        assert!(!result.contains('\x01'));
        assert!(result.contains("normal"));
    }

    #[test]
    fn truncates_long_text_at_word_boundary() {
        let long_text = "word ".repeat(20_000); // ~100K chars
        let result = sanitize_for_prompt(&long_text);
        assert!(result.len() <= MAX_INPUT_LENGTH + 20);
        assert!(result.ends_with("…[TRUNCATED]"));
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(sanitize_for_prompt(""), "");
    }
}
