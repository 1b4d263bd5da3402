/// Default keyword → template rules, highest priority first.
///
/// Keyword sets overlap (findings mentioning both "kidney" and "cbd" imply
/// different studies), so matching is first-rule-wins in this fixed order
/// rather than best-match. All keywords are matched lowercase.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("liver", "CT Abdomen"),
    ("thyroid", "Thyroid Ultrasound (TI-RADS)"),
    ("breast", "Breast Ultrasound (BI-RADS)"),
    ("lung nodule", "CT Chest"),
    ("prostate", "Prostate MRI (PI-RADS)"),
    ("biliary", "MRCP"),
    ("cbd", "MRCP"),
    ("brain", "MRI Brain"),
    ("kidney", "Ultrasound Abdomen"),
    ("pelvis", "Ultrasound Pelvis"),
];

/// Deterministic free-text → template-name classifier.
///
/// Scans the lowercased input for each rule's keyword in rule order; the
/// first rule whose keyword occurs anywhere in the text wins, regardless of
/// where keywords appear in the text.
pub struct KeywordClassifier {
    rules: Vec<(String, String)>,
}

impl KeywordClassifier {
    /// Classifier with an explicit ordered rule list. Keywords are normalized
    /// to lowercase at construction.
    pub fn new(rules: &[(&str, &str)]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|(keyword, template)| (keyword.to_lowercase(), template.to_string()))
                .collect(),
        }
    }

    pub fn with_default_rules() -> Self {
        Self::new(DEFAULT_RULES)
    }

    /// `Some(template name)` for the highest-priority matching rule, `None`
    /// when nothing matches or the input is empty.
    pub fn classify(&self, text: &str) -> Option<&str> {
        if text.trim().is_empty() {
            return None;
        }
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|(keyword, _)| lower.contains(keyword.as_str()))
            .map(|(_, template)| template.as_str())
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
