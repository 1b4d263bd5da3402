use super::{FallbackSource, TemplateSource};

/// Compiled-in baseline skeletons, keyed by display name.
///
/// These cover the common study types so a fresh install can generate reports
/// before the operator has created any template of their own. A local entry
/// with the same name shadows the baseline.
const BASELINE_TEMPLATES: &[(&str, &str)] = &[
    (
        "CT Abdomen",
        "Type of Study: CT Abdomen and Pelvis\nHistory:\nFindings:\nImpression:",
    ),
    (
        "CT Chest",
        "Type of Study: CT Chest\nHistory:\nFindings:\nImpression:",
    ),
    (
        "MRI Brain",
        "Type of Study: MRI Brain\nHistory:\nFindings:\nImpression:",
    ),
    (
        "Ultrasound Abdomen",
        "Type of Study: Ultrasound Abdomen\nHistory:\nFindings:\nImpression:",
    ),
    (
        "Ultrasound Pelvis",
        "Type of Study: Ultrasound Pelvis (Female)\nHistory:\nFindings:\nImpression:",
    ),
    (
        "MRCP",
        "Type of Study: MRCP\nHistory:\nFindings:\nImpression:",
    ),
    (
        "Thyroid Ultrasound (TI-RADS)",
        "Type of Study: Ultrasound Thyroid (TI-RADS)\nHistory:\nFindings:\nImpression:",
    ),
    (
        "Breast Ultrasound (BI-RADS)",
        "Type of Study: Ultrasound Breast (BI-RADS)\nHistory:\nFindings:\nImpression:",
    ),
    (
        "Liver CT (LI-RADS)",
        "Type of Study: CT Liver (LI-RADS)\nHistory:\nFindings:\nImpression:",
    ),
    (
        "Prostate MRI (PI-RADS)",
        "Type of Study: MRI Prostate (PI-RADS)\nHistory:\nFindings:\nImpression:",
    ),
];

/// Built-in resolution tier over the baseline set.
pub struct BuiltinTemplates;

impl FallbackSource for BuiltinTemplates {
    fn source(&self) -> TemplateSource {
        TemplateSource::BuiltIn
    }

    fn lookup(&self, name: &str) -> Option<String> {
        BASELINE_TEMPLATES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, body)| body.to_string())
    }

    fn names(&self) -> Vec<String> {
        BASELINE_TEMPLATES
            .iter()
            .map(|(n, _)| n.to_string())
            .collect()
    }
}
