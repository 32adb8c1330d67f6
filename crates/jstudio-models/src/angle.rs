//! Fixed photoshoot angle catalog.

use serde::Serialize;

/// One named shot style used to diversify a photoshoot batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AngleSpec {
    /// Display label (e.g. "Close-up").
    pub label: &'static str,
    /// Prompt fragment appended as the shot type.
    pub prompt_suffix: &'static str,
}

/// The catalog, in display order. Results are always returned in this order.
pub const ANGLES: &[AngleSpec] = &[
    AngleSpec {
        label: "Close-up",
        prompt_suffix: "Close-up macro shot focusing on the jewelry as worn by the model, shallow depth of field, crisp detail on the metal and stones",
    },
    AngleSpec {
        label: "Full body",
        prompt_suffix: "Full body fashion shot of the model, the jewelry clearly visible and in focus, editorial composition",
    },
    AngleSpec {
        label: "Lifestyle",
        prompt_suffix: "Candid lifestyle shot of the model in a natural moment, the jewelry catching the light",
    },
];

impl AngleSpec {
    /// Look up an angle by label (case-insensitive).
    pub fn by_label(label: &str) -> Option<&'static AngleSpec> {
        ANGLES.iter().find(|a| a.label.eq_ignore_ascii_case(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let labels: Vec<_> = ANGLES.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Close-up", "Full body", "Lifestyle"]);
    }

    #[test]
    fn test_labels_unique() {
        let mut seen = std::collections::HashSet::new();
        assert!(ANGLES.iter().all(|a| seen.insert(a.label)));
    }

    #[test]
    fn test_by_label() {
        assert_eq!(AngleSpec::by_label("full BODY").map(|a| a.label), Some("Full body"));
        assert!(AngleSpec::by_label("aerial").is_none());
    }
}
