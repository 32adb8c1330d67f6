//! Studio configuration as stored by the hosted backend.
//!
//! Only the parts the pipeline consumes are modelled here; branding and
//! copy fields stay in the admin console's domain.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::profile::GenerationMode;
use crate::watermark::WatermarkSpec;

/// Feature switches controlled from the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureToggles {
    pub enable_photo: bool,
    pub enable_video: bool,
    pub show_examples: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            enable_photo: true,
            enable_video: true,
            show_examples: true,
        }
    }
}

impl FeatureToggles {
    /// Whether the studio offers `mode` at all, independent of any user.
    pub fn allows(&self, mode: GenerationMode) -> bool {
        match mode {
            GenerationMode::Photo => self.enable_photo,
            GenerationMode::Video => self.enable_video,
        }
    }
}

/// Example product photo offered to new users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleAsset {
    pub label: String,
    pub url: String,
}

impl ExampleAsset {
    /// File name used when the example is fetched (first space becomes `_`).
    pub fn file_name(&self) -> String {
        format!("{}.jpg", self.label.replacen(' ', "_", 1))
    }

    /// Whether the URL parses as an absolute http(s) URL.
    pub fn has_valid_url(&self) -> bool {
        Url::parse(&self.url)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false)
    }
}

/// Pipeline-relevant slice of the studio configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioConfig {
    pub store_name: String,
    pub features: FeatureToggles,
    pub watermark: WatermarkSpec,
    pub examples: Vec<ExampleAsset>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            store_name: "Gemini Jewelry Studio".to_string(),
            features: FeatureToggles::default(),
            watermark: WatermarkSpec::default(),
            examples: vec![
                ExampleAsset {
                    label: "Diamond Ring".to_string(),
                    url: "https://images.unsplash.com/photo-1605100804763-247f67b3557e?auto=format&fit=crop&w=600&q=80".to_string(),
                },
                ExampleAsset {
                    label: "Gold Necklace".to_string(),
                    url: "https://images.unsplash.com/photo-1599643478518-17488fbbcd75?auto=format&fit=crop&w=600&q=80".to_string(),
                },
                ExampleAsset {
                    label: "Luxury Watch".to_string(),
                    url: "https://images.unsplash.com/photo-1524592094714-0f0654e20314?auto=format&fit=crop&w=600&q=80".to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_file_name() {
        let example = ExampleAsset {
            label: "Diamond Ring Set".to_string(),
            url: "https://example.com/a.jpg".to_string(),
        };
        assert_eq!(example.file_name(), "Diamond_Ring Set.jpg");
        assert!(example.has_valid_url());
    }

    #[test]
    fn test_default_examples_are_valid() {
        let config = StudioConfig::default();
        assert_eq!(config.examples.len(), 3);
        assert!(config.examples.iter().all(ExampleAsset::has_valid_url));
    }

    #[test]
    fn test_feature_toggles_per_mode() {
        let toggles = FeatureToggles {
            enable_photo: false,
            ..Default::default()
        };
        assert!(!toggles.allows(GenerationMode::Photo));
        assert!(toggles.allows(GenerationMode::Video));
        assert!(FeatureToggles::default().allows(GenerationMode::Photo));
    }

    #[test]
    fn test_partial_config_merges_defaults() {
        let config: StudioConfig =
            serde_json::from_str(r#"{"storeName": "Luxe", "watermark": {"enabled": false}}"#).unwrap();
        assert_eq!(config.store_name, "Luxe");
        assert!(!config.watermark.enabled);
        assert!(config.features.enable_video);
        assert_eq!(config.examples.len(), 3);
    }
}
