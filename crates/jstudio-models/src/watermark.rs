//! Watermark specification supplied by the studio configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default relative text size (per-mille of image width).
pub const DEFAULT_TEXT_SIZE: u32 = 50;

/// Where the overlay is anchored on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl WatermarkPosition {
    pub const ALL: &'static [WatermarkPosition] = &[
        WatermarkPosition::TopLeft,
        WatermarkPosition::TopRight,
        WatermarkPosition::BottomLeft,
        WatermarkPosition::BottomRight,
        WatermarkPosition::Center,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkPosition::TopLeft => "top-left",
            WatermarkPosition::TopRight => "top-right",
            WatermarkPosition::BottomLeft => "bottom-left",
            WatermarkPosition::BottomRight => "bottom-right",
            WatermarkPosition::Center => "center",
        }
    }
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatermarkPosition {
    type Err = WatermarkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WatermarkParseError(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown watermark position: {0}")]
pub struct WatermarkParseError(String);

/// Overlay payload type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    #[default]
    Text,
    Logo,
}

/// Watermark settings as stored in the studio configuration.
///
/// Field names follow the stored JSON (`type`, `textSize`, `textPosition`,
/// `logoUrl`) so existing configurations deserialize unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkSpec {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: WatermarkKind,
    pub text: Option<String>,
    /// Font size relative to image width, in per-mille.
    pub text_size: u32,
    #[serde(rename = "textPosition")]
    pub position: WatermarkPosition,
    /// CSS-style colour string (`#fff`, `rgba(..)`).
    pub text_color: Option<String>,
    /// CSS-style font family list.
    pub text_font: Option<String>,
    /// Logo reference: `data:` URL, http(s) URL or local path.
    pub logo_url: Option<String>,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: WatermarkKind::Text,
            text: Some("My Jewelry Store".to_string()),
            text_size: DEFAULT_TEXT_SIZE,
            position: WatermarkPosition::BottomRight,
            text_color: Some("#ffffff".to_string()),
            text_font: Some("\"Playfair Display\", serif".to_string()),
            logo_url: None,
        }
    }
}

impl WatermarkSpec {
    /// Disabled spec (compositing becomes a no-op).
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Text watermark at the given position.
    pub fn text(text: impl Into<String>, position: WatermarkPosition) -> Self {
        Self {
            kind: WatermarkKind::Text,
            text: Some(text.into()),
            position,
            ..Default::default()
        }
    }

    /// Logo watermark at the given position.
    pub fn logo(logo_url: impl Into<String>, position: WatermarkPosition) -> Self {
        Self {
            kind: WatermarkKind::Logo,
            text: None,
            logo_url: Some(logo_url.into()),
            position,
            ..Default::default()
        }
    }

    pub fn with_text_size(mut self, text_size: u32) -> Self {
        self.text_size = text_size;
        self
    }

    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    /// Non-blank text payload.
    pub fn text_payload(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Non-blank logo reference.
    pub fn logo_payload(&self) -> Option<&str> {
        self.logo_url.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// Relative text size, with zero treated as unset.
    pub fn effective_text_size(&self) -> u32 {
        if self.text_size == 0 {
            DEFAULT_TEXT_SIZE
        } else {
            self.text_size
        }
    }

    /// Whether compositing would change the image.
    pub fn is_active(&self) -> bool {
        self.enabled
            && match self.kind {
                WatermarkKind::Text => self.text_payload().is_some(),
                WatermarkKind::Logo => self.logo_payload().is_some(),
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec() {
        let spec = WatermarkSpec::default();
        assert!(spec.enabled);
        assert_eq!(spec.kind, WatermarkKind::Text);
        assert_eq!(spec.text_size, 50);
        assert_eq!(spec.position, WatermarkPosition::BottomRight);
        assert!(spec.is_active());
    }

    #[test]
    fn test_is_active_requires_payload() {
        assert!(!WatermarkSpec::disabled().is_active());
        assert!(!WatermarkSpec::text("   ", WatermarkPosition::Center).is_active());
        assert!(!WatermarkSpec::logo("", WatermarkPosition::Center).is_active());
        assert!(WatermarkSpec::logo("https://x/logo.png", WatermarkPosition::TopLeft).is_active());

        let mut logo_without_url = WatermarkSpec::default();
        logo_without_url.kind = WatermarkKind::Logo;
        assert!(!logo_without_url.is_active());
    }

    #[test]
    fn test_deserialize_stored_config() {
        let json = r##"{
            "enabled": true,
            "type": "logo",
            "textSize": 40,
            "textPosition": "top-left",
            "logoUrl": "https://cdn.example.com/logo.png"
        }"##;
        let spec: WatermarkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.kind, WatermarkKind::Logo);
        assert_eq!(spec.position, WatermarkPosition::TopLeft);
        assert_eq!(spec.text_size, 40);
        assert_eq!(spec.logo_payload(), Some("https://cdn.example.com/logo.png"));
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let spec: WatermarkSpec = serde_json::from_str(r#"{"text": "Luxe"}"#).unwrap();
        assert_eq!(spec.text_payload(), Some("Luxe"));
        assert_eq!(spec.text_size, DEFAULT_TEXT_SIZE);
        assert_eq!(spec.position, WatermarkPosition::BottomRight);
    }

    #[test]
    fn test_zero_text_size_uses_default() {
        let spec = WatermarkSpec::text("Luxe", WatermarkPosition::Center).with_text_size(0);
        assert_eq!(spec.effective_text_size(), DEFAULT_TEXT_SIZE);
        assert_eq!(spec.with_text_size(30).effective_text_size(), 30);
    }

    #[test]
    fn test_position_parse() {
        assert_eq!("Top-Right".parse::<WatermarkPosition>().unwrap(), WatermarkPosition::TopRight);
        assert!("middle".parse::<WatermarkPosition>().is_err());
    }
}
