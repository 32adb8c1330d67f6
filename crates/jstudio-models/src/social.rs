//! Caption languages offered for social posts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SocialLanguage {
    #[default]
    Hebrew,
    Arabic,
    English,
}

impl SocialLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialLanguage::Hebrew => "Hebrew",
            SocialLanguage::Arabic => "Arabic",
            SocialLanguage::English => "English",
        }
    }

    /// Right-to-left script.
    pub fn is_rtl(&self) -> bool {
        !matches!(self, SocialLanguage::English)
    }
}

impl fmt::Display for SocialLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialLanguage {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hebrew" | "he" => Ok(SocialLanguage::Hebrew),
            "arabic" | "ar" => Ok(SocialLanguage::Arabic),
            "english" | "en" => Ok(SocialLanguage::English),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unsupported caption language: {0}")]
pub struct LanguageParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_direction() {
        assert_eq!("EN".parse::<SocialLanguage>().unwrap(), SocialLanguage::English);
        assert!(!SocialLanguage::English.is_rtl());
        assert!(SocialLanguage::Arabic.is_rtl());
        assert!("klingon".parse::<SocialLanguage>().is_err());
    }
}
