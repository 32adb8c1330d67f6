//! Aspect ratios accepted by the image and video models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target aspect ratio for generated photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ImageAspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Story,
    #[serde(rename = "16:9")]
    Wide,
}

impl ImageAspectRatio {
    pub const ALL: &'static [ImageAspectRatio] = &[
        ImageAspectRatio::Square,
        ImageAspectRatio::Portrait,
        ImageAspectRatio::Landscape,
        ImageAspectRatio::Story,
        ImageAspectRatio::Wide,
    ];

    /// Wire representation ("W:H").
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageAspectRatio::Square => "1:1",
            ImageAspectRatio::Portrait => "3:4",
            ImageAspectRatio::Landscape => "4:3",
            ImageAspectRatio::Story => "9:16",
            ImageAspectRatio::Wide => "16:9",
        }
    }
}

impl fmt::Display for ImageAspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageAspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| AspectRatioParseError(s.to_string()))
    }
}

/// Target aspect ratio for generated videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VideoAspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
}

impl VideoAspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoAspectRatio::Landscape => "16:9",
            VideoAspectRatio::Portrait => "9:16",
        }
    }
}

impl fmt::Display for VideoAspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoAspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(VideoAspectRatio::Landscape),
            "9:16" => Ok(VideoAspectRatio::Portrait),
            _ => Err(AspectRatioParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported aspect ratio: {0}")]
pub struct AspectRatioParseError(String);
