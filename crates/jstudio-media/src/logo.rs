//! Logo retrieval for logo watermarks.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::image_prep::{decode, ImageFetcher};

/// Why a logo could not be turned into an image.
#[derive(Debug, Error)]
pub enum LogoLoadError {
    #[error("Logo fetch failed: {0}")]
    Fetch(#[from] MediaError),

    #[error("Logo decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Logo read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported logo reference: {0}")]
    Unsupported(String),
}

/// Resolves a logo reference to a decoded image.
#[async_trait]
pub trait LogoLoader: Send + Sync {
    async fn load(&self, reference: &str) -> Result<DynamicImage, LogoLoadError>;
}

/// Loads logos from `data:` URLs, `http(s)` URLs, or local paths.
#[derive(Debug, Clone)]
pub struct HttpLogoLoader {
    fetcher: ImageFetcher,
}

impl HttpLogoLoader {
    pub fn new(timeout: Duration) -> MediaResult<Self> {
        Ok(Self {
            fetcher: ImageFetcher::new(timeout)?,
        })
    }

    pub fn with_fetcher(fetcher: ImageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl LogoLoader for HttpLogoLoader {
    async fn load(&self, reference: &str) -> Result<DynamicImage, LogoLoadError> {
        let reference = reference.trim();
        let bytes = match LogoSource::classify(reference)? {
            LogoSource::DataUrl => decode(reference)?,
            LogoSource::Remote => self.fetcher.fetch_as_file(reference, "logo").await?.bytes().to_vec(),
            LogoSource::File => tokio::fs::read(Path::new(reference)).await?,
        };

        debug!(bytes = bytes.len(), "Decoding logo");
        Ok(image::load_from_memory(&bytes)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogoSource {
    DataUrl,
    Remote,
    File,
}

impl LogoSource {
    fn classify(reference: &str) -> Result<Self, LogoLoadError> {
        if reference.is_empty() {
            return Err(LogoLoadError::Unsupported("empty reference".to_string()));
        }
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("data:") {
            Ok(Self::DataUrl)
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Remote)
        } else if lower.contains("://") {
            Err(LogoLoadError::Unsupported(reference.to_string()))
        } else {
            Ok(Self::File)
        }
    }
}
