//! Image transfer encoding and remote asset retrieval.
//!
//! The generation backend expects inline images as standard base64 without
//! a `data:` prefix. `encode` produces that form; `decode` accepts either
//! the bare form or a full data URL.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::ImageFormat;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info};

use jstudio_models::SourceAsset;

use crate::error::{MediaError, MediaResult};

/// Media type used when neither the server nor the bytes identify one.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

// =============================================================================
// Transfer Encoding
// =============================================================================

/// Encode image bytes into the backend's text-safe transfer form.
///
/// Fails if the input is empty or carries no media type.
pub fn encode(bytes: &[u8], media_type: &str) -> MediaResult<String> {
    if bytes.is_empty() {
        return Err(MediaError::encoding("input image is empty"));
    }
    if media_type.trim().is_empty() {
        return Err(MediaError::encoding("input image has no media type"));
    }
    Ok(STANDARD.encode(bytes))
}

/// Encode a source asset.
pub fn encode_asset(asset: &SourceAsset) -> MediaResult<String> {
    encode(asset.bytes(), asset.media_type())
}

/// Decode a transfer string (bare base64 or `data:<type>;base64,<payload>`).
pub fn decode(transfer: &str) -> MediaResult<Vec<u8>> {
    let payload = match transfer.split_once(',') {
        Some((prefix, payload)) if prefix.starts_with("data:") => {
            if !prefix.ends_with(";base64") {
                return Err(MediaError::encoding("data URL is not base64 encoded"));
            }
            payload
        }
        _ => transfer,
    };

    let payload = payload.trim();
    if payload.is_empty() {
        return Err(MediaError::encoding("transfer string is empty"));
    }

    STANDARD
        .decode(payload)
        .map_err(|e| MediaError::encoding(format!("invalid base64 payload: {}", e)))
}

/// Build a `data:` URL for display.
pub fn to_data_url(bytes: &[u8], media_type: &str) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Media type of a `data:` URL, if the string is one.
pub fn data_url_media_type(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("data:")?;
    let (meta, _) = rest.split_once(',')?;
    meta.split(';').next().filter(|m| !m.is_empty())
}

/// Identify common image formats from their magic bytes.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        _ => None,
    }
}

// =============================================================================
// Remote Fetch
// =============================================================================

/// Fetches remote images (example assets, logos) into `SourceAsset`s.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    http: Client,
}

impl ImageFetcher {
    /// Create a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> MediaResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediaError::internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Create a fetcher reusing an existing HTTP client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Retrieve a remote resource and wrap it with its declared content type.
    ///
    /// The content type comes from the response header; when absent the
    /// bytes are sniffed, falling back to `application/octet-stream`.
    pub async fn fetch_as_file(&self, url: &str, suggested_name: &str) -> MediaResult<SourceAsset> {
        debug!(url = %url, "Fetching remote asset");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| MediaError::fetch_failed(url, e.to_string(), None))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::fetch_failed(
                url,
                format!("HTTP {}", status),
                Some(status.as_u16()),
            ));
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MediaError::fetch_failed(url, format!("failed to read body: {}", e), None))?;

        let media_type = declared
            .or_else(|| sniff_media_type(&bytes).map(str::to_string))
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());

        info!(
            url = %url,
            media_type = %media_type,
            bytes = bytes.len(),
            "Fetched remote asset"
        );

        Ok(SourceAsset::new(bytes.to_vec(), media_type).with_name(suggested_name))
    }
}
