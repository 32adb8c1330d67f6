//! Opaque binary image input.

use std::fmt;
use std::sync::Arc;

/// An uploaded or fetched image together with its declared media type.
///
/// The bytes are reference-counted so a request can be shared across
/// concurrent angle calls without copying the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceAsset {
    bytes: Arc<[u8]>,
    media_type: String,
    name: Option<String>,
}

impl SourceAsset {
    /// Wrap raw bytes with their media type (e.g. `image/png`).
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
            media_type: media_type.into(),
            name: None,
        }
    }

    /// Attach a file name (used for downloads and example assets).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the declared media type is an image type.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

impl fmt::Debug for SourceAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceAsset")
            .field("media_type", &self.media_type)
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_accessors() {
        let asset = SourceAsset::new(vec![1u8, 2, 3], "image/png").with_name("ring.png");
        assert_eq!(asset.bytes(), &[1, 2, 3]);
        assert_eq!(asset.media_type(), "image/png");
        assert_eq!(asset.name(), Some("ring.png"));
        assert_eq!(asset.len(), 3);
        assert!(asset.is_image());
    }

    #[test]
    fn test_clone_shares_bytes() {
        let asset = SourceAsset::new(vec![0u8; 1024], "image/jpeg");
        let copy = asset.clone();
        assert_eq!(asset.bytes().as_ptr(), copy.bytes().as_ptr());
    }

    #[test]
    fn test_debug_omits_payload() {
        let asset = SourceAsset::new(vec![7u8; 4], "image/webp");
        let debug = format!("{:?}", asset);
        assert!(debug.contains("len: 4"));
        assert!(!debug.contains("[7, 7"));
    }
}
