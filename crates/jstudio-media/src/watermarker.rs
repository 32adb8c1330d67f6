//! Async watermark application over encoded image bytes.

use std::sync::Arc;

use image::DynamicImage;
use jstudio_models::{WatermarkKind, WatermarkSpec};
use tracing::{debug, warn};

use crate::compositor::Compositor;
use crate::error::{MediaError, MediaResult};
use crate::logo::{LogoLoadError, LogoLoader};

/// Bytes after watermarking plus whether anything was drawn.
#[derive(Debug, Clone)]
pub struct WatermarkedImage {
    pub bytes: Vec<u8>,
    pub applied: bool,
}

impl WatermarkedImage {
    fn unchanged(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            applied: false,
        }
    }
}

/// Loads logos and runs the compositor off the async runtime.
#[derive(Clone)]
pub struct Watermarker {
    compositor: Arc<Compositor>,
    loader: Arc<dyn LogoLoader>,
}

impl Watermarker {
    pub fn new(compositor: Arc<Compositor>, loader: Arc<dyn LogoLoader>) -> Self {
        Self { compositor, loader }
    }

    /// Watermark `bytes` according to `spec`.
    ///
    /// Inactive specs and unloadable logos return the original bytes.
    pub async fn apply(&self, bytes: &[u8], spec: &WatermarkSpec) -> MediaResult<WatermarkedImage> {
        if !spec.is_active() {
            return Ok(WatermarkedImage::unchanged(bytes));
        }
        match self.load_logo(spec).await {
            Ok(logo) => self.apply_with_logo(bytes, spec, logo).await,
            Err(e) => {
                warn!(error = %e, "Logo unavailable, leaving image unwatermarked");
                Ok(WatermarkedImage::unchanged(bytes))
            }
        }
    }

    /// Fetch and decode the logo an active logo spec refers to.
    ///
    /// Text specs need no logo and yield `None`.
    pub async fn load_logo(
        &self,
        spec: &WatermarkSpec,
    ) -> Result<Option<Arc<DynamicImage>>, LogoLoadError> {
        match (spec.kind, spec.logo_payload()) {
            (WatermarkKind::Logo, Some(reference)) => {
                Ok(Some(Arc::new(self.loader.load(reference).await?)))
            }
            _ => Ok(None),
        }
    }

    /// Watermark `bytes` with an already decoded logo.
    pub async fn apply_with_logo(
        &self,
        bytes: &[u8],
        spec: &WatermarkSpec,
        logo: Option<Arc<DynamicImage>>,
    ) -> MediaResult<WatermarkedImage> {
        if !spec.is_active() {
            return Ok(WatermarkedImage::unchanged(bytes));
        }

        let compositor = Arc::clone(&self.compositor);
        let spec = spec.clone();
        let input = bytes.to_vec();

        let (out, applied) = tokio::task::spawn_blocking(move || -> MediaResult<(Vec<u8>, bool)> {
            let image = image::load_from_memory(&input)?;
            let composited = compositor.composite(&image, &spec, logo.as_deref())?;
            let applied = composited.applied;
            if !applied {
                return Ok((input, false));
            }
            Ok((composited.into_png()?, true))
        })
        .await
        .map_err(|e| MediaError::internal(format!("compositing task failed: {}", e)))??;

        debug!(input_bytes = bytes.len(), output_bytes = out.len(), applied, "Watermark pass complete");

        Ok(WatermarkedImage {
            bytes: out,
            applied,
        })
    }
}

impl std::fmt::Debug for Watermarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watermarker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::encode_png;
    use async_trait::async_trait;
    use image::{Rgba, RgbaImage};
    use jstudio_models::WatermarkPosition;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedLogo {
        logo: Option<DynamicImage>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LogoLoader for FixedLogo {
        async fn load(&self, reference: &str) -> Result<DynamicImage, LogoLoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.logo
                .clone()
                .ok_or_else(|| LogoLoadError::Unsupported(reference.to_string()))
        }
    }

    fn watermarker(logo: Option<DynamicImage>) -> (Watermarker, Arc<FixedLogo>) {
        let loader = Arc::new(FixedLogo {
            logo,
            calls: AtomicUsize::new(0),
        });
        let wm = Watermarker::new(Arc::new(Compositor::with_font_data(Vec::new())), loader.clone());
        (wm, loader)
    }

    fn photo() -> Vec<u8> {
        encode_png(&DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            200,
            200,
            Rgba([20, 20, 20, 255]),
        )))
        .unwrap()
    }

    #[tokio::test]
    async fn test_disabled_returns_original_bytes() {
        let (wm, loader) = watermarker(None);
        let input = photo();
        let out = wm.apply(&input, &WatermarkSpec::disabled()).await.unwrap();
        assert!(!out.applied);
        assert_eq!(out.bytes, input);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_logo_failure_returns_original_bytes() {
        let (wm, loader) = watermarker(None);
        let input = photo();
        let spec = WatermarkSpec::logo("https://cdn.example.com/gone.png", WatermarkPosition::TopRight);
        let out = wm.apply(&input, &spec).await.unwrap();
        assert!(!out.applied);
        assert_eq!(out.bytes, input);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logo_applied() {
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255])));
        let (wm, _) = watermarker(Some(logo));
        let input = photo();
        let spec = WatermarkSpec::logo("inline", WatermarkPosition::TopLeft);
        let out = wm.apply(&input, &spec).await.unwrap();
        assert!(out.applied);

        let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (200, 200));
        // 40x20 logo fits (50 x 30 budget) unscaled, 6px from the top-left.
        assert!(decoded.get_pixel(6 + 20, 6 + 10)[0] > 200);
    }

    #[tokio::test]
    async fn test_preloaded_logo_is_reused_across_images() {
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255])));
        let (wm, loader) = watermarker(Some(logo));
        let spec = WatermarkSpec::logo("inline", WatermarkPosition::TopLeft);

        let decoded = wm.load_logo(&spec).await.unwrap();
        assert!(decoded.is_some());
        for _ in 0..3 {
            let out = wm.apply_with_logo(&photo(), &spec, decoded.clone()).await.unwrap();
            assert!(out.applied);
        }
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_text_spec_needs_no_logo() {
        let (wm, loader) = watermarker(None);
        let spec = WatermarkSpec::text("Store", WatermarkPosition::Center);
        assert!(wm.load_logo(&spec).await.unwrap().is_none());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undecodable_input_is_an_error() {
        let (wm, _) = watermarker(None);
        let spec = WatermarkSpec::text("Store", WatermarkPosition::Center);
        let err = wm.apply(b"nope", &spec).await.unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }
}
