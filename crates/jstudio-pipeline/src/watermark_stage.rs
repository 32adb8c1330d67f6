//! Watermarks every generated image of a batch.

use futures::future::join_all;
use jstudio_media::Watermarker;
use jstudio_models::{GeneratedImage, WatermarkSpec};
use tracing::{debug, warn};

use crate::metrics::record_watermark;

#[derive(Debug, Clone)]
pub struct WatermarkStage {
    watermarker: Watermarker,
}

impl WatermarkStage {
    pub fn new(watermarker: Watermarker) -> Self {
        Self { watermarker }
    }

    /// Attach watermarked bytes to each image.
    ///
    /// A logo is fetched once per batch. Images are processed concurrently. An
    /// image whose watermark fails keeps only its original bytes; the batch
    /// itself never fails here.
    pub async fn apply(&self, images: Vec<GeneratedImage>, spec: &WatermarkSpec) -> Vec<GeneratedImage> {
        if !spec.is_active() {
            debug!(images = images.len(), "Watermark inactive, skipping");
            return images;
        }

        let logo = match self.watermarker.load_logo(spec).await {
            Ok(logo) => logo,
            Err(e) => {
                warn!(images = images.len(), error = %e, "Logo unavailable, leaving batch unwatermarked");
                for _ in &images {
                    record_watermark("skipped");
                }
                return images;
            }
        };

        let passes = images.into_iter().map(|mut image| {
            let logo = logo.clone();
            async move {
                match self.watermarker.apply_with_logo(&image.image, spec, logo).await {
                    Ok(out) if out.applied => {
                        image.watermarked = Some(out.bytes);
                        record_watermark("applied");
                    }
                    Ok(_) => record_watermark("skipped"),
                    Err(e) => {
                        warn!(angle = %image.angle, error = %e, "Watermark failed, keeping original image");
                        record_watermark("failed");
                    }
                }
                image
            }
        });

        join_all(passes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{DynamicImage, Rgba, RgbaImage};
    use jstudio_media::{encode_png, Compositor, LogoLoadError, LogoLoader};
    use jstudio_models::WatermarkPosition;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingLogo {
        missing: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LogoLoader for CountingLogo {
        async fn load(&self, reference: &str) -> Result<DynamicImage, LogoLoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.missing {
                return Err(LogoLoadError::Unsupported(reference.to_string()));
            }
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                40,
                20,
                Rgba([255, 0, 0, 255]),
            )))
        }
    }

    fn stage(loader: Arc<CountingLogo>) -> WatermarkStage {
        WatermarkStage::new(Watermarker::new(
            Arc::new(Compositor::with_font_data(Vec::new())),
            loader,
        ))
    }

    fn batch() -> Vec<GeneratedImage> {
        let png = encode_png(&DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            200,
            200,
            Rgba([20, 20, 20, 255]),
        )))
        .unwrap();
        ["Front View", "Side Profile", "Close-up Detail"]
            .into_iter()
            .map(|angle| GeneratedImage::new(png.clone(), "image/png", angle, "prompt"))
            .collect()
    }

    #[tokio::test]
    async fn test_logo_loaded_once_per_batch() {
        let loader = Arc::new(CountingLogo::default());
        let spec = WatermarkSpec::logo("https://cdn.example.com/logo.png", WatermarkPosition::TopLeft);

        let images = stage(loader.clone()).apply(batch(), &spec).await;

        assert_eq!(images.len(), 3);
        assert!(images.iter().all(|i| i.watermarked.is_some()));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_logo_leaves_batch_unwatermarked() {
        let loader = Arc::new(CountingLogo {
            missing: true,
            ..Default::default()
        });
        let spec = WatermarkSpec::logo("https://cdn.example.com/gone.png", WatermarkPosition::TopLeft);

        let images = stage(loader.clone()).apply(batch(), &spec).await;

        assert_eq!(images.len(), 3);
        assert!(images.iter().all(|i| i.watermarked.is_none()));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }
}
