//! Watermark compositing.
//!
//! Draws a text or logo watermark onto a copy of an image. Text is rendered
//! bold with a soft black shadow; logos are scaled to fit a corner budget and
//! drawn slightly translucent. Placement honours a padding of 3% of the
//! image width from the chosen edges.

mod color;
mod effects;
pub mod layout;
mod text;

use std::io::Cursor;

use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use jstudio_models::{WatermarkKind, WatermarkSpec};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

pub use color::{parse_css_color, DEFAULT_TEXT_COLOR};
pub use text::TextRenderer;

const TEXT_SHADOW_ALPHA: f32 = 0.7;
const TEXT_SHADOW_OFFSET: i64 = 2;
const LOGO_SHADOW_ALPHA: f32 = 0.3;
const LOGO_OPACITY: f32 = 0.9;

/// Result of a compositing pass.
#[derive(Debug, Clone)]
pub struct CompositedImage {
    pub image: RgbaImage,
    /// False when the spec was inactive and the image was copied unchanged.
    pub applied: bool,
}

impl CompositedImage {
    /// Encode as PNG.
    pub fn into_png(self) -> MediaResult<Vec<u8>> {
        encode_png(&DynamicImage::ImageRgba8(self.image))
    }
}

/// Draws watermarks onto images.
#[derive(Debug, Default)]
pub struct Compositor {
    text: TextRenderer,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            text: TextRenderer::new(),
        }
    }

    /// Compositor with additional font files (e.g. a bundled display face).
    pub fn with_font_data(fonts: Vec<Vec<u8>>) -> Self {
        Self {
            text: TextRenderer::with_font_data(fonts),
        }
    }

    /// Composite `spec` onto a copy of `image`.
    ///
    /// A logo spec without a decoded `logo` leaves the image unchanged.
    pub fn composite(
        &self,
        image: &DynamicImage,
        spec: &WatermarkSpec,
        logo: Option<&DynamicImage>,
    ) -> MediaResult<CompositedImage> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(MediaError::render_context(format!(
                "cannot draw on a {}x{} canvas",
                width, height
            )));
        }

        let mut canvas = image.to_rgba8();
        if !spec.is_active() {
            return Ok(CompositedImage {
                image: canvas,
                applied: false,
            });
        }

        let applied = match spec.kind {
            WatermarkKind::Text => self.draw_text(&mut canvas, spec)?,
            WatermarkKind::Logo => match logo {
                Some(logo) => draw_logo(&mut canvas, spec, logo),
                None => false,
            },
        };

        debug!(
            width,
            height,
            kind = ?spec.kind,
            position = spec.position.as_str(),
            applied,
            "Composited watermark"
        );

        Ok(CompositedImage {
            image: canvas,
            applied,
        })
    }

    /// Decode `bytes`, composite, and return PNG bytes.
    pub fn composite_bytes(
        &self,
        bytes: &[u8],
        spec: &WatermarkSpec,
        logo: Option<&DynamicImage>,
    ) -> MediaResult<Vec<u8>> {
        let image = image::load_from_memory(bytes)?;
        self.composite(&image, spec, logo)?.into_png()
    }

    fn draw_text(&self, canvas: &mut RgbaImage, spec: &WatermarkSpec) -> MediaResult<bool> {
        let Some(text) = spec.text_payload() else {
            return Ok(false);
        };
        let (width, height) = canvas.dimensions();
        let font_size = layout::text_font_size(width, spec.effective_text_size()) as f32;
        let fill = color::text_color_or_default(spec.text_color.as_deref());

        let Some(layer) = self
            .text
            .render(text, spec.text_font.as_deref(), font_size, fill)?
        else {
            return Ok(false);
        };

        let (x, y) = layout::place(
            spec.position,
            (width, height),
            (layer.box_width, layer.box_height),
        );
        let margin = text::LAYER_MARGIN as i64;

        let shadow = effects::shadow(&layer.pixels, TEXT_SHADOW_ALPHA);
        imageops::overlay(
            canvas,
            &shadow,
            x - margin + TEXT_SHADOW_OFFSET,
            y - margin + TEXT_SHADOW_OFFSET,
        );
        imageops::overlay(canvas, &layer.pixels, x - margin, y - margin);
        Ok(true)
    }
}

fn draw_logo(canvas: &mut RgbaImage, spec: &WatermarkSpec, logo: &DynamicImage) -> bool {
    let (width, height) = canvas.dimensions();
    let (logo_w, logo_h) = layout::fit_logo(logo.width(), logo.height(), width, height);
    if logo_w == 0 || logo_h == 0 {
        return false;
    }

    let mut scaled = if (logo_w, logo_h) == (logo.width(), logo.height()) {
        logo.to_rgba8()
    } else {
        imageops::resize(&logo.to_rgba8(), logo_w, logo_h, imageops::FilterType::Lanczos3)
    };
    effects::apply_opacity(&mut scaled, LOGO_OPACITY);

    let margin = text::LAYER_MARGIN;
    let padded = effects::pad(&scaled, margin);
    let shadow = effects::shadow(&padded, LOGO_SHADOW_ALPHA);

    let (x, y) = layout::place(spec.position, (width, height), (logo_w, logo_h));
    let origin_x = x - margin as i64;
    let origin_y = y - margin as i64;
    imageops::overlay(canvas, &shadow, origin_x, origin_y);
    imageops::overlay(canvas, &padded, origin_x, origin_y);
    true
}

/// Encode any image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> MediaResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use jstudio_models::WatermarkPosition;

    fn canvas(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([40, 60, 80, 255])))
    }

    fn compositor() -> Compositor {
        Compositor::with_font_data(Vec::new())
    }

    #[test]
    fn test_disabled_spec_copies_image() {
        let img = canvas(50, 40);
        let out = compositor()
            .composite(&img, &WatermarkSpec::disabled(), None)
            .unwrap();
        assert!(!out.applied);
        assert_eq!(out.image, img.to_rgba8());
    }

    #[test]
    fn test_zero_canvas_is_rejected() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 10));
        let err = compositor()
            .composite(&img, &WatermarkSpec::default(), None)
            .unwrap_err();
        assert!(matches!(err, MediaError::RenderContextUnavailable(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_logo_spec_without_logo_is_noop() {
        let img = canvas(100, 100);
        let spec = WatermarkSpec::logo("https://cdn.example.com/logo.png", WatermarkPosition::TopLeft);
        let out = compositor().composite(&img, &spec, None).unwrap();
        assert!(!out.applied);
        assert_eq!(out.image, img.to_rgba8());
    }

    #[test]
    fn test_logo_lands_in_bottom_right_corner() {
        let img = canvas(400, 400);
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            1000,
            1000,
            Rgba([250, 250, 250, 255]),
        ));
        let spec = WatermarkSpec::logo("inline", WatermarkPosition::BottomRight);
        let out = compositor().composite(&img, &spec, Some(&logo)).unwrap();
        assert!(out.applied);
        assert_eq!(out.image.dimensions(), (400, 400));

        // Logo fits 60x60 (15% of height), padded 12px from the bottom-right edge.
        let inside = out.image.get_pixel(400 - 12 - 30, 400 - 12 - 30);
        assert!(inside[0] > 200, "expected bright logo pixel, got {:?}", inside);

        // Opposite corner is untouched.
        assert_eq!(out.image.get_pixel(5, 5), &Rgba([40, 60, 80, 255]));
    }

    /// Bounding box of near-white pixels, i.e. the text fill without its shadow.
    fn bright_bbox(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        image
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] > 200 && p[1] > 200 && p[2] > 200)
            .fold(None, |bbox, (x, y, _)| match bbox {
                None => Some((x, y, x, y)),
                Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
            })
    }

    #[test]
    fn test_text_lands_inside_bottom_right_padding() {
        let compositor = Compositor::new();
        let spec = WatermarkSpec::text("My Store", WatermarkPosition::BottomRight);
        let layer = TextRenderer::new()
            .render("My Store", spec.text_font.as_deref(), 50.0, Rgba([255, 255, 255, 255]))
            .unwrap();
        if layer.is_none() {
            // Host has no usable fonts.
            return;
        }

        let img = canvas(1000, 1000);
        let out = compositor.composite(&img, &spec, None).unwrap();
        assert!(out.applied);

        let (x0, y0, x1, y1) = bright_bbox(&out.image).expect("text pixels drawn");
        // 3% padding on a 1000px canvas.
        assert!(x1 <= 970 && y1 <= 970, "ink ends at ({}, {})", x1, y1);
        assert!(x0 > 500 && y0 > 500, "ink starts at ({}, {})", x0, y0);

        let base = Rgba([40, 60, 80, 255]);
        for y in 0..300 {
            for x in 0..300 {
                assert_eq!(out.image.get_pixel(x, y), &base);
            }
        }
    }

    #[test]
    fn test_zero_text_size_draws_like_default() {
        let compositor = Compositor::new();
        let img = canvas(600, 400);
        let default = WatermarkSpec::text("Luxe", WatermarkPosition::Center);
        let zero = default.clone().with_text_size(0);

        let a = compositor.composite(&img, &default, None).unwrap();
        let b = compositor.composite(&img, &zero, None).unwrap();
        assert_eq!(a.applied, b.applied);
        assert_eq!(a.image, b.image);
    }

    #[test]
    fn test_composite_bytes_outputs_png() {
        let png = encode_png(&canvas(32, 32)).unwrap();
        let out = compositor()
            .composite_bytes(&png, &WatermarkSpec::disabled(), None)
            .unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
    }
}
