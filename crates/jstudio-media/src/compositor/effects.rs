//! Shadow and opacity helpers for overlay layers.

use image::{imageops, Rgba, RgbaImage};

/// Canvas-style `shadowBlur` of 4 maps to a Gaussian sigma of half that.
pub const SHADOW_SIGMA: f32 = 2.0;

/// Black silhouette of `layer`, alpha scaled by `alpha`, then blurred.
pub fn shadow(layer: &RgbaImage, alpha: f32) -> RgbaImage {
    let mut silhouette = RgbaImage::new(layer.width(), layer.height());
    for (x, y, px) in layer.enumerate_pixels() {
        let a = (px[3] as f32 * alpha).round().clamp(0.0, 255.0) as u8;
        silhouette.put_pixel(x, y, Rgba([0, 0, 0, a]));
    }
    imageops::blur(&silhouette, SHADOW_SIGMA)
}

/// Multiply every pixel's alpha by `opacity`.
pub fn apply_opacity(layer: &mut RgbaImage, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    for px in layer.pixels_mut() {
        px[3] = (px[3] as f32 * opacity).round() as u8;
    }
}

/// Copy `layer` into the center of a transparent canvas grown by `margin` on every side.
pub fn pad(layer: &RgbaImage, margin: u32) -> RgbaImage {
    let mut padded = RgbaImage::new(layer.width() + 2 * margin, layer.height() + 2 * margin);
    imageops::replace(&mut padded, layer, margin as i64, margin as i64);
    padded
}
