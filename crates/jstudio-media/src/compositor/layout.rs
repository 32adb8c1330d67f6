//! Numeric layout rules for watermark placement.
//!
//! All functions here are pure; the compositor feeds them canvas and
//! overlay sizes and draws at the returned coordinates.

use jstudio_models::WatermarkPosition;

/// Padding as a fraction of canvas width.
pub const PADDING_RATIO: f64 = 0.03;
/// Minimum text font size in pixels.
pub const MIN_FONT_SIZE: u32 = 20;
/// Logo may occupy at most this fraction of canvas width.
pub const LOGO_MAX_WIDTH_RATIO: f64 = 0.25;
/// Logo may occupy at most this fraction of canvas height.
pub const LOGO_MAX_HEIGHT_RATIO: f64 = 0.15;

/// Horizontal alignment of the overlay relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical alignment of the overlay relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Anchor point on the canvas and which corner of the overlay sits on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

/// `floor(width * 0.03)`.
pub fn padding(canvas_width: u32) -> u32 {
    (canvas_width as f64 * PADDING_RATIO).floor() as u32
}

/// `max(20, floor(width * relative_size / 1000))`.
pub fn text_font_size(canvas_width: u32, relative_size: u32) -> u32 {
    let scaled = (canvas_width as f64 * relative_size as f64 / 1000.0).floor() as u32;
    scaled.max(MIN_FONT_SIZE)
}

/// Resolve the anchor point for a position on a `width x height` canvas.
pub fn resolve_anchor(position: WatermarkPosition, width: u32, height: u32) -> Anchor {
    let pad = padding(width) as f64;
    let (w, h) = (width as f64, height as f64);

    match position {
        WatermarkPosition::TopLeft => Anchor {
            x: pad,
            y: pad,
            h_align: HAlign::Left,
            v_align: VAlign::Top,
        },
        WatermarkPosition::TopRight => Anchor {
            x: w - pad,
            y: pad,
            h_align: HAlign::Right,
            v_align: VAlign::Top,
        },
        WatermarkPosition::BottomLeft => Anchor {
            x: pad,
            y: h - pad,
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
        },
        WatermarkPosition::BottomRight => Anchor {
            x: w - pad,
            y: h - pad,
            h_align: HAlign::Right,
            v_align: VAlign::Bottom,
        },
        WatermarkPosition::Center => Anchor {
            x: w / 2.0,
            y: h / 2.0,
            h_align: HAlign::Center,
            v_align: VAlign::Middle,
        },
    }
}

impl Anchor {
    /// Top-left corner of an `overlay_w x overlay_h` box aligned on this anchor.
    pub fn top_left_for(&self, overlay_w: f64, overlay_h: f64) -> (f64, f64) {
        let x = match self.h_align {
            HAlign::Left => self.x,
            HAlign::Center => self.x - overlay_w / 2.0,
            HAlign::Right => self.x - overlay_w,
        };
        let y = match self.v_align {
            VAlign::Top => self.y,
            VAlign::Middle => self.y - overlay_h / 2.0,
            VAlign::Bottom => self.y - overlay_h,
        };
        (x, y)
    }
}

/// Integer top-left placement of an overlay on the canvas.
pub fn place(
    position: WatermarkPosition,
    canvas: (u32, u32),
    overlay: (u32, u32),
) -> (i64, i64) {
    let anchor = resolve_anchor(position, canvas.0, canvas.1);
    let (x, y) = anchor.top_left_for(overlay.0 as f64, overlay.1 as f64);
    (x.floor() as i64, y.floor() as i64)
}

/// Scale a logo to fit 25% of canvas width and 15% of canvas height.
///
/// Only shrinks; a logo already inside both bounds keeps its size. Width is
/// applied first, then height, so whichever bound binds last wins.
pub fn fit_logo(logo_w: u32, logo_h: u32, canvas_w: u32, canvas_h: u32) -> (u32, u32) {
    if logo_w == 0 || logo_h == 0 {
        return (0, 0);
    }

    let max_w = canvas_w as f64 * LOGO_MAX_WIDTH_RATIO;
    let max_h = canvas_h as f64 * LOGO_MAX_HEIGHT_RATIO;
    let ratio = logo_w as f64 / logo_h as f64;

    let mut w = logo_w as f64;
    let mut h = logo_h as f64;

    if w > max_w {
        w = max_w;
        h = w / ratio;
    }
    if h > max_h {
        h = max_h;
        w = h * ratio;
    }

    ((w.floor() as u32).max(1), (h.floor() as u32).max(1))
}
