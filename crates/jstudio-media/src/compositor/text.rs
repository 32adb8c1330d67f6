//! Text layer rendering with cosmic-text.

use std::sync::Mutex;

use cosmic_text::{
    Attrs, Buffer, Color as CosmicColor, Family, FontSystem, Metrics, Shaping, SwashCache, Weight,
    Wrap,
};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Transparent border kept around rendered glyphs so blurred shadows are not clipped.
pub const LAYER_MARGIN: u32 = 8;

const LINE_HEIGHT_RATIO: f32 = 1.2;

/// A rendered text layer plus the size of the text box inside its margin.
#[derive(Debug, Clone)]
pub struct TextLayer {
    pub pixels: RgbaImage,
    pub box_width: u32,
    pub box_height: u32,
}

/// Shapes and rasterizes single-line watermark text.
pub struct TextRenderer {
    font_system: Mutex<FontSystem>,
    swash_cache: Mutex<SwashCache>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer").finish_non_exhaustive()
    }
}

impl TextRenderer {
    /// Renderer backed by the system font database.
    pub fn new() -> Self {
        Self::from_font_system(FontSystem::new())
    }

    /// Renderer with extra font files loaded on top of the system fonts.
    pub fn with_font_data(fonts: Vec<Vec<u8>>) -> Self {
        let mut font_system = FontSystem::new();
        for data in fonts {
            font_system.db_mut().load_font_data(data);
        }
        Self::from_font_system(font_system)
    }

    fn from_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system: Mutex::new(font_system),
            swash_cache: Mutex::new(SwashCache::new()),
        }
    }

    /// Render bold `text` in the first family of a CSS font list.
    ///
    /// Returns `None` when nothing visible would be drawn.
    pub fn render(
        &self,
        text: &str,
        font_css: Option<&str>,
        font_size: f32,
        color: Rgba<u8>,
    ) -> MediaResult<Option<TextLayer>> {
        if text.trim().is_empty() || font_size <= 0.0 {
            return Ok(None);
        }

        let mut font_system = self
            .font_system
            .lock()
            .map_err(|_| MediaError::render_context("font system lock poisoned"))?;
        let mut swash_cache = self
            .swash_cache
            .lock()
            .map_err(|_| MediaError::render_context("glyph cache lock poisoned"))?;

        let family_name = primary_family(font_css.unwrap_or_default());
        let family = to_family(&family_name);

        let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT_RATIO);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        buffer.set_size(&mut font_system, None, None);
        buffer.set_wrap(&mut font_system, Wrap::None);

        let attrs = Attrs::new().family(family).weight(Weight::BOLD);
        buffer.set_text(&mut font_system, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut font_system, false);

        let (width, height) = buffer
            .layout_runs()
            .fold((0.0f32, 0.0f32), |(w, h), run| {
                (w.max(run.line_w), h.max(run.line_top + run.line_height))
            });

        if width <= 0.0 || height <= 0.0 {
            debug!(text_len = text.len(), "Text shaped to an empty box");
            return Ok(None);
        }

        let box_width = width.ceil() as u32;
        let box_height = height.ceil() as u32;
        let mut pixels = RgbaImage::new(box_width + 2 * LAYER_MARGIN, box_height + 2 * LAYER_MARGIN);
        let (layer_w, layer_h) = pixels.dimensions();
        let origin = LAYER_MARGIN as i32;

        let base = CosmicColor::rgba(color[0], color[1], color[2], color[3]);
        buffer.draw(&mut font_system, &mut swash_cache, base, |x, y, w, h, c| {
            if c.a() == 0 {
                return;
            }
            for dy in 0..h as i32 {
                for dx in 0..w as i32 {
                    let px = origin + x + dx;
                    let py = origin + y + dy;
                    if px < 0 || py < 0 || px as u32 >= layer_w || py as u32 >= layer_h {
                        continue;
                    }
                    let existing = pixels.get_pixel_mut(px as u32, py as u32);
                    if c.a() > existing[3] {
                        *existing = Rgba([c.r(), c.g(), c.b(), c.a()]);
                    }
                }
            }
        });

        Ok(Some(TextLayer {
            pixels,
            box_width,
            box_height,
        }))
    }
}

/// First family name in a CSS `font-family` list, without quotes.
pub fn primary_family(font_css: &str) -> String {
    font_css
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .find(|f| !f.is_empty())
        .unwrap_or("serif")
        .to_string()
}

fn to_family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans-serif" => Family::SansSerif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}
