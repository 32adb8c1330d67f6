//! CSS-style colour strings used by stored watermark settings.

use image::Rgba;

/// Default text fill: `rgba(255, 255, 255, 0.9)`.
pub const DEFAULT_TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 230]);

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`,
/// `white` or `black`. Returns `None` for anything else.
pub fn parse_css_color(input: &str) -> Option<Rgba<u8>> {
    let s = input.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(body) = s.strip_prefix("rgba(").and_then(|b| b.strip_suffix(')')) {
        return parse_components(body, true);
    }

    if let Some(body) = s.strip_prefix("rgb(").and_then(|b| b.strip_suffix(')')) {
        return parse_components(body, false);
    }

    match s.as_str() {
        "white" => Some(Rgba([255, 255, 255, 255])),
        "black" => Some(Rgba([0, 0, 0, 255])),
        _ => None,
    }
}

/// Parse a colour, falling back to the default near-white fill.
pub fn text_color_or_default(input: Option<&str>) -> Rgba<u8> {
    input.and_then(parse_css_color).unwrap_or(DEFAULT_TEXT_COLOR)
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Rgba([short(0)?, short(1)?, short(2)?, 255])),
        6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => None,
    }
}

fn parse_components(body: &str, with_alpha: bool) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let rgb = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let alpha = if with_alpha {
        let a = parts[3].parse::<f64>().ok()?.clamp(0.0, 1.0);
        (a * 255.0).round() as u8
    } else {
        255
    };

    Some(Rgba([rgb(parts[0])?, rgb(parts[1])?, rgb(parts[2])?, alpha]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_css_color("#fff"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_css_color("#D4AF37"), Some(Rgba([212, 175, 55, 255])));
        assert_eq!(parse_css_color("#00000080"), Some(Rgba([0, 0, 0, 128])));
        assert_eq!(parse_css_color("#12345"), None);
        assert_eq!(parse_css_color("#ggg"), None);
    }

    #[test]
    fn test_functional_forms() {
        assert_eq!(parse_css_color("rgb(10, 20, 30)"), Some(Rgba([10, 20, 30, 255])));
        assert_eq!(
            parse_css_color("rgba(255, 255, 255, 0.9)"),
            Some(DEFAULT_TEXT_COLOR)
        );
        assert_eq!(parse_css_color("rgba(1,2,3)"), None);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(text_color_or_default(None), DEFAULT_TEXT_COLOR);
        assert_eq!(text_color_or_default(Some("chartreuse-ish")), DEFAULT_TEXT_COLOR);
        assert_eq!(text_color_or_default(Some("black")), Rgba([0, 0, 0, 255]));
    }
}
