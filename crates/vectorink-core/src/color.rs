//! Color attribute normalization.
//!
//! Property editing wants every color as `#rrggbb` hex regardless of how the
//! source document spelled it. Conversion is best-effort: anything that
//! cannot be understood falls back to the default fill color instead of
//! failing the whole property computation.

/// Default fill color used when a value cannot be normalized.
pub const DEFAULT_FILL_COLOR: &str = "#000000";

/// Common named colors appearing in hand-authored SVG files.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("pink", "#ffc0cb"),
    ("brown", "#a52a2a"),
    ("lime", "#00ff00"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("silver", "#c0c0c0"),
    ("maroon", "#800000"),
    ("olive", "#808000"),
];

/// Normalize a color value to hex for editing.
///
/// Hex values pass through unchanged; `rgb()`/`rgba()` notations are
/// converted; a handful of named colors are resolved from a table. `none`,
/// `transparent`, the empty string and anything unparseable all become the
/// default fill color.
pub fn convert_to_hex(color: &str) -> String {
    let color = color.trim();
    if color.is_empty() || color == "none" || color == "transparent" {
        return DEFAULT_FILL_COLOR.to_string();
    }

    if color.starts_with('#') {
        return color.to_string();
    }

    if let Some(rgb) = parse_rgb_notation(color) {
        return format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2);
    }

    let lowered = color.to_ascii_lowercase();
    for (name, hex) in NAMED_COLORS {
        if *name == lowered {
            return (*hex).to_string();
        }
    }

    DEFAULT_FILL_COLOR.to_string()
}

/// Parse `rgb(r, g, b)` or `rgba(r, g, b, a)`; the alpha channel is dropped.
fn parse_rgb_notation(color: &str) -> Option<(u8, u8, u8)> {
    let inner = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let mut channels = inner.split(',').map(str::trim);
    let r: u8 = channels.next()?.parse().ok()?;
    let g: u8 = channels.next()?.parse().ok()?;
    let b: u8 = channels.next()?.parse().ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_passes_through() {
        assert_eq!(convert_to_hex("#ff0000"), "#ff0000");
        assert_eq!(convert_to_hex("#abc"), "#abc");
    }

    #[test]
    fn test_rgb_notation() {
        assert_eq!(convert_to_hex("rgb(255, 0, 0)"), "#ff0000");
        assert_eq!(convert_to_hex("rgb(0,128,255)"), "#0080ff");
    }

    #[test]
    fn test_rgba_drops_alpha() {
        assert_eq!(convert_to_hex("rgba(255, 0, 0, 0.5)"), "#ff0000");
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(convert_to_hex("red"), "#ff0000");
        assert_eq!(convert_to_hex("Navy"), "#000080");
    }

    #[test]
    fn test_none_and_transparent_fall_back() {
        assert_eq!(convert_to_hex("none"), DEFAULT_FILL_COLOR);
        assert_eq!(convert_to_hex("transparent"), DEFAULT_FILL_COLOR);
        assert_eq!(convert_to_hex(""), DEFAULT_FILL_COLOR);
    }

    #[test]
    fn test_unparseable_falls_back() {
        assert_eq!(convert_to_hex("chartreuse-ish"), DEFAULT_FILL_COLOR);
        assert_eq!(convert_to_hex("rgb(300, 0, 0)"), DEFAULT_FILL_COLOR);
    }
}
