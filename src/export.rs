//! Plain-text renderings of a palette for copying or saving.

use crate::selector::ColorInfo;

/// One line per color: hex, rgb, hsl and share.
pub fn to_text(colors: &[ColorInfo]) -> String {
    colors
        .iter()
        .map(|c| format!("{}  {}  {}  {:.2}%\n", c.hex, c.rgb, c.hsl, c.percentage))
        .collect()
}

/// A `:root` block of numbered CSS custom properties, `--{prefix}-1` onwards.
pub fn to_css(colors: &[ColorInfo], prefix: &str) -> String {
    let properties: String = colors
        .iter()
        .enumerate()
        .map(|(index, c)| format!("  --{prefix}-{}: {};\n", index + 1, c.hex))
        .collect();
    format!(":root {{\n{properties}}}\n")
}
