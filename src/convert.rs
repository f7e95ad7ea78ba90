//! Conversions between the RGB, hex and HSL representations used across the crate.
//!
//! All channel math lives here. Hex strings are always emitted as lowercase
//! `#rrggbb`; HSL uses a hue in `[0, 360)` and saturation/lightness as
//! percentages in `[0, 100]`.

use palette::{FromColor, Hsl, Srgb};

use crate::error::{PaletteError, Result};

/// An HSL triple with percentage saturation and lightness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HslColor {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl HslColor {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue: normalize_hue(hue),
            saturation,
            lightness,
        }
    }

    /// Rotate the hue by `degrees`, wrapping into `[0, 360)`.
    pub fn rotate(self, degrees: f32) -> Self {
        Self::new(self.hue + degrees, self.saturation, self.lightness)
    }
}

fn normalize_hue(hue: f32) -> f32 {
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

pub fn rgb_to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Parse a 6-digit hex color, with or without a leading `#`.
pub fn hex_to_rgb(hex: &str) -> Result<Srgb<u8>> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PaletteError::InvalidHex(hex.to_string()));
    }
    let channel = |start: usize| {
        u8::from_str_radix(&digits[start..start + 2], 16)
            .map_err(|_| PaletteError::InvalidHex(hex.to_string()))
    };
    Ok(Srgb::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn rgb_to_hsl(rgb: Srgb<u8>) -> HslColor {
    let hsl: Hsl = Hsl::from_color(rgb.into_format::<f32>());
    HslColor::new(
        hsl.hue.into_positive_degrees(),
        hsl.saturation * 100.0,
        hsl.lightness * 100.0,
    )
}

pub fn hsl_to_rgb(color: HslColor) -> Srgb<u8> {
    let hsl = Hsl::new(
        color.hue,
        (color.saturation / 100.0).clamp(0.0, 1.0),
        (color.lightness / 100.0).clamp(0.0, 1.0),
    );
    let rgb: Srgb = Srgb::from_color(hsl);
    rgb.into_format::<u8>()
}

/// `rgb(r, g, b)` as shown to users.
pub fn rgb_string(rgb: Srgb<u8>) -> String {
    format!("rgb({}, {}, {})", rgb.red, rgb.green, rgb.blue)
}

/// `hsl(h, s%, l%)` with every component rounded to an integer.
pub fn hsl_string(color: HslColor) -> String {
    let hue = color.hue.round() as u32 % 360;
    format!(
        "hsl({}, {}%, {}%)",
        hue,
        color.saturation.round() as u32,
        color.lightness.round() as u32
    )
}

/// Perceived brightness (ITU-R BT.601 luma) on the 0–255 scale.
pub fn brightness(rgb: Srgb<u8>) -> f64 {
    0.299 * rgb.red as f64 + 0.587 * rgb.green as f64 + 0.114 * rgb.blue as f64
}

/// Pack a color into a single integer, used as a histogram key.
pub(crate) fn pack(rgb: Srgb<u8>) -> u32 {
    ((rgb.red as u32) << 16) | ((rgb.green as u32) << 8) | rgb.blue as u32
}

/// Build an 8-bit color from floating point channels, rounding each to the nearest integer.
pub(crate) fn round_rgb(channels: [f64; 3]) -> Srgb<u8> {
    let [r, g, b] = channels.map(|c| c.round().clamp(0.0, 255.0) as u8);
    Srgb::new(r, g, b)
}

pub(crate) fn channels(rgb: Srgb<u8>) -> [f64; 3] {
    [rgb.red as f64, rgb.green as f64, rgb.blue as f64]
}

/// Euclidean distance between a color and a floating point centroid in RGB space.
pub(crate) fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
