//! Color-theory companions of a chosen color, derived by rotating its hue.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::convert::{hex_to_rgb, hsl_to_rgb, rgb_to_hsl};
use crate::error::{PaletteError, Result};
use crate::selector::ColorInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum HarmonyKind {
    /// Opposite hue (+180°).
    Complementary,
    /// The two hues a third of the wheel away (+120°, +240°).
    Triadic,
    /// Neighbouring hues (-30°, +30°).
    Analogous,
}

impl HarmonyKind {
    pub fn rotations(self) -> &'static [f32] {
        match self {
            HarmonyKind::Complementary => &[180.0],
            HarmonyKind::Triadic => &[120.0, 240.0],
            HarmonyKind::Analogous => &[-30.0, 30.0],
        }
    }
}

impl FromStr for HarmonyKind {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "complementary" => Ok(HarmonyKind::Complementary),
            "triadic" => Ok(HarmonyKind::Triadic),
            "analogous" => Ok(HarmonyKind::Analogous),
            other => Err(PaletteError::parameter(
                "harmony",
                format!("unknown harmony `{other}`"),
            )),
        }
    }
}

/// Colors related to `hex` by `kind`, in rotation order.
///
/// Saturation and lightness are preserved; only the hue moves.
pub fn derive(hex: &str, kind: HarmonyKind) -> Result<Vec<ColorInfo>> {
    let base = rgb_to_hsl(hex_to_rgb(hex)?);
    Ok(kind
        .rotations()
        .iter()
        .map(|&degrees| ColorInfo::new(hsl_to_rgb(base.rotate(degrees)), 0.0))
        .collect())
}
