//! Extraction pipeline: sample, count, optionally reduce, then sort.

use std::str::FromStr;

use palette::Srgb;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::{brightness, hsl_string, rgb_string, rgb_to_hex, rgb_to_hsl};
use crate::error::{PaletteError, Result};
use crate::frequency::{self, WeightedColor};
use crate::{kmeans, median_cut, sampler};

/// How the palette is derived from the color histogram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Most frequent exact colors.
    #[default]
    Dominant,
    /// k-means cluster centers.
    Palette,
    /// Median-cut bucket averages.
    Quantize,
}

/// Optional reordering applied to the final palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    None,
    /// Brightest first.
    Brightness,
    /// Most saturated first.
    Saturation,
}

/// What `percentage` means for colors produced by clustering or quantization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PercentageMode {
    /// Reduced colors report 0%.
    #[default]
    Zeroed,
    /// Reduced colors report the summed share of the colors they absorbed.
    Membership,
}

impl PercentageMode {
    fn apply(self, membership: f64) -> f64 {
        match self {
            PercentageMode::Zeroed => 0.0,
            PercentageMode::Membership => membership,
        }
    }
}

macro_rules! parse_lowercase {
    ($ty:ty, $name:literal, { $($text:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = PaletteError;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    other => Err(PaletteError::parameter(
                        $name,
                        format!("unknown value `{other}`"),
                    )),
                }
            }
        }
    };
}

parse_lowercase!(ExtractionMode, "mode", {
    "dominant" => ExtractionMode::Dominant,
    "palette" => ExtractionMode::Palette,
    "quantize" => ExtractionMode::Quantize,
});

parse_lowercase!(SortMode, "sort", {
    "none" => SortMode::None,
    "brightness" => SortMode::Brightness,
    "saturation" => SortMode::Saturation,
});

parse_lowercase!(PercentageMode, "percentages", {
    "zeroed" => PercentageMode::Zeroed,
    "membership" => PercentageMode::Membership,
});

/// Settings for one extraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub mode: ExtractionMode,
    /// Upper bound on the number of colors returned.
    pub color_count: usize,
    /// Share of pixels visited, in percent (1..=100).
    pub quality: u8,
    pub sort: SortMode,
    pub percentages: PercentageMode,
    /// Fixed k-means seed; `None` draws one from the platform entropy source.
    pub seed: Option<u64>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Dominant,
            color_count: 6,
            quality: 10,
            sort: SortMode::None,
            percentages: PercentageMode::Zeroed,
            seed: None,
        }
    }
}

impl ExtractOptions {
    pub fn with_mode(mut self, mode: ExtractionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_color_count(mut self, color_count: usize) -> Self {
        self.color_count = color_count;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_percentages(mut self, percentages: PercentageMode) -> Self {
        self.percentages = percentages;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Like [`with_seed`](Self::with_seed), but `None` restores entropy seeding.
    pub fn with_seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.color_count < 1 {
            return Err(PaletteError::parameter("color_count", "must be at least 1"));
        }
        sampler::sample_rate(self.quality)?;
        Ok(())
    }

    fn rng(&self) -> Result<StdRng> {
        let seed = match self.seed {
            Some(seed) => seed,
            None => getrandom::u64().map_err(|e| PaletteError::Entropy(e.to_string()))?,
        };
        Ok(StdRng::seed_from_u64(seed))
    }
}

/// One palette entry as handed to the UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorInfo {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub percentage: f64,
}

impl ColorInfo {
    pub fn new(rgb: Srgb<u8>, percentage: f64) -> Self {
        Self {
            hex: rgb_to_hex(rgb),
            rgb: rgb_string(rgb),
            hsl: hsl_string(rgb_to_hsl(rgb)),
            percentage,
        }
    }
}

/// Extract a palette from a raw RGBA buffer of `width * height` pixels.
///
/// Dominant mode on an image with no opaque pixels yields an empty palette;
/// the reducing modes report [`PaletteError::InsufficientData`] instead.
pub fn extract(
    buffer: &[u8],
    width: u32,
    height: u32,
    options: &ExtractOptions,
) -> Result<Vec<ColorInfo>> {
    options.validate()?;
    let (counts, visited) = histogram(buffer, width, height, options.quality)?;
    let distinct = counts.len();
    let weighted = frequency::to_percentages(counts, visited);
    debug!(
        mode = ?options.mode,
        width,
        height,
        visited,
        distinct,
        "color histogram built"
    );

    let mut entries: Vec<(Srgb<u8>, f64)> = match options.mode {
        ExtractionMode::Dominant => weighted
            .iter()
            .take(options.color_count)
            .map(|c| (c.rgb, c.weight))
            .collect(),
        ExtractionMode::Palette => {
            let mut rng = options.rng()?;
            let clustering = kmeans::cluster_weighted(&weighted, options.color_count, &mut rng)?;
            clustering
                .centroids
                .into_iter()
                .zip(clustering.memberships)
                .map(|(rgb, share)| (rgb, options.percentages.apply(share)))
                .collect()
        }
        ExtractionMode::Quantize => {
            median_cut::quantize_weighted(&weighted, options.color_count)?
                .into_iter()
                .map(|q| (q.rgb, options.percentages.apply(q.weight)))
                .collect()
        }
    };

    sort_entries(&mut entries, options.sort);
    Ok(entries
        .into_iter()
        .map(|(rgb, percentage)| ColorInfo::new(rgb, percentage))
        .collect())
}

fn histogram(
    buffer: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<(Vec<WeightedColor>, usize)> {
    let samples = sampler::sample(buffer, width, height, quality)?;
    let visited = samples.visit_count();
    #[cfg(feature = "parallel")]
    let counts = frequency::aggregate_parallel(buffer, samples.sample_rate());
    #[cfg(not(feature = "parallel"))]
    let counts = frequency::aggregate(samples);
    Ok((counts, visited))
}

fn sort_entries(entries: &mut [(Srgb<u8>, f64)], sort: SortMode) {
    match sort {
        SortMode::None => {}
        SortMode::Brightness => {
            entries.sort_by(|a, b| brightness(b.0).total_cmp(&brightness(a.0)));
        }
        SortMode::Saturation => {
            entries.sort_by(|a, b| {
                rgb_to_hsl(b.0)
                    .saturation
                    .total_cmp(&rgb_to_hsl(a.0).saturation)
            });
        }
    }
}
