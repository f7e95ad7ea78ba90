//! Median-cut quantization over weighted RGB colors.

use palette::Srgb;
use tracing::debug;

use crate::convert::{channels, rgb_to_hex, round_rgb};
use crate::error::{PaletteError, Result};
use crate::frequency::WeightedColor;

/// A set of colors produced by successive splits.
#[derive(Clone, Debug)]
struct Bucket {
    colors: Vec<WeightedColor>,
}

impl Bucket {
    /// Max minus min of each RGB channel.
    fn ranges(&self) -> [u8; 3] {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for color in &self.colors {
            let rgb = [color.rgb.red, color.rgb.green, color.rgb.blue];
            for channel in 0..3 {
                min[channel] = min[channel].min(rgb[channel]);
                max[channel] = max[channel].max(rgb[channel]);
            }
        }
        std::array::from_fn(|c| max[c].saturating_sub(min[c]))
    }

    fn range(&self) -> u8 {
        self.ranges().into_iter().max().unwrap_or(0)
    }

    /// Channel with the widest spread; ties go to red, then green.
    fn widest_channel(&self) -> usize {
        let ranges = self.ranges();
        let mut widest = 0;
        for channel in 1..3 {
            if ranges[channel] > ranges[widest] {
                widest = channel;
            }
        }
        widest
    }

    fn total_weight(&self) -> f64 {
        self.colors.iter().map(|c| c.weight).sum()
    }

    /// Split at the weighted median along the widest channel.
    fn split(mut self) -> (Bucket, Bucket) {
        let channel = self.widest_channel();
        self.colors.sort_by_key(|c| match channel {
            0 => c.rgb.red,
            1 => c.rgb.green,
            _ => c.rgb.blue,
        });

        let half = self.total_weight() / 2.0;
        let mut accumulated = 0.0;
        let mut cut = self.colors.len();
        for (index, color) in self.colors.iter().enumerate() {
            accumulated += color.weight;
            if accumulated >= half {
                cut = index + 1;
                break;
            }
        }
        // both halves must keep at least one color
        let cut = cut.clamp(1, self.colors.len() - 1);

        let upper = self.colors.split_off(cut);
        (Bucket { colors: self.colors }, Bucket { colors: upper })
    }

    fn average(&self) -> Srgb<u8> {
        let total = self.total_weight();
        if self.colors.is_empty() || total <= 0.0 {
            return Srgb::new(0, 0, 0);
        }
        let mut sum = [0.0f64; 3];
        for color in &self.colors {
            for (acc, value) in sum.iter_mut().zip(channels(color.rgb)) {
                *acc += value * color.weight;
            }
        }
        round_rgb(sum.map(|s| s / total))
    }
}

/// A quantized color and the input weight its bucket absorbed.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantizedColor {
    pub rgb: Srgb<u8>,
    pub weight: f64,
}

/// Reduce `colors` to at most `k` hex colors.
pub fn quantize(colors: &[WeightedColor], k: usize) -> Result<Vec<String>> {
    Ok(quantize_weighted(colors, k)?
        .into_iter()
        .map(|q| rgb_to_hex(q.rgb))
        .collect())
}

/// Reduce `colors` to at most `k` buckets, keeping each bucket's total weight.
///
/// Inputs that already fit in `k` colors come back unchanged and in order.
/// Splitting stops early when every bucket is a single color, so fewer than
/// `k` results are possible.
pub fn quantize_weighted(colors: &[WeightedColor], k: usize) -> Result<Vec<QuantizedColor>> {
    if k == 0 {
        return Err(PaletteError::parameter("color_count", "median cut needs k >= 1"));
    }
    if colors.is_empty() {
        return Err(PaletteError::InsufficientData {
            stage: "median-cut quantization",
        });
    }
    if colors.len() <= k {
        return Ok(colors
            .iter()
            .map(|c| QuantizedColor {
                rgb: c.rgb,
                weight: c.weight,
            })
            .collect());
    }

    let mut buckets = vec![Bucket {
        colors: colors.to_vec(),
    }];
    while buckets.len() < k {
        let mut target = 0;
        let mut widest = 0;
        for (index, bucket) in buckets.iter().enumerate() {
            let range = bucket.range();
            if range > widest {
                widest = range;
                target = index;
            }
        }
        if widest == 0 {
            break;
        }
        let (lower, upper) = buckets.remove(target).split();
        buckets.insert(target, upper);
        buckets.insert(target, lower);
    }

    debug!(k, colors = colors.len(), buckets = buckets.len(), "median cut finished");
    Ok(buckets
        .iter()
        .map(|b| QuantizedColor {
            rgb: b.average(),
            weight: b.total_weight(),
        })
        .collect())
}
