//! Color histograms over the sampled pixel stream.

use std::collections::HashMap;

use palette::Srgb;

use crate::convert::{pack, rgb_to_hex};
use crate::sampler::Pixel;

/// A color together with either its raw occurrence count or its share of the
/// sampled pixels in percent, depending on the pipeline stage.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedColor {
    pub rgb: Srgb<u8>,
    pub hex: String,
    pub weight: f64,
}

impl WeightedColor {
    pub fn new(rgb: Srgb<u8>, weight: f64) -> Self {
        Self {
            rgb,
            hex: rgb_to_hex(rgb),
            weight,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Tally {
    rgb: Srgb<u8>,
    count: u64,
    first_seen: usize,
}

#[cfg(feature = "parallel")]
impl Tally {
    fn merge(&mut self, other: Tally) {
        self.count += other.count;
        self.first_seen = self.first_seen.min(other.first_seen);
    }
}

/// Count occurrences of each distinct color, most frequent first.
///
/// Colors with equal counts keep the order in which they were first seen.
pub fn aggregate<I>(samples: I) -> Vec<WeightedColor>
where
    I: IntoIterator<Item = Pixel>,
{
    let mut tallies: HashMap<u32, Tally> = HashMap::new();
    for (position, pixel) in samples.into_iter().enumerate() {
        let rgb = pixel.color;
        tallies
            .entry(pack(rgb))
            .and_modify(|t| t.count += 1)
            .or_insert(Tally {
                rgb,
                count: 1,
                first_seen: position,
            });
    }
    into_sorted(tallies)
}

/// Parallel counterpart of [`aggregate`] working straight off the raw buffer.
///
/// Produces the same list in the same order as the sequential walk. The
/// buffer must already be validated and `rate` must be at least one.
#[cfg(feature = "parallel")]
pub fn aggregate_parallel(buffer: &[u8], rate: usize) -> Vec<WeightedColor> {
    use rayon::prelude::*;

    use crate::sampler::OPAQUE_THRESHOLD;

    let visits = (buffer.len() / 4).div_ceil(rate);
    let tallies = (0..visits)
        .into_par_iter()
        .map(|visit| visit * rate)
        .filter(|&index| buffer[index * 4 + 3] >= OPAQUE_THRESHOLD)
        .fold(HashMap::new, |mut acc: HashMap<u32, Tally>, index| {
            let px = &buffer[index * 4..index * 4 + 3];
            let rgb = Srgb::new(px[0], px[1], px[2]);
            acc.entry(pack(rgb))
                .and_modify(|t| t.count += 1)
                .or_insert(Tally {
                    rgb,
                    count: 1,
                    first_seen: index,
                });
            acc
        })
        .reduce(HashMap::new, |mut left, right| {
            for (key, tally) in right {
                left.entry(key)
                    .and_modify(|t| t.merge(tally))
                    .or_insert(tally);
            }
            left
        });
    into_sorted(tallies)
}

fn into_sorted(tallies: HashMap<u32, Tally>) -> Vec<WeightedColor> {
    let mut tallies: Vec<Tally> = tallies.into_values().collect();
    tallies.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));
    tallies
        .into_iter()
        .map(|t| WeightedColor::new(t.rgb, t.count as f64))
        .collect()
}

/// Turn raw counts into percentages of `total_sampled` visited pixels.
///
/// `total_sampled` counts every visited pixel, transparent ones included, so
/// the percentages sum to less than 100 when pixels were filtered out.
pub fn to_percentages(colors: Vec<WeightedColor>, total_sampled: usize) -> Vec<WeightedColor> {
    if total_sampled == 0 {
        return Vec::new();
    }
    let total = total_sampled as f64;
    colors
        .into_iter()
        .map(|c| WeightedColor {
            weight: 100.0 * c.weight / total,
            ..c
        })
        .filter(|c| c.weight > 0.0)
        .collect()
}
