//! Strided walk over a raw RGBA buffer.

use std::iter::StepBy;
use std::slice::ChunksExact;

use palette::Srgba;

use crate::error::{PaletteError, Result};

/// One RGBA pixel straight from the buffer.
pub type Pixel = Srgba<u8>;

/// Pixels with alpha below this are skipped entirely.
pub const OPAQUE_THRESHOLD: u8 = 128;

/// Number of pixels to advance between visits for a given quality percentage.
pub fn sample_rate(quality: u8) -> Result<usize> {
    if !(1..=100).contains(&quality) {
        return Err(PaletteError::parameter(
            "quality",
            format!("{quality} is outside 1..=100"),
        ));
    }
    Ok((100 / quality as usize).max(1))
}

/// Check that `buffer` holds exactly `width * height` RGBA pixels.
pub fn validate_buffer(buffer: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(PaletteError::InvalidInput {
            expected: usize::MAX,
            actual: buffer.len(),
        })?;
    if buffer.len() != expected {
        return Err(PaletteError::InvalidInput {
            expected,
            actual: buffer.len(),
        });
    }
    Ok(())
}

/// Lazily walk every `sample_rate`-th pixel in raster order, yielding the opaque ones.
pub fn sample(buffer: &[u8], width: u32, height: u32, quality: u8) -> Result<Samples<'_>> {
    validate_buffer(buffer, width, height)?;
    let rate = sample_rate(quality)?;
    Ok(Samples {
        pixels: buffer.chunks_exact(4).step_by(rate),
        rate,
        pixel_count: buffer.len() / 4,
    })
}

/// Single forward pass over the sampled pixels of one buffer.
pub struct Samples<'a> {
    pixels: StepBy<ChunksExact<'a, u8>>,
    rate: usize,
    pixel_count: usize,
}

impl Samples<'_> {
    pub fn sample_rate(&self) -> usize {
        self.rate
    }

    /// Total pixels the walk touches, transparent ones included.
    pub fn visit_count(&self) -> usize {
        self.pixel_count.div_ceil(self.rate)
    }
}

impl Iterator for Samples<'_> {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        self.pixels
            .by_ref()
            .find(|px| px[3] >= OPAQUE_THRESHOLD)
            .map(|px| Srgba::new(px[0], px[1], px[2], px[3]))
    }
}
