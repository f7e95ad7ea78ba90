//! Encoded image bytes to RGBA pixels, for callers without a canvas.

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use tracing::debug;

use crate::error::Result;
use crate::selector::{ColorInfo, ExtractOptions, extract};

/// Decoded RGBA pixels with their dimensions.
pub struct RgbaPixels {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode an encoded image (PNG, JPEG, ...) into raw RGBA bytes.
///
/// With `downscale`, the image is first resized (nearest neighbour, aspect
/// preserved) so that its longest side equals that many pixels.
pub fn decode_rgba(input: &[u8], downscale: Option<u32>) -> Result<RgbaPixels> {
    let img = image::load_from_memory(input)?;

    let working_img: DynamicImage = match downscale {
        Some(scale) if scale > 0 => {
            let (orig_w, orig_h) = img.dimensions();
            let max_side = orig_w.max(orig_h) as f32;
            let ratio = scale as f32 / max_side;
            let w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
            let h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
            debug!(orig_w, orig_h, w, h, "downscaling before extraction");
            DynamicImage::ImageRgba8(image::imageops::resize(&img, w, h, FilterType::Nearest))
        }
        _ => img,
    };

    let (width, height) = working_img.dimensions();
    Ok(RgbaPixels {
        data: working_img.to_rgba8().into_raw(),
        width,
        height,
    })
}

/// Decode `input` and run the extraction pipeline on its pixels.
pub fn extract_palette_bytes(
    input: &[u8],
    options: &ExtractOptions,
    downscale: Option<u32>,
) -> Result<Vec<ColorInfo>> {
    let pixels = decode_rgba(input, downscale)?;
    extract(&pixels.data, pixels.width, pixels.height, options)
}
