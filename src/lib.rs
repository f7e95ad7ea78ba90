use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

pub mod convert;
pub mod decode;
pub mod error;
pub mod export;
pub mod frequency;
pub mod harmony;
pub mod kmeans;
pub mod median_cut;
pub mod sampler;
pub mod selector;

pub use decode::{RgbaPixels, decode_rgba, extract_palette_bytes};
pub use error::PaletteError;
pub use harmony::HarmonyKind;
pub use selector::{ColorInfo, ExtractOptions, ExtractionMode, PercentageMode, SortMode, extract};

fn js_error(err: PaletteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js_array(colors: &[ColorInfo]) -> Result<Array, JsValue> {
    let out = Array::new();
    for color in colors {
        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("hex"), &JsValue::from_str(&color.hex))?;
        Reflect::set(&entry, &JsValue::from_str("rgb"), &JsValue::from_str(&color.rgb))?;
        Reflect::set(&entry, &JsValue::from_str("hsl"), &JsValue::from_str(&color.hsl))?;
        Reflect::set(
            &entry,
            &JsValue::from_str("percentage"),
            &JsValue::from_f64(color.percentage),
        )?;
        out.push(&entry);
    }
    Ok(out)
}

/// Extract a palette from canvas pixel data (`ImageData.data`).
///
/// `mode` is one of `dominant`, `palette` or `quantize`; `sort` one of
/// `none`, `brightness` or `saturation`. With `membership` set, reduced
/// colors report the share of the image they absorbed instead of 0.
/// Passing a `seed` makes palette mode reproducible.
///
/// Returns an array of `{ hex, rgb, hsl, percentage }` objects.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn extract_palette(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    mode: &str,
    color_count: usize,
    quality: u8,
    sort: &str,
    membership: bool,
    seed: Option<u64>,
) -> Result<Array, JsValue> {
    let options = ExtractOptions {
        mode: mode.parse().map_err(js_error)?,
        color_count,
        quality,
        sort: sort.parse().map_err(js_error)?,
        percentages: if membership {
            PercentageMode::Membership
        } else {
            PercentageMode::Zeroed
        },
        seed,
    };
    let colors = extract(&pixels, width, height, &options).map_err(js_error)?;
    to_js_array(&colors)
}

/// Complementary, triadic or analogous companions of a hex color.
#[wasm_bindgen]
pub fn color_harmony(hex: &str, kind: &str) -> Result<Array, JsValue> {
    let kind: HarmonyKind = kind.parse().map_err(js_error)?;
    let colors = harmony::derive(hex, kind).map_err(js_error)?;
    to_js_array(&colors)
}
