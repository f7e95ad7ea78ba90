use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use image_palette_wasm::{
    ColorInfo, ExtractOptions, ExtractionMode, HarmonyKind, PercentageMode, SortMode, export,
    extract_palette_bytes, harmony,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Css,
}

/// Extract color palettes from images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Extraction strategy
    #[arg(short, long, value_enum, default_value_t = ExtractionMode::Dominant)]
    mode: ExtractionMode,

    /// Maximum number of colors in the palette
    #[arg(short = 'k', long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(2..=16))]
    colors: u8,

    /// Percentage of pixels to sample (1-100)
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Reorder the final palette
    #[arg(short, long, value_enum, default_value_t = SortMode::None)]
    sort: SortMode,

    /// Percentages reported for palette and quantize modes
    #[arg(short, long, value_enum, default_value_t = PercentageMode::Zeroed)]
    percentages: PercentageMode,

    /// Fixed seed for palette mode
    #[arg(long)]
    seed: Option<u64>,

    /// Resize so the longest side is this many pixels before sampling
    #[arg(short, long)]
    downscale: Option<u32>,

    /// Also derive companions of the first palette color
    #[arg(long, value_enum)]
    harmony: Option<HarmonyKind>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write one file per input into this directory instead of stdout
    #[arg(short = 'o', long)]
    out_dir: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    input: String,
    palette: &'a [ColorInfo],
    #[serde(skip_serializing_if = "Option::is_none")]
    harmony: Option<&'a [ColorInfo]>,
}

fn render(format: Format, report: &Report<'_>) -> Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(report)? + "\n",
        Format::Css => {
            let mut out = export::to_css(report.palette, "color");
            if let Some(harmony) = report.harmony {
                out.push_str(&export::to_css(harmony, "harmony"));
            }
            out
        }
        Format::Text => {
            let mut out = format!("{}\n{}", report.input, export::to_text(report.palette));
            if let Some(harmony) = report.harmony {
                out.push_str("harmony:\n");
                out.push_str(&export::to_text(harmony));
            }
            out
        }
    })
}

fn extension(format: Format) -> &'static str {
    match format {
        Format::Text => "txt",
        Format::Json => "json",
        Format::Css => "css",
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let options = ExtractOptions::default()
        .with_mode(args.mode)
        .with_color_count(args.colors as usize)
        .with_quality(args.quality)
        .with_sort(args.sort)
        .with_percentages(args.percentages)
        .with_seed_opt(args.seed);

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let palette = extract_palette_bytes(&bytes, &options, args.downscale)
            .with_context(|| format!("extracting palette from {}", input.display()))?;

        let companions = match (args.harmony, palette.first()) {
            (Some(kind), Some(first)) => Some(harmony::derive(&first.hex, kind)?),
            _ => None,
        };

        let report = Report {
            input: input.display().to_string(),
            palette: &palette,
            harmony: companions.as_deref(),
        };
        let rendered = render(args.format, &report)?;

        match &args.out_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let out_path = dir.join(format!("{stem}.{}", extension(args.format)));
                fs::write(&out_path, rendered)?;
                eprintln!("Saved → {}", out_path.display());
            }
            None => print!("{rendered}"),
        }
    }

    Ok(())
}
