#![cfg(feature = "native-bin")]

use std::process::Command;

use image::{ImageFormat, Rgba, RgbaImage};

fn palette_cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_palette-cli"))
}

fn write_png(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("image_palette_cli_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let img = RgbaImage::from_fn(4, 4, |x, _| {
        if x < 2 {
            Rgba([255, 0, 0, 255])
        } else if x == 2 {
            Rgba([0, 255, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

#[test]
fn test_help_exits_zero() {
    let output = palette_cli().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Extract color palettes"));
}

#[test]
fn test_json_output() {
    let path = write_png("json.png");
    let output = palette_cli()
        .args(["--quality", "100", "--colors", "3", "--format", "json"])
        .arg(&path)
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let palette = report["palette"].as_array().unwrap();
    assert_eq!(palette.len(), 3);
    assert_eq!(palette[0]["hex"], "#ff0000");
    assert_eq!(palette[0]["percentage"], 50.0);
}

#[test]
fn test_harmony_in_css_output() {
    let path = write_png("css.png");
    let output = palette_cli()
        .args(["-q", "100", "-k", "2", "-f", "css", "--harmony", "complementary"])
        .arg(&path)
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--color-1: #ff0000;"));
    assert!(stdout.contains("--color-2: #00ff00;"));
    assert!(stdout.contains("--harmony-1: #00ffff;"));
    for name in ["--color-1:", "--color-2:", "--harmony-1:"] {
        assert_eq!(stdout.matches(name).count(), 1, "{name} defined more than once");
    }
}

#[test]
fn test_rejects_out_of_range_colors() {
    let path = write_png("range.png");
    let output = palette_cli()
        .args(["--colors", "40"])
        .arg(&path)
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
}

#[test]
fn test_missing_file_fails_gracefully() {
    let output = palette_cli()
        .arg("/tmp/image_palette_nonexistent_12345.png")
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked"));
}
