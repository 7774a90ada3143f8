//! Test fixtures and data factories
//!
//! Images are generated and encoded on the fly; nothing is read from the
//! repository.

use std::io::{Cursor, Write};

use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use photo_studio::core::assets::{AssetSlot, ImageAsset, StudioAssets};
use tempfile::NamedTempFile;

/// Horizontal gradient so crops and resizes produce distinct pixels
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("fixture encodes");
    buffer
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Jpeg)
}

/// Lossless WebP with an alpha channel
pub fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 180]));
    encode(&DynamicImage::ImageRgba8(img), ImageFormat::WebP)
}

pub fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&DynamicImage::ImageRgba8(gradient(width, height).to_rgba8()), ImageFormat::Gif)
}

pub fn png_asset(width: u32, height: u32) -> ImageAsset {
    ImageAsset::from_bytes(png_bytes(width, height))
}

pub fn jpeg_asset(width: u32, height: u32) -> ImageAsset {
    ImageAsset::from_bytes(jpeg_bytes(width, height))
}

/// Write `bytes` into a temporary file with `suffix`; keep the handle alive
/// for as long as the file is needed
pub fn temp_image(bytes: &[u8], suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(bytes).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

/// Person and object photos, plus a style reference when asked
pub fn studio_assets(with_style: bool) -> StudioAssets {
    let mut assets = StudioAssets::new();
    assets.set(AssetSlot::Person, Some(jpeg_asset(480, 640)));
    assets.set(AssetSlot::Object, Some(png_asset(300, 300)));
    if with_style {
        assets.set(AssetSlot::StyleReference, Some(png_asset(800, 450)));
    }
    assets
}

/// Small PNG as base64, the way the API returns images
pub fn generated_png_base64() -> String {
    base64::engine::general_purpose::STANDARD.encode(png_bytes(16, 16))
}
