//! Image normalization
//!
//! Brings a source photo to the requested aspect ratio before it is sent:
//! the largest centered region with the target ratio is cropped out, scaled
//! so the longer side is [`MAX_DIMENSION`] pixels, and re-encoded in the
//! source's format.
//!
//! The pipeline is one async function with four awaited stages (read,
//! decode, render, encode); each stage reports its own error variant.

use std::fmt;
use std::io::Cursor;

use base64::Engine;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::assets::{AssetSource, ImageAsset};
use crate::utils::error::{Result, StudioError};
use crate::utils::format_bytes;

/// Longer side of every normalized image, in pixels
pub const MAX_DIMENSION: u32 = 1024;

/// Encoding quality on a 0-1 scale
pub const ENCODING_QUALITY: f32 = 0.95;

/// Target aspect ratio, `width:height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    width: f64,
    height: f64,
}

impl AspectRatio {
    /// Parse `"W:H"`. Both parts must be finite numbers greater than zero.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || StudioError::InvalidAspectRatio(input.to_string());

        let (width, height) = input.split_once(':').ok_or_else(invalid)?;
        let width: f64 = width.trim().parse().map_err(|_| invalid())?;
        let height: f64 = height.trim().parse().map_err(|_| invalid())?;

        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(invalid());
        }

        Ok(Self { width, height })
    }

    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = StudioError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Source region to sample, in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Output canvas size for `target_ratio`, longer side [`MAX_DIMENSION`]
pub fn output_dimensions(target_ratio: f64) -> (u32, u32) {
    let max = f64::from(MAX_DIMENSION);
    if target_ratio >= 1.0 {
        (MAX_DIMENSION, (max / target_ratio).round() as u32)
    } else {
        ((max * target_ratio).round() as u32, MAX_DIMENSION)
    }
}

/// Largest centered region of a `width`x`height` source with `target_ratio`.
///
/// Relatively wider sources keep their full height; taller or equal ones
/// keep their full width.
pub fn crop_rect(width: u32, height: u32, target_ratio: f64) -> CropRect {
    let width = f64::from(width);
    let height = f64::from(height);
    let original_ratio = width / height;

    if original_ratio > target_ratio {
        let crop_width = height * target_ratio;
        CropRect {
            x: (width - crop_width) / 2.0,
            y: 0.0,
            width: crop_width,
            height,
        }
    } else {
        let crop_height = width / target_ratio;
        CropRect {
            x: 0.0,
            y: (height - crop_height) / 2.0,
            width,
            height: crop_height,
        }
    }
}

/// Encoded payload ready to be sent as inline data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedImage {
    /// Base64 of the encoded bytes
    pub data: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl NormalizedImage {
    pub fn decoded_bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| StudioError::Internal(format!("Invalid base64 payload: {}", e)))
    }
}

/// Crop, resize and re-encode `asset` to `aspect_ratio`
pub async fn normalize_image(asset: &ImageAsset, aspect_ratio: &str) -> Result<NormalizedImage> {
    let target = AspectRatio::parse(aspect_ratio)?;
    let output_format = output_format_for(asset.mime_type());

    let bytes = read_source(asset).await?;
    debug!(
        "Read {} ({})",
        asset.describe(),
        format_bytes(bytes.len() as u64)
    );

    let source = run_blocking("decode", move || decode(bytes)).await??;
    let (source_width, source_height) = source.dimensions();
    debug!("Decoded {}x{} source", source_width, source_height);

    let rendered = run_blocking("render", move || render(&source, target.ratio())).await??;
    let (width, height) = rendered.dimensions();

    let encoded = run_blocking("encode", move || encode(&rendered, output_format)).await??;
    debug!(
        "Normalized to {}x{} {} ({})",
        width,
        height,
        output_format.to_mime_type(),
        format_bytes(encoded.len() as u64)
    );

    Ok(NormalizedImage {
        data: base64::engine::general_purpose::STANDARD.encode(&encoded),
        mime_type: output_format.to_mime_type().to_string(),
        width,
        height,
    })
}

async fn read_source(asset: &ImageAsset) -> Result<Bytes> {
    match asset.source() {
        AssetSource::Memory(bytes) => Ok(bytes.clone()),
        AssetSource::File(path) => tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|source| StudioError::Read {
                path: path.clone(),
                source,
            }),
    }
}

async fn run_blocking<T, F>(stage: &'static str, work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| StudioError::Internal(format!("{} stage did not complete: {}", stage, e)))
}

/// Encoding used for the output: the source's own format when it is one the
/// picker accepts, PNG otherwise.
pub fn output_format_for(mime_type: &str) -> ImageFormat {
    match ImageFormat::from_mime_type(mime_type) {
        Some(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP)) => format,
        _ => ImageFormat::Png,
    }
}

/// Decode and apply the EXIF orientation, so the pixels are upright as a
/// viewer would show them.
fn decode(bytes: Bytes) -> Result<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| StudioError::Decode(image::ImageError::IoError(e)))?
        .into_decoder()
        .map_err(StudioError::Decode)?;
    let orientation = decoder.orientation().map_err(StudioError::Decode)?;

    let mut image = DynamicImage::from_decoder(decoder).map_err(StudioError::Decode)?;
    image.apply_orientation(orientation);
    Ok(image)
}

fn render(source: &DynamicImage, target_ratio: f64) -> Result<DynamicImage> {
    let (source_width, source_height) = source.dimensions();
    let (out_width, out_height) = output_dimensions(target_ratio);

    if source_width == 0 || source_height == 0 || out_width == 0 || out_height == 0 {
        return Err(StudioError::Surface {
            width: out_width,
            height: out_height,
        });
    }

    let rect = crop_rect(source_width, source_height, target_ratio);
    let x = (rect.x.round() as u32).min(source_width - 1);
    let y = (rect.y.round() as u32).min(source_height - 1);
    let width = (rect.width.round() as u32).clamp(1, source_width - x);
    let height = (rect.height.round() as u32).clamp(1, source_height - y);

    Ok(source
        .crop_imm(x, y, width, height)
        .resize_exact(out_width, out_height, FilterType::Lanczos3))
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let has_alpha = image.color().has_alpha();

    let written = match format {
        ImageFormat::Jpeg => {
            let quality = (ENCODING_QUALITY * 100.0).round() as u8;
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)
        }
        ImageFormat::WebP => {
            let encoder = WebPEncoder::new_lossless(&mut buffer);
            if has_alpha {
                DynamicImage::ImageRgba8(image.to_rgba8()).write_with_encoder(encoder)
            } else {
                DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)
            }
        }
        _ => {
            let encoder = PngEncoder::new(&mut buffer);
            if has_alpha {
                DynamicImage::ImageRgba8(image.to_rgba8()).write_with_encoder(encoder)
            } else {
                DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)
            }
        }
    };

    written.map_err(StudioError::Encode)?;
    Ok(buffer)
}
