//! Conversion API Module
//!
//! Single-file PNG/JPEG → WebP conversion. Decoding goes through `image`,
//! lossy encoding through libwebp (`webp` crate) so quality and effort can be
//! controlled.

use image::{DynamicImage, ImageReader};
use shared_utils::{ConversionResult, ConvertError};
use std::fs;
use std::path::Path;

/// Canonical extension of every output file.
pub const WEBP_EXTENSION: &str = "webp";

pub const DEFAULT_QUALITY: u8 = 85;
/// libwebp `method`: 0 = fastest, 6 = slowest with the best compression.
pub const MAX_METHOD: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Lossy quality, 0..=100.
    pub quality: u8,
    /// Compression effort, 0..=6.
    pub method: u8,
    /// Re-encode even when the WebP is newer than its source.
    pub force: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            method: MAX_METHOD,
            force: false,
        }
    }
}

impl ConvertOptions {
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.min(100);
        self
    }

    pub fn with_method(mut self, method: u8) -> Self {
        self.method = method.min(MAX_METHOD);
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Decodes by content sniffing, so a mislabelled `.png` that is really a JPEG
/// still converts.
pub fn decode_image(path: &Path) -> Result<DynamicImage, ConvertError> {
    let reader = ImageReader::open(path)
        .map_err(|e| ConvertError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| ConvertError::io(path, e))?;
    Ok(reader.decode()?)
}

/// Encodes to lossy WebP. Images with an alpha channel keep it; everything
/// else is normalized to 8-bit RGB first.
pub fn encode_webp(img: &DynamicImage, options: &ConvertOptions) -> Result<Vec<u8>, ConvertError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| ConvertError::Encode("libwebp rejected the default config".to_string()))?;
    config.lossless = 0;
    config.quality = f32::from(options.quality.min(100));
    config.method = i32::from(options.method.min(MAX_METHOD));

    let (width, height) = (img.width(), img.height());
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_advanced(&config)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_advanced(&config)
    }
    .map_err(|e| ConvertError::Encode(format!("{:?}", e)))?;

    Ok(encoded.to_vec())
}

fn try_convert(source: &Path, destination: &Path, options: &ConvertOptions) -> Result<(u64, u64), ConvertError> {
    let input_size = fs::metadata(source)
        .map_err(|e| ConvertError::io(source, e))?
        .len();

    let img = decode_image(source)?;
    tracing::debug!(
        path = %source.display(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Decoded source image"
    );

    let bytes = encode_webp(&img, options)?;
    fs::write(destination, &bytes).map_err(|e| ConvertError::io(destination, e))?;

    let output_size = fs::metadata(destination)
        .map_err(|e| ConvertError::io(destination, e))?
        .len();

    Ok((input_size, output_size))
}

/// Converts one file. Never fails: errors come back as a `Failed` result so
/// the caller can report them and move on.
pub fn convert_one(source: &Path, destination: &Path, options: &ConvertOptions) -> ConversionResult {
    match try_convert(source, destination, options) {
        Ok((input_size, output_size)) => {
            tracing::info!(
                input = %source.display(),
                output = %destination.display(),
                input_size,
                output_size,
                quality = options.quality,
                "Converted to WebP"
            );
            ConversionResult::converted(source, destination, input_size, output_size)
        }
        Err(e) => {
            tracing::warn!(
                path = %source.display(),
                error = %e,
                category = %e.category(),
                "Conversion failed"
            );
            ConversionResult::failed(source, destination, e)
        }
    }
}
