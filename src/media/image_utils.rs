// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding fetched media bytes into a canonical RGB image

use image::{ImageFormat, RgbImage};
use thiserror::Error;

/// Maximum media size (10MB)
pub const MAX_MEDIA_SIZE: usize = 10 * 1024 * 1024;

/// Custom error types for media decoding
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Media is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Media body is empty")]
    EmptyData,
}

/// Image information extracted during decoding
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Decode raw media bytes into an RGB image
///
/// The result is always 8-bit RGB regardless of the source encoding;
/// palette, grayscale and alpha variants are converted.
pub fn decode_rgb_image(bytes: &[u8]) -> Result<(RgbImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > MAX_MEDIA_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_MEDIA_SIZE));
    }

    // Detect format from magic bytes
    let format = detect_format(bytes)?;

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: decoded.width(),
        height: decoded.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((decoded.to_rgb8(), info))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}
