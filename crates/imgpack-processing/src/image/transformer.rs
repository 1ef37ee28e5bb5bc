use anyhow::{Context, Result};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use imgpack_core::{OutputFormat, Settings};
use std::io::Cursor;

use super::ImageResize;
use crate::compression::{
    check_dimensions, CompressionOptions, ImageCompressor, MAX_OUTPUT_DIMENSION,
};

/// Image transformation service
pub struct ImageTransformer;

impl ImageTransformer {
    /// Decode an upload, sniffing the container from its bytes rather than the declared MIME type.
    pub fn decode(data: &[u8]) -> Result<DynamicImage> {
        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .context("Failed to read image header")?
            .decode()
            .context("Failed to decode image")?;
        Ok(img)
    }

    /// Decode and, when `settings.width` is set, resize. The target size is checked
    /// before any pixel buffer for it is allocated.
    pub fn prepare(data: &[u8], settings: &Settings) -> Result<DynamicImage> {
        let img = Self::decode(data)?;
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = match settings.width {
            Some(width) => ImageResize::calculate_dimensions(orig_width, orig_height, width),
            None => (orig_width, orig_height),
        };
        check_dimensions(width, height, MAX_OUTPUT_DIMENSION)
            .context("Requested output size is not supported")?;

        Ok(match settings.width {
            Some(width) => ImageResize::to_width(img, width),
            None => img,
        })
    }

    /// Encode a prepared image to `format`.
    pub fn encode(
        img: &DynamicImage,
        format: OutputFormat,
        settings: &Settings,
        avif_speed: u8,
    ) -> Result<Bytes> {
        let options = CompressionOptions::new(settings.quality, avif_speed);
        let encoded = ImageCompressor::compress(img, format, options)
            .with_context(|| format!("Failed to encode {}", format))?;

        tracing::debug!(
            format = %format,
            quality = settings.quality,
            width = img.width(),
            height = img.height(),
            output_bytes = encoded.len(),
            "Image encoded"
        );

        Ok(encoded)
    }

    /// Decode, optionally resize to `settings.width`, then encode to `format`.
    ///
    /// CPU bound; callers on the async runtime should run this on a blocking thread.
    pub fn convert(
        data: &[u8],
        format: OutputFormat,
        settings: &Settings,
        avif_speed: u8,
    ) -> Result<Bytes> {
        let img = Self::prepare(data, settings)?;
        Self::encode(&img, format, settings, avif_speed)
    }
}
