use anyhow::{anyhow, bail, Result};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use imgpack_core::OutputFormat;

/// Slowest and fastest speeds accepted by the AVIF encoder.
const AVIF_SPEED_RANGE: (u8, u8) = (1, 10);

/// Largest output any encoder is handed, in pixels.
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Largest side length any of the encoders accepts.
pub const MAX_OUTPUT_DIMENSION: u32 = 65_535;

/// Largest side length `format` can encode.
pub fn max_dimension(format: OutputFormat) -> u32 {
    match format {
        OutputFormat::Jpeg => 65_500,
        OutputFormat::WebP => 16_383,
        OutputFormat::Avif => MAX_OUTPUT_DIMENSION,
    }
}

/// Reject sizes the codecs would abort on or that blow the memory ceiling.
pub fn check_dimensions(width: u32, height: u32, max_side: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("Image has no pixels ({}x{})", width, height);
    }
    if width > max_side || height > max_side {
        bail!(
            "Image size {}x{} exceeds the {} pixel side limit",
            width,
            height,
            max_side
        );
    }
    if width as u64 * height as u64 > MAX_OUTPUT_PIXELS {
        bail!(
            "Image size {}x{} exceeds the {} pixel limit",
            width,
            height,
            MAX_OUTPUT_PIXELS
        );
    }
    Ok(())
}

/// Encoder knobs shared by every format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    /// 0-100. JPEG and AVIF floor this at 1.
    pub quality: u8,
    pub avif_speed: u8,
}

impl CompressionOptions {
    pub fn new(quality: u8, avif_speed: u8) -> Self {
        Self {
            quality: quality.min(100),
            avif_speed: avif_speed.clamp(AVIF_SPEED_RANGE.0, AVIF_SPEED_RANGE.1),
        }
    }

    fn floored_quality(&self) -> u8 {
        self.quality.clamp(1, 100)
    }
}

/// Image compression service
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode an already decoded (and resized) image into `format`.
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        options: CompressionOptions,
    ) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        check_dimensions(width, height, max_dimension(format))?;

        match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, options.floored_quality()),
            OutputFormat::WebP => Self::compress_webp(img, options.quality),
            OutputFormat::Avif => {
                Self::compress_avif(img, options.floored_quality(), options.avif_speed)
            }
        }
    }

    /// Progressive JPEG via mozjpeg. Alpha is dropped.
    fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(rgb_img.as_raw())?;
        let jpeg_data = comp.finish()?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Lossy WebP. Quality 0 is a valid setting here.
    fn compress_webp(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(rgba_img.as_raw(), width, height);
        let webp_data = encoder
            .encode_simple(false, quality as f32)
            .map_err(|e| anyhow!("WebP encoding failed: {:?}", e))?;

        Ok(Bytes::copy_from_slice(&webp_data))
    }

    fn compress_avif(img: &DynamicImage, quality: u8, speed: u8) -> Result<Bytes> {
        let (width, height) = img.dimensions();

        let encoder = ravif::Encoder::new()
            .with_quality(quality as f32)
            .with_alpha_quality(quality as f32)
            .with_speed(speed);

        let avif_data = if img.color().has_alpha() {
            let rgba_img = img.to_rgba8();
            let rgba_data: Vec<rgb::RGBA8> = rgba_img
                .as_raw()
                .chunks_exact(4)
                .map(|chunk| rgb::RGBA8::new(chunk[0], chunk[1], chunk[2], chunk[3]))
                .collect();
            let img_buf = ravif::Img::new(rgba_data.as_slice(), width as usize, height as usize);
            encoder.encode_rgba(img_buf)?
        } else {
            let rgb_img = img.to_rgb8();
            let rgb_data: Vec<rgb::RGB8> = rgb_img
                .as_raw()
                .chunks_exact(3)
                .map(|chunk| rgb::RGB8::new(chunk[0], chunk[1], chunk[2]))
                .collect();
            let img_buf = ravif::Img::new(rgb_data.as_slice(), width as usize, height as usize);
            encoder.encode_rgb(img_buf)?
        };

        Ok(Bytes::from(avif_data.avif_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128])
        }))
    }

    #[test]
    fn test_options_clamp() {
        let options = CompressionOptions::new(250, 42);
        assert_eq!(options.quality, 100);
        assert_eq!(options.avif_speed, 10);

        let options = CompressionOptions::new(0, 0);
        assert_eq!(options.quality, 0);
        assert_eq!(options.floored_quality(), 1);
        assert_eq!(options.avif_speed, 1);
    }

    #[test]
    fn test_jpeg_is_progressive_jpeg() {
        let data =
            ImageCompressor::compress(&gradient(32, 24), OutputFormat::Jpeg, CompressionOptions::new(80, 6))
                .unwrap();

        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        // SOF2 marker: progressive DCT
        assert!(data.windows(2).any(|w| w == [0xFF, 0xC2]));

        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (32, 24));
    }

    #[test]
    fn test_jpeg_quality_zero_still_encodes() {
        let data =
            ImageCompressor::compress(&gradient(16, 16), OutputFormat::Jpeg, CompressionOptions::new(0, 6))
                .unwrap();
        assert!(!data.is_empty());
    }

    #[test]
    fn test_webp_output() {
        let data =
            ImageCompressor::compress(&gradient(20, 10), OutputFormat::WebP, CompressionOptions::new(0, 6))
                .unwrap();

        assert_eq!(&data[..4], b"RIFF");
        assert_eq!(&data[8..12], b"WEBP");
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (20, 10));
    }

    #[test]
    fn test_avif_output_with_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 128])));
        let data =
            ImageCompressor::compress(&img, OutputFormat::Avif, CompressionOptions::new(50, 10)).unwrap();

        assert_eq!(&data[4..8], b"ftyp");
        assert!(data.windows(4).any(|w| w == b"avif"));
    }

    #[test]
    fn test_avif_quality_zero_is_floored() {
        let data =
            ImageCompressor::compress(&gradient(8, 8), OutputFormat::Avif, CompressionOptions::new(0, 10))
                .unwrap();
        assert!(!data.is_empty());
    }

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions(65_500, 1, max_dimension(OutputFormat::Jpeg)).is_ok());
        assert!(check_dimensions(65_501, 1, max_dimension(OutputFormat::Jpeg)).is_err());
        assert!(check_dimensions(1, 16_384, max_dimension(OutputFormat::WebP)).is_err());
        assert!(check_dimensions(0, 10, MAX_OUTPUT_DIMENSION).is_err());
        assert!(check_dimensions(20_000, 20_000, MAX_OUTPUT_DIMENSION).is_err());
    }

    #[test]
    fn test_oversized_jpeg_is_an_error() {
        let err = ImageCompressor::compress(&gradient(70_000, 1), OutputFormat::Jpeg, CompressionOptions::new(80, 6))
            .unwrap_err();
        assert!(err.to_string().contains("65500"));
    }

    #[test]
    fn test_oversized_webp_is_an_error() {
        let result =
            ImageCompressor::compress(&gradient(16_384, 1), OutputFormat::WebP, CompressionOptions::new(80, 6));
        assert!(result.is_err());
    }
}
