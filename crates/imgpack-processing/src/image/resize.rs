use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Target size for a width-only resize: height follows the aspect ratio, rounded, at least 1.
    /// Upscaling is allowed.
    pub fn calculate_dimensions(orig_width: u32, orig_height: u32, width: u32) -> (u32, u32) {
        let width = width.max(1);
        if orig_width == 0 {
            return (width, orig_height.max(1));
        }

        let aspect_ratio = orig_height as f64 / orig_width as f64;
        let height = (width as f64 * aspect_ratio).round();
        (width, (height as u32).max(1))
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize to `width` keeping the aspect ratio. Returns the input untouched when nothing changes.
    pub fn to_width(img: DynamicImage, width: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (new_width, new_height) = Self::calculate_dimensions(orig_width, orig_height, width);
        if (new_width, new_height) == (orig_width, orig_height) {
            return img;
        }

        let filter = Self::select_filter(orig_width, orig_height, new_width, new_height);
        tracing::debug!(
            orig_width,
            orig_height,
            new_width,
            new_height,
            filter = ?filter,
            "Resizing image"
        );
        img.resize_exact(new_width, new_height, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_calculate_dimensions_keeps_aspect_ratio() {
        assert_eq!(ImageResize::calculate_dimensions(1000, 500, 200), (200, 100));
        assert_eq!(ImageResize::calculate_dimensions(300, 200, 100), (100, 67));
    }

    #[test]
    fn test_calculate_dimensions_upscales() {
        assert_eq!(ImageResize::calculate_dimensions(100, 50, 400), (400, 200));
    }

    #[test]
    fn test_calculate_dimensions_height_at_least_one() {
        assert_eq!(ImageResize::calculate_dimensions(1000, 10, 1), (1, 1));
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(ImageResize::select_filter(1000, 1000, 100, 100), FilterType::Triangle);
        assert_eq!(ImageResize::select_filter(170, 170, 100, 100), FilterType::CatmullRom);
        assert_eq!(ImageResize::select_filter(100, 100, 200, 200), FilterType::Lanczos3);
    }

    #[test]
    fn test_to_width() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
        let resized = ImageResize::to_width(img, 10);
        assert_eq!(resized.dimensions(), (10, 5));
    }

    #[test]
    fn test_to_width_same_size_is_noop() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
        assert_eq!(ImageResize::to_width(img, 40).dimensions(), (40, 20));
    }
}
