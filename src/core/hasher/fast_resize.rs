//! Fast SIMD-accelerated grayscale resizing.
//!
//! Uses fast_image_resize with a Lanczos3 convolution, an anti-aliasing
//! filter, so downscaling to a handful of pixels averages the whole image
//! instead of point-sampling it.

use crate::error::HashError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage};

/// Fast image resizer using SIMD acceleration
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    /// Create a new fast resizer
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Convert to grayscale, then resize to exactly `width x height`
    pub fn resize_to_grayscale(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, HashError> {
        self.resize_gray(image.to_luma8(), width, height)
    }

    /// Resize an 8-bit grayscale buffer to exactly `width x height`
    pub fn resize_gray(
        &mut self,
        gray: GrayImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, HashError> {
        let (src_width, src_height) = gray.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(HashError::ComputationFailed(
                "cannot resize an empty image".to_string(),
            ));
        }

        if width == 0 || height == 0 {
            return Err(HashError::ComputationFailed(format!(
                "invalid destination dimensions {}x{}",
                width, height
            )));
        }

        if (src_width, src_height) == (width, height) {
            return Ok(gray);
        }

        let src_image = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
            .map_err(|e| {
                HashError::ComputationFailed(format!("failed to create source image: {}", e))
            })?;

        let mut dst_image = Image::new(width, height, PixelType::U8);

        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| HashError::ComputationFailed(format!("resize failed: {}", e)))?;

        GrayImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            HashError::ComputationFailed("failed to create result buffer".to_string())
        })
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-off resizing
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, HashError> {
    FastResizer::new().resize_to_grayscale(image, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) * 128 / (width + height).max(1)) as u8;
            Rgb([r, g, b])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn resize_produces_correct_dimensions() {
        let image = create_test_image(100, 100);
        let resized = resize_to_grayscale(&image, 8, 8).unwrap();

        assert_eq!(resized.dimensions(), (8, 8));
    }

    #[test]
    fn resize_non_square_target() {
        let image = create_test_image(200, 100);
        let resized = resize_to_grayscale(&image, 9, 8).unwrap();

        assert_eq!(resized.dimensions(), (9, 8));
    }

    #[test]
    fn resize_upscales_small_images() {
        let image = create_test_image(4, 9);
        let resized = resize_to_grayscale(&image, 16, 16).unwrap();

        assert_eq!(resized.dimensions(), (16, 16));
    }

    #[test]
    fn resize_keeps_solid_color() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(50, 50, |_, _| Rgb([90, 90, 90])));
        let resized = resize_to_grayscale(&image, 8, 8).unwrap();

        assert!(resized.pixels().all(|p| (p[0] as i32 - 90).abs() <= 1));
    }

    #[test]
    fn resize_rejects_zero_target() {
        let image = create_test_image(10, 10);
        assert!(resize_to_grayscale(&image, 0, 8).is_err());
    }

    #[test]
    fn resizer_reuse() {
        let mut resizer = FastResizer::new();
        let image = create_test_image(100, 100);

        let resized1 = resizer.resize_to_grayscale(&image, 8, 8).unwrap();
        let resized2 = resizer.resize_to_grayscale(&image, 8, 8).unwrap();

        assert_eq!(resized1, resized2);
    }
}
