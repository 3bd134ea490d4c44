//! Pixel sources: the only way the hash pipelines read image data.

use super::fast_decode::FastDecoder;
use super::fast_resize::resize_to_grayscale;
use crate::core::color::HsvPlanes;
use crate::error::HashError;
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;

/// A decoded image the hashers can sample from
pub trait PixelSource: Send + Sync {
    /// `(width, height)` of the full image
    fn dimensions(&self) -> (u32, u32);

    /// Luminance resized to exactly `width x height` with an anti-aliasing filter
    fn grayscale(&self, width: u32, height: u32) -> Result<GrayImage, HashError>;

    /// Full-resolution RGB pixels as stored in the file
    fn rgb(&self) -> RgbImage;

    /// Hue/saturation/value planes of [`rgb`](Self::rgb)
    fn hsv(&self) -> HsvPlanes {
        HsvPlanes::from_rgb(&self.rgb())
    }

    /// Embedded ICC profile, if any
    fn icc_profile(&self) -> Option<&[u8]> {
        None
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn grayscale(&self, width: u32, height: u32) -> Result<GrayImage, HashError> {
        resize_to_grayscale(self, width, height)
    }

    fn rgb(&self) -> RgbImage {
        self.to_rgb8()
    }
}

/// A decoded image together with its embedded ICC profile
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    icc_profile: Option<Vec<u8>>,
}

impl SourceImage {
    /// Wrap an image that carries no color profile
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            icc_profile: None,
        }
    }

    pub fn with_profile(image: DynamicImage, icc_profile: Option<Vec<u8>>) -> Self {
        Self {
            image,
            icc_profile: icc_profile.filter(|p| !p.is_empty()),
        }
    }

    /// Decode a file, keeping its ICC profile
    pub fn open(path: &Path) -> Result<Self, HashError> {
        FastDecoder::decode(path)
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn icc_profile_bytes(&self) -> Option<&[u8]> {
        self.icc_profile.as_deref()
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl PixelSource for SourceImage {
    fn dimensions(&self) -> (u32, u32) {
        PixelSource::dimensions(&self.image)
    }

    fn grayscale(&self, width: u32, height: u32) -> Result<GrayImage, HashError> {
        PixelSource::grayscale(&self.image, width, height)
    }

    fn rgb(&self) -> RgbImage {
        PixelSource::rgb(&self.image)
    }

    fn icc_profile(&self) -> Option<&[u8]> {
        self.icc_profile_bytes()
    }
}
