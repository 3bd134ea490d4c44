//! Wavelet Hash (wHash) implementation.
//!
//! wHash works by:
//! 1. Resizing luminance to `image_scale x image_scale` and scaling to `[0, 1]`
//! 2. Optionally removing the lowest Haar band (full-depth decomposition,
//!    LL zeroed, reconstructed) to drop the global brightness bias
//! 3. Decomposing with the chosen wavelet until the LL band is
//!    `hash_size x hash_size`
//! 4. Setting each bit to `coefficient > median(LL)`

use super::super::source::PixelSource;
use super::super::traits::{HashAlgorithm, HashAlgorithmKind};
use super::{ensure_hash_size, ensure_power_of_two};
use crate::core::fingerprint::ImageHash;
use crate::core::transform::{median, Matrix, PeriodicDwt, Wavelet, WaveletProvider};
use crate::error::HashError;
use std::sync::Arc;

/// Wavelet Hash (wHash) implementation
#[derive(Clone)]
pub struct WaveletHasher {
    hash_size: u32,
    /// Fixed working resolution; derived from the image when `None`
    image_scale: Option<u32>,
    wavelet: Wavelet,
    remove_max_haar_ll: bool,
    provider: Arc<dyn WaveletProvider>,
}

impl WaveletHasher {
    /// Create a new wHash hasher. `hash_size` must be a power of two.
    pub fn new(hash_size: u32) -> Result<Self, HashError> {
        ensure_hash_size(hash_size)?;
        ensure_power_of_two("hash_size", hash_size)?;
        Ok(Self {
            hash_size,
            image_scale: None,
            wavelet: Wavelet::Haar,
            remove_max_haar_ll: true,
            provider: Arc::new(PeriodicDwt),
        })
    }

    /// Fix the working resolution. Must be a power of two no smaller than
    /// `hash_size`.
    pub fn with_image_scale(mut self, image_scale: u32) -> Result<Self, HashError> {
        ensure_power_of_two("image_scale", image_scale)?;
        if image_scale < self.hash_size {
            return Err(HashError::LevelOutOfRange {
                hash_size: self.hash_size,
                image_scale,
            });
        }
        self.image_scale = Some(image_scale);
        Ok(self)
    }

    pub fn with_wavelet(mut self, wavelet: Wavelet) -> Self {
        self.wavelet = wavelet;
        self
    }

    pub fn with_remove_max_haar_ll(mut self, remove: bool) -> Self {
        self.remove_max_haar_ll = remove;
        self
    }

    /// Use another wavelet backend
    pub fn with_provider(mut self, provider: Arc<dyn WaveletProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Working resolution for an image of the given size
    fn scale_for(&self, (width, height): (u32, u32)) -> Result<u32, HashError> {
        if let Some(scale) = self.image_scale {
            return Ok(scale);
        }

        let smaller = width.min(height);
        if smaller == 0 {
            return Err(HashError::EmptyImage {
                path: "<memory>".into(),
            });
        }

        // largest power of two that fits the smaller side
        let natural = 1u32 << smaller.ilog2();
        Ok(natural.max(self.hash_size))
    }
}

impl HashAlgorithm for WaveletHasher {
    fn hash_image(&self, image: &dyn PixelSource) -> Result<ImageHash, HashError> {
        let image_scale = self.scale_for(image.dimensions())?;

        let max_level = image_scale.trailing_zeros();
        let hash_level = self.hash_size.trailing_zeros();
        if hash_level > max_level {
            return Err(HashError::LevelOutOfRange {
                hash_size: self.hash_size,
                image_scale,
            });
        }
        let dwt_level = max_level - hash_level;

        let gray = image.grayscale(image_scale, image_scale)?;
        let mut pixels = Matrix::from_gray(&gray, 1.0 / 255.0);

        if self.remove_max_haar_ll {
            let mut coeffs = self.provider.decompose(&pixels, Wavelet::Haar, max_level)?;
            coeffs.approximation = Matrix::zeros(
                coeffs.approximation.rows(),
                coeffs.approximation.cols(),
            );
            pixels = self.provider.reconstruct(&coeffs, Wavelet::Haar)?;
        }

        let coeffs = self.provider.decompose(&pixels, self.wavelet, dwt_level)?;
        let low = coeffs.approximation;

        let size = self.hash_size as usize;
        if low.shape() != (size, size) {
            return Err(HashError::ComputationFailed(format!(
                "{} band is {}x{}, expected {}x{}",
                self.wavelet,
                low.rows(),
                low.cols(),
                size,
                size
            )));
        }

        let threshold = median(low.data());
        tracing::trace!(
            image_scale,
            dwt_level,
            wavelet = %self.wavelet,
            "computed wHash threshold"
        );

        Ok(ImageHash::from_fn(size, size, |r, c| low.get(r, c) > threshold))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Wavelet
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_images::pattern;
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn white(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    #[test]
    fn power_of_two_sizes_produce_square_hashes() {
        let image = white(512, 512);
        for hash_size in [4, 8, 16] {
            let hash = WaveletHasher::new(hash_size)
                .unwrap()
                .hash_image(&image)
                .unwrap();
            assert_eq!(hash.len(), (hash_size * hash_size) as usize);
        }
    }

    #[test]
    fn hash_size_must_be_power_of_two() {
        for hash_size in [3, 7, 12] {
            assert!(matches!(
                WaveletHasher::new(hash_size),
                Err(HashError::NotPowerOfTwo { name: "hash_size", .. })
            ));
        }
    }

    #[test]
    fn image_scale_must_be_power_of_two() {
        for image_scale in [5, 9, 17] {
            let err = WaveletHasher::new(8)
                .unwrap()
                .with_image_scale(image_scale)
                .err()
                .unwrap();
            assert_eq!(err.to_string(), format!("image_scale is not power of 2: {}", image_scale));
        }
    }

    #[test]
    fn custom_scale_is_honored() {
        let hash = WaveletHasher::new(16)
            .unwrap()
            .with_image_scale(64)
            .unwrap()
            .hash_image(&white(512, 512))
            .unwrap();
        assert_eq!(hash.shape(), (16, 16));
    }

    #[test]
    fn hash_larger_than_scale_is_rejected() {
        let err = WaveletHasher::new(32)
            .unwrap()
            .with_image_scale(16)
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("hash_size in a wrong range"));
    }

    #[test]
    fn default_scale_grows_to_hash_size() {
        // natural scale of 120x200 is 64, so hash_size wins
        let hash = WaveletHasher::new(128)
            .unwrap()
            .hash_image(&white(120, 200))
            .unwrap();
        assert_eq!(hash.shape(), (128, 128));
    }

    #[test]
    fn small_image_is_hashed() {
        let hash = WaveletHasher::new(8)
            .unwrap()
            .hash_image(&white(4, 9))
            .unwrap();
        assert_eq!(hash.shape(), (8, 8));
    }

    #[test]
    fn db4_produces_requested_shape() {
        let hasher = WaveletHasher::new(8)
            .unwrap()
            .with_wavelet(Wavelet::Daubechies4);
        let hash = hasher.hash_image(&pattern(200, 150)).unwrap();

        assert_eq!(hash.shape(), (8, 8));
        assert_eq!(hasher.kind(), HashAlgorithmKind::Wavelet);
    }

    #[test]
    fn hash_is_stable_without_ll_removal() {
        let hasher = WaveletHasher::new(8)
            .unwrap()
            .with_remove_max_haar_ll(false);
        let image = pattern(160, 160);

        assert_eq!(
            hasher.hash_image(&image).unwrap(),
            hasher.hash_image(&image).unwrap()
        );
    }

    #[test]
    fn similar_images_are_close() {
        let hasher = WaveletHasher::new(8).unwrap();
        let small = pattern(128, 128);
        let large = pattern(256, 256);

        let distance = hasher
            .hash_image(&small)
            .unwrap()
            .distance(&hasher.hash_image(&large).unwrap())
            .unwrap();
        assert!(distance <= 10);
    }
}
