//! Perceptual Hash (pHash) implementation.
//!
//! pHash uses the Discrete Cosine Transform (DCT) to extract
//! frequency information from the image. This makes it more
//! robust to:
//! - Scaling
//! - Minor rotations
//! - Brightness/contrast changes
//! - Compression artifacts
//!
//! The image is resized to `(hash_size * highfreq_factor)^2`, transformed
//! with a separable 2D DCT, and the top-left `hash_size^2` block of low
//! frequencies is thresholded against its median.
//!
//! [`SimplePerceptualHasher`] is the older, less robust variant: one DCT pass
//! along the rows, a block starting at column 1, thresholded at its mean.

use super::super::source::PixelSource;
use super::super::traits::{HashAlgorithm, HashAlgorithmKind};
use super::{ensure_hash_size, sample_size};
use crate::core::fingerprint::ImageHash;
use crate::core::transform::{median, mean, DctProvider, Matrix, RustDct};
use crate::error::HashError;
use std::sync::Arc;

/// Default ratio between the resized image and the hash
pub const DEFAULT_HIGHFREQ_FACTOR: u32 = 4;

/// Perceptual Hash (pHash) implementation using DCT
#[derive(Clone)]
pub struct PerceptualHasher {
    hash_size: u32,
    highfreq_factor: u32,
    dct: Arc<dyn DctProvider>,
}

impl PerceptualHasher {
    /// Create a new pHash hasher
    pub fn new(hash_size: u32) -> Result<Self, HashError> {
        ensure_hash_size(hash_size)?;
        sample_size(hash_size, DEFAULT_HIGHFREQ_FACTOR)?;
        Ok(Self {
            hash_size,
            highfreq_factor: DEFAULT_HIGHFREQ_FACTOR,
            dct: Arc::new(RustDct),
        })
    }

    /// Set how much larger than the hash the image is sampled (>= 1)
    pub fn with_highfreq_factor(mut self, factor: u32) -> Result<Self, HashError> {
        if factor < 1 {
            return Err(HashError::InvalidHighFreqFactor { factor });
        }
        sample_size(self.hash_size, factor)?;
        self.highfreq_factor = factor;
        Ok(self)
    }

    /// Use another DCT backend
    pub fn with_dct_provider(mut self, dct: Arc<dyn DctProvider>) -> Self {
        self.dct = dct;
        self
    }
}

impl HashAlgorithm for PerceptualHasher {
    fn hash_image(&self, image: &dyn PixelSource) -> Result<ImageHash, HashError> {
        let size = self.hash_size as usize;
        let img_size = sample_size(self.hash_size, self.highfreq_factor)?;

        let gray = image.grayscale(img_size, img_size)?;
        let dct = self.dct.dct_2d(&Matrix::from_gray(&gray, 1.0));

        let low_freq = dct.block(0, 0, size, size)?;
        let threshold = median(low_freq.data());

        Ok(ImageHash::from_fn(size, size, |r, c| low_freq.get(r, c) > threshold))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Perceptual
    }
}

/// Simplified pHash: row-wise DCT, column-offset block, mean threshold
#[derive(Clone)]
pub struct SimplePerceptualHasher {
    hash_size: u32,
    highfreq_factor: u32,
    dct: Arc<dyn DctProvider>,
}

impl SimplePerceptualHasher {
    pub fn new(hash_size: u32) -> Result<Self, HashError> {
        ensure_hash_size(hash_size)?;
        sample_size(hash_size, DEFAULT_HIGHFREQ_FACTOR)?;
        Ok(Self {
            hash_size,
            highfreq_factor: DEFAULT_HIGHFREQ_FACTOR,
            dct: Arc::new(RustDct),
        })
    }

    /// Set the sampling factor. Must be at least 2: the block reaches
    /// column `hash_size`.
    pub fn with_highfreq_factor(mut self, factor: u32) -> Result<Self, HashError> {
        if factor < 2 {
            return Err(HashError::InvalidHighFreqFactor { factor });
        }
        sample_size(self.hash_size, factor)?;
        self.highfreq_factor = factor;
        Ok(self)
    }

    pub fn with_dct_provider(mut self, dct: Arc<dyn DctProvider>) -> Self {
        self.dct = dct;
        self
    }
}

impl HashAlgorithm for SimplePerceptualHasher {
    fn hash_image(&self, image: &dyn PixelSource) -> Result<ImageHash, HashError> {
        let size = self.hash_size as usize;
        let img_size = sample_size(self.hash_size, self.highfreq_factor)?;

        let gray = image.grayscale(img_size, img_size)?;
        let dct = self.dct.dct_rows(&Matrix::from_gray(&gray, 1.0));

        // skip the DC column
        let low_freq = dct.block(0, 1, size, size)?;
        let threshold = mean(low_freq.data());

        Ok(ImageHash::from_fn(size, size, |r, c| low_freq.get(r, c) > threshold))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::PerceptualSimple
    }
}
