//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Converting to grayscale
//! 2. Resizing the image to hash_size x hash_size with an anti-aliasing filter
//! 3. Computing the average brightness (mean by default, or any [`Statistic`])
//! 4. For each pixel: if brighter than average, set bit to 1, else 0
//!
//! This is the fastest hash but less robust to edits.

use super::super::source::PixelSource;
use super::super::traits::{HashAlgorithm, HashAlgorithmKind};
use super::ensure_hash_size;
use crate::core::fingerprint::ImageHash;
use crate::core::transform::{Matrix, Statistic};
use crate::error::HashError;

/// Average Hash (aHash) implementation
#[derive(Debug, Clone)]
pub struct AverageHasher {
    /// Size of the hash (width and height)
    hash_size: u32,
    /// How the average luminance is determined
    statistic: Statistic,
}

impl AverageHasher {
    /// Create a new aHash hasher
    pub fn new(hash_size: u32) -> Result<Self, HashError> {
        ensure_hash_size(hash_size)?;
        Ok(Self {
            hash_size,
            statistic: Statistic::Mean,
        })
    }

    /// Use another statistic for the average, e.g. [`Statistic::Median`] or
    /// any `fn(&[f64]) -> f64` through [`Statistic::Custom`]
    pub fn with_statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = statistic;
        self
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &dyn PixelSource) -> Result<ImageHash, HashError> {
        let size = self.hash_size as usize;
        let gray = image.grayscale(self.hash_size, self.hash_size)?;
        let pixels = Matrix::from_gray(&gray, 1.0);

        let average = self.statistic.apply(pixels.data());
        tracing::trace!(hash_size = size, average, "computed aHash threshold");

        Ok(ImageHash::from_fn(size, size, |r, c| pixels.get(r, c) > average))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}
