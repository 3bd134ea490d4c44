//! # Hasher Module
//!
//! Computes perceptual hashes for images.
//!
//! ## Supported Algorithms
//! - **aHash (Average Hash)** - Fastest, good for exact duplicates
//! - **pHash (Perceptual Hash)** - DCT based, handles edits well
//! - **dHash (Difference Hash)** - Best balance of speed and accuracy
//! - **wHash (Wavelet Hash)** - Haar or Daubechies low band
//! - **Color Hash** - Color distribution, ignores geometry
//!
//! ## How It Works
//! 1. Resize image to small size (8x8 or 16x16)
//! 2. Convert to grayscale
//! 3. Compute hash based on pixel relationships
//! 4. Compare hashes using Hamming distance
//!
//! ## Performance Optimizations
//! - Uses `zune-jpeg` for 1.5-2x faster JPEG decoding
//! - Uses `fast_image_resize` for 5-14x faster SIMD-accelerated resizing
//!
//! ## Example
//! ```rust,ignore
//! use imagehash::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Difference)
//!     .hash_size(16)
//!     .build()?;
//!
//! let hash = hasher.hash_file(&path)?;
//! ```

mod algorithms;
pub mod fast_decode;
pub mod fast_resize;
pub mod frames;
mod source;
mod traits;

pub use algorithms::{
    AverageHasher, ColorHasher, DifferenceHasher, Direction, PerceptualHasher,
    SimplePerceptualHasher, WaveletHasher, COLOR_BINS, MIN_HASH_SIZE,
};
pub use frames::{hash_animation, hash_frames, sample_frames};
pub use source::{PixelSource, SourceImage};
pub use traits::{HashAlgorithm, HashAlgorithmKind};

use crate::core::transform::{Statistic, Wavelet};
use crate::error::HashError;

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Algorithm to use
    algorithm: HashAlgorithmKind,
    /// Hash size (width and height of the bit grid)
    hash_size: u32,
    /// pHash sampling factor
    highfreq_factor: u32,
    /// wHash working resolution, derived from the image when unset
    image_scale: Option<u32>,
    wavelet: Wavelet,
    remove_max_haar_ll: bool,
    /// aHash threshold statistic
    statistic: Statistic,
    /// Color hash bits per fraction
    binbits: i32,
    ignore_icc: bool,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithmKind::Difference,
            hash_size: 8,
            highfreq_factor: 4,
            image_scale: None,
            wavelet: Wavelet::Haar,
            remove_max_haar_ll: true,
            statistic: Statistic::Mean,
            binbits: 3,
            ignore_icc: false,
        }
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the hash size
    ///
    /// Larger sizes are more accurate but slower.
    /// - 8: 64 bits, fast, good for most uses
    /// - 16: 256 bits, more accurate
    /// - 32: 1024 bits, very accurate, slower
    ///
    /// Ignored by the color hash, which is sized by `binbits`.
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    pub fn highfreq_factor(mut self, factor: u32) -> Self {
        self.highfreq_factor = factor;
        self
    }

    pub fn image_scale(mut self, scale: u32) -> Self {
        self.image_scale = Some(scale);
        self
    }

    pub fn wavelet(mut self, wavelet: Wavelet) -> Self {
        self.wavelet = wavelet;
        self
    }

    pub fn remove_max_haar_ll(mut self, remove: bool) -> Self {
        self.remove_max_haar_ll = remove;
        self
    }

    pub fn statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = statistic;
        self
    }

    pub fn binbits(mut self, binbits: i32) -> Self {
        self.binbits = binbits;
        self
    }

    pub fn ignore_icc(mut self, ignore: bool) -> Self {
        self.ignore_icc = ignore;
        self
    }

    /// Build the hasher, validating every parameter
    pub fn build(self) -> Result<Box<dyn HashAlgorithm>, HashError> {
        match self.algorithm {
            HashAlgorithmKind::Average => Ok(Box::new(
                AverageHasher::new(self.hash_size)?.with_statistic(self.statistic),
            )),
            HashAlgorithmKind::Perceptual => Ok(Box::new(
                PerceptualHasher::new(self.hash_size)?.with_highfreq_factor(self.highfreq_factor)?,
            )),
            HashAlgorithmKind::PerceptualSimple => Ok(Box::new(
                SimplePerceptualHasher::new(self.hash_size)?
                    .with_highfreq_factor(self.highfreq_factor)?,
            )),
            HashAlgorithmKind::Difference => Ok(Box::new(DifferenceHasher::new(self.hash_size)?)),
            HashAlgorithmKind::DifferenceVertical => {
                Ok(Box::new(DifferenceHasher::vertical(self.hash_size)?))
            }
            HashAlgorithmKind::Wavelet => {
                let mut hasher = WaveletHasher::new(self.hash_size)?
                    .with_wavelet(self.wavelet)
                    .with_remove_max_haar_ll(self.remove_max_haar_ll);
                if let Some(scale) = self.image_scale {
                    hasher = hasher.with_image_scale(scale)?;
                }
                Ok(Box::new(hasher))
            }
            HashAlgorithmKind::Color => Ok(Box::new(
                ColorHasher::new(self.binbits)?.with_ignore_icc(self.ignore_icc),
            )),
        }
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}
