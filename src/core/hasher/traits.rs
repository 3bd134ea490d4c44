//! Trait definitions for perceptual hashing.

use super::source::{PixelSource, SourceImage};
use crate::core::fingerprint::ImageHash;
use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash) - pixels against the mean luminance
    Average,
    /// Perceptual Hash (pHash) - DCT low frequencies against their median
    Perceptual,
    /// Simplified pHash - row DCT, offset block against its mean
    PerceptualSimple,
    /// Difference Hash (dHash) - horizontal gradient signs
    Difference,
    /// Difference Hash computed down the columns
    DifferenceVertical,
    /// Wavelet Hash (wHash) - wavelet LL band against its median
    Wavelet,
    /// Color Hash - black/gray fractions and hue histograms
    Color,
}

impl HashAlgorithmKind {
    /// Every supported algorithm
    pub const ALL: [HashAlgorithmKind; 7] = [
        HashAlgorithmKind::Average,
        HashAlgorithmKind::Perceptual,
        HashAlgorithmKind::PerceptualSimple,
        HashAlgorithmKind::Difference,
        HashAlgorithmKind::DifferenceVertical,
        HashAlgorithmKind::Wavelet,
        HashAlgorithmKind::Color,
    ];

    /// Short lookup name
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Average => "ahash",
            HashAlgorithmKind::Perceptual => "phash",
            HashAlgorithmKind::PerceptualSimple => "phash-simple",
            HashAlgorithmKind::Difference => "dhash",
            HashAlgorithmKind::DifferenceVertical => "dhash-vertical",
            HashAlgorithmKind::Wavelet => "whash",
            HashAlgorithmKind::Color => "colorhash",
        }
    }

    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Average => {
                "Average Hash (aHash) - Fast comparison based on average brightness"
            }
            HashAlgorithmKind::Perceptual => {
                "Perceptual Hash (pHash) - DCT-based, robust to edits and transformations"
            }
            HashAlgorithmKind::PerceptualSimple => {
                "Simple Perceptual Hash - single DCT pass thresholded at the mean"
            }
            HashAlgorithmKind::Difference => {
                "Difference Hash (dHash) - Compares brightness gradients between pixels"
            }
            HashAlgorithmKind::DifferenceVertical => {
                "Vertical Difference Hash - Compares brightness gradients between rows"
            }
            HashAlgorithmKind::Wavelet => {
                "Wavelet Hash (wHash) - Multi-resolution low band, robust to rescaling"
            }
            HashAlgorithmKind::Color => {
                "Color Hash - Color distribution, robust to rotation and geometry changes"
            }
        }
    }

    /// Whether the fingerprint is square and decodes with `ImageHash::from_hex`
    pub fn is_square(&self) -> bool {
        !matches!(self, HashAlgorithmKind::Color)
    }
}

impl fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithmKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown hash algorithm: {}", s))
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a hash from an already-decoded image
    fn hash_image(&self, image: &dyn PixelSource) -> Result<ImageHash, HashError>;

    /// Compute a hash directly from a file path.
    ///
    /// JPEG goes through zune-jpeg, other formats through the image crate.
    fn hash_file(&self, path: &Path) -> Result<ImageHash, HashError> {
        let image = SourceImage::open(path)?;
        self.hash_image(&image)
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}
