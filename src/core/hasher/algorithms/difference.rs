//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Converting to grayscale
//! 2. Resizing the image to (hash_size+1) x hash_size
//! 3. Comparing each pixel to the one to its right
//! 4. If the right pixel is brighter, set bit to 1, else 0
//!
//! This captures the direction of brightness changes, so uniform brightness
//! or contrast shifts leave the hash untouched. The vertical variant resizes
//! to hash_size x (hash_size+1) and compares each pixel to the one below.
//!
//! Uses SIMD-accelerated resizing via fast_image_resize.

use super::super::source::PixelSource;
use super::super::traits::{HashAlgorithm, HashAlgorithmKind};
use super::ensure_hash_size;
use crate::core::fingerprint::ImageHash;
use crate::error::HashError;

/// Axis along which neighbouring pixels are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Compare adjacent columns
    #[default]
    Horizontal,
    /// Compare adjacent rows
    Vertical,
}

/// Difference Hash (dHash) implementation
#[derive(Debug, Clone)]
pub struct DifferenceHasher {
    /// Size of the hash (width and height of comparison grid)
    hash_size: u32,
    direction: Direction,
}

impl DifferenceHasher {
    /// Create a new horizontal dHash hasher
    pub fn new(hash_size: u32) -> Result<Self, HashError> {
        ensure_hash_size(hash_size)?;
        Ok(Self {
            hash_size,
            direction: Direction::Horizontal,
        })
    }

    /// Create a dHash hasher comparing rows instead of columns
    pub fn vertical(hash_size: u32) -> Result<Self, HashError> {
        Ok(Self::new(hash_size)?.with_direction(Direction::Vertical))
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

impl HashAlgorithm for DifferenceHasher {
    fn hash_image(&self, image: &dyn PixelSource) -> Result<ImageHash, HashError> {
        let n = self.hash_size;
        let size = n as usize;
        let extended = n
            .checked_add(1)
            .ok_or(HashError::InvalidHashSize { size: n })?;

        let hash = match self.direction {
            Direction::Horizontal => {
                // One extra column to compute differences
                let gray = image.grayscale(extended, n)?;
                ImageHash::from_fn(size, size, |r, c| {
                    let (x, y) = (c as u32, r as u32);
                    gray.get_pixel(x + 1, y)[0] > gray.get_pixel(x, y)[0]
                })
            }
            Direction::Vertical => {
                let gray = image.grayscale(n, extended)?;
                ImageHash::from_fn(size, size, |r, c| {
                    let (x, y) = (c as u32, r as u32);
                    gray.get_pixel(x, y + 1)[0] > gray.get_pixel(x, y)[0]
                })
            }
        };

        Ok(hash)
    }

    fn kind(&self) -> HashAlgorithmKind {
        match self.direction {
            Direction::Horizontal => HashAlgorithmKind::Difference,
            Direction::Vertical => HashAlgorithmKind::DifferenceVertical,
        }
    }
}
