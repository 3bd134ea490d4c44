//! # Fingerprint Module
//!
//! The bit-matrix value produced by every hash algorithm.
//!
//! An [`ImageHash`] is an immutable `rows x cols` matrix of bits. It does not
//! record which algorithm produced it: callers must only compare fingerprints
//! that came from the same algorithm with the same parameters.
//!
//! ## Comparison
//! - `distance` is the Hamming distance over the row-major bit sequence
//! - operands with a different total bit count are a [`CompareError`]
//! - an absent operand is a [`CompareError::MissingHash`], never "infinitely far"
//!
//! ## Serialization
//! Fingerprints are stored as lowercase hex, see the `hex` submodule.

mod hex;

use crate::error::{CompareError, HashError, HexError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A perceptual fingerprint: a fixed-shape matrix of bits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "StoredHash", try_from = "StoredHash")]
pub struct ImageHash {
    rows: usize,
    cols: usize,
    /// Row-major bits
    bits: Vec<bool>,
}

impl ImageHash {
    /// Build a fingerprint by evaluating `f(row, col)` for every cell
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut bits = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                bits.push(f(r, c));
            }
        }
        Self { rows, cols, bits }
    }

    /// Build a fingerprint from row-major bits
    pub fn from_bits(rows: usize, cols: usize, bits: Vec<bool>) -> Result<Self, HashError> {
        if bits.len() != rows * cols {
            return Err(HashError::ComputationFailed(format!(
                "{} bits do not fill a {}x{} hash",
                bits.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, bits })
    }

    /// Stack fingerprints of equal width on top of each other
    pub fn stack(parts: &[ImageHash]) -> Result<Self, CompareError> {
        let Some(first) = parts.first() else {
            return Err(CompareError::MissingHash);
        };

        let mut bits = Vec::with_capacity(first.len() * parts.len());
        let mut rows = 0;
        for part in parts {
            if part.cols != first.cols {
                return Err(CompareError::ShapeMismatch {
                    left: first.shape(),
                    right: part.shape(),
                });
            }
            rows += part.rows;
            bits.extend_from_slice(&part.bits);
        }

        Ok(Self {
            rows,
            cols: first.cols,
            bits,
        })
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Row-major view of the bits
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Bit at `(row, col)`, if inside the matrix
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row < self.rows && col < self.cols {
            Some(self.bits[row * self.cols + col])
        } else {
            None
        }
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Hamming distance to another fingerprint.
    ///
    /// Lower distance = more similar images.
    pub fn distance(&self, other: &ImageHash) -> Result<u32, CompareError> {
        self.check_compatible(other)?;
        Ok(self
            .bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count() as u32)
    }

    /// Hamming distance to a possibly absent fingerprint
    pub fn try_distance(&self, other: Option<&ImageHash>) -> Result<u32, CompareError> {
        self.distance(other.ok_or(CompareError::MissingHash)?)
    }

    /// Checked equality: absent operands and size mismatches are errors
    pub fn try_eq(&self, other: Option<&ImageHash>) -> Result<bool, CompareError> {
        let other = other.ok_or(CompareError::MissingHash)?;
        self.check_compatible(other)?;
        Ok(self.bits == other.bits)
    }

    /// Similarity as a percentage (0-100)
    pub fn similarity(&self, other: &ImageHash) -> Result<f64, CompareError> {
        let distance = self.distance(other)?;
        if self.is_empty() {
            return Ok(100.0);
        }
        Ok((1.0 - (distance as f64 / self.len() as f64)) * 100.0)
    }

    /// Lossy bucket key for maps and grouping.
    ///
    /// Sums `2^(i mod 8)` over the indices of set bits, so unequal
    /// fingerprints can share a key. Equal fingerprints always do.
    pub fn bucket_key(&self) -> u32 {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &bit)| bit)
            .map(|(i, _)| 1u32 << (i % 8))
            .sum()
    }

    fn check_compatible(&self, other: &ImageHash) -> Result<(), CompareError> {
        if self.len() != other.len() {
            return Err(CompareError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }
}

/// Equal iff the row-major bit sequences are identical
impl PartialEq for ImageHash {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for ImageHash {}

impl std::hash::Hash for ImageHash {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bucket_key().hash(state);
    }
}

impl fmt::Display for ImageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ImageHash {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// On-disk form: shape plus hex bits
#[derive(Serialize, Deserialize)]
struct StoredHash {
    rows: usize,
    cols: usize,
    hex: String,
}

impl From<ImageHash> for StoredHash {
    fn from(hash: ImageHash) -> Self {
        Self {
            rows: hash.rows,
            cols: hash.cols,
            hex: hash.to_hex(),
        }
    }
}

impl TryFrom<StoredHash> for ImageHash {
    type Error = HexError;

    fn try_from(stored: StoredHash) -> Result<Self, Self::Error> {
        let width = stored
            .rows
            .checked_mul(stored.cols)
            .filter(|&w| w > 0)
            .ok_or(HexError::InvalidShape {
                rows: stored.rows,
                cols: stored.cols,
            })?;

        let digits = stored.hex.chars().count();
        if digits != width.div_ceil(4) {
            return Err(HexError::InvalidLength {
                expected: width.div_ceil(4),
                actual: digits,
            });
        }

        let bits = hex::fit_width(hex::parse_bits(&stored.hex)?, width)?;
        Ok(Self {
            rows: stored.rows,
            cols: stored.cols,
            bits,
        })
    }
}
