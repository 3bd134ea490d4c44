//! Hash algorithm implementations.

mod average;
mod color;
mod difference;
mod perceptual;
mod wavelet;

pub use average::AverageHasher;
pub use color::{ColorHasher, COLOR_BINS};
pub use difference::{DifferenceHasher, Direction};
pub use perceptual::{PerceptualHasher, SimplePerceptualHasher};
pub use wavelet::WaveletHasher;

use crate::error::HashError;

/// Smallest supported `hash_size`
pub const MIN_HASH_SIZE: u32 = 2;

pub(crate) fn ensure_hash_size(hash_size: u32) -> Result<(), HashError> {
    if hash_size < MIN_HASH_SIZE {
        return Err(HashError::InvalidHashSize { size: hash_size });
    }
    Ok(())
}

/// Side of the square sampled before the DCT
pub(crate) fn sample_size(hash_size: u32, factor: u32) -> Result<u32, HashError> {
    hash_size
        .checked_mul(factor)
        .ok_or(HashError::SampleSizeOverflow { hash_size, factor })
}

pub(crate) fn ensure_power_of_two(name: &'static str, value: u32) -> Result<(), HashError> {
    if !value.is_power_of_two() {
        return Err(HashError::NotPowerOfTwo { name, value });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_size_below_two_is_rejected() {
        assert!(ensure_hash_size(0).is_err());
        assert!(ensure_hash_size(1).is_err());
        assert!(ensure_hash_size(2).is_ok());
    }

    #[test]
    fn power_of_two_check() {
        assert!(ensure_power_of_two("hash_size", 8).is_ok());
        assert!(matches!(
            ensure_power_of_two("hash_size", 12),
            Err(HashError::NotPowerOfTwo { value: 12, .. })
        ));
        assert!(ensure_power_of_two("image_scale", 0).is_err());
    }

    #[test]
    fn sample_size_overflow_is_an_error() {
        assert_eq!(sample_size(8, 4).unwrap(), 32);
        assert!(matches!(
            sample_size(u32::MAX / 2, 4),
            Err(HashError::SampleSizeOverflow { factor: 4, .. })
        ));
    }
}
