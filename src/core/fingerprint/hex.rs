//! Hex encoding of fingerprints.
//!
//! The bits are read row-major as one big-endian integer and written as
//! lowercase hex, zero-padded to `ceil(bits / 4)` digits.
//!
//! Three decoders exist because the string does not carry the shape:
//! - [`ImageHash::from_hex`] assumes a square `n x n` matrix
//! - [`ImageHash::from_flat_hex`] takes the row width from the caller
//! - [`ImageHash::from_legacy_hex`] reads the byte-packed format of old releases

use super::ImageHash;
use crate::error::HexError;

impl ImageHash {
    /// Encode as lowercase big-endian hex
    pub fn to_hex(&self) -> String {
        encode_bits(&self.bits)
    }

    /// Decode a hex string produced from a square `n x n` hash.
    ///
    /// `n` is recovered as `round(sqrt(4 * digits))`, so this only works for
    /// square hashes with `n >= 2`. Color hashes must use
    /// [`from_flat_hex`](Self::from_flat_hex).
    pub fn from_hex(hex: &str) -> Result<Self, HexError> {
        let bits = parse_bits(hex)?;
        let hash_size = (bits.len() as f64).sqrt().round() as usize;
        if hash_size < 2 {
            return Err(HexError::TooSmall {
                bits: bits.len(),
                hash_size,
            });
        }

        let bits = fit_width(bits, hash_size * hash_size)?;
        Ok(Self {
            rows: hash_size,
            cols: hash_size,
            bits,
        })
    }

    /// Decode a hex string whose row width is `hashsize`.
    ///
    /// The row count is `4 * digits / hashsize`. Passing the total bit count
    /// of the original hash (e.g. `14 * binbits` for a color hash) yields a
    /// single row holding every bit.
    pub fn from_flat_hex(hex: &str, hashsize: usize) -> Result<Self, HexError> {
        if hashsize == 0 {
            return Err(HexError::InvalidHashSize { size: hashsize });
        }

        let bits = parse_bits(hex)?;
        let rows = bits.len() / hashsize;
        if rows == 0 {
            return Err(HexError::TooSmall {
                bits: bits.len(),
                hash_size: hashsize,
            });
        }

        let bits = fit_width(bits, rows * hashsize)?;
        Ok(Self {
            rows,
            cols: hashsize,
            bits,
        })
    }

    /// Decode the byte-packed hex of releases before the unified hex scheme.
    ///
    /// Each pair of digits is one row of 8 bits, least significant bit first.
    /// The string must be exactly `hash_size * (hash_size / 4)` digits long.
    pub fn from_legacy_hex(hex: &str, hash_size: usize) -> Result<Self, HexError> {
        let expected = hash_size
            .checked_mul(hash_size / 4)
            .filter(|&digits| digits > 0)
            .ok_or(HexError::InvalidHashSize { size: hash_size })?;

        let digits = hex.chars().count();
        if digits != expected {
            return Err(HexError::InvalidLength {
                expected,
                actual: digits,
            });
        }

        let values = parse_digits(hex)?;
        let rows = expected / 2;
        let mut bits = Vec::with_capacity(rows * 8);
        for pair in values.chunks_exact(2) {
            let byte = (pair[0] << 4) | pair[1];
            bits.extend((0..8).map(|i| byte & (1 << i) != 0));
        }

        Ok(Self { rows, cols: 8, bits })
    }
}

pub(super) fn encode_bits(bits: &[bool]) -> String {
    let width = bits.len().div_ceil(4);
    let padding = width * 4 - bits.len();

    let padded = std::iter::repeat(false).take(padding).chain(bits.iter().copied());
    let mut out = String::with_capacity(width);
    let mut nibble = 0u32;
    for (i, bit) in padded.enumerate() {
        nibble = (nibble << 1) | bit as u32;
        if i % 4 == 3 {
            // nibble < 16, always a valid digit
            out.push(char::from_digit(nibble, 16).unwrap_or('0'));
            nibble = 0;
        }
    }
    out
}

fn parse_digits(hex: &str) -> Result<Vec<u8>, HexError> {
    if hex.is_empty() {
        return Err(HexError::Empty);
    }

    hex.chars()
        .enumerate()
        .map(|(position, digit)| {
            digit
                .to_digit(16)
                .map(|v| v as u8)
                .ok_or(HexError::InvalidDigit { digit, position })
        })
        .collect()
}

/// All bits of a hex string, four per digit, most significant first
pub(super) fn parse_bits(hex: &str) -> Result<Vec<bool>, HexError> {
    let digits = parse_digits(hex)?;
    let mut bits = Vec::with_capacity(digits.len() * 4);
    for digit in digits {
        bits.extend((0..4).rev().map(|i| digit & (1 << i) != 0));
    }
    Ok(bits)
}

/// Re-size a big-endian bit string to `width` bits.
///
/// Shorter input is zero-extended on the left. Longer input may only drop
/// leading zeros.
pub(super) fn fit_width(mut bits: Vec<bool>, width: usize) -> Result<Vec<bool>, HexError> {
    if bits.len() >= width {
        let excess = bits.len() - width;
        if bits[..excess].iter().any(|&b| b) {
            return Err(HexError::Overflow { width });
        }
        bits.drain(..excess);
        Ok(bits)
    } else {
        let mut padded = vec![false; width - bits.len()];
        padded.append(&mut bits);
        Ok(padded)
    }
}
