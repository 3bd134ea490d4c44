//! # Error Module
//!
//! Error types for fingerprint computation, comparison and serialization.
//!
//! ## Design Principles
//! - **Fail fast** - invalid parameters are rejected before any pixel work
//! - **Include context** - the offending value, shape or path
//! - **No silent downgrades** - shape mismatches and absent operands are errors

use std::path::PathBuf;
use thiserror::Error;

/// Top-level library error
#[derive(Error, Debug)]
pub enum ImageHashError {
    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Hex decoding error: {0}")]
    Hex(#[from] HexError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(String),
}

/// Errors that occur while computing a fingerprint
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Hash size must be greater than or equal to 2, got {size}")]
    InvalidHashSize { size: u32 },

    #[error("{name} is not power of 2: {value}")]
    NotPowerOfTwo { name: &'static str, value: u32 },

    #[error("hash_size in a wrong range: {hash_size} exceeds image scale {image_scale}")]
    LevelOutOfRange { hash_size: u32, image_scale: u32 },

    #[error("binbits must be between 1 and 32, got {binbits}")]
    InvalidBinBits { binbits: i32 },

    #[error("highfreq_factor must be positive, got {factor}")]
    InvalidHighFreqFactor { factor: u32 },

    #[error("hash_size {hash_size} times highfreq_factor {factor} does not fit in 32 bits")]
    SampleSizeOverflow { hash_size: u32, factor: u32 },

    #[error("Frame count must be at least 1, got {frames}")]
    InvalidFrameCount { frames: usize },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Color management failed: {0}")]
    ColorManagement(String),

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),
}

/// Errors that occur when comparing two fingerprints
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("ImageHashes must be of the same shape: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Other hash must not be absent")]
    MissingHash,
}

/// Errors that occur when decoding a hex fingerprint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("Hex string is empty")]
    Empty,

    #[error("Invalid hex digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },

    #[error("Expected hex string size of {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Hex string of {bits} bits is too small for a {hash_size}x{hash_size} hash")]
    TooSmall { bits: usize, hash_size: usize },

    #[error("Hex value does not fit in {width} bits")]
    Overflow { width: usize },

    #[error("Invalid hash size for hex decoding: {size}")]
    InvalidHashSize { size: usize },

    #[error("Invalid hash shape {rows}x{cols}")]
    InvalidShape { rows: usize, cols: usize },
}

/// Errors that occur while listing image files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ImageHashError>;
