//! # Core Module
//!
//! The fingerprinting engine.
//!
//! ## Modules
//! - `fingerprint` - The bit-matrix fingerprint and its hex encodings
//! - `transform` - Matrices, DCT and wavelet transforms
//! - `color` - ICC conversion and HSV planes
//! - `hasher` - Decoding, resizing and the hash pipelines
//! - `scanner` - Lists image files in directories
//! - `duplicates` - Groups a directory by identical fingerprint

pub mod color;
pub mod duplicates;
pub mod fingerprint;
pub mod hasher;
pub mod scanner;
pub mod transform;

// Re-export commonly used types
pub use duplicates::{find_identical, DuplicateGroup, DuplicateReport};
pub use fingerprint::ImageHash;
pub use hasher::{HashAlgorithm, HashAlgorithmKind, HasherConfig, PixelSource, SourceImage};
