//! # imagehash
//!
//! Perceptual image fingerprints: visually similar images get fingerprints
//! with a small Hamming distance.
//!
//! ## Algorithms
//! - Average hash, perceptual (DCT) hash, difference hash
//! - Wavelet hash (Haar or Daubechies-4)
//! - Color hash (hue/saturation histogram, ICC aware)
//!
//! ## Architecture
//! - `core` - fingerprints, transforms and hash pipelines
//! - `error` - error types
//!
//! ## Example
//! ```rust,ignore
//! use imagehash::core::hasher::{HashAlgorithmKind, HasherConfig};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Perceptual)
//!     .build()?;
//! let a = hasher.hash_file(Path::new("a.jpg"))?;
//! let b = hasher.hash_file(Path::new("b.jpg"))?;
//! println!("{} bits differ", a.distance(&b)?);
//! ```

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use crate::core::fingerprint::ImageHash;
pub use crate::core::hasher::{HashAlgorithm, HashAlgorithmKind, HasherConfig};
pub use error::{ImageHashError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Logs go to stderr;
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}
