//! # Scanner Module
//!
//! Lists image files in a directory.
//!
//! ## Supported Formats
//! - BMP (.bmp)
//! - GIF (.gif)
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//!
//! Only the directory itself is listed by default, not its subdirectories.
//!
//! ## Example
//! ```rust,ignore
//! use imagehash::core::scanner::{ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/Users/photos"))?;
//! ```

mod filter;
mod walker;

pub use filter::{ImageFilter, DEFAULT_EXTENSIONS};
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use std::path::{Path, PathBuf};

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files in path order
    pub images: Vec<PathBuf>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// List the image files directly inside `dir` with the default settings
pub fn list_images(dir: &Path) -> Result<ScanResult, ScanError> {
    WalkDirScanner::new(ScanConfig::default()).scan(dir)
}
