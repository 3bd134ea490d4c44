//! # Duplicates Module
//!
//! Finds images in a directory that share an identical fingerprint.
//!
//! ## How It Works
//! 1. List image files with the scanner (sorted, non-recursive)
//! 2. Hash them in parallel using rayon
//! 3. Bucket paths by fingerprint; buckets with two or more paths are groups
//!
//! Files that cannot be decoded are logged and reported, never fatal.

use crate::core::fingerprint::ImageHash;
use crate::core::hasher::HashAlgorithm;
use crate::core::scanner::list_images;
use crate::error::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Images sharing one fingerprint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// The shared fingerprint
    pub hash: ImageHash,
    /// Members in path order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Members beyond the first
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// A file that was listed but could not be hashed
#[derive(Debug, Clone, Serialize)]
pub struct HashFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of [`find_identical`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicateReport {
    /// Groups of two or more, ordered by their first path
    pub groups: Vec<DuplicateGroup>,
    /// Image files found in the directory
    pub total_images: usize,
    /// Files hashed successfully
    pub hashed: usize,
    pub failures: Vec<HashFailure>,
    /// Non-fatal listing errors
    pub scan_errors: Vec<String>,
}

/// Group the images in `dir` by identical fingerprint
pub fn find_identical(dir: &Path, hasher: &dyn HashAlgorithm) -> Result<DuplicateReport> {
    find_identical_with_progress(dir, hasher, |_, _| {})
}

/// Like [`find_identical`], calling `on_progress(completed, total)` after each file
pub fn find_identical_with_progress<F>(
    dir: &Path,
    hasher: &dyn HashAlgorithm,
    on_progress: F,
) -> Result<DuplicateReport>
where
    F: Fn(usize, usize) + Sync,
{
    let scan = list_images(dir)?;
    let total = scan.images.len();
    tracing::debug!(
        "Hashing {} images in {} with {}",
        total,
        dir.display(),
        hasher.kind()
    );

    let completed = AtomicUsize::new(0);

    let results: Vec<(PathBuf, std::result::Result<ImageHash, String>)> = scan
        .images
        .into_par_iter()
        .map(|path| {
            let result = hasher.hash_file(&path).map_err(|e| {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                e.to_string()
            });
            on_progress(completed.fetch_add(1, Ordering::SeqCst) + 1, total);
            (path, result)
        })
        .collect();

    let mut hashes = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(hash) => hashes.push((path, hash)),
            Err(message) => failures.push(HashFailure { path, message }),
        }
    }

    let hashed = hashes.len();
    let groups = group_identical(hashes);
    tracing::debug!("Found {} groups of identical images", groups.len());

    Ok(DuplicateReport {
        groups,
        total_images: total,
        hashed,
        failures,
        scan_errors: scan.errors.iter().map(|e| e.to_string()).collect(),
    })
}

/// Bucket `(path, hash)` pairs by hash, keeping buckets with two or more paths.
///
/// Paths keep their input order within a group; groups are ordered by
/// their first path.
pub fn group_identical(hashes: Vec<(PathBuf, ImageHash)>) -> Vec<DuplicateGroup> {
    let mut buckets: HashMap<ImageHash, Vec<PathBuf>> = HashMap::new();
    for (path, hash) in hashes {
        buckets.entry(hash).or_default().push(path);
    }

    let mut groups: Vec<DuplicateGroup> = buckets
        .into_iter()
        .filter(|(_, paths)| paths.len() >= 2)
        .map(|(hash, paths)| DuplicateGroup { hash, paths })
        .collect();

    groups.sort_by(|a, b| a.paths.first().cmp(&b.paths.first()));
    groups
}
