//! Multi-frame hashing.
//!
//! An animation is fingerprinted by sampling evenly spaced frames, hashing
//! each with the same algorithm and stacking the bit matrices row-wise, so a
//! `frames x (n x n)` sample becomes a `(frames * n) x n` hash.

use super::traits::HashAlgorithm;
use crate::core::fingerprint::ImageHash;
use crate::error::HashError;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default number of frames sampled from an animation
pub const DEFAULT_FRAME_COUNT: usize = 8;

/// Indices of `count` frames spread evenly over `total`, first and last included.
///
/// Every frame is used when the animation is shorter than `count`.
pub fn sample_frames(total: usize, count: usize) -> Result<Vec<usize>, HashError> {
    if count < 1 {
        return Err(HashError::InvalidFrameCount { frames: count });
    }

    let indices = match (total, count) {
        (0, _) => Vec::new(),
        (_, 1) => vec![0],
        (t, c) if t <= c => (0..t).collect(),
        (t, c) => (0..c).map(|i| i * (t - 1) / (c - 1)).collect(),
    };
    Ok(indices)
}

/// Hash every frame and stack the results
pub fn hash_frames(
    hasher: &dyn HashAlgorithm,
    frames: &[DynamicImage],
) -> Result<ImageHash, HashError> {
    if frames.is_empty() {
        return Err(HashError::InvalidFrameCount { frames: 0 });
    }

    let hashes = frames
        .iter()
        .map(|frame| hasher.hash_image(frame))
        .collect::<Result<Vec<_>, _>>()?;

    ImageHash::stack(&hashes).map_err(|e| HashError::ComputationFailed(e.to_string()))
}

/// Hash `count` evenly spaced frames of an animated GIF
pub fn hash_animation(
    hasher: &dyn HashAlgorithm,
    path: &Path,
    count: usize,
) -> Result<ImageHash, HashError> {
    if count < 1 {
        return Err(HashError::InvalidFrameCount { frames: count });
    }

    let file = File::open(path).map_err(|e| HashError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let decode_error = |e: image::ImageError| HashError::DecodeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let decoder = GifDecoder::new(BufReader::new(file)).map_err(decode_error)?;
    let frames = decoder.into_frames().collect_frames().map_err(decode_error)?;
    if frames.is_empty() {
        return Err(HashError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    let indices = sample_frames(frames.len(), count)?;
    tracing::debug!(
        "Hashing {} of {} frames from {}",
        indices.len(),
        frames.len(),
        path.display()
    );

    let mut frames: Vec<Option<_>> = frames.into_iter().map(Some).collect();
    let selected: Vec<DynamicImage> = indices
        .iter()
        .filter_map(|&i| frames[i].take())
        .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()))
        .collect();

    hash_frames(hasher, &selected)
}
