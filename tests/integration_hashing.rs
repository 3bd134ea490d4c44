//! Integration tests for the hash pipelines.
//!
//! These tests verify end-to-end hashing behavior including:
//! - File decoding paths (PNG, JPEG)
//! - Robustness to small rotations and re-encoding
//! - Hex and JSON persistence of fingerprints
//! - Parameter validation

use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use imagehash::core::hasher::{
    ColorHasher, HashAlgorithm, HashAlgorithmKind, HasherConfig, SourceImage, COLOR_BINS,
};
use imagehash::core::transform::Wavelet;
use imagehash::error::{CompareError, HashError};
use imagehash::ImageHash;
use std::path::Path;
use tempfile::TempDir;

/// Colorful image with structure at several scales
fn photo(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let fx = x as f64 / width as f64;
        let fy = y as f64 / height as f64;
        let wave = 60.0 * (fx * 5.0).sin() * (fy * 3.0).cos() + 45.0 * ((fx + fy) * 7.0).sin();
        let r = (128.0 + wave).clamp(0.0, 255.0) as u8;
        let g = (64.0 + 150.0 * fy).clamp(0.0, 255.0) as u8;
        let b = (200.0 - wave).clamp(0.0, 255.0) as u8;
        Rgb([r, g, b])
    })
}

/// Rotate about the center with bilinear sampling; edges are extended
fn rotate(image: &RgbImage, degrees: f64) -> RgbImage {
    let (w, h) = image.dimensions();
    let (cx, cy) = ((w as f64 - 1.0) / 2.0, (h as f64 - 1.0) / 2.0);
    let (sin, cos) = degrees.to_radians().sin_cos();

    let sample = |x: f64, y: f64, channel: usize| {
        let x = x.clamp(0.0, w as f64 - 1.0);
        let y = y.clamp(0.0, h as f64 - 1.0);
        let (x0, y0) = (x.floor() as u32, y.floor() as u32);
        let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
        let (tx, ty) = (x - x0 as f64, y - y0 as f64);
        let p = |px: u32, py: u32| image.get_pixel(px, py)[channel] as f64;
        let top = p(x0, y0) * (1.0 - tx) + p(x1, y0) * tx;
        let bottom = p(x0, y1) * (1.0 - tx) + p(x1, y1) * tx;
        top * (1.0 - ty) + bottom * ty
    };

    ImageBuffer::from_fn(w, h, |x, y| {
        let (dx, dy) = (x as f64 - cx, y as f64 - cy);
        let sx = cx + dx * cos + dy * sin;
        let sy = cy - dx * sin + dy * cos;
        Rgb([0, 1, 2].map(|c| sample(sx, sy, c).round() as u8))
    })
}

fn hasher(kind: HashAlgorithmKind) -> Box<dyn HashAlgorithm> {
    HasherConfig::new().algorithm(kind).build().unwrap()
}

fn save(dir: &Path, name: &str, image: &RgbImage) -> std::path::PathBuf {
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

#[test]
fn file_hash_matches_in_memory_hash() {
    let dir = TempDir::new().unwrap();
    let image = photo(160, 120);
    let path = save(dir.path(), "photo.png", &image);
    let decoded = DynamicImage::ImageRgb8(image);

    for kind in HashAlgorithmKind::ALL {
        let hasher = hasher(kind);
        let from_file = hasher.hash_file(&path).unwrap();
        let from_memory = hasher.hash_image(&decoded).unwrap();
        assert_eq!(from_file, from_memory, "{}", kind);
    }
}

#[test]
fn square_hashes_survive_hex_round_trip() {
    let image = DynamicImage::ImageRgb8(photo(200, 200));

    for kind in HashAlgorithmKind::ALL.into_iter().filter(|k| k.is_square()) {
        let hash = hasher(kind).hash_image(&image).unwrap();
        let parsed: ImageHash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash, "{}", kind);
        assert_eq!(parsed.shape(), (8, 8));
    }
}

#[test]
fn color_hash_survives_flat_hex_round_trip() {
    let image = DynamicImage::ImageRgb8(photo(200, 200));
    let hash = hasher(HashAlgorithmKind::Color).hash_image(&image).unwrap();

    let parsed = ImageHash::from_flat_hex(&hash.to_hex(), COLOR_BINS * 3).unwrap();
    assert_eq!(parsed, hash);
}

#[test]
fn fingerprints_serialize_as_json() {
    let image = DynamicImage::ImageRgb8(photo(120, 120));
    let hash = hasher(HashAlgorithmKind::Perceptual).hash_image(&image).unwrap();

    let json = serde_json::to_string(&hash).unwrap();
    let restored: ImageHash = serde_json::from_str(&json).unwrap();

    assert!(json.contains(&hash.to_hex()));
    assert_eq!(restored, hash);
    assert_eq!(restored.shape(), hash.shape());
}

#[test]
fn small_rotation_keeps_hashes_close() {
    let original = photo(256, 256);
    let rotated = DynamicImage::ImageRgb8(rotate(&original, 1.0));
    let original = DynamicImage::ImageRgb8(original);

    for kind in [
        HashAlgorithmKind::Average,
        HashAlgorithmKind::Difference,
        HashAlgorithmKind::Wavelet,
        HashAlgorithmKind::Color,
    ] {
        let hasher = hasher(kind);
        let distance = hasher
            .hash_image(&original)
            .unwrap()
            .distance(&hasher.hash_image(&rotated).unwrap())
            .unwrap();
        assert!(distance <= 10, "{}: distance {}", kind, distance);
    }
}

#[test]
fn larger_rotation_moves_average_hash_further() {
    let original = photo(256, 256);
    let hasher = hasher(HashAlgorithmKind::Average);
    let base = hasher
        .hash_image(&DynamicImage::ImageRgb8(original.clone()))
        .unwrap();

    let near = hasher
        .hash_image(&DynamicImage::ImageRgb8(rotate(&original, 1.0)))
        .unwrap();
    let far = hasher
        .hash_image(&DynamicImage::ImageRgb8(rotate(&original, 45.0)))
        .unwrap();

    assert!(base.distance(&near).unwrap() < base.distance(&far).unwrap());
}

#[test]
fn jpeg_reencoding_keeps_perceptual_hash_close() {
    let dir = TempDir::new().unwrap();
    let image = photo(240, 180);
    let png = save(dir.path(), "photo.png", &image);
    let jpg = save(dir.path(), "photo.jpg", &image);

    let hasher = hasher(HashAlgorithmKind::Perceptual);
    let distance = hasher
        .hash_file(&png)
        .unwrap()
        .distance(&hasher.hash_file(&jpg).unwrap())
        .unwrap();

    assert!(distance <= 10, "distance {}", distance);
}

#[test]
fn wavelet_families_share_shape() {
    let image = DynamicImage::ImageRgb8(photo(300, 200));

    for wavelet in [Wavelet::Haar, Wavelet::Daubechies4] {
        let hash = HasherConfig::new()
            .algorithm(HashAlgorithmKind::Wavelet)
            .wavelet(wavelet)
            .hash_size(16)
            .build()
            .unwrap()
            .hash_image(&image)
            .unwrap();
        assert_eq!(hash.shape(), (16, 16));
    }
}

#[test]
fn different_sizes_cannot_be_compared() {
    let image = DynamicImage::ImageRgb8(photo(100, 100));
    let small = HasherConfig::new().hash_size(8).build().unwrap();
    let large = HasherConfig::new().hash_size(16).build().unwrap();

    let result = small
        .hash_image(&image)
        .unwrap()
        .distance(&large.hash_image(&image).unwrap());

    assert!(matches!(result, Err(CompareError::ShapeMismatch { .. })));
}

#[test]
fn invalid_parameters_fail_before_hashing() {
    for kind in [
        HashAlgorithmKind::Average,
        HashAlgorithmKind::Perceptual,
        HashAlgorithmKind::Difference,
    ] {
        for size in [0, 1] {
            let result = HasherConfig::new().algorithm(kind).hash_size(size).build();
            assert!(
                matches!(result, Err(HashError::InvalidHashSize { .. })),
                "{} accepted size {}",
                kind,
                size
            );
        }
    }

    for binbits in [-1, 0] {
        assert!(matches!(
            ColorHasher::new(binbits),
            Err(HashError::InvalidBinBits { .. })
        ));
    }
}

#[test]
fn color_hash_ignores_unusable_profile_when_asked() {
    let image = DynamicImage::ImageRgb8(photo(64, 64));
    let tagged = SourceImage::with_profile(image.clone(), Some(b"not an icc profile".to_vec()));

    let honoring = ColorHasher::new(3).unwrap();
    assert!(matches!(
        honoring.hash_image(&tagged),
        Err(HashError::ColorManagement(_))
    ));

    let ignoring = ColorHasher::new(3).unwrap().with_ignore_icc(true);
    assert_eq!(
        ignoring.hash_image(&tagged).unwrap(),
        ignoring.hash_image(&image).unwrap()
    );
}
