//! Color Hash implementation.
//!
//! Color hash summarizes the color distribution instead of the luminance
//! layout, which makes it robust to rotation and other geometry changes:
//! 1. Optionally converting ICC-tagged pixels to sRGB
//! 2. Splitting pixels into black, gray, faint-color and bright-color groups,
//!    black by Rec. 601 intensity
//! 3. Histogramming the hues of each color group into 6 bins
//! 4. Quantizing the 14 fractions to `binbits` bits each, MSB first
//!
//! The result has shape `14 x binbits` and is stored with
//! [`ImageHash::from_flat_hex`].

use super::super::source::PixelSource;
use super::super::traits::{HashAlgorithm, HashAlgorithmKind};
use crate::core::color::{ColorManager, HsvPlanes, QcmsColorManager};
use crate::core::fingerprint::ImageHash;
use crate::error::HashError;
use std::sync::Arc;

/// Number of fractions in a color hash: black, gray, 6 faint hues, 6 bright hues
pub const COLOR_BINS: usize = 14;

const HUE_BINS: usize = 6;
/// Intensity below 1/8 of the range
const BLACK_INTENSITY: u8 = 32;
/// Saturation below 1/3 of the range
const GRAY_SATURATION: u8 = 85;
/// Saturation below 2/3 of the range
const FAINT_SATURATION: u8 = 170;

const MAX_BINBITS: i32 = 32;

/// Color Hash implementation
#[derive(Clone)]
pub struct ColorHasher {
    binbits: u32,
    ignore_icc: bool,
    color_manager: Arc<dyn ColorManager>,
}

impl ColorHasher {
    /// Create a new color hasher with `binbits` bits per fraction
    pub fn new(binbits: i32) -> Result<Self, HashError> {
        if binbits <= 0 || binbits > MAX_BINBITS {
            return Err(HashError::InvalidBinBits { binbits });
        }
        Ok(Self {
            binbits: binbits as u32,
            ignore_icc: false,
            color_manager: Arc::new(QcmsColorManager),
        })
    }

    /// Hash the stored pixel values even when a profile is embedded
    pub fn with_ignore_icc(mut self, ignore_icc: bool) -> Self {
        self.ignore_icc = ignore_icc;
        self
    }

    pub fn with_color_manager(mut self, color_manager: Arc<dyn ColorManager>) -> Self {
        self.color_manager = color_manager;
        self
    }

    /// HSV and intensity planes, color-managed when a profile applies
    fn planes(&self, image: &dyn PixelSource) -> Result<HsvPlanes, HashError> {
        match image.icc_profile() {
            Some(profile) if !self.ignore_icc => {
                let srgb = self.color_manager.to_srgb(&image.rgb(), profile)?;
                Ok(HsvPlanes::from_rgb(&srgb))
            }
            _ => Ok(image.hsv()),
        }
    }

    /// `min(2^binbits - 1, floor(count * 2^binbits / total))`
    fn quantize(&self, count: usize, total: usize) -> u64 {
        let levels = 1u128 << self.binbits;
        let value = (count as u128 * levels) / total.max(1) as u128;
        value.min(levels - 1) as u64
    }
}

impl HashAlgorithm for ColorHasher {
    fn hash_image(&self, image: &dyn PixelSource) -> Result<ImageHash, HashError> {
        let hsv = self.planes(image)?;
        let total = hsv.len();
        if total == 0 {
            return Err(HashError::EmptyImage {
                path: "<memory>".into(),
            });
        }

        let mut black = 0usize;
        let mut gray = 0usize;
        let mut faint = [0usize; HUE_BINS];
        let mut bright = [0usize; HUE_BINS];

        for (i, &luma) in hsv.intensity.iter().enumerate() {
            let saturation = hsv.saturation[i];
            if luma < BLACK_INTENSITY {
                black += 1;
            } else if saturation < GRAY_SATURATION {
                gray += 1;
            } else {
                // equal-width bins over 0..=255, last bin closed
                let bin = (hsv.hue[i] as usize * HUE_BINS / 255).min(HUE_BINS - 1);
                if saturation < FAINT_SATURATION {
                    faint[bin] += 1;
                } else {
                    bright[bin] += 1;
                }
            }
        }

        let colored = total - black - gray;
        let mut values = Vec::with_capacity(COLOR_BINS);
        values.push(self.quantize(black, total));
        values.push(self.quantize(gray, total));
        values.extend(faint.iter().map(|&n| self.quantize(n, colored)));
        values.extend(bright.iter().map(|&n| self.quantize(n, colored)));

        tracing::trace!(black, gray, colored, "computed color histogram");

        let width = self.binbits as usize;
        Ok(ImageHash::from_fn(COLOR_BINS, width, |r, c| {
            (values[r] >> (width - 1 - c)) & 1 == 1
        }))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Color
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::source::SourceImage;
    use super::super::test_images::{pattern, solid};
    use super::*;
    use crate::core::color::test_profiles::{srgb_like, swapped_red_blue};
    use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};

    /// Swaps red and blue for one particular profile
    struct SwappingManager;

    impl ColorManager for SwappingManager {
        fn to_srgb(&self, image: &RgbImage, profile: &[u8]) -> Result<RgbImage, HashError> {
            if profile != b"swap" {
                return Ok(image.clone());
            }
            Ok(ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
                let [r, g, b] = image.get_pixel(x, y).0;
                Rgb([b, g, r])
            }))
        }
    }

    fn half_and_half(left: Rgb<u8>, right: Rgb<u8>) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(40, 20, |x, _| {
            if x < 20 {
                left
            } else {
                right
            }
        }))
    }

    fn row_value(hash: &ImageHash, row: usize) -> u32 {
        (0..hash.cols()).fold(0, |acc, c| (acc << 1) | hash.get(row, c).unwrap_or(false) as u32)
    }

    #[test]
    fn hash_shape_follows_binbits() {
        for binbits in 1..=5 {
            let hash = ColorHasher::new(binbits)
                .unwrap()
                .hash_image(&pattern(64, 48))
                .unwrap();
            assert_eq!(hash.shape(), (COLOR_BINS, binbits as usize));
        }
    }

    #[test]
    fn saturated_red_fills_first_bright_bin() {
        let hash = ColorHasher::new(3)
            .unwrap()
            .hash_image(&solid(255, 0, 0))
            .unwrap();

        assert_eq!(row_value(&hash, 8), 7);
        assert_eq!(hash.count_ones(), 3);
    }

    #[test]
    fn black_image_has_no_colors() {
        let hash = ColorHasher::new(3)
            .unwrap()
            .hash_image(&solid(0, 0, 0))
            .unwrap();

        assert_eq!(row_value(&hash, 0), 7);
        assert_eq!(hash.count_ones(), 3);
    }

    #[test]
    fn fractions_are_floored() {
        let image = half_and_half(Rgb([0, 0, 0]), Rgb([128, 128, 128]));
        let hash = ColorHasher::new(3).unwrap().hash_image(&image).unwrap();

        // 0.5 * 8 = 4 = 0b100 for both black and gray
        assert_eq!(row_value(&hash, 0), 4);
        assert_eq!(row_value(&hash, 1), 4);
        assert_eq!(hash.count_ones(), 2);
    }

    #[test]
    fn rotation_by_half_turn_is_invisible() {
        let hasher = ColorHasher::new(3).unwrap();
        let image = pattern(80, 60);
        let rotated = DynamicImage::ImageRgb8(image::imageops::rotate180(&image.to_rgb8()));

        let hash1 = hasher.hash_image(&image).unwrap();
        let hash2 = hasher.hash_image(&rotated).unwrap();

        assert_eq!(hash1.distance(&hash2).unwrap(), 0);
    }

    #[test]
    fn icc_profile_changes_hash_unless_ignored() {
        let image = half_and_half(Rgb([255, 0, 0]), Rgb([255, 0, 0]));
        let plain = SourceImage::with_profile(image.clone(), Some(b"keep".to_vec()));
        let swapped = SourceImage::with_profile(image, Some(b"swap".to_vec()));

        let honoring = ColorHasher::new(3)
            .unwrap()
            .with_color_manager(Arc::new(SwappingManager));
        assert_ne!(
            honoring.hash_image(&plain).unwrap(),
            honoring.hash_image(&swapped).unwrap()
        );

        let ignoring = honoring.with_ignore_icc(true);
        assert_eq!(
            ignoring.hash_image(&plain).unwrap(),
            ignoring.hash_image(&swapped).unwrap()
        );
    }

    #[test]
    fn embedded_icc_profile_is_applied_by_qcms() {
        let image = half_and_half(Rgb([255, 0, 0]), Rgb([0, 255, 0]));
        let tagged = SourceImage::with_profile(image.clone(), Some(srgb_like()));
        let swapped = SourceImage::with_profile(image.clone(), Some(swapped_red_blue()));

        let honoring = ColorHasher::new(3).unwrap();
        let tagged_hash = honoring.hash_image(&tagged).unwrap();
        let swapped_hash = honoring.hash_image(&swapped).unwrap();
        assert_ne!(tagged_hash, swapped_hash);
        // red hues sit in the first and last bright bins
        let reds = |hash: &ImageHash| row_value(hash, 8) + row_value(hash, 13);
        assert!(reds(&tagged_hash) > 0);
        assert_eq!(reds(&swapped_hash), 0);

        let ignoring = ColorHasher::new(3).unwrap().with_ignore_icc(true);
        let plain = ignoring.hash_image(&image).unwrap();
        assert_eq!(ignoring.hash_image(&tagged).unwrap(), plain);
        assert_eq!(ignoring.hash_image(&swapped).unwrap(), plain);
    }

    #[test]
    fn dark_red_is_not_black() {
        // Rec. 709 luma would be 26, below the black cutoff
        let image = solid(120, 0, 0);
        let hash = ColorHasher::new(3).unwrap().hash_image(&image).unwrap();

        assert_eq!(row_value(&hash, 0), 0);
        assert_eq!(row_value(&hash, 8), 7);
    }

    #[test]
    fn invalid_binbits_are_rejected() {
        for binbits in [-1, 0, 33] {
            assert!(matches!(
                ColorHasher::new(binbits),
                Err(HashError::InvalidBinBits { .. })
            ));
        }
    }

    #[test]
    fn flat_hex_round_trip() {
        let hash = ColorHasher::new(4)
            .unwrap()
            .hash_image(&pattern(50, 50))
            .unwrap();
        let decoded = ImageHash::from_flat_hex(&hash.to_hex(), COLOR_BINS * 4).unwrap();

        assert_eq!(decoded, hash);
    }
}
