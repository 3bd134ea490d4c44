//! # Color Module
//!
//! Color-space handling for the color hash.
//!
//! - [`ColorManager`] - converts pixels tagged with an ICC profile to sRGB,
//!   default [`QcmsColorManager`]
//! - [`HsvPlanes`] - 8-bit hue/saturation/value planes of an RGB image

use crate::error::HashError;
use image::RgbImage;

/// ICC color-management capability
pub trait ColorManager: Send + Sync {
    /// Convert pixels described by `profile` into sRGB using the
    /// perceptual rendering intent
    fn to_srgb(&self, image: &RgbImage, profile: &[u8]) -> Result<RgbImage, HashError>;
}

/// [`ColorManager`] backed by `qcms`
#[derive(Debug, Clone, Copy, Default)]
pub struct QcmsColorManager;

impl ColorManager for QcmsColorManager {
    fn to_srgb(&self, image: &RgbImage, profile: &[u8]) -> Result<RgbImage, HashError> {
        let source = qcms::Profile::new_from_slice(profile, false).ok_or_else(|| {
            HashError::ColorManagement(format!("unreadable ICC profile ({} bytes)", profile.len()))
        })?;

        let mut srgb = qcms::Profile::new_sRGB();
        srgb.precache_output_transform();

        let transform = qcms::Transform::new(
            &source,
            &srgb,
            qcms::DataType::RGB8,
            qcms::Intent::Perceptual,
        )
        .ok_or_else(|| {
            HashError::ColorManagement("ICC profile cannot be converted to sRGB".to_string())
        })?;

        let mut pixels = image.as_raw().clone();
        transform.apply(&mut pixels);

        RgbImage::from_raw(image.width(), image.height(), pixels).ok_or_else(|| {
            HashError::ColorManagement("converted buffer has the wrong size".to_string())
        })
    }
}

/// Hue, saturation and value planes, each scaled to `0..=255`, plus the
/// Rec. 601 intensity of every pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvPlanes {
    pub hue: Vec<u8>,
    pub saturation: Vec<u8>,
    pub value: Vec<u8>,
    pub intensity: Vec<u8>,
}

impl HsvPlanes {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let len = (image.width() * image.height()) as usize;
        let mut planes = Self {
            hue: Vec::with_capacity(len),
            saturation: Vec::with_capacity(len),
            value: Vec::with_capacity(len),
            intensity: Vec::with_capacity(len),
        };

        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            let (h, s, v) = rgb_to_hsv(r, g, b);
            planes.hue.push(h);
            planes.saturation.push(s);
            planes.value.push(v);
            planes.intensity.push(rec601_luma(r, g, b));
        }

        planes
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// ITU-R 601 luma in 16-bit fixed point, rounded
pub fn rec601_luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471;
    ((weighted + 0x8000) >> 16) as u8
}

/// 8-bit HSV, hue wrapped into `[0, 255)`
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return (0, 0, max);
    }

    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    let maxf = max as f64;
    let chroma = maxf - min as f64;

    let saturation = chroma / maxf;
    let rc = (maxf - rf) / chroma;
    let gc = (maxf - gf) / chroma;
    let bc = (maxf - bf) / chroma;

    let sector = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let hue = (sector * 255.0 / 6.0).rem_euclid(255.0);

    (clip8(hue), clip8(saturation * 255.0), max)
}

fn clip8(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
