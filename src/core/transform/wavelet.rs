//! Orthogonal 2D discrete wavelet transform with periodic extension.
//!
//! Every level halves both dimensions exactly, so a `2^k x 2^k` input
//! decomposed `j` times leaves a `2^(k-j) x 2^(k-j)` approximation band for
//! every supported family.

use super::{Matrix, WaveletProvider};
use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

/// Daubechies-4 scaling filter (8 taps)
const DB4: [f64; 8] = [
    0.230_377_813_308_855_23,
    0.714_846_570_552_541_5,
    0.630_880_767_929_590_4,
    -0.027_983_769_416_983_85,
    -0.187_034_811_718_881_14,
    0.030_841_381_835_986_965,
    0.032_883_011_666_982_945,
    -0.010_597_401_784_997_278,
];

const HAAR: [f64; 2] = [FRAC_1_SQRT_2, FRAC_1_SQRT_2];

/// Supported wavelet families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Wavelet {
    #[default]
    Haar,
    Daubechies4,
}

impl Wavelet {
    fn scaling_filter(&self) -> &'static [f64] {
        match self {
            Wavelet::Haar => &HAAR,
            Wavelet::Daubechies4 => &DB4,
        }
    }

    /// Quadrature mirror of the scaling filter
    fn wavelet_filter(&self) -> Vec<f64> {
        let h = self.scaling_filter();
        let len = h.len();
        (0..len)
            .map(|n| {
                let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
                sign * h[len - 1 - n]
            })
            .collect()
    }
}

impl fmt::Display for Wavelet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wavelet::Haar => write!(f, "haar"),
            Wavelet::Daubechies4 => write!(f, "db4"),
        }
    }
}

/// Output of a multi-level decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletCoeffs {
    /// Lowest-frequency (LL) band of the deepest level
    pub approximation: Matrix,
    /// `[horizontal, vertical, diagonal]` detail bands, coarsest level first
    pub details: Vec<[Matrix; 3]>,
}

impl WaveletCoeffs {
    pub fn levels(&self) -> usize {
        self.details.len()
    }
}

/// [`WaveletProvider`] using periodic boundary handling
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodicDwt;

impl WaveletProvider for PeriodicDwt {
    fn decompose(
        &self,
        input: &Matrix,
        wavelet: Wavelet,
        level: u32,
    ) -> Result<WaveletCoeffs, HashError> {
        let mut approximation = input.clone();
        let mut details = Vec::with_capacity(level as usize);

        for _ in 0..level {
            let (rows, cols) = approximation.shape();
            if rows < 2 || cols < 2 || rows % 2 != 0 || cols % 2 != 0 {
                return Err(HashError::ComputationFailed(format!(
                    "cannot decompose a {}x{} band further",
                    rows, cols
                )));
            }

            let (ll, bands) = dwt2(&approximation, wavelet);
            approximation = ll;
            details.push(bands);
        }

        // coarsest level first
        details.reverse();
        Ok(WaveletCoeffs {
            approximation,
            details,
        })
    }

    fn reconstruct(&self, coeffs: &WaveletCoeffs, wavelet: Wavelet) -> Result<Matrix, HashError> {
        let mut current = coeffs.approximation.clone();

        for [horizontal, vertical, diagonal] in &coeffs.details {
            let shape = current.shape();
            if [horizontal, vertical, diagonal].iter().any(|b| b.shape() != shape) {
                return Err(HashError::ComputationFailed(format!(
                    "detail bands do not match a {}x{} approximation",
                    shape.0, shape.1
                )));
            }
            current = idwt2(&current, horizontal, vertical, diagonal, wavelet);
        }

        Ok(current)
    }
}

/// One analysis step on a signal of even length
fn dwt1(signal: &[f64], h: &[f64], g: &[f64], approx: &mut [f64], detail: &mut [f64]) {
    let n = signal.len();
    for k in 0..n / 2 {
        let mut a = 0.0;
        let mut d = 0.0;
        for (tap, (&hv, &gv)) in h.iter().zip(g).enumerate() {
            let x = signal[(2 * k + tap) % n];
            a += hv * x;
            d += gv * x;
        }
        approx[k] = a;
        detail[k] = d;
    }
}

/// Transpose of [`dwt1`], which is its inverse for orthogonal filters
fn idwt1(approx: &[f64], detail: &[f64], h: &[f64], g: &[f64], signal: &mut [f64]) {
    let n = signal.len();
    signal.fill(0.0);
    for k in 0..approx.len() {
        for (tap, (&hv, &gv)) in h.iter().zip(g).enumerate() {
            signal[(2 * k + tap) % n] += hv * approx[k] + gv * detail[k];
        }
    }
}

/// Split every row into its low and high halves
fn analyze_rows(input: &Matrix, h: &[f64], g: &[f64]) -> (Matrix, Matrix) {
    let (rows, cols) = input.shape();
    let half = cols / 2;
    let mut low = Vec::with_capacity(rows * half);
    let mut high = Vec::with_capacity(rows * half);
    let mut a = vec![0.0; half];
    let mut d = vec![0.0; half];

    for r in 0..rows {
        dwt1(input.row(r), h, g, &mut a, &mut d);
        low.extend_from_slice(&a);
        high.extend_from_slice(&d);
    }

    (
        Matrix { rows, cols: half, data: low },
        Matrix { rows, cols: half, data: high },
    )
}

fn synthesize_rows(low: &Matrix, high: &Matrix, h: &[f64], g: &[f64]) -> Matrix {
    let (rows, half) = low.shape();
    let cols = half * 2;
    let mut data = Vec::with_capacity(rows * cols);
    let mut signal = vec![0.0; cols];

    for r in 0..rows {
        idwt1(low.row(r), high.row(r), h, g, &mut signal);
        data.extend_from_slice(&signal);
    }

    Matrix { rows, cols, data }
}

fn dwt2(input: &Matrix, wavelet: Wavelet) -> (Matrix, [Matrix; 3]) {
    let h = wavelet.scaling_filter();
    let g = wavelet.wavelet_filter();

    let (low, high) = analyze_rows(input, h, &g);
    let (ll, lh) = analyze_rows(&low.transpose(), h, &g);
    let (hl, hh) = analyze_rows(&high.transpose(), h, &g);

    (
        ll.transpose(),
        [lh.transpose(), hl.transpose(), hh.transpose()],
    )
}

fn idwt2(
    ll: &Matrix,
    lh: &Matrix,
    hl: &Matrix,
    hh: &Matrix,
    wavelet: Wavelet,
) -> Matrix {
    let h = wavelet.scaling_filter();
    let g = wavelet.wavelet_filter();

    let low = synthesize_rows(&ll.transpose(), &lh.transpose(), h, &g).transpose();
    let high = synthesize_rows(&hl.transpose(), &hh.transpose(), h, &g).transpose();
    synthesize_rows(&low, &high, h, &g)
}
