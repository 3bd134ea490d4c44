//! # Transform Module
//!
//! Numeric building blocks shared by the hash pipelines.
//!
//! - [`Matrix`] - dense row-major `f64` matrix
//! - [`Statistic`] - threshold statistics (mean, median or a custom function)
//! - [`DctProvider`] - DCT-II capability, default [`RustDct`]
//! - [`WaveletProvider`] - 2D wavelet decomposition/reconstruction,
//!   default [`PeriodicDwt`]
//!
//! Providers are injected into the hashers behind `Arc<dyn ...>`, so another
//! backend can be swapped in without touching the pipelines.

mod dct;
mod wavelet;

pub use dct::RustDct;
pub use wavelet::{PeriodicDwt, Wavelet, WaveletCoeffs};

use crate::error::HashError;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Dense row-major matrix of `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from row-major data
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, HashError> {
        if data.len() != rows * cols {
            return Err(HashError::ComputationFailed(format!(
                "{} values do not fill a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Pixel values of a grayscale image, each multiplied by `scale`
    pub fn from_gray(image: &GrayImage, scale: f64) -> Self {
        Self {
            rows: image.height() as usize,
            cols: image.width() as usize,
            data: image.as_raw().iter().map(|&p| p as f64 * scale).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| self.get(c, r))
    }

    /// Copy of the `rows x cols` block starting at `(row, col)`
    pub fn block(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<Self, HashError> {
        if row + rows > self.rows || col + cols > self.cols {
            return Err(HashError::ComputationFailed(format!(
                "block {}x{} at ({}, {}) exceeds {}x{} matrix",
                rows, cols, row, col, self.rows, self.cols
            )));
        }
        Ok(Self::from_fn(rows, cols, |r, c| self.get(row + r, col + c)))
    }

    /// Apply `f` to every row in place
    pub fn for_each_row_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut [f64]),
    {
        if self.cols == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(self.cols) {
            f(row);
        }
    }
}

/// Statistic used as a threshold when turning coefficients into bits
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum Statistic {
    /// Arithmetic mean
    #[default]
    Mean,
    /// Median, averaging the two middle values for even counts
    Median,
    /// Caller-supplied reduction over the pixel values. Not serializable.
    #[serde(skip)]
    Custom(fn(&[f64]) -> f64),
}

impl Statistic {
    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Statistic::Mean => mean(values),
            Statistic::Median => median(values),
            Statistic::Custom(reduce) => reduce(values),
        }
    }
}

/// Custom statistics compare by function address
impl PartialEq for Statistic {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Statistic::Mean, Statistic::Mean) | (Statistic::Median, Statistic::Median) => true,
            (Statistic::Custom(a), Statistic::Custom(b)) => *a as usize == *b as usize,
            _ => false,
        }
    }
}

impl Eq for Statistic {}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median, 0 for an empty slice
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Discrete cosine transform capability
pub trait DctProvider: Send + Sync {
    /// Unnormalized DCT-II of every row
    fn dct_rows(&self, input: &Matrix) -> Matrix;

    /// Separable 2D DCT-II: along columns, then along rows
    fn dct_2d(&self, input: &Matrix) -> Matrix {
        let columns = self.dct_rows(&input.transpose()).transpose();
        self.dct_rows(&columns)
    }
}

/// 2D discrete wavelet transform capability
pub trait WaveletProvider: Send + Sync {
    /// Multi-level decomposition. `level == 0` returns the input as the
    /// approximation with no detail bands.
    fn decompose(
        &self,
        input: &Matrix,
        wavelet: Wavelet,
        level: u32,
    ) -> Result<WaveletCoeffs, HashError>;

    /// Inverse of [`decompose`](Self::decompose)
    fn reconstruct(&self, coeffs: &WaveletCoeffs, wavelet: Wavelet) -> Result<Matrix, HashError>;
}
