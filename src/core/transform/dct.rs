//! DCT-II backed by `rustdct`.

use super::{DctProvider, Matrix};
use rustdct::DctPlanner;

/// [`DctProvider`] using the `rustdct` planner.
///
/// Output is unnormalized (no `2x` factor, no orthonormal scaling). The hash
/// pipelines only compare coefficients against a statistic of the same block,
/// so a positive overall scale does not change any bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustDct;

impl DctProvider for RustDct {
    fn dct_rows(&self, input: &Matrix) -> Matrix {
        let mut output = input.clone();
        if input.cols() == 0 {
            return output;
        }

        let dct = DctPlanner::<f64>::new().plan_dct2(input.cols());
        output.for_each_row_mut(|row| dct.process_dct2(row));
        output
    }
}
