//! Power basis and design matrix construction.
//!
//! Column `k` of the design matrix is `x_i^powers[k]`. A power of zero is the
//! constant column `1` rather than `x^0`, so `x = 0` never goes through `0^0`.
//!
//! Powers are not validated here beyond their type: any requested power is
//! passed to the exponentiation, and whatever it produces (including
//! overflow to infinity for huge `x`) flows into the fit unchanged.

use nalgebra::{DMatrix, DVector};

/// Evaluate a single basis term `x^power`.
#[inline]
pub fn power_term(x: f64, power: u32) -> f64 {
    if power == 0 {
        1.0
    } else {
        x.powf(f64::from(power))
    }
}

/// Build the `n × m` design matrix for samples `x` and an ordered power set.
pub fn design_matrix(x: &[f64], powers: &[u32]) -> DMatrix<f64> {
    DMatrix::from_fn(x.len(), powers.len(), |i, k| power_term(x[i], powers[k]))
}

/// Build the `n × 1` response vector.
pub fn response_vector(y: &[f64]) -> DVector<f64> {
    DVector::from_column_slice(y)
}
