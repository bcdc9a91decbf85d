//! Reporting utilities: formula rendering, residuals, and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

pub mod format;
pub mod formula;

pub use format::*;
pub use formula::*;

use crate::error::RegressionResult;
use crate::models::PolynomialRegression;
use crate::models::polynomial::check_sample_shape;

/// Fitted value and residual for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleResidual {
    pub x: f64,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// Compute fitted values and residuals for each sample.
pub fn compute_residuals(
    x: &[f64],
    y: &[f64],
    model: &PolynomialRegression,
) -> RegressionResult<Vec<SampleResidual>> {
    check_sample_shape(x, y)?;
    let fitted = model.predict_many(x);
    Ok(x
        .iter()
        .zip(y)
        .zip(fitted)
        .map(|((&x, &y_obs), y_fit)| SampleResidual {
            x,
            y_obs,
            y_fit,
            residual: y_obs - y_fit,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PolynomialRecord, RECORD_NAME};

    #[test]
    fn compute_residuals_basic() {
        let model = PolynomialRegression::from_record(PolynomialRecord {
            name: RECORD_NAME.to_string(),
            degree: 1,
            powers: vec![0, 1],
            coefficients: vec![1.0, 2.0],
        })
        .unwrap();

        let residuals = compute_residuals(&[0.0, 1.0], &[1.0, 4.0], &model).unwrap();
        assert_eq!(residuals.len(), 2);
        assert_eq!(residuals[0].y_fit, 1.0);
        assert_eq!(residuals[0].residual, 0.0);
        assert_eq!(residuals[1].y_fit, 3.0);
        assert_eq!(residuals[1].residual, 1.0);

        assert!(compute_residuals(&[0.0], &[], &model).is_err());
    }
}
