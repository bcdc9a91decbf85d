//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON
//! - reloaded later for prediction, formatting or plotting

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Model-kind tag written into every persisted record.
pub const RECORD_NAME: &str = "polynomialRegression";

/// Which terms the polynomial is built from.
///
/// `Degree(d)` expands to the dense set `0..=d` (or `1..=d` when the intercept
/// is forced to zero). `Powers` is used verbatim: order is preserved and defines
/// the coefficient order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terms {
    Degree(u32),
    Powers(Vec<u32>),
}

impl Terms {
    /// Resolve to the ordered power set.
    ///
    /// `intercept_at_zero` only affects `Degree`; explicit powers already encode intent.
    pub fn resolve(&self, intercept_at_zero: bool) -> Vec<u32> {
        match self {
            Terms::Degree(d) if intercept_at_zero => (1..=*d).collect(),
            Terms::Degree(d) => (0..=*d).collect(),
            Terms::Powers(powers) => powers.clone(),
        }
    }
}

impl From<u32> for Terms {
    fn from(degree: u32) -> Self {
        Terms::Degree(degree)
    }
}

impl From<Vec<u32>> for Terms {
    fn from(powers: Vec<u32>) -> Self {
        Terms::Powers(powers)
    }
}

impl From<&[u32]> for Terms {
    fn from(powers: &[u32]) -> Self {
        Terms::Powers(powers.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for Terms {
    fn from(powers: [u32; N]) -> Self {
        Terms::Powers(powers.to_vec())
    }
}

/// Fitting options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitOptions {
    /// Force `f(0) = 0` by dropping the constant term from a dense power set.
    ///
    /// Ignored when the terms are an explicit power list.
    pub intercept_at_zero: bool,
}

/// Which path the least-squares solver took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMethod {
    /// Householder QR on the design matrix (full column rank).
    Qr,
    /// Normal equations `FᵗF c = Fᵗy` solved by SVD (rank-deficient design).
    NormalEquations,
}

impl SolveMethod {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            SolveMethod::Qr => "QR",
            SolveMethod::NormalEquations => "normal equations (rank-deficient fallback)",
        }
    }
}

/// Solver details reported alongside a freshly fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitDiagnostics {
    pub method: SolveMethod,
    /// Numerical column rank of the design matrix.
    pub rank: usize,
    pub n_samples: usize,
    pub n_terms: usize,
}

/// Goodness-of-fit statistics over a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Pearson correlation between predictions and observations.
    pub r: f64,
    /// Coefficient of determination `1 - SS_res / SS_tot`.
    ///
    /// Not finite when the observations are constant (`SS_tot == 0`).
    pub r2: f64,
    /// Sum of squared residuals.
    pub chi2: f64,
    /// Root-mean-square deviation of the residuals.
    pub rmsd: f64,
    pub n: usize,
}

/// Output style for formula rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormulaStyle {
    /// `0.1785 * x^2 - 0.1925 * x + 0.8505`
    #[default]
    Plain,
    /// `0.18x^{2} - 0.19x + 0.85`
    Latex,
}

/// Plain-data form of a fitted model (the persisted JSON shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialRecord {
    pub name: String,
    pub degree: u32,
    pub powers: Vec<u32>,
    pub coefficients: Vec<f64>,
}

/// Summary stats about a loaded sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    pub fn from_samples(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.is_empty() || x.len() != y.len() {
            return None;
        }
        let (x_min, x_max) = min_max(x);
        let (y_min, y_max) = min_max(y);
        Some(Self {
            n_points: x.len(),
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_terms_include_intercept_by_default() {
        assert_eq!(Terms::Degree(3).resolve(false), vec![0, 1, 2, 3]);
        assert_eq!(Terms::Degree(0).resolve(false), vec![0]);
    }

    #[test]
    fn dense_terms_drop_intercept_at_zero() {
        assert_eq!(Terms::Degree(3).resolve(true), vec![1, 2, 3]);
        assert!(Terms::Degree(0).resolve(true).is_empty());
    }

    #[test]
    fn explicit_powers_ignore_intercept_flag() {
        let terms = Terms::from([3, 0, 5]);
        assert_eq!(terms.resolve(true), vec![3, 0, 5]);
        assert_eq!(terms.resolve(false), vec![3, 0, 5]);
    }

    #[test]
    fn stats_cover_both_axes() {
        let stats = DatasetStats::from_samples(&[-3.0, 0.0, 2.0, 4.0], &[3.0, 1.0, 1.0, 3.0]).unwrap();
        assert_eq!(stats.n_points, 4);
        assert_eq!((stats.x_min, stats.x_max), (-3.0, 4.0));
        assert_eq!((stats.y_min, stats.y_max), (1.0, 3.0));
        assert!(DatasetStats::from_samples(&[], &[]).is_none());
    }
}
