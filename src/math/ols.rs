//! Ordinary least squares solver.
//!
//! We solve `minimize ‖F c − y‖²` for a tall (or not) design matrix `F`.
//!
//! Implementation choices:
//! - Preferred path: Householder QR of `F`. When every diagonal entry of `R` is
//!   non-negligible relative to its column norm, `F` has full column rank and we
//!   back-substitute `R c = Qᵗ y`. This never forms `FᵗF`.
//! - Fallback path: when `F` is rank-deficient (duplicate powers, fewer distinct
//!   `x` than terms, fewer samples than terms) we form the normal equations
//!   `FᵗF c = Fᵗy` and solve them with a truncated SVD, which returns a
//!   least-squares solution instead of failing. Columns are scaled to unit norm
//!   first: raw power columns span many orders of magnitude and squaring them
//!   pushes real directions under the SVD cutoff.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices, hence the explicit `Qᵗ y` + triangular solve.)
//!
//! The solver itself never errors: numerical failure shows up as non-finite
//! coefficients.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use crate::domain::SolveMethod;

/// Relative threshold (in units of machine epsilon per row/column) below which an
/// `R` diagonal entry is treated as zero.
const RANK_EPS_FACTOR: f64 = 10.0;

/// Singular values of the column-scaled `FᵗF` below `SVD_RTOL * σ_max` are treated as zero.
const SVD_RTOL: f64 = 1e-12;

/// Iteration cap for the SVD used by the fallback path.
const SVD_MAX_ITERS: usize = 10_000;

/// Coefficients plus which path produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresSolution {
    pub coefficients: DVector<f64>,
    pub method: SolveMethod,
    /// Numerical column rank of `F` as seen by the QR factorization.
    pub rank: usize,
}

/// Solve a least squares problem, preferring QR and falling back to the normal equations.
pub fn solve_least_squares(f: &DMatrix<f64>, y: &DVector<f64>) -> LeastSquaresSolution {
    let (n, m) = f.shape();
    if m == 0 {
        return LeastSquaresSolution {
            coefficients: DVector::zeros(0),
            method: SolveMethod::Qr,
            rank: 0,
        };
    }

    let qr = f.clone().qr();
    let r = qr.r();
    let rank = column_rank(f, &r);

    if rank == m {
        let qty = qr.q().tr_mul(y);
        if let Some(c) = r.solve_upper_triangular(&qty) {
            debug!("least squares via QR: n={n}, m={m}");
            return LeastSquaresSolution {
                coefficients: c,
                method: SolveMethod::Qr,
                rank,
            };
        }
    }

    warn!("design matrix is rank-deficient (rank {rank} < {m} terms, n={n}); solving normal equations");
    LeastSquaresSolution {
        coefficients: solve_normal_equations(f, y),
        method: SolveMethod::NormalEquations,
        rank,
    }
}

/// Count the columns of `F` that are not (numerically) in the span of the
/// preceding ones, using the diagonal of `R` from `F = QR`.
fn column_rank(f: &DMatrix<f64>, r: &DMatrix<f64>) -> usize {
    let (n, m) = f.shape();
    let tol = RANK_EPS_FACTOR * f64::EPSILON * n.max(m) as f64;
    (0..n.min(m))
        .filter(|&k| {
            let col_norm = f.column(k).norm();
            let rkk = r[(k, k)].abs();
            // NaN compares false and is counted as independent; it propagates into the solve.
            !(rkk <= tol * col_norm)
        })
        .count()
}

/// Solve `FᵗF c = Fᵗy` with a truncated SVD (minimum-norm least squares in
/// column-scaled coordinates).
fn solve_normal_equations(f: &DMatrix<f64>, y: &DVector<f64>) -> DVector<f64> {
    let m = f.ncols();
    let scale = column_scale(f);

    let mut fs = f.clone();
    for (mut column, &s) in fs.column_iter_mut().zip(scale.iter()) {
        column /= s;
    }
    let a = fs.tr_mul(&fs);
    let b = fs.tr_mul(y);

    let Some(svd) = a.try_svd(true, true, f64::EPSILON, SVD_MAX_ITERS) else {
        warn!("SVD of the normal equations did not converge");
        return DVector::from_element(m, f64::NAN);
    };

    let tol = (svd.singular_values.max() * SVD_RTOL).max(0.0);
    match svd.solve(&b, tol) {
        Ok(c) => c.component_div(&scale),
        Err(e) => {
            warn!("normal equations solve failed: {e}");
            DVector::from_element(m, f64::NAN)
        }
    }
}

/// Euclidean norm of each column; zero or non-finite norms are left unscaled.
fn column_scale(f: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(
        f.ncols(),
        f.column_iter().map(|column| {
            let norm = column.norm();
            if norm > 0.0 && norm.is_finite() { norm } else { 1.0 }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{design_matrix, response_vector};
    use approx::assert_abs_diff_eq;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let sol = solve_least_squares(&x, &y);
        assert_eq!(sol.method, SolveMethod::Qr);
        assert_eq!(sol.rank, 2);
        assert_abs_diff_eq!(sol.coefficients[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(sol.coefficients[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn overdetermined_parabola_matches_reference() {
        let f = design_matrix(&[-3.0, 0.0, 2.0, 4.0], &[0, 1, 2]);
        let y = response_vector(&[3.0, 1.0, 1.0, 3.0]);
        let sol = solve_least_squares(&f, &y);
        assert_eq!(sol.method, SolveMethod::Qr);
        assert_abs_diff_eq!(sol.coefficients[0], 0.850519, epsilon = 1e-6);
        assert_abs_diff_eq!(sol.coefficients[1], -0.192495, epsilon = 1e-6);
        assert_abs_diff_eq!(sol.coefficients[2], 0.178462, epsilon = 1e-6);
    }

    #[test]
    fn duplicate_columns_take_the_fallback() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let f = design_matrix(&x, &[2, 2]);
        let y = response_vector(&[2.0, 8.0, 18.0, 32.0]);
        let sol = solve_least_squares(&f, &y);
        assert_eq!(sol.method, SolveMethod::NormalEquations);
        assert_eq!(sol.rank, 1);
        assert_eq!(sol.coefficients.len(), 2);
        // Minimum-norm solution splits the weight evenly between the twin columns.
        assert_abs_diff_eq!(sol.coefficients[0], 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(sol.coefficients[1], 1.0, epsilon = 1e-8);
    }

    #[test]
    fn fewer_samples_than_terms_still_returns_coefficients() {
        let f = design_matrix(&[1.0, 2.0], &[0, 1, 2]);
        let y = response_vector(&[1.0, 4.0]);
        let sol = solve_least_squares(&f, &y);
        assert_eq!(sol.method, SolveMethod::NormalEquations);
        assert_eq!(sol.coefficients.len(), 3);
        assert!(sol.coefficients.iter().all(|c| c.is_finite()));
        // The returned coefficients interpolate both samples.
        let fitted = &f * &sol.coefficients;
        assert_abs_diff_eq!(fitted[0], 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(fitted[1], 4.0, epsilon = 1e-8);
    }

    #[test]
    fn rank_deficient_fit_reaches_least_squares_minimum() {
        // Five distinct x values for six terms: any least-squares solution
        // interpolates the group means, so χ² is the within-group scatter.
        let x = [
            50.0, 50.0, 50.0, 70.0, 70.0, 70.0, 80.0, 80.0, 80.0, 90.0, 90.0, 90.0, 100.0, 100.0, 100.0,
        ];
        let y = [3.3, 2.8, 2.9, 2.3, 2.6, 2.1, 2.5, 2.9, 2.4, 3.0, 3.1, 2.8, 3.3, 3.5, 3.0];
        let f = design_matrix(&x, &[0, 1, 2, 3, 4, 5]);
        let y = response_vector(&y);

        let sol = solve_least_squares(&f, &y);
        assert_eq!(sol.method, SolveMethod::NormalEquations);
        assert_eq!(sol.rank, 5);

        let residual = &y - &f * &sol.coefficients;
        assert_abs_diff_eq!(residual.norm_squared(), 0.58, epsilon = 1e-6);
    }

    #[test]
    fn column_scale_leaves_zero_columns_alone() {
        let f = DMatrix::from_row_slice(2, 2, &[3.0, 0.0, 4.0, 0.0]);
        let scale = column_scale(&f);
        assert_abs_diff_eq!(scale[0], 5.0, epsilon = 1e-12);
        assert_eq!(scale[1], 1.0);
    }

    #[test]
    fn all_zero_column_counts_as_deficient() {
        let f = design_matrix(&[0.0, 0.0, 0.0], &[0, 1]);
        let y = response_vector(&[2.0, 2.0, 2.0]);
        let sol = solve_least_squares(&f, &y);
        assert_eq!(sol.method, SolveMethod::NormalEquations);
        assert_abs_diff_eq!(sol.coefficients[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(sol.coefficients[1], 0.0, epsilon = 1e-10);
    }
}
