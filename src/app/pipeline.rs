//! Shared "fit pipeline" logic.
//!
//! Keeping this in one place keeps the workflow out of the command handlers:
//! CSV ingest -> fit -> score -> residuals

use std::path::Path;

use log::info;

use crate::domain::{FitDiagnostics, FitOptions, Score, Terms};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_samples};
use crate::models::PolynomialRegression;
use crate::report::SampleResidual;

/// All computed outputs of a single `polyfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub model: PolynomialRegression,
    pub diagnostics: FitDiagnostics,
    pub score: Score,
    pub residuals: Vec<SampleResidual>,
}

/// Load samples from `path` and run the fitting pipeline on them.
pub fn run_fit(
    path: &Path,
    x_column: &str,
    y_column: &str,
    terms: Terms,
    options: FitOptions,
) -> Result<RunOutput, AppError> {
    let ingest = load_samples(path, x_column, y_column)?;
    run_fit_with_data(ingest, terms, options)
}

/// Run the fitting pipeline on already ingested samples.
pub fn run_fit_with_data(
    ingest: IngestedData,
    terms: Terms,
    options: FitOptions,
) -> Result<RunOutput, AppError> {
    let (model, diagnostics) =
        PolynomialRegression::fit_with_diagnostics(&ingest.x, &ingest.y, terms, options)?;
    info!(
        "fitted degree {} over {} samples ({})",
        model.degree(),
        diagnostics.n_samples,
        diagnostics.method.display_name()
    );

    let score = model.score(&ingest.x, &ingest.y)?;
    let residuals = crate::report::compute_residuals(&ingest.x, &ingest.y, &model)?;

    Ok(RunOutput {
        ingest,
        model,
        diagnostics,
        score,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolveMethod;
    use crate::io::ingest::read_samples;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pipeline_fits_ingested_samples() {
        let csv = "x,y\n-3,3\n0,1\n2,1\n4,3\n";
        let ingest = read_samples(csv.as_bytes(), "x", "y").unwrap();
        let run = run_fit_with_data(ingest, Terms::Degree(2), FitOptions::default()).unwrap();

        assert_eq!(run.diagnostics.method, SolveMethod::Qr);
        assert_eq!(run.model.powers(), &[0, 1, 2]);
        assert_eq!(run.residuals.len(), 4);
        let sum_sq: f64 = run.residuals.iter().map(|r| r.residual * r.residual).sum();
        assert_abs_diff_eq!(sum_sq, run.score.chi2, epsilon = 1e-12);
    }

    #[test]
    fn pipeline_maps_empty_terms_to_exit_code() {
        let ingest = read_samples("x,y\n1,2\n".as_bytes(), "x", "y").unwrap();
        let err = run_fit_with_data(ingest, Terms::Powers(vec![]), FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn pipeline_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"t,v\n0,1\n1,3\n2,5\n").unwrap();
        let run = run_fit(file.path(), "t", "v", Terms::Degree(1), FitOptions::default()).unwrap();
        assert_abs_diff_eq!(run.model.predict(3.0), 7.0, epsilon = 1e-9);
    }
}
