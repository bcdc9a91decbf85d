//! Export per-sample predictions (and synthetic samples) to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::io::Write;
use std::path::Path;

use crate::data::SampleData;
use crate::error::AppError;
use crate::report::SampleResidual;

/// Write per-sample results to a CSV file.
pub fn write_predictions_csv(path: &Path, residuals: &[SampleResidual]) -> Result<(), AppError> {
    let writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_predictions(writer, residuals)
}

fn write_predictions<W: Write>(mut writer: csv::Writer<W>, residuals: &[SampleResidual]) -> Result<(), AppError> {
    writer
        .write_record(["x", "y_obs", "y_fit", "residual"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writer
            .write_record([
                r.x.to_string(),
                r.y_obs.to_string(),
                r.y_fit.to_string(),
                r.residual.to_string(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

/// Write synthetic samples to a CSV file with an `x,y,baseline` header.
///
/// `baseline` is the noise-free value of the generating polynomial at `x`.
pub fn write_samples_csv(path: &Path, sample: &SampleData) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    writer
        .write_record(["x", "y", "baseline"])
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;
    for ((xi, yi), bi) in sample.x.iter().zip(&sample.y).zip(&sample.baseline) {
        writer
            .write_record([xi.to_string(), yi.to_string(), bi.to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = [
            SampleResidual { x: 0.0, y_obs: 1.0, y_fit: 1.0, residual: 0.0 },
            SampleResidual { x: 1.5, y_obs: 4.0, y_fit: 3.5, residual: 0.5 },
        ];
        write_predictions_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "x,y_obs,y_fit,residual\n0,1,1,0\n1.5,4,3.5,0.5\n");
    }

    #[test]
    fn samples_round_trip_through_ingest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        let sample = SampleData {
            x: vec![-1.0, 0.25],
            y: vec![2.0, 0.125],
            baseline: vec![1.5, 0.0],
        };
        write_samples_csv(&path, &sample).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("x,y,baseline\n"));

        let data = crate::io::load_samples(&path, "x", "y").unwrap();
        assert_eq!(data.x, vec![-1.0, 0.25]);
        assert_eq!(data.y, vec![2.0, 0.125]);

        let truth = crate::io::load_samples(&path, "x", "baseline").unwrap();
        assert_eq!(truth.y, vec![1.5, 0.0]);
    }
}
