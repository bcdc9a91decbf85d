//! Read/write model JSON files.
//!
//! The model JSON is the portable representation of a fitted polynomial:
//!
//! ```json
//! { "name": "polynomialRegression", "degree": 2, "powers": [0, 1, 2], "coefficients": [...] }
//! ```

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::AppError;
use crate::models::PolynomialRegression;

/// Write a model JSON file.
pub fn write_model_json(path: &Path, model: &PolynomialRegression) -> Result<(), AppError> {
    let json = model
        .to_json()
        .map_err(|e| AppError::new(2, format!("Failed to serialize model: {e}")))?;
    fs::write(path, json + "\n")
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON '{}': {e}", path.display())))?;
    debug!("wrote model to '{}'", path.display());
    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<PolynomialRegression, AppError> {
    let json = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    Ok(PolynomialRegression::from_json(&json)?)
}
