//! Error types.
//!
//! - `RegressionError`: library-level failures raised by fitting, scoring and
//!   record reconstruction.
//! - `AppError`: binary-level failures carrying a process exit code.

use thiserror::Error;

pub type RegressionResult<T> = Result<T, RegressionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    /// `x` and `y` differ in length, or are empty.
    #[error("input shape mismatch: x has {x_len} samples, y has {y_len} (both must be equal and non-zero)")]
    InputShape { x_len: usize, y_len: usize },
    /// The resolved power set has no terms.
    #[error("polynomial needs at least one term")]
    EmptyTerms,
    /// A persisted record carries a model tag other than `polynomialRegression`.
    #[error("not a polynomial regression model (name = {name:?})")]
    UnrecognizedRecord { name: String },
    /// A persisted record violates the model invariants.
    #[error("invalid polynomial regression record: {0}")]
    InvalidRecord(String),
}

impl RegressionError {
    pub fn invalid_record(message: impl Into<String>) -> Self {
        RegressionError::InvalidRecord(message.into())
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<RegressionError> for AppError {
    fn from(err: RegressionError) -> Self {
        let exit_code = match err {
            RegressionError::InputShape { .. } | RegressionError::EmptyTerms => 3,
            RegressionError::UnrecognizedRecord { .. } | RegressionError::InvalidRecord(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regression_errors_map_to_exit_codes() {
        let shape: AppError = RegressionError::InputShape { x_len: 2, y_len: 3 }.into();
        assert_eq!(shape.exit_code(), 3);
        assert!(shape.to_string().contains("x has 2 samples, y has 3"));

        let tag: AppError = RegressionError::UnrecognizedRecord {
            name: "linearRegression".to_string(),
        }
        .into();
        assert_eq!(tag.exit_code(), 4);
        assert!(tag.to_string().contains("linearRegression"));
    }
}
