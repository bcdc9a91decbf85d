//! The fitted polynomial model.
//!
//! A `PolynomialRegression` is the triple `{degree, powers, coefficients}` with
//! `coefficients[k]` paired to `powers[k]` and `degree == max(powers)`. It only
//! exists fully populated: the constructors are a least-squares fit and
//! reconstruction from a persisted record, and there is no mutation API.

use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{
    FitDiagnostics, FitOptions, FormulaStyle, PolynomialRecord, RECORD_NAME, Score, Terms,
};
use crate::error::{RegressionError, RegressionResult};
use crate::math::{design_matrix, power_term, response_vector, solve_least_squares};
use crate::report::format_formula;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolynomialRecord", into = "PolynomialRecord")]
pub struct PolynomialRegression {
    degree: u32,
    powers: Vec<u32>,
    coefficients: Vec<f64>,
}

impl PolynomialRegression {
    /// Fit `y ≈ Σ c_k x^p_k` by least squares.
    ///
    /// `terms` is either a degree (dense powers) or an explicit power list, see [`Terms`].
    ///
    /// # Errors
    /// - [`RegressionError::InputShape`] when `x` and `y` differ in length or are empty
    /// - [`RegressionError::EmptyTerms`] when the power set resolves to nothing
    ///   (degree 0 with `intercept_at_zero`, or an empty power list)
    ///
    /// Rank-deficient problems are not errors: they are solved through the normal
    /// equations and may yield arbitrary (or non-finite) coefficients along the
    /// null-space directions. Use [`Self::fit_with_diagnostics`] to see which path ran.
    pub fn fit(
        x: &[f64],
        y: &[f64],
        terms: impl Into<Terms>,
        options: FitOptions,
    ) -> RegressionResult<Self> {
        Self::fit_with_diagnostics(x, y, terms, options).map(|(model, _)| model)
    }

    /// Same as [`Self::fit`], also reporting how the least-squares system was solved.
    pub fn fit_with_diagnostics(
        x: &[f64],
        y: &[f64],
        terms: impl Into<Terms>,
        options: FitOptions,
    ) -> RegressionResult<(Self, FitDiagnostics)> {
        check_sample_shape(x, y)?;

        let powers = terms.into().resolve(options.intercept_at_zero);
        let degree = powers.iter().copied().max().ok_or(RegressionError::EmptyTerms)?;

        let f = design_matrix(x, &powers);
        let solution = solve_least_squares(&f, &response_vector(y));
        let coefficients: Vec<f64> = solution.coefficients.iter().copied().collect();

        if coefficients.iter().any(|c| !c.is_finite()) {
            warn!("fit produced non-finite coefficients: {coefficients:?}");
        }

        let diagnostics = FitDiagnostics {
            method: solution.method,
            rank: solution.rank,
            n_samples: x.len(),
            n_terms: powers.len(),
        };
        let model = Self {
            degree,
            powers,
            coefficients,
        };
        Ok((model, diagnostics))
    }

    /// Highest power in the model.
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Powers in declaration order.
    pub fn powers(&self) -> &[u32] {
        &self.powers
    }

    /// Coefficients, index-aligned with [`Self::powers`].
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate the polynomial at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.powers
            .iter()
            .zip(&self.coefficients)
            .fold(0.0, |acc, (&p, &c)| acc + c * power_term(x, p))
    }

    /// Evaluate the polynomial at every point of `xs`, preserving order.
    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.par_iter().map(|&x| self.predict(x)).collect()
    }

    /// Goodness of fit over a sample set.
    ///
    /// `r2` follows `1 - SS_res / SS_tot` literally, so it is not finite when `y`
    /// is constant.
    pub fn score(&self, x: &[f64], y: &[f64]) -> RegressionResult<Score> {
        check_sample_shape(x, y)?;

        let predicted = self.predict_many(x);
        let n = y.len();
        let nf = n as f64;

        let y_mean = y.iter().sum::<f64>() / nf;
        let p_mean = predicted.iter().sum::<f64>() / nf;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        let mut ss_pred = 0.0;
        let mut cross = 0.0;
        for (&yi, &pi) in y.iter().zip(&predicted) {
            let resid = yi - pi;
            ss_res += resid * resid;
            ss_tot += (yi - y_mean) * (yi - y_mean);
            ss_pred += (pi - p_mean) * (pi - p_mean);
            cross += (pi - p_mean) * (yi - y_mean);
        }

        if ss_tot == 0.0 {
            warn!("score: observations are constant, r2 is undefined");
        }

        Ok(Score {
            r: cross / (ss_pred * ss_tot).sqrt(),
            r2: 1.0 - ss_res / ss_tot,
            chi2: ss_res,
            rmsd: (ss_res / nf).sqrt(),
            n,
        })
    }

    /// Plain-data form, tagged `polynomialRegression`.
    pub fn to_record(&self) -> PolynomialRecord {
        PolynomialRecord {
            name: RECORD_NAME.to_string(),
            degree: self.degree,
            powers: self.powers.clone(),
            coefficients: self.coefficients.clone(),
        }
    }

    /// Rebuild a model from its plain-data form.
    ///
    /// # Errors
    /// - [`RegressionError::UnrecognizedRecord`] when the tag is not `polynomialRegression`
    ///   (checked first)
    /// - [`RegressionError::InvalidRecord`] when the fields break the model invariants
    pub fn from_record(record: PolynomialRecord) -> RegressionResult<Self> {
        if record.name != RECORD_NAME {
            return Err(RegressionError::UnrecognizedRecord { name: record.name });
        }
        let Some(max_power) = record.powers.iter().copied().max() else {
            return Err(RegressionError::invalid_record("powers must not be empty"));
        };
        if record.coefficients.len() != record.powers.len() {
            return Err(RegressionError::invalid_record(format!(
                "{} coefficients for {} powers",
                record.coefficients.len(),
                record.powers.len()
            )));
        }
        if record.degree != max_power {
            return Err(RegressionError::invalid_record(format!(
                "degree {} does not match highest power {max_power}",
                record.degree
            )));
        }

        Ok(Self {
            degree: record.degree,
            powers: record.powers,
            coefficients: record.coefficients,
        })
    }

    /// Serialize the record as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_record())
    }

    /// Parse a JSON record, checking the model tag before anything else.
    pub fn from_json(json: &str) -> RegressionResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| RegressionError::invalid_record(format!("malformed JSON: {e}")))?;

        match value.get("name").and_then(|v| v.as_str()) {
            Some(RECORD_NAME) => {}
            Some(other) => {
                return Err(RegressionError::UnrecognizedRecord {
                    name: other.to_string(),
                });
            }
            None => {
                return Err(RegressionError::UnrecognizedRecord {
                    name: String::new(),
                });
            }
        }

        let record: PolynomialRecord = serde_json::from_value(value)
            .map_err(|e| RegressionError::invalid_record(e.to_string()))?;
        Self::from_record(record)
    }

    /// Render the formula, highest power first.
    ///
    /// `precision` is the number of significant digits per coefficient; `None`
    /// prints the shortest exact representation.
    pub fn to_formula(&self, precision: Option<usize>, style: FormulaStyle) -> String {
        format_formula(&self.powers, &self.coefficients, precision, style)
    }

    /// `f(x) = 0.1785 * x^2 - 0.1925 * x + 0.8505`
    pub fn to_display_string(&self, precision: Option<usize>) -> String {
        self.to_formula(precision, FormulaStyle::Plain)
    }

    /// `f(x) = 0.18x^{2} - 0.19x + 0.85`
    pub fn to_latex_string(&self, precision: Option<usize>) -> String {
        self.to_formula(precision, FormulaStyle::Latex)
    }
}

impl std::fmt::Display for PolynomialRegression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = f.precision();
        f.write_str(&self.to_display_string(precision))
    }
}

impl TryFrom<PolynomialRecord> for PolynomialRegression {
    type Error = RegressionError;

    fn try_from(record: PolynomialRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl From<PolynomialRegression> for PolynomialRecord {
    fn from(model: PolynomialRegression) -> Self {
        PolynomialRecord {
            name: RECORD_NAME.to_string(),
            degree: model.degree,
            powers: model.powers,
            coefficients: model.coefficients,
        }
    }
}

/// `x` and `y` must be equal in length and non-empty.
pub(crate) fn check_sample_shape(x: &[f64], y: &[f64]) -> RegressionResult<()> {
    if x.is_empty() || x.len() != y.len() {
        return Err(RegressionError::InputShape {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    Ok(())
}
