//! Command-line parsing for the polynomial regression tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting and formatting code.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::domain::{FormulaStyle, Terms};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "polyfit", version, about = "Polynomial least-squares regression")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a polynomial to CSV samples, print diagnostics, and optionally plot/export.
    Fit(FitArgs),
    /// Evaluate a saved model at one or more x values.
    Predict(PredictArgs),
    /// Print the formula of a saved model.
    Show(ShowArgs),
    /// Plot a saved model over an x range.
    Plot(PlotArgs),
    /// Write synthetic samples drawn from a known polynomial.
    Sample(SampleArgs),
}

/// Formula rendering options shared by `fit` and `show`.
#[derive(Debug, Args, Clone)]
pub struct FormulaArgs {
    /// Significant digits for coefficients (shortest exact form when unset).
    #[arg(long, env = "POLYFIT_PRECISION")]
    pub precision: Option<usize>,

    /// Render the formula as LaTeX.
    #[arg(long)]
    pub latex: bool,
}

impl FormulaArgs {
    pub fn style(&self) -> FormulaStyle {
        if self.latex {
            FormulaStyle::Latex
        } else {
            FormulaStyle::Plain
        }
    }
}

/// Options for `polyfit fit`.
#[derive(Debug, Args, Clone)]
#[command(group(ArgGroup::new("terms").required(true).args(["degree", "powers"])))]
pub struct FitArgs {
    /// CSV file with a header row.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Column holding the independent variable.
    #[arg(long, default_value = "x")]
    pub x_column: String,

    /// Column holding the observed values.
    #[arg(long, default_value = "y")]
    pub y_column: String,

    /// Fit every power from 0 (or 1 with `--intercept-at-zero`) up to this degree.
    #[arg(short, long)]
    pub degree: Option<u32>,

    /// Fit exactly these powers, in this order (e.g. `3,1,5`).
    #[arg(long, value_delimiter = ',')]
    pub powers: Option<Vec<u32>>,

    /// Drop the constant term so that f(0) = 0 (degree form only).
    #[arg(long)]
    pub intercept_at_zero: bool,

    #[command(flatten)]
    pub formula: FormulaArgs,

    /// Render an ASCII plot of samples and fitted curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the fitted model to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Export per-sample fitted values and residuals to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_predictions: Option<PathBuf>,
}

impl FitArgs {
    /// Terms selected on the command line; `--powers` wins when both are present.
    pub fn terms(&self) -> Option<Terms> {
        match (&self.powers, self.degree) {
            (Some(powers), _) => Some(Terms::Powers(powers.clone())),
            (None, Some(degree)) => Some(Terms::Degree(degree)),
            (None, None) => None,
        }
    }
}

/// Options for `polyfit predict`.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Model JSON file produced by `polyfit fit --export`.
    #[arg(short, long, value_name = "JSON")]
    pub model: PathBuf,

    /// Points to evaluate.
    #[arg(short, long, num_args = 1.., value_delimiter = ',', allow_negative_numbers = true, required = true)]
    pub x: Vec<f64>,
}

/// Options for `polyfit show`.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Model JSON file produced by `polyfit fit --export`.
    #[arg(short, long, value_name = "JSON")]
    pub model: PathBuf,

    #[command(flatten)]
    pub formula: FormulaArgs,
}

/// Options for `polyfit plot`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Model JSON file produced by `polyfit fit --export`.
    #[arg(short, long, value_name = "JSON")]
    pub model: PathBuf,

    #[arg(long, allow_negative_numbers = true, default_value_t = -1.0)]
    pub x_min: f64,

    #[arg(long, allow_negative_numbers = true, default_value_t = 1.0)]
    pub x_max: f64,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `polyfit sample`.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Coefficients of the generating polynomial, aligned with `--powers`.
    #[arg(short, long, required = true, value_delimiter = ',', allow_negative_numbers = true)]
    pub coefficients: Vec<f64>,

    /// Powers for each coefficient (defaults to `0, 1, ..`).
    #[arg(long, value_delimiter = ',')]
    pub powers: Option<Vec<u32>>,

    /// Number of samples to generate.
    #[arg(short, long, default_value_t = 100)]
    pub n: usize,

    #[arg(long, allow_negative_numbers = true, default_value_t = -1.0)]
    pub x_min: f64,

    #[arg(long, allow_negative_numbers = true, default_value_t = 1.0)]
    pub x_max: f64,

    /// Standard deviation of the additive Gaussian noise.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV (columns `x,y`).
    #[arg(short, long, value_name = "CSV")]
    pub output: PathBuf,
}

impl SampleArgs {
    /// Powers for the generating polynomial, dense when not given.
    pub fn powers(&self) -> Vec<u32> {
        match &self.powers {
            Some(powers) => powers.clone(),
            None => (0..self.coefficients.len() as u32).collect(),
        }
    }
}
