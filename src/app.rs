//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - dispatches to the command handlers

use clap::Parser;
use log::{info, warn};

use crate::cli::{Cli, Command, FitArgs, PlotArgs, PredictArgs, SampleArgs, ShowArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::domain::{FitOptions, PolynomialRecord, RECORD_NAME};
use crate::error::AppError;
use crate::models::PolynomialRegression;
use crate::report::RunSummary;

pub mod pipeline;

/// Entry point for the `polyfit` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` must be loaded first so it can supply RUST_LOG and POLYFIT_* defaults.
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Predict(args) => handle_predict(args),
        Command::Show(args) => handle_show(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let terms = args
        .terms()
        .ok_or_else(|| AppError::new(2, "Either --degree or --powers is required."))?;
    let options = FitOptions {
        intercept_at_zero: args.intercept_at_zero,
    };
    let run = pipeline::run_fit(&args.input, &args.x_column, &args.y_column, terms, options)?;

    for row in &run.ingest.row_errors {
        warn!("line {}: {}", row.line, row.message);
    }

    println!(
        "{}",
        crate::report::format_run_summary(&RunSummary {
            stats: &run.ingest.stats,
            model: &run.model,
            diagnostics: &run.diagnostics,
            score: &run.score,
            precision: args.formula.precision,
            style: args.formula.style(),
        })
    );

    if args.plot {
        let plot = crate::plot::render_ascii_plot(&run.residuals, &run.model, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.export {
        crate::io::write_model_json(path, &run.model)?;
        info!("model written to '{}'", path.display());
    }
    if let Some(path) = &args.export_predictions {
        crate::io::write_predictions_csv(path, &run.residuals)?;
        info!("predictions written to '{}'", path.display());
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let model = crate::io::read_model_json(&args.model)?;
    for (x, y) in args.x.iter().zip(model.predict_many(&args.x)) {
        println!("{x}\t{y}");
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let model = crate::io::read_model_json(&args.model)?;
    println!("{}", model.to_formula(args.formula.precision, args.formula.style()));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    if !(args.x_min.is_finite() && args.x_max.is_finite() && args.x_max > args.x_min) {
        return Err(AppError::new(2, "--x-max must be greater than --x-min."));
    }
    let model = crate::io::read_model_json(&args.model)?;
    let plot = crate::plot::render_curve_plot(&model, args.x_min, args.x_max, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let powers = args.powers();
    let degree = powers
        .iter()
        .copied()
        .max()
        .ok_or_else(|| AppError::new(2, "At least one coefficient is required."))?;
    let truth = PolynomialRegression::from_record(PolynomialRecord {
        name: RECORD_NAME.to_string(),
        degree,
        powers,
        coefficients: args.coefficients.clone(),
    })?;

    let config = SampleConfig {
        sample_count: args.n,
        x_min: args.x_min,
        x_max: args.x_max,
        noise: args.noise,
        seed: args.seed,
    };
    let sample = generate_sample(&truth, &config)?;
    crate::io::write_samples_csv(&args.output, &sample)?;

    println!(
        "Wrote {} samples of {} to '{}'",
        sample.x.len(),
        truth.to_display_string(None),
        args.output.display()
    );
    Ok(())
}
