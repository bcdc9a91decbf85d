//! Synthetic sample generation from a known polynomial.
//!
//! `x` is drawn uniformly from `[x_min, x_max]` and `y = f(x) + ε` with
//! `ε ~ N(0, noise²)`. The generator is seeded so runs are reproducible.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;
use crate::models::PolynomialRegression;

/// Parameters for synthetic sample generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub sample_count: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Standard deviation of the additive Gaussian noise.
    pub noise: f64,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Noise-free values `f(x)` for each sample.
    pub baseline: Vec<f64>,
}

pub fn generate_sample(truth: &PolynomialRegression, config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.sample_count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max >= config.x_min) {
        return Err(AppError::new(2, "Invalid x range for sample generation."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    let mut x = Vec::with_capacity(config.sample_count);
    let mut y = Vec::with_capacity(config.sample_count);
    let mut baseline = Vec::with_capacity(config.sample_count);

    for _ in 0..config.sample_count {
        let xi = rng.gen_range(config.x_min..=config.x_max);
        let level = truth.predict(xi);
        x.push(xi);
        baseline.push(level);
        y.push(level + normal.sample(&mut rng));
    }

    Ok(SampleData { x, y, baseline })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitOptions, PolynomialRecord, RECORD_NAME};
    use approx::assert_abs_diff_eq;

    fn parabola() -> PolynomialRegression {
        PolynomialRegression::from_record(PolynomialRecord {
            name: RECORD_NAME.to_string(),
            degree: 2,
            powers: vec![0, 1, 2],
            coefficients: vec![1.0, -2.0, 0.5],
        })
        .unwrap()
    }

    fn config(noise: f64, seed: u64) -> SampleConfig {
        SampleConfig {
            sample_count: 200,
            x_min: -5.0,
            x_max: 5.0,
            noise,
            seed,
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let a = generate_sample(&parabola(), &config(0.3, 7)).unwrap();
        let b = generate_sample(&parabola(), &config(0.3, 7)).unwrap();
        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
        assert!(a.x.iter().all(|&x| (-5.0..=5.0).contains(&x)));
    }

    #[test]
    fn noiseless_sample_lies_on_the_curve() {
        let data = generate_sample(&parabola(), &config(0.0, 1)).unwrap();
        assert_eq!(data.y, data.baseline);
    }

    #[test]
    fn refit_recovers_truth_from_noisy_sample() {
        let data = generate_sample(&parabola(), &config(0.05, 42)).unwrap();
        let fit = PolynomialRegression::fit(&data.x, &data.y, 2, FitOptions::default()).unwrap();
        for (got, want) in fit.coefficients().iter().zip(parabola().coefficients()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 0.05);
        }
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut bad = config(0.1, 1);
        bad.sample_count = 0;
        assert!(generate_sample(&parabola(), &bad).is_err());

        let mut bad = config(0.1, 1);
        bad.x_min = 3.0;
        bad.x_max = -3.0;
        assert!(generate_sample(&parabola(), &bad).is_err());

        assert!(generate_sample(&parabola(), &config(-1.0, 1)).is_err());
    }
}
