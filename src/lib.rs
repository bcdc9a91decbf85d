//! `polyfit` library crate.
//!
//! Least-squares polynomial regression over arbitrary power sets:
//!
//! - fit with [`models::PolynomialRegression::fit`] (QR, falling back to the
//!   normal equations for rank-deficient designs)
//! - predict, score (`r`, `r2`, `chi2`, `rmsd`) and render formulas
//! - persist and reload models as JSON records
//!
//! The binary (`polyfit`) is a thin wrapper around this library so the core
//! logic stays testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
