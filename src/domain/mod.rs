//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - term selection and fit options (`Terms`, `FitOptions`)
//! - solver and scoring outputs (`SolveMethod`, `FitDiagnostics`, `Score`)
//! - the persisted record shape (`PolynomialRecord`)

pub mod types;

pub use types::*;
