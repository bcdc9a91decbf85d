//! Fitted model types.

pub mod polynomial;

pub use polynomial::*;
