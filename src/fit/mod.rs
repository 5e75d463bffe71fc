//! Curve fitting: polynomial regression of salary on company score.

pub mod polynomial;

pub use polynomial::*;
