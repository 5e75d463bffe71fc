//! Aggregate views over a loaded survey table.

pub mod aggregate;

pub use aggregate::*;
