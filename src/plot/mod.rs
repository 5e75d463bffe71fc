//! Terminal chart renderers (plain text, deterministic).
//!
//! - scatter + fitted curve for the regression (`ascii`)
//! - horizontal/vertical bars for the salary means (`bars`)
//! - pie with percentage legend for the frequency views (`pie`)

pub mod ascii;
pub mod bars;
pub mod pie;

pub use ascii::*;
pub use bars::*;
pub use pie::*;
