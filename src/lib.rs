//! `salary-survey` library crate.
//!
//! The binary (`salary`) is a thin wrapper around this library so that:
//!
//! - the load → aggregate → fit pipeline is testable without spawning processes
//! - the printed report and the TUI share one implementation

pub mod analysis;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
