//! Command-line parsing for the salary survey reporter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading/aggregation/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{PartialRange, PolyDegree};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salary", version, about = "Salary survey analysis: grouped means, frequencies and a polynomial fit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print all five views (listing + chart each) and the regression.
    Report(ReportArgs),
    /// Print only the regression of average salary on company score.
    Fit(ReportArgs),
    /// Launch the interactive TUI.
    ///
    /// Uses the same pipeline as `salary report`; the degree can be changed
    /// live and another file can be loaded without restarting.
    Tui(TuiArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Polynomial degree for the company score → salary fit.
    #[arg(
        short = 'd',
        long,
        default_value_t = PolyDegree::DEFAULT.get() as u8,
        value_parser = clap::value_parser!(u8).range(PolyDegree::MIN as i64..=PolyDegree::MAX as i64),
    )]
    pub degree: u8,

    /// What to do with a salary range where only one half parses.
    #[arg(long, value_enum, default_value_t = PartialRange::Exclude)]
    pub partial_range: PartialRange,

    /// Show only the first N rows of each view (the rest of a pie is folded into "(other)").
    #[arg(long)]
    pub top: Option<usize>,
}

/// Options for the printed report.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Semicolon-delimited survey CSV (`Job Title;Company Score;Location;Salary`).
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Disable the terminal charts (listings and metrics only).
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for the interactive UI.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Survey CSV to open at start-up (press `o` in the UI to open another).
    #[arg(value_name = "CSV")]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults() {
        let cli = Cli::parse_from(["salary", "report", "survey.csv"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.csv, PathBuf::from("survey.csv"));
        assert_eq!(args.common.degree, 2);
        assert_eq!(args.common.partial_range, PartialRange::Exclude);
        assert_eq!(args.common.top, None);
        assert!(!args.no_plot);
    }

    #[test]
    fn degree_is_range_checked() {
        for bad in ["0", "6"] {
            let res = Cli::try_parse_from(["salary", "fit", "s.csv", "--degree", bad]);
            assert!(res.is_err(), "degree {bad} should be rejected");
        }
        let cli = Cli::try_parse_from(["salary", "fit", "s.csv", "-d", "5"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.common.degree, 5);
    }

    #[test]
    fn tui_file_is_optional() {
        let cli = Cli::parse_from(["salary", "tui", "--partial-range", "known-half"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert!(args.csv.is_none());
        assert_eq!(args.common.partial_range, PartialRange::KnownHalf);
    }
}
