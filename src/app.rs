//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the survey (through the content-keyed cache)
//! - aggregates and fits
//! - prints reports/plots or hands over to the TUI

use clap::Parser;

use crate::cli::{Command, CommonArgs, ReportArgs, TuiArgs};
use crate::domain::{PolyDegree, ReportConfig};
use crate::error::AppError;
use crate::io::LoadCache;

pub mod pipeline;

/// Entry point for the `salary` binary.
pub fn run() -> Result<(), AppError> {
    // We want `salary`, `salary survey.csv` and `salary -d 3` to behave like
    // `salary tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Fit(args) => handle_report(args, OutputMode::FitOnly),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    FitOnly,
}

fn handle_report(args: ReportArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = report_config_from_args(&args)?;
    let Some(path) = &config.csv_path else {
        return Err(AppError::new(2, "No input CSV given."));
    };

    let run = pipeline::run_path(LoadCache::global(), path, &config)?;

    match mode {
        OutputMode::Full => {
            print!("{}", crate::report::format_full_report(&run, &config));
            // The views are already printed; a failed fit still fails the run.
            if let Err(e) = &run.fit {
                println!("\nRegression unavailable: {e}");
                return Err(e.clone().into());
            }
        }
        OutputMode::FitOnly => {
            let fit = run.fit.as_ref().map_err(|e| AppError::from(e.clone()))?;
            print!("{}", crate::report::format_run_summary(&run.table));
            println!();
            print!("{}", crate::report::format_fit_section(fit, &config));
        }
    }

    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let mut config = config_from_common(&args.common)?;
    config.csv_path = args.csv;
    crate::tui::run(config)
}

pub fn report_config_from_args(args: &ReportArgs) -> Result<ReportConfig, AppError> {
    let mut config = config_from_common(&args.common)?;
    config.csv_path = Some(args.csv.clone());
    config.plot = !args.no_plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    Ok(config)
}

fn config_from_common(args: &CommonArgs) -> Result<ReportConfig, AppError> {
    Ok(ReportConfig {
        degree: PolyDegree::new(i64::from(args.degree))?,
        partial_range: args.partial_range,
        top_n: args.top,
        ..ReportConfig::default()
    })
}

/// Rewrite argv so `salary` defaults to `salary tui`.
///
/// Rules:
/// - `salary`                      -> `salary tui`
/// - `salary -d 3 ...`             -> `salary tui -d 3 ...`
/// - `salary survey.csv ...`       -> `salary tui survey.csv ...`
/// - `salary --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "fit" | "tui");
    if is_subcommand {
        return argv;
    }

    // A flag or a file path: both belong to `tui`.
    argv.insert(1, "tui".to_string());
    argv
}
