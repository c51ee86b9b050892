//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation of filter inputs and the dataset location.

use crate::loader::is_remote;
use crate::report::OutputFormat;
use clap::Parser;
use std::path::{Path, PathBuf};

/// PayrollScope - hiring and salary analytics over payroll datasets
///
/// Loads a payroll CSV snapshot, cleans and enriches it, then reports
/// year-over-year hiring and aggregate salary/tenure metrics for the
/// selected agency, job title and start-year range.
///
/// Examples:
///   payrollscope --source data/payroll.csv
///   payrollscope --source https://bucket.s3.amazonaws.com/payroll.csv --agency "POLICE DEPARTMENT"
///   payrollscope --source data/payroll.csv --from-year 2000 --to-year 2020 --format json -o out.json
///   payrollscope --source data/payroll.csv --list-options
///   payrollscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset location: a local CSV path or an http(s) URL
    ///
    /// Can also be set via PAYROLLSCOPE_SOURCE or [source].location in .payrollscope.toml.
    #[arg(short, long, value_name = "PATH|URL", env = "PAYROLLSCOPE_SOURCE")]
    pub source: Option<String>,

    /// Dataset identifier, when --source names a directory or base URL
    #[arg(long, value_name = "NAME")]
    pub dataset: Option<String>,

    /// Agency to report on ("All" for every agency)
    #[arg(short, long, value_name = "NAME")]
    pub agency: Option<String>,

    /// Job title to report on ("All" for every title)
    #[arg(short, long, value_name = "NAME")]
    pub title: Option<String>,

    /// First start year to include (defaults to the earliest in the data)
    #[arg(long, value_name = "YEAR")]
    pub from_year: Option<i32>,

    /// Last start year to include (defaults to the latest in the data)
    #[arg(long, value_name = "YEAR")]
    pub to_year: Option<i32>,

    /// Maximum number of recent years in the hiring table
    #[arg(long, value_name = "COUNT")]
    pub max_years: Option<usize>,

    /// Output file path for the dashboard (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .payrollscope.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "PAYROLLSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Download timeout in seconds for remote sources
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the agencies, titles and year range available for filtering, then exit
    #[arg(long)]
    pub list_options: bool,

    /// Generate a default .payrollscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(from), Some(to)) = (self.from_year, self.to_year) {
            if from > to {
                return Err(format!(
                    "--from-year ({}) must not be after --to-year ({})",
                    from, to
                ));
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.max_years == Some(0) {
            return Err("Max years must be at least 1".to_string());
        }

        if let Some(ref source) = self.source {
            if !is_remote(source) && self.dataset.is_none() && !Path::new(source).is_file() {
                return Err(format!(
                    "Source must be an existing CSV file or an http(s) URL: {}",
                    source
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
