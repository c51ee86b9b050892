//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.payrollscope.toml` files.

use crate::report::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".payrollscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Enrichment thresholds.
    #[serde(default)]
    pub enrich: EnrichConfig,

    /// Query settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where the payroll snapshot comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Local CSV path, directory, or http(s) URL.
    #[serde(default)]
    pub location: Option<String>,

    /// Dataset identifier when `location` is a directory or base URL.
    #[serde(default)]
    pub dataset_id: Option<String>,

    /// Download timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: None,
            dataset_id: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    300
}

/// Row-filtering thresholds applied during enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Latest valid agency start year.
    #[serde(default = "default_max_start_year")]
    pub max_start_year: i32,

    /// Normalized salaries at or below this are treated as noise.
    #[serde(default = "default_min_base_salary")]
    pub min_base_salary: f64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            max_start_year: default_max_start_year(),
            min_base_salary: default_min_base_salary(),
        }
    }
}

fn default_max_start_year() -> i32 {
    2024
}

fn default_min_base_salary() -> f64 {
    1.0
}

/// Query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Most recent start years shown in the hiring table.
    #[serde(default = "default_max_years")]
    pub max_years: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_years: default_max_years(),
        }
    }
}

fn default_max_years() -> usize {
    crate::query::DEFAULT_MAX_YEARS
}

/// Report generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Output file; stdout when unset.
    #[serde(default)]
    pub output: Option<String>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.payrollscope.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref source) = args.source {
            self.source.location = Some(source.clone());
            // A dataset id in the file belongs to the file's location.
            self.source.dataset_id = args.dataset.clone();
        } else if let Some(ref dataset) = args.dataset {
            self.source.dataset_id = Some(dataset.clone());
        }

        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        if let Some(max_years) = args.max_years {
            self.query.max_years = max_years;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref output) = args.output {
            self.report.output = Some(output.display().to_string());
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.enrich.max_start_year, 2024);
        assert_eq!(config.enrich.min_base_salary, 1.0);
        assert_eq!(config.query.max_years, 25);
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert!(config.source.location.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[source]
location = "https://bucket.s3.amazonaws.com"
dataset_id = "payroll.csv"

[enrich]
max_start_year = 2023

[report]
format = "json"
output = "dashboard.json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(
            config.source.location.as_deref(),
            Some("https://bucket.s3.amazonaws.com")
        );
        assert_eq!(config.source.dataset_id.as_deref(), Some("payroll.csv"));
        assert_eq!(config.source.timeout_seconds, 300);
        assert_eq!(config.enrich.max_start_year, 2023);
        assert_eq!(config.enrich.min_base_salary, 1.0);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.output.as_deref(), Some("dashboard.json"));
    }

    #[test]
    fn test_merge_with_args() {
        let mut config: Config = toml::from_str(
            r#"
[source]
location = "https://bucket.s3.amazonaws.com"
dataset_id = "payroll.csv"

[query]
max_years = 10
"#,
        )
        .unwrap();

        let args = crate::cli::Args::try_parse_from([
            "payrollscope",
            "--source",
            "https://mirror.example.com/payroll-2024.csv",
            "--format",
            "json",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(
            config.source.location.as_deref(),
            Some("https://mirror.example.com/payroll-2024.csv")
        );
        assert_eq!(config.source.dataset_id, None);
        assert_eq!(config.query.max_years, 10);
        assert_eq!(config.report.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE), "[query]\nmax_years = 5\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.query.max_years, 5);

        std::fs::write(dir.path().join(CONFIG_FILE), "[query\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[enrich]"));
        assert!(toml_str.contains("max_start_year = 2024"));
        assert!(toml_str.contains("[query]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.query.max_years, 25);
    }
}
