//! Markdown and JSON dashboard rendering.
//!
//! This module turns a finished dashboard into a document and hands it to
//! a sink (a file or stdout).

use super::presenter::{format_pct, TITLE_SEPARATOR};
use crate::models::{ChartSpec, DashboardReport, MetricsSpec, ReportMetadata};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

/// Document format for rendered dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Receives finished dashboards.
pub trait PresentationSink {
    fn render(&mut self, report: &DashboardReport) -> Result<()>;
}

/// Renders a dashboard in one format to a file, or to stdout when no path is set.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    format: OutputFormat,
    output: Option<PathBuf>,
}

impl ReportWriter {
    pub fn new(format: OutputFormat, output: Option<PathBuf>) -> Self {
        Self { format, output }
    }

    fn document(&self, report: &DashboardReport) -> Result<String> {
        match self.format {
            OutputFormat::Markdown => Ok(generate_markdown_report(report)),
            OutputFormat::Json => generate_json_report(report),
        }
    }
}

impl PresentationSink for ReportWriter {
    fn render(&mut self, report: &DashboardReport) -> Result<()> {
        let content = self.document(report)?;

        match self.output {
            Some(ref path) => std::fs::write(path, &content)
                .with_context(|| format!("Failed to write report to {}", path.display())),
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                stdout.flush()?;
                Ok(())
            }
        }
    }
}

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(report: &DashboardReport) -> String {
    let mut output = String::new();

    output.push_str("# NYC Payroll Dashboard\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_metrics_section(&report.metrics));
    output.push_str(&generate_chart_section(&report.chart));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows Loaded:** {}\n", metadata.rows_loaded));
    section.push_str(&format!(
        "- **Rows Retained:** {}\n",
        metadata.rows_retained
    ));
    section.push_str(&format!(
        "- **Rows Matching Filter:** {}\n",
        metadata.rows_matched
    ));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_metrics_section(metrics: &MetricsSpec) -> String {
    let mut section = String::new();

    section.push_str("## Metrics\n\n");
    let labels: Vec<&str> = metrics.cards.iter().map(|c| c.label.as_str()).collect();
    let values: Vec<&str> = metrics.cards.iter().map(|c| c.value.as_str()).collect();

    section.push_str(&format!("| {} |\n", labels.join(" | ")));
    section.push_str(&format!("|{}\n", ":---:|".repeat(labels.len())));
    section.push_str(&format!("| {} |\n\n", values.join(" | ")));

    section
}

fn generate_chart_section(chart: &ChartSpec) -> String {
    let mut section = String::new();

    let mut lines = chart.title.split(TITLE_SEPARATOR);
    section.push_str(&format!("## {}\n\n", lines.next().unwrap_or_default()));
    for line in lines {
        section.push_str(&format!("*{}*\n\n", line));
    }

    if chart.bars.x.is_empty() {
        section.push_str("No hires match the selected filters.\n\n");
        return section;
    }

    section.push_str(&format!(
        "| {} | {} | {} |\n",
        chart.x_axis_title, chart.y_axis_title, chart.y2_axis_title
    ));
    section.push_str("|:---|---:|---:|\n");

    for (i, year) in chart.bars.x.iter().enumerate() {
        let hires = chart.bars.y.get(i).copied().flatten().unwrap_or(0.0);
        let change = chart.line.y.get(i).copied().flatten();
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            year,
            hires,
            format_pct(change)
        ));
    }
    section.push('\n');

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by PayrollScope*\n".to_string()
}

/// Generate a JSON dashboard.
pub fn generate_json_report(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
