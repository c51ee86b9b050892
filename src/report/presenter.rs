//! Mapping of query results onto chart and metric-card payloads.
//!
//! Pure formatting; no aggregation happens here.

use crate::models::{AggregateMetrics, ChartSpec, HiringRate, MetricCard, MetricsSpec, Series};
use crate::query::Filter;

/// Text shown for undefined values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Separator between title lines.
pub const TITLE_SEPARATOR: &str = "<br>";

const CHART_HEADING: &str = "Year-over-Year Total Hires & Percentage Change in Hires";

/// Title lines describing the active filter: agency and title when set, years always.
pub fn filter_title_parts(filter: &Filter) -> Vec<String> {
    let mut parts = Vec::new();
    if let Some(ref agency) = filter.agency {
        parts.push(format!("Agency: {}", agency));
    }
    if let Some(ref title) = filter.title {
        parts.push(format!("Title: {}", title));
    }
    parts.push(format!(
        "Years: {} - {}",
        filter.years.min(),
        filter.years.max()
    ));
    parts
}

/// Build the dual-axis hiring chart: bars for hires, a line for percent change.
pub fn hiring_chart(rates: &[HiringRate], filter: &Filter) -> ChartSpec {
    let mut title_lines = vec![CHART_HEADING.to_string()];
    title_lines.extend(filter_title_parts(filter));

    let years: Vec<i32> = rates.iter().map(|r| r.start_year).collect();

    ChartSpec {
        title: title_lines.join(TITLE_SEPARATOR),
        x_axis_title: "Start Year".to_string(),
        y_axis_title: "Total Hires".to_string(),
        y2_axis_title: "YoY % Change".to_string(),
        bars: Series {
            name: "Total Hires".to_string(),
            kind: "bar".to_string(),
            axis: "y".to_string(),
            color: "lightblue".to_string(),
            x: years.clone(),
            y: rates.iter().map(|r| Some(r.num_hires as f64)).collect(),
        },
        line: Series {
            name: "YoY % Change".to_string(),
            kind: "line".to_string(),
            axis: "y2".to_string(),
            color: "orange".to_string(),
            x: years,
            y: rates.iter().map(|r| r.pct_change).collect(),
        },
    }
}

/// Build the three metric cards.
pub fn metric_cards(metrics: &AggregateMetrics) -> MetricsSpec {
    MetricsSpec {
        cards: vec![
            MetricCard {
                label: "Average Base Salary".to_string(),
                value: metrics
                    .avg_base_salary
                    .map(format_currency)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            },
            MetricCard {
                label: "Average Years Worked".to_string(),
                value: metrics
                    .avg_years_worked
                    .map(format_decimal)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            },
            MetricCard {
                label: "Total Active Employees".to_string(),
                value: group_thousands(&metrics.total_active_workers.to_string()),
            },
        ],
    }
}

/// `$1,234.56`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let text = format_decimal(value);
    match text.strip_prefix('-') {
        Some(magnitude) => format!("-${}", magnitude),
        None => format!("${}", text),
    }
}

/// `1,234.56`
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let text = format!("{:.2}", value.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if value < 0.0 && text != "0.00" { "-" } else { "" };

    format!("{}{}.{}", sign, group_thousands(whole), fraction)
}

/// Percent change with one decimal, or `N/A`.
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:+.1}%", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
