//! Data models for payroll analytics.
//!
//! This module contains the core data structures used throughout
//! the application: raw and enriched payroll records, tenure buckets,
//! query results, and the dashboard report handed to renderers.

use crate::schema;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One employee-fiscal-year pay record as read from the source.
///
/// Every cell is kept as text; an empty cell is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub agency_name: Option<String>,
    pub title_description: Option<String>,
    pub pay_basis: Option<String>,
    pub agency_start_date: Option<String>,
    pub fiscal_year: Option<String>,
    pub base_salary: Option<String>,
    pub regular_hours: Option<String>,
    pub regular_gross_paid: Option<String>,
    pub ot_hours: Option<String>,
    pub total_ot_paid: Option<String>,
    pub total_other_pay: Option<String>,
    pub leave_status_as_of_june_30: Option<String>,
}

impl RawRecord {
    /// Returns the cell for a column name, if the column is known.
    pub fn cell(&self, column: &str) -> Option<&str> {
        let value = match column {
            schema::AGENCY_NAME => &self.agency_name,
            schema::TITLE_DESCRIPTION => &self.title_description,
            schema::PAY_BASIS => &self.pay_basis,
            schema::AGENCY_START_DATE => &self.agency_start_date,
            schema::FISCAL_YEAR => &self.fiscal_year,
            schema::BASE_SALARY => &self.base_salary,
            schema::REGULAR_HOURS => &self.regular_hours,
            schema::REGULAR_GROSS_PAID => &self.regular_gross_paid,
            schema::OT_HOURS => &self.ot_hours,
            schema::TOTAL_OT_PAID => &self.total_ot_paid,
            schema::TOTAL_OTHER_PAY => &self.total_other_pay,
            schema::LEAVE_STATUS => &self.leave_status_as_of_june_30,
            _ => return None,
        };
        value.as_deref()
    }

    /// Sets the cell for a column name. Unknown columns are ignored.
    pub fn set_cell(&mut self, column: &str, value: Option<String>) {
        let slot = match column {
            schema::AGENCY_NAME => &mut self.agency_name,
            schema::TITLE_DESCRIPTION => &mut self.title_description,
            schema::PAY_BASIS => &mut self.pay_basis,
            schema::AGENCY_START_DATE => &mut self.agency_start_date,
            schema::FISCAL_YEAR => &mut self.fiscal_year,
            schema::BASE_SALARY => &mut self.base_salary,
            schema::REGULAR_HOURS => &mut self.regular_hours,
            schema::REGULAR_GROSS_PAID => &mut self.regular_gross_paid,
            schema::OT_HOURS => &mut self.ot_hours,
            schema::TOTAL_OT_PAID => &mut self.total_ot_paid,
            schema::TOTAL_OTHER_PAY => &mut self.total_other_pay,
            schema::LEAVE_STATUS => &mut self.leave_status_as_of_june_30,
            _ => return,
        };
        *slot = value;
    }
}

/// Tenure bucket derived from years worked.
///
/// Boundaries are closed and non-overlapping. The `6 - 10 years` label
/// covers a tenure of exactly 5 as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TenureBucket {
    LessThan5,
    From6To10,
    From11To20,
    From21To30,
    From31To40,
    Over40,
}

impl TenureBucket {
    /// All buckets in ascending order.
    #[cfg(test)]
    pub const ALL: [TenureBucket; 6] = [
        TenureBucket::LessThan5,
        TenureBucket::From6To10,
        TenureBucket::From11To20,
        TenureBucket::From21To30,
        TenureBucket::From31To40,
        TenureBucket::Over40,
    ];

    /// Map a number of years worked to its bucket.
    pub fn from_years(years: i32) -> Self {
        match years {
            i32::MIN..=4 => TenureBucket::LessThan5,
            5..=10 => TenureBucket::From6To10,
            11..=20 => TenureBucket::From11To20,
            21..=30 => TenureBucket::From21To30,
            31..=40 => TenureBucket::From31To40,
            _ => TenureBucket::Over40,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TenureBucket::LessThan5 => "less than 5 years",
            TenureBucket::From6To10 => "6 - 10 years",
            TenureBucket::From11To20 => "11 - 20 years",
            TenureBucket::From21To30 => "21 - 30 years",
            TenureBucket::From31To40 => "31 - 40 years",
            TenureBucket::Over40 => "40+ years",
        }
    }
}

impl fmt::Display for TenureBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for TenureBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A payroll record after type coercion and derived-field computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub agency_name: Option<String>,
    pub title_description: Option<String>,
    /// Trimmed pay basis.
    pub pay_basis: Option<String>,
    pub agency_start_date: NaiveDate,
    pub start_year: i32,
    pub fiscal_year: i32,
    /// `fiscal_year - start_year`; may be negative.
    pub years_worked: i32,
    pub years_worked_cat: TenureBucket,
    /// Salary divided by regular hours, before hourly normalization.
    pub hourly_rate: Option<f64>,
    /// Annualized salary; hourly rows are multiplied out by regular hours.
    pub base_salary: f64,
    pub regular_hours: Option<f64>,
    pub regular_gross_paid: Option<f64>,
    pub ot_hours: Option<f64>,
    pub total_ot_paid: Option<f64>,
    pub total_other_pay: Option<f64>,
    pub leave_status_as_of_june_30: Option<String>,
}

impl EnrichedRecord {
    /// Whether the leave status marks this employee as active.
    pub fn is_active(&self) -> bool {
        self.leave_status_as_of_june_30
            .as_deref()
            .is_some_and(|status| status.contains(schema::values::ACTIVE))
    }
}

/// Hires for one start year, with the change against the previous year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiringRate {
    pub start_year: i32,
    pub num_hires: usize,
    /// Percent change from the preceding year in the series; `None` for the first.
    pub pct_change: Option<f64>,
}

/// Salary, tenure and headcount statistics over a filtered view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub avg_base_salary: Option<f64>,
    pub avg_years_worked: Option<f64>,
    pub total_active_workers: usize,
}

/// One series of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    /// Chart type ("bar" or "line").
    pub kind: String,
    /// Axis this series is plotted against ("y" or "y2").
    pub axis: String,
    pub color: String,
    pub x: Vec<i32>,
    /// Missing points are kept as gaps.
    pub y: Vec<Option<f64>>,
}

/// Dual-axis chart payload for the hiring-rate view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub y2_axis_title: String,
    pub bars: Series,
    pub line: Series,
}

/// A single labeled metric card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

/// The three metric cards of the aggregate view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSpec {
    pub cards: Vec<MetricCard>,
}

/// Metadata about the dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Location the dataset was loaded from.
    pub source: String,
    /// Date and time the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Rows returned by the source.
    pub rows_loaded: usize,
    /// Rows kept in the canonical table.
    pub rows_retained: usize,
    /// Rows matching the active filter.
    pub rows_matched: usize,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete dashboard: metrics cards plus the hiring chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    pub metrics: MetricsSpec,
    pub chart: ChartSpec,
    /// Table rows backing the chart, most recent year first.
    pub hiring_rates: Vec<HiringRate>,
}
