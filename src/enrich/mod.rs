//! Raw-to-canonical record enrichment.
//!
//! Turns raw payroll rows into typed records with derived tenure and pay
//! fields. Numeric columns are coerced as a whole: a single unparsable
//! cell fails the load. Rows with an unparsable start date, a start year
//! past the horizon, or a non-positive normalized salary are dropped.

mod dates;

pub use dates::parse_start_date;

use crate::error::EnrichError;
use crate::models::{EnrichedRecord, RawRecord, TenureBucket};
use crate::schema;
use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, info};

/// Tunable thresholds for enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichSettings {
    /// Rows with a later start year are excluded.
    pub max_start_year: i32,
    /// Rows whose normalized salary is not above this are excluded.
    pub min_base_salary: f64,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            max_start_year: 2024,
            min_base_salary: 1.0,
        }
    }
}

impl From<&crate::config::EnrichConfig> for EnrichSettings {
    fn from(config: &crate::config::EnrichConfig) -> Self {
        Self {
            max_start_year: config.max_start_year,
            min_base_salary: config.min_base_salary,
        }
    }
}

/// Row counts observed during enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichStats {
    pub rows_in: usize,
    pub dropped_bad_date: usize,
    pub dropped_future_start: usize,
    pub dropped_low_salary: usize,
    pub rows_out: usize,
}

/// Coerced values of the six numeric columns for one row.
#[derive(Debug, Clone, Copy, Default)]
struct NumericCells {
    base_salary: Option<f64>,
    regular_hours: Option<f64>,
    regular_gross_paid: Option<f64>,
    ot_hours: Option<f64>,
    total_ot_paid: Option<f64>,
    total_other_pay: Option<f64>,
}

impl NumericCells {
    fn slot(&mut self, column: &str) -> Option<&mut Option<f64>> {
        match column {
            schema::BASE_SALARY => Some(&mut self.base_salary),
            schema::REGULAR_HOURS => Some(&mut self.regular_hours),
            schema::REGULAR_GROSS_PAID => Some(&mut self.regular_gross_paid),
            schema::OT_HOURS => Some(&mut self.ot_hours),
            schema::TOTAL_OT_PAID => Some(&mut self.total_ot_paid),
            schema::TOTAL_OTHER_PAY => Some(&mut self.total_other_pay),
            _ => None,
        }
    }
}

/// Enrich raw rows into canonical records.
///
/// Deterministic and pure: the same input always yields the same output.
pub fn enrich(
    rows: &[RawRecord],
    settings: &EnrichSettings,
) -> Result<(Vec<EnrichedRecord>, EnrichStats), EnrichError> {
    let numerics = coerce_numeric_columns(rows)?;

    let mut stats = EnrichStats {
        rows_in: rows.len(),
        ..EnrichStats::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for (index, (raw, cells)) in rows.iter().zip(numerics).enumerate() {
        let Some(start_date) = raw.agency_start_date.as_deref().and_then(parse_start_date) else {
            stats.dropped_bad_date += 1;
            continue;
        };

        let start_year = start_date.year();
        let fiscal_year = parse_fiscal_year(raw.fiscal_year.as_deref(), index + 1)?;
        let years_worked = fiscal_year
            .checked_sub(start_year)
            .ok_or_else(|| EnrichError::FiscalYear {
                row: index + 1,
                value: raw.fiscal_year.as_deref().unwrap_or("").trim().to_string(),
            })?;
        let pay_basis = raw.pay_basis.as_deref().map(|basis| basis.trim().to_string());
        let hourly_rate = hourly_rate(cells.base_salary, cells.regular_hours);

        if start_year > settings.max_start_year {
            stats.dropped_future_start += 1;
            continue;
        }

        let base_salary = if pay_basis.as_deref() == Some(schema::values::PER_HOUR) {
            cells.base_salary.zip(cells.regular_hours).map(|(rate, hours)| rate * hours)
        } else {
            cells.base_salary
        };

        let Some(base_salary) = base_salary.filter(|salary| *salary > settings.min_base_salary)
        else {
            stats.dropped_low_salary += 1;
            continue;
        };

        records.push(EnrichedRecord {
            agency_name: raw.agency_name.clone(),
            title_description: raw.title_description.clone(),
            pay_basis,
            agency_start_date: start_date,
            start_year,
            fiscal_year,
            years_worked,
            years_worked_cat: TenureBucket::from_years(years_worked),
            hourly_rate,
            base_salary,
            regular_hours: cells.regular_hours,
            regular_gross_paid: cells.regular_gross_paid,
            ot_hours: cells.ot_hours,
            total_ot_paid: cells.total_ot_paid,
            total_other_pay: cells.total_other_pay,
            leave_status_as_of_june_30: raw.leave_status_as_of_june_30.clone(),
        });
    }

    stats.rows_out = records.len();
    info!(
        "Enriched {} of {} rows (dropped: {} bad date, {} future start, {} low salary)",
        stats.rows_out,
        stats.rows_in,
        stats.dropped_bad_date,
        stats.dropped_future_start,
        stats.dropped_low_salary
    );

    Ok((records, stats))
}

/// Coerce every numeric column of every row, column by column.
fn coerce_numeric_columns(rows: &[RawRecord]) -> Result<Vec<NumericCells>, EnrichError> {
    let mut cells = vec![NumericCells::default(); rows.len()];

    for column in schema::NUMERIC {
        for (index, raw) in rows.iter().enumerate() {
            let value = parse_numeric(raw.cell(column)).map_err(|value| EnrichError::ColumnParse {
                column: column.to_string(),
                row: index + 1,
                value,
            })?;
            if let Some(slot) = cells[index].slot(column) {
                *slot = value;
            }
        }
        debug!("Coerced column {} to float", column);
    }

    Ok(cells)
}

/// Parse a numeric cell. Null and NaN are absent; bad text is returned as the error.
fn parse_numeric(cell: Option<&str>) -> Result<Option<f64>, String> {
    let Some(text) = cell else {
        return Ok(None);
    };

    match text.trim().parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(text.to_string()),
    }
}

/// Parse a fiscal year written as an integer or a float; fractions truncate toward zero.
fn parse_fiscal_year(cell: Option<&str>, row: usize) -> Result<i32, EnrichError> {
    let text = cell.unwrap_or("").trim();
    let invalid = || EnrichError::FiscalYear {
        row,
        value: text.to_string(),
    };

    if let Ok(year) = text.parse::<i32>() {
        return Ok(year);
    }

    let value = text.parse::<f64>().map_err(|_| invalid())?.trunc();
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(invalid())
    }
}

/// Salary per regular hour; absent when an operand is missing or the quotient is not finite.
fn hourly_rate(base_salary: Option<f64>, regular_hours: Option<f64>) -> Option<f64> {
    let (salary, hours) = base_salary.zip(regular_hours)?;
    let rate = salary / hours;
    rate.is_finite().then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start_date: &str, fiscal_year: &str, pay_basis: &str, salary: &str, hours: &str) -> RawRecord {
        RawRecord {
            agency_name: Some("POLICE DEPARTMENT".to_string()),
            title_description: Some("POLICE OFFICER".to_string()),
            pay_basis: Some(pay_basis.to_string()),
            agency_start_date: Some(start_date.to_string()),
            fiscal_year: Some(fiscal_year.to_string()),
            base_salary: Some(salary.to_string()),
            regular_hours: Some(hours.to_string()),
            regular_gross_paid: Some("0".to_string()),
            ot_hours: Some("0".to_string()),
            total_ot_paid: Some("0".to_string()),
            total_other_pay: Some("0".to_string()),
            leave_status_as_of_june_30: Some("ACTIVE".to_string()),
        }
    }

    fn run(rows: &[RawRecord]) -> (Vec<EnrichedRecord>, EnrichStats) {
        enrich(rows, &EnrichSettings::default()).unwrap()
    }

    #[test]
    fn test_hourly_normalization() {
        let (records, _) = run(&[raw("2015-07-01", "2021", "per Hour", "25.0", "40")]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].base_salary, 1000.0);
        assert_eq!(records[0].hourly_rate, Some(25.0 / 40.0));
    }

    #[test]
    fn test_pay_basis_is_trimmed_before_matching() {
        let (records, _) = run(&[raw("2015-07-01", "2021", "  per Hour ", "20", "100")]);

        assert_eq!(records[0].pay_basis.as_deref(), Some("per Hour"));
        assert_eq!(records[0].base_salary, 2000.0);
    }

    #[test]
    fn test_annual_salary_unchanged() {
        let (records, _) = run(&[raw("2015-07-01", "2021", "per Annum", "85000", "2080")]);

        assert_eq!(records[0].base_salary, 85000.0);
        assert_eq!(records[0].hourly_rate, Some(85000.0 / 2080.0));
    }

    #[test]
    fn test_derived_tenure_fields() {
        let (records, _) = run(&[
            raw("07/01/2015", "2021", "per Annum", "85000", "2080"),
            raw("2016-01-01", "2021", "per Annum", "85000", "2080"),
            raw("2023-03-01", "2021", "per Annum", "85000", "2080"),
        ]);

        assert_eq!(records[0].start_year, 2015);
        assert_eq!(records[0].fiscal_year, 2021);
        assert_eq!(records[0].years_worked, 6);
        assert_eq!(records[0].years_worked_cat, TenureBucket::From6To10);

        assert_eq!(records[1].years_worked, 5);
        assert_eq!(records[1].years_worked_cat.label(), "6 - 10 years");

        // Negative tenure is kept as-is.
        assert_eq!(records[2].years_worked, -2);
        assert_eq!(records[2].years_worked_cat, TenureBucket::LessThan5);
    }

    #[test]
    fn test_bad_dates_are_dropped() {
        let mut missing = raw("", "2021", "per Annum", "85000", "2080");
        missing.agency_start_date = None;

        let rows = vec![
            raw("2015-07-01", "2021", "per Annum", "85000", "2080"),
            raw("not a date", "2021", "per Annum", "85000", "2080"),
            missing,
            raw("2010-02-30", "2021", "per Annum", "85000", "2080"),
        ];
        let (records, stats) = run(&rows);

        assert_eq!(records.len(), 1);
        assert_eq!(stats.dropped_bad_date, 3);
        assert_eq!(rows.len() - records.len(), stats.dropped_bad_date);
    }

    #[test]
    fn test_future_start_years_are_dropped() {
        let (records, stats) = run(&[
            raw("2024-12-31", "2025", "per Annum", "85000", "2080"),
            raw("2025-01-01", "2025", "per Annum", "85000", "2080"),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_year, 2024);
        assert_eq!(stats.dropped_future_start, 1);
    }

    #[test]
    fn test_low_salaries_are_dropped_after_normalization() {
        let (records, stats) = run(&[
            raw("2015-07-01", "2021", "per Annum", "1", "2080"),
            raw("2015-07-01", "2021", "per Annum", "0", "2080"),
            raw("2015-07-01", "2021", "per Annum", "-500", "2080"),
            // 0.5/hour is below the floor before normalization but not after.
            raw("2015-07-01", "2021", "per Hour", "0.5", "100"),
            // Hourly pay with zero hours normalizes to zero.
            raw("2015-07-01", "2021", "per Hour", "30", "0"),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].base_salary, 50.0);
        assert_eq!(stats.dropped_low_salary, 4);
    }

    #[test]
    fn test_zero_hours_rate_is_absent() {
        let (records, _) = run(&[raw("2015-07-01", "2021", "per Annum", "60000", "0")]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hourly_rate, None);
        assert_eq!(records[0].base_salary, 60000.0);
    }

    #[test]
    fn test_missing_numeric_cells_are_absent() {
        let mut row = raw("2015-07-01", "2021", "per Annum", "60000", "2080");
        row.ot_hours = None;
        row.total_ot_paid = Some("NaN".to_string());

        let mut no_salary = raw("2015-07-01", "2021", "per Annum", "", "2080");
        no_salary.base_salary = None;

        let (records, stats) = run(&[row, no_salary]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ot_hours, None);
        assert_eq!(records[0].total_ot_paid, None);
        assert_eq!(stats.dropped_low_salary, 1);
    }

    #[test]
    fn test_unparsable_numeric_is_fatal() {
        // The bad cell sits on a row that would be dropped for its date; it still fails.
        let mut bad = raw("garbage", "2021", "per Annum", "85000", "2080");
        bad.regular_gross_paid = Some("$1,200".to_string());

        let rows = vec![raw("2015-07-01", "2021", "per Annum", "85000", "2080"), bad];
        let err = enrich(&rows, &EnrichSettings::default()).unwrap_err();

        assert_eq!(
            err,
            EnrichError::ColumnParse {
                column: "regular_gross_paid".to_string(),
                row: 2,
                value: "$1,200".to_string(),
            }
        );
    }

    #[test]
    fn test_first_failing_column_is_reported() {
        let mut row = raw("2015-07-01", "2021", "per Annum", "abc", "2080");
        row.ot_hours = Some("xyz".to_string());

        let err = enrich(&[row], &EnrichSettings::default()).unwrap_err();
        assert!(matches!(err, EnrichError::ColumnParse { ref column, .. } if column == "base_salary"));
    }

    #[test]
    fn test_null_token_salary_is_dropped_not_fatal() {
        let data = "fiscal_year,agency_name,agency_start_date,title_description,leave_status_as_of_june_30,base_salary,pay_basis,regular_hours,regular_gross_paid,ot_hours,total_ot_paid,total_other_pay\n\
                    2021,FIRE,2010-01-04,FIREFIGHTER,ACTIVE,N/A,per Annum,2080,NULL,#N/A,NA,n/a\n\
                    2021,FIRE,2012-03-01,FIREFIGHTER,ACTIVE,80000,per Annum,NaN,80000,0,0,0\n";
        let rows = crate::loader::parse_csv("payroll.csv", data.as_bytes()).unwrap();

        let (records, stats) = run(&rows);
        assert_eq!(stats.dropped_low_salary, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].base_salary, 80000.0);
        assert_eq!(records[0].regular_hours, None);
        assert_eq!(records[0].hourly_rate, None);
    }

    #[test]
    fn test_fiscal_year_parsing() {
        let (records, _) = run(&[raw("2015-07-01", "2021.0", "per Annum", "85000", "2080")]);
        assert_eq!(records[0].fiscal_year, 2021);

        let err = enrich(
            &[raw("2015-07-01", "FY21", "per Annum", "85000", "2080")],
            &EnrichSettings::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EnrichError::FiscalYear {
                row: 1,
                value: "FY21".to_string()
            }
        );
    }

    #[test]
    fn test_fractional_fiscal_year_truncates() {
        let (records, _) = run(&[raw("2015-07-01", "2021.5", "per Annum", "85000", "2080")]);
        assert_eq!(records[0].fiscal_year, 2021);
        assert_eq!(records[0].years_worked, 6);

        let err = enrich(
            &[raw("2015-07-01", "inf", "per Annum", "85000", "2080")],
            &EnrichSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EnrichError::FiscalYear { row: 1, .. }));
    }

    #[test]
    fn test_extreme_fiscal_year_is_rejected() {
        let err = enrich(
            &[raw("2015-07-01", "-2147483648", "per Annum", "50000", "2080")],
            &EnrichSettings::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EnrichError::FiscalYear {
                row: 1,
                value: "-2147483648".to_string()
            }
        );

        // The far end of the range still fits.
        let (records, _) = run(&[raw("2015-07-01", "2147483647", "per Annum", "50000", "2080")]);
        assert_eq!(records[0].years_worked, 2147483647 - 2015);
    }

    #[test]
    fn test_canonical_invariants_hold() {
        let rows: Vec<RawRecord> = (0..60)
            .map(|i| {
                let year = 1990 + i;
                let basis = if i % 3 == 0 { "per Hour" } else { "per Annum" };
                let salary = format!("{}", (i as f64 - 10.0) * 3.5);
                raw(&format!("{}-06-15", year), "2030", basis, &salary, "40")
            })
            .collect();

        let (records, stats) = run(&rows);
        assert!(records.iter().all(|r| r.start_year <= 2024));
        assert!(records.iter().all(|r| r.base_salary > 1.0));
        assert_eq!(
            stats.rows_in,
            stats.rows_out
                + stats.dropped_bad_date
                + stats.dropped_future_start
                + stats.dropped_low_salary
        );
    }

    #[test]
    fn test_enrich_is_deterministic() {
        let rows = vec![
            raw("2015-07-01", "2021", "per Hour", "25", "40"),
            raw("2001-01-01", "2021", "per Annum", "70000", "2080"),
        ];

        assert_eq!(run(&rows), run(&rows));
    }

    #[test]
    fn test_custom_settings() {
        let settings = EnrichSettings {
            max_start_year: 2010,
            min_base_salary: 50000.0,
        };
        let rows = vec![
            raw("2009-01-01", "2021", "per Annum", "60000", "2080"),
            raw("2011-01-01", "2021", "per Annum", "60000", "2080"),
            raw("2009-01-01", "2021", "per Annum", "40000", "2080"),
        ];

        let (records, stats) = enrich(&rows, &settings).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(stats.dropped_future_start, 1);
        assert_eq!(stats.dropped_low_salary, 1);
    }
}
