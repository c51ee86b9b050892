//! Salary, tenure and headcount statistics.

use super::filter::{filter_rows, Filter};
use crate::models::AggregateMetrics;
use crate::table::CanonicalTable;

/// Compute the aggregate metrics over the filtered view.
///
/// Means are `None` when no row matches.
pub fn aggregate_metrics(table: &CanonicalTable, filter: &Filter) -> AggregateMetrics {
    let rows = filter_rows(table, filter);

    AggregateMetrics {
        avg_base_salary: mean(rows.iter().map(|r| r.base_salary)),
        avg_years_worked: mean(rows.iter().map(|r| f64::from(r.years_worked))),
        total_active_workers: rows.iter().filter(|r| r.is_active()).count(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
