//! Year-over-year hiring counts.

use super::filter::{filter_rows, Filter};
use crate::models::HiringRate;
use crate::table::CanonicalTable;
use std::collections::BTreeMap;
use tracing::debug;

/// Number of most recent years reported by default.
pub const DEFAULT_MAX_YEARS: usize = 25;

/// Count hires per start year and the percent change against the prior year.
///
/// Percent change is computed on the ascending series; the result is
/// returned most recent first and truncated to `limit` years.
pub fn hiring_rates(table: &CanonicalTable, filter: &Filter, limit: usize) -> Vec<HiringRate> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for record in filter_rows(table, filter) {
        *counts.entry(record.start_year).or_default() += 1;
    }

    let mut previous: Option<usize> = None;
    let mut rates: Vec<HiringRate> = counts
        .into_iter()
        .map(|(start_year, num_hires)| {
            let pct_change = previous.map(|prior| pct_change(prior, num_hires));
            previous = Some(num_hires);
            HiringRate {
                start_year,
                num_hires,
                pct_change,
            }
        })
        .collect();

    debug!("Hiring series spans {} start years", rates.len());

    rates.reverse();
    rates.truncate(limit);
    rates
}

fn pct_change(prior: usize, current: usize) -> f64 {
    (current as f64 - prior as f64) / prior as f64 * 100.0
}
