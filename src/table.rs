//! The canonical payroll table.
//!
//! Built once from a raw snapshot and never mutated afterwards. Queries
//! borrow it and produce transient views.

use crate::enrich::{enrich, EnrichSettings, EnrichStats};
use crate::error::EnrichError;
use crate::models::{EnrichedRecord, RawRecord};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Lower bound of the salary slider in the dashboard controls.
const SALARY_SLIDER_FLOOR: f64 = 10000.0;

/// Immutable, cheaply clonable handle to the enriched records.
#[derive(Debug, Clone)]
pub struct CanonicalTable {
    records: Arc<[EnrichedRecord]>,
}

/// Values the filter controls may take, derived from the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDomain {
    /// Distinct agencies in first-appearance order.
    pub agencies: Vec<String>,
    /// Distinct job titles in first-appearance order.
    pub titles: Vec<String>,
    /// Observed `(min, max)` start year; `None` for an empty table.
    pub year_bounds: Option<(i32, i32)>,
    /// Salary slider range; `None` for an empty table.
    pub salary_bounds: Option<(f64, f64)>,
}

impl CanonicalTable {
    /// Enrich a raw snapshot into a canonical table.
    pub fn build(
        rows: &[RawRecord],
        settings: &EnrichSettings,
    ) -> Result<(Self, EnrichStats), EnrichError> {
        let (records, stats) = enrich(rows, settings)?;
        Ok((Self::from_records(records), stats))
    }

    /// Wrap already-enriched records.
    pub fn from_records(records: Vec<EnrichedRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compute the domains for the agency, title, year and salary controls.
    pub fn filter_domain(&self) -> FilterDomain {
        FilterDomain {
            agencies: distinct(self.records.iter().map(|r| r.agency_name.as_deref())),
            titles: distinct(self.records.iter().map(|r| r.title_description.as_deref())),
            year_bounds: self.year_bounds(),
            salary_bounds: self
                .records
                .iter()
                .map(|r| r.base_salary)
                .reduce(f64::max)
                .map(|max| (SALARY_SLIDER_FLOOR, max)),
        }
    }

    /// Observed `(min, max)` start year.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.start_year).min()?;
        let max = self.records.iter().map(|r| r.start_year).max()?;
        Some((min, max))
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|value| seen.insert(*value))
        .map(String::from)
        .collect()
}
