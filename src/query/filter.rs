//! Agency / title / start-year filtering of the canonical table.

use crate::error::FilterError;
use crate::models::EnrichedRecord;
use crate::schema::values::ALL;
use crate::table::CanonicalTable;
use serde::Serialize;

/// Inclusive range of start years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self, FilterError> {
        if min > max {
            return Err(FilterError::InvertedYearRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Narrow this range to `bounds`. Returns `None` if they do not overlap.
    pub fn clamp_to(&self, bounds: (i32, i32)) -> Option<Self> {
        let (lo, hi) = bounds;
        let min = self.min.max(lo);
        let max = self.max.min(hi);
        (min <= max).then_some(Self { min, max })
    }
}

/// The active selection of the three filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub agency: Option<String>,
    pub title: Option<String>,
    pub years: YearRange,
}

impl Filter {
    /// Build a filter; `"All"` for agency or title means unset.
    pub fn new(agency: Option<&str>, title: Option<&str>, years: YearRange) -> Self {
        let selected = |value: Option<&str>| value.filter(|v| *v != ALL).map(String::from);
        Self {
            agency: selected(agency),
            title: selected(title),
            years,
        }
    }

    /// A filter with no agency or title selection.
    #[allow(dead_code)] // Convenience for callers without dropdown selections
    pub fn years_only(years: YearRange) -> Self {
        Self::new(None, None, years)
    }

    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        let agency_ok = self
            .agency
            .as_deref()
            .map_or(true, |agency| record.agency_name.as_deref() == Some(agency));
        let title_ok = self
            .title
            .as_deref()
            .map_or(true, |title| record.title_description.as_deref() == Some(title));

        agency_ok && title_ok && self.years.contains(record.start_year)
    }
}

/// Rows of the table that satisfy the filter, in table order.
pub fn filter_rows<'a>(table: &'a CanonicalTable, filter: &Filter) -> Vec<&'a EnrichedRecord> {
    table
        .records()
        .iter()
        .filter(|record| filter.matches(record))
        .collect()
}
