//! Error types for loading and enriching the payroll dataset.

use thiserror::Error;

/// Failures while obtaining raw rows from a dataset source.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Source unavailable: {source_id} ({reason})")]
    SourceUnavailable { source_id: String, reason: String },

    #[error("Source returned no rows: {source_id}")]
    SourceEmpty { source_id: String },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures while coercing raw rows into enriched records.
#[derive(Error, Debug, PartialEq)]
pub enum EnrichError {
    #[error("Column '{column}' has a non-numeric value {value:?} at row {row}")]
    ColumnParse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Column 'fiscal_year' has a non-integer value {value:?} at row {row}")]
    FiscalYear { row: usize, value: String },
}

/// Invalid filter inputs.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Year range is inverted: {min} > {max}")]
    InvertedYearRange { min: i32, max: i32 },
}
