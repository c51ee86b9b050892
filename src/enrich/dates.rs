//! Lenient parsing of agency start dates.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Earliest and latest years a nanosecond timestamp can represent.
const MIN_YEAR: i32 = 1678;
const MAX_YEAR: i32 = 2261;

/// Parse a start date, returning `None` for anything unrecognized.
///
/// Accepts ISO dates, US `MM/DD/YYYY` dates and both with a time part.
/// Years outside the nanosecond-timestamp range count as unparsable.
pub fn parse_start_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|datetime| datetime.date())
        })?;

    (MIN_YEAR..=MAX_YEAR)
        .contains(&date.year())
        .then_some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_plain_dates() {
        assert_eq!(parse_start_date("2015-07-20"), Some(ymd(2015, 7, 20)));
        assert_eq!(parse_start_date("07/20/2015"), Some(ymd(2015, 7, 20)));
        assert_eq!(parse_start_date("2015/07/20"), Some(ymd(2015, 7, 20)));
        assert_eq!(parse_start_date("  1999-01-04 "), Some(ymd(1999, 1, 4)));
    }

    #[test]
    fn test_dates_with_time() {
        assert_eq!(
            parse_start_date("2015-07-20T00:00:00.000"),
            Some(ymd(2015, 7, 20))
        );
        assert_eq!(
            parse_start_date("2015-07-20 08:30:00"),
            Some(ymd(2015, 7, 20))
        );
        assert_eq!(
            parse_start_date("07/20/2015 12:00:00 AM"),
            Some(ymd(2015, 7, 20))
        );
        assert_eq!(parse_start_date("07/20/2015 13:45"), Some(ymd(2015, 7, 20)));
    }

    #[test]
    fn test_unparsable() {
        assert_eq!(parse_start_date(""), None);
        assert_eq!(parse_start_date("not a date"), None);
        assert_eq!(parse_start_date("13/45/2015"), None);
        assert_eq!(parse_start_date("2015-02-30"), None);
    }

    #[test]
    fn test_out_of_timestamp_range() {
        assert_eq!(parse_start_date("01/01/9999"), None);
        assert_eq!(parse_start_date("1200-01-01"), None);
        assert_eq!(parse_start_date("2261-12-31"), Some(ymd(2261, 12, 31)));
    }
}
