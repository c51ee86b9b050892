//! CSV decoding into raw payroll records.

use crate::error::LoadError;
use crate::models::RawRecord;
use crate::schema;
use tracing::debug;

/// Cell contents read as null in every column.
const NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Decode a CSV snapshot into raw records.
///
/// Columns are located by header name; extra columns are ignored. An
/// empty cell or one of [`NULL_TOKENS`] (matched exactly) becomes `None`. Fails if a required column is missing or
/// the snapshot has no data rows.
pub fn parse_csv(source_id: &str, data: &[u8]) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();

    let mut positions = Vec::with_capacity(schema::REQUIRED.len());
    for column in schema::REQUIRED {
        let position = headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or_else(|| LoadError::MissingColumn(column.to_string()))?;
        positions.push((column, position));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut raw = RawRecord::default();

        for (column, position) in &positions {
            let value = record
                .get(*position)
                .filter(|cell| !NULL_TOKENS.contains(cell))
                .map(String::from);
            raw.set_cell(column, value);
        }

        rows.push(raw);
    }

    if rows.is_empty() {
        return Err(LoadError::SourceEmpty {
            source_id: source_id.to_string(),
        });
    }

    debug!("Decoded {} rows from {}", rows.len(), source_id);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "fiscal_year,agency_name,agency_start_date,title_description,leave_status_as_of_june_30,base_salary,pay_basis,regular_hours,regular_gross_paid,ot_hours,total_ot_paid,total_other_pay\n";

    #[test]
    fn test_parse_rows() {
        let data = format!(
            "{}2021,POLICE DEPARTMENT,07/01/2015,POLICE OFFICER,ACTIVE,85000,per Annum,2080,84000,10,500,0\n\
             2021,DEPT OF ED,,TEACHER,ON LEAVE,25.5, per Hour ,1000,25500,,,\n",
            HEADER
        );

        let rows = parse_csv("payroll.csv", data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].agency_name.as_deref(), Some("POLICE DEPARTMENT"));
        assert_eq!(rows[0].agency_start_date.as_deref(), Some("07/01/2015"));
        assert_eq!(rows[0].base_salary.as_deref(), Some("85000"));

        // Empty cells are null; surrounding whitespace is preserved.
        assert_eq!(rows[1].agency_start_date, None);
        assert_eq!(rows[1].ot_hours, None);
        assert_eq!(rows[1].pay_basis.as_deref(), Some(" per Hour "));
    }

    #[test]
    fn test_null_tokens() {
        let data = format!(
            "{}2021,N/A,NULL,#N/A,<NA>,n/a,None,NA,nan,null,NaN,-nan\n",
            HEADER
        );

        let rows = parse_csv("payroll.csv", data.as_bytes()).unwrap();
        assert_eq!(
            rows[0],
            RawRecord {
                fiscal_year: Some("2021".to_string()),
                ..RawRecord::default()
            }
        );
    }

    #[test]
    fn test_null_tokens_match_whole_cell() {
        let data = format!(
            "{}2021,NA CORP, N/A,None Listed,ACTIVE,Null,per Annum,2080,0,0,0,0\n",
            HEADER
        );

        let rows = parse_csv("payroll.csv", data.as_bytes()).unwrap();
        assert_eq!(rows[0].agency_name.as_deref(), Some("NA CORP"));
        assert_eq!(rows[0].agency_start_date.as_deref(), Some(" N/A"));
        assert_eq!(rows[0].title_description.as_deref(), Some("None Listed"));
        assert_eq!(rows[0].base_salary.as_deref(), Some("Null"));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let data = "payroll_number,fiscal_year,agency_name,agency_start_date,title_description,leave_status_as_of_june_30,base_salary,pay_basis,regular_hours,regular_gross_paid,ot_hours,total_ot_paid,total_other_pay,work_location_borough\n\
                    17,2020,FIRE,2010-01-04,FIREFIGHTER,ACTIVE,90000,per Annum,2080,90000,0,0,0,BROOKLYN\n";

        let rows = parse_csv("payroll.csv", data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fiscal_year.as_deref(), Some("2020"));
        assert_eq!(rows[0].title_description.as_deref(), Some("FIREFIGHTER"));
    }

    #[test]
    fn test_missing_column() {
        let data = "fiscal_year,agency_name\n2020,FIRE\n";
        let err = parse_csv("payroll.csv", data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "title_description"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = parse_csv("payroll.csv", HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::SourceEmpty { ref source_id } if source_id == "payroll.csv"));
    }
}
