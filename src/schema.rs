//! Column-name constants for the payroll dataset.
//!
//! The raw CSV header is the only format contract the tool relies on.

// ── Categorical columns ─────────────────────────────────────────────────────
pub const AGENCY_NAME: &str = "agency_name";
pub const TITLE_DESCRIPTION: &str = "title_description";
pub const PAY_BASIS: &str = "pay_basis";
pub const LEAVE_STATUS: &str = "leave_status_as_of_june_30";

// ── Date / year columns ─────────────────────────────────────────────────────
pub const AGENCY_START_DATE: &str = "agency_start_date";
pub const FISCAL_YEAR: &str = "fiscal_year";

// ── Numeric columns ─────────────────────────────────────────────────────────
pub const BASE_SALARY: &str = "base_salary";
pub const REGULAR_HOURS: &str = "regular_hours";
pub const REGULAR_GROSS_PAID: &str = "regular_gross_paid";
pub const OT_HOURS: &str = "ot_hours";
pub const TOTAL_OT_PAID: &str = "total_ot_paid";
pub const TOTAL_OTHER_PAY: &str = "total_other_pay";

/// Columns coerced to floating point as a whole; one bad cell fails the load.
pub const NUMERIC: [&str; 6] = [
    BASE_SALARY,
    REGULAR_HOURS,
    REGULAR_GROSS_PAID,
    OT_HOURS,
    TOTAL_OT_PAID,
    TOTAL_OTHER_PAY,
];

/// Every column that must be present in the header.
pub const REQUIRED: [&str; 12] = [
    AGENCY_NAME,
    TITLE_DESCRIPTION,
    PAY_BASIS,
    AGENCY_START_DATE,
    FISCAL_YEAR,
    BASE_SALARY,
    REGULAR_HOURS,
    REGULAR_GROSS_PAID,
    OT_HOURS,
    TOTAL_OT_PAID,
    TOTAL_OTHER_PAY,
    LEAVE_STATUS,
];

// ── Domain values ───────────────────────────────────────────────────────────
pub mod values {
    /// Pay basis whose salary is an hourly rate.
    pub const PER_HOUR: &str = "per Hour";
    /// Substring marking an active employee in the leave status column.
    pub const ACTIVE: &str = "ACTIVE";
    /// Dropdown value meaning "no filter".
    pub const ALL: &str = "All";
}
