//! Physical table resolution for month sheets
//!
//! Ledger cells for the present calendar month live in the live table;
//! every other month is kept in its own archived table named after the
//! month. Callers address sheets by `(company, item, month)` and this
//! module decides which physical table backs that month.
//!
//! Table names are assembled from the validated numeric fields of a
//! [`MonthKey`], never from raw input, so they are safe to interpolate
//! into SQL as identifiers.

use core_kernel::MonthKey;

/// Table holding the present calendar month's sheets
pub const LIVE_SHEET_TABLE: &str = "stock_ledger";

/// Returns the archived table name for a month, e.g. `stock_ledger_202406`
pub fn archived_sheet_table(month: MonthKey) -> String {
    format!(
        "{}_{:04}{:02}",
        LIVE_SHEET_TABLE,
        month.year(),
        month.month()
    )
}

/// Resolves the physical table backing a month's sheets
///
/// # Arguments
///
/// * `month` - The month being addressed
/// * `current` - The present calendar month at access time
pub fn sheet_table(month: MonthKey, current: MonthKey) -> String {
    if month == current {
        LIVE_SHEET_TABLE.to_string()
    } else {
        archived_sheet_table(month)
    }
}
