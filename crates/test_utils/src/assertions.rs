//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::DayOfMonth;
use domain_ledger::MonthSheet;
use domain_sales::Bill;

/// Asserts that every cell of a sheet satisfies the closing equation and
/// that consecutive days hand their balance forward
///
/// # Panics
///
/// Panics with the audit failure when either invariant is broken.
pub fn assert_sheet_balanced(sheet: &MonthSheet) {
    if let Err(err) = sheet.audit() {
        panic!(
            "sheet for {} in {} failed its audit: {}",
            sheet.item(),
            sheet.month(),
            err
        );
    }
}

/// Asserts one day's closing balance
///
/// # Panics
///
/// Panics if the day has no cell or the closing differs.
pub fn assert_closing(sheet: &MonthSheet, day: u32, expected: i64) {
    let day = DayOfMonth::new(day).expect("test supplied a valid day");
    let cell = sheet
        .cell(day)
        .unwrap_or_else(|| panic!("no ledger cell for day {} of {}", day, sheet.month()));
    assert_eq!(
        cell.closing, expected,
        "closing for day {} of {}: expected {}, got {}",
        day,
        sheet.month(),
        expected,
        cell.closing
    );
}

/// Asserts that bill numbers run 1 through n with no gaps
///
/// The slice is expected in ascending number order, as the stores
/// return it.
pub fn assert_gapless(bills: &[Bill]) {
    for (index, bill) in bills.iter().enumerate() {
        let expected = index as u32 + 1;
        assert_eq!(
            bill.bill_no().suffix(),
            expected,
            "bill sequence has a gap: position {} holds {}",
            index,
            bill.bill_no()
        );
    }
}

/// Asserts that bill dates never decrease along the slice
pub fn assert_dates_ascending(bills: &[Bill]) {
    for pair in bills.windows(2) {
        assert!(
            pair[0].header.date <= pair[1].header.date,
            "bill dates go backwards: {} on {} precedes {} on {}",
            pair[0].bill_no(),
            pair[0].header.date,
            pair[1].bill_no(),
            pair[1].header.date
        );
    }
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err matching {}, got Ok({:?})",
                stringify!($pattern),
                value
            ),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}
