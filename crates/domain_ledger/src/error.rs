//! Ledger domain errors

use core_kernel::{DayOfMonth, MonthKey};
use thiserror::Error;

/// Errors raised by ledger sheet and cell operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// The sheet has no cell for the requested day. Cells are provisioned
    /// ahead of posting; posting never creates them.
    #[error("no ledger cell for day {day} of {month}")]
    MissingCell { month: MonthKey, day: DayOfMonth },

    /// The day does not occur in the sheet's month (e.g. day 31 in April).
    #[error("day {day} does not occur in {month}")]
    InvalidDay { month: MonthKey, day: DayOfMonth },

    /// Posting would drive a closing balance below zero while negative
    /// stock is disallowed.
    #[error("insufficient stock on day {day} of {month}: closing would be {closing}")]
    InsufficientStock {
        month: MonthKey,
        day: DayOfMonth,
        closing: i64,
    },

    /// A cell no longer satisfies closing = opening + purchase - sales + adjustment.
    #[error(
        "ledger cell for day {day} of {month} is out of balance: closing {actual}, expected {expected}"
    )]
    UnbalancedCell {
        month: MonthKey,
        day: DayOfMonth,
        expected: i64,
        actual: i64,
    },

    /// A day opens with a different balance than the previous day closed with.
    #[error(
        "day {day} of {month} opens at {opening} but the previous day closed at {prior_closing}"
    )]
    BrokenContinuity {
        month: MonthKey,
        day: DayOfMonth,
        opening: i64,
        prior_closing: i64,
    },
}

impl LedgerError {
    /// True when the error indicates a missing cell rather than a rule violation.
    pub fn is_missing_cell(&self) -> bool {
        matches!(self, LedgerError::MissingCell { .. })
    }
}
