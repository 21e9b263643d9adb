//! Sales domain errors

use core_kernel::BillNo;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the sales domain
#[derive(Debug, Error)]
pub enum SalesError {
    /// A bill must carry at least one line
    #[error("Bill {bill_no} has no lines")]
    EmptyBill { bill_no: BillNo },

    /// Header total out of step with its lines
    #[error("Bill {bill_no} line total {line_total} does not match header total {header_total}")]
    TotalMismatch {
        bill_no: BillNo,
        line_total: Decimal,
        header_total: Decimal,
    },
}
