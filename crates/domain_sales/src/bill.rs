//! Bill modelling
//!
//! A bill is a header plus the lines sold under it, created atomically
//! and only ever removed through the deletion protocol. The header total
//! always equals the sum of line amounts before discount.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BillNo, CompanyId, ItemCode};

use crate::error::SalesError;
use crate::item::LiquorMode;

/// A line item on a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    pub item: ItemCode,
    pub qty: u32,
    /// Unit rate at sale time
    pub rate: Decimal,
    /// Extended amount, qty times rate
    pub amount: Decimal,
}

impl BillLine {
    /// Creates a line, computing the extended amount
    pub fn new(item: ItemCode, qty: u32, rate: Decimal) -> Self {
        let amount = rate * Decimal::from(qty);
        Self {
            item,
            qty,
            rate,
            amount,
        }
    }
}

/// Bill header fields as persisted alongside the lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillHeader {
    /// Unique per company, sequential
    pub bill_no: BillNo,
    /// Sale date the ledger books this bill under
    pub date: NaiveDate,
    pub company: CompanyId,
    pub mode: LiquorMode,
    /// Sum of line amounts before discount
    pub total_amount: Decimal,
    pub discount: Decimal,
    /// Total after discount
    pub net_amount: Decimal,
}

/// A bill: header plus its full line set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub header: BillHeader,
    pub lines: Vec<BillLine>,
}

impl Bill {
    /// Creates a bill from its lines, computing header totals
    ///
    /// # Errors
    ///
    /// Returns `SalesError::EmptyBill` when `lines` is empty.
    pub fn new(
        bill_no: BillNo,
        date: NaiveDate,
        company: CompanyId,
        mode: LiquorMode,
        lines: Vec<BillLine>,
    ) -> Result<Self, SalesError> {
        if lines.is_empty() {
            return Err(SalesError::EmptyBill { bill_no });
        }

        let total_amount: Decimal = lines.iter().map(|l| l.amount).sum();
        Ok(Self {
            header: BillHeader {
                bill_no,
                date,
                company,
                mode,
                total_amount,
                discount: Decimal::ZERO,
                net_amount: total_amount,
            },
            lines,
        })
    }

    /// Applies a discount, recomputing the net amount
    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.header.discount = discount;
        self.header.net_amount = self.header.total_amount - discount;
        self
    }

    pub fn bill_no(&self) -> BillNo {
        self.header.bill_no
    }

    /// Sum of line amounts
    pub fn line_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount).sum()
    }

    /// Checks the header total against the lines
    ///
    /// # Errors
    ///
    /// Returns `SalesError::TotalMismatch` when they disagree.
    pub fn verify_totals(&self) -> Result<(), SalesError> {
        let line_total = self.line_total();
        if line_total != self.header.total_amount {
            return Err(SalesError::TotalMismatch {
                bill_no: self.header.bill_no,
                line_total,
                header_total: self.header.total_amount,
            });
        }
        Ok(())
    }

    /// The same bill under a different number
    ///
    /// Everything except the bill number is preserved; this is the
    /// restore half of the renumbering protocol.
    pub fn renumbered(mut self, new_no: BillNo) -> Self {
        self.header.bill_no = new_no;
        self
    }
}
