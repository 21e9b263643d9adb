//! Gapless bill number allocation
//!
//! The next number for a company is one past the highest on record,
//! computed under the store's sequence lock so concurrent runs cannot
//! read the same maximum. A candidate that still turns out to be taken
//! (a row committed between lock acquisition and the read on stores
//! with weaker locks) is skipped, up to a bounded number of attempts.

use core_kernel::{BillNo, CompanyId};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::generate::SalesEngine;
use crate::store::SalesUnit;

/// Allocates the next usable bill number for a company.
#[derive(Debug, Clone)]
pub struct BillSequencer {
    retry_budget: u32,
}

impl BillSequencer {
    pub fn new(retry_budget: u32) -> Self {
        Self { retry_budget }
    }

    /// Produces the next free bill number within the given unit.
    ///
    /// The first bill of a company is number 1. The sequence lock stays
    /// held until the unit commits or rolls back, which is what keeps
    /// the at-rest sequence gapless.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Conflict`] when every candidate within the
    /// retry budget is already taken.
    pub async fn next_bill_no(
        &self,
        unit: &mut dyn SalesUnit,
        company: &CompanyId,
    ) -> Result<BillNo, EngineError> {
        unit.lock_bill_sequence(company).await?;

        let mut candidate = match unit.max_bill_number(company).await? {
            Some(max) => max.next(),
            None => BillNo::from_suffix(1),
        };

        for attempt in 0..=self.retry_budget {
            if !unit.bill_exists(company, candidate).await? {
                if attempt > 0 {
                    debug!(%company, %candidate, attempt, "bill number allocated after collision");
                }
                return Ok(candidate);
            }
            candidate = candidate.next();
        }

        Err(EngineError::conflict(format!(
            "bill number allocation for company {} gave up after {} attempts",
            company, self.retry_budget
        )))
    }
}

/// Scans a company's stored bill numbers and reports the first gap.
///
/// A sequence is gapless when every number from 1 to the maximum is
/// present. Bills come back ascending, so the first suffix that does not
/// match its position is the gap.
pub async fn first_gap(
    unit: &mut dyn SalesUnit,
    company: &CompanyId,
) -> Result<Option<BillNo>, EngineError> {
    let bills = unit.bills_above(company, BillNo::from_suffix(0)).await?;
    for (position, bill) in bills.iter().enumerate() {
        let expected = position as u32 + 1;
        if bill.bill_no().suffix() != expected {
            return Ok(Some(BillNo::from_suffix(expected)));
        }
    }
    Ok(None)
}

impl SalesEngine {
    /// Audits a company's bill sequence.
    ///
    /// Returns the first missing number, or `None` when the sequence is
    /// contiguous from 1. Read-only; the unit it opens is always rolled
    /// back.
    pub async fn verify_sequence(
        &self,
        company: &CompanyId,
    ) -> Result<Option<BillNo>, EngineError> {
        let mut unit = self.store().begin().await?;
        let gap = first_gap(&mut *unit, company).await;
        if let Err(err) = unit.rollback().await {
            warn!(error = %err, "rollback after sequence audit failed");
        }
        gap
    }
}
