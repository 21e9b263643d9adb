//! Transactional store ports for bills, staging, stock, and ledger sheets
//!
//! The engine never talks to storage directly. It opens a [`SalesUnit`]
//! from a [`SalesStore`], performs every read and write of one run
//! against that unit, and then commits or rolls back. A unit maps to a
//! database transaction in production and to a guarded working copy in
//! the in-memory store; either way, nothing a unit writes is observable
//! until commit, and a dropped unit leaves no trace.
//!
//! Which physical table holds a given month's ledger cells (the live
//! month or an archived one) is the store's concern. Callers address
//! sheets by `(company, item, month)` and never learn where they live.

pub mod memory;

use async_trait::async_trait;
use core_kernel::{BillNo, CompanyId, DateRange, DomainPort, ItemCode, MonthKey, PortError};
use domain_ledger::{MonthSheet, StockBalance};
use domain_sales::Bill;

/// Entry point for transactional units of work.
#[async_trait]
pub trait SalesStore: DomainPort {
    /// Opens a new unit of work.
    ///
    /// Units from the same store serialize against each other at the
    /// store's discretion; the in-memory store admits one at a time.
    async fn begin(&self) -> Result<Box<dyn SalesUnit>, PortError>;
}

/// One transaction's view of the sales and ledger stores.
///
/// All methods take `&mut self`: a unit belongs to exactly one run.
/// Consuming `commit` and `rollback` make half-finished units
/// unrepresentable after the outcome is decided.
#[async_trait]
pub trait SalesUnit: Send {
    // ==== Bill numbering ====

    /// Takes the exclusive lock covering bill number allocation for a
    /// company, held until the unit ends.
    async fn lock_bill_sequence(&mut self, company: &CompanyId) -> Result<(), PortError>;

    /// Highest bill number on record for the company, if any bill exists.
    async fn max_bill_number(&mut self, company: &CompanyId) -> Result<Option<BillNo>, PortError>;

    async fn bill_exists(&mut self, company: &CompanyId, bill_no: BillNo)
        -> Result<bool, PortError>;

    // ==== Bills ====

    /// Inserts a bill header and all of its lines.
    ///
    /// Fails with [`PortError::Conflict`] when the number is taken.
    async fn insert_bill(&mut self, bill: &Bill) -> Result<(), PortError>;

    async fn load_bill(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<Option<Bill>, PortError>;

    /// Removes a bill header and its lines. Missing bills are not an error.
    async fn delete_bill(&mut self, company: &CompanyId, bill_no: BillNo)
        -> Result<(), PortError>;

    /// Bills with numbers strictly greater than `bill_no`, ascending.
    async fn bills_above(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<Vec<Bill>, PortError>;

    /// Bills dated inside the range, ascending by bill number.
    async fn bills_in_range(
        &mut self,
        company: &CompanyId,
        range: DateRange,
    ) -> Result<Vec<Bill>, PortError>;

    // ==== Renumbering staging area ====

    /// Parks a displaced bill under its pre-deletion number.
    async fn stage_bill(&mut self, bill: &Bill) -> Result<(), PortError>;

    /// Staged bills for the company, ascending by their original number.
    async fn staged_bills(&mut self, company: &CompanyId) -> Result<Vec<Bill>, PortError>;

    /// Empties the company's staging area.
    async fn purge_staging(&mut self, company: &CompanyId) -> Result<(), PortError>;

    // ==== Cumulative stock ====

    /// Running stock balance for an item. A missing row reads as the
    /// zero-seeded balance; the row is created on first write.
    async fn stock_balance(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
    ) -> Result<StockBalance, PortError>;

    async fn put_stock_balance(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
        balance: StockBalance,
    ) -> Result<(), PortError>;

    // ==== Ledger sheets ====

    /// Loads the month sheet for an item, current or archived.
    async fn load_sheet(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
        month: MonthKey,
    ) -> Result<Option<MonthSheet>, PortError>;

    /// Writes a whole month sheet back.
    async fn put_sheet(&mut self, sheet: &MonthSheet) -> Result<(), PortError>;

    // ==== Outcome ====

    /// Makes every write of this unit durable and visible.
    async fn commit(self: Box<Self>) -> Result<(), PortError>;

    /// Discards every write of this unit.
    async fn rollback(self: Box<Self>) -> Result<(), PortError>;
}
