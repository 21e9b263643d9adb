//! In-memory sales store with real transaction semantics
//!
//! A unit of work clones the whole store state, mutates the clone, and
//! writes it back on commit. The backing mutex is held for the unit's
//! lifetime, so units serialize exactly like the single synchronous
//! operations they model; a second `begin` waits for the first unit to
//! finish. Rollback is simply dropping the clone.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use core_kernel::{BillNo, CompanyId, DateRange, DomainPort, ItemCode, MonthKey, PortError};
use domain_ledger::{MonthSheet, StockBalance};
use domain_sales::Bill;

use super::{SalesStore, SalesUnit};

#[derive(Debug, Clone, Default)]
struct StoreState {
    bills: HashMap<CompanyId, BTreeMap<BillNo, Bill>>,
    staging: HashMap<CompanyId, BTreeMap<BillNo, Bill>>,
    stock: HashMap<(CompanyId, ItemCode), StockBalance>,
    sheets: HashMap<(CompanyId, ItemCode, MonthKey), MonthSheet>,
}

/// Store keeping everything in process memory.
///
/// Serves as the test double for the engine and as a real store for
/// single-process demos. Seeding helpers write directly, outside any
/// unit; do not call them, or the snapshot accessors, while a unit is
/// open, because the unit holds the store lock until it resolves.
#[derive(Debug, Clone, Default)]
pub struct InMemorySalesStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemorySalesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a ledger sheet, replacing any sheet at the same coordinate.
    pub async fn seed_sheet(&self, sheet: MonthSheet) {
        let key = (
            sheet.company().clone(),
            sheet.item().clone(),
            sheet.month(),
        );
        self.state.lock().await.sheets.insert(key, sheet);
    }

    /// Seeds a cumulative stock balance.
    pub async fn seed_stock(&self, company: CompanyId, item: ItemCode, balance: StockBalance) {
        self.state.lock().await.stock.insert((company, item), balance);
    }

    /// Snapshot of a company's bills, ascending by number.
    pub async fn bills(&self, company: &CompanyId) -> Vec<Bill> {
        self.state
            .lock()
            .await
            .bills
            .get(company)
            .map(|bills| bills.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of one ledger sheet.
    pub async fn sheet(
        &self,
        company: &CompanyId,
        item: &ItemCode,
        month: MonthKey,
    ) -> Option<MonthSheet> {
        self.state
            .lock()
            .await
            .sheets
            .get(&(company.clone(), item.clone(), month))
            .cloned()
    }

    /// Snapshot of one stock balance, zero-seeded when absent.
    pub async fn stock(&self, company: &CompanyId, item: &ItemCode) -> StockBalance {
        self.state
            .lock()
            .await
            .stock
            .get(&(company.clone(), item.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Number of staged bills for a company, normally zero at rest.
    pub async fn staged_count(&self, company: &CompanyId) -> usize {
        self.state
            .lock()
            .await
            .staging
            .get(company)
            .map_or(0, BTreeMap::len)
    }
}

impl DomainPort for InMemorySalesStore {}

#[async_trait]
impl SalesStore for InMemorySalesStore {
    async fn begin(&self) -> Result<Box<dyn SalesUnit>, PortError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemorySalesUnit { guard, working }))
    }
}

struct InMemorySalesUnit {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
}

#[async_trait]
impl SalesUnit for InMemorySalesUnit {
    async fn lock_bill_sequence(&mut self, _company: &CompanyId) -> Result<(), PortError> {
        // the unit already holds the whole store exclusively
        Ok(())
    }

    async fn max_bill_number(&mut self, company: &CompanyId) -> Result<Option<BillNo>, PortError> {
        Ok(self
            .working
            .bills
            .get(company)
            .and_then(|bills| bills.keys().next_back().copied()))
    }

    async fn bill_exists(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<bool, PortError> {
        Ok(self
            .working
            .bills
            .get(company)
            .is_some_and(|bills| bills.contains_key(&bill_no)))
    }

    async fn insert_bill(&mut self, bill: &Bill) -> Result<(), PortError> {
        let bills = self
            .working
            .bills
            .entry(bill.header.company.clone())
            .or_default();
        if bills.contains_key(&bill.bill_no()) {
            return Err(PortError::conflict(format!(
                "bill number {} already exists",
                bill.bill_no()
            )));
        }
        bills.insert(bill.bill_no(), bill.clone());
        Ok(())
    }

    async fn load_bill(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<Option<Bill>, PortError> {
        Ok(self
            .working
            .bills
            .get(company)
            .and_then(|bills| bills.get(&bill_no))
            .cloned())
    }

    async fn delete_bill(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<(), PortError> {
        if let Some(bills) = self.working.bills.get_mut(company) {
            bills.remove(&bill_no);
        }
        Ok(())
    }

    async fn bills_above(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<Vec<Bill>, PortError> {
        Ok(self
            .working
            .bills
            .get(company)
            .map(|bills| {
                bills
                    .range((Bound::Excluded(bill_no), Bound::Unbounded))
                    .map(|(_, bill)| bill.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn bills_in_range(
        &mut self,
        company: &CompanyId,
        range: DateRange,
    ) -> Result<Vec<Bill>, PortError> {
        Ok(self
            .working
            .bills
            .get(company)
            .map(|bills| {
                bills
                    .values()
                    .filter(|bill| range.contains(bill.header.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn stage_bill(&mut self, bill: &Bill) -> Result<(), PortError> {
        let staged = self
            .working
            .staging
            .entry(bill.header.company.clone())
            .or_default();
        if staged.contains_key(&bill.bill_no()) {
            return Err(PortError::conflict(format!(
                "bill {} is already staged",
                bill.bill_no()
            )));
        }
        staged.insert(bill.bill_no(), bill.clone());
        Ok(())
    }

    async fn staged_bills(&mut self, company: &CompanyId) -> Result<Vec<Bill>, PortError> {
        Ok(self
            .working
            .staging
            .get(company)
            .map(|staged| staged.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn purge_staging(&mut self, company: &CompanyId) -> Result<(), PortError> {
        self.working.staging.remove(company);
        Ok(())
    }

    async fn stock_balance(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
    ) -> Result<StockBalance, PortError> {
        Ok(self
            .working
            .stock
            .get(&(company.clone(), item.clone()))
            .copied()
            .unwrap_or_default())
    }

    async fn put_stock_balance(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
        balance: StockBalance,
    ) -> Result<(), PortError> {
        self.working
            .stock
            .insert((company.clone(), item.clone()), balance);
        Ok(())
    }

    async fn load_sheet(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
        month: MonthKey,
    ) -> Result<Option<MonthSheet>, PortError> {
        Ok(self
            .working
            .sheets
            .get(&(company.clone(), item.clone(), month))
            .cloned())
    }

    async fn put_sheet(&mut self, sheet: &MonthSheet) -> Result<(), PortError> {
        let key = (
            sheet.company().clone(),
            sheet.item().clone(),
            sheet.month(),
        );
        self.working.sheets.insert(key, sheet.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        let unit = *self;
        let InMemorySalesUnit { mut guard, working } = unit;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        Ok(())
    }
}
