//! Posting bills to the stock ledger
//!
//! Every bill line moves stock in two places: the item's cumulative
//! balance and the month sheet cell for the bill's date. Deletion runs
//! the same posting with the sign flipped, which is what makes reversal
//! exact. Bills dated before the current month post into their own
//! (archived) sheet and additionally carry the movement into the current
//! month's opening, so the chain of balances survives the archive
//! boundary.

use core_kernel::{DayOfMonth, MonthKey};
use domain_sales::Bill;
use tracing::debug;

use crate::error::EngineError;
use crate::store::SalesUnit;

/// Applies bill effects to cumulative stock and month sheets.
#[derive(Debug, Clone)]
pub struct LedgerWriter {
    allow_negative_stock: bool,
}

impl LedgerWriter {
    pub fn new(allow_negative_stock: bool) -> Self {
        Self {
            allow_negative_stock,
        }
    }

    /// Posts a bill's lines as sales.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Integrity`] when the bill's totals disagree with
    ///   its lines
    /// - [`EngineError::NotFound`] when an item has no sheet for the
    ///   bill's month
    /// - [`EngineError::Validation`] when a posting would breach the
    ///   negative stock policy
    pub async fn apply_bill(
        &self,
        unit: &mut dyn SalesUnit,
        current_month: MonthKey,
        bill: &Bill,
    ) -> Result<(), EngineError> {
        self.post_bill(unit, current_month, bill, 1).await
    }

    /// Undoes an earlier [`apply_bill`](Self::apply_bill) for the same bill.
    pub async fn reverse_bill(
        &self,
        unit: &mut dyn SalesUnit,
        current_month: MonthKey,
        bill: &Bill,
    ) -> Result<(), EngineError> {
        self.post_bill(unit, current_month, bill, -1).await
    }

    async fn post_bill(
        &self,
        unit: &mut dyn SalesUnit,
        current_month: MonthKey,
        bill: &Bill,
        sign: i64,
    ) -> Result<(), EngineError> {
        bill.verify_totals()?;

        let company = &bill.header.company;
        let bill_month = MonthKey::from_date(bill.header.date);
        let day = DayOfMonth::from_date(bill.header.date);

        for line in &bill.lines {
            let qty = sign * i64::from(line.qty);

            let mut balance = unit.stock_balance(company, &line.item).await?;
            balance.post_sale(qty);
            unit.put_stock_balance(company, &line.item, balance).await?;

            let mut sheet = unit
                .load_sheet(company, &line.item, bill_month)
                .await?
                .ok_or_else(|| {
                    EngineError::not_found(
                        "ledger sheet",
                        format!("{} in {}", line.item, bill_month),
                    )
                })?;
            let closing = sheet.post_sale(day, qty, self.allow_negative_stock)?;
            unit.put_sheet(&sheet).await?;
            debug!(bill_no = %bill.bill_no(), item = %line.item, qty, closing, "posted ledger movement");

            if bill_month < current_month {
                // the bill's month is archived: its movement also shifts
                // the current month's chain, starting at day 1
                if let Some(mut current) = unit
                    .load_sheet(company, &line.item, current_month)
                    .await?
                {
                    if current.shift_from_first_day(-qty, self.allow_negative_stock)? {
                        unit.put_sheet(&current).await?;
                        debug!(item = %line.item, qty, %current_month, "carried archived movement into current month");
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemorySalesStore;
    use crate::store::SalesStore;
    use chrono::NaiveDate;
    use core_kernel::{BillNo, CompanyId, ItemCode};
    use domain_ledger::{MonthSheet, StockBalance};
    use domain_sales::{BillLine, LiquorMode};
    use rust_decimal::Decimal;

    fn company() -> CompanyId {
        CompanyId::new("SHOP-1").unwrap()
    }

    fn item(code: &str) -> ItemCode {
        ItemCode::new(code).unwrap()
    }

    fn month(m: u32) -> MonthKey {
        MonthKey::new(2024, m).unwrap()
    }

    fn day(n: u32) -> DayOfMonth {
        DayOfMonth::new(n).unwrap()
    }

    async fn seeded_store(code: &str, m: u32, opening: i64) -> InMemorySalesStore {
        let store = InMemorySalesStore::new();
        let mut sheet = MonthSheet::new(company(), item(code), month(m));
        sheet.seed_month(opening);
        store.seed_sheet(sheet).await;
        store
            .seed_stock(company(), item(code), StockBalance::new(opening))
            .await;
        store
    }

    fn one_line_bill(no: u32, m: u32, d: u32, code: &str, qty: u32) -> Bill {
        Bill::new(
            BillNo::from_suffix(no),
            NaiveDate::from_ymd_opt(2024, m, d).unwrap(),
            company(),
            LiquorMode::Foreign,
            vec![BillLine::new(item(code), qty, Decimal::from(120))],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_apply_moves_stock_and_sheet() {
        let store = seeded_store("IT1", 7, 50).await;
        let writer = LedgerWriter::new(false);
        let bill = one_line_bill(1, 7, 10, "IT1", 8);

        let mut unit = store.begin().await.unwrap();
        writer.apply_bill(&mut *unit, month(7), &bill).await.unwrap();
        unit.commit().await.unwrap();

        assert_eq!(store.stock(&company(), &item("IT1")).await.current, 42);
        let sheet = store.sheet(&company(), &item("IT1"), month(7)).await.unwrap();
        assert_eq!(sheet.cell(day(10)).unwrap().sales, 8);
        assert_eq!(sheet.cell(day(10)).unwrap().closing, 42);
        assert_eq!(sheet.cell(day(11)).unwrap().opening, 42);
        assert!(sheet.audit().is_ok());
    }

    #[tokio::test]
    async fn test_reverse_restores_exact_pre_bill_state() {
        let store = seeded_store("IT1", 7, 50).await;
        let writer = LedgerWriter::new(false);
        let bill = one_line_bill(1, 7, 10, "IT1", 8);

        let mut unit = store.begin().await.unwrap();
        writer.apply_bill(&mut *unit, month(7), &bill).await.unwrap();
        unit.commit().await.unwrap();
        let stock_before = store.stock(&company(), &item("IT1")).await;
        let sheet_before = store.sheet(&company(), &item("IT1"), month(7)).await;

        let bill2 = one_line_bill(2, 7, 12, "IT1", 5);
        let mut unit = store.begin().await.unwrap();
        writer.apply_bill(&mut *unit, month(7), &bill2).await.unwrap();
        writer.reverse_bill(&mut *unit, month(7), &bill2).await.unwrap();
        unit.commit().await.unwrap();

        assert_eq!(store.stock(&company(), &item("IT1")).await, stock_before);
        assert_eq!(
            store.sheet(&company(), &item("IT1"), month(7)).await,
            sheet_before
        );
    }

    #[tokio::test]
    async fn test_missing_sheet_is_not_found() {
        let store = InMemorySalesStore::new();
        let writer = LedgerWriter::new(false);
        let bill = one_line_bill(1, 7, 10, "IT1", 1);

        let mut unit = store.begin().await.unwrap();
        let err = writer
            .apply_bill(&mut *unit, month(7), &bill)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        unit.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_archived_bill_carries_into_current_month() {
        let store = seeded_store("IT1", 6, 80).await;
        let mut august = MonthSheet::new(company(), item("IT1"), month(8));
        august.seed_month(70);
        store.seed_sheet(august).await;
        let writer = LedgerWriter::new(false);

        // bill dated in June while August is current
        let bill = one_line_bill(1, 6, 15, "IT1", 10);
        let mut unit = store.begin().await.unwrap();
        writer.apply_bill(&mut *unit, month(8), &bill).await.unwrap();
        unit.commit().await.unwrap();

        let june = store.sheet(&company(), &item("IT1"), month(6)).await.unwrap();
        assert_eq!(june.cell(day(15)).unwrap().sales, 10);
        let august = store.sheet(&company(), &item("IT1"), month(8)).await.unwrap();
        assert_eq!(august.cell(day(1)).unwrap().opening, 60);
        assert_eq!(august.cell(day(31)).unwrap().closing, 60);
    }

    #[tokio::test]
    async fn test_policy_blocks_overdraw() {
        let store = seeded_store("IT1", 7, 3).await;
        let writer = LedgerWriter::new(false);
        let bill = one_line_bill(1, 7, 10, "IT1", 5);

        let mut unit = store.begin().await.unwrap();
        let err = writer
            .apply_bill(&mut *unit, month(7), &bill)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
        unit.rollback().await.unwrap();

        // rollback keeps even the already-posted cumulative balance intact
        assert_eq!(store.stock(&company(), &item("IT1")).await.current, 3);
    }

    #[tokio::test]
    async fn test_overdraw_allowed_under_relaxed_policy() {
        let store = seeded_store("IT1", 7, 3).await;
        let writer = LedgerWriter::new(true);
        let bill = one_line_bill(1, 7, 10, "IT1", 5);

        let mut unit = store.begin().await.unwrap();
        writer.apply_bill(&mut *unit, month(7), &bill).await.unwrap();
        unit.commit().await.unwrap();

        let sheet = store.sheet(&company(), &item("IT1"), month(7)).await.unwrap();
        assert_eq!(sheet.cell(day(10)).unwrap().closing, -2);
        assert_eq!(store.stock(&company(), &item("IT1")).await.current, -2);
    }

    #[tokio::test]
    async fn test_multi_line_bill_touches_every_item() {
        let store = seeded_store("IT1", 7, 20).await;
        let mut other = MonthSheet::new(company(), item("IT2"), month(7));
        other.seed_month(30);
        store.seed_sheet(other).await;
        store
            .seed_stock(company(), item("IT2"), StockBalance::new(30))
            .await;

        let bill = Bill::new(
            BillNo::from_suffix(1),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            company(),
            LiquorMode::Foreign,
            vec![
                BillLine::new(item("IT1"), 6, Decimal::from(100)),
                BillLine::new(item("IT2"), 9, Decimal::from(80)),
            ],
        )
        .unwrap();

        let writer = LedgerWriter::new(false);
        let mut unit = store.begin().await.unwrap();
        writer.apply_bill(&mut *unit, month(7), &bill).await.unwrap();
        unit.commit().await.unwrap();

        assert_eq!(store.stock(&company(), &item("IT1")).await.current, 14);
        assert_eq!(store.stock(&company(), &item("IT2")).await.current, 21);
    }

    #[tokio::test]
    async fn test_tampered_totals_rejected_before_posting() {
        let store = seeded_store("IT1", 7, 50).await;
        let writer = LedgerWriter::new(false);
        let mut bill = one_line_bill(1, 7, 10, "IT1", 2);
        bill.header.total_amount += Decimal::from(1);

        let mut unit = store.begin().await.unwrap();
        let err = writer
            .apply_bill(&mut *unit, month(7), &bill)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Integrity { .. }));
        unit.rollback().await.unwrap();
    }
}
