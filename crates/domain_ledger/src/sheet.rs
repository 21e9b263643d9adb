//! Day-indexed month sheet for one item's stock ledger
//!
//! A sheet holds the ledger cells of a single (company, item, month)
//! coordinate. Posting a sale rewrites the day's cell and carries the
//! resulting delta forward through the contiguous run of existing cells
//! that follows; the carry stops at the first missing day.

use crate::cell::LedgerCell;
use crate::error::LedgerError;
use core_kernel::{CompanyId, DayOfMonth, ItemCode, MonthKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;

/// One month of ledger cells for one item at one company.
///
/// # Invariants
///
/// - every cell satisfies `closing = opening + purchase - sales + adjustment`
/// - whenever day `d` and day `d + 1` both have cells, day `d + 1` opens with
///   day `d`'s closing balance
///
/// Both are enforced by [`post_sale`](Self::post_sale) and
/// [`shift_from_first_day`](Self::shift_from_first_day) and audited by
/// [`audit`](Self::audit) for rows loaded from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSheet {
    company: CompanyId,
    item: ItemCode,
    month: MonthKey,
    cells: BTreeMap<DayOfMonth, LedgerCell>,
}

impl MonthSheet {
    /// Creates an empty sheet for the given coordinate.
    pub fn new(company: CompanyId, item: ItemCode, month: MonthKey) -> Self {
        Self {
            company,
            item,
            month,
            cells: BTreeMap::new(),
        }
    }

    pub fn company(&self) -> &CompanyId {
        &self.company
    }

    pub fn item(&self) -> &ItemCode {
        &self.item
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    /// Inserts or replaces the cell for a day.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDay`] when the day does not occur in
    /// this sheet's month.
    pub fn insert_cell(&mut self, day: DayOfMonth, cell: LedgerCell) -> Result<(), LedgerError> {
        if self.month.date_of(day).is_err() {
            return Err(LedgerError::InvalidDay {
                month: self.month,
                day,
            });
        }
        self.cells.insert(day, cell);
        Ok(())
    }

    /// Provisions a cell for every day of the month, each carrying the same
    /// opening balance and no movements. Replaces any existing cells.
    pub fn seed_month(&mut self, opening: i64) {
        for day in self.month.days() {
            self.cells.insert(day, LedgerCell::new(opening));
        }
    }

    pub fn cell(&self, day: DayOfMonth) -> Option<&LedgerCell> {
        self.cells.get(&day)
    }

    /// Iterates cells in day order.
    pub fn days(&self) -> impl Iterator<Item = (DayOfMonth, &LedgerCell)> {
        self.cells.iter().map(|(day, cell)| (*day, cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Posts a sales quantity against a day and carries the closing delta
    /// forward. Positive quantities sell stock, negative quantities reverse
    /// earlier sales. Returns the day's new closing balance.
    ///
    /// The sheet is untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::MissingCell`] when the day has no cell
    /// - [`LedgerError::InsufficientStock`] when `allow_negative` is false
    ///   and the posting would drive any affected closing below zero
    pub fn post_sale(
        &mut self,
        day: DayOfMonth,
        qty: i64,
        allow_negative: bool,
    ) -> Result<i64, LedgerError> {
        let target = self.cells.get(&day).ok_or(LedgerError::MissingCell {
            month: self.month,
            day,
        })?;

        let mut posted = *target;
        posted.post_sale(qty);
        let delta = posted.closing - target.closing;

        let carry = self.contiguous_days_after(day);
        if !allow_negative {
            if posted.closing < 0 {
                return Err(LedgerError::InsufficientStock {
                    month: self.month,
                    day,
                    closing: posted.closing,
                });
            }
            for &later in &carry {
                let shifted = self.cells[&later].closing + delta;
                if shifted < 0 {
                    return Err(LedgerError::InsufficientStock {
                        month: self.month,
                        day: later,
                        closing: shifted,
                    });
                }
            }
        }

        self.cells.insert(day, posted);
        for later in carry {
            if let Some(cell) = self.cells.get_mut(&later) {
                cell.shift(delta);
            }
        }
        Ok(posted.closing)
    }

    /// Shifts the whole leading run of cells by a delta, starting from day 1.
    ///
    /// This is the entry point for movements that happened in an earlier,
    /// already archived month: the quantity cannot be posted there, so it
    /// adjusts this month's day-1 opening instead and carries forward as
    /// usual. Returns false without touching the sheet when day 1 has no
    /// cell.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientStock`] when `allow_negative` is
    /// false and the shift would drive any affected closing below zero.
    pub fn shift_from_first_day(
        &mut self,
        delta: i64,
        allow_negative: bool,
    ) -> Result<bool, LedgerError> {
        if !self.cells.contains_key(&DayOfMonth::FIRST) {
            return Ok(false);
        }

        let mut run = vec![DayOfMonth::FIRST];
        run.extend(self.contiguous_days_after(DayOfMonth::FIRST));
        if !allow_negative {
            for &day in &run {
                let shifted = self.cells[&day].closing + delta;
                if shifted < 0 {
                    return Err(LedgerError::InsufficientStock {
                        month: self.month,
                        day,
                        closing: shifted,
                    });
                }
            }
        }

        for day in run {
            if let Some(cell) = self.cells.get_mut(&day) {
                cell.shift(delta);
            }
        }
        Ok(true)
    }

    /// Checks every cell against the closing equation and every adjacent
    /// pair of days against opening/closing continuity.
    ///
    /// # Errors
    ///
    /// Returns the first [`LedgerError::UnbalancedCell`] or
    /// [`LedgerError::BrokenContinuity`] found, scanning in day order.
    pub fn audit(&self) -> Result<(), LedgerError> {
        for (&day, cell) in &self.cells {
            if !cell.is_balanced() {
                return Err(LedgerError::UnbalancedCell {
                    month: self.month,
                    day,
                    expected: cell.expected_closing(),
                    actual: cell.closing,
                });
            }
        }
        let mut prior: Option<(DayOfMonth, &LedgerCell)> = None;
        for (&day, cell) in &self.cells {
            if let Some((prior_day, prior_cell)) = prior {
                if day.get() == prior_day.get() + 1 && cell.opening != prior_cell.closing {
                    return Err(LedgerError::BrokenContinuity {
                        month: self.month,
                        day,
                        opening: cell.opening,
                        prior_closing: prior_cell.closing,
                    });
                }
            }
            prior = Some((day, cell));
        }
        Ok(())
    }

    /// Days strictly after `day` that form an unbroken run of existing cells.
    fn contiguous_days_after(&self, day: DayOfMonth) -> Vec<DayOfMonth> {
        let mut run = Vec::new();
        let mut expected = day.get() + 1;
        for (&later, _) in self.cells.range((Bound::Excluded(day), Bound::Unbounded)) {
            if later.get() != expected {
                break;
            }
            run.push(later);
            expected += 1;
        }
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(year: i32, month: u32) -> MonthSheet {
        MonthSheet::new(
            CompanyId::new("CO1").unwrap(),
            ItemCode::new("ITM-9").unwrap(),
            MonthKey::new(year, month).unwrap(),
        )
    }

    fn day(n: u32) -> DayOfMonth {
        DayOfMonth::new(n).unwrap()
    }

    #[test]
    fn test_seed_month_provisions_every_day() {
        let mut s = sheet(2024, 2);
        s.seed_month(40);
        assert_eq!(s.len(), 29);
        assert_eq!(s.cell(day(29)).unwrap().opening, 40);
        assert!(s.audit().is_ok());
    }

    #[test]
    fn test_insert_cell_rejects_day_outside_month() {
        let mut s = sheet(2024, 4);
        let err = s.insert_cell(day(31), LedgerCell::new(0)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDay { .. }));
    }

    #[test]
    fn test_post_sale_carries_delta_forward() {
        let mut s = sheet(2024, 3);
        s.seed_month(10);
        let closing = s.post_sale(day(2), 4, false).unwrap();
        assert_eq!(closing, 6);
        assert_eq!(s.cell(day(1)).unwrap().closing, 10);
        assert_eq!(s.cell(day(3)).unwrap().opening, 6);
        assert_eq!(s.cell(day(31)).unwrap().closing, 6);
        assert!(s.audit().is_ok());
    }

    #[test]
    fn test_post_sale_missing_cell() {
        let mut s = sheet(2024, 3);
        s.insert_cell(day(1), LedgerCell::new(5)).unwrap();
        let err = s.post_sale(day(2), 1, false).unwrap_err();
        assert!(err.is_missing_cell());
        assert_eq!(
            err,
            LedgerError::MissingCell {
                month: MonthKey::new(2024, 3).unwrap(),
                day: day(2),
            }
        );
    }

    #[test]
    fn test_carry_stops_at_missing_day() {
        let mut s = sheet(2024, 3);
        s.insert_cell(day(5), LedgerCell::new(20)).unwrap();
        s.insert_cell(day(6), LedgerCell::new(20)).unwrap();
        s.insert_cell(day(8), LedgerCell::new(20)).unwrap();
        s.post_sale(day(5), 7, false).unwrap();
        assert_eq!(s.cell(day(6)).unwrap().opening, 13);
        // day 7 is absent, so day 8 is beyond the carry
        assert_eq!(s.cell(day(8)).unwrap().opening, 20);
    }

    #[test]
    fn test_post_sale_rejects_negative_closing_when_disallowed() {
        let mut s = sheet(2024, 3);
        s.seed_month(3);
        let err = s.post_sale(day(1), 5, false).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                month: MonthKey::new(2024, 3).unwrap(),
                day: day(1),
                closing: -2,
            }
        );
        // nothing was written
        assert_eq!(s.cell(day(1)).unwrap().sales, 0);
        assert_eq!(s.cell(day(2)).unwrap().opening, 3);
    }

    #[test]
    fn test_post_sale_rejects_negative_carried_closing() {
        let mut s = sheet(2024, 3);
        s.insert_cell(day(1), LedgerCell::new(10)).unwrap();
        let mut thin = LedgerCell::new(10);
        thin.post_sale(8);
        s.insert_cell(day(2), thin).unwrap();
        // selling 4 on day 1 leaves day 1 at 6 but would push day 2 to -2
        let err = s.post_sale(day(1), 4, false).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock { closing: -2, .. }
        ));
    }

    #[test]
    fn test_post_sale_allows_negative_when_permitted() {
        let mut s = sheet(2024, 3);
        s.seed_month(3);
        let closing = s.post_sale(day(1), 5, true).unwrap();
        assert_eq!(closing, -2);
        assert_eq!(s.cell(day(31)).unwrap().closing, -2);
        assert!(s.audit().is_ok());
    }

    #[test]
    fn test_reversal_restores_prior_state() {
        let mut s = sheet(2024, 3);
        s.seed_month(25);
        let before = s.clone();
        s.post_sale(day(10), 6, false).unwrap();
        s.post_sale(day(10), -6, false).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn test_shift_from_first_day_moves_whole_run() {
        let mut s = sheet(2024, 5);
        s.seed_month(15);
        assert!(s.shift_from_first_day(-4, false).unwrap());
        assert_eq!(s.cell(day(1)).unwrap().opening, 11);
        assert_eq!(s.cell(day(31)).unwrap().closing, 11);
        assert!(s.audit().is_ok());
    }

    #[test]
    fn test_shift_from_first_day_without_day_one_is_a_noop() {
        let mut s = sheet(2024, 5);
        s.insert_cell(day(2), LedgerCell::new(9)).unwrap();
        assert!(!s.shift_from_first_day(-4, false).unwrap());
        assert_eq!(s.cell(day(2)).unwrap().opening, 9);
    }

    #[test]
    fn test_shift_from_first_day_respects_stock_floor() {
        let mut s = sheet(2024, 5);
        s.seed_month(3);
        let err = s.shift_from_first_day(-5, false).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { .. }));
        assert_eq!(s.cell(day(1)).unwrap().opening, 3);
    }

    #[test]
    fn test_audit_flags_unbalanced_cell() {
        let mut s = sheet(2024, 6);
        s.insert_cell(day(1), LedgerCell::from_parts(10, 0, 2, 0, 99))
            .unwrap();
        let err = s.audit().unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnbalancedCell {
                month: MonthKey::new(2024, 6).unwrap(),
                day: day(1),
                expected: 8,
                actual: 99,
            }
        );
    }

    #[test]
    fn test_audit_flags_broken_continuity() {
        let mut s = sheet(2024, 6);
        s.insert_cell(day(1), LedgerCell::new(10)).unwrap();
        s.insert_cell(day(2), LedgerCell::new(7)).unwrap();
        let err = s.audit().unwrap_err();
        assert!(matches!(err, LedgerError::BrokenContinuity { .. }));
    }

    #[test]
    fn test_audit_ignores_continuity_across_gaps() {
        let mut s = sheet(2024, 6);
        s.insert_cell(day(1), LedgerCell::new(10)).unwrap();
        s.insert_cell(day(3), LedgerCell::new(7)).unwrap();
        assert!(s.audit().is_ok());
    }
}
