//! Single-day ledger cell

use serde::{Deserialize, Serialize};

/// One day's stock movement for one item.
///
/// All quantities are whole bottle counts. Sales of the day accumulate into
/// `sales`; purchases and manual corrections land in `purchase` and
/// `adjustment` from outside the sales pipeline.
///
/// # Invariants
///
/// - `closing = opening + purchase - sales + adjustment` after every mutation
/// - `opening` of a day matches `closing` of the previous day whenever both
///   cells exist (maintained by [`MonthSheet`](crate::MonthSheet), not here)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerCell {
    pub opening: i64,
    pub purchase: i64,
    pub sales: i64,
    pub adjustment: i64,
    pub closing: i64,
}

impl LedgerCell {
    /// Creates a cell with the given opening balance and no movements.
    pub fn new(opening: i64) -> Self {
        Self {
            opening,
            purchase: 0,
            sales: 0,
            adjustment: 0,
            closing: opening,
        }
    }

    /// Reconstructs a cell from stored column values without checking the
    /// closing equation. Call [`expected_closing`](Self::expected_closing)
    /// or let the sheet audit it when loading untrusted rows.
    pub fn from_parts(opening: i64, purchase: i64, sales: i64, adjustment: i64, closing: i64) -> Self {
        Self {
            opening,
            purchase,
            sales,
            adjustment,
            closing,
        }
    }

    /// Adds a purchase receipt for the day.
    pub fn with_purchase(mut self, qty: i64) -> Self {
        self.purchase += qty;
        self.recompute_closing();
        self
    }

    /// The closing balance the equation demands for the current columns.
    pub fn expected_closing(&self) -> i64 {
        self.opening + self.purchase - self.sales + self.adjustment
    }

    /// True when the stored closing matches the equation.
    pub fn is_balanced(&self) -> bool {
        self.closing == self.expected_closing()
    }

    /// Recomputes `closing` from the other four columns.
    pub fn recompute_closing(&mut self) {
        self.closing = self.expected_closing();
    }

    /// Posts a sales delta. Positive quantities sell stock, negative
    /// quantities reverse earlier sales.
    pub fn post_sale(&mut self, qty: i64) {
        self.sales += qty;
        self.recompute_closing();
    }

    /// Shifts the cell by a carried-forward delta from an earlier day.
    /// Opening and closing move together; the day's own movements stay put.
    pub fn shift(&mut self, delta: i64) {
        self.opening += delta;
        self.closing += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_balanced() {
        let cell = LedgerCell::new(120);
        assert_eq!(cell.closing, 120);
        assert!(cell.is_balanced());
    }

    #[test]
    fn test_post_sale_updates_closing() {
        let mut cell = LedgerCell::new(50);
        cell.post_sale(8);
        assert_eq!(cell.sales, 8);
        assert_eq!(cell.closing, 42);
        assert!(cell.is_balanced());
    }

    #[test]
    fn test_post_sale_reversal_restores_closing() {
        let mut cell = LedgerCell::new(50).with_purchase(10);
        cell.post_sale(12);
        cell.post_sale(-12);
        assert_eq!(cell.sales, 0);
        assert_eq!(cell.closing, 60);
    }

    #[test]
    fn test_shift_moves_opening_and_closing_together() {
        let mut cell = LedgerCell::from_parts(30, 5, 10, 0, 25);
        cell.shift(-4);
        assert_eq!(cell.opening, 26);
        assert_eq!(cell.closing, 21);
        assert!(cell.is_balanced());
    }

    #[test]
    fn test_from_parts_keeps_stored_closing() {
        let cell = LedgerCell::from_parts(10, 0, 0, 0, 99);
        assert!(!cell.is_balanced());
        assert_eq!(cell.expected_closing(), 10);
    }

    #[test]
    fn test_closing_may_go_negative() {
        let mut cell = LedgerCell::new(3);
        cell.post_sale(5);
        assert_eq!(cell.closing, -2);
        assert!(cell.is_balanced());
    }

    #[test]
    fn test_serialized_column_names_stay_stable() {
        // Stored JSONB rows deserialize against these exact field names.
        let cell = LedgerCell::from_parts(10, 2, 3, 0, 9);
        assert_eq!(
            serde_json::to_value(cell).unwrap(),
            serde_json::json!({
                "opening": 10,
                "purchase": 2,
                "sales": 3,
                "adjustment": 0,
                "closing": 9
            })
        );
    }
}
