//! Cumulative stock balance per company and item

use serde::{Deserialize, Serialize};

/// Running stock total for one item at one company, independent of the
/// month partitioning.
///
/// Sales decrement `current`; deletion reversals add the quantity back.
/// Unlike ledger closings the cumulative balance is never floor-checked,
/// so it may go negative under any policy. A missing balance row reads as
/// [`zero`](Self::zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBalance {
    pub opening: i64,
    pub current: i64,
}

impl StockBalance {
    /// A freshly seeded balance with no stock on hand.
    pub fn zero() -> Self {
        Self {
            opening: 0,
            current: 0,
        }
    }

    /// A balance opened with the given stock on hand.
    pub fn new(opening: i64) -> Self {
        Self {
            opening,
            current: opening,
        }
    }

    /// Posts a sales quantity. Positive quantities sell stock, negative
    /// quantities reverse earlier sales.
    pub fn post_sale(&mut self, qty: i64) {
        self.current -= qty;
    }

    /// Stock sold since the balance was opened.
    pub fn sold(&self) -> i64 {
        self.opening - self.current
    }

    pub fn is_negative(&self) -> bool {
        self.current < 0
    }
}

impl Default for StockBalance {
    fn default() -> Self {
        Self::zero()
    }
}
