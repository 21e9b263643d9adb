//! Stock ledger domain
//!
//! The ledger tracks liquor stock at two granularities. A [`MonthSheet`]
//! holds one item's day-by-day cells for a calendar month, each cell
//! balancing `closing = opening + purchase - sales + adjustment`, with
//! adjacent days chained opening-to-closing. A [`StockBalance`] is the
//! item's running total across all months.
//!
//! This crate owns the balance arithmetic only. Which sheet a sale lands
//! in, and what happens when that month is archived, is decided by the
//! engine that drives it.

pub mod cell;
pub mod error;
pub mod sheet;
pub mod stock;

pub use cell::LedgerCell;
pub use error::LedgerError;
pub use sheet::MonthSheet;
pub use stock::StockBalance;
