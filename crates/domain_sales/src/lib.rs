//! Sales Domain - Classification, Distribution, Packing, and Bills
//!
//! This crate holds the pure half of bill generation: everything that can
//! be computed before a single row is written.
//!
//! # Pipeline
//!
//! 1. **Distribute**: a requested total per item is spread across the days
//!    of the range, floor share plus shuffled remainder.
//! 2. **Classify**: each item resolves to a regulatory category and a
//!    per-unit volume (recorded size, "NNN ML" name marker, or the 750 ml
//!    standard bottle, in that order).
//! 3. **Pack**: a day's allocations, grouped by category, are packed into
//!    volume-limited bills with a greedy single-active-bin pass.
//!
//! The persistence half (sequencing, ledger writes, deletion) lives in
//! the engine crate; the ports here describe the read-only collaborators
//! the pipeline needs.

pub mod bill;
pub mod classify;
pub mod distribute;
pub mod error;
pub mod item;
pub mod pack;
pub mod ports;

pub use bill::{Bill, BillHeader, BillLine};
pub use classify::{classify, resolve_volume, SaleCategory};
pub use distribute::distribute_quantity;
pub use error::SalesError;
pub use item::{ItemProfile, LiquorMode};
pub use pack::{pack_bins, DayAllocation, VolumeLimit};
pub use ports::{CategoryLimits, ItemDirectory, LimitPolicy};
