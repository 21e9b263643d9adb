//! Sales generation and deletion engine
//!
//! This crate orchestrates the full life of a synthetic sales run for a
//! liquor shop. Generation spreads requested quantities across a date
//! range, packs them into bills under per-category volume limits,
//! numbers the bills gaplessly, and posts every line to the stock
//! ledger. Deletion runs the inverse protocol: reverse the ledger,
//! renumber every later bill through a staging area, and leave the
//! sequence contiguous.
//!
//! Every operation executes against one [`store::SalesUnit`] and either
//! commits whole or rolls back whole. Callers receive a
//! [`RunOutcome`] and may observe [`ProgressUpdate`]s along the way;
//! neither implies a commit until the outcome reports success.
//!
//! The pure algorithms (distribution, classification, packing) live in
//! `domain_sales`; balance arithmetic lives in `domain_ledger`. This
//! crate owns sequencing, transaction scope, and the order in which the
//! pieces run.

pub mod config;
pub mod context;
pub mod delete;
pub mod error;
pub mod generate;
pub mod pending;
pub mod progress;
pub mod sequencer;
pub mod store;
pub mod writer;

pub use config::EngineConfig;
pub use context::RunContext;
pub use error::EngineError;
pub use generate::{CategoryTotals, GenerationRequest, GenerationSummary, SalesEngine};
pub use pending::{InMemoryPendingStore, PendingQuantityStore};
pub use progress::{ChannelProgress, NullProgress, ProgressSink, ProgressUpdate, RunOutcome};
pub use sequencer::{first_gap, BillSequencer};
pub use store::memory::InMemorySalesStore;
pub use store::{SalesStore, SalesUnit};
pub use writer::LedgerWriter;
