//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the stock ledger
//! system: bills and their lines, the staging area used while bills are
//! renumbered, cumulative stock balances, and the month-partitioned
//! ledger sheets.
//!
//! # Architecture
//!
//! [`PgSalesStore`] implements the engine's transactional store ports.
//! Every run opens one unit of work backed by one database transaction;
//! the engine sees only the port traits and never learns which physical
//! table a month sheet lives in. That resolution (the live table for
//! the present calendar month, per-month archive tables for the rest)
//! belongs to [`month_table`].
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{PgSalesStore, StoreSettings, create_pool};
//!
//! let settings = StoreSettings::load();
//! let pool = create_pool(settings.pool_config()).await?;
//! let store = PgSalesStore::new(pool);
//! ```

pub mod error;
pub mod month_table;
pub mod pool;
pub mod settings;
pub mod store;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use settings::StoreSettings;
pub use store::{PgSalesStore, PgSalesUnit};
