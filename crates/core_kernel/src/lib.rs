//! Core Kernel - Foundational types and utilities for the stock-ledger engine
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed identifiers, including the canonical bill number format
//! - Volume types for pack sizes and bulk loads
//! - Calendar types for month-partitioned ledger data
//! - Port infrastructure shared by all adapters

pub mod calendar;
pub mod error;
pub mod identifiers;
pub mod ports;
pub mod volume;

pub use calendar::{CalendarError, DateRange, DayOfMonth, MonthKey};
pub use error::CoreError;
pub use identifiers::{BillNo, CompanyId, FinYearId, IdentifierError, ItemCode, RunId, UserId};
pub use ports::{DomainPort, PortError};
pub use volume::{Milliliters, VolumeLoad};
