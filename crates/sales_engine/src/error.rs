//! Engine error taxonomy
//!
//! Every failure of a generation or deletion run collapses into one of
//! five kinds. The kind decides nothing about control flow beyond the
//! run boundary (any error aborts and rolls back the whole unit); it
//! exists so callers can phrase the failure and operators can grep it.

use core_kernel::{CoreError, IdentifierError, PortError};
use domain_ledger::LedgerError;
use domain_sales::SalesError;
use thiserror::Error;

/// Errors surfaced by generation and deletion runs.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The request itself is unusable: empty item set, bad date range,
    /// or a posting the stock policy forbids.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// A referenced entity does not exist: item, bill, ledger sheet or cell.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Concurrent writers collided and the bounded retry budget ran out.
    #[error("concurrency conflict: {message}")]
    Conflict { message: String },

    /// A stored invariant no longer holds: bill totals disagree with
    /// their lines, or a ledger cell fails the closing equation.
    #[error("data integrity violation: {message}")]
    Integrity { message: String },

    /// The underlying store failed to read or write.
    #[error("store failure: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::Conflict {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        EngineError::Integrity {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        EngineError::Store {
            message: message.into(),
            source: None,
        }
    }

    /// True when the failure names a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound { .. })
    }

    /// The message a caller-facing failure payload should carry.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::Validation { message } => message.clone(),
            EngineError::NotFound { entity, id } => format!("{entity} not found: {id}"),
            EngineError::Conflict { .. } => {
                "the operation conflicted with another run, please retry".to_string()
            }
            EngineError::Integrity { message } => format!("data integrity violation: {message}"),
            EngineError::Store { .. } => "a storage failure aborted the operation".to_string(),
        }
    }
}

impl From<PortError> for EngineError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => EngineError::NotFound {
                entity: entity_type,
                id,
            },
            PortError::Validation { message, .. } => EngineError::Validation { message },
            PortError::Conflict { message } => EngineError::Conflict { message },
            other => EngineError::Store {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

impl From<SalesError> for EngineError {
    fn from(err: SalesError) -> Self {
        match err {
            SalesError::EmptyBill { .. } => EngineError::Validation {
                message: err.to_string(),
            },
            SalesError::TotalMismatch { .. } => EngineError::Integrity {
                message: err.to_string(),
            },
        }
    }
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::MissingCell { month, day } => EngineError::NotFound {
                entity: "ledger cell".to_string(),
                id: format!("day {day} of {month}"),
            },
            LedgerError::InvalidDay { .. } | LedgerError::InsufficientStock { .. } => {
                EngineError::Validation {
                    message: err.to_string(),
                }
            }
            LedgerError::UnbalancedCell { .. } | LedgerError::BrokenContinuity { .. } => {
                EngineError::Integrity {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<IdentifierError> for EngineError {
    fn from(err: IdentifierError) -> Self {
        EngineError::Validation {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        EngineError::Validation {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_errors_map_by_kind() {
        let nf: EngineError = PortError::not_found("bill", "BL0001").into();
        assert!(nf.is_not_found());

        let conflict: EngineError = PortError::conflict("duplicate key").into();
        assert!(matches!(conflict, EngineError::Conflict { .. }));

        let io: EngineError = PortError::connection("refused").into();
        assert!(matches!(io, EngineError::Store { .. }));
    }

    #[test]
    fn test_insufficient_stock_reads_as_validation() {
        let err: EngineError = LedgerError::InsufficientStock {
            month: core_kernel::MonthKey::new(2024, 7).unwrap(),
            day: core_kernel::DayOfMonth::new(3).unwrap(),
            closing: -2,
        }
        .into();
        assert!(matches!(err, EngineError::Validation { .. }));
        assert!(err.user_message().contains("insufficient stock"));
    }

    #[test]
    fn test_user_message_hides_store_detail() {
        let err = EngineError::Store {
            message: "tcp reset by peer at 10.0.0.3".to_string(),
            source: None,
        };
        assert!(!err.user_message().contains("10.0.0.3"));
    }
}
