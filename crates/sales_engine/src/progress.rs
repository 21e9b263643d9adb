//! Progress streaming and run outcomes
//!
//! Long generation runs report percentage milestones while still
//! executing as one blocking unit of work. Updates are observational:
//! nothing a sink receives implies anything has committed, and the final
//! word is always the [`RunOutcome`] the engine returns.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One progress milestone of a running operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub success: bool,
    pub message: String,
    /// Percentage complete, 0 through 100.
    pub progress: u8,
}

impl ProgressUpdate {
    /// A successful milestone at the given percentage, clamped to 100.
    pub fn at(progress: u8, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            progress: progress.min(100),
        }
    }

    /// A terminal failure notice.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            progress: 100,
        }
    }
}

/// Receiver of progress updates during a run.
///
/// Implementations must not block: a slow observer may not stall the run.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, update: ProgressUpdate);
}

/// Sink that drops every update, for callers without a progress channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn publish(&self, _update: ProgressUpdate) {}
}

/// Sink that forwards updates into an unbounded channel.
///
/// A dropped receiver silences the stream without failing the run.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: mpsc::UnboundedSender<ProgressUpdate>,
}

impl ChannelProgress {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelProgress {
    fn publish(&self, update: ProgressUpdate) {
        let _ = self.sender.send(update);
    }
}

/// Final payload of a generation or deletion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub success: bool,
    pub message: String,
    /// Bills created or deleted by the run.
    pub bill_count: u32,
    /// Net amount across those bills.
    pub total_amount: Decimal,
    /// Optional navigation hint for interactive callers.
    pub redirect: Option<String>,
}

impl RunOutcome {
    pub fn succeeded(message: impl Into<String>, bill_count: u32, total_amount: Decimal) -> Self {
        Self {
            success: true,
            message: message.into(),
            bill_count,
            total_amount,
            redirect: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            bill_count: 0,
            total_amount: Decimal::ZERO,
            redirect: None,
        }
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }
}
