//! Engine tuning knobs

/// Behavioral switches for generation and deletion runs.
///
/// The defaults match shop-floor expectations: postings may never drive a
/// day's closing stock negative, and bill number allocation gives up after
/// a handful of collision retries rather than spinning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Permit ledger closings below zero. Off by default; zero-seeded
    /// cumulative balances go negative regardless of this flag.
    pub allow_negative_stock: bool,

    /// Extra candidates the sequencer tries when a freshly computed bill
    /// number turns out to be taken.
    pub sequencer_retry_budget: u32,

    /// Navigation hint attached to successful run outcomes, passed through
    /// to the caller untouched.
    pub success_redirect: Option<String>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            allow_negative_stock: false,
            sequencer_retry_budget: 5,
            success_redirect: None,
        }
    }

    pub fn with_negative_stock_allowed(mut self) -> Self {
        self.allow_negative_stock = true;
        self
    }

    pub fn with_sequencer_retry_budget(mut self, budget: u32) -> Self {
        self.sequencer_retry_budget = budget;
        self
    }

    pub fn with_success_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.success_redirect = Some(redirect.into());
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_forbid_negative_stock() {
        let config = EngineConfig::default();
        assert!(!config.allow_negative_stock);
        assert_eq!(config.sequencer_retry_budget, 5);
        assert!(config.success_redirect.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = EngineConfig::new()
            .with_negative_stock_allowed()
            .with_sequencer_retry_budget(2)
            .with_success_redirect("/bills");
        assert!(config.allow_negative_stock);
        assert_eq!(config.sequencer_retry_budget, 2);
        assert_eq!(config.success_redirect.as_deref(), Some("/bills"));
    }
}
