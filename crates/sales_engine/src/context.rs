//! Request-scoped run context
//!
//! Everything the old session globals used to carry travels here instead:
//! who is generating, for which company and financial year, in which
//! liquor mode, and what "the current month" means for archive resolution.
//! The engine passes identifiers through without interpreting them.

use core_kernel::{CompanyId, FinYearId, MonthKey, RunId, UserId};
use domain_sales::LiquorMode;

/// Context for one generation or deletion run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub company: CompanyId,
    pub user: UserId,
    pub fin_year: FinYearId,
    pub mode: LiquorMode,
    /// The month whose ledger sheets are live. Bills dated in earlier
    /// months post against archived sheets and carry into this one.
    pub current_month: MonthKey,
    /// Correlation id for logs and progress streams.
    pub run_id: RunId,
}

impl RunContext {
    /// Creates a context with a fresh run id.
    ///
    /// `current_month` is resolved by the caller from the wall clock; the
    /// engine never consults the clock itself, which keeps archive
    /// resolution reproducible.
    pub fn new(
        company: CompanyId,
        user: UserId,
        fin_year: FinYearId,
        mode: LiquorMode,
        current_month: MonthKey,
    ) -> Self {
        Self {
            company,
            user,
            fin_year,
            mode,
            current_month,
            run_id: RunId::new(),
        }
    }

    /// Pins the run id, mainly for log assertions.
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }
}
