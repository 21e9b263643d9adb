//! Sales generation runs
//!
//! A run turns `{item -> total quantity}` over a date range into
//! persisted bills and ledger postings:
//!
//! 1. Resolve every item against the item directory and classify it
//! 2. Spread each item's total across the days of the range
//! 3. Per day, bucket items by category and pack buckets into bills
//!    under the company's volume limits
//! 4. Number each bill, insert it, and post it to the ledger
//!
//! Everything from the first insert to the last posting happens in one
//! store unit; the run either commits whole or leaves no trace. Progress
//! updates stream per processed day and are purely observational.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use core_kernel::{BillNo, DateRange, ItemCode, Milliliters, VolumeLoad};
use domain_sales::{
    classify, distribute_quantity, pack_bins, resolve_volume, Bill, BillLine, CategoryLimits,
    DayAllocation, ItemDirectory, ItemProfile, LimitPolicy, SaleCategory,
};

use crate::config::EngineConfig;
use crate::context::RunContext;
use crate::error::EngineError;
use crate::pending::PendingQuantityStore;
use crate::progress::{ProgressSink, ProgressUpdate, RunOutcome};
use crate::sequencer::BillSequencer;
use crate::store::{SalesStore, SalesUnit};
use crate::writer::LedgerWriter;

/// What a caller asks a generation run to produce.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    quantities: BTreeMap<ItemCode, u32>,
    range: DateRange,
}

impl GenerationRequest {
    /// An empty request over a date range.
    pub fn new(range: DateRange) -> Self {
        Self {
            quantities: BTreeMap::new(),
            range,
        }
    }

    /// Builds a request from already collected quantities.
    pub fn from_quantities(
        range: DateRange,
        quantities: impl IntoIterator<Item = (ItemCode, u32)>,
    ) -> Self {
        Self {
            quantities: quantities.into_iter().collect(),
            range,
        }
    }

    /// Adds an item's requested total, replacing any earlier entry.
    pub fn with_item(mut self, item: ItemCode, total_qty: u32) -> Self {
        self.quantities.insert(item, total_qty);
        self
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

/// Tally of what a committed generation run produced.
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    pub bill_numbers: Vec<BillNo>,
    pub bill_count: u32,
    pub line_count: u32,
    pub total_amount: Decimal,
    pub per_category: BTreeMap<SaleCategory, CategoryTotals>,
}

/// Units and bulk volume one run sold in a single category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    pub qty: u64,
    pub volume: VolumeLoad,
}

/// An item resolved and classified once, up front.
struct ResolvedItem {
    profile: ItemProfile,
    category: SaleCategory,
    volume: Milliliters,
    total_qty: u32,
}

/// Facade over generation and deletion runs.
///
/// Holds the ports a run needs and the policy configuration; each public
/// method executes one complete transactional operation and reports a
/// caller-facing [`RunOutcome`].
pub struct SalesEngine {
    store: Arc<dyn SalesStore>,
    items: Arc<dyn ItemDirectory>,
    limits: Arc<dyn LimitPolicy>,
    pending: Arc<dyn PendingQuantityStore>,
    config: EngineConfig,
}

impl SalesEngine {
    pub fn new(
        store: Arc<dyn SalesStore>,
        items: Arc<dyn ItemDirectory>,
        limits: Arc<dyn LimitPolicy>,
        pending: Arc<dyn PendingQuantityStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            items,
            limits,
            pending,
            config,
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn SalesStore> {
        &self.store
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn sequencer(&self) -> BillSequencer {
        BillSequencer::new(self.config.sequencer_retry_budget)
    }

    pub(crate) fn writer(&self) -> LedgerWriter {
        LedgerWriter::new(self.config.allow_negative_stock)
    }

    /// Runs a generation request to completion.
    ///
    /// Never returns an error: failures roll back the unit and surface as
    /// a failure outcome carrying the user-facing reason.
    #[instrument(skip_all, fields(run_id = %ctx.run_id, company = %ctx.company))]
    pub async fn generate(
        &self,
        ctx: &RunContext,
        request: GenerationRequest,
        progress: &dyn ProgressSink,
    ) -> RunOutcome {
        match self.try_generate(ctx, &request, progress).await {
            Ok(summary) => {
                info!(
                    bills = summary.bill_count,
                    lines = summary.line_count,
                    amount = %summary.total_amount,
                    "generation run committed"
                );
                let message = format!("Generated {} bills", summary.bill_count);
                progress.publish(ProgressUpdate::at(100, message.clone()));
                let outcome =
                    RunOutcome::succeeded(message, summary.bill_count, summary.total_amount);
                match &self.config.success_redirect {
                    Some(redirect) => outcome.with_redirect(redirect),
                    None => outcome,
                }
            }
            Err(err) => {
                warn!(error = %err, "generation run rolled back");
                let message = err.user_message();
                progress.publish(ProgressUpdate::failed(message.clone()));
                RunOutcome::failed(message)
            }
        }
    }

    /// Generates from the caller's pending quantities and clears them on
    /// success.
    pub async fn generate_from_pending(
        &self,
        ctx: &RunContext,
        range: DateRange,
        progress: &dyn ProgressSink,
    ) -> RunOutcome {
        let quantities = match self.pending.pending(&ctx.company, &ctx.user).await {
            Ok(quantities) => quantities,
            Err(err) => {
                let err = EngineError::from(err);
                return RunOutcome::failed(err.user_message());
            }
        };

        let request = GenerationRequest::from_quantities(range, quantities);
        let outcome = self.generate(ctx, request, progress).await;
        if outcome.success {
            // the cart is not part of the transactional unit; a failed
            // clear leaves stale quantities but never a broken ledger
            if let Err(err) = self.pending.clear(&ctx.company, &ctx.user).await {
                warn!(error = %err, "pending quantities were generated but not cleared");
            }
        }
        outcome
    }

    /// Runs a generation request and returns the full tally.
    ///
    /// [`generate`](Self::generate) wraps this and folds the summary into
    /// a [`RunOutcome`]; call this directly to inspect per-category totals
    /// or the allocated bill numbers.
    pub async fn try_generate(
        &self,
        ctx: &RunContext,
        request: &GenerationRequest,
        progress: &dyn ProgressSink,
    ) -> Result<GenerationSummary, EngineError> {
        if request.is_empty() {
            return Err(EngineError::validation("no items requested"));
        }

        let resolved = self.resolve_items(request).await?;
        let limits = self.limits.limits(&ctx.company).await?;

        let mut unit = self.store.begin().await?;
        match self
            .generate_in_unit(&mut *unit, ctx, request, &resolved, &limits, progress)
            .await
        {
            Ok(summary) => {
                unit.commit().await?;
                Ok(summary)
            }
            Err(err) => {
                if let Err(rollback_err) = unit.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed generation also failed");
                }
                Err(err)
            }
        }
    }

    async fn resolve_items(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ResolvedItem>, EngineError> {
        let mut resolved = Vec::with_capacity(request.quantities.len());
        for (code, total_qty) in &request.quantities {
            let profile = self.items.profile(code).await?;
            let category = classify(&profile);
            let volume = resolve_volume(&profile);
            debug!(item = %code, %category, %volume, total_qty, "item resolved");
            resolved.push(ResolvedItem {
                profile,
                category,
                volume,
                total_qty: *total_qty,
            });
        }
        Ok(resolved)
    }

    async fn generate_in_unit(
        &self,
        unit: &mut dyn SalesUnit,
        ctx: &RunContext,
        request: &GenerationRequest,
        resolved: &[ResolvedItem],
        limits: &CategoryLimits,
        progress: &dyn ProgressSink,
    ) -> Result<GenerationSummary, EngineError> {
        let sequencer = self.sequencer();
        let writer = self.writer();
        let days: Vec<NaiveDate> = request.range.iter_days().collect();

        // spread every item's total across the days
        let mut rng = rand::rng();
        let mut per_day: Vec<Vec<(usize, u32)>> = vec![Vec::new(); days.len()];
        for (idx, item) in resolved.iter().enumerate() {
            let shares = distribute_quantity(item.total_qty, days.len() as u32, &mut rng);
            for (slot, qty) in shares.into_iter().enumerate() {
                if qty > 0 {
                    per_day[slot].push((idx, qty));
                }
            }
        }

        progress.publish(ProgressUpdate::at(
            0,
            format!(
                "Spreading {} items across {} days",
                resolved.len(),
                days.len()
            ),
        ));

        let mut summary = GenerationSummary::default();
        for (day_index, date) in days.iter().enumerate() {
            let mut buckets: BTreeMap<SaleCategory, Vec<DayAllocation>> = BTreeMap::new();
            for (idx, qty) in &per_day[day_index] {
                let item = &resolved[*idx];
                buckets.entry(item.category).or_default().push(
                    DayAllocation::new(item.profile.code.clone(), *qty, item.volume),
                );
            }

            for (category, allocations) in buckets {
                let limit = limits.limit_for(category);
                for bin in pack_bins(allocations, limit) {
                    let bill_no = sequencer.next_bill_no(unit, &ctx.company).await?;
                    let lines = bin
                        .iter()
                        .map(|alloc| {
                            let rate = self.rate_of(resolved, &alloc.item);
                            BillLine::new(alloc.item.clone(), alloc.qty, rate)
                        })
                        .collect();
                    let bill =
                        Bill::new(bill_no, *date, ctx.company.clone(), ctx.mode, lines)?;

                    unit.insert_bill(&bill).await?;
                    writer.apply_bill(unit, ctx.current_month, &bill).await?;

                    debug!(
                        %bill_no,
                        %date,
                        %category,
                        lines = bill.lines.len(),
                        amount = %bill.header.net_amount,
                        "bill generated"
                    );
                    summary.bill_numbers.push(bill_no);
                    summary.bill_count += 1;
                    summary.line_count += bill.lines.len() as u32;
                    summary.total_amount += bill.header.net_amount;
                    let totals = summary.per_category.entry(category).or_default();
                    for alloc in &bin {
                        totals.qty += u64::from(alloc.qty);
                        totals.volume += alloc.load();
                    }
                }
            }

            let done = (((day_index + 1) * 100) / days.len()) as u8;
            progress.publish(ProgressUpdate::at(done, format!("Processed {date}")));
        }

        Ok(summary)
    }

    fn rate_of(&self, resolved: &[ResolvedItem], item: &ItemCode) -> Decimal {
        resolved
            .iter()
            .find(|r| &r.profile.code == item)
            .map(|r| r.profile.rate)
            .unwrap_or(Decimal::ZERO)
    }
}
