//! Bill deletion and renumbering
//!
//! Removing a bill may not leave a hole in the number sequence, so the
//! deletion of bill N is really a six-step protocol over one unit:
//!
//! 1. load the target (absent target fails the run)
//! 2. reverse the target's ledger postings
//! 3. stage every bill above N and delete it from the live store
//! 4. delete the target
//! 5. re-insert the staged bills in order under freshly sequenced
//!    numbers (pure renumbering, their ledger state never moved)
//! 6. purge the staging area
//!
//! Bulk and by-date deletion repeat the protocol per bill inside the
//! same unit. Every variant commits whole or rolls back whole.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use core_kernel::{BillNo, DateRange};

use crate::context::RunContext;
use crate::error::EngineError;
use crate::generate::SalesEngine;
use crate::progress::{ProgressSink, ProgressUpdate, RunOutcome};
use crate::sequencer::BillSequencer;
use crate::store::SalesUnit;
use crate::writer::LedgerWriter;

impl SalesEngine {
    /// Deletes one bill and renumbers every later bill down by one.
    #[instrument(skip_all, fields(run_id = %ctx.run_id, company = %ctx.company, %bill_no))]
    pub async fn delete_bill(&self, ctx: &RunContext, bill_no: BillNo) -> RunOutcome {
        let sequencer = self.sequencer();
        let writer = self.writer();
        let mut unit = match self.store().begin().await {
            Ok(unit) => unit,
            Err(err) => return RunOutcome::failed(EngineError::from(err).user_message()),
        };

        match delete_one(&mut *unit, ctx, &sequencer, &writer, bill_no).await {
            Ok(amount) => match unit.commit().await {
                Ok(()) => {
                    info!("bill deleted and sequence closed up");
                    self.deletion_outcome(format!("Deleted bill {bill_no}"), 1, amount)
                }
                Err(err) => RunOutcome::failed(EngineError::from(err).user_message()),
            },
            Err(err) => {
                roll_back(unit).await;
                RunOutcome::failed(err.user_message())
            }
        }
    }

    /// Deletes several bills named by their pre-call numbers.
    ///
    /// Targets run ascending; because each deletion renumbers everything
    /// above it down by one, the i-th remaining target has slid down i
    /// numbers by the time its turn comes.
    #[instrument(skip_all, fields(run_id = %ctx.run_id, company = %ctx.company, targets = bill_nos.len()))]
    pub async fn delete_bills(
        &self,
        ctx: &RunContext,
        mut bill_nos: Vec<BillNo>,
        progress: &dyn ProgressSink,
    ) -> RunOutcome {
        if bill_nos.is_empty() {
            return RunOutcome::failed("no bills named for deletion");
        }
        bill_nos.sort_unstable();
        bill_nos.dedup();

        let sequencer = self.sequencer();
        let writer = self.writer();
        let mut unit = match self.store().begin().await {
            Ok(unit) => unit,
            Err(err) => return RunOutcome::failed(EngineError::from(err).user_message()),
        };

        let total = bill_nos.len();
        let mut amount = Decimal::ZERO;
        for (shift, original) in bill_nos.iter().enumerate() {
            let target = BillNo::from_suffix(original.suffix() - shift as u32);
            match delete_one(&mut *unit, ctx, &sequencer, &writer, target).await {
                Ok(bill_amount) => {
                    amount += bill_amount;
                    progress.publish(ProgressUpdate::at(
                        (((shift + 1) * 100) / total) as u8,
                        format!("Deleted bill {original}"),
                    ));
                }
                Err(err) => {
                    roll_back(unit).await;
                    progress.publish(ProgressUpdate::failed(err.user_message()));
                    return RunOutcome::failed(err.user_message());
                }
            }
        }

        match unit.commit().await {
            Ok(()) => {
                info!(count = total, "bulk deletion committed");
                self.deletion_outcome(format!("Deleted {total} bills"), total as u32, amount)
            }
            Err(err) => RunOutcome::failed(EngineError::from(err).user_message()),
        }
    }

    /// Deletes every bill dated inside the range.
    ///
    /// Re-queries after each deletion instead of shifting numbers:
    /// renumbering changes bill numbers but never bill dates, so the
    /// lowest-numbered match is always the next target. A range matching
    /// nothing succeeds with zero deletions.
    #[instrument(skip_all, fields(run_id = %ctx.run_id, company = %ctx.company, %range))]
    pub async fn delete_in_range(
        &self,
        ctx: &RunContext,
        range: DateRange,
        progress: &dyn ProgressSink,
    ) -> RunOutcome {
        let sequencer = self.sequencer();
        let writer = self.writer();
        let mut unit = match self.store().begin().await {
            Ok(unit) => unit,
            Err(err) => return RunOutcome::failed(EngineError::from(err).user_message()),
        };

        let mut count = 0u32;
        let mut amount = Decimal::ZERO;
        let mut total = 0usize;
        loop {
            let matches = match unit.bills_in_range(&ctx.company, range).await {
                Ok(matches) => matches,
                Err(err) => {
                    roll_back(unit).await;
                    return RunOutcome::failed(EngineError::from(err).user_message());
                }
            };
            if count == 0 {
                total = matches.len();
            }
            let Some(next) = matches.first() else {
                break;
            };
            let target = next.bill_no();
            let date = next.header.date;

            match delete_one(&mut *unit, ctx, &sequencer, &writer, target).await {
                Ok(bill_amount) => {
                    amount += bill_amount;
                    count += 1;
                    progress.publish(ProgressUpdate::at(
                        ((count as usize * 100) / total) as u8,
                        format!("Deleted bill dated {date}"),
                    ));
                }
                Err(err) => {
                    roll_back(unit).await;
                    progress.publish(ProgressUpdate::failed(err.user_message()));
                    return RunOutcome::failed(err.user_message());
                }
            }
        }

        match unit.commit().await {
            Ok(()) => {
                info!(count, "date-range deletion committed");
                self.deletion_outcome(format!("Deleted {count} bills"), count, amount)
            }
            Err(err) => RunOutcome::failed(EngineError::from(err).user_message()),
        }
    }

    fn deletion_outcome(&self, message: String, count: u32, amount: Decimal) -> RunOutcome {
        let outcome = RunOutcome::succeeded(message, count, amount);
        match &self.config().success_redirect {
            Some(redirect) => outcome.with_redirect(redirect),
            None => outcome,
        }
    }
}

/// Runs the six-step protocol for a single bill inside an open unit.
/// Returns the deleted bill's net amount.
async fn delete_one(
    unit: &mut dyn SalesUnit,
    ctx: &RunContext,
    sequencer: &BillSequencer,
    writer: &LedgerWriter,
    bill_no: BillNo,
) -> Result<Decimal, EngineError> {
    // 1. validate
    let bill = unit
        .load_bill(&ctx.company, bill_no)
        .await?
        .ok_or_else(|| EngineError::not_found("bill", bill_no))?;

    // 2. reverse ledger effects
    writer.reverse_bill(unit, ctx.current_month, &bill).await?;

    // 3. stage and delete every later bill, ascending
    let later = unit.bills_above(&ctx.company, bill_no).await?;
    for displaced in &later {
        unit.stage_bill(displaced).await?;
        unit.delete_bill(&ctx.company, displaced.bill_no()).await?;
    }

    // 4. delete the target
    unit.delete_bill(&ctx.company, bill_no).await?;

    // 5. restore staged bills under fresh numbers
    let staged = unit.staged_bills(&ctx.company).await?;
    for parked in staged {
        let fresh = sequencer.next_bill_no(unit, &ctx.company).await?;
        unit.insert_bill(&parked.renumbered(fresh)).await?;
    }

    // 6. purge
    unit.purge_staging(&ctx.company).await?;

    debug!(%bill_no, displaced = later.len(), "deletion protocol completed");
    Ok(bill.header.net_amount)
}

async fn roll_back(unit: Box<dyn SalesUnit>) {
    if let Err(err) = unit.rollback().await {
        warn!(error = %err, "rollback after failed deletion also failed");
    }
}
