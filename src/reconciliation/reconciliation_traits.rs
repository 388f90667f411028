use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::reconciliation::reconciliation_model::TransferReport;
use crate::session::SessionContext;

/// Trait for the reconciliation batch writer
#[async_trait]
pub trait MonthlyResetRepositoryTrait: Send + Sync {
    /// Applies the month-end batch for every due budget of the user inside a
    /// single transaction: savings allocations transfer into resolvable
    /// linked goals, spend counters zero, `last_reset` stamps to `today`.
    /// Either the whole batch lands or none of it does.
    async fn process_monthly_transfers(&self, owner: &str, today: NaiveDate)
        -> Result<TransferReport>;
}

/// Trait for the monthly reset job
#[async_trait]
pub trait MonthlyResetServiceTrait: Send + Sync {
    /// Whether any budget of the user still awaits this period's reset.
    fn is_reset_due(&self, ctx: &SessionContext) -> Result<bool>;
    /// Runs the reset if due; a second invocation in the same period is a
    /// no-op reported as zero transfers, not an error. Scheduled checks and
    /// manual triggers share this entry point.
    async fn run_monthly_reset(&self, ctx: &SessionContext) -> Result<TransferReport>;
}
