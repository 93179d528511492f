use async_trait::async_trait;

use crate::errors::Result;
use crate::jobs::jobs_model::{JobOutcome, JobType};

/// Trait for the periodic job pipeline. An `Err` from any run means the
/// whole job failed and is the scheduler's cue to retry with backoff;
/// per-entity failures are absorbed into the outcome instead.
#[async_trait]
pub trait JobOrchestratorTrait: Send + Sync {
    /// Pull wallet balances from the balance source and upsert snapshots
    async fn run_wallet_sync(&self) -> Result<JobOutcome>;

    /// Pull account balances from the balance source and upsert snapshots
    async fn run_account_sync(&self) -> Result<JobOutcome>;

    /// Value every active client's portfolio, then the consolidated totals
    async fn run_portfolio_calculation(&self) -> Result<JobOutcome>;

    /// Run the four detection sweeps in fixed order
    async fn run_alert_generation(&self) -> Result<JobOutcome>;

    /// Dispatch by job type
    async fn run(&self, job_type: JobType) -> Result<JobOutcome>;
}
