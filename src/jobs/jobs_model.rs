use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four background jobs the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    WalletSync,
    AccountSync,
    PortfolioCalculation,
    AlertGeneration,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::WalletSync => "WALLET_SYNC",
            JobType::AccountSync => "ACCOUNT_SYNC",
            JobType::PortfolioCalculation => "PORTFOLIO_CALCULATION",
            JobType::AlertGeneration => "ALERT_GENERATION",
        }
    }
}

/// Terminal state of a whole job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobRunStatus {
    Completed,
    Failed,
}

/// What one run of a job got through. Per-entity failures are counted here
/// instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobOutcome {
    pub job_type: JobType,
    pub status: JobRunStatus,
    pub processed: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Bounded retry schedule for a whole-job failure. The backoff list doubles
/// as the retry count: one retry per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub backoff: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(backoff: Vec<Duration>) -> Self {
        RetryPolicy { backoff }
    }

    /// Sync jobs: three retries at 30/60/120 seconds
    pub fn sync_default() -> Self {
        RetryPolicy::new(vec![
            Duration::from_secs(30),
            Duration::from_secs(60),
            Duration::from_secs(120),
        ])
    }

    /// Calculation and alert jobs: two retries at 60/180 seconds
    pub fn calculation_default() -> Self {
        RetryPolicy::new(vec![Duration::from_secs(60), Duration::from_secs(180)])
    }

    pub fn for_job(job_type: JobType) -> Self {
        match job_type {
            JobType::WalletSync | JobType::AccountSync => RetryPolicy::sync_default(),
            JobType::PortfolioCalculation | JobType::AlertGeneration => {
                RetryPolicy::calculation_default()
            }
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.backoff.len() + 1
    }
}
