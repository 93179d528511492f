use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};

use crate::errors::{Error, Result};
use crate::jobs::jobs_model::{JobOutcome, JobType, RetryPolicy};
use crate::jobs::jobs_traits::JobOrchestratorTrait;

/// Runs `job` until it succeeds or the policy's retries are exhausted. The
/// terminal failure is returned, never swallowed.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut job: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match job().await {
            Ok(value) => {
                if attempt > 0 {
                    info!("{} succeeded on attempt {}", label, attempt + 1);
                }
                return Ok(value);
            }
            Err(e) => {
                if attempt >= policy.backoff.len() {
                    error!(
                        "{} failed permanently after {} attempts: {}",
                        label,
                        attempt + 1,
                        e
                    );
                    return Err(e);
                }
                let delay = policy.backoff[attempt];
                warn!(
                    "{} attempt {} failed: {}; retrying in {:?}",
                    label,
                    attempt + 1,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// How often each job type fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSchedule {
    pub wallet_sync_every: Duration,
    pub account_sync_every: Duration,
    pub portfolio_calculation_every: Duration,
    pub alert_generation_every: Duration,
}

impl Default for JobSchedule {
    fn default() -> Self {
        JobSchedule {
            wallet_sync_every: Duration::from_secs(10 * 60),
            account_sync_every: Duration::from_secs(30 * 60),
            portfolio_calculation_every: Duration::from_secs(60 * 60),
            alert_generation_every: Duration::from_secs(60 * 60),
        }
    }
}

impl JobSchedule {
    pub fn period(&self, job_type: JobType) -> Duration {
        match job_type {
            JobType::WalletSync => self.wallet_sync_every,
            JobType::AccountSync => self.account_sync_every,
            JobType::PortfolioCalculation => self.portfolio_calculation_every,
            JobType::AlertGeneration => self.alert_generation_every,
        }
    }
}

/// Periodic driver. One run per job type at a time: a trigger that lands
/// while the previous run is still going is skipped, not stacked.
pub struct JobScheduler {
    orchestrator: Arc<dyn JobOrchestratorTrait>,
    schedule: JobSchedule,
    wallet_sync_guard: Mutex<()>,
    account_sync_guard: Mutex<()>,
    portfolio_calculation_guard: Mutex<()>,
    alert_generation_guard: Mutex<()>,
}

impl JobScheduler {
    pub fn new(orchestrator: Arc<dyn JobOrchestratorTrait>, schedule: JobSchedule) -> Self {
        JobScheduler {
            orchestrator,
            schedule,
            wallet_sync_guard: Mutex::new(()),
            account_sync_guard: Mutex::new(()),
            portfolio_calculation_guard: Mutex::new(()),
            alert_generation_guard: Mutex::new(()),
        }
    }

    fn guard(&self, job_type: JobType) -> &Mutex<()> {
        match job_type {
            JobType::WalletSync => &self.wallet_sync_guard,
            JobType::AccountSync => &self.account_sync_guard,
            JobType::PortfolioCalculation => &self.portfolio_calculation_guard,
            JobType::AlertGeneration => &self.alert_generation_guard,
        }
    }

    /// Runs one job now, with its retry policy. Fails fast with a conflict
    /// if a run of the same job type is already in flight.
    pub async fn trigger(&self, job_type: JobType) -> Result<JobOutcome> {
        let guard = match self.guard(job_type).try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                return Err(Error::Conflict(format!(
                    "{} is already running",
                    job_type.as_str()
                )))
            }
        };

        let policy = RetryPolicy::for_job(job_type);
        let outcome = run_with_retry(&policy, job_type.as_str(), || {
            self.orchestrator.run(job_type)
        })
        .await;
        drop(guard);
        outcome
    }

    /// Spawns one ticking loop per job type and returns their handles.
    pub fn spawn(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        [
            JobType::WalletSync,
            JobType::AccountSync,
            JobType::PortfolioCalculation,
            JobType::AlertGeneration,
        ]
        .into_iter()
        .map(|job_type| {
            let scheduler = Arc::clone(self);
            tokio::spawn(async move {
                let mut ticker = interval(scheduler.schedule.period(job_type));
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    match scheduler.trigger(job_type).await {
                        Ok(outcome) => debug!(
                            "{} run complete: {} processed, {} failed",
                            job_type.as_str(),
                            outcome.processed,
                            outcome.failed
                        ),
                        Err(Error::Conflict(_)) => info!(
                            "{} still running, skipping this trigger",
                            job_type.as_str()
                        ),
                        Err(e) => error!("{} run failed permanently: {}", job_type.as_str(), e),
                    }
                }
            })
        })
        .collect()
    }

    /// Spawns the loops and parks on them. Only returns if every loop dies.
    pub async fn run_until_shutdown(self: Arc<Self>) {
        let handles = self.spawn();
        futures::future::join_all(handles).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy(retries: usize) -> RetryPolicy {
        RetryPolicy::new(vec![Duration::from_millis(5); retries])
    }

    #[tokio::test]
    async fn retries_are_bounded_and_terminal_failure_surfaces() {
        let attempts = AtomicUsize::new(0);
        let policy = fast_policy(2);

        let result: Result<()> = run_with_retry(&policy, "always-failing", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Transient("store down".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), policy.max_attempts());
    }

    #[tokio::test]
    async fn recovers_when_a_retry_succeeds() {
        let attempts = AtomicUsize::new(0);
        let policy = fast_policy(3);

        let result = run_with_retry(&policy, "flaky", || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(Error::Transient("not yet".to_string()))
                } else {
                    Ok(attempt + 1)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn policies_match_the_documented_schedules() {
        let sync = RetryPolicy::sync_default();
        assert_eq!(sync.max_attempts(), 4);
        assert_eq!(
            sync.backoff,
            vec![
                Duration::from_secs(30),
                Duration::from_secs(60),
                Duration::from_secs(120)
            ]
        );

        let calc = RetryPolicy::calculation_default();
        assert_eq!(calc.max_attempts(), 3);
        assert_eq!(
            calc.backoff,
            vec![Duration::from_secs(60), Duration::from_secs(180)]
        );
    }
}
