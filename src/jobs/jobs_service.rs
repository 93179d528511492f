use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::alerts::AlertServiceTrait;
use crate::clients::ClientRepositoryTrait;
use crate::constants::DEFAULT_DRIFT_THRESHOLD_PCT;
use crate::errors::Result;
use crate::holdings::{AssetType, BalanceSource, HoldingRepositoryTrait};
use crate::jobs::batch::for_each_isolated_async;
use crate::jobs::jobs_model::{JobOutcome, JobRunStatus, JobType};
use crate::jobs::jobs_traits::JobOrchestratorTrait;
use crate::notifications::Notifier;
use crate::utils::clock::Clock;
use crate::valuation::ValuationServiceTrait;

/// Drives the periodic pipeline: sync, valuation, alert generation. Each
/// entity inside a run is processed in isolation; anything that escapes a
/// run's top level is the scheduler's problem.
pub struct JobOrchestrator<C, H, V, A>
where
    C: ClientRepositoryTrait,
    H: HoldingRepositoryTrait,
    V: ValuationServiceTrait,
    A: AlertServiceTrait,
{
    client_repo: Arc<C>,
    holding_repo: Arc<H>,
    valuation: Arc<V>,
    alerts: Arc<A>,
    balance_source: Arc<dyn BalanceSource>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl<C, H, V, A> JobOrchestrator<C, H, V, A>
where
    C: ClientRepositoryTrait,
    H: HoldingRepositoryTrait,
    V: ValuationServiceTrait,
    A: AlertServiceTrait,
{
    pub fn new(
        client_repo: Arc<C>,
        holding_repo: Arc<H>,
        valuation: Arc<V>,
        alerts: Arc<A>,
        balance_source: Arc<dyn BalanceSource>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        JobOrchestrator {
            client_repo,
            holding_repo,
            valuation,
            alerts,
            balance_source,
            notifier,
            clock,
        }
    }

    fn outcome(
        &self,
        job_type: JobType,
        processed: usize,
        failed: usize,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> JobOutcome {
        JobOutcome {
            job_type,
            status: JobRunStatus::Completed,
            processed,
            failed,
            started_at,
            finished_at: self.clock.now(),
        }
    }
}

#[async_trait]
impl<C, H, V, A> JobOrchestratorTrait for JobOrchestrator<C, H, V, A>
where
    C: ClientRepositoryTrait,
    H: HoldingRepositoryTrait,
    V: ValuationServiceTrait,
    A: AlertServiceTrait,
{
    async fn run_wallet_sync(&self) -> Result<JobOutcome> {
        let started_at = self.clock.now();
        let holdings = self.holding_repo.get_active_wallet_holdings()?;
        info!("Wallet sync started for {} holdings", holdings.len());

        let results = for_each_isolated_async("wallet-sync", holdings, |holding| async move {
            let balances = self.balance_source.wallet_balances(&holding).await?;
            self.holding_repo
                .record_wallet_sync(&holding.id, &balances, self.clock.now())?;
            Ok(())
        })
        .await;

        let mut processed = 0;
        let mut failed = 0;
        for (holding, outcome) in &results {
            match outcome {
                Ok(_) => processed += 1,
                Err(_) => {
                    failed += 1;
                    if let Err(e) = self.holding_repo.mark_sync_failed(
                        AssetType::Wallet,
                        &holding.id,
                        self.clock.now(),
                    ) {
                        warn!("Could not flag wallet {} as degraded: {}", holding.id, e);
                    }
                }
            }
        }

        info!("Wallet sync finished: {} ok, {} failed", processed, failed);
        Ok(self.outcome(JobType::WalletSync, processed, failed, started_at))
    }

    async fn run_account_sync(&self) -> Result<JobOutcome> {
        let started_at = self.clock.now();
        let holdings = self.holding_repo.get_active_account_holdings()?;
        info!("Account sync started for {} holdings", holdings.len());

        let results = for_each_isolated_async("account-sync", holdings, |holding| async move {
            let balance = self.balance_source.account_balance(&holding).await?;
            self.holding_repo
                .record_account_sync(&holding.id, balance.as_ref(), self.clock.now())?;
            Ok(())
        })
        .await;

        let mut processed = 0;
        let mut failed = 0;
        for (holding, outcome) in &results {
            match outcome {
                Ok(_) => processed += 1,
                Err(_) => {
                    failed += 1;
                    if let Err(e) = self.holding_repo.mark_sync_failed(
                        AssetType::Account,
                        &holding.id,
                        self.clock.now(),
                    ) {
                        warn!("Could not flag account {} as degraded: {}", holding.id, e);
                    }
                }
            }
        }

        info!("Account sync finished: {} ok, {} failed", processed, failed);
        Ok(self.outcome(JobType::AccountSync, processed, failed, started_at))
    }

    async fn run_portfolio_calculation(&self) -> Result<JobOutcome> {
        let started_at = self.clock.now();
        let clients = self.client_repo.get_active_clients()?;
        info!(
            "Portfolio calculation started for {} clients",
            clients.len()
        );

        let results =
            for_each_isolated_async("portfolio-calculation", clients, |client| async move {
                self.valuation.value_client_portfolio(&client.id)
            })
            .await;

        let mut processed = 0;
        let mut failed = 0;
        for (_, outcome) in &results {
            match outcome {
                Ok(valuation) => {
                    processed += 1;
                    // best-effort: a dead push channel never fails the job
                    if let Err(e) = self.notifier.notify_portfolio_recalculated(valuation).await {
                        warn!("Portfolio notification failed, continuing: {}", e);
                    }
                }
                Err(_) => failed += 1,
            }
        }

        let consolidated = self.valuation.value_consolidated()?;
        info!(
            "Portfolio calculation finished: {} ok, {} failed; AUM {}, holdings {}",
            processed, failed, consolidated.total_aum, consolidated.total_holding_value
        );
        Ok(self.outcome(JobType::PortfolioCalculation, processed, failed, started_at))
    }

    async fn run_alert_generation(&self) -> Result<JobOutcome> {
        let started_at = self.clock.now();

        // fixed sweep order: wallet balances, account balances, drift,
        // stale syncs
        let mut raised = Vec::new();
        raised.extend(self.alerts.sweep_low_wallet_balances()?);
        raised.extend(self.alerts.sweep_low_account_balances()?);
        raised.extend(self.alerts.sweep_allocation_drift(DEFAULT_DRIFT_THRESHOLD_PCT)?);
        raised.extend(self.alerts.sweep_stale_syncs()?);

        for alert in &raised {
            if let Err(e) = self.notifier.notify_alert_raised(alert).await {
                warn!("Alert notification failed, continuing: {}", e);
            }
        }

        info!("Alert generation finished: {} alerts raised", raised.len());
        Ok(self.outcome(JobType::AlertGeneration, raised.len(), 0, started_at))
    }

    async fn run(&self, job_type: JobType) -> Result<JobOutcome> {
        match job_type {
            JobType::WalletSync => self.run_wallet_sync().await,
            JobType::AccountSync => self.run_account_sync().await,
            JobType::PortfolioCalculation => self.run_portfolio_calculation().await,
            JobType::AlertGeneration => self.run_alert_generation().await,
        }
    }
}
