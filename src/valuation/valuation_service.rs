use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::allocations::AllocationRepositoryTrait;
use crate::errors::Result;
use crate::fx::FxConverter;
use crate::holdings::{AssetType, HoldingRepositoryTrait};
use crate::utils::clock::Clock;
use crate::valuation::valuation_calculator::{
    account_holding_value, value_allocation, wallet_holding_value,
};
use crate::valuation::valuation_model::{
    AllocationValuation, ClientPortfolioValuation, ConsolidatedValuation, PerformanceMetric,
};
use crate::valuation::valuation_traits::{ValuationRepositoryTrait, ValuationServiceTrait};

/// Turns raw balance snapshots and active allocations into client-attributed
/// USD values, persisting one performance metric per client per day.
pub struct ValuationService<A, H, V>
where
    A: AllocationRepositoryTrait,
    H: HoldingRepositoryTrait,
    V: ValuationRepositoryTrait,
{
    allocation_repo: Arc<A>,
    holding_repo: Arc<H>,
    valuation_repo: Arc<V>,
    fx: Arc<dyn FxConverter>,
    clock: Arc<dyn Clock>,
}

impl<A, H, V> ValuationService<A, H, V>
where
    A: AllocationRepositoryTrait,
    H: HoldingRepositoryTrait,
    V: ValuationRepositoryTrait,
{
    pub fn new(
        allocation_repo: Arc<A>,
        holding_repo: Arc<H>,
        valuation_repo: Arc<V>,
        fx: Arc<dyn FxConverter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ValuationService {
            allocation_repo,
            holding_repo,
            valuation_repo,
            fx,
            clock,
        }
    }

    fn compute_client_portfolio(
        &self,
        client_id: &str,
    ) -> Result<(Decimal, Vec<AllocationValuation>)> {
        let allocations = self.allocation_repo.get_active_allocations(Some(client_id))?;

        let mut total = Decimal::ZERO;
        let mut breakdown = Vec::with_capacity(allocations.len());
        for allocation in allocations {
            let holding_value =
                self.resolve_holding_value(allocation.asset_type, &allocation.asset_id)?;
            let allocated_value = value_allocation(&allocation, holding_value);
            total += allocated_value;
            breakdown.push(AllocationValuation {
                allocation_id: allocation.id,
                client_id: allocation.client_id,
                asset_type: allocation.asset_type,
                asset_id: allocation.asset_id,
                allocation_type: allocation.allocation_type,
                holding_value,
                allocated_value,
            });
        }
        Ok((total, breakdown))
    }
}

impl<A, H, V> ValuationServiceTrait for ValuationService<A, H, V>
where
    A: AllocationRepositoryTrait,
    H: HoldingRepositoryTrait,
    V: ValuationRepositoryTrait,
{
    fn value_client_portfolio(&self, client_id: &str) -> Result<ClientPortfolioValuation> {
        let (total, breakdown) = self.compute_client_portfolio(client_id)?;
        let today = self.clock.today();

        let pnl = self
            .valuation_repo
            .latest_metric_before(client_id, today)?
            .map(|previous| total - previous.total_value)
            .unwrap_or(Decimal::ZERO);

        self.valuation_repo.upsert_metric(PerformanceMetric {
            id: format!("{}_{}", client_id, today),
            client_id: client_id.to_string(),
            metric_date: today,
            total_value: total,
            pnl,
            calculated_at: self.clock.now(),
        })?;

        debug!(
            "Valued portfolio for client {}: {} across {} allocations",
            client_id,
            total,
            breakdown.len()
        );

        Ok(ClientPortfolioValuation {
            client_id: client_id.to_string(),
            as_of: today,
            total_value: total,
            allocations: breakdown,
        })
    }

    fn client_total_value(&self, client_id: &str) -> Result<Decimal> {
        Ok(self.compute_client_portfolio(client_id)?.0)
    }

    fn resolve_holding_value(&self, asset_type: AssetType, asset_id: &str) -> Result<Decimal> {
        match asset_type {
            AssetType::Wallet => {
                let balances = self.holding_repo.get_wallet_balances(asset_id)?;
                Ok(wallet_holding_value(&balances))
            }
            AssetType::Account => {
                let balances = self.holding_repo.get_account_balances(asset_id)?;
                account_holding_value(&balances, self.fx.as_ref())
            }
        }
    }

    fn value_consolidated(&self) -> Result<ConsolidatedValuation> {
        let total_aum = self
            .valuation_repo
            .latest_metrics_per_client()?
            .into_iter()
            .map(|m| m.total_value)
            .sum();

        let mut total_holding_value = Decimal::ZERO;
        for holding in self.holding_repo.get_active_wallet_holdings()? {
            let balances = self.holding_repo.get_wallet_balances(&holding.id)?;
            total_holding_value += wallet_holding_value(&balances);
        }
        for holding in self.holding_repo.get_active_account_holdings()? {
            let balances = self.holding_repo.get_account_balances(&holding.id)?;
            match account_holding_value(&balances, self.fx.as_ref()) {
                Ok(value) => total_holding_value += value,
                Err(e) => {
                    // one unconvertible account should not blank the
                    // dashboard figure
                    warn!(
                        "Skipping account holding {} in consolidated total: {}",
                        holding.id, e
                    );
                }
            }
        }

        Ok(ConsolidatedValuation {
            total_aum,
            total_holding_value,
            calculated_at: self.clock.now(),
        })
    }
}
