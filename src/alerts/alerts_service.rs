use std::sync::Arc;

use chrono::Duration;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde_json::json;

use crate::alerts::alerts_model::{Alert, AlertDb, AlertSeverity, AlertStatus, AlertType};
use crate::alerts::alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
use crate::constants::{
    DISPLAY_DECIMAL_PRECISION, LOW_BALANCE_THRESHOLD_USD, SYNC_STALENESS_HOURS,
};
use crate::drift::DriftServiceTrait;
use crate::errors::Result;
use crate::fx::FxConverter;
use crate::holdings::{AssetType, HoldingRepositoryTrait};
use crate::utils::clock::Clock;
use crate::valuation::{account_holding_value, wallet_holding_value};

/// Deduplicates detector findings into live alerts. Alerts never resolve on
/// their own: when a condition clears, the sweep simply stops refreshing the
/// row, and an operator closes it out.
pub struct AlertService<R, H, D>
where
    R: AlertRepositoryTrait,
    H: HoldingRepositoryTrait,
    D: DriftServiceTrait,
{
    alert_repo: Arc<R>,
    holding_repo: Arc<H>,
    drift: Arc<D>,
    fx: Arc<dyn FxConverter>,
    clock: Arc<dyn Clock>,
}

impl<R, H, D> AlertService<R, H, D>
where
    R: AlertRepositoryTrait,
    H: HoldingRepositoryTrait,
    D: DriftServiceTrait,
{
    pub fn new(
        alert_repo: Arc<R>,
        holding_repo: Arc<H>,
        drift: Arc<D>,
        fx: Arc<dyn FxConverter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        AlertService {
            alert_repo,
            holding_repo,
            drift,
            fx,
            clock,
        }
    }

    fn raise_low_balance(
        &self,
        holding_id: &str,
        asset_type: AssetType,
        label: &str,
        value: Decimal,
    ) -> Result<Alert> {
        let rounded = value.round_dp(DISPLAY_DECIMAL_PRECISION);
        self.raise_or_refresh(
            AlertType::LowBalance,
            None,
            AlertSeverity::Medium,
            format!(
                "{} holds ${} in aggregate, below the ${} floor",
                label, rounded, LOW_BALANCE_THRESHOLD_USD
            ),
            json!({
                "holdingId": holding_id,
                "assetType": asset_type.as_str(),
                "valueUsd": rounded.to_string(),
                "thresholdUsd": LOW_BALANCE_THRESHOLD_USD.to_string(),
            }),
        )
    }

    fn raise_stale_sync(
        &self,
        holding_id: &str,
        asset_type: AssetType,
        label: &str,
        last_refreshed: chrono::DateTime<chrono::Utc>,
    ) -> Result<Alert> {
        let age_hours = self
            .clock
            .now()
            .signed_duration_since(last_refreshed)
            .num_hours();
        self.raise_or_refresh(
            AlertType::SyncFailure,
            None,
            AlertSeverity::High,
            format!(
                "{} has not refreshed balances for {} hours",
                label, age_hours
            ),
            json!({
                "holdingId": holding_id,
                "assetType": asset_type.as_str(),
                "lastRefreshedAt": last_refreshed.to_rfc3339(),
                "stalenessHours": age_hours,
            }),
        )
    }
}

impl<R, H, D> AlertServiceTrait for AlertService<R, H, D>
where
    R: AlertRepositoryTrait,
    H: HoldingRepositoryTrait,
    D: DriftServiceTrait,
{
    fn raise_or_refresh(
        &self,
        alert_type: AlertType,
        client_id: Option<&str>,
        severity: AlertSeverity,
        message: String,
        metadata: serde_json::Value,
    ) -> Result<Alert> {
        let now = self.clock.now();
        match self.alert_repo.find_open(alert_type, client_id)? {
            Some(existing) => {
                debug!(
                    "Refreshing {} alert {} instead of raising a duplicate",
                    alert_type.as_str(),
                    existing.id
                );
                self.alert_repo
                    .refresh_alert(&existing.id, severity, &message, &metadata, now)
            }
            None => {
                let row = AlertDb::new_active(alert_type, client_id, severity, message, &metadata, now);
                let created = self.alert_repo.insert_alert(row)?;
                info!(
                    "Raised {} alert {} (client: {})",
                    alert_type.as_str(),
                    created.id,
                    created.client_id.as_deref().unwrap_or("system")
                );
                Ok(created)
            }
        }
    }

    fn sweep_low_wallet_balances(&self) -> Result<Vec<Alert>> {
        let mut raised = Vec::new();
        for holding in self.holding_repo.get_active_wallet_holdings()? {
            let balances = match self.holding_repo.get_wallet_balances(&holding.id) {
                Ok(balances) => balances,
                Err(e) => {
                    warn!("Skipping wallet {} in low-balance sweep: {}", holding.id, e);
                    continue;
                }
            };
            let value = wallet_holding_value(&balances);
            if value >= LOW_BALANCE_THRESHOLD_USD {
                continue;
            }
            let label = format!("Wallet {}", holding.address);
            match self.raise_low_balance(&holding.id, AssetType::Wallet, &label, value) {
                Ok(alert) => raised.push(alert),
                Err(e) => warn!("Failed to raise low-balance alert for {}: {}", holding.id, e),
            }
        }
        Ok(raised)
    }

    fn sweep_low_account_balances(&self) -> Result<Vec<Alert>> {
        let mut raised = Vec::new();
        for holding in self.holding_repo.get_active_account_holdings()? {
            let balances = match self.holding_repo.get_account_balances(&holding.id) {
                Ok(balances) => balances,
                Err(e) => {
                    warn!(
                        "Skipping account {} in low-balance sweep: {}",
                        holding.id, e
                    );
                    continue;
                }
            };
            let value = match account_holding_value(&balances, self.fx.as_ref()) {
                Ok(value) => value,
                Err(e) => {
                    warn!(
                        "Skipping account {} in low-balance sweep: {}",
                        holding.id, e
                    );
                    continue;
                }
            };
            if value >= LOW_BALANCE_THRESHOLD_USD {
                continue;
            }
            let label = format!("Account at {}", holding.institution_name);
            match self.raise_low_balance(&holding.id, AssetType::Account, &label, value) {
                Ok(alert) => raised.push(alert),
                Err(e) => warn!("Failed to raise low-balance alert for {}: {}", holding.id, e),
            }
        }
        Ok(raised)
    }

    fn sweep_allocation_drift(&self, threshold: Decimal) -> Result<Vec<Alert>> {
        let findings = self.drift.detect_drift(threshold)?;
        let mut raised = Vec::new();
        for finding in findings {
            let drift = finding.drift_percentage.round_dp(DISPLAY_DECIMAL_PRECISION);
            let message = format!(
                "Allocation {} for client {} drifted {}% from its target",
                finding.allocation_id, finding.client_id, drift
            );
            let metadata = json!({
                "allocationId": finding.allocation_id,
                "assetType": finding.asset_type.as_str(),
                "assetId": finding.asset_id,
                "targetPercentage": finding.target_percentage.round_dp(DISPLAY_DECIMAL_PRECISION).to_string(),
                "currentPercentage": finding.current_percentage.round_dp(DISPLAY_DECIMAL_PRECISION).to_string(),
                "driftPercentage": drift.to_string(),
                "recommendedAction": finding.recommended_action,
            });
            match self.raise_or_refresh(
                AlertType::AllocationDrift,
                Some(&finding.client_id),
                finding.alert_severity,
                message,
                metadata,
            ) {
                Ok(alert) => raised.push(alert),
                Err(e) => warn!(
                    "Failed to raise drift alert for allocation {}: {}",
                    finding.allocation_id, e
                ),
            }
        }
        Ok(raised)
    }

    fn sweep_stale_syncs(&self) -> Result<Vec<Alert>> {
        let staleness_window = Duration::hours(SYNC_STALENESS_HOURS);
        let now = self.clock.now();
        let mut raised = Vec::new();

        for holding in self.holding_repo.get_active_wallet_holdings()? {
            let last_refreshed = match holding.last_synced_at {
                Some(at) => Some(at),
                None => match self
                    .holding_repo
                    .latest_balance_update(AssetType::Wallet, &holding.id)
                {
                    Ok(newest) => newest,
                    Err(e) => {
                        warn!("Skipping wallet {} in staleness sweep: {}", holding.id, e);
                        continue;
                    }
                },
            };
            let Some(last_refreshed) = last_refreshed else {
                debug!("Wallet {} has never synced; skipping staleness check", holding.id);
                continue;
            };
            if now.signed_duration_since(last_refreshed) <= staleness_window {
                continue;
            }
            let label = format!("Wallet {}", holding.address);
            match self.raise_stale_sync(&holding.id, AssetType::Wallet, &label, last_refreshed) {
                Ok(alert) => raised.push(alert),
                Err(e) => warn!("Failed to raise stale-sync alert for {}: {}", holding.id, e),
            }
        }

        for holding in self.holding_repo.get_active_account_holdings()? {
            let last_refreshed = match holding.last_synced_at {
                Some(at) => Some(at),
                None => match self
                    .holding_repo
                    .latest_balance_update(AssetType::Account, &holding.id)
                {
                    Ok(newest) => newest,
                    Err(e) => {
                        warn!("Skipping account {} in staleness sweep: {}", holding.id, e);
                        continue;
                    }
                },
            };
            let Some(last_refreshed) = last_refreshed else {
                debug!(
                    "Account {} has never synced; skipping staleness check",
                    holding.id
                );
                continue;
            };
            if now.signed_duration_since(last_refreshed) <= staleness_window {
                continue;
            }
            let label = format!("Account at {}", holding.institution_name);
            match self.raise_stale_sync(&holding.id, AssetType::Account, &label, last_refreshed) {
                Ok(alert) => raised.push(alert),
                Err(e) => warn!("Failed to raise stale-sync alert for {}: {}", holding.id, e),
            }
        }

        Ok(raised)
    }

    fn get_alerts(&self, status: Option<AlertStatus>) -> Result<Vec<Alert>> {
        self.alert_repo.get_alerts(status)
    }

    fn acknowledge_alert(&self, alert_id: &str, actor: &str) -> Result<Alert> {
        self.alert_repo
            .set_status(alert_id, AlertStatus::Acknowledged, actor, self.clock.now())
    }

    fn resolve_alert(&self, alert_id: &str, actor: &str) -> Result<Alert> {
        self.alert_repo
            .set_status(alert_id, AlertStatus::Resolved, actor, self.clock.now())
    }

    fn dismiss_alert(&self, alert_id: &str, actor: &str) -> Result<Alert> {
        self.alert_repo
            .set_status(alert_id, AlertStatus::Dismissed, actor, self.clock.now())
    }
}
