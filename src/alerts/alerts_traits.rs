use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::alerts::alerts_model::{Alert, AlertDb, AlertSeverity, AlertStatus, AlertType};
use crate::errors::Result;

/// Trait for alert repository operations
pub trait AlertRepositoryTrait: Send + Sync {
    /// The live (non-Resolved) alert for an identity, if one exists
    fn find_open(&self, alert_type: AlertType, client_id: Option<&str>) -> Result<Option<Alert>>;

    /// Insert a fresh alert row
    fn insert_alert(&self, row: AlertDb) -> Result<Alert>;

    /// Overwrite severity, message and metadata on an existing alert and
    /// re-stamp its freshness timestamp.
    fn refresh_alert(
        &self,
        alert_id: &str,
        severity: AlertSeverity,
        message: &str,
        metadata: &serde_json::Value,
        refreshed_at: DateTime<Utc>,
    ) -> Result<Alert>;

    /// All alerts, optionally filtered by status
    fn get_alerts(&self, status: Option<AlertStatus>) -> Result<Vec<Alert>>;

    /// Operator-driven status transition (acknowledge/resolve/dismiss)
    fn set_status(
        &self,
        alert_id: &str,
        status: AlertStatus,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<Alert>;
}

/// Trait for alert lifecycle operations
pub trait AlertServiceTrait: Send + Sync {
    /// Create-or-update primitive behind every sweep: one live alert per
    /// (type, client) identity, refreshed in place on re-detection.
    fn raise_or_refresh(
        &self,
        alert_type: AlertType,
        client_id: Option<&str>,
        severity: AlertSeverity,
        message: String,
        metadata: serde_json::Value,
    ) -> Result<Alert>;

    /// Wallets whose aggregated USD value sits below the balance floor
    fn sweep_low_wallet_balances(&self) -> Result<Vec<Alert>>;

    /// Account holdings whose aggregated USD value sits below the floor
    fn sweep_low_account_balances(&self) -> Result<Vec<Alert>>;

    /// Active allocations drifted past `threshold` percentage points
    fn sweep_allocation_drift(&self, threshold: Decimal) -> Result<Vec<Alert>>;

    /// Holdings whose newest balance refresh is older than the staleness
    /// window
    fn sweep_stale_syncs(&self) -> Result<Vec<Alert>>;

    fn get_alerts(&self, status: Option<AlertStatus>) -> Result<Vec<Alert>>;

    fn acknowledge_alert(&self, alert_id: &str, actor: &str) -> Result<Alert>;

    fn resolve_alert(&self, alert_id: &str, actor: &str) -> Result<Alert>;

    fn dismiss_alert(&self, alert_id: &str, actor: &str) -> Result<Alert>;
}
