use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::alerts::AlertSeverity;
use crate::allocations::AllocationType;
use crate::holdings::AssetType;

/// Reporting classification for a drift finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftSeverity {
    Low,
    Medium,
    High,
}

impl DriftSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftSeverity::Low => "LOW",
            DriftSeverity::Medium => "MEDIUM",
            DriftSeverity::High => "HIGH",
        }
    }
}

/// One active allocation whose realized share has moved away from its target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriftFinding {
    pub allocation_id: String,
    pub client_id: String,
    pub asset_type: AssetType,
    pub asset_id: String,
    pub allocation_type: AllocationType,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub target_value: Decimal,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub current_value: Decimal,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub target_percentage: Decimal,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub current_percentage: Decimal,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub drift_percentage: Decimal,
    pub severity: DriftSeverity,
    pub alert_severity: AlertSeverity,
    pub recommended_action: Option<String>,
}
