use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::time_utils::{parse_timestamp, parse_timestamp_opt};

/// Condition families the detection sweeps can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LowBalance,
    AllocationDrift,
    SyncFailure,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::LowBalance => "LOW_BALANCE",
            AlertType::AllocationDrift => "ALLOCATION_DRIFT",
            AlertType::SyncFailure => "SYNC_FAILURE",
        }
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW_BALANCE" => Ok(AlertType::LowBalance),
            "ALLOCATION_DRIFT" => Ok(AlertType::AllocationDrift),
            "SYNC_FAILURE" => Ok(AlertType::SyncFailure),
            _ => Err(format!("Unknown alert type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "LOW",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::High => "HIGH",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(AlertSeverity::Low),
            "MEDIUM" => Ok(AlertSeverity::Medium),
            "HIGH" => Ok(AlertSeverity::High),
            _ => Err(format!("Unknown alert severity: {}", s)),
        }
    }
}

/// Lifecycle state of an alert. Transitions away from Active are operator
/// actions; the sweeps only ever create or refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
    Dismissed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "ACTIVE",
            AlertStatus::Acknowledged => "ACKNOWLEDGED",
            AlertStatus::Resolved => "RESOLVED",
            AlertStatus::Dismissed => "DISMISSED",
        }
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(AlertStatus::Active),
            "ACKNOWLEDGED" => Ok(AlertStatus::Acknowledged),
            "RESOLVED" => Ok(AlertStatus::Resolved),
            "DISMISSED" => Ok(AlertStatus::Dismissed),
            _ => Err(format!("Unknown alert status: {}", s)),
        }
    }
}

/// A deduplicated detection. Identity is (alert_type, client_id-or-null);
/// repeated detections refresh the live row instead of appending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub alert_type: AlertType,
    pub client_id: Option<String>,
    pub severity: AlertSeverity,
    pub message: String,
    pub metadata: serde_json::Value,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Database model for alerts
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::alerts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlertDb {
    pub id: String,
    pub alert_type: String,
    pub client_id: Option<String>,
    pub severity: String,
    pub message: String,
    pub metadata: String,
    pub status: String,
    pub created_at: String,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<String>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<String>,
}

impl From<AlertDb> for Alert {
    fn from(db: AlertDb) -> Self {
        Alert {
            id: db.id,
            alert_type: AlertType::from_str(&db.alert_type).unwrap_or(AlertType::SyncFailure),
            client_id: db.client_id,
            severity: AlertSeverity::from_str(&db.severity).unwrap_or(AlertSeverity::Medium),
            message: db.message,
            metadata: serde_json::from_str(&db.metadata).unwrap_or_default(),
            status: AlertStatus::from_str(&db.status).unwrap_or(AlertStatus::Active),
            created_at: parse_timestamp(&db.created_at),
            acknowledged_by: db.acknowledged_by,
            acknowledged_at: parse_timestamp_opt(db.acknowledged_at.as_deref()),
            resolved_by: db.resolved_by,
            resolved_at: parse_timestamp_opt(db.resolved_at.as_deref()),
        }
    }
}

impl AlertDb {
    /// Fresh Active row for a condition with no live alert
    pub fn new_active(
        alert_type: AlertType,
        client_id: Option<&str>,
        severity: AlertSeverity,
        message: String,
        metadata: &serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        AlertDb {
            id: uuid::Uuid::new_v4().to_string(),
            alert_type: alert_type.as_str().to_string(),
            client_id: client_id.map(str::to_string),
            severity: severity.as_str().to_string(),
            message,
            metadata: metadata.to_string(),
            status: AlertStatus::Active.as_str().to_string(),
            created_at: created_at.to_rfc3339(),
            acknowledged_by: None,
            acknowledged_at: None,
            resolved_by: None,
            resolved_at: None,
        }
    }
}
