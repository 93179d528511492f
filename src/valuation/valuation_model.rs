use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::allocations::AllocationType;
use crate::constants::DECIMAL_PRECISION;
use crate::holdings::AssetType;
use crate::utils::time_utils::parse_timestamp;

/// One row per (client, calendar date): the client's attributed value that
/// day plus a running P&L figure against the previous metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetric {
    pub id: String,
    pub client_id: String,
    pub metric_date: NaiveDate,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub total_value: Decimal,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub pnl: Decimal,
    pub calculated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Queryable, QueryableByName, Insertable,
)]
#[serde(rename_all = "camelCase")]
#[diesel(table_name = crate::schema::performance_metrics)]
pub struct PerformanceMetricDb {
    pub id: String,
    pub client_id: String,
    pub metric_date: NaiveDate,
    pub total_value: String,
    pub pnl: String,
    pub calculated_at: String,
}

impl From<PerformanceMetric> for PerformanceMetricDb {
    fn from(value: PerformanceMetric) -> Self {
        PerformanceMetricDb {
            id: value.id,
            client_id: value.client_id,
            metric_date: value.metric_date,
            total_value: value.total_value.round_dp(DECIMAL_PRECISION).to_string(),
            pnl: value.pnl.round_dp(DECIMAL_PRECISION).to_string(),
            calculated_at: value.calculated_at.to_rfc3339(),
        }
    }
}

impl From<PerformanceMetricDb> for PerformanceMetric {
    fn from(value: PerformanceMetricDb) -> Self {
        PerformanceMetric {
            id: value.id,
            client_id: value.client_id,
            metric_date: value.metric_date,
            total_value: Decimal::from_str(&value.total_value).unwrap_or_default(),
            pnl: Decimal::from_str(&value.pnl).unwrap_or_default(),
            calculated_at: parse_timestamp(&value.calculated_at),
        }
    }
}

/// One allocation's contribution to a client portfolio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationValuation {
    pub allocation_id: String,
    pub client_id: String,
    pub asset_type: AssetType,
    pub asset_id: String,
    pub allocation_type: AllocationType,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub holding_value: Decimal,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub allocated_value: Decimal,
}

/// A client's attributed portfolio value with its per-asset breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientPortfolioValuation {
    pub client_id: String,
    pub as_of: NaiveDate,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub total_value: Decimal,
    pub allocations: Vec<AllocationValuation>,
}

/// System-wide dashboard figure: attributed AUM next to raw holding value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedValuation {
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub total_aum: Decimal,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub total_holding_value: Decimal,
    pub calculated_at: DateTime<Utc>,
}
