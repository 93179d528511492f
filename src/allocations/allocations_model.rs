use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::allocations::allocations_errors::AllocationError;
use crate::constants::DECIMAL_PRECISION;
use crate::holdings::AssetType;
use crate::utils::time_utils::parse_timestamp;

/// How an allocation's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationType {
    /// Share of the holding's current value, in percent of (0, 100]
    Percentage,
    /// Fixed USD amount attributed to the client
    FixedAmount,
}

impl AllocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationType::Percentage => "PERCENTAGE",
            AllocationType::FixedAmount => "FIXED_AMOUNT",
        }
    }
}

impl FromStr for AllocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERCENTAGE" => Ok(AllocationType::Percentage),
            "FIXED_AMOUNT" => Ok(AllocationType::FixedAmount),
            _ => Err(format!("Unknown allocation type: {}", s)),
        }
    }
}

/// Binds one client to one holding over a validity window. The record with
/// no end date is the current allocation for its (client, asset) pairing;
/// ended records are immutable history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: String,
    pub client_id: String,
    pub asset_type: AssetType,
    pub asset_id: String,
    pub allocation_type: AllocationType,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub allocation_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Allocation {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Input model for creating a new allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub client_id: String,
    pub asset_type: AssetType,
    pub asset_id: String,
    pub allocation_type: AllocationType,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub allocation_value: Decimal,
    pub start_date: NaiveDate,
    pub notes: Option<String>,
}

impl NewAllocation {
    /// Validates the allocation bounds before anything touches the store
    pub fn validate(&self) -> Result<(), AllocationError> {
        if self.client_id.trim().is_empty() {
            return Err(AllocationError::InvalidValue {
                field: "clientId".to_string(),
                message: "client id cannot be empty".to_string(),
            });
        }
        if self.asset_id.trim().is_empty() {
            return Err(AllocationError::InvalidValue {
                field: "assetId".to_string(),
                message: "asset id cannot be empty".to_string(),
            });
        }
        match self.allocation_type {
            AllocationType::Percentage => {
                if self.allocation_value <= Decimal::ZERO || self.allocation_value > dec!(100) {
                    return Err(AllocationError::InvalidValue {
                        field: "allocationValue".to_string(),
                        message: "percentage must be greater than 0 and at most 100".to_string(),
                    });
                }
            }
            AllocationType::FixedAmount => {
                if self.allocation_value <= Decimal::ZERO {
                    return Err(AllocationError::InvalidValue {
                        field: "allocationValue".to_string(),
                        message: "fixed amount must be greater than 0".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Database model for allocations
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
#[diesel(table_name = crate::schema::allocations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AllocationDb {
    pub id: String,
    pub client_id: String,
    pub asset_type: String,
    pub asset_id: String,
    pub allocation_type: String,
    pub allocation_value: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AllocationDb> for Allocation {
    fn from(db: AllocationDb) -> Self {
        Allocation {
            id: db.id,
            client_id: db.client_id,
            asset_type: AssetType::from_str(&db.asset_type).unwrap_or(AssetType::Wallet),
            asset_id: db.asset_id,
            allocation_type: AllocationType::from_str(&db.allocation_type)
                .unwrap_or(AllocationType::Percentage),
            allocation_value: Decimal::from_str(&db.allocation_value).unwrap_or_default(),
            start_date: db.start_date,
            end_date: db.end_date,
            notes: db.notes,
            created_at: parse_timestamp(&db.created_at),
            updated_at: parse_timestamp(&db.updated_at),
        }
    }
}

impl AllocationDb {
    pub fn from_new(new_allocation: NewAllocation, now: DateTime<Utc>) -> Self {
        AllocationDb {
            id: new_allocation
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            client_id: new_allocation.client_id,
            asset_type: new_allocation.asset_type.as_str().to_string(),
            asset_id: new_allocation.asset_id,
            allocation_type: new_allocation.allocation_type.as_str().to_string(),
            allocation_value: new_allocation
                .allocation_value
                .round_dp(DECIMAL_PRECISION)
                .to_string(),
            start_date: new_allocation.start_date,
            end_date: None,
            notes: new_allocation.notes,
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        }
    }
}
