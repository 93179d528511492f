use thiserror::Error;

use crate::errors::{Error as CoreError, ValidationError};

/// Custom error type for allocation ledger operations
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("An active allocation already exists for client {client_id} and asset {asset_id}")]
    Conflict { client_id: String, asset_id: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<AllocationError> for CoreError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::Conflict {
                client_id,
                asset_id,
            } => CoreError::Conflict(format!(
                "An active allocation already exists for client {} and asset {}",
                client_id, asset_id
            )),
            AllocationError::NotFound(msg) => CoreError::NotFound(msg),
            AllocationError::InvalidValue { field, message } => {
                CoreError::Validation(ValidationError::OutOfRange { field, message })
            }
        }
    }
}

/// Result type for allocation operations
pub type Result<T> = std::result::Result<T, AllocationError>;
