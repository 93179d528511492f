pub mod db;

pub mod alerts;
pub mod allocations;
pub mod clients;
pub mod drift;
pub mod fx;
pub mod holdings;
pub mod jobs;
pub mod notifications;
pub mod valuation;

pub mod constants;
pub mod errors;
pub mod schema;
pub mod utils;

pub use errors::{Error, Result};
