pub mod clock;
pub mod decimal_serde;
pub mod time_utils;
