//! Error types for dst-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DstError {
    /// The rule cannot be resolved for the requested year (bad month, a day
    /// that does not exist in that month, or a year outside chrono's range).
    #[error("Invalid transition rule: {0}")]
    InvalidRule(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A zone source could not produce its zones or adjustment rules.
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DstError>;
