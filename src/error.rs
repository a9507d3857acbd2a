//! Error types for Stride

use thiserror::Error;

/// Fatal errors raised while computing or regenerating a plan.
///
/// Every variant aborts the enclosing operation with no partial result.
/// Non-fatal conditions are reported as [`crate::types::PlanWarning`] instead.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported race distance: {0}")]
    UnsupportedRace(String),

    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Plan corruption: {0}")]
    PlanCorruption(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanError {
    /// Stable machine-readable code, used by the CLI and FFI error payloads
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::Configuration(_) => "CONFIGURATION_ERROR",
            PlanError::UnsupportedRace(_) => "UNSUPPORTED_RACE",
            PlanError::Structural(_) => "STRUCTURAL_ERROR",
            PlanError::PlanCorruption(_) => "PLAN_CORRUPTION",
            PlanError::Json(_) => "JSON_ERROR",
        }
    }
}
