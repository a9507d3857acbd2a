//! Planner configuration

use crate::error::PlanError;
use crate::types::ExperienceLevel;
use serde::{Deserialize, Serialize};
use std::env;

/// Easy pace used to turn a running distance into cross-training minutes
pub const DEFAULT_MINUTES_PER_MILE: f64 = 10.0;

/// Share of the original distance run during the return week
pub const DEFAULT_RETURN_WEEK_DISTANCE_FACTOR: f64 = 0.5;

/// Cross-training minutes when a slot has neither distance nor duration
pub const DEFAULT_FALLBACK_MINUTES: u32 = 30;

/// Tunables for regeneration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub minutes_per_mile: f64,
    pub return_week_distance_factor: f64,
    pub fallback_cross_training_minutes: u32,
    /// Level used when a request names none
    pub default_experience_level: ExperienceLevel,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            minutes_per_mile: DEFAULT_MINUTES_PER_MILE,
            return_week_distance_factor: DEFAULT_RETURN_WEEK_DISTANCE_FACTOR,
            fallback_cross_training_minutes: DEFAULT_FALLBACK_MINUTES,
            default_experience_level: ExperienceLevel::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from `STRIDE_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            minutes_per_mile: env::var("STRIDE_MINUTES_PER_MILE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MINUTES_PER_MILE),
            return_week_distance_factor: env::var("STRIDE_RETURN_WEEK_DISTANCE_FACTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETURN_WEEK_DISTANCE_FACTOR),
            fallback_cross_training_minutes: env::var("STRIDE_FALLBACK_CROSS_TRAINING_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FALLBACK_MINUTES),
            default_experience_level: env::var("STRIDE_DEFAULT_EXPERIENCE_LEVEL")
                .ok()
                .and_then(|s| ExperienceLevel::parse(&s))
                .unwrap_or_default(),
        }
    }

    /// Reject values that would produce unsafe or empty sessions
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.minutes_per_mile.is_finite() || self.minutes_per_mile <= 0.0 {
            return Err(PlanError::Configuration(format!(
                "minutes_per_mile must be positive, got {}",
                self.minutes_per_mile
            )));
        }
        if !(self.return_week_distance_factor > 0.0 && self.return_week_distance_factor <= 1.0) {
            return Err(PlanError::Configuration(format!(
                "return_week_distance_factor must be in (0, 1], got {}",
                self.return_week_distance_factor
            )));
        }
        if self.fallback_cross_training_minutes == 0 {
            return Err(PlanError::Configuration(
                "fallback_cross_training_minutes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
