//! Pipeline API
//!
//! This module provides the public entry points for Stride. The `*_json`
//! functions take and return JSON strings for hosts that do not link Rust
//! types directly; [`PlanEngine`] holds configuration and collaborators across
//! calls.

use crate::config::PlannerConfig;
use crate::cross_training::{CrossTrainingCatalog, CrossTrainingLibrary};
use crate::error::PlanError;
use crate::injury::{self, InjuryRequest, RecoveryContext};
use crate::orchestrator::{generate_plan_skeleton, PlanRequest};
use crate::regeneration::{self, DayAssigner};
use crate::types::{PlanSkeleton, RealizedWeek, TrainingPlan, UserProfile, ValidationReport};
use crate::validation::validate_training_plan;

/// Compute a plan skeleton from a JSON plan request.
///
/// # Example
/// ```ignore
/// let skeleton_json = generate_plan_json(
///     r#"{"current_weekly_mileage": 25, "current_long_run": 8,
///         "total_weeks": 12, "race_distance": "half"}"#,
/// )?;
/// ```
pub fn generate_plan_json(request_json: &str) -> Result<String, PlanError> {
    let request: PlanRequest = serde_json::from_str(request_json)?;
    let skeleton = PlanEngine::new().generate_skeleton(&request)?;
    Ok(serde_json::to_string(&skeleton)?)
}

/// Activate injury recovery on a JSON plan using the built-in libraries.
pub fn apply_injury_recovery_json(plan_json: &str, request_json: &str) -> Result<String, PlanError> {
    let plan: TrainingPlan = serde_json::from_str(plan_json)?;
    let request: InjuryRequest = serde_json::from_str(request_json)?;
    let updated = PlanEngine::new().apply_injury_recovery(plan, &request)?;
    Ok(serde_json::to_string(&updated)?)
}

/// Restore the pre-injury version of a JSON plan.
pub fn cancel_injury_recovery_json(plan_json: &str) -> Result<String, PlanError> {
    let plan: TrainingPlan = serde_json::from_str(plan_json)?;
    let restored = injury::cancel_injury_recovery(plan)?;
    Ok(serde_json::to_string(&restored)?)
}

/// Validate a JSON plan against a JSON profile.
///
/// Only malformed input fails; plan problems are reported in the returned
/// report.
pub fn validate_plan_json(plan_json: &str, profile_json: &str) -> Result<String, PlanError> {
    let plan: TrainingPlan = serde_json::from_str(plan_json)?;
    let profile: UserProfile = serde_json::from_str(profile_json)?;
    let report = validate_training_plan(&plan, &profile);
    Ok(serde_json::to_string(&report)?)
}

/// Stateful planner holding configuration and collaborators.
pub struct PlanEngine {
    config: PlannerConfig,
    catalog: CrossTrainingCatalog,
    assigner: Option<Box<dyn DayAssigner>>,
}

impl Default for PlanEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanEngine {
    /// Engine with default configuration and the built-in libraries
    pub fn new() -> Self {
        Self {
            config: PlannerConfig::default(),
            catalog: CrossTrainingCatalog::builtin(),
            assigner: None,
        }
    }

    /// Engine with a specific configuration
    pub fn with_config(config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Engine configured from `STRIDE_*` environment variables
    pub fn from_env() -> Result<Self, PlanError> {
        Self::with_config(PlannerConfig::from_env())
    }

    /// Attach the collaborator that places skeleton weeks on calendar days
    pub fn with_assigner(mut self, assigner: Box<dyn DayAssigner>) -> Self {
        self.assigner = Some(assigner);
        self
    }

    /// Add or replace the content library for one equipment type
    pub fn register_library(&mut self, library: Box<dyn CrossTrainingLibrary>) {
        self.catalog.register(library);
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CrossTrainingCatalog {
        &self.catalog
    }

    /// Compute a skeleton, filling an absent experience level from config
    pub fn generate_skeleton(&self, request: &PlanRequest) -> Result<PlanSkeleton, PlanError> {
        if request.experience_level.is_some() {
            return generate_plan_skeleton(request);
        }
        let request = PlanRequest {
            experience_level: Some(self.config.default_experience_level.as_str().to_string()),
            ..request.clone()
        };
        generate_plan_skeleton(&request)
    }

    pub fn apply_injury_recovery(
        &self,
        plan: TrainingPlan,
        request: &InjuryRequest,
    ) -> Result<TrainingPlan, PlanError> {
        let ctx = RecoveryContext {
            config: &self.config,
            catalog: &self.catalog,
            assigner: self.assigner.as_deref(),
        };
        injury::apply_injury_recovery(plan, request, &ctx)
    }

    pub fn cancel_injury_recovery(&self, plan: TrainingPlan) -> Result<TrainingPlan, PlanError> {
        injury::cancel_injury_recovery(plan)
    }

    pub fn regenerate_future_weeks(
        &self,
        plan: TrainingPlan,
        new_weeks: Vec<RealizedWeek>,
        current_week: u32,
    ) -> Result<TrainingPlan, PlanError> {
        regeneration::regenerate_future_weeks(plan, new_weeks, current_week)
    }

    /// Re-plan the remaining weeks; needs a day assigner
    pub fn replan(
        &self,
        plan: TrainingPlan,
        request: &PlanRequest,
        profile: &UserProfile,
        current_week: u32,
    ) -> Result<TrainingPlan, PlanError> {
        let assigner = self.assigner.as_deref().ok_or_else(|| {
            PlanError::Configuration("re-planning needs a day assigner".to_string())
        })?;
        regeneration::replan_from_request(plan, request, profile, assigner, current_week)
    }

    pub fn validate(&self, plan: &TrainingPlan, profile: &UserProfile) -> ValidationReport {
        validate_training_plan(plan, profile)
    }
}
