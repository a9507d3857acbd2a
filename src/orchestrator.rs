//! Plan math orchestration
//!
//! Validates a plan request, resolves the race distance and hands off to the
//! matching race calculator. Safety-relevant inputs are never defaulted.

use crate::error::PlanError;
use crate::periodization::MAX_PLAN_WEEKS;
use crate::races::RaceCalculator;
use crate::types::{ExperienceLevel, PlanInputs, PlanSkeleton, PlanWarning, RaceDistance, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Unvalidated plan request as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default, alias = "currentWeeklyMileage")]
    pub current_weekly_mileage: Option<f64>,
    #[serde(default, alias = "currentLongRun")]
    pub current_long_run: Option<f64>,
    #[serde(default, alias = "totalWeeks")]
    pub total_weeks: Option<u32>,
    #[serde(default, alias = "raceDistance")]
    pub race_distance: Option<String>,
    #[serde(default, alias = "experienceLevel")]
    pub experience_level: Option<String>,
}

impl PlanRequest {
    /// Request built from the runner fields of a profile
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            current_weekly_mileage: profile.current_weekly_mileage,
            current_long_run: profile.current_long_run,
            total_weeks: profile.total_weeks,
            race_distance: profile.race_distance.clone(),
            experience_level: profile.experience_level.clone(),
        }
    }
}

/// Resolve a race distance alias to its canonical distance.
pub fn normalize_race_distance(value: &str) -> Result<RaceDistance, PlanError> {
    let key: String = value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect();

    match key.as_str() {
        "5k" | "5km" | "5000m" => Ok(RaceDistance::FiveK),
        "10k" | "10km" | "10000m" => Ok(RaceDistance::TenK),
        "half" | "halfmarathon" | "hm" | "13.1" | "21k" | "21.1k" => Ok(RaceDistance::HalfMarathon),
        "marathon" | "full" | "fullmarathon" | "26.2" | "42k" | "42.2k" => Ok(RaceDistance::Marathon),
        _ => Err(PlanError::UnsupportedRace(value.to_string())),
    }
}

/// Validate a request into calculator inputs.
///
/// Every missing mandatory field is named in a single error.
pub fn validate_request(request: &PlanRequest) -> Result<(PlanInputs, Vec<PlanWarning>), PlanError> {
    let mut missing = Vec::new();
    if request.current_weekly_mileage.is_none() {
        missing.push("current_weekly_mileage");
    }
    if request.current_long_run.is_none() {
        missing.push("current_long_run");
    }
    if request.total_weeks.is_none() {
        missing.push("total_weeks");
    }
    if request
        .race_distance
        .as_deref()
        .map_or(true, |r| r.trim().is_empty())
    {
        missing.push("race_distance");
    }

    let (Some(current_weekly_mileage), Some(mut current_long_run), Some(total_weeks), Some(race)) = (
        request.current_weekly_mileage,
        request.current_long_run,
        request.total_weeks,
        request.race_distance.as_deref().filter(|r| !r.trim().is_empty()),
    ) else {
        return Err(PlanError::Configuration(format!(
            "missing required plan inputs: {}",
            missing.join(", ")
        )));
    };

    for (name, value) in [
        ("current_weekly_mileage", current_weekly_mileage),
        ("current_long_run", current_long_run),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PlanError::Configuration(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }
    if total_weeks == 0 {
        return Err(PlanError::Configuration(
            "total_weeks must be at least 1".to_string(),
        ));
    }
    if total_weeks > MAX_PLAN_WEEKS {
        return Err(PlanError::Configuration(format!(
            "total_weeks must be at most {MAX_PLAN_WEEKS}, got {total_weeks}"
        )));
    }

    let race_distance = normalize_race_distance(race)?;
    let mut warnings = Vec::new();

    let experience_level = match request.experience_level.as_deref() {
        None => ExperienceLevel::default(),
        Some(raw) => ExperienceLevel::parse(raw).unwrap_or_else(|| {
            let warning = PlanWarning::UnknownExperienceLevel {
                value: raw.to_string(),
            };
            warn!("{warning}");
            warnings.push(warning);
            ExperienceLevel::default()
        }),
    };

    if current_long_run > current_weekly_mileage {
        let warning = PlanWarning::LongRunExceedsMileage {
            long_run: current_long_run,
            weekly_mileage: current_weekly_mileage,
        };
        warn!("{warning}");
        warnings.push(warning);
        current_long_run = current_weekly_mileage;
    }

    Ok((
        PlanInputs {
            current_weekly_mileage,
            current_long_run,
            total_weeks,
            race_distance,
            experience_level,
        },
        warnings,
    ))
}

/// Validate, route and compute the plan skeleton.
pub fn generate_plan_skeleton(request: &PlanRequest) -> Result<PlanSkeleton, PlanError> {
    let (inputs, request_warnings) = validate_request(request)?;
    let calculator = RaceCalculator::new(inputs.race_distance);
    let mut skeleton = calculator.generate_plan(&inputs)?;

    if !request_warnings.is_empty() {
        let mut warnings = request_warnings;
        warnings.append(&mut skeleton.warnings);
        skeleton.warnings = warnings;
    }
    Ok(skeleton)
}
