//! Base periodization math
//!
//! Race-agnostic primitives shared by every race calculator:
//! - Phase distribution (base / build / peak / taper)
//! - Growth rate scaled to plan length
//! - Week-by-week interpolation with cutback weeks and taper
//! - Experience-level target adjustment

use crate::error::PlanError;
use crate::types::{ExperienceLevel, Phase, PhaseDistribution, PlanWarning};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Share of the plan spent in each phase
pub const BASE_RATIO: f64 = 0.30;
pub const BUILD_RATIO: f64 = 0.40;
pub const PEAK_RATIO: f64 = 0.20;
pub const TAPER_RATIO: f64 = 0.10;

/// Plan length at which the reference growth rate applies
pub const REFERENCE_PLAN_WEEKS: f64 = 12.0;
pub const REFERENCE_GROWTH_RATE: f64 = 0.08;
pub const MIN_GROWTH_RATE: f64 = 0.03;
pub const MAX_GROWTH_RATE: f64 = 0.10;

/// Longest plan accepted, in weeks
pub const MAX_PLAN_WEEKS: u32 = 104;

/// Every Nth week of build/peak is a cutback week
pub const CUTBACK_INTERVAL: u32 = 4;
/// Volume multiplier applied on cutback weeks
pub const CUTBACK_FACTOR: f64 = 0.8;
/// Fraction of peak volume removed by the final taper week
pub const TAPER_MAX_REDUCTION: f64 = 0.5;

/// Round to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Split a plan into phases.
///
/// Counts always sum to `total_weeks` and the taper is at least one week.
pub fn calculate_phase_distribution(total_weeks: u32) -> Result<PhaseDistribution, PlanError> {
    if total_weeks < 1 {
        return Err(PlanError::Configuration(format!(
            "total_weeks must be at least 1, got {total_weeks}"
        )));
    }
    if total_weeks > MAX_PLAN_WEEKS {
        return Err(PlanError::Configuration(format!(
            "total_weeks must be at most {MAX_PLAN_WEEKS}, got {total_weeks}"
        )));
    }

    let total = total_weeks as f64;
    let taper = ((total * TAPER_RATIO).round() as u32).clamp(1, total_weeks);
    let remaining = total_weeks - taper;
    let peak = ((total * PEAK_RATIO).round() as u32).min(remaining);
    let build = ((total * BUILD_RATIO).round() as u32).min(remaining - peak);
    let base = remaining - peak - build;

    Ok(PhaseDistribution {
        base,
        build,
        peak,
        taper,
    })
}

/// Per-cycle growth rate, inversely proportional to plan length.
pub fn calculate_weekly_growth_rate(total_weeks: u32) -> f64 {
    if total_weeks == 0 {
        return MAX_GROWTH_RATE;
    }
    (REFERENCE_GROWTH_RATE * REFERENCE_PLAN_WEEKS / total_weeks as f64)
        .clamp(MIN_GROWTH_RATE, MAX_GROWTH_RATE)
}

/// Phase containing the given 1-based week. Weeks past the end count as taper.
pub fn get_phase_for_week(week: u32, phases: &PhaseDistribution) -> Phase {
    if week <= phases.base {
        Phase::Base
    } else if week <= phases.base + phases.build {
        Phase::Build
    } else if week <= phases.build_weeks() {
        Phase::Peak
    } else {
        Phase::Taper
    }
}

/// Whether the week is a reduced-volume recovery week.
pub fn is_cutback_week(week: u32, phases: &PhaseDistribution) -> bool {
    if week <= 1 {
        return false;
    }
    match get_phase_for_week(week, phases) {
        Phase::Build | Phase::Peak => (week - phases.base) % CUTBACK_INTERVAL == 0,
        Phase::Base | Phase::Taper => false,
    }
}

/// Weekly mileage for `week`, ramping from `current` toward `peak`.
pub fn calculate_weekly_mileage(
    week: u32,
    current: f64,
    peak: f64,
    total_weeks: u32,
) -> Result<f64, PlanError> {
    progression_value(week, current, peak, total_weeks)
}

/// Long run for `week`, ramping from `current` toward `cap`.
pub fn calculate_weekly_long_run(
    week: u32,
    current: f64,
    cap: f64,
    total_weeks: u32,
) -> Result<f64, PlanError> {
    progression_value(week, current, cap, total_weeks)
}

/// Shared interpolation curve.
///
/// Linear ramp across base + build, hold through peak, cutbacks inside
/// build/peak, linear taper to `1 - TAPER_MAX_REDUCTION` of the target.
/// A current value above the cap is clamped to the cap.
fn progression_value(week: u32, current: f64, cap: f64, total_weeks: u32) -> Result<f64, PlanError> {
    let phases = calculate_phase_distribution(total_weeks)?;
    let start = current.max(0.0).min(cap.max(0.0));
    let target = cap.max(start);

    if week <= 1 {
        return Ok(start);
    }

    let value = match get_phase_for_week(week, &phases) {
        Phase::Base | Phase::Build => {
            let ramp_weeks = (phases.base + phases.build).max(1);
            let progress = (week - 1) as f64 / ramp_weeks as f64;
            start + (target - start) * progress.min(1.0)
        }
        Phase::Peak => target,
        Phase::Taper => {
            let taper_week = (week - phases.build_weeks()).min(phases.taper);
            let fraction = taper_week as f64 / phases.taper as f64;
            target * (1.0 - TAPER_MAX_REDUCTION * fraction)
        }
    };

    let value = if is_cutback_week(week, &phases) {
        value * CUTBACK_FACTOR
    } else {
        value
    };

    Ok(round_to_tenth(value.min(target)))
}

/// Targets after applying an experience level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceAdjustment {
    pub peak_weekly_mileage: f64,
    pub long_run_max: f64,
    pub warnings: Vec<PlanWarning>,
}

fn experience_multipliers(level: ExperienceLevel) -> (f64, f64) {
    // (peak mileage, long run)
    match level {
        ExperienceLevel::Beginner => (0.85, 0.90),
        ExperienceLevel::Intermediate => (1.0, 1.0),
        ExperienceLevel::Advanced => (1.10, 1.05),
        ExperienceLevel::Elite => (1.20, 1.10),
    }
}

/// Scale peak targets by experience level.
///
/// The long run is held at `long_run_floor` when the unadjusted ceiling
/// reaches it. When it cannot, a [`PlanWarning::LongRunBelowFloor`] is
/// returned and the best achievable value is kept.
pub fn apply_experience_adjustments(
    peak_mileage: f64,
    long_run_max: f64,
    experience_level: ExperienceLevel,
    long_run_floor: f64,
) -> ExperienceAdjustment {
    let (mileage_factor, long_run_factor) = experience_multipliers(experience_level);

    let peak_weekly_mileage = (peak_mileage * mileage_factor).round();
    let scaled_long_run = (long_run_max * long_run_factor).round();
    let reachable_floor = long_run_floor.min(long_run_max);
    let long_run = scaled_long_run.max(reachable_floor).min(peak_weekly_mileage);

    let mut warnings = Vec::new();
    if long_run < long_run_floor {
        let warning = PlanWarning::LongRunBelowFloor {
            achievable: long_run,
            floor: long_run_floor,
        };
        warn!(
            level = experience_level.as_str(),
            long_run,
            floor = long_run_floor,
            "{warning}"
        );
        warnings.push(warning);
    }

    ExperienceAdjustment {
        peak_weekly_mileage,
        long_run_max: long_run,
        warnings,
    }
}
