//! Race calculators
//!
//! One calculation path parametrized by a static [`RaceParameters`] table.
//! Race distances differ only by their table row.

use crate::error::PlanError;
use crate::periodization::{
    apply_experience_adjustments, calculate_phase_distribution, calculate_weekly_growth_rate,
    calculate_weekly_long_run, calculate_weekly_mileage, get_phase_for_week, is_cutback_week,
};
use crate::types::{
    DistanceBounds, PlanInputs, PlanSkeleton, PlanTargets, PlanWarning, QualityWorkout,
    RaceDistance, RaceParameters, WeekMathEntry, WorkoutBounds, WorkoutPercentages,
};
use tracing::{debug, warn};

/// Long-run growth is held between these rates (miles per week)
pub const MIN_LONG_RUN_GROWTH: f64 = 0.5;
pub const MAX_LONG_RUN_GROWTH: f64 = 0.75;

const fn bounds(min: f64, max: f64) -> DistanceBounds {
    DistanceBounds { min, max }
}

pub const FIVE_K: RaceParameters = RaceParameters {
    peak_weekly_mileage_cap: 40.0,
    long_run_max: 10.0,
    long_run_floor: 5.0,
    long_run_percentage: 0.30,
    minimum_long_run_target: 6.0,
    workout_percentages: WorkoutPercentages {
        tempo: 0.15,
        interval: 0.12,
        hill: 0.10,
    },
    workout_bounds: WorkoutBounds {
        tempo: bounds(2.0, 6.0),
        interval: bounds(2.0, 5.0),
        hill: bounds(2.0, 4.0),
    },
};

pub const TEN_K: RaceParameters = RaceParameters {
    peak_weekly_mileage_cap: 50.0,
    long_run_max: 13.0,
    long_run_floor: 6.0,
    long_run_percentage: 0.30,
    minimum_long_run_target: 8.0,
    workout_percentages: WorkoutPercentages {
        tempo: 0.13,
        interval: 0.10,
        hill: 0.09,
    },
    workout_bounds: WorkoutBounds {
        tempo: bounds(3.0, 7.0),
        interval: bounds(2.0, 6.0),
        hill: bounds(2.0, 5.0),
    },
};

pub const HALF_MARATHON: RaceParameters = RaceParameters {
    peak_weekly_mileage_cap: 55.0,
    long_run_max: 15.0,
    long_run_floor: 8.0,
    long_run_percentage: 0.32,
    minimum_long_run_target: 12.0,
    workout_percentages: WorkoutPercentages {
        tempo: 0.12,
        interval: 0.09,
        hill: 0.08,
    },
    workout_bounds: WorkoutBounds {
        tempo: bounds(3.0, 8.0),
        interval: bounds(3.0, 6.0),
        hill: bounds(2.0, 5.0),
    },
};

pub const MARATHON: RaceParameters = RaceParameters {
    peak_weekly_mileage_cap: 70.0,
    long_run_max: 22.0,
    long_run_floor: 12.0,
    long_run_percentage: 0.35,
    minimum_long_run_target: 18.0,
    workout_percentages: WorkoutPercentages {
        tempo: 0.10,
        interval: 0.08,
        hill: 0.07,
    },
    workout_bounds: WorkoutBounds {
        tempo: bounds(4.0, 10.0),
        interval: bounds(3.0, 7.0),
        hill: bounds(3.0, 6.0),
    },
};

/// Parameter table row for a race distance
pub fn race_parameters(distance: RaceDistance) -> &'static RaceParameters {
    match distance {
        RaceDistance::FiveK => &FIVE_K,
        RaceDistance::TenK => &TEN_K,
        RaceDistance::HalfMarathon => &HALF_MARATHON,
        RaceDistance::Marathon => &MARATHON,
    }
}

/// Long-run ceiling plus the warning raised when it misses the race target
#[derive(Debug, Clone, PartialEq)]
pub struct LongRunTarget {
    pub long_run_max: f64,
    pub warning: Option<PlanWarning>,
}

/// Calculator bound to one race distance
#[derive(Debug, Clone, Copy)]
pub struct RaceCalculator {
    distance: RaceDistance,
    params: &'static RaceParameters,
}

impl RaceCalculator {
    pub fn new(distance: RaceDistance) -> Self {
        Self {
            distance,
            params: race_parameters(distance),
        }
    }

    pub fn distance(&self) -> RaceDistance {
        self.distance
    }

    pub fn params(&self) -> &'static RaceParameters {
        self.params
    }

    /// Peak weekly mileage reachable from `current` over the plan, capped per race
    pub fn calculate_peak_mileage(&self, current: f64, total_weeks: u32) -> Result<f64, PlanError> {
        let phases = calculate_phase_distribution(total_weeks)?;
        let growth_rate = calculate_weekly_growth_rate(total_weeks);
        let build_cycles = phases.build_weeks() / 3;
        let effective_growth_weeks = (build_cycles * 2) as i32;

        let grown = (current.max(0.0) * (1.0 + growth_rate).powi(effective_growth_weeks)).round();
        Ok(grown.min(self.params.peak_weekly_mileage_cap))
    }

    /// Long-run ceiling reachable from `current` at 0.5 to 0.75 mi/week growth
    pub fn calculate_long_run_max(
        &self,
        current: f64,
        total_weeks: u32,
        peak_mileage: f64,
    ) -> Result<LongRunTarget, PlanError> {
        let phases = calculate_phase_distribution(total_weeks)?;
        let build_weeks = phases.build_weeks().max(1) as f64;
        let current = current.max(0.0);

        let gap = (self.params.minimum_long_run_target - current).max(0.0);
        let required_rate = gap / build_weeks;
        let rate = required_rate
            .max(MIN_LONG_RUN_GROWTH)
            .min(MAX_LONG_RUN_GROWTH);
        let theoretical_max = current + build_weeks * rate;

        let long_run_max = theoretical_max
            .round()
            .min(self.params.long_run_max)
            .min((peak_mileage * self.params.long_run_percentage).round());

        let warning = if long_run_max < self.params.minimum_long_run_target {
            let warning = PlanWarning::LongRunBelowTarget {
                race_distance: self.distance,
                achievable: long_run_max,
                target: self.params.minimum_long_run_target,
            };
            warn!(race = self.distance.as_str(), total_weeks, "{warning}");
            Some(warning)
        } else {
            None
        };

        Ok(LongRunTarget {
            long_run_max,
            warning,
        })
    }

    /// Quality workout distance for a week, clamped to the race bounds
    pub fn calculate_workout_distance(&self, weekly_mileage: f64, workout: QualityWorkout) -> f64 {
        let bounds = self.params.workout_bounds.get(workout);
        let distance = weekly_mileage.max(0.0) * self.params.workout_percentages.get(workout);
        distance.clamp(bounds.min, bounds.max).round()
    }

    /// Build the full numeric skeleton for validated inputs
    pub fn generate_plan(&self, inputs: &PlanInputs) -> Result<PlanSkeleton, PlanError> {
        let total_weeks = inputs.total_weeks;
        let phases = calculate_phase_distribution(total_weeks)?;
        let mut warnings = Vec::new();

        let base_peak = self.calculate_peak_mileage(inputs.current_weekly_mileage, total_weeks)?;
        let long_run_target =
            self.calculate_long_run_max(inputs.current_long_run, total_weeks, base_peak)?;
        warnings.extend(long_run_target.warning);

        let adjusted = apply_experience_adjustments(
            base_peak,
            long_run_target.long_run_max,
            inputs.experience_level,
            self.params.long_run_floor,
        );
        warnings.extend(adjusted.warnings.iter().cloned());

        let peak_mileage = adjusted.peak_weekly_mileage.max(inputs.current_weekly_mileage.min(base_peak));
        let long_run_cap = adjusted.long_run_max;

        let mut weeks = Vec::with_capacity(total_weeks as usize);
        for week in 1..=total_weeks {
            let weekly_mileage = calculate_weekly_mileage(
                week,
                inputs.current_weekly_mileage,
                peak_mileage,
                total_weeks,
            )?;
            let long_run =
                calculate_weekly_long_run(week, inputs.current_long_run, long_run_cap, total_weeks)?
                    .min(weekly_mileage);

            weeks.push(WeekMathEntry {
                week_number: week,
                phase: get_phase_for_week(week, &phases),
                weekly_mileage,
                long_run,
                tempo_distance: self.calculate_workout_distance(weekly_mileage, QualityWorkout::Tempo),
                interval_distance: self
                    .calculate_workout_distance(weekly_mileage, QualityWorkout::Interval),
                hill_distance: self.calculate_workout_distance(weekly_mileage, QualityWorkout::Hill),
                is_cutback: is_cutback_week(week, &phases),
            });
        }

        debug!(
            race = self.distance.as_str(),
            total_weeks,
            peak_mileage,
            long_run_cap,
            "Generated plan skeleton"
        );

        Ok(PlanSkeleton {
            race_distance: self.distance,
            inputs: inputs.clone(),
            experience_level: inputs.experience_level,
            targets: PlanTargets {
                peak_weekly_mileage: peak_mileage,
                long_run_max: long_run_cap,
                base_peak_weekly_mileage: base_peak,
                base_long_run_max: long_run_target.long_run_max,
            },
            phases,
            weeks,
            race_params: *self.params,
            warnings,
        })
    }
}
