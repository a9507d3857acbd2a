//! Injury recovery regeneration
//!
//! Activating recovery swaps running for cross-training over an injury
//! window, mixes running back in during a return week and leaves every other
//! week alone. The untouched plan is kept as the pre-injury version so the
//! whole change can be undone.
//!
//! Weeks relative to the current week `C` and `N` weeks off running:
//! - **Completed** (`w < C`): never touched
//! - **Injury** (`C..=C+N-1`): cross-training only
//! - **Return** (`C+N`): alternating running and cross-training
//! - **Post-recovery** (`w > C+N`): carried over unchanged

use crate::config::PlannerConfig;
use crate::cross_training::{
    distribute_round_robin, parse_duration_minutes, CrossTrainingCatalog, CrossTrainingWorkout,
    IntensityBucket,
};
use crate::error::PlanError;
use crate::merge::preserve_and_merge_weeks;
use crate::periodization::{round_to_tenth, MAX_PLAN_WEEKS};
use crate::regeneration::DayAssigner;
use crate::types::{
    Equipment, InjuryRecoveryInfo, PlanSkeleton, PlanSnapshot, PlanVersion, RealizedWeek,
    TrainingPlan, UserProfile, WeekSpan, Workout, WorkoutType,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Note attached to running sessions in the return week
pub const RETURN_RUN_NOTE: &str =
    "Return to running: keep the effort easy and stop if pain returns.";

/// Largest allowed reduction in training days per week
pub const MAX_REDUCE_TRAINING_DAYS: u8 = 2;

/// Position of a week relative to the injury window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekState {
    Completed,
    InjuryWeek,
    ReturnWeek,
    PostRecovery,
}

impl WeekState {
    pub fn classify(week: u32, current_week: u32, weeks_off_running: u32) -> Self {
        let return_week = current_week.saturating_add(weeks_off_running);
        if week < current_week {
            WeekState::Completed
        } else if week < return_week {
            WeekState::InjuryWeek
        } else if week == return_week {
            WeekState::ReturnWeek
        } else {
            WeekState::PostRecovery
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekState::Completed => "completed",
            WeekState::InjuryWeek => "injury",
            WeekState::ReturnWeek => "return",
            WeekState::PostRecovery => "post_recovery",
        }
    }

    /// Week must be rebuilt from a full source week
    fn in_window(&self) -> bool {
        matches!(self, WeekState::InjuryWeek | WeekState::ReturnWeek)
    }
}

/// Week states for one activation, computed once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverySchedule {
    current_week: u32,
    weeks_off_running: u32,
    states: Vec<WeekState>,
}

impl RecoverySchedule {
    pub fn new(current_week: u32, weeks_off_running: u32, total_weeks: u32) -> Self {
        let states = (1..=total_weeks)
            .map(|week| WeekState::classify(week, current_week, weeks_off_running))
            .collect();
        Self {
            current_week,
            weeks_off_running,
            states,
        }
    }

    pub fn start_week(&self) -> u32 {
        self.current_week
    }

    pub fn end_week(&self) -> u32 {
        self.return_week().saturating_sub(1)
    }

    pub fn return_week(&self) -> u32 {
        self.current_week.saturating_add(self.weeks_off_running)
    }

    /// State of a 1-based week, `None` past the end of the plan
    pub fn state(&self, week: u32) -> Option<WeekState> {
        let index = week.checked_sub(1)? as usize;
        self.states.get(index).copied()
    }

    /// `(week, state)` pairs in plan order
    pub fn iter(&self) -> impl Iterator<Item = (u32, WeekState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (i as u32 + 1, *state))
    }

    fn info(&self, selected_equipment: Vec<Equipment>, reduce_training_days: u8) -> InjuryRecoveryInfo {
        InjuryRecoveryInfo {
            start_week: self.start_week(),
            end_week: self.end_week(),
            return_week: self.return_week(),
            selected_equipment,
            weeks_off_running: self.weeks_off_running,
            reduce_training_days,
            earlier_windows: Vec::new(),
        }
    }
}

/// Equipment flags as submitted by the runner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentSelection {
    #[serde(default)]
    pub pool: bool,
    #[serde(default)]
    pub elliptical: bool,
    #[serde(default, alias = "stationaryBike")]
    pub stationary_bike: bool,
    #[serde(default)]
    pub swimming: bool,
    #[serde(default)]
    pub rowing: bool,
    #[serde(default, alias = "standUpBike")]
    pub stand_up_bike: bool,
}

impl EquipmentSelection {
    pub fn is_selected(&self, equipment: Equipment) -> bool {
        match equipment {
            Equipment::Pool => self.pool,
            Equipment::Elliptical => self.elliptical,
            Equipment::StationaryBike => self.stationary_bike,
            Equipment::Swimming => self.swimming,
            Equipment::Rowing => self.rowing,
            Equipment::StandUpBike => self.stand_up_bike,
        }
    }

    /// Selected equipment in canonical order
    pub fn selected(&self) -> Vec<Equipment> {
        Equipment::ALL
            .into_iter()
            .filter(|e| self.is_selected(*e))
            .collect()
    }
}

impl FromIterator<Equipment> for EquipmentSelection {
    fn from_iter<I: IntoIterator<Item = Equipment>>(iter: I) -> Self {
        let mut selection = Self::default();
        for equipment in iter {
            match equipment {
                Equipment::Pool => selection.pool = true,
                Equipment::Elliptical => selection.elliptical = true,
                Equipment::StationaryBike => selection.stationary_bike = true,
                Equipment::Swimming => selection.swimming = true,
                Equipment::Rowing => selection.rowing = true,
                Equipment::StandUpBike => selection.stand_up_bike = true,
            }
        }
        selection
    }
}

/// Injury recovery activation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjuryRequest {
    #[serde(default, alias = "updatedProfile")]
    pub updated_profile: UserProfile,
    #[serde(alias = "currentWeek")]
    pub current_week: u32,
    #[serde(alias = "weeksOffRunning")]
    pub weeks_off_running: u32,
    #[serde(alias = "selectedEquipment")]
    pub selected_equipment: EquipmentSelection,
    #[serde(default, alias = "reduceTrainingDays")]
    pub reduce_training_days: u8,
}

impl InjuryRequest {
    /// Check bounds and return the selected equipment
    pub fn validate(&self) -> Result<Vec<Equipment>, PlanError> {
        if self.current_week == 0 {
            return Err(PlanError::Configuration(
                "current_week is 1-based and must be at least 1".to_string(),
            ));
        }
        if self.weeks_off_running == 0 {
            return Err(PlanError::Configuration(
                "weeks_off_running must be at least 1".to_string(),
            ));
        }
        if self.reduce_training_days > MAX_REDUCE_TRAINING_DAYS {
            return Err(PlanError::Configuration(format!(
                "reduce_training_days must be 0, 1 or 2, got {}",
                self.reduce_training_days
            )));
        }
        let equipment = self.selected_equipment.selected();
        if equipment.is_empty() {
            return Err(PlanError::Configuration(
                "select at least one cross-training equipment type".to_string(),
            ));
        }
        Ok(equipment)
    }
}

/// Collaborators and tunables for one regeneration
#[derive(Clone, Copy)]
pub struct RecoveryContext<'a> {
    pub config: &'a PlannerConfig,
    pub catalog: &'a CrossTrainingCatalog,
    /// Used to rebuild window weeks missing from both snapshot and plan
    pub assigner: Option<&'a dyn DayAssigner>,
}

/// Where a regenerated week may be read from
struct WeekSources<'a> {
    snapshot: &'a [RealizedWeek],
    working: &'a [RealizedWeek],
    previous_window: Option<&'a InjuryRecoveryInfo>,
    skeleton: Option<&'a PlanSkeleton>,
}

/// Completed weeks are kept by position, so each must sit at its own index
fn check_completed_prefix(working: &[RealizedWeek], current_week: u32) -> Result<(), PlanError> {
    let completed = current_week.saturating_sub(1) as usize;
    if working.len() < completed {
        return Err(PlanError::PlanCorruption(format!(
            "plan lists {} weeks but weeks 1 to {completed} are completed; regenerate the base plan first",
            working.len()
        )));
    }
    for (index, week) in working[..completed].iter().enumerate() {
        let expected = index as u32 + 1;
        if week.week != expected {
            return Err(PlanError::PlanCorruption(format!(
                "completed week {expected} is missing or out of order (found week {}); regenerate the base plan first",
                week.week
            )));
        }
    }
    Ok(())
}

/// Spans reshaped by the active recovery that stay in completed weeks
fn completed_windows(previous: Option<&InjuryRecoveryInfo>, current_week: u32) -> Vec<WeekSpan> {
    let Some(info) = previous else {
        return Vec::new();
    };
    info.earlier_windows
        .iter()
        .copied()
        .chain([info.window()])
        .filter_map(|span| span.before(current_week))
        .collect()
}

fn find_week(weeks: &[RealizedWeek], week: u32) -> Option<&RealizedWeek> {
    weeks.iter().find(|w| w.week == week)
}

impl WeekSources<'_> {
    fn resolve(
        &self,
        week: u32,
        state: WeekState,
        profile: &UserProfile,
        assigner: Option<&dyn DayAssigner>,
    ) -> Result<RealizedWeek, PlanError> {
        if state.in_window() {
            if let Some(found) = find_week(self.snapshot, week).or_else(|| find_week(self.working, week)) {
                return Ok(found.clone());
            }
            let entry = self
                .skeleton
                .and_then(|s| s.weeks.iter().find(|e| e.week_number == week));
            return match (entry, assigner) {
                (Some(entry), Some(assigner)) => {
                    let mut realized = assigner.assign_week(entry, profile)?;
                    realized.week = week;
                    Ok(realized)
                }
                _ => Err(PlanError::PlanCorruption(format!(
                    "week {week} is missing and cannot be rebuilt for injury recovery"
                ))),
            };
        }

        // Weeks reshaped by an earlier activation revert to their original form
        let reshaped_before = self.previous_window.is_some_and(|info| info.covers(week));
        let found = if reshaped_before {
            find_week(self.snapshot, week).or_else(|| find_week(self.working, week))
        } else {
            find_week(self.working, week).or_else(|| find_week(self.snapshot, week))
        };
        found.cloned().ok_or_else(|| {
            PlanError::PlanCorruption(format!(
                "week {week} is missing from the plan; regenerate the base plan first"
            ))
        })
    }
}

/// Activate injury recovery on `plan`.
///
/// Completed weeks are kept verbatim. Fails without touching the plan if
/// any week in the injury or return span cannot be realized.
pub fn apply_injury_recovery(
    mut plan: TrainingPlan,
    request: &InjuryRequest,
    ctx: &RecoveryContext<'_>,
) -> Result<TrainingPlan, PlanError> {
    ctx.config.validate()?;
    let equipment = request.validate()?;

    let working = plan
        .week_list()
        .ok_or_else(|| PlanError::Structural("plan has neither weeks nor training_weeks".to_string()))?;

    let snapshot = match plan.original_plan_before_injury() {
        Some(existing) if plan.injury_recovery_active => existing.clone(),
        _ => PlanSnapshot {
            from_training_weeks: plan.weeks.is_none(),
            ..PlanSnapshot::capture(plan.overview.clone(), working.to_vec())
        },
    };

    let total_weeks = [
        plan.overview.total_weeks,
        working.len() as u32,
        snapshot.weeks.len() as u32,
    ]
    .into_iter()
    .max()
    .unwrap_or(0);
    if request.current_week > total_weeks {
        return Err(PlanError::Configuration(format!(
            "current_week {} is past the end of a {total_weeks}-week plan",
            request.current_week
        )));
    }
    if total_weeks > MAX_PLAN_WEEKS {
        return Err(PlanError::Configuration(format!(
            "plan spans {total_weeks} weeks, more than the {MAX_PLAN_WEEKS}-week limit"
        )));
    }
    if request.weeks_off_running > total_weeks {
        return Err(PlanError::Configuration(format!(
            "weeks_off_running {} exceeds the {total_weeks}-week plan",
            request.weeks_off_running
        )));
    }
    check_completed_prefix(working, request.current_week)?;

    let schedule = RecoverySchedule::new(request.current_week, request.weeks_off_running, total_weeks);
    let previous_window = plan
        .injury_recovery_info
        .as_ref()
        .filter(|_| plan.injury_recovery_active);
    let earlier_windows = completed_windows(previous_window, request.current_week);
    let sources = WeekSources {
        snapshot: &snapshot.weeks,
        working,
        previous_window,
        skeleton: plan.skeleton.as_ref(),
    };

    let mut new_weeks = Vec::new();
    for (week, state) in schedule.iter().filter(|(_, s)| *s != WeekState::Completed) {
        debug!(week, state = state.as_str(), "classified week");
        let source = sources.resolve(week, state, &request.updated_profile, ctx.assigner)?;
        new_weeks.push(reshape_week(
            source,
            state,
            &equipment,
            request.reduce_training_days,
            ctx,
        ));
    }

    let merged = preserve_and_merge_weeks(&plan, new_weeks, request.current_week)?;

    info!(
        start_week = schedule.start_week(),
        return_week = schedule.return_week(),
        equipment = ?equipment,
        reduce_training_days = request.reduce_training_days,
        snapshot_id = %snapshot.snapshot_id,
        "injury recovery activated"
    );

    plan.weeks = Some(merged);
    plan.legacy_weeks = None;
    plan.injury_recovery_active = true;
    plan.injury_recovery_info = Some(InjuryRecoveryInfo {
        earlier_windows,
        ..schedule.info(equipment, request.reduce_training_days)
    });
    plan.versions.insert(PlanVersion::PreInjury, snapshot);
    Ok(plan)
}

/// Restore the pre-injury plan and clear recovery state.
///
/// Returns the plan unchanged when recovery is not active.
pub fn cancel_injury_recovery(mut plan: TrainingPlan) -> Result<TrainingPlan, PlanError> {
    if !plan.injury_recovery_active {
        return Ok(plan);
    }
    let snapshot = plan.versions.remove(PlanVersion::PreInjury).ok_or_else(|| {
        PlanError::PlanCorruption(
            "injury recovery is active but the pre-injury plan is missing".to_string(),
        )
    })?;

    info!(snapshot_id = %snapshot.snapshot_id, "injury recovery cancelled");

    plan.overview = snapshot.overview;
    if snapshot.from_training_weeks {
        plan.weeks = None;
        plan.legacy_weeks = Some(snapshot.weeks);
    } else {
        plan.weeks = Some(snapshot.weeks);
        plan.legacy_weeks = None;
    }
    plan.injury_recovery_active = false;
    plan.injury_recovery_info = None;
    Ok(plan)
}

/// Rebuild one injury or return week; other weeks pass through.
fn reshape_week(
    source: RealizedWeek,
    state: WeekState,
    equipment: &[Equipment],
    reduce_training_days: u8,
    ctx: &RecoveryContext<'_>,
) -> RealizedWeek {
    if !state.in_window() {
        return source;
    }

    let mut ranked: Vec<usize> = source
        .workouts
        .iter()
        .enumerate()
        .filter(|(_, w)| w.workout_type != WorkoutType::Rest)
        .map(|(i, _)| i)
        .collect();
    if ranked.is_empty() {
        return source;
    }
    // Stable: ties keep calendar order
    ranked.sort_by_key(|&i| source.workouts[i].workout_type.retention_rank());

    let target = ranked
        .len()
        .saturating_sub(reduce_training_days as usize)
        .max(1);
    let (kept, demoted) = ranked.split_at(target);

    let mut workouts = source.workouts.clone();
    for &i in demoted {
        let original = &source.workouts[i];
        workouts[i] = Workout::rest(original.day, original.date);
    }

    let cross_slots: Vec<usize> = if state == WeekState::ReturnWeek {
        for &i in kept.iter().step_by(2) {
            workouts[i] = return_run(&source.workouts[i], ctx.config);
        }
        kept.iter().skip(1).step_by(2).copied().collect()
    } else {
        kept.to_vec()
    };

    let assigned = distribute_round_robin(cross_slots.len(), equipment);
    for (&i, equipment) in cross_slots.iter().zip(assigned) {
        workouts[i] = cross_training_session(&source.workouts[i], equipment, ctx);
    }

    let mut week = RealizedWeek { workouts, ..source };
    week.total_mileage = round_to_tenth(week.running_mileage());
    week
}

/// Shortened running session for the return week
fn return_run(original: &Workout, config: &PlannerConfig) -> Workout {
    let mut workout = original.clone();
    if !workout.workout_type.is_running() || workout.workout_type == WorkoutType::Race {
        return workout;
    }
    workout.distance = workout
        .distance
        .map(|d| round_to_tenth(d * config.return_week_distance_factor));
    workout.notes = Some(RETURN_RUN_NOTE.to_string());
    workout
}

/// Minutes of cross-training standing in for a running session
fn session_minutes(original: &Workout, config: &PlannerConfig) -> u32 {
    original
        .distance
        .filter(|d| *d > 0.0)
        .map(|d| (d * config.minutes_per_mile).round() as u32)
        .or_else(|| original.duration.as_deref().and_then(parse_duration_minutes))
        .filter(|m| *m > 0)
        .unwrap_or(config.fallback_cross_training_minutes)
}

fn cross_training_session(
    original: &Workout,
    equipment: Equipment,
    ctx: &RecoveryContext<'_>,
) -> Workout {
    let bucket = IntensityBucket::from_workout_type(original.workout_type).for_equipment(equipment);
    let minutes = session_minutes(original, ctx.config);

    let content = ctx.catalog.find(equipment, bucket, minutes).unwrap_or_else(|| {
        warn!(
            equipment = equipment.as_str(),
            bucket = bucket.label(),
            minutes,
            "no library workout matched, using placeholder"
        );
        CrossTrainingWorkout::placeholder(equipment, bucket, minutes)
    });

    let description = match &content.structure {
        Some(structure) => format!("{} {structure}", content.description),
        None => content.description.clone(),
    };
    Workout {
        day: original.day,
        date: original.date,
        workout_type: WorkoutType::CrossTraining,
        name: content.name,
        description,
        distance: None,
        duration: Some(content.duration),
        pace: None,
        cross_training_type: Some(equipment),
        notes: content.effort.map(|effort| format!("Effort: {effort}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regeneration::test_support::{realized_week, training_plan, FixedAssigner};
    use crate::types::Day;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn request(current_week: u32, weeks_off: u32, reduce: u8) -> InjuryRequest {
        InjuryRequest {
            updated_profile: UserProfile::default(),
            current_week,
            weeks_off_running: weeks_off,
            selected_equipment: [Equipment::Pool, Equipment::Elliptical].into_iter().collect(),
            reduce_training_days: reduce,
        }
    }

    fn apply(plan: TrainingPlan, request: &InjuryRequest) -> Result<TrainingPlan, PlanError> {
        let config = PlannerConfig::default();
        let catalog = CrossTrainingCatalog::builtin();
        let ctx = RecoveryContext {
            config: &config,
            catalog: &catalog,
            assigner: None,
        };
        apply_injury_recovery(plan, request, &ctx)
    }

    #[test]
    fn test_classify_weeks() {
        assert_eq!(WeekState::classify(4, 5, 3), WeekState::Completed);
        assert_eq!(WeekState::classify(5, 5, 3), WeekState::InjuryWeek);
        assert_eq!(WeekState::classify(7, 5, 3), WeekState::InjuryWeek);
        assert_eq!(WeekState::classify(8, 5, 3), WeekState::ReturnWeek);
        assert_eq!(WeekState::classify(9, 5, 3), WeekState::PostRecovery);
    }

    #[test]
    fn test_schedule_bounds() {
        let schedule = RecoverySchedule::new(5, 3, 12);
        assert_eq!(schedule.end_week(), 7);
        assert_eq!(schedule.return_week(), 8);
        assert_eq!(schedule.state(8), Some(WeekState::ReturnWeek));
        assert_eq!(schedule.state(13), None);
        assert_eq!(schedule.state(0), None);
    }

    #[test]
    fn test_twelve_week_plan_injured_at_week_five() {
        let plan = training_plan(12);
        let original = plan.week_list().unwrap().to_vec();

        let updated = apply(plan, &request(5, 3, 0)).unwrap();
        let weeks = updated.week_list().unwrap();
        assert_eq!(weeks.len(), 12);

        assert_eq!(&weeks[..4], &original[..4]);
        for week in &weeks[4..7] {
            assert!(week.workouts.iter().all(|w| !w.workout_type.is_running()));
            assert!(week.workouts.iter().all(|w| w.distance.is_none()));
            assert_eq!(week.total_mileage, 0.0);
        }

        let return_week = &weeks[7];
        let running = return_week
            .workouts
            .iter()
            .filter(|w| w.workout_type.is_running())
            .count();
        let cross = return_week
            .workouts
            .iter()
            .filter(|w| w.workout_type == WorkoutType::CrossTraining)
            .count();
        assert!(running > 0 && cross > 0);
        assert!(running.abs_diff(cross) <= 1);

        assert_eq!(&weeks[8..], &original[8..]);

        let info = updated.injury_recovery_info.as_ref().unwrap();
        assert_eq!((info.start_week, info.end_week, info.return_week), (5, 7, 8));
        assert!(updated.injury_recovery_active);
        assert_eq!(
            updated.original_plan_before_injury().unwrap().weeks,
            original
        );
    }

    #[test]
    fn test_return_week_halves_retained_runs() {
        let plan = training_plan(10);
        let original_long = plan.week_list().unwrap()[5].workouts[6].distance.unwrap();

        let updated = apply(plan, &request(4, 2, 0)).unwrap();
        let return_week = &updated.week_list().unwrap()[5];

        // Rank order: long run, tempo, interval, easy, easy
        let long_run = &return_week.workouts[6];
        assert_eq!(long_run.workout_type, WorkoutType::LongRun);
        assert_eq!(long_run.distance, Some(round_to_tenth(original_long * 0.5)));
        assert_eq!(long_run.notes.as_deref(), Some(RETURN_RUN_NOTE));

        assert_eq!(return_week.workouts[1].workout_type, WorkoutType::CrossTraining);
        assert_eq!(return_week.workouts[3].workout_type, WorkoutType::Interval);
        assert_eq!(return_week.workouts[3].distance, Some(2.0));
        assert_eq!(return_week.workouts[2].workout_type, WorkoutType::CrossTraining);
        assert_eq!(return_week.workouts[5].workout_type, WorkoutType::Easy);
        assert_eq!(return_week.workouts[5].distance, Some(1.5));
    }

    #[test]
    fn test_reduce_training_days_demotes_lowest_priority() {
        let updated = apply(training_plan(8), &request(3, 1, 2)).unwrap();
        let injury_week = &updated.week_list().unwrap()[2];

        assert_eq!(injury_week.training_workouts().count(), 3);
        // Both easy runs are dropped first
        assert_eq!(injury_week.workouts[2].workout_type, WorkoutType::Rest);
        assert_eq!(injury_week.workouts[5].workout_type, WorkoutType::Rest);
        assert_eq!(injury_week.workouts[6].cross_training_type, Some(Equipment::Pool));
        assert_eq!(injury_week.workouts[1].cross_training_type, Some(Equipment::Elliptical));
    }

    #[test]
    fn test_seven_sessions_over_three_machines() {
        let mut plan = training_plan(4);
        if let Some(weeks) = plan.weeks.as_mut() {
            for workout in &mut weeks[1].workouts {
                if workout.workout_type == WorkoutType::Rest {
                    workout.workout_type = WorkoutType::Recovery;
                    workout.distance = Some(3.0);
                }
            }
        }
        let mut req = request(2, 1, 0);
        req.selected_equipment = [Equipment::Swimming, Equipment::Rowing, Equipment::StationaryBike]
            .into_iter()
            .collect();

        let updated = apply(plan, &req).unwrap();
        let mut counts: HashMap<Equipment, usize> = HashMap::new();
        for workout in &updated.week_list().unwrap()[1].workouts {
            *counts.entry(workout.cross_training_type.unwrap()).or_default() += 1;
        }
        let mut values: Vec<_> = counts.values().copied().collect();
        values.sort_unstable();
        assert_eq!(values, vec![2, 2, 3]);
    }

    #[test]
    fn test_cancel_restores_original_plan() {
        let plan = training_plan(12);
        let updated = apply(plan.clone(), &request(5, 3, 1)).unwrap();
        assert_ne!(updated.weeks, plan.weeks);

        let restored = cancel_injury_recovery(updated).unwrap();
        assert_eq!(restored, plan);
        assert!(restored.original_plan_before_injury().is_none());
    }

    #[test]
    fn test_cancel_when_inactive_is_noop() {
        let plan = training_plan(4);
        assert_eq!(cancel_injury_recovery(plan.clone()).unwrap(), plan);
    }

    #[test]
    fn test_cancel_without_snapshot_is_corruption() {
        let mut plan = training_plan(4);
        plan.injury_recovery_active = true;
        assert!(matches!(
            cancel_injury_recovery(plan),
            Err(PlanError::PlanCorruption(_))
        ));
    }

    #[test]
    fn test_reactivation_keeps_original_snapshot() {
        let plan = training_plan(12);
        let first = apply(plan.clone(), &request(5, 3, 0)).unwrap();
        let snapshot_id = first.original_plan_before_injury().unwrap().snapshot_id;

        let second = apply(first, &request(3, 1, 0)).unwrap();
        assert_eq!(
            second.original_plan_before_injury().unwrap().snapshot_id,
            snapshot_id
        );
        // Weeks reshaped by the first activation are back to normal
        assert_eq!(second.week_list().unwrap()[5], plan.week_list().unwrap()[5]);
        assert_eq!(cancel_injury_recovery(second).unwrap(), plan);
    }

    #[test]
    fn test_missing_window_week_is_corruption() {
        let mut plan = training_plan(8);
        if let Some(weeks) = plan.weeks.as_mut() {
            weeks.retain(|w| w.week != 6);
        }
        let result = apply(plan, &request(5, 2, 0));
        assert!(matches!(result, Err(PlanError::PlanCorruption(m)) if m.contains("week 6")));
    }

    #[test]
    fn test_missing_window_week_rebuilt_from_skeleton() {
        let skeleton = crate::orchestrator::generate_plan_skeleton(&crate::orchestrator::PlanRequest {
            current_weekly_mileage: Some(25.0),
            current_long_run: Some(8.0),
            total_weeks: Some(8),
            race_distance: Some("half".to_string()),
            experience_level: None,
        })
        .unwrap();
        let mut plan = training_plan(8);
        plan.skeleton = Some(skeleton);
        if let Some(weeks) = plan.weeks.as_mut() {
            weeks.retain(|w| w.week != 6);
        }

        let config = PlannerConfig::default();
        let catalog = CrossTrainingCatalog::builtin();
        let ctx = RecoveryContext {
            config: &config,
            catalog: &catalog,
            assigner: Some(&FixedAssigner),
        };
        let updated = apply_injury_recovery(plan, &request(5, 2, 0), &ctx).unwrap();
        let week_six = &updated.week_list().unwrap()[5];
        assert_eq!(week_six.week, 6);
        assert!(week_six.workouts.iter().all(|w| !w.workout_type.is_running()));
    }

    #[test]
    fn test_missing_post_recovery_week_is_corruption() {
        let mut plan = training_plan(8);
        if let Some(weeks) = plan.weeks.as_mut() {
            weeks.retain(|w| w.week != 8);
        }
        plan.overview.total_weeks = 8;
        let result = apply(plan, &request(2, 1, 0));
        assert!(
            matches!(result, Err(PlanError::PlanCorruption(m)) if m.contains("regenerate the base plan"))
        );
    }

    #[test]
    fn test_placeholder_when_library_empty() {
        let config = PlannerConfig::default();
        let catalog = CrossTrainingCatalog::empty();
        let ctx = RecoveryContext {
            config: &config,
            catalog: &catalog,
            assigner: None,
        };
        let mut req = request(1, 1, 0);
        req.selected_equipment = [Equipment::Pool].into_iter().collect();

        let updated = apply_injury_recovery(training_plan(3), &req, &ctx).unwrap();
        let long_slot = &updated.week_list().unwrap()[0].workouts[6];
        assert_eq!(long_slot.name, "Aqua Running – LONG");
        assert_eq!(long_slot.day, Day::Sunday);
        assert_eq!(long_slot.duration.as_deref(), Some("85 min"));
    }

    #[test]
    fn test_hill_slot_on_pool_uses_intervals() {
        let mut plan = training_plan(3);
        if let Some(weeks) = plan.weeks.as_mut() {
            weeks[0].workouts[3].workout_type = WorkoutType::Hill;
        }
        let mut req = request(1, 1, 0);
        req.selected_equipment = [Equipment::Pool].into_iter().collect();

        let updated = apply(plan, &req).unwrap();
        let slot = &updated.week_list().unwrap()[0].workouts[3];
        assert_eq!(slot.name, "Aqua Intervals");
    }

    #[test]
    fn test_request_validation() {
        let plan = training_plan(6);
        assert!(matches!(
            apply(plan.clone(), &request(0, 2, 0)),
            Err(PlanError::Configuration(_))
        ));
        assert!(matches!(
            apply(plan.clone(), &request(2, 0, 0)),
            Err(PlanError::Configuration(_))
        ));
        assert!(matches!(
            apply(plan.clone(), &request(2, 1, 3)),
            Err(PlanError::Configuration(_))
        ));
        let mut req = request(2, 1, 0);
        req.selected_equipment = EquipmentSelection::default();
        assert!(matches!(apply(plan, &req), Err(PlanError::Configuration(_))));
    }

    #[test]
    fn test_snapshot_version_slot() {
        let updated = apply(training_plan(6), &request(2, 1, 0)).unwrap();
        assert!(updated.versions.get(PlanVersion::PreInjury).is_some());
        let week = realized_week(1, 8.5);
        assert_eq!(updated.week_list().unwrap()[0], week);
    }

    #[test]
    fn test_equipment_selection_camel_case() {
        let selection: EquipmentSelection =
            serde_json::from_str(r#"{"pool": true, "stationaryBike": true}"#).unwrap();
        assert_eq!(
            selection.selected(),
            vec![Equipment::Pool, Equipment::StationaryBike]
        );
    }

    #[test]
    fn test_huge_weeks_off_rejected() {
        assert_eq!(WeekState::classify(5, 5, u32::MAX), WeekState::InjuryWeek);
        let schedule = RecoverySchedule::new(5, u32::MAX, 12);
        assert_eq!(schedule.return_week(), u32::MAX);
        assert_eq!(schedule.state(12), Some(WeekState::InjuryWeek));

        let result = apply(training_plan(12), &request(5, u32::MAX, 0));
        assert!(matches!(result, Err(PlanError::Configuration(m)) if m.contains("weeks_off_running")));
    }

    #[test]
    fn test_gap_before_current_week_is_corruption() {
        let mut plan = training_plan(12);
        if let Some(weeks) = plan.weeks.as_mut() {
            weeks.retain(|w| w.week != 2);
        }
        let result = apply(plan, &request(5, 3, 0));
        assert!(
            matches!(result, Err(PlanError::PlanCorruption(m)) if m.contains("completed week 2"))
        );
    }

    #[test]
    fn test_cancel_restores_training_weeks_field() {
        let plan = training_plan(12);
        let legacy = TrainingPlan {
            weeks: None,
            legacy_weeks: plan.weeks.clone(),
            ..plan
        };

        let updated = apply(legacy.clone(), &request(5, 3, 0)).unwrap();
        assert!(updated.legacy_weeks.is_none());
        assert!(updated.original_plan_before_injury().unwrap().from_training_weeks);

        let restored = cancel_injury_recovery(updated).unwrap();
        assert_eq!(restored, legacy);
    }

    #[test]
    fn test_later_reactivation_keeps_earlier_window_exempt() {
        use crate::types::ValidationCheck;
        use crate::validation::validate_training_plan;

        let first = apply(training_plan(12), &request(3, 2, 0)).unwrap();
        let second = apply(first, &request(7, 1, 0)).unwrap();

        let info = second.injury_recovery_info.as_ref().unwrap();
        assert_eq!(
            info.earlier_windows,
            vec![WeekSpan {
                start_week: 3,
                end_week: 5
            }]
        );
        assert!(info.covers(4));
        assert!(!info.covers(6));
        assert!(info.covers(8));

        let profile = UserProfile {
            hard_days: vec![Day::Tuesday, Day::Thursday],
            rest_days: vec![Day::Monday, Day::Friday],
            long_run_day: Day::Sunday,
            ..Default::default()
        };
        let report = validate_training_plan(&second, &profile);
        assert_eq!(report.issues_for(ValidationCheck::HardDayFidelity).count(), 0);
        let long_run_weeks: Vec<_> = report
            .issues_for(ValidationCheck::LongRunPresence)
            .map(|i| i.week)
            .collect();
        assert_eq!(long_run_weeks, vec![Some(12)]);
    }
}
