//! Plan validation
//!
//! Read-only checks of a realized plan against the profile it was built for.
//! Validation never fails; every problem is collected into one
//! [`ValidationReport`] and the caller decides whether to block, warn or
//! ignore.
//!
//! The structured workout `type` is authoritative. Name and description text
//! is only consulted where the type carries no meaning (`other`) or where the
//! type itself cannot be wrong (a non-rest entry on a rest day).

use crate::types::{
    Day, RealizedWeek, TrainingPlan, UserProfile, ValidationCheck, ValidationIssue,
    ValidationReport, Workout, WorkoutType,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static HARD_KEYWORDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(tempo|intervals?|hills?|repeats?|threshold|fartlek|vo2\s*max|speed\s*work|track)\b",
    )
    .ok()
});

/// Equivalent-distance label, e.g. "6 EM" or "6.5EM"
static EM_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?\s*EM\b").ok());

static LITERAL_UNITS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s*(?:mi|miles?|km|kilomet(?:er|re)s?)\b").ok()
});

fn pattern_matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

fn has_hard_keywords(workout: &Workout) -> bool {
    pattern_matches(&HARD_KEYWORDS, &workout.text())
}

/// Workout counts as quality work for hard-day purposes
fn is_quality_session(workout: &Workout) -> bool {
    match workout.workout_type {
        WorkoutType::Tempo | WorkoutType::Interval | WorkoutType::Hill | WorkoutType::Race => true,
        WorkoutType::Other => has_hard_keywords(workout),
        _ => false,
    }
}

fn issue(check: ValidationCheck, week: Option<u32>, day: Option<Day>, message: String) -> ValidationIssue {
    ValidationIssue {
        check,
        week,
        day,
        message,
    }
}

/// Validate `plan` against `profile`.
pub fn validate_training_plan(plan: &TrainingPlan, profile: &UserProfile) -> ValidationReport {
    let mut errors = Vec::new();

    let Some(weeks) = plan.week_list() else {
        errors.push(issue(
            ValidationCheck::ParsingCompleteness,
            None,
            None,
            "plan has no weeks".to_string(),
        ));
        return ValidationReport::from_issues(errors);
    };

    let recovery_window = plan
        .injury_recovery_info
        .as_ref()
        .filter(|_| plan.injury_recovery_active);
    let last_index = weeks.len().saturating_sub(1);

    for (index, week) in weeks.iter().enumerate() {
        let exempt = recovery_window.is_some_and(|info| info.covers(week.week));

        check_completeness(week, &mut errors);
        if !exempt {
            check_hard_days(week, profile, &mut errors);
            check_long_run_presence(week, profile, index == last_index, &mut errors);
        }
        check_rest_days(week, profile, &mut errors);
        check_equivalent_distance(week, &mut errors);
        check_long_run_distance(week, &mut errors);
    }

    check_calendar(plan, weeks, profile, &mut errors);

    debug!(weeks = weeks.len(), issues = errors.len(), "validated plan");
    ValidationReport::from_issues(errors)
}

fn check_completeness(week: &RealizedWeek, errors: &mut Vec<ValidationIssue>) {
    if week.workouts.is_empty() {
        errors.push(issue(
            ValidationCheck::ParsingCompleteness,
            Some(week.week),
            None,
            format!("week {} has no workouts", week.week),
        ));
    } else if week.training_workouts().next().is_none() {
        errors.push(issue(
            ValidationCheck::ParsingCompleteness,
            Some(week.week),
            None,
            format!("week {} contains only rest days", week.week),
        ));
    }
}

fn check_hard_days(week: &RealizedWeek, profile: &UserProfile, errors: &mut Vec<ValidationIssue>) {
    for day in &profile.hard_days {
        let satisfied = week
            .workouts
            .iter()
            .filter(|w| w.day == *day)
            .any(is_quality_session);
        if !satisfied {
            errors.push(issue(
                ValidationCheck::HardDayFidelity,
                Some(week.week),
                Some(*day),
                format!(
                    "week {} {} is a hard day but has no tempo, interval or hill workout",
                    week.week,
                    day.as_str()
                ),
            ));
        }
    }
}

fn check_rest_days(week: &RealizedWeek, profile: &UserProfile, errors: &mut Vec<ValidationIssue>) {
    for workout in week.workouts.iter().filter(|w| profile.rest_days.contains(&w.day)) {
        let hard = workout.workout_type.is_hard()
            || (workout.workout_type != WorkoutType::Rest && has_hard_keywords(workout));
        if hard {
            errors.push(issue(
                ValidationCheck::RestDayFidelity,
                Some(week.week),
                Some(workout.day),
                format!(
                    "week {} {} is a rest day but carries hard workout '{}'",
                    week.week,
                    workout.day.as_str(),
                    workout.name
                ),
            ));
        }
    }
}

fn check_equivalent_distance(week: &RealizedWeek, errors: &mut Vec<ValidationIssue>) {
    let cross_training = week
        .workouts
        .iter()
        .filter(|w| w.workout_type == WorkoutType::CrossTraining && w.distance.is_some());

    for workout in cross_training {
        let text = workout.text();
        let message = if pattern_matches(&LITERAL_UNITS, &text) {
            format!(
                "cross-training '{}' states literal distance units instead of EM",
                workout.name
            )
        } else if !pattern_matches(&EM_LABEL, &text) {
            format!(
                "cross-training '{}' has a distance without its EM label",
                workout.name
            )
        } else {
            continue;
        };
        errors.push(issue(
            ValidationCheck::EquivalentDistance,
            Some(week.week),
            Some(workout.day),
            message,
        ));
    }
}

fn check_long_run_presence(
    week: &RealizedWeek,
    profile: &UserProfile,
    is_final: bool,
    errors: &mut Vec<ValidationIssue>,
) {
    if is_final {
        if !week.workouts.iter().any(|w| w.workout_type == WorkoutType::Race) {
            errors.push(issue(
                ValidationCheck::LongRunPresence,
                Some(week.week),
                None,
                format!("final week {} has no race-day entry", week.week),
            ));
        }
        return;
    }

    let present = week
        .workouts
        .iter()
        .any(|w| w.workout_type == WorkoutType::LongRun && w.day == profile.long_run_day);
    if !present {
        errors.push(issue(
            ValidationCheck::LongRunPresence,
            Some(week.week),
            Some(profile.long_run_day),
            format!(
                "week {} has no long run on {}",
                week.week,
                profile.long_run_day.as_str()
            ),
        ));
    }
}

fn check_long_run_distance(week: &RealizedWeek, errors: &mut Vec<ValidationIssue>) {
    for workout in week
        .workouts
        .iter()
        .filter(|w| w.workout_type == WorkoutType::LongRun)
    {
        let valid = workout.distance.is_some_and(|d| d.is_finite() && d > 0.0);
        if !valid {
            errors.push(issue(
                ValidationCheck::LongRunDistance,
                Some(week.week),
                Some(workout.day),
                format!(
                    "week {} long run has no positive distance",
                    week.week
                ),
            ));
        }
    }
}

fn check_calendar(
    plan: &TrainingPlan,
    weeks: &[RealizedWeek],
    profile: &UserProfile,
    errors: &mut Vec<ValidationIssue>,
) {
    let plan_start = plan
        .overview
        .start_date
        .or_else(|| weeks.first().and_then(|w| w.week_dates).map(|d| d.start));

    if let Some(requested) = profile.start_date {
        if plan_start != Some(requested) {
            errors.push(issue(
                ValidationCheck::CalendarIntegrity,
                None,
                None,
                match plan_start {
                    Some(actual) => format!("plan starts {actual}, profile requested {requested}"),
                    None => format!("plan has no start date, profile requested {requested}"),
                },
            ));
        }
    }

    let start = profile.start_date.or(plan_start);
    let race = profile.race_date.or(plan.overview.race_date);
    let (Some(start), Some(race)) = (start, race) else {
        return;
    };

    let days = (race - start).num_days();
    if days < 0 {
        errors.push(issue(
            ValidationCheck::CalendarIntegrity,
            None,
            None,
            format!("race date {race} is before start date {start}"),
        ));
        return;
    }

    let expected = (days + 6) / 7;
    if weeks.len() as i64 != expected {
        errors.push(issue(
            ValidationCheck::CalendarIntegrity,
            None,
            None,
            format!(
                "plan has {} weeks but {start} to {race} spans {expected}",
                weeks.len()
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::cross_training::CrossTrainingCatalog;
    use crate::injury::{apply_injury_recovery, InjuryRequest, RecoveryContext};
    use crate::regeneration::test_support::{plan_start, training_plan};
    use crate::types::Equipment;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn race_ready_plan(weeks: u32) -> TrainingPlan {
        let mut plan = training_plan(weeks);
        if let Some(list) = plan.weeks.as_mut() {
            if let Some(last) = list.last_mut() {
                let race_day = &mut last.workouts[6];
                race_day.workout_type = WorkoutType::Race;
                race_day.name = "Race Day".to_string();
            }
        }
        plan
    }

    fn profile(plan: &TrainingPlan) -> UserProfile {
        UserProfile {
            start_date: plan.overview.start_date,
            race_date: plan.overview.race_date,
            hard_days: vec![Day::Tuesday, Day::Thursday],
            rest_days: vec![Day::Monday, Day::Friday],
            long_run_day: Day::Sunday,
            ..Default::default()
        }
    }

    fn workout_mut(plan: &mut TrainingPlan, week: usize, slot: usize) -> &mut Workout {
        &mut plan.weeks.as_mut().unwrap()[week].workouts[slot]
    }

    #[test]
    fn test_clean_plan_is_valid() {
        let plan = race_ready_plan(12);
        let report = validate_training_plan(&plan, &profile(&plan));
        assert_eq!(report.errors, Vec::new());
        assert!(report.valid);
    }

    #[test]
    fn test_sandwich_tempo_on_hard_day_passes() {
        let mut plan = race_ready_plan(6);
        let tempo = workout_mut(&mut plan, 2, 1);
        tempo.name = "Sandwich Tempo".to_string();
        tempo.description = "2 mi easy, 3 mi at tempo, 2 mi easy".to_string();

        let report = validate_training_plan(&plan, &profile(&plan));
        assert_eq!(report.issues_for(ValidationCheck::HardDayFidelity).count(), 0);
        assert!(report.valid);
    }

    #[test]
    fn test_type_trusted_over_name_on_hard_day() {
        let mut plan = race_ready_plan(6);
        let slot = workout_mut(&mut plan, 1, 1);
        slot.workout_type = WorkoutType::Easy;
        slot.name = "Tempo Run".to_string();

        let report = validate_training_plan(&plan, &profile(&plan));
        let issues: Vec<_> = report.issues_for(ValidationCheck::HardDayFidelity).collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].week, Some(2));
        assert_eq!(issues[0].day, Some(Day::Tuesday));
    }

    #[test]
    fn test_keyword_fallback_for_unknown_type() {
        let mut plan = race_ready_plan(6);
        let slot = workout_mut(&mut plan, 0, 3);
        slot.workout_type = WorkoutType::Other;
        slot.name = "Track 6x800m repeats".to_string();
        let slot = workout_mut(&mut plan, 1, 3);
        slot.workout_type = WorkoutType::Other;
        slot.name = "Shakeout".to_string();

        let report = validate_training_plan(&plan, &profile(&plan));
        let weeks: Vec<_> = report
            .issues_for(ValidationCheck::HardDayFidelity)
            .map(|i| i.week)
            .collect();
        assert_eq!(weeks, vec![Some(2)]);
    }

    #[test]
    fn test_hard_keywords_on_rest_day() {
        let mut plan = race_ready_plan(6);
        let monday = workout_mut(&mut plan, 3, 0);
        monday.workout_type = WorkoutType::Easy;
        monday.name = "Hill repeats".to_string();

        let report = validate_training_plan(&plan, &profile(&plan));
        let issues: Vec<_> = report.issues_for(ValidationCheck::RestDayFidelity).collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].day, Some(Day::Monday));
        assert!(!report.valid);
    }

    #[test]
    fn test_missing_race_entry_in_final_week() {
        let plan = training_plan(8);
        let report = validate_training_plan(&plan, &profile(&plan));
        assert!(!report.valid);
        let issues: Vec<_> = report.issues_for(ValidationCheck::LongRunPresence).collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].week, Some(8));
        assert!(issues[0].message.contains("week 8"));
    }

    #[test]
    fn test_long_run_on_wrong_day() {
        let mut plan = race_ready_plan(6);
        workout_mut(&mut plan, 2, 6).day = Day::Saturday;

        let report = validate_training_plan(&plan, &profile(&plan));
        let issues: Vec<_> = report.issues_for(ValidationCheck::LongRunPresence).collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].week, Some(3));
    }

    #[test]
    fn test_long_run_needs_distance() {
        let mut plan = race_ready_plan(6);
        let long_run = workout_mut(&mut plan, 1, 6);
        long_run.distance = None;
        long_run.duration = Some("2 hours".to_string());

        let report = validate_training_plan(&plan, &profile(&plan));
        assert_eq!(report.issues_for(ValidationCheck::LongRunDistance).count(), 1);
    }

    #[test]
    fn test_equivalent_distance_label() {
        let mut plan = race_ready_plan(6);
        let labelled = workout_mut(&mut plan, 0, 2);
        labelled.workout_type = WorkoutType::CrossTraining;
        labelled.name = "Elliptical 4 EM".to_string();
        labelled.cross_training_type = Some(Equipment::Elliptical);

        let rewritten = workout_mut(&mut plan, 1, 2);
        rewritten.workout_type = WorkoutType::CrossTraining;
        rewritten.name = "Elliptical 4 miles".to_string();

        let unlabelled = workout_mut(&mut plan, 2, 2);
        unlabelled.workout_type = WorkoutType::CrossTraining;
        unlabelled.name = "Elliptical".to_string();

        let report = validate_training_plan(&plan, &profile(&plan));
        let weeks: Vec<_> = report
            .issues_for(ValidationCheck::EquivalentDistance)
            .map(|i| i.week)
            .collect();
        assert_eq!(weeks, vec![Some(2), Some(3)]);
    }

    #[test]
    fn test_all_rest_week_is_incomplete() {
        let mut plan = race_ready_plan(6);
        if let Some(weeks) = plan.weeks.as_mut() {
            for workout in &mut weeks[2].workouts {
                *workout = Workout::rest(workout.day, workout.date);
            }
        }
        let report = validate_training_plan(&plan, &profile(&plan));
        assert_eq!(report.issues_for(ValidationCheck::ParsingCompleteness).count(), 1);
    }

    #[test]
    fn test_plan_without_weeks() {
        let report = validate_training_plan(&TrainingPlan::default(), &UserProfile::default());
        assert!(!report.valid);
        assert_eq!(report.errors[0].check, ValidationCheck::ParsingCompleteness);
    }

    #[test]
    fn test_calendar_mismatches() {
        let plan = race_ready_plan(6);
        let mut user = profile(&plan);
        user.start_date = Some(plan_start() + Duration::days(7));
        user.race_date = Some(plan_start() + Duration::days(7 * 9));

        let report = validate_training_plan(&plan, &user);
        assert_eq!(report.issues_for(ValidationCheck::CalendarIntegrity).count(), 2);
    }

    #[test]
    fn test_injury_window_exempt_from_hard_day_and_long_run() {
        let plan = race_ready_plan(12);
        let user = profile(&plan);
        let config = PlannerConfig::default();
        let catalog = CrossTrainingCatalog::builtin();
        let ctx = RecoveryContext {
            config: &config,
            catalog: &catalog,
            assigner: None,
        };
        let request = InjuryRequest {
            current_week: 5,
            weeks_off_running: 3,
            selected_equipment: [Equipment::StationaryBike].into_iter().collect(),
            reduce_training_days: 1,
            ..Default::default()
        };
        let recovering = apply_injury_recovery(plan, &request, &ctx).unwrap();

        let report = validate_training_plan(&recovering, &user);
        assert_eq!(report.errors, Vec::new());
    }
}
