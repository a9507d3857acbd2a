//! General plan regeneration
//!
//! Rewrites the weeks from the current week onward while keeping completed
//! weeks untouched. Day-of-week placement is delegated to a [`DayAssigner`].

use crate::error::PlanError;
use crate::merge::preserve_and_merge_weeks;
use crate::orchestrator::{generate_plan_skeleton, PlanRequest};
use crate::types::{RealizedWeek, TrainingPlan, UserProfile, WeekMathEntry};
use tracing::info;

/// Places one skeleton week onto calendar days
pub trait DayAssigner {
    fn assign_week(
        &self,
        entry: &WeekMathEntry,
        profile: &UserProfile,
    ) -> Result<RealizedWeek, PlanError>;
}

/// Replace everything from `current_week` on with `new_weeks`.
pub fn regenerate_future_weeks(
    mut plan: TrainingPlan,
    new_weeks: Vec<RealizedWeek>,
    current_week: u32,
) -> Result<TrainingPlan, PlanError> {
    let merged = preserve_and_merge_weeks(&plan, new_weeks, current_week)?;
    plan.overview.total_weeks = merged.len() as u32;
    plan.weeks = Some(merged);
    plan.legacy_weeks = None;
    Ok(plan)
}

/// Recompute the remaining weeks from a fresh request.
///
/// `request.total_weeks` counts the weeks from `current_week` to race day.
/// The new skeleton is renumbered to absolute weeks, realized through
/// `assigner` and merged behind the completed weeks.
pub fn replan_from_request(
    plan: TrainingPlan,
    request: &PlanRequest,
    profile: &UserProfile,
    assigner: &dyn DayAssigner,
    current_week: u32,
) -> Result<TrainingPlan, PlanError> {
    if plan.injury_recovery_active {
        return Err(PlanError::Configuration(
            "cancel injury recovery before re-planning".to_string(),
        ));
    }
    if current_week == 0 {
        return Err(PlanError::Configuration(
            "current_week is 1-based and must be at least 1".to_string(),
        ));
    }

    let mut skeleton = generate_plan_skeleton(request)?;
    let offset = current_week - 1;
    for entry in &mut skeleton.weeks {
        entry.week_number += offset;
    }

    let new_weeks = skeleton
        .weeks
        .iter()
        .map(|entry| {
            let mut week = assigner.assign_week(entry, profile)?;
            week.week = entry.week_number;
            Ok(week)
        })
        .collect::<Result<Vec<_>, PlanError>>()?;

    info!(
        current_week,
        remaining_weeks = new_weeks.len(),
        race = skeleton.race_distance.as_str(),
        "re-planning future weeks"
    );

    let mut plan = regenerate_future_weeks(plan, new_weeks, current_week)?;
    plan.overview.race_distance = Some(skeleton.race_distance);
    plan.overview.peak_weekly_mileage = Some(skeleton.targets.peak_weekly_mileage);
    plan.skeleton = Some(skeleton);
    Ok(plan)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::types::{Day, PlanOverview, WeekDates, Workout, WorkoutType};
    use chrono::{Duration, NaiveDate};

    pub fn plan_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn session(day: Day, date: NaiveDate, workout_type: WorkoutType, name: &str, distance: f64) -> Workout {
        Workout {
            day,
            date,
            workout_type,
            name: name.to_string(),
            description: String::new(),
            distance: Some(distance),
            duration: None,
            pace: None,
            cross_training_type: None,
            notes: None,
        }
    }

    /// Monday rest, Tue tempo, Wed easy, Thu intervals, Fri rest, Sat easy, Sun long run
    pub fn realized_week(number: u32, long_run: f64) -> RealizedWeek {
        let start = plan_start() + Duration::weeks(number as i64 - 1);
        let date = |i: i64| start + Duration::days(i);
        let workouts = vec![
            Workout::rest(Day::Monday, date(0)),
            session(Day::Tuesday, date(1), WorkoutType::Tempo, "Tempo Run", 5.0),
            session(Day::Wednesday, date(2), WorkoutType::Easy, "Easy Run", 4.0),
            session(Day::Thursday, date(3), WorkoutType::Interval, "Intervals 6x800m", 4.0),
            Workout::rest(Day::Friday, date(4)),
            session(Day::Saturday, date(5), WorkoutType::Easy, "Easy Run", 3.0),
            session(Day::Sunday, date(6), WorkoutType::LongRun, "Long Run", long_run),
        ];
        let mut week = RealizedWeek {
            week: number,
            week_dates: Some(WeekDates {
                start,
                end: date(6),
            }),
            phase: None,
            total_mileage: 0.0,
            workouts,
        };
        week.total_mileage = week.running_mileage();
        week
    }

    pub fn training_plan(weeks: u32) -> TrainingPlan {
        TrainingPlan::new(
            PlanOverview {
                total_weeks: weeks,
                start_date: Some(plan_start()),
                race_date: Some(plan_start() + Duration::weeks(weeks as i64 - 1) + Duration::days(6)),
                ..Default::default()
            },
            (1..=weeks).map(|n| realized_week(n, 8.0 + n as f64 * 0.5)).collect(),
        )
    }

    /// Lays a skeleton entry onto the fixture week shape
    pub struct FixedAssigner;

    impl DayAssigner for FixedAssigner {
        fn assign_week(
            &self,
            entry: &WeekMathEntry,
            _profile: &UserProfile,
        ) -> Result<RealizedWeek, PlanError> {
            let mut week = realized_week(entry.week_number, entry.long_run);
            week.phase = Some(entry.phase);
            Ok(week)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_regenerate_future_weeks_updates_total() {
        let plan = training_plan(8);
        let original = plan.clone();
        let new_weeks: Vec<_> = (4..=10).map(|n| realized_week(n, 6.0)).collect();

        let updated = regenerate_future_weeks(plan, new_weeks, 4).unwrap();
        let weeks = updated.week_list().unwrap();
        assert_eq!(weeks.len(), 10);
        assert_eq!(updated.overview.total_weeks, 10);
        assert_eq!(&weeks[..3], &original.week_list().unwrap()[..3]);
    }

    #[test]
    fn test_replan_renumbers_to_absolute_weeks() {
        let plan = training_plan(12);
        let original = plan.clone();
        let request = PlanRequest {
            current_weekly_mileage: Some(20.0),
            current_long_run: Some(6.0),
            total_weeks: Some(8),
            race_distance: Some("10k".to_string()),
            experience_level: None,
        };

        let updated =
            replan_from_request(plan, &request, &UserProfile::default(), &FixedAssigner, 5).unwrap();
        let weeks = updated.week_list().unwrap();

        assert_eq!(weeks.len(), 12);
        assert_eq!(&weeks[..4], &original.week_list().unwrap()[..4]);
        let numbers: Vec<u32> = weeks.iter().map(|w| w.week).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<_>>());

        let skeleton = updated.skeleton.as_ref().unwrap();
        assert_eq!(skeleton.weeks[0].week_number, 5);
        assert_eq!(skeleton.weeks.last().unwrap().week_number, 12);
        assert_eq!(weeks[4].workouts[6].distance, Some(skeleton.weeks[0].long_run));
    }

    #[test]
    fn test_replan_rejected_during_injury_recovery() {
        let mut plan = training_plan(6);
        plan.injury_recovery_active = true;
        let result = replan_from_request(
            plan,
            &PlanRequest::default(),
            &UserProfile::default(),
            &FixedAssigner,
            2,
        );
        assert!(matches!(result, Err(PlanError::Configuration(_))));
    }
}
