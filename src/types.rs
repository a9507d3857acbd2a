//! Core types for the Stride planner
//!
//! This module defines the data structures that flow through each stage:
//! plan inputs, race parameters, the numeric plan skeleton, realized day-level
//! plans, injury-recovery metadata and validation reports.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Supported race distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RaceDistance {
    #[serde(rename = "5K")]
    FiveK,
    #[serde(rename = "10K")]
    TenK,
    #[serde(rename = "Half Marathon")]
    HalfMarathon,
    #[serde(rename = "Marathon")]
    Marathon,
}

impl RaceDistance {
    pub const ALL: [RaceDistance; 4] = [
        RaceDistance::FiveK,
        RaceDistance::TenK,
        RaceDistance::HalfMarathon,
        RaceDistance::Marathon,
    ];

    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceDistance::FiveK => "5K",
            RaceDistance::TenK => "10K",
            RaceDistance::HalfMarathon => "Half Marathon",
            RaceDistance::Marathon => "Marathon",
        }
    }
}

impl fmt::Display for RaceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runner experience level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Elite,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
            ExperienceLevel::Elite => "elite",
        }
    }

    /// Parse a free-form level string; `None` for unrecognized values
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "beginner" | "novice" => Some(ExperienceLevel::Beginner),
            "intermediate" => Some(ExperienceLevel::Intermediate),
            "advanced" => Some(ExperienceLevel::Advanced),
            "elite" => Some(ExperienceLevel::Elite),
            _ => None,
        }
    }
}

/// Training phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Base,
    Build,
    Peak,
    Taper,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Base => "base",
            Phase::Build => "build",
            Phase::Peak => "peak",
            Phase::Taper => "taper",
        }
    }
}

/// Quality workout categories that carry a per-race distance rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityWorkout {
    Tempo,
    Interval,
    Hill,
}

/// Validated calculator inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInputs {
    /// Current weekly mileage (miles)
    pub current_weekly_mileage: f64,
    /// Current long run (miles)
    pub current_long_run: f64,
    /// Plan length in weeks, race week included
    pub total_weeks: u32,
    pub race_distance: RaceDistance,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
}

/// Minimum/maximum distance for one workout category (miles)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBounds {
    pub min: f64,
    pub max: f64,
}

/// Share of weekly volume given to each quality workout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPercentages {
    pub tempo: f64,
    pub interval: f64,
    pub hill: f64,
}

impl WorkoutPercentages {
    pub fn get(&self, workout: QualityWorkout) -> f64 {
        match workout {
            QualityWorkout::Tempo => self.tempo,
            QualityWorkout::Interval => self.interval,
            QualityWorkout::Hill => self.hill,
        }
    }
}

/// Distance bounds for each quality workout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutBounds {
    pub tempo: DistanceBounds,
    pub interval: DistanceBounds,
    pub hill: DistanceBounds,
}

impl WorkoutBounds {
    pub fn get(&self, workout: QualityWorkout) -> DistanceBounds {
        match workout {
            QualityWorkout::Tempo => self.tempo,
            QualityWorkout::Interval => self.interval,
            QualityWorkout::Hill => self.hill,
        }
    }
}

/// Distance-specific caps and ratios consumed by the race calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceParameters {
    pub peak_weekly_mileage_cap: f64,
    pub long_run_max: f64,
    pub long_run_floor: f64,
    /// Long run ceiling as a fraction of peak weekly mileage
    pub long_run_percentage: f64,
    pub minimum_long_run_target: f64,
    pub workout_percentages: WorkoutPercentages,
    pub workout_bounds: WorkoutBounds,
}

/// Week counts per phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDistribution {
    pub base: u32,
    pub build: u32,
    pub peak: u32,
    pub taper: u32,
}

impl PhaseDistribution {
    pub fn total(&self) -> u32 {
        self.base + self.build + self.peak + self.taper
    }

    /// Weeks before the taper starts (base + build + peak)
    pub fn build_weeks(&self) -> u32 {
        self.base + self.build + self.peak
    }
}

/// Numeric targets for one week of the skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekMathEntry {
    pub week_number: u32,
    pub phase: Phase,
    pub weekly_mileage: f64,
    pub long_run: f64,
    pub tempo_distance: f64,
    pub interval_distance: f64,
    pub hill_distance: f64,
    #[serde(default)]
    pub is_cutback: bool,
}

/// Peak targets after experience adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanTargets {
    pub peak_weekly_mileage: f64,
    pub long_run_max: f64,
    /// Peak mileage before experience adjustment
    pub base_peak_weekly_mileage: f64,
    /// Long run ceiling before experience adjustment
    pub base_long_run_max: f64,
}

/// Non-fatal conditions raised during plan computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// The timeline is too short to reach the race's minimum long run
    LongRunBelowTarget {
        race_distance: RaceDistance,
        achievable: f64,
        target: f64,
    },
    /// The adjusted long run stays below the race's long-run floor
    LongRunBelowFloor { achievable: f64, floor: f64 },
    /// Unrecognized experience level replaced by the default
    UnknownExperienceLevel { value: String },
    /// Current long run exceeded current weekly mileage and was clamped
    LongRunExceedsMileage { long_run: f64, weekly_mileage: f64 },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::LongRunBelowTarget {
                race_distance,
                achievable,
                target,
            } => write!(
                f,
                "{race_distance} long run reaches {achievable} mi, short of the {target} mi target"
            ),
            PlanWarning::LongRunBelowFloor { achievable, floor } => write!(
                f,
                "long run of {achievable} mi stays below the {floor} mi floor"
            ),
            PlanWarning::UnknownExperienceLevel { value } => {
                write!(f, "unknown experience level '{value}', using intermediate")
            }
            PlanWarning::LongRunExceedsMileage {
                long_run,
                weekly_mileage,
            } => write!(
                f,
                "current long run {long_run} mi exceeds weekly mileage {weekly_mileage} mi"
            ),
        }
    }
}

/// Numeric, day-agnostic plan produced by the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSkeleton {
    pub race_distance: RaceDistance,
    pub inputs: PlanInputs,
    pub experience_level: ExperienceLevel,
    pub targets: PlanTargets,
    pub phases: PhaseDistribution,
    pub weeks: Vec<WeekMathEntry>,
    pub race_params: RaceParameters,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PlanWarning>,
}

/// Day of week; defaults to Sunday, the usual long-run day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    #[default]
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }
}

/// Authoritative workout classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Tempo,
    Interval,
    Hill,
    #[serde(alias = "longRun", alias = "long-run")]
    LongRun,
    Easy,
    Recovery,
    Rest,
    Race,
    #[serde(alias = "cross-training", alias = "crossTraining")]
    CrossTraining,
    #[serde(other)]
    Other,
}

impl WorkoutType {
    /// Quality/hard session
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            WorkoutType::Tempo | WorkoutType::Interval | WorkoutType::Hill
        )
    }

    /// Entry involves running
    pub fn is_running(&self) -> bool {
        !matches!(
            self,
            WorkoutType::Rest | WorkoutType::CrossTraining | WorkoutType::Other
        )
    }

    /// Retention priority during injury reduction, lower keeps first
    pub fn retention_rank(&self) -> u8 {
        match self {
            WorkoutType::LongRun | WorkoutType::Race => 0,
            WorkoutType::Tempo => 1,
            WorkoutType::Interval => 2,
            WorkoutType::Hill => 3,
            WorkoutType::Easy => 4,
            WorkoutType::Recovery => 5,
            WorkoutType::CrossTraining | WorkoutType::Other => 6,
            WorkoutType::Rest => u8::MAX,
        }
    }
}

/// Cross-training equipment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    /// Deep-water (aqua) running
    Pool,
    Elliptical,
    StationaryBike,
    Swimming,
    Rowing,
    StandUpBike,
}

impl Equipment {
    pub const ALL: [Equipment; 6] = [
        Equipment::Pool,
        Equipment::Elliptical,
        Equipment::StationaryBike,
        Equipment::Swimming,
        Equipment::Rowing,
        Equipment::StandUpBike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Equipment::Pool => "pool",
            Equipment::Elliptical => "elliptical",
            Equipment::StationaryBike => "stationary_bike",
            Equipment::Swimming => "swimming",
            Equipment::Rowing => "rowing",
            Equipment::StandUpBike => "stand_up_bike",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Equipment::Pool => "Aqua Running",
            Equipment::Elliptical => "Elliptical",
            Equipment::StationaryBike => "Stationary Bike",
            Equipment::Swimming => "Swimming",
            Equipment::Rowing => "Rowing",
            Equipment::StandUpBike => "Stand-Up Bike",
        }
    }
}

/// One calendar day of a realized plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub day: Day,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Distance in miles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Free-form duration, e.g. "45 min" or "1:15"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_training_type: Option<Equipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Workout {
    /// Rest entry for the given calendar day
    pub fn rest(day: Day, date: NaiveDate) -> Self {
        Self {
            day,
            date,
            workout_type: WorkoutType::Rest,
            name: "Rest Day".to_string(),
            description: "Rest and recover.".to_string(),
            distance: None,
            duration: None,
            pace: None,
            cross_training_type: None,
            notes: None,
        }
    }

    /// Name and description joined, for keyword checks
    pub fn text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// First and last calendar day of a realized week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One week of a realized, day-level plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedWeek {
    pub week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_dates: Option<WeekDates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub total_mileage: f64,
    pub workouts: Vec<Workout>,
}

impl RealizedWeek {
    /// Entries that are not rest days
    pub fn training_workouts(&self) -> impl Iterator<Item = &Workout> {
        self.workouts
            .iter()
            .filter(|w| w.workout_type != WorkoutType::Rest)
    }

    /// Sum of running distances in the week
    pub fn running_mileage(&self) -> f64 {
        self.workouts
            .iter()
            .filter(|w| w.workout_type.is_running())
            .filter_map(|w| w.distance)
            .sum()
    }
}

/// Plan-level summary fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanOverview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_distance: Option<RaceDistance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_weeks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_weekly_mileage: Option<f64>,
}

/// Runner profile and scheduling preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
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
    #[serde(default, alias = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, alias = "raceDate")]
    pub race_date: Option<NaiveDate>,
    /// Days reserved for quality sessions
    #[serde(default, alias = "hardDays")]
    pub hard_days: Vec<Day>,
    #[serde(default, alias = "restDays")]
    pub rest_days: Vec<Day>,
    #[serde(default, alias = "longRunDay")]
    pub long_run_day: Day,
}

/// Injury-recovery window attached to a plan while recovery is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRecoveryInfo {
    /// First week without running
    pub start_week: u32,
    /// Last week without running
    pub end_week: u32,
    /// Mixed running/cross-training week
    pub return_week: u32,
    pub selected_equipment: Vec<Equipment>,
    pub weeks_off_running: u32,
    pub reduce_training_days: u8,
    /// Spans reshaped by earlier activations that now lie in completed weeks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub earlier_windows: Vec<WeekSpan>,
}

impl InjuryRecoveryInfo {
    /// Week lies in the injury or return span, or in an earlier reshaped span
    pub fn covers(&self, week: u32) -> bool {
        self.window().covers(week) || self.earlier_windows.iter().any(|span| span.covers(week))
    }

    /// Injury weeks through the return week of this activation
    pub fn window(&self) -> WeekSpan {
        WeekSpan {
            start_week: self.start_week,
            end_week: self.return_week,
        }
    }
}

/// Inclusive range of 1-based weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSpan {
    pub start_week: u32,
    pub end_week: u32,
}

impl WeekSpan {
    pub fn covers(&self, week: u32) -> bool {
        week >= self.start_week && week <= self.end_week
    }

    /// Part of the span before `week`, if any
    pub fn before(&self, week: u32) -> Option<WeekSpan> {
        let end_week = self.end_week.min(week.checked_sub(1)?);
        (self.start_week <= end_week).then_some(WeekSpan {
            start_week: self.start_week,
            end_week,
        })
    }
}

/// Full copy of a plan's weeks and overview, captured for undo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub snapshot_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub overview: PlanOverview,
    pub weeks: Vec<RealizedWeek>,
    /// Weeks were read from the legacy `training_weeks` field
    #[serde(default)]
    pub from_training_weeks: bool,
}

impl PlanSnapshot {
    pub fn capture(overview: PlanOverview, weeks: Vec<RealizedWeek>) -> Self {
        Self {
            snapshot_id: Uuid::new_v4(),
            captured_at: Utc::now(),
            overview,
            weeks,
            from_training_weeks: false,
        }
    }
}

/// Named slots in the plan version arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanVersion {
    PreInjury,
}

/// Arena of saved plan versions; the live plan itself is the current version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanVersions {
    versions: BTreeMap<PlanVersion, PlanSnapshot>,
}

impl PlanVersions {
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, version: PlanVersion) -> Option<&PlanSnapshot> {
        self.versions.get(&version)
    }

    pub fn insert(&mut self, version: PlanVersion, snapshot: PlanSnapshot) {
        self.versions.insert(version, snapshot);
    }

    pub fn remove(&mut self, version: PlanVersion) -> Option<PlanSnapshot> {
        self.versions.remove(&version)
    }
}

/// A realized plan plus its recovery state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    #[serde(default)]
    pub overview: PlanOverview,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<Vec<RealizedWeek>>,
    /// Week list under its pre-rename field name
    #[serde(
        default,
        rename = "training_weeks",
        alias = "trainingWeeks",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_weeks: Option<Vec<RealizedWeek>>,
    /// Skeleton the weeks were realized from, used to patch missing weeks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<PlanSkeleton>,
    #[serde(default, alias = "injuryRecoveryActive")]
    pub injury_recovery_active: bool,
    #[serde(
        default,
        alias = "injuryRecoveryInfo",
        skip_serializing_if = "Option::is_none"
    )]
    pub injury_recovery_info: Option<InjuryRecoveryInfo>,
    #[serde(default, skip_serializing_if = "PlanVersions::is_empty")]
    pub versions: PlanVersions,
}

impl TrainingPlan {
    pub fn new(overview: PlanOverview, weeks: Vec<RealizedWeek>) -> Self {
        Self {
            overview,
            weeks: Some(weeks),
            ..Default::default()
        }
    }

    /// Week list, preferring the current field over the legacy one
    pub fn week_list(&self) -> Option<&[RealizedWeek]> {
        self.weeks
            .as_deref()
            .or(self.legacy_weeks.as_deref())
    }

    /// Snapshot taken when injury recovery was activated
    pub fn original_plan_before_injury(&self) -> Option<&PlanSnapshot> {
        self.versions.get(PlanVersion::PreInjury)
    }
}

/// Validation check identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCheck {
    ParsingCompleteness,
    HardDayFidelity,
    RestDayFidelity,
    EquivalentDistance,
    LongRunPresence,
    LongRunDistance,
    CalendarIntegrity,
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub check: ValidationCheck,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Day>,
    pub message: String,
}

/// Advisory result of plan validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Issues raised by one check
    pub fn issues_for(&self, check: ValidationCheck) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().filter(move |e| e.check == check)
    }
}
