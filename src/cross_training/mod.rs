//! Cross-training selection
//!
//! This module maps running categories to intensity buckets, spreads sessions
//! over the runner's equipment and looks up workouts in per-equipment content
//! libraries. Libraries only choose a category and duration match; the
//! content itself is opaque data.

mod builtin;
mod library;

pub use builtin::builtin_library;
pub use library::{TableLibrary, WorkoutTemplate};

use crate::types::{Equipment, WorkoutType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Intensity category used to query content libraries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntensityBucket {
    Easy,
    Tempo,
    Intervals,
    Long,
    Hills,
    Recovery,
}

impl IntensityBucket {
    pub fn label(&self) -> &'static str {
        match self {
            IntensityBucket::Easy => "EASY",
            IntensityBucket::Tempo => "TEMPO",
            IntensityBucket::Intervals => "INTERVALS",
            IntensityBucket::Long => "LONG",
            IntensityBucket::Hills => "HILLS",
            IntensityBucket::Recovery => "RECOVERY",
        }
    }

    /// Bucket for the running category a slot held
    pub fn from_workout_type(workout_type: WorkoutType) -> Self {
        match workout_type {
            WorkoutType::Tempo => IntensityBucket::Tempo,
            WorkoutType::Interval => IntensityBucket::Intervals,
            WorkoutType::Hill => IntensityBucket::Hills,
            WorkoutType::LongRun | WorkoutType::Race => IntensityBucket::Long,
            WorkoutType::Recovery | WorkoutType::Rest => IntensityBucket::Recovery,
            WorkoutType::Easy | WorkoutType::CrossTraining | WorkoutType::Other => {
                IntensityBucket::Easy
            }
        }
    }

    /// Bucket actually offered by `equipment`.
    ///
    /// Water and rowing have no hill work, so hills become intervals there.
    pub fn for_equipment(self, equipment: Equipment) -> Self {
        match (self, equipment) {
            (
                IntensityBucket::Hills,
                Equipment::Pool | Equipment::Swimming | Equipment::Rowing,
            ) => IntensityBucket::Intervals,
            (bucket, _) => bucket,
        }
    }
}

impl fmt::Display for IntensityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Workout content returned by a library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTrainingWorkout {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<String>,
    pub duration: String,
    pub intensity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technique: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coaching_tips: Option<Vec<String>>,
}

impl CrossTrainingWorkout {
    /// Fallback used when a library has nothing for the request
    pub fn placeholder(equipment: Equipment, bucket: IntensityBucket, minutes: u32) -> Self {
        Self {
            name: format!("{} – {}", equipment.display_name(), bucket.label()),
            description: format!(
                "{minutes} minutes of {} at {} effort.",
                equipment.display_name().to_lowercase(),
                bucket.label().to_lowercase()
            ),
            structure: None,
            duration: format_minutes(minutes),
            intensity: bucket.label().to_string(),
            benefits: None,
            technique: None,
            effort: None,
            coaching_tips: None,
        }
    }
}

/// Content provider for one equipment type
pub trait CrossTrainingLibrary: Send + Sync {
    fn equipment(&self) -> Equipment;

    /// Workout for the bucket closest to `minutes`, if the library has one
    fn get_workout_by_duration(
        &self,
        bucket: IntensityBucket,
        minutes: u32,
    ) -> Option<CrossTrainingWorkout>;
}

/// Libraries keyed by equipment
pub struct CrossTrainingCatalog {
    libraries: BTreeMap<Equipment, Box<dyn CrossTrainingLibrary>>,
}

impl CrossTrainingCatalog {
    pub fn empty() -> Self {
        Self {
            libraries: BTreeMap::new(),
        }
    }

    /// Catalog holding the six built-in libraries
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for equipment in Equipment::ALL {
            catalog.register(Box::new(builtin_library(equipment)));
        }
        catalog
    }

    /// Add or replace the library for its equipment
    pub fn register(&mut self, library: Box<dyn CrossTrainingLibrary>) {
        self.libraries.insert(library.equipment(), library);
    }

    pub fn library(&self, equipment: Equipment) -> Option<&dyn CrossTrainingLibrary> {
        self.libraries.get(&equipment).map(|l| l.as_ref())
    }

    /// Look up a workout, substituting buckets the equipment lacks.
    ///
    /// Returns `None` when no library is registered or it has no match.
    pub fn find(
        &self,
        equipment: Equipment,
        bucket: IntensityBucket,
        minutes: u32,
    ) -> Option<CrossTrainingWorkout> {
        self.library(equipment)?
            .get_workout_by_duration(bucket.for_equipment(equipment), minutes)
    }
}

impl Default for CrossTrainingCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for CrossTrainingCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossTrainingCatalog")
            .field("equipment", &self.libraries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Assign `count` sessions to equipment in round-robin order.
///
/// Per-equipment counts differ by at most one. Empty when no equipment is
/// given.
pub fn distribute_round_robin(count: usize, equipment: &[Equipment]) -> Vec<Equipment> {
    if equipment.is_empty() {
        return Vec::new();
    }
    (0..count).map(|i| equipment[i % equipment.len()]).collect()
}

static CLOCK_DURATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})(?::\d{2})?\s*$").ok());

static HOURS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:h|hr|hrs|hours?)\b").ok());

static MINUTES: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:m|min|mins|minutes?)\b").ok());

static BARE_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*$").ok());

/// Parse a free-form duration into whole minutes.
///
/// Accepts `"45 min"`, `"1 hr 15 min"`, `"1.5 hours"`, `"1:15"` (h:mm) and a
/// bare number of minutes.
pub fn parse_duration_minutes(value: &str) -> Option<u32> {
    if let Some(caps) = CLOCK_DURATION.as_ref().and_then(|re| re.captures(value)) {
        let hours: u32 = caps[1].parse().ok()?;
        let minutes: u32 = caps[2].parse().ok()?;
        return Some(hours * 60 + minutes).filter(|m| *m > 0);
    }

    let mut total = 0.0;
    let mut matched = false;
    if let Some(caps) = HOURS.as_ref().and_then(|re| re.captures(value)) {
        total += caps[1].parse::<f64>().ok()? * 60.0;
        matched = true;
    }
    if let Some(caps) = MINUTES.as_ref().and_then(|re| re.captures(value)) {
        total += caps[1].parse::<f64>().ok()?;
        matched = true;
    }
    if !matched {
        let caps = BARE_NUMBER.as_ref()?.captures(value)?;
        total = caps[1].parse().ok()?;
    }

    let minutes = total.round();
    (minutes >= 1.0).then_some(minutes as u32)
}

/// Render minutes the way durations are stored on workouts
pub fn format_minutes(minutes: u32) -> String {
    format!("{minutes} min")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_round_robin_seven_over_three() {
        let equipment = [Equipment::Pool, Equipment::Elliptical, Equipment::Rowing];
        let assigned = distribute_round_robin(7, &equipment);

        let mut counts: HashMap<Equipment, usize> = HashMap::new();
        for e in &assigned {
            *counts.entry(*e).or_default() += 1;
        }
        let mut values: Vec<_> = counts.values().copied().collect();
        values.sort_unstable();
        assert_eq!(values, vec![2, 2, 3]);
        assert_eq!(assigned[0], Equipment::Pool);
        assert_eq!(assigned[3], Equipment::Pool);
    }

    #[test]
    fn test_round_robin_empty_equipment() {
        assert!(distribute_round_robin(4, &[]).is_empty());
    }

    #[test]
    fn test_hills_substitution() {
        for equipment in [Equipment::Pool, Equipment::Swimming, Equipment::Rowing] {
            assert_eq!(
                IntensityBucket::Hills.for_equipment(equipment),
                IntensityBucket::Intervals
            );
        }
        assert_eq!(
            IntensityBucket::Hills.for_equipment(Equipment::StationaryBike),
            IntensityBucket::Hills
        );
        assert_eq!(
            IntensityBucket::Tempo.for_equipment(Equipment::Pool),
            IntensityBucket::Tempo
        );
    }

    #[test]
    fn test_bucket_from_type() {
        assert_eq!(
            IntensityBucket::from_workout_type(WorkoutType::LongRun),
            IntensityBucket::Long
        );
        assert_eq!(
            IntensityBucket::from_workout_type(WorkoutType::Interval),
            IntensityBucket::Intervals
        );
        assert_eq!(
            IntensityBucket::from_workout_type(WorkoutType::Easy),
            IntensityBucket::Easy
        );
    }

    #[test]
    fn test_parse_duration_formats() {
        assert_eq!(parse_duration_minutes("45 min"), Some(45));
        assert_eq!(parse_duration_minutes("45 minutes"), Some(45));
        assert_eq!(parse_duration_minutes("1:15"), Some(75));
        assert_eq!(parse_duration_minutes("1 hr 15 min"), Some(75));
        assert_eq!(parse_duration_minutes("1.5 hours"), Some(90));
        assert_eq!(parse_duration_minutes("2h"), Some(120));
        assert_eq!(parse_duration_minutes("60"), Some(60));
        assert_eq!(parse_duration_minutes("easy"), None);
        assert_eq!(parse_duration_minutes("0 min"), None);
    }

    #[test]
    fn test_builtin_catalog_has_every_equipment() {
        let catalog = CrossTrainingCatalog::builtin();
        for equipment in Equipment::ALL {
            let library = catalog.library(equipment).unwrap();
            assert_eq!(library.equipment(), equipment);
            assert!(catalog.find(equipment, IntensityBucket::Easy, 40).is_some());
        }
    }

    #[test]
    fn test_catalog_substitutes_before_lookup() {
        let catalog = CrossTrainingCatalog::builtin();
        let workout = catalog
            .find(Equipment::Pool, IntensityBucket::Hills, 40)
            .unwrap();
        assert_eq!(workout.intensity, "INTERVALS");
    }

    #[test]
    fn test_placeholder_name() {
        let workout = CrossTrainingWorkout::placeholder(Equipment::Elliptical, IntensityBucket::Tempo, 50);
        assert_eq!(workout.name, "Elliptical – TEMPO");
        assert_eq!(workout.duration, "50 min");
    }

    #[test]
    fn test_empty_catalog_finds_nothing() {
        let catalog = CrossTrainingCatalog::empty();
        assert!(catalog.find(Equipment::Rowing, IntensityBucket::Easy, 30).is_none());
    }

    proptest! {
        #[test]
        fn test_round_robin_spread_at_most_one(count in 0usize..60, n in 1usize..=6) {
            let equipment = &Equipment::ALL[..n];
            let assigned = distribute_round_robin(count, equipment);
            prop_assert_eq!(assigned.len(), count);

            let counts: Vec<usize> = equipment
                .iter()
                .map(|e| assigned.iter().filter(|a| *a == e).count())
                .collect();
            let max = counts.iter().copied().max().unwrap_or(0);
            let min = counts.iter().copied().min().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }
}
