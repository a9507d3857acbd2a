//! Table-driven content library

use super::{format_minutes, CrossTrainingLibrary, CrossTrainingWorkout, IntensityBucket};
use crate::types::Equipment;

/// One static workout entry
#[derive(Debug, Clone, Copy)]
pub struct WorkoutTemplate {
    pub bucket: IntensityBucket,
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub structure: Option<&'static str>,
    pub benefits: Option<&'static str>,
    pub technique: Option<&'static str>,
    pub effort: Option<&'static str>,
    pub coaching_tips: &'static [&'static str],
}

impl WorkoutTemplate {
    fn covers(&self, minutes: u32) -> bool {
        (self.min_minutes..=self.max_minutes).contains(&minutes)
    }

    fn realize(&self, minutes: u32) -> CrossTrainingWorkout {
        CrossTrainingWorkout {
            name: self.name.to_string(),
            description: self.description.to_string(),
            structure: self.structure.map(str::to_string),
            duration: format_minutes(minutes),
            intensity: self.bucket.label().to_string(),
            benefits: self.benefits.map(str::to_string),
            technique: self.technique.map(str::to_string),
            effort: self.effort.map(str::to_string),
            coaching_tips: (!self.coaching_tips.is_empty())
                .then(|| self.coaching_tips.iter().map(|t| t.to_string()).collect()),
        }
    }
}

/// Library backed by a static template table
#[derive(Debug, Clone, Copy)]
pub struct TableLibrary {
    equipment: Equipment,
    templates: &'static [WorkoutTemplate],
}

impl TableLibrary {
    pub const fn new(equipment: Equipment, templates: &'static [WorkoutTemplate]) -> Self {
        Self {
            equipment,
            templates,
        }
    }

    pub fn templates(&self) -> &'static [WorkoutTemplate] {
        self.templates
    }
}

impl CrossTrainingLibrary for TableLibrary {
    fn equipment(&self) -> Equipment {
        self.equipment
    }

    /// First template of the bucket whose range covers `minutes`
    fn get_workout_by_duration(
        &self,
        bucket: IntensityBucket,
        minutes: u32,
    ) -> Option<CrossTrainingWorkout> {
        self.templates
            .iter()
            .filter(|t| t.bucket == bucket)
            .find(|t| t.covers(minutes))
            .map(|t| t.realize(minutes))
    }
}
