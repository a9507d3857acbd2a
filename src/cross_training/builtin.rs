//! Built-in content tables for the six supported equipment types

use super::library::{TableLibrary, WorkoutTemplate};
use super::IntensityBucket::{self, Easy, Hills, Intervals, Long, Recovery, Tempo};
use crate::types::Equipment;

const fn entry(
    bucket: IntensityBucket,
    min_minutes: u32,
    max_minutes: u32,
    name: &'static str,
    description: &'static str,
    effort: &'static str,
) -> WorkoutTemplate {
    WorkoutTemplate {
        bucket,
        min_minutes,
        max_minutes,
        name,
        description,
        structure: None,
        benefits: None,
        technique: None,
        effort: Some(effort),
        coaching_tips: &[],
    }
}

const AQUA_RUNNING: &[WorkoutTemplate] = &[
    WorkoutTemplate {
        technique: Some("Upright posture, drive the knees, flex the ankles; no bouncing off the floor."),
        coaching_tips: &["Use a flotation belt", "Keep cadence high rather than stride long"],
        ..entry(Easy, 15, 90, "Easy Aqua Jog", "Continuous deep-water running at conversational effort.", "RPE 3-4")
    },
    WorkoutTemplate {
        structure: Some("10 min easy, 3 x 8 min steady-hard with 2 min easy, cool down"),
        ..entry(Tempo, 25, 90, "Aqua Tempo Blocks", "Sustained deep-water running blocks at threshold effort.", "RPE 7")
    },
    WorkoutTemplate {
        structure: Some("10 min easy, 10-12 x 1 min hard / 1 min easy, cool down"),
        benefits: Some("Keeps VO2max stimulus without impact."),
        ..entry(Intervals, 25, 75, "Aqua Intervals", "Short hard pool-running repeats with floating recoveries.", "RPE 8-9")
    },
    entry(Long, 40, 150, "Long Aqua Run", "Extended deep-water run replacing the weekly long run.", "RPE 4-5"),
    entry(Recovery, 15, 45, "Recovery Water Jog", "Very light pool running to loosen up.", "RPE 2"),
];

const ELLIPTICAL: &[WorkoutTemplate] = &[
    entry(Easy, 15, 90, "Easy Elliptical", "Steady elliptical session at easy running effort.", "RPE 3-4"),
    WorkoutTemplate {
        structure: Some("10 min easy, 20-30 min at threshold, 10 min easy"),
        ..entry(Tempo, 25, 90, "Elliptical Tempo", "Continuous threshold effort with a running-like cadence.", "RPE 7")
    },
    WorkoutTemplate {
        structure: Some("10 min easy, 6 x 3 min hard / 2 min easy, cool down"),
        ..entry(Intervals, 25, 75, "Elliptical Intervals", "Hard repeats with high stride rate and moderate resistance.", "RPE 8-9")
    },
    entry(Long, 40, 150, "Long Elliptical", "Extended aerobic session replacing the long run.", "RPE 4-5"),
    WorkoutTemplate {
        technique: Some("Raise the incline and keep a tall posture; push through the heels."),
        ..entry(Hills, 25, 75, "Elliptical Hill Repeats", "Repeats on a high incline to mimic uphill running.", "RPE 8")
    },
    entry(Recovery, 15, 45, "Recovery Elliptical", "Very light elliptical spin.", "RPE 2"),
];

const STATIONARY_BIKE: &[WorkoutTemplate] = &[
    entry(Easy, 15, 120, "Easy Spin", "Steady spin at a high cadence and light resistance.", "RPE 3-4"),
    entry(Tempo, 25, 90, "Tempo Ride", "Sustained threshold effort on the bike.", "RPE 7"),
    WorkoutTemplate {
        structure: Some("10 min easy, 8 x 2 min hard / 2 min easy, cool down"),
        ..entry(Intervals, 25, 75, "Bike Intervals", "Hard repeats at 90+ rpm.", "RPE 8-9")
    },
    WorkoutTemplate {
        benefits: Some("Builds aerobic endurance with no impact."),
        ..entry(Long, 45, 180, "Long Ride", "Extended steady ride replacing the long run.", "RPE 4-5")
    },
    WorkoutTemplate {
        structure: Some("10 min easy, 6 x 3 min heavy seated climb / 3 min easy, cool down"),
        ..entry(Hills, 25, 75, "Seated Climbs", "Heavy-resistance seated climbing repeats.", "RPE 8")
    },
    entry(Recovery, 15, 45, "Recovery Spin", "Very light spin to promote blood flow.", "RPE 2"),
];

const SWIMMING: &[WorkoutTemplate] = &[
    entry(Easy, 15, 90, "Easy Swim", "Continuous easy freestyle with relaxed breathing.", "RPE 3-4"),
    entry(Tempo, 25, 90, "Threshold Swim", "Broken threshold swimming with short rests.", "RPE 7"),
    WorkoutTemplate {
        structure: Some("Warm up, 10 x 50 hard with 20 s rest, cool down"),
        ..entry(Intervals, 20, 75, "Swim Sprints", "Short hard repeats with full recovery.", "RPE 8-9")
    },
    entry(Long, 40, 120, "Endurance Swim", "Long steady swim replacing the long run.", "RPE 4-5"),
    WorkoutTemplate {
        coaching_tips: &["Mix in backstroke", "Focus on long strokes"],
        ..entry(Recovery, 15, 45, "Recovery Swim", "Easy mixed-stroke swimming.", "RPE 2")
    },
];

const ROWING: &[WorkoutTemplate] = &[
    WorkoutTemplate {
        technique: Some("Legs, then back, then arms on the drive; reverse on the recovery."),
        ..entry(Easy, 15, 90, "Easy Row", "Steady rowing at 18-22 strokes per minute.", "RPE 3-4")
    },
    entry(Tempo, 25, 90, "Threshold Row", "Sustained rowing at threshold effort.", "RPE 7"),
    WorkoutTemplate {
        structure: Some("10 min easy, 8 x 500 m hard / 2 min easy, cool down"),
        ..entry(Intervals, 25, 75, "Rowing Intervals", "Hard pieces at a higher stroke rate.", "RPE 8-9")
    },
    entry(Long, 40, 120, "Long Row", "Extended steady row replacing the long run.", "RPE 4-5"),
    entry(Recovery, 15, 40, "Recovery Row", "Light technical rowing.", "RPE 2"),
];

const STAND_UP_BIKE: &[WorkoutTemplate] = &[
    WorkoutTemplate {
        benefits: Some("Closest running-specific posture of the bike options."),
        ..entry(Easy, 15, 90, "Easy Stand-Up Ride", "Steady ride on an elliptical-style stand-up bike.", "RPE 3-4")
    },
    entry(Tempo, 25, 90, "Stand-Up Tempo", "Sustained threshold effort standing.", "RPE 7"),
    entry(Intervals, 25, 75, "Stand-Up Intervals", "Short hard surges with easy spinning between.", "RPE 8-9"),
    entry(Long, 40, 150, "Long Stand-Up Ride", "Extended outdoor ride replacing the long run.", "RPE 4-5"),
    WorkoutTemplate {
        structure: Some("Warm up, 6-8 x 2 min uphill hard / ride down easy, cool down"),
        ..entry(Hills, 25, 75, "Stand-Up Hill Repeats", "Climbing repeats on a moderate grade.", "RPE 8")
    },
    entry(Recovery, 15, 45, "Recovery Stand-Up Ride", "Easy flat cruising.", "RPE 2"),
];

/// Built-in library for `equipment`
pub fn builtin_library(equipment: Equipment) -> TableLibrary {
    let templates = match equipment {
        Equipment::Pool => AQUA_RUNNING,
        Equipment::Elliptical => ELLIPTICAL,
        Equipment::StationaryBike => STATIONARY_BIKE,
        Equipment::Swimming => SWIMMING,
        Equipment::Rowing => ROWING,
        Equipment::StandUpBike => STAND_UP_BIKE,
    };
    TableLibrary::new(equipment, templates)
}
