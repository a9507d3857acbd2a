//! Stride - periodization and plan-regeneration engine for endurance training
//!
//! Stride turns a runner's current fitness and race goal into a week-by-week
//! numeric plan, reshapes realized plans around life events without touching
//! completed weeks, and checks realized plans against safety rules:
//! request validation → race calculator → plan skeleton → (external day
//! assignment) → merge / injury regeneration → validation.
//!
//! ## Modules
//!
//! - **Calculator**: `periodization`, `races`, `orchestrator`
//! - **Regeneration**: `merge`, `regeneration`, `injury`, `cross_training`
//! - **Validation**: `validation`
//! - **Surfaces**: `pipeline` (JSON + [`PlanEngine`]), `ffi` (C ABI)

pub mod config;
pub mod cross_training;
pub mod error;
pub mod injury;
pub mod merge;
pub mod orchestrator;
pub mod periodization;
pub mod pipeline;
pub mod races;
pub mod regeneration;
pub mod types;
pub mod validation;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::PlannerConfig;
pub use cross_training::{CrossTrainingCatalog, CrossTrainingLibrary, CrossTrainingWorkout, IntensityBucket};
pub use error::PlanError;
pub use injury::{apply_injury_recovery, cancel_injury_recovery, EquipmentSelection, InjuryRequest, RecoveryContext};
pub use merge::preserve_and_merge_weeks;
pub use orchestrator::{generate_plan_skeleton, normalize_race_distance, PlanRequest};
pub use pipeline::{
    apply_injury_recovery_json, cancel_injury_recovery_json, generate_plan_json,
    validate_plan_json, PlanEngine,
};
pub use races::RaceCalculator;
pub use regeneration::{regenerate_future_weeks, replan_from_request, DayAssigner};
pub use validation::validate_training_plan;

/// Stride version reported by the CLI and C ABI
pub const PLANNER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported alongside the version
pub const PRODUCER_NAME: &str = "stride-core";
