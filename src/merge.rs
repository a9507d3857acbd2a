//! Plan merge engine
//!
//! Completed weeks are history. Every regeneration path keeps the weeks
//! before the current week verbatim and only replaces what follows.

use crate::error::PlanError;
use crate::types::{RealizedWeek, TrainingPlan};
use tracing::debug;

/// Keep weeks `1..current_week` of `existing_plan` and append `new_weeks`.
///
/// Reads the plan's `weeks` field, falling back to the legacy
/// `training_weeks` field. A prefix longer than the existing list is
/// truncated to what exists.
pub fn preserve_and_merge_weeks(
    existing_plan: &TrainingPlan,
    new_weeks: Vec<RealizedWeek>,
    current_week: u32,
) -> Result<Vec<RealizedWeek>, PlanError> {
    if current_week == 0 {
        return Err(PlanError::Configuration(
            "current_week is 1-based and must be at least 1".to_string(),
        ));
    }

    let existing = existing_plan.week_list().ok_or_else(|| {
        PlanError::Structural("plan has neither weeks nor training_weeks".to_string())
    })?;

    let keep = ((current_week - 1) as usize).min(existing.len());
    debug!(
        kept = keep,
        appended = new_weeks.len(),
        "merging regenerated weeks"
    );

    let mut merged = Vec::with_capacity(keep + new_weeks.len());
    merged.extend_from_slice(&existing[..keep]);
    merged.extend(new_weeks);
    Ok(merged)
}
