//! Reconciliation of raw logs and the measurement lookup into workouts.

use std::collections::HashMap;

use crate::decode::decode_cell_set;
use crate::domain::{Workout, WorkoutExercise};
use crate::models::{CellSetGroup, LogKind, RawLog};

/// Exercise name used when a measurement id has no entry in the lookup map.
pub const UNKNOWN_EXERCISE: &str = "Unknown";

/// Transform raw logs into the final ordered workout list.
///
/// Only `WORKOUT` and `LOG` entries survive. The output order is the
/// reverse of the input order: the server returns newest-last, callers
/// expect newest-first. Pure function; re-running on the same inputs
/// yields identical output.
pub fn transform_logs(logs: &[RawLog], lookup: &HashMap<String, String>) -> Vec<Workout> {
    let mut workouts: Vec<Workout> = logs
        .iter()
        .filter(|log| matches!(log.log_type, LogKind::Workout | LogKind::Log))
        .map(|log| to_workout(log, lookup))
        .collect();
    workouts.reverse();
    workouts
}

fn to_workout(log: &RawLog, lookup: &HashMap<String, String>) -> Workout {
    let exercises = log
        .cell_set_group
        .iter()
        .filter_map(|group| to_exercise(group, lookup))
        .collect();

    Workout {
        id: log.id.clone(),
        name: display_name(log),
        started_at: log.started_at.clone(),
        finished_at: log.finished_at.clone(),
        timezone: log.timezone_id.clone(),
        exercises,
    }
}

/// The custom name overrides the primary name when present.
fn display_name(log: &RawLog) -> Option<String> {
    [log.custom_name.as_deref(), log.name.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Returns `None` for a group with no decodable sets; such exercises are
/// dropped from their parent workout entirely.
fn to_exercise(group: &CellSetGroup, lookup: &HashMap<String, String>) -> Option<WorkoutExercise> {
    let name = group
        .measurement_id()
        .and_then(|id| lookup.get(id))
        .cloned()
        .unwrap_or_else(|| UNKNOWN_EXERCISE.to_string());

    let mut completed_sets = Vec::new();
    let mut skipped_sets = Vec::new();
    for decoded in group.cell_sets.iter().filter_map(decode_cell_set) {
        match decoded.is_completed {
            Some(false) => skipped_sets.push(decoded.set),
            _ => completed_sets.push(decoded.set),
        }
    }

    if completed_sets.is_empty() && skipped_sets.is_empty() {
        return None;
    }
    Some(WorkoutExercise {
        name,
        completed_sets,
        skipped_sets,
    })
}
