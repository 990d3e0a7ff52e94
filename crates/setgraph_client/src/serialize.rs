//! Date-range filtering and the two flat serializations.

use chrono::{DateTime, Utc};

use crate::domain::{ExportData, Workout};

/// Inclusive date range; an unset bound is unbounded.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Both endpoint comparisons are non-strict.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let after_start = self.from.map_or(true, |from| instant >= from);
        let before_end = self.to.map_or(true, |to| instant <= to);
        after_start && before_end
    }
}

/// Keep only workouts whose start timestamp falls within the range.
///
/// A workout with no start timestamp (or one that does not parse as
/// RFC 3339) is always excluded. `totalWorkouts` is recomputed; the export
/// stamp is kept.
pub fn filter_by_range(data: ExportData, range: &DateRange) -> ExportData {
    let workouts: Vec<Workout> = data
        .workouts
        .into_iter()
        .filter(|workout| workout_start(workout).is_some_and(|start| range.contains(start)))
        .collect();
    ExportData {
        exported_at: data.exported_at,
        total_workouts: workouts.len(),
        workouts,
    }
}

fn workout_start(workout: &Workout) -> Option<DateTime<Utc>> {
    let raw = workout.started_at.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

const CSV_HEADER: &str =
    "date,workoutName,exerciseName,setNumber,weightKg,reps,rpe,distance,duration,status";

/// Render the export as CSV, one row per set.
///
/// Completed sets of an exercise come before its skipped sets; set numbers
/// restart at 1 for each exercise and run through the concatenation. The
/// two name columns are always quoted, with embedded quotes doubled; every
/// other column is written raw, absent values as empty strings.
pub fn to_csv(data: &ExportData) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');

    for workout in &data.workouts {
        let date = workout.started_at.as_deref().unwrap_or("");
        let workout_name = quote(workout.name.as_deref().unwrap_or(""));
        for exercise in &workout.exercises {
            let exercise_name = quote(&exercise.name);
            let rows = exercise
                .completed_sets
                .iter()
                .map(|set| (set, "completed"))
                .chain(exercise.skipped_sets.iter().map(|set| (set, "skipped")));
            for (set_number, (set, status)) in rows.enumerate() {
                out.push_str(&format!(
                    "{date},{workout_name},{exercise_name},{},{},{},{},{},{},{status}\n",
                    set_number + 1,
                    opt(set.weight_kg),
                    opt(set.reps),
                    opt(set.rpe),
                    opt(set.distance),
                    set.duration.as_deref().unwrap_or(""),
                ));
            }
        }
    }
    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

/// Render the export as pretty JSON with absent fields omitted.
pub fn to_json(data: &ExportData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}
