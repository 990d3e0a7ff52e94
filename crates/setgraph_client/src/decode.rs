//! Decoding of one raw cell set into a structured workout set.

use crate::domain::WorkoutSet;
use crate::models::{CellKind, CellSet};

/// A decoded set plus the completed flag taken verbatim from the source
/// cell set. Absent stays absent; it is not coerced to false.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedSet {
    pub set: WorkoutSet,
    pub is_completed: Option<bool>,
}

/// Decode one cell set.
///
/// Returns `None` when the cell set carries a rest-timer or note cell,
/// regardless of what else is present. Otherwise decoding is total: each
/// field is either parsed from the first matching cell or absent, never an
/// error.
pub fn decode_cell_set(cell_set: &CellSet) -> Option<DecodedSet> {
    if cell_set.cells.iter().any(|c| c.cell_type.is_marker()) {
        return None;
    }

    let set = WorkoutSet {
        weight_kg: first_value(cell_set, CellKind::is_weight).and_then(parse_f64),
        reps: first_value(cell_set, |k| k == CellKind::Reps).and_then(parse_u32),
        rpe: first_value(cell_set, |k| k == CellKind::Rpe).and_then(parse_f64),
        distance: first_value(cell_set, |k| k == CellKind::Distance).and_then(parse_f64),
        duration: first_value(cell_set, |k| k == CellKind::Duration).map(str::to_owned),
    };

    Some(DecodedSet {
        set,
        is_completed: cell_set.is_completed,
    })
}

/// First cell whose kind is accepted by `matches`, if it holds a non-empty
/// value. A later cell of the same kind never overrides the first match.
fn first_value(cell_set: &CellSet, matches: impl Fn(CellKind) -> bool) -> Option<&str> {
    cell_set
        .cells
        .iter()
        .find(|c| matches(c.cell_type))
        .and_then(|c| c.value.as_deref())
        .filter(|v| !v.is_empty())
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}
