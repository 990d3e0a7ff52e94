//! Wire-format payloads returned by the SetGraph API.
//!
//! Everything here is deserialization-only. Optional fields default to
//! absent and unrecognized enum tags fall back to `Unknown`, so a log entry
//! the backend extends later still decodes instead of failing the fetch.

use serde::Deserialize;

/// HAL-style `_links` object carried by pages and cell-set groups.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<Link>,
    #[serde(default)]
    pub measurement: Option<Link>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

/// One numbered page of a measurement catalog.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MeasurementPage {
    #[serde(default)]
    pub items: Vec<MeasurementItem>,
    #[serde(default, rename = "_links")]
    pub links: Links,
}

/// An exercise definition: id plus the two name fields.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_name: Option<String>,
}

impl MeasurementItem {
    /// Display name fallback chain: custom name, primary name, id.
    pub fn display_name(&self) -> &str {
        [self.custom_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(&self.id)
    }
}

/// One continuation-token batch of the log feed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LogPage {
    #[serde(default)]
    pub logs: Vec<RawLog>,
    #[serde(default, rename = "_links")]
    pub links: Links,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    Workout,
    Log,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A raw workout log as returned by the feed.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub log_type: LogKind,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub timezone_id: Option<String>,
    #[serde(default)]
    pub cell_set_group: Vec<CellSetGroup>,
}

/// All sets performed for one exercise within one log.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSetGroup {
    #[serde(default, rename = "_links")]
    pub links: Links,
    #[serde(default)]
    pub cell_sets: Vec<CellSet>,
}

impl CellSetGroup {
    /// The measurement id is the trailing path segment of the measurement
    /// link's href.
    pub fn measurement_id(&self) -> Option<&str> {
        let href = self.links.measurement.as_ref()?.href.as_str();
        href.trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }
}

/// One performed set: an ordered cell sequence plus a tri-state completed
/// flag (absent is distinct from false).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSet {
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub cell_type: CellKind,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellKind {
    Weight,
    BarbellWeight,
    DumbbellWeight,
    MachineWeight,
    Reps,
    Rpe,
    Distance,
    Duration,
    RestTimer,
    Note,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CellKind {
    /// The four weight tags are synonyms; one canonical weight per set.
    pub fn is_weight(self) -> bool {
        matches!(
            self,
            CellKind::Weight
                | CellKind::BarbellWeight
                | CellKind::DumbbellWeight
                | CellKind::MachineWeight
        )
    }

    /// Rest timers and notes mark a cell set that is not a performed set.
    pub fn is_marker(self) -> bool {
        matches!(self, CellKind::RestTimer | CellKind::Note)
    }
}
