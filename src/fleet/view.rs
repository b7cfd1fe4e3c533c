//! View model: summary statistics and the ordered list of visible records

use super::filter::FilterCriteria;
use super::record::MachineRecord;
use super::sort::SortState;
use super::status::MachineStatus;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Card headers show at most this many characters of a machine ID.
pub const CARD_ID_LEN: usize = 20;

/// Layout used to present the visible machines.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Table => ViewMode::Cards,
            ViewMode::Cards => ViewMode::Table,
        }
    }
}

/// Summary counters shown above the machine list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetStats {
    pub total: usize,
    pub healthy: usize,
    /// Everything that is not healthy, warnings included.
    pub with_issues: usize,
    pub latest: Option<DateTime<Utc>>,
}

impl FleetStats {
    pub fn compute(records: &[MachineRecord]) -> Self {
        let total = records.len();
        let healthy = records
            .iter()
            .filter(|r| MachineStatus::derive(r) == MachineStatus::Healthy)
            .count();
        let latest = records.iter().filter_map(|r| r.observed_at()).max();

        Self {
            total,
            healthy,
            with_issues: total - healthy,
            latest,
        }
    }

    /// "Last update" figure for the header.
    pub fn last_update(&self, now: DateTime<Utc>) -> String {
        format_relative(self.latest, now)
    }
}

/// Indices of the records that pass `criteria`, in `sort` order.
pub fn build_view(
    records: &[MachineRecord],
    criteria: &FilterCriteria,
    sort: &SortState,
) -> Vec<usize> {
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect();
    sort.sort_indices(records, &mut indices);
    indices
}

pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 machine".to_string()
    } else {
        format!("{} machines", count)
    }
}

/// Coarse age of a report, e.g. "5m ago".
pub fn format_relative(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = ts else {
        return "--".to_string();
    };

    let minutes = (now - ts).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

/// Shorten long IDs to `max` characters followed by "...".
pub fn truncate_id(id: &str, max: usize) -> String {
    if id.chars().count() > max {
        let head: String = id.chars().take(max).collect();
        format!("{}...", head)
    } else {
        id.to_string()
    }
}

/// Full local date and time, or "Unknown" when the server sent none.
pub fn format_datetime(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "Unknown".to_string(),
    }
}
