//! Sort order for the machine list

use super::record::MachineRecord;
use super::status::MachineStatus;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SortColumn {
    MachineId,
    Os,
    Status,
    Timestamp,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::MachineId,
        SortColumn::Os,
        SortColumn::Status,
        SortColumn::Timestamp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::MachineId => "machine_id",
            SortColumn::Os => "os",
            SortColumn::Status => "status",
            SortColumn::Timestamp => "timestamp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::MachineId => "Machine ID",
            SortColumn::Os => "OS",
            SortColumn::Status => "Status",
            SortColumn::Timestamp => "Last Seen",
        }
    }

    fn compare(&self, a: &MachineRecord, b: &MachineRecord) -> Ordering {
        match self {
            SortColumn::MachineId => compare_text(&a.machine_id, &b.machine_id),
            SortColumn::Os => compare_text(
                a.os.as_deref().unwrap_or_default(),
                b.os.as_deref().unwrap_or_default(),
            ),
            SortColumn::Status => MachineStatus::derive(a).cmp(&MachineStatus::derive(b)),
            // Missing or unparseable timestamps sort as the oldest.
            SortColumn::Timestamp => a.observed_at().cmp(&b.observed_at()),
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "machine_id" | "id" => Ok(SortColumn::MachineId),
            "os" => Ok(SortColumn::Os),
            "status" => Ok(SortColumn::Status),
            "timestamp" | "last_seen" => Ok(SortColumn::Timestamp),
            other => Err(format!(
                "unknown sort column '{}', expected one of: machine_id, os, status, timestamp",
                other
            )),
        }
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Current sort column and direction. Newest reports first by default.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Timestamp,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Re-selecting the active column flips direction; a new column starts
    /// descending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.flipped();
        } else {
            self.column = column;
            self.direction = SortDirection::Desc;
        }
    }

    pub fn compare(&self, a: &MachineRecord, b: &MachineRecord) -> Ordering {
        let ordering = self.column.compare(a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable in-place sort of record indices.
    pub fn sort_indices(&self, records: &[MachineRecord], indices: &mut [usize]) {
        indices.sort_by(|&a, &b| self.compare(&records[a], &records[b]));
    }
}
