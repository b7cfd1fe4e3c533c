//! Status derivation for checks and machines

use super::record::{CheckKind, MachineRecord};
use strum::Display;

/// Result of a single compliance check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum CheckOutcome {
    Pass,
    Fail,
    Unknown,
}

impl CheckOutcome {
    pub fn of(record: &MachineRecord, kind: CheckKind) -> Self {
        match record.check_value(kind) {
            Some(true) => CheckOutcome::Pass,
            Some(false) => CheckOutcome::Fail,
            None => CheckOutcome::Unknown,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CheckOutcome::Pass => "✔",
            CheckOutcome::Fail => "✘",
            CheckOutcome::Unknown => "?",
        }
    }

    /// Verdict line used in detail views.
    pub fn verdict(&self) -> &'static str {
        match self {
            CheckOutcome::Pass => "✓ Pass",
            CheckOutcome::Fail => "✗ Fail",
            CheckOutcome::Unknown => "? Unknown",
        }
    }
}

/// Overall posture of a machine, ordered by severity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum MachineStatus {
    #[strum(to_string = "healthy")]
    Healthy,
    #[strum(to_string = "warning")]
    Warning,
    #[strum(to_string = "critical")]
    Critical,
}

impl MachineStatus {
    /// Any failed check makes a machine critical; otherwise any check without a
    /// verdict makes it a warning.
    pub fn derive(record: &MachineRecord) -> Self {
        let mut failed = 0;
        let mut unknown = 0;
        for kind in CheckKind::ALL {
            match CheckOutcome::of(record, kind) {
                CheckOutcome::Fail => failed += 1,
                CheckOutcome::Unknown => unknown += 1,
                CheckOutcome::Pass => {}
            }
        }

        if failed > 0 {
            MachineStatus::Critical
        } else if unknown > 0 {
            MachineStatus::Warning
        } else {
            MachineStatus::Healthy
        }
    }

    /// Badge text.
    pub fn label(&self) -> &'static str {
        match self {
            MachineStatus::Healthy => "Healthy",
            MachineStatus::Warning => "Warning",
            MachineStatus::Critical => "Issues",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MachineStatus::Healthy => "●",
            MachineStatus::Warning => "▲",
            MachineStatus::Critical => "✖",
        }
    }
}
