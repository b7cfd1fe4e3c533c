//! Detail view model
//!
//! The sections of a machine's detail view, independent of how they are drawn.

use crate::fleet::{
    CheckKind, CheckOutcome, MachineRecord, MachineStatus, format_datetime, format_relative,
};
use chrono::{DateTime, Utc};

/// One labelled entry in a detail section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: String,
    pub value: String,
    /// Supporting text under the value.
    pub note: Option<String>,
    /// Set for check fields that carry a verdict.
    pub outcome: Option<CheckOutcome>,
}

impl DetailField {
    fn plain(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            note: None,
            outcome: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub title: &'static str,
    pub fields: Vec<DetailField>,
}

/// Title of the detail view for `machine_id`.
pub fn detail_title(machine_id: &str) -> String {
    format!("Machine Details - {}", machine_id)
}

/// General information, security checks and system checks. Raw data is
/// rendered separately from [`MachineRecord::raw_json`].
pub fn detail_sections(record: &MachineRecord, now: DateTime<Utc>) -> Vec<DetailSection> {
    let status = MachineStatus::derive(record);
    let last_seen = record.observed_at();
    let last_check_in = match (&record.timestamp, last_seen) {
        (_, Some(ts)) => format!("{} ({})", format_datetime(Some(ts)), format_relative(Some(ts), now)),
        (Some(raw), None) => raw.clone(),
        (None, None) => format_datetime(None),
    };

    vec![
        DetailSection {
            title: "General Information",
            fields: vec![
                DetailField::plain("Machine ID", record.machine_id.clone()),
                DetailField::plain("Operating System", record.os_name().to_string()),
                DetailField::plain("Overall Status", status.label().to_string()),
                DetailField::plain("Last Check-in", last_check_in),
            ],
        },
        DetailSection {
            title: "Security Checks",
            fields: vec![
                check_field(record, CheckKind::DiskEncryption),
                check_field(record, CheckKind::Antivirus),
            ],
        },
        DetailSection {
            title: "System Checks",
            fields: vec![
                check_field(record, CheckKind::OsUpdate),
                check_field(record, CheckKind::SleepSettings),
            ],
        },
    ]
}

fn check_field(record: &MachineRecord, kind: CheckKind) -> DetailField {
    if !record.has_check(kind) {
        return DetailField::plain(&kind.to_string(), "No data available".to_string());
    }

    let outcome = CheckOutcome::of(record, kind);
    let mut note = record
        .check_details(kind)
        .unwrap_or("No additional details")
        .to_string();
    if kind == CheckKind::SleepSettings {
        if let Some(minutes) = record
            .sleep_settings
            .as_ref()
            .and_then(|s| s.sleep_timeout_minutes)
        {
            note = format!("{} (timeout: {} min)", note, minutes);
        }
    }

    DetailField {
        label: kind.to_string(),
        value: outcome.verdict().to_string(),
        note: Some(note),
        outcome: Some(outcome),
    }
}

/// Pretty-printed raw record.
pub fn raw_data(record: &MachineRecord) -> String {
    serde_json::to_string_pretty(&record.raw_json()).unwrap_or_default()
}
