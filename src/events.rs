//! Event System
//!
//! Types and implementations for worker events and logging

use crate::fleet::{MachineRecord, count_label};
use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Worker {
    /// Task that polls the collection endpoint on a schedule.
    Poller,
    /// Short-lived task loading one machine for the detail view.
    #[strum(to_string = "Details")]
    DetailFetcher,
    /// Short-lived task downloading an export document.
    Exporter,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    StateChange,
}

/// Data carried from workers to the dashboard alongside the log message
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A collection fetch has started.
    Loading,
    Machines(Vec<MachineRecord>),
    LoadFailed(String),
    Detail {
        machine_id: String,
        record: Box<MachineRecord>,
    },
    DetailFailed {
        machine_id: String,
        message: String,
    },
    ExportSaved(PathBuf),
    ExportFailed(String),
    /// Polling paused or resumed.
    Polling { paused: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub worker: Worker,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    pub payload: Option<Payload>,
}

impl Event {
    fn new(worker: Worker, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            worker,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            payload: None,
        }
    }

    fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn loading() -> Self {
        Self::new(
            Worker::Poller,
            "Loading machine data...".to_string(),
            EventType::Refresh,
            LogLevel::Debug,
        )
        .with_payload(Payload::Loading)
    }

    pub fn machines(records: Vec<MachineRecord>) -> Self {
        Self::new(
            Worker::Poller,
            format!("Loaded {}", count_label(records.len())),
            EventType::Success,
            LogLevel::Info,
        )
        .with_payload(Payload::Machines(records))
    }

    pub fn load_failed(message: String, log_level: LogLevel) -> Self {
        Self::new(
            Worker::Poller,
            format!("Failed to load machine data: {}", message),
            EventType::Error,
            log_level,
        )
        .with_payload(Payload::LoadFailed(message))
    }

    pub fn polling(paused: bool, reason: &str) -> Self {
        let msg = if paused {
            format!("Auto-refresh paused ({})", reason)
        } else {
            format!("Auto-refresh resumed ({})", reason)
        };
        Self::new(Worker::Poller, msg, EventType::StateChange, LogLevel::Info)
            .with_payload(Payload::Polling { paused })
    }

    pub fn detail(machine_id: String, record: MachineRecord) -> Self {
        Self::new(
            Worker::DetailFetcher,
            format!("Loaded details for {}", machine_id),
            EventType::Success,
            LogLevel::Debug,
        )
        .with_payload(Payload::Detail {
            machine_id,
            record: Box::new(record),
        })
    }

    pub fn detail_failed(machine_id: String, message: String, log_level: LogLevel) -> Self {
        Self::new(
            Worker::DetailFetcher,
            format!("Failed to load machine details for {}: {}", machine_id, message),
            EventType::Error,
            log_level,
        )
        .with_payload(Payload::DetailFailed {
            machine_id,
            message,
        })
    }

    pub fn export_saved(path: PathBuf) -> Self {
        Self::new(
            Worker::Exporter,
            format!("Exported data to {}", path.display()),
            EventType::Success,
            LogLevel::Info,
        )
        .with_payload(Payload::ExportSaved(path))
    }

    pub fn export_failed(message: String) -> Self {
        Self::new(
            Worker::Exporter,
            format!("Export failed: {}", message),
            EventType::Error,
            LogLevel::Error,
        )
        .with_payload(Payload::ExportFailed(message))
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machines_event_counts_records() {
        let event = Event::machines(vec![MachineRecord::default(); 2]);
        assert_eq!(event.msg, "Loaded 2 machines");
        assert_eq!(event.worker, Worker::Poller);
        assert!(matches!(event.payload, Some(Payload::Machines(ref r)) if r.len() == 2));
        assert!(event.should_display());
    }

    #[test]
    fn failure_events_carry_the_bare_message() {
        let event = Event::load_failed("HTTP 500: Internal Server Error".to_string(), LogLevel::Warn);
        assert_eq!(
            event.msg,
            "Failed to load machine data: HTTP 500: Internal Server Error"
        );
        assert_eq!(
            event.payload,
            Some(Payload::LoadFailed("HTTP 500: Internal Server Error".to_string()))
        );
        assert_eq!(event.event_type, EventType::Error);
    }

    #[test]
    fn display_includes_type_and_message() {
        let event = Event::export_failed("disk full".to_string());
        let text = event.to_string();
        assert!(text.starts_with("Error ["));
        assert!(text.ends_with("Export failed: disk full"));
        assert_eq!(Worker::DetailFetcher.to_string(), "Details");
    }
}
