//! Dashboard state update logic
//!
//! Applies worker events and user actions to the dashboard state

use super::input::Action;
use super::state::{DashboardState, DetailModal, DetailState};
use super::utils::format_countdown;

use crate::consts::cli_consts::{refresh, search};
use crate::events::Payload;
use crate::workers::{Command, PauseReason};

use std::time::Instant;

impl DashboardState {
    /// Advance one UI tick: drain queued events and apply a settled search.
    pub fn update(&mut self, now: Instant) {
        self.tick += 1;

        // Process all queued events one by one
        while let Some(mut event) = self.pending_events.pop_front() {
            // The log keeps only the message; record payloads stay here.
            if let Some(payload) = event.payload.take() {
                self.process_payload(payload, &event.msg, now);
            }
            self.add_to_activity_log(event);
        }

        self.apply_pending_search(now);
    }

    /// Update relevant state from one event payload
    fn process_payload(&mut self, payload: Payload, msg: &str, now: Instant) {
        match payload {
            Payload::Loading => self.loading = true,
            Payload::Machines(records) => {
                self.loading = false;
                self.has_loaded = true;
                self.error = None;
                self.last_refresh = Some(now);
                self.set_records(records);
            }
            Payload::LoadFailed(message) => {
                // Keep showing the previous data under the banner.
                self.loading = false;
                self.last_refresh = Some(now);
                self.error = Some(format!("Failed to load machine data: {}", message));
            }
            Payload::Polling { paused } => self.paused = paused,
            Payload::Detail { machine_id, record } => {
                if let Some(modal) = self.detail_for(&machine_id) {
                    modal.state = DetailState::Loaded(record);
                }
            }
            Payload::DetailFailed {
                machine_id,
                message,
            } => {
                if let Some(modal) = self.detail_for(&machine_id) {
                    modal.state = DetailState::Failed(message);
                }
            }
            Payload::ExportSaved(_) | Payload::ExportFailed(_) => {
                self.status_message = Some(msg.to_string());
            }
        }
    }

    /// The open modal, if it is still waiting for `machine_id`.
    fn detail_for(&mut self, machine_id: &str) -> Option<&mut DetailModal> {
        self.detail
            .as_mut()
            .filter(|m| m.machine_id == machine_id && m.state == DetailState::Loading)
    }

    /// Apply the search text once typing has paused long enough.
    pub fn apply_pending_search(&mut self, now: Instant) {
        let Some(last_edit) = self.search.last_edit else {
            return;
        };
        if now.saturating_duration_since(last_edit) >= search::debounce() {
            self.commit_search();
        }
    }

    fn commit_search(&mut self) {
        self.search.last_edit = None;
        if self.filters.search != self.search.buffer {
            self.filters.search = self.search.buffer.clone();
            self.apply_filters();
        }
    }

    /// Apply a user action. Returns the command to forward to the poller, if any.
    pub fn handle_action(&mut self, action: Action, now: Instant) -> Option<Command> {
        match action {
            Action::Quit => {}
            Action::Refresh => return Some(Command::Refresh),
            Action::TogglePause => {
                self.user_paused = !self.user_paused;
                return Some(if self.user_paused {
                    Command::Pause(PauseReason::User)
                } else {
                    Command::Resume(PauseReason::User)
                });
            }
            Action::FocusChanged(false) => return Some(Command::Pause(PauseReason::Focus)),
            Action::FocusChanged(true) => {
                if !self.user_paused {
                    return Some(Command::Resume(PauseReason::Focus));
                }
            }
            Action::ToggleView => self.view_mode = self.view_mode.toggled(),
            Action::CycleOs => {
                self.filters.cycle_os(&self.os_options);
                self.apply_filters();
            }
            Action::CycleIssue => {
                self.filters.cycle_issue();
                self.apply_filters();
            }
            Action::StartSearch => {
                self.search.editing = true;
                self.search.buffer = self.filters.search.clone();
                self.search.original = self.filters.search.clone();
            }
            Action::SearchChar(c) => {
                self.search.buffer.push(c);
                self.search.last_edit = Some(now);
            }
            Action::SearchBackspace => {
                self.search.buffer.pop();
                self.search.last_edit = Some(now);
            }
            Action::SubmitSearch => {
                self.search.editing = false;
                self.commit_search();
            }
            Action::CancelSearch => {
                self.search.editing = false;
                self.search.buffer = self.search.original.clone();
                self.commit_search();
            }
            Action::ClearFilters => {
                self.filters.clear();
                self.search = Default::default();
                self.apply_filters();
            }
            Action::Sort(column) => {
                self.sort.toggle(column);
                self.apply_filters();
            }
            Action::SelectPrev => self.selected = self.selected.saturating_sub(1),
            Action::SelectNext => {
                if self.selected + 1 < self.visible.len() {
                    self.selected += 1;
                }
            }
            Action::SelectFirst => self.selected = 0,
            Action::SelectLast => self.selected = self.visible.len().saturating_sub(1),
            Action::OpenDetail => {
                let machine_id = self.selected_record()?.machine_id.clone();
                self.detail = Some(DetailModal::loading(machine_id.clone()));
                return Some(Command::LoadDetail(machine_id));
            }
            Action::CloseDetail => self.detail = None,
            Action::ScrollDetail(delta) => {
                if let Some(modal) = self.detail.as_mut() {
                    modal.scroll = modal.scroll.saturating_add_signed(delta);
                }
            }
            Action::AdjustInterval(delta) => {
                let secs = (self.refresh_interval.as_secs() as i64 + delta).max(0) as u64;
                self.refresh_interval = refresh::clamp_interval(secs);
                self.status_message = Some(format!(
                    "Auto-refresh every {}",
                    format_countdown(self.refresh_interval)
                ));
                return Some(Command::SetInterval(self.refresh_interval));
            }
            Action::Export(format) => {
                self.status_message = Some(format!("Exporting {}...", format));
                return Some(Command::Export(format));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ExportFormat;
    use crate::environment::Environment;
    use crate::events::Event as WorkerEvent;
    use crate::fleet::{IssueKind, MachineRecord, SortColumn, ViewMode};
    use crate::logging::LogLevel;
    use crate::ui::app::UIConfig;
    use serde_json::json;
    use std::time::Duration;

    fn record(id: &str, os: &str, encrypted: bool) -> MachineRecord {
        MachineRecord::from_value(json!({
            "machine_id": id,
            "os": os,
            "timestamp": "2025-05-01T08:00:00Z",
            "disk_encryption": { "encrypted": encrypted },
            "os_update": { "up_to_date": true },
            "antivirus": { "antivirus_present": true },
            "sleep_settings": { "compliant": true }
        }))
        .unwrap()
    }

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::new(Environment::Local, UIConfig::default());
        state.add_event(WorkerEvent::machines(vec![
            record("alpha", "Linux", true),
            record("beta", "Windows", false),
            record("gamma", "Windows", true),
        ]));
        state.update(Instant::now());
        state
    }

    fn visible_ids(state: &DashboardState) -> Vec<&str> {
        state
            .visible_records()
            .map(|r| r.machine_id.as_str())
            .collect()
    }

    #[test]
    fn machines_event_populates_view() {
        let state = loaded_state();
        assert!(!state.loading);
        assert!(state.has_loaded);
        assert_eq!(state.stats.total, 3);
        assert_eq!(state.stats.healthy, 2);
        assert_eq!(state.stats.with_issues, 1);
        assert_eq!(state.visible.len(), 3);
        assert_eq!(state.activity_logs.len(), 1);
    }

    #[test]
    fn failed_load_keeps_previous_records() {
        let mut state = loaded_state();
        state.add_event(WorkerEvent::loading());
        state.add_event(WorkerEvent::load_failed(
            "HTTP 502: Bad Gateway".to_string(),
            LogLevel::Warn,
        ));
        state.update(Instant::now());

        assert_eq!(state.records.len(), 3);
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to load machine data: HTTP 502: Bad Gateway")
        );

        state.add_event(WorkerEvent::machines(Vec::new()));
        state.update(Instant::now());
        assert_eq!(state.error, None);
        assert!(state.records.is_empty());
    }

    #[test]
    fn filters_and_selection_clamp() {
        let mut state = loaded_state();
        let now = Instant::now();
        state.handle_action(Action::SelectLast, now);
        assert_eq!(state.selected, 2);

        state.handle_action(Action::CycleIssue, now);
        assert_eq!(state.filters.issue, Some(IssueKind::UnencryptedDisk));
        assert_eq!(visible_ids(&state), vec!["beta"]);
        assert_eq!(state.selected, 0);

        state.handle_action(Action::ClearFilters, now);
        assert_eq!(state.visible.len(), 3);
    }

    #[test]
    fn sort_toggles_direction() {
        let mut state = loaded_state();
        let now = Instant::now();
        state.handle_action(Action::Sort(SortColumn::MachineId), now);
        assert_eq!(visible_ids(&state), vec!["gamma", "beta", "alpha"]);
        state.handle_action(Action::Sort(SortColumn::MachineId), now);
        assert_eq!(visible_ids(&state), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn search_is_debounced() {
        let mut state = loaded_state();
        let start = Instant::now();
        state.handle_action(Action::StartSearch, start);
        state.handle_action(Action::SearchChar('g'), start);
        state.handle_action(Action::SearchChar('a'), start);

        state.update(start + Duration::from_millis(100));
        assert_eq!(state.visible.len(), 3);

        state.update(start + Duration::from_millis(300));
        assert_eq!(visible_ids(&state), vec!["gamma"]);
        assert!(state.search.editing);
    }

    #[test]
    fn cancel_search_restores_previous_text() {
        let mut state = loaded_state();
        let now = Instant::now();
        state.handle_action(Action::StartSearch, now);
        state.handle_action(Action::SearchChar('b'), now);
        state.handle_action(Action::SubmitSearch, now);
        assert_eq!(visible_ids(&state), vec!["beta"]);

        state.handle_action(Action::StartSearch, now);
        state.handle_action(Action::SearchBackspace, now);
        state.handle_action(Action::SearchChar('z'), now);
        state.handle_action(Action::CancelSearch, now);
        assert!(!state.search.editing);
        assert_eq!(state.filters.search, "b");
        assert_eq!(visible_ids(&state), vec!["beta"]);
    }

    #[test]
    fn detail_results_for_other_machines_are_ignored() {
        let mut state = loaded_state();
        let now = Instant::now();
        state.handle_action(Action::Sort(SortColumn::MachineId), now);
        state.handle_action(Action::Sort(SortColumn::MachineId), now);

        let command = state.handle_action(Action::OpenDetail, now);
        assert_eq!(command, Some(Command::LoadDetail("alpha".to_string())));

        state.add_event(WorkerEvent::detail(
            "beta".to_string(),
            record("beta", "Windows", false),
        ));
        state.update(now);
        assert_eq!(state.detail.as_ref().unwrap().state, DetailState::Loading);

        state.add_event(WorkerEvent::detail_failed(
            "alpha".to_string(),
            "HTTP 404: Not Found".to_string(),
            LogLevel::Info,
        ));
        state.update(now);
        assert_eq!(
            state.detail.as_ref().unwrap().state,
            DetailState::Failed("HTTP 404: Not Found".to_string())
        );

        state.handle_action(Action::CloseDetail, now);
        state.add_event(WorkerEvent::detail(
            "alpha".to_string(),
            record("alpha", "Linux", true),
        ));
        state.update(now);
        assert!(state.detail.is_none());
    }

    #[test]
    fn open_detail_without_selection_does_nothing() {
        let mut state = DashboardState::new(Environment::Local, UIConfig::default());
        assert_eq!(state.handle_action(Action::OpenDetail, Instant::now()), None);
        assert!(state.detail.is_none());
    }

    #[test]
    fn focus_resume_respects_manual_pause() {
        let mut state = loaded_state();
        let now = Instant::now();
        assert_eq!(
            state.handle_action(Action::FocusChanged(false), now),
            Some(Command::Pause(PauseReason::Focus))
        );
        assert_eq!(
            state.handle_action(Action::TogglePause, now),
            Some(Command::Pause(PauseReason::User))
        );
        assert_eq!(state.handle_action(Action::FocusChanged(true), now), None);
        assert_eq!(
            state.handle_action(Action::TogglePause, now),
            Some(Command::Resume(PauseReason::User))
        );
    }

    #[test]
    fn view_toggle_and_export() {
        let mut state = loaded_state();
        let now = Instant::now();
        state.handle_action(Action::ToggleView, now);
        assert_eq!(state.view_mode, ViewMode::Cards);
        assert_eq!(
            state.handle_action(Action::Export(ExportFormat::Csv), now),
            Some(Command::Export(ExportFormat::Csv))
        );
        assert_eq!(state.status_message.as_deref(), Some("Exporting CSV..."));
    }

    #[test]
    fn interval_adjustment_is_clamped() {
        let mut state = loaded_state();
        let now = Instant::now();
        assert_eq!(
            state.handle_action(Action::AdjustInterval(60), now),
            Some(Command::SetInterval(Duration::from_secs(360)))
        );
        assert_eq!(state.status_message.as_deref(), Some("Auto-refresh every 6m 00s"));

        state.handle_action(Action::AdjustInterval(-600), now);
        assert_eq!(state.refresh_interval, Duration::from_secs(5));
    }
}
