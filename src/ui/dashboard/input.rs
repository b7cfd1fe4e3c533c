//! Keyboard mapping
//!
//! Translates key presses into dashboard actions. The mapping depends on
//! whether the search box or the detail modal has focus.

use super::state::DashboardState;
use crate::api::ExportFormat;
use crate::fleet::SortColumn;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const INTERVAL_STEP_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    TogglePause,
    ToggleView,
    CycleOs,
    CycleIssue,
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    SubmitSearch,
    CancelSearch,
    ClearFilters,
    Sort(SortColumn),
    SelectPrev,
    SelectNext,
    SelectFirst,
    SelectLast,
    OpenDetail,
    CloseDetail,
    ScrollDetail(i16),
    Export(ExportFormat),
    /// Lengthen (positive) or shorten the auto-refresh interval, in seconds.
    AdjustInterval(i64),
    /// Terminal gained (`true`) or lost focus.
    FocusChanged(bool),
}

pub fn map_key(state: &DashboardState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if state.search.editing {
        return match key.code {
            KeyCode::Esc => Some(Action::CancelSearch),
            KeyCode::Enter => Some(Action::SubmitSearch),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchChar(c)),
            _ => None,
        };
    }

    if state.detail.is_some() {
        return match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Esc | KeyCode::Enter => Some(Action::CloseDetail),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollDetail(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDetail(1)),
            KeyCode::PageUp => Some(Action::ScrollDetail(-10)),
            KeyCode::PageDown => Some(Action::ScrollDetail(10)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('p') => Some(Action::TogglePause),
        KeyCode::Char('v') => Some(Action::ToggleView),
        KeyCode::Char('o') => Some(Action::CycleOs),
        KeyCode::Char('i') => Some(Action::CycleIssue),
        KeyCode::Char('/') => Some(Action::StartSearch),
        KeyCode::Char('c') => Some(Action::ClearFilters),
        KeyCode::Char('1') => Some(Action::Sort(SortColumn::MachineId)),
        KeyCode::Char('2') => Some(Action::Sort(SortColumn::Os)),
        KeyCode::Char('3') => Some(Action::Sort(SortColumn::Status)),
        KeyCode::Char('4') => Some(Action::Sort(SortColumn::Timestamp)),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::SelectFirst),
        KeyCode::End | KeyCode::Char('G') => Some(Action::SelectLast),
        KeyCode::Enter => Some(Action::OpenDetail),
        KeyCode::Char('e') => Some(Action::Export(ExportFormat::Json)),
        KeyCode::Char('E') => Some(Action::Export(ExportFormat::Csv)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::AdjustInterval(INTERVAL_STEP_SECS)),
        KeyCode::Char('-') => Some(Action::AdjustInterval(-INTERVAL_STEP_SECS)),
        _ => None,
    }
}
