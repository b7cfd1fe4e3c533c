//! Dashboard state management
//!
//! Contains the dashboard state struct and the types describing its modes

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event as WorkerEvent;
use crate::fleet::{
    FilterCriteria, FleetStats, MachineRecord, SortState, ViewMode, build_view, os_options,
};
use crate::ui::app::UIConfig;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// What the detail modal currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Box<MachineRecord>),
    Failed(String),
}

/// Modal with one machine's full report.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailModal {
    pub machine_id: String,
    pub state: DetailState,
    /// Vertical scroll offset in lines.
    pub scroll: u16,
}

impl DetailModal {
    pub fn loading(machine_id: String) -> Self {
        Self {
            machine_id,
            state: DetailState::Loading,
            scroll: 0,
        }
    }
}

/// Search box contents. Edits reach the filter only after the debounce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub editing: bool,
    pub buffer: String,
    /// Applied search text when editing started, restored on cancel.
    pub original: String,
    pub last_edit: Option<Instant>,
}

/// Everything the dashboard shows, owned by the UI loop.
#[derive(Debug)]
pub struct DashboardState {
    /// The environment in which the application is running.
    pub environment: Environment,
    /// Last machine list received from the server.
    pub records: Vec<MachineRecord>,
    /// Indices into `records` that pass the filters, in display order.
    pub visible: Vec<usize>,
    pub stats: FleetStats,
    pub os_options: Vec<String>,
    pub filters: FilterCriteria,
    pub sort: SortState,
    pub view_mode: ViewMode,
    /// Position in `visible` of the highlighted machine.
    pub selected: usize,
    /// A collection fetch is in flight.
    pub loading: bool,
    /// At least one fetch has succeeded.
    pub has_loaded: bool,
    /// Banner text of the last failed fetch.
    pub error: Option<String>,
    /// Auto-refresh is paused, as reported by the poller.
    pub paused: bool,
    /// The user paused auto-refresh explicitly.
    pub user_paused: bool,
    pub detail: Option<DetailModal>,
    pub search: SearchInput,
    /// Result of the last export, shown in the footer.
    pub status_message: Option<String>,
    pub refresh_interval: Duration,
    /// When the last fetch finished.
    pub last_refresh: Option<Instant>,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<WorkerEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<WorkerEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(environment: Environment, ui_config: UIConfig) -> Self {
        Self {
            environment,
            records: Vec::new(),
            visible: Vec::new(),
            stats: FleetStats::default(),
            os_options: os_options(&[]),
            filters: FilterCriteria::default(),
            sort: SortState::default(),
            view_mode: ui_config.view_mode,
            selected: 0,
            loading: true,
            has_loaded: false,
            error: None,
            paused: false,
            user_paused: false,
            detail: None,
            search: SearchInput::default(),
            status_message: None,
            refresh_interval: ui_config.refresh_interval,
            last_refresh: None,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
        }
    }

    /// Recompute the visible list and keep the selection in range.
    pub fn apply_filters(&mut self) {
        self.visible = build_view(&self.records, &self.filters, &self.sort);
        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }

    /// Replace the machine list with a fresh fetch result.
    pub fn set_records(&mut self, records: Vec<MachineRecord>) {
        self.os_options = os_options(&records);
        self.stats = FleetStats::compute(&records);
        self.records = records;
        self.apply_filters();
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &MachineRecord> {
        self.visible.iter().filter_map(|&i| self.records.get(i))
    }

    pub fn selected_record(&self) -> Option<&MachineRecord> {
        self.visible
            .get(self.selected)
            .and_then(|&i| self.records.get(i))
    }

    /// Time until the next scheduled refresh, if one is scheduled.
    pub fn next_refresh_in(&self, now: Instant) -> Option<Duration> {
        if self.paused || self.loading {
            return None;
        }
        let last = self.last_refresh?;
        Some((last + self.refresh_interval).saturating_duration_since(now))
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: WorkerEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: WorkerEvent) {
        self.pending_events.push_back(event);
    }
}
