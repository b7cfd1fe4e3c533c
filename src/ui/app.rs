//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::cli_consts::refresh;
use crate::environment::Environment;
use crate::events::Event as WorkerEvent;
use crate::fleet::ViewMode;
use crate::ui::dashboard::{Action, DashboardState, map_key, render_dashboard};
use crate::ui::splash::render_splash;
use crate::workers::Command;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub view_mode: ViewMode,
    pub refresh_interval: Duration,
}

impl UIConfig {
    pub fn new(with_background_color: bool, view_mode: ViewMode, refresh_interval: Duration) -> Self {
        Self {
            with_background_color,
            view_mode,
            refresh_interval,
        }
    }
}

impl Default for UIConfig {
    fn default() -> Self {
        Self::new(true, ViewMode::default(), refresh::default_interval())
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Dashboard screen with the fleet overview.
    Dashboard(Box<DashboardState>),
}

/// Application state
#[derive(Debug)]
pub struct App {
    /// The environment in which the application is running.
    environment: Environment,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Receives events from the poller and its request tasks.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Sends commands to the poller.
    command_sender: mpsc::Sender<Command>,

    /// Cancelled when the user quits.
    shutdown: CancellationToken,

    ui_config: UIConfig,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        command_sender: mpsc::Sender<Command>,
        shutdown: CancellationToken,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            environment,
            current_screen: Screen::Splash,
            event_receiver,
            command_sender,
            shutdown,
            ui_config,
        }
    }

    fn open_dashboard(&mut self) {
        let state = DashboardState::new(self.environment.clone(), self.ui_config.clone());
        self.current_screen = Screen::Dashboard(Box::new(state));
    }

    fn send_command(&self, command: Command) {
        if let Err(e) = self.command_sender.try_send(command) {
            log::warn!("Dropped dashboard command: {}", e);
        }
    }

    /// Applies a user action. Returns `false` when the app should exit.
    fn dispatch(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            return false;
        }
        let command = match &mut self.current_screen {
            Screen::Dashboard(state) => state.handle_action(action, Instant::now()),
            Screen::Splash => None,
        };
        if let Some(command) = command {
            self.send_command(command);
        }
        true
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        if app.shutdown.is_cancelled() {
            return Ok(());
        }

        // Queue all incoming events for processing. Events arriving during the
        // splash are kept so the first load is not lost.
        if let Screen::Dashboard(state) = &mut app.current_screen {
            while let Ok(event) = app.event_receiver.try_recv() {
                state.add_event(event);
            }
            state.update(Instant::now());
        }
        terminal.draw(|f| render(f, &app.current_screen, &app.environment))?;

        // Handle splash-to-dashboard transition
        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.open_dashboard();
                continue;
            }
        }

        // Poll for terminal events
        if event::poll(Duration::from_millis(100))? {
            let action = match event::read()? {
                // Skip events that are not KeyEventKind::Press
                Event::Key(key) if key.kind == KeyEventKind::Release => continue,
                Event::Key(key) => match &app.current_screen {
                    Screen::Splash => {
                        // Any key press will skip the splash screen
                        app.open_dashboard();
                        continue;
                    }
                    Screen::Dashboard(state) => map_key(state, key),
                },
                Event::FocusGained => Some(Action::FocusChanged(true)),
                Event::FocusLost => Some(Action::FocusChanged(false)),
                _ => None,
            };

            if let Some(action) = action {
                if !app.dispatch(action) {
                    // Stop the poller and any in-flight requests
                    app.shutdown.cancel();
                    return Ok(());
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen, environment: &Environment) {
    match screen {
        Screen::Splash => render_splash(f, environment),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}
