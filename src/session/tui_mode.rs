//! TUI mode execution

use super::{
    SessionData,
    messages::{SessionMode, SessionNotice},
};
use crate::ui::{self, UIConfig};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};

/// Runs the application in TUI mode
///
/// This function handles:
/// 1. Terminal setup and cleanup
/// 2. UI application initialization and execution
/// 3. Proper shutdown handling
///
/// Focus reporting is enabled so the dashboard can pause polling while the
/// terminal is in the background.
pub async fn run_tui_mode(session: SessionData, ui_config: UIConfig) -> Result<(), Box<dyn Error>> {
    SessionNotice::starting(
        SessionMode::Dashboard,
        &session.environment,
        session.refresh_interval,
    )
    .print();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;

    // Initialize the terminal with Crossterm backend
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = ui::App::new(
        session.environment.clone(),
        session.event_receiver,
        session.command_sender,
        session.shutdown.clone(),
        ui_config,
    );

    let result = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    // Make sure the poller stops even if the UI loop failed
    session.shutdown.cancel();

    // Handle the result
    result?;

    // Wait for the poller to finish
    SessionNotice::Stopping.print();
    let _ = session.join_handle.await;
    SessionNotice::Stopped.print();

    Ok(())
}
