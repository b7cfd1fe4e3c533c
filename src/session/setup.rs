//! Session setup and initialization

use crate::api::{ComplianceApi, ComplianceClient};
use crate::consts::cli_consts::{COMMAND_QUEUE_SIZE, EVENT_QUEUE_SIZE};
use crate::environment::Environment;
use crate::events::Event;
use crate::workers::core::EventSender;
use crate::workers::{Command, Poller};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Session data for both TUI and headless modes
#[derive(Debug)]
pub struct SessionData {
    /// Event receiver for poller events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Commands into the poller
    pub command_sender: mpsc::Sender<Command>,
    /// Join handle of the poller task
    pub join_handle: JoinHandle<()>,
    /// Cancelled to stop the poller and its requests
    pub shutdown: CancellationToken,
    pub environment: Environment,
    pub refresh_interval: Duration,
}

/// Connects to the API and starts the poller.
///
/// The first fetch starts immediately; every later one follows
/// `refresh_interval` unless the session pauses polling.
pub fn setup_session(
    environment: Environment,
    refresh_interval: Duration,
    export_dir: PathBuf,
) -> Result<SessionData, Box<dyn Error>> {
    let client = ComplianceClient::new(environment.clone())?;
    let api: Arc<dyn ComplianceApi> = Arc::new(client);

    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let (command_sender, command_receiver) = mpsc::channel::<Command>(COMMAND_QUEUE_SIZE);
    let shutdown = CancellationToken::new();

    let poller = Poller::new(
        api,
        EventSender::new(event_sender),
        refresh_interval,
        export_dir,
    );
    log::debug!(
        "Starting poller against {} every {}s",
        environment.api_url(),
        refresh_interval.as_secs()
    );
    let join_handle = tokio::spawn(poller.run(command_receiver, shutdown.clone()));

    Ok(SessionData {
        event_receiver,
        command_sender,
        join_handle,
        shutdown,
        environment,
        refresh_interval,
    })
}
