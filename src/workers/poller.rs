//! Polling controller
//!
//! Owns the refresh schedule and the only connection to the collection
//! endpoint. The dashboard drives it through [`Command`]s and observes it
//! through events.

use super::core::EventSender;
use super::requests::{spawn_detail_fetch, spawn_export};
use super::schedule::RefreshSchedule;
use crate::api::{ComplianceApi, ExportFormat, MachineQuery};
use crate::events::Event;
use crate::network::NetworkClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Requests from the dashboard to the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch now, whether or not polling is paused.
    Refresh,
    Pause(PauseReason),
    Resume(PauseReason),
    /// Change the auto-refresh interval.
    SetInterval(Duration),
    LoadDetail(String),
    Export(ExportFormat),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum PauseReason {
    #[strum(to_string = "terminal focus")]
    Focus,
    #[strum(to_string = "user")]
    User,
}

pub struct Poller {
    api: Arc<dyn ComplianceApi>,
    network: NetworkClient,
    query: MachineQuery,
    schedule: RefreshSchedule,
    events: EventSender,
    export_dir: PathBuf,
}

impl Poller {
    pub fn new(
        api: Arc<dyn ComplianceApi>,
        events: EventSender,
        interval: Duration,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            api,
            network: NetworkClient::default(),
            query: MachineQuery::default(),
            schedule: RefreshSchedule::new(interval, Instant::now()),
            events,
            export_dir,
        }
    }

    pub fn with_network(mut self, network: NetworkClient) -> Self {
        self.network = network;
        self
    }

    /// Runs until `shutdown` is cancelled or the command channel closes.
    ///
    /// At most one collection fetch is in flight. Commands keep being
    /// handled while it runs.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>, shutdown: CancellationToken) {
        let mut in_flight: Option<JoinHandle<()>> = None;

        loop {
            let due = match in_flight {
                Some(_) => None,
                None => self.schedule.due_in(Instant::now()),
            };

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = wait_for(&mut in_flight) => {
                    in_flight = None;
                    self.schedule.mark_refreshed(Instant::now());
                    // Stop once the UI has dropped its receiver.
                    if self.events.is_closed() {
                        break;
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command, &mut in_flight, &shutdown).await;
                }
                _ = sleep_or_forever(due) => {
                    in_flight = Some(self.spawn_refresh(&shutdown));
                }
            }
        }

        if let Some(refresh) = in_flight {
            refresh.abort();
        }
        log::debug!("Poller stopped");
    }

    async fn handle(
        &mut self,
        command: Command,
        in_flight: &mut Option<JoinHandle<()>>,
        shutdown: &CancellationToken,
    ) {
        match command {
            Command::Refresh => {
                if in_flight.is_some() {
                    log::debug!("Refresh already in progress");
                } else {
                    *in_flight = Some(self.spawn_refresh(shutdown));
                }
            }
            Command::Pause(reason) => {
                if self.schedule.pause() {
                    self.events.send_event(Event::polling(true, &reason.to_string())).await;
                }
            }
            Command::Resume(reason) => {
                if self.schedule.resume(Instant::now()) {
                    self.events.send_event(Event::polling(false, &reason.to_string())).await;
                }
            }
            Command::SetInterval(interval) => {
                self.schedule.set_interval(interval, Instant::now());
                log::debug!("Refresh interval set to {}s", self.schedule.interval().as_secs());
            }
            Command::LoadDetail(machine_id) => {
                spawn_detail_fetch(
                    self.api.clone(),
                    self.network.clone(),
                    self.events.clone(),
                    machine_id,
                    shutdown.child_token(),
                );
            }
            Command::Export(format) => {
                spawn_export(
                    self.api.clone(),
                    self.events.clone(),
                    format,
                    self.export_dir.clone(),
                    shutdown.child_token(),
                );
            }
        }
    }

    fn spawn_refresh(&self, shutdown: &CancellationToken) -> JoinHandle<()> {
        let api = self.api.clone();
        let network = self.network.clone();
        let query = self.query.clone();
        let events = self.events.clone();
        let token = shutdown.child_token();

        tokio::spawn(async move {
            events.send_event(Event::loading()).await;
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                result = network.fetch_machines(api.as_ref(), &query) => result,
            };
            let event = match result {
                Ok(records) => Event::machines(records),
                Err(e) => Event::load_failed(e.to_string(), network.classify_error(&e)),
            };
            events.send_event(event).await;
        })
    }
}

/// Resolves when the in-flight refresh finishes; pends forever when idle.
async fn wait_for(in_flight: &mut Option<JoinHandle<()>>) {
    match in_flight {
        Some(handle) => {
            if let Err(e) = handle.await {
                log::warn!("Refresh task failed: {}", e);
            }
        }
        None => std::future::pending().await,
    }
}

async fn sleep_or_forever(due: Option<Duration>) {
    match due {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending().await,
    }
}
