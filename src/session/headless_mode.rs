//! Headless mode execution

use super::{
    SessionData,
    messages::{SessionMode, SessionNotice},
};
use crate::events::Payload;
use crate::fleet::FleetStats;
use crate::report::text::render_stats;
use chrono::Utc;
use std::error::Error;

/// Runs the poller without a terminal UI, printing each event to stdout
/// until Ctrl+C.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    SessionNotice::starting(
        SessionMode::Headless,
        &session.environment,
        session.refresh_interval,
    )
    .print();

    // Trigger shutdown on Ctrl+C
    let shutdown = session.shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    // Event loop: log events to console until shutdown
    loop {
        tokio::select! {
            _ = session.shutdown.cancelled() => break,
            event = session.event_receiver.recv() => {
                let Some(mut event) = event else { break };
                if !event.should_display() {
                    continue;
                }
                println!("{}", event);
                if let Some(Payload::Machines(records)) = event.payload.take() {
                    println!("    {}", render_stats(&FleetStats::compute(&records), Utc::now()));
                }
            }
        }
    }

    // Wait for the poller to finish
    SessionNotice::Stopping.print();
    session.shutdown.cancel();
    let _ = session.join_handle.await;
    SessionNotice::Stopped.print();

    Ok(())
}
