//! One-off requests issued on behalf of the dashboard

use super::core::EventSender;
use crate::api::{ComplianceApi, ExportFormat};
use crate::events::Event;
use crate::network::NetworkClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Load one machine for the detail view.
pub fn spawn_detail_fetch(
    api: Arc<dyn ComplianceApi>,
    network: NetworkClient,
    events: EventSender,
    machine_id: String,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return,
            result = network.fetch_machine(api.as_ref(), &machine_id) => result,
        };
        let event = match result {
            Ok(record) => Event::detail(machine_id, record),
            Err(e) => {
                let level = network.classify_error(&e);
                Event::detail_failed(machine_id, e.to_string(), level)
            }
        };
        events.send_event(event).await;
    })
}

/// Download an export document into `dir`.
pub fn spawn_export(
    api: Arc<dyn ComplianceApi>,
    events: EventSender,
    format: ExportFormat,
    dir: PathBuf,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return,
            result = download_export(api.as_ref(), format, &dir) => result,
        };
        let event = match result {
            Ok(path) => Event::export_saved(path),
            Err(message) => Event::export_failed(message),
        };
        events.send_event(event).await;
    })
}

/// Fetch the export and write it as `machines_data.<ext>` under `dir`.
pub async fn download_export(
    api: &dyn ComplianceApi,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, String> {
    let bytes = api
        .download_export(format)
        .await
        .map_err(|e| e.to_string())?;
    let path = dir.join(format.file_name());
    write_file(&path, &bytes)
        .await
        .map_err(|e| format!("could not write {}: {}", path.display(), e))?;
    Ok(path)
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}
