//! One-shot commands: list, show and export.
//!
//! Each command returns the text to print so the same output can be checked
//! in tests without a terminal.

use crate::api::{ComplianceApi, ExportFormat, MachineQuery};
use crate::fleet::{FilterCriteria, FleetStats, MachineRecord, SortState, build_view};
use crate::network::NetworkClient;
use crate::report::raw_data;
use crate::report::text::{render_cards, render_detail, render_stats, render_table};
use crate::workers::requests::download_export;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::error::Error;
use std::path::{Path, PathBuf};

/// How `list` selects and prints machines.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub criteria: FilterCriteria,
    pub sort: SortState,
    pub cards: bool,
    pub json: bool,
    /// Ask the server to apply the OS and issue filters as well.
    pub server_filter: bool,
}

impl ListOptions {
    fn query(&self) -> MachineQuery {
        if !self.server_filter {
            return MachineQuery::default();
        }
        MachineQuery {
            os: self.criteria.os.clone(),
            issue: self.criteria.issue,
        }
    }
}

/// Fetch the fleet and render the filtered, sorted view.
///
/// Stats always cover the whole fetched list, not just the visible rows.
pub async fn list_machines(
    api: &dyn ComplianceApi,
    network: &NetworkClient,
    options: &ListOptions,
    now: DateTime<Utc>,
) -> Result<String, Box<dyn Error>> {
    let records = network.fetch_machines(api, &options.query()).await?;
    let visible_indices = build_view(&records, &options.criteria, &options.sort);
    let visible: Vec<&MachineRecord> = visible_indices.iter().map(|&i| &records[i]).collect();

    if options.json {
        let raw: Vec<Value> = visible.iter().map(|r| r.raw_json()).collect();
        return Ok(serde_json::to_string_pretty(&raw)?);
    }

    let body = if options.cards {
        render_cards(&visible, records.is_empty(), now)
    } else {
        render_table(&visible, now)
    };
    Ok(format!(
        "{}\n\n{}",
        render_stats(&FleetStats::compute(&records), now),
        body.trim_end()
    ))
}

/// Fetch one machine and render its detail view, or its raw JSON.
pub async fn show_machine(
    api: &dyn ComplianceApi,
    network: &NetworkClient,
    machine_id: &str,
    json: bool,
    now: DateTime<Utc>,
) -> Result<String, Box<dyn Error>> {
    let record = network.fetch_machine(api, machine_id).await?;
    if json {
        Ok(raw_data(&record))
    } else {
        Ok(render_detail(&record, now).trim_end().to_string())
    }
}

/// Download an export document into `dir`.
pub async fn export_data(
    api: &dyn ComplianceApi,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    log::debug!("Downloading {} export from {}", format, api.export_url(format));
    Ok(download_export(api, format, dir).await?)
}
