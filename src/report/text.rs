//! Plain-text renderers for the non-interactive commands

use super::detail::{detail_sections, detail_title, raw_data};
use crate::fleet::{
    CARD_ID_LEN, CheckKind, CheckOutcome, FleetStats, MachineRecord, MachineStatus,
    format_relative, truncate_id,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub const EMPTY_TABLE: &str = "No machines found matching your criteria";
pub const EMPTY_FLEET: &str = "No machines found";
pub const EMPTY_FILTERED: &str = "No machines match your current filter criteria";

pub fn render_stats(stats: &FleetStats, now: DateTime<Utc>) -> String {
    format!(
        "Total: {}  Healthy: {}  With issues: {}  Last update: {}",
        stats.total,
        stats.healthy,
        stats.with_issues,
        stats.last_update(now)
    )
}

/// Text of a table check cell.
pub fn outcome_label(outcome: CheckOutcome) -> &'static str {
    match outcome {
        CheckOutcome::Pass => "Pass",
        CheckOutcome::Fail => "Fail",
        CheckOutcome::Unknown => "Unknown",
    }
}

/// Cells of one table row, in header order.
pub fn table_row(record: &MachineRecord, now: DateTime<Utc>) -> Vec<String> {
    let status = MachineStatus::derive(record);
    let mut row = vec![
        record.machine_id.clone(),
        record.os_name().to_string(),
        format!("{} {}", status.icon(), status.label()),
    ];
    row.extend(
        CheckKind::ALL
            .iter()
            .map(|&kind| outcome_label(CheckOutcome::of(record, kind)).to_string()),
    );
    row.push(format_relative(record.observed_at(), now));
    row
}

pub fn table_header() -> Vec<&'static str> {
    let mut header = vec!["Machine ID", "OS", "Status"];
    header.extend(CheckKind::ALL.iter().map(|k| k.short_label()));
    header.push("Last Seen");
    header
}

pub fn render_table(records: &[&MachineRecord], now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return format!("{}\n", EMPTY_TABLE);
    }

    let header: Vec<String> = table_header().into_iter().map(String::from).collect();
    let rows: Vec<Vec<String>> = records.iter().map(|r| table_row(r, now)).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// One card per machine. `fleet_empty` picks the empty-state message.
pub fn render_cards(records: &[&MachineRecord], fleet_empty: bool, now: DateTime<Utc>) -> String {
    if records.is_empty() {
        let message = if fleet_empty { EMPTY_FLEET } else { EMPTY_FILTERED };
        return format!("{}\n", message);
    }

    let mut out = String::new();
    for record in records {
        let status = MachineStatus::derive(record);
        let _ = writeln!(
            out,
            "[{}] {} | {} {}",
            truncate_id(&record.machine_id, CARD_ID_LEN),
            record.os_name(),
            status.icon(),
            status.label()
        );
        let checks: Vec<String> = CheckKind::ALL
            .iter()
            .map(|&kind| format!("{} {}", CheckOutcome::of(record, kind).icon(), kind.short_label()))
            .collect();
        let _ = writeln!(out, "  {}", checks.join("  "));
        let _ = writeln!(
            out,
            "  Last seen: {}",
            format_relative(record.observed_at(), now)
        );
        out.push('\n');
    }
    out
}

pub fn render_detail(record: &MachineRecord, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", detail_title(&record.machine_id));

    for section in detail_sections(record, now) {
        let _ = writeln!(out, "\n{}", section.title);
        for field in section.fields {
            let _ = writeln!(out, "  {}: {}", field.label, field.value);
            if let Some(note) = field.note {
                let _ = writeln!(out, "    {}", note);
            }
        }
    }

    let _ = writeln!(out, "\nRaw Data");
    for line in raw_data(record).lines() {
        let _ = writeln!(out, "  {}", line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn records() -> Vec<MachineRecord> {
        vec![
            MachineRecord::from_value(json!({
                "machine_id": "workstation-with-a-very-long-name",
                "os": "Linux",
                "timestamp": "2025-05-01T10:00:00Z",
                "disk_encryption": { "encrypted": true },
                "os_update": { "up_to_date": true },
                "antivirus": { "antivirus_present": false },
                "sleep_settings": { "compliant": true }
            }))
            .unwrap(),
            MachineRecord::from_value(json!({ "machine_id": "m2" })).unwrap(),
        ]
    }

    #[test]
    fn table_has_header_rule_and_rows() {
        let records = records();
        let refs: Vec<&MachineRecord> = records.iter().collect();
        let table = render_table(&refs, now());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Machine ID"));
        assert!(lines[0].ends_with("Last Seen"));
        assert!(lines[1].starts_with("----"));
        assert!(lines[2].contains("✖ Issues"));
        assert!(lines[2].contains("Fail"));
        assert!(lines[2].ends_with("2h ago"));
        assert!(lines[3].contains("Unknown"));
        assert!(lines[3].ends_with("--"));
    }

    #[test]
    fn table_row_cells_follow_header() {
        let records = records();
        let row = table_row(&records[0], now());
        assert_eq!(row.len(), table_header().len());
        assert_eq!(row[3..7], ["Pass", "Pass", "Fail", "Pass"]);
    }

    #[test]
    fn empty_states() {
        assert_eq!(render_table(&[], now()), format!("{}\n", EMPTY_TABLE));
        assert_eq!(render_cards(&[], true, now()), "No machines found\n");
        assert_eq!(
            render_cards(&[], false, now()),
            "No machines match your current filter criteria\n"
        );
    }

    #[test]
    fn cards_truncate_ids() {
        let records = records();
        let refs: Vec<&MachineRecord> = records.iter().collect();
        let cards = render_cards(&refs, false, now());
        assert!(cards.contains("[workstation-with-a-v...] Linux | ✖ Issues"));
        assert!(cards.contains("✘ Antivirus"));
        assert!(cards.contains("Last seen: --"));
    }

    #[test]
    fn stats_line() {
        let records = records();
        let stats = FleetStats::compute(&records);
        assert_eq!(
            render_stats(&stats, now()),
            "Total: 2  Healthy: 0  With issues: 2  Last update: 2h ago"
        );
    }

    #[test]
    fn detail_lists_sections_and_raw_data() {
        let records = records();
        let text = render_detail(&records[1], now());
        assert!(text.starts_with("Machine Details - m2\n"));
        assert!(text.contains("\nSecurity Checks\n  Disk Encryption: No data available\n"));
        assert!(text.contains("\nRaw Data\n"));
        assert!(text.contains("\"machine_id\": \"m2\""));
    }
}
