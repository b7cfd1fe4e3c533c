//! Machine detail modal

use super::super::state::{DetailModal, DetailState};
use super::super::utils::{centered_rect, outcome_color};
use crate::report::{detail_sections, detail_title, raw_data};

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

/// Render the detail modal over `area`.
pub fn render_detail_modal(f: &mut Frame, area: Rect, modal: &DetailModal) {
    let popup = centered_rect(80, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(detail_title(&modal.machine_id))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    let lines = match &modal.state {
        DetailState::Loading => vec![Line::from(Span::styled(
            "Loading details...",
            Style::default().fg(Color::LightBlue),
        ))],
        DetailState::Failed(err) => vec![Line::from(Span::styled(
            format!("Failed to load machine details: {}", err),
            Style::default().fg(Color::LightRed),
        ))],
        DetailState::Loaded(record) => detail_lines(record),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((modal.scroll, 0));
    f.render_widget(paragraph, popup);
}

fn detail_lines(record: &crate::fleet::MachineRecord) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let label = Style::default().fg(Color::Gray);
    let mut lines = Vec::new();

    for section in detail_sections(record, Utc::now()) {
        lines.push(Line::from(Span::styled(section.title, heading)));
        for field in section.fields {
            let value_style = match field.outcome {
                Some(outcome) => Style::default()
                    .fg(outcome_color(outcome))
                    .add_modifier(Modifier::BOLD),
                None => Style::default().fg(Color::White),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", field.label), label),
                Span::styled(field.value, value_style),
            ]));
            if let Some(note) = field.note {
                lines.push(Line::from(Span::styled(
                    format!("    {}", note),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled("Raw Data", heading)));
    lines.extend(
        raw_data(record)
            .lines()
            .map(|line| Line::from(format!("  {}", line))),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::MachineRecord;
    use crate::ui::dashboard::utils::render_to_text;
    use serde_json::json;

    fn modal(state: DetailState) -> DetailModal {
        DetailModal {
            machine_id: "mac-01".to_string(),
            state,
            scroll: 0,
        }
    }

    #[test]
    fn loading_modal() {
        let modal = modal(DetailState::Loading);
        let text = render_to_text(100, 30, |f, area| render_detail_modal(f, area, &modal));
        assert!(text.contains("Machine Details - mac-01"));
        assert!(text.contains("Loading details..."));
    }

    #[test]
    fn failed_modal_shows_the_error() {
        let modal = modal(DetailState::Failed("HTTP 404: Not Found".to_string()));
        let text = render_to_text(100, 30, |f, area| render_detail_modal(f, area, &modal));
        assert!(text.contains("Failed to load machine details: HTTP 404: Not Found"));
    }

    #[test]
    fn loaded_modal_lists_sections_and_raw_data() {
        let record = MachineRecord::from_value(json!({
            "machine_id": "mac-01",
            "os": "macOS",
            "disk_encryption": { "encrypted": true, "details": "FileVault on" },
            "antivirus": { "antivirus_present": false },
        }))
        .unwrap();
        let modal = modal(DetailState::Loaded(Box::new(record)));

        let text = render_to_text(100, 60, |f, area| render_detail_modal(f, area, &modal));
        for expected in [
            "General Information",
            "Operating System: macOS",
            "Security Checks",
            "Disk Encryption: ✓ Pass",
            "FileVault on",
            "Antivirus: ✗ Fail",
            "System Checks",
            "No data available",
            "Raw Data",
            "\"machine_id\": \"mac-01\"",
        ] {
            assert!(text.contains(expected), "{} missing:\n{}", expected, text);
        }
    }

    #[test]
    fn scroll_hides_leading_lines() {
        let record = MachineRecord::from_value(json!({ "machine_id": "mac-01" })).unwrap();
        let mut modal = modal(DetailState::Loaded(Box::new(record)));
        modal.scroll = 3;
        let text = render_to_text(100, 60, |f, area| render_detail_modal(f, area, &modal));
        assert!(!text.contains("General Information"));
        assert!(text.contains("Security Checks"));
    }
}
