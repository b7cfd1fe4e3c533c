//! Machine card grid component

use super::super::state::DashboardState;
use super::super::utils::{outcome_color, status_color};
use crate::fleet::{
    CARD_ID_LEN, CheckKind, CheckOutcome, MachineRecord, MachineStatus, format_relative,
    truncate_id,
};
use crate::report::text::{EMPTY_FILTERED, EMPTY_FLEET};

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

const CARD_WIDTH: u16 = 34;
const CARD_HEIGHT: u16 = 6;

/// Cards per row and rows that fit in `area`.
fn grid_size(area: Rect) -> (usize, usize) {
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    let rows = (area.height / CARD_HEIGHT).max(1) as usize;
    (columns, rows)
}

/// First grid row to draw so that `selected` stays on screen.
fn first_visible_row(selected: usize, columns: usize, rows: usize) -> usize {
    let selected_row = selected / columns;
    selected_row.saturating_sub(rows - 1)
}

pub fn render_cards(f: &mut Frame, area: Rect, state: &DashboardState) {
    if state.visible.is_empty() {
        let message = if state.loading && !state.has_loaded {
            "Loading machine data..."
        } else if state.records.is_empty() {
            EMPTY_FLEET
        } else {
            EMPTY_FILTERED
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title("MACHINES")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        f.render_widget(empty, area);
        return;
    }

    let (columns, rows) = grid_size(area);
    let start_row = first_visible_row(state.selected, columns, rows);
    let now = Utc::now();
    let records: Vec<&MachineRecord> = state.visible_records().collect();

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); rows])
        .split(area);

    for (row, row_area) in row_areas.iter().enumerate() {
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (col, card_area) in col_areas.iter().enumerate() {
            let index = (start_row + row) * columns + col;
            if let Some(record) = records.get(index) {
                render_card(f, *card_area, record, index == state.selected, now);
            }
        }
    }
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    record: &MachineRecord,
    selected: bool,
    now: DateTime<Utc>,
) {
    let status = MachineStatus::derive(record);
    let border_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(status_color(status))
    };

    // Two checks per line so all four fit the narrowest card.
    let check_lines: Vec<Line> = CheckKind::ALL
        .chunks(2)
        .map(|pair| {
            let spans: Vec<Span> = pair
                .iter()
                .flat_map(|&kind| {
                    let outcome = CheckOutcome::of(record, kind);
                    [
                        Span::styled(outcome.icon(), Style::default().fg(outcome_color(outcome))),
                        Span::raw(format!(" {:<12}", kind.short_label())),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let mut lines = vec![Line::from(vec![
        Span::styled(record.os_name().to_string(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(
            format!("{} {}", status.icon(), status.label()),
            Style::default()
                .fg(status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.extend(check_lines);
    lines.push(Line::from(Span::styled(
        format!("Last seen: {}", format_relative(record.observed_at(), now)),
        Style::default().fg(Color::DarkGray),
    )));

    let card = Paragraph::new(lines).block(
        Block::default()
            .title(truncate_id(&record.machine_id, CARD_ID_LEN))
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(border_style),
    );
    f.render_widget(card, area);
}
