//! Machine table component

use super::super::state::DashboardState;
use super::super::utils::{outcome_color, status_color};
use crate::fleet::{CheckKind, CheckOutcome, MachineStatus, SortColumn, format_relative};
use crate::report::text::{EMPTY_TABLE, outcome_label, table_header};

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

pub fn render_table(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title("MACHINES")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    if state.visible.is_empty() {
        let message = if state.loading && !state.has_loaded {
            "Loading machine data..."
        } else {
            EMPTY_TABLE
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let now = Utc::now();
    let header = Row::new(table_header().into_iter().enumerate().map(|(i, title)| {
        let column = match i {
            0 => Some(SortColumn::MachineId),
            1 => Some(SortColumn::Os),
            2 => Some(SortColumn::Status),
            7 => Some(SortColumn::Timestamp),
            _ => None,
        };
        let text = match column {
            Some(c) if c == state.sort.column => {
                format!("{} {}", title, state.sort.direction.arrow())
            }
            _ => title.to_string(),
        };
        Cell::from(text)
    }))
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows = state.visible_records().map(|record| {
        let status = MachineStatus::derive(record);
        let mut cells = vec![
            Cell::from(record.machine_id.clone()),
            Cell::from(record.os_name().to_string()),
            Cell::from(format!("{} {}", status.icon(), status.label()))
                .style(Style::default().fg(status_color(status))),
        ];
        cells.extend(CheckKind::ALL.iter().map(|&kind| {
            let outcome = CheckOutcome::of(record, kind);
            Cell::from(format!("{} {}", outcome.icon(), outcome_label(outcome)))
                .style(Style::default().fg(outcome_color(outcome)))
        }));
        cells.push(Cell::from(format_relative(
            record.observed_at(),
            now,
        )));
        Row::new(cells)
    });

    let widths = [
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}
