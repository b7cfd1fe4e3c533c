//! Dashboard main renderer

use super::components::{cards, detail, filters, footer, header, logs, table};
use super::state::DashboardState;
use crate::fleet::ViewMode;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let banner_height = if state.error.is_some() { 1 } else { 0 };
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);
    filters::render_filters(f, main_chunks[1], state);

    if let Some(error) = &state.error {
        let banner = Paragraph::new(format!("⚠ {}", error)).style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(banner, main_chunks[2]);
    }

    match state.view_mode {
        ViewMode::Table => table::render_table(f, main_chunks[3], state),
        ViewMode::Cards => cards::render_cards(f, main_chunks[3], state),
    }

    logs::render_logs_panel(f, main_chunks[4], state);
    footer::render_footer(f, main_chunks[5], state);

    if let Some(modal) = &state.detail {
        detail::render_detail_modal(f, f.area(), modal);
    }
}
