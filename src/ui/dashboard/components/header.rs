//! Dashboard header component
//!
//! Renders the title, fleet summary and refresh gauge

use super::super::state::DashboardState;
use super::super::utils::format_countdown;

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};
use std::time::Instant;

/// Render header with title, summary counters and refresh progress.
pub fn render_header(f: &mut Frame, area: Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(area);

    let title_text = format!(
        "POSTURE WATCH v{}  ·  {}",
        env!("CARGO_PKG_VERSION"),
        state.environment.api_url()
    );
    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let stats = &state.stats;
    let summary = Line::from(vec![
        Span::styled("Total ", Style::default().fg(Color::Gray)),
        Span::styled(
            stats.total.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Healthy ", Style::default().fg(Color::Gray)),
        Span::styled(
            stats.healthy.to_string(),
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("With issues ", Style::default().fg(Color::Gray)),
        Span::styled(
            stats.with_issues.to_string(),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Last update ", Style::default().fg(Color::Gray)),
        Span::styled(
            stats.last_update(Utc::now()),
            Style::default().fg(Color::LightBlue),
        ),
    ]);
    f.render_widget(
        Paragraph::new(summary).alignment(Alignment::Center),
        header_chunks[1],
    );

    let (label, color, percent) = refresh_gauge(state, Instant::now());
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .percent(percent)
        .label(label);
    f.render_widget(gauge, header_chunks[2]);
}

/// Label, color and fill of the refresh gauge.
fn refresh_gauge(state: &DashboardState, now: Instant) -> (String, Color, u16) {
    if state.loading {
        // Animated while a fetch is in flight - loops every 20 ticks
        let progress = ((state.tick % 20) as f64 / 20.0 * 100.0) as u16;
        return (
            "LOADING - Fetching machine data".to_string(),
            Color::LightGreen,
            progress,
        );
    }
    if state.paused {
        return (
            "PAUSED - Auto-refresh paused (p to resume)".to_string(),
            Color::DarkGray,
            0,
        );
    }

    match state.next_refresh_in(now) {
        Some(remaining) => {
            let total = state.refresh_interval.as_secs_f64().max(1.0);
            let elapsed = total - remaining.as_secs_f64();
            let percent = ((elapsed / total) * 100.0).clamp(0.0, 100.0) as u16;
            (
                format!("NEXT REFRESH in {}", format_countdown(remaining)),
                Color::LightBlue,
                percent,
            )
        }
        None => ("WAITING".to_string(), Color::LightBlue, 0),
    }
}
