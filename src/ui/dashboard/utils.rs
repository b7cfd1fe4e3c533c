//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Worker;
use crate::fleet::{CheckOutcome, MachineStatus};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Color;
use std::time::Duration;

/// Get a ratatui color for a worker based on its type
pub fn get_worker_color(worker: &Worker) -> Color {
    match worker {
        Worker::Poller => Color::Cyan,
        Worker::DetailFetcher => Color::Yellow,
        Worker::Exporter => Color::Green,
    }
}

pub fn status_color(status: MachineStatus) -> Color {
    match status {
        MachineStatus::Healthy => Color::LightGreen,
        MachineStatus::Warning => Color::LightYellow,
        MachineStatus::Critical => Color::LightRed,
    }
}

pub fn outcome_color(outcome: CheckOutcome) -> Color {
    match outcome {
        CheckOutcome::Pass => Color::LightGreen,
        CheckOutcome::Fail => Color::LightRed,
        CheckOutcome::Unknown => Color::LightYellow,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract MM-DD HH:MM from "YYYY-MM-DD HH:MM:SS"
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    // Replace verbose reqwest error text with shorter messages
    if msg.contains("error sending request") || msg.contains("Connection refused") {
        if let Some((prefix, _)) = msg.split_once("Network error:") {
            return format!("{}Network error - server unreachable", prefix);
        }
    }
    if msg.contains("operation timed out") {
        if let Some((prefix, _)) = msg.split_once("Network error:") {
            return format!("{}Network error - request timed out", prefix);
        }
    }
    msg.to_string()
}

/// "4m 12s" style countdown.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

/// A rectangle of the given percentage size centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Draws onto a `width` x `height` test terminal and returns the screen as text.
#[cfg(test)]
pub fn render_to_text(
    width: u16,
    height: u16,
    draw: impl FnOnce(&mut ratatui::Frame, Rect),
) -> String {
    use ratatui::{Terminal, backend::TestBackend};

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|f| {
            let area = f.area();
            draw(f, area);
        })
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .chunks(width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
