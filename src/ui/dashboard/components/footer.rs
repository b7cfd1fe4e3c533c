//! Dashboard footer component
//!
//! Renders key hints and the latest export status

use super::super::state::DashboardState;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render footer.
pub fn render_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let hints = if state.search.editing {
        "[Enter] Apply | [Esc] Cancel search"
    } else if state.detail.is_some() {
        "[↑↓] Scroll | [Esc] Close | [Q] Quit"
    } else {
        "[Q] Quit | [R] Refresh | [P] Pause | [V] View | [1-4] Sort | [C] Clear | [Enter] Details | [+/-] Interval | [e/E] Export JSON/CSV"
    };

    let footer_text = match &state.status_message {
        Some(message) => format!("{}  ·  {}", message, hints),
        None => hints.to_string(),
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
