//! Filter bar component
//!
//! Shows the active filters, the search box and the sort order

use super::super::state::DashboardState;
use crate::fleet::count_label;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub fn render_filters(f: &mut Frame, area: Rect, state: &DashboardState) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let os = state.filters.os.as_deref().unwrap_or("All");
    let issue = state.filters.issue.map(|i| i.label()).unwrap_or("All");

    let search = if state.search.editing {
        Span::styled(
            format!("{}▌", state.search.buffer),
            Style::default().fg(Color::Black).bg(Color::LightCyan),
        )
    } else if state.filters.search.is_empty() {
        Span::styled("-", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(state.filters.search.clone(), value)
    };

    let line = Line::from(vec![
        Span::styled("[o] OS: ", label),
        Span::styled(os.to_string(), value),
        Span::raw("   "),
        Span::styled("[i] Issue: ", label),
        Span::styled(issue.to_string(), value),
        Span::raw("   "),
        Span::styled("[/] Search: ", label),
        search,
        Span::raw("   "),
        Span::styled("Sort: ", label),
        Span::styled(
            format!("{} {}", state.sort.column.label(), state.sort.direction.arrow()),
            value,
        ),
        Span::raw("   "),
        Span::styled(
            count_label(state.visible.len()),
            Style::default().fg(if state.filters.is_active() {
                Color::Yellow
            } else {
                Color::Cyan
            }),
        ),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
