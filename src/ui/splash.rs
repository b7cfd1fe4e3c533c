//! Startup screen shown while the first fetch is running.

use crate::environment::Environment;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const LOGO: [&str; 6] = [
    "██████╗   ██████╗  ███████╗ ████████╗ ██╗   ██╗ ██████╗  ███████╗",
    "██╔══██╗ ██╔═══██╗ ██╔════╝ ╚══██╔══╝ ██║   ██║ ██╔══██╗ ██╔════╝",
    "██████╔╝ ██║   ██║ ███████╗    ██║    ██║   ██║ ██████╔╝ █████╗  ",
    "██╔═══╝  ██║   ██║ ╚════██║    ██║    ██║   ██║ ██╔══██╗ ██╔══╝  ",
    "██║      ╚██████╔╝ ███████║    ██║    ╚██████╔╝ ██║  ██║ ███████╗",
    "╚═╝       ╚═════╝  ╚══════╝    ╚═╝     ╚═════╝  ╚═╝  ╚═╝ ╚══════╝",
];

/// Logo, tagline and the endpoint being contacted.
fn splash_lines(environment: &Environment) -> Vec<Line<'static>> {
    let logo_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, logo_style)))
        .collect();

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "W  A  T  C  H   ·   fleet compliance at a glance",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Connecting to ", Style::default().fg(Color::Gray)),
        Span::styled(environment.api_url(), Style::default().fg(Color::LightBlue)),
    ]));
    lines.push(Line::from(Span::styled(
        format!("v{}  ·  press any key to skip", env!("CARGO_PKG_VERSION")),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));
    lines
}

pub fn render_splash(f: &mut Frame, environment: &Environment) {
    let lines = splash_lines(environment);
    let [area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
        .flex(Flex::Center)
        .areas(f.area());

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
