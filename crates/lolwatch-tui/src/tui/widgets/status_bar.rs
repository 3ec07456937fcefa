// Status bar widget: endpoint, identity, last report time.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [app name] | [endpoint] | [identity] | [last report]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sep = || Span::styled(" | ", Style::default().fg(Color::Gray));
    let spans = vec![
        Span::styled(
            " lolwatch",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(state.endpoint.clone(), Style::default().fg(Color::White)),
        sep(),
        Span::styled(state.identity.clone(), Style::default().fg(Color::Yellow)),
        sep(),
        Span::styled(last_report_label(state), Style::default().fg(Color::White)),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "Last report: HH:MM:SS", or "--" before the first report.
pub fn last_report_label(state: &ViewState) -> String {
    match state.last_report_at {
        Some(at) => format!("Last report: {}", at.format("%H:%M:%S")),
        None => "Last report: --".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn last_report_label_before_first_report() {
        let state = ViewState::default();
        assert_eq!(last_report_label(&state), "Last report: --");
    }

    #[test]
    fn last_report_label_formats_time() {
        let mut state = ViewState::default();
        state.last_report_at = Some(Local.with_ymd_and_hms(2024, 5, 1, 9, 5, 7).unwrap());
        assert_eq!(last_report_label(&state), "Last report: 09:05:07");
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::new("ws://localhost:8000/ws", "Faker,KR");
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
