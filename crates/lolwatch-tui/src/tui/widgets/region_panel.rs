// Region panel widget: one report section as pretty-printed JSON.
//
// Title: "<Region Title> (<region id>)"
// Body: the region's rendered text, or a placeholder before the first report.

use lolwatch_core::display::Region;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::focused_border_style;
use crate::tui::ViewState;

pub const PLACEHOLDER: &str = "Waiting for report...";

/// Render the panel for `region`. When `focused` is true the border is
/// highlighted to show it receives scroll keys.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, region: Region, focused: bool) {
    let has_report = state.last_report_at.is_some() || !state.content(region).is_empty();

    let (content, content_style) = if has_report {
        (state.content(region).to_string(), body_style(state.content(region)))
    } else {
        (PLACEHOLDER.to_string(), Style::default().fg(Color::DarkGray))
    };

    let paragraph = Paragraph::new(content)
        .style(content_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(region))
                .border_style(focused_border_style(focused, Style::default())),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.scroll(region), 0));
    frame.render_widget(paragraph, area);
}

fn build_title(region: Region) -> Line<'static> {
    Line::from(vec![
        Span::styled(region.title(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" ({})", region.key()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Absent sections are dimmed so they read differently from real data.
fn body_style(content: &str) -> Style {
    if content == lolwatch_core::report::UNDEFINED_TEXT {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
