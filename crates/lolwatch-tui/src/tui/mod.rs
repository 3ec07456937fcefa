// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the rendered text of the five report
// regions. The app loop pushes `UiUpdate` messages over an mpsc channel; the
// TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;
use tokio::sync::mpsc;

use lolwatch_core::display::{DisplaySurface, Region};
use lolwatch_core::protocol::{UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state for rendering.
pub struct ViewState {
    /// Endpoint shown in the status bar.
    pub endpoint: String,
    /// Identity line shown in the status bar.
    pub identity: String,
    /// Rendered content per region, indexed by `Region::index`.
    pub regions: [String; 5],
    /// When the last report was rendered. `None` until the first report.
    pub last_report_at: Option<DateTime<Local>>,
    /// Panel that receives scroll keys.
    pub focused: Region,
    /// Per-region scroll offsets, indexed by `Region::index`.
    pub scroll_offset: [u16; 5],
    /// Text width inside each panel's border as of the last draw. Zero until
    /// the first frame.
    pub panel_widths: [u16; 5],
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            endpoint: String::new(),
            identity: String::new(),
            regions: Default::default(),
            last_report_at: None,
            focused: Region::SummonerProfile,
            scroll_offset: [0; 5],
            panel_widths: [0; 5],
        }
    }
}

impl ViewState {
    pub fn new(endpoint: impl Into<String>, identity: impl Into<String>) -> Self {
        ViewState {
            endpoint: endpoint.into(),
            identity: identity.into(),
            ..Default::default()
        }
    }

    pub fn content(&self, region: Region) -> &str {
        &self.regions[region.index()]
    }

    pub fn scroll(&self, region: Region) -> u16 {
        self.scroll_offset[region.index()]
    }

    /// Largest useful scroll offset for `region` (last row at the top).
    ///
    /// Counts wrapped rows at the panel's current width, so long lines can be
    /// scrolled through. Before the first draw only logical lines are known.
    pub fn max_scroll(&self, region: Region) -> u16 {
        let content = self.content(region);
        let width = self.panel_widths[region.index()];
        let rows = if width == 0 {
            content.lines().count()
        } else {
            Paragraph::new(content)
                .wrap(Wrap { trim: false })
                .line_count(width)
        };
        u16::try_from(rows.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    /// Record the panel widths of `layout`, minus the left and right borders.
    pub fn sync_panel_widths(&mut self, layout: &AppLayout) {
        for region in Region::ALL {
            self.panel_widths[region.index()] = layout.region(region).width.saturating_sub(2);
        }
    }
}

impl DisplaySurface for ViewState {
    fn replace_region(&mut self, region: Region, content: String) {
        self.regions[region.index()] = content;
        self.scroll_offset[region.index()] = 0;
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::RegionReplaced { region, content } => {
            state.replace_region(region, content);
        }
        UiUpdate::ReportRendered { at } => {
            state.last_report_at = Some(at);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    for region in Region::ALL {
        let focused = state.focused == region;
        widgets::region_panel::render(frame, layout.region(region), state, region, focused);
    }
    widgets::help_bar::render(frame, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // Keep rendering after the app loop is gone; only the user quits.
    let mut ui_open = true;

    let result = loop {
        tokio::select! {
            update = ui_rx.recv(), if ui_open => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => ui_open = false,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws.
                    }
                    Some(Err(e)) => break Err(anyhow::Error::from(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                let drawn = terminal.draw(|frame| {
                    view_state.sync_panel_widths(&build_layout(frame.area()));
                    render_frame(frame, &view_state);
                });
                if let Err(e) = drawn {
                    break Err(anyhow::Error::from(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lolwatch_core::display::project_report;
    use lolwatch_core::report::SessionReport;

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert!(state.regions.iter().all(|r| r.is_empty()));
        assert!(state.last_report_at.is_none());
        assert_eq!(state.focused, Region::SummonerProfile);
        assert_eq!(state.scroll_offset, [0; 5]);
        assert_eq!(state.panel_widths, [0; 5]);
    }

    #[test]
    fn new_sets_status_fields() {
        let state = ViewState::new("ws://localhost:8000/ws", "Faker,KR");
        assert_eq!(state.endpoint, "ws://localhost:8000/ws");
        assert_eq!(state.identity, "Faker,KR");
    }

    #[test]
    fn region_replaced_overwrites_content_and_resets_scroll() {
        let mut state = ViewState::default();
        state.regions[Region::LeagueInfo.index()] = "old".into();
        state.scroll_offset[Region::LeagueInfo.index()] = 4;

        apply_ui_update(
            &mut state,
            UiUpdate::RegionReplaced {
                region: Region::LeagueInfo,
                content: "[]".into(),
            },
        );
        assert_eq!(state.content(Region::LeagueInfo), "[]");
        assert_eq!(state.scroll(Region::LeagueInfo), 0);
    }

    #[test]
    fn report_rendered_sets_timestamp() {
        let mut state = ViewState::default();
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        apply_ui_update(&mut state, UiUpdate::ReportRendered { at });
        assert_eq!(state.last_report_at, Some(at));
    }

    #[test]
    fn projecting_report_onto_view_state() {
        let mut state = ViewState::default();
        let report = SessionReport::parse(r#"{"summonerProfile":{"level":500}}"#).unwrap();
        project_report(&report, &mut state);
        assert_eq!(state.content(Region::SummonerProfile), "{\n  \"level\": 500\n}");
        assert_eq!(state.content(Region::MatchHistory), "undefined");
    }

    #[test]
    fn max_scroll_counts_lines() {
        let mut state = ViewState::default();
        assert_eq!(state.max_scroll(Region::MasteryStats), 0);
        state.replace_region(Region::MasteryStats, "a\nb\nc".into());
        assert_eq!(state.max_scroll(Region::MasteryStats), 2);
    }

    #[test]
    fn max_scroll_counts_wrapped_rows() {
        let mut state = ViewState::default();
        state.replace_region(Region::MatchHistory, "x".repeat(50));
        assert_eq!(state.max_scroll(Region::MatchHistory), 0);

        state.panel_widths[Region::MatchHistory.index()] = 10;
        assert_eq!(state.max_scroll(Region::MatchHistory), 4);
    }

    #[test]
    fn sync_panel_widths_strips_borders() {
        let mut state = ViewState::default();
        let layout = build_layout(ratatui::layout::Rect::new(0, 0, 100, 40));
        state.sync_panel_widths(&layout);
        assert_eq!(state.panel_widths[Region::MatchHistory.index()], 98);
        assert_eq!(
            state.panel_widths[Region::SummonerProfile.index()],
            layout.region(Region::SummonerProfile).width - 2
        );
    }

    #[test]
    fn render_frame_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(120, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::new("ws://localhost:8000/ws", "Faker,KR");
        let report = SessionReport::parse(
            r#"{"summonerProfile":{"level":500},"matchHistory":[{"kills":3}]}"#,
        )
        .unwrap();
        project_report(&report, &mut state);
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }
}
