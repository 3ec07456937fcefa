// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                               |
// +-------------------------+------------------------+
// | Summoner Profile (50%)  | League Info (50%)      |  30%
// +-------------------------+------------------------+
// | Mastery Stats (50%)     | Performance (50%)      |  30%
// +-------------------------+------------------------+
// | Match History                                    |  40%
// +--------------------------------------------------+
// | Help Bar (1 row)                                 |
// +--------------------------------------------------+

use lolwatch_core::display::Region;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: endpoint, identity, last report time.
    pub status_bar: Rect,
    /// One panel per region, indexed by `Region::index`.
    pub regions: [Rect; 5],
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

impl AppLayout {
    pub fn region(&self, region: Region) -> Rect {
        self.regions[region.index()]
    }
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | body(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(9),    // region panels
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let body = vertical[1];
    let help_bar = vertical[2];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(body);

    let halves = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row)
    };
    let top = halves(rows[0]);
    let middle = halves(rows[1]);

    let mut regions = [Rect::default(); 5];
    regions[Region::SummonerProfile.index()] = top[0];
    regions[Region::LeagueInfo.index()] = top[1];
    regions[Region::MasteryStats.index()] = middle[0];
    regions[Region::PerformanceMetrics.index()] = middle[1];
    regions[Region::MatchHistory.index()] = rows[2];

    AppLayout {
        status_bar,
        regions,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
