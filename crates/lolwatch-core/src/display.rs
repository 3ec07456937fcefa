// Display regions and the surface a report is projected onto.

use crate::report::SessionReport;

/// The five presentation regions. Each is addressed by the same identifier
/// as the report key it displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    SummonerProfile,
    MasteryStats,
    LeagueInfo,
    MatchHistory,
    PerformanceMetrics,
}

impl Region {
    /// All regions in display order.
    pub const ALL: [Region; 5] = [
        Region::SummonerProfile,
        Region::MasteryStats,
        Region::LeagueInfo,
        Region::MatchHistory,
        Region::PerformanceMetrics,
    ];

    /// Report key and region identifier.
    pub fn key(self) -> &'static str {
        match self {
            Region::SummonerProfile => "summonerProfile",
            Region::MasteryStats => "masteryStats",
            Region::LeagueInfo => "leagueInfo",
            Region::MatchHistory => "matchHistory",
            Region::PerformanceMetrics => "performanceMetrics",
        }
    }

    /// Human-readable panel title.
    pub fn title(self) -> &'static str {
        match self {
            Region::SummonerProfile => "Summoner Profile",
            Region::MasteryStats => "Mastery Stats",
            Region::LeagueInfo => "League Info",
            Region::MatchHistory => "Match History",
            Region::PerformanceMetrics => "Performance Metrics",
        }
    }

    /// Position in [`Region::ALL`].
    pub fn index(self) -> usize {
        match self {
            Region::SummonerProfile => 0,
            Region::MasteryStats => 1,
            Region::LeagueInfo => 2,
            Region::MatchHistory => 3,
            Region::PerformanceMetrics => 4,
        }
    }

    /// Next region in display order, wrapping around.
    pub fn next(self) -> Region {
        Region::ALL[(self.index() + 1) % Region::ALL.len()]
    }

    /// Previous region in display order, wrapping around.
    pub fn prev(self) -> Region {
        Region::ALL[(self.index() + Region::ALL.len() - 1) % Region::ALL.len()]
    }
}

/// Anything that can show rendered region content.
pub trait DisplaySurface {
    /// Replace the whole content of `region`.
    fn replace_region(&mut self, region: Region, content: String);
}

/// Write every region of `report` onto `surface`, overwriting whatever was
/// shown before.
pub fn project_report<S: DisplaySurface + ?Sized>(report: &SessionReport, surface: &mut S) {
    for region in Region::ALL {
        surface.replace_region(region, report.render(region));
    }
}

/// A surface that buffers replacements until they are drained.
#[derive(Debug, Default)]
pub struct PendingRegions {
    pending: Vec<(Region, String)>,
}

impl PendingRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take all buffered replacements in the order they were written.
    pub fn drain(&mut self) -> Vec<(Region, String)> {
        std::mem::take(&mut self.pending)
    }
}

impl DisplaySurface for PendingRegions {
    fn replace_region(&mut self, region: Region, content: String) {
        self.pending.push((region, content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapSurface(HashMap<Region, String>);

    impl DisplaySurface for MapSurface {
        fn replace_region(&mut self, region: Region, content: String) {
            self.0.insert(region, content);
        }
    }

    #[test]
    fn keys_match_identifiers() {
        let keys: Vec<&str> = Region::ALL.iter().map(|r| r.key()).collect();
        assert_eq!(
            keys,
            vec![
                "summonerProfile",
                "masteryStats",
                "leagueInfo",
                "matchHistory",
                "performanceMetrics"
            ]
        );
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, region) in Region::ALL.iter().enumerate() {
            assert_eq!(region.index(), i);
        }
    }

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(Region::PerformanceMetrics.next(), Region::SummonerProfile);
        assert_eq!(Region::SummonerProfile.prev(), Region::PerformanceMetrics);
        assert_eq!(Region::MasteryStats.next(), Region::LeagueInfo);
        assert_eq!(Region::LeagueInfo.prev(), Region::MasteryStats);
    }

    #[test]
    fn project_report_writes_all_five_regions() {
        let report = SessionReport::parse(r#"{"summonerProfile":{"level":500}}"#).unwrap();
        let mut surface = MapSurface::default();
        project_report(&report, &mut surface);

        assert_eq!(surface.0.len(), 5);
        assert_eq!(
            surface.0[&Region::SummonerProfile],
            "{\n  \"level\": 500\n}"
        );
        for region in &Region::ALL[1..] {
            assert_eq!(surface.0[region], "undefined");
        }
    }

    #[test]
    fn later_report_overwrites_earlier() {
        let mut surface = MapSurface::default();
        let first = SessionReport::parse(r#"{"leagueInfo":[{"tier":"GOLD"}]}"#).unwrap();
        let second = SessionReport::parse(r#"{"masteryStats":[]}"#).unwrap();
        project_report(&first, &mut surface);
        project_report(&second, &mut surface);

        assert_eq!(surface.0[&Region::LeagueInfo], "undefined");
        assert_eq!(surface.0[&Region::MasteryStats], "[]");
    }

    #[test]
    fn pending_regions_drain_in_order() {
        let report = SessionReport::parse(r#"{"matchHistory":[]}"#).unwrap();
        let mut pending = PendingRegions::new();
        project_report(&report, &mut pending);

        let drained = pending.drain();
        let order: Vec<Region> = drained.iter().map(|(r, _)| *r).collect();
        assert_eq!(order, Region::ALL.to_vec());
        assert_eq!(drained[3].1, "[]");
        assert!(pending.is_empty());
    }
}
