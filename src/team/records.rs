//! Series/map record aggregation for one team
//!
//! Consumes provider series records in most-recent-first order and
//! accumulates win-loss ledgers keyed by normalized map, opponent, and
//! tournament names. "Our" team is identified by exact case-insensitive
//! name match; a series with no matching entry is skipped wholesale.

use serde::Serialize;

use crate::ingest::{SeriesMetadata, SeriesRecord};
use crate::round1;
use crate::spatial::zones::normalize_map_name;

/// A simple win/loss tally.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn total(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.total())
    }
}

/// Head-to-head record against one opponent (or within one tournament).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FacedRecord {
    pub matches: u32,
    pub wins: u32,
}

impl FacedRecord {
    pub fn win_rate(&self) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.matches)
    }
}

/// Aggregated team statistics. Ledgers keep insertion order so equal-count
/// entries surface in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TeamStats {
    pub team_name: String,
    pub total_series: u32,
    pub series_wins: u32,
    pub series_losses: u32,
    pub total_maps: u32,
    pub map_wins: u32,
    pub map_losses: u32,
    map_stats: Vec<(String, WinLoss)>,
    opponents: Vec<(String, FacedRecord)>,
    tournaments: Vec<(String, FacedRecord)>,
}

impl TeamStats {
    pub fn series_win_rate(&self) -> f64 {
        if self.total_series == 0 {
            return 0.0;
        }
        f64::from(self.series_wins) / f64::from(self.total_series)
    }

    pub fn map_win_rate(&self) -> f64 {
        if self.total_maps == 0 {
            return 0.0;
        }
        f64::from(self.map_wins) / f64::from(self.total_maps)
    }

    fn map_entry(&mut self, map: &str) -> &mut WinLoss {
        let pos = match self.map_stats.iter().position(|(name, _)| name == map) {
            Some(pos) => pos,
            None => {
                self.map_stats.push((map.to_string(), WinLoss::default()));
                self.map_stats.len() - 1
            }
        };
        &mut self.map_stats[pos].1
    }

    fn faced_entry<'a>(ledger: &'a mut Vec<(String, FacedRecord)>, key: &str) -> &'a mut FacedRecord {
        let pos = match ledger.iter().position(|(name, _)| name == key) {
            Some(pos) => pos,
            None => {
                ledger.push((key.to_string(), FacedRecord::default()));
                ledger.len() - 1
            }
        };
        &mut ledger[pos].1
    }

    /// Per-map lines sorted by games played, descending.
    pub fn map_stat_lines(&self) -> Vec<MapStatLine> {
        let mut lines: Vec<MapStatLine> = self
            .map_stats
            .iter()
            .map(|(map, record)| MapStatLine {
                map: map.clone(),
                wins: record.wins,
                losses: record.losses,
                games: record.total(),
                win_rate: round1(record.win_rate() * 100.0),
            })
            .collect();
        lines.sort_by(|a, b| b.games.cmp(&a.games));
        lines
    }

    /// Most frequently faced opponents, at most `limit`.
    pub fn top_opponents(&self, limit: usize) -> Vec<FacedLine> {
        let mut lines: Vec<FacedLine> = self
            .opponents
            .iter()
            .map(|(name, record)| FacedLine {
                name: name.clone(),
                matches: record.matches,
                wins: record.wins,
                win_rate: round1(record.win_rate() * 100.0),
            })
            .collect();
        lines.sort_by(|a, b| b.matches.cmp(&a.matches));
        lines.truncate(limit);
        lines
    }

    /// Per-tournament splits in first-seen order.
    pub fn tournament_lines(&self) -> Vec<FacedLine> {
        self.tournaments
            .iter()
            .map(|(name, record)| FacedLine {
                name: name.clone(),
                matches: record.matches,
                wins: record.wins,
                win_rate: round1(record.win_rate() * 100.0),
            })
            .collect()
    }

    /// The JSON contract object for team statistics.
    pub fn summary(&self) -> TeamStatsSummary {
        TeamStatsSummary {
            team_name: self.team_name.clone(),
            total_series: self.total_series,
            series_wins: self.series_wins,
            series_losses: self.series_losses,
            series_win_rate: round1(self.series_win_rate() * 100.0),
            total_maps: self.total_maps,
            map_wins: self.map_wins,
            map_losses: self.map_losses,
            map_win_rate: round1(self.map_win_rate() * 100.0),
            map_stats: self.map_stat_lines(),
            top_opponents: self.top_opponents(5),
            tournaments: self.tournament_lines(),
        }
    }
}

/// One map's line in the output contract.
#[derive(Debug, Clone, Serialize)]
pub struct MapStatLine {
    pub map: String,
    pub wins: u32,
    pub losses: u32,
    pub games: u32,
    pub win_rate: f64,
}

/// One opponent's (or tournament's) line in the output contract.
#[derive(Debug, Clone, Serialize)]
pub struct FacedLine {
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamStatsSummary {
    pub team_name: String,
    pub total_series: u32,
    pub series_wins: u32,
    pub series_losses: u32,
    pub series_win_rate: f64,
    pub total_maps: u32,
    pub map_wins: u32,
    pub map_losses: u32,
    pub map_win_rate: f64,
    pub map_stats: Vec<MapStatLine>,
    pub top_opponents: Vec<FacedLine>,
    pub tournaments: Vec<FacedLine>,
}

/// Recent form over the first N processed series.
#[derive(Debug, Clone, Serialize)]
pub struct FormSummary {
    pub last_n: usize,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    None,
    Win,
    Loss,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub streak_type: StreakKind,
    pub best_win_streak: u32,
}

/// Accumulates series records for one team. Input order is assumed
/// most-recent-first, as delivered by the provider's listing endpoint.
#[derive(Debug)]
pub struct TeamRecordAggregator {
    team_name: String,
    stats: TeamStats,
    results: Vec<bool>,
}

impl TeamRecordAggregator {
    pub fn new(team_name: &str) -> Self {
        TeamRecordAggregator {
            team_name: team_name.to_string(),
            stats: TeamStats {
                team_name: team_name.to_string(),
                ..TeamStats::default()
            },
            results: Vec::new(),
        }
    }

    fn is_our_team(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.team_name)
    }

    /// Fold one series into the ledgers. Returns whether the record was
    /// attributable; a series with no entry for our team is skipped and
    /// nothing moves.
    pub fn add_series(&mut self, series: &SeriesRecord, metadata: Option<&SeriesMetadata>) -> bool {
        let Some(our) = series
            .teams
            .iter()
            .find(|t| self.is_our_team(&t.name))
        else {
            log::debug!(
                "series {:?} has no entry for {:?}, skipping",
                series.id,
                self.team_name
            );
            return false;
        };

        let best_opposing_score = series
            .teams
            .iter()
            .filter(|t| !self.is_our_team(&t.name))
            .map(|t| t.score)
            .max();
        let won = our.won == Some(true)
            || best_opposing_score.is_some_and(|best| our.score > best);

        self.stats.total_series += 1;
        if won {
            self.stats.series_wins += 1;
        } else {
            self.stats.series_losses += 1;
        }

        if let Some(opponent) = series.teams.iter().find(|t| !self.is_our_team(&t.name)) {
            let record = TeamStats::faced_entry(&mut self.stats.opponents, &opponent.name);
            record.matches += 1;
            if won {
                record.wins += 1;
            }
        }

        if let Some(tournament) = metadata.and_then(|m| m.tournament.as_ref()) {
            let record = TeamStats::faced_entry(&mut self.stats.tournaments, &tournament.name);
            record.matches += 1;
            if won {
                record.wins += 1;
            }
        }

        for game in &series.games {
            self.add_game(game);
        }

        self.results.push(won);
        true
    }

    fn add_game(&mut self, game: &crate::ingest::GameRecord) {
        let Some(our) = game.teams.iter().find(|t| self.is_our_team(&t.name)) else {
            return;
        };
        let won = our.won == Some(true);
        let map_key = normalize_map_name(&game.map.name);

        self.stats.total_maps += 1;
        let entry = self.stats.map_entry(&map_key);
        if won {
            entry.wins += 1;
            self.stats.map_wins += 1;
        } else {
            entry.losses += 1;
            self.stats.map_losses += 1;
        }
    }

    pub fn stats(&self) -> &TeamStats {
        &self.stats
    }

    /// Win/loss record over the first `n` processed series.
    pub fn get_form(&self, n: usize) -> FormSummary {
        let recent = &self.results[..n.min(self.results.len())];
        let wins = recent.iter().filter(|w| **w).count() as u32;
        let losses = recent.len() as u32 - wins;
        let win_rate = if recent.is_empty() {
            0.0
        } else {
            round1(f64::from(wins) / recent.len() as f64 * 100.0)
        };
        FormSummary {
            last_n: recent.len(),
            wins,
            losses,
            win_rate,
        }
    }

    /// Current run and best historical winning run, from a single scan in
    /// input order. The current streak reflects the last processed series.
    pub fn get_win_streak(&self) -> StreakSummary {
        let mut current_streak = 0u32;
        let mut streak_type = StreakKind::None;
        let mut best_win_streak = 0u32;
        let mut run = 0u32;
        let mut last: Option<bool> = None;

        for &won in &self.results {
            if last == Some(won) {
                run += 1;
            } else {
                run = 1;
            }
            if won && run > best_win_streak {
                best_win_streak = run;
            }
            last = Some(won);
            current_streak = run;
            streak_type = if won { StreakKind::Win } else { StreakKind::Loss };
        }

        StreakSummary {
            current_streak,
            streak_type,
            best_win_streak,
        }
    }

    /// Maps with a win rate strictly below `threshold` over at least
    /// `min_games` games.
    pub fn get_weak_maps(&self, threshold: f64, min_games: u32) -> Vec<MapStatLine> {
        self.stats
            .map_stat_lines()
            .into_iter()
            .filter(|line| line.games >= min_games && line.win_rate < threshold * 100.0)
            .collect()
    }

    /// Maps with a win rate at or above `threshold` over at least
    /// `min_games` games.
    pub fn get_strong_maps(&self, threshold: f64, min_games: u32) -> Vec<MapStatLine> {
        self.stats
            .map_stat_lines()
            .into_iter()
            .filter(|line| line.games >= min_games && line.win_rate >= threshold * 100.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{GameRecord, GameTeamEntry, MapInfo, SeriesTeamEntry, TournamentInfo};

    fn make_series(
        our_score: u32,
        opp_score: u32,
        won: Option<bool>,
        maps: &[(&str, bool)],
    ) -> SeriesRecord {
        SeriesRecord {
            id: "s".to_string(),
            finished: true,
            teams: vec![
                SeriesTeamEntry {
                    name: "Sentinels".to_string(),
                    score: our_score,
                    won,
                },
                SeriesTeamEntry {
                    name: "100 Thieves".to_string(),
                    score: opp_score,
                    won: won.map(|w| !w),
                },
            ],
            games: maps
                .iter()
                .map(|(map, our_won)| GameRecord {
                    map: MapInfo {
                        name: map.to_string(),
                    },
                    teams: vec![
                        GameTeamEntry {
                            name: "Sentinels".to_string(),
                            won: Some(*our_won),
                            ..Default::default()
                        },
                        GameTeamEntry {
                            name: "100 Thieves".to_string(),
                            won: Some(!*our_won),
                            ..Default::default()
                        },
                    ],
                })
                .collect(),
        }
    }

    #[test]
    fn test_series_totals_invariant() {
        let mut agg = TeamRecordAggregator::new("Sentinels");
        for i in 0..7 {
            agg.add_series(&make_series(2, 1, Some(i % 2 == 0), &[]), None);
        }
        let stats = agg.stats();
        assert_eq!(stats.total_series, 7);
        assert_eq!(stats.series_wins + stats.series_losses, stats.total_series);
    }

    #[test]
    fn test_five_series_four_wins() {
        let mut agg = TeamRecordAggregator::new("Sentinels");
        for _ in 0..4 {
            agg.add_series(&make_series(2, 0, Some(true), &[]), None);
        }
        agg.add_series(&make_series(0, 2, Some(false), &[]), None);

        assert_eq!(agg.stats().summary().series_win_rate, 80.0);
        let form = agg.get_form(5);
        assert_eq!(form.wins, 4);
        assert_eq!(form.losses, 1);
        assert_eq!(form.win_rate, 80.0);
    }

    #[test]
    fn test_winner_from_score_when_flag_missing() {
        let mut agg = TeamRecordAggregator::new("Sentinels");
        agg.add_series(&make_series(2, 1, None, &[]), None);
        assert_eq!(agg.stats().series_wins, 1);

        agg.add_series(&make_series(1, 2, None, &[]), None);
        assert_eq!(agg.stats().series_losses, 1);
    }

    #[test]
    fn test_unattributable_series_is_skipped() {
        let mut agg = TeamRecordAggregator::new("Fnatic");
        let processed = agg.add_series(&make_series(2, 0, Some(true), &[("Bind", true)]), None);
        assert!(!processed);
        assert_eq!(agg.stats().total_series, 0);
        assert_eq!(agg.stats().total_maps, 0);
    }

    #[test]
    fn test_case_insensitive_team_match() {
        let mut agg = TeamRecordAggregator::new("SENTINELS");
        assert!(agg.add_series(&make_series(2, 0, Some(true), &[]), None));
    }

    #[test]
    fn test_map_ledger_sums_to_total() {
        let mut agg = TeamRecordAggregator::new("Sentinels");
        agg.add_series(
            &make_series(2, 1, Some(true), &[("Haven", true), ("Bind", false), ("Ascent", true)]),
            None,
        );
        let stats = agg.stats();
        assert_eq!(stats.total_maps, 3);
        assert_eq!(stats.map_wins + stats.map_losses, stats.total_maps);

        let lines = stats.map_stat_lines();
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_map_names_are_normalized() {
        let mut agg = TeamRecordAggregator::new("Sentinels");
        agg.add_series(
            &make_series(1, 0, Some(true), &[("/Game/Maps/Ascent/Ascent", true)]),
            None,
        );
        agg.add_series(&make_series(1, 0, Some(true), &[("ascent", true)]), None);

        let lines = agg.stats().map_stat_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].map, "Ascent");
        assert_eq!(lines[0].games, 2);
    }

    #[test]
    fn test_weak_and_strong_maps() {
        let mut agg = TeamRecordAggregator::new("Sentinels");
        agg.add_series(
            &make_series(1, 2, Some(false), &[("Haven", false), ("Haven", false), ("Ascent", true)]),
            None,
        );
        agg.add_series(
            &make_series(2, 0, Some(true), &[("Haven", true), ("Ascent", true)]),
            None,
        );

        let weak = agg.get_weak_maps(0.4, 2);
        assert_eq!(weak.len(), 1);
        assert_eq!(weak[0].map, "Haven");

        let strong = agg.get_strong_maps(0.6, 2);
        assert_eq!(strong.len(), 1);
        assert_eq!(strong[0].map, "Ascent");
    }

    #[test]
    fn test_streak_tracking() {
        let mut agg = TeamRecordAggregator::new("Sentinels");
        for won in [true, true, true, false, false] {
            agg.add_series(&make_series(2, 0, Some(won), &[]), None);
        }
        let streak = agg.get_win_streak();
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.streak_type, StreakKind::Loss);
        assert_eq!(streak.best_win_streak, 3);
    }

    #[test]
    fn test_empty_streak() {
        let agg = TeamRecordAggregator::new("Sentinels");
        let streak = agg.get_win_streak();
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.streak_type, StreakKind::None);
    }

    #[test]
    fn test_opponent_and_tournament_records() {
        let mut agg = TeamRecordAggregator::new("Sentinels");
        let metadata = SeriesMetadata {
            tournament: Some(TournamentInfo {
                name: "VCT Americas".to_string(),
            }),
            start_time: None,
        };
        agg.add_series(&make_series(2, 0, Some(true), &[]), Some(&metadata));
        agg.add_series(&make_series(0, 2, Some(false), &[]), Some(&metadata));

        let opponents = agg.stats().top_opponents(5);
        assert_eq!(opponents[0].name, "100 Thieves");
        assert_eq!(opponents[0].matches, 2);
        assert_eq!(opponents[0].win_rate, 50.0);

        let tournaments = agg.stats().tournament_lines();
        assert_eq!(tournaments[0].name, "VCT Americas");
        assert_eq!(tournaments[0].matches, 2);
    }
}
