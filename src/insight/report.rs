//! Scouting pipeline and report contract
//!
//! One [`ScoutingPipeline`] per logical request: it owns fresh analyzer
//! instances, is fed series records and optional round events, and
//! produces the [`ScoutingReport`] JSON contract consumed by the external
//! prompt-building and response layers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{CorrelationSummary, LossCorrelator, Weakness, WeaknessScorer};
use crate::cluster::{ClusterProfile, CompositionClusterer};
use crate::ingest::{RawEvent, SeriesMetadata, SeriesRecord};
use crate::insight::synthesizer::{AuxiliarySignals, Insight, InsightSynthesizer};
use crate::spatial::tendency::{PlayerIntel, SpatialTendencyTracker};
use crate::team::records::{MapStatLine, TeamRecordAggregator, TeamStatsSummary};
use crate::AnalysisConfig;

/// Rounds beyond which a map must have gone to overtime.
const REGULATION_ROUNDS: u32 = 13;

/// Clustering section of the report. When the sample is too small for a
/// fit, `clustering_available` is false and `note` explains why.
#[derive(Debug, Clone, Serialize)]
pub struct CompositionAnalysis {
    pub clustering_available: bool,
    pub playstyle_profiles: Vec<ClusterProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Weak and strong ends of the team's map pool.
#[derive(Debug, Clone, Serialize)]
pub struct MapPool {
    pub weak_maps: Vec<MapStatLine>,
    pub strong_maps: Vec<MapStatLine>,
}

/// The full JSON-serializable scouting report.
#[derive(Debug, Clone, Serialize)]
pub struct ScoutingReport {
    pub team: TeamStatsSummary,
    pub roster: Vec<PlayerIntel>,
    pub insights: Vec<Insight>,
    pub weaknesses: Vec<Weakness>,
    pub exploitability_score: u32,
    pub loss_patterns: CorrelationSummary,
    pub composition_analysis: CompositionAnalysis,
    pub map_pool: MapPool,
    pub executive_summary: String,
    pub how_to_win: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Per-request orchestrator over all analyzers.
pub struct ScoutingPipeline {
    team_name: String,
    config: AnalysisConfig,
    records: TeamRecordAggregator,
    tendencies: SpatialTendencyTracker,
    weaknesses: WeaknessScorer,
    correlator: LossCorrelator,
    clusterer: CompositionClusterer,
}

impl ScoutingPipeline {
    pub fn new(team_name: &str) -> Self {
        Self::with_config(team_name, AnalysisConfig::default())
    }

    pub fn with_config(team_name: &str, config: AnalysisConfig) -> Self {
        ScoutingPipeline {
            team_name: team_name.to_string(),
            records: TeamRecordAggregator::new(team_name),
            tendencies: SpatialTendencyTracker::new(),
            weaknesses: WeaknessScorer::new(),
            correlator: LossCorrelator::new(),
            clusterer: CompositionClusterer::new(config.n_clusters),
            config,
        }
    }

    fn is_our_team(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.team_name)
    }

    /// Feed one series into every analyzer. Returns whether the series was
    /// attributable to the scouted team; unattributable records are
    /// skipped everywhere.
    pub fn ingest_series(&mut self, series: &SeriesRecord, metadata: Option<&SeriesMetadata>) -> bool {
        if !self.records.add_series(series, metadata) {
            return false;
        }

        let game_count = series.games.len();
        for (index, game) in series.games.iter().enumerate() {
            let Some(our) = game.teams.iter().find(|t| self.is_our_team(&t.name)) else {
                continue;
            };
            let won = our.won == Some(true);
            let agents: Vec<String> = our
                .players
                .iter()
                .filter_map(|p| p.agent.as_ref().map(|a| a.as_str().to_string()))
                .collect();
            let overtime = game
                .teams
                .iter()
                .map(|t| t.score)
                .max()
                .unwrap_or(0)
                > REGULATION_ROUNDS;
            let decider = game_count == 3 && index == 2;

            self.weaknesses.add_map_result(&game.map.name, won);
            if !agents.is_empty() {
                self.weaknesses.add_agents(&agents);
            }
            self.weaknesses.add_result(won);
            self.clusterer.add_composition(&agents, &game.map.name, won);
            self.correlator
                .add_match(won, Some(&game.map.name), &agents, overtime, decider);
        }

        true
    }

    /// Feed one round's raw combat events into the tendency tracker.
    pub fn ingest_round_events(&mut self, map_name: &str, round_number: u32, events: &[RawEvent]) {
        self.tendencies.record_round(map_name, round_number, events);
    }

    /// Credit round survival to an already-tracked player.
    pub fn record_survival(&mut self, player: &str, survived: bool) {
        self.tendencies.record_survival(player, survived);
    }

    pub fn records(&self) -> &TeamRecordAggregator {
        &self.records
    }

    pub fn tendencies(&self) -> &SpatialTendencyTracker {
        &self.tendencies
    }

    /// Run the derived analyzers and assemble the report. Fits the
    /// clusterer as a side effect; everything else recomputes on demand.
    pub fn build_report(&mut self) -> ScoutingReport {
        let fitted = self.clusterer.fit();
        let note = if fitted {
            None
        } else {
            Some("Need more matches for clustering".to_string())
        };

        let weaknesses = self.weaknesses.calculate_weaknesses();
        let correlations = self.correlator.analyze();

        let synthesizer = InsightSynthesizer::new(&self.records)
            .with_form_window(self.config.form_window)
            .with_auxiliary(AuxiliarySignals {
                weaknesses: &weaknesses,
                correlations: &correlations,
            });
        let insights = synthesizer.generate();
        let how_to_win = synthesizer.how_to_win(&insights);
        let executive_summary = synthesizer.executive_summary();

        ScoutingReport {
            team: self.records.stats().summary(),
            roster: self.tendencies.roster_intel(),
            insights,
            exploitability_score: self.weaknesses.overall_exploitability(),
            loss_patterns: self.correlator.summary(),
            composition_analysis: CompositionAnalysis {
                clustering_available: fitted,
                playstyle_profiles: self.clusterer.profiles().into_iter().cloned().collect(),
                note,
            },
            map_pool: MapPool {
                weak_maps: self
                    .records
                    .get_weak_maps(self.config.weak_map_threshold, self.config.min_map_games),
                strong_maps: self
                    .records
                    .get_strong_maps(self.config.strong_map_threshold, self.config.min_map_games),
            },
            executive_summary,
            how_to_win,
            weaknesses,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{GameRecord, GameTeamEntry, MapInfo, PlayerEntry, SeriesTeamEntry};
    use crate::ingest::records::NameField;

    fn player(name: &str, agent: &str) -> PlayerEntry {
        PlayerEntry {
            name: name.to_string(),
            agent: Some(NameField::Plain(agent.to_string())),
            kills: 0,
            deaths: 0,
        }
    }

    fn game(map: &str, our_won: bool, our_score: u32, opp_score: u32) -> GameRecord {
        GameRecord {
            map: MapInfo {
                name: map.to_string(),
            },
            teams: vec![
                GameTeamEntry {
                    name: "Sentinels".to_string(),
                    score: our_score,
                    won: Some(our_won),
                    side: None,
                    players: vec![
                        player("p1", "Jett"),
                        player("p2", "Omen"),
                        player("p3", "Sova"),
                        player("p4", "Killjoy"),
                        player("p5", "Sage"),
                    ],
                },
                GameTeamEntry {
                    name: "LOUD".to_string(),
                    score: opp_score,
                    won: Some(!our_won),
                    side: None,
                    players: Vec::new(),
                },
            ],
        }
    }

    fn series(won: bool, games: Vec<GameRecord>) -> SeriesRecord {
        SeriesRecord {
            id: "s".to_string(),
            finished: true,
            teams: vec![
                SeriesTeamEntry {
                    name: "Sentinels".to_string(),
                    score: if won { 2 } else { 0 },
                    won: Some(won),
                },
                SeriesTeamEntry {
                    name: "LOUD".to_string(),
                    score: if won { 0 } else { 2 },
                    won: Some(!won),
                },
            ],
            games,
        }
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let mut pipeline = ScoutingPipeline::new("Sentinels");
        for i in 0..5 {
            let won = i != 0;
            pipeline.ingest_series(
                &series(
                    won,
                    vec![
                        game("Ascent", won, 13, 7),
                        game("Bind", !won, 9, 13),
                        game("Haven", won, 13, 11),
                    ],
                ),
                None,
            );
        }

        let report = pipeline.build_report();

        assert_eq!(report.team.total_series, 5);
        assert_eq!(report.team.series_wins, 4);
        // 15 identical compositions easily clear the clustering gate.
        assert!(report.composition_analysis.clustering_available);
        assert!(report.composition_analysis.note.is_none());
        assert!(!report.how_to_win.is_empty());
        assert!(!report.executive_summary.is_empty());

        // Bind lost 4 of 5: weak map and a loss-correlated factor.
        assert!(report.map_pool.weak_maps.iter().any(|m| m.map == "Bind"));
        assert!(report
            .loss_patterns
            .patterns
            .iter()
            .any(|p| p.factor == "Playing on Bind"));

        // The report serializes cleanly.
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("insights").is_some());
        assert!(json.get("exploitability_score").is_some());
    }

    #[test]
    fn test_unattributable_series_touches_nothing() {
        let mut pipeline = ScoutingPipeline::new("Fnatic");
        let processed = pipeline.ingest_series(&series(true, vec![game("Ascent", true, 13, 2)]), None);
        assert!(!processed);

        let report = pipeline.build_report();
        assert_eq!(report.team.total_series, 0);
        assert!(!report.composition_analysis.clustering_available);
        assert_eq!(
            report.composition_analysis.note.as_deref(),
            Some("Need more matches for clustering")
        );
        assert_eq!(report.exploitability_score, 25);
    }

    #[test]
    fn test_round_events_reach_roster() {
        let mut pipeline = ScoutingPipeline::new("Sentinels");
        let events = vec![RawEvent {
            kind: "kill".to_string(),
            killer: Some(crate::ingest::RawActor {
                name: "TenZ".to_string(),
                agent: Some(NameField::Plain("Jett".to_string())),
                team_side: Some("attack".to_string()),
            }),
            position: Some(crate::ingest::records::RawPosition {
                x: -2000.0,
                y: 3000.0,
            }),
            ..Default::default()
        }];
        pipeline.ingest_round_events("Ascent", 1, &events);
        pipeline.record_survival("TenZ", true);

        let report = pipeline.build_report();
        assert_eq!(report.roster.len(), 1);
        assert_eq!(report.roster[0].name, "TenZ");
        assert_eq!(report.roster[0].agent, "Jett");
    }

    #[test]
    fn test_overtime_and_decider_flags() {
        let mut pipeline = ScoutingPipeline::new("Sentinels");
        // Three-map series where the decider goes to overtime and is lost.
        for _ in 0..2 {
            pipeline.ingest_series(
                &series(
                    false,
                    vec![
                        game("Ascent", true, 13, 5),
                        game("Bind", false, 10, 13),
                        game("Haven", false, 13, 15),
                    ],
                ),
                None,
            );
        }
        pipeline.ingest_series(&series(true, vec![game("Ascent", true, 13, 5)]), None);

        let report = pipeline.build_report();
        assert!(report
            .loss_patterns
            .patterns
            .iter()
            .any(|p| p.factor == "Decider maps (BO3 map 3)"));
        assert!(report
            .loss_patterns
            .patterns
            .iter()
            .any(|p| p.factor == "Games going to overtime"));
    }
}
