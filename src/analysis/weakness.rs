//! Exploitability scoring
//!
//! Independent heuristics over map results, agent picks, and recent form.
//! Each rule is gated by a minimum sample size and yields a 0-100 score;
//! the overall exploitability is a weighted blend of the top three.

use serde::Serialize;
use serde_json::json;

use crate::round1;
use crate::spatial::zones::normalize_map_name;
use crate::team::records::WinLoss;

/// Which heuristic produced a weakness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaknessKind {
    MapVulnerability,
    LimitedAgentPool,
    PoorRecentForm,
    PredictableCompositions,
}

/// A detected, exploitable weakness.
#[derive(Debug, Clone, Serialize)]
pub struct Weakness {
    #[serde(rename = "type")]
    pub kind: WeaknessKind,
    pub description: String,
    pub score: u32,
    pub data: serde_json::Value,
    pub recommendation: String,
}

/// Accumulates the signals the weakness heuristics read.
#[derive(Debug, Default)]
pub struct WeaknessScorer {
    map_stats: Vec<(String, WinLoss)>,
    agent_pool: Vec<(String, u32)>,
    recent_results: Vec<bool>,
    total_games: u32,
}

impl WeaknessScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track one map result.
    pub fn add_map_result(&mut self, map_name: &str, won: bool) {
        let key = normalize_map_name(map_name);
        let pos = match self.map_stats.iter().position(|(name, _)| *name == key) {
            Some(pos) => pos,
            None => {
                self.map_stats.push((key, WinLoss::default()));
                self.map_stats.len() - 1
            }
        };
        let entry = &mut self.map_stats[pos].1;
        if won {
            entry.wins += 1;
        } else {
            entry.losses += 1;
        }
        self.total_games += 1;
    }

    /// Track the agents fielded in one game.
    pub fn add_agents<S: AsRef<str>>(&mut self, agents: &[S]) {
        for agent in agents {
            let agent = agent.as_ref();
            match self.agent_pool.iter_mut().find(|(name, _)| name == agent) {
                Some((_, count)) => *count += 1,
                None => self.agent_pool.push((agent.to_string(), 1)),
            }
        }
    }

    /// Track one match result, oldest to newest in feed order.
    pub fn add_result(&mut self, won: bool) {
        self.recent_results.push(won);
    }

    /// All detected weaknesses, most exploitable first.
    pub fn calculate_weaknesses(&self) -> Vec<Weakness> {
        let mut weaknesses = Vec::new();

        // Map vulnerabilities
        for (map, record) in &self.map_stats {
            let total = record.total();
            if total < 2 {
                continue;
            }
            let win_rate = record.win_rate();
            if win_rate < 0.45 {
                weaknesses.push(Weakness {
                    kind: WeaknessKind::MapVulnerability,
                    description: format!("Weak on {map}"),
                    score: ((1.0 - win_rate) * 100.0).round() as u32,
                    data: json!({
                        "map": map,
                        "win_rate": round1(win_rate * 100.0),
                        "games": total,
                    }),
                    recommendation: format!(
                        "Force {map} in map veto - they win only {}%",
                        (win_rate * 100.0).round() as u32
                    ),
                });
            }
        }

        // Agent pool depth
        let unique_agents = self.agent_pool.len();
        if unique_agents < 8 && self.total_games >= 5 {
            weaknesses.push(Weakness {
                kind: WeaknessKind::LimitedAgentPool,
                description: format!("Limited agent pool ({unique_agents} agents)"),
                score: ((1.0 - unique_agents as f64 / 15.0) * 80.0).round() as u32,
                data: json!({ "unique_agents": unique_agents }),
                recommendation:
                    "Ban their comfort picks to force uncomfortable compositions".to_string(),
            });
        }

        // Recent form momentum
        if self.recent_results.len() >= 3 {
            let window_start = self.recent_results.len().saturating_sub(5);
            let recent = &self.recent_results[window_start..];
            let wins = recent.iter().filter(|w| **w).count();
            let win_rate = wins as f64 / recent.len() as f64;
            if win_rate < 0.4 {
                weaknesses.push(Weakness {
                    kind: WeaknessKind::PoorRecentForm,
                    description: format!(
                        "Poor recent form ({}% last {})",
                        (win_rate * 100.0).round() as u32,
                        recent.len()
                    ),
                    score: ((1.0 - win_rate) * 70.0).round() as u32,
                    data: json!({ "recent_win_rate": round1(win_rate * 100.0) }),
                    recommendation:
                        "Apply early pressure - team may be low on confidence".to_string(),
                });
            }
        }

        // Pick predictability
        if !self.agent_pool.is_empty() && self.total_games >= 3 {
            let mut counts: Vec<u32> = self.agent_pool.iter().map(|(_, c)| *c).collect();
            counts.sort_unstable_by(|a, b| b.cmp(a));
            let total_picks: u32 = counts.iter().sum();
            let top_share: u32 = counts.iter().take(5).sum();
            let concentration = if total_picks > 0 {
                f64::from(top_share) / f64::from(total_picks)
            } else {
                0.0
            };
            if concentration > 0.8 {
                weaknesses.push(Weakness {
                    kind: WeaknessKind::PredictableCompositions,
                    description: "Highly predictable agent selection".to_string(),
                    score: (concentration * 60.0).round() as u32,
                    data: json!({ "concentration": round1(concentration * 100.0) }),
                    recommendation:
                        "Prepare specific counters for their standard composition".to_string(),
                });
            }
        }

        weaknesses.sort_by(|a, b| b.score.cmp(&a.score));
        weaknesses
    }

    /// Overall exploitability, 0-100. Weighted mean of the top three
    /// weakness scores with weights 0.5/0.3/0.2, renormalized when fewer
    /// exist; 25 when nothing was found.
    pub fn overall_exploitability(&self) -> u32 {
        let weaknesses = self.calculate_weaknesses();
        if weaknesses.is_empty() {
            return 25;
        }

        const WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];
        let top: Vec<f64> = weaknesses
            .iter()
            .take(3)
            .map(|w| f64::from(w.score))
            .collect();
        let weight_sum: f64 = WEIGHTS[..top.len()].iter().sum();
        let blended: f64 = top
            .iter()
            .zip(WEIGHTS.iter())
            .map(|(score, weight)| score * weight)
            .sum::<f64>()
            / weight_sum;
        blended.round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_vulnerability_score() {
        let mut scorer = WeaknessScorer::new();
        scorer.add_map_result("Haven", true);
        scorer.add_map_result("Haven", false);
        scorer.add_map_result("Haven", false);
        scorer.add_map_result("Haven", false);

        let weaknesses = scorer.calculate_weaknesses();
        assert_eq!(weaknesses.len(), 1);
        assert_eq!(weaknesses[0].kind, WeaknessKind::MapVulnerability);
        assert_eq!(weaknesses[0].score, 75);
        assert!(weaknesses[0].description.contains("Haven"));
    }

    #[test]
    fn test_map_rule_needs_two_games() {
        let mut scorer = WeaknessScorer::new();
        scorer.add_map_result("Bind", false);
        assert!(scorer.calculate_weaknesses().is_empty());
    }

    #[test]
    fn test_limited_agent_pool() {
        let mut scorer = WeaknessScorer::new();
        for _ in 0..5 {
            scorer.add_map_result("Ascent", true);
            scorer.add_agents(&["Jett", "Omen", "Sova", "Killjoy", "Sage"]);
        }

        let weaknesses = scorer.calculate_weaknesses();
        let pool = weaknesses
            .iter()
            .find(|w| w.kind == WeaknessKind::LimitedAgentPool)
            .unwrap();
        // 5 unique agents: (1 - 5/15) * 80 = 53.33 -> 53
        assert_eq!(pool.score, 53);
    }

    #[test]
    fn test_poor_recent_form_uses_trailing_window() {
        let mut scorer = WeaknessScorer::new();
        // Old wins fall outside the trailing five.
        for won in [true, true, true, false, false, false, false, true] {
            scorer.add_result(won);
        }

        let weaknesses = scorer.calculate_weaknesses();
        let form = weaknesses
            .iter()
            .find(|w| w.kind == WeaknessKind::PoorRecentForm)
            .unwrap();
        // Trailing five: 1 win of 5 -> 20%, score (1 - 0.2) * 70 = 56
        assert_eq!(form.score, 56);
    }

    #[test]
    fn test_predictable_picks() {
        let mut scorer = WeaknessScorer::new();
        for _ in 0..3 {
            scorer.add_map_result("Ascent", true);
            scorer.add_agents(&["Jett", "Omen", "Sova", "Killjoy", "Sage"]);
        }
        // One stray pick keeps concentration just under 16/16.
        scorer.add_agents(&["Raze"]);

        let weaknesses = scorer.calculate_weaknesses();
        let picks = weaknesses
            .iter()
            .find(|w| w.kind == WeaknessKind::PredictableCompositions)
            .unwrap();
        // Top five picks cover 15 of 16 selections: 93.75% concentration.
        assert_eq!(picks.score, 56);
    }

    #[test]
    fn test_weaknesses_sorted_by_score() {
        let mut scorer = WeaknessScorer::new();
        for _ in 0..5 {
            scorer.add_map_result("Icebox", false);
            scorer.add_agents(&["Jett", "Omen"]);
        }
        let weaknesses = scorer.calculate_weaknesses();
        for pair in weaknesses.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_default_exploitability() {
        let scorer = WeaknessScorer::new();
        assert_eq!(scorer.overall_exploitability(), 25);
    }

    #[test]
    fn test_exploitability_blends_top_scores() {
        let mut scorer = WeaknessScorer::new();
        // Single weakness: blend collapses to that score.
        scorer.add_map_result("Haven", false);
        scorer.add_map_result("Haven", false);
        assert_eq!(scorer.overall_exploitability(), 100);
    }
}
