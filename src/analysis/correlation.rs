//! Loss-correlation analysis
//!
//! Compares the loss rate inside a factor subset (map, role composition,
//! overtime, decider maps) against the team's overall baseline and
//! surfaces the factors that track losses hardest.

use serde::Serialize;

use crate::round1;
use crate::spatial::zones::normalize_map_name;
use crate::Role;

/// Coarse confidence label driven by subset sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Medium,
    High,
}

/// A factor whose presence correlates with losing.
#[derive(Debug, Clone, Serialize)]
pub struct LossCorrelation {
    pub factor: String,
    pub loss_correlation: f64,
    pub insight: String,
    pub sample_size: usize,
    pub significance: Significance,
}

#[derive(Debug, Clone)]
struct MatchSample {
    won: bool,
    map: Option<String>,
    role_counts: [u32; 4],
    overtime: bool,
    decider: bool,
}

/// Summary view over the strongest correlations.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationSummary {
    pub patterns_found: usize,
    pub top_factor: Option<String>,
    pub top_correlation: Option<f64>,
    pub actionable_insight: String,
    pub patterns: Vec<LossCorrelation>,
}

/// Accumulates per-map match samples for correlation analysis.
#[derive(Debug, Default)]
pub struct LossCorrelator {
    matches: Vec<MatchSample>,
}

impl LossCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one map's outcome with its context factors.
    pub fn add_match<S: AsRef<str>>(
        &mut self,
        won: bool,
        map_name: Option<&str>,
        agents: &[S],
        overtime: bool,
        decider: bool,
    ) {
        let mut role_counts = [0u32; 4];
        for agent in agents {
            if let Some(role) = Role::for_agent(agent.as_ref()) {
                role_counts[role.index()] += 1;
            }
        }
        self.matches.push(MatchSample {
            won,
            map: map_name.map(normalize_map_name),
            role_counts,
            overtime,
            decider,
        });
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// All surfaced correlations, strongest first. Empty below three
    /// matches or without at least one loss.
    pub fn analyze(&self) -> Vec<LossCorrelation> {
        if self.matches.len() < 3 {
            return Vec::new();
        }
        let total = self.matches.len();
        let total_losses = self.matches.iter().filter(|m| !m.won).count();
        if total_losses == 0 {
            return Vec::new();
        }
        let baseline = total_losses as f64 / total as f64;

        let mut correlations = Vec::new();
        self.analyze_maps(baseline, &mut correlations);
        self.analyze_roles(&mut correlations);
        self.analyze_subset(
            |m| m.overtime,
            0.6,
            Significance::High,
            "Games going to overtime",
            |pct| format!("Loses {pct}% of overtime games (clutch pressure)"),
            &mut correlations,
        );
        self.analyze_subset(
            |m| m.decider,
            0.6,
            Significance::High,
            "Decider maps (BO3 map 3)",
            |pct| format!("Loses {pct}% of deciding maps"),
            &mut correlations,
        );

        correlations.sort_by(|a, b| {
            b.loss_correlation
                .partial_cmp(&a.loss_correlation)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        correlations
    }

    fn analyze_maps(&self, baseline: f64, out: &mut Vec<LossCorrelation>) {
        let mut per_map: Vec<(&str, (usize, usize))> = Vec::new();
        for sample in &self.matches {
            let Some(map) = sample.map.as_deref() else {
                continue;
            };
            let pos = match per_map.iter().position(|(name, _)| *name == map) {
                Some(pos) => pos,
                None => {
                    per_map.push((map, (0, 0)));
                    per_map.len() - 1
                }
            };
            let entry = &mut per_map[pos].1;
            entry.0 += 1;
            if !sample.won {
                entry.1 += 1;
            }
        }

        for (map, (games, losses)) in per_map {
            if games < 2 {
                continue;
            }
            let loss_rate = losses as f64 / games as f64;
            if loss_rate > baseline + 0.15 && loss_rate > 0.5 {
                let pct = (loss_rate * 100.0).round() as u32;
                out.push(LossCorrelation {
                    factor: format!("Playing on {map}"),
                    loss_correlation: round1(loss_rate * 100.0),
                    insight: format!("Loses {pct}% of games on {map}"),
                    sample_size: games,
                    significance: if games >= 4 {
                        Significance::High
                    } else {
                        Significance::Medium
                    },
                });
            }
        }
    }

    fn analyze_roles(&self, out: &mut Vec<LossCorrelation>) {
        for role in Role::ALL {
            let idx = role.index();

            // Missing the role entirely
            let absent: Vec<&MatchSample> = self
                .matches
                .iter()
                .filter(|m| m.role_counts[idx] == 0)
                .collect();
            if absent.len() >= 2 {
                let losses = absent.iter().filter(|m| !m.won).count();
                let loss_rate = losses as f64 / absent.len() as f64;
                if loss_rate > 0.6 {
                    let pct = (loss_rate * 100.0).round() as u32;
                    out.push(LossCorrelation {
                        factor: format!("No {} in composition", role.label()),
                        loss_correlation: round1(loss_rate * 100.0),
                        insight: format!(
                            "Loses {pct}% when playing without a {}",
                            role.label()
                        ),
                        sample_size: absent.len(),
                        significance: Significance::Medium,
                    });
                }
            }

            // Stacking the role
            let stacked: Vec<&MatchSample> = self
                .matches
                .iter()
                .filter(|m| m.role_counts[idx] >= 2)
                .collect();
            if stacked.len() >= 2 {
                let losses = stacked.iter().filter(|m| !m.won).count();
                let loss_rate = losses as f64 / stacked.len() as f64;
                if loss_rate > 0.7 {
                    let pct = (loss_rate * 100.0).round() as u32;
                    out.push(LossCorrelation {
                        factor: format!("2+ {}s in composition", role.label()),
                        loss_correlation: round1(loss_rate * 100.0),
                        insight: format!(
                            "Loses {pct}% when running multiple {}s",
                            role.label()
                        ),
                        sample_size: stacked.len(),
                        significance: Significance::Medium,
                    });
                }
            }
        }
    }

    fn analyze_subset<F, I>(
        &self,
        filter: F,
        gate: f64,
        significance: Significance,
        factor: &str,
        insight: I,
        out: &mut Vec<LossCorrelation>,
    ) where
        F: Fn(&MatchSample) -> bool,
        I: Fn(u32) -> String,
    {
        let subset: Vec<&MatchSample> = self.matches.iter().filter(|m| filter(m)).collect();
        if subset.len() < 2 {
            return;
        }
        let losses = subset.iter().filter(|m| !m.won).count();
        let loss_rate = losses as f64 / subset.len() as f64;
        if loss_rate > gate {
            let pct = (loss_rate * 100.0).round() as u32;
            out.push(LossCorrelation {
                factor: factor.to_string(),
                loss_correlation: round1(loss_rate * 100.0),
                insight: insight(pct),
                sample_size: subset.len(),
                significance,
            });
        }
    }

    /// Headline plus the top five correlations.
    pub fn summary(&self) -> CorrelationSummary {
        let correlations = self.analyze();
        if correlations.is_empty() {
            return CorrelationSummary {
                patterns_found: 0,
                top_factor: None,
                top_correlation: None,
                actionable_insight: "Not enough data to identify loss patterns".to_string(),
                patterns: Vec::new(),
            };
        }

        let top = &correlations[0];
        CorrelationSummary {
            patterns_found: correlations.len(),
            top_factor: Some(top.factor.clone()),
            top_correlation: Some(top.loss_correlation),
            actionable_insight: top.insight.clone(),
            patterns: correlations.into_iter().take(5).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_AGENTS: &[&str] = &[];

    #[test]
    fn test_map_correlation_above_baseline() {
        let mut correlator = LossCorrelator::new();
        // Four games on Bind with three losses, two wins elsewhere:
        // baseline 50%, Bind at 75%.
        correlator.add_match(false, Some("Bind"), NO_AGENTS, false, false);
        correlator.add_match(false, Some("Bind"), NO_AGENTS, false, false);
        correlator.add_match(false, Some("Bind"), NO_AGENTS, false, false);
        correlator.add_match(true, Some("Bind"), NO_AGENTS, false, false);
        correlator.add_match(true, Some("Haven"), NO_AGENTS, false, false);
        correlator.add_match(true, Some("Ascent"), NO_AGENTS, false, false);

        let correlations = correlator.analyze();
        assert_eq!(correlations.len(), 1);
        let bind = &correlations[0];
        assert_eq!(bind.factor, "Playing on Bind");
        assert_eq!(bind.loss_correlation, 75.0);
        assert_eq!(bind.sample_size, 4);
        assert_eq!(bind.significance, Significance::High);
    }

    #[test]
    fn test_map_at_baseline_not_surfaced() {
        let mut correlator = LossCorrelator::new();
        // 50% on the map vs 50% baseline: no signal.
        correlator.add_match(false, Some("Bind"), NO_AGENTS, false, false);
        correlator.add_match(true, Some("Bind"), NO_AGENTS, false, false);
        correlator.add_match(false, Some("Haven"), NO_AGENTS, false, false);
        correlator.add_match(true, Some("Haven"), NO_AGENTS, false, false);

        assert!(correlator.analyze().is_empty());
    }

    #[test]
    fn test_needs_three_matches_and_a_loss() {
        let mut correlator = LossCorrelator::new();
        correlator.add_match(false, Some("Bind"), NO_AGENTS, false, false);
        correlator.add_match(false, Some("Bind"), NO_AGENTS, false, false);
        assert!(correlator.analyze().is_empty());

        let mut all_wins = LossCorrelator::new();
        for _ in 0..4 {
            all_wins.add_match(true, Some("Bind"), NO_AGENTS, false, false);
        }
        assert!(all_wins.analyze().is_empty());
    }

    #[test]
    fn test_role_absence_correlation() {
        let mut correlator = LossCorrelator::new();
        let no_controller = ["Jett", "Sova", "Killjoy", "Sage", "Raze"];
        let standard = ["Jett", "Omen", "Sova", "Killjoy", "Sage"];
        correlator.add_match(false, None, &no_controller, false, false);
        correlator.add_match(false, None, &no_controller, false, false);
        correlator.add_match(true, None, &standard, false, false);

        let correlations = correlator.analyze();
        let absence = correlations
            .iter()
            .find(|c| c.factor == "No controller in composition")
            .unwrap();
        assert_eq!(absence.loss_correlation, 100.0);
        assert_eq!(absence.significance, Significance::Medium);
    }

    #[test]
    fn test_role_stacking_correlation() {
        let mut correlator = LossCorrelator::new();
        let double_duelist = ["Jett", "Raze", "Omen", "Sova", "Killjoy"];
        let standard = ["Jett", "Omen", "Sova", "Killjoy", "Sage"];
        correlator.add_match(false, None, &double_duelist, false, false);
        correlator.add_match(false, None, &double_duelist, false, false);
        correlator.add_match(false, None, &double_duelist, false, false);
        correlator.add_match(true, None, &standard, false, false);

        let correlations = correlator.analyze();
        assert!(correlations
            .iter()
            .any(|c| c.factor == "2+ duelists in composition"));
    }

    #[test]
    fn test_overtime_and_decider_are_high_significance() {
        let mut correlator = LossCorrelator::new();
        correlator.add_match(false, None, NO_AGENTS, true, true);
        correlator.add_match(false, None, NO_AGENTS, true, true);
        correlator.add_match(true, None, NO_AGENTS, false, false);

        let correlations = correlator.analyze();
        let overtime = correlations
            .iter()
            .find(|c| c.factor == "Games going to overtime")
            .unwrap();
        assert_eq!(overtime.significance, Significance::High);
        let decider = correlations
            .iter()
            .find(|c| c.factor == "Decider maps (BO3 map 3)")
            .unwrap();
        assert_eq!(decider.significance, Significance::High);
    }

    #[test]
    fn test_summary_keeps_top_five() {
        let mut correlator = LossCorrelator::new();
        let double_duelist = ["Jett", "Raze", "Omen"];
        for _ in 0..4 {
            correlator.add_match(false, Some("Bind"), &double_duelist, true, true);
        }
        correlator.add_match(true, Some("Haven"), NO_AGENTS, false, false);
        correlator.add_match(true, Some("Ascent"), NO_AGENTS, false, false);

        let summary = correlator.summary();
        assert!(summary.patterns_found >= summary.patterns.len());
        assert!(summary.patterns.len() <= 5);
        assert!(summary.top_factor.is_some());
        // Sorted strongest-first
        for pair in summary.patterns.windows(2) {
            assert!(pair[0].loss_correlation >= pair[1].loss_correlation);
        }
    }

    #[test]
    fn test_empty_summary_text() {
        let correlator = LossCorrelator::new();
        let summary = correlator.summary();
        assert_eq!(summary.patterns_found, 0);
        assert_eq!(
            summary.actionable_insight,
            "Not enough data to identify loss patterns"
        );
    }
}
