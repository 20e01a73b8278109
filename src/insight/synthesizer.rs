//! Rule-based insight generation
//!
//! Independent rule functions over the aggregated records, each with a
//! fixed priority and a templated fact/consequence/recommendation triple.
//! The combined list is stable-sorted by priority so equal-priority
//! insights keep their generation order.

use serde::Serialize;
use serde_json::json;

use crate::analysis::{LossCorrelation, Weakness};
use crate::team::records::TeamRecordAggregator;
use crate::team::StreakKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Team,
    Form,
    Opponent,
    Weakness,
    Pattern,
}

/// An actionable insight for the scouting report.
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub priority: u8,
    pub fact: String,
    pub consequence: String,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Optional signals from the weakness and correlation analyzers.
pub struct AuxiliarySignals<'a> {
    pub weaknesses: &'a [Weakness],
    pub correlations: &'a [LossCorrelation],
}

/// Generates ranked insights from team records, optionally enriched with
/// auxiliary analyzer output.
pub struct InsightSynthesizer<'a> {
    records: &'a TeamRecordAggregator,
    aux: Option<AuxiliarySignals<'a>>,
    form_window: usize,
}

impl<'a> InsightSynthesizer<'a> {
    pub fn new(records: &'a TeamRecordAggregator) -> Self {
        InsightSynthesizer {
            records,
            aux: None,
            form_window: 5,
        }
    }

    pub fn with_auxiliary(mut self, aux: AuxiliarySignals<'a>) -> Self {
        self.aux = Some(aux);
        self
    }

    pub fn with_form_window(mut self, window: usize) -> Self {
        self.form_window = window.max(1);
        self
    }

    /// Run every rule and return the ranked insight list.
    pub fn generate(&self) -> Vec<Insight> {
        let mut insights = Vec::new();

        self.win_rate_insights(&mut insights);
        self.form_insights(&mut insights);
        self.streak_insights(&mut insights);
        self.opponent_insights(&mut insights);
        if let Some(aux) = &self.aux {
            self.weakness_insights(aux.weaknesses, &mut insights);
            self.correlation_insights(aux.correlations, &mut insights);
        }

        // Stable: ties keep generation order.
        insights.sort_by(|a, b| b.priority.cmp(&a.priority));
        insights
    }

    fn win_rate_insights(&self, out: &mut Vec<Insight>) {
        let stats = self.records.stats();
        if stats.total_series < 3 {
            return;
        }
        let win_rate = stats.series_win_rate();

        if win_rate < 0.4 {
            out.push(Insight {
                category: InsightCategory::Team,
                priority: 4,
                fact: format!(
                    "Win rate of {:.0}% over last {} series",
                    win_rate * 100.0,
                    stats.total_series
                ),
                consequence: "Team is struggling, confidence likely affected".to_string(),
                recommendation: "Apply psychological pressure, force clutch situations"
                    .to_string(),
                data: Some(json!({
                    "win_rate": crate::round1(win_rate * 100.0),
                    "series": stats.total_series,
                })),
            });
        } else if win_rate > 0.7 {
            out.push(Insight {
                category: InsightCategory::Team,
                priority: 4,
                fact: format!(
                    "Strong win rate of {:.0}% over last {} series",
                    win_rate * 100.0,
                    stats.total_series
                ),
                consequence: "Team is in dominant form with high confidence".to_string(),
                recommendation:
                    "Prepare anti-strats, study their patterns, expect aggressive plays"
                        .to_string(),
                data: Some(json!({
                    "win_rate": crate::round1(win_rate * 100.0),
                    "series": stats.total_series,
                })),
            });
        }
    }

    fn form_insights(&self, out: &mut Vec<Insight>) {
        let form = self.records.get_form(self.form_window);
        if form.last_n < 3 {
            return;
        }

        if form.win_rate >= 80.0 {
            out.push(Insight {
                category: InsightCategory::Form,
                priority: 5,
                fact: format!(
                    "Team is on a hot streak: {}W-{}L ({}%) in last {} matches",
                    form.wins, form.losses, form.win_rate, form.last_n
                ),
                consequence: "Team has momentum and high confidence".to_string(),
                recommendation: "Don't let them get early advantages, break their rhythm"
                    .to_string(),
                data: serde_json::to_value(&form).ok(),
            });
        } else if form.win_rate <= 40.0 {
            out.push(Insight {
                category: InsightCategory::Form,
                priority: 5,
                fact: format!(
                    "Team is struggling: {}W-{}L ({}%) in last {} matches",
                    form.wins, form.losses, form.win_rate, form.last_n
                ),
                consequence: "Team morale likely low, prone to tilting".to_string(),
                recommendation: "Aggressive early rounds can snowball their frustration"
                    .to_string(),
                data: serde_json::to_value(&form).ok(),
            });
        }
    }

    fn streak_insights(&self, out: &mut Vec<Insight>) {
        let streak = self.records.get_win_streak();
        if streak.current_streak < 3 {
            return;
        }

        match streak.streak_type {
            StreakKind::Win => out.push(Insight {
                category: InsightCategory::Form,
                priority: 4,
                fact: format!("Currently on a {}-game win streak", streak.current_streak),
                consequence: "Team confidence is high, they'll play aggressively".to_string(),
                recommendation: "Force them into uncomfortable situations, break the pattern"
                    .to_string(),
                data: serde_json::to_value(&streak).ok(),
            }),
            StreakKind::Loss => out.push(Insight {
                category: InsightCategory::Form,
                priority: 4,
                fact: format!(
                    "Currently on a {}-game losing streak",
                    streak.current_streak
                ),
                consequence: "Team is tilting, decision-making will be affected".to_string(),
                recommendation: "Stay calm, let them make mistakes, capitalize on errors"
                    .to_string(),
                data: serde_json::to_value(&streak).ok(),
            }),
            StreakKind::None => {}
        }
    }

    fn opponent_insights(&self, out: &mut Vec<Insight>) {
        for opp in self.records.stats().top_opponents(3) {
            if opp.matches < 2 {
                continue;
            }
            if opp.win_rate <= 30.0 {
                out.push(Insight {
                    category: InsightCategory::Opponent,
                    priority: 3,
                    fact: format!(
                        "Struggles against {}: {}% win rate ({}/{})",
                        opp.name, opp.win_rate, opp.wins, opp.matches
                    ),
                    consequence: format!("{} has their number - mental block likely", opp.name),
                    recommendation: format!(
                        "Study how {} plays against them, copy their approach",
                        opp.name
                    ),
                    data: serde_json::to_value(&opp).ok(),
                });
            } else if opp.win_rate >= 70.0 {
                out.push(Insight {
                    category: InsightCategory::Opponent,
                    priority: 3,
                    fact: format!(
                        "Dominates {}: {}% win rate ({}/{})",
                        opp.name, opp.win_rate, opp.wins, opp.matches
                    ),
                    consequence: "Very confident against this style of team".to_string(),
                    recommendation: format!(
                        "Don't play like {} - try different approaches",
                        opp.name
                    ),
                    data: serde_json::to_value(&opp).ok(),
                });
            }
        }
    }

    fn weakness_insights(&self, weaknesses: &[Weakness], out: &mut Vec<Insight>) {
        for weakness in weaknesses.iter().take(3) {
            let priority = if weakness.score >= 70 {
                5
            } else if weakness.score >= 50 {
                4
            } else {
                3
            };
            out.push(Insight {
                category: InsightCategory::Weakness,
                priority,
                fact: weakness.description.clone(),
                consequence: weakness_consequence(weakness),
                recommendation: weakness.recommendation.clone(),
                data: Some(weakness.data.clone()),
            });
        }
    }

    fn correlation_insights(&self, correlations: &[LossCorrelation], out: &mut Vec<Insight>) {
        for correlation in correlations.iter().take(2) {
            out.push(Insight {
                category: InsightCategory::Pattern,
                priority: 4,
                fact: correlation.insight.clone(),
                consequence: format!(
                    "This pattern has held across {} recorded matches",
                    correlation.sample_size
                ),
                recommendation: format!("Exploit: {}", correlation.factor),
                data: Some(json!({
                    "loss_correlation": correlation.loss_correlation,
                    "sample_size": correlation.sample_size,
                })),
            });
        }
    }

    /// Short markdown header block for the report.
    pub fn executive_summary(&self) -> String {
        let stats = self.records.stats();
        let form = self.records.get_form(self.form_window);

        let mut summary = format!(
            "**{}** - {} series analyzed\n\n",
            stats.team_name, stats.total_series
        );
        summary += &format!(
            "- Overall: {}W-{}L ({:.0}% win rate)\n",
            stats.series_wins,
            stats.series_losses,
            stats.series_win_rate() * 100.0
        );
        summary += &format!(
            "- Recent form (last {}): {}W-{}L ({}%)\n",
            form.last_n, form.wins, form.losses, form.win_rate
        );

        let streak = self.records.get_win_streak();
        if streak.current_streak >= 2 {
            let kind = match streak.streak_type {
                StreakKind::Win => "win",
                StreakKind::Loss => "loss",
                StreakKind::None => "none",
            };
            summary += &format!("- Current streak: {} {kind}s\n", streak.current_streak);
        }

        summary
    }

    /// The "how to win" list: the top five recommendations by priority,
    /// supplemented by up to two auxiliary weakness recommendations, padded
    /// with fixed fallbacks when fewer than three lines exist.
    pub fn how_to_win(&self, insights: &[Insight]) -> Vec<String> {
        let mut recommendations: Vec<String> = insights
            .iter()
            .take(5)
            .map(|i| i.recommendation.clone())
            .collect();

        if let Some(aux) = &self.aux {
            for weakness in aux.weaknesses.iter().take(2) {
                if !recommendations.contains(&weakness.recommendation) {
                    recommendations.push(weakness.recommendation.clone());
                }
            }
        }

        if recommendations.len() < 3 {
            recommendations.push("Study their recent matches for patterns".to_string());
            recommendations.push("Focus on your own strengths".to_string());
        }

        recommendations.truncate(7);
        recommendations
    }
}

fn weakness_consequence(weakness: &Weakness) -> String {
    use crate::analysis::WeaknessKind;
    match weakness.kind {
        WeaknessKind::MapVulnerability => {
            "The veto phase can steer the series onto their weakest ground".to_string()
        }
        WeaknessKind::LimitedAgentPool => {
            "Targeted bans can force them onto uncomfortable picks".to_string()
        }
        WeaknessKind::PoorRecentForm => {
            "Confidence is likely low and early pressure compounds it".to_string()
        }
        WeaknessKind::PredictableCompositions => {
            "Their setups can be counter-stratted in advance".to_string()
        }
    }
}
