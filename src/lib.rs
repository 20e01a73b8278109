//! VALORANT scouting analytics core
//!
//! Converts sparse match telemetry (series results, round-level combat
//! events, team compositions) into a ranked set of tactical insights.
//! Network fetch, report prose, and persistence live outside this crate;
//! everything here is a synchronous in-memory pipeline over already-fetched
//! provider data.

pub mod analysis;
pub mod cluster;
pub mod ingest;
pub mod insight;
pub mod spatial;
pub mod team;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which half of the round a player was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attack,
    Defense,
}

impl Side {
    /// Parse a provider-side label. Anything that is not recognizably
    /// defense counts as attack, matching the upstream feed's looseness.
    pub fn from_label(label: &str) -> Side {
        match label.trim().to_ascii_lowercase().as_str() {
            "defense" | "defender" | "def" => Side::Defense,
            _ => Side::Attack,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Attack => write!(f, "attack"),
            Side::Defense => write!(f, "defense"),
        }
    }
}

/// Combat event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Kill,
    Death,
}

/// Agent role classes used for composition vectors and correlation factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Duelist,
    Controller,
    Initiator,
    Sentinel,
}

impl Role {
    /// All roles in the fixed order used by composition vectors.
    pub const ALL: [Role; 4] = [
        Role::Duelist,
        Role::Controller,
        Role::Initiator,
        Role::Sentinel,
    ];

    /// Position of this role in a composition vector.
    pub fn index(&self) -> usize {
        match self {
            Role::Duelist => 0,
            Role::Controller => 1,
            Role::Initiator => 2,
            Role::Sentinel => 3,
        }
    }

    /// Lowercase label for factor strings and JSON keys.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Duelist => "duelist",
            Role::Controller => "controller",
            Role::Initiator => "initiator",
            Role::Sentinel => "sentinel",
        }
    }

    /// Look up the role for an agent, case-insensitively.
    pub fn for_agent(agent: &str) -> Option<Role> {
        let agent = agent.trim();
        AGENT_ROLES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(agent))
            .map(|(_, role)| *role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Duelist => write!(f, "Duelist"),
            Role::Controller => write!(f, "Controller"),
            Role::Initiator => write!(f, "Initiator"),
            Role::Sentinel => write!(f, "Sentinel"),
        }
    }
}

/// Static agent roster. New agents land here; unknown names fall through to
/// `None` and are ignored by the role-based analyzers.
static AGENT_ROLES: [(&str, Role); 25] = [
    ("Jett", Role::Duelist),
    ("Raze", Role::Duelist),
    ("Reyna", Role::Duelist),
    ("Phoenix", Role::Duelist),
    ("Yoru", Role::Duelist),
    ("Neon", Role::Duelist),
    ("Iso", Role::Duelist),
    ("Brimstone", Role::Controller),
    ("Omen", Role::Controller),
    ("Astra", Role::Controller),
    ("Viper", Role::Controller),
    ("Harbor", Role::Controller),
    ("Clove", Role::Controller),
    ("Sova", Role::Initiator),
    ("Breach", Role::Initiator),
    ("Skye", Role::Initiator),
    ("KAY/O", Role::Initiator),
    ("Fade", Role::Initiator),
    ("Gekko", Role::Initiator),
    ("Sage", Role::Sentinel),
    ("Cypher", Role::Sentinel),
    ("Killjoy", Role::Sentinel),
    ("Chamber", Role::Sentinel),
    ("Deadlock", Role::Sentinel),
    ("Vyse", Role::Sentinel),
];

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no series mentioned team \"{0}\"")]
    TeamNotFound(String),

    #[error("unknown map \"{0}\" (known: {1})")]
    UnknownMap(String, String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;

/// Tunables for one analysis run. Components take their gates from here so
/// a caller can tighten or relax them per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of most-recent series considered "current form"
    pub form_window: usize,
    /// Map win rate below which a map counts as weak
    pub weak_map_threshold: f64,
    /// Map win rate at or above which a map counts as strong
    pub strong_map_threshold: f64,
    /// Minimum games on a map before it is judged at all
    pub min_map_games: u32,
    /// Target number of composition clusters
    pub n_clusters: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            form_window: 5,
            weak_map_threshold: 0.40,
            strong_map_threshold: 0.60,
            min_map_games: 2,
            n_clusters: 4,
        }
    }
}

/// Round to one decimal place (percentage fields in the output contract).
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places (rate/ratio fields in the output contract).
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_role_lookup() {
        assert_eq!(Role::for_agent("Jett"), Some(Role::Duelist));
        assert_eq!(Role::for_agent("jett"), Some(Role::Duelist));
        assert_eq!(Role::for_agent(" kay/o "), Some(Role::Initiator));
        assert_eq!(Role::for_agent("Vyse"), Some(Role::Sentinel));
        assert_eq!(Role::for_agent("NotAnAgent"), None);
    }

    #[test]
    fn test_side_labels() {
        assert_eq!(Side::from_label("defense"), Side::Defense);
        assert_eq!(Side::from_label("Defender"), Side::Defense);
        assert_eq!(Side::from_label("attack"), Side::Attack);
        assert_eq!(Side::from_label("???"), Side::Attack);
    }

    #[test]
    fn test_role_vector_order() {
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }
}
