//! Record types mirroring the provider's series/event schema
//!
//! Every field the analyzers read is modeled explicitly; everything else in
//! the payload is dropped at deserialization. Missing fields resolve to
//! neutral defaults rather than failing, since the feed is semi-trusted and
//! often partial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One series (best-of-N) as returned by the provider's series-state query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesRecord {
    pub id: String,
    pub finished: bool,
    pub teams: Vec<SeriesTeamEntry>,
    pub games: Vec<GameRecord>,
}

/// A team's series-level line: name, maps won, and an optional explicit
/// winner flag. Some feeds omit `won` and only report scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesTeamEntry {
    pub name: String,
    pub score: u32,
    pub won: Option<bool>,
}

/// One played map within a series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecord {
    pub map: MapInfo,
    pub teams: Vec<GameTeamEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapInfo {
    pub name: String,
}

/// A team's per-map line, including the roster that played it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameTeamEntry {
    pub name: String,
    pub score: u32,
    pub won: Option<bool>,
    pub side: Option<String>,
    pub players: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerEntry {
    pub name: String,
    pub agent: Option<NameField>,
    pub kills: u32,
    pub deaths: u32,
}

/// Optional series metadata from the provider's listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesMetadata {
    pub tournament: Option<TournamentInfo>,
    #[serde(alias = "startTimeScheduled")]
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentInfo {
    pub name: String,
}

/// A raw round-level combat event. The feed is inconsistent about field
/// names, so the common aliases are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "player")]
    pub killer: Option<RawActor>,
    #[serde(alias = "killed")]
    pub victim: Option<RawActor>,
    #[serde(alias = "location")]
    pub position: Option<RawPosition>,
    #[serde(alias = "weaponId")]
    pub weapon: Option<NameField>,
    #[serde(alias = "side")]
    pub team_side: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawActor {
    pub name: String,
    #[serde(alias = "agentId")]
    pub agent: Option<NameField>,
    #[serde(alias = "side")]
    pub team_side: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPosition {
    pub x: f64,
    pub y: f64,
}

/// A field that arrives either as a bare string or as `{"name": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameField {
    Plain(String),
    Detail { name: String },
}

impl NameField {
    pub fn as_str(&self) -> &str {
        match self {
            NameField::Plain(name) => name,
            NameField::Detail { name } => name,
        }
    }
}

/// One round's worth of raw events, as laid out in the CLI events file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoundEvents {
    pub map_name: String,
    pub round_number: u32,
    pub events: Vec<RawEvent>,
}
