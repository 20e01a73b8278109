//! Provider data ingestion
//!
//! Validated record types for the statistics provider's series and event
//! JSON, plus file loaders for the CLI. Fetching is owned by external
//! clients; this module only shapes already-fetched payloads.

pub mod records;

pub use records::{
    GameRecord, GameTeamEntry, MapInfo, NameField, PlayerEntry, RawActor, RawEvent, RawPosition,
    RoundEvents, SeriesMetadata, SeriesRecord, SeriesTeamEntry, TournamentInfo,
};

use crate::Result;
use std::fs;
use std::path::Path;

/// Load a JSON array of series records from disk.
pub fn load_series_file(path: &Path) -> Result<Vec<SeriesRecord>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Load a JSON array of per-round event batches from disk.
pub fn load_events_file(path: &Path) -> Result<Vec<RoundEvents>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
