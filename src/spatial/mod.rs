//! Spatial analysis
//!
//! Zone classification of raw map coordinates and per-player tendency
//! accumulation over classified combat events.

pub mod tendency;
pub mod zones;

pub use tendency::{PlayerTendency, SpatialEvent, SpatialTendencyTracker};
pub use zones::{normalize_map_name, zone_for_coordinates, ZoneBox, UNKNOWN_ZONE};
