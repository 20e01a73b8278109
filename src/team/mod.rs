//! Team-level record aggregation
//!
//! Series and map win-loss ledgers, head-to-head records, tournament
//! splits, recent form, and streak analysis.

pub mod records;

pub use records::{FormSummary, StreakKind, StreakSummary, TeamRecordAggregator, TeamStats};
