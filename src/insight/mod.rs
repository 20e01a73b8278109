//! Insight synthesis and report assembly
//!
//! Turns aggregated records and auxiliary analysis into a ranked list of
//! Fact -> Consequence -> Recommendation insights, and assembles the full
//! scouting report consumed by the prompt-building and response layers.

pub mod report;
pub mod synthesizer;

pub use report::{CompositionAnalysis, ScoutingPipeline, ScoutingReport};
pub use synthesizer::{AuxiliarySignals, Insight, InsightCategory, InsightSynthesizer};
