//! Derived analyzers
//!
//! Threshold-gated weakness detection and loss-correlation analysis over
//! the aggregated records. Both recompute on demand from their own
//! accumulators and degrade to empty results under sparse data.

pub mod correlation;
pub mod weakness;

pub use correlation::{CorrelationSummary, LossCorrelation, LossCorrelator, Significance};
pub use weakness::{Weakness, WeaknessKind, WeaknessScorer};
