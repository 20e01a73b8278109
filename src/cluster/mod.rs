//! Composition clustering
//!
//! Unsupervised grouping of historical team compositions into playstyle
//! archetypes: role-count vectors, a small fixed-seed k-means, and labeled
//! cluster profiles behind an explicit Untrained/Trained state machine.

pub mod kmeans;
pub mod profile;
pub mod vector;

pub use kmeans::{KMeans, Standardizer};
pub use profile::{ClusterProfile, CompositionClusterer, RoleMix};
pub use vector::{CompositionVector, ROLE_DIMS};
