//! Playstyle archetypes from composition clusters
//!
//! [`CompositionClusterer`] collects role-count vectors and, once fitted,
//! exposes labeled cluster profiles. Training is an explicit state machine:
//! `Untrained -> Trained` only via [`CompositionClusterer::fit`], and a
//! re-fit swaps the trained state wholesale rather than patching it.

use serde::Serialize;

use crate::cluster::kmeans::{KMeans, Standardizer};
use crate::cluster::vector::{role_vector, CompositionVector, ROLE_DIMS};
use crate::{round1, Role};

/// Seed for the k-means RNG; fixed so repeated runs over the same data
/// produce the same archetypes.
const CLUSTER_SEED: u64 = 42;

/// Averaged role counts of a cluster, one decimal place.
#[derive(Debug, Clone, Serialize)]
pub struct RoleMix {
    pub duelist: f64,
    pub controller: f64,
    pub initiator: f64,
    pub sentinel: f64,
}

impl RoleMix {
    fn from_vector(avg: &[f64; ROLE_DIMS]) -> Self {
        RoleMix {
            duelist: round1(avg[0]),
            controller: round1(avg[1]),
            initiator: round1(avg[2]),
            sentinel: round1(avg[3]),
        }
    }
}

/// One fitted playstyle archetype.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterProfile {
    pub label: String,
    pub role_distribution: RoleMix,
    pub win_rate: f64,
    pub sample_count: usize,
    pub maps_played: Vec<String>,
}

#[derive(Debug)]
struct TrainedModel {
    standardizer: Standardizer,
    kmeans: KMeans,
    profiles: Vec<Option<ClusterProfile>>,
}

#[derive(Debug, Default)]
enum ClustererState {
    #[default]
    Untrained,
    Trained(TrainedModel),
}

/// Clusters historical compositions into playstyle archetypes.
#[derive(Debug)]
pub struct CompositionClusterer {
    n_clusters: usize,
    compositions: Vec<CompositionVector>,
    state: ClustererState,
}

impl Default for CompositionClusterer {
    fn default() -> Self {
        Self::new(4)
    }
}

impl CompositionClusterer {
    pub fn new(n_clusters: usize) -> Self {
        CompositionClusterer {
            n_clusters: n_clusters.max(1),
            compositions: Vec::new(),
            state: ClustererState::Untrained,
        }
    }

    /// Add a composition to the training set. Partial rosters under three
    /// agents carry too little signal and are dropped.
    pub fn add_composition<S: AsRef<str>>(&mut self, agents: &[S], map_name: &str, won: bool) {
        if agents.len() < 3 {
            log::trace!("composition with {} agents dropped", agents.len());
            return;
        }
        self.compositions
            .push(CompositionVector::new(agents, map_name, won));
    }

    pub fn composition_count(&self) -> usize {
        self.compositions.len()
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, ClustererState::Trained(_))
    }

    /// Train on the collected compositions. Returns whether a model was
    /// fitted; with fewer samples than clusters no transition happens.
    /// A successful re-fit discards the previous trained state entirely.
    pub fn fit(&mut self) -> bool {
        if self.compositions.len() < self.n_clusters {
            log::debug!(
                "clustering skipped: {} compositions for {} clusters",
                self.compositions.len(),
                self.n_clusters
            );
            return false;
        }

        let matrix: Vec<Vec<f64>> = self
            .compositions
            .iter()
            .map(|c| c.vector.to_vec())
            .collect();
        let standardizer = Standardizer::fit(&matrix);
        let scaled: Vec<Vec<f64>> = matrix.iter().map(|row| standardizer.transform(row)).collect();

        let k = self.n_clusters.min(scaled.len());
        let kmeans = KMeans::fit(&scaled, k, CLUSTER_SEED);

        let labels: Vec<usize> = scaled.iter().map(|row| kmeans.predict(row)).collect();
        let profiles = self.build_profiles(&labels, k);

        self.state = ClustererState::Trained(TrainedModel {
            standardizer,
            kmeans,
            profiles,
        });
        true
    }

    fn build_profiles(&self, labels: &[usize], k: usize) -> Vec<Option<ClusterProfile>> {
        (0..k)
            .map(|cluster| {
                let members: Vec<&CompositionVector> = self
                    .compositions
                    .iter()
                    .zip(labels)
                    .filter(|(_, label)| **label == cluster)
                    .map(|(comp, _)| comp)
                    .collect();
                if members.is_empty() {
                    return None;
                }

                let mut avg = [0.0; ROLE_DIMS];
                for member in &members {
                    for (slot, v) in avg.iter_mut().zip(member.vector.iter()) {
                        *slot += v;
                    }
                }
                for slot in &mut avg {
                    *slot /= members.len() as f64;
                }

                let wins = members.iter().filter(|m| m.won).count();
                let mut maps_played: Vec<String> = Vec::new();
                for member in &members {
                    if !member.map_name.is_empty() && !maps_played.contains(&member.map_name) {
                        maps_played.push(member.map_name.clone());
                    }
                }

                Some(ClusterProfile {
                    label: archetype_label(&avg),
                    role_distribution: RoleMix::from_vector(&avg),
                    win_rate: round1(wins as f64 / members.len() as f64 * 100.0),
                    sample_count: members.len(),
                    maps_played,
                })
            })
            .collect()
    }

    /// All fitted profiles, empty when untrained.
    pub fn profiles(&self) -> Vec<&ClusterProfile> {
        match &self.state {
            ClustererState::Untrained => Vec::new(),
            ClustererState::Trained(model) => {
                model.profiles.iter().filter_map(|p| p.as_ref()).collect()
            }
        }
    }

    /// Map a composition to its nearest fitted archetype. `None` until a
    /// model has been fitted.
    pub fn predict_style<S: AsRef<str>>(&self, agents: &[S]) -> Option<&ClusterProfile> {
        let ClustererState::Trained(model) = &self.state else {
            return None;
        };
        let vector = role_vector(agents);
        let scaled = model.standardizer.transform(&vector);
        let cluster = model.kmeans.predict(&scaled);
        model.profiles.get(cluster)?.as_ref()
    }
}

/// Derive a descriptive label from a cluster's averaged role counts.
///
/// Roles within 0.3 of the maximum count are "dominant". One dominant role
/// labels directly; the duelist+initiator and controller+sentinel pairings
/// get their archetype names; anything else is balanced.
fn archetype_label(avg: &[f64; ROLE_DIMS]) -> String {
    let max = avg.iter().cloned().fold(f64::MIN, f64::max);
    let dominant: Vec<Role> = Role::ALL
        .iter()
        .copied()
        .filter(|role| avg[role.index()] >= max - 0.3)
        .collect();

    if dominant.len() == 1 {
        let role = dominant[0];
        if avg[role.index()] >= 2.0 {
            return format!("Heavy {role}");
        }
        return format!("{role}-Focused");
    }
    if dominant.contains(&Role::Duelist) && dominant.contains(&Role::Initiator) {
        return "Aggressive Entry".to_string();
    }
    if dominant.contains(&Role::Controller) && dominant.contains(&Role::Sentinel) {
        return "Defensive Setup".to_string();
    }
    "Balanced Composition".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOUBLE_DUELIST: [&str; 5] = ["Jett", "Raze", "Omen", "Sova", "Killjoy"];
    const STANDARD: [&str; 5] = ["Jett", "Omen", "Sova", "Killjoy", "Sage"];
    const DOUBLE_SENTINEL: [&str; 5] = ["Cypher", "Killjoy", "Omen", "Sage", "Viper"];

    #[test]
    fn test_untrained_predict_is_none() {
        let clusterer = CompositionClusterer::default();
        assert!(clusterer.predict_style(&STANDARD).is_none());
        assert!(clusterer.profiles().is_empty());
    }

    #[test]
    fn test_small_rosters_dropped() {
        let mut clusterer = CompositionClusterer::default();
        clusterer.add_composition(&["Jett", "Omen"], "Bind", true);
        assert_eq!(clusterer.composition_count(), 0);
    }

    #[test]
    fn test_fit_requires_enough_samples() {
        let mut clusterer = CompositionClusterer::default();
        clusterer.add_composition(&STANDARD, "Bind", true);
        clusterer.add_composition(&DOUBLE_DUELIST, "Haven", false);
        assert!(!clusterer.fit());
        assert!(!clusterer.is_trained());
    }

    #[test]
    fn test_fit_and_predict_round_trip() {
        let mut clusterer = CompositionClusterer::default();
        clusterer.add_composition(&DOUBLE_DUELIST, "Bind", true);
        clusterer.add_composition(&DOUBLE_DUELIST, "Haven", true);
        clusterer.add_composition(&STANDARD, "Ascent", false);
        clusterer.add_composition(&DOUBLE_SENTINEL, "Icebox", false);
        clusterer.add_composition(&DOUBLE_SENTINEL, "Split", true);

        assert!(clusterer.fit());
        assert!(clusterer.is_trained());

        // A composition from the training set maps to a real profile.
        let profile = clusterer.predict_style(&DOUBLE_DUELIST).unwrap();
        assert!((0.0..=100.0).contains(&profile.win_rate));
        assert!(profile.sample_count >= 1);
    }

    #[test]
    fn test_profiles_carry_observed_maps() {
        let mut clusterer = CompositionClusterer::new(1);
        clusterer.add_composition(&STANDARD, "Bind", true);
        clusterer.add_composition(&STANDARD, "Bind", false);
        clusterer.add_composition(&STANDARD, "Haven", true);

        assert!(clusterer.fit());
        let profiles = clusterer.profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].sample_count, 3);
        assert_eq!(profiles[0].maps_played, vec!["Bind", "Haven"]);
        assert_eq!(profiles[0].win_rate, 66.7);
    }

    #[test]
    fn test_refit_replaces_state() {
        let mut clusterer = CompositionClusterer::new(1);
        clusterer.add_composition(&STANDARD, "Bind", true);
        assert!(clusterer.fit());
        assert_eq!(clusterer.profiles()[0].sample_count, 1);

        clusterer.add_composition(&DOUBLE_DUELIST, "Haven", false);
        assert!(clusterer.fit());
        assert_eq!(clusterer.profiles()[0].sample_count, 2);
    }

    #[test]
    fn test_heavy_label() {
        assert_eq!(archetype_label(&[2.4, 1.0, 1.0, 0.6]), "Heavy Duelist");
    }

    #[test]
    fn test_focused_label() {
        assert_eq!(archetype_label(&[1.6, 1.0, 1.0, 0.4]), "Duelist-Focused");
    }

    #[test]
    fn test_aggressive_entry_label() {
        assert_eq!(archetype_label(&[1.8, 0.6, 1.7, 0.9]), "Aggressive Entry");
    }

    #[test]
    fn test_defensive_setup_label() {
        assert_eq!(archetype_label(&[0.5, 1.8, 0.7, 1.9]), "Defensive Setup");
    }

    #[test]
    fn test_balanced_label() {
        // Duelist and controller co-dominant: neither archetype pairing.
        assert_eq!(archetype_label(&[1.5, 1.4, 0.8, 0.9]), "Balanced Composition");
    }
}
