//! Role-count feature vectors for team compositions

use crate::spatial::zones::normalize_map_name;
use crate::Role;

/// Dimensionality of a composition vector: one slot per role, in
/// [`Role::ALL`] order.
pub const ROLE_DIMS: usize = 4;

/// A team composition as a feature vector, tagged with its outcome.
#[derive(Debug, Clone)]
pub struct CompositionVector {
    pub agents: Vec<String>,
    pub vector: [f64; ROLE_DIMS],
    pub map_name: String,
    pub won: bool,
}

impl CompositionVector {
    pub fn new<S: AsRef<str>>(agents: &[S], map_name: &str, won: bool) -> Self {
        CompositionVector {
            agents: agents.iter().map(|a| a.as_ref().to_string()).collect(),
            vector: role_vector(agents),
            map_name: if map_name.is_empty() {
                String::new()
            } else {
                normalize_map_name(map_name)
            },
            won,
        }
    }
}

/// Count agents per role. Unknown agents contribute to no slot.
pub fn role_vector<S: AsRef<str>>(agents: &[S]) -> [f64; ROLE_DIMS] {
    let mut counts = [0.0; ROLE_DIMS];
    for agent in agents {
        if let Some(role) = Role::for_agent(agent.as_ref()) {
            counts[role.index()] += 1.0;
        }
    }
    counts
}
