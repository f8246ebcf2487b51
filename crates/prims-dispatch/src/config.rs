use serde::{Deserialize, Serialize};

/// Limits enforced before any cryptographic work starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Largest `length` accepted by `random_bytes`.
    pub max_random_bytes: usize,
    /// Largest leaf list accepted by the Merkle operations.
    pub max_leaves: usize,
    /// Largest array accepted by select, sample and shuffle.
    pub max_sample_array: usize,
    /// Largest signature or public-key list accepted by BLS aggregation.
    pub max_aggregate: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_random_bytes: 1024 * 1024,
            max_leaves: 1_000_000,
            max_sample_array: 1_000_000,
            max_aggregate: 10_000,
        }
    }
}

impl DispatchConfig {
    /// Configuration with no effective limits.
    pub fn unlimited() -> Self {
        Self {
            max_random_bytes: usize::MAX,
            max_leaves: usize::MAX,
            max_sample_array: usize::MAX,
            max_aggregate: usize::MAX,
        }
    }
}
