//! Engine defaults and the serializable engine configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Step bound of a rewrite run.
pub const DEFAULT_MAX_REWRITE_STEPS: usize = 8;

/// Resolution step budget of one axiom-search query.
pub const DEFAULT_SEARCH_STEP_LIMIT: usize = 10_000;

/// First index assigned by canonical encoding.
pub const DEFAULT_INDEX_BASE: u32 = 1;

/// Tunables shared by the rewriter and the axiom search.
///
/// Missing fields take their defaults when decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum applied rewrite steps per run.
    pub max_rewrite_steps: usize,
    /// Maximum resolution steps per search query.
    pub search_step_limit: usize,
    /// Base index for canonical trees produced by a run.
    pub index_base: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rewrite_steps: DEFAULT_MAX_REWRITE_STEPS,
            search_step_limit: DEFAULT_SEARCH_STEP_LIMIT,
            index_base: DEFAULT_INDEX_BASE,
        }
    }
}

impl EngineConfig {
    /// Serializes the config to CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, ConfigError> {
        let bytes = serde_cbor::to_vec(self)?;
        Ok(bytes)
    }

    /// Deserializes a config from CBOR bytes.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_cbor::from_slice(bytes)?;
        Ok(config)
    }
}
