//! Engine configuration
//!
//! Loaded from the `[engine]` table of a scenario file; every field has a
//! default so an empty table (or no table) is valid.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    DEFAULT_HEX_SIZE, DEFAULT_REACHABILITY_CACHE_LIMIT, DEFAULT_SECONDS_PER_HEX,
};
use crate::core::error::{HexfireError, Result};

/// Search strategy used by the path planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSearch {
    /// A* with the hex-distance heuristic scaled by the cheapest terrain on the map
    #[default]
    AStar,
    /// Dijkstra (A* with a zero heuristic)
    UniformCost,
}

/// Configuration for the movement and line-of-sight engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Distance from hex centre to corner in world units
    ///
    /// Only affects world <-> hex conversion and animation positions.
    pub hex_size: f32,

    /// Strategy for `plan_path`
    pub path_search: PathSearch,

    /// Maximum number of reachable sets kept before the cache is flushed
    ///
    /// Each entry holds one flood fill; a full turn of a few dozen units stays
    /// well below the default.
    pub reachability_cache_limit: usize,

    /// Animation speed handed to the presentation layer
    pub seconds_per_hex: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hex_size: DEFAULT_HEX_SIZE,
            path_search: PathSearch::default(),
            reachability_cache_limit: DEFAULT_REACHABILITY_CACHE_LIMIT,
            seconds_per_hex: DEFAULT_SECONDS_PER_HEX,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.hex_size.is_finite() && self.hex_size > 0.0) {
            return Err(HexfireError::InvalidScenario(format!(
                "hex_size must be positive, got {}",
                self.hex_size
            )));
        }
        if self.reachability_cache_limit == 0 {
            return Err(HexfireError::InvalidScenario(
                "reachability_cache_limit must be at least 1".into(),
            ));
        }
        if !(self.seconds_per_hex.is_finite() && self.seconds_per_hex >= 0.0) {
            return Err(HexfireError::InvalidScenario(format!(
                "seconds_per_hex must be non-negative, got {}",
                self.seconds_per_hex
            )));
        }
        Ok(())
    }
}
