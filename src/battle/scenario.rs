//! Scenario files
//!
//! A scenario is a TOML file describing a rectangular map, terrain overrides,
//! starting unit placements and optional engine settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::battle::battle_map::BattleMap;
use crate::battle::constants::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};
use crate::battle::execution::BattleState;
use crate::battle::hex::HexCoord;
use crate::battle::terrain::TerrainType;
use crate::battle::unit_type::UnitType;
use crate::battle::units::Unit;
use crate::core::config::EngineConfig;
use crate::core::error::{HexfireError, Result};
use crate::core::types::Side;

/// Terrain different from the scenario default at one hex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainOverride {
    pub q: i32,
    pub r: i32,
    pub terrain: TerrainType,
}

/// A unit's starting position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPlacement {
    pub unit_type: UnitType,
    pub side: Side,
    pub q: i32,
    pub r: i32,
}

impl UnitPlacement {
    pub fn coord(&self) -> HexCoord {
        HexCoord::new(self.q, self.r)
    }
}

fn default_width() -> u32 {
    DEFAULT_MAP_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_MAP_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub default_terrain: TerrainType,
    #[serde(default)]
    pub starting_side: Side,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub terrain: Vec<TerrainOverride>,
    #[serde(default)]
    pub units: Vec<UnitPlacement>,
}

impl Scenario {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load and validate a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut scenario = Self::from_toml_str(&contents)?;
        if scenario.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                scenario.name = stem.to_string_lossy().into_owned();
            }
        }
        tracing::info!(
            "Loaded scenario '{}' ({}x{}, {} units)",
            scenario.name,
            scenario.width,
            scenario.height,
            scenario.units.len()
        );
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HexfireError::InvalidScenario(format!(
                "map must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        self.engine.validate()?;
        let on_map = |q: i32, r: i32| q >= 0 && r >= 0 && (q as u32) < self.width && (r as u32) < self.height;
        if let Some(bad) = self.terrain.iter().find(|t| !on_map(t.q, t.r)) {
            return Err(HexfireError::InvalidScenario(format!(
                "terrain override at ({}, {}) is off the map",
                bad.q, bad.r
            )));
        }
        if let Some(bad) = self.units.iter().find(|u| !on_map(u.q, u.r)) {
            return Err(HexfireError::InvalidScenario(format!(
                "{:?} placed at ({}, {}) is off the map",
                bad.unit_type, bad.q, bad.r
            )));
        }
        Ok(())
    }

    pub fn build_map(&self) -> Result<BattleMap> {
        let mut map = BattleMap::filled(self.width, self.height, self.default_terrain);
        for entry in &self.terrain {
            map.set_terrain(HexCoord::new(entry.q, entry.r), entry.terrain)?;
        }
        Ok(map)
    }

    pub fn build_units(&self) -> Vec<Unit> {
        self.units
            .iter()
            .map(|p| Unit::new(p.unit_type, p.side, p.coord()))
            .collect()
    }

    /// Fresh battle session at turn one
    pub fn into_battle(&self) -> Result<BattleState> {
        let mut state = BattleState::new(self.build_map()?, self.build_units(), self.engine.clone())?;
        state.moving_side = self.starting_side;
        Ok(state)
    }
}

/// Get path to a bundled scenario file
pub fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from("data/scenarios").join(format!("{}.toml", name))
}
