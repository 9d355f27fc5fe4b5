//! Battle terrain types and their effects
//!
//! Each terrain carries a movement cost (ground and hover), fire modifiers
//! and three line-of-sight values: one used when the terrain is under the
//! firing unit, one when it lies between shooter and target, and one when it
//! is under the target.

use serde::{Deserialize, Serialize};

/// How a unit crosses terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    #[default]
    Ground,
    Hover,
}

/// Line-of-sight obstruction values for one terrain type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LosValues {
    pub firing: u8,
    pub intervening: u8,
    pub target: u8,
}

/// Which end of a sight line a terrain value is read for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LosContext {
    Firing,
    Intervening,
    Target,
}

/// Primary terrain type for a battle hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    #[default]
    Clear,
    Roads, // Roads & bridges
    Slope,
    Hilltop,
    City,
    River,
    Lake,   // Hover units only
    Forest,
    Swamp,
    Rubble,
    Fortress,
}

impl TerrainType {
    pub const ALL: [TerrainType; 11] = [
        TerrainType::Clear,
        TerrainType::Roads,
        TerrainType::Slope,
        TerrainType::Hilltop,
        TerrainType::City,
        TerrainType::River,
        TerrainType::Lake,
        TerrainType::Forest,
        TerrainType::Swamp,
        TerrainType::Rubble,
        TerrainType::Fortress,
    ];

    /// Movement points to enter this hex on the ground (infinite = impassable)
    pub fn movement_cost(&self) -> f32 {
        match self {
            TerrainType::Clear => 1.0,
            TerrainType::Roads => 0.5,
            TerrainType::Slope => 2.0,
            TerrainType::Hilltop => 2.0,
            TerrainType::City => 0.5,
            TerrainType::River => 2.0,
            TerrainType::Lake => f32::INFINITY,
            TerrainType::Forest => 2.0,
            TerrainType::Swamp => 2.0,
            TerrainType::Rubble => 2.0,   // +1 over the underlying hex
            TerrainType::Fortress => 2.0, // +1 over the underlying hex
        }
    }

    /// Movement points to enter this hex for hover units
    pub fn hover_movement_cost(&self) -> f32 {
        match self {
            TerrainType::Roads => 0.5,
            TerrainType::Clear | TerrainType::City | TerrainType::Lake | TerrainType::Swamp => 1.0,
            TerrainType::Slope
            | TerrainType::Hilltop
            | TerrainType::River
            | TerrainType::Forest
            | TerrainType::Rubble
            | TerrainType::Fortress => 2.0,
        }
    }

    pub fn entry_cost(&self, mode: MovementMode) -> f32 {
        match mode {
            MovementMode::Ground => self.movement_cost(),
            MovementMode::Hover => self.hover_movement_cost(),
        }
    }

    pub fn is_passable(&self, mode: MovementMode) -> bool {
        self.entry_cost(mode).is_finite()
    }

    /// Defense modifier against direct fire
    pub fn direct_fire_modifier(&self) -> i32 {
        match self {
            TerrainType::Slope | TerrainType::Hilltop | TerrainType::Forest | TerrainType::Rubble => 2,
            TerrainType::City => 6,
            TerrainType::Fortress => 12,
            _ => 0,
        }
    }

    /// Defense modifier against indirect fire
    pub fn indirect_fire_modifier(&self) -> i32 {
        match self {
            TerrainType::Slope | TerrainType::Hilltop | TerrainType::Forest => 4,
            TerrainType::City => 8,
            TerrainType::Fortress => 12,
            _ => 2,
        }
    }

    pub fn los_values(&self) -> LosValues {
        let (firing, intervening, target) = match self {
            TerrainType::Forest | TerrainType::City => (0, 2, 0),
            TerrainType::Slope => (1, 1, 1),
            TerrainType::Hilltop => (2, 3, 2),
            _ => (0, 0, 0),
        };
        LosValues {
            firing,
            intervening,
            target,
        }
    }

    pub fn los_value(&self, context: LosContext) -> u8 {
        let values = self.los_values();
        match context {
            LosContext::Firing => values.firing,
            LosContext::Intervening => values.intervening,
            LosContext::Target => values.target,
        }
    }

    /// Terrain left behind when this hex is reduced to rubble
    pub fn rubbled(&self) -> TerrainType {
        match self {
            TerrainType::Lake | TerrainType::River => *self,
            _ => TerrainType::Rubble,
        }
    }

    pub fn special_rules(&self) -> &'static [&'static str] {
        match self {
            TerrainType::Roads => &["Road movement ignores terrain of underlying hex"],
            TerrainType::River => &["Towed units may only cross at bridges"],
            TerrainType::Lake => &["Hover units only"],
            TerrainType::Swamp => &[
                "Tracked and wheeled vehicles may not enter",
                "Dismounted infantry: 2 MF to enter",
            ],
            TerrainType::Rubble => &["Additional +1 MF to underlying terrain cost"],
            TerrainType::Fortress => &[
                "Additional +1 MF to underlying terrain cost",
                "Do not add additional terrain bonuses if rubbled",
                "If rubbled, remove fortress and treat as rubble hex",
            ],
            _ => &[],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainType::Clear => "Clear",
            TerrainType::Roads => "Roads & Bridges",
            TerrainType::Slope => "Slope",
            TerrainType::Hilltop => "Hilltop",
            TerrainType::City => "City",
            TerrainType::River => "River",
            TerrainType::Lake => "Lake",
            TerrainType::Forest => "Forest",
            TerrainType::Swamp => "Swamp",
            TerrainType::Rubble => "Rubble",
            TerrainType::Fortress => "Fortress",
        }
    }
}
