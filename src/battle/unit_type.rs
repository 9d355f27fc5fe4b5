//! Unit types and their base ratings
//!
//! Ratings are plain data keyed by unit type; a unit copies them when created.

use serde::{Deserialize, Serialize};

use crate::battle::terrain::MovementMode;

/// Type of combat unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    // Armor
    HeavyTank,
    MissileTank,
    LightTank,
    Superheavy,

    // Artillery
    Howitzer,
    #[serde(rename = "lad")]
    Lad, // Light anti-armor defense
    MobileHowitzer,

    // Ground-effect vehicles
    #[serde(rename = "gev")]
    Gev,
    #[serde(rename = "light_gev")]
    LightGev,
    #[serde(rename = "gev_carrier")]
    GevCarrier,

    // Infantry
    Infantry,
    HeavyWeaponsTeam,
    Engineers,
}

/// Base ratings for a unit type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRatings {
    pub firepower: u32,
    pub range: u32, // In hexes
    pub defense: u32,
    pub movement: f32, // Movement points per turn
}

impl UnitType {
    pub const ALL: [UnitType; 13] = [
        UnitType::HeavyTank,
        UnitType::MissileTank,
        UnitType::LightTank,
        UnitType::Superheavy,
        UnitType::Howitzer,
        UnitType::Lad,
        UnitType::MobileHowitzer,
        UnitType::Gev,
        UnitType::LightGev,
        UnitType::GevCarrier,
        UnitType::Infantry,
        UnitType::HeavyWeaponsTeam,
        UnitType::Engineers,
    ];

    pub fn ratings(&self) -> UnitRatings {
        let (firepower, range, defense, movement) = match self {
            UnitType::HeavyTank => (4, 2, 3, 3.0),
            UnitType::MissileTank => (3, 4, 2, 2.0),
            UnitType::LightTank => (2, 2, 2, 3.0),
            UnitType::Superheavy => (6, 3, 5, 3.0),
            UnitType::Howitzer => (6, 8, 1, 0.0),
            UnitType::Lad => (2, 8, 1, 0.0),
            UnitType::MobileHowitzer => (6, 6, 2, 1.0),
            UnitType::Gev => (2, 2, 2, 7.0),
            UnitType::LightGev => (1, 2, 1, 7.0),
            UnitType::GevCarrier => (1, 2, 2, 5.0),
            UnitType::Infantry => (1, 1, 1, 2.0),
            UnitType::HeavyWeaponsTeam => (3, 4, 1, 2.0),
            UnitType::Engineers => (2, 1, 2, 2.0),
        };
        UnitRatings {
            firepower,
            range,
            defense,
            movement,
        }
    }

    pub fn movement_mode(&self) -> MovementMode {
        match self {
            UnitType::Gev | UnitType::LightGev | UnitType::GevCarrier => MovementMode::Hover,
            _ => MovementMode::Ground,
        }
    }

    /// Emplaced units never move
    pub fn is_static(&self) -> bool {
        self.ratings().movement <= 0.0
    }
}
