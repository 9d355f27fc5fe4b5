//! Units on the battle map
//!
//! A unit is owned by the battle session. The movement and sight engines only
//! read it; the session debits and restores its movement budget.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::battle::hex::HexCoord;
use crate::battle::terrain::MovementMode;
use crate::battle::unit_type::UnitType;
use crate::core::error::{HexfireError, Result};
use crate::core::types::Side;

/// Unique identifier for units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// A combat unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub side: Side,

    // Position
    pub position: HexCoord,

    // Ratings (combat only, never read by movement)
    pub firepower: u32,
    pub range: u32,
    pub defense: u32,

    // Movement
    pub movement: f32,
    pub remaining_movement: f32,
}

impl Unit {
    pub fn new(unit_type: UnitType, side: Side, position: HexCoord) -> Self {
        let ratings = unit_type.ratings();
        Self {
            id: UnitId::new(),
            unit_type,
            side,
            position,
            firepower: ratings.firepower,
            range: ratings.range,
            defense: ratings.defense,
            movement: ratings.movement,
            remaining_movement: ratings.movement,
        }
    }

    pub fn movement_mode(&self) -> MovementMode {
        self.unit_type.movement_mode()
    }

    pub fn can_move(&self) -> bool {
        self.remaining_movement > 0.0
    }

    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.side != other.side
    }

    /// Spend movement points. Fails without changing anything if the unit
    /// cannot afford `cost`.
    pub fn debit_movement(&mut self, cost: f32) -> Result<()> {
        if !(cost.is_finite() && cost >= 0.0) {
            return Err(HexfireError::IllegalMove(format!(
                "movement cost {} is not a finite non-negative number",
                cost
            )));
        }
        if cost > self.remaining_movement {
            return Err(HexfireError::IllegalMove(format!(
                "cost {} exceeds remaining movement {}",
                cost, self.remaining_movement
            )));
        }
        self.remaining_movement -= cost;
        Ok(())
    }

    /// Restore the full movement allowance (start of a new turn)
    pub fn reset_movement(&mut self) {
        self.remaining_movement = self.movement;
    }
}
