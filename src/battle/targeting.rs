//! Target selection for the fire phase
//!
//! Targets are derived on demand from unit positions and the sight cache;
//! nothing here is stored between calls.

use crate::battle::battle_map::BattleMap;
use crate::battle::hex::HexCoord;
use crate::battle::line_of_sight::{calculate_los, LosCache};
use crate::battle::units::Unit;
use crate::core::error::Result;

/// Is `target` within the shooter's range (inclusive)?
pub fn in_range(shooter: &Unit, target: &Unit) -> bool {
    shooter.position.distance(&target.position) <= shooter.range
}

/// Enemy units the shooter can fire on: in range first, then in sight.
///
/// Result order follows `units` and carries no meaning.
pub fn valid_targets<'a>(
    map: &BattleMap,
    cache: &mut LosCache,
    shooter: &Unit,
    units: &'a [Unit],
) -> Result<Vec<&'a Unit>> {
    let mut targets = Vec::new();
    for candidate in units {
        if !shooter.is_enemy_of(candidate) || !in_range(shooter, candidate) {
            continue;
        }
        if calculate_los(map, cache, shooter.position, candidate.position)?.has_los {
            targets.push(candidate);
        }
    }
    Ok(targets)
}

/// Every other unit, of either side, with a clear line to `target`
pub fn units_with_los_to<'a>(
    map: &BattleMap,
    cache: &mut LosCache,
    target: &Unit,
    units: &'a [Unit],
) -> Result<Vec<&'a Unit>> {
    let mut observers = Vec::new();
    for unit in units {
        if unit.id == target.id {
            continue;
        }
        if calculate_los(map, cache, unit.position, target.position)?.has_los {
            observers.push(unit);
        }
    }
    Ok(observers)
}

/// All hexes on the map visible from `origin`, in ascending (q, r) order.
/// No range limit.
pub fn visible_from(map: &BattleMap, cache: &mut LosCache, origin: HexCoord) -> Result<Vec<HexCoord>> {
    let mut visible = Vec::new();
    for coord in map.coords() {
        if calculate_los(map, cache, origin, coord)?.has_los {
            visible.push(coord);
        }
    }
    Ok(visible)
}

/// All hexes visible from a unit's position
pub fn visible_hexes(map: &BattleMap, cache: &mut LosCache, unit: &Unit) -> Result<Vec<HexCoord>> {
    visible_from(map, cache, unit.position)
}
