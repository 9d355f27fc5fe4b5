//! Battle session state
//!
//! Each turn: movement (moving side) -> fire (moving side) -> fire (other
//! side). The session owns the map, the units and both engine caches, and is
//! the only place units are mutated.

use serde::{Deserialize, Serialize};

use crate::battle::battle_map::BattleMap;
use crate::battle::constants::FIRST_TURN;
use crate::battle::hex::HexCoord;
use crate::battle::line_of_sight::{calculate_los, LosCache, LosResult};
use crate::battle::movement::MovementAnimation;
use crate::battle::pathfinding::{is_valid_path, path_cost, plan_path, Path};
use crate::battle::reachability::{ReachabilityCache, ReachableSet};
use crate::battle::targeting;
use crate::battle::terrain::TerrainType;
use crate::battle::units::{Unit, UnitId};
use crate::core::config::EngineConfig;
use crate::core::error::{HexfireError, Result};
use crate::core::types::{Side, Turn};

/// Battle phases within a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Movement, // Moving side moves
    FirstFire,  // Moving side fires
    ReturnFire, // Other side fires
}

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub turn: Turn,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    TurnStarted { side: Side },
    PhaseChanged { phase: BattlePhase },
    UnitMoved { unit_id: UnitId, from: HexCoord, to: HexCoord, cost: f32 },
    MoveRejected { unit_id: UnitId },
    TerrainChanged { coord: HexCoord, from: TerrainType, to: TerrainType },
}

/// Ordered log of everything that changed the session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, turn: Turn) {
        self.events.push(BattleEvent {
            turn,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&BattleEvent> {
        self.events.last()
    }
}

/// Complete battle state
#[derive(Debug, Clone)]
pub struct BattleState {
    // Core state
    pub map: BattleMap,
    units: Vec<Unit>,
    pub config: EngineConfig,

    // Time
    pub turn: Turn,
    pub phase: BattlePhase,
    pub moving_side: Side,

    // Caches
    reachability: ReachabilityCache,
    los: LosCache,

    // Log
    pub battle_log: BattleEventLog,
}

impl BattleState {
    pub fn new(map: BattleMap, units: Vec<Unit>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut state = Self {
            map,
            units: Vec::with_capacity(units.len()),
            reachability: ReachabilityCache::with_limit(config.reachability_cache_limit),
            los: LosCache::new(),
            config,
            turn: FIRST_TURN,
            phase: BattlePhase::Movement,
            moving_side: Side::default(),
            battle_log: BattleEventLog::new(),
        };
        for unit in units {
            state.add_unit(unit)?;
        }
        Ok(state)
    }

    /// Place a unit on the map. Stacking is not checked.
    pub fn add_unit(&mut self, unit: Unit) -> Result<UnitId> {
        self.map.tile(unit.position)?;
        let id = unit.id;
        self.units.push(unit);
        Ok(id)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn units_of(&self, side: Side) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(move |unit| unit.side == side)
    }

    pub fn unit(&self, unit_id: UnitId) -> Result<&Unit> {
        self.units
            .iter()
            .find(|unit| unit.id == unit_id)
            .ok_or(HexfireError::UnitNotFound(unit_id))
    }

    fn unit_index(&self, unit_id: UnitId) -> Result<usize> {
        self.units
            .iter()
            .position(|unit| unit.id == unit_id)
            .ok_or(HexfireError::UnitNotFound(unit_id))
    }

    /// Side allowed to fire in the current phase, if any
    pub fn firing_side(&self) -> Option<Side> {
        match self.phase {
            BattlePhase::Movement => None,
            BattlePhase::FirstFire => Some(self.moving_side),
            BattlePhase::ReturnFire => Some(self.moving_side.opponent()),
        }
    }

    /// Log a battle event
    pub fn log_event(&mut self, event_type: BattleEventType, description: String) {
        self.battle_log.push(event_type, description, self.turn);
    }

    /// Move to the next phase, rolling over into a new turn after return fire
    pub fn advance_phase(&mut self) -> BattlePhase {
        match self.phase {
            BattlePhase::Movement => self.enter_phase(BattlePhase::FirstFire),
            BattlePhase::FirstFire => self.enter_phase(BattlePhase::ReturnFire),
            BattlePhase::ReturnFire => self.start_next_turn(),
        }
        self.phase
    }

    fn enter_phase(&mut self, phase: BattlePhase) {
        self.phase = phase;
        tracing::info!("Turn {}: {:?} phase", self.turn, phase);
        self.log_event(
            BattleEventType::PhaseChanged { phase },
            format!("{:?} phase", phase),
        );
    }

    /// Restore every unit's movement, hand the move to the other side and
    /// drop all reachable sets
    pub fn start_next_turn(&mut self) {
        for unit in &mut self.units {
            unit.reset_movement();
        }
        self.turn += 1;
        self.moving_side = self.moving_side.opponent();
        self.phase = BattlePhase::Movement;
        self.reachability.clear();

        let side = self.moving_side;
        tracing::info!("Turn {} begins, {} moves", self.turn, side);
        self.log_event(
            BattleEventType::TurnStarted { side },
            format!("Turn {} begins, {} to move", self.turn, side),
        );
    }

    /// Hexes the unit can reach this turn, from the cache when possible
    pub fn reachable_for(&mut self, unit_id: UnitId) -> Result<&ReachableSet> {
        let unit = self.unit(unit_id)?;
        let (origin, budget, mode) = (unit.position, unit.remaining_movement, unit.movement_mode());
        self.reachability.get_or_compute(&self.map, origin, budget, mode)
    }

    /// Cheapest route to `destination` inside the unit's reachable set
    pub fn plan_move(&mut self, unit_id: UnitId, destination: HexCoord) -> Result<Option<Path>> {
        let unit = self.unit(unit_id)?;
        let (origin, budget, mode) = (unit.position, unit.remaining_movement, unit.movement_mode());
        let reachable = self.reachability.get_or_compute(&self.map, origin, budget, mode)?;
        plan_path(&self.map, reachable, destination, self.config.path_search)
    }

    fn check_move(&self, index: usize, path: &Path) -> Result<f32> {
        let unit = &self.units[index];
        let mode = unit.movement_mode();
        if path.origin() != Some(unit.position) {
            return Err(HexfireError::IllegalMove(format!(
                "path does not start at the unit's hex {}",
                unit.position
            )));
        }
        if !is_valid_path(&self.map, &path.hexes, mode) {
            return Err(HexfireError::IllegalMove(
                "path has a gap or enters impassable terrain".into(),
            ));
        }
        let cost = path_cost(&self.map, &path.hexes, mode)?;
        if cost > unit.remaining_movement {
            return Err(HexfireError::IllegalMove(format!(
                "path costs {} but only {} movement remains",
                cost, unit.remaining_movement
            )));
        }
        Ok(cost)
    }

    /// Accept a path: debit the full cost at once, move the unit and drop
    /// reachable sets computed from its old hex. Sight lines are untouched.
    pub fn commit_move(&mut self, unit_id: UnitId, path: &Path) -> Result<f32> {
        let index = self.unit_index(unit_id)?;
        let cost = match self.check_move(index, path) {
            Ok(cost) => cost,
            Err(err) => {
                tracing::warn!("Rejected move for {:?}: {}", unit_id, err);
                self.log_event(
                    BattleEventType::MoveRejected { unit_id },
                    format!("Move rejected: {}", err),
                );
                return Err(err);
            }
        };

        let unit = &mut self.units[index];
        unit.debit_movement(cost)?;
        let from = unit.position;
        let to = path.destination().unwrap_or(from);
        unit.position = to;
        let remaining = unit.remaining_movement;

        self.reachability.invalidate_origin(from);
        tracing::info!(
            "{:?} moved {} -> {} for {} ({} left)",
            unit_id,
            from,
            to,
            cost,
            remaining
        );
        self.log_event(
            BattleEventType::UnitMoved {
                unit_id,
                from,
                to,
                cost,
            },
            format!("Moved from {} to {} for {} movement", from, to, cost),
        );
        Ok(cost)
    }

    /// Plan and commit in one step. `Ok(None)` if the hex is out of reach.
    pub fn move_unit(&mut self, unit_id: UnitId, destination: HexCoord) -> Result<Option<Path>> {
        let Some(path) = self.plan_move(unit_id, destination)? else {
            tracing::warn!("{:?} cannot reach {}", unit_id, destination);
            return Ok(None);
        };
        self.commit_move(unit_id, &path)?;
        Ok(Some(path))
    }

    /// Animation hand-off for a committed path
    pub fn animation_for(&self, path: &Path) -> Result<MovementAnimation> {
        MovementAnimation::new(
            &self.map,
            path,
            self.config.hex_size,
            self.config.seconds_per_hex,
        )
    }

    /// Enemies the unit can fire on right now
    pub fn valid_targets(&mut self, unit_id: UnitId) -> Result<Vec<&Unit>> {
        let index = self.unit_index(unit_id)?;
        targeting::valid_targets(&self.map, &mut self.los, &self.units[index], &self.units)
    }

    pub fn visible_hexes(&mut self, unit_id: UnitId) -> Result<Vec<HexCoord>> {
        let index = self.unit_index(unit_id)?;
        targeting::visible_hexes(&self.map, &mut self.los, &self.units[index])
    }

    pub fn los_between(&mut self, from: HexCoord, to: HexCoord) -> Result<LosResult> {
        calculate_los(&self.map, &mut self.los, from, to)
    }

    /// Change a hex's terrain. Every cached movement and sight result is
    /// dropped.
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: TerrainType) -> Result<TerrainType> {
        let previous = self.map.set_terrain(coord, terrain)?;
        self.reachability.clear();
        self.los.clear();

        tracing::info!("{} changed from {:?} to {:?}", coord, previous, terrain);
        self.log_event(
            BattleEventType::TerrainChanged {
                coord,
                from: previous,
                to: terrain,
            },
            format!(
                "{} is now {}",
                coord,
                terrain.display_name()
            ),
        );
        Ok(previous)
    }

    /// Reduce a hex to rubble
    pub fn rubble_hex(&mut self, coord: HexCoord) -> Result<TerrainType> {
        let current = self.map.tile(coord)?.terrain;
        self.set_terrain(coord, current.rubbled())
    }

    pub fn reachability_cache(&self) -> &ReachabilityCache {
        &self.reachability
    }

    pub fn los_cache(&self) -> &LosCache {
        &self.los
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::unit_type::UnitType;

    fn two_tanks() -> (BattleState, UnitId, UnitId) {
        let blue = Unit::new(UnitType::HeavyTank, Side::Blue, HexCoord::new(1, 1));
        let red = Unit::new(UnitType::MissileTank, Side::Red, HexCoord::new(6, 1));
        let (blue_id, red_id) = (blue.id, red.id);
        let state = BattleState::new(BattleMap::new(10, 10), vec![blue, red], EngineConfig::default())
            .unwrap();
        (state, blue_id, red_id)
    }

    #[test]
    fn test_new_rejects_off_map_unit() {
        let unit = Unit::new(UnitType::Infantry, Side::Blue, HexCoord::new(20, 0));
        let result = BattleState::new(BattleMap::new(5, 5), vec![unit], EngineConfig::default());
        assert!(matches!(result, Err(HexfireError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_phase_cycle() {
        let (mut state, _, _) = two_tanks();
        assert_eq!(state.phase, BattlePhase::Movement);
        assert_eq!(state.firing_side(), None);

        assert_eq!(state.advance_phase(), BattlePhase::FirstFire);
        assert_eq!(state.firing_side(), Some(Side::Blue));
        assert_eq!(state.advance_phase(), BattlePhase::ReturnFire);
        assert_eq!(state.firing_side(), Some(Side::Red));

        assert_eq!(state.advance_phase(), BattlePhase::Movement);
        assert_eq!(state.turn, FIRST_TURN + 1);
        assert_eq!(state.moving_side, Side::Red);
    }

    #[test]
    fn test_move_debits_and_invalidates() {
        let (mut state, blue, _) = two_tanks();
        state.reachable_for(blue).unwrap();
        assert_eq!(state.reachability_cache().len(), 1);

        let path = state.move_unit(blue, HexCoord::new(3, 1)).unwrap().unwrap();
        assert_eq!(path.cost, 2.0);

        let unit = state.unit(blue).unwrap();
        assert_eq!(unit.position, HexCoord::new(3, 1));
        assert_eq!(unit.remaining_movement, 1.0);
        assert!(state.reachability_cache().is_empty());
        assert!(matches!(
            state.battle_log.last().map(|e| &e.event_type),
            Some(BattleEventType::UnitMoved { .. })
        ));
    }

    #[test]
    fn test_move_out_of_reach() {
        let (mut state, blue, _) = two_tanks();
        assert!(state.move_unit(blue, HexCoord::new(8, 8)).unwrap().is_none());
        assert_eq!(state.unit(blue).unwrap().position, HexCoord::new(1, 1));
    }

    #[test]
    fn test_commit_rejects_bad_paths() {
        let (mut state, blue, _) = two_tanks();
        let wrong_start = Path {
            hexes: vec![HexCoord::new(2, 1), HexCoord::new(3, 1)],
            cost: 1.0,
        };
        assert!(state.commit_move(blue, &wrong_start).is_err());

        let too_long = Path {
            hexes: (1..6).map(|q| HexCoord::new(q, 1)).collect(),
            cost: 4.0,
        };
        assert!(state.commit_move(blue, &too_long).is_err());

        let unit = state.unit(blue).unwrap();
        assert_eq!(unit.remaining_movement, 3.0);
        assert!(matches!(
            state.battle_log.last().map(|e| &e.event_type),
            Some(BattleEventType::MoveRejected { .. })
        ));
    }

    #[test]
    fn test_movement_keeps_los_cache() {
        let (mut state, blue, red) = two_tanks();
        let red_pos = state.unit(red).unwrap().position;
        state.los_between(HexCoord::new(1, 1), red_pos).unwrap();
        assert_eq!(state.los_cache().len(), 1);

        state.move_unit(blue, HexCoord::new(2, 1)).unwrap();
        assert_eq!(state.los_cache().len(), 1);
    }

    #[test]
    fn test_terrain_change_clears_caches() {
        let (mut state, blue, _) = two_tanks();
        state.reachable_for(blue).unwrap();
        state.los_between(HexCoord::new(0, 0), HexCoord::new(4, 0)).unwrap();

        let previous = state.set_terrain(HexCoord::new(2, 0), TerrainType::City).unwrap();
        assert_eq!(previous, TerrainType::Clear);
        assert!(state.reachability_cache().is_empty());
        assert!(state.los_cache().is_empty());
        assert!(!state.los_between(HexCoord::new(0, 0), HexCoord::new(4, 0)).unwrap().has_los);

        assert_eq!(state.rubble_hex(HexCoord::new(2, 0)).unwrap(), TerrainType::City);
        assert_eq!(state.map.terrain_at(HexCoord::new(2, 0)), Some(TerrainType::Rubble));
    }

    #[test]
    fn test_new_turn_restores_budget() {
        let (mut state, blue, _) = two_tanks();
        state.move_unit(blue, HexCoord::new(4, 1)).unwrap().unwrap();
        assert_eq!(state.unit(blue).unwrap().remaining_movement, 0.0);
        state.reachable_for(blue).unwrap();

        state.start_next_turn();
        assert_eq!(state.unit(blue).unwrap().remaining_movement, 3.0);
        assert!(state.reachability_cache().is_empty());
    }

    #[test]
    fn test_targets_through_session() {
        let (mut state, blue, red) = two_tanks();
        // 5 hexes apart: out of heavy tank range
        assert!(state.valid_targets(blue).unwrap().is_empty());
        state.move_unit(blue, HexCoord::new(4, 1)).unwrap().unwrap();
        let targets: Vec<UnitId> = state.valid_targets(blue).unwrap().iter().map(|u| u.id).collect();
        assert_eq!(targets, vec![red]);
    }

    #[test]
    fn test_unknown_unit() {
        let (mut state, _, _) = two_tanks();
        let ghost = UnitId::new();
        assert!(matches!(state.reachable_for(ghost), Err(HexfireError::UnitNotFound(_))));
    }
}
