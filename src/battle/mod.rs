//! Battle system - hex movement, line of sight and targeting
//!
//! The engines (reachability, pathfinding, line_of_sight, targeting) are pure
//! functions over the map and unit data plus explicit caches. The session in
//! `execution` owns the caches and decides when they are cleared.

pub mod battle_map;
pub mod constants;
pub mod execution;
pub mod hex;
pub mod line_of_sight;
pub mod movement;
pub mod pathfinding;
pub mod reachability;
pub mod scenario;
pub mod targeting;
pub mod terrain;
pub mod unit_type;
pub mod units;

// Re-exports for convenient access
pub use battle_map::{BattleMap, Tile};
pub use constants::*;
pub use execution::{BattleEvent, BattleEventLog, BattleEventType, BattlePhase, BattleState};
pub use hex::{HexCoord, HexDirection};
pub use line_of_sight::{calculate_los, compute_los, obstructs, LosCache, LosResult};
pub use movement::MovementAnimation;
pub use pathfinding::{is_valid_path, path_cost, plan_path, plan_path_cached, Path};
pub use reachability::{clamp_budget, compute_reachable, ReachabilityCache, ReachableSet};
pub use scenario::{Scenario, TerrainOverride, UnitPlacement};
pub use targeting::{in_range, units_with_los_to, valid_targets, visible_from, visible_hexes};
pub use terrain::{LosContext, LosValues, MovementMode, TerrainType};
pub use unit_type::{UnitRatings, UnitType};
pub use units::{Unit, UnitId};
