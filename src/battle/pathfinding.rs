//! A* pathfinding inside a reachable set
//!
//! The search only steps onto hexes the flood fill already settled, so a
//! route can never leave the unit's movement budget. The planner never runs
//! the flood fill itself.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::BattleMap;
use crate::battle::hex::HexCoord;
use crate::battle::reachability::{ReachabilityCache, ReachableSet};
use crate::battle::terrain::MovementMode;
use crate::core::config::PathSearch;
use crate::core::error::{HexfireError, Result};

/// An ordered route from origin to destination, both inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub hexes: Vec<HexCoord>,
    /// Sum of entry costs of every hex after the first
    pub cost: f32,
}

impl Path {
    pub fn origin(&self) -> Option<HexCoord> {
        self.hexes.first().copied()
    }

    pub fn destination(&self) -> Option<HexCoord> {
        self.hexes.last().copied()
    }

    /// Number of hexes stepped into
    pub fn steps(&self) -> usize {
        self.hexes.len().saturating_sub(1)
    }
}

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    coord: HexCoord,
    g_cost: f32,
    f_cost: f32, // g_cost + heuristic
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; ties broken by g, then by coordinate
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.g_cost.total_cmp(&self.g_cost))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the cheapest path from the reachable set's origin to `destination`.
///
/// Returns `Ok(None)` without searching when the destination is outside the
/// reachable set. A destination that is not on the map is an error.
pub fn plan_path(
    map: &BattleMap,
    reachable: &ReachableSet,
    destination: HexCoord,
    search: PathSearch,
) -> Result<Option<Path>> {
    map.tile(destination)?;
    let start = reachable.origin;

    if !reachable.contains(destination) {
        tracing::debug!("{} is not reachable from {}", destination, start);
        return Ok(None);
    }
    if start == destination {
        return Ok(Some(Path {
            hexes: vec![start],
            cost: 0.0,
        }));
    }

    // Hex distance times the cheapest step on the map never overestimates,
    // even where roads cost less than one point per hex
    let scale = match search {
        PathSearch::AStar => map.min_entry_cost(reachable.mode),
        PathSearch::UniformCost => 0.0,
    };
    let heuristic = |coord: HexCoord| coord.distance(&destination) as f32 * scale;

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
    let mut g_scores: AHashMap<HexCoord, f32> = AHashMap::new();

    g_scores.insert(start, 0.0);
    open_set.push(PathNode {
        coord: start,
        g_cost: 0.0,
        f_cost: heuristic(start),
    });

    let mut expanded = 0usize;
    while let Some(current) = open_set.pop() {
        if current.coord == destination {
            tracing::debug!(
                "Path {} -> {}: cost {}, {} nodes expanded",
                start,
                destination,
                current.g_cost,
                expanded
            );
            return Ok(Some(Path {
                hexes: reconstruct_path(&came_from, current.coord),
                cost: current.g_cost,
            }));
        }

        let best_g = g_scores.get(&current.coord).copied().unwrap_or(f32::INFINITY);
        if current.g_cost > best_g {
            continue;
        }
        expanded += 1;

        for (neighbor, move_cost) in map.neighbors(current.coord, reachable.mode) {
            if !reachable.contains(neighbor) || !move_cost.is_finite() {
                continue;
            }

            let tentative_g = current.g_cost + move_cost;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(f32::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    coord: neighbor,
                    g_cost: tentative_g,
                    f_cost: tentative_g + heuristic(neighbor),
                });
            }
        }
    }

    // Only reachable if the set was computed on different terrain
    tracing::debug!("No path {} -> {} inside reachable set", start, destination);
    Ok(None)
}

/// Plan against an already cached reachable set.
///
/// Fails with `ReachabilityNotComputed` if the caller has not populated the
/// cache for (origin, budget, mode).
pub fn plan_path_cached(
    map: &BattleMap,
    cache: &ReachabilityCache,
    origin: HexCoord,
    budget: f32,
    mode: MovementMode,
    destination: HexCoord,
    search: PathSearch,
) -> Result<Option<Path>> {
    map.tile(origin)?;
    let reachable = cache
        .get(origin, budget, mode)
        .ok_or(HexfireError::ReachabilityNotComputed { origin, budget })?;
    plan_path(map, reachable, destination, search)
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &AHashMap<HexCoord, HexCoord>,
    mut current: HexCoord,
) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Calculate path cost (sum of entry costs after the first hex)
pub fn path_cost(map: &BattleMap, path: &[HexCoord], mode: MovementMode) -> Result<f32> {
    let mut cost = 0.0;
    for coord in path.iter().skip(1) {
        cost += map.tile(*coord)?.entry_cost(mode);
    }
    Ok(cost)
}

/// Non-empty, on the map, each step adjacent and enterable
pub fn is_valid_path(map: &BattleMap, path: &[HexCoord], mode: MovementMode) -> bool {
    let Some(first) = path.first() else {
        return false;
    };
    if !map.contains(*first) {
        return false;
    }
    path.windows(2).all(|pair| {
        pair[0].distance(&pair[1]) == 1
            && map
                .get_tile(pair[1])
                .is_some_and(|tile| tile.entry_cost(mode).is_finite())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::reachability::compute_reachable;
    use crate::battle::terrain::TerrainType;

    fn plan(map: &BattleMap, from: HexCoord, to: HexCoord, budget: f32) -> Option<Path> {
        let reachable = compute_reachable(map, from, budget, MovementMode::Ground).unwrap();
        plan_path(map, &reachable, to, PathSearch::AStar).unwrap()
    }

    #[test]
    fn test_pathfind_straight_line() {
        let map = BattleMap::new(10, 10);
        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(5, 0);

        let path = plan(&map, start, goal, 5.0).unwrap();
        assert_eq!(path.origin(), Some(start));
        assert_eq!(path.destination(), Some(goal));
        assert_eq!(path.hexes.len(), 6);
        assert_eq!(path.cost, 5.0);
    }

    #[test]
    fn test_two_step_path() {
        let map = BattleMap::new(6, 6);
        let path = plan(&map, HexCoord::new(0, 0), HexCoord::new(1, 1), 3.0).unwrap();
        assert_eq!(path.hexes.len(), 3);
        assert_eq!(path.cost, 2.0);
        assert!(is_valid_path(&map, &path.hexes, MovementMode::Ground));
    }

    #[test]
    fn test_same_hex() {
        let map = BattleMap::new(4, 4);
        let here = HexCoord::new(2, 2);
        let path = plan(&map, here, here, 0.0).unwrap();
        assert_eq!(path.hexes, vec![here]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let mut map = BattleMap::new(10, 10);
        map.set_terrain(HexCoord::new(2, 2), TerrainType::Lake).unwrap();
        map.set_terrain(HexCoord::new(3, 2), TerrainType::Lake).unwrap();

        let start = HexCoord::new(0, 2);
        let goal = HexCoord::new(5, 2);
        let path = plan(&map, start, goal, 10.0).unwrap();

        assert!(!path.hexes.contains(&HexCoord::new(2, 2)));
        assert!(!path.hexes.contains(&HexCoord::new(3, 2)));
        assert!(is_valid_path(&map, &path.hexes, MovementMode::Ground));
    }

    #[test]
    fn test_outside_budget_is_none() {
        let map = BattleMap::new(10, 10);
        assert!(plan(&map, HexCoord::new(0, 0), HexCoord::new(5, 0), 3.0).is_none());
    }

    #[test]
    fn test_off_map_destination_errors() {
        let map = BattleMap::new(5, 5);
        let reachable =
            compute_reachable(&map, HexCoord::new(0, 0), 3.0, MovementMode::Ground).unwrap();
        let result = plan_path(&map, &reachable, HexCoord::new(9, 9), PathSearch::AStar);
        assert!(matches!(result, Err(HexfireError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_prefers_road_over_shorter_forest() {
        let mut map = BattleMap::filled(6, 3, TerrainType::Forest);
        for q in 0..6 {
            map.set_terrain(HexCoord::new(q, 1), TerrainType::Roads).unwrap();
        }
        let start = HexCoord::new(0, 1);
        let goal = HexCoord::new(4, 1);

        for search in [PathSearch::AStar, PathSearch::UniformCost] {
            let reachable = compute_reachable(&map, start, 4.0, MovementMode::Ground).unwrap();
            let path = plan_path(&map, &reachable, goal, search).unwrap().unwrap();
            assert_eq!(path.cost, 2.0);
            assert_eq!(path.cost, reachable.cost_to(goal).unwrap());
        }
    }

    #[test]
    fn test_cached_requires_population() {
        let map = BattleMap::new(6, 6);
        let mut cache = ReachabilityCache::new();
        let origin = HexCoord::new(1, 1);
        let goal = HexCoord::new(3, 1);

        let missing = plan_path_cached(
            &map,
            &cache,
            origin,
            3.0,
            MovementMode::Ground,
            goal,
            PathSearch::AStar,
        );
        assert!(matches!(missing, Err(HexfireError::ReachabilityNotComputed { .. })));

        cache.get_or_compute(&map, origin, 3.0, MovementMode::Ground).unwrap();
        let path = plan_path_cached(
            &map,
            &cache,
            origin,
            3.0,
            MovementMode::Ground,
            goal,
            PathSearch::AStar,
        )
        .unwrap()
        .unwrap();
        assert_eq!(path.cost, 2.0);
    }

    #[test]
    fn test_deterministic() {
        let map = BattleMap::new(8, 8);
        let first = plan(&map, HexCoord::new(0, 0), HexCoord::new(3, 3), 8.0).unwrap();
        for _ in 0..5 {
            let again = plan(&map, HexCoord::new(0, 0), HexCoord::new(3, 3), 8.0).unwrap();
            assert_eq!(first.hexes, again.hexes);
        }
    }

    #[test]
    fn test_path_cost_and_validity() {
        let mut map = BattleMap::new(5, 5);
        map.set_terrain(HexCoord::new(1, 0), TerrainType::Swamp).unwrap();
        let path = [HexCoord::new(0, 0), HexCoord::new(1, 0), HexCoord::new(2, 0)];
        assert_eq!(path_cost(&map, &path, MovementMode::Ground).unwrap(), 3.0);
        assert_eq!(path_cost(&map, &path, MovementMode::Hover).unwrap(), 2.0);

        let gap = [HexCoord::new(0, 0), HexCoord::new(2, 0)];
        assert!(!is_valid_path(&map, &gap, MovementMode::Ground));
        assert!(!is_valid_path(&map, &[], MovementMode::Ground));
    }
}
