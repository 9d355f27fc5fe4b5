//! Reachable-hex flood fill
//!
//! Dijkstra from a unit's hex, bounded by its movement budget. Results are
//! memoized per (origin, budget, movement mode) in an explicit cache owned by
//! the battle session.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::battle::battle_map::BattleMap;
use crate::battle::constants::DEFAULT_REACHABILITY_CACHE_LIMIT;
use crate::battle::hex::HexCoord;
use crate::battle::terrain::MovementMode;
use crate::core::error::{HexfireError, Result};

/// Negative and NaN budgets are treated as zero
pub fn clamp_budget(budget: f32) -> f32 {
    if budget >= 0.0 {
        budget
    } else {
        0.0
    }
}

/// Every hex reachable from `origin` within `budget`, with its minimal cost
#[derive(Debug, Clone, PartialEq)]
pub struct ReachableSet {
    pub origin: HexCoord,
    pub budget: f32,
    pub mode: MovementMode,
    costs: AHashMap<HexCoord, f32>,
}

impl ReachableSet {
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.costs.contains_key(&coord)
    }

    /// Minimal movement cost from the origin, if reachable
    pub fn cost_to(&self, coord: HexCoord) -> Option<f32> {
        self.costs.get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Reachable coordinates in ascending (q, r) order
    pub fn coords(&self) -> Vec<HexCoord> {
        let mut coords: Vec<HexCoord> = self.costs.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    pub fn iter(&self) -> impl Iterator<Item = (HexCoord, f32)> + '_ {
        self.costs.iter().map(|(coord, cost)| (*coord, *cost))
    }
}

/// Flood fill from `origin`, settling hexes cheapest-first.
///
/// Fails only if `origin` is off the map. A budget of zero (or a negative
/// one) yields just the origin at cost 0.
pub fn compute_reachable(
    map: &BattleMap,
    origin: HexCoord,
    budget: f32,
    mode: MovementMode,
) -> Result<ReachableSet> {
    map.tile(origin)?;
    let budget = clamp_budget(budget);

    let mut costs: AHashMap<HexCoord, f32> = AHashMap::new();
    let mut frontier = BinaryHeap::new();
    costs.insert(origin, 0.0);
    frontier.push(Reverse((OrderedFloat(0.0f32), origin)));

    let mut expanded = 0usize;
    while let Some(Reverse((OrderedFloat(cost), coord))) = frontier.pop() {
        // Stale entry: a cheaper route was settled after this was queued
        if costs.get(&coord).is_some_and(|&best| best < cost) {
            continue;
        }
        expanded += 1;

        for (neighbor, step) in map.neighbors(coord, mode) {
            if !step.is_finite() {
                continue;
            }
            let next = cost + step;
            if next > budget {
                continue;
            }
            let improved = costs.get(&neighbor).map_or(true, |&best| next < best);
            if improved {
                costs.insert(neighbor, next);
                frontier.push(Reverse((OrderedFloat(next), neighbor)));
            }
        }
    }

    tracing::debug!(
        "Reachability from {} (budget {}, {:?}): {} hexes, {} expanded",
        origin,
        budget,
        mode,
        costs.len(),
        expanded
    );

    Ok(ReachableSet {
        origin,
        budget,
        mode,
        costs,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ReachKey {
    origin: HexCoord,
    budget: OrderedFloat<f32>,
    mode: MovementMode,
}

impl ReachKey {
    fn new(origin: HexCoord, budget: f32, mode: MovementMode) -> Self {
        Self {
            origin,
            budget: OrderedFloat(clamp_budget(budget)),
            mode,
        }
    }
}

/// Memoized reachable sets, keyed by exact budget
///
/// A set for one budget is never reused for another. When the cache is full
/// it is flushed before the next insert.
#[derive(Debug, Clone)]
pub struct ReachabilityCache {
    entries: AHashMap<ReachKey, ReachableSet>,
    limit: usize,
    hits: u64,
    misses: u64,
}

impl Default for ReachabilityCache {
    fn default() -> Self {
        Self::with_limit(DEFAULT_REACHABILITY_CACHE_LIMIT)
    }
}

impl ReachabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: AHashMap::new(),
            limit: limit.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached reachable set, computing and storing it on a miss
    pub fn get_or_compute(
        &mut self,
        map: &BattleMap,
        origin: HexCoord,
        budget: f32,
        mode: MovementMode,
    ) -> Result<&ReachableSet> {
        let key = ReachKey::new(origin, budget, mode);
        if self.entries.contains_key(&key) {
            self.hits += 1;
            tracing::debug!("Reachability cache hit for {} (budget {})", origin, key.budget);
        } else {
            let set = compute_reachable(map, origin, budget, mode)?;
            self.misses += 1;
            if self.entries.len() >= self.limit {
                tracing::debug!("Reachability cache full ({} entries), flushing", self.entries.len());
                self.entries.clear();
            }
            self.entries.insert(key, set);
        }
        self.entries
            .get(&key)
            .ok_or(HexfireError::ReachabilityNotComputed {
                origin,
                budget: key.budget.0,
            })
    }

    /// Cached reachable set, without computing
    pub fn get(&self, origin: HexCoord, budget: f32, mode: MovementMode) -> Option<&ReachableSet> {
        self.entries.get(&ReachKey::new(origin, budget, mode))
    }

    /// Drop every entry computed from `origin`, returning how many were removed
    pub fn invalidate_origin(&mut self, origin: HexCoord) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.origin != origin);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!("Invalidated {} reachability entries at {}", removed, origin);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
