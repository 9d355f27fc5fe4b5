//! Line of sight between hexes
//!
//! A sight line is traced through the hexes strictly between the two
//! endpoints. An intervening hex blocks only if its intervening value is
//! greater than both the firing value under the shooter and the target value
//! under the target, so units on high ground can see over cover.
//!
//! Results depend on terrain alone. Unit movement never invalidates the cache.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::BattleMap;
use crate::battle::hex::HexCoord;
use crate::battle::terrain::LosContext;
use crate::core::error::Result;

/// Outcome of a line-of-sight check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LosResult {
    pub has_los: bool,
    /// First blocking hex in traversal order from the shooter
    pub blocked_by: Option<HexCoord>,
    /// Hexes between the endpoints, ordered from the shooter
    pub intervening: Vec<HexCoord>,
}

impl LosResult {
    fn clear(intervening: Vec<HexCoord>) -> Self {
        Self {
            has_los: true,
            blocked_by: None,
            intervening,
        }
    }
}

/// Intervening hexes from `from` to `to`.
///
/// The line is always traced from the lower coordinate so both directions
/// cross exactly the same hexes; rounding ties would otherwise differ.
fn sight_line(from: HexCoord, to: HexCoord) -> Vec<HexCoord> {
    if from <= to {
        from.intervening(&to)
    } else {
        let mut line = to.intervening(&from);
        line.reverse();
        line
    }
}

/// An intervening value blocks only if it beats both ends
pub fn obstructs(intervening: u8, firing: u8, target: u8) -> bool {
    intervening > firing && intervening > target
}

fn find_blocker(
    map: &BattleMap,
    from: HexCoord,
    to: HexCoord,
    line: &[HexCoord],
) -> Result<Option<HexCoord>> {
    let firing = map.tile(from)?.los_value(LosContext::Firing);
    let target = map.tile(to)?.los_value(LosContext::Target);

    Ok(line.iter().copied().find(|coord| {
        map.get_tile(*coord)
            .is_some_and(|tile| obstructs(tile.los_value(LosContext::Intervening), firing, target))
    }))
}

/// Uncached line-of-sight check
pub fn compute_los(map: &BattleMap, from: HexCoord, to: HexCoord) -> Result<LosResult> {
    map.tile(from)?;
    map.tile(to)?;

    if from.distance(&to) <= 1 {
        return Ok(LosResult::clear(Vec::new()));
    }

    let intervening = sight_line(from, to);
    let blocked_by = find_blocker(map, from, to, &intervening)?;
    Ok(LosResult {
        has_los: blocked_by.is_none(),
        blocked_by,
        intervening,
    })
}

/// Memoized line-of-sight outcomes
///
/// Keyed by the unordered pair of endpoints and storing only the boolean;
/// the intervening list is recomputed on every hit.
#[derive(Debug, Clone, Default)]
pub struct LosCache {
    entries: AHashMap<(HexCoord, HexCoord), bool>,
    hits: u64,
    misses: u64,
}

impl LosCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: HexCoord, b: HexCoord) -> (HexCoord, HexCoord) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn get(&self, a: HexCoord, b: HexCoord) -> Option<bool> {
        self.entries.get(&Self::key(a, b)).copied()
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!("Clearing {} cached sight lines", self.entries.len());
        }
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

/// Line-of-sight check through the cache.
///
/// Adjacent hexes (and a hex with itself) always see each other and are
/// never cached.
pub fn calculate_los(
    map: &BattleMap,
    cache: &mut LosCache,
    from: HexCoord,
    to: HexCoord,
) -> Result<LosResult> {
    map.tile(from)?;
    map.tile(to)?;

    if from.distance(&to) <= 1 {
        return Ok(LosResult::clear(Vec::new()));
    }

    if let Some(has_los) = cache.get(from, to) {
        cache.hits += 1;
        let intervening = sight_line(from, to);
        let blocked_by = if has_los {
            None
        } else {
            find_blocker(map, from, to, &intervening)?
        };
        return Ok(LosResult {
            has_los,
            blocked_by,
            intervening,
        });
    }

    cache.misses += 1;
    let result = compute_los(map, from, to)?;
    cache.entries.insert(LosCache::key(from, to), result.has_los);
    Ok(result)
}
