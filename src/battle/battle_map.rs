//! Battle map: the hex grid index
//!
//! Owns every tile for the lifetime of a match. Tiles are keyed by axial
//! coordinate; iteration runs in ascending (q, r) order so that everything
//! derived from a full sweep is reproducible.

use ahash::AHashMap;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::battle::hex::HexCoord;
use crate::battle::terrain::{LosContext, MovementMode, TerrainType};
use crate::core::error::{HexfireError, Result};

/// A single hex on the battle map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: HexCoord,
    pub terrain: TerrainType,
}

impl Tile {
    pub fn new(coord: HexCoord, terrain: TerrainType) -> Self {
        Self { coord, terrain }
    }

    /// Movement points needed to step into this tile
    pub fn entry_cost(&self, mode: MovementMode) -> f32 {
        self.terrain.entry_cost(mode)
    }

    pub fn los_value(&self, context: LosContext) -> u8 {
        self.terrain.los_value(context)
    }
}

/// The full battle map
#[derive(Debug, Clone, Default)]
pub struct BattleMap {
    tiles: AHashMap<HexCoord, Tile>,
    /// Sorted coordinates, for deterministic iteration
    order: Vec<HexCoord>,
}

impl BattleMap {
    /// Create a `width` x `height` map of clear terrain (q in 0..width, r in 0..height)
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TerrainType::Clear)
    }

    /// Create a rectangular map covered with one terrain type
    pub fn filled(width: u32, height: u32, terrain: TerrainType) -> Self {
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for q in 0..width as i32 {
            for r in 0..height as i32 {
                tiles.push(Tile::new(HexCoord::new(q, r), terrain));
            }
        }
        Self::from_tiles(tiles)
    }

    /// Build a map from an arbitrary set of tiles. Later duplicates win.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut map = Self::default();
        for tile in tiles {
            if map.tiles.insert(tile.coord, tile).is_none() {
                map.order.push(tile.coord);
            }
        }
        map.order.sort_unstable();
        map
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Get a tile at the given coordinate
    pub fn get_tile(&self, coord: HexCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Get a tile, treating a missing coordinate as an error
    pub fn tile(&self, coord: HexCoord) -> Result<&Tile> {
        self.tiles
            .get(&coord)
            .ok_or(HexfireError::InvalidCoordinate(coord))
    }

    pub fn terrain_at(&self, coord: HexCoord) -> Option<TerrainType> {
        self.get_tile(coord).map(|tile| tile.terrain)
    }

    /// All tiles in ascending (q, r) order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.order.iter().filter_map(move |coord| self.tiles.get(coord))
    }

    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.order.iter().copied()
    }

    /// On-map neighbors of `coord` with the cost of entering each one.
    /// Impassable neighbors are included with an infinite cost.
    pub fn neighbors(
        &self,
        coord: HexCoord,
        mode: MovementMode,
    ) -> impl Iterator<Item = (HexCoord, f32)> + '_ {
        coord.neighbors().into_iter().filter_map(move |n| {
            self.tiles.get(&n).map(|tile| (n, tile.entry_cost(mode)))
        })
    }

    pub fn distance(&self, a: HexCoord, b: HexCoord) -> u32 {
        a.distance(&b)
    }

    /// Cheapest finite entry cost of any tile on the map
    ///
    /// Zero for an empty map or a map with no enterable tiles.
    pub fn min_entry_cost(&self, mode: MovementMode) -> f32 {
        let min = self
            .tiles
            .values()
            .map(|tile| tile.entry_cost(mode))
            .filter(|cost| cost.is_finite())
            .fold(f32::INFINITY, f32::min);
        if min.is_finite() {
            min.max(0.0)
        } else {
            0.0
        }
    }

    /// Tile under a world-space point, if that hex is on the map
    pub fn world_position_to_hex(&self, point: Vec2, hex_size: f32) -> Option<HexCoord> {
        let coord = HexCoord::from_world(point, hex_size);
        self.contains(coord).then_some(coord)
    }

    pub fn hex_to_world_position(&self, coord: HexCoord, hex_size: f32) -> Result<Vec2> {
        self.tile(coord).map(|tile| tile.coord.to_world(hex_size))
    }

    /// Set terrain at a coordinate, returning the terrain it replaced
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: TerrainType) -> Result<TerrainType> {
        let tile = self
            .tiles
            .get_mut(&coord)
            .ok_or(HexfireError::InvalidCoordinate(coord))?;
        Ok(std::mem::replace(&mut tile.terrain, terrain))
    }
}
