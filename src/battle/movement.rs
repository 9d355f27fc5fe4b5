//! Animated traversal of a committed move
//!
//! Budgets are debited when a move is committed. The animation only reads
//! the finished path and turns elapsed time into a world position.

use glam::Vec2;
use serde::Serialize;

use crate::battle::battle_map::BattleMap;
use crate::battle::hex::HexCoord;
use crate::battle::pathfinding::Path;
use crate::core::error::{HexfireError, Result};

/// Timed interpolation along a path, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementAnimation {
    hexes: Vec<HexCoord>,
    waypoints: Vec<Vec2>,
    pub seconds_per_hex: f32,
}

impl MovementAnimation {
    pub fn new(map: &BattleMap, path: &Path, hex_size: f32, seconds_per_hex: f32) -> Result<Self> {
        if path.hexes.is_empty() {
            return Err(HexfireError::IllegalMove("cannot animate an empty path".into()));
        }
        let waypoints = path
            .hexes
            .iter()
            .map(|coord| map.hex_to_world_position(*coord, hex_size))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            hexes: path.hexes.clone(),
            waypoints,
            seconds_per_hex: seconds_per_hex.max(0.0),
        })
    }

    /// Total playback time in seconds
    pub fn duration(&self) -> f32 {
        self.waypoints.len().saturating_sub(1) as f32 * self.seconds_per_hex
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        elapsed >= self.duration()
    }

    /// Segment index and fraction travelled along it
    fn progress(&self, elapsed: f32) -> (usize, f32) {
        let last = self.waypoints.len().saturating_sub(1);
        if last == 0 || self.seconds_per_hex <= 0.0 || elapsed >= self.duration() {
            return (last, 0.0);
        }
        let steps = elapsed.max(0.0) / self.seconds_per_hex;
        let index = (steps.floor() as usize).min(last);
        (index, steps - index as f32)
    }

    /// World position after `elapsed` seconds, clamped to the path ends
    pub fn position_at(&self, elapsed: f32) -> Vec2 {
        let (index, t) = self.progress(elapsed);
        match self.waypoints.get(index + 1) {
            Some(next) => self.waypoints[index].lerp(*next, t),
            None => self.waypoints[index],
        }
    }

    /// Hex the unit is drawn in after `elapsed` seconds
    pub fn hex_at(&self, elapsed: f32) -> HexCoord {
        let (index, t) = self.progress(elapsed);
        if t >= 0.5 {
            self.hexes.get(index + 1).copied().unwrap_or(self.hexes[index])
        } else {
            self.hexes[index]
        }
    }
}
