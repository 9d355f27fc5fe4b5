//! Hex coordinate system for battle maps (axial coordinates)
//!
//! Uses axial coordinates (q, r) for storage and neighbor lookup, and cube
//! coordinates (q, r, s with q + r + s = 0) for distance and line drawing.
//! World positions use a pointy-top layout.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

const SQRT_3: f32 = 1.732_050_8;

/// Axial hex coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Distance in hex steps
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get all 6 neighboring hex coordinates
    pub fn neighbors(&self) -> [HexCoord; 6] {
        HexDirection::all().map(|dir| *self + dir.offset())
    }

    pub fn neighbor(&self, direction: HexDirection) -> HexCoord {
        *self + direction.offset()
    }

    /// Hexes strictly between self and other along the straight line joining
    /// their centres, in order from self. Endpoints are excluded and
    /// consecutive duplicates collapsed.
    pub fn intervening(&self, other: &Self) -> Vec<HexCoord> {
        let n = self.distance(other);
        if n <= 1 {
            return Vec::new();
        }

        let mut results: Vec<HexCoord> = Vec::with_capacity((n - 1) as usize);
        for i in 1..n {
            let t = i as f64 / n as f64;
            let q = self.q as f64 + (other.q - self.q) as f64 * t;
            let r = self.r as f64 + (other.r - self.r) as f64 * t;
            let hex = Self::round(q, r);
            if hex == *self || hex == *other || results.last() == Some(&hex) {
                continue;
            }
            results.push(hex);
        }
        results
    }

    /// Get hex coordinates in a line from self to other (inclusive)
    pub fn line_to(&self, other: &Self) -> Vec<HexCoord> {
        if self == other {
            return vec![*self];
        }
        let mut line = Vec::with_capacity(self.distance(other) as usize + 1);
        line.push(*self);
        line.extend(self.intervening(other));
        line.push(*other);
        line
    }

    /// Round fractional axial coordinates to the nearest hex.
    ///
    /// Rounds all three cube components, then recomputes whichever one moved
    /// the most from the other two so that q + r + s = 0 still holds.
    pub fn round(q: f64, r: f64) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }

    /// Get all hexes within range (inclusive)
    pub fn hexes_in_range(&self, range: u32) -> Vec<HexCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(HexCoord::new(self.q + q, self.r + r));
            }
        }
        results
    }

    /// Hexes at exactly `radius` steps, walking the ring counter-clockwise
    /// starting from the south-west corner.
    pub fn ring(&self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![*self];
        }

        let mut results = Vec::with_capacity(6 * radius as usize);
        let mut hex = *self + HexDirection::SouthWest.offset() * radius as i32;
        for direction in HexDirection::all() {
            for _ in 0..radius {
                results.push(hex);
                hex = hex.neighbor(direction);
            }
        }
        results
    }

    /// Centre of this hex in world space (pointy-top layout)
    pub fn to_world(&self, hex_size: f32) -> Vec2 {
        let x = hex_size * SQRT_3 * (self.q as f32 + self.r as f32 / 2.0);
        let y = hex_size * 1.5 * self.r as f32;
        Vec2::new(x, y)
    }

    /// Hex containing a world-space point (pointy-top layout)
    pub fn from_world(point: Vec2, hex_size: f32) -> Self {
        let q = (SQRT_3 / 3.0 * point.x - point.y / 3.0) / hex_size;
        let r = (2.0 / 3.0 * point.y) / hex_size;
        Self::round(q as f64, r as f64)
    }
}

impl std::ops::Add for HexCoord {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl std::ops::Sub for HexCoord {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl std::ops::Mul<i32> for HexCoord {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.q * rhs, self.r * rhs)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// The six hex directions, counter-clockwise from east
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> HexCoord {
        match self {
            HexDirection::East => HexCoord::new(1, 0),
            HexDirection::NorthEast => HexCoord::new(1, -1),
            HexDirection::NorthWest => HexCoord::new(0, -1),
            HexDirection::West => HexCoord::new(-1, 0),
            HexDirection::SouthWest => HexCoord::new(-1, 1),
            HexDirection::SouthEast => HexCoord::new(0, 1),
        }
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}
