//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

/// Turn counter (starts at 1)
pub type Turn = u32;

/// The two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Blue,
    Red,
}

impl Side {
    pub fn opponent(&self) -> Self {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Blue => write!(f, "blue"),
            Side::Red => write!(f, "red"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_round_trip() {
        assert_eq!(Side::Blue.opponent(), Side::Red);
        assert_eq!(Side::Red.opponent().opponent(), Side::Red);
    }
}
