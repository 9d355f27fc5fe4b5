//! Hexfire - movement, line of sight and targeting for a hex wargame

pub mod battle;
pub mod core;
