//! Battle system constants - all tunable values in one place

// World layout
pub const DEFAULT_HEX_SIZE: f32 = 1.0;
pub const DEFAULT_MAP_WIDTH: u32 = 16;
pub const DEFAULT_MAP_HEIGHT: u32 = 12;

// Animation hand-off (seconds per hex stepped)
pub const DEFAULT_SECONDS_PER_HEX: f32 = 0.3;

// Caches
pub const DEFAULT_REACHABILITY_CACHE_LIMIT: usize = 256;

// Turn structure
pub const FIRST_TURN: u32 = 1;
