pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, PathSearch};
pub use error::{HexfireError, Result};
pub use types::{Side, Turn};
