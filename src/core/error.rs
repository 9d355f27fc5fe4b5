use thiserror::Error;

use crate::battle::hex::HexCoord;
use crate::battle::units::UnitId;

#[derive(Error, Debug)]
pub enum HexfireError {
    #[error("Invalid coordinate: {0} is not on the map")]
    InvalidCoordinate(HexCoord),

    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Reachability not computed from {origin} with budget {budget}")]
    ReachabilityNotComputed { origin: HexCoord, budget: f32 },

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Scenario parse error: {0}")]
    ScenarioParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HexfireError>;
