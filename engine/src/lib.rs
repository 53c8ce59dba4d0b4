pub mod types;
pub mod error;
pub mod config;
pub mod map;
pub mod navigation;
pub mod state;
pub mod battlefield;
pub mod setup;
pub mod visibility;
pub mod protocol;
pub mod engine;

#[cfg(test)]
mod tests;

pub use types::*;
pub use error::{EngineError, Result};
pub use config::{GameConfig, UnitCatalog, UnitStats};
pub use battlefield::Battlefield;
pub use state::{Deployment, GameState, TurnSubmission};
pub use protocol::{ActionFrame, BreachEvent};
