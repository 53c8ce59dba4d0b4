pub mod agent;
pub mod attack;
pub mod breach;
pub mod defense;
pub mod layout;
pub mod random;
pub mod risk;
pub mod strategy;
pub mod walls;

pub use agent::Agent;
pub use layout::LayoutPreset;
pub use random::RandomAgent;
pub use strategy::{StrategyAgent, StrategyConfig};
