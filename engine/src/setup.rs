// ═══════════════════════════════════════════════════════════════════════
// Game setup: initial state for a local match
// ═══════════════════════════════════════════════════════════════════════

use crate::config::GameConfig;
use crate::state::GameState;
use crate::types::PlayerStats;
use std::sync::Arc;

/// Empty board, both players at starting health and resources, turn 0.
pub fn create_initial_state(config: Arc<GameConfig>) -> GameState {
    let r = &config.resources;
    let stats = PlayerStats {
        health: r.starting_health,
        structure_points: r.starting_structure_points,
        mobile_points: r.starting_mobile_points,
    };
    GameState::new(config, 0, [stats, stats])
}

/// Mobile income for a turn: base income plus one per growth period.
pub fn mobile_income(config: &GameConfig, turn: u32) -> f64 {
    let r = &config.resources;
    let growth = if r.mobile_growth_period == 0 { 0 } else { turn / r.mobile_growth_period };
    r.mobile_income + growth as f64
}
