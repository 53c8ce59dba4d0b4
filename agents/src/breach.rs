// ═══════════════════════════════════════════════════════════════════════
// Breach tracking: every cell the opponent scored on us from.
//
// The list only grows. Reinforcing it re-attempts every recorded cell
// each time; cells already holding a structure are skipped by the spawn
// rules.
// ═══════════════════════════════════════════════════════════════════════

use td_engine::battlefield::Battlefield;
use td_engine::protocol::ActionFrame;
use td_engine::types::*;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct BreachTracker {
    scored_on: Vec<Location>,
}

impl BreachTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a breach. Only breaches by the opponent are kept.
    pub fn on_breach(&mut self, location: Location, by_opponent: bool) {
        if by_opponent {
            info!(%location, total = self.scored_on.len() + 1, "scored on");
            self.scored_on.push(location);
        }
    }

    /// Feed every breach in an action frame.
    pub fn on_frame(&mut self, frame: &ActionFrame) {
        for breach in &frame.breaches {
            self.on_breach(breach.location, breach.by_opponent());
        }
    }

    pub fn scored_on(&self) -> &[Location] {
        &self.scored_on
    }

    /// Place `unit` one row above each recorded cell, so our own edge
    /// stays open for deployments. Returns how many were placed.
    pub fn build_reactive_defense(&self, field: &mut dyn Battlefield, unit: UnitKind) -> u32 {
        self.scored_on.iter()
            .map(|loc| field.attempt_spawn(unit, &[loc.above()], 1))
            .sum()
    }
}
