// ═══════════════════════════════════════════════════════════════════════
// Random Agent: spends its mobile points on interceptors dropped at
// random open cells of our two edges, and builds nothing.
// Serves as a baseline and for exercising the match runner.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use td_engine::battlefield::Battlefield;
use td_engine::error::Result;
use td_engine::types::*;

pub struct RandomAgent {
    rng: ChaCha8Rng,
    unit: UnitKind,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: ChaCha8Rng::seed_from_u64(seed),
            unit: UnitKind::Interceptor,
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }

    fn on_turn(&mut self, field: &mut dyn Battlefield) -> Result<()> {
        let mut edges = field.edge_locations(Edge::BottomLeft);
        edges.extend(field.edge_locations(Edge::BottomRight));
        // Mobile units cannot deploy on cells our own structures hold.
        let open = field.filter_blocked_locations(&edges);

        let cost = field.type_cost(self.unit);
        while field.resource(self.unit.resource()) >= cost {
            let Some(&loc) = open.choose(&mut self.rng) else { break };
            if field.attempt_spawn(self.unit, &[loc], 1) == 0 {
                break;
            }
        }
        field.submit_turn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use td_engine::config::GameConfig;
    use td_engine::setup::create_initial_state;
    use td_engine::state::GameState;

    fn deploys(seed: u64) -> Vec<Location> {
        let mut state = create_initial_state(Arc::new(GameConfig::standard()));
        let mut agent = RandomAgent::new(seed);
        agent.on_turn(&mut state).unwrap();
        state.submission().unwrap().deploy.iter().map(|d| d.location).collect()
    }

    #[test]
    fn spends_all_mobile_points_on_interceptors() {
        let mut state = create_initial_state(Arc::new(GameConfig::standard()));
        let mut agent = RandomAgent::new(7);
        agent.on_turn(&mut state).unwrap();

        let submission = state.submission().unwrap();
        assert!(submission.build.is_empty());
        assert_eq!(submission.deploy.len(), 5);
        assert!(submission.deploy.iter().all(|d| d.kind == UnitKind::Interceptor));
        assert_eq!(state.resource(ResourceKind::Mobile), 0.0);
    }

    #[test]
    fn same_seed_same_moves() {
        assert_eq!(deploys(42), deploys(42));
    }

    #[test]
    fn never_deploys_on_blocked_cells() {
        let mut state: GameState = create_initial_state(Arc::new(GameConfig::standard()));
        let mut edges = state.edge_locations(Edge::BottomLeft);
        edges.extend(state.edge_locations(Edge::BottomRight));
        let keep = edges[3];
        for &loc in edges.iter().filter(|&&l| l != keep) {
            state.place_unit(UnitKind::Wall, Player::Me, loc);
        }
        let mut agent = RandomAgent::new(1);
        agent.on_turn(&mut state).unwrap();
        assert!(state.submission().unwrap().deploy.iter().all(|d| d.location == keep));
    }
}
