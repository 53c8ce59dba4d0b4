// ═══════════════════════════════════════════════════════════════════════
// Engine test suite: spawning, queries, submission, action phase
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::battlefield::Battlefield;
    use crate::config::GameConfig;
    use crate::engine::{end_turn, run_action_phase};
    use crate::error::EngineError;
    use crate::map;
    use crate::setup::create_initial_state;
    use crate::state::GameState;
    use crate::types::*;
    use std::sync::Arc;

    fn fresh() -> GameState {
        create_initial_state(Arc::new(GameConfig::standard()))
    }

    // ═════════════════════════════════════════════════════════════════════
    // SETUP
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn initial_state_uses_config_resources() {
        let state = fresh();
        assert_eq!(state.turn_number(), 0);
        assert_eq!(state.my_health(), 30.0);
        assert_eq!(state.enemy_health(), 30.0);
        assert_eq!(state.resource(ResourceKind::Structure), 40.0);
        assert_eq!(state.resource(ResourceKind::Mobile), 5.0);
        assert_eq!(state.map.iter().count(), 0);
    }

    // ═════════════════════════════════════════════════════════════════════
    // SPAWNING
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn structure_spawn_pays_and_blocks_cell() {
        let mut state = fresh();
        let loc = Location::new(1, 12);
        assert_eq!(state.attempt_spawn(UnitKind::Turret, &[loc], 1), 1);
        assert_eq!(state.resource(ResourceKind::Structure), 37.0);
        // Second placement on the same cell is a no-op, not an error.
        assert_eq!(state.attempt_spawn(UnitKind::Wall, &[loc], 1), 0);
        assert_eq!(state.resource(ResourceKind::Structure), 37.0);
    }

    #[test]
    fn cannot_build_on_opponent_half_or_off_board() {
        let mut state = fresh();
        assert_eq!(state.attempt_spawn(UnitKind::Wall, &[Location::new(13, 14)], 1), 0);
        assert_eq!(state.attempt_spawn(UnitKind::Wall, &[Location::new(17, 1)], 1), 0);
        assert_eq!(state.resource(ResourceKind::Structure), 40.0);
    }

    #[test]
    fn mobile_spawn_needs_own_edge_and_stops_when_broke() {
        let mut state = fresh();
        assert_eq!(state.attempt_spawn(UnitKind::Scout, &[Location::new(13, 5)], 1), 0);
        // 5 mobile points, scouts cost 1: asking for many spawns what we can afford.
        assert_eq!(state.attempt_spawn(UnitKind::Scout, &[Location::new(12, 1)], 10_000), 5);
        assert_eq!(state.resource(ResourceKind::Mobile), 0.0);
        assert_eq!(state.units_at(Location::new(12, 1)).len(), 5);
    }

    #[test]
    fn mobile_cannot_deploy_on_blocked_edge() {
        let mut state = fresh();
        let loc = Location::new(2, 11);
        state.attempt_spawn(UnitKind::Wall, &[loc], 1);
        assert_eq!(state.attempt_spawn(UnitKind::Scout, &[loc], 1), 0);
        assert!(state.find_path_to_edge(loc).is_none());
    }

    #[test]
    fn spawns_over_several_locations_in_order() {
        let mut state = fresh();
        state.player_stats_mut(Player::Me).structure_points = 2.0;
        let cells = [Location::new(5, 12), Location::new(6, 12), Location::new(7, 12)];
        assert_eq!(state.attempt_spawn(UnitKind::Wall, &cells, 1), 2);
        assert!(state.contains_stationary_unit(cells[0]));
        assert!(state.contains_stationary_unit(cells[1]));
        assert!(!state.contains_stationary_unit(cells[2]));
    }

    // ═════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn attackers_are_enemy_turrets_in_range() {
        let mut state = fresh();
        state.place_unit(UnitKind::Turret, Player::Opponent, Location::new(13, 16));
        state.place_unit(UnitKind::Wall, Player::Opponent, Location::new(13, 15));
        state.place_unit(UnitKind::Turret, Player::Me, Location::new(13, 12));

        let near = state.attackers(Location::new(13, 14), Player::Me);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].kind, UnitKind::Turret);
        assert_eq!(near[0].owner, Player::Opponent);
        assert!(state.attackers(Location::new(13, 10), Player::Me).is_empty());
        // From the opponent's side, only our turret threatens.
        assert_eq!(state.attackers(Location::new(13, 14), Player::Opponent).len(), 1);
    }

    #[test]
    fn structure_count_and_blocked_filter() {
        let mut state = fresh();
        state.place_unit(UnitKind::Turret, Player::Opponent, Location::new(10, 16));
        state.place_unit(UnitKind::Turret, Player::Opponent, Location::new(20, 16));
        state.place_unit(UnitKind::Wall, Player::Opponent, Location::new(12, 15));
        let left = |loc: Location| loc.x < map::HALF_ARENA;
        assert_eq!(state.count_structures(Player::Opponent, Some(UnitKind::Turret), &|_| true), 2);
        assert_eq!(state.count_structures(Player::Opponent, Some(UnitKind::Turret), &left), 1);
        assert_eq!(state.count_structures(Player::Opponent, None, &left), 2);
        assert_eq!(state.count_structures(Player::Me, None, &|_| true), 0);

        state.place_unit(UnitKind::Wall, Player::Me, Location::new(12, 1));
        let open = state.filter_blocked_locations(&[Location::new(12, 1), Location::new(15, 1)]);
        assert_eq!(open, vec![Location::new(15, 1)]);
    }

    // ═════════════════════════════════════════════════════════════════════
    // SUBMISSION
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn submit_seals_placements_once() {
        let mut state = fresh();
        state.attempt_spawn(UnitKind::Wall, &[Location::new(1, 13)], 1);
        state.attempt_spawn(UnitKind::Scout, &[Location::new(15, 1)], 2);
        state.submit_turn().unwrap();

        let sub = state.submission().unwrap();
        assert_eq!(sub.build.len(), 1);
        assert_eq!(sub.deploy.len(), 2);
        assert!(matches!(state.submit_turn(), Err(EngineError::AlreadySubmitted(0))));
    }

    // ═════════════════════════════════════════════════════════════════════
    // ACTION PHASE
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn undefended_scout_breaches_far_edge() {
        let mut state = fresh();
        state.attempt_spawn(UnitKind::Scout, &[Location::new(13, 0)], 1);
        let frames = run_action_phase(&mut state);

        assert_eq!(frames.len(), 1);
        let breach = &frames[0].breaches[0];
        assert_eq!(breach.owner, Player::Me);
        assert_eq!(map::edge_of(breach.location), Some(Edge::TopRight));
        assert_eq!(state.enemy_health(), 29.0);
        assert_eq!(state.map.iter().count(), 0);
    }

    #[test]
    fn turrets_destroy_fragile_attacker() {
        let mut state = fresh();
        state.place_unit(UnitKind::Turret, Player::Opponent, Location::new(12, 2));
        state.place_unit(UnitKind::Turret, Player::Opponent, Location::new(14, 2));
        state.attempt_spawn(UnitKind::Demolisher, &[Location::new(13, 0)], 1);

        let frames = run_action_phase(&mut state);
        assert!(frames.is_empty());
        assert_eq!(state.enemy_health(), 30.0);
        assert!(state.map.iter().all(|(_, u)| u.kind == UnitKind::Turret));
    }

    #[test]
    fn end_turn_decays_mobile_points_and_pays_income() {
        let mut state = fresh();
        state.submit_turn().unwrap();
        end_turn(&mut state);
        assert_eq!(state.turn_number(), 1);
        assert_eq!(state.resource(ResourceKind::Mobile), 8.75);
        assert_eq!(state.resource(ResourceKind::Structure), 45.0);
        // A new turn can be submitted again.
        assert!(state.submission().is_none());
        assert!(state.submit_turn().is_ok());
    }

    #[test]
    fn loser_is_first_player_at_zero_health() {
        let mut state = fresh();
        assert!(state.loser().is_none());
        state.player_stats_mut(Player::Opponent).health = 0.0;
        assert_eq!(state.loser(), Some(Player::Opponent));
    }
}
