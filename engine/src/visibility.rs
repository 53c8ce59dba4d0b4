// ═══════════════════════════════════════════════════════════════════════
// Perspective: every agent plays from the bottom of the board.
//
// The live game always presents a player as "player 1" at the bottom.
// The local simulator keeps one absolute board where `Player::Me` is the
// first seat, so the second seat's view is the board rotated 180° with
// ownership and stats swapped. Placements the second seat submits are
// rotated back before they touch the absolute board.
// ═══════════════════════════════════════════════════════════════════════

use crate::map;
use crate::protocol::ActionFrame;
use crate::state::{GameState, TurnSubmission};
use crate::types::*;

/// Map a location between the absolute board and `seat`'s view.
/// The rotation is its own inverse, so this works in both directions.
pub fn to_seat(loc: Location, seat: Player) -> Location {
    match seat {
        Player::Me => loc,
        Player::Opponent => map::flip(loc),
    }
}

/// Map an owner between the absolute board and `seat`'s view.
pub fn owner_for_seat(owner: Player, seat: Player) -> Player {
    match seat {
        Player::Me => owner,
        Player::Opponent => owner.other(),
    }
}

/// The board as `seat` sees it, with a fresh (unsubmitted) turn.
pub fn player_view(state: &GameState, seat: Player) -> GameState {
    let stats = match seat {
        Player::Me => state.stats,
        Player::Opponent => [state.stats[1], state.stats[0]],
    };
    let mut view = GameState::new(state.config.clone(), state.turn, stats);
    for (loc, unit) in state.map.iter() {
        let mut unit = unit.clone();
        unit.owner = owner_for_seat(unit.owner, seat);
        view.place_unit_with(unit, to_seat(loc, seat));
    }
    view
}

/// Apply a seat's submission to the absolute board. Structures land
/// before mobile units. Returns how many placements succeeded.
pub fn apply_submission(state: &mut GameState, seat: Player, submission: &TurnSubmission) -> u32 {
    submission.all()
        .map(|d| state.spawn_for(seat, d.kind, &[to_seat(d.location, seat)], 1))
        .sum()
}

/// An action frame as `seat` sees it: breach cells rotated, and owners
/// relabelled so `Opponent` still means "scored on this seat".
pub fn frame_view(frame: &ActionFrame, seat: Player) -> ActionFrame {
    let mut view = frame.clone();
    for breach in &mut view.breaches {
        breach.location = to_seat(breach.location, seat);
        breach.owner = owner_for_seat(breach.owner, seat);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::Battlefield;
    use crate::config::GameConfig;
    use crate::protocol::BreachEvent;
    use crate::setup::create_initial_state;
    use std::sync::Arc;

    #[test]
    fn second_seat_sees_its_units_at_the_bottom() {
        let mut state = create_initial_state(Arc::new(GameConfig::standard()));
        state.place_unit(UnitKind::Turret, Player::Opponent, Location::new(10, 20));
        state.player_stats_mut(Player::Opponent).health = 12.0;

        let view = player_view(&state, Player::Opponent);
        let flipped = Location::new(17, 7);
        let unit = view.map.stationary_at(flipped).unwrap();
        assert_eq!(unit.owner, Player::Me);
        assert_eq!(view.my_health(), 12.0);
        assert_eq!(view.enemy_health(), 30.0);
    }

    #[test]
    fn submission_rotates_back_to_absolute_board() {
        let mut state = create_initial_state(Arc::new(GameConfig::standard()));
        let mut view = player_view(&state, Player::Opponent);
        assert_eq!(view.attempt_spawn(UnitKind::Wall, &[Location::new(13, 12)], 1), 1);
        view.submit_turn().unwrap();

        let placed = apply_submission(&mut state, Player::Opponent, view.submission().unwrap());
        assert_eq!(placed, 1);
        let unit = state.map.stationary_at(Location::new(14, 15)).unwrap();
        assert_eq!(unit.owner, Player::Opponent);
        assert_eq!(state.player_stats(Player::Opponent).structure_points, 39.0);
    }

    #[test]
    fn breach_seen_by_the_seat_that_was_scored_on() {
        let frame = ActionFrame {
            turn: 2,
            frame: 28,
            breaches: vec![BreachEvent {
                location: Location::new(27, 14),
                damage: 1.0,
                kind: Some(UnitKind::Scout),
                unit_id: "3".to_string(),
                owner: Player::Me,
            }],
        };
        let theirs = frame_view(&frame, Player::Opponent);
        assert!(theirs.breaches[0].by_opponent());
        assert_eq!(theirs.breaches[0].location, Location::new(0, 13));
        assert_eq!(map::edge_of(theirs.breaches[0].location), Some(Edge::BottomLeft));
        assert_eq!(frame_view(&frame, Player::Me), frame);
    }
}
