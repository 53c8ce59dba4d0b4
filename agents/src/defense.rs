// ═══════════════════════════════════════════════════════════════════════
// Defense placement: three tiers, applied in order every turn.
//
//   1. Corner tier: fixed high-value points. Turn 0 places only the
//      minimal set; later turns add the extended set, walls first.
//   2. Full-row tier: fill the two rows behind the front line. Each row
//      reports whether it is completely occupied afterwards.
//   3. Fallback tier: interior funnel, attempted only when neither row
//      is full.
//
// Placing on an occupied cell is a no-op, so re-running a tier every
// turn simply tops up whatever was destroyed.
// ═══════════════════════════════════════════════════════════════════════

use crate::layout::{LayoutPreset, Placement};
use td_engine::battlefield::Battlefield;
use tracing::{debug, info};

/// What the policy did this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefenseReport {
    /// Structures actually placed, across all tiers.
    pub placed: u32,
    /// Fullness of each row after its attempt; `None` when the row tier
    /// did not run (turn 0).
    pub rows_full: Option<[bool; 2]>,
    pub fallback_attempted: bool,
}

fn place(field: &mut dyn Battlefield, placement: &Placement) -> u32 {
    field.attempt_spawn(placement.unit, &placement.cells, 1)
}

/// Try to fill a row; true when every cell now holds a structure.
pub fn fill_row(field: &mut dyn Battlefield, row: &Placement) -> (u32, bool) {
    let placed = place(field, row);
    let full = row.cells.iter().all(|&loc| field.contains_stationary_unit(loc));
    (placed, full)
}

pub fn apply(field: &mut dyn Battlefield, layout: &LayoutPreset) -> DefenseReport {
    let mut report = DefenseReport::default();
    let turn = field.turn_number();

    for placement in &layout.corner_tier(turn > 0) {
        report.placed += place(field, placement);
    }
    if turn == 0 {
        info!(turn, placed = report.placed, "opening corners placed");
        return report;
    }

    let mut full = [false; 2];
    for (slot, row) in full.iter_mut().zip(&layout.rows) {
        let (placed, is_full) = fill_row(field, row);
        report.placed += placed;
        *slot = is_full;
    }
    report.rows_full = Some(full);

    if !full[0] && !full[1] {
        debug!(turn, "rows incomplete, building interior funnel");
        report.fallback_attempted = true;
        for placement in &layout.fallback {
            report.placed += place(field, placement);
        }
    }

    info!(turn, placed = report.placed, rows = ?full, fallback = report.fallback_attempted, "defense placed");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use td_engine::config::GameConfig;
    use td_engine::state::GameState;
    use td_engine::types::*;

    fn board(turn: u32, structure_points: f64) -> GameState {
        let stats = PlayerStats { health: 30.0, structure_points, mobile_points: 0.0 };
        GameState::new(Arc::new(GameConfig::standard()), turn, [stats, stats])
    }

    #[test]
    fn turn_zero_places_only_the_corner_points() {
        let layout = LayoutPreset::standard();
        let mut state = board(0, 40.0);
        let report = apply(&mut state, &layout);

        assert_eq!(report.placed, 12);
        assert_eq!(report.rows_full, None);
        assert!(!report.fallback_attempted);
        assert_eq!(state.resource(ResourceKind::Structure), 40.0 - 6.0 - 6.0 * 3.0);
        for loc in &layout.corner[0].cells {
            assert_eq!(state.map.stationary_at(*loc).unwrap().kind, UnitKind::Wall);
        }
        for loc in &layout.corner[1].cells {
            assert_eq!(state.map.stationary_at(*loc).unwrap().kind, UnitKind::Turret);
        }
        assert_eq!(state.map.iter().count(), 12);
    }

    #[test]
    fn corner_walls_come_before_corner_turrets_when_short() {
        let layout = LayoutPreset::standard();
        let mut state = board(1, 4.0);
        for placement in &layout.corner {
            for &loc in &placement.cells {
                if loc != Location::new(1, 12) {
                    state.place_unit(placement.unit, Player::Me, loc);
                }
            }
        }
        let report = apply(&mut state, &layout);

        assert_eq!(report.placed, 4);
        assert!(!state.contains_stationary_unit(Location::new(1, 12)));
        for &loc in &layout.corner_extended[0].cells[..4] {
            assert_eq!(state.map.stationary_at(loc).unwrap().kind, UnitKind::Wall);
        }
        assert_eq!(state.resource(ResourceKind::Structure), 0.0);
    }

    #[test]
    fn rich_turn_fills_rows_and_skips_fallback() {
        let layout = LayoutPreset::standard();
        let mut state = board(5, 1000.0);
        let report = apply(&mut state, &layout);

        assert_eq!(report.rows_full, Some([true, true]));
        assert!(!report.fallback_attempted);
        assert!(!state.contains_stationary_unit(Location::new(12, 12)));
    }

    #[test]
    fn tight_budget_falls_back_to_funnel() {
        let layout = LayoutPreset::standard();
        let mut state = board(1, 40.0);
        let report = apply(&mut state, &layout);

        assert_eq!(report.rows_full, Some([false, false]));
        assert!(report.fallback_attempted);
    }

    #[test]
    fn one_full_row_suppresses_fallback() {
        let layout = LayoutPreset::standard();
        let mut state = board(1, 40.0);
        for &loc in &layout.rows[0].cells {
            state.place_unit(UnitKind::Wall, Player::Me, loc);
        }
        let report = apply(&mut state, &layout);

        assert_eq!(report.rows_full, Some([true, false]));
        assert!(!report.fallback_attempted);
    }

    #[test]
    fn rerunning_tops_up_without_double_building() {
        let layout = LayoutPreset::standard();
        let mut state = board(0, 40.0);
        apply(&mut state, &layout);
        let after_first = state.resource(ResourceKind::Structure);
        let report = apply(&mut state, &layout);
        assert_eq!(report.placed, 0);
        assert_eq!(state.resource(ResourceKind::Structure), after_first);
    }
}
