// ═══════════════════════════════════════════════════════════════════════
// Diagonal walls, raised right before a general attack.
//
// The two walls mirror each other across the centre lane. Together with
// the two default launch points they leave four lanes for the launch
// selector to choose from.
// ═══════════════════════════════════════════════════════════════════════

use crate::layout::LayoutPreset;
use td_engine::battlefield::Battlefield;
use tracing::debug;

/// Place both walls, left first. Returns how many pieces were placed.
pub fn build(field: &mut dyn Battlefield, layout: &LayoutPreset) -> u32 {
    let unit = layout.diagonal_wall_unit;
    let left = field.attempt_spawn(unit, &layout.left_wall, 1);
    let right = field.attempt_spawn(unit, &layout.right_wall, 1);
    debug!(left, right, %unit, "diagonal walls");
    left + right
}
