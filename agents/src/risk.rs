// ═══════════════════════════════════════════════════════════════════════
// Path risk: how much damage a mobile unit would soak walking a lane.
//
// The estimate is static: for every cell on the path, count the enemy
// structures that could fire on that cell and multiply by the turret's
// per-shot damage. Shields on our units, splash, and health depletion
// along the way are not modelled.
// ═══════════════════════════════════════════════════════════════════════

use td_engine::battlefield::Battlefield;
use td_engine::types::*;
use tracing::{debug, warn};

/// Outcome of evaluating one launch point.
#[derive(Debug, Clone, PartialEq)]
pub enum PathRisk {
    /// The unit has a path; `risk` is the summed damage estimate.
    Reachable { risk: f64, path: Vec<Location> },
    /// No path can start at this location.
    Unreachable,
}

impl PathRisk {
    /// Risk with unreachable launch points ranked last.
    pub fn or_sentinel(&self) -> f64 {
        match self {
            PathRisk::Reachable { risk, .. } => *risk,
            PathRisk::Unreachable => UNREACHABLE_RISK,
        }
    }
}

/// Risk assigned to launch points with no path.
pub const UNREACHABLE_RISK: f64 = f64::MAX;

/// Per-shot damage of the structure kind the estimate assumes is firing.
pub fn shot_damage(field: &dyn Battlefield) -> f64 {
    field.unit_stats(UnitKind::Turret).damage_to_mobiles
}

pub fn evaluate(field: &dyn Battlefield, entry: Location) -> PathRisk {
    let Some(path) = field.find_path_to_edge(entry) else {
        return PathRisk::Unreachable;
    };
    let damage = shot_damage(field);
    let risk = path.iter()
        .map(|&cell| field.attackers(cell, Player::Me).len() as f64 * damage)
        .sum();
    PathRisk::Reachable { risk, path }
}

/// The lowest-risk candidate; the first one wins ties. `None` only when
/// `candidates` is empty.
pub fn select(field: &dyn Battlefield, candidates: &[Location]) -> Option<Location> {
    let mut best: Option<(Location, f64)> = None;
    for &loc in candidates {
        let risk = evaluate(field, loc).or_sentinel();
        if risk == UNREACHABLE_RISK {
            warn!(%loc, "launch point has no path");
        }
        debug!(%loc, risk, "launch risk");
        // Strict comparison keeps the earliest minimum.
        if best.map_or(true, |(_, r)| risk < r) {
            best = Some((loc, risk));
        }
    }
    best.map(|(loc, _)| loc)
}
