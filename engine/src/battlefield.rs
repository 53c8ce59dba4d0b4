// ═══════════════════════════════════════════════════════════════════════
// Battlefield: the query/spawn surface an agent sees each turn.
//
// Agents never touch `GameState` fields directly; everything they may
// ask or do goes through this trait. The live protocol and the local
// simulator both hand agents a `GameState`, which implements it, but
// keeping the seam as a trait lets strategies be driven by any board
// provider.
//
// All queries are from the point of view of the player who owns the
// bottom half (`Player::Me`).
// ═══════════════════════════════════════════════════════════════════════

use crate::config::{UnitCatalog, UnitStats};
use crate::error::Result;
use crate::map;
use crate::types::*;

pub trait Battlefield {
    fn catalog(&self) -> &UnitCatalog;

    /// Turn number, starting at 0.
    fn turn_number(&self) -> u32;

    fn edge_locations(&self, edge: Edge) -> Vec<Location> {
        map::edge_locations(edge)
    }

    /// Path a mobile unit would take from `start` to the opposite edge.
    /// `None` when no path can start there.
    fn find_path_to_edge(&self, start: Location) -> Option<Vec<Location>>;

    /// Stationary damage dealers that would fire on a unit owned by
    /// `defender` standing at `location`.
    fn attackers(&self, location: Location, defender: Player) -> Vec<Unit>;

    fn contains_stationary_unit(&self, location: Location) -> bool;

    fn units_at(&self, location: Location) -> &[Unit];

    /// Try to place up to `count` units of `kind` at each location, in
    /// order. Returns how many were placed. Rejections (occupied cell,
    /// wrong half, not enough resources) are not errors.
    fn attempt_spawn(&mut self, kind: UnitKind, locations: &[Location], count: u32) -> u32;

    fn resource(&self, kind: ResourceKind) -> f64;

    fn type_cost(&self, kind: UnitKind) -> f64 {
        self.catalog().stats(kind).cost
    }

    fn unit_stats(&self, kind: UnitKind) -> &UnitStats {
        self.catalog().stats(kind)
    }

    fn my_health(&self) -> f64;

    fn enemy_health(&self) -> f64;

    /// Seal this turn's placements. Submitting twice is a contract
    /// violation and returns an error.
    fn submit_turn(&mut self) -> Result<()>;

    // ── Provided helpers ───────────────────────────────────────────────

    /// Locations not currently holding a stationary unit.
    fn filter_blocked_locations(&self, locations: &[Location]) -> Vec<Location> {
        locations.iter()
            .copied()
            .filter(|&loc| !self.contains_stationary_unit(loc))
            .collect()
    }

    /// Count stationary units owned by `owner`, optionally of one kind,
    /// inside `region`.
    fn count_structures(&self, owner: Player, kind: Option<UnitKind>, region: &dyn Fn(Location) -> bool) -> usize {
        map::all_locations()
            .filter(|&loc| region(loc))
            .flat_map(|loc| self.units_at(loc).iter())
            .filter(|u| u.kind.is_stationary() && u.owner == owner)
            .filter(|u| kind.map_or(true, |k| u.kind == k))
            .count()
    }
}
