// ═══════════════════════════════════════════════════════════════════════
// Arena geometry and per-cell unit storage.
//
// The arena is a 28×28 diamond. Rows 0–13 belong to the player at the
// bottom (`Player::Me`), rows 14–27 to the opponent. Each of the four
// diagonal sides is an edge of 14 cells.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;

pub const ARENA_SIZE: i32 = 28;
pub const HALF_ARENA: i32 = ARENA_SIZE / 2;

/// Tolerance added to every attack range, matching the live game.
pub const RANGE_TOLERANCE: f64 = 0.51;

/// Is this cell inside the diamond?
pub fn in_arena(loc: Location) -> bool {
    let Location { x, y } = loc;
    if y < 0 || y >= ARENA_SIZE {
        return false;
    }
    if y < HALF_ARENA {
        x >= HALF_ARENA - 1 - y && x <= HALF_ARENA + y
    } else {
        x >= y - HALF_ARENA && x <= ARENA_SIZE - 1 + HALF_ARENA - y
    }
}

/// Which player's half contains this cell.
pub fn half_owner(loc: Location) -> Player {
    if loc.y < HALF_ARENA { Player::Me } else { Player::Opponent }
}

/// The 14 cells of an edge, ordered from the arena corner inward.
pub fn edge_locations(edge: Edge) -> Vec<Location> {
    (0..HALF_ARENA)
        .map(|i| match edge {
            Edge::TopRight => Location::new(HALF_ARENA + i, ARENA_SIZE - 1 - i),
            Edge::TopLeft => Location::new(HALF_ARENA - 1 - i, ARENA_SIZE - 1 - i),
            Edge::BottomLeft => Location::new(HALF_ARENA - 1 - i, i),
            Edge::BottomRight => Location::new(HALF_ARENA + i, i),
        })
        .collect()
}

/// The edge a cell lies on, if any. Corner cells at the arena's widest
/// row belong to the bottom edges for rows < 14 and the top edges otherwise.
pub fn edge_of(loc: Location) -> Option<Edge> {
    if !in_arena(loc) {
        return None;
    }
    let Location { x, y } = loc;
    if y < HALF_ARENA {
        if x + y == HALF_ARENA - 1 {
            return Some(Edge::BottomLeft);
        }
        if x - y == HALF_ARENA {
            return Some(Edge::BottomRight);
        }
    } else {
        if y - x == HALF_ARENA {
            return Some(Edge::TopLeft);
        }
        if x + y == ARENA_SIZE - 1 + HALF_ARENA {
            return Some(Edge::TopRight);
        }
    }
    None
}

/// The edge a unit starting at `start` walks toward. Cells not on an edge
/// head for the far side of the board, leaning toward the nearer corner.
pub fn target_edge(start: Location) -> Edge {
    match edge_of(start) {
        Some(edge) => edge.opposite(),
        None => {
            let left = start.x < HALF_ARENA;
            match (start.y < HALF_ARENA, left) {
                (true, true) => Edge::TopRight,
                (true, false) => Edge::TopLeft,
                (false, true) => Edge::BottomRight,
                (false, false) => Edge::BottomLeft,
            }
        }
    }
}

/// Every in-arena cell whose center is within `radius` (plus tolerance).
pub fn locations_in_range(center: Location, radius: f64) -> Vec<Location> {
    let reach = radius + RANGE_TOLERANCE;
    let span = reach.ceil() as i32;
    let mut out = Vec::new();
    for x in center.x - span..=center.x + span {
        for y in center.y - span..=center.y + span {
            let loc = Location::new(x, y);
            if in_arena(loc) && center.distance(loc) <= reach {
                out.push(loc);
            }
        }
    }
    out
}

/// Every in-arena cell, row by row.
pub fn all_locations() -> impl Iterator<Item = Location> {
    (0..ARENA_SIZE)
        .flat_map(|y| (0..ARENA_SIZE).map(move |x| Location::new(x, y)))
        .filter(|&loc| in_arena(loc))
}

/// Rotate a location 180°: how the opponent sees the board.
pub fn flip(loc: Location) -> Location {
    Location::new(ARENA_SIZE - 1 - loc.x, ARENA_SIZE - 1 - loc.y)
}

// ── Unit storage ───────────────────────────────────────────────────────

/// Units on the board, one stack per cell.
#[derive(Debug, Clone)]
pub struct GameMap {
    cells: Vec<Vec<Unit>>,
}

impl Default for GameMap {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMap {
    pub fn new() -> Self {
        GameMap {
            cells: vec![Vec::new(); (ARENA_SIZE * ARENA_SIZE) as usize],
        }
    }

    fn index(loc: Location) -> Option<usize> {
        in_arena(loc).then(|| (loc.x * ARENA_SIZE + loc.y) as usize)
    }

    pub fn units_at(&self, loc: Location) -> &[Unit] {
        match Self::index(loc) {
            Some(i) => &self.cells[i],
            None => &[],
        }
    }

    pub fn units_at_mut(&mut self, loc: Location) -> Option<&mut Vec<Unit>> {
        Self::index(loc).map(move |i| &mut self.cells[i])
    }

    pub fn contains_stationary_unit(&self, loc: Location) -> bool {
        self.stationary_at(loc).is_some()
    }

    pub fn stationary_at(&self, loc: Location) -> Option<&Unit> {
        self.units_at(loc).iter().find(|u| u.kind.is_stationary())
    }

    /// Place a unit. Returns false if the cell is off the board or, for a
    /// stationary unit, already holds one.
    pub fn add_unit(&mut self, loc: Location, unit: Unit) -> bool {
        let blocked = unit.kind.is_stationary() && self.contains_stationary_unit(loc);
        match self.units_at_mut(loc) {
            Some(stack) if !blocked => {
                stack.push(unit);
                true
            }
            _ => false,
        }
    }

    pub fn remove_unit(&mut self, loc: Location, id: u64) -> Option<Unit> {
        let stack = self.units_at_mut(loc)?;
        let pos = stack.iter().position(|u| u.id == id)?;
        Some(stack.remove(pos))
    }

    /// All (location, unit) pairs, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Location, &Unit)> {
        all_locations().flat_map(move |loc| self.units_at(loc).iter().map(move |u| (loc, u)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_has_expected_cell_count() {
        // 2 * (2 + 4 + ... + 28)
        assert_eq!(all_locations().count(), 420);
    }

    #[test]
    fn edges_are_in_arena_and_classified() {
        for edge in Edge::ALL {
            let cells = edge_locations(edge);
            assert_eq!(cells.len(), 14);
            for loc in cells {
                assert!(in_arena(loc), "{} should be in arena", loc);
                assert_eq!(edge_of(loc), Some(edge));
            }
        }
    }

    #[test]
    fn release_points_sit_on_bottom_edges() {
        assert_eq!(edge_of(Location::new(12, 1)), Some(Edge::BottomLeft));
        assert_eq!(edge_of(Location::new(15, 1)), Some(Edge::BottomRight));
        assert_eq!(edge_of(Location::new(2, 11)), Some(Edge::BottomLeft));
        assert_eq!(edge_of(Location::new(25, 11)), Some(Edge::BottomRight));
        assert_eq!(target_edge(Location::new(12, 1)), Edge::TopRight);
    }

    #[test]
    fn corners_outside_diamond() {
        assert!(!in_arena(Location::new(0, 0)));
        assert!(!in_arena(Location::new(17, 1)));
        assert!(in_arena(Location::new(0, 13)));
        assert!(in_arena(Location::new(27, 14)));
    }

    #[test]
    fn one_stationary_per_cell_mobiles_stack() {
        let mut map = GameMap::new();
        let loc = Location::new(13, 5);
        let unit = |kind, id| Unit { kind, owner: Player::Me, health: 10.0, id };
        assert!(map.add_unit(loc, unit(UnitKind::Wall, 1)));
        assert!(!map.add_unit(loc, unit(UnitKind::Turret, 2)));
        assert!(map.add_unit(loc, unit(UnitKind::Scout, 3)));
        assert!(map.add_unit(loc, unit(UnitKind::Scout, 4)));
        assert_eq!(map.units_at(loc).len(), 3);
        assert!(map.remove_unit(loc, 1).is_some());
        assert!(!map.contains_stationary_unit(loc));
    }

    #[test]
    fn range_includes_tolerance() {
        let cells = locations_in_range(Location::new(13, 13), 1.0);
        // 1.51 reaches the 8 neighbours (diagonal distance 1.414) plus center.
        assert_eq!(cells.len(), 9);
    }

    #[test]
    fn flip_is_an_involution() {
        let loc = Location::new(3, 12);
        assert_eq!(flip(flip(loc)), loc);
        assert!(in_arena(flip(loc)));
        assert_eq!(half_owner(flip(loc)), Player::Opponent);
    }
}
