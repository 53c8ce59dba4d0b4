// ═══════════════════════════════════════════════════════════════════════
// Navigation: the path a mobile unit takes from an entry cell to the
// opposite edge.
//
// Units walk between orthogonal neighbours that hold no stationary unit.
// If the target edge is reachable, the unit takes the shortest route to
// the nearest edge cell. Otherwise it heads for the reachable cell that
// is closest to the edge (the "deepest" point) and stops there.
// ═══════════════════════════════════════════════════════════════════════

use crate::map::{self, GameMap, ARENA_SIZE, HALF_ARENA};
use crate::types::*;
use pathfinding::prelude::{build_path, dijkstra_all};

const NEIGHBORS_4: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// How many diagonal steps `loc` is from `edge` (0 = on the edge).
pub fn distance_to_edge(loc: Location, edge: Edge) -> i32 {
    let Location { x, y } = loc;
    match edge {
        Edge::TopRight => ARENA_SIZE - 1 + HALF_ARENA - (x + y),
        Edge::TopLeft => HALF_ARENA - (y - x),
        Edge::BottomLeft => (x + y) - (HALF_ARENA - 1),
        Edge::BottomRight => HALF_ARENA - (x - y),
    }
}

fn passable(board: &GameMap, loc: Location) -> bool {
    map::in_arena(loc) && !board.contains_stationary_unit(loc)
}

/// Path from `start` to the edge opposite the one it lies on.
/// `None` if the start is off the board or blocked by a structure.
pub fn find_path_to_edge(board: &GameMap, start: Location) -> Option<Vec<Location>> {
    path_toward(board, start, map::target_edge(start))
}

/// Path from `start` toward an explicit target edge. The returned path
/// always begins with `start`.
pub fn path_toward(board: &GameMap, start: Location, edge: Edge) -> Option<Vec<Location>> {
    if !passable(board, start) {
        return None;
    }

    let successors = |&loc: &Location| {
        NEIGHBORS_4.iter()
            .map(move |&(dx, dy)| Location::new(loc.x + dx, loc.y + dy))
            .filter(|&next| passable(board, next))
            .map(|next| (next, 1u32))
            .collect::<Vec<_>>()
    };
    let reached = dijkstra_all(&start, successors);

    // Best endpoint: closest to the edge, then shortest walk, then lowest
    // (y, x) so ties never depend on hash order.
    let goal = reached.iter()
        .map(|(&loc, &(_, cost))| (loc, cost))
        .chain(std::iter::once((start, 0)))
        .min_by_key(|&(loc, cost)| (distance_to_edge(loc, edge), cost, loc.y, loc.x))
        .map(|(loc, _)| loc)?;

    if goal == start {
        return Some(vec![start]);
    }
    Some(build_path(&goal, &reached))
}
