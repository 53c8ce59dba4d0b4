// ═══════════════════════════════════════════════════════════════════════
// Core types: locations, players, edges, unit kinds, per-player stats
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

// ── Location ───────────────────────────────────────────────────────────
// A single arena cell. Serialized as `[x, y]` to match the wire format.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Location { x, y }
    }

    /// Euclidean distance, as used for attack ranges.
    pub fn distance(self, other: Location) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// The cell one row up (toward the opponent).
    pub fn above(self) -> Location {
        Location::new(self.x, self.y + 1)
    }
}

impl From<[i32; 2]> for Location {
    fn from([x, y]: [i32; 2]) -> Self {
        Location { x, y }
    }
}

impl From<Location> for [i32; 2] {
    fn from(loc: Location) -> Self {
        [loc.x, loc.y]
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Shorthand for building coordinate tables.
pub fn locs(points: &[[i32; 2]]) -> Vec<Location> {
    points.iter().map(|&p| Location::from(p)).collect()
}

// ── Player ─────────────────────────────────────────────────────────────
// Perspective-relative: `Me` always owns the bottom half of the board
// it is looking at. The wire format numbers players 1 (self) and 2.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Me,
    Opponent,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::Me, Player::Opponent];

    pub fn other(self) -> Player {
        match self {
            Player::Me => Player::Opponent,
            Player::Opponent => Player::Me,
        }
    }

    /// 0 for `Me`, 1 for `Opponent`.
    pub fn index(self) -> usize {
        match self {
            Player::Me => 0,
            Player::Opponent => 1,
        }
    }

    /// Player number as written in action frames (1 = self, 2 = opponent).
    pub fn wire_index(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_wire_index(index: u8) -> Option<Player> {
        match index {
            1 => Some(Player::Me),
            2 => Some(Player::Opponent),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Me => write!(f, "me"),
            Player::Opponent => write!(f, "opponent"),
        }
    }
}

// ── Edge ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::TopRight, Edge::TopLeft, Edge::BottomLeft, Edge::BottomRight];

    /// The edge a unit entering from `self` walks toward.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::TopRight => Edge::BottomLeft,
            Edge::TopLeft => Edge::BottomRight,
            Edge::BottomLeft => Edge::TopRight,
            Edge::BottomRight => Edge::TopLeft,
        }
    }

    /// Which player deploys mobile units from this edge.
    pub fn owner(self) -> Player {
        match self {
            Edge::BottomLeft | Edge::BottomRight => Player::Me,
            Edge::TopLeft | Edge::TopRight => Player::Opponent,
        }
    }
}

// ── Unit kinds ─────────────────────────────────────────────────────────
// Order matches the `unitInformation` table in the game config.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Cheap absorber structure.
    Wall,
    /// Support structure that shields passing friendly mobiles.
    Support,
    /// Damage structure.
    Turret,
    Scout,
    Demolisher,
    Interceptor,
}

impl UnitKind {
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Wall,
        UnitKind::Support,
        UnitKind::Turret,
        UnitKind::Scout,
        UnitKind::Demolisher,
        UnitKind::Interceptor,
    ];

    pub fn is_stationary(self) -> bool {
        matches!(self, UnitKind::Wall | UnitKind::Support | UnitKind::Turret)
    }

    pub fn is_mobile(self) -> bool {
        !self.is_stationary()
    }

    /// Which resource pays for this kind.
    pub fn resource(self) -> ResourceKind {
        if self.is_stationary() {
            ResourceKind::Structure
        } else {
            ResourceKind::Mobile
        }
    }

    /// Position in the config table.
    pub fn index(self) -> usize {
        match self {
            UnitKind::Wall => 0,
            UnitKind::Support => 1,
            UnitKind::Turret => 2,
            UnitKind::Scout => 3,
            UnitKind::Demolisher => 4,
            UnitKind::Interceptor => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<UnitKind> {
        UnitKind::ALL.get(index).copied()
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKind::Wall => write!(f, "Wall"),
            UnitKind::Support => write!(f, "Support"),
            UnitKind::Turret => write!(f, "Turret"),
            UnitKind::Scout => write!(f, "Scout"),
            UnitKind::Demolisher => write!(f, "Demolisher"),
            UnitKind::Interceptor => write!(f, "Interceptor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Pays for stationary structures ("cores" on the wire).
    Structure,
    /// Pays for mobile units ("bits" on the wire).
    Mobile,
}

// ── Unit ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKind,
    pub owner: Player,
    pub health: f64,
    pub id: u64,
}

// ── Player stats ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub health: f64,
    pub structure_points: f64,
    pub mobile_points: f64,
}

impl PlayerStats {
    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Structure => self.structure_points,
            ResourceKind::Mobile => self.mobile_points,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Structure => &mut self.structure_points,
            ResourceKind::Mobile => &mut self.mobile_points,
        }
    }
}
