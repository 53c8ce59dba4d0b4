// ═══════════════════════════════════════════════════════════════════════
// Game state: board, per-player stats, and this turn's queued placements.
// ═══════════════════════════════════════════════════════════════════════

use crate::battlefield::Battlefield;
use crate::config::{GameConfig, UnitCatalog};
use crate::error::{EngineError, Result};
use crate::map::{self, GameMap};
use crate::navigation;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// One unit placed this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub kind: UnitKind,
    pub location: Location,
}

/// A turn's placements, split the way the wire expects: structures first,
/// then mobile units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSubmission {
    pub turn: u32,
    pub build: Vec<Deployment>,
    pub deploy: Vec<Deployment>,
}

impl TurnSubmission {
    /// Every placement, structures first.
    pub fn all(&self) -> impl Iterator<Item = &Deployment> {
        self.build.iter().chain(self.deploy.iter())
    }
}

/// Why a single spawn was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRejection {
    OutOfArena,
    WrongHalf,
    Occupied,
    NotOnEdge,
    Unaffordable,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Arc<GameConfig>,
    pub map: GameMap,
    pub turn: u32,
    /// Indexed by `Player::index()`.
    pub stats: [PlayerStats; 2],
    next_unit_id: u64,
    pending: TurnSubmission,
    submitted: Option<TurnSubmission>,
}

impl GameState {
    pub fn new(config: Arc<GameConfig>, turn: u32, stats: [PlayerStats; 2]) -> Self {
        GameState {
            config,
            map: GameMap::new(),
            turn,
            stats,
            next_unit_id: 1,
            pending: TurnSubmission { turn, ..Default::default() },
            submitted: None,
        }
    }

    pub fn player_stats(&self, player: Player) -> &PlayerStats {
        &self.stats[player.index()]
    }

    pub fn player_stats_mut(&mut self, player: Player) -> &mut PlayerStats {
        &mut self.stats[player.index()]
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next_unit_id;
        self.next_unit_id += 1;
        id
    }

    /// Put a unit on the board without any cost or legality checks.
    /// Used when loading turn data and by tests.
    pub fn place_unit(&mut self, kind: UnitKind, owner: Player, loc: Location) -> bool {
        let id = self.next_id();
        let health = self.config.stats(kind).health;
        self.map.add_unit(loc, Unit { kind, owner, health, id })
    }

    pub fn place_unit_with(&mut self, unit: Unit, loc: Location) -> bool {
        self.next_unit_id = self.next_unit_id.max(unit.id + 1);
        self.map.add_unit(loc, unit)
    }

    /// Check whether `player` may place one `kind` at `loc` right now.
    pub fn can_spawn(&self, player: Player, kind: UnitKind, loc: Location) -> std::result::Result<(), SpawnRejection> {
        if !map::in_arena(loc) {
            return Err(SpawnRejection::OutOfArena);
        }
        if map::half_owner(loc) != player {
            return Err(SpawnRejection::WrongHalf);
        }
        if self.map.contains_stationary_unit(loc) {
            return Err(SpawnRejection::Occupied);
        }
        if kind.is_mobile() && !map::edge_of(loc).is_some_and(|e| e.owner() == player) {
            return Err(SpawnRejection::NotOnEdge);
        }
        let cost = self.config.stats(kind).cost;
        if self.player_stats(player).get(kind.resource()) < cost {
            return Err(SpawnRejection::Unaffordable);
        }
        Ok(())
    }

    /// Spawn on behalf of either player, paying from their stats. Only
    /// `Player::Me` placements are queued for submission.
    pub fn spawn_for(&mut self, player: Player, kind: UnitKind, locations: &[Location], count: u32) -> u32 {
        let cost = self.config.stats(kind).cost;
        let mut placed = 0;
        for &loc in locations {
            for _ in 0..count {
                if let Err(reason) = self.can_spawn(player, kind, loc) {
                    debug!(%kind, %loc, ?reason, player = %player, "spawn rejected");
                    break;
                }
                *self.player_stats_mut(player).get_mut(kind.resource()) -= cost;
                self.place_unit(kind, player, loc);
                if player == Player::Me {
                    let entry = Deployment { kind, location: loc };
                    if kind.is_stationary() {
                        self.pending.build.push(entry);
                    } else {
                        self.pending.deploy.push(entry);
                    }
                }
                placed += 1;
            }
        }
        placed
    }

    /// The sealed submission, if `submit_turn` has run.
    pub fn submission(&self) -> Option<&TurnSubmission> {
        self.submitted.as_ref()
    }

    pub fn take_submission(&mut self) -> Option<TurnSubmission> {
        self.submitted.take()
    }

    /// Start a fresh turn: clears queued placements and the submit latch.
    pub fn begin_turn(&mut self, turn: u32) {
        self.turn = turn;
        self.pending = TurnSubmission { turn, ..Default::default() };
        self.submitted = None;
    }

    /// The player whose health ran out, if any.
    pub fn loser(&self) -> Option<Player> {
        Player::BOTH.into_iter().find(|&p| self.player_stats(p).health <= 0.0)
    }
}

impl Battlefield for GameState {
    fn catalog(&self) -> &UnitCatalog {
        &self.config.catalog
    }

    fn turn_number(&self) -> u32 {
        self.turn
    }

    fn find_path_to_edge(&self, start: Location) -> Option<Vec<Location>> {
        navigation::find_path_to_edge(&self.map, start)
    }

    fn attackers(&self, location: Location, defender: Player) -> Vec<Unit> {
        let reach = self.config.catalog.max_structure_range();
        map::locations_in_range(location, reach)
            .into_iter()
            .filter_map(|loc| self.map.stationary_at(loc).map(|u| (loc, u)))
            .filter(|(loc, u)| {
                let stats = self.config.stats(u.kind);
                u.owner != defender
                    && stats.damage_to_mobiles > 0.0
                    && loc.distance(location) <= stats.range + map::RANGE_TOLERANCE
            })
            .map(|(_, u)| u.clone())
            .collect()
    }

    fn contains_stationary_unit(&self, location: Location) -> bool {
        self.map.contains_stationary_unit(location)
    }

    fn units_at(&self, location: Location) -> &[Unit] {
        self.map.units_at(location)
    }

    fn attempt_spawn(&mut self, kind: UnitKind, locations: &[Location], count: u32) -> u32 {
        self.spawn_for(Player::Me, kind, locations, count)
    }

    fn resource(&self, kind: ResourceKind) -> f64 {
        self.player_stats(Player::Me).get(kind)
    }

    fn my_health(&self) -> f64 {
        self.player_stats(Player::Me).health
    }

    fn enemy_health(&self) -> f64 {
        self.player_stats(Player::Opponent).health
    }

    fn submit_turn(&mut self) -> Result<()> {
        if self.submitted.is_some() {
            return Err(EngineError::AlreadySubmitted(self.turn));
        }
        let sealed = std::mem::replace(&mut self.pending, TurnSubmission { turn: self.turn, ..Default::default() });
        debug!(turn = self.turn, build = sealed.build.len(), deploy = sealed.deploy.len(), "turn submitted");
        self.submitted = Some(sealed);
        Ok(())
    }
}
