// ═══════════════════════════════════════════════════════════════════════
// Action phase: resolves one turn of combat on the absolute board.
//
// Architecture:
//   Like the deploy phase, the action phase is a pure function of the
//   state. It never calls agents. The match runner feeds the frames it
//   returns back to the agents as action-frame events.
//
// Each frame:
//   1. Supports shield friendly mobiles in range (once per support).
//   2. Every mobile steps one cell along its path, re-pathing if a
//      structure now blocks the next cell. A mobile at the end of its
//      path either breaches (on its target edge) or self-destructs.
//   3. Every armed unit fires once at the nearest enemy in range. Hits
//      are collected first and applied together.
//   4. Units at zero health are removed.
// ═══════════════════════════════════════════════════════════════════════

use crate::map;
use crate::navigation;
use crate::protocol::{ActionFrame, BreachEvent};
use crate::setup::mobile_income;
use crate::state::GameState;
use crate::types::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Hard stop for a single action phase.
pub const MAX_FRAMES: u32 = 1000;

/// A mobile unit walking its path this turn.
#[derive(Debug, Clone)]
struct Walker {
    id: u64,
    owner: Player,
    loc: Location,
    target: Edge,
    path: Vec<Location>,
    step: usize,
    shielded_by: HashSet<u64>,
}

/// Run the whole action phase. Returns only frames that carried events.
pub fn run_action_phase(state: &mut GameState) -> Vec<ActionFrame> {
    let mut walkers: Vec<Walker> = state.map.iter()
        .filter(|(_, u)| u.kind.is_mobile())
        .map(|(loc, u)| {
            let target = map::target_edge(loc);
            Walker {
                id: u.id,
                owner: u.owner,
                loc,
                target,
                path: navigation::path_toward(&state.map, loc, target).unwrap_or_else(|| vec![loc]),
                step: 0,
                shielded_by: HashSet::new(),
            }
        })
        .collect();

    let mut frames = Vec::new();
    let mut frame = 0;
    while !walkers.is_empty() && frame < MAX_FRAMES {
        apply_shields(state, &mut walkers);
        let breaches = move_walkers(state, &mut walkers, frame);
        resolve_attacks(state);
        walkers.retain(|w| state.map.units_at(w.loc).iter().any(|u| u.id == w.id));
        if !breaches.is_empty() {
            frames.push(ActionFrame { turn: state.turn, frame: frame as i64, breaches });
        }
        frame += 1;
    }

    // Anything still walking at the cap is removed.
    for w in walkers {
        state.map.remove_unit(w.loc, w.id);
    }
    debug!(turn = state.turn, frames = frame, "action phase resolved");
    frames
}

fn apply_shields(state: &mut GameState, walkers: &mut [Walker]) {
    let supports: Vec<(Location, u64, Player)> = state.map.iter()
        .filter(|(_, u)| u.kind == UnitKind::Support)
        .map(|(loc, u)| (loc, u.id, u.owner))
        .collect();
    let stats = state.config.stats(UnitKind::Support).clone();
    if stats.shield <= 0.0 {
        return;
    }
    for w in walkers.iter_mut() {
        for &(loc, sid, owner) in &supports {
            if owner == w.owner
                && !w.shielded_by.contains(&sid)
                && loc.distance(w.loc) <= stats.range + map::RANGE_TOLERANCE
            {
                if let Some(unit) = state.map.units_at_mut(w.loc).and_then(|s| s.iter_mut().find(|u| u.id == w.id)) {
                    unit.health += stats.shield;
                    w.shielded_by.insert(sid);
                }
            }
        }
    }
}

fn move_walkers(state: &mut GameState, walkers: &mut Vec<Walker>, frame: u32) -> Vec<BreachEvent> {
    let mut breaches = Vec::new();
    let mut finished: Vec<usize> = Vec::new();

    for (i, w) in walkers.iter_mut().enumerate() {
        if w.step + 1 < w.path.len() && state.map.contains_stationary_unit(w.path[w.step + 1]) {
            w.path = navigation::path_toward(&state.map, w.loc, w.target).unwrap_or_else(|| vec![w.loc]);
            w.step = 0;
        }

        if w.step + 1 >= w.path.len() {
            finished.push(i);
            continue;
        }

        let next = w.path[w.step + 1];
        if let Some(unit) = state.map.remove_unit(w.loc, w.id) {
            state.map.add_unit(next, unit);
        }
        w.loc = next;
        w.step += 1;
    }

    for &i in finished.iter().rev() {
        let w = walkers.remove(i);
        let Some(unit) = state.map.remove_unit(w.loc, w.id) else { continue };
        if navigation::distance_to_edge(w.loc, w.target) == 0 {
            let stats = state.config.stats(unit.kind);
            let (damage, reward) = (stats.breach_damage, state.config.resources.breach_reward);
            state.player_stats_mut(w.owner.other()).health -= damage;
            state.player_stats_mut(w.owner).structure_points += reward;
            info!(turn = state.turn, frame, loc = %w.loc, owner = %w.owner, "breach");
            breaches.push(BreachEvent {
                location: w.loc,
                damage,
                kind: Some(unit.kind),
                unit_id: unit.id.to_string(),
                owner: w.owner,
            });
        } else {
            debug!(loc = %w.loc, id = w.id, "mobile stuck, self-destructed");
        }
    }
    breaches.reverse();
    breaches
}

/// Damage this unit deals to `target`, if it may fire at it at all.
fn damage_against(state: &GameState, shooter: UnitKind, target: UnitKind) -> f64 {
    let stats = state.config.stats(shooter);
    if target.is_mobile() { stats.damage_to_mobiles } else { stats.damage_to_structures }
}

fn resolve_attacks(state: &mut GameState) {
    let units: Vec<(Location, Unit)> = state.map.iter().map(|(l, u)| (l, u.clone())).collect();
    let mut hits: Vec<(Location, u64, f64)> = Vec::new();

    for (loc, shooter) in &units {
        let range = state.config.stats(shooter.kind).range;
        if range <= 0.0 {
            continue;
        }
        // Nearest first; mobiles before structures; then weakest; then id.
        let target = units.iter()
            .filter(|(_, t)| t.owner != shooter.owner)
            .filter(|(tl, _)| tl.distance(*loc) <= range + map::RANGE_TOLERANCE)
            .filter(|(_, t)| damage_against(state, shooter.kind, t.kind) > 0.0)
            .min_by(|(al, a), (bl, b)| {
                al.distance(*loc).total_cmp(&bl.distance(*loc))
                    .then(a.kind.is_stationary().cmp(&b.kind.is_stationary()))
                    .then(a.health.total_cmp(&b.health))
                    .then(a.id.cmp(&b.id))
            });
        if let Some((tl, t)) = target {
            hits.push((*tl, t.id, damage_against(state, shooter.kind, t.kind)));
        }
    }

    for (loc, id, damage) in hits {
        if let Some(unit) = state.map.units_at_mut(loc).and_then(|s| s.iter_mut().find(|u| u.id == id)) {
            unit.health -= damage;
        }
    }

    let dead: Vec<(Location, u64)> = state.map.iter()
        .filter(|(_, u)| u.health <= 0.0)
        .map(|(l, u)| (l, u.id))
        .collect();
    for (loc, id) in dead {
        state.map.remove_unit(loc, id);
    }
}

/// Close the turn: decay unspent mobile points, pay income, advance.
pub fn end_turn(state: &mut GameState) {
    let next = state.turn + 1;
    let income = mobile_income(&state.config, next);
    let r = state.config.resources.clone();
    for p in Player::BOTH {
        let stats = state.player_stats_mut(p);
        stats.mobile_points = stats.mobile_points * (1.0 - r.mobile_decay) + income;
        stats.structure_points += r.structure_income;
    }
    state.begin_turn(next);
}
