// ═══════════════════════════════════════════════════════════════════════
// Attack trigger: when to send mobile units, and from where.
//
// The phase is a pure function of the turn number:
//   turn 0       idle
//   turns 1–2    opportunistic scan: any completely undefended lane on
//                either half gets every mobile unit we can afford
//   turn 3+      threshold-gated: once mobile points reach a slowly
//                rising bar, raise the diagonal walls, re-derive the
//                launch points, and send everything down the safest lane
// ═══════════════════════════════════════════════════════════════════════

use crate::layout::LayoutPreset;
use crate::risk::{self, PathRisk};
use crate::walls;
use serde::{Deserialize, Serialize};
use td_engine::battlefield::Battlefield;
use td_engine::types::*;
use tracing::{debug, info, warn};

/// Spawn count meaning "as many as we can afford".
pub const ALL_IN: u32 = 10_000;

// ── Threshold state ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdConfig {
    /// Mobile points needed for the first general attack.
    pub base: f64,
    /// Added to the bar at each step.
    pub increment: f64,
    /// Turns until the first step.
    pub first_interval: u32,
    /// Added to the interval after each step.
    pub interval_growth: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        ThresholdConfig { base: 10.0, increment: 3.0, first_interval: 20, interval_growth: 10 }
    }
}

/// The rising minimum-attack bar. Updated once per turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackThreshold {
    config: ThresholdConfig,
    min_attack: f64,
    interval: u32,
    last_turn: Option<u32>,
}

impl AttackThreshold {
    pub fn new(config: ThresholdConfig) -> Self {
        AttackThreshold {
            config,
            min_attack: config.base,
            interval: config.first_interval,
            last_turn: None,
        }
    }

    pub fn min_attack(&self) -> f64 {
        self.min_attack
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Step the bar when `turn` is a non-zero multiple of the current
    /// interval. Repeated calls for the same turn do nothing.
    pub fn update(&mut self, turn: u32) {
        if self.last_turn == Some(turn) {
            return;
        }
        self.last_turn = Some(turn);
        if turn != 0 && self.interval != 0 && turn % self.interval == 0 {
            self.min_attack += self.config.increment;
            self.interval += self.config.interval_growth;
            info!(turn, min_attack = self.min_attack, next_interval = self.interval, "attack bar raised");
        }
    }
}

impl Default for AttackThreshold {
    fn default() -> Self {
        AttackThreshold::new(ThresholdConfig::default())
    }
}

// ── Controller ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    Idle,
    OpportunisticScan,
    ThresholdGated,
}

impl AttackPhase {
    pub fn for_turn(turn: u32) -> Self {
        match turn {
            0 => AttackPhase::Idle,
            1..=2 => AttackPhase::OpportunisticScan,
            _ => AttackPhase::ThresholdGated,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttackDecision {
    Hold,
    /// An undefended lane was found during the opening scan.
    FirstStrike { location: Location, spawned: u32 },
    /// A threshold-gated attack; `release` is the candidate list the
    /// launch point was chosen from, in priority order.
    General { location: Location, spawned: u32, release: Vec<Location> },
}

#[derive(Debug, Clone, Default)]
pub struct AttackController {
    threshold: AttackThreshold,
}

impl AttackController {
    pub fn new(config: ThresholdConfig) -> Self {
        AttackController { threshold: AttackThreshold::new(config) }
    }

    pub fn threshold(&self) -> &AttackThreshold {
        &self.threshold
    }

    pub fn decide(&mut self, field: &mut dyn Battlefield, layout: &LayoutPreset) -> AttackDecision {
        let turn = field.turn_number();
        self.threshold.update(turn);

        let decision = match AttackPhase::for_turn(turn) {
            AttackPhase::Idle => AttackDecision::Hold,
            AttackPhase::OpportunisticScan => first_strike(field, layout.attack_unit),
            AttackPhase::ThresholdGated => {
                let points = field.resource(ResourceKind::Mobile);
                if points >= self.threshold.min_attack() {
                    general_attack(field, layout)
                } else {
                    debug!(turn, points, bar = self.threshold.min_attack(), "saving mobile points");
                    AttackDecision::Hold
                }
            }
        };
        info!(turn, ?decision, "attack decision");
        decision
    }
}

/// Scan one half's edge. `Ok` carries the first zero-risk launch point,
/// if any; `Err` carries the first edge cell with no path.
fn scan_half(field: &dyn Battlefield, edge: Edge) -> Result<Option<Location>, Location> {
    let mut best: Option<(Location, f64)> = None;
    for loc in field.edge_locations(edge) {
        match risk::evaluate(field, loc) {
            PathRisk::Unreachable => return Err(loc),
            PathRisk::Reachable { risk, .. } => {
                if best.map_or(true, |(_, r)| risk < r) {
                    best = Some((loc, risk));
                }
            }
        }
    }
    Ok(best.filter(|&(_, r)| r == 0.0).map(|(loc, _)| loc))
}

/// Opening scan over both halves, left first. An edge cell with no path
/// ends the scan for this turn.
pub fn first_strike(field: &mut dyn Battlefield, unit: UnitKind) -> AttackDecision {
    for edge in [Edge::BottomLeft, Edge::BottomRight] {
        match scan_half(field, edge) {
            Ok(Some(location)) => {
                let spawned = field.attempt_spawn(unit, &[location], ALL_IN);
                info!(%location, spawned, "undefended lane, striking");
                return AttackDecision::FirstStrike { location, spawned };
            }
            Ok(None) => {}
            Err(cell) => {
                warn!(?edge, %cell, "no path from edge cell, opening scan abandoned");
                return AttackDecision::Hold;
            }
        }
    }
    AttackDecision::Hold
}

/// Launch points for a general attack. A blocked-corner candidate whose
/// first step leads downward goes to the front of the list.
pub fn release_locations(field: &dyn Battlefield, layout: &LayoutPreset) -> Vec<Location> {
    let mut release = layout.release_locations.clone();
    for &candidate in &layout.blocked_corner_candidates {
        let Some(path) = field.find_path_to_edge(candidate) else { continue };
        if path.len() > 2 && path[0].y > path[1].y {
            debug!(%candidate, "corner blocked, lane opened");
            release.insert(0, candidate);
        }
    }
    release
}

pub fn general_attack(field: &mut dyn Battlefield, layout: &LayoutPreset) -> AttackDecision {
    walls::build(field, layout);
    let release = release_locations(field, layout);
    let Some(location) = risk::select(field, &release) else {
        return AttackDecision::Hold;
    };
    let spawned = field.attempt_spawn(layout.attack_unit, &[location], ALL_IN);
    AttackDecision::General { location, spawned, release }
}
