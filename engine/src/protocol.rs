// ═══════════════════════════════════════════════════════════════════════
// Wire protocol: the JSON lines exchanged with the live game.
//
// Inbound, one JSON object per line:
//   • game config (first line), see `config.rs`
//   • turn state:    {"turnInfo": [phase, turn, frame],
//                     "p1Stats": [health, structure, mobile, ms],
//                     "p2Stats": [...],
//                     "p1Units": [[[x, y, health, id], ...] per kind], ...}
//   • action frames: same envelope plus "events": {"breach": [...]}
//
// Outbound, after each deploy phase: two lines, the build stack and the
// deploy stack, each a list of [shorthand, x, y].
// ═══════════════════════════════════════════════════════════════════════

use crate::config::{GameConfig, UnitCatalog};
use crate::error::{EngineError, Result};
use crate::state::{GameState, TurnSubmission};
use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Which part of the game a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Our move: place structures and deploy units.
    Deploy,
    /// One frame of the simulated action phase.
    Action,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnInfo {
    pub phase: TurnPhase,
    pub turn: u32,
    pub frame: i64,
}

/// A mobile unit reached an edge. `owner` is the breaching unit's owner,
/// so `Player::Opponent` means we were scored on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreachEvent {
    pub location: Location,
    pub damage: f64,
    pub kind: Option<UnitKind>,
    pub unit_id: String,
    pub owner: Player,
}

impl BreachEvent {
    pub fn by_opponent(&self) -> bool {
        self.owner == Player::Opponent
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionFrame {
    pub turn: u32,
    pub frame: i64,
    pub breaches: Vec<BreachEvent>,
}

// ── Inbound ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    turn_info: Vec<i64>,
    #[serde(default)]
    p1_stats: Vec<f64>,
    #[serde(default)]
    p2_stats: Vec<f64>,
    #[serde(default)]
    p1_units: Vec<Vec<Vec<Value>>>,
    #[serde(default)]
    p2_units: Vec<Vec<Vec<Value>>>,
    #[serde(default)]
    events: Events,
}

#[derive(Deserialize, Default)]
struct Events {
    #[serde(default)]
    breach: Vec<Vec<Value>>,
}

fn turn_info(envelope: &Envelope) -> Result<TurnInfo> {
    let field = |i: usize| {
        envelope.turn_info.get(i).copied()
            .ok_or_else(|| EngineError::Protocol(format!("turnInfo is missing entry {}", i)))
    };
    let phase = match field(0)? {
        0 => TurnPhase::Deploy,
        1 => TurnPhase::Action,
        2 => TurnPhase::GameOver,
        other => return Err(EngineError::Protocol(format!("unknown phase {}", other))),
    };
    let turn = u32::try_from(field(1)?)
        .map_err(|_| EngineError::Protocol("negative turn number".to_string()))?;
    Ok(TurnInfo { phase, turn, frame: field(2)? })
}

/// Peek at the phase of any inbound line.
pub fn parse_turn_info(text: &str) -> Result<TurnInfo> {
    let envelope: Envelope = serde_json::from_str(text)?;
    turn_info(&envelope)
}

fn parse_stats(raw: &[f64], who: &str) -> Result<PlayerStats> {
    match raw {
        [health, structure, mobile, ..] => Ok(PlayerStats {
            health: *health,
            structure_points: *structure,
            mobile_points: *mobile,
        }),
        _ => Err(EngineError::Protocol(format!("{} stats need at least 3 entries", who))),
    }
}

fn number(value: &Value, what: &str) -> Result<f64> {
    value.as_f64()
        .ok_or_else(|| EngineError::Protocol(format!("{} is not a number: {}", what, value)))
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn load_units(state: &mut GameState, owner: Player, groups: &[Vec<Vec<Value>>]) -> Result<()> {
    // Trailing groups (removals, upgrades) are not units on the board.
    for (index, group) in groups.iter().enumerate().take(UnitKind::ALL.len()) {
        let Some(kind) = UnitKind::from_index(index) else { continue };
        for entry in group {
            let [x, y, health, ..] = entry.as_slice() else {
                return Err(EngineError::Protocol(format!("unit entry too short: {:?}", entry)));
            };
            let loc = Location::new(number(x, "x")? as i32, number(y, "y")? as i32);
            let id = state.next_id();
            let unit = Unit { kind, owner, health: number(health, "health")?, id };
            state.place_unit_with(unit, loc);
        }
    }
    Ok(())
}

/// Build the board for a deploy-phase message.
pub fn parse_turn_state(config: Arc<GameConfig>, text: &str) -> Result<GameState> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let info = turn_info(&envelope)?;
    let stats = [
        parse_stats(&envelope.p1_stats, "p1")?,
        parse_stats(&envelope.p2_stats, "p2")?,
    ];
    let mut state = GameState::new(config, info.turn, stats);
    load_units(&mut state, Player::Me, &envelope.p1_units)?;
    load_units(&mut state, Player::Opponent, &envelope.p2_units)?;
    Ok(state)
}

/// Extract breach records from an action-frame message. Each record is
/// `[[x, y], damage, unit_type, unit_id, player]` with player 1 = us.
pub fn parse_action_frame(text: &str) -> Result<ActionFrame> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let info = turn_info(&envelope)?;
    let breaches = envelope.events.breach.iter()
        .map(|record| parse_breach(record))
        .collect::<Result<Vec<_>>>()?;
    Ok(ActionFrame { turn: info.turn, frame: info.frame, breaches })
}

fn parse_breach(record: &[Value]) -> Result<BreachEvent> {
    let [location, damage, kind, unit_id, player, ..] = record else {
        return Err(EngineError::Protocol(format!("breach record too short: {:?}", record)));
    };
    let location: Location = serde_json::from_value(location.clone())?;
    let kind = kind.as_u64().and_then(|i| UnitKind::from_index(i as usize));
    let player = player.as_u64()
        .and_then(|p| Player::from_wire_index(p as u8))
        .ok_or_else(|| EngineError::Protocol(format!("bad breach player: {}", player)))?;
    Ok(BreachEvent {
        location,
        damage: number(damage, "breach damage")?,
        kind,
        unit_id: id_string(unit_id),
        owner: player,
    })
}

// ── Outbound ───────────────────────────────────────────────────────────

/// The build line and the deploy line for a sealed turn.
pub fn encode_submission(catalog: &UnitCatalog, submission: &TurnSubmission) -> Result<(String, String)> {
    let encode = |entries: &[crate::state::Deployment]| -> Result<String> {
        let rows: Vec<(&str, i32, i32)> = entries.iter()
            .map(|d| (catalog.shorthand(d.kind), d.location.x, d.location.y))
            .collect();
        Ok(serde_json::to_string(&rows)?)
    };
    Ok((encode(&submission.build)?, encode(&submission.deploy)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::Battlefield;
    use crate::state::Deployment;

    const TURN: &str = r#"{
        "p2Units": [[], [], [[13, 20, 75.0, "9"]], [], [], [], [], []],
        "turnInfo": [0, 3, -1],
        "p1Stats": [28.0, 17.5, 9.0, 1200],
        "p1Units": [[[1, 13, 60.0, "1"], [26, 13, 41.0, "2"]], [], [[1, 12, 75.0, "3"]], [], [], [], [], []],
        "p2Stats": [30.0, 12.0, 4.0, 900],
        "events": {"breach": []}
    }"#;

    const FRAME: &str = r#"{
        "turnInfo": [1, 4, 37],
        "events": {"breach": [[[5, 13], 1.0, 3, "41", 2], [[22, 14], 1.0, 3, "42", 1]]}
    }"#;

    #[test]
    fn turn_state_builds_board_and_stats() {
        let state = parse_turn_state(Arc::new(GameConfig::standard()), TURN).unwrap();
        assert_eq!(state.turn_number(), 3);
        assert_eq!(state.my_health(), 28.0);
        assert_eq!(state.resource(ResourceKind::Mobile), 9.0);
        assert_eq!(state.resource(ResourceKind::Structure), 17.5);
        assert!(state.contains_stationary_unit(Location::new(1, 13)));
        assert_eq!(state.map.stationary_at(Location::new(26, 13)).unwrap().health, 41.0);
        let enemy = state.map.stationary_at(Location::new(13, 20)).unwrap();
        assert_eq!(enemy.kind, UnitKind::Turret);
        assert_eq!(enemy.owner, Player::Opponent);
    }

    #[test]
    fn action_frame_extracts_breaches_with_owner() {
        let frame = parse_action_frame(FRAME).unwrap();
        assert_eq!(frame.turn, 4);
        assert_eq!(frame.breaches.len(), 2);
        assert!(frame.breaches[0].by_opponent());
        assert_eq!(frame.breaches[0].location, Location::new(5, 13));
        assert_eq!(frame.breaches[0].kind, Some(UnitKind::Scout));
        assert!(!frame.breaches[1].by_opponent());
    }

    #[test]
    fn phase_is_read_from_turn_info() {
        assert_eq!(parse_turn_info(TURN).unwrap().phase, TurnPhase::Deploy);
        assert_eq!(parse_turn_info(FRAME).unwrap().phase, TurnPhase::Action);
        assert!(parse_turn_info(r#"{"turnInfo": [7, 0, 0]}"#).is_err());
        assert!(parse_turn_info("not json").is_err());
    }

    #[test]
    fn submission_encodes_shorthand_rows() {
        let catalog = GameConfig::standard().catalog;
        let submission = TurnSubmission {
            turn: 1,
            build: vec![Deployment { kind: UnitKind::Wall, location: Location::new(1, 13) }],
            deploy: vec![Deployment { kind: UnitKind::Scout, location: Location::new(12, 1) }],
        };
        let (build, deploy) = encode_submission(&catalog, &submission).unwrap();
        assert_eq!(build, r#"[["FF",1,13]]"#);
        assert_eq!(deploy, r#"[["PI",12,1]]"#);
    }
}
