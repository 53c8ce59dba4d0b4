// ═══════════════════════════════════════════════════════════════════════
// Strategy Agent: the rule-based player.
//
// One pass per turn, in a fixed priority order (spawns are paid for as
// they happen, so earlier steps win when points run short):
//   1. defense tiers
//   2. reactive reinforcement of breached cells (opt-in)
//   3. attack decision
//   4. submit
//
// State kept across turns: the breach history and the attack bar.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use crate::attack::{AttackController, AttackDecision, ThresholdConfig};
use crate::breach::BreachTracker;
use crate::defense::{self, DefenseReport};
use crate::layout::LayoutPreset;
use serde::{Deserialize, Serialize};
use td_engine::battlefield::Battlefield;
use td_engine::config::GameConfig;
use td_engine::error::Result;
use td_engine::protocol::ActionFrame;
use td_engine::types::UnitKind;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategyConfig {
    pub layout: LayoutPreset,
    pub threshold: ThresholdConfig,
    /// Reinforce cells we were scored on. Off unless asked for.
    pub reactive_defense: bool,
}

impl StrategyConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: StrategyConfig = serde_json::from_str(text)?;
        config.layout.validate()?;
        Ok(config)
    }
}

/// What happened on the last turn played.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub turn: u32,
    pub defense: DefenseReport,
    pub reactive: u32,
    pub attack: AttackDecision,
}

pub struct StrategyAgent {
    config: StrategyConfig,
    attack: AttackController,
    breaches: BreachTracker,
    last_turn: Option<TurnReport>,
}

impl StrategyAgent {
    pub fn new(config: StrategyConfig) -> Self {
        StrategyAgent {
            attack: AttackController::new(config.threshold),
            breaches: BreachTracker::new(),
            last_turn: None,
            config,
        }
    }

    pub fn breaches(&self) -> &BreachTracker {
        &self.breaches
    }

    pub fn last_turn(&self) -> Option<&TurnReport> {
        self.last_turn.as_ref()
    }
}

impl Default for StrategyAgent {
    fn default() -> Self {
        StrategyAgent::new(StrategyConfig::default())
    }
}

impl Agent for StrategyAgent {
    fn name(&self) -> &str { "Strategy" }

    fn on_game_start(&mut self, config: &GameConfig) {
        info!(
            units = ?UnitKind::ALL.map(|k| config.catalog.shorthand(k)),
            reactive = self.config.reactive_defense,
            "strategy configured"
        );
    }

    fn on_turn(&mut self, field: &mut dyn Battlefield) -> Result<()> {
        let turn = field.turn_number();
        let layout = &self.config.layout;

        let defense = defense::apply(field, layout);
        let reactive = if self.config.reactive_defense {
            self.breaches.build_reactive_defense(field, layout.reactive_unit)
        } else {
            0
        };
        let attack = self.attack.decide(field, layout);
        field.submit_turn()?;

        info!(turn, health = field.my_health(), enemy = field.enemy_health(), "turn submitted");
        self.last_turn = Some(TurnReport { turn, defense, reactive, attack });
        Ok(())
    }

    fn on_action_frame(&mut self, frame: &ActionFrame) {
        self.breaches.on_frame(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use td_engine::error::EngineError;
    use td_engine::protocol::BreachEvent;
    use td_engine::setup::create_initial_state;
    use td_engine::state::GameState;
    use td_engine::types::{Location, Player, PlayerStats};

    fn board(turn: u32, structure_points: f64, mobile_points: f64) -> GameState {
        let stats = PlayerStats { health: 30.0, structure_points, mobile_points };
        GameState::new(Arc::new(GameConfig::standard()), turn, [stats, stats])
    }

    fn opponent_breach(x: i32, y: i32) -> ActionFrame {
        ActionFrame {
            turn: 2,
            frame: 40,
            breaches: vec![BreachEvent {
                location: Location::new(x, y),
                damage: 1.0,
                kind: Some(UnitKind::Scout),
                unit_id: "12".to_string(),
                owner: Player::Opponent,
            }],
        }
    }

    #[test]
    fn opening_turn_builds_corners_and_submits() {
        let mut state = create_initial_state(Arc::new(GameConfig::standard()));
        let mut agent = StrategyAgent::default();
        agent.on_turn(&mut state).unwrap();

        let submission = state.submission().unwrap();
        assert_eq!(submission.build.len(), 12);
        assert!(submission.deploy.is_empty());
        let report = agent.last_turn().unwrap();
        assert_eq!(report.attack, AttackDecision::Hold);
        assert_eq!(report.defense.rows_full, None);
    }

    #[test]
    fn defense_is_paid_before_attack() {
        let mut state = board(3, 40.0, 12.0);
        let mut agent = StrategyAgent::default();
        agent.on_turn(&mut state).unwrap();

        let report = agent.last_turn().unwrap();
        assert!(report.defense.placed > 12);
        assert!(matches!(report.attack, AttackDecision::General { spawned: 12, .. }));
        let submission = state.submission().unwrap();
        assert_eq!(submission.deploy.len(), 12);
        assert!(submission.build.iter().all(|d| d.kind.is_stationary()));
    }

    #[test]
    fn second_submit_in_one_turn_is_an_error() {
        let mut state = board(1, 40.0, 0.0);
        let mut agent = StrategyAgent::default();
        agent.on_turn(&mut state).unwrap();
        assert!(matches!(agent.on_turn(&mut state), Err(EngineError::AlreadySubmitted(1))));
    }

    #[test]
    fn breach_feed_grows_history() {
        let mut agent = StrategyAgent::default();
        agent.on_action_frame(&opponent_breach(5, 13));
        assert_eq!(agent.breaches().scored_on(), &[Location::new(5, 13)]);
    }

    #[test]
    fn reactive_defense_only_when_enabled() {
        let frame = opponent_breach(4, 9);

        let mut passive = StrategyAgent::default();
        passive.on_action_frame(&frame);
        let mut state = board(0, 40.0, 0.0);
        passive.on_turn(&mut state).unwrap();
        assert!(!state.contains_stationary_unit(Location::new(4, 10)));

        let config = StrategyConfig { reactive_defense: true, ..Default::default() };
        let mut reactive = StrategyAgent::new(config);
        reactive.on_action_frame(&frame);
        let mut state = board(0, 40.0, 0.0);
        reactive.on_turn(&mut state).unwrap();
        assert_eq!(reactive.last_turn().unwrap().reactive, 1);
        assert_eq!(state.map.stationary_at(Location::new(4, 10)).unwrap().kind, UnitKind::Turret);
    }

    #[test]
    fn config_loads_from_partial_json() {
        let config = StrategyConfig::from_json(r#"{"reactiveDefense": true, "threshold": {"base": 14}}"#).unwrap();
        assert!(config.reactive_defense);
        assert_eq!(config.threshold.base, 14.0);
        assert_eq!(config.threshold.increment, 3.0);
        assert_eq!(config.layout, LayoutPreset::standard());
    }
}
