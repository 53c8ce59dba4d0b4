// ═══════════════════════════════════════════════════════════════════════
// Match Runner: plays a complete headless match between two agents
//
// Each turn both seats decide on the same pre-turn board (each through
// its own bottom-up view), then their submissions are applied to the
// absolute board, the action phase is simulated, and every breach is
// reported back to both seats in their own orientation.
// ═══════════════════════════════════════════════════════════════════════

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use td_agents::Agent;
use td_engine::battlefield::Battlefield;
use td_engine::config::GameConfig;
use td_engine::engine::{end_turn, run_action_phase};
use td_engine::error::EngineError;
use td_engine::setup::create_initial_state;
use td_engine::state::GameState;
use td_engine::types::*;
use td_engine::visibility::{apply_submission, frame_view, player_view};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("agent {agent} failed on turn {turn}: {source}")]
    Agent {
        agent: String,
        turn: u32,
        #[source]
        source: EngineError,
    },
    #[error("agent {agent} did not submit turn {turn}")]
    NoSubmission { agent: String, turn: u32 },
}

/// Result of a completed match. Seat 0 is `Player::Me` on the absolute
/// board, seat 1 is `Player::Opponent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub seed: u64,
    /// `None` on equal health.
    pub winner: Option<Player>,
    pub turns_played: u32,
    pub seats: [SeatResult; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatResult {
    pub agent_name: String,
    pub final_health: f64,
    /// Breaches this seat scored against the other.
    pub breaches: u32,
    /// Placements accepted over the whole match.
    pub placed: u32,
}

impl MatchResult {
    pub fn seat(&self, player: Player) -> &SeatResult {
        &self.seats[player.index()]
    }
}

/// Run one match. `seats[0]` plays `Player::Me`, `seats[1]` plays
/// `Player::Opponent`. Stops when a player's health runs out or after
/// `max_turns` turns.
pub fn run_match(
    mut seats: [&mut dyn Agent; 2],
    config: Arc<GameConfig>,
    seed: u64,
    max_turns: u32,
) -> Result<MatchResult, MatchError> {
    for agent in seats.iter_mut() {
        agent.on_game_start(&config);
    }

    let mut state = create_initial_state(config);
    let mut breaches = [0u32; 2];
    let mut placed = [0u32; 2];
    let mut turns_played = 0;

    while state.turn < max_turns {
        let turn = state.turn;

        // Both seats decide before anything is applied.
        let mut submissions = Vec::with_capacity(2);
        for player in Player::BOTH {
            let agent = &mut *seats[player.index()];
            let mut view = player_view(&state, player);
            agent.on_turn(&mut view).map_err(|source| MatchError::Agent {
                agent: agent.name().to_string(),
                turn,
                source,
            })?;
            let submission = view.take_submission().ok_or_else(|| MatchError::NoSubmission {
                agent: agent.name().to_string(),
                turn,
            })?;
            submissions.push(submission);
        }
        for (player, submission) in Player::BOTH.into_iter().zip(&submissions) {
            placed[player.index()] += apply_submission(&mut state, player, submission);
        }

        for frame in run_action_phase(&mut state) {
            for breach in &frame.breaches {
                breaches[breach.owner.index()] += 1;
            }
            for player in Player::BOTH {
                seats[player.index()].on_action_frame(&frame_view(&frame, player));
            }
        }
        turns_played += 1;
        debug!(turn, me = state.my_health(), opponent = state.enemy_health(), "turn resolved");

        if state.loser().is_some() {
            break;
        }
        end_turn(&mut state);
    }

    let result = build_result(&state, &seats, seed, turns_played, breaches, placed);
    info!(seed, turns = turns_played, winner = ?result.winner, "match finished");
    Ok(result)
}

fn build_result(
    state: &GameState,
    seats: &[&mut dyn Agent; 2],
    seed: u64,
    turns_played: u32,
    breaches: [u32; 2],
    placed: [u32; 2],
) -> MatchResult {
    let seat = |player: Player| SeatResult {
        agent_name: seats[player.index()].name().to_string(),
        final_health: state.player_stats(player).health,
        breaches: breaches[player.index()],
        placed: placed[player.index()],
    };
    let (me, opponent) = (state.my_health(), state.enemy_health());
    let winner = if me > opponent {
        Some(Player::Me)
    } else if opponent > me {
        Some(Player::Opponent)
    } else {
        None
    };
    MatchResult {
        seed,
        winner,
        turns_played,
        seats: [seat(Player::Me), seat(Player::Opponent)],
    }
}

/// Run one match per seed in parallel. `make_agents` builds a fresh pair
/// of agents for each seed.
pub fn run_matches<F>(
    seeds: &[u64],
    config: Arc<GameConfig>,
    max_turns: u32,
    make_agents: F,
) -> Vec<Result<MatchResult, MatchError>>
where
    F: Fn(u64) -> [Box<dyn Agent>; 2] + Sync,
{
    seeds.par_iter()
        .map(|&seed| {
            let [mut a, mut b] = make_agents(seed);
            run_match([a.as_mut(), b.as_mut()], config.clone(), seed, max_turns)
        })
        .collect()
}
