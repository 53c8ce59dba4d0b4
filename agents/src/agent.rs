// ═══════════════════════════════════════════════════════════════════════
// Agent Trait: interface that every player implementation provides
//
// KEY DESIGN PRINCIPLE:
//   Agents receive a `&mut dyn Battlefield`, never a raw `GameState`.
//   Everything they may read or spawn goes through that surface, and
//   every board they see is oriented so they own the bottom half.
//
//   The same agent runs against the live game (turn JSON parsed into
//   a `GameState`) and inside the local match runner (a perspective
//   view of the absolute board).
// ═══════════════════════════════════════════════════════════════════════

use td_engine::battlefield::Battlefield;
use td_engine::config::GameConfig;
use td_engine::error::Result;
use td_engine::protocol::ActionFrame;

pub trait Agent: Send {
    /// Human-readable name for this agent (e.g., "Strategy", "Random").
    fn name(&self) -> &str;

    /// Called once with the game's unit table before the first turn.
    fn on_game_start(&mut self, _config: &GameConfig) {}

    /// Decide and submit one turn. Implementations must call
    /// `submit_turn` exactly once.
    fn on_turn(&mut self, field: &mut dyn Battlefield) -> Result<()>;

    /// Called for every action frame that carried events.
    fn on_action_frame(&mut self, _frame: &ActionFrame) {}
}
