// ═══════════════════════════════════════════════════════════════════════
// Database: SQLite storage for match results and ELO ratings
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::MatchResult;
use rusqlite::{params, Connection, OptionalExtension};
use td_engine::types::Player;
use thiserror::Error;

pub const STARTING_ELO: f64 = 1500.0;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("result encoding: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown agent id {0}")]
    UnknownAgent(i64),
    #[error("unknown match id {0}")]
    UnknownMatch(i64),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub name: String,
    pub elo: f64,
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn open(path: &str) -> Result<Self> {
        let db = Database { conn: Connection::open(path)? };
        db.create_schema()?;
        Ok(db)
    }

    /// In-memory database (useful for tests).
    pub fn in_memory() -> Result<Self> {
        let db = Database { conn: Connection::open_in_memory()? };
        db.create_schema()?;
        Ok(db)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch("
            CREATE TABLE IF NOT EXISTS agents (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                elo         REAL NOT NULL DEFAULT 1500.0,
                matches     INTEGER NOT NULL DEFAULT 0,
                wins        INTEGER NOT NULL DEFAULT 0,
                draws       INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS matches (
                id          INTEGER PRIMARY KEY,
                seed        INTEGER NOT NULL,
                turns       INTEGER NOT NULL,
                winner_seat INTEGER,
                summary     TEXT NOT NULL,
                played_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS match_players (
                id           INTEGER PRIMARY KEY,
                match_id     INTEGER NOT NULL REFERENCES matches(id),
                agent_id     INTEGER NOT NULL REFERENCES agents(id),
                seat         INTEGER NOT NULL,
                final_health REAL NOT NULL,
                breaches     INTEGER NOT NULL,
                placed       INTEGER NOT NULL
            );
        ")?;
        Ok(())
    }

    /// Register an agent (or return existing ID).
    pub fn register_agent(&self, name: &str) -> Result<i64> {
        self.conn.execute("INSERT OR IGNORE INTO agents (name) VALUES (?1)", params![name])?;
        let id = self.conn.query_row("SELECT id FROM agents WHERE name = ?1", params![name], |row| row.get(0))?;
        Ok(id)
    }

    fn elo(&self, agent_id: i64) -> Result<f64> {
        self.conn
            .query_row("SELECT elo FROM agents WHERE id = ?1", params![agent_id], |row| row.get(0))
            .optional()?
            .ok_or(DatabaseError::UnknownAgent(agent_id))
    }

    /// Store a finished match. `agent_ids` are indexed by seat.
    pub fn store_match(&self, result: &MatchResult, agent_ids: [i64; 2]) -> Result<i64> {
        let winner_seat = result.winner.map(|p| p.index() as i64);
        let summary = serde_json::to_string(result)?;
        self.conn.execute(
            "INSERT INTO matches (seed, turns, winner_seat, summary) VALUES (?1, ?2, ?3, ?4)",
            params![result.seed as i64, result.turns_played, winner_seat, summary],
        )?;
        let match_id = self.conn.last_insert_rowid();

        for player in Player::BOTH {
            let seat = result.seat(player);
            let agent_id = agent_ids[player.index()];
            self.conn.execute(
                "INSERT INTO match_players (match_id, agent_id, seat, final_health, breaches, placed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![match_id, agent_id, player.index() as i64, seat.final_health, seat.breaches, seat.placed],
            )?;

            let (win, draw) = match result.winner {
                Some(w) => (i64::from(w == player), 0),
                None => (0, 1),
            };
            self.conn.execute(
                "UPDATE agents SET matches = matches + 1, wins = wins + ?1, draws = draws + ?2 WHERE id = ?3",
                params![win, draw, agent_id],
            )?;
        }
        Ok(match_id)
    }

    /// Load the full result stored for a match.
    pub fn match_result(&self, match_id: i64) -> Result<MatchResult> {
        let summary: String = self.conn
            .query_row("SELECT summary FROM matches WHERE id = ?1", params![match_id], |row| row.get(0))
            .optional()?
            .ok_or(DatabaseError::UnknownMatch(match_id))?;
        Ok(serde_json::from_str(&summary)?)
    }

    /// Two-player ELO update. `score` is agent `a`'s result: 1 win,
    /// 0.5 draw, 0 loss.
    pub fn update_elo(&self, a: i64, b: i64, score: f64, k: f64) -> Result<()> {
        let (elo_a, elo_b) = (self.elo(a)?, self.elo(b)?);
        let expected_a = 1.0 / (1.0 + 10f64.powf((elo_b - elo_a) / 400.0));
        let delta = k * (score - expected_a);

        self.conn.execute("UPDATE agents SET elo = elo + ?1 WHERE id = ?2", params![delta, a])?;
        self.conn.execute("UPDATE agents SET elo = elo - ?1 WHERE id = ?2", params![delta, b])?;
        Ok(())
    }

    /// Store a match and apply its rating change in one go.
    pub fn record(&self, result: &MatchResult, agent_ids: [i64; 2], k: f64) -> Result<i64> {
        let match_id = self.store_match(result, agent_ids)?;
        if agent_ids[0] != agent_ids[1] {
            let score = match result.winner {
                Some(Player::Me) => 1.0,
                Some(Player::Opponent) => 0.0,
                None => 0.5,
            };
            self.update_elo(agent_ids[0], agent_ids[1], score, k)?;
        }
        Ok(match_id)
    }

    /// Get ELO leaderboard.
    pub fn leaderboard(&self) -> Result<Vec<Standing>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, elo, matches, wins, draws FROM agents ORDER BY elo DESC, name ASC"
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Standing {
                name: row.get(0)?,
                elo: row.get(1)?,
                matches: row.get(2)?,
                wins: row.get(3)?,
                draws: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Get total number of matches stored.
    pub fn match_count(&self) -> Result<u32> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))?)
    }
}
