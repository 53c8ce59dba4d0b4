pub mod database;
pub mod runner;

pub use database::Database;
pub use runner::{run_match, run_matches, MatchError, MatchResult};
