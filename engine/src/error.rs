//! Errors surfaced by the battlefield service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid game config: {0}")]
    Config(String),

    #[error("unknown unit shorthand '{0}'")]
    UnknownShorthand(String),

    #[error("malformed turn data: {0}")]
    Protocol(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("turn {0} was already submitted")]
    AlreadySubmitted(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
