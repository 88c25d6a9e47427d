use crate::types::GameId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CasinoError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("insufficient balance: stake {stake:.2}, available {available:.2}")]
    InsufficientBalance { stake: f64, available: f64 },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("You need to be logged in to play")]
    NotLoggedIn,

    #[error("No game view is open")]
    NoActiveGame,

    #[error("Game '{game}' has no playable table")]
    GameUnavailable { game: GameId },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CasinoError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }
}

pub type CasinoResult<T> = Result<T, CasinoError>;
