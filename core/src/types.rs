//! Shared primitive types used across the entire platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the virtual session clock, in milliseconds.
pub type Millis = u64;

/// A currency amount. Two-decimal precision is enforced at input
/// boundaries, never internally.
pub type Credits = f64;

/// Identifies one play session (one engine lifetime).
pub type SessionId = String;

/// Identifies one committed round of a game.
pub type RoundId = String;

/// The closed set of games the ledger keeps statistics for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GameId {
    SlotMachine,
    ThreeCardMonte,
    RocketGame,
    MinerGame,
}

impl GameId {
    /// Stable RNG stream slot. NEVER reorder, only append.
    pub fn stream_index(&self) -> u64 {
        match self {
            Self::SlotMachine    => 0,
            Self::MinerGame      => 1,
            Self::RocketGame     => 2,
            Self::ThreeCardMonte => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SlotMachine    => "SlotMachine",
            Self::ThreeCardMonte => "ThreeCardMonte",
            Self::RocketGame     => "RocketGame",
            Self::MinerGame      => "MinerGame",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round a currency amount to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
