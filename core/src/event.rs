//! The event journal: everything that happens at the table.
//!
//! RULE: Events describe what happened; they never drive the ledger.
//! The ledger is mutated by the session controllers, and the journal
//! records the outcome afterwards.

use crate::{
    config::MinerTier,
    deposit::PaymentMethod,
    types::{Credits, GameId, Millis, RoundId, SessionId},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during a session.
/// Variants are only ever appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CasinoEvent {
    // ── Session events ─────────────────────────────
    SessionOpened {
        seed: u64,
    },
    LoggedIn {
        name: String,
    },
    LoggedOut,
    LoginPromptDismissed,

    // ── Wallet events ──────────────────────────────
    BonusClaimed {
        amount: Credits,
    },
    Deposited {
        amount: Credits,
        method: PaymentMethod,
    },

    // ── Table events ───────────────────────────────
    GameEntered {
        game: GameId,
        stake: Credits,
    },
    GameLeft {
        game: GameId,
        forfeited: bool,
        cancelled_timers: usize,
    },
    StakeChanged {
        game: GameId,
        stake: Credits,
    },
    StakeRejected {
        game: GameId,
        stake: Credits,
        available: Credits,
    },
    TierChanged {
        tier: MinerTier,
    },

    // ── Round events ───────────────────────────────
    RoundCommitted {
        game: GameId,
        stake: Credits,
    },
    ReelRevealed {
        reel: usize,
        symbol: String,
    },
    CellRevealed {
        cell: usize,
        bomb: bool,
        multiplier: f64,
    },
    MultiplierTicked {
        multiplier: f64,
    },
    RocketExploded {
        multiplier: f64,
        explosion_point: f64,
    },
    CashedOut {
        game: GameId,
        multiplier: f64,
        /// Rocket only: the multiplier the rocket would have reached.
        explosion_point: Option<f64>,
    },
    RoundResolved {
        game: GameId,
        stake: Credits,
        payout: Credits,
    },
}

impl CasinoEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionOpened { .. }    => "session_opened",
            Self::LoggedIn { .. }         => "logged_in",
            Self::LoggedOut               => "logged_out",
            Self::LoginPromptDismissed    => "login_prompt_dismissed",
            Self::BonusClaimed { .. }     => "bonus_claimed",
            Self::Deposited { .. }        => "deposited",
            Self::GameEntered { .. }      => "game_entered",
            Self::GameLeft { .. }         => "game_left",
            Self::StakeChanged { .. }     => "stake_changed",
            Self::StakeRejected { .. }    => "stake_rejected",
            Self::TierChanged { .. }      => "tier_changed",
            Self::RoundCommitted { .. }   => "round_committed",
            Self::ReelRevealed { .. }     => "reel_revealed",
            Self::CellRevealed { .. }     => "cell_revealed",
            Self::MultiplierTicked { .. } => "multiplier_ticked",
            Self::RocketExploded { .. }   => "rocket_exploded",
            Self::CashedOut { .. }        => "cashed_out",
            Self::RoundResolved { .. }    => "round_resolved",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub session_id: SessionId,
    pub at: Millis,
    pub round_id: Option<RoundId>,
    pub source: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized CasinoEvent
}
