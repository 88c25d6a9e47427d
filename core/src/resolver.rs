//! Outcome resolver trait.
//!
//! RULE: Every game implements OutcomeResolver.
//! A resolver owns the game-specific part of a round (reels, grid,
//! multiplier) and nothing else. It never touches the ledger: the
//! generic `GameSession` debits, credits and records stats around it.

use crate::{
    event::CasinoEvent,
    rng::GameRng,
    snapshot::GameView,
    types::{Credits, GameId, Millis},
};
use serde::{Deserialize, Serialize};

/// Timer payloads a resolver can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wakeup {
    RevealReel(usize),
    SettleReels,
    RocketTick,
}

/// A timer request, relative to the moment it is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub delay:  Millis,
    pub wakeup: Wakeup,
}

/// Player actions during a committed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Reveal(usize),
    CashOut,
}

/// What a resolver did with an input.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// The input does not apply to the round's current state.
    Ignored,
    /// The round continues; `schedule` lists new timers.
    Continue {
        events:   Vec<CasinoEvent>,
        schedule: Vec<Scheduled>,
    },
    /// The round is over; `resolve` may now be called.
    Settled {
        events: Vec<CasinoEvent>,
    },
}

pub trait OutcomeResolver {
    fn game(&self) -> GameId;

    /// Begin a round for an already-debited stake.
    fn start(&mut self, stake: Credits, rng: &mut GameRng) -> Progress;

    fn on_wakeup(&mut self, wakeup: Wakeup) -> Progress;

    fn on_action(&mut self, action: Action) -> Progress;

    /// Payout for the settled round. Zero means the round was lost.
    fn resolve(&mut self, stake: Credits) -> Credits;

    /// Presentation state for the game view.
    fn view(&self) -> GameView;
}
