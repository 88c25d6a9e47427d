//! Snapshot serialization: the table's state as the views see it.
//!
//! A snapshot is a read-only projection: it never hides inputs the
//! ledger needs and never reveals what a round must keep hidden
//! (unrevealed miner cells, the rocket's explosion point).

use crate::{
    config::MinerTier,
    game_session::Phase,
    types::{Credits, GameId, Millis, SessionId},
    user::UserRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameView {
    SlotMachine {
        /// Symbol id per reel, `None` while hidden or spinning.
        reels: [Option<String>; 3],
        spinning: [bool; 3],
    },
    Miner {
        tier: MinerTier,
        multiplier: f64,
        cells: Vec<CellView>,
    },
    Rocket {
        multiplier: f64,
        exploded: bool,
        cashed_out: bool,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CellView {
    Hidden,
    Diamond,
    Bomb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game:  GameId,
    pub phase: Phase,
    pub stake: Credits,
    pub view:  GameView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub session_id:        SessionId,
    pub now:               Millis,
    pub user:              Option<UserRecord>,
    pub bonus_claimed:     bool,
    pub login_prompt_open: bool,
    pub game:              Option<GameSnapshot>,
    pub pending_timers:    usize,
}
