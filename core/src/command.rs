use crate::{
    config::MinerTier,
    deposit::PaymentMethod,
    game_session::StakeStep,
    types::{GameId, Millis},
};
use serde::{Deserialize, Serialize};

/// Everything a view can ask the engine to do.
/// Variants are only ever appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Identity ──────────────────────────────────
    Login { name: String },
    Logout,
    DismissLoginPrompt,

    // ── Wallet ────────────────────────────────────
    ClaimBonus,
    /// `amount` is the raw text typed into the form.
    Deposit { amount: String, method: Option<PaymentMethod> },

    // ── Game views ────────────────────────────────
    EnterGame { game: GameId },
    LeaveGame,
    SetStake { amount: f64 },
    StepStake { direction: StakeStep },
    SetTier { tier: MinerTier },

    // ── Rounds ────────────────────────────────────
    Confirm,
    Reveal { cell: usize },
    CashOut,

    // ── Clock ─────────────────────────────────────
    Advance { ms: Millis },
}
