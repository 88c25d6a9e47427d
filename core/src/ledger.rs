//! Ledger operations over the session's user record.
//!
//! `Session` is the one owner of the live `UserRecord`. It is passed
//! explicitly to every controller that needs it; there is no global state.
//!
//! RULES:
//!   - With no user logged in, every ledger operation is a silent no-op.
//!   - Each ledger operation writes the record back exactly once, and
//!     the in-memory record only changes once that write succeeded.
//!   - The balance never goes below zero; an over-debit clamps to zero.

use crate::{
    config::WalletConfig,
    error::{CasinoError, CasinoResult},
    store::CasinoStore,
    types::{Credits, GameId},
    user::UserRecord,
};

pub struct Session {
    store:  CasinoStore,
    wallet: WalletConfig,
    user:   Option<UserRecord>,
}

impl Session {
    /// Load the persisted user (or the configured default) from `store`.
    pub fn open(store: CasinoStore, wallet: WalletConfig) -> CasinoResult<Self> {
        let default = wallet
            .seed_guest_record
            .then(|| UserRecord::guest(wallet.guest_balance));
        let user = store.load_user(default)?;
        log::debug!(
            "session opened: user={:?} balance={:?}",
            user.as_ref().map(|u| u.name().to_string()),
            user.as_ref().map(|u| u.credits_available())
        );
        Ok(Self { store, wallet, user })
    }

    pub fn store(&self) -> &CasinoStore {
        &self.store
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn balance(&self) -> Option<Credits> {
        self.user.as_ref().map(|u| u.credits_available())
    }

    // ── Ledger operations ──────────────────────────────────────

    pub fn credit(&mut self, amount: Credits) -> CasinoResult<()> {
        self.commit(|user| user.add_credits(amount))
    }

    pub fn debit(&mut self, amount: Credits) -> CasinoResult<()> {
        self.commit(|user| user.remove_credits(amount))
    }

    pub fn record_win(&mut self, game: GameId, amount: Credits) -> CasinoResult<()> {
        self.commit(|user| {
            let stats = user.stats_mut();
            stats.add_win(game, amount);
            stats.recompute_most_played();
        })
    }

    pub fn record_loss(&mut self, game: GameId, amount: Credits) -> CasinoResult<()> {
        self.commit(|user| {
            let stats = user.stats_mut();
            stats.add_loss(game, amount);
            stats.recompute_most_played();
        })
    }

    pub fn recompute_most_played_game(&mut self) -> CasinoResult<()> {
        self.commit(|user| user.stats_mut().recompute_most_played())
    }

    /// Debit a stake and record its provisional loss in one write.
    pub fn commit_stake(&mut self, game: GameId, stake: Credits) -> CasinoResult<()> {
        self.commit(|user| {
            user.remove_credits(stake);
            let stats = user.stats_mut();
            stats.add_loss(game, stake);
            stats.recompute_most_played();
        })
    }

    /// Credit a payout and record the win in one write.
    pub fn pay_out(&mut self, game: GameId, payout: Credits) -> CasinoResult<()> {
        self.commit(|user| {
            user.add_credits(payout);
            let stats = user.stats_mut();
            stats.add_win(game, payout);
            stats.recompute_most_played();
        })
    }

    // ── Identity ───────────────────────────────────────────────

    /// Replace the current record with a fresh one for `name`.
    /// Also closes the login prompt.
    pub fn login(&mut self, name: &str) -> CasinoResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CasinoError::invalid("name must not be empty"));
        }
        let user = UserRecord::new(name, self.wallet.default_profile_picture.clone());
        self.store.save_user(Some(&user))?;
        self.user = Some(user);
        self.store.set_login_prompt_open(false)?;
        log::info!("logged in as '{name}'");
        Ok(())
    }

    pub fn logout(&mut self) -> CasinoResult<()> {
        self.store.save_user(None)?;
        self.user = None;
        log::info!("logged out");
        Ok(())
    }

    pub fn login_prompt_open(&self) -> CasinoResult<bool> {
        self.store.login_prompt_open()
    }

    pub fn dismiss_login_prompt(&self) -> CasinoResult<()> {
        self.store.set_login_prompt_open(false)
    }

    // ── Welcome bonus ──────────────────────────────────────────

    pub fn bonus_claimed(&self) -> CasinoResult<bool> {
        self.store.claimed_bonus()
    }

    /// Pay the one-time welcome bonus. Returns the amount paid, or `None`
    /// when it was already claimed.
    pub fn claim_bonus(&mut self) -> CasinoResult<Option<Credits>> {
        if self.store.claimed_bonus()? {
            return Ok(None);
        }
        let amount = self.wallet.welcome_bonus;
        self.credit(amount)?;
        self.store.set_claimed_bonus(true)?;
        log::info!("welcome bonus of {amount:.2} claimed");
        Ok(Some(amount))
    }

    /// Apply `change` to a copy of the record and keep it only once the
    /// copy is stored. A failed write leaves the live record untouched.
    fn commit(&mut self, change: impl FnOnce(&mut UserRecord)) -> CasinoResult<()> {
        let Some(user) = self.user.as_ref() else { return Ok(()) };
        let mut next = user.clone();
        change(&mut next);
        self.store.save_user(Some(&next))?;
        self.user = Some(next);
        Ok(())
    }
}
