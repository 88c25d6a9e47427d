//! Typed accessors for the three persisted keys.

use super::CasinoStore;
use crate::{error::CasinoResult, user::UserRecord};

pub const CLAIMED_BONUS_KEY: &str = "claimedBonus";
/// Despite the name, this flag controls whether the login prompt is shown.
pub const LOGIN_PROMPT_KEY: &str = "loggedIn";
pub const USER_DATA_KEY: &str = "userData";

impl CasinoStore {
    pub fn claimed_bonus(&self) -> CasinoResult<bool> {
        self.get_value(CLAIMED_BONUS_KEY, false)
    }

    pub fn set_claimed_bonus(&self, claimed: bool) -> CasinoResult<()> {
        self.set_value(CLAIMED_BONUS_KEY, &claimed)
    }

    pub fn login_prompt_open(&self) -> CasinoResult<bool> {
        self.get_value(LOGIN_PROMPT_KEY, true)
    }

    pub fn set_login_prompt_open(&self, open: bool) -> CasinoResult<()> {
        self.set_value(LOGIN_PROMPT_KEY, &open)
    }

    /// Load the user record. An absent key yields `default`; an explicit
    /// `null` means the user logged out and stays `None`.
    pub fn load_user(&self, default: Option<UserRecord>) -> CasinoResult<Option<UserRecord>> {
        self.get_value(USER_DATA_KEY, default)
    }

    pub fn save_user(&self, user: Option<&UserRecord>) -> CasinoResult<()> {
        self.set_value(USER_DATA_KEY, &user)
    }
}
