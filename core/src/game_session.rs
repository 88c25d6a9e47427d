//! Generic round lifecycle shared by every game.
//!
//! Phases: Idle → Committed → Resolved → Idle.
//!
//!   Idle       stake is editable; confirm validates and commits it.
//!   Committed  the stake is debited and a provisional loss recorded;
//!              the resolver drives the round.
//!   Resolved   a non-zero payout is credited and recorded as a win;
//!              the session drops straight back to Idle.
//!
//! The provisional loss is never reversed: a won round shows up as one
//! loss and one win in the statistics.

use crate::{
    config::StakeConfig,
    error::{CasinoError, CasinoResult},
    event::CasinoEvent,
    ledger::Session,
    resolver::{Action, OutcomeResolver, Progress, Scheduled, Wakeup},
    rng::GameRng,
    snapshot::GameSnapshot,
    types::{round2, Credits, GameId, RoundId},
};
use serde::{Deserialize, Serialize};
use std::any::Any;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Committed,
    Resolved,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StakeStep {
    Up,
    Down,
}

/// Stake bounds for one game view.
#[derive(Debug, Clone)]
pub struct StakeLimits {
    pub min:      Credits,
    pub step:     Credits,
    pub cap:      Option<Credits>,
    /// Opening stake when the balance is 100 or less.
    pub fallback: Credits,
}

impl StakeLimits {
    pub fn new(config: &StakeConfig, fallback: Credits) -> Self {
        Self { min: config.min, step: config.step, cap: config.cap, fallback }
    }

    /// Clamp raw input into [min, min(cap, balance)], rounded to cents.
    /// Non-numeric input counts as the minimum.
    pub fn clamp(&self, raw: f64, balance: Credits) -> Credits {
        let raw = if raw.is_finite() { raw } else { self.min };
        let upper = self.cap.map_or(balance, |cap| cap.min(balance));
        round2(raw.max(self.min).min(upper))
    }

    /// Ten percent of the balance above 100, the fallback otherwise.
    pub fn opening(&self, balance: Credits) -> Credits {
        if balance > 100.0 {
            round2(balance / 100.0 * 10.0)
        } else {
            self.fallback
        }
    }
}

/// Everything a single input produced.
#[derive(Debug, Default)]
pub struct Step {
    pub events:   Vec<CasinoEvent>,
    pub schedule: Vec<Scheduled>,
    /// Set when the input resolved the round.
    pub payout:   Option<Credits>,
}

/// Object-safe face of a `GameSession`, so the engine can hold any game.
pub trait GameTable {
    fn game(&self) -> GameId;
    fn phase(&self) -> Phase;
    fn stake(&self) -> Credits;
    fn round_id(&self) -> Option<&str>;

    /// Returns the new stake, or `None` when the input was ignored.
    fn set_stake(&mut self, raw: f64, balance: Credits) -> Option<Credits>;
    fn step_stake(&mut self, direction: StakeStep, balance: Credits) -> Option<Credits>;

    fn confirm(&mut self, session: &mut Session, rng: &mut GameRng) -> CasinoResult<Step>;
    fn wakeup(&mut self, session: &mut Session, wakeup: Wakeup) -> CasinoResult<Step>;
    fn act(&mut self, session: &mut Session, action: Action) -> CasinoResult<Step>;

    /// Tear the round down without settling it. Returns the id of the
    /// round that was in flight, if any.
    fn abandon(&mut self) -> Option<RoundId>;

    fn snapshot(&self) -> GameSnapshot;

    /// For downcasting to game-specific controls (miner tier).
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub struct GameSession<R> {
    resolver: R,
    limits:   StakeLimits,
    phase:    Phase,
    stake:    Credits,
    round_id: Option<RoundId>,
}

impl<R: OutcomeResolver> GameSession<R> {
    pub fn new(resolver: R, limits: StakeLimits, balance: Credits) -> Self {
        let stake = limits.opening(balance);
        Self { resolver, limits, phase: Phase::Idle, stake, round_id: None }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Mutable resolver access, only between rounds.
    pub fn resolver_mut_idle(&mut self) -> Option<&mut R> {
        (self.phase == Phase::Idle).then_some(&mut self.resolver)
    }

    fn apply(&mut self, session: &mut Session, progress: Progress) -> CasinoResult<Step> {
        match progress {
            Progress::Ignored => {
                log::debug!("{}: input ignored in phase {:?}", self.resolver.game(), self.phase);
                Ok(Step::default())
            }
            Progress::Continue { events, schedule } => Ok(Step { events, schedule, payout: None }),
            Progress::Settled { events } => self.settle(session, events),
        }
    }

    fn settle(&mut self, session: &mut Session, mut events: Vec<CasinoEvent>) -> CasinoResult<Step> {
        let game = self.resolver.game();
        self.phase = Phase::Resolved;

        let payout = self.resolver.resolve(self.stake);
        let paid = if payout > 0.0 { session.pay_out(game, payout) } else { Ok(()) };
        // The round is over whether or not the payout was stored.
        self.phase = Phase::Idle;
        self.round_id = None;
        if let Err(err) = paid {
            log::warn!("{game}: payout of {payout:.2} not stored: {err}");
            return Err(err);
        }
        log::debug!("{game}: round resolved stake={:.2} payout={payout:.2}", self.stake);

        events.push(CasinoEvent::RoundResolved { game, stake: self.stake, payout });
        Ok(Step { events, schedule: Vec::new(), payout: Some(payout) })
    }
}

impl<R: OutcomeResolver + 'static> GameTable for GameSession<R> {
    fn game(&self) -> GameId {
        self.resolver.game()
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn stake(&self) -> Credits {
        self.stake
    }

    fn round_id(&self) -> Option<&str> {
        self.round_id.as_deref()
    }

    fn set_stake(&mut self, raw: f64, balance: Credits) -> Option<Credits> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.stake = self.limits.clamp(raw, balance);
        Some(self.stake)
    }

    fn step_stake(&mut self, direction: StakeStep, balance: Credits) -> Option<Credits> {
        let delta = match direction {
            StakeStep::Up => self.limits.step,
            StakeStep::Down => -self.limits.step,
        };
        self.set_stake(self.stake + delta, balance)
    }

    fn confirm(&mut self, session: &mut Session, rng: &mut GameRng) -> CasinoResult<Step> {
        if self.phase != Phase::Idle {
            log::debug!("{}: confirm ignored mid-round", self.resolver.game());
            return Ok(Step::default());
        }
        let available = session.balance().ok_or(CasinoError::NotLoggedIn)?;
        if self.stake <= 0.0 || self.stake > available {
            return Err(CasinoError::InsufficientBalance { stake: self.stake, available });
        }

        let game = self.resolver.game();
        session.commit_stake(game, self.stake)?;

        self.phase = Phase::Committed;
        self.round_id = Some(uuid::Uuid::new_v4().to_string());
        log::debug!("{game}: round committed stake={:.2}", self.stake);

        let committed = CasinoEvent::RoundCommitted { game, stake: self.stake };
        let progress = self.resolver.start(self.stake, rng);
        let mut step = self.apply(session, progress)?;
        step.events.insert(0, committed);
        Ok(step)
    }

    fn wakeup(&mut self, session: &mut Session, wakeup: Wakeup) -> CasinoResult<Step> {
        if self.phase != Phase::Committed {
            return Ok(Step::default());
        }
        let progress = self.resolver.on_wakeup(wakeup);
        self.apply(session, progress)
    }

    fn act(&mut self, session: &mut Session, action: Action) -> CasinoResult<Step> {
        if self.phase != Phase::Committed {
            log::debug!("{}: {action:?} ignored outside a round", self.resolver.game());
            return Ok(Step::default());
        }
        let progress = self.resolver.on_action(action);
        self.apply(session, progress)
    }

    fn abandon(&mut self) -> Option<RoundId> {
        self.phase = Phase::Idle;
        self.round_id.take()
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game:  self.resolver.game(),
            phase: self.phase,
            stake: self.stake,
            view:  self.resolver.view(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

