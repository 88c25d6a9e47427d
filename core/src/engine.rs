//! The casino engine. Owns the session, the open game view and the clock.
//!
//! FLOW for one command:
//!   1. The command is routed to the session (identity, wallet) or to
//!      the open game table (stake, confirm, reveal, cash out).
//!   2. Timers a table asks for are scheduled under its round id.
//!   3. Every resulting event is appended to the journal.
//!
//! RULES:
//!   - At most one game view is open at a time.
//!   - Leaving a view cancels its round's timers; a timer whose round is
//!     no longer active is dropped and never reaches the ledger.
//!   - All randomness flows through the RngBank.

use crate::{
    clock::{Scheduler, SessionClock},
    command::PlayerCommand,
    config::{CasinoConfig, MinerTier},
    deposit::{DepositForm, DepositReceipt, PaymentMethod},
    error::{CasinoError, CasinoResult},
    event::{CasinoEvent, EventLogEntry},
    game_session::{GameSession, GameTable, StakeLimits, StakeStep, Step},
    ledger::Session,
    miner_game::MinerGame,
    resolver::{Action, OutcomeResolver},
    rng::RngBank,
    rocket_game::RocketGame,
    slot_machine::SlotMachine,
    snapshot::TableSnapshot,
    stats::StatsReport,
    store::CasinoStore,
    types::{GameId, Millis, RoundId, SessionId},
};

pub struct CasinoEngine {
    pub session_id: SessionId,
    pub clock:      SessionClock,
    config:         CasinoConfig,
    session:        Session,
    rng_bank:       RngBank,
    scheduler:      Scheduler,
    table:          Option<Box<dyn GameTable>>,
}

impl CasinoEngine {
    /// Build an engine over an already-migrated store.
    pub fn new(
        session_id: SessionId,
        seed: u64,
        store: CasinoStore,
        config: CasinoConfig,
    ) -> CasinoResult<Self> {
        store.insert_play_session(&session_id, seed, env!("CARGO_PKG_VERSION"))?;
        let session = Session::open(store, config.wallet.clone())?;
        let engine = Self {
            clock: SessionClock::new(session_id.clone()),
            session_id,
            config,
            session,
            rng_bank: RngBank::new(seed),
            scheduler: Scheduler::new(),
            table: None,
        };
        engine.journal(None, "engine", &[CasinoEvent::SessionOpened { seed }])?;
        log::info!("session {} opened with seed {seed}", engine.session_id);
        Ok(engine)
    }

    /// In-memory engine with the test config.
    pub fn build_test(seed: u64) -> CasinoResult<Self> {
        Self::build_test_with(seed, CasinoConfig::default_test())
    }

    pub fn build_test_with(seed: u64, config: CasinoConfig) -> CasinoResult<Self> {
        let store = CasinoStore::in_memory()?;
        store.migrate()?;
        Self::new(format!("test-{seed}"), seed, store, config)
    }

    pub fn config(&self) -> &CasinoConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn table(&self) -> Option<&dyn GameTable> {
        self.table.as_deref()
    }

    /// The open table as a concrete game session.
    pub fn game_session<R: OutcomeResolver + 'static>(&self) -> Option<&GameSession<R>> {
        self.table.as_ref()?.as_any().downcast_ref::<GameSession<R>>()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Route one command. Returns the events it produced.
    pub fn apply(&mut self, command: PlayerCommand) -> CasinoResult<Vec<CasinoEvent>> {
        match command {
            PlayerCommand::Login { name } => self.login(&name),
            PlayerCommand::Logout => self.logout(),
            PlayerCommand::DismissLoginPrompt => self.dismiss_login_prompt(),
            PlayerCommand::ClaimBonus => self.claim_bonus(),
            PlayerCommand::Deposit { amount, method } => {
                let receipt = self.deposit(&amount, method)?;
                Ok(vec![CasinoEvent::Deposited { amount: receipt.amount, method: receipt.method }])
            }
            PlayerCommand::EnterGame { game } => self.enter_game(game),
            PlayerCommand::LeaveGame => self.leave_game(),
            PlayerCommand::SetStake { amount } => self.set_stake(amount),
            PlayerCommand::StepStake { direction } => self.step_stake(direction),
            PlayerCommand::SetTier { tier } => self.set_tier(tier),
            PlayerCommand::Confirm => self.confirm(),
            PlayerCommand::Reveal { cell } => self.act(Action::Reveal(cell)),
            PlayerCommand::CashOut => self.act(Action::CashOut),
            PlayerCommand::Advance { ms } => self.advance(ms),
        }
    }

    // ── Identity and wallet ────────────────────────────────────

    pub fn login(&mut self, name: &str) -> CasinoResult<Vec<CasinoEvent>> {
        self.session.login(name)?;
        let events = vec![CasinoEvent::LoggedIn { name: name.trim().to_string() }];
        self.journal(None, "session", &events)?;
        Ok(events)
    }

    /// Log out, closing any open game view first.
    pub fn logout(&mut self) -> CasinoResult<Vec<CasinoEvent>> {
        let mut events = self.leave_game()?;
        self.session.logout()?;
        let logged_out = [CasinoEvent::LoggedOut];
        self.journal(None, "session", &logged_out)?;
        events.extend(logged_out);
        Ok(events)
    }

    pub fn dismiss_login_prompt(&mut self) -> CasinoResult<Vec<CasinoEvent>> {
        self.session.dismiss_login_prompt()?;
        let events = vec![CasinoEvent::LoginPromptDismissed];
        self.journal(None, "session", &events)?;
        Ok(events)
    }

    pub fn claim_bonus(&mut self) -> CasinoResult<Vec<CasinoEvent>> {
        let events: Vec<CasinoEvent> = self
            .session
            .claim_bonus()?
            .map(|amount| CasinoEvent::BonusClaimed { amount })
            .into_iter()
            .collect();
        self.journal(None, "wallet", &events)?;
        Ok(events)
    }

    pub fn deposit(&mut self, raw_amount: &str, method: Option<PaymentMethod>) -> CasinoResult<DepositReceipt> {
        let mut form = DepositForm::new(self.config.deposit.clone());
        form.enter_amount(raw_amount)?;
        if let Some(method) = method {
            form.select_method(method);
        }
        let receipt = form.submit(&mut self.session)?;
        self.journal(
            None,
            "wallet",
            &[CasinoEvent::Deposited { amount: receipt.amount, method: receipt.method }],
        )?;
        Ok(receipt)
    }

    // ── Game views ─────────────────────────────────────────────

    /// Open a game view, closing the current one first.
    pub fn enter_game(&mut self, game: GameId) -> CasinoResult<Vec<CasinoEvent>> {
        let mut events = self.leave_game()?;

        let balance = self.session.balance().unwrap_or(0.0);
        let stake = &self.config.stake;
        let table: Box<dyn GameTable> = match game {
            GameId::SlotMachine => Box::new(GameSession::new(
                SlotMachine::new(self.config.slot_machine.clone()),
                StakeLimits::new(stake, self.config.slot_machine.fallback_stake),
                balance,
            )),
            GameId::MinerGame => Box::new(GameSession::new(
                MinerGame::new(self.config.miner.clone())?,
                StakeLimits::new(stake, self.config.miner.fallback_stake),
                balance,
            )),
            GameId::RocketGame => Box::new(GameSession::new(
                RocketGame::new(self.config.rocket.clone()),
                StakeLimits::new(stake, self.config.rocket.fallback_stake),
                balance,
            )),
            GameId::ThreeCardMonte => return Err(CasinoError::GameUnavailable { game }),
        };

        let entered = [CasinoEvent::GameEntered { game, stake: table.stake() }];
        self.table = Some(table);
        self.journal(None, game.as_str(), &entered)?;
        events.extend(entered);
        Ok(events)
    }

    /// Close the open game view. A round in flight is forfeited: its
    /// stake stays debited and its timers are cancelled.
    pub fn leave_game(&mut self) -> CasinoResult<Vec<CasinoEvent>> {
        let Some(mut table) = self.table.take() else {
            return Ok(Vec::new());
        };
        let game = table.game();
        let round = table.abandon();
        let cancelled_timers = round
            .as_deref()
            .map_or(0, |round_id| self.scheduler.cancel_round(round_id));
        if round.is_some() {
            log::info!("{game}: round forfeited, {cancelled_timers} timers cancelled");
        }

        let events = vec![CasinoEvent::GameLeft {
            game,
            forfeited: round.is_some(),
            cancelled_timers,
        }];
        self.journal(round.as_deref(), game.as_str(), &events)?;
        Ok(events)
    }

    pub fn set_stake(&mut self, amount: f64) -> CasinoResult<Vec<CasinoEvent>> {
        let balance = self.session.balance().ok_or(CasinoError::NotLoggedIn)?;
        let table = self.table.as_mut().ok_or(CasinoError::NoActiveGame)?;
        let game = table.game();
        let events: Vec<CasinoEvent> = table
            .set_stake(amount, balance)
            .map(|stake| CasinoEvent::StakeChanged { game, stake })
            .into_iter()
            .collect();
        self.journal(None, game.as_str(), &events)?;
        Ok(events)
    }

    pub fn step_stake(&mut self, direction: StakeStep) -> CasinoResult<Vec<CasinoEvent>> {
        let balance = self.session.balance().ok_or(CasinoError::NotLoggedIn)?;
        let table = self.table.as_mut().ok_or(CasinoError::NoActiveGame)?;
        let game = table.game();
        let events: Vec<CasinoEvent> = table
            .step_stake(direction, balance)
            .map(|stake| CasinoEvent::StakeChanged { game, stake })
            .into_iter()
            .collect();
        self.journal(None, game.as_str(), &events)?;
        Ok(events)
    }

    /// Change the miner tier. Ignored while a round is in flight.
    pub fn set_tier(&mut self, tier: MinerTier) -> CasinoResult<Vec<CasinoEvent>> {
        let table = self.table.as_mut().ok_or(CasinoError::NoActiveGame)?;
        let miner = table
            .as_any_mut()
            .downcast_mut::<GameSession<MinerGame>>()
            .ok_or_else(|| CasinoError::invalid("tiers only apply to the miner"))?;

        let changed = match miner.resolver_mut_idle() {
            Some(resolver) => resolver.set_tier(tier),
            None => {
                log::debug!("miner: tier change ignored mid-round");
                false
            }
        };
        let events = if changed { vec![CasinoEvent::TierChanged { tier }] } else { Vec::new() };
        self.journal(None, GameId::MinerGame.as_str(), &events)?;
        Ok(events)
    }

    // ── Rounds ─────────────────────────────────────────────────

    pub fn confirm(&mut self) -> CasinoResult<Vec<CasinoEvent>> {
        let table = self.table.as_mut().ok_or(CasinoError::NoActiveGame)?;
        let game = table.game();
        let rng = self.rng_bank.for_game(game);

        match table.confirm(&mut self.session, rng) {
            Ok(step) => {
                let round_id = table.round_id().map(str::to_owned);
                self.absorb(game, step, round_id)
            }
            Err(CasinoError::InsufficientBalance { stake, available }) => {
                log::info!("{game}: stake {stake:.2} rejected, balance {available:.2}");
                self.journal(None, game.as_str(), &[CasinoEvent::StakeRejected { game, stake, available }])?;
                Err(CasinoError::InsufficientBalance { stake, available })
            }
            Err(e) => Err(e),
        }
    }

    fn act(&mut self, action: Action) -> CasinoResult<Vec<CasinoEvent>> {
        let table = self.table.as_mut().ok_or(CasinoError::NoActiveGame)?;
        let game = table.game();
        let round_id = table.round_id().map(str::to_owned);
        let step = table.act(&mut self.session, action)?;
        self.absorb(game, step, round_id)
    }

    pub fn reveal(&mut self, cell: usize) -> CasinoResult<Vec<CasinoEvent>> {
        self.act(Action::Reveal(cell))
    }

    pub fn cash_out(&mut self) -> CasinoResult<Vec<CasinoEvent>> {
        self.act(Action::CashOut)
    }

    /// Move the clock forward by `ms`, firing every timer that falls due.
    pub fn advance(&mut self, ms: Millis) -> CasinoResult<Vec<CasinoEvent>> {
        let target = self.clock.now.saturating_add(ms);
        let mut events = Vec::new();

        while let Some(timer) = self.scheduler.pop_due(target) {
            self.clock.advance_to(timer.due);

            let Some(table) = self.table.as_mut() else {
                log::debug!("timer {:?} fired with no game open; dropped", timer.wakeup);
                continue;
            };
            if table.round_id() != Some(timer.round_id.as_str()) {
                log::debug!("stale timer {:?} for round {}; dropped", timer.wakeup, timer.round_id);
                continue;
            }

            let game = table.game();
            let step = table.wakeup(&mut self.session, timer.wakeup)?;
            events.extend(self.absorb(game, step, Some(timer.round_id))?);
        }

        self.clock.advance_to(target);
        Ok(events)
    }

    /// Advance until no timers remain or `limit` ms have passed.
    pub fn run_until_idle(&mut self, limit: Millis) -> CasinoResult<Vec<CasinoEvent>> {
        let deadline = self.clock.now.saturating_add(limit);
        let mut events = Vec::new();
        while let Some(due) = self.scheduler.next_due() {
            if due > deadline {
                break;
            }
            events.extend(self.advance(due - self.clock.now)?);
        }
        Ok(events)
    }

    // ── Views ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> CasinoResult<TableSnapshot> {
        Ok(TableSnapshot {
            session_id:        self.session_id.clone(),
            now:               self.clock.now,
            user:              self.session.user().cloned(),
            bonus_claimed:     self.session.bonus_claimed()?,
            login_prompt_open: self.session.login_prompt_open()?,
            game:              self.table.as_ref().map(|t| t.snapshot()),
            pending_timers:    self.scheduler.pending(),
        })
    }

    pub fn stats_report(&self) -> Option<StatsReport> {
        self.session.user().and_then(StatsReport::from_record)
    }

    /// All journal rows for this session, oldest first.
    pub fn events(&self) -> CasinoResult<Vec<EventLogEntry>> {
        self.session.store().events_for_session(&self.session_id)
    }

    fn absorb(
        &mut self,
        game: GameId,
        step: Step,
        round_id: Option<RoundId>,
    ) -> CasinoResult<Vec<CasinoEvent>> {
        match &round_id {
            Some(round) if step.payout.is_some() => {
                let dropped = self.scheduler.cancel_round(round);
                if dropped > 0 {
                    log::debug!("{game}: round settled, {dropped} leftover timers dropped");
                }
            }
            Some(round) => {
                for timer in &step.schedule {
                    let due = self.clock.now.saturating_add(timer.delay);
                    self.scheduler.schedule(due, round.clone(), timer.wakeup);
                }
            }
            None if !step.schedule.is_empty() => {
                log::warn!("{game}: {} timers requested outside a round; dropped", step.schedule.len());
            }
            None => {}
        }
        self.journal(round_id.as_deref(), game.as_str(), &step.events)?;
        Ok(step.events)
    }

    fn journal(&self, round_id: Option<&str>, source: &str, events: &[CasinoEvent]) -> CasinoResult<()> {
        for event in events {
            let entry = EventLogEntry {
                id:         None,
                session_id: self.session_id.clone(),
                at:         self.clock.now,
                round_id:   round_id.map(str::to_owned),
                source:     source.to_string(),
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(event)?,
            };
            self.session.store().append_event(&entry)?;
        }
        Ok(())
    }
}
