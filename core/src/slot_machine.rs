//! Slot machine: three reels, one payline.
//!
//! The whole spin is drawn at commit time: a win flag (fixed
//! probability) forces all reels to one symbol, otherwise each reel
//! draws independently and may still match by chance. Reels then stop
//! one by one on timers; the round settles shortly after the last stop.

use crate::{
    config::SlotMachineConfig,
    event::CasinoEvent,
    resolver::{Action, OutcomeResolver, Progress, Scheduled, Wakeup},
    rng::GameRng,
    snapshot::GameView,
    types::{Credits, GameId},
};

pub const REELS: usize = 3;

pub struct SlotMachine {
    config:   SlotMachineConfig,
    results:  [usize; REELS],
    revealed: [bool; REELS],
    spinning: [bool; REELS],
    settled:  bool,
}

impl SlotMachine {
    pub fn new(config: SlotMachineConfig) -> Self {
        Self {
            config,
            results:  [0; REELS],
            revealed: [false; REELS],
            spinning: [false; REELS],
            settled:  false,
        }
    }

    /// Symbol indices drawn for the current or last spin.
    pub fn results(&self) -> [usize; REELS] {
        self.results
    }

    fn draw(&mut self, rng: &mut GameRng) -> [usize; REELS] {
        let n = self.config.symbols.len();
        if rng.chance(self.config.win_probability) {
            let forced = rng.below(n);
            [forced; REELS]
        } else {
            [rng.below(n), rng.below(n), rng.below(n)]
        }
    }

    /// Payline multiplier, or `None` when the reels do not all match.
    pub fn line_multiplier(&self, results: &[usize; REELS]) -> Option<f64> {
        let first = results[0];
        results
            .iter()
            .all(|&s| s == first)
            .then(|| self.config.symbols[first].multiplier)
    }
}

impl OutcomeResolver for SlotMachine {
    fn game(&self) -> GameId {
        GameId::SlotMachine
    }

    fn start(&mut self, _stake: Credits, rng: &mut GameRng) -> Progress {
        self.results = self.draw(rng);
        self.revealed = [false; REELS];
        self.spinning = [true; REELS];
        self.settled = false;

        let mut order = [0usize, 1, 2];
        rng.shuffle(&mut order);

        let mut schedule = Vec::with_capacity(REELS + 1);
        let mut last_stop = 0;
        for reel in order {
            let delay = rng.range_u64(self.config.reveal_delay_min_ms, self.config.reveal_delay_max_ms);
            last_stop = last_stop.max(delay);
            schedule.push(Scheduled { delay, wakeup: Wakeup::RevealReel(reel) });
        }
        schedule.push(Scheduled {
            delay:  last_stop + self.config.settle_delay_ms,
            wakeup: Wakeup::SettleReels,
        });

        log::debug!("slot: spin drawn {:?}", self.results);
        Progress::Continue { events: Vec::new(), schedule }
    }

    fn on_wakeup(&mut self, wakeup: Wakeup) -> Progress {
        match wakeup {
            Wakeup::RevealReel(reel) if reel < REELS && !self.revealed[reel] => {
                self.revealed[reel] = true;
                self.spinning[reel] = false;
                let symbol = self.config.symbols[self.results[reel]].id.clone();
                Progress::Continue {
                    events:   vec![CasinoEvent::ReelRevealed { reel, symbol }],
                    schedule: Vec::new(),
                }
            }
            Wakeup::SettleReels if !self.settled => {
                // Any reel still spinning stops now.
                self.revealed = [true; REELS];
                self.spinning = [false; REELS];
                self.settled = true;
                Progress::Settled { events: Vec::new() }
            }
            _ => Progress::Ignored,
        }
    }

    fn on_action(&mut self, _action: Action) -> Progress {
        Progress::Ignored
    }

    fn resolve(&mut self, stake: Credits) -> Credits {
        self.line_multiplier(&self.results)
            .map_or(0.0, |multiplier| stake * multiplier)
    }

    fn view(&self) -> GameView {
        let reel = |i: usize| {
            self.revealed[i].then(|| self.config.symbols[self.results[i]].id.clone())
        };
        GameView::SlotMachine {
            reels:    [reel(0), reel(1), reel(2)],
            spinning: self.spinning,
        }
    }
}
