//! Miner: reveal diamonds on a hidden grid, cash out before a bomb.
//!
//! The grid holds a fixed count of bombs and diamonds per tier, padded
//! with diamonds and shuffled uniformly. Each diamond multiplies the
//! running multiplier by the tier's factor; a bomb loses the round.

use crate::{
    config::{MinerConfig, MinerTier, MinerTierConfig},
    error::{CasinoError, CasinoResult},
    event::CasinoEvent,
    resolver::{Action, OutcomeResolver, Progress, Wakeup},
    rng::GameRng,
    snapshot::{CellView, GameView},
    types::{Credits, GameId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent {
    Diamond,
    Bomb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub content:  CellContent,
    pub revealed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MinerOutcome {
    Busted,
    CashedOut,
}

pub struct MinerGame {
    config:     MinerConfig,
    tier:       MinerTierConfig,
    grid:       Vec<Cell>,
    multiplier: f64,
    outcome:    Option<MinerOutcome>,
}

impl MinerGame {
    pub fn new(config: MinerConfig) -> CasinoResult<Self> {
        let tier = config
            .tier(config.default_tier)
            .cloned()
            .ok_or_else(|| CasinoError::invalid(format!("no miner tier {:?}", config.default_tier)))?;
        Ok(Self {
            config,
            tier,
            grid: Vec::new(),
            multiplier: 1.0,
            outcome: None,
        })
    }

    pub fn tier(&self) -> MinerTier {
        self.tier.tier
    }

    /// Returns false when the tier is not configured.
    pub fn set_tier(&mut self, tier: MinerTier) -> bool {
        let Some(found) = self.config.tier(tier) else {
            return false;
        };
        self.tier = found.clone();
        true
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// The full grid, hidden cells included.
    pub fn cells(&self) -> &[Cell] {
        &self.grid
    }

    fn generate_grid(&self, rng: &mut GameRng) -> Vec<Cell> {
        let tier = &self.tier;
        let total = self.config.cells();

        let mut contents = Vec::with_capacity(total);
        contents.extend(std::iter::repeat(CellContent::Bomb).take(tier.bombs));
        contents.extend(std::iter::repeat(CellContent::Diamond).take(tier.diamonds));
        while contents.len() < total {
            contents.push(CellContent::Diamond);
        }
        contents.truncate(total);
        rng.shuffle(&mut contents);

        contents
            .into_iter()
            .map(|content| Cell { content, revealed: false })
            .collect()
    }
}

impl OutcomeResolver for MinerGame {
    fn game(&self) -> GameId {
        GameId::MinerGame
    }

    fn start(&mut self, _stake: Credits, rng: &mut GameRng) -> Progress {
        self.grid = self.generate_grid(rng);
        self.multiplier = 1.0;
        self.outcome = None;
        log::debug!("miner: grid laid for tier {:?}", self.tier.tier);
        Progress::Continue { events: Vec::new(), schedule: Vec::new() }
    }

    fn on_wakeup(&mut self, _wakeup: Wakeup) -> Progress {
        Progress::Ignored
    }

    fn on_action(&mut self, action: Action) -> Progress {
        if self.outcome.is_some() {
            return Progress::Ignored;
        }
        match action {
            Action::Reveal(id) => {
                let factor = self.tier.diamond_multiplier;
                let Some(cell) = self.grid.get_mut(id) else {
                    return Progress::Ignored;
                };
                if cell.revealed {
                    return Progress::Ignored;
                }
                cell.revealed = true;

                match cell.content {
                    CellContent::Bomb => {
                        self.outcome = Some(MinerOutcome::Busted);
                        Progress::Settled {
                            events: vec![CasinoEvent::CellRevealed {
                                cell: id,
                                bomb: true,
                                multiplier: self.multiplier,
                            }],
                        }
                    }
                    CellContent::Diamond => {
                        self.multiplier *= factor;
                        Progress::Continue {
                            events: vec![CasinoEvent::CellRevealed {
                                cell: id,
                                bomb: false,
                                multiplier: self.multiplier,
                            }],
                            schedule: Vec::new(),
                        }
                    }
                }
            }
            Action::CashOut => {
                self.outcome = Some(MinerOutcome::CashedOut);
                Progress::Settled {
                    events: vec![CasinoEvent::CashedOut {
                        game: GameId::MinerGame,
                        multiplier: self.multiplier,
                        explosion_point: None,
                    }],
                }
            }
        }
    }

    fn resolve(&mut self, stake: Credits) -> Credits {
        match self.outcome {
            Some(MinerOutcome::CashedOut) => stake * self.multiplier,
            Some(MinerOutcome::Busted) | None => 0.0,
        }
    }

    fn view(&self) -> GameView {
        GameView::Miner {
            tier: self.tier.tier,
            multiplier: self.multiplier,
            cells: self
                .grid
                .iter()
                .map(|c| match (c.revealed, c.content) {
                    (false, _) => CellView::Hidden,
                    (true, CellContent::Diamond) => CellView::Diamond,
                    (true, CellContent::Bomb) => CellView::Bomb,
                })
                .collect(),
        }
    }
}
