//! Rocket: a climbing multiplier that explodes at a hidden point.
//!
//! The explosion point is drawn at commit time as 1 + u1 * u2 * scale,
//! which piles most of the mass just above 1. The multiplier starts
//! below 1 and climbs one step per tick; reaching the explosion point
//! loses the round, cashing out first pays stake × multiplier.

use crate::{
    config::RocketConfig,
    event::CasinoEvent,
    resolver::{Action, OutcomeResolver, Progress, Scheduled, Wakeup},
    rng::GameRng,
    snapshot::GameView,
    types::{round2, Credits, GameId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    Grounded,
    Flying,
    Exploded,
    CashedOut,
}

pub struct RocketGame {
    config:          RocketConfig,
    multiplier:      f64,
    explosion_point: f64,
    flight:          Flight,
}

impl RocketGame {
    pub fn new(config: RocketConfig) -> Self {
        let multiplier = config.start_multiplier;
        Self {
            config,
            multiplier,
            explosion_point: 1.0,
            flight: Flight::Grounded,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn explosion_point(&self) -> f64 {
        self.explosion_point
    }

    pub fn flight(&self) -> Flight {
        self.flight
    }

    fn next_tick(&self) -> Scheduled {
        Scheduled { delay: self.config.tick_ms, wakeup: Wakeup::RocketTick }
    }
}

/// Draw an explosion point in [1, 1 + scale), rounded to cents.
pub fn draw_explosion_point(rng: &mut GameRng, scale: f64) -> f64 {
    let u1 = rng.next_f64();
    let u2 = rng.next_f64();
    round2(u1 * (u2 * scale) + 1.0)
}

impl OutcomeResolver for RocketGame {
    fn game(&self) -> GameId {
        GameId::RocketGame
    }

    fn start(&mut self, _stake: Credits, rng: &mut GameRng) -> Progress {
        self.explosion_point = draw_explosion_point(rng, self.config.explosion_scale);
        self.multiplier = self.config.start_multiplier;
        self.flight = Flight::Flying;
        log::debug!("rocket: launched, explodes at {:.2}", self.explosion_point);
        Progress::Continue { events: Vec::new(), schedule: vec![self.next_tick()] }
    }

    fn on_wakeup(&mut self, wakeup: Wakeup) -> Progress {
        if wakeup != Wakeup::RocketTick || self.flight != Flight::Flying {
            return Progress::Ignored;
        }
        self.multiplier = round2(self.multiplier + self.config.step);
        let ticked = CasinoEvent::MultiplierTicked { multiplier: self.multiplier };

        if self.multiplier >= self.explosion_point {
            self.flight = Flight::Exploded;
            return Progress::Settled {
                events: vec![
                    ticked,
                    CasinoEvent::RocketExploded {
                        multiplier: self.multiplier,
                        explosion_point: self.explosion_point,
                    },
                ],
            };
        }
        Progress::Continue { events: vec![ticked], schedule: vec![self.next_tick()] }
    }

    fn on_action(&mut self, action: Action) -> Progress {
        if action != Action::CashOut || self.flight != Flight::Flying {
            return Progress::Ignored;
        }
        self.flight = Flight::CashedOut;
        Progress::Settled {
            events: vec![CasinoEvent::CashedOut {
                game: GameId::RocketGame,
                multiplier: self.multiplier,
                explosion_point: Some(self.explosion_point),
            }],
        }
    }

    fn resolve(&mut self, stake: Credits) -> Credits {
        match self.flight {
            Flight::CashedOut => stake * self.multiplier,
            _ => 0.0,
        }
    }

    fn view(&self) -> GameView {
        GameView::Rocket {
            multiplier: self.multiplier,
            exploded: self.flight == Flight::Exploded,
            cashed_out: self.flight == Flight::CashedOut,
        }
    }
}
