pub mod clock;
pub mod command;
pub mod config;
pub mod currency;
pub mod deposit;
pub mod engine;
pub mod error;
pub mod event;
pub mod game_session;
pub mod ledger;
pub mod miner_game;
pub mod resolver;
pub mod rng;
pub mod rocket_game;
pub mod slot_machine;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod types;
pub mod user;
