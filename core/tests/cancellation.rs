//! Leaving a game view mid-round.
//!
//! A forfeited round keeps its stake debited and its provisional loss.
//! Its timers are cancelled and nothing it scheduled may reach the
//! ledger afterwards.

use casino_core::{
    deposit::PaymentMethod,
    engine::CasinoEngine,
    event::CasinoEvent,
    game_session::Phase,
    types::GameId,
};

fn seated(seed: u64, game: GameId) -> CasinoEngine {
    let mut engine = CasinoEngine::build_test(seed).expect("build test engine");
    engine.login("leaver").unwrap();
    engine.deposit("100", Some(PaymentMethod::Boleto)).unwrap();
    engine.enter_game(game).unwrap();
    engine.set_stake(10.0).unwrap();
    engine
}

#[test]
fn leaving_a_spinning_slot_forfeits_and_cancels() {
    let mut engine = seated(0x1EAF, GameId::SlotMachine);
    engine.confirm().unwrap();
    assert_eq!(engine.pending_timers(), 4);

    let events = engine.leave_game().unwrap();
    assert_eq!(
        events,
        vec![CasinoEvent::GameLeft { game: GameId::SlotMachine, forfeited: true, cancelled_timers: 4 }]
    );
    assert_eq!(engine.pending_timers(), 0);
    assert!(engine.table().is_none());

    let before = engine.session().user().cloned();
    assert!(engine.advance(10_000).unwrap().is_empty());
    assert_eq!(engine.session().user().cloned(), before, "ledger untouched after leaving");
    assert_eq!(engine.session().balance(), Some(90.0), "the stake stays forfeited");

    let stats = engine.session().user().and_then(|u| u.stats()).unwrap();
    assert_eq!((stats.wins(), stats.losses()), (0, 1));
}

#[test]
fn leaving_a_rocket_in_flight_stops_the_ticks() {
    let mut engine = seated(0x2EAF, GameId::RocketGame);
    engine.confirm().unwrap();
    engine.advance(400).unwrap();

    engine.leave_game().unwrap();
    assert_eq!(engine.pending_timers(), 0);
    assert!(engine.advance(60_000).unwrap().is_empty());
    assert_eq!(engine.session().balance(), Some(90.0));
}

#[test]
fn switching_games_leaves_the_current_one() {
    let mut engine = seated(0x3EAF, GameId::SlotMachine);
    engine.confirm().unwrap();

    let events = engine.enter_game(GameId::RocketGame).unwrap();
    assert!(matches!(
        events.as_slice(),
        [CasinoEvent::GameLeft { forfeited: true, .. }, CasinoEvent::GameEntered { game: GameId::RocketGame, .. }]
    ));
    assert_eq!(engine.pending_timers(), 0);

    // A fresh round on the new table is unaffected by the old one.
    engine.set_stake(10.0).unwrap();
    engine.confirm().unwrap();
    engine.advance(1000).unwrap();
    engine.cash_out().unwrap();
    assert!((engine.session().balance().unwrap() - (80.0 + 5.5)).abs() < 1e-9);
}

#[test]
fn leaving_an_idle_table_forfeits_nothing() {
    let mut engine = seated(0x4EAF, GameId::MinerGame);
    let events = engine.leave_game().unwrap();
    assert_eq!(
        events,
        vec![CasinoEvent::GameLeft { game: GameId::MinerGame, forfeited: false, cancelled_timers: 0 }]
    );
    assert_eq!(engine.session().balance(), Some(100.0));
    assert!(engine.leave_game().unwrap().is_empty(), "nothing left to leave");
}

#[test]
fn logout_closes_the_table_first() {
    let mut engine = seated(0x5EAF, GameId::RocketGame);
    engine.confirm().unwrap();

    let events = engine.logout().unwrap();
    assert!(matches!(events.first(), Some(CasinoEvent::GameLeft { forfeited: true, .. })));
    assert!(matches!(events.last(), Some(CasinoEvent::LoggedOut)));
    assert!(engine.table().is_none());
    assert!(engine.advance(60_000).unwrap().is_empty());
}

#[test]
fn reentering_starts_idle() {
    let mut engine = seated(0x6EAF, GameId::MinerGame);
    engine.confirm().unwrap();
    engine.enter_game(GameId::MinerGame).unwrap();

    let table = engine.table().unwrap();
    assert_eq!(table.phase(), Phase::Idle);
    assert!(table.round_id().is_none());
    // Balance 90 ≤ 100: opening stake falls back to 0.
    assert_eq!(table.stake(), 0.0);
}
