//! Rocket tests.
//!
//! Tests cover: multiplier growth per tick, cash-out payouts, explosion,
//! explosion point distribution, opening stake fallback.

use casino_core::{
    engine::CasinoEngine,
    event::CasinoEvent,
    game_session::Phase,
    rng::GameRng,
    rocket_game::{draw_explosion_point, Flight, RocketGame},
    types::GameId,
};

fn seated(seed: u64) -> CasinoEngine {
    let mut engine = CasinoEngine::build_test(seed).expect("build test engine");
    engine.login("pilot").unwrap();
    engine.deposit("50", Some(casino_core::deposit::PaymentMethod::Pix)).unwrap();
    engine.enter_game(GameId::RocketGame).unwrap();
    engine
}

fn rocket(engine: &CasinoEngine) -> &RocketGame {
    engine.game_session::<RocketGame>().expect("rocket table").resolver()
}

#[test]
fn opening_stake_falls_back_to_ten() {
    let engine = seated(1);
    assert_eq!(engine.table().unwrap().stake(), 10.0);
}

#[test]
fn multiplier_climbs_one_step_per_tick() {
    let mut engine = seated(0x0CE7);
    engine.confirm().unwrap();
    assert_eq!(rocket(&engine).multiplier(), 0.3);

    engine.advance(199).unwrap();
    assert_eq!(rocket(&engine).multiplier(), 0.3, "no tick before 200 ms");

    engine.advance(801).unwrap();
    assert_eq!(rocket(&engine).multiplier(), 0.55, "five ticks by 1000 ms");
    assert_eq!(rocket(&engine).flight(), Flight::Flying, "explosion point is never below 1.00");
}

#[test]
fn cash_out_pays_stake_times_multiplier() {
    let mut engine = seated(0xCA54);
    engine.confirm().unwrap();
    assert_eq!(engine.session().balance(), Some(40.0));

    engine.advance(1000).unwrap();
    let events = engine.cash_out().unwrap();

    let explosion_point = rocket(&engine).explosion_point();
    assert!(matches!(
        events.first(),
        Some(CasinoEvent::CashedOut { multiplier, explosion_point: Some(p), .. })
            if *multiplier == 0.55 && *p == explosion_point
    ));
    assert!(matches!(
        events.last(),
        Some(CasinoEvent::RoundResolved { payout, .. }) if (payout - 5.5).abs() < 1e-9
    ));
    assert!((engine.session().balance().unwrap() - 45.5).abs() < 1e-9);
    assert_eq!(engine.pending_timers(), 0, "the next tick is dropped after settling");
}

#[test]
fn reaching_the_explosion_point_loses_the_stake() {
    let mut engine = seated(0xB00A);
    engine.confirm().unwrap();

    let events = engine.advance(60_000).unwrap();
    let exploded = events.iter().find_map(|e| match e {
        CasinoEvent::RocketExploded { multiplier, explosion_point } => Some((*multiplier, *explosion_point)),
        _ => None,
    });
    let (multiplier, explosion_point) = exploded.expect("rocket explodes within a minute");
    assert!(multiplier >= explosion_point);
    assert!(matches!(events.last(), Some(CasinoEvent::RoundResolved { payout, .. }) if *payout == 0.0));

    assert_eq!(engine.session().balance(), Some(40.0));
    assert_eq!(engine.table().unwrap().phase(), Phase::Idle);
    assert!(engine.cash_out().unwrap().is_empty(), "too late to cash out");
}

#[test]
fn explosion_points_stay_in_range_and_skew_low() {
    let mut rng = GameRng::new(0xF00D, 2);
    let points: Vec<f64> = (0..2_000).map(|_| draw_explosion_point(&mut rng, 10.0)).collect();

    assert!(points.iter().all(|p| (1.0..=11.0).contains(p)), "point out of range");
    for p in &points {
        assert_eq!((p * 100.0).round() / 100.0, *p, "{p} is not rounded to cents");
    }
    let below_four = points.iter().filter(|p| **p < 4.0).count();
    assert!(below_four > points.len() / 2, "only {below_four} of {} below 4.00", points.len());
}

#[test]
fn stake_is_clamped_to_the_balance() {
    let mut engine = seated(0x5747);
    let events = engine.set_stake(500.0).unwrap();
    assert_eq!(events, vec![CasinoEvent::StakeChanged { game: GameId::RocketGame, stake: 50.0 }]);

    engine.set_stake(0.01).unwrap();
    assert_eq!(engine.table().unwrap().stake(), 0.25);

    engine.set_stake(f64::NAN).unwrap();
    assert_eq!(engine.table().unwrap().stake(), 0.25);
}

#[test]
fn advancing_past_the_end_of_time_saturates_the_clock() {
    let mut engine = seated(0x7135);
    engine.confirm().unwrap();
    engine.advance(10).unwrap();

    let events = engine.advance(u64::MAX).unwrap();
    assert_eq!(engine.clock.now, u64::MAX);
    assert!(matches!(
        events.last(),
        Some(CasinoEvent::RoundResolved { payout, .. }) if *payout == 0.0
    ));
    assert_eq!(engine.table().unwrap().phase(), Phase::Idle);

    assert!(engine.run_until_idle(u64::MAX).unwrap().is_empty());
    engine.advance(1).unwrap();
    assert_eq!(engine.clock.now, u64::MAX);
}
