//! Session-level flows through the engine: identity, bonus, deposits,
//! stake controls, command routing.

use casino_core::{
    command::PlayerCommand,
    config::CasinoConfig,
    deposit::{DepositForm, PaymentMethod},
    engine::CasinoEngine,
    error::CasinoError,
    event::CasinoEvent,
    game_session::StakeStep,
    ledger::Session,
    store::CasinoStore,
    types::GameId,
};

fn engine(seed: u64) -> CasinoEngine {
    CasinoEngine::build_test(seed).expect("build test engine")
}

#[test]
fn fresh_engine_shows_the_login_prompt_over_the_guest() {
    let engine = engine(1);
    let snapshot = engine.snapshot().unwrap();
    assert!(snapshot.login_prompt_open);
    assert!(!snapshot.bonus_claimed);
    assert_eq!(snapshot.user.map(|u| u.credits_available()), Some(1_500_000.0));
    assert!(snapshot.game.is_none());
}

#[test]
fn guest_opening_stake_is_ten_percent() {
    let mut engine = engine(2);
    engine.enter_game(GameId::SlotMachine).unwrap();
    assert_eq!(engine.table().unwrap().stake(), 150_000.0);
}

#[test]
fn dismissing_the_prompt_persists() {
    let mut engine = engine(3);
    engine.dismiss_login_prompt().unwrap();
    assert!(!engine.snapshot().unwrap().login_prompt_open);
}

#[test]
fn bonus_pays_once_per_store() {
    let mut engine = engine(4);
    engine.login("ana").unwrap();

    assert_eq!(engine.claim_bonus().unwrap(), vec![CasinoEvent::BonusClaimed { amount: 20.0 }]);
    assert!(engine.claim_bonus().unwrap().is_empty());
    assert_eq!(engine.session().balance(), Some(20.0));

    // Logging in as someone else does not reopen the bonus.
    engine.login("bia").unwrap();
    assert!(engine.claim_bonus().unwrap().is_empty());
    assert_eq!(engine.session().balance(), Some(0.0));
}

#[test]
fn deposits_outside_bounds_are_rejected() {
    let mut engine = engine(5);
    engine.login("ana").unwrap();

    for raw in ["0.10", "2000.01", "abc", "-5"] {
        let err = engine.deposit(raw, Some(PaymentMethod::Pix)).unwrap_err();
        assert!(matches!(err, CasinoError::InvalidInput { .. }), "{raw}: {err:?}");
    }
    assert_eq!(engine.session().balance(), Some(0.0));

    let receipt = engine.deposit("2000", Some(PaymentMethod::Card)).unwrap();
    assert_eq!(receipt.message, "Payment completed! R$ 2.000,00 deposited.");
    engine.deposit("0,25", Some(PaymentMethod::Boleto)).unwrap();
    assert_eq!(engine.session().balance(), Some(2000.25));
}

#[test]
fn deposit_needs_a_payment_method() {
    let mut engine = engine(6);
    engine.login("ana").unwrap();
    assert!(engine.deposit("50", None).is_err());
    assert_eq!(engine.session().balance(), Some(0.0));
}

#[test]
fn deposit_form_tracks_readiness() {
    let store = CasinoStore::in_memory().unwrap();
    store.migrate().unwrap();
    let mut session = Session::open(store, CasinoConfig::default_test().wallet).unwrap();
    session.login("ana").unwrap();

    let mut form = DepositForm::new(CasinoConfig::default_test().deposit);
    assert!(form.pick_quick_value(30.0).is_err());
    form.pick_quick_value(200.0).unwrap();
    assert!(!form.is_ready());

    form.select_method(PaymentMethod::Pix);
    assert!(form.is_ready());
    // Bad input keeps the previous amount.
    assert!(form.enter_amount("5000").is_err());
    assert_eq!(form.amount(), Some(200.0));

    form.submit(&mut session).unwrap();
    assert_eq!(session.balance(), Some(200.0));
    assert!(!form.is_ready(), "the form resets after submitting");
}

#[test]
fn stake_steps_by_half_and_respects_the_floor() {
    let mut engine = engine(7);
    engine.login("ana").unwrap();
    engine.deposit("20", Some(PaymentMethod::Pix)).unwrap();
    engine.enter_game(GameId::RocketGame).unwrap();
    assert_eq!(engine.table().unwrap().stake(), 10.0);

    engine.step_stake(StakeStep::Up).unwrap();
    assert_eq!(engine.table().unwrap().stake(), 10.5);

    engine.set_stake(0.5).unwrap();
    engine.step_stake(StakeStep::Down).unwrap();
    assert_eq!(engine.table().unwrap().stake(), 0.25);
    engine.step_stake(StakeStep::Down).unwrap();
    assert_eq!(engine.table().unwrap().stake(), 0.25);

    engine.set_stake(19.9).unwrap();
    engine.step_stake(StakeStep::Up).unwrap();
    assert_eq!(engine.table().unwrap().stake(), 20.0, "capped at the balance");
}

#[test]
fn playing_requires_a_user() {
    let mut engine = engine(8);
    engine.logout().unwrap();
    engine.enter_game(GameId::RocketGame).unwrap();

    assert!(matches!(engine.confirm(), Err(CasinoError::NotLoggedIn)));
    assert!(matches!(engine.set_stake(5.0), Err(CasinoError::NotLoggedIn)));
}

#[test]
fn three_card_monte_has_no_table() {
    let mut engine = engine(9);
    let err = engine.enter_game(GameId::ThreeCardMonte).unwrap_err();
    assert!(matches!(err, CasinoError::GameUnavailable { game: GameId::ThreeCardMonte }));
}

#[test]
fn actions_without_a_table_report_no_active_game() {
    let mut engine = engine(10);
    assert!(matches!(engine.confirm(), Err(CasinoError::NoActiveGame)));
    assert!(matches!(engine.cash_out(), Err(CasinoError::NoActiveGame)));
}

#[test]
fn commands_parse_from_json_and_route() {
    let mut engine = engine(11);
    let script = [
        r#"{"cmd":"login","name":"cli"}"#,
        r#"{"cmd":"claim_bonus"}"#,
        r#"{"cmd":"deposit","amount":"80","method":"pix"}"#,
        r#"{"cmd":"enter_game","game":"RocketGame"}"#,
        r#"{"cmd":"set_stake","amount":10}"#,
        r#"{"cmd":"confirm"}"#,
        r#"{"cmd":"advance","ms":1000}"#,
        r#"{"cmd":"cash_out"}"#,
    ];
    for line in script {
        let command: PlayerCommand = serde_json::from_str(line).expect(line);
        engine.apply(command).expect(line);
    }
    // 20 bonus + 80 deposit − 10 stake + 10 × 0.55
    assert!((engine.session().balance().unwrap() - 95.5).abs() < 1e-9);
}
