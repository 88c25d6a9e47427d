//! Persisted key-value store tests.
//!
//! Tests cover: defaults, durability across reopening a file-backed
//! store, fallback on corrupt values, legacy field names, stat ordering.

use casino_core::{
    config::CasinoConfig,
    ledger::Session,
    store::{CasinoStore, CLAIMED_BONUS_KEY, LOGIN_PROMPT_KEY, USER_DATA_KEY},
    types::GameId,
};

fn memory_store() -> CasinoStore {
    let store = CasinoStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn temp_db(name: &str) -> String {
    let path = std::env::temp_dir().join(format!("casino-{name}-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path.to_string_lossy().into_owned()
}

fn cleanup(path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}

#[test]
fn missing_keys_yield_defaults() {
    let store = memory_store();
    assert!(!store.claimed_bonus().unwrap());
    assert!(store.login_prompt_open().unwrap());
    assert!(store.load_user(None).unwrap().is_none());
    assert_eq!(store.raw_value(USER_DATA_KEY).unwrap(), None);
}

#[test]
fn values_round_trip_through_json() {
    let store = memory_store();
    store.set_claimed_bonus(true).unwrap();
    store.set_login_prompt_open(false).unwrap();

    assert_eq!(store.raw_value(CLAIMED_BONUS_KEY).unwrap().as_deref(), Some("true"));
    assert_eq!(store.raw_value(LOGIN_PROMPT_KEY).unwrap().as_deref(), Some("false"));
    assert!(store.claimed_bonus().unwrap());
    assert!(!store.login_prompt_open().unwrap());
}

#[test]
fn state_survives_reopening_a_file_store() {
    let path = temp_db("reopen");
    {
        let store = CasinoStore::open(&path).expect("open file store");
        store.migrate().unwrap();
        let mut session = Session::open(store, CasinoConfig::default_test().wallet).unwrap();
        session.login("carla").unwrap();
        session.claim_bonus().unwrap();
        session.record_loss(GameId::MinerGame, 5.0).unwrap();
    }

    let store = CasinoStore::open(&path).expect("reopen file store");
    store.migrate().unwrap();
    let session = Session::open(store, CasinoConfig::default_test().wallet).unwrap();

    let user = session.user().expect("user persisted");
    assert_eq!(user.name(), "carla");
    assert_eq!(user.credits_available(), 20.0);
    assert_eq!(user.stats().unwrap().losses(), 1);
    assert!(session.bonus_claimed().unwrap());
    assert!(!session.login_prompt_open().unwrap());

    drop(session);
    cleanup(&path);
}

#[test]
fn logout_persists_as_null_not_as_the_guest() {
    let path = temp_db("logout");
    {
        let store = CasinoStore::open(&path).unwrap();
        store.migrate().unwrap();
        let mut session = Session::open(store, CasinoConfig::default_test().wallet).unwrap();
        session.logout().unwrap();
    }

    let store = CasinoStore::open(&path).unwrap();
    let session = Session::open(store, CasinoConfig::default_test().wallet).unwrap();
    assert!(session.user().is_none(), "a logged-out store must not reseed the guest");

    drop(session);
    cleanup(&path);
}

#[test]
fn corrupt_values_fall_back_to_defaults() {
    let store = memory_store();
    store.set_raw_value(CLAIMED_BONUS_KEY, "{not json").unwrap();
    store.set_raw_value(USER_DATA_KEY, r#"{"name": 42}"#).unwrap();

    assert!(!store.claimed_bonus().unwrap());
    assert!(store.load_user(None).unwrap().is_none());

    // The corrupt value stays until the next write replaces it.
    assert_eq!(store.raw_value(CLAIMED_BONUS_KEY).unwrap().as_deref(), Some("{not json"));
    store.set_claimed_bonus(true).unwrap();
    assert!(store.claimed_bonus().unwrap());
}

#[test]
fn corrupt_user_record_reseeds_the_guest() {
    let store = memory_store();
    store.set_raw_value(USER_DATA_KEY, "[1, 2, 3]").unwrap();
    let session = Session::open(store, CasinoConfig::default_test().wallet).unwrap();
    assert_eq!(session.balance(), Some(1_500_000.0));
}

#[test]
fn legacy_misspelled_balance_field_is_accepted() {
    let store = memory_store();
    store
        .set_raw_value(USER_DATA_KEY, r#"{"name":"dora","profilePicture":"","creditsAvaliable":77.5}"#)
        .unwrap();
    let user = store.load_user(None).unwrap().expect("legacy record loads");
    assert_eq!(user.credits_available(), 77.5);

    // Written back under the corrected name.
    store.save_user(Some(&user)).unwrap();
    let raw = store.raw_value(USER_DATA_KEY).unwrap().unwrap();
    assert!(raw.contains("\"creditsAvailable\":77.5"), "unexpected JSON: {raw}");
}

#[test]
fn game_stats_keep_first_played_order() {
    let store = memory_store();
    let mut session = Session::open(store, CasinoConfig::default_test().wallet).unwrap();
    session.login("eva").unwrap();
    session.record_loss(GameId::RocketGame, 1.0).unwrap();
    session.record_loss(GameId::SlotMachine, 1.0).unwrap();
    session.record_loss(GameId::MinerGame, 1.0).unwrap();

    let raw = session.store().raw_value(USER_DATA_KEY).unwrap().unwrap();
    let raw = &raw[raw.find("\"gameStats\"").expect("gameStats key")..];
    let rocket = raw.find("\"RocketGame\"").expect("rocket entry");
    let slot = raw.find("\"SlotMachine\"").expect("slot entry");
    let miner = raw.find("\"MinerGame\"").expect("miner entry");
    assert!(rocket < slot && slot < miner, "order lost in {raw}");

    let reloaded = session.store().load_user(None).unwrap().unwrap();
    let order: Vec<GameId> = reloaded.stats().unwrap().game_stats().iter().map(|(g, _)| g).collect();
    assert_eq!(order, vec![GameId::RocketGame, GameId::SlotMachine, GameId::MinerGame]);
    // A three-way tie resolves to the first-played game, after a reload too.
    assert_eq!(reloaded.stats().unwrap().most_played_game(), Some(GameId::RocketGame));
}
