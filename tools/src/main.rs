//! casino-runner: headless driver for the casino core.
//!
//! Usage:
//!   casino-runner --seed 12345 --game rocket --rounds 50 --db play.db
//!   casino-runner --ipc-mode < commands.jsonl

use anyhow::{bail, Result};
use casino_core::{
    command::PlayerCommand,
    config::CasinoConfig,
    currency::format_brl,
    engine::CasinoEngine,
    error::CasinoError,
    event::CasinoEvent,
    game_session::Phase,
    rocket_game::RocketGame,
    stats::StatsReport,
    store::CasinoStore,
    types::{Credits, GameId},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Stats,
    Command { command: PlayerCommand },
    Quit,
}

/// Autoplay: miner cashes out after this many diamonds.
const MINER_TARGET_DIAMONDS: usize = 3;
/// Autoplay: rocket cashes out at this multiplier.
const ROCKET_TARGET_MULTIPLIER: f64 = 1.5;
/// Autoplay: upper bound on virtual time a single round may take.
const ROUND_TIME_LIMIT_MS: u64 = 120_000;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", chrono::Utc::now().timestamp_millis() as u64);
    let rounds = parse_arg(&args, "--rounds", 20u64);
    let stake = parse_arg(&args, "--stake", 10.0f64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let game = parse_game(flag_value(&args, "--game").unwrap_or("slot"))?;

    if !ipc_mode {
        println!("casino-runner");
        println!("  seed:      {seed}");
        println!("  game:      {game}");
        println!("  rounds:    {rounds}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let config = CasinoConfig::load(data_dir)?;
    let store = if db == ":memory:" {
        CasinoStore::in_memory()?
    } else {
        CasinoStore::open(db)?
    };
    store.migrate()?;

    let session_id = format!("play-{}", uuid::Uuid::new_v4());
    let mut engine = CasinoEngine::new(session_id, seed, store, config)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        let played = autoplay(&mut engine, game, rounds, stake)?;
        print_summary(&engine, played)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut CasinoEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let response = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => serde_json::to_value(engine.snapshot()?)?,
            IpcCommand::Stats => serde_json::to_value(engine.stats_report())?,
            IpcCommand::Command { command } => match engine.apply(command) {
                Ok(events) => serde_json::json!({
                    "events": events,
                    "state": engine.snapshot()?,
                }),
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            },
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

/// Play up to `rounds` rounds of `game`. Returns how many were played.
fn autoplay(engine: &mut CasinoEngine, game: GameId, rounds: u64, stake: Credits) -> Result<u64> {
    if !engine.session().is_logged_in() {
        engine.login("autoplay")?;
    }
    engine.claim_bonus()?;
    engine.enter_game(game)?;
    engine.set_stake(stake)?;

    let mut played = 0;
    for _ in 0..rounds {
        match engine.confirm() {
            Ok(_) => {}
            Err(CasinoError::InsufficientBalance { stake, available }) => {
                println!(
                    "  stopping: stake {} exceeds balance {}",
                    format_brl(stake),
                    format_brl(available)
                );
                break;
            }
            Err(e) => return Err(e.into()),
        }

        match game {
            GameId::SlotMachine => {
                engine.run_until_idle(ROUND_TIME_LIMIT_MS)?;
            }
            GameId::MinerGame => play_miner(engine)?,
            GameId::RocketGame => play_rocket(engine)?,
            GameId::ThreeCardMonte => bail!("{game} cannot be played"),
        }
        played += 1;

        // Keep the stake in bounds as the balance moves.
        engine.set_stake(stake)?;
    }

    engine.leave_game()?;
    log::info!("autoplay finished: {played} rounds of {game}");
    Ok(played)
}

fn round_open(engine: &CasinoEngine) -> bool {
    engine.table().is_some_and(|t| t.phase() == Phase::Committed)
}

fn play_miner(engine: &mut CasinoEngine) -> Result<()> {
    let cells = engine.config().miner.cells();
    let mut diamonds = 0;
    for cell in 0..cells {
        if !round_open(engine) {
            return Ok(());
        }
        let events = engine.reveal(cell)?;
        diamonds += events
            .iter()
            .filter(|e| matches!(e, CasinoEvent::CellRevealed { bomb: false, .. }))
            .count();
        if diamonds >= MINER_TARGET_DIAMONDS {
            break;
        }
    }
    if round_open(engine) {
        engine.cash_out()?;
    }
    Ok(())
}

fn play_rocket(engine: &mut CasinoEngine) -> Result<()> {
    let tick_ms = engine.config().rocket.tick_ms;
    let mut elapsed = 0;
    while round_open(engine) && elapsed < ROUND_TIME_LIMIT_MS {
        let multiplier = engine
            .game_session::<RocketGame>()
            .map_or(0.0, |s| s.resolver().multiplier());
        if multiplier >= ROCKET_TARGET_MULTIPLIER {
            engine.cash_out()?;
            break;
        }
        engine.advance(tick_ms)?;
        elapsed += tick_ms;
    }
    Ok(())
}

fn print_summary(engine: &CasinoEngine, played: u64) -> Result<()> {
    let store = engine.session().store();
    let committed = store.event_count(&engine.session_id, "round_committed")?;
    let resolved = store.event_count(&engine.session_id, "round_resolved")?;

    println!("=== PLAY SUMMARY ===");
    println!("  session_id:     {}", engine.session_id);
    println!("  seed:           {:#x}", engine.seed());
    println!("  rounds played:  {played}");
    println!("  virtual time:   {} ms", engine.clock.now);
    println!("  committed:      {committed}");
    println!("  resolved:       {resolved}");

    println!();
    println!("=== PLAYER STATS ===");
    let Some(report) = engine.stats_report() else {
        println!("  (No rounds recorded yet)");
        return Ok(());
    };
    print_report(&report);
    Ok(())
}

fn print_report(report: &StatsReport) {
    let name = if report.name.is_empty() { "guest" } else { report.name.as_str() };
    println!("  player:         {name}");
    println!("  balance:        {}", format_brl(report.balance));
    println!("  wins / losses:  {} / {}", report.wins, report.losses);
    println!("  win ratio:      {:.1}%", report.win_ratio * 100.0);
    println!("  earned:         {}", format_brl(report.credits_earned));
    println!("  lost:           {}", format_brl(report.credits_lost));
    println!("  net:            {}", format_brl(report.net));
    println!("  most played:    {}", report.most_played_label());
    for row in &report.per_game {
        println!(
            "  {:<16} W {:>4} | L {:>4} | total {:>4}",
            row.game.to_string(),
            row.wins,
            row.losses,
            row.total
        );
    }
}

fn parse_game(name: &str) -> Result<GameId> {
    Ok(match name {
        "slot" | "slot_machine" | "SlotMachine" => GameId::SlotMachine,
        "miner" | "miner_game" | "MinerGame" => GameId::MinerGame,
        "rocket" | "rocket_game" | "RocketGame" => GameId::RocketGame,
        other => bail!("unknown game '{other}' (expected slot, miner or rocket)"),
    })
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
