// ═══════════════════════════════════════════════════════════════════════
// Runner: CLI entry point for the live algo, local matches and
// tournaments.
//
// `algo` speaks the game's line protocol on stdin/stdout, so all logging
// goes to stderr.
// ═══════════════════════════════════════════════════════════════════════

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use td_agents::{Agent, RandomAgent, StrategyAgent, StrategyConfig};
use td_engine::config::GameConfig;
use td_engine::protocol::{encode_submission, parse_action_frame, parse_turn_info, parse_turn_state, TurnPhase};
use td_engine::types::Player;
use td_tournament::{run_match, run_matches, Database};
use tracing::{info, warn};

const ELO_K: f64 = 32.0;

#[derive(Parser)]
#[command(name = "td-runner", about = "Tower-defense strategy engine")]
struct Cli {
    /// Strategy settings (layout, attack threshold) as JSON
    #[arg(long, global = true)]
    strategy: Option<String>,
    /// Reinforce cells the opponent scored on
    #[arg(long, global = true)]
    reactive: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a live game over stdin/stdout
    Algo,
    /// Run a single local match
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 100)]
        turns: u32,
        #[arg(short, long, value_enum, default_value_t = AgentKind::Random)]
        opponent: AgentKind,
        /// Game config JSON; the built-in table when omitted
        #[arg(long)]
        config: Option<String>,
    },
    /// Run N matches in parallel and record them
    Tournament {
        #[arg(short, long, default_value_t = 100)]
        matches: u32,
        #[arg(short, long, default_value_t = 100)]
        turns: u32,
        #[arg(short, long, default_value = "results.db")]
        db: String,
        #[arg(short, long, value_enum, default_value_t = AgentKind::Random)]
        opponent: AgentKind,
    },
    /// Show leaderboard from database
    Leaderboard {
        #[arg(short, long, default_value = "results.db")]
        db: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    Strategy,
    Random,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let strategy = load_strategy(cli.strategy.as_deref(), cli.reactive)?;

    match cli.command {
        Commands::Algo => cmd_algo(strategy),
        Commands::Play { seed, turns, opponent, config } => cmd_play(seed, turns, opponent, config.as_deref(), &strategy),
        Commands::Tournament { matches, turns, db, opponent } => cmd_tournament(matches, turns, &db, opponent, &strategy),
        Commands::Leaderboard { db } => cmd_leaderboard(&db),
    }
}

fn load_strategy(path: Option<&str>, reactive: bool) -> anyhow::Result<StrategyConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            StrategyConfig::from_json(&text).with_context(|| format!("parsing {}", path))?
        }
        None => StrategyConfig::default(),
    };
    config.reactive_defense |= reactive;
    Ok(config)
}

fn make_agent(kind: AgentKind, seed: u64, strategy: &StrategyConfig) -> Box<dyn Agent> {
    match kind {
        AgentKind::Strategy => Box::new(StrategyAgent::new(strategy.clone())),
        AgentKind::Random => Box::new(RandomAgent::new(seed)),
    }
}

// ── Live game ──────────────────────────────────────────────────────────

fn cmd_algo(strategy: StrategyConfig) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut out = io::stdout().lock();

    let first = lines.next().context("no game config on stdin")??;
    let config = Arc::new(GameConfig::from_json(&first).context("parsing game config")?);
    let mut agent = StrategyAgent::new(strategy);
    agent.on_game_start(&config);

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let info = match parse_turn_info(&line) {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "skipping unreadable line");
                continue;
            }
        };
        match info.phase {
            TurnPhase::Deploy => {
                let mut state = parse_turn_state(config.clone(), &line)
                    .with_context(|| format!("parsing turn {}", info.turn))?;
                agent.on_turn(&mut state)?;
                let Some(submission) = state.take_submission() else {
                    bail!("turn {} ended without a submission", info.turn);
                };
                let (build, deploy) = encode_submission(&config.catalog, &submission)?;
                writeln!(out, "{}", build)?;
                writeln!(out, "{}", deploy)?;
                out.flush()?;
            }
            TurnPhase::Action => {
                let frame = parse_action_frame(&line)?;
                if !frame.breaches.is_empty() {
                    agent.on_action_frame(&frame);
                }
            }
            TurnPhase::GameOver => {
                info!(turn = info.turn, "game over");
                break;
            }
        }
    }
    Ok(())
}

// ── Local matches ──────────────────────────────────────────────────────

fn cmd_play(seed: u64, turns: u32, opponent: AgentKind, config_path: Option<&str>, strategy: &StrategyConfig) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            GameConfig::from_json(&text)?
        }
        None => GameConfig::standard(),
    };

    println!("=== Tower Defense Strategy Engine ===\n");
    println!("Running single match: seed={}, turns={}, opponent={:?}\n", seed, turns, opponent);

    let mut me = make_agent(AgentKind::Strategy, seed, strategy);
    let mut them = make_agent(opponent, seed.wrapping_add(1), strategy);
    let result = run_match([me.as_mut(), them.as_mut()], Arc::new(config), seed, turns)?;

    println!("Match finished after {} turns", result.turns_played);
    match result.winner {
        Some(p) => println!("  Winner: {} ({})", result.seat(p).agent_name, p),
        None => println!("  Draw"),
    }
    println!();
    for p in Player::BOTH {
        let seat = result.seat(p);
        println!("    {:10} -- health: {:>5.1}, breaches: {:>3}, placed: {:>4}",
            seat.agent_name, seat.final_health, seat.breaches, seat.placed);
    }
    Ok(())
}

fn cmd_tournament(num_matches: u32, turns: u32, db_path: &str, opponent: AgentKind, strategy: &StrategyConfig) -> anyhow::Result<()> {
    println!("=== Tournament: {} matches, {} turns, opponent={:?} ===\n", num_matches, turns, opponent);

    let db = Database::open(db_path)?;
    let seeds: Vec<u64> = (0..num_matches).map(|m| 42 + m as u64 * 1000).collect();
    let results = run_matches(&seeds, Arc::new(GameConfig::standard()), turns, |seed| {
        [make_agent(AgentKind::Strategy, seed, strategy), make_agent(opponent, seed + 1, strategy)]
    });

    let mut wins = [0u32; 2];
    let mut draws = 0u32;
    let mut errors = 0u32;
    for (i, outcome) in results.iter().enumerate() {
        match outcome {
            Ok(result) => {
                let ids = [
                    db.register_agent(&result.seat(Player::Me).agent_name)?,
                    db.register_agent(&result.seat(Player::Opponent).agent_name)?,
                ];
                db.record(result, ids, ELO_K)?;
                match result.winner {
                    Some(p) => wins[p.index()] += 1,
                    None => draws += 1,
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("Match {}: ERROR -- {}", i + 1, e);
            }
        }
    }

    println!("--- Summary ({} matches, {} errors) ---", num_matches, errors);
    println!("  Strategy (seat 1): {:>4} wins", wins[0]);
    println!("  {:?} (seat 2): {:>4} wins", opponent, wins[1]);
    println!("  Draws:             {:>4}", draws);
    println!("\nResults saved to: {}", db_path);
    println!("Total matches in DB: {}", db.match_count()?);
    Ok(())
}

fn cmd_leaderboard(db_path: &str) -> anyhow::Result<()> {
    let db = Database::open(db_path)?;
    let board = db.leaderboard()?;
    if board.is_empty() {
        println!("No agents found. Run some tournaments first.");
        return Ok(());
    }
    println!("=== Leaderboard ===\n");
    println!("{:<20} {:>8} {:>8} {:>8} {:>8}", "Agent", "ELO", "Matches", "Wins", "Draws");
    println!("{}", "-".repeat(56));
    for s in &board {
        println!("{:<20} {:>8.1} {:>8} {:>8} {:>8}", s.name, s.elo, s.matches, s.wins, s.draws);
    }
    Ok(())
}
