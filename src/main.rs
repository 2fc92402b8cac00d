use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use navalbattle::cli::{
    coord_to_string, parse_command, render_own_board, render_quotas, render_target_board, Command,
};
use navalbattle::persistence::MatchStore;
use navalbattle::{
    init_logging, FileStore, FleetPreset, GameConfig, GameEngine, GameStatus, Match, MemoryStore,
    PersistenceError, ShotReport, ShotResult, Side, TargetMode, TargetingState,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Snapshot file (defaults to $NAVALBATTLE_SAVE, then navalbattle-match.sav).
    #[arg(long, global = true)]
    save: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer in the terminal.
    Play {
        #[arg(long, default_value = "Captain")]
        nickname: String,
        #[arg(long, value_enum, default_value_t = FleetPreset::Standard)]
        fleet: FleetPreset,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        /// Pause before each computer shot, in milliseconds.
        #[arg(long, default_value_t = 600)]
        delay_ms: u64,
        /// Start a new match even if one is saved.
        #[arg(long)]
        new: bool,
    },
    /// Let the computer play both sides and print the result.
    Simulate {
        #[arg(long, value_enum, default_value_t = FleetPreset::Standard)]
        fleet: FleetPreset,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Describe the saved match, if any.
    Status,
    /// Delete the saved match.
    Discard,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut config = GameConfig::from_env();
    if let Some(path) = cli.save {
        config.save_path = path;
    }

    match cli.command {
        Commands::Play {
            nickname,
            fleet,
            seed,
            delay_ms,
            new,
        } => {
            config.fleet = fleet;
            config.seed = seed;
            config.computer_delay = Duration::from_millis(delay_ms);
            play(&config, nickname, new)
        }
        Commands::Simulate { fleet, seed } => {
            config.fleet = fleet;
            config.seed = seed;
            simulate(&config)
        }
        Commands::Status => status(&config),
        Commands::Discard => {
            FileStore::new(&config.save_path).delete()?;
            println!("Saved match discarded.");
            Ok(())
        }
    }
}

fn prompt(msg: &str) -> io::Result<Option<String>> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn play(config: &GameConfig, nickname: String, new: bool) -> anyhow::Result<()> {
    let store = FileStore::new(&config.save_path);
    let catalog = config.fleet.catalog();
    let rng = config.rng();
    if let Some(s) = config.seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
    }

    let resume = if !new && store.exists() {
        match prompt("A previous match is in progress. Resume it? [Y/n] ")? {
            // Input closed: leave the saved match untouched.
            None => {
                println!();
                return Ok(());
            }
            Some(answer) => !matches!(answer.to_ascii_lowercase().as_str(), "n" | "no"),
        }
    } else {
        false
    };
    let mut engine = if resume {
        GameEngine::start(nickname, catalog, store, rng)?
    } else {
        GameEngine::new_match(nickname, catalog, store, rng)?
    };

    println!("Welcome aboard, {}. Type 'help' for commands.", engine.game().nickname());
    print_view(engine.game());

    loop {
        while engine.status() == GameStatus::ComputerTurn {
            thread::sleep(config.computer_delay);
            let report = engine.computer_fire()?;
            print_report(&report);
        }
        match engine.status() {
            GameStatus::Won => {
                print_view(engine.game());
                println!("All enemy ships sunk. You win!");
                return Ok(());
            }
            GameStatus::Lost => {
                print_view(engine.game());
                println!("Your fleet is lost. The computer wins.");
                return Ok(());
            }
            _ => {}
        }

        let Some(line) = prompt("> ")? else {
            return Ok(());
        };
        if line.is_empty() {
            continue;
        }
        match parse_command(&line) {
            Err(msg) => println!("{}", msg),
            Ok(Command::Help) => print_help(),
            Ok(Command::Quit) => {
                println!("Match saved. See you next time.");
                return Ok(());
            }
            Ok(Command::Board) => print_view(engine.game()),
            Ok(Command::Auto) => {
                let placed = engine.auto_place_remaining()?;
                println!("Placed {} ships at random.", placed);
                print_view(engine.game());
            }
            Ok(Command::Place {
                kind,
                row,
                col,
                orientation,
            }) => match engine.place_ship(kind, row, col, orientation) {
                Ok(fp) => {
                    println!("{} placed at {}.", fp.kind(), coord_to_string(row, col));
                    print_view(engine.game());
                }
                Err(e) => println!("Cannot place ship: {}.", e),
            },
            Ok(Command::Fire { row, col }) => match engine.player_fire(row, col) {
                Ok(report) => print_report(&report),
                Err(e) => println!("Cannot fire: {}.", e),
            },
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  place <ship> <A1> <h|v>   place a frigate, destroyer, submarine or carrier");
    println!("  auto                      place your remaining ships at random");
    println!("  fire <A1>                 fire at the enemy board");
    println!("  board                     show both boards");
    println!("  quit                      leave; the match stays saved");
}

fn print_view(game: &Match) {
    println!("\nEnemy waters:");
    print!("{}", render_target_board(game.computer_board()));
    println!("\n{}'s fleet:", game.nickname());
    print!("{}", render_own_board(game.player_board()));
    if game.player_board().is_full() {
        println!();
    } else {
        println!("Ships left to place:");
        print!("{}", render_quotas(game.player_board()));
    }
}

fn print_report(report: &ShotReport) {
    let who = match report.shooter {
        Side::Player => "You fire",
        Side::Computer => "The computer fires",
    };
    let what = match report.result {
        ShotResult::Hit => "hit!",
        ShotResult::Miss => "miss.",
    };
    println!("{} at {}: {}", who, coord_to_string(report.row, report.col), what);
    if let Some(fp) = report.sunk {
        println!("  {} sunk!", fp.kind());
    }
}

fn simulate(config: &GameConfig) -> anyhow::Result<()> {
    let mut rng = config.rng();
    let engine_rng = SmallRng::from_rng(&mut rng);
    let mut engine =
        GameEngine::new_match("Simulator", config.fleet.catalog(), MemoryStore::new(), engine_rng)?;
    engine.auto_place_remaining()?;

    // The player side borrows the computer's own targeting strategy.
    let mut aim = TargetingState::new();
    let mut shots = [0usize; 2];
    loop {
        match engine.status() {
            GameStatus::PlayerTurn => {
                let (row, col) = aim
                    .next_shot(&mut rng)
                    .ok_or_else(|| anyhow::anyhow!("player ran out of targets"))?;
                let report = engine.player_fire(row, col)?;
                aim.set_mode(if report.result == ShotResult::Hit && report.sunk.is_none() {
                    TargetMode::Hunting
                } else {
                    TargetMode::Random
                });
                shots[0] += 1;
            }
            GameStatus::ComputerTurn => shots[1] += engine.run_computer_turn()?.len(),
            GameStatus::Won | GameStatus::Lost | GameStatus::Placing => break,
        }
    }

    let winner = match engine.status() {
        GameStatus::Won => "player",
        GameStatus::Lost => "computer",
        _ => "nobody",
    };
    println!(
        "winner: {}  player shots: {}  computer shots: {}",
        winner, shots[0], shots[1]
    );
    Ok(())
}

fn status(config: &GameConfig) -> anyhow::Result<()> {
    let store = FileStore::new(&config.save_path);
    let state = match store.load() {
        Ok(state) => state,
        Err(PersistenceError::NotFound) => {
            println!("No saved match at {}.", store.path().display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let game = Match::try_from(state)?;
    println!("Saved match for {} ({:?}).", game.nickname(), game.status());
    println!(
        "Hits taken: {} of {}  Hits scored: {} of {}",
        game.player_board().hit_count(),
        game.player_board().catalog().total_cells(),
        game.computer_board().hit_count(),
        game.computer_board().catalog().total_cells()
    );
    if !game.player_board().is_full() {
        print!("{}", render_quotas(game.player_board()));
    }
    Ok(())
}
