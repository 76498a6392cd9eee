use std::io;
use std::sync::Arc;

use tabletop::board::{legal_values, render};
use tabletop::build_info;
use tabletop::{
    spawn_sweeper, ChatId, Difficulty, Engine, EngineConfig, GameError, Outcome, Participant,
    PlayerId, Variant,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The console is a single chat.
const CONSOLE_CHAT: &str = "console";
const CONSOLE_PLAYER: &str = "you";

#[tokio::main]
async fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Tabletop - turn-based board games\n");
                println!("Usage: tabletop [--version | --help]\n");
                println!("Reads commands from stdin:");
                print_commands();
                println!("\nEnvironment:");
                println!("  RUST_LOG                        Log filter (default: info)");
                println!("  TABLETOP_IDLE_TIMEOUT_SECS      Reclaim games idle this long");
                println!("  TABLETOP_SWEEP_INTERVAL_SECS    How often to look for idle games");
                println!("  TABLETOP_HARD_DEPTH             Search depth for hard difficulty");
                println!("  TABLETOP_SEED                   Fixed seed for computer moves");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'tabletop --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = EngineConfig::from_env();
    info!(?config, "starting console");
    let engine = Arc::new(Engine::new(config));
    let sweeper = spawn_sweeper(Arc::clone(&engine), engine.config().sweep_interval());

    let mut console = Console {
        engine,
        chat: ChatId::from(CONSOLE_CHAT),
        variant: None,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_commands();
    while let Some(line) = lines.next_line().await? {
        if !console.handle(&line) {
            break;
        }
    }

    sweeper.abort();
    Ok(())
}

fn print_commands() {
    println!("  start <game> [opponent] [difficulty]   tictactoe | sudoku | sudoku-mini");
    println!("                                         opponent defaults to computer");
    println!("  move <cell> [value]                    cells are numbered from 1");
    println!("  show                                   print the board");
    println!("  cancel                                 abandon the game");
    println!("  quit");
}

struct Console {
    engine: Arc<Engine>,
    chat: ChatId,
    /// Game the console is currently playing
    variant: Option<Variant>,
}

impl Console {
    /// Run one command. Returns false to quit.
    fn handle(&mut self, line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();
        let result = match words.as_slice() {
            [] => Ok(()),
            ["quit" | "exit"] => return false,
            ["start", game, rest @ ..] => self.start(game, rest),
            ["move", cell, rest @ ..] => self.play(cell, rest.first().copied()),
            ["show"] => {
                self.show();
                Ok(())
            }
            ["cancel"] => {
                match self.variant.take() {
                    Some(variant) if self.engine.cancel(&self.chat, variant) => {
                        println!("Game cancelled.")
                    }
                    _ => println!("No game to cancel."),
                }
                Ok(())
            }
            _ => {
                println!("Unrecognized command.");
                print_commands();
                Ok(())
            }
        };
        if let Err(err) = result {
            println!("Error: {err}");
        }
        true
    }

    fn start(&mut self, game: &str, rest: &[&str]) -> Result<(), GameError> {
        let variant: Variant = game.parse()?;
        let opponent = rest.first().copied().unwrap_or("computer");
        let difficulty = rest
            .get(1)
            .map(|name| name.parse::<Difficulty>())
            .transpose()?;

        let players = [
            Participant::from_name(CONSOLE_PLAYER),
            Participant::from_name(opponent),
        ];
        let report = self.engine.start(&self.chat, variant, &players, difficulty)?;
        self.variant = Some(variant);
        println!("{}\n", render(&report.board));
        println!("{variant} started. {} to move.", report.turn_holder);
        Ok(())
    }

    fn play(&mut self, cell: &str, value: Option<&str>) -> Result<(), GameError> {
        let Some(variant) = self.variant else {
            println!("Start a game first.");
            return Ok(());
        };
        let Some(snapshot) = self.engine.snapshot(&self.chat, variant) else {
            self.variant = None;
            return Err(GameError::NoActiveSession { variant });
        };

        let cell = match cell.parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                println!("Cells are numbered 1-{}.", snapshot.board.cell_count());
                return Ok(());
            }
        };
        let value = match value.map(str::parse::<u8>) {
            Some(Ok(v)) => Some(v),
            Some(Err(_)) => {
                return Err(GameError::InvalidValue {
                    value: None,
                    max: snapshot.board.max_value(),
                })
            }
            None => None,
        };

        // hot-seat: whoever holds the turn is the one typing
        let player = match &snapshot.turn_holder {
            Participant::Player(id) => id.clone(),
            Participant::Computer => PlayerId::from(CONSOLE_PLAYER),
        };
        let report = self
            .engine
            .make_move(&self.chat, variant, &player, cell, value)?;

        for placement in report.placements.iter().skip(1) {
            if variant.takes_value() {
                println!(
                    "Computer plays {} at cell {}.",
                    placement.value,
                    placement.cell + 1
                );
            } else {
                println!("Computer plays cell {}.", placement.cell + 1);
            }
        }
        println!("{}\n", render(&report.board));
        match report.outcome {
            Outcome::InProgress { turn_holder, .. } => {
                println!("{turn_holder} to move.");
                if variant.takes_value() {
                    let hints: Vec<String> = report
                        .board
                        .empty_cells()
                        .take(4)
                        .map(|c| format!("{}: {:?}", c + 1, legal_values(&report.board, c)))
                        .collect();
                    println!("Open cells: {}", hints.join(", "));
                }
            }
            Outcome::Win {
                winner, pattern, ..
            } => {
                println!("{winner} wins ({pattern:?})!");
                self.variant = None;
            }
            Outcome::Draw => {
                println!("Draw.");
                self.variant = None;
            }
        }
        Ok(())
    }

    fn show(&self) {
        match self
            .variant
            .and_then(|variant| self.engine.snapshot(&self.chat, variant))
        {
            Some(snapshot) => {
                println!("{}\n", render(&snapshot.board));
                println!("{} to move.", snapshot.turn_holder);
            }
            None => println!("No game running."),
        }
    }
}
