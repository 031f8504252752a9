//! Strictly Games - terminal front end
//!
//! Plays Gomoku, Go and Othello at the terminal, with bots, undo and save
//! files, and replays stored games.

#![warn(missing_docs)]

mod cli;
mod config;
mod input;
mod players;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use config::GameConfig;
use input::{HELP, Input};
use players::Seat;
use std::io::{self, BufRead, Write};
use std::path::Path;
use strictly_grid::{Action, Side, Table};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Board goes to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,strictly_grid=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play(args) => {
            let config = GameConfig::load_or_default(&cli.config)?.with_overrides(&args);
            config.validate()?;
            run_play(config)
        }
        Command::Replay { file } => run_replay(&file),
    }
}

/// Run an interactive game until it is quit or, with only bots seated, decided
#[instrument(skip(config), fields(variant = %config.variant(), size = config.board_size()))]
fn run_play(config: GameConfig) -> Result<()> {
    let mut table = Table::new(
        *config.variant(),
        *config.board_size(),
        config.session_options(),
        config.save_dir(),
    )?;
    let mut black = Seat::new(*config.black(), Side::Black, *config.seed());
    let mut white = Seat::new(*config.white(), Side::White, *config.seed());
    let any_human = black.is_human() || white.is_human();

    info!("Game starting");
    println!(
        "{} on a {size}x{size} board. Type `help` for commands.",
        config.variant(),
        size = config.board_size()
    );
    println!("{}", table.session().board().display());

    let mut lines = io::stdin().lock().lines();
    loop {
        if table.is_over() && !any_human {
            break;
        }

        let side = table.session().active_side();
        let seat = match side {
            Side::Black => &mut black,
            Side::White => &mut white,
        };
        if let Seat::Bot(bot) = seat
            && !table.is_over()
        {
            match table.play_bot(bot) {
                Ok(message) => {
                    println!("{message}");
                    println!("{}", table.session().board().display());
                }
                Err(e) => {
                    warn!(error = %e, "Bot could not move");
                    println!("{e}");
                    break;
                }
            }
            continue;
        }

        if table.is_over() {
            print!("game over> ");
        } else {
            print!("{side}> ");
        }
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match input::parse(&line?) {
            Ok(Input::Quit) => break,
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Board) => println!("{}", table.session().board().display()),
            Ok(Input::Action(action)) => {
                let redraw = matches!(
                    action,
                    Action::Place(_)
                        | Action::Undo
                        | Action::Capture
                        | Action::Restart
                        | Action::Load(_)
                );
                match table.handle(action) {
                    Ok(message) => {
                        println!("{message}");
                        if redraw {
                            println!("{}", table.session().board().display());
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Action refused");
                        println!("{e}");
                    }
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    if let Some(outcome) = table.outcome() {
        println!("{outcome}");
    }
    Ok(())
}

/// Print every position stored in a save file
#[instrument(fields(file = %file.display()))]
fn run_replay(file: &Path) -> Result<()> {
    let record = strictly_grid::read_record(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    info!(positions = record.boards().len(), "Replaying");
    for (n, board) in record.boards().iter().enumerate() {
        println!("Position {n}");
        println!("{}", board.display());
    }
    println!("{} to move", record.turn_owner());
    Ok(())
}
