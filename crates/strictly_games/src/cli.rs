//! Command-line interface for strictly_games.

use crate::config::PlayerKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strictly_grid::GameVariant;

/// Strictly Games - Gomoku, Go and Othello in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_games")]
#[command(about = "Grid board games with undo, bots and save files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file (defaults apply if it is missing)
    #[arg(short, long, default_value = "strictly_games.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game at the terminal
    Play(PlayArgs),

    /// Print every stored position of a save file in order
    Replay {
        /// Save file to replay
        file: PathBuf,
    },
}

/// Overrides for the configured game.
#[derive(Args, Debug, Default, Clone)]
pub struct PlayArgs {
    /// Game to play: gomoku, go or othello
    #[arg(short, long)]
    pub variant: Option<GameVariant>,

    /// Board side length (8 to 19)
    #[arg(short = 's', long)]
    pub board_size: Option<usize>,

    /// Who plays Black: human, bot-1 or bot-2
    #[arg(long)]
    pub black: Option<PlayerKind>,

    /// Who plays White: human, bot-1 or bot-2
    #[arg(long)]
    pub white: Option<PlayerKind>,

    /// Directory save names resolve into
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// Seed for bot moves
    #[arg(long)]
    pub seed: Option<u64>,

    /// Go: capture surrounded stones automatically with every move
    #[arg(long)]
    pub auto_capture: bool,
}
