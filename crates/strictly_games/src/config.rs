//! Game configuration loaded from TOML.

use crate::cli::PlayArgs;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strictly_grid::{BotLevel, GameVariant, MAX_BOARD_SIZE, MIN_BOARD_SIZE, SessionOptions};
use tracing::{debug, info, instrument};

/// Who sits on one side of the table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PlayerKind {
    /// Moves typed at the terminal.
    Human,
    /// Random legal moves.
    #[serde(rename = "bot-1")]
    #[strum(to_string = "bot-1")]
    Bot1,
    /// Heuristic moves.
    #[serde(rename = "bot-2")]
    #[strum(to_string = "bot-2")]
    Bot2,
}

impl PlayerKind {
    /// Bot strength, or `None` for a human.
    pub fn bot_level(self) -> Option<BotLevel> {
        match self {
            PlayerKind::Human => None,
            PlayerKind::Bot1 => Some(BotLevel::Random),
            PlayerKind::Bot2 => Some(BotLevel::Heuristic),
        }
    }
}

/// Settings for one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game to play.
    #[serde(default = "default_variant")]
    variant: GameVariant,

    /// Board side length.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Who plays Black.
    #[serde(default = "default_player")]
    black: PlayerKind,

    /// Who plays White.
    #[serde(default = "default_player")]
    white: PlayerKind,

    /// Directory relative save names resolve into.
    #[serde(default = "default_save_dir")]
    save_dir: PathBuf,

    /// Seed for bot moves; entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Go: capture during every move instead of on request.
    #[serde(default)]
    auto_capture: bool,
}

fn default_variant() -> GameVariant {
    GameVariant::Gomoku
}

fn default_board_size() -> usize {
    15
}

fn default_player() -> PlayerKind {
    PlayerKind::Human
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("saves")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            board_size: default_board_size(),
            black: default_player(),
            white: default_player(),
            save_dir: default_save_dir(),
            seed: None,
            auto_capture: false,
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(variant = %config.variant, size = config.board_size, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, args: &PlayArgs) -> Self {
        if let Some(variant) = args.variant {
            self.variant = variant;
        }
        if let Some(size) = args.board_size {
            self.board_size = size;
        }
        if let Some(black) = args.black {
            self.black = black;
        }
        if let Some(white) = args.white {
            self.white = white;
        }
        if let Some(dir) = &args.save_dir {
            self.save_dir = dir.clone();
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        self.auto_capture |= args.auto_capture;
        self
    }

    /// Checks values the board cannot accept.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::new(format!(
                "board_size must be between {} and {}, got {}",
                MIN_BOARD_SIZE, MAX_BOARD_SIZE, self.board_size
            )));
        }
        Ok(())
    }

    /// Session options derived from this config.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            auto_capture: self.auto_capture,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
