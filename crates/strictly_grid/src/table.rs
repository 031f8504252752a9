//! Action-driven table: one game session plus the flow around it.
//!
//! A front end resolves input into [`Action`]s and hands them to
//! [`Table::handle`], which returns a short message to show the player.

use crate::ai::{Bot, BotDecision};
use crate::codec::GameStore;
use crate::error::{GameError, GameResult};
use crate::rules::{RuleSet, go};
use crate::session::{GameSession, SessionOptions};
use crate::types::{GameVariant, Outcome, Pos};
use derive_getters::Getters;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Legal cells listed before a hint is cut short.
const HINT_LIMIT: usize = 12;

/// Everything a player can ask the table to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Place a stone for the active side.
    Place(Pos),
    /// Pass (Go, or Othello with no legal move). Ends the turn.
    Pass,
    /// Roll back to before the active side's previous move.
    Undo,
    /// Go: remove surrounded enemy groups next to this turn's stone.
    Capture,
    /// Finish the turn and hand over to the opponent.
    EndTurn,
    /// Resign; the opponent wins.
    AdmitDefeat,
    /// Start over with the same variant and size.
    Restart,
    /// Save the whole history.
    Store(PathBuf),
    /// Save only the current position.
    StoreSnapshot(PathBuf),
    /// Resume from a state this table stored earlier.
    Load(PathBuf),
    /// List legal cells (and the score, in Go).
    Hint,
}

/// Legal cells for the active side, plus the running score in Go.
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    /// Playable cells, row-major.
    pub moves: Vec<Pos>,
    /// Area score, Go only.
    pub score: Option<go::Score>,
}

impl std::fmt::Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.moves.is_empty() {
            write!(f, "No legal moves")?;
        } else {
            write!(f, "{} legal moves:", self.moves.len())?;
            for pos in self.moves.iter().take(HINT_LIMIT) {
                write!(f, " {pos}")?;
            }
            if self.moves.len() > HINT_LIMIT {
                write!(f, " and {} more", self.moves.len() - HINT_LIMIT)?;
            }
        }
        if let Some(score) = &self.score {
            write!(f, "; score {score}")?;
        }
        Ok(())
    }
}

/// A game in progress with undo budget, result and save store.
#[derive(Debug, Getters)]
pub struct Table {
    /// The game being played.
    session: GameSession,
    /// Whether the active side still has its undo for this turn.
    allow_undo: bool,
    /// Result once the game is decided.
    outcome: Option<Outcome>,
    /// Saves made from this table.
    store: GameStore,
}

impl Table {
    /// Opens a table for a fresh game; saves resolve under `save_dir`.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidBoardSize`] outside 8..=19.
    #[instrument(skip(save_dir))]
    pub fn new(
        variant: GameVariant,
        size: usize,
        options: SessionOptions,
        save_dir: impl AsRef<Path>,
    ) -> GameResult<Self> {
        Ok(Self {
            session: GameSession::new(variant, size, options)?,
            allow_undo: true,
            outcome: None,
            store: GameStore::new(save_dir),
        })
    }

    /// True once the game has a result.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Legal cells for the active side, with the score in Go.
    pub fn hint(&self) -> Hint {
        let score = match self.session.rules() {
            RuleSet::Go(_) => Some(go::score(self.session.board())),
            _ => None,
        };
        Hint {
            moves: self.session.legal_moves(),
            score,
        }
    }

    /// Runs one action and describes what happened.
    ///
    /// # Errors
    ///
    /// [`GameError::GameOver`] for play actions after the game ended;
    /// otherwise whatever the session or store rejected.
    #[instrument(skip(self), fields(side = %self.session.active_side()))]
    pub fn handle(&mut self, action: Action) -> GameResult<String> {
        let after_end = matches!(
            action,
            Action::Restart | Action::Store(_) | Action::StoreSnapshot(_)
        );
        if self.is_over() && !after_end {
            warn!(?action, "Game already decided");
            return Err(GameError::GameOver);
        }

        let side = self.session.active_side();
        match action {
            Action::Place(pos) => {
                let report = self.session.attempt_move(pos)?;
                let mut message = format!("{side} placed at {pos}");
                if !report.flipped.is_empty() {
                    message.push_str(&format!(", flipping {}", report.flipped.len()));
                }
                if report.captured > 0 {
                    message.push_str(&format!(", capturing {}", report.captured));
                }
                Ok(message)
            }
            Action::Pass => {
                self.session.pass()?;
                self.finish_turn(false)
                    .map(|next| format!("{side} passed. {next}"))
            }
            Action::Undo => {
                if !self.allow_undo {
                    return Err(GameError::UndoAlreadyUsed);
                }
                self.session.undo()?;
                self.allow_undo = false;
                Ok("Undo done.".to_string())
            }
            Action::Capture => match self.session.capture()? {
                0 => Ok("Nothing to capture".to_string()),
                removed => Ok(format!("{side} captured {removed} stones")),
            },
            Action::EndTurn => self.finish_turn(true),
            Action::AdmitDefeat => {
                let outcome = Outcome::Winner(side.opponent());
                self.outcome = Some(outcome);
                info!(?side, "Resigned");
                Ok(format!("{side} resigns. {outcome}"))
            }
            Action::Restart => {
                self.restart()?;
                Ok("New game started".to_string())
            }
            Action::Store(name) => {
                let path = self.store.save(name, &self.session.history_record())?;
                Ok(format!("Stored to {}", path.display()))
            }
            Action::StoreSnapshot(name) => {
                let path = self.store.save(name, &self.session.snapshot_record())?;
                Ok(format!("Stored position to {}", path.display()))
            }
            Action::Load(name) => {
                let record = self.store.load(&name)?;
                self.session.resume(record)?;
                self.allow_undo = true;
                Ok(format!("Loaded {}", name.display()))
            }
            Action::Hint => Ok(self.hint().to_string()),
        }
    }

    /// Lets a bot play the active side's whole turn, ending it.
    ///
    /// # Errors
    ///
    /// [`GameError::GameOver`] after the game ended, or whatever the session
    /// rejected.
    #[instrument(skip(self, bot), fields(side = %self.session.active_side(), level = %bot.level()))]
    pub fn play_bot(&mut self, bot: &mut Bot) -> GameResult<String> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let side = self.session.active_side();
        match bot.play_turn(&mut self.session)? {
            BotDecision::Place(pos) => {
                let next = self.finish_turn(true)?;
                Ok(format!("{side} placed at {pos}. {next}"))
            }
            BotDecision::Pass => {
                let next = self.finish_turn(false)?;
                Ok(format!("{side} passed. {next}"))
            }
        }
    }

    fn restart(&mut self) -> GameResult<()> {
        self.session = GameSession::new(
            self.session.variant(),
            self.session.board_size(),
            *self.session.options(),
        )?;
        self.allow_undo = true;
        self.outcome = None;
        Ok(())
    }

    /// Ends the active turn, judging the game when the rules allow it.
    fn finish_turn(&mut self, by_request: bool) -> GameResult<String> {
        self.session.next_turn_allowed(by_request)?;
        if let Some(outcome) = self.session.outcome() {
            self.outcome = Some(outcome);
            info!(%outcome, "Game over");
            return Ok(outcome.to_string());
        }
        self.session.begin_next_turn();
        self.allow_undo = true;
        Ok(format!("{} to move", self.session.active_side()))
    }
}
