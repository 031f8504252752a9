//! Computer opponents and the rule-engine surface they play through.
//!
//! Bots see the same API a human front end does: they list legal cells and
//! commit one through the session. The rule engine never knows who moved.

use crate::board::Board;
use crate::error::{GameError, GameResult};
use crate::rules::{RuleSet, gomoku};
use crate::session::GameSession;
use crate::types::{Cell, Pos, Side};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Every cell where `side` may place on `board` under `rules`.
pub fn list_legal_moves(rules: &RuleSet, board: &Board, side: Side) -> Vec<Pos> {
    rules.legal_moves(board, side)
}

/// Checks and places one stone for `side`.
///
/// Returns the cells flipped as a side effect (Othello only).
///
/// # Errors
///
/// [`GameError::IllegalMove`] if the placement breaks the rules.
#[instrument(skip(rules, board))]
pub fn apply_move(
    rules: &RuleSet,
    row: usize,
    col: usize,
    board: &mut Board,
    side: Side,
) -> GameResult<Vec<Pos>> {
    let pos = Pos::new(row, col);
    rules.is_legal(pos, board, side, false)?;
    Ok(rules.apply(pos, board, side))
}

/// How hard a bot tries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum BotLevel {
    /// Uniformly random legal move.
    #[strum(to_string = "level 1")]
    Random,
    /// Greedy one-ply heuristic.
    #[strum(to_string = "level 2")]
    Heuristic,
}

/// What a bot wants to do with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotDecision {
    /// Place at this cell.
    Place(Pos),
    /// Pass the turn.
    Pass,
}

// Gomoku weights indexed by neighbouring run length (1..=4+).
const OWN_RUN_WEIGHTS: [i64; 4] = [10, 50, 200, 1000];
const OPPONENT_RUN_WEIGHTS: [i64; 4] = [15, 70, 300, 1500];

const CORNER_BONUS: i64 = 10;
const EDGE_BONUS: i64 = 3;
const CORNER_ADJACENT_PENALTY: i64 = 5;

/// A seeded computer player.
#[derive(Debug, Clone)]
pub struct Bot {
    level: BotLevel,
    rng: ChaCha8Rng,
}

impl Bot {
    /// Creates a bot whose choices are reproducible for a given seed.
    pub fn new(level: BotLevel, seed: u64) -> Self {
        Self {
            level,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a bot seeded from the operating system.
    pub fn from_entropy(level: BotLevel) -> Self {
        Self {
            level,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// The bot's strength.
    pub fn level(&self) -> BotLevel {
        self.level
    }

    /// Picks an action for the session's active side.
    ///
    /// Returns `None` when there is no legal move and the variant forbids
    /// passing (a Gomoku board that is already full).
    #[instrument(skip(self, session), fields(level = %self.level, side = ?session.active_side()))]
    pub fn choose(&mut self, session: &GameSession) -> Option<BotDecision> {
        let side = session.active_side();
        let moves = session.legal_moves();
        if moves.is_empty() {
            return session
                .rules()
                .may_pass(session.board(), side)
                .then_some(BotDecision::Pass);
        }

        let pick = match (self.level, session.rules()) {
            (BotLevel::Heuristic, RuleSet::Gomoku) => {
                self.best_by(&moves, |pos| gomoku_score(session.board(), pos, side))
            }
            (BotLevel::Heuristic, RuleSet::Othello) => {
                self.best_by(&moves, |pos| othello_score(session.board(), pos, side))
            }
            _ => moves.choose(&mut self.rng).copied(),
        };
        debug!(?pick, candidates = moves.len(), "Bot chose");
        pick.map(BotDecision::Place)
    }

    /// Plays one whole turn for the session's active side.
    ///
    /// Places (capturing in Go) or passes, but leaves ending the turn to the
    /// caller.
    ///
    /// # Errors
    ///
    /// [`GameError::GameOver`] when nothing can be played, otherwise any
    /// error from the session.
    #[instrument(skip(self, session))]
    pub fn play_turn(&mut self, session: &mut GameSession) -> GameResult<BotDecision> {
        let decision = self.choose(session).ok_or(GameError::GameOver)?;
        match decision {
            BotDecision::Place(pos) => {
                session.attempt_move(pos)?;
                if let RuleSet::Go(_) = session.rules() {
                    session.capture()?;
                }
            }
            BotDecision::Pass => session.pass()?,
        }
        info!(?decision, "Bot moved");
        Ok(decision)
    }

    /// Highest-scoring candidate, ties broken at random.
    fn best_by(&mut self, moves: &[Pos], score: impl Fn(Pos) -> i64) -> Option<Pos> {
        let scored: Vec<(Pos, i64)> = moves.iter().map(|&pos| (pos, score(pos))).collect();
        let best = scored.iter().map(|&(_, value)| value).max()?;
        let top: Vec<Pos> = scored
            .into_iter()
            .filter(|&(_, value)| value == best)
            .map(|(pos, _)| pos)
            .collect();
        top.choose(&mut self.rng).copied()
    }
}

/// Rewards extending own runs and blocking the opponent's, per axis.
pub fn gomoku_score(board: &Board, pos: Pos, side: Side) -> i64 {
    gomoku::AXES
        .iter()
        .map(|&axis| {
            run_weight(board, pos, side, axis, &OWN_RUN_WEIGHTS)
                + run_weight(board, pos, side.opponent(), axis, &OPPONENT_RUN_WEIGHTS)
        })
        .sum()
}

fn run_weight(board: &Board, pos: Pos, side: Side, axis: (isize, isize), weights: &[i64; 4]) -> i64 {
    // The candidate cell is empty, so the run counts only the neighbours.
    match gomoku::run_length(board, pos, side, axis) - 1 {
        0 => 0,
        n => weights[n.min(weights.len()) - 1],
    }
}

/// Flip count plus positional bonuses for corners and edges.
pub fn othello_score(board: &Board, pos: Pos, side: Side) -> i64 {
    let last = board.size() - 1;
    let on_edge = |n: usize| n == 0 || n == last;
    let near_edge = |n: usize| n == 1 || n == last - 1;

    let mut score = crate::rules::othello::flippable(board, pos, side).len() as i64;
    if on_edge(pos.row) && on_edge(pos.col) {
        score += CORNER_BONUS;
    } else if on_edge(pos.row) || on_edge(pos.col) {
        score += EDGE_BONUS;
    }
    let corner_adjacent = (near_edge(pos.row) || on_edge(pos.row))
        && (near_edge(pos.col) || on_edge(pos.col))
        && !(on_edge(pos.row) && on_edge(pos.col));
    if corner_adjacent && board.at(nearest_corner(pos, last)) == Cell::Empty {
        score -= CORNER_ADJACENT_PENALTY;
    }
    score
}

fn nearest_corner(pos: Pos, last: usize) -> Pos {
    let snap = |n: usize| if n <= last / 2 { 0 } else { last };
    Pos::new(snap(pos.row), snap(pos.col))
}
