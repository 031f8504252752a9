//! Seats at the table: humans at the keyboard or bots.

use crate::config::PlayerKind;
use strictly_grid::{Bot, Side};
use tracing::info;

/// Who plays one side.
#[derive(Debug)]
pub enum Seat {
    /// Moves come from stdin.
    Human,
    /// Moves come from a bot.
    Bot(Bot),
}

impl Seat {
    /// Builds the seat for `side`.
    ///
    /// With a seed, each side gets its own reproducible stream.
    pub fn new(kind: PlayerKind, side: Side, seed: Option<u64>) -> Self {
        let Some(level) = kind.bot_level() else {
            return Seat::Human;
        };
        let bot = match seed {
            Some(seed) => {
                let offset = match side {
                    Side::Black => 0,
                    Side::White => 1,
                };
                Bot::new(level, seed.wrapping_add(offset))
            }
            None => Bot::from_entropy(level),
        };
        info!(?side, %level, "Bot seated");
        Seat::Bot(bot)
    }

    /// True for a human seat.
    pub fn is_human(&self) -> bool {
        matches!(self, Seat::Human)
    }
}
