//! Turns typed lines into table actions.

use derive_more::Display;
use std::path::PathBuf;
use strictly_grid::{Action, Pos};

/// One parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A table action.
    Action(Action),
    /// Print the board again.
    Board,
    /// Print the command list.
    Help,
    /// Leave the game.
    Quit,
}

/// Why a line could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InputError {
    /// Blank line.
    #[display("Type a command, or `help`")]
    Empty,
    /// Unrecognised first word.
    #[display("Unknown command `{_0}`")]
    UnknownCommand(String),
    /// A coordinate that is not a number.
    #[display("`{_0}` is not a row or column number")]
    BadCoordinate(String),
    /// Wrong number of words for the command.
    #[display("Usage: {_0}")]
    Usage(&'static str),
}

impl std::error::Error for InputError {}

/// Commands accepted at the prompt.
pub const HELP: &str = "\
  <row> <col>        place a stone (also: place <row> <col>)
  pass               pass the turn (Go, or Othello with no move)
  capture            capture surrounded stones (Go)
  end                end your turn
  undo               take back your previous move (once per turn)
  hint               list legal moves
  resign             admit defeat
  restart            start a new game
  store <file>       save the whole game
  snapshot <file>    save the current position
  load <file>        resume a position saved in this game
  board              show the board
  quit               leave";

fn coordinate(word: &str) -> Result<usize, InputError> {
    word.parse()
        .map_err(|_| InputError::BadCoordinate(word.to_string()))
}

fn place(row: &str, col: &str) -> Result<Input, InputError> {
    Ok(Input::Action(Action::Place(Pos::new(
        coordinate(row)?,
        coordinate(col)?,
    ))))
}

fn file_arg(words: &[&str], usage: &'static str) -> Result<PathBuf, InputError> {
    match words {
        [name] => Ok(PathBuf::from(name)),
        _ => Err(InputError::Usage(usage)),
    }
}

/// Parses one line of input.
pub fn parse(line: &str) -> Result<Input, InputError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&first, rest)) = words.split_first() else {
        return Err(InputError::Empty);
    };

    let input = match first.to_ascii_lowercase().as_str() {
        "place" | "p" => match rest {
            [row, col] => place(row, col)?,
            _ => return Err(InputError::Usage("place <row> <col>")),
        },
        "pass" | "skip" => Input::Action(Action::Pass),
        "capture" | "c" => Input::Action(Action::Capture),
        "end" | "end_turn" | "e" => Input::Action(Action::EndTurn),
        "undo" | "u" => Input::Action(Action::Undo),
        "hint" | "h" => Input::Action(Action::Hint),
        "resign" | "admit_defeat" => Input::Action(Action::AdmitDefeat),
        "restart" => Input::Action(Action::Restart),
        "store" | "save" => Input::Action(Action::Store(file_arg(rest, "store <file>")?)),
        "snapshot" | "store_snapshot" => {
            Input::Action(Action::StoreSnapshot(file_arg(rest, "snapshot <file>")?))
        }
        "load" => Input::Action(Action::Load(file_arg(rest, "load <file>")?)),
        "board" | "b" => Input::Board,
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ if first.chars().all(|c| c.is_ascii_digit()) => match rest {
            [col] => place(first, col)?,
            _ => return Err(InputError::Usage("<row> <col>")),
        },
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(input)
}
