//! This module defines the core data structures and types shared by the
//! simulator and the composition algebra: states, symbols, reactions,
//! directions, execution statuses and error types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank tape symbol. Reserved: it never appears in user input but may
/// appear on the tape.
pub const BLANK_SYMBOL: char = '_';
/// The default initial state of a freshly constructed machine.
pub const DEFAULT_INITIAL: &str = "qStart";
/// The default accept state.
pub const DEFAULT_ACCEPT: &str = "Y";
/// The default halt state (neutral termination, distinct from accept).
pub const DEFAULT_HALT: &str = "H";
/// The default machine title, used as the prefix when a machine is embedded
/// into a composite.
pub const DEFAULT_TITLE: &str = "MyMachine";

/// A state label. Non-empty by convention; composition operators derive new
/// labels by prefixing (`"[title]label"`).
pub type State = String;

/// A tape symbol.
pub type Symbol = char;

/// A `(state, symbol)` pair: the key of the transition table.
pub type TapeState = (State, Symbol);

/// The symbol set a builder enumerates when emitting blanket transitions.
/// Ordered so that generated tables are deterministic.
pub type Alphabet = BTreeSet<Symbol>;

/// The transition table: at most one reaction per `(state, symbol)` key.
pub type TransitionTable = HashMap<TapeState, Reaction>;

/// A single table entry, as consumed by the bulk constructors.
pub type TransitionEntry = (TapeState, Reaction);

/// The head movement prescribed by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
    /// Keep the head where it is.
    Hold,
}

impl Direction {
    /// The signed head-index delta of this direction.
    pub fn offset(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Hold => 0,
        }
    }

    /// The single-character specifier used by the textual format.
    pub fn specifier(self) -> char {
        match self {
            Direction::Left => '<',
            Direction::Right => '>',
            Direction::Hold => '-',
        }
    }

    /// Parses a textual-format specifier back into a direction.
    pub fn from_specifier(specifier: char) -> Option<Direction> {
        match specifier {
            '<' => Some(Direction::Left),
            '>' => Some(Direction::Right),
            '-' => Some(Direction::Hold),
            _ => None,
        }
    }
}

/// What a transition does: enter `state`, write `write` into the cell under
/// the head, then move the head in `direction`. The written symbol is
/// prescribed by the transition, never by the prior tape content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// The state the machine enters.
    pub state: State,
    /// The symbol written into the cell under the head.
    pub write: Symbol,
    /// Head movement applied after writing.
    pub direction: Direction,
}

impl Reaction {
    /// Convenience constructor for the common literal-transition style.
    pub fn new(state: impl Into<State>, write: Symbol, direction: Direction) -> Self {
        Reaction {
            state: state.into(),
            write,
            direction,
        }
    }
}

/// The observable outcome of a single simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The machine entered its accept state.
    Accept,
    /// No transition was defined for the current `(state, symbol)` pair.
    /// The tape and state are left intact for inspection.
    Reject,
    /// The machine entered its halt state.
    Halt,
    /// The machine may keep stepping.
    Running,
}

impl Status {
    /// Whether this status ends the run. Only `Running` is non-terminal.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Running)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Status::Accept => "Machine accepted.",
            Status::Reject => "Machine rejected.",
            Status::Halt => "Machine halted.",
            Status::Running => "Machine running.",
        };
        write!(f, "{}", message)
    }
}

/// Errors surfaced by the textual format, the loader and the composition
/// operators. Undefined transitions at runtime are not errors; they produce
/// [`Status::Reject`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// The machine description did not match the grammar.
    #[error("Machine description parse error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The description was grammatical but a field could not be interpreted.
    #[error("Malformed machine description: {0}")]
    FormatError(String),
    /// A file could not be read or written.
    #[error("File error: {0}")]
    FileError(String),
    /// A composition operator was handed an empty machine sequence.
    #[error("Empty machine sequence")]
    EmptySequence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let hold = Direction::Hold;

        let left_json = serde_json::to_string(&left).unwrap();
        let hold_json = serde_json::to_string(&hold).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(hold_json, "\"Hold\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        let hold_deserialized: Direction = serde_json::from_str(&hold_json).unwrap();

        assert_eq!(left, left_deserialized);
        assert_eq!(hold, hold_deserialized);
    }

    #[test]
    fn test_specifier_mapping_is_bidirectional() {
        for direction in [Direction::Left, Direction::Right, Direction::Hold] {
            assert_eq!(
                Direction::from_specifier(direction.specifier()),
                Some(direction)
            );
        }
        assert_eq!(Direction::from_specifier('^'), None);
    }

    #[test]
    fn test_direction_offsets() {
        assert_eq!(Direction::Left.offset(), -1);
        assert_eq!(Direction::Right.offset(), 1);
        assert_eq!(Direction::Hold.offset(), 0);
    }

    #[test]
    fn test_status_terminality() {
        assert!(Status::Accept.is_terminal());
        assert!(Status::Reject.is_terminal());
        assert!(Status::Halt.is_terminal());
        assert!(!Status::Running.is_terminal());
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(Status::Accept.to_string(), "Machine accepted.");
        assert_eq!(Status::Reject.to_string(), "Machine rejected.");
        assert_eq!(Status::Halt.to_string(), "Machine halted.");
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::FormatError("empty symbol field".to_string());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed machine description"));
        assert!(error_msg.contains("empty symbol field"));
    }
}
