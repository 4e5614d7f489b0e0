//! This crate provides a single-tape, deterministic Turing machine
//! simulator together with an algebraic machine combinator library.
//! Small named machines such as movers, finders, consumers and sequence
//! matchers are assembled by prefixing, redirection, concatenation, union and
//! looping into large monolithic machines that decide a language. The
//! `puzzle` module uses the library to build a decider for a 4×4
//! Latin-square puzzle with edge visibility clues.

pub mod builders;
pub mod compose;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod puzzle;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest`
/// grammar and the parse-error type.
pub use crate::parser::Rule;
/// Re-exports the construction helpers.
pub use builders::{
    consume, consume_right, expect, find, find_left, find_right, move_left, move_right, mover,
    union_of_sequences,
};
/// Re-exports the composition operators.
pub use compose::{concat, multiconcat, multiunion, repeat, Repeater};
/// Re-exports the textual-format writer.
pub use encoder::encode;
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `Machine` struct from the machine module.
pub use machine::Machine;
/// Re-exports the textual-format reader.
pub use parser::parse;
/// Re-exports the core data types and the reserved default labels.
pub use types::{
    Alphabet, Direction, MachineError, Reaction, State, Status, Symbol, TapeState,
    TransitionEntry, TransitionTable, BLANK_SYMBOL, DEFAULT_ACCEPT, DEFAULT_HALT, DEFAULT_INITIAL,
    DEFAULT_TITLE,
};
