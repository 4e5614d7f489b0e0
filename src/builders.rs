//! This module provides parameterised builders that lower higher-level
//! intents (move N cells, search for a symbol, match a fixed sequence)
//! into plain transition tables. None of them is primitive: they are
//! clients of the composition layer and emit ordinary [`Machine`] values.

use crate::compose::{concat, multiunion};
use crate::machine::Machine;
use crate::types::{Alphabet, Direction, MachineError, Reaction, Symbol};

/// A straight-line mover: advances the head `amount` cells in `direction`,
/// regardless of tape content. States are `"0"` through `"amount"`, with
/// `"0"` initial and `"amount"` accepting.
pub fn mover(amount: usize, direction: Direction, alphabet: &Alphabet, name: &str) -> Machine {
    let mut machine = Machine::new();
    machine.set_initial("0");

    for &symbol in alphabet {
        for step in 0..amount {
            machine.add_transition(
                (step.to_string(), symbol),
                Reaction::new((step + 1).to_string(), symbol, direction),
            );
        }
    }

    machine.set_accept(&amount.to_string());
    machine.set_title(name);
    machine
}

/// [`mover`] to the right.
pub fn move_right(amount: usize, alphabet: &Alphabet, name: &str) -> Machine {
    mover(amount, Direction::Right, alphabet, name)
}

/// [`mover`] to the left.
pub fn move_left(amount: usize, alphabet: &Alphabet, name: &str) -> Machine {
    mover(amount, Direction::Left, alphabet, name)
}

/// An unbounded search: walks in `direction` until `needle` is under the
/// head, then accepts holding on it. Accepts immediately when the head
/// already sits on the needle. Runs forever on a tape that never shows the
/// needle in that direction; callers bound their runs.
pub fn find(needle: Symbol, direction: Direction, alphabet: &Alphabet, name: &str) -> Machine {
    let mut machine = Machine::new();
    machine.set_initial("search");

    let accept = machine.accept_state().to_string();
    for &symbol in alphabet {
        let found = symbol == needle;
        machine.add_transition(
            ("search".to_string(), symbol),
            Reaction::new(
                if found { accept.as_str() } else { "search" },
                symbol,
                if found { Direction::Hold } else { direction },
            ),
        );
    }

    machine.set_title(name);
    machine
}

/// [`find`] to the right.
pub fn find_right(needle: Symbol, alphabet: &Alphabet, name: &str) -> Machine {
    find(needle, Direction::Right, alphabet, name)
}

/// [`find`] to the left.
pub fn find_left(needle: Symbol, alphabet: &Alphabet, name: &str) -> Machine {
    find(needle, Direction::Left, alphabet, name)
}

/// A single-symbol consumer: matches exactly `symbol` under the head and
/// steps over it in `direction`; any other symbol rejects.
pub fn consume(symbol: Symbol, direction: Direction, name: &str) -> Machine {
    let mut machine = Machine::new();
    machine.add_transition(
        (machine.initial_state().to_string(), symbol),
        Reaction::new(machine.accept_state(), symbol, direction),
    );
    machine.set_title(name);
    machine
}

/// [`consume`] to the right.
pub fn consume_right(symbol: Symbol, name: &str) -> Machine {
    consume(symbol, Direction::Right, name)
}

/// A linear recognizer for one fixed, possibly sparse sequence of symbols.
///
/// The machine consumes `sequence[0]`, then for each following element
/// shifts the head `distances[i]` cells in `direction` and consumes
/// `sequence[i + 1]`; it accepts with the head one cell past the last
/// match. A missing distance counts as 1, so a dense pattern needs
/// `distances` of all ones (or, equivalently, `sequence.len() - 1` ones).
///
/// Internally the sequence is lowered to a chain of carriers, one per
/// element: `concat(consume(sᵢ), mover(distancesᵢ − 1))`, each prefixed by
/// the *consumed prefix* of the sequence rather than by a per-call
/// gensym. Carriers are chained by single hold transitions keyed on the
/// next expected symbol, the entry is a hold transition keyed on
/// `sequence[0]`, and the final carrier's accept state is redirected to
/// the machine's accept label.
///
/// That naming scheme is what makes these recognizers unionable: two
/// `expect` machines built over the same `distances` share the carriers
/// (and chaining entries) for every common prefix, so
/// [`union_of_sequences`] merges them into a deterministic trie that
/// branches on the first differing symbol.
///
/// `sequence` must be nonempty.
pub fn expect(
    sequence: &[Symbol],
    direction: Direction,
    distances: &[usize],
    alphabet: &Alphabet,
    name: &str,
) -> Machine {
    let mut machine = Machine::new();
    machine.set_title(name);

    let carriers: Vec<Machine> = sequence
        .iter()
        .enumerate()
        .map(|(position, &symbol)| {
            let consumed: String = sequence[..=position].iter().collect();
            let shift = distances.get(position).copied().unwrap_or(1) - 1;
            concat(
                &consume(symbol, direction, "match"),
                &mover(shift, direction, alphabet, "shift"),
                alphabet,
                &consumed,
            )
            .prefixed()
        })
        .collect();

    for carrier in &carriers {
        machine.add_transitions(carrier.transitions().clone());
    }

    // Entry protocol: branch out of the shared initial state on the first
    // symbol, without moving the head.
    machine.add_transition(
        (machine.initial_state().to_string(), sequence[0]),
        Reaction::new(carriers[0].initial_state(), sequence[0], Direction::Hold),
    );

    // Chain carriers on the next expected symbol. Keyed single transitions,
    // not blanket redirects: recognizers sharing a prefix must still branch
    // where their sequences diverge.
    for (position, pair) in carriers.windows(2).enumerate() {
        let symbol = sequence[position + 1];
        machine.add_transition(
            (pair[0].accept_state().to_string(), symbol),
            Reaction::new(pair[1].initial_state(), symbol, Direction::Hold),
        );
    }

    // Exit protocol: the full-prefix carrier is unique to this sequence,
    // so a blanket redirect into the shared accept label cannot collide.
    let exit = carriers[carriers.len() - 1].accept_state().to_string();
    let accept = machine.accept_state().to_string();
    machine.redirect_state(&exit, &accept, alphabet);

    machine
}

/// A recognizer accepting any one of a finite set of fixed patterns, all
/// laid out with the same `distances`: the union of one [`expect`] per
/// sequence. Shared prefixes collapse into shared carriers.
///
/// # Errors
///
/// Returns [`MachineError::EmptySequence`] when `sequences` is empty.
pub fn union_of_sequences(
    sequences: &[Vec<Symbol>],
    direction: Direction,
    distances: &[usize],
    alphabet: &Alphabet,
    name: &str,
) -> Result<Machine, MachineError> {
    multiunion(
        sequences
            .iter()
            .map(|sequence| expect(sequence, direction, distances, alphabet, name)),
        name,
    )
}
