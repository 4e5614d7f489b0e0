//! This module implements the composition algebra: operators that assemble
//! small named machines into larger ones. All operators are closed over
//! [`Machine`], take their operands by reference and never mutate them.
//!
//! State-name hygiene rests on title prefixing: a machine embedded into a
//! composite is first renamed by its own title, so machines with distinct
//! titles contribute disjoint state spaces and their tables merge without
//! collisions. [`multiunion`] is the deliberate exception: it merges
//! tables *without* renaming, for callers whose machines share an agreed
//! entry/exit protocol.

use crate::machine::Machine;
use crate::types::{Alphabet, Direction, MachineError, Reaction, Symbol};

/// The loop variant of [`repeat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeater {
    /// Rerun the body while the guard symbol is under the head.
    DoWhile,
    /// Rerun the body until the guard symbol is under the head.
    DoUntil,
}

/// The loop-check state introduced by [`repeat`].
const CHECK_STATE: &str = "check";
/// The loop-exit state introduced by [`repeat`]; becomes the accept state.
const BREAK_STATE: &str = "break";

/// Sequential composition of two machines.
///
/// Both operands are prefixed by their titles (disjointing their state
/// spaces), the first machine's accept state is redirected to the second's
/// initial state over `alphabet`, and the tables are merged. The result
/// starts in the first machine's initial state, accepts in the second's
/// accept state, and carries `title`.
///
/// Operands combined this way must carry distinct titles.
pub fn concat(first: &Machine, second: &Machine, alphabet: &Alphabet, title: &str) -> Machine {
    let mut result = first.prefixed();
    let second = second.prefixed();

    let join = result.accept_state().to_string();
    result.redirect_state(&join, second.initial_state(), alphabet);
    result.add_transitions(second.transitions().clone());
    result.set_accept(second.accept_state());
    result.set_title(title);

    result
}

/// Sequential composition of a nonempty sequence of machines: a left fold
/// of [`concat`], starting from the prefixed first element. Each successor
/// is prefixed exactly once as it is folded in.
///
/// # Errors
///
/// Returns [`MachineError::EmptySequence`] when `machines` yields nothing.
pub fn multiconcat<I>(machines: I, alphabet: &Alphabet, title: &str) -> Result<Machine, MachineError>
where
    I: IntoIterator<Item = Machine>,
{
    let mut machines = machines.into_iter();
    let first = machines.next().ok_or(MachineError::EmptySequence)?;

    let mut result = first.prefixed();
    for machine in machines {
        let successor = machine.prefixed();

        let join = result.accept_state().to_string();
        result.redirect_state(&join, successor.initial_state(), alphabet);
        result.add_transitions(successor.transitions().clone());
        result.set_accept(successor.accept_state());
    }

    result.set_title(title);
    Ok(result)
}

/// Merges a nonempty sequence of machines into one transition table,
/// without renaming and without redirecting accept states.
///
/// Callers are expected to have disambiguated state names already: either
/// the operands were built from independently prefixed sub-constructions,
/// or they deliberately share entry and exit labels (as the recognizers
/// emitted by [`crate::builders::expect`] do). On overlapping keys the
/// earlier machine's entry wins. The result inherits `initial` and
/// `accept` from the first machine.
///
/// # Errors
///
/// Returns [`MachineError::EmptySequence`] when `machines` yields nothing.
pub fn multiunion<I>(machines: I, title: &str) -> Result<Machine, MachineError>
where
    I: IntoIterator<Item = Machine>,
{
    let mut machines = machines.into_iter();
    let mut result = machines.next().ok_or(MachineError::EmptySequence)?;

    for machine in machines {
        result.add_transitions(machine.transitions().clone());
    }

    result.set_title(title);
    Ok(result)
}

/// Loops `body`, checking the symbol under the head each time the body
/// accepts, and once before the first iteration, so zero iterations are
/// possible.
///
/// `DoUntil` exits when the guard symbol is seen at a check and otherwise
/// reruns the body; `DoWhile` is the mirror image. The construction embeds
/// a prefixed copy of the body, redirects its accept state into a fresh
/// `check` state, installs a blanket redirect out of `check`, and then
/// overrides the single `(check, guard)` entry; the override must come
/// after the blanket redirect. The fresh `break` state becomes the accept
/// state and `check` the initial state.
pub fn repeat(
    body: &Machine,
    variant: Repeater,
    guard: Symbol,
    alphabet: &Alphabet,
    name: &str,
) -> Machine {
    // Embed a renamed working copy of the body.
    let mut result = body.prefixed();
    result.set_title(name);

    let body_initial = result.initial_state().to_string();
    let body_accept = result.accept_state().to_string();

    result.redirect_state(&body_accept, CHECK_STATE, alphabet);

    let (blanket_target, guard_target) = match variant {
        Repeater::DoUntil => (body_initial.as_str(), BREAK_STATE),
        Repeater::DoWhile => (BREAK_STATE, body_initial.as_str()),
    };
    result.redirect_state(CHECK_STATE, blanket_target, alphabet);
    result.add_transition(
        (CHECK_STATE.to_string(), guard),
        Reaction::new(guard_target, guard, Direction::Hold),
    );

    result.set_initial(CHECK_STATE);
    result.set_accept(BREAK_STATE);
    result
}
