//! This module provides the writer for the textual machine format: the
//! exact inverse of [`crate::parser::parse`] on the serialized fields
//! (`transitions`, `initial`, `accept`). The title and halt labels are not
//! serialized.

use crate::machine::Machine;
use crate::types::TapeState;
use std::fmt::Write;

/// Renders a machine as a textual description: the two header lines, a
/// blank line, then each transition as two lines followed by a blank line.
///
/// Entries are emitted in sorted key order, so encoding is deterministic
/// and re-encoding a parsed description reproduces it byte for byte.
pub fn encode(machine: &Machine) -> String {
    let mut out = format!(
        "init: {}\naccept: {}\n",
        machine.initial_state(),
        machine.accept_state()
    );

    let mut keys: Vec<&TapeState> = machine.transitions().keys().collect();
    keys.sort();

    for key in keys {
        let reaction = &machine.transitions()[key];
        let _ = write!(
            out,
            "\n{},{}\n{},{},{}\n",
            key.0,
            key.1,
            reaction.state,
            reaction.write,
            reaction.direction.specifier()
        );
    }

    out
}
