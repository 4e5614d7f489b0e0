//! This module provides the reader for the textual machine format,
//! utilizing the `pest` crate. The grammar lives in `grammar.pest`; see
//! [`crate::encoder`] for the writer.
//!
//! A description consists of an `init:` line, an `accept:` line and any
//! number of two-line transition entries. The title and halt labels are
//! not part of the format: a parsed machine carries the defaults.

use crate::machine::Machine;
use crate::types::{Direction, MachineError, Reaction, Symbol, TapeState};
use pest::iterators::Pair;
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the machine description grammar.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses a textual machine description.
///
/// Parsing is strict on field counts: a missing header, a short entry, an
/// empty symbol field or an unknown direction specifier all fail, and no
/// partially built machine is returned.
pub fn parse(input: &str) -> Result<Machine, MachineError> {
    let root = MachineParser::parse(Rule::machine, input.trim())
        .map_err(|e| MachineError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| MachineError::FormatError("empty machine description".to_string()))?;

    let mut machine = Machine::new();

    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::init_decl => {
                let state = parse_state(pair)?;
                machine.set_initial(&state);
            }
            Rule::accept_decl => {
                let state = parse_state(pair)?;
                machine.set_accept(&state);
            }
            Rule::entry => {
                let (key, reaction) = parse_entry(pair)?;
                machine.add_transition(key, reaction);
            }
            _ => {} // Skip EOI
        }
    }

    Ok(machine)
}

/// Extracts the state name from a header declaration.
fn parse_state(pair: Pair<Rule>) -> Result<String, MachineError> {
    let state = pair
        .into_inner()
        .next()
        .ok_or_else(|| MachineError::FormatError("missing state name".to_string()))?;
    Ok(state.as_str().to_string())
}

/// Parses one two-line transition entry into a table key and its reaction.
fn parse_entry(pair: Pair<Rule>) -> Result<(TapeState, Reaction), MachineError> {
    let mut pairs = pair.into_inner();

    let key = pairs
        .next()
        .ok_or_else(|| MachineError::FormatError("missing transition key line".to_string()))?;
    let reaction = pairs
        .next()
        .ok_or_else(|| MachineError::FormatError("missing reaction line".to_string()))?;

    Ok((parse_key(key)?, parse_reaction(reaction)?))
}

/// Parses the `<state>,<symbol>` key line.
fn parse_key(pair: Pair<Rule>) -> Result<TapeState, MachineError> {
    let mut pairs = pair.into_inner();
    let state = next_string(&mut pairs)?;
    let symbol = parse_symbol(&next_string(&mut pairs)?)?;
    Ok((state, symbol))
}

/// Parses the `<state>,<symbol>,<direction>` reaction line.
fn parse_reaction(pair: Pair<Rule>) -> Result<Reaction, MachineError> {
    let mut pairs = pair.into_inner();
    let state = next_string(&mut pairs)?;
    let write = parse_symbol(&next_string(&mut pairs)?)?;
    let specifier = next_string(&mut pairs)?;

    let direction = specifier
        .chars()
        .next()
        .and_then(Direction::from_specifier)
        .ok_or_else(|| {
            MachineError::FormatError(format!("unknown direction specifier: {specifier:?}"))
        })?;

    Ok(Reaction::new(state, write, direction))
}

/// Interprets a symbol field, which must hold exactly one character.
fn parse_symbol(field: &str) -> Result<Symbol, MachineError> {
    field
        .chars()
        .next()
        .ok_or_else(|| MachineError::FormatError("empty symbol field".to_string()))
}

/// Pulls the next inner pair off the iterator as a string.
fn next_string(pairs: &mut pest::iterators::Pairs<Rule>) -> Result<String, MachineError> {
    pairs
        .next()
        .map(|pair| pair.as_str().to_string())
        .ok_or_else(|| MachineError::FormatError("too few fields".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Status, DEFAULT_TITLE};

    #[test]
    fn test_parse_minimal_machine() {
        let input = "init: qStart\naccept: Y\n\nqStart,_\nY,_,-\n";

        let machine = parse(input).unwrap();
        assert_eq!(machine.initial_state(), "qStart");
        assert_eq!(machine.accept_state(), "Y");
        assert_eq!(machine.transitions().len(), 1);

        let reaction = &machine.transitions()[&("qStart".to_string(), '_')];
        assert_eq!(reaction.state, "Y");
        assert_eq!(reaction.write, '_');
        assert_eq!(reaction.direction, Direction::Hold);
    }

    #[test]
    fn test_parse_header_only_machine() {
        let machine = parse("init: a\naccept: b\n").unwrap();
        assert_eq!(machine.initial_state(), "a");
        assert_eq!(machine.accept_state(), "b");
        assert!(machine.transitions().is_empty());
    }

    #[test]
    fn test_parsed_machine_runs() {
        let input = "\
init: qStart
accept: Y

qStart,a
mid,x,>

mid,b
Y,y,-
";

        let mut machine = parse(input).unwrap();
        machine.load_input("ab");
        assert_eq!(machine.run(8), Status::Accept);
        assert_eq!(machine.tape(), "xy");
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let input = "\
// A machine with commentary.
init: s
accept: t

// The only transition.
s,a
t,a,>

";

        let machine = parse(input).unwrap();
        assert_eq!(machine.transitions().len(), 1);
    }

    #[test]
    fn test_parse_accepts_bracketed_state_names() {
        let input = "init: [outer][inner]qStart\naccept: Y\n\n[outer][inner]qStart,:\nY,:,-\n";

        let machine = parse(input).unwrap();
        assert_eq!(machine.initial_state(), "[outer][inner]qStart");
        assert!(machine
            .transitions()
            .contains_key(&("[outer][inner]qStart".to_string(), ':')));
    }

    #[test]
    fn test_parse_resets_title_to_default() {
        let machine = parse("init: a\naccept: b\n").unwrap();
        assert_eq!(machine.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_parse_rejects_missing_accept_header() {
        let result = parse("init: a\n\nq,a\nr,a,>\n");
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_headers_out_of_order() {
        let result = parse("accept: b\ninit: a\n");
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_short_reaction_line() {
        let result = parse("init: a\naccept: b\n\nq,a\nr,a\n");
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_direction() {
        let result = parse("init: a\naccept: b\n\nq,a\nr,a,^\n");
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_empty_symbol_field() {
        let result = parse("init: a\naccept: b\n\nq,\nr,a,>\n");
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(parse("").is_err());
    }
}
