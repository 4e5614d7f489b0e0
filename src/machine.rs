//! This module defines the [`Machine`] struct: a single-tape deterministic
//! Turing machine together with the renaming primitives the composition
//! algebra is built on. A machine is a plain value; cloning produces an
//! independent copy and composition never mutates its operands.

use crate::types::{
    Alphabet, Direction, Reaction, State, Status, Symbol, TapeState, TransitionEntry,
    TransitionTable, BLANK_SYMBOL, DEFAULT_ACCEPT, DEFAULT_HALT, DEFAULT_INITIAL, DEFAULT_TITLE,
};

/// A single-tape deterministic Turing machine.
///
/// The static part is the transition table plus the distinguished
/// `initial`, `accept` and `halt` labels and a `title` (used as the prefix
/// when the machine is embedded into a composite). The run-state (the
/// two-sided tape, the signed head index and the current state) is only
/// meaningful once [`Machine::load_input`] has been called, and is reset by
/// every call, so the same machine can be rerun on fresh input.
///
/// The tape is bi-infinite without pre-allocated infinity: `tape_right`
/// holds cells 0, 1, 2, …; `tape_left` holds cells −1, −2, … at indices
/// 0, 1, …. Whenever the head moves one past either end, the newly exposed
/// cell is materialized as a blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    transitions: TransitionTable,
    initial: State,
    accept: State,
    halt: State,
    title: String,

    tape_right: Vec<Symbol>,
    tape_left: Vec<Symbol>,
    head_index: isize,
    current_state: State,
}

impl Default for Machine {
    fn default() -> Self {
        Machine {
            transitions: TransitionTable::new(),
            initial: DEFAULT_INITIAL.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            halt: DEFAULT_HALT.to_string(),
            title: DEFAULT_TITLE.to_string(),
            tape_right: Vec::new(),
            tape_left: Vec::new(),
            head_index: 0,
            current_state: DEFAULT_INITIAL.to_string(),
        }
    }
}

impl FromIterator<TransitionEntry> for Machine {
    fn from_iter<I: IntoIterator<Item = TransitionEntry>>(entries: I) -> Self {
        Machine::from_transitions(entries)
    }
}

impl Machine {
    /// Creates an empty machine with the default distinguished labels
    /// (`"qStart"`, `"Y"`, `"H"`) and title (`"MyMachine"`).
    pub fn new() -> Self {
        Machine::default()
    }

    /// Creates a machine from any iterable of transition entries. Covers
    /// both literal lists and generated ranges.
    pub fn from_transitions<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = TransitionEntry>,
    {
        let mut machine = Machine::new();
        machine.add_transitions(entries);
        machine
    }

    /// Inserts a single transition, replacing any existing entry for the
    /// same `(state, symbol)` key.
    pub fn add_transition(&mut self, key: TapeState, reaction: Reaction) {
        self.transitions.insert(key, reaction);
    }

    /// Merges a batch of transitions into the table. Entries already
    /// present are kept; use [`Machine::add_transition`] to override a
    /// single key.
    pub fn add_transitions<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = TransitionEntry>,
    {
        for (key, reaction) in entries {
            self.transitions.entry(key).or_insert(reaction);
        }
    }

    /// For each symbol of `alphabet`, installs `(from, s) → ((to, s), Hold)`,
    /// turning `from` into a through-state. Prior transitions from other
    /// states are untouched; applying the same redirect twice is a no-op.
    pub fn redirect_state(&mut self, from: &str, to: &str, alphabet: &Alphabet) {
        for &symbol in alphabet {
            self.add_transition(
                (from.to_string(), symbol),
                Reaction::new(to, symbol, Direction::Hold),
            );
        }
    }

    /// Renames the initial state.
    pub fn set_initial(&mut self, name: &str) {
        self.initial = name.to_string();
    }

    /// Renames the accept state.
    pub fn set_accept(&mut self, name: &str) {
        self.accept = name.to_string();
    }

    /// Sets the title, i.e. the prefix this machine will carry when
    /// embedded into a composite.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// The initial state label.
    pub fn initial_state(&self) -> &str {
        &self.initial
    }

    /// The accept state label.
    pub fn accept_state(&self) -> &str {
        &self.accept
    }

    /// The halt state label (neutral termination).
    pub fn halt_state(&self) -> &str {
        &self.halt
    }

    /// The machine title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The transition table.
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// The state the machine is currently in. Meaningful once input has
    /// been loaded; after a `Reject` it still names the state the machine
    /// was stuck in.
    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    /// The signed index of the cell under the head.
    pub fn head_index(&self) -> isize {
        self.head_index
    }

    /// Returns a machine with every state label rewritten by `callback`.
    /// All occurrences are rewritten: table keys, reaction targets, and the
    /// `initial`, `accept` and `halt` labels. The title is preserved and
    /// the run-state of the result is unpopulated.
    pub fn transform_states<F>(&self, callback: F) -> Machine
    where
        F: Fn(&str) -> State,
    {
        let transitions = self
            .transitions
            .iter()
            .map(|((state, symbol), reaction)| {
                (
                    (callback(state), *symbol),
                    Reaction::new(callback(&reaction.state), reaction.write, reaction.direction),
                )
            })
            .collect();

        let mut result = Machine {
            transitions,
            initial: callback(&self.initial),
            accept: callback(&self.accept),
            halt: callback(&self.halt),
            title: self.title.clone(),
            ..Machine::default()
        };
        result.current_state = result.initial.clone();
        result
    }

    /// Returns a copy with every state label `q` renamed to `"[prefix]q"`.
    pub fn prefix(&self, prefix: &str) -> Machine {
        self.transform_states(|state| format!("[{}]{}", prefix, state))
    }

    /// Returns a copy prefixed by its own title. This is the hygiene step
    /// composition relies on: machines with distinct titles end up with
    /// disjoint state spaces, so merging their tables cannot collide.
    pub fn prefixed(&self) -> Machine {
        self.prefix(&self.title)
    }

    /// Resets the run-state: the current state becomes `initial`, the head
    /// returns to cell 0 and the tape holds `input` (a single blank when
    /// `input` is empty).
    pub fn load_input(&mut self, input: &str) {
        self.current_state = self.initial.clone();
        self.head_index = 0;
        self.tape_left = Vec::new();

        if input.is_empty() {
            self.tape_right = vec![BLANK_SYMBOL];
        } else {
            self.tape_right = input.chars().collect();
        }
    }

    /// Executes one step.
    ///
    /// Looks up `(current_state, symbol_under_head)`. A missing entry
    /// returns [`Status::Reject`] without touching the tape or the state.
    /// Otherwise the reaction is applied atomically: the write symbol
    /// replaces the cell under the head, the machine enters the next state,
    /// the head moves, and a blank is materialized if the head now sits one
    /// past either end of the tape.
    pub fn step(&mut self) -> Status {
        if self.tape_right.is_empty() {
            self.tape_right.push(BLANK_SYMBOL);
        }

        let symbol = self.symbol_under_head();
        let reaction = match self.transitions.get(&(self.current_state.clone(), symbol)) {
            Some(reaction) => reaction.clone(),
            None => return Status::Reject,
        };

        self.write_under_head(reaction.write);
        self.current_state = reaction.state;
        self.head_index += reaction.direction.offset();

        if self.head_index == self.tape_right.len() as isize {
            self.tape_right.push(BLANK_SYMBOL);
        }
        if -self.head_index - 1 == self.tape_left.len() as isize {
            self.tape_left.push(BLANK_SYMBOL);
        }

        if self.current_state == self.accept {
            Status::Accept
        } else if self.current_state == self.halt {
            Status::Halt
        } else {
            Status::Running
        }
    }

    /// Steps until a terminal status or until `max_steps` is exhausted,
    /// returning the last status (still `Running` when the limit ran out).
    pub fn run(&mut self, max_steps: usize) -> Status {
        let mut status = Status::Running;
        for _ in 0..max_steps {
            status = self.step();
            if status.is_terminal() {
                break;
            }
        }
        status
    }

    /// The materialized tape content, left to right.
    pub fn tape(&self) -> String {
        self.tape_left
            .iter()
            .rev()
            .chain(self.tape_right.iter())
            .collect()
    }

    /// A one-line rendering of the head position: blanks with a caret at
    /// the head, followed by the current state in parentheses.
    pub fn head(&self) -> String {
        let left_len = self.tape_left.len() as isize;
        let right_len = self.tape_right.len() as isize;

        let before = (left_len + self.head_index).max(0) as usize;
        let after = (right_len - self.head_index - 1).max(0) as usize;

        format!(
            "{}v{} ({})",
            "_".repeat(before),
            "_".repeat(after),
            self.current_state
        )
    }

    fn symbol_under_head(&self) -> Symbol {
        if self.head_index >= 0 {
            self.tape_right[self.head_index as usize]
        } else {
            self.tape_left[(-self.head_index - 1) as usize]
        }
    }

    fn write_under_head(&mut self, symbol: Symbol) {
        if self.head_index >= 0 {
            self.tape_right[self.head_index as usize] = symbol;
        } else {
            self.tape_left[(-self.head_index - 1) as usize] = symbol;
        }
    }
}
