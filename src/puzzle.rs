//! A decider for a 4×4 Latin-square puzzle with edge visibility clues,
//! assembled entirely from the combinator library. Every cell holds a
//! digit 1–4; each digit appears once per row and once per column; a clue
//! on an edge states how many "towers" are visible looking along its row
//! or column, where a tower hides every shorter tower behind it.
//!
//! The decider works on a flat tape encoding of the grid:
//!
//! ```text
//! index:  0 1 2  3  4  5  6 7   8 9  10 11 12 13 14 15   ...   40 41 42 43 44
//! cell:   _ _ t₁ t₂ t₃ t₄ _ _   : L₁ a  b  c  d  :  R₁   ...   #  b₁ b₂ b₃ b₄
//! ```
//!
//! i.e. a top-clue block `__tttt__`, four 8-cell row blocks `:LddddR`
//! (left clue, the row's digits, separator, right clue), a `#` terminator
//! and the four bottom clues. The row stride is 8, so column `j`'s digits
//! sit at 10+j, 18+j, 26+j and 34+j, the top clue 8 cells above the
//! column's first digit and the bottom clue 7 cells below its last.
//!
//! Each checker is position-independent within the tape (it first seeks a
//! landmark), verifies one constraint family, and parks the head back near
//! the tape start so the checkers concatenate in any order.

use crate::builders::{
    consume_right, find_left, find_right, move_left, move_right, union_of_sequences,
};
use crate::compose::{multiconcat, repeat, Repeater};
use crate::machine::Machine;
use crate::types::{Alphabet, Direction, MachineError, Symbol, DEFAULT_ACCEPT};
use itertools::Itertools;
use lazy_static::lazy_static;

/// Grid side length.
pub const SIZE: usize = 4;

lazy_static! {
    /// The puzzle alphabet: the four digits, the two separators, the blank.
    pub static ref ALPHABET: Alphabet = "1234:#_".chars().collect();
}

/// A puzzle instance: a fully filled grid plus the visibility clues on all
/// four edges. Clues are stored as tape symbols (`'1'`–`'4'`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub grid: [[Symbol; SIZE]; SIZE],
    pub top: [Symbol; SIZE],
    pub bottom: [Symbol; SIZE],
    pub left: [Symbol; SIZE],
    pub right: [Symbol; SIZE],
}

impl Puzzle {
    /// Builds an instance whose clues are derived from the grid itself.
    /// The grid is taken as-is; a deliberately inconsistent instance can be
    /// made by mutating the result.
    pub fn from_grid(grid: [[Symbol; SIZE]; SIZE]) -> Puzzle {
        let mut puzzle = Puzzle {
            grid,
            top: ['_'; SIZE],
            bottom: ['_'; SIZE],
            left: ['_'; SIZE],
            right: ['_'; SIZE],
        };

        for i in 0..SIZE {
            let row: Vec<Symbol> = grid[i].to_vec();
            let column: Vec<Symbol> = (0..SIZE).map(|k| grid[k][i]).collect();

            puzzle.left[i] = clue_symbol(visible_towers(&row));
            puzzle.right[i] = clue_symbol(visible_towers(&reversed(&row)));
            puzzle.top[i] = clue_symbol(visible_towers(&column));
            puzzle.bottom[i] = clue_symbol(visible_towers(&reversed(&column)));
        }

        puzzle
    }

    /// Renders the instance as a simulator input string, in the tape layout
    /// described in the module documentation.
    pub fn tape(&self) -> String {
        let mut out = String::from("__");
        out.extend(self.top);
        out.push_str("__");

        for i in 0..SIZE {
            out.push(':');
            out.push(self.left[i]);
            out.extend(self.grid[i]);
            out.push(':');
            out.push(self.right[i]);
        }

        out.push('#');
        out.extend(self.bottom);
        out
    }
}

/// How many towers are visible looking along `heights` from its start: a
/// tower is visible iff it is taller than everything before it.
pub fn visible_towers(heights: &[Symbol]) -> usize {
    let mut tallest_seen = None;
    let mut visible = 0;
    for &height in heights {
        if Some(height) > tallest_seen {
            tallest_seen = Some(height);
            visible += 1;
        }
    }
    visible
}

fn clue_symbol(count: usize) -> Symbol {
    (b'0' + count as u8) as char
}

fn reversed(sequence: &[Symbol]) -> Vec<Symbol> {
    sequence.iter().rev().copied().collect()
}

/// All 24 orderings of the digits 1–4: the valid contents of any row or
/// column.
pub fn digit_permutations() -> Vec<Vec<Symbol>> {
    "1234".chars().permutations(SIZE).collect()
}

/// Patterns `[clue, p₀, p₁, p₂]` for every permutation `p`, where the clue
/// is the visibility of `p` from its front. The fourth digit is implied by
/// the first three, so matching the clue and three digits pins the whole
/// line. Shared by the left-edge and top-edge checkers; only the carrier
/// distances differ.
fn front_view_sequences() -> Vec<Vec<Symbol>> {
    digit_permutations()
        .into_iter()
        .map(|p| vec![clue_symbol(visible_towers(&p)), p[0], p[1], p[2]])
        .collect()
}

/// Patterns `[p₁, p₂, p₃, ':', clue]` matching the tail of a row block up
/// to and including its right clue, for every permutation `p` read as the
/// row's digits. The clue is the visibility of the row from the right.
fn right_view_sequences() -> Vec<Vec<Symbol>> {
    digit_permutations()
        .into_iter()
        .map(|p| {
            let clue = clue_symbol(visible_towers(&reversed(&p)));
            vec![p[1], p[2], p[3], ':', clue]
        })
        .collect()
}

/// Patterns `[p₁, p₂, p₃, clue]` matching a column's last three digits and
/// its bottom clue, for every permutation `p` read top to bottom.
fn bottom_view_sequences() -> Vec<Vec<Symbol>> {
    digit_permutations()
        .into_iter()
        .map(|p| {
            let clue = clue_symbol(visible_towers(&reversed(&p)));
            vec![p[1], p[2], p[3], clue]
        })
        .collect()
}

/// Accepts iff every row of the grid is a permutation of 1–4.
///
/// Seeks the first row separator, then loops over row blocks while a `':'`
/// is under the head at the end of a block: step over the separator and
/// the left clue, recognize the four digits as one of the 24 permutations,
/// and advance to the next block's separator. The loop falls off the last
/// block onto `'#'`. Finally the head parks back at the first separator.
pub fn check_rows() -> Result<Machine, MachineError> {
    let row_digits = union_of_sequences(
        &digit_permutations(),
        Direction::Right,
        &[1, 1, 1],
        &ALPHABET,
        "row_digits",
    )?;

    let body = multiconcat(
        [
            consume_right(':', "pass"),
            move_right(1, &ALPHABET, "skip_clue"),
            row_digits,
            move_right(2, &ALPHABET, "next_row"),
        ],
        &ALPHABET,
        "row_body",
    )?;

    multiconcat(
        [
            find_right(':', &ALPHABET, "seek_row"),
            repeat(&body, Repeater::DoWhile, ':', &ALPHABET, "row_loop"),
            find_left('_', &ALPHABET, "rewind"),
            consume_right('_', "park"),
        ],
        &ALPHABET,
        "check_rows",
    )
}

/// Accepts iff every column of the grid is a permutation of 1–4.
///
/// Positions the head on the first column's top digit, then per iteration
/// recognizes four digits at row stride (8 cells apart) and backs up 24
/// cells, landing on the next column's top digit. After the fourth column
/// that landing cell is the first row's inner `':'`, which ends the loop.
pub fn check_cols() -> Result<Machine, MachineError> {
    let column_digits = union_of_sequences(
        &digit_permutations(),
        Direction::Right,
        &[8, 8, 8],
        &ALPHABET,
        "column_digits",
    )?;

    let body = multiconcat(
        [column_digits, move_left(24, &ALPHABET, "next_column")],
        &ALPHABET,
        "column_body",
    )?;

    multiconcat(
        [
            find_right(':', &ALPHABET, "seek_col"),
            consume_right(':', "pass"),
            move_right(1, &ALPHABET, "skip_clue"),
            repeat(&body, Repeater::DoUntil, ':', &ALPHABET, "column_loop"),
            find_left('_', &ALPHABET, "rewind"),
            consume_right('_', "park"),
        ],
        &ALPHABET,
        "check_cols",
    )
}

/// Accepts iff every row matches its left and right visibility clues.
///
/// Per row block: step over the separator onto the left clue, match
/// `[clue, a, b, c]` against the 24 consistent front-view patterns, back
/// up two cells, then match `[b, c, d, ':', clue]` against the consistent
/// rear-view patterns, which walks the head onto the next block's
/// separator.
pub fn towers_rows() -> Result<Machine, MachineError> {
    let left_views = union_of_sequences(
        &front_view_sequences(),
        Direction::Right,
        &[1, 1, 1],
        &ALPHABET,
        "left_views",
    )?;
    let right_views = union_of_sequences(
        &right_view_sequences(),
        Direction::Right,
        &[1, 1, 1, 1],
        &ALPHABET,
        "right_views",
    )?;

    let body = multiconcat(
        [
            consume_right(':', "pass"),
            left_views,
            move_left(2, &ALPHABET, "back_up"),
            right_views,
        ],
        &ALPHABET,
        "view_row_body",
    )?;

    multiconcat(
        [
            find_right(':', &ALPHABET, "seek_row"),
            repeat(&body, Repeater::DoWhile, ':', &ALPHABET, "view_row_loop"),
            find_left('_', &ALPHABET, "rewind"),
            consume_right('_', "park"),
        ],
        &ALPHABET,
        "towers_rows",
    )
}

/// Accepts iff every column matches its top and bottom visibility clues.
///
/// Seeks the `'#'` terminator and backs up 38 cells onto the first top
/// clue. Per iteration: match `[clue, x₀, x₁, x₂]` down the column at row
/// stride, drop back to the column's second digit, match `[x₁, x₂, x₃,
/// clue]` through the bottom clue (7 cells past the last digit), and back
/// up 39 cells onto the next top clue. After the fourth column that
/// landing cell is the blank before the first row block, which ends the
/// loop.
pub fn towers_cols() -> Result<Machine, MachineError> {
    let top_views = union_of_sequences(
        &front_view_sequences(),
        Direction::Right,
        &[8, 8, 8],
        &ALPHABET,
        "top_views",
    )?;
    let bottom_views = union_of_sequences(
        &bottom_view_sequences(),
        Direction::Right,
        &[8, 8, 7],
        &ALPHABET,
        "bottom_views",
    )?;

    let body = multiconcat(
        [
            top_views,
            move_left(9, &ALPHABET, "drop_down"),
            bottom_views,
            move_left(39, &ALPHABET, "next_column"),
        ],
        &ALPHABET,
        "view_column_body",
    )?;

    multiconcat(
        [
            find_right('#', &ALPHABET, "seek_end"),
            move_left(38, &ALPHABET, "seek_top"),
            repeat(&body, Repeater::DoUntil, '_', &ALPHABET, "view_column_loop"),
            find_left('_', &ALPHABET, "rewind"),
            consume_right('_', "park"),
        ],
        &ALPHABET,
        "towers_cols",
    )
}

/// The full decider: all four constraint families in sequence, with the
/// accept state canonicalized to the default `"Y"` label.
pub fn solver() -> Result<Machine, MachineError> {
    let mut solver = multiconcat(
        [check_rows()?, check_cols()?, towers_rows()?, towers_cols()?],
        &ALPHABET,
        "solver",
    )?;

    let accept = solver.accept_state().to_string();
    solver.redirect_state(&accept, DEFAULT_ACCEPT, &ALPHABET);
    solver.set_accept(DEFAULT_ACCEPT);
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    const STEP_LIMIT: usize = 50_000;

    fn solved_grid() -> [[Symbol; SIZE]; SIZE] {
        [
            ['1', '2', '3', '4'],
            ['2', '1', '4', '3'],
            ['3', '4', '1', '2'],
            ['4', '3', '2', '1'],
        ]
    }

    fn run_on(machine: &mut Machine, input: &str) -> Status {
        machine.load_input(input);
        machine.run(STEP_LIMIT)
    }

    #[test]
    fn test_visible_towers() {
        assert_eq!(visible_towers(&['1', '2', '3', '4']), 4);
        assert_eq!(visible_towers(&['4', '3', '2', '1']), 1);
        assert_eq!(visible_towers(&['2', '1', '4', '3']), 2);
        assert_eq!(visible_towers(&['3', '4', '1', '2']), 2);
    }

    #[test]
    fn test_digit_permutations_are_complete() {
        let permutations = digit_permutations();
        assert_eq!(permutations.len(), 24);
        assert!(permutations.iter().all(|p| p.len() == SIZE));
        assert!(permutations.contains(&vec!['4', '2', '1', '3']));
    }

    #[test]
    fn test_view_sequence_shapes() {
        assert_eq!(front_view_sequences().len(), 24);
        assert_eq!(right_view_sequences().len(), 24);
        assert_eq!(bottom_view_sequences().len(), 24);

        // Ascending row: everything visible from the front, one tower from
        // the rear.
        assert!(front_view_sequences().contains(&vec!['4', '1', '2', '3']));
        assert!(right_view_sequences().contains(&vec!['2', '3', '4', ':', '1']));
        assert!(bottom_view_sequences().contains(&vec!['2', '3', '4', '1']));
    }

    #[test]
    fn test_puzzle_tape_layout() {
        let puzzle = Puzzle::from_grid(solved_grid());
        let tape = puzzle.tape();

        assert_eq!(tape.len(), 45);
        assert_eq!(&tape[0..8], "__4221__");
        assert_eq!(&tape[8..16], ":41234:1");
        assert_eq!(&tape[16..24], ":22143:2");
        assert_eq!(&tape[40..45], "#1224");
    }

    #[test]
    fn test_check_rows_accepts_valid_grid() {
        let mut checker = check_rows().unwrap();
        let tape = Puzzle::from_grid(solved_grid()).tape();
        assert_eq!(run_on(&mut checker, &tape), Status::Accept);
    }

    #[test]
    fn test_check_rows_rejects_duplicate_in_row() {
        let mut grid = solved_grid();
        grid[2][1] = '1'; // row 3 becomes 3,1,1,2
        let mut puzzle = Puzzle::from_grid(solved_grid());
        puzzle.grid = grid;

        let mut checker = check_rows().unwrap();
        assert_eq!(run_on(&mut checker, &puzzle.tape()), Status::Reject);
    }

    #[test]
    fn test_check_cols_accepts_valid_grid() {
        let mut checker = check_cols().unwrap();
        let tape = Puzzle::from_grid(solved_grid()).tape();
        assert_eq!(run_on(&mut checker, &tape), Status::Accept);
    }

    #[test]
    fn test_check_cols_rejects_duplicate_in_column() {
        // Swap two cells inside row 2: every row stays a permutation but
        // two columns now repeat digits.
        let mut grid = solved_grid();
        grid[1][1] = '4';
        grid[1][2] = '1';
        let mut puzzle = Puzzle::from_grid(solved_grid());
        puzzle.grid = grid;

        let mut rows = check_rows().unwrap();
        assert_eq!(run_on(&mut rows, &puzzle.tape()), Status::Accept);

        let mut cols = check_cols().unwrap();
        assert_eq!(run_on(&mut cols, &puzzle.tape()), Status::Reject);
    }

    #[test]
    fn test_towers_rows_accepts_consistent_clues() {
        let mut checker = towers_rows().unwrap();
        let tape = Puzzle::from_grid(solved_grid()).tape();
        assert_eq!(run_on(&mut checker, &tape), Status::Accept);
    }

    #[test]
    fn test_towers_rows_rejects_wrong_left_clue() {
        let mut puzzle = Puzzle::from_grid(solved_grid());
        puzzle.left[0] = '2'; // true visibility of 1,2,3,4 is 4

        let mut checker = towers_rows().unwrap();
        assert_eq!(run_on(&mut checker, &puzzle.tape()), Status::Reject);
    }

    #[test]
    fn test_towers_rows_rejects_wrong_right_clue() {
        let mut puzzle = Puzzle::from_grid(solved_grid());
        puzzle.right[3] = '1'; // true visibility of 1,2,3,4 from the right is 4

        let mut checker = towers_rows().unwrap();
        assert_eq!(run_on(&mut checker, &puzzle.tape()), Status::Reject);
    }

    #[test]
    fn test_towers_cols_accepts_consistent_clues() {
        let mut checker = towers_cols().unwrap();
        let tape = Puzzle::from_grid(solved_grid()).tape();
        assert_eq!(run_on(&mut checker, &tape), Status::Accept);
    }

    #[test]
    fn test_towers_cols_rejects_wrong_top_clue() {
        let mut puzzle = Puzzle::from_grid(solved_grid());
        puzzle.top[0] = '1'; // true visibility of column 1,2,3,4 is 4

        let mut checker = towers_cols().unwrap();
        assert_eq!(run_on(&mut checker, &puzzle.tape()), Status::Reject);
    }

    #[test]
    fn test_towers_cols_rejects_wrong_bottom_clue() {
        let mut puzzle = Puzzle::from_grid(solved_grid());
        puzzle.bottom[3] = '1'; // true visibility of 4,3,2,1 from below is 4

        let mut checker = towers_cols().unwrap();
        assert_eq!(run_on(&mut checker, &puzzle.tape()), Status::Reject);
    }

    #[test]
    fn test_solver_accepts_solved_puzzle() {
        let mut solver = solver().unwrap();
        let tape = Puzzle::from_grid(solved_grid()).tape();

        assert_eq!(run_on(&mut solver, &tape), Status::Accept);
        assert_eq!(solver.current_state(), "Y");
    }

    #[test]
    fn test_solver_rejects_corrupted_cell() {
        let mut grid = solved_grid();
        grid[0][0] = '2';
        let mut puzzle = Puzzle::from_grid(solved_grid());
        puzzle.grid = grid;

        let mut solver = solver().unwrap();
        assert_eq!(run_on(&mut solver, &puzzle.tape()), Status::Reject);
    }

    #[test]
    fn test_solver_rejects_corrupted_clue() {
        let mut puzzle = Puzzle::from_grid(solved_grid());
        puzzle.top[2] = '4'; // true visibility of column 3,4,1,2 is 2

        let mut solver = solver().unwrap();
        assert_eq!(run_on(&mut solver, &puzzle.tape()), Status::Reject);
    }

    #[test]
    fn test_solver_rejects_garbage_input() {
        let mut solver = solver().unwrap();
        assert_eq!(run_on(&mut solver, "12:34"), Status::Reject);

        // With no separator anywhere, the opening search never terminates.
        assert_eq!(run_on(&mut solver, "____"), Status::Running);
    }
}
