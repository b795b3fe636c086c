use std::time::{Duration, Instant};

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use thiserror::Error;

use crate::board::{Board, CELL_COUNT, EMPTY_CELL};
use crate::layout::LayoutKind;

mod difficulty;
mod strategies;

pub use difficulty::difficulty;

use strategies::propagate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("puzzle violates Sudoku constraints")]
    InvalidPuzzle,

    #[error("puzzle has no solution")]
    NoSolution,

    #[error("puzzle has multiple solutions")]
    MultipleSolutions,

    #[error("solver timeout exceeded")]
    Timeout,
}

#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Number of solutions the search is allowed to find. With the default
    /// of 1 the first solution wins; with 2 the search keeps going and a
    /// second solution turns into [SolverError::MultipleSolutions].
    pub max_solutions: usize,

    /// Shuffle the box seeding and the candidate order at every branch
    /// point, turning the solver into a random-board generator.
    pub randomize: bool,

    /// Give up with [SolverError::Timeout] once this much time has passed.
    /// `None` means unbounded.
    pub timeout: Option<Duration>,

    /// Seed for the solver's own random source, so randomized runs can be
    /// reproduced. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            max_solutions: 1,
            randomize: false,
            timeout: None,
            seed: None,
        }
    }
}

/// Solves Sudoku boards by constraint propagation followed by MRV
/// backtracking (always guess in the cell with the fewest candidates).
///
/// The solver works on its own clone of the input board; callers' boards
/// are never mutated.
pub struct Solver {
    board: Board,
    options: SolverOptions,
    rng: StdRng,
    deadline: Option<Instant>,
}

impl Solver {
    pub fn new(board: &Board, options: SolverOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Solver {
            board: board.clone(),
            options,
            rng,
            deadline: None,
        }
    }

    /// Attempts to solve the puzzle, consuming the solver.
    pub fn solve(mut self) -> Result<Board, SolverError> {
        if !self.board.is_valid() {
            return Err(SolverError::InvalidPuzzle);
        }
        self.deadline = self.options.timeout.map(|timeout| Instant::now() + timeout);

        // Counting mode must explore the board exactly as given; seeding
        // boxes below would fabricate clues and undercount.
        if self.options.max_solutions >= 2 {
            return self.solve_counting();
        }

        // Seeding three mutually independent boxes gives the search a random
        // starting point. Sound only for the standard layout, where those
        // boxes share no row, column or region; jigsaw regions may span them.
        if self.board.empty_count() == CELL_COUNT
            && self.board.layout().kind() == LayoutKind::Standard
        {
            self.fill_three_boxes();
        }

        propagate(&mut self.board)?;
        if self.board.empty_count() == 0 {
            return Ok(self.board);
        }

        if self.backtrack()? {
            Ok(self.board)
        } else {
            Err(SolverError::NoSolution)
        }
    }

    /// Recursive MRV backtracking with propagation at every node.
    /// `Ok(true)` leaves the solved board in `self.board`; `Ok(false)`
    /// restores the board to the state the caller passed in.
    fn backtrack(&mut self) -> Result<bool, SolverError> {
        self.check_deadline()?;

        // Propagation fills cells all over the board, so a failed branch
        // restores from a snapshot rather than un-placing individual digits.
        let snapshot = self.board.clone();
        if propagate(&mut self.board).is_err() {
            self.board = snapshot;
            return Ok(false);
        }

        let Some((pos, mut candidates)) = find_mrv_cell(&self.board) else {
            return Ok(true); // no empty cell left
        };
        if candidates.is_empty() {
            self.board = snapshot;
            return Ok(false);
        }
        if self.options.randomize {
            candidates.shuffle(&mut self.rng);
        }

        for val in candidates {
            self.board.set_force(pos, val);
            match self.backtrack() {
                Ok(true) => return Ok(true),
                Ok(false) => self.board.clear_force(pos),
                Err(err) => return Err(err),
            }
        }
        self.board = snapshot;
        Ok(false)
    }

    /// Counts solutions up to `max_solutions` and maps the count onto the
    /// solve result: the unique solution, or an error on zero or several.
    fn solve_counting(mut self) -> Result<Board, SolverError> {
        let mut count = 0;
        let mut first = None;
        let start = self.board.clone();
        self.count_solutions(&start, &mut count, &mut first)?;

        match first {
            None => Err(SolverError::NoSolution),
            Some(solution) if count == 1 => Ok(solution),
            Some(_) => Err(SolverError::MultipleSolutions),
        }
    }

    fn count_solutions(
        &mut self,
        board: &Board,
        count: &mut usize,
        first: &mut Option<Board>,
    ) -> Result<(), SolverError> {
        self.check_deadline()?;

        let mut node = board.clone();
        if propagate(&mut node).is_err() {
            return Ok(()); // contradiction: nothing below this node
        }
        if node.empty_count() == 0 {
            *count += 1;
            if first.is_none() {
                *first = Some(node);
            }
            return Ok(());
        }

        if let Some((pos, candidates)) = find_mrv_cell(&node) {
            for val in candidates {
                if *count >= self.options.max_solutions {
                    break;
                }
                let mut child = node.clone();
                child.set_force(pos, val);
                self.count_solutions(&child, count, first)?;
            }
        }
        Ok(())
    }

    fn check_deadline(&self) -> Result<(), SolverError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SolverError::Timeout),
            _ => Ok(()),
        }
    }

    /// Fills the three diagonal 3×3 boxes, each with a permutation of 1-9.
    /// The box columns and the digits are shuffled when randomizing.
    fn fill_three_boxes(&mut self) {
        let mut box_cols = [0usize, 3, 6];
        if self.options.randomize {
            box_cols.shuffle(&mut self.rng);
        }
        let mut digits: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

        for (band, box_row) in [0usize, 3, 6].into_iter().enumerate() {
            if self.options.randomize {
                digits.shuffle(&mut self.rng);
            }
            for (i, &val) in digits.iter().enumerate() {
                let pos = (box_row + i / 3) * 9 + box_cols[band] + i % 3;
                self.board.set_force(pos, val);
            }
        }
    }
}

/// Finds the empty cell with the fewest candidates, breaking ties by lowest
/// position. Returns `None` when the board has no empty cell. A returned
/// empty candidate list marks a dead end.
pub(crate) fn find_mrv_cell(board: &Board) -> Option<(usize, Vec<u8>)> {
    let mut best: Option<(usize, u32)> = None;

    for pos in 0..CELL_COUNT {
        if board.get(pos) != Some(EMPTY_CELL) {
            continue;
        }
        let count = board.candidates_mask(pos).count_ones();
        if best.map_or(true, |(_, best_count)| count < best_count) {
            best = Some((pos, count));
            if count <= 1 {
                break;
            }
        }
    }
    best.map(|(pos, _)| (pos, board.candidates(pos)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    const EMPTY: &str =
        ".................................................................................";
    const HARD_17_CLUES: &str =
        "000000010400000000020000000000050407008000300001090000300400200050100000000806000";

    #[test]
    fn solves_an_empty_board() {
        let board = Board::from_string(EMPTY, Layout::standard()).unwrap();
        let solved = Solver::new(&board, SolverOptions::default())
            .solve()
            .unwrap();
        assert_eq!(solved.empty_count(), 0);
        assert!(solved.is_valid());
    }

    #[test]
    fn empty_board_has_many_solutions() {
        let board = Board::from_string(EMPTY, Layout::standard()).unwrap();
        let result = Solver::new(
            &board,
            SolverOptions {
                max_solutions: 2,
                ..SolverOptions::default()
            },
        )
        .solve();
        assert_eq!(result, Err(SolverError::MultipleSolutions));
    }

    #[test]
    fn solves_a_hard_17_clue_puzzle_deterministically() {
        let board = Board::from_string(HARD_17_CLUES, Layout::standard()).unwrap();

        let solved = Solver::new(&board, SolverOptions::default())
            .solve()
            .unwrap();
        assert_eq!(solved.empty_count(), 0);
        assert!(solved.is_valid());
        // Every clue survives into the solution.
        for pos in 0..CELL_COUNT {
            let clue = board.get(pos).unwrap();
            if clue != EMPTY_CELL {
                assert_eq!(solved.get(pos), Some(clue));
            }
        }

        // Non-randomized solving is a pure function of the input.
        let again = Solver::new(&board, SolverOptions::default())
            .solve()
            .unwrap();
        assert_eq!(solved, again);

        // And the solution this instance is known for is unique.
        let counted = Solver::new(
            &board,
            SolverOptions {
                max_solutions: 2,
                ..SolverOptions::default()
            },
        )
        .solve()
        .unwrap();
        assert_eq!(counted, solved);
    }

    #[test]
    fn rejects_an_invalid_puzzle() {
        let mut board = Board::new(Layout::standard());
        board.set_force(0, 1);
        board.set_force(1, 1);
        let result = Solver::new(&board, SolverOptions::default()).solve();
        assert_eq!(result, Err(SolverError::InvalidPuzzle));
    }

    #[test]
    fn detects_an_unsolvable_puzzle() {
        let mut board = Board::new(Layout::standard());
        // Cell 8 sees 1-8 in its row and a 9 in its column.
        for col in 0..8 {
            board.set(col, col as u8 + 1).unwrap();
        }
        board.set(17, 9).unwrap();
        let result = Solver::new(&board, SolverOptions::default()).solve();
        assert_eq!(result, Err(SolverError::NoSolution));
    }

    #[test]
    fn input_board_is_not_mutated() {
        let board = Board::from_string(HARD_17_CLUES, Layout::standard()).unwrap();
        let before = board.clone();
        Solver::new(&board, SolverOptions::default())
            .solve()
            .unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn zero_timeout_reports_timeout() {
        let board = Board::from_string(EMPTY, Layout::standard()).unwrap();
        let result = Solver::new(
            &board,
            SolverOptions {
                timeout: Some(Duration::ZERO),
                ..SolverOptions::default()
            },
        )
        .solve();
        assert_eq!(result, Err(SolverError::Timeout));
    }

    #[test]
    fn randomized_solving_is_reproducible_with_a_seed() {
        let board = Board::from_string(EMPTY, Layout::standard()).unwrap();
        let options = SolverOptions {
            randomize: true,
            seed: Some(42),
            ..SolverOptions::default()
        };
        let first = Solver::new(&board, options.clone()).solve().unwrap();
        let second = Solver::new(&board, options).solve().unwrap();
        assert_eq!(first, second);

        let other_seed = Solver::new(
            &board,
            SolverOptions {
                randomize: true,
                seed: Some(43),
                ..SolverOptions::default()
            },
        )
        .solve()
        .unwrap();
        assert_ne!(first, other_seed);
    }

    #[test]
    fn counting_finds_the_unique_solution_of_a_thin_puzzle() {
        let solved = Solver::new(&Board::new(Layout::standard()), SolverOptions::default())
            .solve()
            .unwrap();

        // Removing one full row plus one cell leaves every hole forced.
        let mut puzzle = solved.clone();
        for pos in 0..10 {
            puzzle.clear(pos).unwrap();
        }
        let counted = Solver::new(
            &puzzle,
            SolverOptions {
                max_solutions: 2,
                ..SolverOptions::default()
            },
        )
        .solve()
        .unwrap();
        assert_eq!(counted, solved);
    }

    #[test]
    fn counting_detects_an_interchangeable_digit_pair() {
        let solved = Solver::new(&Board::new(Layout::standard()), SolverOptions::default())
            .solve()
            .unwrap();

        // Removing every 1 and every 2 leaves (at least) two completions:
        // the original and the one with 1s and 2s swapped.
        let mut puzzle = solved.clone();
        for pos in 0..CELL_COUNT {
            if matches!(puzzle.get(pos), Some(1) | Some(2)) {
                puzzle.clear(pos).unwrap();
            }
        }
        let result = Solver::new(
            &puzzle,
            SolverOptions {
                max_solutions: 2,
                ..SolverOptions::default()
            },
        )
        .solve();
        assert_eq!(result, Err(SolverError::MultipleSolutions));
    }

    #[test]
    fn solves_over_a_jigsaw_layout() {
        use rand::{rngs::StdRng, SeedableRng};

        let layout = Layout::random_jigsaw(&mut StdRng::seed_from_u64(5));
        let board = Board::new(layout);
        let solved = Solver::new(
            &board,
            SolverOptions {
                randomize: true,
                seed: Some(7),
                ..SolverOptions::default()
            },
        )
        .solve()
        .unwrap();
        assert_eq!(solved.empty_count(), 0);
        assert!(solved.is_valid());
    }

    #[test]
    fn mrv_prefers_the_most_constrained_cell() {
        let mut board = Board::new(Layout::standard());
        // Cell 8 is down to a single candidate (9); everything else is
        // looser.
        for col in 0..8 {
            board.set(col, col as u8 + 1).unwrap();
        }
        let (pos, candidates) = find_mrv_cell(&board).unwrap();
        assert_eq!(pos, 8);
        assert_eq!(candidates, vec![9]);
    }
}
