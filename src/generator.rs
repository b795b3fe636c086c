use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use thiserror::Error;

use crate::board::{Board, CELL_COUNT, EMPTY_CELL};
use crate::layout::Layout;
use crate::solver::{Solver, SolverError, SolverOptions};

pub const MIN_CLUE_COUNT: usize = 17;
pub const MAX_CLUE_COUNT: usize = 80;
pub const DEFAULT_CLUE_COUNT: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("clue count must be between {MIN_CLUE_COUNT} and {MAX_CLUE_COUNT}, got {0}")]
    InvalidClueCount(usize),

    #[error("failed to generate a valid puzzle before the timeout")]
    GenerationFailed,
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Number of filled cells the puzzle keeps, in `17..=80`.
    pub clue_count: usize,

    /// Budget for the whole generation loop, retries included.
    pub timeout: Duration,

    /// Seed for reproducible puzzles; 0 seeds from OS entropy.
    pub seed: u64,

    /// Verify after every removed cell that exactly one solution remains,
    /// restoring the cell otherwise.
    pub ensure_unique: bool,

    /// Region structure to generate for. `None` means the standard layout.
    pub layout: Option<Arc<Layout>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            clue_count: DEFAULT_CLUE_COUNT,
            timeout: Duration::from_secs(10),
            seed: 0,
            ensure_unique: true,
            layout: None,
        }
    }
}

/// Produces (puzzle, solution) pairs by solving an empty board with a
/// randomized solver and then digging cells back out of the solution.
pub struct Generator {
    options: GeneratorOptions,
    layout: Arc<Layout>,
    rng: StdRng,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        let rng = if options.seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(options.seed)
        };
        let layout = options.layout.clone().unwrap_or_else(Layout::standard);
        Generator {
            options,
            layout,
            rng,
        }
    }

    /// Generates a new puzzle together with its solution.
    ///
    /// Attempts are retried until one succeeds or the timeout budget is
    /// spent. A dig that cannot reach the requested clue count (because
    /// uniqueness kept too many cells in place) fails the whole attempt;
    /// the next attempt starts over from a fresh solution.
    pub fn generate(&mut self) -> Result<(Board, Board), GeneratorError> {
        if !(MIN_CLUE_COUNT..=MAX_CLUE_COUNT).contains(&self.options.clue_count) {
            return Err(GeneratorError::InvalidClueCount(self.options.clue_count));
        }

        let deadline = Instant::now() + self.options.timeout;
        while Instant::now() < deadline {
            let Ok(solution) = self.generate_solution() else {
                continue;
            };
            let Some(puzzle) = self.remove_cells(&solution) else {
                continue;
            };
            if self.options.ensure_unique && !self.has_unique_solution(&puzzle) {
                continue;
            }
            return Ok((puzzle, solution));
        }
        Err(GeneratorError::GenerationFailed)
    }

    /// Produces a fully solved random board over the configured layout.
    fn generate_solution(&mut self) -> Result<Board, SolverError> {
        let board = Board::new(self.layout.clone());
        Solver::new(
            &board,
            SolverOptions {
                max_solutions: 1,
                randomize: true,
                timeout: Some(self.options.timeout),
                seed: Some(self.rng.gen()),
            },
        )
        .solve()
    }

    /// Digs cells out of a solved board along a random position order until
    /// the clue count is reached. Returns `None` when uniqueness blocked so
    /// many removals that the target count is out of reach.
    fn remove_cells(&mut self, solution: &Board) -> Option<Board> {
        let mut puzzle = solution.clone();
        let target = CELL_COUNT - self.options.clue_count;

        let mut positions: Vec<usize> = (0..CELL_COUNT).collect();
        positions.shuffle(&mut self.rng);

        let mut removed = 0;
        for pos in positions {
            if removed >= target {
                break;
            }
            let val = puzzle.get(pos)?;
            if val == EMPTY_CELL {
                continue;
            }

            puzzle.clear_force(pos);
            removed += 1;

            if self.options.ensure_unique && !self.has_unique_solution(&puzzle) {
                puzzle.set_force(pos, val);
                removed -= 1;
            }
        }

        (removed == target).then_some(puzzle)
    }

    /// Reports whether the puzzle has exactly one solution.
    fn has_unique_solution(&self, puzzle: &Board) -> bool {
        Solver::new(
            puzzle,
            SolverOptions {
                max_solutions: 2,
                randomize: false,
                timeout: Some(self.options.timeout),
                seed: Some(0),
            },
        )
        .solve()
        .is_ok()
    }
}
