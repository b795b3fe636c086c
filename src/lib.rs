//! A 9×9 Sudoku engine.
//!
//! The engine solves and generates puzzles over two kinds of region
//! structure: the classic 3×3 boxes and jigsaw layouts, whose nine regions
//! are irregular contiguous 9-cell shapes. Solving combines constraint
//! propagation (naked and hidden singles) with MRV backtracking; generation
//! digs cells out of a random solved board while keeping the solution
//! unique.
//!
//! ```
//! use sudokugen::{Generator, GeneratorOptions};
//!
//! let mut generator = Generator::new(GeneratorOptions {
//!     clue_count: 40,
//!     seed: 1,
//!     ..GeneratorOptions::default()
//! });
//! let (puzzle, solution) = generator.generate().unwrap();
//! assert_eq!(puzzle.clue_count(), 40);
//! assert_eq!(solution.empty_count(), 0);
//! ```

mod board;
mod generator;
mod jigsaw;
mod layout;
mod presets;
mod solver;

pub use board::{make_pos, Board, BoardError, ParseError, CELL_COUNT, EMPTY_CELL};
pub use generator::{
    Generator, GeneratorError, GeneratorOptions, DEFAULT_CLUE_COUNT, MAX_CLUE_COUNT,
    MIN_CLUE_COUNT,
};
pub use layout::{Layout, LayoutError, LayoutKind, REGION_COUNT, REGION_SIZE};
pub use presets::{preset_layout, random_preset_layout, PRESET_COUNT};
pub use solver::{difficulty, Solver, SolverError, SolverOptions};
