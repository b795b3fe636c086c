//! Difficulty rating via exhaustive search-tree measurement.

use crate::board::Board;

use super::find_mrv_cell;

/// Rates a board by exhaustively walking the MRV search tree, counting one
/// decision point per candidate tried. A solved board rates 0; the more
/// guessing a board leaves open, the higher the rating.
///
/// Unlike the solver this walk deliberately skips constraint propagation:
/// the raw tree size is the measure.
pub fn difficulty(board: &Board) -> u64 {
    let mut scratch = board.clone();
    trace(&mut scratch)
}

fn trace(board: &mut Board) -> u64 {
    let Some((pos, candidates)) = find_mrv_cell(board) else {
        return 0; // solved
    };

    // A cell with no candidates ends the walk: score stays 0 for the
    // dead branch.
    let mut score = 0;
    for val in candidates {
        board.set_force(pos, val);
        score += 1 + trace(board);
        board.clear_force(pos);
    }
    score
}
