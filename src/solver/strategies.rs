//! Constraint propagation: naked and hidden singles, applied to fixpoint.

use crate::board::{Board, CELL_COUNT, EMPTY_CELL};

use super::SolverError;

// Each productive pass places at least one digit, so 81 passes already
// suffice; the bound is a safety net against a cycling bug.
const MAX_PASSES: usize = CELL_COUNT * CELL_COUNT;

/// Applies naked and hidden singles until neither makes progress.
/// Returns [SolverError::NoSolution] when some empty cell ends up with no
/// candidate at all.
pub(crate) fn propagate(board: &mut Board) -> Result<(), SolverError> {
    let mut changed = true;
    let mut passes = 0;

    while changed && passes < MAX_PASSES {
        changed = false;
        passes += 1;

        if apply_naked_singles(board) {
            changed = true;
        }
        if apply_hidden_singles(board) {
            changed = true;
        }
        if has_contradiction(board) {
            return Err(SolverError::NoSolution);
        }
    }
    Ok(())
}

/// Fills every empty cell whose candidate mask has exactly one bit set.
fn apply_naked_singles(board: &mut Board) -> bool {
    let mut changed = false;

    for pos in 0..CELL_COUNT {
        if board.get(pos) != Some(EMPTY_CELL) {
            continue;
        }
        let mask = board.candidates_mask(pos);
        if mask == 0 {
            break; // picked up by the contradiction check
        }
        if mask.count_ones() == 1 {
            let val = mask.trailing_zeros() as u8 + 1;
            board.set_force(pos, val);
            changed = true;
        }
    }
    changed
}

/// Fills digits that have exactly one legal position within a unit.
fn apply_hidden_singles(board: &mut Board) -> bool {
    let mut changed = false;

    for row in 0..9 {
        changed |= hidden_singles_in_unit(board, (0..9).map(|col| row * 9 + col));
    }
    for col in 0..9 {
        changed |= hidden_singles_in_unit(board, (0..9).map(|row| row * 9 + col));
    }
    // Region cells come from the layout, so this arm covers 3×3 boxes and
    // jigsaw shapes alike.
    for region in 0..9 {
        let cells = board.region_cells(region);
        changed |= hidden_singles_in_unit(board, cells.into_iter());
    }
    changed
}

fn hidden_singles_in_unit(
    board: &mut Board,
    cells: impl Iterator<Item = usize> + Clone,
) -> bool {
    let mut changed = false;

    for val in 1..=9u8 {
        let mask = 1u16 << (val - 1);
        let mut placement = None;

        for pos in cells.clone() {
            if board.get(pos) != Some(EMPTY_CELL) {
                continue;
            }
            if board.candidates_mask(pos) & mask == 0 {
                continue;
            }
            if placement.is_some() {
                // Second legal position; not a hidden single.
                placement = None;
                break;
            }
            placement = Some(pos);
        }

        if let Some(pos) = placement {
            board.set_force(pos, val);
            changed = true;
        }
    }
    changed
}

/// Reports whether any empty cell has run out of candidates.
fn has_contradiction(board: &Board) -> bool {
    (0..CELL_COUNT)
        .any(|pos| board.get(pos) == Some(EMPTY_CELL) && board.candidates_mask(pos) == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    #[test]
    fn naked_single_is_filled() {
        let mut board = Board::new(Layout::standard());
        for col in 0..8 {
            board.set(col, col as u8 + 1).unwrap();
        }
        propagate(&mut board).unwrap();
        assert_eq!(board.get(8), Some(9));
        assert!(board.is_valid());
    }

    #[test]
    fn hidden_single_is_filled() {
        let mut board = Board::new(Layout::standard());
        // Corner the digit 1 within region 0: rows 1-2 and columns 1-2 all
        // see a 1, leaving cell 0 as its only home in the region. Cell 0
        // itself keeps several candidates, so naked singles cannot fire.
        board.set(12, 1).unwrap(); // row 1
        board.set(24, 1).unwrap(); // row 2
        board.set(37, 1).unwrap(); // column 1
        board.set(74, 1).unwrap(); // column 2
        assert!(board.candidates_mask(0).count_ones() > 1);

        propagate(&mut board).unwrap();
        assert_eq!(board.get(0), Some(1));
        assert!(board.is_valid());
    }

    #[test]
    fn contradiction_is_reported() {
        let mut board = Board::new(Layout::standard());
        // Cell 8 sees 1-8 in its row and a 9 in its column: no candidates.
        for col in 0..8 {
            board.set(col, col as u8 + 1).unwrap();
        }
        board.set(17, 9).unwrap();
        assert_eq!(propagate(&mut board), Err(SolverError::NoSolution));
    }

    #[test]
    fn propagation_respects_jigsaw_regions() {
        // Region 0 of the Zigzag preset covers cells
        // {0,1,2,9,10,18,27,36,45}; block the digit 1 from all of them
        // except cell 45 without ever placing a 1 inside the region.
        let layout = crate::presets::preset_layout(0).unwrap();
        let mut board = Board::new(layout);
        board.set(3, 1).unwrap(); // row 0
        board.set(14, 1).unwrap(); // row 1
        board.set(22, 1).unwrap(); // row 2
        board.set(34, 1).unwrap(); // row 3
        board.set(37, 1).unwrap(); // row 4
        assert!(board.candidates_mask(45).count_ones() > 1);

        propagate(&mut board).unwrap();
        assert_eq!(board.get(45), Some(1));
        assert!(board.is_valid());
    }
}
