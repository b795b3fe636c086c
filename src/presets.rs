//! Hand-crafted jigsaw region maps.
//!
//! These give callers a stable set of pleasant region shapes without paying
//! for random generation. Each map assigns the cell at `row*9 + col` to a
//! region number 0-8 and satisfies the [Layout] invariants: nine regions,
//! nine cells each, all orthogonally contiguous.

use std::sync::Arc;

use rand::Rng;

use crate::board::CELL_COUNT;
use crate::layout::Layout;

/// Number of built-in jigsaw presets.
pub const PRESET_COUNT: usize = 5;

#[rustfmt::skip]
const PRESETS: [[u8; CELL_COUNT]; PRESET_COUNT] = [
    // "Zigzag": wide diagonal stripes that zigzag across the grid.
    [
        0, 0, 0, 1, 1, 1, 2, 2, 2,
        0, 0, 1, 1, 1, 2, 2, 2, 2,
        0, 1, 1, 1, 3, 3, 3, 2, 2,
        0, 3, 3, 3, 3, 3, 3, 4, 4,
        0, 5, 5, 5, 6, 6, 6, 4, 4,
        0, 5, 5, 5, 6, 6, 6, 4, 4,
        7, 5, 5, 5, 6, 6, 6, 4, 4,
        7, 7, 7, 7, 8, 8, 8, 8, 4,
        7, 7, 7, 7, 8, 8, 8, 8, 8,
    ],
    // "Staircase": regions step diagonally, like a descending stair.
    [
        0, 0, 0, 1, 1, 1, 2, 2, 2,
        0, 0, 1, 1, 1, 2, 2, 2, 2,
        0, 0, 1, 1, 3, 3, 3, 2, 2,
        0, 0, 1, 3, 3, 3, 4, 4, 4,
        5, 5, 5, 3, 3, 3, 4, 4, 4,
        5, 5, 5, 6, 6, 6, 6, 4, 4,
        5, 5, 5, 6, 6, 6, 6, 6, 4,
        7, 7, 7, 7, 8, 8, 8, 8, 8,
        7, 7, 7, 7, 7, 8, 8, 8, 8,
    ],
    // "T-shapes": T-shaped regions radiating from the grid edges.
    [
        0, 0, 0, 0, 1, 1, 1, 1, 1,
        0, 3, 3, 3, 1, 1, 1, 1, 2,
        0, 3, 3, 3, 4, 4, 4, 4, 2,
        0, 3, 3, 3, 4, 4, 4, 4, 2,
        0, 5, 5, 5, 4, 6, 6, 6, 2,
        0, 5, 5, 5, 6, 6, 6, 6, 2,
        7, 5, 5, 5, 6, 6, 8, 8, 2,
        7, 7, 7, 7, 8, 8, 8, 8, 2,
        7, 7, 7, 7, 8, 8, 8, 2, 2,
    ],
    // "Brick": regions offset like courses of bricks.
    [
        0, 0, 0, 0, 0, 1, 1, 1, 1,
        0, 0, 2, 2, 2, 1, 1, 1, 1,
        0, 0, 2, 2, 2, 2, 2, 2, 1,
        3, 3, 3, 4, 4, 4, 4, 5, 5,
        3, 3, 4, 4, 4, 5, 5, 5, 5,
        3, 3, 4, 4, 5, 5, 5, 6, 6,
        3, 3, 7, 7, 7, 7, 7, 6, 6,
        8, 8, 8, 8, 8, 7, 7, 6, 6,
        8, 8, 8, 8, 7, 7, 6, 6, 6,
    ],
    // "Pinwheel": regions spiral from the top-left toward bottom-right.
    [
        0, 0, 0, 0, 1, 1, 1, 1, 1,
        0, 0, 0, 1, 1, 1, 1, 2, 2,
        0, 0, 3, 3, 3, 3, 3, 2, 2,
        4, 4, 4, 4, 4, 3, 3, 2, 2,
        4, 4, 4, 4, 5, 3, 3, 2, 2,
        6, 6, 6, 6, 5, 5, 5, 5, 2,
        6, 6, 6, 6, 7, 7, 5, 5, 5,
        6, 7, 7, 7, 7, 7, 7, 7, 5,
        8, 8, 8, 8, 8, 8, 8, 8, 8,
    ],
];

/// Returns the preset jigsaw layout with the given index, or `None` when
/// the index is out of range.
pub fn preset_layout(index: usize) -> Option<Arc<Layout>> {
    let map = *PRESETS.get(index)?;
    match Layout::new(map) {
        Ok(layout) => Some(layout),
        // Presets are hard-coded and validated by tests.
        Err(err) => panic!("jigsaw preset {index} failed validation: {err}"),
    }
}

/// Returns a uniformly random preset jigsaw layout.
pub fn random_preset_layout<R: Rng>(rng: &mut R) -> Arc<Layout> {
    let index = rng.gen_range(0..PRESET_COUNT);
    match preset_layout(index) {
        Some(layout) => layout,
        None => unreachable!("preset index {index} in range by construction"),
    }
}
