//! Randomized region-map generation for jigsaw boards.
//!
//! Maps are produced in two phases: an uncapped multi-source BFS grows nine
//! regions outward from random seeds (a Voronoi partition with random
//! tie-breaking), then boundary cells are transferred from over-sized to
//! under-sized regions until every region holds exactly 9 cells.

use bitvec::prelude::*;
use rand::{seq::SliceRandom, Rng};

use crate::board::CELL_COUNT;
use crate::layout::{orthogonal_neighbors, CellSet, REGION_COUNT, REGION_SIZE};

const UNASSIGNED: u8 = u8::MAX;

// Upper bound on generation restarts before treating the failure as a bug.
const MAX_ATTEMPTS: usize = 200;

// Every balancing step moves exactly one cell, so convergence takes far
// fewer iterations than this; hitting the bound means the attempt is stuck.
const MAX_BALANCE_ITERATIONS: usize = CELL_COUNT * 10;

/// Produces a region map with nine orthogonally contiguous 9-cell regions.
///
/// # Panics
///
/// Panics if the retry budget is exhausted, which a correct implementation
/// never hits in practice.
pub(crate) fn generate_region_map<R: Rng>(rng: &mut R) -> [u8; CELL_COUNT] {
    for _ in 0..MAX_ATTEMPTS {
        if let Some(map) = try_generate(rng) {
            return map;
        }
    }
    panic!("jigsaw region-map generation exceeded {MAX_ATTEMPTS} attempts");
}

/// Runs one generation attempt. Returns `None` when balancing gets stuck
/// on a degenerate seed placement that cannot be evened out.
fn try_generate<R: Rng>(rng: &mut R) -> Option<[u8; CELL_COUNT]> {
    let mut assigned = [UNASSIGNED; CELL_COUNT];

    // Queue entries are (pos, region). Entries queued during one level form
    // the next level; the queue is never capped by region size, so the BFS
    // reaches every cell and keeps each region connected by construction.
    let mut queue: Vec<(usize, u8)> = Vec::with_capacity(CELL_COUNT);
    for (region, pos) in choose_seed_cells(rng).into_iter().enumerate() {
        assigned[pos] = region as u8;
        queue.push((pos, region as u8));
    }

    let mut head = 0;
    while head < queue.len() {
        let level_end = queue.len();
        // Shuffle the current frontier so expansion order (and therefore
        // region shape) is not dictated by seed order.
        queue[head..level_end].shuffle(rng);

        while head < level_end {
            let (pos, region) = queue[head];
            head += 1;
            for nb in orthogonal_neighbors(pos) {
                if assigned[nb] == UNASSIGNED {
                    assigned[nb] = region;
                    queue.push((nb, region));
                }
            }
        }
    }

    let mut sizes = [0usize; REGION_COUNT];
    for &region in &assigned {
        sizes[region as usize] += 1;
    }

    balance_regions(&mut assigned, &mut sizes, rng).then_some(assigned)
}

/// Transfers boundary cells from over-sized regions to adjacent under-sized
/// regions until all sizes equal 9. Every transfer must keep the donor
/// region contiguous. Returns false when no legal transfer remains.
fn balance_regions<R: Rng>(
    assigned: &mut [u8; CELL_COUNT],
    sizes: &mut [usize; REGION_COUNT],
    rng: &mut R,
) -> bool {
    for _ in 0..MAX_BALANCE_ITERATIONS {
        if sizes.iter().all(|&size| size == REGION_SIZE) {
            return true;
        }

        // Candidate transfers: a cell of an over-sized region that touches
        // an under-sized region.
        let mut candidates: Vec<(usize, u8, u8)> = Vec::new();
        for pos in 0..CELL_COUNT {
            let from = assigned[pos];
            if sizes[from as usize] <= REGION_SIZE {
                continue;
            }
            for nb in orthogonal_neighbors(pos) {
                let to = assigned[nb];
                if to != from && sizes[to as usize] < REGION_SIZE {
                    candidates.push((pos, from, to));
                }
            }
        }
        if candidates.is_empty() {
            return false;
        }

        candidates.shuffle(rng);
        let mut swapped = false;
        for (pos, from, to) in candidates {
            if contiguous_after_removal(assigned, pos, from) {
                assigned[pos] = to;
                sizes[from as usize] -= 1;
                sizes[to as usize] += 1;
                swapped = true;
                break;
            }
        }
        if !swapped {
            // Every candidate would split its donor region.
            return false;
        }
    }
    false
}

/// Reports whether the cells of `region` stay orthogonally connected after
/// removing `pos`, checked by flood-fill over the remaining cells.
fn contiguous_after_removal(assigned: &[u8; CELL_COUNT], pos: usize, region: u8) -> bool {
    let mut in_region: CellSet = BitArray::ZERO;
    let mut remaining = 0usize;
    let mut start = None;
    for (p, &r) in assigned.iter().enumerate() {
        if r == region && p != pos {
            in_region.set(p, true);
            remaining += 1;
            if start.is_none() {
                start = Some(p);
            }
        }
    }
    let Some(start) = start else {
        return true;
    };

    let mut visited: CellSet = BitArray::ZERO;
    let mut queue = Vec::with_capacity(remaining);
    queue.push(start);
    visited.set(start, true);
    let mut head = 0;

    while head < queue.len() {
        let p = queue[head];
        head += 1;
        for nb in orthogonal_neighbors(p) {
            if in_region[nb] && !visited[nb] {
                visited.set(nb, true);
                queue.push(nb);
            }
        }
    }
    queue.len() == remaining
}

/// Picks 9 seed positions spread across the board: one uniformly random
/// cell inside each of the nine 3×3 macro-boxes.
fn choose_seed_cells<R: Rng>(rng: &mut R) -> [usize; REGION_COUNT] {
    let mut seeds = [0usize; REGION_COUNT];
    let mut seed_idx = 0;
    for box_row in 0..3 {
        for box_col in 0..3 {
            let mut cells = [0usize; 9];
            for (i, cell) in cells.iter_mut().enumerate() {
                *cell = (box_row * 3 + i / 3) * 9 + box_col * 3 + i % 3;
            }
            cells.shuffle(rng);
            seeds[seed_idx] = cells[0];
            seed_idx += 1;
        }
    }
    seeds
}
