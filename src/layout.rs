use std::sync::Arc;

use bitvec::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::board::CELL_COUNT;
use crate::jigsaw;

pub const REGION_COUNT: usize = 9;
pub const REGION_SIZE: usize = 9;

/// A set of cell positions, one bit per cell.
pub(crate) type CellSet = BitArr!(for CELL_COUNT);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("cell {pos} has out-of-range region {region} (must be 0-8)")]
    RegionOutOfRange { pos: usize, region: u8 },

    #[error("region {region} has {size} cells, expected 9")]
    WrongRegionSize { region: usize, size: usize },

    #[error("region {region} is not contiguous ({reachable} of 9 cells reachable from cell {start})")]
    NotContiguous {
        region: usize,
        reachable: usize,
        start: usize,
    },
}

/// Distinguishes the classic 3×3-box region structure from irregular ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Standard,
    Jigsaw,
}

/// Layout describes the region structure of a Sudoku board.
/// In standard Sudoku all regions are 3×3 boxes; jigsaw layouts use
/// irregular, contiguous 9-cell regions of any shape.
///
/// A Layout is immutable after construction, so a single `Arc<Layout>` is
/// shared by every [Board](crate::Board) clone that plays on it.
#[derive(Debug, PartialEq, Eq)]
pub struct Layout {
    kind: LayoutKind,
    pos_to_region: [u8; CELL_COUNT],

    // Inverse of pos_to_region: the 9 cells of each region in ascending order.
    region_to_cells: [[usize; REGION_SIZE]; REGION_COUNT],
}

impl Layout {
    /// Returns the Layout of a classic 3×3-box Sudoku.
    pub fn standard() -> Arc<Layout> {
        let mut region_map = [0u8; CELL_COUNT];
        for (pos, region) in region_map.iter_mut().enumerate() {
            *region = (3 * (pos / 27) + (pos % 9) / 3) as u8;
        }
        match Layout::build(region_map, LayoutKind::Standard) {
            Ok(layout) => Arc::new(layout),
            // The standard layout is hard-coded and always valid.
            Err(err) => panic!("standard layout failed validation: {err}"),
        }
    }

    /// Builds a jigsaw Layout from an arbitrary region map and validates it.
    /// `region_map[pos]` must be in `0..=8` for every position.
    pub fn new(region_map: [u8; CELL_COUNT]) -> Result<Arc<Layout>, LayoutError> {
        Ok(Arc::new(Layout::build(region_map, LayoutKind::Jigsaw)?))
    }

    /// Returns a Layout with nine randomly shaped jigsaw regions.
    pub fn random_jigsaw<R: Rng>(rng: &mut R) -> Arc<Layout> {
        let region_map = jigsaw::generate_region_map(rng);
        match Layout::build(region_map, LayoutKind::Jigsaw) {
            Ok(layout) => Arc::new(layout),
            // The jigsaw generator only emits maps that satisfy the Layout
            // invariants; reaching this is a bug in the generator.
            Err(err) => panic!("generated jigsaw region map failed validation: {err}"),
        }
    }

    fn build(region_map: [u8; CELL_COUNT], kind: LayoutKind) -> Result<Layout, LayoutError> {
        let region_to_cells = invert_region_map(&region_map)?;
        let layout = Layout {
            kind,
            pos_to_region: region_map,
            region_to_cells,
        };
        for region in 0..REGION_COUNT {
            layout.check_contiguous(region)?;
        }
        Ok(layout)
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Returns the region index of a cell position.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= 81`.
    pub fn region_of(&self, pos: usize) -> usize {
        self.pos_to_region[pos] as usize
    }

    /// Returns the 9 cell positions of a region, in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `region >= 9`.
    pub fn region_cells(&self, region: usize) -> [usize; REGION_SIZE] {
        self.region_to_cells[region]
    }

    /// Verifies by flood-fill that all 9 cells of a region are reachable
    /// from each other via orthogonal adjacency.
    fn check_contiguous(&self, region: usize) -> Result<(), LayoutError> {
        let cells = self.region_to_cells[region];

        let mut in_region: CellSet = BitArray::ZERO;
        for &pos in &cells {
            in_region.set(pos, true);
        }

        let mut visited: CellSet = BitArray::ZERO;
        let mut queue = Vec::with_capacity(REGION_SIZE);
        queue.push(cells[0]);
        visited.set(cells[0], true);
        let mut head = 0;

        while head < queue.len() {
            let pos = queue[head];
            head += 1;
            for nb in orthogonal_neighbors(pos) {
                if in_region[nb] && !visited[nb] {
                    visited.set(nb, true);
                    queue.push(nb);
                }
            }
        }

        if queue.len() != REGION_SIZE {
            return Err(LayoutError::NotContiguous {
                region,
                reachable: queue.len(),
                start: cells[0],
            });
        }
        Ok(())
    }
}

/// Builds the region → cells inverse table, checking that every region index
/// is in range and that each region receives exactly 9 cells.
fn invert_region_map(
    region_map: &[u8; CELL_COUNT],
) -> Result<[[usize; REGION_SIZE]; REGION_COUNT], LayoutError> {
    let mut cells = [[0usize; REGION_SIZE]; REGION_COUNT];
    let mut counts = [0usize; REGION_COUNT];

    for (pos, &region) in region_map.iter().enumerate() {
        if region >= REGION_COUNT as u8 {
            return Err(LayoutError::RegionOutOfRange { pos, region });
        }
        let r = region as usize;
        if counts[r] >= REGION_SIZE {
            return Err(LayoutError::WrongRegionSize {
                region: r,
                size: counts[r] + 1,
            });
        }
        cells[r][counts[r]] = pos;
        counts[r] += 1;
    }

    for (region, &count) in counts.iter().enumerate() {
        if count != REGION_SIZE {
            return Err(LayoutError::WrongRegionSize {
                region,
                size: count,
            });
        }
    }
    Ok(cells)
}

/// Returns the in-bounds orthogonal neighbors of a cell position.
pub(crate) fn orthogonal_neighbors(pos: usize) -> impl Iterator<Item = usize> {
    let (row, col) = (pos / 9, pos % 9);
    let mut buf = [0usize; 4];
    let mut n = 0;
    if row > 0 {
        buf[n] = pos - 9;
        n += 1;
    }
    if row < 8 {
        buf[n] = pos + 9;
        n += 1;
    }
    if col > 0 {
        buf[n] = pos - 1;
        n += 1;
    }
    if col < 8 {
        buf[n] = pos + 1;
        n += 1;
    }
    buf.into_iter().take(n)
}
