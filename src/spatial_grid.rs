/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It divides the simulation space into fixed-size buckets and keeps the
 * membership up to date incrementally: an agent only moves between buckets
 * when its cell actually changes, and removal from the old bucket is O(1)
 * via swap-with-last using a stored in-bucket index.
 *
 * The 3x3 neighborhood query returns the buckets themselves (cell index plus
 * member slice) rather than a flattened list, so the caller can subsample
 * cheaply before computing any distances.
 */

use nannou::prelude::*;
use thiserror::Error;

/// Errors produced when a grid is configured with unusable dimensions.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(&'static str),
}

// Where an agent currently lives: its cell and its position within the
// cell's member list. Slots are owned by the grid, not the agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    cell: usize,
    index: usize,
}

pub struct SpatialGrid {
    pub cell_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
    slots: Vec<Option<Slot>>,
}

const EMPTY_BUCKET: &[usize] = &[];

/// The 3x3 block of buckets around an agent's cell, clipped to the grid.
/// Each entry pairs the cell index with the bucket's member slice.
pub struct CellBlock<'g> {
    cells: [(usize, &'g [usize]); 9],
    len: usize,
}

impl<'g> CellBlock<'g> {
    /// Iterate the non-clipped buckets of the block.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &'g [usize])> + '_ {
        self.cells[..self.len].iter().copied()
    }

    /// Total member count across the block, used for subsampling decisions.
    pub fn total(&self) -> usize {
        self.cells[..self.len].iter().map(|(_, b)| b.len()).sum()
    }
}

impl SpatialGrid {
    /// Create a grid covering `width x height` world units with square cells
    /// of `cell_size`, able to track up to `capacity` agents.
    pub fn new(
        width: f32,
        height: f32,
        cell_size: f32,
        capacity: usize,
    ) -> Result<Self, GridError> {
        if !(cell_size > 0.0) {
            return Err(GridError::InvalidConfig("cell size must be positive"));
        }
        if !(width > 0.0 && height > 0.0) {
            return Err(GridError::InvalidConfig("world bounds must be positive"));
        }

        let cols = (width / cell_size).ceil() as usize;
        let rows = (height / cell_size).ceil() as usize;

        Ok(Self {
            cell_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
            slots: vec![None; capacity],
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    // Convert a world position to its row-major cell index. The position is
    // clamped into the grid, so transiently out-of-bounds positions can never
    // produce an out-of-range index.
    #[inline]
    pub fn cell_index(&self, position: Point2) -> usize {
        let col = (position.x / self.cell_size)
            .floor()
            .clamp(0.0, (self.cols - 1) as f32) as usize;
        let row = (position.y / self.cell_size)
            .floor()
            .clamp(0.0, (self.rows - 1) as f32) as usize;
        row * self.cols + col
    }

    /// Record that `agent` is at `position`. No-op if the cell is unchanged;
    /// otherwise the agent is moved from its old bucket to the new one.
    pub fn update(&mut self, agent: usize, position: Point2) {
        let target = self.cell_index(position);

        if let Some(slot) = self.slots[agent] {
            if slot.cell == target {
                return;
            }
            self.evict(slot);
        }

        let index = self.buckets[target].len();
        self.buckets[target].push(agent);
        self.slots[agent] = Some(Slot {
            cell: target,
            index,
        });
    }

    /// Drop `agent` from the grid entirely (agent deactivation).
    pub fn remove(&mut self, agent: usize) {
        if let Some(slot) = self.slots[agent].take() {
            self.evict(slot);
        }
    }

    // Swap-with-last removal: the last member fills the hole and its stored
    // index is patched to keep the slot table consistent.
    fn evict(&mut self, slot: Slot) {
        let bucket = &mut self.buckets[slot.cell];
        bucket.swap_remove(slot.index);

        if slot.index < bucket.len() {
            let moved = bucket[slot.index];
            if let Some(moved_slot) = self.slots[moved].as_mut() {
                moved_slot.index = slot.index;
            }
        }
    }

    /// The bucket `agent` is currently recorded in, if any.
    pub fn bucket_of(&self, agent: usize) -> Option<usize> {
        self.slots[agent].map(|slot| slot.cell)
    }

    /// Members of the bucket at `cell`.
    pub fn bucket(&self, cell: usize) -> &[usize] {
        &self.buckets[cell]
    }

    /// World-space origin (lower corner) of the bucket at `cell`.
    pub fn cell_origin(&self, cell: usize) -> Point2 {
        let row = cell / self.cols;
        let col = cell % self.cols;
        pt2(col as f32 * self.cell_size, row as f32 * self.cell_size)
    }

    /// The 3x3 block of buckets centered on the agent's current cell.
    /// Cells outside the grid contribute nothing. An agent that is not in
    /// the grid gets an empty block.
    pub fn neighborhood(&self, agent: usize) -> CellBlock<'_> {
        let mut cells = [(0usize, EMPTY_BUCKET); 9];
        let mut len = 0;

        if let Some(slot) = self.slots[agent] {
            let row = (slot.cell / self.cols) as isize;
            let col = (slot.cell % self.cols) as isize;

            for row_offset in -1..=1 {
                let check_row = row + row_offset;
                if check_row < 0 || check_row >= self.rows as isize {
                    continue;
                }

                for col_offset in -1..=1 {
                    let check_col = col + col_offset;
                    if check_col < 0 || check_col >= self.cols as isize {
                        continue;
                    }

                    let cell = check_row as usize * self.cols + check_col as usize;
                    cells[len] = (cell, self.buckets[cell].as_slice());
                    len += 1;
                }
            }
        }

        CellBlock { cells, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialGrid {
        // 200x100 world, cell size 40 -> 5 cols x 3 rows
        SpatialGrid::new(200.0, 100.0, 40.0, 16).expect("grid")
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(SpatialGrid::new(200.0, 100.0, 0.0, 8).is_err());
        assert!(SpatialGrid::new(200.0, 100.0, -1.0, 8).is_err());
        assert!(SpatialGrid::new(0.0, 100.0, 40.0, 8).is_err());
    }

    #[test]
    fn cell_index_is_row_major() {
        let g = grid();
        assert_eq!(g.cols(), 5);
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cell_index(pt2(0.0, 0.0)), 0);
        assert_eq!(g.cell_index(pt2(45.0, 0.0)), 1);
        assert_eq!(g.cell_index(pt2(0.0, 45.0)), 5);
        assert_eq!(g.cell_index(pt2(199.0, 99.0)), 14);
    }

    #[test]
    fn cell_index_clamps_out_of_bounds_positions() {
        let g = grid();
        assert_eq!(g.cell_index(pt2(-10.0, -10.0)), 0);
        assert_eq!(g.cell_index(pt2(1000.0, 1000.0)), 14);
        // Exactly on the far edge must not overflow a row.
        assert_eq!(g.cell_index(pt2(200.0, 0.0)), 4);
    }

    #[test]
    fn update_inserts_and_moves_between_buckets() {
        let mut g = grid();
        g.update(0, pt2(10.0, 10.0));
        assert_eq!(g.bucket_of(0), Some(0));
        assert_eq!(g.bucket(0), &[0]);

        // Same cell: membership unchanged.
        g.update(0, pt2(35.0, 20.0));
        assert_eq!(g.bucket_of(0), Some(0));
        assert_eq!(g.bucket(0), &[0]);

        // New cell: moved, old bucket emptied.
        g.update(0, pt2(50.0, 10.0));
        assert_eq!(g.bucket_of(0), Some(1));
        assert!(g.bucket(0).is_empty());
        assert_eq!(g.bucket(1), &[0]);
    }

    #[test]
    fn swap_with_last_patches_the_moved_member() {
        let mut g = grid();
        g.update(0, pt2(10.0, 10.0));
        g.update(1, pt2(12.0, 10.0));
        g.update(2, pt2(14.0, 10.0));
        assert_eq!(g.bucket(0), &[0, 1, 2]);

        // Removing the first member swaps agent 2 into its place.
        g.update(0, pt2(50.0, 10.0));
        assert_eq!(g.bucket(0), &[2, 1]);

        // Agent 2's recorded index must have been patched: moving it out
        // again must leave agent 1 behind, not corrupt the bucket.
        g.update(2, pt2(90.0, 10.0));
        assert_eq!(g.bucket(0), &[1]);
        assert_eq!(g.bucket_of(1), Some(0));
        assert_eq!(g.bucket_of(2), Some(2));
    }

    #[test]
    fn remove_drops_membership() {
        let mut g = grid();
        g.update(0, pt2(10.0, 10.0));
        g.update(1, pt2(12.0, 10.0));
        g.remove(0);
        assert_eq!(g.bucket_of(0), None);
        assert_eq!(g.bucket(0), &[1]);
        // Removing twice is harmless.
        g.remove(0);
        assert_eq!(g.bucket(0), &[1]);
    }

    #[test]
    fn neighborhood_is_clipped_at_the_border() {
        let mut g = grid();
        g.update(0, pt2(10.0, 10.0)); // corner cell
        let cells: Vec<usize> = g.neighborhood(0).buckets().map(|(cell, _)| cell).collect();
        assert_eq!(cells, vec![0, 1, 5, 6]);

        g.update(0, pt2(90.0, 50.0)); // interior cell 7
        let cells: Vec<usize> = g.neighborhood(0).buckets().map(|(c, _)| c).collect();
        assert_eq!(cells, vec![1, 2, 3, 6, 7, 8, 11, 12, 13]);
    }

    #[test]
    fn neighborhood_covers_everything_within_one_cell_radius() {
        // Static agents scattered around a center agent; every agent within
        // the cell size must show up in the 3x3 block.
        let mut g = grid();
        let center = pt2(100.0, 50.0);
        g.update(0, center);

        let offsets = [
            vec2(-39.0, 0.0),
            vec2(39.0, 0.0),
            vec2(0.0, -39.0),
            vec2(0.0, 39.0),
            vec2(25.0, 25.0),
            vec2(-25.0, -25.0),
        ];
        for (i, offset) in offsets.iter().enumerate() {
            g.update(i + 1, center + *offset);
        }

        let mut seen: Vec<usize> = g
            .neighborhood(0)
            .buckets()
            .flat_map(|(_, members)| members.iter().copied())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn total_counts_block_membership() {
        let mut g = grid();
        g.update(0, pt2(100.0, 50.0));
        g.update(1, pt2(102.0, 50.0));
        g.update(2, pt2(60.0, 50.0)); // adjacent cell
        g.update(3, pt2(190.0, 90.0)); // outside the block
        assert_eq!(g.neighborhood(0).total(), 3);
    }
}
