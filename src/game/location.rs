//! Grid cells and playfield geometry

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// Random draws attempted before falling back to scanning free cells
const MAX_RANDOM_DRAWS: usize = 64;

/// A position on the game grid, 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in the given direction. No wrapping.
    pub fn step(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.vector();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// True if the cells differ by exactly one unit step
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// Fixed playfield dimensions, `cols × rows`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub const fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    pub fn cell_count(&self) -> usize {
        (self.cols.max(0) as usize) * (self.rows.max(0) as usize)
    }

    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.x >= 0 && cell.x < self.cols && cell.y >= 0 && cell.y < self.rows
    }

    /// Pick a cell uniformly from the grid minus `excluded`.
    ///
    /// Returns `None` only when every cell is excluded.
    pub fn random_free_cell<R: Rng>(
        &self,
        rng: &mut R,
        excluded: &HashSet<Cell>,
    ) -> Option<Cell> {
        if self.cell_count() == 0 {
            return None;
        }

        for _ in 0..MAX_RANDOM_DRAWS {
            let cell = Cell::new(rng.gen_range(0..self.cols), rng.gen_range(0..self.rows));
            if !excluded.contains(&cell) {
                return Some(cell);
            }
        }

        // Crowded board: draw from the explicit free list instead
        let free: Vec<Cell> = (0..self.rows)
            .flat_map(|y| (0..self.cols).map(move |x| Cell::new(x, y)))
            .filter(|cell| !excluded.contains(cell))
            .collect();

        if free.is_empty() {
            None
        } else {
            Some(free[rng.gen_range(0..free.len())])
        }
    }
}
