use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use crate::grid::{Cell, Grid};
use crate::snake::Effect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUp {
    pub cell: Cell,
    pub kind: Effect,
    /// Removed uncollected at this time
    pub stale_at: Duration,
}

/// Two linked cells; entering one puts the head on the other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalPair {
    pub ends: [Cell; 2],
    pub closes_at: Duration,
}

impl PortalPair {
    pub fn exit_for(&self, entry: Cell) -> Option<Cell> {
        match self.ends.iter().position(|&end| end == entry) {
            Some(0) => Some(self.ends[1]),
            Some(_) => Some(self.ends[0]),
            None => None,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.ends.contains(&cell)
    }
}

/// Pick a uniformly random cell for which `occupied` is false.
/// Returns `None` when the grid is full.
pub fn random_free_cell(
    grid: Grid,
    occupied: impl Fn(Cell) -> bool,
    rng: &mut impl Rng,
) -> Option<Cell> {
    let free: Vec<Cell> = grid.cells().filter(|&c| !occupied(c)).collect();
    free.choose(rng).copied()
}
