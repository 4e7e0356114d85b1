use serde::{Deserialize, Serialize};

/// Playfield dimensions in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Grid {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Grid derived from a display area and the size of one cell in the same unit.
    pub fn from_display(display_width: i32, display_height: i32, cell_size: i32) -> Self {
        let cell_size = cell_size.max(1);
        Grid::new(display_width / cell_size, display_height / cell_size)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell {
            x: cell.x.rem_euclid(self.width),
            y: cell.y.rem_euclid(self.height),
        }
    }

    /// Smallest of the distances to the four walls, measured as
    /// `min(x, y, width - x, height - y)`.
    pub fn wall_distance(&self, cell: Cell) -> i32 {
        cell.x
            .min(cell.y)
            .min(self.width - cell.x)
            .min(self.height - cell.y)
    }

    /// True when the cell is within two cells of any wall.
    pub fn near_wall(&self, cell: Cell) -> bool {
        cell.x <= 2 || cell.x >= self.width - 3 || cell.y <= 2 || cell.y >= self.height - 3
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell { x, y }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Candidate enumeration order used by the AI: right, left, down, up.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellDelta {
    pub x: i32,
    pub y: i32,
}

impl CellDelta {
    pub fn scaled(self, factor: i32) -> CellDelta {
        CellDelta {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl From<Direction> for CellDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::North => CellDelta { x: 0, y: -1 },
            Direction::South => CellDelta { x: 0, y: 1 },
            Direction::East => CellDelta { x: 1, y: 0 },
            Direction::West => CellDelta { x: -1, y: 0 },
        }
    }
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Unbounded step; the result may lie outside the grid.
    pub fn offset(&self, delta: CellDelta) -> Cell {
        Cell {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    pub fn manhattan(&self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn neighbours(&self) -> [Cell; 4] {
        Direction::ALL.map(|dir| self.offset(dir.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::South.opposite(), Direction::North);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::West.opposite(), Direction::East);

        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_grid_from_display() {
        let grid = Grid::from_display(400, 300, 10);
        assert_eq!(grid, Grid::new(40, 30));

        // Partial cells are dropped
        let grid = Grid::from_display(405, 309, 10);
        assert_eq!(grid, Grid::new(40, 30));
    }

    #[test]
    fn test_contains() {
        let grid = Grid::new(10, 8);
        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(9, 7)));
        assert!(!grid.contains(Cell::new(10, 7)));
        assert!(!grid.contains(Cell::new(9, 8)));
        assert!(!grid.contains(Cell::new(-1, 3)));
        assert!(!grid.contains(Cell::new(3, -1)));
    }

    #[test]
    fn test_wrap_edges() {
        let grid = Grid::new(10, 10);
        let step = |cell: Cell, dir: Direction| grid.wrap(cell.offset(dir.into()));

        assert_eq!(step(Cell::new(0, 0), Direction::North), Cell::new(0, 9));
        assert_eq!(step(Cell::new(0, 5), Direction::West), Cell::new(9, 5));
        assert_eq!(step(Cell::new(9, 9), Direction::South), Cell::new(9, 0));
        assert_eq!(step(Cell::new(9, 5), Direction::East), Cell::new(0, 5));
        assert_eq!(step(Cell::new(4, 4), Direction::East), Cell::new(5, 4));
    }

    #[test]
    fn test_wrap_far_outside() {
        let grid = Grid::new(10, 6);
        assert_eq!(grid.wrap(Cell::new(-12, 14)), Cell::new(8, 2));
        assert_eq!(grid.wrap(Cell::new(25, -6)), Cell::new(5, 0));

        // Dash distance scaled past a whole lap
        let far = Cell::new(5, 5).offset(CellDelta::from(Direction::West).scaled(13));
        assert_eq!(grid.wrap(far), Cell::new(2, 5));
    }

    #[test]
    fn test_wrap_always_lands_in_grid() {
        let grids = [Grid::new(1, 1), Grid::new(7, 3), Grid::new(40, 30)];
        for grid in grids {
            for x in -50..50 {
                for y in [-31, -1, 0, 1, 29, 30, 61] {
                    assert!(grid.contains(grid.wrap(Cell::new(x, y))));
                }
            }
        }
    }

    #[test]
    fn test_wall_distance() {
        let grid = Grid::new(10, 10);
        assert_eq!(grid.wall_distance(Cell::new(0, 5)), 0);
        assert_eq!(grid.wall_distance(Cell::new(5, 5)), 5);
        assert_eq!(grid.wall_distance(Cell::new(9, 5)), 1);
        assert_eq!(grid.wall_distance(Cell::new(3, 8)), 2);
    }

    #[test]
    fn test_near_wall() {
        let grid = Grid::new(20, 20);
        assert!(grid.near_wall(Cell::new(2, 10)));
        assert!(grid.near_wall(Cell::new(17, 10)));
        assert!(grid.near_wall(Cell::new(10, 1)));
        assert!(!grid.near_wall(Cell::new(3, 3)));
        assert!(!grid.near_wall(Cell::new(16, 16)));
    }

    #[test]
    fn test_manhattan_and_neighbours() {
        let a = Cell::new(1, 2);
        assert_eq!(a.manhattan(Cell::new(4, -2)), 7);
        assert_eq!(
            a.neighbours(),
            [Cell::new(2, 2), Cell::new(0, 2), Cell::new(1, 3), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_cells_row_major() {
        let grid = Grid::new(3, 2);
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[1], Cell::new(1, 0));
        assert_eq!(cells[3], Cell::new(0, 1));
    }
}
