//! 8-way neighbor addressing and cell classification

use super::{Raster, RasterElement};
use std::f64::consts::SQRT_2;

/// Compass directions to the 8 neighbors of a cell.
///
/// Direction encoding (row 0 is north):
/// ```text
///   7  0  1
///   6  .  2
///   5  4  3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Compass {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Compass {
    /// All directions in code order
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];

    /// Direction offsets (row_offset, col_offset), indexed by code
    const OFFSETS: [(isize, isize); 8] = [
        (-1, 0),  // 0: N
        (-1, 1),  // 1: NE
        (0, 1),   // 2: E
        (1, 1),   // 3: SE
        (1, 0),   // 4: S
        (1, -1),  // 5: SW
        (0, -1),  // 6: W
        (-1, -1), // 7: NW
    ];

    /// Numeric direction code (0-7)
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Direction for a code, `None` for anything above 7
    pub fn from_code(code: u8) -> Option<Compass> {
        Self::ALL.get(code as usize).copied()
    }

    /// Movement vector (row_offset, col_offset)
    pub fn offset(self) -> (isize, isize) {
        Self::OFFSETS[self as usize]
    }

    pub fn is_diagonal(self) -> bool {
        matches!(self, Compass::NE | Compass::SE | Compass::SW | Compass::NW)
    }

    /// Distance multiplier: 1 for axis neighbors, sqrt(2) for diagonals
    pub fn distance_factor(self) -> f64 {
        if self.is_diagonal() {
            SQRT_2
        } else {
            1.0
        }
    }

    /// Step from (row, col) in this direction. `None` when the step would
    /// leave the non-negative quadrant; upper bounds are the caller's concern.
    pub fn apply(self, row: usize, col: usize) -> Option<(usize, usize)> {
        let (dr, dc) = self.offset();
        Some((row.checked_add_signed(dr)?, col.checked_add_signed(dc)?))
    }
}

/// Where a cell sits on the grid, which decides the stencil it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellPosition {
    Interior,
    North,
    South,
    West,
    East,
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl CellPosition {
    /// Classify (row, col) on a `rows x cols` grid.
    ///
    /// Needs at least 2 rows and 2 columns: on a 1-wide grid a cell would be
    /// both a north and a south edge, which none of the 9 stencils describe.
    pub fn classify(row: usize, col: usize, rows: usize, cols: usize) -> Option<CellPosition> {
        if rows < 2 || cols < 2 || row >= rows || col >= cols {
            return None;
        }
        let north = row == 0;
        let south = row == rows - 1;
        let west = col == 0;
        let east = col == cols - 1;

        let position = match (north, south, west, east) {
            (true, _, true, _) => CellPosition::NorthWest,
            (true, _, _, true) => CellPosition::NorthEast,
            (_, true, _, true) => CellPosition::SouthEast,
            (_, true, true, _) => CellPosition::SouthWest,
            (true, ..) => CellPosition::North,
            (_, true, ..) => CellPosition::South,
            (.., true, _) => CellPosition::West,
            (.., true) => CellPosition::East,
            _ => CellPosition::Interior,
        };
        Some(position)
    }

    /// Neighbor directions that exist at this position, in code order
    pub fn directions(self) -> &'static [Compass] {
        use Compass::*;
        match self {
            CellPosition::Interior => &[N, NE, E, SE, S, SW, W, NW],
            CellPosition::North => &[E, SE, S, SW, W],
            CellPosition::South => &[N, NE, E, W, NW],
            CellPosition::West => &[N, NE, E, SE, S],
            CellPosition::East => &[N, S, SW, W, NW],
            CellPosition::NorthWest => &[E, SE, S],
            CellPosition::NorthEast => &[S, SW, W],
            CellPosition::SouthEast => &[N, W, NW],
            CellPosition::SouthWest => &[N, NE, E],
        }
    }

    pub fn is_interior(self) -> bool {
        self == CellPosition::Interior
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            CellPosition::NorthWest
                | CellPosition::NorthEast
                | CellPosition::SouthEast
                | CellPosition::SouthWest
        )
    }
}

/// Iterator over the on-grid neighbors of a cell as `(direction, value)`
pub struct Neighbors<'a, T: RasterElement> {
    raster: &'a Raster<T>,
    center_row: usize,
    center_col: usize,
    index: usize,
}

impl<'a, T: RasterElement> Neighbors<'a, T> {
    pub fn new(raster: &'a Raster<T>, row: usize, col: usize) -> Self {
        Self {
            raster,
            center_row: row,
            center_col: col,
            index: 0,
        }
    }
}

impl<'a, T: RasterElement> Iterator for Neighbors<'a, T> {
    type Item = (Compass, T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&dir) = Compass::ALL.get(self.index) {
            self.index += 1;
            if let Some(value) = self.raster.neighbor(self.center_row, self.center_col, dir) {
                return Some((dir, value));
            }
        }
        None
    }
}
