//! 2D square grid with 8-connected (Moore) neighbourhood.

use crate::cell::Cell;
use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use smallvec::SmallVec;

/// All 8 offsets as `(dx, dy)`: N, S, W, E, NW, NE, SW, SE.
const OFFSETS_8: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// A two-dimensional grid with a Moore neighbourhood.
///
/// Neighbours include the four cardinal directions plus the four
/// diagonals, never the centre cell itself. Boundary handling is
/// controlled by [`EdgeBehavior`]:
/// - **Wrap**: periodic boundary (torus), every cell has 8 neighbours
/// - **Absorb**: edge cells have fewer neighbours (corners 3, edges 5)
///
/// On a wrapped grid narrower than 3 cells along an axis, distinct
/// offsets may land on the same cell; `neighbours` keeps one entry per
/// offset so a uniform pick stays uniform over directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    edge: EdgeBehavior,
}

impl Grid {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a `width × height` grid with the given edge behaviour.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds `i32::MAX`.
    pub fn new(width: u32, height: u32, edge: EdgeBehavior) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if width > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self {
            width,
            height,
            edge,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Edge behaviour.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width as i32 && cell.y < self.height as i32
    }

    /// Return `Ok(())` if `cell` is inside the grid.
    pub fn check(&self, cell: Cell) -> Result<(), SpaceError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(SpaceError::CellOutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// The Moore neighbourhood of `cell`, in offset order.
    pub fn neighbours(&self, cell: Cell) -> SmallVec<[Cell; 8]> {
        OFFSETS_8
            .iter()
            .filter_map(|&(dx, dy)| {
                let x = self.edge.resolve_axis(cell.x + dx, self.width)?;
                let y = self.edge.resolve_axis(cell.y + dy, self.height)?;
                Some(Cell::new(x, y))
            })
            .collect()
    }

    /// Row-major position of `cell`, or `None` if out of bounds.
    pub fn rank(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some((cell.y as usize) * (self.width as usize) + (cell.x as usize))
    }

    /// All cells in row-major order: `(0,0), (1,0), ..., (w-1, h-1)`.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }
}
