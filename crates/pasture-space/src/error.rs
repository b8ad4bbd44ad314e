//! Error types for grid construction and spatial queries.

use crate::cell::Cell;

/// Errors arising from grid construction or coordinate checks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    /// Attempted to construct a grid with zero cells.
    #[error("grid must have at least one cell")]
    EmptySpace,
    /// A dimension exceeds what `i32` coordinates can address.
    #[error("{name} = {value} exceeds maximum {max}")]
    DimensionTooLarge {
        /// Which dimension (`"width"` or `"height"`).
        name: &'static str,
        /// The requested value.
        value: u32,
        /// The largest accepted value.
        max: u32,
    },
    /// A cell lies outside the grid.
    #[error("cell {cell} out of bounds: [0, {width}) x [0, {height})")]
    CellOutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}
