//! Grid boundary behaviour.

/// How the grid treats neighbours that fall off its edges.
///
/// # Examples
///
/// ```
/// use pasture_space::{Cell, EdgeBehavior, Grid};
///
/// // Absorb: a corner has 3 neighbours, an interior cell 8.
/// let clipped = Grid::new(4, 4, EdgeBehavior::Absorb).unwrap();
/// assert_eq!(clipped.neighbours(Cell::new(0, 0)).len(), 3);
/// assert_eq!(clipped.neighbours(Cell::new(1, 1)).len(), 8);
///
/// // Wrap: every cell has exactly 8 neighbours (torus).
/// let torus = Grid::new(4, 4, EdgeBehavior::Wrap).unwrap();
/// assert_eq!(torus.neighbours(Cell::new(0, 0)).len(), 8);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbour wraps to the opposite side (torus).
    #[default]
    Wrap,
    /// Out-of-bounds neighbour is omitted (fewer neighbours at edges).
    Absorb,
}

impl EdgeBehavior {
    /// Resolve a single axis value against an axis of length `len`.
    ///
    /// Returns `None` when the value is out of bounds under `Absorb`.
    pub(crate) fn resolve_axis(self, val: i32, len: u32) -> Option<i32> {
        let n = len as i32;
        if (0..n).contains(&val) {
            return Some(val);
        }
        match self {
            Self::Absorb => None,
            Self::Wrap => Some(val.rem_euclid(n)),
        }
    }
}
