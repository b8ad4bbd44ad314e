//! Owned per-cell view of the grid for renderers.
//!
//! A [`GridSnapshot`] is a detached copy: it holds counts, not agent
//! references, so it can be sent to another thread and outlive the model
//! tick that produced it.

use pasture_space::{Cell, Occupancy};
use std::fmt;

use crate::agent::{AgentArena, Body};

/// Display category of a cell.
///
/// When a cell is multiply occupied the category follows a fixed
/// precedence: any wolf, then mixed sheep (shown as sick), then healthy
/// sheep, then sick sheep, then grass, then a bare patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellCategory {
    /// No agent at all.
    Empty,
    /// At least one wolf.
    Wolf,
    /// Sick sheep present (possibly with healthy ones), no wolf.
    SickSheep,
    /// Only healthy sheep, no wolf.
    HealthySheep,
    /// No animal; a patch with grass.
    Grass,
    /// No animal; a grazed patch.
    Bare,
}

impl CellCategory {
    /// One-character glyph used by [`GridSnapshot::render`].
    pub fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wolf => 'W',
            Self::SickSheep => 's',
            Self::HealthySheep => 'S',
            Self::Grass => '"',
            Self::Bare => '.',
        }
    }
}

/// Agent counts on one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellView {
    /// Wolves on the cell.
    pub wolves: usize,
    /// Healthy sheep on the cell.
    pub healthy_sheep: usize,
    /// Sick sheep on the cell.
    pub sick_sheep: usize,
    /// Patches on the cell, grazed or not.
    pub patches: usize,
    /// Patches on the cell bearing grass.
    pub grass: usize,
}

impl CellView {
    /// The display category under the fixed precedence.
    pub fn category(&self) -> CellCategory {
        if self.wolves > 0 {
            CellCategory::Wolf
        } else if self.sick_sheep > 0 {
            CellCategory::SickSheep
        } else if self.healthy_sheep > 0 {
            CellCategory::HealthySheep
        } else if self.grass > 0 {
            CellCategory::Grass
        } else if self.patches > 0 {
            CellCategory::Bare
        } else {
            CellCategory::Empty
        }
    }
}

/// Every cell's [`CellView`], row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSnapshot {
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// `cells[y * width + x]` describes `Cell { x, y }`.
    pub cells: Vec<CellView>,
}

impl GridSnapshot {
    /// Count what stands on every cell of `occupancy`.
    pub fn capture(occupancy: &Occupancy, agents: &AgentArena) -> Self {
        let grid = occupancy.grid();
        let cells = grid
            .cells()
            .map(|cell| {
                let mut view = CellView::default();
                for &id in occupancy.occupants(cell) {
                    match agents.get(id).map(|a| &a.body) {
                        Some(Body::Wolf(_)) => view.wolves += 1,
                        Some(Body::Sheep(s)) if s.is_sick => view.sick_sheep += 1,
                        Some(Body::Sheep(_)) => view.healthy_sheep += 1,
                        Some(Body::Patch(p)) => {
                            view.patches += 1;
                            if p.has_grass {
                                view.grass += 1;
                            }
                        }
                        None => {}
                    }
                }
                view
            })
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
        }
    }

    /// View of `cell`, `None` if out of bounds.
    pub fn get(&self, cell: Cell) -> Option<&CellView> {
        if cell.x < 0 || cell.y < 0 || cell.x as u32 >= self.width || cell.y as u32 >= self.height {
            return None;
        }
        self.cells
            .get(cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Category of every cell, row-major.
    pub fn categories(&self) -> impl Iterator<Item = CellCategory> + '_ {
        self.cells.iter().map(CellView::category)
    }

    /// Text matrix, one glyph per cell, one line per row.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.width.max(1) as usize;
        for (y, row) in self.cells.chunks(width).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for view in row {
                write!(f, "{}", view.category().glyph())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(wolves: usize, healthy: usize, sick: usize, patches: usize, grass: usize) -> CellView {
        CellView {
            wolves,
            healthy_sheep: healthy,
            sick_sheep: sick,
            patches,
            grass,
        }
    }

    #[test]
    fn wolf_dominates() {
        assert_eq!(view(1, 3, 2, 1, 1).category(), CellCategory::Wolf);
        assert_eq!(view(1, 0, 0, 0, 0).category(), CellCategory::Wolf);
    }

    #[test]
    fn mixed_sheep_show_as_sick() {
        assert_eq!(view(0, 2, 1, 1, 1).category(), CellCategory::SickSheep);
    }

    #[test]
    fn single_kind_sheep() {
        assert_eq!(view(0, 2, 0, 1, 1).category(), CellCategory::HealthySheep);
        assert_eq!(view(0, 0, 2, 1, 0).category(), CellCategory::SickSheep);
    }

    #[test]
    fn patches_then_empty() {
        assert_eq!(view(0, 0, 0, 1, 1).category(), CellCategory::Grass);
        assert_eq!(view(0, 0, 0, 1, 0).category(), CellCategory::Bare);
        assert_eq!(view(0, 0, 0, 0, 0).category(), CellCategory::Empty);
    }

    #[test]
    fn render_is_row_major() {
        let snap = GridSnapshot {
            width: 3,
            height: 2,
            cells: vec![
                view(1, 0, 0, 1, 1),
                view(0, 1, 0, 1, 1),
                view(0, 0, 1, 1, 0),
                view(0, 0, 0, 1, 1),
                view(0, 0, 0, 1, 0),
                view(0, 0, 0, 0, 0),
            ],
        };
        assert_eq!(snap.render(), "WSs\n\". ");
        assert_eq!(snap.get(Cell::new(2, 0)).map(|v| v.sick_sheep), Some(1));
        assert_eq!(snap.get(Cell::new(3, 0)), None);
    }
}
