//! Multi-occupancy spatial index.
//!
//! [`Occupancy`] maps each cell of a [`Grid`] to the agents standing on it.
//! Several agents may share a cell. Within a cell, agents are kept in
//! insertion order, so a scan of [`occupants`](Occupancy::occupants) is
//! deterministic: the first agent placed is the first one found.
//!
//! # Contract
//!
//! An agent is in at most one cell at a time. Placing an agent that is
//! already placed, or removing/moving an agent from a cell it is not in,
//! is a programmer error and panics. These are not recoverable failures.

use crate::cell::Cell;
use crate::grid::Grid;
use indexmap::IndexMap;
use pasture_core::AgentId;

/// Cell → agents index with a reverse agent → cell lookup.
#[derive(Clone, Debug)]
pub struct Occupancy {
    grid: Grid,
    cells: Vec<Vec<AgentId>>,
    positions: IndexMap<AgentId, Cell>,
}

impl Occupancy {
    /// An empty index over `grid`.
    pub fn new(grid: Grid) -> Self {
        let cells = vec![Vec::new(); grid.cell_count()];
        Self {
            grid,
            cells,
            positions: IndexMap::new(),
        }
    }

    /// The topology this index is laid over.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Moore neighbourhood of `cell` (delegates to the grid).
    pub fn neighbours(&self, cell: Cell) -> smallvec::SmallVec<[Cell; 8]> {
        self.grid.neighbours(cell)
    }

    /// Agents on `cell`, in placement order. Empty for out-of-bounds cells.
    pub fn occupants(&self, cell: Cell) -> &[AgentId] {
        match self.grid.rank(cell) {
            Some(rank) => &self.cells[rank],
            None => &[],
        }
    }

    /// The cell `agent` currently occupies, if it is placed.
    pub fn cell_of(&self, agent: AgentId) -> Option<Cell> {
        self.positions.get(&agent).copied()
    }

    /// Whether `agent` is placed anywhere.
    pub fn contains(&self, agent: AgentId) -> bool {
        self.positions.contains_key(&agent)
    }

    /// Number of placed agents.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no agent is placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over every placed agent and its cell.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, Cell)> + '_ {
        self.positions.iter().map(|(&id, &cell)| (id, cell))
    }

    /// Place `agent` on `cell`.
    ///
    /// # Panics
    ///
    /// If `cell` is out of bounds or `agent` is already placed.
    pub fn place(&mut self, agent: AgentId, cell: Cell) {
        let rank = self.rank_or_panic(cell);
        if let Some(existing) = self.positions.insert(agent, cell) {
            panic!("agent {agent} placed at {cell} while already at {existing}");
        }
        self.cells[rank].push(agent);
    }

    /// Move `agent` from `from` to `to`.
    ///
    /// The agent joins the end of `to`'s scan order.
    ///
    /// # Panics
    ///
    /// If either cell is out of bounds or `agent` is not at `from`.
    pub fn move_agent(&mut self, agent: AgentId, from: Cell, to: Cell) {
        let to_rank = self.rank_or_panic(to);
        self.detach(agent, from);
        self.cells[to_rank].push(agent);
        self.positions.insert(agent, to);
    }

    /// Remove `agent` from `cell`.
    ///
    /// # Panics
    ///
    /// If `cell` is out of bounds or `agent` is not at `cell`.
    pub fn remove(&mut self, agent: AgentId, cell: Cell) {
        self.detach(agent, cell);
        self.positions.swap_remove(&agent);
    }

    fn detach(&mut self, agent: AgentId, cell: Cell) {
        let rank = self.rank_or_panic(cell);
        match self.positions.get(&agent) {
            Some(&at) if at == cell => {}
            Some(&at) => panic!("agent {agent} expected at {cell} but is at {at}"),
            None => panic!("agent {agent} expected at {cell} but is not placed"),
        }
        // Cells hold a handful of agents; shifting keeps scan order stable.
        let slot = &mut self.cells[rank];
        if let Some(index) = slot.iter().position(|&id| id == agent) {
            slot.remove(index);
        }
    }

    fn rank_or_panic(&self, cell: Cell) -> usize {
        match self.grid.rank(cell) {
            Some(rank) => rank,
            None => panic!(
                "cell {cell} outside {}x{} grid",
                self.grid.width(),
                self.grid.height()
            ),
        }
    }
}
