//! Per-tick population counts.
//!
//! The model records one [`PopulationCounts`] row at the start of every
//! tick (the Collecting phase), before any agent acts. Row `n` of the
//! [`MetricsSeries`] therefore describes the world that tick `n + 1`
//! started from. Readers on other threads get owned copies via
//! [`to_vec()`](MetricsSeries::to_vec), never references into the model.

use crate::agent::{AgentArena, Body};

/// Live population at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PopulationCounts {
    /// Live sheep, sick or not.
    pub sheep: usize,
    /// Live wolves.
    pub wolves: usize,
    /// Patches currently bearing grass.
    pub grass: usize,
    /// Sick sheep; `None` when the disease model is disabled.
    pub sick_sheep: Option<usize>,
}

impl PopulationCounts {
    /// Count every agent in `agents`.
    pub fn census(agents: &AgentArena, sickness_enabled: bool) -> Self {
        let mut counts = Self::default();
        let mut sick = 0;
        for agent in agents.iter() {
            match &agent.body {
                Body::Sheep(sheep) => {
                    counts.sheep += 1;
                    if sheep.is_sick {
                        sick += 1;
                    }
                }
                Body::Wolf(_) => counts.wolves += 1,
                Body::Patch(patch) => {
                    if patch.has_grass {
                        counts.grass += 1;
                    }
                }
            }
        }
        counts.sick_sheep = sickness_enabled.then_some(sick);
        counts
    }
}

/// Append-only history of [`PopulationCounts`], one row per tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSeries {
    rows: Vec<PopulationCounts>,
}

impl MetricsSeries {
    /// An empty series.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, counts: PopulationCounts) {
        self.rows.push(counts);
    }

    /// Every recorded row, oldest first.
    pub fn as_slice(&self) -> &[PopulationCounts] {
        &self.rows
    }

    /// The most recent row.
    pub fn latest(&self) -> Option<&PopulationCounts> {
        self.rows.last()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sheep column.
    pub fn sheep(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.sheep).collect()
    }

    /// Wolf column.
    pub fn wolves(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.wolves).collect()
    }

    /// Grass column.
    pub fn grass(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.grass).collect()
    }

    /// Sick-sheep column, `None` if any row was recorded without sickness.
    pub fn sick_sheep(&self) -> Option<Vec<usize>> {
        self.rows.iter().map(|r| r.sick_sheep).collect()
    }

    /// Owned copy of every row.
    pub fn to_vec(&self) -> Vec<PopulationCounts> {
        self.rows.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Actor, Agent};
    use crate::behavior::{Patch, Sheep, Wolf};
    use crate::rng::AgentRng;
    use pasture_core::AgentId;
    use pasture_space::Cell;

    fn agent(id: u64, body: Body) -> Agent {
        Agent {
            actor: Actor {
                id: AgentId(id),
                cell: Cell::new(0, 0),
                rng: AgentRng::seed_from_u64(id),
            },
            body,
        }
    }

    fn arena() -> AgentArena {
        let mut sick = Sheep::new(5);
        sick.is_sick = true;
        let mut arena = AgentArena::new();
        arena.insert(agent(0, Patch::default().into()));
        arena.insert(agent(1, Patch::bare().into()));
        arena.insert(agent(2, Sheep::new(5).into()));
        arena.insert(agent(3, sick.into()));
        arena.insert(agent(4, Wolf::new(9).into()));
        arena
    }

    #[test]
    fn census_counts_by_tag() {
        let counts = PopulationCounts::census(&arena(), true);
        assert_eq!(
            counts,
            PopulationCounts {
                sheep: 2,
                wolves: 1,
                grass: 1,
                sick_sheep: Some(1),
            }
        );
    }

    #[test]
    fn sick_count_absent_when_disabled() {
        let counts = PopulationCounts::census(&arena(), false);
        assert_eq!(counts.sick_sheep, None);
        assert_eq!(counts.sheep, 2);
    }

    #[test]
    fn columns_follow_rows() {
        let mut series = MetricsSeries::new();
        series.push(PopulationCounts {
            sheep: 3,
            wolves: 1,
            grass: 7,
            sick_sheep: Some(0),
        });
        series.push(PopulationCounts {
            sheep: 4,
            wolves: 0,
            grass: 6,
            sick_sheep: Some(2),
        });
        assert_eq!(series.sheep(), vec![3, 4]);
        assert_eq!(series.wolves(), vec![1, 0]);
        assert_eq!(series.grass(), vec![7, 6]);
        assert_eq!(series.sick_sheep(), Some(vec![0, 2]));
        assert_eq!(series.latest().map(|r| r.sheep), Some(4));
        assert_eq!(series.to_vec().len(), 2);
    }

    #[test]
    fn sick_column_none_without_sickness() {
        let mut series = MetricsSeries::new();
        series.push(PopulationCounts::default());
        assert_eq!(series.sick_sheep(), None);
    }
}
