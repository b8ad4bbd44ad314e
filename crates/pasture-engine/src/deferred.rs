//! Deferred birth and death queues.
//!
//! Behaviours never add or remove agents directly. They record a
//! [`DeathCause`] or a [`BirthOrder`] here, and the model applies the
//! queued mutations in its Reconciling phase, after every agent has
//! acted. Until then a dying agent stays on the grid and a newborn does
//! not exist yet, so the activation pass always walks a stable population.
//!
//! Both queues are keyed by [`AgentId`] and enqueueing is idempotent: an
//! agent that starves and is eaten in the same tick is removed once.

use indexmap::IndexMap;
use pasture_core::{AgentId, Species};
use pasture_space::Cell;
use std::fmt;

/// Why an agent was queued for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Energy dropped below zero.
    Starvation,
    /// Eaten by a wolf.
    Predation,
    /// Killed by its illness.
    Sickness,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Starvation => "starvation",
            Self::Predation => "predation",
            Self::Sickness => "sickness",
        };
        f.write_str(name)
    }
}

/// A requested birth, materialised during reconciliation.
///
/// The child's ID is allocated when the order is placed so it can never
/// collide with an agent created later in the same tick. Its state
/// (energy, sickness) is built from configuration at reconciliation,
/// drawing from a stream seeded with `seed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BirthOrder {
    /// ID reserved for the child.
    pub agent: AgentId,
    /// Child species.
    pub species: Species,
    /// Where the child appears: the parent's cell when it reproduced.
    pub cell: Cell,
    /// Seed of the child's private stream, drawn from the parent's.
    pub seed: u64,
}

/// Pending births and deaths for the tick in flight.
#[derive(Debug, Default)]
pub struct DeferredMutations {
    deaths: IndexMap<AgentId, DeathCause>,
    births: IndexMap<AgentId, BirthOrder>,
}

impl DeferredMutations {
    /// Empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `agent` for removal.
    ///
    /// Returns `false` and keeps the first cause if it is already queued.
    pub fn enqueue_death(&mut self, agent: AgentId, cause: DeathCause) -> bool {
        if self.deaths.contains_key(&agent) {
            return false;
        }
        self.deaths.insert(agent, cause);
        true
    }

    /// Queue a birth. Returns `false` if the reserved ID is already queued.
    pub fn enqueue_birth(&mut self, order: BirthOrder) -> bool {
        if self.births.contains_key(&order.agent) {
            return false;
        }
        self.births.insert(order.agent, order);
        true
    }

    /// Whether `agent` is queued for removal this tick.
    pub fn is_dying(&self, agent: AgentId) -> bool {
        self.deaths.contains_key(&agent)
    }

    /// Cause recorded for `agent`, if queued.
    pub fn death_cause(&self, agent: AgentId) -> Option<DeathCause> {
        self.deaths.get(&agent).copied()
    }

    /// Number of queued deaths.
    pub fn pending_deaths(&self) -> usize {
        self.deaths.len()
    }

    /// Number of queued births.
    pub fn pending_births(&self) -> usize {
        self.births.len()
    }

    /// Whether both queues are empty.
    pub fn is_empty(&self) -> bool {
        self.deaths.is_empty() && self.births.is_empty()
    }

    /// Take every queued death, in enqueue order.
    pub(crate) fn drain_deaths(&mut self) -> Vec<(AgentId, DeathCause)> {
        self.deaths.drain(..).collect()
    }

    /// Take every queued birth, in enqueue order.
    pub(crate) fn drain_births(&mut self) -> Vec<BirthOrder> {
        self.births.drain(..).map(|(_, order)| order).collect()
    }
}
