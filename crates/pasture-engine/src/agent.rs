//! Agents, the [`Steppable`] capability, and the agent arena.
//!
//! # Arena + index
//!
//! All agents live in one [`AgentArena`] owned by the model. Agents never
//! hold references to each other or to the world: they name peers by
//! [`AgentId`] and reach shared state through the [`StepContext`] handed
//! to [`Steppable::step`].
//!
//! While an agent acts it is checked out of the arena, so the context's
//! `agents` field holds every *other* agent and can be borrowed mutably
//! (a wolf marks its prey, a sheep grazes a patch) without aliasing the
//! actor.

use indexmap::IndexMap;
use pasture_core::{AgentId, IdAllocator, Species, StepError};
use pasture_space::{Cell, Occupancy};
use std::fmt;

use crate::behavior::{Patch, Sheep, Wolf};
use crate::config::SimConfig;
use crate::deferred::DeferredMutations;
use crate::rng::AgentRng;

// ── MovePolicy ─────────────────────────────────────────────────────

/// How a mobile agent chooses its next cell.
///
/// Only the random walk is implemented. Any other name is kept verbatim
/// and rejected with [`StepError::UnsupportedMovement`] when the agent
/// tries to move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MovePolicy {
    /// Uniform pick among the Moore neighbours.
    #[default]
    RandomWalk,
    /// A policy this engine does not implement.
    Named(String),
}

impl From<&str> for MovePolicy {
    fn from(name: &str) -> Self {
        match name {
            "random" => Self::RandomWalk,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for MovePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomWalk => f.write_str("random"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

// ── Actor / Body / Agent ───────────────────────────────────────────

/// State every agent carries regardless of species.
#[derive(Clone, Debug)]
pub struct Actor {
    /// Lifetime-unique identity.
    pub id: AgentId,
    /// Current cell. Kept equal to the occupancy index's record.
    pub cell: Cell,
    /// The agent's private random stream.
    pub rng: AgentRng,
}

/// Species-specific state, tagged by variant.
#[derive(Clone, Debug)]
pub enum Body {
    /// A sheep.
    Sheep(Sheep),
    /// A wolf.
    Wolf(Wolf),
    /// A grass patch.
    Patch(Patch),
}

impl Body {
    /// The variant tag.
    pub fn species(&self) -> Species {
        match self {
            Self::Sheep(_) => Species::Sheep,
            Self::Wolf(_) => Species::Wolf,
            Self::Patch(_) => Species::Patch,
        }
    }

    /// The sheep state, if this is a sheep.
    pub fn as_sheep(&self) -> Option<&Sheep> {
        match self {
            Self::Sheep(sheep) => Some(sheep),
            _ => None,
        }
    }

    /// Mutable sheep state, if this is a sheep.
    pub fn as_sheep_mut(&mut self) -> Option<&mut Sheep> {
        match self {
            Self::Sheep(sheep) => Some(sheep),
            _ => None,
        }
    }

    /// The wolf state, if this is a wolf.
    pub fn as_wolf(&self) -> Option<&Wolf> {
        match self {
            Self::Wolf(wolf) => Some(wolf),
            _ => None,
        }
    }

    /// The patch state, if this is a patch.
    pub fn as_patch(&self) -> Option<&Patch> {
        match self {
            Self::Patch(patch) => Some(patch),
            _ => None,
        }
    }

    /// Mutable patch state, if this is a patch.
    pub fn as_patch_mut(&mut self) -> Option<&mut Patch> {
        match self {
            Self::Patch(patch) => Some(patch),
            _ => None,
        }
    }
}

/// One simulated agent.
#[derive(Clone, Debug)]
pub struct Agent {
    /// Identity, position and random stream.
    pub actor: Actor,
    /// Species-specific state.
    pub body: Body,
}

impl Agent {
    /// The agent's ID.
    pub fn id(&self) -> AgentId {
        self.actor.id
    }

    /// The agent's current cell.
    pub fn cell(&self) -> Cell {
        self.actor.cell
    }

    /// The agent's species tag.
    pub fn species(&self) -> Species {
        self.body.species()
    }
}

// ── Steppable ──────────────────────────────────────────────────────

/// Shared world state lent to the acting agent for one `step` call.
///
/// The acting agent itself is absent from `agents`.
pub struct StepContext<'a> {
    /// Multi-occupancy index; movers update it directly.
    pub occupancy: &'a mut Occupancy,
    /// Every agent except the one acting.
    pub agents: &'a mut AgentArena,
    /// Birth and death requests for this tick.
    pub deferred: &'a mut DeferredMutations,
    /// Read-only simulation parameters.
    pub config: &'a SimConfig,
    /// Source of IDs for newborns.
    pub ids: &'a mut IdAllocator,
}

/// One agent's behaviour for one tick.
///
/// # Contract
///
/// - Called at most once per agent per tick, by the model's activation
///   pass, with the agent checked out of the arena.
/// - Births and deaths go through `ctx.deferred`, never directly into the
///   arena or the occupancy index.
/// - Moves update both `actor.cell` and `ctx.occupancy` together.
pub trait Steppable {
    /// Run this agent's rules for the current tick.
    fn step(&mut self, actor: &mut Actor, ctx: &mut StepContext<'_>) -> Result<(), StepError>;
}

impl Steppable for Body {
    fn step(&mut self, actor: &mut Actor, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        match self {
            Self::Sheep(sheep) => sheep.step(actor, ctx),
            Self::Wolf(wolf) => wolf.step(actor, ctx),
            Self::Patch(patch) => patch.step(actor, ctx),
        }
    }
}

// ── AgentArena ─────────────────────────────────────────────────────

/// An agent temporarily taken out of the arena while it acts.
#[derive(Debug)]
pub struct Checkout {
    slot: usize,
    /// The checked-out agent.
    pub agent: Agent,
}

/// Owner of every live agent, in creation order.
#[derive(Clone, Debug, Default)]
pub struct AgentArena {
    agents: IndexMap<AgentId, Agent>,
}

impl AgentArena {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `agent`. Returns the previous agent with the same ID, which
    /// only happens if IDs were forged outside the model's allocator.
    pub fn insert(&mut self, agent: Agent) -> Option<Agent> {
        self.agents.insert(agent.id(), agent)
    }

    /// Remove an agent, keeping the creation order of the rest.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.shift_remove(&id)
    }

    /// Look up an agent.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Look up an agent mutably.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Whether `id` names a live agent.
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// Take `id` out of the arena for the duration of its step.
    pub fn checkout(&mut self, id: AgentId) -> Option<Checkout> {
        let (slot, _, agent) = self.agents.swap_remove_full(&id)?;
        Some(Checkout { slot, agent })
    }

    /// Put a checked-out agent back in its original slot.
    pub fn restore(&mut self, checkout: Checkout) {
        let Checkout { slot, agent } = checkout;
        let (last, _) = self.agents.insert_full(agent.id(), agent);
        self.agents.swap_indices(slot, last);
    }
}
