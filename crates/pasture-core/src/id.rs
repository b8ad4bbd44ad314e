//! Strongly-typed identifiers and the [`Species`] tag.

use std::fmt;

/// Identifies one agent for its whole lifetime.
///
/// IDs are handed out by an [`IdAllocator`] owned by the model. An ID is
/// never reused, so a stale `AgentId` can only ever resolve to "gone",
/// never to a different agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AgentId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Number of ticks a model has completed.
///
/// `TickId(0)` is the freshly initialised world. The metric recorded at the
/// start of tick `n + 1` therefore describes the state at `TickId(n)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Variant tag stored on every agent.
///
/// Dispatch and population counting match on this tag instead of
/// inspecting the agent's concrete type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// Mobile grazer. Eats grass, is eaten by wolves, may fall sick.
    Sheep,
    /// Mobile predator. Eats sheep.
    Wolf,
    /// Stationary grass patch. One per cell, never dies.
    Patch,
}

impl Species {
    /// Whether agents of this species move and reproduce.
    pub fn is_mobile(self) -> bool {
        !matches!(self, Self::Patch)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sheep => "sheep",
            Self::Wolf => "wolf",
            Self::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// Monotonic [`AgentId`] source.
///
/// Not `Clone`: two allocators sharing a counter would hand out
/// duplicate IDs.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// A fresh allocator whose first ID is `AgentId(0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next unused ID.
    pub fn allocate(&mut self) -> AgentId {
        let id = AgentId(self.next);
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}
