//! Stepping engine for the Pasture predator-prey simulation.
//!
//! Sheep, wolves and grass patches share a wrapped or clipped grid. The
//! [`Model`] runs one tick at a time: record population counts, let every
//! agent act once in a fresh random order, then apply the births and
//! deaths the agents requested. Deferring those mutations keeps the
//! activation pass walking a stable population.
//!
//! The [`runner`] module moves a model onto a background thread for
//! front ends that plot while the simulation runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod behavior;
pub mod config;
pub mod deferred;
pub mod metrics;
pub mod model;
pub mod rng;
pub mod runner;
pub mod scheduler;
pub mod snapshot;

pub use agent::{Actor, Agent, AgentArena, Body, MovePolicy, StepContext, Steppable};
pub use behavior::{Patch, Sheep, Wolf};
pub use config::{ConfigError, GridConfig, SicknessConfig, SimConfig, SpeciesConfig};
pub use deferred::{BirthOrder, DeathCause, DeferredMutations};
pub use metrics::{MetricsSeries, PopulationCounts};
pub use model::{ConsistencyError, Model, TickPhase, TickReport};
pub use rng::AgentRng;
pub use runner::{
    RunHandle, RunOutcome, Runner, RunnerConfig, RunnerError, StopReason, TickUpdate, UPDATE_CAPACITY,
};
pub use scheduler::Scheduler;
pub use snapshot::{CellCategory, CellView, GridSnapshot};
