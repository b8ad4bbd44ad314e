//! The model orchestrator and its tick protocol.
//!
//! [`Model`] owns everything: the occupancy index, the agent arena, the
//! scheduler, the deferred queues, the shared random stream and the
//! metrics series. One [`step()`](Model::step) runs one full cycle of
//!
//! ```text
//! Idle → Collecting → Activating → Reconciling → Idle
//! ```
//!
//! - **Collecting** records population counts *before* anything moves.
//! - **Activating** steps every scheduled agent once, in a fresh random
//!   order. Agents may move themselves and flag each other, but births
//!   and deaths are only queued.
//! - **Reconciling** removes the dead from the grid, scheduler and arena,
//!   then materialises the newborns. Newborns first act on the next tick.
//!
//! # Ownership model
//!
//! `Model` is [`Send`] and all mutation goes through `&mut self`, so at
//! most one tick is ever in flight. Readers that live on another thread
//! take owned copies ([`MetricsSeries::to_vec`], [`GridSnapshot`]).

use pasture_core::{AgentId, IdAllocator, Species, StepError, TickId};
use pasture_space::{Cell, Grid, Occupancy, SpaceError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::agent::{Actor, Agent, AgentArena, Body, StepContext, Steppable};
use crate::behavior::{Patch, Sheep, Wolf};
use crate::config::{ConfigError, SimConfig};
use crate::deferred::{BirthOrder, DeferredMutations};
use crate::metrics::{MetricsSeries, PopulationCounts};
use crate::rng::AgentRng;
use crate::scheduler::Scheduler;
use crate::snapshot::GridSnapshot;

// Compile-time assertion: Model can be moved onto a worker thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Model>();
    }
};

// ── TickPhase / TickReport ─────────────────────────────────────────

/// Where the model is within its tick cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickPhase {
    /// Between ticks.
    #[default]
    Idle,
    /// Recording population counts.
    Collecting,
    /// Running agent behaviours.
    Activating,
    /// Applying queued deaths and births.
    Reconciling,
}

/// Summary of one completed tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// The tick that just completed.
    pub tick: TickId,
    /// Population recorded in the Collecting phase of this tick.
    pub counts: PopulationCounts,
    /// Agents born during this tick.
    pub births: usize,
    /// Agents removed during this tick.
    pub deaths: usize,
}

// ── ConsistencyError ───────────────────────────────────────────────

/// A broken structural invariant, reported by
/// [`Model::check_consistency`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    /// A live agent is missing from the occupancy index.
    #[error("agent {agent} is live but not on the grid")]
    NotPlaced {
        /// The agent.
        agent: AgentId,
    },
    /// A live agent is missing from the scheduler.
    #[error("agent {agent} is live but not scheduled")]
    NotScheduled {
        /// The agent.
        agent: AgentId,
    },
    /// An agent's own cell disagrees with the index.
    #[error("agent {agent} thinks it is at {recorded} but the grid has it at {indexed}")]
    Misplaced {
        /// The agent.
        agent: AgentId,
        /// Cell stored on the agent.
        recorded: Cell,
        /// Cell stored in the index.
        indexed: Cell,
    },
    /// The index or scheduler lists an agent that is not live.
    #[error("agent {agent} is indexed but not live")]
    Stray {
        /// The agent.
        agent: AgentId,
    },
    /// Deferred queues were not drained.
    #[error("{deaths} deaths and {births} births still pending between ticks")]
    PendingMutations {
        /// Queued deaths.
        deaths: usize,
        /// Queued births.
        births: usize,
    },
}

// ── Model ──────────────────────────────────────────────────────────

/// A predator-prey-grass world and its tick protocol.
///
/// # Example
///
/// ```
/// use pasture_engine::{Model, SimConfig};
///
/// let mut model = Model::new(SimConfig::default()).unwrap();
/// let report = model.step().unwrap();
/// assert_eq!(report.tick.0, 1);
/// assert_eq!(report.counts.sheep, 100);
/// ```
#[derive(Debug)]
pub struct Model {
    config: SimConfig,
    occupancy: Occupancy,
    agents: AgentArena,
    scheduler: Scheduler,
    deferred: DeferredMutations,
    ids: IdAllocator,
    rng: ChaCha8Rng,
    metrics: MetricsSeries,
    tick: TickId,
    phase: TickPhase,
    running: bool,
}

impl Model {
    /// Validate `config` and build the initial world.
    ///
    /// One grass-bearing patch goes on every cell, then the initial sheep
    /// and wolves on uniformly random cells.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = config.grid.build()?;
        let model = Self::populate(config, grid);
        info!(
            width = model.grid().width(),
            height = model.grid().height(),
            edge = ?model.grid().edge_behavior(),
            seed = model.config.seed,
            sheep = model.config.initial_sheep,
            wolves = model.config.initial_wolves,
            sickness = model.config.sickness_enabled(),
            "model initialised"
        );
        Ok(model)
    }

    fn populate(config: SimConfig, grid: Grid) -> Self {
        let mut model = Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            occupancy: Occupancy::new(grid.clone()),
            agents: AgentArena::new(),
            scheduler: Scheduler::new(),
            deferred: DeferredMutations::new(),
            ids: IdAllocator::new(),
            metrics: MetricsSeries::new(),
            tick: TickId::default(),
            phase: TickPhase::Idle,
            running: false,
            config,
        };

        for cell in grid.cells() {
            let id = model.ids.allocate();
            let rng = AgentRng::derive_from(&mut model.rng);
            model.insert(id, cell, rng, Patch::default().into());
        }
        for _ in 0..model.config.initial_sheep {
            let cell = model.random_cell();
            let id = model.ids.allocate();
            let mut rng = AgentRng::derive_from(&mut model.rng);
            let sheep = Sheep::spawn(&model.config.sheep, model.roll_initial_sickness(&mut rng));
            model.insert(id, cell, rng, sheep.into());
        }
        for _ in 0..model.config.initial_wolves {
            let cell = model.random_cell();
            let id = model.ids.allocate();
            let rng = AgentRng::derive_from(&mut model.rng);
            let wolf = Wolf::spawn(&model.config.wolf);
            model.insert(id, cell, rng, wolf.into());
        }
        model
    }

    fn random_cell(&mut self) -> Cell {
        let grid = self.occupancy.grid();
        let (width, height) = (grid.width() as i32, grid.height() as i32);
        Cell::new(
            self.rng.random_range(0..width),
            self.rng.random_range(0..height),
        )
    }

    fn roll_initial_sickness(&self, rng: &mut AgentRng) -> bool {
        self.config
            .sickness
            .as_ref()
            .is_some_and(|s| rng.unit() < s.initial_sickness_proba)
    }

    fn insert(&mut self, id: AgentId, cell: Cell, rng: AgentRng, body: Body) {
        self.occupancy.place(id, cell);
        self.scheduler.add(id);
        self.agents.insert(Agent {
            actor: Actor { id, cell, rng },
            body,
        });
    }

    /// Add an agent between ticks. It first acts on the next tick.
    ///
    /// Its random stream is drawn from the model's shared stream.
    pub fn spawn(&mut self, cell: Cell, body: Body) -> Result<AgentId, SpaceError> {
        self.occupancy.grid().check(cell)?;
        let id = self.ids.allocate();
        let rng = AgentRng::derive_from(&mut self.rng);
        debug!(agent = %id, species = %body.species(), %cell, "agent spawned");
        self.insert(id, cell, rng, body);
        Ok(id)
    }

    /// Rebuild the initial world from the same configuration with a new
    /// seed. Metrics and the tick counter start over.
    pub fn reset(&mut self, seed: u64) {
        let mut config = self.config.clone();
        config.seed = seed;
        let grid = self.occupancy.grid().clone();
        *self = Self::populate(config, grid);
        info!(seed, "model reset");
    }

    // ── Tick protocol ──────────────────────────────────────────────

    /// Run one full tick.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] if an agent's behaviour fails. The remaining
    /// agents do not act, but everything already queued is still
    /// reconciled and the tick counter advances, so the model stays
    /// consistent and can keep stepping.
    pub fn step(&mut self) -> Result<TickReport, StepError> {
        self.phase = TickPhase::Collecting;
        let counts = PopulationCounts::census(&self.agents, self.config.sickness_enabled());
        self.metrics.push(counts);

        self.phase = TickPhase::Activating;
        let outcome = self.activate();

        self.phase = TickPhase::Reconciling;
        let (deaths, births) = self.reconcile();

        self.tick = self.tick.next();
        self.phase = TickPhase::Idle;

        match outcome {
            Ok(()) => Ok(TickReport {
                tick: self.tick,
                counts,
                births,
                deaths,
            }),
            Err(err) => {
                warn!(tick = %self.tick, error = %err, "tick terminated");
                Err(err)
            }
        }
    }

    /// Run `n` ticks, stopping at the first error.
    pub fn run(&mut self, n: u64) -> Result<Vec<TickReport>, StepError> {
        (0..n).map(|_| self.step()).collect()
    }

    fn activate(&mut self) -> Result<(), StepError> {
        let order = self.scheduler.activation_order(&mut self.rng);
        for id in order {
            // Removed earlier in this pass: skip.
            let Some(mut out) = self.agents.checkout(id) else {
                continue;
            };
            let Agent { actor, body } = &mut out.agent;
            let result = {
                let mut ctx = StepContext {
                    occupancy: &mut self.occupancy,
                    agents: &mut self.agents,
                    deferred: &mut self.deferred,
                    config: &self.config,
                    ids: &mut self.ids,
                };
                body.step(actor, &mut ctx)
            };
            self.agents.restore(out);
            result?;
        }
        Ok(())
    }

    fn reconcile(&mut self) -> (usize, usize) {
        let deaths = self.deferred.drain_deaths();
        let mut removed = 0;
        for (id, cause) in deaths {
            let Some(agent) = self.agents.remove(id) else {
                continue;
            };
            self.occupancy.remove(id, agent.cell());
            self.scheduler.remove(id);
            removed += 1;
            debug!(agent = %id, species = %agent.species(), %cause, "agent removed");
        }

        let births = self.deferred.drain_births();
        let born = births.len();
        for order in births {
            self.materialise(order);
        }
        (removed, born)
    }

    fn materialise(&mut self, order: BirthOrder) {
        let BirthOrder {
            agent,
            species,
            cell,
            seed,
        } = order;
        let mut rng = AgentRng::seed_from_u64(seed);
        let body: Body = match species {
            Species::Sheep => {
                let sick = self.roll_initial_sickness(&mut rng);
                Sheep::spawn(&self.config.sheep, sick).into()
            }
            Species::Wolf => Wolf::spawn(&self.config.wolf).into(),
            Species::Patch => Patch::default().into(),
        };
        debug!(%agent, %species, %cell, "agent born");
        self.insert(agent, cell, rng, body);
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Completed ticks.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Current tick phase. Always [`TickPhase::Idle`] between calls.
    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    /// The validated configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Grid topology.
    pub fn grid(&self) -> &Grid {
        self.occupancy.grid()
    }

    /// Multi-occupancy index.
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Population history, one row per started tick.
    pub fn metrics(&self) -> &MetricsSeries {
        &self.metrics
    }

    /// Population right now (not yet recorded in the series).
    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts::census(&self.agents, self.config.sickness_enabled())
    }

    /// Owned per-cell view of the grid.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(&self.occupancy, &self.agents)
    }

    /// A live agent.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// Every live agent in creation order.
    pub fn live_agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.iter()
    }

    /// Whether an external run loop should keep stepping.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set the external run/stop flag. The model never reads it.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Verify that every live agent is scheduled and sits in exactly the
    /// cell it believes it is in, and that nothing else is indexed.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        if !self.deferred.is_empty() {
            return Err(ConsistencyError::PendingMutations {
                deaths: self.deferred.pending_deaths(),
                births: self.deferred.pending_births(),
            });
        }
        for agent in self.agents.iter() {
            let id = agent.id();
            let indexed = self
                .occupancy
                .cell_of(id)
                .ok_or(ConsistencyError::NotPlaced { agent: id })?;
            if indexed != agent.cell() {
                return Err(ConsistencyError::Misplaced {
                    agent: id,
                    recorded: agent.cell(),
                    indexed,
                });
            }
            if !self.scheduler.contains(id) {
                return Err(ConsistencyError::NotScheduled { agent: id });
            }
        }
        let stray = self
            .occupancy
            .iter()
            .map(|(id, _)| id)
            .chain(self.scheduler.iter())
            .find(|&id| !self.agents.contains(id));
        match stray {
            Some(agent) => Err(ConsistencyError::Stray { agent }),
            None => Ok(()),
        }
    }
}
