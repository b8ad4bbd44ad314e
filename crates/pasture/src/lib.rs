//! Pasture: a grid-based predator-prey-grass simulation.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Pasture sub-crates. For most users, adding `pasture` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use pasture::prelude::*;
//!
//! let mut config = SimConfig::default();
//! config.grid.width = 10;
//! config.grid.height = 10;
//! config.initial_sheep = 20;
//! config.initial_wolves = 5;
//! config.sickness = Some(SicknessConfig::default());
//!
//! let mut model = Model::new(config).unwrap();
//! let reports = model.run(10).unwrap();
//! assert_eq!(reports.len(), 10);
//! assert_eq!(model.tick(), pasture::types::TickId(10));
//! assert!(model.metrics().sick_sheep().is_some());
//! println!("{}", model.snapshot());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pasture-core` | Agent and tick IDs, species tag, step errors |
//! | [`space`] | `pasture-space` | Moore grid topology and the occupancy index |
//! | [`engine`] | `pasture-engine` | Config, agents, scheduler, tick protocol, metrics, runner |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core identifiers and errors (`pasture-core`).
pub use pasture_core as types;

/// Grid topology and multi-occupancy index (`pasture-space`).
///
/// [`space::Grid`] resolves Moore neighbourhoods under
/// [`space::EdgeBehavior`]; [`space::Occupancy`] tracks which agents stand
/// on each cell.
pub use pasture_space as space;

/// The simulation engine (`pasture-engine`).
///
/// [`engine::Model`] for synchronous stepping, [`engine::Runner`] for
/// stepping on a background thread.
pub use pasture_engine as engine;

/// Common imports for typical Pasture usage.
///
/// ```rust
/// use pasture::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use pasture_core::{AgentId, Species, StepError, TickId};

    // Space
    pub use pasture_space::{Cell, EdgeBehavior, Grid};

    // Configuration
    pub use pasture_engine::{ConfigError, GridConfig, SicknessConfig, SimConfig, SpeciesConfig};

    // Agents
    pub use pasture_engine::{Body, MovePolicy, Patch, Sheep, Wolf};

    // Engine
    pub use pasture_engine::{
        CellCategory, GridSnapshot, MetricsSeries, Model, PopulationCounts, RunHandle, Runner,
        RunnerConfig, StopReason, TickReport,
    };
}
