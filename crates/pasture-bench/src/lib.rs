//! Benchmark profiles for the Pasture predator-prey simulation.
//!
//! Provides pre-built [`SimConfig`] profiles for benchmarks and soak runs:
//!
//! - [`reference_profile`]: the classic 20x20 torus, 100 sheep, 50 wolves
//! - [`stress_profile`]: 200x200 torus (40K cells) with sickness enabled
//! - [`warmed_model`]: a model already stepped past its initial transient

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;

use pasture_engine::{Model, SicknessConfig, SimConfig};
use pasture_space::EdgeBehavior;

/// Build the reference profile: default parameters, 20x20 wrapped grid.
pub fn reference_profile(seed: u64) -> SimConfig {
    SimConfig {
        seed,
        ..SimConfig::default()
    }
}

/// Build a stress profile: 200x200 wrapped grid (40K cells).
///
/// Keeps the reference densities (one sheep per four cells, one wolf per
/// eight) and switches the disease model on so every sheep behaviour runs.
pub fn stress_profile(seed: u64) -> SimConfig {
    let mut config = SimConfig {
        seed,
        initial_sheep: 10_000,
        initial_wolves: 5_000,
        sickness: Some(SicknessConfig::default()),
        ..SimConfig::default()
    };
    config.grid.width = 200;
    config.grid.height = 200;
    config.grid.edge = EdgeBehavior::Wrap;
    config
}

/// Build a model from `config` and run `ticks` ticks on it.
pub fn warmed_model(config: SimConfig, ticks: u64) -> Result<Model, Box<dyn Error>> {
    let mut model = Model::new(config)?;
    model.run(ticks)?;
    Ok(model)
}
