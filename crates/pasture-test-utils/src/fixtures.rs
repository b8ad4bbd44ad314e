//! Reusable configuration fixtures.
//!
//! - [`frozen`]: nothing costs, gains, or breeds. Agents wander forever.
//! - [`movement_only`]: moves cost energy, nothing feeds or breeds.
//! - [`breeding`]: free moves and certain reproduction every tick.
//! - [`with_sickness`]: enable the disease model on any fixture.

use pasture_engine::{GridConfig, SicknessConfig, SimConfig, SpeciesConfig};
use pasture_space::EdgeBehavior;

fn species(initial_energy: i64, move_cost: i64, energy_gain: i64, rate: f64) -> SpeciesConfig {
    SpeciesConfig {
        initial_energy,
        move_cost,
        energy_gain,
        reproduction_rate: rate,
    }
}

fn base(width: u32, height: u32, sheep: usize, wolves: usize) -> SimConfig {
    SimConfig {
        grid: GridConfig {
            width,
            height,
            edge: EdgeBehavior::Wrap,
        },
        seed: 42,
        grass_regrowth_time: 10,
        initial_sheep: sheep,
        initial_wolves: wolves,
        ..SimConfig::default()
    }
}

/// Zero move costs, zero gains, zero reproduction, no sickness.
///
/// With no wolves (or no sheep) nothing can ever die or be born.
pub fn frozen(width: u32, height: u32, sheep: usize, wolves: usize) -> SimConfig {
    SimConfig {
        sheep: species(20, 0, 0, 0.0),
        wolf: species(30, 0, 0, 0.0),
        ..base(width, height, sheep, wolves)
    }
}

/// Moves cost `move_cost` energy for both species; nothing feeds or breeds.
pub fn movement_only(
    width: u32,
    height: u32,
    sheep: usize,
    wolves: usize,
    initial_energy: i64,
    move_cost: i64,
) -> SimConfig {
    SimConfig {
        sheep: species(initial_energy, move_cost, 0, 0.0),
        wolf: species(initial_energy, move_cost, 0, 0.0),
        ..base(width, height, sheep, wolves)
    }
}

/// Free moves and certain reproduction for both species.
pub fn breeding(width: u32, height: u32, sheep: usize, wolves: usize) -> SimConfig {
    SimConfig {
        sheep: species(20, 0, 0, 1.0),
        wolf: species(30, 0, 0, 1.0),
        ..base(width, height, sheep, wolves)
    }
}

/// `config` with the disease model switched on.
pub fn with_sickness(config: SimConfig, sickness: SicknessConfig) -> SimConfig {
    SimConfig {
        sickness: Some(sickness),
        ..config
    }
}
