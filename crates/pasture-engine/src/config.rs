//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for [`Model::new`](crate::Model::new). It is
//! a plain `serde::Deserialize` record so any front end (the CLI's TOML
//! loader, a test fixture, a GUI form) can produce one. Every key is
//! required except `grid.edge` (defaults to wrap) and the optional
//! `sickness` section, whose presence switches the disease model on.
//!
//! [`validate()`](SimConfig::validate) checks value ranges at startup; a
//! model is never built from a config that fails it.

use pasture_core::Species;
use pasture_space::{EdgeBehavior, Grid, SpaceError};
use serde::Deserialize;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Grid dimensions are unusable.
    #[error("grid: {0}")]
    Grid(#[from] SpaceError),
    /// A probability or rate is NaN, infinite, or outside `[0, 1]`.
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability {
        /// Dotted key of the offending value.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A move cost or energy gain is negative.
    #[error("{species}.{name} must not be negative, got {value}")]
    NegativeEnergyDelta {
        /// Which species section.
        species: Species,
        /// Field name within the section.
        name: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// Newborn and initial agents would start already starving.
    #[error("{species}.initial_energy must be positive, got {value}")]
    NonPositiveInitialEnergy {
        /// Which species section.
        species: Species,
        /// The rejected value.
        value: i64,
    },
}

// ── Sections ───────────────────────────────────────────────────────

/// Grid dimensions and boundary handling.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Boundary behaviour. Default: wrap (torus).
    #[serde(default)]
    pub edge: EdgeBehavior,
}

impl GridConfig {
    /// Build the grid these dimensions describe.
    pub fn build(&self) -> Result<Grid, SpaceError> {
        Grid::new(self.width, self.height, self.edge)
    }
}

/// Per-species energy budget and fertility.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesConfig {
    /// Energy of agents created at initialisation or by reproduction.
    pub initial_energy: i64,
    /// Energy paid for every move.
    pub move_cost: i64,
    /// Energy gained from one meal (a grass patch or a sheep).
    pub energy_gain: i64,
    /// Per-tick probability of producing one offspring.
    pub reproduction_rate: f64,
}

impl SpeciesConfig {
    fn validate(&self, species: Species) -> Result<(), ConfigError> {
        if self.initial_energy <= 0 {
            return Err(ConfigError::NonPositiveInitialEnergy {
                species,
                value: self.initial_energy,
            });
        }
        for (name, value) in [("move_cost", self.move_cost), ("energy_gain", self.energy_gain)] {
            if value < 0 {
                return Err(ConfigError::NegativeEnergyDelta {
                    species,
                    name,
                    value,
                });
            }
        }
        let name = match species {
            Species::Wolf => "wolf.reproduction_rate",
            _ => "sheep.reproduction_rate",
        };
        check_probability(name, self.reproduction_rate)
    }
}

/// Disease model parameters. Present only when sickness is enabled.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SicknessConfig {
    /// Per-tick probability that a sick sheep recovers.
    pub recovery_proba: f64,
    /// Per-tick probability that a sick sheep dies of its illness.
    pub severity_proba: f64,
    /// Infection probability contributed by each sick cellmate.
    pub transmission_proba: f64,
    /// Probability that a new sheep starts out sick.
    pub initial_sickness_proba: f64,
}

impl Default for SicknessConfig {
    fn default() -> Self {
        Self {
            recovery_proba: 0.05,
            severity_proba: 0.01,
            transmission_proba: 0.1,
            initial_sickness_proba: 0.1,
        }
    }
}

impl SicknessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("sickness.recovery_proba", self.recovery_proba)?;
        check_probability("sickness.severity_proba", self.severity_proba)?;
        check_probability("sickness.transmission_proba", self.transmission_proba)?;
        check_probability(
            "sickness.initial_sickness_proba",
            self.initial_sickness_proba,
        )
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for building a [`Model`](crate::Model).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Grid dimensions and edge behaviour.
    pub grid: GridConfig,
    /// Seed of the model's shared random stream.
    pub seed: u64,
    /// Ticks a grazed patch stays bare before regrowing.
    pub grass_regrowth_time: u32,
    /// Sheep placed at initialisation.
    pub initial_sheep: usize,
    /// Wolves placed at initialisation.
    pub initial_wolves: usize,
    /// Sheep energy and fertility.
    pub sheep: SpeciesConfig,
    /// Wolf energy and fertility.
    pub wolf: SpeciesConfig,
    /// Disease model. `None` disables sickness entirely.
    #[serde(default)]
    pub sickness: Option<SicknessConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                width: 20,
                height: 20,
                edge: EdgeBehavior::Wrap,
            },
            seed: 0,
            grass_regrowth_time: 10,
            initial_sheep: 100,
            initial_wolves: 50,
            sheep: SpeciesConfig {
                initial_energy: 20,
                move_cost: 2,
                energy_gain: 4,
                reproduction_rate: 0.04,
            },
            wolf: SpeciesConfig {
                initial_energy: 30,
                move_cost: 6,
                energy_gain: 20,
                reproduction_rate: 0.05,
            },
            sickness: None,
        }
    }
}

impl SimConfig {
    /// Validate every value range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.build()?;
        self.sheep.validate(Species::Sheep)?;
        self.wolf.validate(Species::Wolf)?;
        if let Some(sickness) = &self.sickness {
            sickness.validate()?;
        }
        Ok(())
    }

    /// Energy section for `species`. Patches have none.
    pub fn species(&self, species: Species) -> Option<&SpeciesConfig> {
        match species {
            Species::Sheep => Some(&self.sheep),
            Species::Wolf => Some(&self.wolf),
            Species::Patch => None,
        }
    }

    /// Whether the disease model is active.
    pub fn sickness_enabled(&self) -> bool {
        self.sickness.is_some()
    }
}
