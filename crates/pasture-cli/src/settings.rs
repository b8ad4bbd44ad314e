//! Loading a [`SimConfig`] from disk.
//!
//! The file (TOML) is the base layer. Environment variables prefixed
//! `PASTURE__` override individual keys, with `__` separating sections:
//! `PASTURE__GRID__WIDTH=40`, `PASTURE__SHEEP__MOVE_COST=1`.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use pasture_engine::SimConfig;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PASTURE";

/// Load `path` layered with `PASTURE__*` overrides.
pub fn load(path: &Path) -> Result<SimConfig> {
    load_with_env(path, environment(ENV_PREFIX))
}

fn environment(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .separator("__")
        .try_parsing(true)
}

fn load_with_env(path: &Path, env: Environment) -> Result<SimConfig> {
    let settings = Config::builder()
        .add_source(File::from(path))
        .add_source(env)
        .build()
        .with_context(|| format!("failed to read {}", path.display()))?;
    settings
        .try_deserialize::<SimConfig>()
        .with_context(|| format!("invalid simulation config in {}", path.display()))
}
