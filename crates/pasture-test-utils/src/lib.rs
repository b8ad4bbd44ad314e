//! Test utilities for Pasture development.
//!
//! Configuration fixtures that switch off parts of the rule set so a
//! property can be observed in isolation, plus a census helper that
//! counts live agents by species (rather than grass-bearing patches).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{breeding, frozen, movement_only, with_sickness};

use pasture_core::Species;
use pasture_engine::Model;

/// Live agents per species: `(sheep, wolves, patches)`.
pub fn species_census(model: &Model) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for agent in model.live_agents() {
        match agent.species() {
            Species::Sheep => counts.0 += 1,
            Species::Wolf => counts.1 += 1,
            Species::Patch => counts.2 += 1,
        }
    }
    counts
}

/// Panic with the broken invariant if `model` is inconsistent.
pub fn assert_consistent(model: &Model) {
    if let Err(err) = model.check_consistency() {
        panic!("model inconsistent after tick {}: {err}", model.tick());
    }
}
