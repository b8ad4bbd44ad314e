//! Core types for the Pasture predator-prey simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers and error types shared by every other layer: agent
//! and tick IDs, the species tag carried by each agent, and the
//! [`StepError`] raised from inside a tick.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;

pub use error::StepError;
pub use id::{AgentId, IdAllocator, Species, TickId};
