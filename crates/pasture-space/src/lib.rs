//! Spatial layer for Pasture simulations.
//!
//! Two pieces, kept separate so topology can be shared and tested without
//! any agents around:
//!
//! - [`Grid`]: a bounded 2D lattice with an 8-connected (Moore)
//!   neighbourhood and configurable [`EdgeBehavior`] (wrap or absorb).
//! - [`Occupancy`]: the multi-occupancy index mapping each [`Cell`] to the
//!   ordered set of agents standing on it, plus the reverse agent → cell
//!   lookup. Every operation is O(1) amortised per cell.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod edge;
pub mod error;
pub mod grid;
pub mod occupancy;

pub use cell::Cell;
pub use edge::EdgeBehavior;
pub use error::SpaceError;
pub use grid::Grid;
pub use occupancy::Occupancy;
