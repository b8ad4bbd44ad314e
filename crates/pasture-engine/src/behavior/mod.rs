//! Per-species behaviours.
//!
//! Each species implements [`Steppable`](crate::Steppable). The helpers
//! here are the steps sheep and wolves share: the random-walk move and
//! reproduction.

mod patch;
mod sheep;
mod wolf;

pub use patch::Patch;
pub use sheep::Sheep;
pub use wolf::Wolf;

use pasture_core::{Species, StepError};
use tracing::{debug, trace};

use crate::agent::{Actor, MovePolicy, StepContext};
use crate::deferred::BirthOrder;

/// Move `actor` to a uniformly chosen Moore neighbour.
///
/// Fails before touching the grid if `policy` is not implemented. An
/// agent with no neighbour (a one-cell clipped axis) stays where it is.
/// The caller pays the move cost only after this returns `Ok`.
pub(crate) fn random_walk(
    actor: &mut Actor,
    policy: &MovePolicy,
    ctx: &mut StepContext<'_>,
) -> Result<(), StepError> {
    if let MovePolicy::Named(name) = policy {
        return Err(StepError::UnsupportedMovement {
            agent: actor.id,
            policy: name.clone(),
        });
    }
    let neighbours = ctx.occupancy.neighbours(actor.cell);
    let Some(target) = actor.rng.pick(&neighbours) else {
        return Ok(());
    };
    ctx.occupancy.move_agent(actor.id, actor.cell, target);
    trace!(agent = %actor.id, from = %actor.cell, to = %target, "moved");
    actor.cell = target;
    Ok(())
}

/// Roll against `rate` and, on success, queue an offspring at the
/// parent's cell.
pub(crate) fn reproduce(
    actor: &mut Actor,
    species: Species,
    rate: f64,
    ctx: &mut StepContext<'_>,
) -> bool {
    if actor.rng.unit() >= rate {
        return false;
    }
    let order = BirthOrder {
        agent: ctx.ids.allocate(),
        species,
        cell: actor.cell,
        seed: actor.rng.next_seed(),
    };
    debug!(parent = %actor.id, child = %order.agent, %species, cell = %order.cell, "birth queued");
    ctx.deferred.enqueue_birth(order)
}
