use pasture_core::{AgentId, Species, StepError};
use tracing::debug;

use crate::agent::{Actor, Body, MovePolicy, StepContext, Steppable};
use crate::config::SpeciesConfig;
use crate::deferred::DeathCause;

/// A predator.
///
/// Per tick: move, die-check, hunt, reproduce. A wolf that starves during
/// its own turn does not hunt but still breeds. Wolves carry no disease.
#[derive(Clone, Debug, PartialEq)]
pub struct Wolf {
    /// Remaining energy. Below zero means death at the next die-check.
    pub energy: i64,
    /// Movement policy.
    pub policy: MovePolicy,
}

impl Wolf {
    /// A random-walking wolf with `energy`.
    pub fn new(energy: i64) -> Self {
        Self {
            energy,
            policy: MovePolicy::RandomWalk,
        }
    }

    /// A wolf fresh from initialisation or birth.
    pub fn spawn(species: &SpeciesConfig) -> Self {
        Self::new(species.initial_energy)
    }

    /// Eat the first sheep in this cell that is not already dying.
    ///
    /// The prey is flagged as eaten and its die-check runs at once, so a
    /// later wolf in the same tick cannot eat it again.
    fn hunt(&mut self, actor: &Actor, ctx: &mut StepContext<'_>) -> Option<AgentId> {
        let agents = &*ctx.agents;
        let deferred = &*ctx.deferred;
        let prey_id = ctx
            .occupancy
            .occupants(actor.cell)
            .iter()
            .copied()
            .find(|&id| {
                !deferred.is_dying(id)
                    && agents
                        .get(id)
                        .is_some_and(|a| a.species() == Species::Sheep)
            })?;
        let prey = ctx.agents.get_mut(prey_id)?.body.as_sheep_mut()?;
        prey.eaten_by_wolf = true;
        prey.die_check(prey_id, ctx.deferred);
        self.energy += ctx.config.wolf.energy_gain;
        debug!(wolf = %actor.id, sheep = %prey_id, energy = self.energy, "wolf eats sheep");
        Some(prey_id)
    }
}

impl Steppable for Wolf {
    fn step(&mut self, actor: &mut Actor, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        if ctx.deferred.is_dying(actor.id) {
            return Ok(());
        }
        let config = ctx.config;

        super::random_walk(actor, &self.policy, ctx)?;
        self.energy -= config.wolf.move_cost;

        if self.energy < 0 {
            ctx.deferred.enqueue_death(actor.id, DeathCause::Starvation);
            debug!(agent = %actor.id, energy = self.energy, cause = %DeathCause::Starvation, "wolf dies");
        } else {
            self.hunt(actor, ctx);
        }
        super::reproduce(actor, Species::Wolf, config.wolf.reproduction_rate, ctx);
        Ok(())
    }
}

impl From<Wolf> for Body {
    fn from(wolf: Wolf) -> Self {
        Self::Wolf(wolf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::testing::Bench;
    use crate::behavior::Sheep;
    use pasture_space::{Cell, EdgeBehavior};

    fn pen() -> Bench {
        // 1x1 wrapped grid: everyone always shares the one cell.
        let mut b = Bench::new(1, 1, EdgeBehavior::Wrap);
        b.config.wolf.reproduction_rate = 0.0;
        b
    }

    fn wolf_of(b: &Bench, id: AgentId) -> &Wolf {
        b.agent(id).body.as_wolf().unwrap()
    }

    #[test]
    fn eats_first_live_sheep() {
        let mut b = pen();
        let cell = Cell::new(0, 0);
        let first = b.add(cell, Sheep::new(10).into());
        let second = b.add(cell, Sheep::new(10).into());
        let wolf = b.add(cell, Wolf::new(30).into());
        b.step(wolf).unwrap();

        assert_eq!(b.deferred.death_cause(first), Some(DeathCause::Predation));
        assert!(b.agent(first).body.as_sheep().unwrap().eaten_by_wolf);
        assert!(!b.deferred.is_dying(second));
        let expected = 30 - b.config.wolf.move_cost + b.config.wolf.energy_gain;
        assert_eq!(wolf_of(&b, wolf).energy, expected);
    }

    #[test]
    fn skips_sheep_already_dying() {
        let mut b = pen();
        let cell = Cell::new(0, 0);
        let starving = b.add(cell, Sheep::new(-1).into());
        let healthy = b.add(cell, Sheep::new(10).into());
        b.deferred.enqueue_death(starving, DeathCause::Starvation);
        let wolf = b.add(cell, Wolf::new(30).into());
        b.step(wolf).unwrap();

        assert_eq!(b.deferred.death_cause(starving), Some(DeathCause::Starvation));
        assert!(!b.agent(starving).body.as_sheep().unwrap().eaten_by_wolf);
        assert_eq!(b.deferred.death_cause(healthy), Some(DeathCause::Predation));
    }

    #[test]
    fn two_wolves_one_sheep() {
        let mut b = pen();
        let cell = Cell::new(0, 0);
        let sheep = b.add(cell, Sheep::new(10).into());
        let w1 = b.add(cell, Wolf::new(30).into());
        let w2 = b.add(cell, Wolf::new(30).into());
        b.step(w1).unwrap();
        b.step(w2).unwrap();

        assert_eq!(b.deferred.pending_deaths(), 1);
        assert!(b.deferred.is_dying(sheep));
        assert!(wolf_of(&b, w1).energy > wolf_of(&b, w2).energy);
    }

    #[test]
    fn starving_wolf_does_not_hunt() {
        let mut b = pen();
        let cell = Cell::new(0, 0);
        let sheep = b.add(cell, Sheep::new(10).into());
        let wolf = b.add(cell, Wolf::new(1).into());
        b.step(wolf).unwrap();

        assert_eq!(b.deferred.death_cause(wolf), Some(DeathCause::Starvation));
        assert!(!b.deferred.is_dying(sheep));
    }

    #[test]
    fn starving_wolf_still_breeds() {
        let mut b = pen();
        b.config.wolf.reproduction_rate = 1.0;
        let wolf = b.add(Cell::new(0, 0), Wolf::new(1).into());
        b.step(wolf).unwrap();

        assert_eq!(b.deferred.death_cause(wolf), Some(DeathCause::Starvation));
        let births = b.deferred.drain_births();
        assert_eq!(births.len(), 1);
        assert_eq!(births[0].species, Species::Wolf);
        assert_eq!(births[0].cell, Cell::new(0, 0));
    }

    #[test]
    fn wolves_never_eat_wolves() {
        let mut b = pen();
        let cell = Cell::new(0, 0);
        let other = b.add(cell, Wolf::new(30).into());
        let wolf = b.add(cell, Wolf::new(30).into());
        b.step(wolf).unwrap();
        assert!(!b.deferred.is_dying(other));
        assert_eq!(wolf_of(&b, wolf).energy, 30 - b.config.wolf.move_cost);
    }

    #[test]
    fn unsupported_policy_is_reported() {
        let mut b = pen();
        let mut wolf = Wolf::new(30);
        wolf.policy = MovePolicy::from("teleport");
        let id = b.add(Cell::new(0, 0), wolf.into());
        assert!(matches!(
            b.step(id),
            Err(StepError::UnsupportedMovement { agent, .. }) if agent == id
        ));
        assert_eq!(wolf_of(&b, id).energy, 30);
    }
}
