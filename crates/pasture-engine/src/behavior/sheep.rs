use pasture_core::{AgentId, Species, StepError};
use tracing::debug;

use crate::agent::{Actor, Body, MovePolicy, StepContext, Steppable};
use crate::config::{SicknessConfig, SpeciesConfig};
use crate::deferred::{DeathCause, DeferredMutations};

/// A grazing agent.
///
/// Per tick, in this order: move, update sickness, die-checks, graze,
/// reproduce. A sheep already queued for death when its turn comes does
/// nothing; one queued during its own turn skips grazing but still breeds.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheep {
    /// Remaining energy. Below zero means death at the next die-check.
    pub energy: i64,
    /// Set by a wolf that ate this sheep.
    pub eaten_by_wolf: bool,
    /// Whether the sheep is currently sick.
    pub is_sick: bool,
    /// Movement policy.
    pub policy: MovePolicy,
}

impl Sheep {
    /// A healthy random-walking sheep with `energy`.
    pub fn new(energy: i64) -> Self {
        Self {
            energy,
            eaten_by_wolf: false,
            is_sick: false,
            policy: MovePolicy::RandomWalk,
        }
    }

    /// A sheep fresh from initialisation or birth.
    pub fn spawn(species: &SpeciesConfig, is_sick: bool) -> Self {
        Self {
            is_sick,
            ..Self::new(species.initial_energy)
        }
    }

    /// Queue this sheep for death if it starved or was eaten.
    ///
    /// Returns `true` if this call queued it.
    pub(crate) fn die_check(&self, id: AgentId, deferred: &mut DeferredMutations) -> bool {
        let cause = if self.eaten_by_wolf {
            DeathCause::Predation
        } else if self.energy < 0 {
            DeathCause::Starvation
        } else {
            return false;
        };
        let queued = deferred.enqueue_death(id, cause);
        if queued {
            debug!(agent = %id, energy = self.energy, %cause, "sheep dies");
        }
        queued
    }

    fn update_sickness(&mut self, actor: &mut Actor, rules: &SicknessConfig, ctx: &StepContext<'_>) {
        if self.is_sick && actor.rng.unit() < rules.recovery_proba {
            self.is_sick = false;
            debug!(agent = %actor.id, "sheep recovers");
        }
        // A sheep that just recovered is exposed in the same tick.
        if self.is_sick {
            return;
        }
        let sick_cellmates = ctx
            .occupancy
            .occupants(actor.cell)
            .iter()
            .filter_map(|&id| ctx.agents.get(id))
            .filter(|a| a.body.as_sheep().is_some_and(|s| s.is_sick))
            .count();
        if sick_cellmates == 0 {
            return;
        }
        // Not clamped: n * p >= 1 means certain infection.
        let exposure = sick_cellmates as f64 * rules.transmission_proba;
        if actor.rng.unit() < exposure {
            self.is_sick = true;
            debug!(agent = %actor.id, sick_cellmates, "sheep falls sick");
        }
    }

    fn sickness_check(&self, actor: &mut Actor, rules: &SicknessConfig, deferred: &mut DeferredMutations) {
        if !self.is_sick || deferred.is_dying(actor.id) {
            return;
        }
        if actor.rng.unit() < rules.severity_proba {
            deferred.enqueue_death(actor.id, DeathCause::Sickness);
            debug!(agent = %actor.id, cause = %DeathCause::Sickness, "sheep dies");
        }
    }

    /// Graze the first grass-bearing patch in this cell, if any.
    fn graze(&mut self, actor: &Actor, ctx: &mut StepContext<'_>) -> bool {
        let agents = &*ctx.agents;
        let patch = ctx
            .occupancy
            .occupants(actor.cell)
            .iter()
            .copied()
            .find(|&id| {
                agents
                    .get(id)
                    .and_then(|a| a.body.as_patch())
                    .is_some_and(|p| p.has_grass)
            });
        let Some(patch_id) = patch else {
            return false;
        };
        if let Some(patch) = ctx
            .agents
            .get_mut(patch_id)
            .and_then(|a| a.body.as_patch_mut())
        {
            patch.has_grass = false;
        }
        self.energy += ctx.config.sheep.energy_gain;
        debug!(agent = %actor.id, patch = %patch_id, energy = self.energy, "sheep grazes");
        true
    }
}

impl Steppable for Sheep {
    fn step(&mut self, actor: &mut Actor, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        if ctx.deferred.is_dying(actor.id) {
            return Ok(());
        }
        let config = ctx.config;

        super::random_walk(actor, &self.policy, ctx)?;
        self.energy -= config.sheep.move_cost;

        if let Some(rules) = &config.sickness {
            self.update_sickness(actor, rules, ctx);
        }
        self.die_check(actor.id, ctx.deferred);
        if let Some(rules) = &config.sickness {
            self.sickness_check(actor, rules, ctx.deferred);
        }
        if !ctx.deferred.is_dying(actor.id) {
            self.graze(actor, ctx);
        }
        super::reproduce(actor, Species::Sheep, config.sheep.reproduction_rate, ctx);
        Ok(())
    }
}

impl From<Sheep> for Body {
    fn from(sheep: Sheep) -> Self {
        Self::Sheep(sheep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::testing::Bench;
    use crate::behavior::{Patch, Wolf};
    use pasture_space::{Cell, EdgeBehavior};

    fn bench() -> Bench {
        let mut b = Bench::new(5, 5, EdgeBehavior::Wrap);
        b.config.sheep.reproduction_rate = 0.0;
        b
    }

    fn sheep_of(b: &Bench, id: AgentId) -> &Sheep {
        b.agent(id).body.as_sheep().unwrap()
    }

    // ── Movement ────────────────────────────────────────────────

    #[test]
    fn moves_to_a_neighbour_and_pays_cost() {
        let mut b = bench();
        let start = Cell::new(2, 2);
        let id = b.add(start, Sheep::new(10).into());
        b.step(id).unwrap();

        let cell = b.agent(id).cell();
        assert!(b.occupancy.neighbours(start).contains(&cell));
        assert_eq!(b.occupancy.cell_of(id), Some(cell));
        assert_eq!(sheep_of(&b, id).energy, 10 - b.config.sheep.move_cost);
    }

    #[test]
    fn unsupported_policy_fails_without_side_effects() {
        let mut b = bench();
        let start = Cell::new(1, 1);
        let mut sheep = Sheep::new(10);
        sheep.policy = MovePolicy::from("diagonal-only");
        let id = b.add(start, sheep.into());

        let err = b.step(id).unwrap_err();
        assert_eq!(
            err,
            StepError::UnsupportedMovement {
                agent: id,
                policy: "diagonal-only".to_string(),
            }
        );
        assert_eq!(b.occupancy.cell_of(id), Some(start));
        assert_eq!(b.agent(id).cell(), start);
        assert_eq!(sheep_of(&b, id).energy, 10);
        assert!(b.deferred.is_empty());
    }

    #[test]
    fn isolated_cell_stays_put_and_still_pays() {
        let mut b = Bench::new(1, 1, EdgeBehavior::Absorb);
        b.config.sheep.reproduction_rate = 0.0;
        let id = b.add(Cell::new(0, 0), Sheep::new(5).into());
        b.step(id).unwrap();
        assert_eq!(b.agent(id).cell(), Cell::new(0, 0));
        assert_eq!(sheep_of(&b, id).energy, 5 - b.config.sheep.move_cost);
    }

    // ── Death ───────────────────────────────────────────────────

    #[test]
    fn starving_sheep_skips_grazing_but_still_breeds() {
        let mut b = Bench::new(1, 1, EdgeBehavior::Wrap);
        b.config.sheep.reproduction_rate = 1.0;
        let patch = b.add(Cell::new(0, 0), Patch::default().into());
        let id = b.add(Cell::new(0, 0), Sheep::new(1).into());
        b.step(id).unwrap();

        assert_eq!(b.deferred.death_cause(id), Some(DeathCause::Starvation));
        assert!(b.agent(patch).body.as_patch().unwrap().has_grass);
        assert_eq!(b.deferred.pending_births(), 1);
    }

    #[test]
    fn sheep_dying_of_sickness_still_breeds() {
        let mut b = bench();
        b.config.sheep.reproduction_rate = 1.0;
        b.config.sickness = Some(SicknessConfig {
            recovery_proba: 0.0,
            severity_proba: 1.0,
            ..SicknessConfig::default()
        });
        let mut sheep = Sheep::new(10);
        sheep.is_sick = true;
        let id = b.add(Cell::new(2, 2), sheep.into());
        b.step(id).unwrap();

        assert_eq!(b.deferred.death_cause(id), Some(DeathCause::Sickness));
        let births = b.deferred.drain_births();
        assert_eq!(births.len(), 1);
        assert_eq!(births[0].cell, b.agent(id).cell());
    }

    #[test]
    fn already_dying_sheep_skips_its_turn() {
        let mut b = bench();
        let start = Cell::new(0, 0);
        let id = b.add(start, Sheep::new(10).into());
        b.deferred.enqueue_death(id, DeathCause::Predation);
        b.step(id).unwrap();
        assert_eq!(b.agent(id).cell(), start);
        assert_eq!(sheep_of(&b, id).energy, 10);
    }

    #[test]
    fn die_check_prefers_predation() {
        let mut b = bench();
        let mut sheep = Sheep::new(-3);
        sheep.eaten_by_wolf = true;
        assert!(sheep.die_check(AgentId(4), &mut b.deferred));
        assert!(!sheep.die_check(AgentId(4), &mut b.deferred));
        assert_eq!(b.deferred.death_cause(AgentId(4)), Some(DeathCause::Predation));
    }

    // ── Grazing ─────────────────────────────────────────────────

    #[test]
    fn grazes_first_grass_patch_only() {
        // 1x1 wrapped grid: every move lands back on the same cell.
        let mut b = Bench::new(1, 1, EdgeBehavior::Wrap);
        b.config.sheep.reproduction_rate = 0.0;
        let cell = Cell::new(0, 0);
        let bare = b.add(cell, Patch::bare().into());
        let first = b.add(cell, Patch::default().into());
        let second = b.add(cell, Patch::default().into());
        let id = b.add(cell, Sheep::new(10).into());
        b.step(id).unwrap();

        assert!(!b.agent(bare).body.as_patch().unwrap().has_grass);
        assert!(!b.agent(first).body.as_patch().unwrap().has_grass);
        assert!(b.agent(second).body.as_patch().unwrap().has_grass);
        let expected = 10 - b.config.sheep.move_cost + b.config.sheep.energy_gain;
        assert_eq!(sheep_of(&b, id).energy, expected);
    }

    // ── Reproduction ────────────────────────────────────────────

    #[test]
    fn certain_reproduction_queues_one_birth_at_parent_cell() {
        let mut b = bench();
        b.config.sheep.reproduction_rate = 1.0;
        let id = b.add(Cell::new(3, 3), Sheep::new(10).into());
        b.step(id).unwrap();

        let births = b.deferred.drain_births();
        assert_eq!(births.len(), 1);
        assert_eq!(births[0].species, Species::Sheep);
        assert_eq!(births[0].cell, b.agent(id).cell());
        assert!(!b.agents.contains(births[0].agent));
    }

    // ── Sickness ────────────────────────────────────────────────

    #[test]
    fn certain_transmission_from_sick_cellmate() {
        let mut b = Bench::new(1, 1, EdgeBehavior::Wrap);
        b.config.sheep.reproduction_rate = 0.0;
        b.config.sickness = Some(SicknessConfig {
            recovery_proba: 0.0,
            severity_proba: 0.0,
            transmission_proba: 1.0,
            initial_sickness_proba: 0.0,
        });
        let cell = Cell::new(0, 0);
        let mut carrier = Sheep::new(10);
        carrier.is_sick = true;
        b.add(cell, carrier.into());
        let id = b.add(cell, Sheep::new(10).into());
        b.step(id).unwrap();
        assert!(sheep_of(&b, id).is_sick);
    }

    #[test]
    fn no_transmission_without_sick_cellmates() {
        let mut b = Bench::new(1, 1, EdgeBehavior::Wrap);
        b.config.sheep.reproduction_rate = 0.0;
        b.config.sickness = Some(SicknessConfig {
            transmission_proba: 1.0,
            ..SicknessConfig::default()
        });
        let cell = Cell::new(0, 0);
        b.add(cell, Wolf::new(10).into());
        let id = b.add(cell, Sheep::new(10).into());
        b.step(id).unwrap();
        assert!(!sheep_of(&b, id).is_sick);
    }

    #[test]
    fn certain_recovery() {
        let mut b = bench();
        b.config.sickness = Some(SicknessConfig {
            recovery_proba: 1.0,
            severity_proba: 1.0,
            ..SicknessConfig::default()
        });
        let mut sheep = Sheep::new(10);
        sheep.is_sick = true;
        let id = b.add(Cell::new(2, 2), sheep.into());
        b.step(id).unwrap();
        assert!(!sheep_of(&b, id).is_sick);
        assert!(!b.deferred.is_dying(id));
    }

    #[test]
    fn recovered_sheep_is_exposed_in_the_same_tick() {
        let mut b = Bench::new(1, 1, EdgeBehavior::Wrap);
        b.config.sheep.reproduction_rate = 0.0;
        b.config.sickness = Some(SicknessConfig {
            recovery_proba: 1.0,
            severity_proba: 0.0,
            transmission_proba: 1.0,
            initial_sickness_proba: 0.0,
        });
        let cell = Cell::new(0, 0);
        let mut carrier = Sheep::new(10);
        carrier.is_sick = true;
        b.add(cell, carrier.into());
        let mut patient = Sheep::new(10);
        patient.is_sick = true;
        let id = b.add(cell, patient.into());
        b.step(id).unwrap();
        assert!(sheep_of(&b, id).is_sick);
    }

    #[test]
    fn certain_severity_kills_sick_sheep() {
        let mut b = bench();
        b.config.sickness = Some(SicknessConfig {
            recovery_proba: 0.0,
            severity_proba: 1.0,
            ..SicknessConfig::default()
        });
        let mut sheep = Sheep::new(10);
        sheep.is_sick = true;
        let id = b.add(Cell::new(2, 2), sheep.into());
        b.step(id).unwrap();
        assert_eq!(b.deferred.death_cause(id), Some(DeathCause::Sickness));
    }

    #[test]
    fn sickness_ignored_when_disabled() {
        let mut b = bench();
        let mut sheep = Sheep::new(10);
        sheep.is_sick = true;
        let id = b.add(Cell::new(2, 2), sheep.into());
        b.step(id).unwrap();
        assert!(sheep_of(&b, id).is_sick);
        assert!(!b.deferred.is_dying(id));
    }
}
