//! Integration test: births and deaths queued during a tick only take
//! effect at reconciliation, and newborns first act on the next tick.

use pasture_core::{AgentId, StepError, TickId};
use pasture_engine::{Model, MovePolicy, Sheep, TickPhase};
use pasture_space::Cell;
use pasture_test_utils::{assert_consistent, breeding, frozen};

fn sheep_energy(model: &Model, id: AgentId) -> Option<i64> {
    model.agent(id)?.body.as_sheep().map(|s| s.energy)
}

fn sheep_ids(model: &Model) -> Vec<AgentId> {
    model
        .live_agents()
        .filter(|a| a.body.as_sheep().is_some())
        .map(|a| a.id())
        .collect()
}

#[test]
fn newborns_act_from_the_following_tick() {
    let mut cfg = breeding(10, 10, 1, 0);
    cfg.sheep.move_cost = 1;
    let initial = cfg.sheep.initial_energy;
    let mut model = Model::new(cfg).unwrap();
    let parent = sheep_ids(&model)[0];

    // Tick 1: the parent acts and queues one birth.
    let report = model.step().unwrap();
    assert_eq!((report.counts.sheep, report.births), (1, 1));
    let ids = sheep_ids(&model);
    assert_eq!(ids.len(), 2);
    let child = ids.into_iter().find(|&id| id != parent).unwrap();

    // The child was born at the parent's new cell and has not moved or paid.
    assert_eq!(sheep_energy(&model, parent), Some(initial - 1));
    assert_eq!(sheep_energy(&model, child), Some(initial));
    assert_eq!(
        model.agent(child).map(|a| a.cell()),
        model.agent(parent).map(|a| a.cell()),
    );
    assert_consistent(&model);

    // Tick 2: both act, both breed.
    let report = model.step().unwrap();
    assert_eq!((report.counts.sheep, report.births), (2, 2));
    assert_eq!(sheep_energy(&model, parent), Some(initial - 2));
    assert_eq!(sheep_energy(&model, child), Some(initial - 1));
    assert_eq!(sheep_ids(&model).len(), 4);
}

#[test]
fn child_ids_are_fresh() {
    let mut model = Model::new(breeding(4, 4, 3, 0)).unwrap();
    let mut seen: Vec<AgentId> = model.live_agents().map(|a| a.id()).collect();
    for _ in 0..3 {
        model.step().unwrap();
        for agent in model.live_agents() {
            if !seen.contains(&agent.id()) {
                seen.push(agent.id());
            }
        }
    }
    let mut sorted = seen.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), seen.len());
    assert_eq!(sheep_ids(&model).len(), 3 * 8);
}

#[test]
fn unsupported_policy_terminates_the_tick_but_keeps_the_model_usable() {
    let mut model = Model::new(frozen(5, 5, 6, 2)).unwrap();
    let mut rogue = Sheep::new(10);
    rogue.policy = MovePolicy::from("levy-flight");
    let id = model.spawn(Cell::new(2, 2), rogue.into()).unwrap();

    let err = model.step().unwrap_err();
    assert_eq!(
        err,
        StepError::UnsupportedMovement {
            agent: id,
            policy: "levy-flight".into(),
        }
    );
    assert_eq!(err.to_string(), format!("agent {id}: unsupported movement method 'levy-flight'"));
    assert_eq!(model.tick(), TickId(1));
    assert_eq!(model.phase(), TickPhase::Idle);
    assert_eq!(model.agent(id).map(|a| a.cell()), Some(Cell::new(2, 2)));
    assert_eq!(sheep_energy(&model, id), Some(10));
    assert_consistent(&model);

    // The rogue is still scheduled, so the next tick fails the same way.
    assert!(model.step().is_err());
    assert_eq!(model.tick(), TickId(2));
    assert_consistent(&model);
}

#[test]
fn random_policy_name_is_the_random_walk() {
    assert_eq!(MovePolicy::from("random"), MovePolicy::RandomWalk);
    let mut model = Model::new(frozen(5, 5, 0, 0)).unwrap();
    let mut sheep = Sheep::new(10);
    sheep.policy = MovePolicy::from("random");
    model.spawn(Cell::new(0, 0), sheep.into()).unwrap();
    model.run(5).unwrap();
}
