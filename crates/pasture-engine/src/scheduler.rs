//! Live-agent set and per-tick activation order.

use indexmap::IndexSet;
use pasture_core::AgentId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Every agent that takes part in the next activation pass.
///
/// Membership changes only between ticks (initialisation and the model's
/// Reconciling phase). [`activation_order`](Scheduler::activation_order)
/// reshuffles on every call, so no agent keeps a positional advantage
/// from one tick to the next.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    live: IndexSet<AgentId>,
}

impl Scheduler {
    /// An empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `agent`. Returns `false` if it was already scheduled.
    pub fn add(&mut self, agent: AgentId) -> bool {
        self.live.insert(agent)
    }

    /// Remove `agent`. Returns `false` if it was not scheduled.
    pub fn remove(&mut self, agent: AgentId) -> bool {
        self.live.swap_remove(&agent)
    }

    /// Whether `agent` is scheduled.
    pub fn contains(&self, agent: AgentId) -> bool {
        self.live.contains(&agent)
    }

    /// Number of scheduled agents.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Scheduled agents in membership order (not activation order).
    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.live.iter().copied()
    }

    /// Every scheduled agent exactly once, uniformly shuffled.
    pub fn activation_order<R: Rng>(&self, rng: &mut R) -> Vec<AgentId> {
        let mut order: Vec<AgentId> = self.live.iter().copied().collect();
        order.shuffle(rng);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn add_remove_roundtrip() {
        let mut s = Scheduler::new();
        assert!(s.add(AgentId(1)));
        assert!(!s.add(AgentId(1)));
        assert!(s.contains(AgentId(1)));
        assert!(s.remove(AgentId(1)));
        assert!(!s.remove(AgentId(1)));
        assert!(s.is_empty());
    }

    #[test]
    fn order_is_reshuffled_each_call() {
        let mut s = Scheduler::new();
        for i in 0..32 {
            s.add(AgentId(i));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let first = s.activation_order(&mut rng);
        let second = s.activation_order(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn same_seed_same_order() {
        let mut s = Scheduler::new();
        for i in 0..10 {
            s.add(AgentId(i));
        }
        let a = s.activation_order(&mut ChaCha8Rng::seed_from_u64(5));
        let b = s.activation_order(&mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn order_is_a_permutation(ids in prop::collection::btree_set(0u64..500, 0..64), seed: u64) {
            let mut s = Scheduler::new();
            for &id in &ids {
                s.add(AgentId(id));
            }
            let mut order = s.activation_order(&mut ChaCha8Rng::seed_from_u64(seed));
            order.sort();
            let expected: Vec<AgentId> = ids.iter().map(|&id| AgentId(id)).collect();
            prop_assert_eq!(order, expected);
        }
    }
}
