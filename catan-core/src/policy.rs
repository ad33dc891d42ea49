//! Action selection.
//!
//! Learned policies live outside this crate (the trainer is an external
//! collaborator). What lives here is the seam they plug into, plus a uniform
//! random policy for warm-up data and smoke runs.

use crate::action::{action_space, ActionVector, ACTION_SLOTS};
use crate::space::MultiDiscrete;
use rand::SeedableRng;

/// Chooses an action vector from an observation.
pub trait Policy {
    fn act(&mut self, observation: &[u32]) -> ActionVector;
}

/// Samples every action slot uniformly from its declared range.
pub struct RandomPolicy {
    rng: rand::rngs::StdRng,
    space: MultiDiscrete,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
            space: action_space(),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &[u32]) -> ActionVector {
        let mut slots = [0; ACTION_SLOTS];
        slots.copy_from_slice(&self.space.sample(&mut self.rng));
        ActionVector(slots)
    }
}
