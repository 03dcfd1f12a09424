//! Random controller for simulations and baseline play
//!
//! Picks uniformly among the legal actions.

use crate::core::ChatId;
use crate::game::controller::{DuelController, DuelView};
use crate::game::Action;
use rand::Rng;

/// A controller that makes random choices
pub struct RandomController {
    chat_id: ChatId,
    rng: Box<dyn rand::RngCore + Send>,
}

impl RandomController {
    /// Create a random controller seeded from the thread RNG
    pub fn new(chat_id: ChatId) -> Self {
        use rand::SeedableRng;
        RandomController {
            chat_id,
            rng: Box::new(rand::rngs::StdRng::from_entropy()),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic runs)
    pub fn with_seed(chat_id: ChatId, seed: u64) -> Self {
        use rand::SeedableRng;
        RandomController {
            chat_id,
            rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

impl DuelController for RandomController {
    fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    fn choose_action(&mut self, _view: &DuelView, available: &[Action]) -> Option<Action> {
        if available.is_empty() {
            None
        } else {
            let index = self.rng.gen_range(0..available.len());
            Some(available[index])
        }
    }
}
