use crate::battle::Action;
use crate::side::Side;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Picks a side's moves. Illegal answers are rejected by the battle, not
/// corrected.
pub trait DecisionSource {
    fn choose_action(&mut self, side: &Side, opponent: &Side, legal: &[Action]) -> Action;

    // candidates is never empty
    fn choose_replacement(&mut self, side: &Side, candidates: &[usize]) -> usize;
}

pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl DecisionSource for RandomPolicy {
    fn choose_action(&mut self, _side: &Side, _opponent: &Side, legal: &[Action]) -> Action {
        *legal
            .choose(&mut self.rng)
            .unwrap_or(&Action::Attack { skill: 0 })
    }

    fn choose_replacement(&mut self, _side: &Side, candidates: &[usize]) -> usize {
        candidates.choose(&mut self.rng).copied().unwrap_or(0)
    }
}

// Falls back to the first skill and first candidate once a queue runs dry.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPolicy {
    actions: VecDeque<Action>,
    replacements: VecDeque<usize>,
}

impl ScriptedPolicy {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            replacements: VecDeque::new(),
        }
    }

    pub fn with_replacements(mut self, replacements: impl IntoIterator<Item = usize>) -> Self {
        self.replacements = replacements.into_iter().collect();
        self
    }

    pub fn next_action(&mut self) -> Action {
        self.actions.pop_front().unwrap_or(Action::Attack { skill: 0 })
    }
}

impl DecisionSource for ScriptedPolicy {
    fn choose_action(&mut self, _side: &Side, _opponent: &Side, _legal: &[Action]) -> Action {
        self.next_action()
    }

    fn choose_replacement(&mut self, _side: &Side, candidates: &[usize]) -> usize {
        self.replacements
            .pop_front()
            .or_else(|| candidates.first().copied())
            .unwrap_or(0)
    }
}
