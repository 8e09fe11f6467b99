use crate::side::{Side, SideId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    SideADefeated,
    SideBDefeated,
    BothDefeated,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }

    /// The side left standing, if exactly one is.
    pub fn winner(self) -> Option<SideId> {
        match self {
            Outcome::SideADefeated => Some(SideId::B),
            Outcome::SideBDefeated => Some(SideId::A),
            Outcome::Ongoing | Outcome::BothDefeated => None,
        }
    }
}

/// A side is defeated once every roster member has fainted; both can be.
pub fn evaluate_outcome(side_a: &Side, side_b: &Side) -> Outcome {
    match (side_a.is_defeated(), side_b.is_defeated()) {
        (true, true) => Outcome::BothDefeated,
        (true, false) => Outcome::SideADefeated,
        (false, true) => Outcome::SideBDefeated,
        (false, false) => Outcome::Ongoing,
    }
}
