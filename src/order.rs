use crate::battle::Action;
use crate::side::{Side, SideId};
use rand::Rng;

fn action_priority(action: Action) -> u8 {
    match action {
        Action::Swap { .. } => 1,
        Action::Attack { .. } => 0,
    }
}

/// Decides which side acts first this turn.
///
/// Swaps go before attacks. Two attacks are ordered by the acting
/// combatants' current speed, fastest first. Anything still tied, including
/// two swaps, is settled by a fair coin from `rng`.
pub fn determine_order<R: Rng + ?Sized>(
    side_a: &Side,
    action_a: Action,
    side_b: &Side,
    action_b: Action,
    rng: &mut R,
) -> [SideId; 2] {
    let priority_a = action_priority(action_a);
    let priority_b = action_priority(action_b);
    let a_first = if priority_a != priority_b {
        priority_a > priority_b
    } else {
        let spe_a = side_a.active().speed();
        let spe_b = side_b.active().speed();
        if spe_a != spe_b && matches!(action_a, Action::Attack { .. }) {
            spe_a > spe_b
        } else {
            rng.gen_bool(0.5)
        }
    };
    if a_first {
        [SideId::A, SideId::B]
    } else {
        [SideId::B, SideId::A]
    }
}
