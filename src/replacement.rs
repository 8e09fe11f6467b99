use crate::error::{BattleError, Result};
use crate::policy::DecisionSource;
use crate::side::Side;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Replacement {
    /// The roster slot now active.
    SentIn(usize),
    /// Nobody is left to send in; the side is defeated.
    NoneAvailable,
}

/// Asks `source` which live roster member replaces `side`'s fainted active
/// combatant and makes it active.
///
/// The choice must be one of the offered candidates; anything else is
/// rejected without touching the side.
pub fn replace_fainted(side: &mut Side, source: &mut dyn DecisionSource) -> Result<Replacement> {
    let candidates = side.replacement_candidates();
    if candidates.is_empty() {
        return Ok(Replacement::NoneAvailable);
    }
    let choice = source.choose_replacement(side, &candidates);
    if !candidates.contains(&choice) {
        return Err(BattleError::InvalidReplacement {
            side: side.id(),
            index: choice,
        });
    }
    side.set_active(choice);
    Ok(Replacement::SentIn(choice))
}
