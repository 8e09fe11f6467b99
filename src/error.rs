//! Error types for battle construction and turn resolution.

use crate::side::SideId;
use thiserror::Error;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BattleError {
    /// A side was built from an unusable roster.
    #[error("malformed roster for {name}: {reason}")]
    MalformedRoster { name: String, reason: String },

    /// A side was passed in the other side's slot.
    #[error("expected side {expected}, got side {found}")]
    SideMismatch { expected: SideId, found: SideId },

    /// An action references a skill or swap target the side cannot use.
    #[error("invalid action for side {side}: {reason}")]
    InvalidAction {
        side: SideId,
        reason: InvalidActionReason,
    },

    /// A decision source picked a replacement that is not a live bench member.
    #[error("side {side} chose roster slot {index} as a replacement, which is not a candidate")]
    InvalidReplacement { side: SideId, index: usize },

    /// The battle already reached a terminal outcome.
    #[error("the battle is already over")]
    BattleOver,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidActionReason {
    #[error("active combatant has no skill in slot {0}")]
    UnknownSkill(usize),
    #[error("active combatant has fainted and cannot attack")]
    FaintedAttacker,
    #[error("roster has no slot {0}")]
    SwapOutOfRange(usize),
    #[error("roster slot {0} has fainted")]
    SwapToFainted(usize),
    #[error("roster slot {0} is already active")]
    SwapToActive(usize),
}
