use crate::outcome::Outcome;
use crate::side::SideId;
use serde::Serialize;
use serde_json::json;

/// Something observable that happened during resolution.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
    },
    Swapped {
        side: SideId,
        from: String,
        to: String,
    },
    SkillUsed {
        side: SideId,
        attacker: String,
        skill: String,
        target: String,
    },
    Damaged {
        side: SideId,
        target: String,
        amount: u32,
        hp: u32,
        max_hp: u32,
        effectiveness: f32,
    },
    AttackSkipped {
        side: SideId,
        attacker: String,
    },
    Fainted {
        side: SideId,
        combatant: String,
    },
    Replaced {
        side: SideId,
        combatant: String,
    },
    SideDefeated {
        side: SideId,
    },
    BattleEnded {
        outcome: Outcome,
    },
}

/// Sink for battle events. The core emits events; how they are shown is up
/// to the implementor.
pub trait Notifier {
    fn announce(&mut self, event: &BattleEvent);
}

/// Discards every event.
impl Notifier for () {
    fn announce(&mut self, _event: &BattleEvent) {}
}

/// Records events in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({ "log": self.events })
    }
}

impl Notifier for EventLog {
    fn announce(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn announce(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::TurnStarted { turn } => tracing::info!(turn, "turn started"),
            BattleEvent::Swapped { side, from, to } => {
                tracing::info!(%side, from = %from, to = %to, "swapped")
            }
            BattleEvent::SkillUsed {
                side,
                attacker,
                skill,
                target,
            } => tracing::info!(%side, attacker = %attacker, skill = %skill, defender = %target, "skill used"),
            BattleEvent::Damaged {
                side,
                target,
                amount,
                hp,
                max_hp,
                effectiveness,
            } => tracing::info!(%side, defender = %target, amount, hp, max_hp, effectiveness, "damage dealt"),
            BattleEvent::AttackSkipped { side, attacker } => {
                tracing::info!(%side, attacker = %attacker, "attack skipped")
            }
            BattleEvent::Fainted { side, combatant } => {
                tracing::info!(%side, combatant = %combatant, "fainted")
            }
            BattleEvent::Replaced { side, combatant } => {
                tracing::info!(%side, combatant = %combatant, "sent in replacement")
            }
            BattleEvent::SideDefeated { side } => tracing::info!(%side, "side defeated"),
            BattleEvent::BattleEnded { outcome } => tracing::info!(?outcome, "battle ended"),
        }
    }
}
