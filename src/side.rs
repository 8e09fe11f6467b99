use crate::error::{BattleError, Result};
use crate::model::{Creature, Skill, Stats};
use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SideId {
    A,
    B,
}

impl SideId {
    pub fn opponent(self) -> SideId {
        match self {
            SideId::A => SideId::B,
            SideId::B => SideId::A,
        }
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideId::A => f.write_str("A"),
            SideId::B => f.write_str("B"),
        }
    }
}

/// A creature in battle: its definition plus current hp.
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    creature: Creature,
    hp: u32,
}

impl Combatant {
    pub fn new(creature: Creature) -> Self {
        let hp = creature.stats.hp;
        Combatant { creature, hp }
    }

    /// Restores a combatant mid-battle; `hp` is clamped to max hp.
    pub fn with_hp(creature: Creature, hp: u32) -> Self {
        let hp = hp.min(creature.stats.hp);
        Combatant { creature, hp }
    }

    pub fn name(&self) -> &str {
        &self.creature.name
    }

    pub fn element(&self) -> Element {
        self.creature.element
    }

    pub fn stats(&self) -> &Stats {
        &self.creature.stats
    }

    pub fn skills(&self) -> &[Skill] {
        &self.creature.skills
    }

    pub fn skill(&self, idx: usize) -> Option<&Skill> {
        self.creature.skills.get(idx)
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.creature.stats.hp
    }

    pub fn speed(&self) -> u32 {
        self.creature.stats.speed
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Subtracts `amount`, saturating at zero. Returns the hp actually lost.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    pub(crate) fn full_heal(&mut self) {
        self.hp = self.max_hp();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Side {
    id: SideId,
    name: String,
    roster: Vec<Combatant>,
    active: usize,
}

impl Side {
    /// Builds a side from creature definitions at full hp, first creature active.
    pub fn new(id: SideId, name: impl Into<String>, creatures: Vec<Creature>) -> Result<Self> {
        Self::from_combatants(id, name, creatures.into_iter().map(Combatant::new).collect())
    }

    /// Builds a side from combatants in an arbitrary hp state. The first live
    /// combatant becomes active, or the first one if every member has fainted.
    pub fn from_combatants(
        id: SideId,
        name: impl Into<String>,
        roster: Vec<Combatant>,
    ) -> Result<Self> {
        let name = name.into();
        if roster.is_empty() {
            return Err(BattleError::MalformedRoster {
                name,
                reason: "roster is empty".to_string(),
            });
        }
        if let Some(bad) = roster.iter().find(|c| c.skills().is_empty()) {
            return Err(BattleError::MalformedRoster {
                reason: format!("{} has no skills", bad.name()),
                name,
            });
        }
        if let Some(bad) = roster.iter().find(|c| c.max_hp() == 0) {
            return Err(BattleError::MalformedRoster {
                reason: format!("{} has zero max hp", bad.name()),
                name,
            });
        }
        let active = roster.iter().position(|c| !c.is_fainted()).unwrap_or(0);
        Ok(Side {
            id,
            name,
            roster,
            active,
        })
    }

    pub fn id(&self) -> SideId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roster(&self) -> &[Combatant] {
        &self.roster
    }

    pub fn combatant(&self, idx: usize) -> Option<&Combatant> {
        self.roster.get(idx)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Combatant {
        &self.roster[self.active]
    }

    pub(crate) fn active_mut(&mut self) -> &mut Combatant {
        &mut self.roster[self.active]
    }

    pub(crate) fn set_active(&mut self, idx: usize) {
        debug_assert!(idx < self.roster.len());
        self.active = idx;
    }

    /// Live roster members other than the active one.
    pub fn replacement_candidates(&self) -> Vec<usize> {
        self.roster
            .iter()
            .enumerate()
            .filter(|(idx, c)| *idx != self.active && !c.is_fainted())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.roster.iter().filter(|c| !c.is_fainted()).count()
    }

    pub fn is_defeated(&self) -> bool {
        self.alive_count() == 0
    }

    pub(crate) fn reset(&mut self) {
        for combatant in &mut self.roster {
            combatant.full_heal();
        }
        self.active = 0;
    }
}
