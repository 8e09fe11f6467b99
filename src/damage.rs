use crate::model::{Skill, SkillCategory};
use crate::side::Combatant;
use crate::types::type_effectiveness;

/// Outcome of one damage calculation, before it is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub amount: u32,
    pub effectiveness: f32,
}

/// Computes the damage `skill` deals from `attacker` to `defender`.
///
/// Physical skills add base power to attack and subtract defense; special
/// skills scale base power by the sp. attack / sp. defense ratio. The result
/// is scaled by type effectiveness, floored, and never drops below
/// `min_damage` (nor below zero).
pub fn compute_damage(attacker: &Combatant, defender: &Combatant, skill: &Skill, min_damage: u32) -> DamageRoll {
    let atk = attacker.stats();
    let def = defender.stats();
    let raw = match skill.category {
        SkillCategory::Physical => {
            atk.attack as f64 + skill.power as f64 - def.defense as f64
        }
        SkillCategory::Special => {
            let sp_def = def.sp_defense.max(1) as f64;
            atk.sp_attack as f64 / sp_def * skill.power as f64
        }
    };
    let effectiveness = type_effectiveness(skill.element, defender.element());
    let scaled = (raw * effectiveness as f64).floor().max(0.0);
    let amount = (scaled as u32).max(min_damage);
    DamageRoll {
        amount,
        effectiveness,
    }
}
