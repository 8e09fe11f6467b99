use crate::damage::compute_damage;
use crate::error::{BattleError, InvalidActionReason, Result};
use crate::events::{BattleEvent, Notifier};
use crate::model::Creature;
use crate::order::determine_order;
use crate::outcome::{evaluate_outcome, Outcome};
use crate::policy::{DecisionSource, RandomPolicy};
use crate::replacement::{replace_fainted, Replacement};
use crate::side::{Side, SideId};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Skill and swap targets index the active combatant's skills and the roster.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    Attack { skill: usize },
    Swap { target: usize },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaintResolution {
    #[default]
    Immediate,
    // knocked out combatants still attack; replacements wait for end of turn
    Simultaneous,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleOptions {
    pub min_damage: u32,
    pub faint_resolution: FaintResolution,
    pub max_turns: u32,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            min_damage: 1,
            faint_resolution: FaintResolution::Immediate,
            max_turns: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TurnPhase {
    CollectActions,
    ApplySwaps,
    ExecuteAttacks,
    ResolveFaints,
    Idle,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BattleReport {
    pub outcome: Outcome,
    pub turns: u32,
}

pub struct Participants<'a> {
    pub a: &'a mut dyn DecisionSource,
    pub b: &'a mut dyn DecisionSource,
}

impl<'a> Participants<'a> {
    pub fn new(a: &'a mut dyn DecisionSource, b: &'a mut dyn DecisionSource) -> Self {
        Self { a, b }
    }

    fn get(&mut self, side: SideId) -> &mut (dyn DecisionSource + 'a) {
        match side {
            SideId::A => &mut *self.a,
            SideId::B => &mut *self.b,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct QueuedAttack {
    side: SideId,
    skill: usize,
    // roster slot that chose the attack
    actor: usize,
}

#[derive(Clone, Debug)]
pub struct Battle<R = SmallRng> {
    side_a: Side,
    side_b: Side,
    options: BattleOptions,
    turn: u32,
    phase: TurnPhase,
    rng: R,
    initial_rng: R,
    end_announced: bool,
}

impl Battle<SmallRng> {
    pub fn new(team_a: &[Creature], team_b: &[Creature], seed: u64, options: BattleOptions) -> Result<Self> {
        let side_a = Side::new(SideId::A, "Team A", team_a.to_vec())?;
        let side_b = Side::new(SideId::B, "Team B", team_b.to_vec())?;
        Self::from_sides(side_a, side_b, SmallRng::seed_from_u64(seed), options)
    }
}

impl<R: Rng + Clone> Battle<R> {
    pub fn from_sides(side_a: Side, side_b: Side, rng: R, options: BattleOptions) -> Result<Self> {
        for (side, expected) in [(&side_a, SideId::A), (&side_b, SideId::B)] {
            if side.id() != expected {
                return Err(BattleError::SideMismatch {
                    expected,
                    found: side.id(),
                });
            }
        }
        Ok(Battle {
            side_a,
            side_b,
            options,
            turn: 0,
            phase: TurnPhase::Idle,
            initial_rng: rng.clone(),
            rng,
            end_announced: false,
        })
    }

    pub fn side(&self, side: SideId) -> &Side {
        match side {
            SideId::A => &self.side_a,
            SideId::B => &self.side_b,
        }
    }

    fn side_mut(&mut self, side: SideId) -> &mut Side {
        match side {
            SideId::A => &mut self.side_a,
            SideId::B => &mut self.side_b,
        }
    }

    // (acting side, opposing side)
    fn sides_mut(&mut self, side: SideId) -> (&mut Side, &mut Side) {
        match side {
            SideId::A => (&mut self.side_a, &mut self.side_b),
            SideId::B => (&mut self.side_b, &mut self.side_a),
        }
    }

    pub fn options(&self) -> &BattleOptions {
        &self.options
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn outcome(&self) -> Outcome {
        evaluate_outcome(&self.side_a, &self.side_b)
    }

    pub fn legal_actions(&self, side: SideId) -> Vec<Action> {
        let side = self.side(side);
        let mut actions = Vec::new();
        if !side.active().is_fainted() {
            actions.extend((0..side.active().skills().len()).map(|skill| Action::Attack { skill }));
        }
        actions.extend(
            side.replacement_candidates()
                .into_iter()
                .map(|target| Action::Swap { target }),
        );
        actions
    }

    pub fn validate_action(&self, side: SideId, action: Action) -> Result<()> {
        let s = self.side(side);
        let reason = match action {
            Action::Attack { skill } => {
                if s.active().is_fainted() {
                    Some(InvalidActionReason::FaintedAttacker)
                } else if s.active().skill(skill).is_none() {
                    Some(InvalidActionReason::UnknownSkill(skill))
                } else {
                    None
                }
            }
            Action::Swap { target } => match s.combatant(target) {
                None => Some(InvalidActionReason::SwapOutOfRange(target)),
                Some(c) if c.is_fainted() => Some(InvalidActionReason::SwapToFainted(target)),
                Some(_) if target == s.active_index() => Some(InvalidActionReason::SwapToActive(target)),
                Some(_) => None,
            },
        };
        match reason {
            Some(reason) => Err(BattleError::InvalidAction { side, reason }),
            None => Ok(()),
        }
    }

    pub fn play_turn(&mut self, participants: &mut Participants<'_>, notifier: &mut dyn Notifier) -> Result<Outcome> {
        if self.outcome().is_over() {
            return Err(BattleError::BattleOver);
        }
        self.phase = TurnPhase::CollectActions;
        let legal_a = self.legal_actions(SideId::A);
        let legal_b = self.legal_actions(SideId::B);
        let action_a = participants
            .get(SideId::A)
            .choose_action(&self.side_a, &self.side_b, &legal_a);
        let action_b = participants
            .get(SideId::B)
            .choose_action(&self.side_b, &self.side_a, &legal_b);
        self.resolve_turn(action_a, action_b, participants, notifier)
    }

    /// Resolves one turn from already collected actions. Both actions are
    /// validated before anything changes.
    ///
    /// If a decision source picks an invalid replacement the turn stops there
    /// with [`BattleError::InvalidReplacement`]; call
    /// [`Battle::resolve_pending_faints`] to finish it.
    pub fn resolve_turn(
        &mut self,
        action_a: Action,
        action_b: Action,
        participants: &mut Participants<'_>,
        notifier: &mut dyn Notifier,
    ) -> Result<Outcome> {
        if self.outcome().is_over() {
            return Err(BattleError::BattleOver);
        }
        match self.resolve_actions(action_a, action_b, participants, notifier) {
            Ok(()) => Ok(self.finish_turn(notifier)),
            Err(err) => {
                self.phase = TurnPhase::Idle;
                Err(err)
            }
        }
    }

    fn resolve_actions(
        &mut self,
        action_a: Action,
        action_b: Action,
        participants: &mut Participants<'_>,
        notifier: &mut dyn Notifier,
    ) -> Result<()> {
        self.phase = TurnPhase::CollectActions;
        self.validate_action(SideId::A, action_a)?;
        self.validate_action(SideId::B, action_b)?;

        let order = determine_order(&self.side_a, action_a, &self.side_b, action_b, &mut self.rng);
        let action_of = |side: SideId| match side {
            SideId::A => action_a,
            SideId::B => action_b,
        };
        self.turn += 1;
        tracing::debug!(turn = self.turn, ?order, ?action_a, ?action_b, "resolving turn");
        notifier.announce(&BattleEvent::TurnStarted { turn: self.turn });

        self.phase = TurnPhase::ApplySwaps;
        for side in order {
            if let Action::Swap { target } = action_of(side) {
                self.apply_swap(side, target, notifier);
            }
        }

        self.phase = TurnPhase::ExecuteAttacks;
        let queue: Vec<QueuedAttack> = order
            .into_iter()
            .filter_map(|side| match action_of(side) {
                Action::Attack { skill } => Some(QueuedAttack {
                    side,
                    skill,
                    actor: self.side(side).active_index(),
                }),
                Action::Swap { .. } => None,
            })
            .collect();
        for attack in queue {
            let attacker = self.side(attack.side);
            let replaced = attacker.active_index() != attack.actor;
            let knocked_out = attacker.active().is_fainted()
                && self.options.faint_resolution == FaintResolution::Immediate;
            if replaced || knocked_out {
                let name = attacker.combatant(attack.actor).map(|c| c.name().to_string());
                tracing::debug!(side = %attack.side, replaced, knocked_out, "attack skipped");
                notifier.announce(&BattleEvent::AttackSkipped {
                    side: attack.side,
                    attacker: name.unwrap_or_default(),
                });
                continue;
            }
            self.execute_attack(attack.side, attack.skill, notifier);
            let defender = attack.side.opponent();
            if self.side(defender).active().is_fainted()
                && self.options.faint_resolution == FaintResolution::Immediate
            {
                self.phase = TurnPhase::ResolveFaints;
                self.resolve_faint(defender, participants, notifier)?;
                self.phase = TurnPhase::ExecuteAttacks;
            }
        }

        self.phase = TurnPhase::ResolveFaints;
        self.replace_fainted_actives(order, participants, notifier)
    }

    /// Replaces any fainted active combatant that still has a live bench
    /// member, then closes the turn, announcing the end of the battle if it
    /// is over.
    pub fn resolve_pending_faints(
        &mut self,
        participants: &mut Participants<'_>,
        notifier: &mut dyn Notifier,
    ) -> Result<Outcome> {
        self.phase = TurnPhase::ResolveFaints;
        match self.replace_fainted_actives([SideId::A, SideId::B], participants, notifier) {
            Ok(()) => Ok(self.finish_turn(notifier)),
            Err(err) => {
                self.phase = TurnPhase::Idle;
                Err(err)
            }
        }
    }

    fn replace_fainted_actives(
        &mut self,
        order: [SideId; 2],
        participants: &mut Participants<'_>,
        notifier: &mut dyn Notifier,
    ) -> Result<()> {
        for side in order {
            if self.side(side).active().is_fainted() && !self.side(side).is_defeated() {
                self.resolve_faint(side, participants, notifier)?;
            }
        }
        Ok(())
    }

    fn finish_turn(&mut self, notifier: &mut dyn Notifier) -> Outcome {
        let outcome = self.outcome();
        if outcome.is_over() && !self.end_announced {
            for side in [SideId::A, SideId::B] {
                if self.side(side).is_defeated() {
                    notifier.announce(&BattleEvent::SideDefeated { side });
                }
            }
            tracing::info!(turn = self.turn, ?outcome, "battle over");
            notifier.announce(&BattleEvent::BattleEnded { outcome });
            self.end_announced = true;
        }
        self.phase = TurnPhase::Idle;
        outcome
    }

    fn apply_swap(&mut self, side: SideId, target: usize, notifier: &mut dyn Notifier) {
        let s = self.side_mut(side);
        let from = s.active().name().to_string();
        s.set_active(target);
        let to = s.active().name().to_string();
        tracing::debug!(%side, from = %from, to = %to, "swap");
        notifier.announce(&BattleEvent::Swapped { side, from, to });
    }

    fn execute_attack(&mut self, side: SideId, skill_idx: usize, notifier: &mut dyn Notifier) {
        let min_damage = self.options.min_damage;
        let (attacker_side, defender_side) = self.sides_mut(side);
        let attacker = attacker_side.active();
        let Some(skill) = attacker.skill(skill_idx) else {
            return;
        };
        notifier.announce(&BattleEvent::SkillUsed {
            side,
            attacker: attacker.name().to_string(),
            skill: skill.name.clone(),
            target: defender_side.active().name().to_string(),
        });
        let roll = compute_damage(attacker, defender_side.active(), skill, min_damage);
        let target = defender_side.active_mut();
        target.take_damage(roll.amount);
        tracing::debug!(
            %side,
            skill = %skill.name,
            defender = %target.name(),
            amount = roll.amount,
            effectiveness = roll.effectiveness,
            hp = target.hp(),
            "damage"
        );
        notifier.announce(&BattleEvent::Damaged {
            side: side.opponent(),
            target: target.name().to_string(),
            amount: roll.amount,
            hp: target.hp(),
            max_hp: target.max_hp(),
            effectiveness: roll.effectiveness,
        });
        if target.is_fainted() {
            notifier.announce(&BattleEvent::Fainted {
                side: side.opponent(),
                combatant: target.name().to_string(),
            });
        }
    }

    fn resolve_faint(
        &mut self,
        side: SideId,
        participants: &mut Participants<'_>,
        notifier: &mut dyn Notifier,
    ) -> Result<()> {
        let source = participants.get(side);
        let s = self.side_mut(side);
        if let Replacement::SentIn(_) = replace_fainted(s, source)? {
            let combatant = s.active().name().to_string();
            tracing::debug!(%side, combatant = %combatant, "replacement sent in");
            notifier.announce(&BattleEvent::Replaced { side, combatant });
        }
        Ok(())
    }

    pub fn run(&mut self, participants: &mut Participants<'_>, notifier: &mut dyn Notifier) -> Result<BattleReport> {
        let mut outcome = self.outcome();
        while !outcome.is_over() && self.turn < self.options.max_turns {
            outcome = self.play_turn(participants, notifier)?;
        }
        if !outcome.is_over() {
            tracing::warn!(turns = self.turn, "turn limit reached without a result");
        }
        Ok(BattleReport {
            outcome,
            turns: self.turn,
        })
    }

    /// Full-heals every combatant, puts each side's first roster member back
    /// in front and rewinds the RNG to its starting state.
    pub fn reset(&mut self) {
        self.side_a.reset();
        self.side_b.reset();
        self.turn = 0;
        self.phase = TurnPhase::Idle;
        self.rng = self.initial_rng.clone();
        self.end_announced = false;
    }
}

pub fn simulate_battle(
    team_a: &[Creature],
    team_b: &[Creature],
    seed: u64,
    options: &BattleOptions,
) -> Result<BattleReport> {
    let mut battle = Battle::new(team_a, team_b, seed, options.clone())?;
    let mut bot_a = RandomPolicy::new(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0xA);
    let mut bot_b = RandomPolicy::new(seed.wrapping_mul(0xC2B2_AE3D_27D4_EB4F) ^ 0xB);
    let mut participants = Participants::new(&mut bot_a, &mut bot_b);
    battle.run(&mut participants, &mut ())
}
