use creature_duel::battle::{simulate_battle, Action, Battle, BattleOptions, FaintResolution, Participants, TurnPhase};
use creature_duel::error::BattleError;
use creature_duel::events::{BattleEvent, EventLog};
use creature_duel::model::{Creature, Skill, SkillCategory, Stats};
use creature_duel::outcome::Outcome;
use creature_duel::policy::{RandomPolicy, ScriptedPolicy};
use creature_duel::side::SideId;
use creature_duel::types::Element;

const ATTACK: Action = Action::Attack { skill: 0 };

fn make_skill(name: &str, element: Element, category: SkillCategory, power: u32) -> Skill {
    Skill {
        name: name.to_string(),
        element,
        category,
        power,
    }
}

fn make_creature(name: &str, element: Element, hp: u32, attack: u32, defense: u32, speed: u32) -> Creature {
    Creature {
        name: name.to_string(),
        element,
        stats: Stats {
            hp,
            attack,
            defense,
            sp_attack: 10,
            sp_defense: 10,
            speed,
        },
        skills: vec![make_skill("Strike", Element::Normal, SkillCategory::Physical, 6)],
    }
}

fn striker() -> Creature {
    make_creature("Striker", Element::Normal, 30, 10, 4, 5)
}

fn target() -> Creature {
    make_creature("Target", Element::Normal, 10, 10, 4, 3)
}

fn reserve() -> Creature {
    make_creature("Reserve", Element::Normal, 30, 10, 4, 3)
}

fn battle_with(team_a: &[Creature], team_b: &[Creature], options: BattleOptions) -> Battle {
    Battle::new(team_a, team_b, 11, options).unwrap()
}

#[test]
fn knockout_triggers_replacement_and_fizzles_queued_attack() {
    let mut battle = battle_with(&[striker()], &[target(), reserve()], BattleOptions::default());
    let mut a = ScriptedPolicy::default();
    let mut b = ScriptedPolicy::default().with_replacements([1]);
    let mut log = EventLog::new();
    let outcome = battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut log)
        .unwrap();

    assert_eq!(outcome, Outcome::Ongoing);
    let b_side = battle.side(SideId::B);
    assert_eq!(b_side.roster()[0].hp(), 0);
    assert_eq!(b_side.active().name(), "Reserve");
    assert_eq!(battle.side(SideId::A).active().hp(), 30);
    assert_eq!(
        log.events()[1..],
        [
            BattleEvent::SkillUsed {
                side: SideId::A,
                attacker: "Striker".to_string(),
                skill: "Strike".to_string(),
                target: "Target".to_string(),
            },
            BattleEvent::Damaged {
                side: SideId::B,
                target: "Target".to_string(),
                amount: 12,
                hp: 0,
                max_hp: 10,
                effectiveness: 1.0,
            },
            BattleEvent::Fainted {
                side: SideId::B,
                combatant: "Target".to_string(),
            },
            BattleEvent::Replaced {
                side: SideId::B,
                combatant: "Reserve".to_string(),
            },
            BattleEvent::AttackSkipped {
                side: SideId::B,
                attacker: "Target".to_string(),
            },
        ]
    );
}

#[test]
fn last_member_knocked_out_ends_battle_without_retaliation() {
    let mut battle = battle_with(&[striker()], &[target()], BattleOptions::default());
    let mut a = ScriptedPolicy::default();
    let mut b = ScriptedPolicy::default();
    let mut log = EventLog::new();
    let outcome = battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut log)
        .unwrap();

    assert_eq!(outcome, Outcome::SideBDefeated);
    assert_eq!(outcome.winner(), Some(SideId::A));
    assert_eq!(battle.side(SideId::A).active().hp(), 30);
    let tail = &log.events()[log.events().len() - 2..];
    assert_eq!(
        tail,
        [
            BattleEvent::SideDefeated { side: SideId::B },
            BattleEvent::BattleEnded {
                outcome: Outcome::SideBDefeated
            },
        ]
    );

    let err = battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut ())
        .unwrap_err();
    assert_eq!(err, BattleError::BattleOver);
}

#[test]
fn simultaneous_knockout_reports_both_defeated() {
    let options = BattleOptions {
        faint_resolution: FaintResolution::Simultaneous,
        ..BattleOptions::default()
    };
    let fragile = make_creature("Glass", Element::Normal, 10, 10, 4, 5);
    let mut battle = battle_with(&[fragile], &[target()], options);
    let mut a = ScriptedPolicy::default();
    let mut b = ScriptedPolicy::default();
    let mut log = EventLog::new();
    let outcome = battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut log)
        .unwrap();

    assert_eq!(outcome, Outcome::BothDefeated);
    assert_eq!(outcome.winner(), None);
    let defeated: Vec<SideId> = log
        .events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::SideDefeated { side } => Some(*side),
            _ => None,
        })
        .collect();
    assert_eq!(defeated, vec![SideId::A, SideId::B]);
}

#[test]
fn simultaneous_mode_replaces_at_end_of_turn() {
    let options = BattleOptions {
        faint_resolution: FaintResolution::Simultaneous,
        ..BattleOptions::default()
    };
    let mut battle = battle_with(&[striker()], &[target(), reserve()], options);
    let mut a = ScriptedPolicy::default();
    let mut b = ScriptedPolicy::default();
    let outcome = battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut ())
        .unwrap();

    assert_eq!(outcome, Outcome::Ongoing);
    assert_eq!(battle.side(SideId::A).active().hp(), 18);
    assert_eq!(battle.side(SideId::B).active_index(), 1);
    assert_eq!(battle.phase(), TurnPhase::Idle);
}

#[test]
fn swap_goes_first_and_attack_hits_incoming_combatant() {
    let lead = make_creature("Lead", Element::Normal, 30, 10, 4, 1);
    let tank = make_creature("Tank", Element::Normal, 40, 10, 2, 1);
    let sprinter = make_creature("Sprinter", Element::Normal, 50, 10, 4, 99);
    let mut battle = battle_with(&[lead, tank], &[sprinter], BattleOptions::default());
    let mut a = ScriptedPolicy::default();
    let mut b = ScriptedPolicy::default();
    let mut log = EventLog::new();
    battle
        .resolve_turn(
            Action::Swap { target: 1 },
            ATTACK,
            &mut Participants::new(&mut a, &mut b),
            &mut log,
        )
        .unwrap();

    let a_side = battle.side(SideId::A);
    assert_eq!(a_side.active().name(), "Tank");
    assert_eq!(a_side.roster()[0].hp(), 30);
    assert_eq!(a_side.roster()[1].hp(), 26);
    assert!(matches!(log.events()[1], BattleEvent::Swapped { side: SideId::A, .. }));
}

#[test]
fn type_advantage_doubles_battle_damage() {
    let mut blaze = make_creature("Blaze", Element::Fire, 30, 10, 4, 9);
    blaze.skills = vec![make_skill("Flare", Element::Fire, SkillCategory::Physical, 6)];
    let sprout = make_creature("Sprout", Element::Leaf, 50, 1, 4, 1);
    let mut battle = battle_with(&[blaze], &[sprout], BattleOptions::default());
    let mut a = ScriptedPolicy::default();
    let mut b = ScriptedPolicy::default();
    battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut ())
        .unwrap();
    assert_eq!(battle.side(SideId::B).active().hp(), 50 - 24);
}

#[test]
fn zero_damage_floor_allows_no_op_attacks() {
    let pebble = make_creature("Pebble", Element::Normal, 30, 0, 50, 5);
    let options = BattleOptions {
        min_damage: 0,
        ..BattleOptions::default()
    };
    let mut battle = battle_with(&[pebble.clone()], &[pebble.clone()], options);
    let mut a = ScriptedPolicy::default();
    let mut b = ScriptedPolicy::default();
    battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut ())
        .unwrap();
    assert_eq!(battle.side(SideId::A).active().hp(), 30);

    let mut floored = battle_with(&[pebble.clone()], &[pebble], BattleOptions::default());
    floored
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut ())
        .unwrap();
    assert_eq!(floored.side(SideId::A).active().hp(), 29);
    assert_eq!(floored.side(SideId::B).active().hp(), 29);
}

#[test]
fn invalid_replacement_choice_is_rejected_and_recoverable() {
    let mut battle = battle_with(&[striker()], &[target(), reserve()], BattleOptions::default());
    let mut a = ScriptedPolicy::default();
    let mut stubborn = ScriptedPolicy::default().with_replacements([0]);
    let err = battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut stubborn), &mut ())
        .unwrap_err();
    assert_eq!(err, BattleError::InvalidReplacement { side: SideId::B, index: 0 });
    assert!(battle.side(SideId::B).active().is_fainted());

    let mut sensible = ScriptedPolicy::default();
    battle
        .resolve_pending_faints(&mut Participants::new(&mut a, &mut sensible), &mut ())
        .unwrap();
    assert_eq!(battle.side(SideId::B).active().name(), "Reserve");
}

#[test]
fn rejected_replacement_still_ends_the_battle_once_recovered() {
    let ax = make_creature("Ax", Element::Normal, 10, 10, 4, 9);
    let by = make_creature("By", Element::Normal, 10, 10, 4, 3);
    let bz = make_creature("Bz", Element::Normal, 30, 10, 4, 3);
    let options = BattleOptions {
        faint_resolution: FaintResolution::Simultaneous,
        ..BattleOptions::default()
    };
    let mut battle = battle_with(&[ax], &[by, bz], options);
    let mut a = ScriptedPolicy::default();
    let mut stubborn = ScriptedPolicy::default().with_replacements([0]);
    let mut log = EventLog::new();
    let err = battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut stubborn), &mut log)
        .unwrap_err();
    assert_eq!(err, BattleError::InvalidReplacement { side: SideId::B, index: 0 });
    assert_eq!(battle.phase(), TurnPhase::Idle);
    assert_eq!(battle.outcome(), Outcome::SideADefeated);
    assert!(!log
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::BattleEnded { .. })));

    let mut sensible = ScriptedPolicy::default();
    let outcome = battle
        .resolve_pending_faints(&mut Participants::new(&mut a, &mut sensible), &mut log)
        .unwrap();
    assert_eq!(outcome, Outcome::SideADefeated);
    assert_eq!(battle.side(SideId::B).active().name(), "Bz");
    let tail = &log.events()[log.events().len() - 3..];
    assert_eq!(
        tail,
        &[
            BattleEvent::Replaced {
                side: SideId::B,
                combatant: "Bz".to_string()
            },
            BattleEvent::SideDefeated { side: SideId::A },
            BattleEvent::BattleEnded {
                outcome: Outcome::SideADefeated
            },
        ]
    );

    let before = log.events().len();
    battle
        .resolve_pending_faints(&mut Participants::new(&mut a, &mut sensible), &mut log)
        .unwrap();
    assert_eq!(log.events().len(), before);
    let err = battle
        .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut sensible), &mut log)
        .unwrap_err();
    assert_eq!(err, BattleError::BattleOver);
}

#[test]
fn zero_hp_creature_is_rejected_at_construction() {
    let husk = make_creature("Husk", Element::Normal, 0, 10, 4, 5);
    let err = Battle::new(&[husk, striker()], &[target()], 1, BattleOptions::default()).unwrap_err();
    assert!(matches!(err, BattleError::MalformedRoster { .. }));
}

#[test]
fn reset_replays_speed_ties_like_a_fresh_battle() {
    let mirror = make_creature("Mirror", Element::Normal, 10, 10, 4, 7);
    for seed in 0..16 {
        let mut a = ScriptedPolicy::default();
        let mut b = ScriptedPolicy::default();
        let mut replayed = Battle::new(&[mirror.clone()], &[mirror.clone()], seed, BattleOptions::default()).unwrap();
        replayed
            .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut ())
            .unwrap();
        replayed.reset();
        let mut fresh = Battle::new(&[mirror.clone()], &[mirror.clone()], seed, BattleOptions::default()).unwrap();
        let mut log_replayed = EventLog::new();
        let mut log_fresh = EventLog::new();
        replayed
            .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut log_replayed)
            .unwrap();
        fresh
            .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut log_fresh)
            .unwrap();
        assert_eq!(log_replayed.events(), log_fresh.events(), "seed {seed}");
    }
}

#[test]
fn reset_returns_to_fresh_state() {
    let team_a = [striker(), reserve()];
    let team_b = [target(), reserve(), striker()];
    let mut battle = battle_with(&team_a, &team_b, BattleOptions::default());
    let mut a = RandomPolicy::new(1);
    let mut b = RandomPolicy::new(2);
    let mut participants = Participants::new(&mut a, &mut b);
    for _ in 0..3 {
        if battle.outcome().is_over() {
            break;
        }
        battle.play_turn(&mut participants, &mut ()).unwrap();
    }
    assert!(battle.turn() > 0);

    battle.reset();
    let fresh = battle_with(&team_a, &team_b, BattleOptions::default());
    assert_eq!(battle.side(SideId::A), fresh.side(SideId::A));
    assert_eq!(battle.side(SideId::B), fresh.side(SideId::B));
    assert_eq!(battle.turn(), 0);
    assert_eq!(battle.phase(), TurnPhase::Idle);
    assert_eq!(battle.outcome(), Outcome::Ongoing);
}

#[test]
fn speed_ties_are_replayable_and_fair() {
    let mirror = make_creature("Mirror", Element::Normal, 10, 10, 4, 7);
    let mut a_wins = 0;
    let mut b_wins = 0;
    for seed in 0..200 {
        let mut first = Battle::new(&[mirror.clone()], &[mirror.clone()], seed, BattleOptions::default()).unwrap();
        let mut second = Battle::new(&[mirror.clone()], &[mirror.clone()], seed, BattleOptions::default()).unwrap();
        let mut a = ScriptedPolicy::default();
        let mut b = ScriptedPolicy::default();
        let mut log_1 = EventLog::new();
        let mut log_2 = EventLog::new();
        let outcome = first
            .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut log_1)
            .unwrap();
        second
            .resolve_turn(ATTACK, ATTACK, &mut Participants::new(&mut a, &mut b), &mut log_2)
            .unwrap();
        assert_eq!(log_1.events(), log_2.events());
        match outcome {
            Outcome::SideBDefeated => a_wins += 1,
            Outcome::SideADefeated => b_wins += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    assert!(a_wins > 70 && b_wins > 70, "a_wins={a_wins} b_wins={b_wins}");
}

#[test]
fn random_bots_finish_battles() {
    let team_a = [striker(), reserve(), target()];
    let team_b = [reserve(), striker(), target()];
    for seed in 0..20 {
        let report = simulate_battle(&team_a, &team_b, seed, &BattleOptions::default()).unwrap();
        assert!(report.outcome.is_over(), "seed {seed} did not finish");
        assert!(report.turns > 0);
    }
}
