use creature_duel::prelude::*;
use creature_duel::types::type_effectiveness;
use std::io::BufRead;

/// Decision source reading choices from a line-based input (stdin in the
/// binary). Bad input re-prompts; end of input falls back to the first
/// legal option so the battle can finish.
pub struct HumanPrompt<I> {
    input: I,
}

impl<I: BufRead> HumanPrompt<I> {
    pub fn new(input: I) -> Self {
        Self { input }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn pick_slot(&mut self, side: &Side, slots: &[usize]) -> Option<usize> {
        loop {
            for &idx in slots {
                if let Some(c) = side.combatant(idx) {
                    println!(" {}: {} ({}) HP {}/{}", idx + 1, c.name(), c.element(), c.hp(), c.max_hp());
                }
            }
            let input = self.read_line()?;
            match input.parse::<usize>() {
                Ok(n) if n >= 1 && slots.contains(&(n - 1)) => return Some(n - 1),
                _ => println!("Invalid choice, try again."),
            }
        }
    }
}

impl<I: BufRead> DecisionSource for HumanPrompt<I> {
    fn choose_action(&mut self, side: &Side, opponent: &Side, legal: &[Action]) -> Action {
        let fallback = legal.first().copied().unwrap_or(Action::Attack { skill: 0 });
        let swaps: Vec<usize> = legal
            .iter()
            .filter_map(|a| match a {
                Action::Swap { target } => Some(*target),
                Action::Attack { .. } => None,
            })
            .collect();
        let active = side.active();
        let foe = opponent.active();
        loop {
            println!(
                "{} HP {}/{} vs {} ({}) HP {}/{}",
                active.name(),
                active.hp(),
                active.max_hp(),
                foe.name(),
                foe.element(),
                foe.hp(),
                foe.max_hp()
            );
            println!("Choose an action:");
            for (idx, skill) in active.skills().iter().enumerate() {
                let mult = type_effectiveness(skill.element, foe.element());
                println!(" {}: {} ({}, {:?}, power {}, x{mult})", idx + 1, skill.name, skill.element, skill.category, skill.power);
            }
            println!(" 0: Swap");
            let Some(input) = self.read_line() else {
                return fallback;
            };
            if input == "0" {
                if swaps.is_empty() {
                    println!("Nobody to swap in.");
                    continue;
                }
                println!("Swap to:");
                return match self.pick_slot(side, &swaps) {
                    Some(target) => Action::Swap { target },
                    None => fallback,
                };
            }
            match input.parse::<usize>() {
                Ok(n) if n >= 1 && legal.contains(&Action::Attack { skill: n - 1 }) => {
                    return Action::Attack { skill: n - 1 };
                }
                _ => println!("Invalid choice, try again."),
            }
        }
    }

    fn choose_replacement(&mut self, side: &Side, candidates: &[usize]) -> usize {
        println!("{} fainted! Choose a replacement:", side.active().name());
        self.pick_slot(side, candidates)
            .or_else(|| candidates.first().copied())
            .unwrap_or(0)
    }
}

/// Prints battle events for a human reader.
pub struct ConsoleNotifier {
    pub human: SideId,
}

impl ConsoleNotifier {
    fn owner(&self, side: SideId) -> &'static str {
        if side == self.human {
            "Your"
        } else {
            "Foe's"
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn announce(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::TurnStarted { turn } => println!("\n== Turn {turn} =="),
            BattleEvent::Swapped { side, from, to } => {
                println!("{} {from} withdrew; {to} stepped in.", self.owner(*side))
            }
            BattleEvent::SkillUsed { side, attacker, skill, .. } => {
                println!("{} {attacker} used {skill}!", self.owner(*side))
            }
            BattleEvent::Damaged {
                side,
                target,
                amount,
                hp,
                max_hp,
                effectiveness,
            } => {
                if *effectiveness > 1.0 {
                    println!("It's super effective!");
                } else if *effectiveness < 1.0 {
                    println!("It's not very effective...");
                }
                println!("{} {target} took {amount} damage ({hp}/{max_hp}).", self.owner(*side));
            }
            BattleEvent::AttackSkipped { side, attacker } => {
                println!("{} {attacker} could not act.", self.owner(*side))
            }
            BattleEvent::Fainted { side, combatant } => println!("{} {combatant} fainted!", self.owner(*side)),
            BattleEvent::Replaced { side, combatant } => {
                println!("{} {combatant} was sent out.", self.owner(*side))
            }
            BattleEvent::SideDefeated { side } => println!("{} team is out of combatants.", self.owner(*side)),
            BattleEvent::BattleEnded { outcome } => match outcome.winner() {
                Some(side) if side == self.human => println!("You win!"),
                Some(_) => println!("You lose..."),
                None => println!("Draw."),
            },
        }
    }
}
