mod prompt;

use anyhow::Context;
use creature_duel::battle::{Battle, BattleOptions, FaintResolution, Participants};
use creature_duel::policy::RandomPolicy;
use creature_duel::side::SideId;
use creature_duel::{load_teams, run, CliOptions};
use prompt::{ConsoleNotifier, HumanPrompt};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn usage() -> ! {
    eprintln!(
        "Usage:\n  creature-duel [matrix] [--teams teams.json] [--sims-per-cell N] [--seed SEED] [--output matrix.csv] \
[--pick K] [--min-damage N] [--faint-resolution immediate|simultaneous] [--max-turns N] [-v]\n  \
creature-duel play [--teams teams.json] [--seed SEED] [--human-side A|B] [-v]"
    );
    std::process::exit(1);
}

enum Command {
    Matrix(CliOptions),
    Play(PlayOptions),
}

struct PlayOptions {
    teams_path: PathBuf,
    seed: u64,
    human_side: SideId,
    battle: BattleOptions,
}

fn parse_side(s: &str) -> Option<SideId> {
    match s.to_ascii_uppercase().as_str() {
        "A" => Some(SideId::A),
        "B" => Some(SideId::B),
        _ => None,
    }
}

fn parse_args() -> anyhow::Result<(Command, bool)> {
    let mut args = env::args().skip(1).peekable();
    let play = match args.peek().map(String::as_str) {
        Some("play") => {
            args.next();
            true
        }
        Some("matrix") => {
            args.next();
            false
        }
        _ => false,
    };

    let mut teams_path = PathBuf::from("teams.json");
    let mut sims_per_cell = 100usize;
    let mut seed = 0u64;
    let mut output_path = PathBuf::from("matrix.csv");
    let mut pick = 3usize;
    let mut human_side = SideId::A;
    let mut battle = BattleOptions::default();
    let mut verbose = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--teams" => {
                teams_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--teams requires a path (e.g. --teams teams.json)")
                })?;
            }
            "--sims-per-cell" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sims-per-cell requires a number"))?;
                sims_per_cell = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = val.parse()?;
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output matrix.csv)")
                })?;
            }
            "--pick" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--pick requires a number"))?;
                pick = val.parse()?;
            }
            "--min-damage" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--min-damage requires a number"))?;
                battle.min_damage = val.parse()?;
            }
            "--faint-resolution" => {
                let val = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--faint-resolution requires immediate or simultaneous")
                })?;
                battle.faint_resolution = match val.to_ascii_lowercase().as_str() {
                    "immediate" => FaintResolution::Immediate,
                    "simultaneous" => FaintResolution::Simultaneous,
                    other => anyhow::bail!("Unknown faint resolution {other} (use immediate or simultaneous)"),
                };
            }
            "--max-turns" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-turns requires a number"))?;
                battle.max_turns = val.parse()?;
            }
            "--human-side" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--human-side requires A or B"))?;
                human_side = parse_side(&val).ok_or_else(|| anyhow::anyhow!("--human-side must be A or B, got {val}"))?;
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    let command = if play {
        Command::Play(PlayOptions {
            teams_path,
            seed,
            human_side,
            battle,
        })
    } else {
        Command::Matrix(CliOptions {
            teams_path,
            sims_per_cell,
            seed,
            output_path,
            pick,
            battle,
        })
    };
    Ok((command, verbose))
}

fn play(opts: PlayOptions) -> anyhow::Result<()> {
    let teams = load_teams(&opts.teams_path)?;
    let mut battle = Battle::new(&teams.team_a, &teams.team_b, opts.seed, opts.battle)
        .context("Failed to set up battle")?;
    let stdin = std::io::stdin();
    let mut human = HumanPrompt::new(stdin.lock());
    let mut bot = RandomPolicy::new(opts.seed ^ 0x9E37_79B9);
    let mut participants = match opts.human_side {
        SideId::A => Participants::new(&mut human, &mut bot),
        SideId::B => Participants::new(&mut bot, &mut human),
    };
    let mut notifier = ConsoleNotifier {
        human: opts.human_side,
    };
    let report = battle.run(&mut participants, &mut notifier)?;
    tracing::info!(outcome = ?report.outcome, turns = report.turns, "game finished");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let (command, verbose) = parse_args()?;

    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    match command {
        Command::Matrix(opts) => run(opts),
        Command::Play(opts) => play(opts),
    }
}
