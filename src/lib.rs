//! Turn resolution for a two-sided creature battler.
//!
//! Each turn both sides submit an [`battle::Action`]; [`battle::Battle`]
//! orders them, applies swaps and damage, replaces fainted combatants through
//! a [`policy::DecisionSource`] and reports the [`outcome::Outcome`].

pub mod battle;
pub mod damage;
pub mod error;
pub mod events;
pub mod matrix;
pub mod model;
pub mod order;
pub mod outcome;
pub mod policy;
pub mod replacement;
pub mod side;
pub mod types;

use crate::battle::BattleOptions;
use crate::matrix::{compute_matrix, validate_pick};
use crate::model::TeamsFile;
use crate::side::Side;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::battle::{Action, Battle, BattleOptions, BattleReport, FaintResolution, Participants};
    pub use crate::error::{BattleError, InvalidActionReason};
    pub use crate::events::{BattleEvent, EventLog, LogNotifier, Notifier};
    pub use crate::model::{Creature, Skill, SkillCategory, Stats};
    pub use crate::outcome::Outcome;
    pub use crate::policy::{DecisionSource, RandomPolicy, ScriptedPolicy};
    pub use crate::side::{Combatant, Side, SideId};
    pub use crate::types::Element;
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub teams_path: PathBuf,
    pub sims_per_cell: usize,
    pub seed: u64,
    pub output_path: PathBuf,
    pub pick: usize,
    pub battle: BattleOptions,
}

pub fn load_teams(path: &Path) -> anyhow::Result<TeamsFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read teams file at {}", path.display()))?;
    let parsed: TeamsFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    validate_teams(&parsed)?;
    Ok(parsed)
}

/// Builds both sides once so roster problems surface before any battle runs.
pub fn validate_teams(teams: &TeamsFile) -> anyhow::Result<()> {
    Side::new(side::SideId::A, "teamA", teams.team_a.clone()).context("teamA is unusable")?;
    Side::new(side::SideId::B, "teamB", teams.team_b.clone()).context("teamB is unusable")?;
    Ok(())
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.sims_per_cell == 0 {
        anyhow::bail!("--sims-per-cell must be > 0");
    }
    let teams = load_teams(&opts.teams_path)?;
    validate_pick(&teams, opts.pick)?;
    let matrix = compute_matrix(&teams, opts.sims_per_cell, opts.seed, opts.pick, &opts.battle)?;
    matrix::write_csv(&matrix, &opts.output_path)?;
    tracing::info!(
        rows = matrix.len(),
        cols = matrix.first().map(|r| r.len()).unwrap_or(0),
        path = %opts.output_path.display(),
        "wrote matrix"
    );
    println!(
        "Wrote {}x{} matrix to {}",
        matrix.len(),
        matrix.first().map(|r| r.len()).unwrap_or(0),
        opts.output_path.display()
    );
    Ok(())
}
