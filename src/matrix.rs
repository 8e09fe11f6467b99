use crate::battle::{simulate_battle, BattleOptions};
use crate::model::{Creature, TeamsFile};
use crate::outcome::Outcome;
use anyhow::Context;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Every `pick`-sized index combination of `0..len`, in lexicographic order.
pub fn combinations(len: usize, pick: usize) -> Vec<Vec<usize>> {
    let mut combos = Vec::new();
    if pick == 0 || pick > len {
        return combos;
    }
    let mut current: Vec<usize> = (0..pick).collect();
    loop {
        combos.push(current.clone());
        // rightmost slot that can still advance
        let Some(pos) = (0..pick).rev().find(|&i| current[i] < len - pick + i) else {
            break;
        };
        current[pos] += 1;
        for i in pos + 1..pick {
            current[i] = current[i - 1] + 1;
        }
    }
    combos
}

fn selection_from_indices(team: &[Creature], indices: &[usize]) -> Vec<Creature> {
    indices.iter().map(|&idx| team[idx].clone()).collect()
}

/// Win rate of every team-A selection (rows) against every team-B selection
/// (columns). Unfinished battles and double knockouts count as half a win.
pub fn compute_matrix(
    teams: &TeamsFile,
    sims_per_cell: usize,
    seed: u64,
    pick: usize,
    options: &BattleOptions,
) -> anyhow::Result<Vec<Vec<f64>>> {
    let selections_a: Vec<Vec<Creature>> = combinations(teams.team_a.len(), pick)
        .iter()
        .map(|idx| selection_from_indices(&teams.team_a, idx))
        .collect();
    let selections_b: Vec<Vec<Creature>> = combinations(teams.team_b.len(), pick)
        .iter()
        .map(|idx| selection_from_indices(&teams.team_b, idx))
        .collect();
    let tasks: Vec<(usize, usize)> = (0..selections_a.len())
        .flat_map(|a| (0..selections_b.len()).map(move |b| (a, b)))
        .collect();
    tracing::info!(
        rows = selections_a.len(),
        cols = selections_b.len(),
        sims_per_cell,
        "simulating matrix"
    );
    let cell_results: Vec<CellResult> = tasks
        .par_iter()
        .map(|&(a_idx, b_idx)| -> anyhow::Result<CellResult> {
            let mut cell_rng = SmallRng::seed_from_u64(seed ^ ((a_idx as u64) << 32) ^ (b_idx as u64));
            let a_sel = &selections_a[a_idx];
            let b_sel = &selections_b[b_idx];
            let mut a_wins = 0u64;
            let mut draws = 0u64;
            for _ in 0..sims_per_cell {
                let battle_seed = cell_rng.gen();
                let report = simulate_battle(a_sel, b_sel, battle_seed, options)
                    .with_context(|| format!("battle in cell ({a_idx}, {b_idx}) failed"))?;
                match report.outcome {
                    Outcome::SideBDefeated => a_wins += 1,
                    Outcome::SideADefeated => {}
                    Outcome::BothDefeated | Outcome::Ongoing => draws += 1,
                }
            }
            let total = sims_per_cell as f64;
            let win_rate = (a_wins as f64 + 0.5 * draws as f64) / total;
            Ok(CellResult {
                a_idx,
                b_idx,
                win_rate,
            })
        })
        .collect::<anyhow::Result<_>>()?;

    let mut matrix = vec![vec![0.0; selections_b.len()]; selections_a.len()];
    for cell in cell_results {
        matrix[cell.a_idx][cell.b_idx] = cell.win_rate;
    }
    Ok(matrix)
}

pub fn write_csv(matrix: &[Vec<f64>], path: &std::path::Path) -> anyhow::Result<()> {
    let mut out = String::new();
    for (row_idx, row) in matrix.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            if col_idx > 0 {
                out.push(',');
            }
            out.push_str(&format!("{value:.4}"));
        }
        if row_idx + 1 < matrix.len() {
            out.push('\n');
        }
    }
    std::fs::write(path, out).with_context(|| format!("Failed to write matrix to {}", path.display()))?;
    Ok(())
}

struct CellResult {
    a_idx: usize,
    b_idx: usize,
    win_rate: f64,
}

pub fn validate_pick(teams: &TeamsFile, pick: usize) -> anyhow::Result<()> {
    if pick == 0 {
        anyhow::bail!("--pick must be > 0");
    }
    let smallest = teams.team_a.len().min(teams.team_b.len());
    if pick > smallest {
        anyhow::bail!("--pick {pick} exceeds the smaller team size ({smallest})");
    }
    Ok(())
}
