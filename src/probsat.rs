//! Crate `probsat` implements break-count-weighted probabilistic local
//! search: the same attempt/restart loop as WalkSAT, but flips are sampled
//! proportional to `epsilon^break_count` rather than noise-biased.
use crate::dimacs::parse_dimacs;
use crate::error::Result;
use crate::types::{Assignment, Clause, Formula, SolverRecord, Status, VarId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Search counters, incremented monotonically during a solve.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProbSatStats {
    pub flips: u64,
    pub restarts: u64,
}

fn initialize_assignment(num_vars: usize, rng: &mut StdRng) -> Assignment {
    (1..=num_vars).map(|v| (v as VarId, rng.gen_bool(0.5))).collect()
}

fn clause_satisfied(clause: &Clause, assignment: &Assignment) -> bool {
    clause
        .iter()
        .any(|&lit| Formula::literal_value(lit, assignment) == Some(true))
}

fn unsatisfied_clauses<'a>(clauses: &'a [Clause], assignment: &Assignment) -> Vec<&'a Clause> {
    clauses
        .iter()
        .filter(|c| !clause_satisfied(c, assignment))
        .collect()
}

fn flip(assignment: &mut Assignment, var: VarId) {
    if let Some(value) = assignment.get_mut(&var) {
        *value = !*value;
    }
}

fn break_count(clauses: &[Clause], assignment: &mut Assignment, var: VarId) -> u64 {
    flip(assignment, var);
    let broken = unsatisfied_clauses(clauses, assignment).len() as u64;
    flip(assignment, var);
    broken
}

/// Samples one variable of `clause` proportional to `epsilon^break_count`.
fn select_variable(
    clause: &Clause,
    clauses: &[Clause],
    assignment: &mut Assignment,
    epsilon: f64,
    rng: &mut StdRng,
) -> VarId {
    let mut weights: Vec<(VarId, f64)> = Vec::with_capacity(clause.len());
    let mut total = 0.0;
    for &lit in clause {
        let var = lit.unsigned_abs() as VarId;
        let score = epsilon.powi(break_count(clauses, assignment, var) as i32);
        weights.push((var, score));
        total += score;
    }
    let r = rng.gen::<f64>() * total;
    let mut accum = 0.0;
    for &(var, score) in &weights {
        accum += score;
        if accum >= r {
            return var;
        }
    }
    weights.last().unwrap().0
}

fn attempt(
    clauses: &[Clause],
    num_vars: usize,
    max_flips: u64,
    epsilon: f64,
    stats: &mut ProbSatStats,
    rng: &mut StdRng,
) -> Option<Assignment> {
    let mut assignment = initialize_assignment(num_vars, rng);
    for _ in 0..max_flips {
        let unsatisfied = unsatisfied_clauses(clauses, &assignment);
        if unsatisfied.is_empty() {
            return Some(assignment);
        }
        let clause = unsatisfied[rng.gen_range(0..unsatisfied.len())].clone();
        let var = select_variable(&clause, clauses, &mut assignment, epsilon, rng);
        flip(&mut assignment, var);
        stats.flips += 1;
    }
    None
}

/// Runs up to `restarts` attempts of probSAT against `path`.
pub fn solve(
    path: &Path,
    max_flips: u64,
    epsilon: f64,
    restarts: u64,
    seed: Option<u64>,
) -> Result<SolverRecord> {
    let formula = parse_dimacs(path)?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut stats = ProbSatStats::default();
    let mut found = None;
    for _ in 0..restarts.max(1) {
        if let Some(a) = attempt(&formula.clauses, formula.num_vars, max_flips, epsilon, &mut stats, &mut rng) {
            found = Some(a);
            break;
        }
        stats.restarts += 1;
    }
    let mut record = SolverRecord::new(
        "probsat",
        if found.is_some() { Status::Sat } else { Status::Unknown },
        &formula,
    );
    record.flips = Some(stats.flips);
    record.restarts = Some(stats.restarts);
    if let Some(a) = found {
        record.assignment = a;
    }
    Ok(record)
}
