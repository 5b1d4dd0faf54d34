//! Crate `walksat` implements the noise-biased stochastic local search.
use crate::dimacs::parse_dimacs;
use crate::error::Result;
use crate::types::{Assignment, Clause, Formula, SolverRecord, Status, VarId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Search counters, incremented monotonically during a solve.
#[derive(Clone, Copy, Debug, Default)]
pub struct WalkSatStats {
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

/// One attempt: up to `max_flips` steps of noise-biased / greedy flips.
/// Returns the satisfying assignment if one was found within the budget.
fn attempt(
    clauses: &[Clause],
    num_vars: usize,
    max_flips: u64,
    noise: f64,
    stats: &mut WalkSatStats,
    rng: &mut StdRng,
) -> Option<Assignment> {
    let mut assignment = initialize_assignment(num_vars, rng);
    for _ in 0..max_flips {
        let unsatisfied = unsatisfied_clauses(clauses, &assignment);
        if unsatisfied.is_empty() {
            return Some(assignment);
        }
        let clause = unsatisfied[rng.gen_range(0..unsatisfied.len())];
        stats.flips += 1;
        log::trace!("flip #{}: {} clauses unsatisfied", stats.flips, unsatisfied.len());
        if rng.gen::<f64>() < noise {
            let lit = clause.choose(rng).unwrap();
            flip(&mut assignment, lit.unsigned_abs() as VarId);
            continue;
        }
        let mut best_var = None;
        let mut best_score = u64::MAX;
        for &lit in clause {
            let var = lit.unsigned_abs() as VarId;
            flip(&mut assignment, var);
            let broken = unsatisfied_clauses(clauses, &assignment).len() as u64;
            flip(&mut assignment, var);
            if broken < best_score {
                best_score = broken;
                best_var = Some(var);
            }
        }
        let chosen = best_var.unwrap_or_else(|| clause.choose(rng).unwrap().unsigned_abs() as VarId);
        flip(&mut assignment, chosen);
    }
    None
}

/// Runs up to `restarts` attempts of WalkSAT against `path`, returning the
/// first satisfying assignment found, or `UNKNOWN` if none was found.
pub fn solve(path: &Path, max_flips: u64, noise: f64, restarts: u64, seed: Option<u64>) -> Result<SolverRecord> {
    let formula = parse_dimacs(path)?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut stats = WalkSatStats::default();
    let mut found = None;
    for _ in 0..restarts.max(1) {
        if let Some(a) = attempt(&formula.clauses, formula.num_vars, max_flips, noise, &mut stats, &mut rng) {
            found = Some(a);
            break;
        }
        stats.restarts += 1;
        log::debug!("restart #{}: max_flips exhausted without a model", stats.restarts);
    }
    let mut record = SolverRecord::new(
        "walksat",
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_cnf(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn trivial_sat() {
        let f = write_cnf("p cnf 1 1\n1 0\n");
        let r = solve(f.path(), 1000, 0.5, 5, Some(1)).unwrap();
        assert_eq!(r.status, Status::Sat);
    }

    #[test]
    fn out_of_range_noise_does_not_panic() {
        let f = write_cnf("p cnf 3 3\n1 2 0\n-2 3 0\n-1 -3 0\n");
        let r = solve(f.path(), 200, 1.5, 2, Some(1)).unwrap();
        assert_eq!(r.status, Status::Sat);
        let f2 = write_cnf("p cnf 3 3\n1 2 0\n-2 3 0\n-1 -3 0\n");
        let r2 = solve(f2.path(), 200, -0.5, 2, Some(1)).unwrap();
        assert_eq!(r2.status, Status::Sat);
    }

    #[test]
    fn trivial_unsat_is_unknown() {
        let f = write_cnf("p cnf 1 2\n1 0\n-1 0\n");
        let r = solve(f.path(), 200, 0.5, 2, Some(1)).unwrap();
        assert_eq!(r.status, Status::Unknown);
        assert!(r.assignment.is_empty());
    }

    #[test]
    fn same_seed_is_reproducible() {
        let f1 = write_cnf("p cnf 5 3\n1 2 3 0\n-1 4 0\n-2 -4 5 0\n");
        let f2 = write_cnf("p cnf 5 3\n1 2 3 0\n-1 4 0\n-2 -4 5 0\n");
        let r1 = solve(f1.path(), 500, 0.4, 3, Some(42)).unwrap();
        let r2 = solve(f2.path(), 500, 0.4, 3, Some(42)).unwrap();
        assert_eq!(r1.status, r2.status);
        assert_eq!(r1.assignment, r2.assignment);
        assert_eq!(r1.flips, r2.flips);
    }

    #[test]
    fn satisfying_assignment_satisfies_formula() {
        let f = write_cnf("p cnf 3 3\n1 2 0\n-2 3 0\n-1 -3 0\n");
        let r = solve(f.path(), 2000, 0.5, 10, Some(7)).unwrap();
        assert_eq!(r.status, Status::Sat);
        let formula = parse_dimacs(f.path()).unwrap();
        assert!(formula.is_satisfied_by(&r.assignment));
    }
}
