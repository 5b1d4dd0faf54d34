//! Crate `dpll` implements recursive DPLL search shared by the baseline and
//! Jeroslow–Wang branching variants; only literal selection differs between
//! them, behind the [`BranchHeuristic`] seam.
use crate::dimacs::parse_dimacs;
use crate::error::Result;
use crate::types::{Assignment, Clause, Formula, Lit, LiteralEncoding, SolverRecord, Status};
use std::path::Path;

/// Search counters, incremented monotonically during a solve.
#[derive(Clone, Copy, Debug, Default)]
pub struct DpllStats {
    pub decisions: u64,
    pub unit_propagations: u64,
    pub pure_eliminations: u64,
}

/// Chooses the next branching literal from the still-active clause set.
/// Only the literal's *presence* drives which variable is branched on; both
/// variants then try that variable `true` before `false`, matching the
/// source's branching order.
pub trait BranchHeuristic {
    fn pick(&self, clauses: &[Clause], assignment: &Assignment) -> Option<Lit>;
}

/// First undecided literal found in the first non-satisfied clause.
pub struct FirstLiteral;

impl BranchHeuristic for FirstLiteral {
    fn pick(&self, clauses: &[Clause], assignment: &Assignment) -> Option<Lit> {
        for clause in clauses {
            let mut satisfied = false;
            let mut undecided = None;
            for &l in clause {
                match Formula::literal_value(l, assignment) {
                    Some(true) => {
                        satisfied = true;
                        break;
                    }
                    None if undecided.is_none() => undecided = Some(l),
                    _ => {}
                }
            }
            if !satisfied {
                if let Some(l) = undecided {
                    return Some(l);
                }
            }
        }
        None
    }
}

/// Jeroslow–Wang weighted branching: each undecided literal in an active
/// clause of length `k` accumulates weight `2^(-k)`; the literal with the
/// highest total weight is chosen.
pub struct JeroslowWang;

impl BranchHeuristic for JeroslowWang {
    fn pick(&self, clauses: &[Clause], assignment: &Assignment) -> Option<Lit> {
        let mut scores: std::collections::HashMap<Lit, f64> = std::collections::HashMap::new();
        for clause in clauses {
            let weight = 2f64.powi(-(clause.len() as i32));
            for &l in clause {
                match Formula::literal_value(l, assignment) {
                    Some(true) => break,
                    None => *scores.entry(l).or_insert(0.0) += weight,
                    _ => {}
                }
            }
        }
        scores
            .into_iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .map(|(lit, _)| lit)
            .or_else(|| {
                clauses
                    .iter()
                    .flatten()
                    .find(|&&l| Formula::literal_value(l, assignment).is_none())
                    .copied()
            })
    }
}

/// Assigns `literal` true, dropping every clause it satisfies and removing
/// its negation from the rest. Returns `true` on conflict (the variable was
/// already assigned the opposite value, or a clause became empty).
fn assign_literal(clauses: &[Clause], assignment: &mut Assignment, literal: Lit) -> (Vec<Clause>, bool) {
    let var = literal.var();
    let value = literal.is_positive();
    if let Some(&existing) = assignment.get(&var) {
        if existing != value {
            return (clauses.to_vec(), true);
        }
        return (clauses.to_vec(), false);
    }
    assignment.insert(var, value);
    let mut updated = Vec::with_capacity(clauses.len());
    for clause in clauses {
        if clause.contains(&literal) {
            continue;
        }
        if clause.contains(&-literal) {
            let reduced: Clause = clause.iter().copied().filter(|&l| l != -literal).collect();
            if reduced.is_empty() {
                return (clauses.to_vec(), true);
            }
            updated.push(reduced);
        } else {
            updated.push(clause.clone());
        }
    }
    (updated, false)
}

/// Unit propagation to a fixpoint: repeatedly assigns the sole undecided
/// literal of any unit clause until none remain or a conflict is found.
fn unit_propagate(
    mut clauses: Vec<Clause>,
    assignment: &mut Assignment,
    stats: &mut DpllStats,
) -> (Vec<Clause>, bool) {
    loop {
        let mut unit = None;
        for clause in &clauses {
            let mut satisfied = false;
            let mut undecided = Vec::new();
            for &l in clause {
                match Formula::literal_value(l, assignment) {
                    Some(true) => {
                        satisfied = true;
                        break;
                    }
                    Some(false) => {}
                    None => undecided.push(l),
                }
            }
            if satisfied {
                continue;
            }
            if undecided.is_empty() {
                return (clauses, true);
            }
            if undecided.len() == 1 {
                unit = Some(undecided[0]);
                break;
            }
        }
        let Some(literal) = unit else {
            return (clauses, false);
        };
        stats.unit_propagations += 1;
        let (updated, conflict) = assign_literal(&clauses, assignment, literal);
        clauses = updated;
        if conflict {
            return (clauses, true);
        }
    }
}

/// Single-pass pure-literal elimination: a literal appearing only with one
/// polarity across the still-active clauses is assigned that polarity. This
/// mirrors the source's single scan rather than a fixpoint loop (see
/// SPEC_FULL §9's open question on this).
fn pure_literal_elimination(
    mut clauses: Vec<Clause>,
    assignment: &mut Assignment,
    stats: &mut DpllStats,
) -> (Vec<Clause>, bool) {
    let mut counts: std::collections::HashMap<Lit, u32> = std::collections::HashMap::new();
    for clause in &clauses {
        for &l in clause {
            match Formula::literal_value(l, assignment) {
                Some(true) => break,
                Some(false) => {}
                None => *counts.entry(l).or_insert(0) += 1,
            }
        }
    }
    let pure: Vec<Lit> = counts
        .keys()
        .copied()
        .filter(|l| !counts.contains_key(&-l))
        .collect();
    if pure.is_empty() {
        return (clauses, false);
    }
    for literal in pure {
        stats.pure_eliminations += 1;
        let (updated, conflict) = assign_literal(&clauses, assignment, literal);
        clauses = updated;
        if conflict {
            return (clauses, true);
        }
    }
    (clauses, false)
}

fn dpll(
    clauses: Vec<Clause>,
    mut assignment: Assignment,
    heuristic: &dyn BranchHeuristic,
    stats: &mut DpllStats,
) -> (bool, Assignment) {
    let (clauses, conflict) = unit_propagate(clauses, &mut assignment, stats);
    if conflict {
        return (false, assignment);
    }
    let (clauses, conflict) = pure_literal_elimination(clauses, &mut assignment, stats);
    if conflict {
        return (false, assignment);
    }
    if clauses.is_empty() {
        return (true, assignment);
    }
    let Some(literal) = heuristic.pick(&clauses, &assignment) else {
        return (true, assignment);
    };
    let var = literal.var();
    for value in [true, false] {
        stats.decisions += 1;
        let mut trial = assignment.clone();
        let trial_literal = if value { var as Lit } else { -(var as Lit) };
        let (branched, conflict) = assign_literal(&clauses, &mut trial, trial_literal);
        if conflict {
            continue;
        }
        let (sat, result_assignment) = dpll(branched, trial, heuristic, stats);
        if sat {
            return (true, result_assignment);
        }
    }
    (false, assignment)
}

fn run(path: &Path, name: &str, heuristic: &dyn BranchHeuristic) -> Result<SolverRecord> {
    let formula = parse_dimacs(path)?;
    let mut stats = DpllStats::default();
    let (sat, assignment) = dpll(
        formula.clauses.clone(),
        Assignment::new(),
        heuristic,
        &mut stats,
    );
    let mut record = SolverRecord::new(
        name,
        if sat { Status::Sat } else { Status::Unsat },
        &formula,
    );
    record.decisions = Some(stats.decisions);
    record.unit_propagations = Some(stats.unit_propagations);
    record.pure_eliminations = Some(stats.pure_eliminations);
    if sat {
        record.assignment = assignment;
    }
    Ok(record)
}

/// Solves `path` with the baseline (first-undecided-literal) heuristic.
pub fn solve_baseline(path: &Path) -> Result<SolverRecord> {
    run(path, "dpll", &FirstLiteral)
}

/// Solves `path` with the Jeroslow–Wang weighted-literal heuristic.
pub fn solve_jeroslow_wang(path: &Path) -> Result<SolverRecord> {
    run(path, "dpll_jw", &JeroslowWang)
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
        let r = solve_baseline(f.path()).unwrap();
        assert_eq!(r.status, Status::Sat);
        assert_eq!(r.assignment.get(&1), Some(&true));
    }

    #[test]
    fn trivial_unsat() {
        let f = write_cnf("p cnf 1 2\n1 0\n-1 0\n");
        let r = solve_baseline(f.path()).unwrap();
        assert_eq!(r.status, Status::Unsat);
        assert!(r.assignment.is_empty());
    }

    #[test]
    fn xor_like_is_unsat_both_variants() {
        let contents = "p cnf 2 4\n1 2 0\n-1 -2 0\n1 -2 0\n-1 2 0\n";
        let f = write_cnf(contents);
        assert_eq!(solve_baseline(f.path()).unwrap().status, Status::Unsat);
        let f2 = write_cnf(contents);
        assert_eq!(solve_jeroslow_wang(f2.path()).unwrap().status, Status::Unsat);
    }

    #[test]
    fn satisfying_assignment_satisfies_formula() {
        let f = write_cnf("p cnf 3 3\n1 2 0\n-2 3 0\n-1 -3 0\n");
        let r = solve_baseline(f.path()).unwrap();
        assert_eq!(r.status, Status::Sat);
        let formula = parse_dimacs(f.path()).unwrap();
        assert!(formula.is_satisfied_by(&r.assignment));
    }

    #[test]
    fn empty_formula_is_sat_with_empty_assignment() {
        let f = write_cnf("p cnf 0 0\n");
        let r = solve_baseline(f.path()).unwrap();
        assert_eq!(r.status, Status::Sat);
        assert!(r.assignment.is_empty());
    }
}
