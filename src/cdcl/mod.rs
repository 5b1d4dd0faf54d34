//! Conflict-driven clause learning: two-literal watches for Boolean
//! constraint propagation, first-UIP conflict analysis, VSIDS branching
//! with phase saving, and geometric restarts.
mod vsids;

use crate::dimacs::parse_dimacs;
use crate::error::Result;
use crate::types::{Assignment, Clause, ClauseId, Formula, Lit, LiteralEncoding, SolverRecord, Status, VarId};
use std::collections::HashMap;
use std::path::Path;
use vsids::VsidsQueue;

const VSIDS_DECAY: f64 = 0.95;
const VSIDS_BUMP: f64 = 1.0;
const INITIAL_RESTART_LIMIT: u64 = 100;
const RESTART_MULTIPLIER: f64 = 1.5;

/// Search counters, incremented monotonically during a solve.
#[derive(Clone, Copy, Debug, Default)]
pub struct CdclStats {
    pub decisions: u64,
    pub conflicts: u64,
    pub learned_clauses: u64,
    pub restarts: u64,
}

/// Resolves `clause` and `reason` on `pivot_var`, dropping the pivot's
/// literal from both sides and cancelling any other complementary pair that
/// results. Mirrors the source's `resolve` helper.
fn resolve(clause: &[Lit], pivot_var: VarId, reason: &[Lit]) -> Clause {
    let mut resolvent: Vec<Lit> = Vec::new();
    for &lit in clause {
        if lit.var() == pivot_var {
            continue;
        }
        if !resolvent.contains(&lit) {
            resolvent.push(lit);
        }
    }
    for &lit in reason {
        if lit.var() == pivot_var {
            continue;
        }
        if let Some(pos) = resolvent.iter().position(|&x| x == -lit) {
            resolvent.remove(pos);
            continue;
        }
        if !resolvent.contains(&lit) {
            resolvent.push(lit);
        }
    }
    resolvent
}

/// The mutable search state for one `solve` call. Clause ids are stable
/// indices into `clauses`, which grows as clauses are learned.
struct CdclEngine {
    clauses: Vec<Clause>,
    watch_map: Vec<(Lit, Lit)>,
    watches: HashMap<Lit, Vec<ClauseId>>,
    num_vars: usize,
    assignment: Vec<Option<bool>>,
    decision_level: Vec<i32>,
    reason: Vec<Option<ClauseId>>,
    trail: Vec<Lit>,
    pending: Vec<Lit>,
    phase: Vec<bool>,
    vsids: VsidsQueue,
    current_level: i32,
    conflicts_since_restart: u64,
    restart_limit: f64,
    stats: CdclStats,
}

impl CdclEngine {
    fn new(formula: &Formula) -> CdclEngine {
        let num_vars = formula
            .clauses
            .iter()
            .flatten()
            .map(|&l| l.var())
            .max()
            .unwrap_or(0)
            .max(formula.num_vars);

        let clauses = formula.clauses.clone();
        let mut watch_map = Vec::with_capacity(clauses.len());
        let mut watches: HashMap<Lit, Vec<ClauseId>> = HashMap::new();
        let mut scores = vec![0.0f64; num_vars + 1];
        for (cid, clause) in clauses.iter().enumerate() {
            for &lit in clause {
                scores[lit.var()] += 1.0;
            }
            match clause.len() {
                0 => watch_map.push((0, 0)),
                1 => {
                    watch_map.push((clause[0], clause[0]));
                    watches.entry(clause[0]).or_default().push(cid);
                }
                _ => {
                    watch_map.push((clause[0], clause[1]));
                    watches.entry(clause[0]).or_default().push(cid);
                    watches.entry(clause[1]).or_default().push(cid);
                }
            }
        }
        let mut vsids = VsidsQueue::new(num_vars);
        for (var, &score) in scores.iter().enumerate().skip(1) {
            vsids.set(var, score);
        }

        CdclEngine {
            clauses,
            watch_map,
            watches,
            num_vars,
            assignment: vec![None; num_vars + 1],
            decision_level: vec![-1; num_vars + 1],
            reason: vec![None; num_vars + 1],
            trail: Vec::new(),
            pending: Vec::new(),
            phase: vec![true; num_vars + 1],
            vsids,
            current_level: 0,
            conflicts_since_restart: 0,
            restart_limit: INITIAL_RESTART_LIMIT as f64,
            stats: CdclStats::default(),
        }
    }

    fn literal_value(&self, lit: Lit) -> Option<bool> {
        self.assignment[lit.var()].map(|v| v == lit.is_positive())
    }

    fn assign(&mut self, lit: Lit, level: i32, reason: Option<ClauseId>) {
        let var = lit.var();
        self.assignment[var] = Some(lit.is_positive());
        self.phase[var] = lit.is_positive();
        self.decision_level[var] = level;
        self.reason[var] = reason;
        self.trail.push(lit);
        self.pending.push(lit);
    }

    fn add_watch(&mut self, lit: Lit, cid: ClauseId) {
        let bucket = self.watches.entry(lit).or_default();
        if !bucket.contains(&cid) {
            bucket.push(cid);
        }
    }

    fn remove_watch(&mut self, lit: Lit, cid: ClauseId) {
        if let Some(bucket) = self.watches.get_mut(&lit) {
            if let Some(pos) = bucket.iter().position(|&x| x == cid) {
                bucket.remove(pos);
            }
        }
    }

    /// Runs Boolean constraint propagation until fixpoint or a conflict,
    /// returning the conflicting clause id.
    fn propagate(&mut self) -> Option<ClauseId> {
        while let Some(literal) = self.pending.pop() {
            let opposite = -literal;
            let watchers = self.watches.get(&opposite).cloned().unwrap_or_default();
            for cid in watchers {
                let (w1, w2) = self.watch_map[cid];
                let other = if w1 == opposite { w2 } else { w1 };
                if self.literal_value(other) == Some(true) {
                    continue;
                }
                let mut replaced = false;
                let clause_lits = self.clauses[cid].clone();
                for candidate in clause_lits {
                    if candidate == w1 || candidate == w2 {
                        continue;
                    }
                    if self.literal_value(candidate) == Some(false) {
                        continue;
                    }
                    if w1 == opposite {
                        self.watch_map[cid] = (candidate, w2);
                    } else {
                        self.watch_map[cid] = (w1, candidate);
                    }
                    self.remove_watch(opposite, cid);
                    self.add_watch(candidate, cid);
                    replaced = true;
                    break;
                }
                if replaced {
                    continue;
                }
                if self.literal_value(other) == Some(false) {
                    return Some(cid);
                }
                self.assign(other, self.current_level, Some(cid));
            }
        }
        None
    }

    /// First-UIP conflict analysis starting from `conflict_cid`. Returns the
    /// learned clause and the level to backjump to.
    fn analyze(&self, conflict_cid: ClauseId) -> (Clause, i32) {
        let mut learned = self.clauses[conflict_cid].clone();
        loop {
            let count_here = learned
                .iter()
                .filter(|&&l| self.decision_level[l.var()] == self.current_level)
                .count();
            if count_here <= 1 {
                break;
            }
            let pivot_var = self.trail.iter().rev().find_map(|&lit| {
                let v = lit.var();
                if self.decision_level[v] == self.current_level && learned.iter().any(|&l| l.var() == v) {
                    Some(v)
                } else {
                    None
                }
            });
            let Some(pivot_var) = pivot_var else { break };
            // A decision literal never appears mid-resolution here: it would
            // only be the sole current-level literal, and the loop already
            // stops once count_here reaches 1. Any other pivot was derived
            // by propagation and always carries a reason clause.
            let Some(reason_cid) = self.reason[pivot_var] else {
                break;
            };
            learned = resolve(&learned, pivot_var, &self.clauses[reason_cid]);
        }
        let backjump = learned
            .iter()
            .map(|&l| self.decision_level[l.var()])
            .filter(|&level| level != self.current_level)
            .max()
            .unwrap_or(0);
        (learned, backjump)
    }

    fn learn_clause(&mut self, clause: Clause) -> ClauseId {
        let cid = self.clauses.len();
        match clause.len() {
            0 => self.watch_map.push((0, 0)),
            1 => {
                self.watch_map.push((clause[0], clause[0]));
                self.add_watch(clause[0], cid);
            }
            _ => {
                self.watch_map.push((clause[0], clause[1]));
                self.add_watch(clause[0], cid);
                self.add_watch(clause[1], cid);
            }
        }
        for &lit in &clause {
            self.vsids.bump(lit.var(), VSIDS_BUMP);
        }
        self.clauses.push(clause);
        self.stats.learned_clauses += 1;
        cid
    }

    fn backtrack(&mut self, level: i32) {
        let decision_level = &self.decision_level;
        self.trail.retain(|&lit| decision_level[lit.var()] <= level);
        for var in 1..=self.num_vars {
            if self.decision_level[var] > level {
                self.assignment[var] = None;
                self.reason[var] = None;
                self.decision_level[var] = -1;
            }
        }
        self.current_level = level;
    }

    fn all_assigned(&self) -> bool {
        self.assignment[1..=self.num_vars].iter().all(Option::is_some)
    }

    fn decide(&mut self) {
        let assignment = self.current_assignment_map();
        if let Some(var) = self.vsids.pop(&assignment) {
            self.current_level += 1;
            let lit = if self.phase[var] { var as Lit } else { -(var as Lit) };
            self.stats.decisions += 1;
            log::trace!("decision #{}: var {} -> {}", self.stats.decisions, var, self.phase[var]);
            self.assign(lit, self.current_level, None);
        }
    }

    /// A throwaway view over `assignment` in the shape `VsidsQueue::pop`
    /// expects. Cheap relative to a solve's clause-scanning cost.
    fn current_assignment_map(&self) -> Assignment {
        self.assignment
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(var, value)| value.map(|v| (var, v)))
            .collect()
    }

    /// Assigns every unit clause at level 0. Returns the conflicting clause
    /// id if the formula is already contradictory before any decision.
    fn initialize(&mut self) -> Option<ClauseId> {
        for (cid, clause) in self.clauses.iter().enumerate() {
            if clause.is_empty() {
                return Some(cid);
            }
        }
        for cid in 0..self.clauses.len() {
            let clause = self.clauses[cid].clone();
            if clause.len() != 1 {
                continue;
            }
            let lit = clause[0];
            match self.literal_value(lit) {
                Some(false) => return Some(cid),
                Some(true) => {}
                None => self.assign(lit, 0, None),
            }
        }
        self.propagate()
    }

    /// Alternates deciding and propagating until the formula is satisfied or
    /// a conflict at level 0 proves it unsatisfiable.
    fn search(&mut self) -> (bool, Assignment) {
        loop {
            if let Some(conflict_cid) = self.propagate() {
                self.stats.conflicts += 1;
                log::debug!("conflict #{} at level {}", self.stats.conflicts, self.current_level);
                if self.current_level == 0 {
                    return (false, Assignment::new());
                }
                let (learned, backjump) = self.analyze(conflict_cid);
                let asserting = learned
                    .iter()
                    .copied()
                    .find(|&l| self.decision_level[l.var()] == self.current_level);
                let learned_cid = self.learn_clause(learned);
                self.backtrack(backjump);
                self.pending.clear();
                self.vsids.decay(VSIDS_DECAY);
                if let Some(lit) = asserting {
                    self.assign(lit, self.current_level, Some(learned_cid));
                }
                self.conflicts_since_restart += 1;
                if self.conflicts_since_restart as f64 >= self.restart_limit {
                    self.stats.restarts += 1;
                    log::debug!("restart #{}, next limit {}", self.stats.restarts, self.restart_limit * RESTART_MULTIPLIER);
                    self.backtrack(0);
                    self.pending.clear();
                    self.conflicts_since_restart = 0;
                    self.restart_limit *= RESTART_MULTIPLIER;
                }
                continue;
            }
            if self.all_assigned() {
                return (true, self.current_assignment_map());
            }
            self.decide();
        }
    }
}

/// Solves `path` with conflict-driven clause learning.
pub fn solve(path: &Path) -> Result<SolverRecord> {
    let formula = parse_dimacs(path)?;
    let mut engine = CdclEngine::new(&formula);
    let (sat, assignment) = match engine.initialize() {
        Some(_) => (false, Assignment::new()),
        None => engine.search(),
    };
    let mut record = SolverRecord::new(
        "cdcl",
        if sat { Status::Sat } else { Status::Unsat },
        &formula,
    );
    record.decisions = Some(engine.stats.decisions);
    record.conflicts = Some(engine.stats.conflicts);
    record.learned_clauses = Some(engine.stats.learned_clauses);
    record.restarts = Some(engine.stats.restarts);
    if sat {
        record.assignment = assignment;
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

    /// `n+1` pigeons into `n` holes: classically UNSAT, and deep enough to
    /// force several rounds of multi-level non-chronological backjumping
    /// before the root-level conflict is found.
    fn pigeonhole_cnf(n: usize) -> String {
        let num_vars = (n + 1) * n;
        let mut clauses = Vec::new();
        for pigeon in 0..=n {
            let clause: Vec<String> = (0..n).map(|hole| (pigeon * n + hole + 1).to_string()).collect();
            clauses.push(clause.join(" "));
        }
        for hole in 0..n {
            for p1 in 0..=n {
                for p2 in (p1 + 1)..=n {
                    clauses.push(format!("-{} -{}", p1 * n + hole + 1, p2 * n + hole + 1));
                }
            }
        }
        let mut out = format!("p cnf {} {}\n", num_vars, clauses.len());
        for c in clauses {
            out.push_str(&c);
            out.push_str(" 0\n");
        }
        out
    }

    #[test]
    fn trivial_sat() {
        let f = write_cnf("p cnf 1 1\n1 0\n");
        let r = solve(f.path()).unwrap();
        assert_eq!(r.status, Status::Sat);
        assert_eq!(r.assignment.get(&1), Some(&true));
    }

    #[test]
    fn trivial_unsat() {
        let f = write_cnf("p cnf 1 2\n1 0\n-1 0\n");
        let r = solve(f.path()).unwrap();
        assert_eq!(r.status, Status::Unsat);
        assert!(r.assignment.is_empty());
    }

    #[test]
    fn pigeonhole_two_into_one_is_unsat() {
        // Two pigeons, one hole: var 1 = pigeon A in the hole, var 2 = pigeon
        // B in the hole. Both must be placed, and they can't share.
        let f = write_cnf("p cnf 2 3\n1 0\n2 0\n-1 -2 0\n");
        let r = solve(f.path()).unwrap();
        assert_eq!(r.status, Status::Unsat);
    }

    #[test]
    fn pigeonhole_four_into_three_is_unsat_via_backjump() {
        // Deep enough (4 decision variables worth of pigeons/holes) that the
        // solver must learn a clause and backjump across multiple decision
        // levels more than once before reaching the root-level conflict;
        // exercises the pending-queue-after-backjump path directly.
        let f = write_cnf(&pigeonhole_cnf(3));
        let r = solve(f.path()).unwrap();
        assert_eq!(r.status, Status::Unsat);
        assert!(r.conflicts.unwrap() > 0);
    }

    #[test]
    fn xor_like_is_unsat() {
        let f = write_cnf("p cnf 2 4\n1 2 0\n-1 -2 0\n1 -2 0\n-1 2 0\n");
        assert_eq!(solve(f.path()).unwrap().status, Status::Unsat);
    }

    #[test]
    fn satisfying_assignment_satisfies_formula() {
        let f = write_cnf("p cnf 3 3\n1 2 0\n-2 3 0\n-1 -3 0\n");
        let r = solve(f.path()).unwrap();
        assert_eq!(r.status, Status::Sat);
        let formula = parse_dimacs(f.path()).unwrap();
        assert!(formula.is_satisfied_by(&r.assignment));
    }

    #[test]
    fn empty_formula_is_sat_with_empty_assignment() {
        let f = write_cnf("p cnf 0 0\n");
        let r = solve(f.path()).unwrap();
        assert_eq!(r.status, Status::Sat);
        assert!(r.assignment.is_empty());
    }

    #[test]
    fn learned_clauses_never_exceed_conflicts() {
        let f = write_cnf(
            "p cnf 4 8\n\
             1 2 0\n-1 2 0\n1 -2 0\n-1 -2 0\n\
             3 4 0\n-3 4 0\n3 -4 0\n-3 -4 0\n",
        );
        let r = solve(f.path()).unwrap();
        assert!(r.learned_clauses.unwrap() <= r.conflicts.unwrap());
    }

    #[test]
    fn decisions_stay_within_the_restart_bound() {
        let f = write_cnf(
            "p cnf 6 10\n\
             1 2 -3 0\n-1 3 4 0\n2 -4 5 0\n-2 -5 6 0\n1 -6 0\n\
             -1 -2 -3 0\n3 4 5 0\n-3 -4 6 0\n2 5 -6 0\n-5 6 1 0\n",
        );
        let r = solve(f.path()).unwrap();
        let bound = r.num_vars as u64 * (r.restarts.unwrap() + 1) + r.conflicts.unwrap();
        assert!(r.decisions.unwrap() <= bound);
    }
}
