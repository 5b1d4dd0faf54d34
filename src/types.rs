//! Basic types shared by every solver engine.
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A variable id, 1-indexed.
pub type VarId = usize;

/// A literal: a non-zero signed integer whose magnitude is the variable id
/// and whose sign is the polarity. Kept as a plain `i32` (not a packed/shifted
/// encoding like splr's `Lit`) so it round-trips losslessly through DIMACS
/// text and through the JSON result record.
pub type Lit = i32;

/// Converters between a [`Lit`] and the [`VarId`] it refers to.
pub trait LiteralEncoding {
    fn var(self) -> VarId;
    fn is_positive(self) -> bool;
    fn negate(self) -> Lit;
}

impl LiteralEncoding for Lit {
    fn var(self) -> VarId {
        self.unsigned_abs() as VarId
    }
    fn is_positive(self) -> bool {
        self > 0
    }
    fn negate(self) -> Lit {
        -self
    }
}

/// An ordered sequence of literals, interpreted as a disjunction.
pub type Clause = Vec<Lit>;

/// A clause identifier into a solver's growable clause table. Stable: never
/// compacted, so learned clauses can be referenced by index indefinitely.
pub type ClauseId = usize;

/// A partial mapping from variable id to its assigned Boolean, as returned
/// to callers. A `BTreeMap` (rather than a hash map) keeps JSON output and
/// equality checks deterministic regardless of insertion order.
pub type Assignment = BTreeMap<VarId, bool>;

/// A CNF formula: the clause sequence is the source of truth, `num_vars`/
/// `num_clauses` are the (possibly corrected) DIMACS header values.
#[derive(Clone, Debug, Default)]
pub struct Formula {
    pub num_vars: usize,
    pub num_clauses: usize,
    pub clauses: Vec<Clause>,
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Formula(vars: {}, clauses: {})",
            self.num_vars, self.num_clauses
        )
    }
}

impl Formula {
    /// Evaluates `literal` against `assignment`. `None` means undefined.
    pub fn literal_value(literal: Lit, assignment: &Assignment) -> Option<bool> {
        assignment
            .get(&literal.var())
            .map(|&value| value == literal.is_positive())
    }

    /// `true` iff every clause has at least one literal not falsified by
    /// `assignment` under the universal extension (unassigned variables are
    /// free, so a clause with an undefined literal counts as satisfiable
    /// rather than falsified). Used by the SAT-result invariant checks.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&lit| Self::literal_value(lit, assignment) != Some(false))
        })
    }
}

/// Outcome of a solve attempt, per SPEC_FULL §6.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "SAT")]
    Sat,
    #[serde(rename = "UNSAT")]
    Unsat,
    /// Local search exhausted its flip/restart budget without a model.
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// Set by the harness, never by a solver itself.
    #[serde(rename = "TIMEOUT")]
    Timeout,
    /// Set by the harness when a returned SAT assignment fails verification.
    #[serde(rename = "ERROR")]
    Error,
}

/// The result record every solver entry point returns. Counter fields that
/// don't apply to a given solver are omitted from the JSON rather than
/// emitted as zero, mirroring the Python source's per-solver dict literals.
#[derive(Clone, Debug, Serialize)]
pub struct SolverRecord {
    pub solver: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Assignment::is_empty")]
    pub assignment: Assignment,
    pub num_vars: usize,
    pub num_clauses: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub decisions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_propagations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pure_eliminations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learned_clauses: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flips: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restarts: Option<u64>,

    /// Populated by binaries after the solve call returns; not part of a
    /// solver's own contract (mirrors the Python source adding `wall_time`
    /// to the dict after `run_solver` returns).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_time: Option<f64>,
}

impl SolverRecord {
    /// A bare record with every counter unset, ready for a specific solver
    /// to fill in the fields it tracks.
    pub fn new(solver: &str, status: Status, formula: &Formula) -> SolverRecord {
        SolverRecord {
            solver: solver.to_string(),
            status,
            assignment: Assignment::new(),
            num_vars: formula.num_vars,
            num_clauses: formula.num_clauses,
            decisions: None,
            unit_propagations: None,
            pure_eliminations: None,
            conflicts: None,
            learned_clauses: None,
            flips: None,
            restarts: None,
            wall_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_value_tracks_polarity() {
        let mut a = Assignment::new();
        a.insert(1, true);
        assert_eq!(Formula::literal_value(1, &a), Some(true));
        assert_eq!(Formula::literal_value(-1, &a), Some(false));
        assert_eq!(Formula::literal_value(2, &a), None);
    }

    #[test]
    fn satisfied_by_is_universal_extension() {
        let f = Formula {
            num_vars: 2,
            num_clauses: 1,
            clauses: vec![vec![1, 2]],
        };
        let mut a = Assignment::new();
        a.insert(1, false);
        // var 2 is unassigned, so the clause is not yet falsified.
        assert!(f.is_satisfied_by(&a));
        a.insert(2, false);
        assert!(!f.is_satisfied_by(&a));
    }
}
