//! A lazy-deletion max-priority-queue over variable activity scores.
//!
//! Decaying a score in place would require a decrease-key operation a
//! binary heap doesn't support cheaply. Instead, `decay` and `bump` both
//! push a fresh entry carrying the variable's *current* score; `pop`
//! discards any entry whose recorded score no longer matches the
//! authoritative table, which is exactly the stale half of those pushes.
//! This is the design the source's own `PriorityQueue` class uses, not a
//! reinvention: bump-or-decay-then-reinsert, check-on-pop.
use crate::types::{Assignment, VarId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug)]
struct Entry {
    score: f64,
    var: VarId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.var == other.var
    }
}
impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
    }
}

pub struct VsidsQueue {
    heap: BinaryHeap<Entry>,
    scores: Vec<f64>,
}

impl VsidsQueue {
    /// Builds a queue over variables `1..=num_vars`, each starting at `0.0`.
    pub fn new(num_vars: usize) -> VsidsQueue {
        VsidsQueue {
            heap: BinaryHeap::with_capacity(num_vars),
            scores: vec![0.0; num_vars + 1],
        }
    }

    /// Sets the initial score of `var` (used once, at setup).
    pub fn set(&mut self, var: VarId, score: f64) {
        self.scores[var] = score;
        self.heap.push(Entry { score, var });
    }

    /// Adds `delta` to `var`'s score after it participates in a learned
    /// clause, and reseats it in the heap.
    pub fn bump(&mut self, var: VarId, delta: f64) {
        self.scores[var] += delta;
        self.heap.push(Entry {
            score: self.scores[var],
            var,
        });
    }

    /// Multiplies every score by `factor`, reseating every variable so the
    /// heap stays eventually consistent with the score table.
    pub fn decay(&mut self, factor: f64) {
        for score in self.scores.iter_mut().skip(1) {
            *score *= factor;
        }
        for var in 1..self.scores.len() {
            self.heap.push(Entry {
                score: self.scores[var],
                var,
            });
        }
    }

    /// Pops the highest-scoring still-unassigned variable, discarding stale
    /// entries as it goes.
    pub fn pop(&mut self, assignment: &Assignment) -> Option<VarId> {
        while let Some(entry) = self.heap.pop() {
            if assignment.contains_key(&entry.var) {
                continue;
            }
            if entry.score != self.scores[entry.var] {
                continue;
            }
            return Some(entry.var);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_highest_score_first() {
        let mut q = VsidsQueue::new(3);
        q.set(1, 1.0);
        q.set(2, 5.0);
        q.set(3, 3.0);
        let assignment = Assignment::new();
        assert_eq!(q.pop(&assignment), Some(2));
        assert_eq!(q.pop(&assignment), Some(3));
        assert_eq!(q.pop(&assignment), Some(1));
    }

    #[test]
    fn skips_assigned_variables() {
        let mut q = VsidsQueue::new(2);
        q.set(1, 5.0);
        q.set(2, 1.0);
        let mut assignment = Assignment::new();
        assignment.insert(1, true);
        assert_eq!(q.pop(&assignment), Some(2));
    }

    #[test]
    fn bump_reorders_without_leaving_a_stale_winner() {
        let mut q = VsidsQueue::new(2);
        q.set(1, 1.0);
        q.set(2, 2.0);
        q.bump(1, 5.0);
        let assignment = Assignment::new();
        assert_eq!(q.pop(&assignment), Some(1));
    }

    #[test]
    fn decay_reseats_every_variable() {
        let mut q = VsidsQueue::new(2);
        q.set(1, 10.0);
        q.set(2, 1.0);
        q.decay(0.5);
        let assignment = Assignment::new();
        assert_eq!(q.pop(&assignment), Some(1));
    }
}
