//! Crate-wide error type.
//!
//! Ordinary search outcomes (UNSAT, UNKNOWN from an exhausted local search)
//! are not errors — they flow back through [`crate::types::SolverRecord`].
//! Only unrecoverable conditions encountered before or during parsing
//! propagate as a [`SolverError`].

use std::path::PathBuf;
use thiserror::Error;

/// A failure that prevents a solver from running at all.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: malformed DIMACS token {token:?}")]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("literal {lit} out of range for {num_vars} variable(s)")]
    InvalidLiteral { lit: i64, num_vars: usize },

    #[error("invalid sudoku grid: {reason}")]
    InvalidSudokuGrid { reason: String },
}

/// Shorthand used throughout the crate, mirroring splr's `MaybeInconsistent`-style aliases.
pub type Result<T> = std::result::Result<T, SolverError>;
