//! Support code for the `harness` binary: the in-repository stand-in for the
//! out-of-scope experiment runner (dataset download and plotting are not
//! implemented, per the non-goals this suite carries from its Python
//! counterpart's `run_experiments.py`). This module only collects files,
//! dispatches solvers with a timeout, verifies SAT results, and shapes the
//! CSV row; it does not own `main`.
use crate::dimacs::parse_dimacs;
use crate::error::Result;
use crate::types::{Formula, SolverRecord, Status};
use crate::{cdcl, dpll, probsat, walksat};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// One row of the harness's CSV output, matching the column set of the
/// Python source's `run_experiments.py`.
#[derive(Clone, Debug, Serialize)]
pub struct HarnessRow {
    pub solver: String,
    pub benchmark_file: String,
    pub problem_type: String,
    pub num_vars: usize,
    pub num_clauses: usize,
    pub status: String,
    pub wall_time: f64,
    pub decisions: Option<u64>,
    pub unit_propagations: Option<u64>,
    pub pure_eliminations: Option<u64>,
    pub conflicts: Option<u64>,
    pub learned_clauses: Option<u64>,
    pub flips: Option<u64>,
    pub restarts: Option<u64>,
    pub verified: Option<bool>,
}

/// Hyperparameters shared by every solver the harness can invoke; unused
/// fields are simply ignored by solvers that don't take them.
#[derive(Clone, Copy, Debug)]
pub struct HarnessParams {
    pub max_flips: u64,
    pub noise: f64,
    pub epsilon: f64,
    pub restarts: u64,
    pub seed: Option<u64>,
}

/// Walks `paths`: directories are walked recursively for `.cnf` files,
/// individual files are taken as-is.
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        collect_into(path, &mut files);
    }
    files.sort();
    files
}

fn collect_into(path: &Path, files: &mut Vec<PathBuf>) {
    if path.is_dir() {
        let Ok(entries) = std::fs::read_dir(path) else {
            return;
        };
        let mut children: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        children.sort();
        for child in children {
            collect_into(&child, files);
        }
    } else if path.extension() == Some(OsStr::new("cnf")) {
        files.push(path.to_path_buf());
    }
}

/// Best-effort classification of a benchmark file from its name, mirroring
/// the SATLIB naming convention (`uf*` satisfiable, `uuf*` unsatisfiable)
/// the source harness relies on for its `problem_type` column.
pub fn infer_problem_type(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    if stem.contains("sudoku") {
        "sudoku".to_string()
    } else if stem.contains("uuf") || stem.contains("unsat") {
        "unsat-random".to_string()
    } else if stem.contains("uf") || stem.contains("sat") {
        "sat-random".to_string()
    } else {
        "unknown".to_string()
    }
}

/// Checks a `SAT` result against the original formula; non-`SAT` results
/// need no verification and are reported as verified.
pub fn verify_assignment(formula: &Formula, record: &SolverRecord) -> bool {
    match record.status {
        Status::Sat => formula.is_satisfied_by(&record.assignment),
        _ => true,
    }
}

/// Runs `f` on a worker thread, returning `None` if it doesn't finish within
/// `timeout`. There is no portable preemptive cancellation in safe Rust
/// (unlike the source's `signal.alarm`-based context manager), so a timed
/// out worker keeps running in the background; the harness process simply
/// stops waiting on it and records `TIMEOUT`.
fn run_with_timeout<F>(timeout: Duration, f: F) -> Option<Result<SolverRecord>>
where
    F: FnOnce() -> Result<SolverRecord> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(timeout).ok()
}

fn dispatch(solver: &str, path: &Path, params: HarnessParams) -> Result<SolverRecord> {
    match solver {
        "cdcl" => cdcl::solve(path),
        "dpll" => dpll::solve_baseline(path),
        "dpll_jw" => dpll::solve_jeroslow_wang(path),
        "walksat" => walksat::solve(path, params.max_flips, params.noise, params.restarts, params.seed),
        "probsat" => probsat::solve(path, params.max_flips, params.epsilon, params.restarts, params.seed),
        other => Err(crate::error::SolverError::Parse {
            path: path.to_path_buf(),
            line: 0,
            token: format!("unknown solver {other:?}"),
        }),
    }
}

/// Runs one `(solver, benchmark_file)` pair under `timeout`, producing a
/// complete CSV row. I/O or parse failures surface as a `status = "ERROR"`
/// row rather than aborting the whole run, so one bad file doesn't stop the
/// rest of the corpus.
pub fn run_one(solver: &str, path: &Path, timeout: Duration, params: HarnessParams) -> HarnessRow {
    let problem_type = infer_problem_type(path);
    let owned_path = path.to_path_buf();
    let solver_owned = solver.to_string();
    let start = Instant::now();
    let outcome = run_with_timeout(timeout, move || dispatch(&solver_owned, &owned_path, params));
    let wall_time = start.elapsed().as_secs_f64();

    match outcome {
        None => HarnessRow {
            solver: solver.to_string(),
            benchmark_file: path.to_string_lossy().to_string(),
            problem_type,
            num_vars: 0,
            num_clauses: 0,
            status: "TIMEOUT".to_string(),
            wall_time,
            decisions: None,
            unit_propagations: None,
            pure_eliminations: None,
            conflicts: None,
            learned_clauses: None,
            flips: None,
            restarts: None,
            verified: None,
        },
        Some(Err(_)) => HarnessRow {
            solver: solver.to_string(),
            benchmark_file: path.to_string_lossy().to_string(),
            problem_type,
            num_vars: 0,
            num_clauses: 0,
            status: "ERROR".to_string(),
            wall_time,
            decisions: None,
            unit_propagations: None,
            pure_eliminations: None,
            conflicts: None,
            learned_clauses: None,
            flips: None,
            restarts: None,
            verified: None,
        },
        Some(Ok(mut record)) => {
            let verified = match parse_dimacs(path) {
                Ok(formula) => {
                    let ok = verify_assignment(&formula, &record);
                    if record.status == Status::Sat && !ok {
                        record.status = Status::Error;
                    }
                    Some(ok)
                }
                Err(_) => None,
            };
            HarnessRow {
                solver: solver.to_string(),
                benchmark_file: path.to_string_lossy().to_string(),
                problem_type,
                num_vars: record.num_vars,
                num_clauses: record.num_clauses,
                status: status_label(record.status).to_string(),
                wall_time,
                decisions: record.decisions,
                unit_propagations: record.unit_propagations,
                pure_eliminations: record.pure_eliminations,
                conflicts: record.conflicts,
                learned_clauses: record.learned_clauses,
                flips: record.flips,
                restarts: record.restarts,
                verified,
            }
        }
    }
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Sat => "SAT",
        Status::Unsat => "UNSAT",
        Status::Unknown => "UNKNOWN",
        Status::Timeout => "TIMEOUT",
        Status::Error => "ERROR",
    }
}
