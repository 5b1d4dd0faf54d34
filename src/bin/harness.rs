//! Experiment harness binary: walks a benchmark corpus, dispatches each
//! solver under a timeout, verifies SAT results, and writes a CSV row per
//! `(solver, benchmark_file)` pair. Dataset download and plotting are
//! out-of-scope collaborators this binary does not implement.
use satsuite::harness::{collect_files, run_one, HarnessParams};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use structopt::StructOpt;

const ALL_SOLVERS: &[&str] = &["dpll", "dpll_jw", "cdcl", "walksat", "probsat"];

#[derive(Debug, StructOpt)]
#[structopt(name = "harness", about = "Runs every solver over a benchmark corpus and writes a CSV report")]
struct Opt {
    /// CNF files or directories to walk recursively for `.cnf` files
    #[structopt(long = "benchmarks", required = true, parse(from_os_str))]
    benchmarks: Vec<PathBuf>,

    /// CSV report path
    #[structopt(long = "output", parse(from_os_str), default_value = "results/results.csv")]
    output: PathBuf,

    /// Which solvers to run; defaults to all five
    #[structopt(long = "solvers")]
    solvers: Vec<String>,

    /// Per-call wall-clock timeout, in seconds
    #[structopt(long = "solver-timeout", default_value = "60")]
    solver_timeout: f64,

    #[structopt(long = "max-flips", default_value = "10000")]
    max_flips: u64,
    #[structopt(long = "noise", default_value = "0.5")]
    noise: f64,
    #[structopt(long = "epsilon", default_value = "0.9")]
    epsilon: f64,
    #[structopt(long = "restarts", default_value = "1")]
    restarts: u64,
    #[structopt(long = "seed")]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    satsuite::cli::init_logging();
    let opt = Opt::from_args();
    let solvers: Vec<String> = if opt.solvers.is_empty() {
        ALL_SOLVERS.iter().map(|s| s.to_string()).collect()
    } else {
        opt.solvers
    };
    let files = collect_files(&opt.benchmarks);
    if let Some(parent) = opt.output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("error: failed to create {}: {e}", parent.display());
                return ExitCode::FAILURE;
            }
        }
    }
    let mut writer = match csv::Writer::from_path(&opt.output) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("error: failed to open {}: {e}", opt.output.display());
            return ExitCode::FAILURE;
        }
    };

    let params = HarnessParams {
        max_flips: opt.max_flips,
        noise: opt.noise,
        epsilon: opt.epsilon,
        restarts: opt.restarts,
        seed: opt.seed,
    };
    let timeout = Duration::from_secs_f64(opt.solver_timeout.max(0.0));

    for path in &files {
        for solver in &solvers {
            let row = run_one(solver, path, timeout, params);
            if let Err(e) = writer.serialize(&row) {
                eprintln!("error: failed to write row: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    if let Err(e) = writer.flush() {
        eprintln!("error: failed to flush {}: {e}", opt.output.display());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
