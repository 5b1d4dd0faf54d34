//! Shared CLI fragments, factored the way splr's own `config.rs` builds one
//! `StructOpt` struct per binary: each solver binary embeds [`CommonArgs`] via
//! `#[structopt(flatten)]` instead of repeating the `--cnf` flag.
use std::path::PathBuf;
use structopt::StructOpt;

/// Input shared by every solver binary.
#[derive(Clone, Debug, StructOpt)]
pub struct CommonArgs {
    /// A DIMACS format CNF file
    #[structopt(long = "cnf", parse(from_os_str))]
    pub cnf: PathBuf,
}

/// Hyperparameters shared by the two local-search binaries (`walksat`,
/// `probsat`); each reads only the fields relevant to it.
#[derive(Clone, Debug, StructOpt)]
pub struct LocalSearchArgs {
    /// Flip budget per attempt
    #[structopt(long = "max-flips", default_value = "10000")]
    pub max_flips: u64,

    /// WalkSAT noise probability, in [0, 1]
    #[structopt(long = "noise", default_value = "0.5")]
    pub noise: f64,

    /// probSAT break-count base
    #[structopt(long = "epsilon", default_value = "0.9")]
    pub epsilon: f64,

    /// Number of attempts before giving up
    #[structopt(long = "restarts", default_value = "1")]
    pub restarts: u64,

    /// PRNG seed; omit for a nondeterministic run
    #[structopt(long = "seed")]
    pub seed: Option<u64>,
}

/// Installs an `env_logger` subscriber when the `logging` feature is on;
/// a no-op otherwise, so `log::trace!`/`log::debug!` calls inside the
/// search loops stay silent by default instead of panicking on first use.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    env_logger::init();
}

/// Wraps a solver's `Result<SolverRecord>` call, timing it and printing the
/// record as one JSON object to stdout with `wall_time` filled in. Exits
/// non-zero only when the solver itself returned an error (I/O or parse
/// failure, per SPEC_FULL §6.4) — UNSAT/UNKNOWN are normal completions.
pub fn run_and_report<F>(f: F)
where
    F: FnOnce() -> crate::error::Result<crate::types::SolverRecord>,
{
    let start = std::time::Instant::now();
    match f() {
        Ok(mut record) => {
            record.wall_time = Some(start.elapsed().as_secs_f64());
            println!("{}", serde_json::to_string(&record).expect("serializable record"));
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
