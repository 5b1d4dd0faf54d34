//! Baseline DPLL binary: first-undecided-literal branching, reported as JSON.
use satsuite::cli::{run_and_report, CommonArgs};
use satsuite::dpll;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "dpll", about = "Recursive DPLL SAT solver")]
struct Opt {
    #[structopt(flatten)]
    common: CommonArgs,
}

fn main() {
    satsuite::cli::init_logging();
    let opt = Opt::from_args();
    run_and_report(|| dpll::solve_baseline(&opt.common.cnf));
}
