//! Jeroslow-Wang DPLL binary: weighted-literal branching, reported as JSON.
use satsuite::cli::{run_and_report, CommonArgs};
use satsuite::dpll;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "dpll-jw", about = "DPLL SAT solver with Jeroslow-Wang branching")]
struct Opt {
    #[structopt(flatten)]
    common: CommonArgs,
}

fn main() {
    satsuite::cli::init_logging();
    let opt = Opt::from_args();
    run_and_report(|| dpll::solve_jeroslow_wang(&opt.common.cnf));
}
