//! probSAT binary: break-count-weighted stochastic local search, reported as JSON.
use satsuite::cli::{run_and_report, CommonArgs, LocalSearchArgs};
use satsuite::probsat;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "probsat", about = "Break-count-weighted stochastic local search SAT solver")]
struct Opt {
    #[structopt(flatten)]
    common: CommonArgs,
    #[structopt(flatten)]
    search: LocalSearchArgs,
}

fn main() {
    satsuite::cli::init_logging();
    let opt = Opt::from_args();
    run_and_report(|| {
        probsat::solve(
            &opt.common.cnf,
            opt.search.max_flips,
            opt.search.epsilon,
            opt.search.restarts,
            opt.search.seed,
        )
    });
}
