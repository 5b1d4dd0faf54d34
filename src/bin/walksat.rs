//! WalkSAT binary: noise-biased stochastic local search, reported as JSON.
use satsuite::cli::{run_and_report, CommonArgs, LocalSearchArgs};
use satsuite::walksat;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "walksat", about = "Noise-biased stochastic local search SAT solver")]
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
        walksat::solve(
            &opt.common.cnf,
            opt.search.max_flips,
            opt.search.noise,
            opt.search.restarts,
            opt.search.seed,
        )
    });
}
