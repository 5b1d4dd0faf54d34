//! CDCL solver binary: one watched-literal CDCL call, reported as JSON.
use satsuite::cdcl;
use satsuite::cli::{run_and_report, CommonArgs};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "cdcl", about = "Conflict-driven clause-learning SAT solver")]
struct Opt {
    #[structopt(flatten)]
    common: CommonArgs,
}

fn main() {
    satsuite::cli::init_logging();
    let opt = Opt::from_args();
    run_and_report(|| cdcl::solve(&opt.common.cnf));
}
