//! Sudoku encoder binary: translates a 9x9 grid into DIMACS CNF and,
//! optionally, solves it with the CDCL engine and prints the decoded grid.
use satsuite::dimacs::write_dimacs;
use satsuite::sudoku::{decode, encode, parse_grid, Grid, SIZE};
use satsuite::types::Status;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "sudoku", about = "9x9 Sudoku-to-CNF encoder")]
struct Opt {
    /// A 9-line, 9-digit-per-line puzzle file (0 marks an empty cell)
    #[structopt(long = "input", parse(from_os_str))]
    input: PathBuf,

    /// Where to write the encoded DIMACS CNF
    #[structopt(long = "output", parse(from_os_str))]
    output: PathBuf,

    /// Solve the encoded formula with the CDCL engine and print the result
    #[structopt(long = "solve")]
    solve: bool,
}

fn print_grid(grid: &Grid) {
    for row in grid {
        let line: String = row.iter().map(|d| std::char::from_digit(*d as u32, 10).unwrap()).collect();
        println!("{line}");
    }
}

fn main() -> ExitCode {
    satsuite::cli::init_logging();
    let opt = Opt::from_args();
    let text = match fs::read_to_string(&opt.input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", opt.input.display());
            return ExitCode::FAILURE;
        }
    };
    let grid = match parse_grid(&text) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let formula = encode(&grid);
    debug_assert_eq!(formula.num_vars, SIZE * SIZE * SIZE);
    if let Err(e) = write_dimacs(&opt.output, &formula) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    if opt.solve {
        match satsuite::cdcl::solve(&opt.output) {
            Ok(record) if record.status == Status::Sat => print_grid(&decode(&record.assignment)),
            Ok(record) => println!("{:?}", record.status),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
