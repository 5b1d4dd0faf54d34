//! End-to-end tests driving the built binaries, not just the library calls.
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn write_cnf(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
fn cdcl_binary_reports_sat_as_json() {
    let f = write_cnf("p cnf 1 1\n1 0\n");
    Command::cargo_bin("cdcl")
        .unwrap()
        .args(["--cnf", f.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"SAT\""))
        .stdout(predicate::str::contains("\"wall_time\""));
}

#[test]
fn dpll_binary_reports_unsat() {
    let f = write_cnf("p cnf 1 2\n1 0\n-1 0\n");
    Command::cargo_bin("dpll")
        .unwrap()
        .args(["--cnf", f.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"UNSAT\""));
}

#[test]
fn walksat_binary_is_reproducible_given_a_seed() {
    let f1 = write_cnf("p cnf 5 3\n1 2 3 0\n-1 4 0\n-2 -4 5 0\n");
    let f2 = write_cnf("p cnf 5 3\n1 2 3 0\n-1 4 0\n-2 -4 5 0\n");
    let out1 = Command::cargo_bin("walksat")
        .unwrap()
        .args(["--cnf", f1.path().to_str().unwrap(), "--seed", "7", "--max-flips", "500"])
        .output()
        .unwrap();
    let out2 = Command::cargo_bin("walksat")
        .unwrap()
        .args(["--cnf", f2.path().to_str().unwrap(), "--seed", "7", "--max-flips", "500"])
        .output()
        .unwrap();
    assert_eq!(out1.stdout, out2.stdout);
}

#[test]
fn solver_binary_fails_on_malformed_input() {
    let f = write_cnf("p cnf 1 1\nfoo 0\n");
    Command::cargo_bin("cdcl")
        .unwrap()
        .args(["--cnf", f.path().to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn sudoku_binary_encodes_a_grid_to_729_variables() {
    let mut grid_file = tempfile::NamedTempFile::new().unwrap();
    let grid = "530070000\n\
                600195000\n\
                098000060\n\
                800060003\n\
                400803001\n\
                700020006\n\
                060000280\n\
                000419005\n\
                000080079\n";
    grid_file.write_all(grid.as_bytes()).unwrap();
    let out_path = tempfile::NamedTempFile::new().unwrap().path().to_path_buf();

    Command::cargo_bin("sudoku")
        .unwrap()
        .args([
            "--input",
            grid_file.path().to_str().unwrap(),
            "--output",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let encoded = std::fs::read_to_string(&out_path).unwrap();
    assert!(encoded.starts_with("p cnf 729 "));
}
