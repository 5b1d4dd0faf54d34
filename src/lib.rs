/*!
# A SAT solver suite for Propositional Logic in Rust

This crate collects five CNF-SAT search engines behind a common DIMACS
parser and result-record contract:

- `cdcl` — conflict-driven clause learning with watched literals, 1-UIP
  conflict analysis, VSIDS branching, and geometric restarts.
- `dpll` — recursive DPLL, in a plain and a Jeroslow–Wang-weighted variant.
- `walksat`, `probsat` — stochastic local search.
- `sudoku` — an encoder/decoder between 9x9 grids and CNF, sharing the rest
  of the suite's DIMACS machinery.

Each engine exposes one entry point taking a CNF file path and returning a
[`types::SolverRecord`]; the per-binary CLI wrappers under `src/bin/` add
timing and JSON output on top.
*/
pub mod cdcl;
pub mod cli;
pub mod dimacs;
pub mod dpll;
pub mod error;
pub mod harness;
pub mod probsat;
pub mod sudoku;
pub mod types;
pub mod walksat;
