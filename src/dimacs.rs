//! Crate `dimacs` reads and writes the DIMACS CNF exchange format.
use crate::error::{Result, SolverError};
use crate::types::Formula;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Parses a DIMACS CNF file at `path`.
///
/// Blank lines and lines starting with `c` are ignored. A `p` line sets
/// `num_vars`/`num_clauses` from its third and fourth tokens. Any other
/// non-empty line is split on whitespace, parsed as integers, and its
/// trailing `0` terminator(s) dropped; a clause may span multiple lines or
/// multiple clauses may share a line, since only the zeros act as
/// terminators here (a single flat literal stream per logical clause is
/// assumed, matching the source parser). If the header is absent or its
/// clause count is zero, `num_clauses` is corrected to the number of
/// clauses actually read; likewise `num_vars` is raised to the highest
/// variable id actually referenced if the header under-reports it, so the
/// `1 <= |l| <= num_vars` invariant always holds for the returned formula.
pub fn parse_dimacs(path: &Path) -> Result<Formula> {
    let text = fs::read_to_string(path).map_err(|source| SolverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_from_str(&text, path)
}

/// Parses DIMACS CNF text already in memory, so tests and the Sudoku
/// pipeline can round-trip without touching the filesystem.
pub fn parse_from_string(data: &str) -> Result<Formula> {
    parse_from_str(data, Path::new("<memory>"))
}

fn parse_from_str(data: &str, path: &Path) -> Result<Formula> {
    let mut num_vars = 0usize;
    let mut num_clauses = 0usize;
    let mut clauses = Vec::new();

    for (lineno, raw) in data.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('p') {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 4 {
                num_vars = parse_token(parts[2], path, lineno + 1)?;
                num_clauses = parse_token(parts[3], path, lineno + 1)?;
            }
            continue;
        }
        let mut literals = Vec::new();
        for token in line.split_whitespace() {
            let lit: i64 = token.parse().map_err(|_| SolverError::Parse {
                path: path.to_path_buf(),
                line: lineno + 1,
                token: token.to_string(),
            })?;
            if lit != 0 {
                literals.push(lit as i32);
            }
        }
        if !literals.is_empty() {
            clauses.push(literals);
        }
    }

    if num_clauses == 0 {
        num_clauses = clauses.len();
    }
    let max_var = clauses
        .iter()
        .flat_map(|c| c.iter())
        .map(|&l| l.unsigned_abs() as usize)
        .max()
        .unwrap_or(0);
    if max_var > num_vars {
        num_vars = max_var;
    }
    Ok(Formula {
        num_vars,
        num_clauses,
        clauses,
    })
}

fn parse_token(token: &str, path: &Path, line: usize) -> Result<usize> {
    token.parse().map_err(|_| SolverError::Parse {
        path: path.to_path_buf(),
        line,
        token: token.to_string(),
    })
}

/// Writes `formula` to `path` as DIMACS: a `p cnf` header followed by one
/// clause per line, each terminated by `" 0\n"`.
pub fn write_dimacs(path: &Path, formula: &Formula) -> Result<()> {
    let mut out = String::new();
    out.push_str(&format!(
        "p cnf {} {}\n",
        formula.num_vars,
        formula.clauses.len()
    ));
    for clause in &formula.clauses {
        for lit in clause {
            out.push_str(&lit.to_string());
            out.push(' ');
        }
        out.push_str("0\n");
    }
    let mut file = fs::File::create(path).map_err(|source| SolverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(out.as_bytes())
        .map_err(|source| SolverError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_clauses() {
        let f = parse_from_string("c a comment\np cnf 2 2\n1 -2 0\n-1 2 0\n").unwrap();
        assert_eq!(f.num_vars, 2);
        assert_eq!(f.num_clauses, 2);
        assert_eq!(f.clauses, vec![vec![1, -2], vec![-1, 2]]);
    }

    #[test]
    fn missing_header_count_is_corrected() {
        let f = parse_from_string("1 0\n-1 2 0\n").unwrap();
        assert_eq!(f.num_clauses, 2);
    }

    #[test]
    fn zero_header_count_is_corrected() {
        let f = parse_from_string("p cnf 2 0\n1 0\n-1 2 0\n").unwrap();
        assert_eq!(f.num_clauses, 2);
    }

    #[test]
    fn malformed_token_is_a_parse_error() {
        let err = parse_from_string("p cnf 1 1\nfoo 0\n").unwrap_err();
        assert!(matches!(err, SolverError::Parse { .. }));
    }

    #[test]
    fn empty_formula_has_no_clauses() {
        let f = parse_from_string("p cnf 0 0\n").unwrap();
        assert_eq!(f.num_vars, 0);
        assert!(f.clauses.is_empty());
    }

    #[test]
    fn missing_header_var_count_is_corrected() {
        let f = parse_from_string("p cnf 1 2\n1 0\n-1 2 0\n").unwrap();
        assert_eq!(f.num_vars, 2);
    }

    #[test]
    fn round_trip_preserves_clause_set() {
        let f = parse_from_string("p cnf 3 2\n1 -2 0\n2 3 -1 0\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.cnf");
        write_dimacs(&path, &f).unwrap();
        let round_tripped = parse_dimacs(&path).unwrap();
        assert_eq!(round_tripped.clauses, f.clauses);
        assert_eq!(round_tripped.num_vars, f.num_vars);
    }
}
