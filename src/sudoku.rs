//! Crate `sudoku` translates a 9×9 grid into CNF under a fixed variable
//! indexing, and decodes a satisfying assignment back into a grid.
use crate::error::{Result, SolverError};
use crate::types::{Assignment, Clause, Formula, Lit, VarId};

/// Grid side length.
pub const SIZE: usize = 9;
/// Box side length.
pub const BOX: usize = 3;
/// Total variables: one per (row, col, value) triple.
pub const NUM_VARS: usize = SIZE * SIZE * SIZE;

/// A 9×9 grid of digits; `0` denotes an empty cell.
pub type Grid = [[u8; SIZE]; SIZE];

/// Variable id for "cell (r, c) holds value v". Already 1-based: the
/// minimum value is `var_index(0, 0, 1) == 1`, so no extra offset is needed.
pub fn var_index(r: usize, c: usize, v: usize) -> VarId {
    r * SIZE * SIZE + c * SIZE + v
}

fn lit(r: usize, c: usize, v: usize) -> Lit {
    var_index(r, c, v) as Lit
}

/// Parses a puzzle from nine lines of nine digits each (no separators).
pub fn parse_grid(text: &str) -> Result<Grid> {
    let mut grid = [[0u8; SIZE]; SIZE];
    let rows: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if rows.len() != SIZE {
        return Err(SolverError::InvalidSudokuGrid {
            reason: format!("expected {SIZE} rows, found {}", rows.len()),
        });
    }
    for (r, row) in rows.iter().enumerate() {
        if row.len() != SIZE {
            return Err(SolverError::InvalidSudokuGrid {
                reason: format!("row {r} has length {}, expected {SIZE}", row.len()),
            });
        }
        for (c, ch) in row.chars().enumerate() {
            let digit = ch.to_digit(10).ok_or_else(|| SolverError::InvalidSudokuGrid {
                reason: format!("row {r} col {c} is not a digit: {ch:?}"),
            })?;
            if digit > 9 {
                return Err(SolverError::InvalidSudokuGrid {
                    reason: format!("row {r} col {c} digit {digit} out of range"),
                });
            }
            grid[r][c] = digit as u8;
        }
    }
    Ok(grid)
}

fn cell_clauses() -> Vec<Clause> {
    let mut clauses = Vec::new();
    for r in 0..SIZE {
        for c in 0..SIZE {
            clauses.push((1..=SIZE).map(|v| lit(r, c, v)).collect());
            for v1 in 1..=SIZE {
                for v2 in (v1 + 1)..=SIZE {
                    clauses.push(vec![-lit(r, c, v1), -lit(r, c, v2)]);
                }
            }
        }
    }
    clauses
}

fn row_clauses() -> Vec<Clause> {
    let mut clauses = Vec::new();
    for r in 0..SIZE {
        for v in 1..=SIZE {
            clauses.push((0..SIZE).map(|c| lit(r, c, v)).collect());
            for c1 in 0..SIZE {
                for c2 in (c1 + 1)..SIZE {
                    clauses.push(vec![-lit(r, c1, v), -lit(r, c2, v)]);
                }
            }
        }
    }
    clauses
}

fn column_clauses() -> Vec<Clause> {
    let mut clauses = Vec::new();
    for c in 0..SIZE {
        for v in 1..=SIZE {
            clauses.push((0..SIZE).map(|r| lit(r, c, v)).collect());
            for r1 in 0..SIZE {
                for r2 in (r1 + 1)..SIZE {
                    clauses.push(vec![-lit(r1, c, v), -lit(r2, c, v)]);
                }
            }
        }
    }
    clauses
}

fn box_clauses() -> Vec<Clause> {
    let mut clauses = Vec::new();
    for br in (0..SIZE).step_by(BOX) {
        for bc in (0..SIZE).step_by(BOX) {
            let cells: Vec<(usize, usize)> = (0..BOX)
                .flat_map(|dr| (0..BOX).map(move |dc| (dr, dc)))
                .map(|(dr, dc)| (br + dr, bc + dc))
                .collect();
            for v in 1..=SIZE {
                clauses.push(cells.iter().map(|&(r, c)| lit(r, c, v)).collect());
                for i in 0..cells.len() {
                    for j in (i + 1)..cells.len() {
                        let (r1, c1) = cells[i];
                        let (r2, c2) = cells[j];
                        clauses.push(vec![-lit(r1, c1, v), -lit(r2, c2, v)]);
                    }
                }
            }
        }
    }
    clauses
}

fn clue_clauses(grid: &Grid) -> Vec<Clause> {
    let mut clauses = Vec::new();
    for (r, row) in grid.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            if value != 0 {
                clauses.push(vec![lit(r, c, value as usize)]);
            }
        }
    }
    clauses
}

/// Encodes a 9×9 grid into CNF. Total variables is always 729; the clause
/// count is deterministic given the grid (clue clauses vary with the number
/// of filled cells).
pub fn encode(grid: &Grid) -> Formula {
    let mut clauses = Vec::new();
    clauses.extend(cell_clauses());
    clauses.extend(row_clauses());
    clauses.extend(column_clauses());
    clauses.extend(box_clauses());
    clauses.extend(clue_clauses(grid));
    let num_clauses = clauses.len();
    Formula {
        num_vars: NUM_VARS,
        num_clauses,
        clauses,
    }
}

/// Reconstructs a 9×9 grid from a satisfying assignment, inverting
/// `var_index`. A cell with no true variable (should not occur for a
/// genuine model) is left as `0`.
pub fn decode(assignment: &Assignment) -> Grid {
    let mut grid = [[0u8; SIZE]; SIZE];
    for r in 0..SIZE {
        for c in 0..SIZE {
            for v in 1..=SIZE {
                if assignment.get(&var_index(r, c, v)).copied() == Some(true) {
                    grid[r][c] = v as u8;
                    break;
                }
            }
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_grid() -> Grid {
        [[0u8; SIZE]; SIZE]
    }

    #[test]
    fn total_variable_count_is_729() {
        let formula = encode(&empty_grid());
        assert_eq!(formula.num_vars, NUM_VARS);
        assert_eq!(NUM_VARS, 729);
    }

    #[test]
    fn clue_unit_clause_is_present() {
        let mut grid = empty_grid();
        grid[0][0] = 5;
        let formula = encode(&grid);
        assert!(formula
            .clauses
            .iter()
            .any(|c| c.as_slice() == [lit(0, 0, 5)]));
    }

    #[test]
    fn decode_inverts_var_index() {
        let mut a = Assignment::new();
        a.insert(var_index(3, 4, 7), true);
        let grid = decode(&a);
        assert_eq!(grid[3][4], 7);
    }

    #[test]
    fn parse_grid_rejects_wrong_row_count() {
        assert!(parse_grid("000000000\n").is_err());
    }

    #[test]
    fn parse_grid_round_trips_digits() {
        let text = "530070000\n\
                     600195000\n\
                     098000060\n\
                     800060003\n\
                     400803001\n\
                     700020006\n\
                     060000280\n\
                     000419005\n\
                     000080079\n";
        let grid = parse_grid(text).unwrap();
        assert_eq!(grid[0][0], 5);
        assert_eq!(grid[0][2], 0);
        assert_eq!(grid[8][8], 9);
    }
}
