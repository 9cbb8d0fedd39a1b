//! Percent sudoku as a SAT problem.
//!
//! Variable `(row, col, num)` (all 1-based) is true when cell `(row, col)`
//! holds `num`, and is numbered `(row - 1) * 81 + (col - 1) * 9 + num`, giving
//! 729 variables. Clauses are emitted in a fixed order:
//!
//! 1. every cell holds at least one digit;
//! 2. every cell holds at most one digit (one clause per digit pair);
//! 3. for every house (rows, columns, boxes, anti-diagonal, upper window,
//!    lower window) and every digit, one at-least-one clause over its nine
//!    cells followed by the pairwise at-most-one clauses;
//! 4. a unit clause for every given cell, row-major.
//!
//! An empty grid therefore produces 12 987 clauses, plus one per given.

use crate::sat::assignment::Assignment;
use crate::sat::clause_storage::{write_dimacs, ClauseStore};
use crate::sat::dpll::Dpll;
use crate::sat::error::AllocError;
use crate::sat::literal::Literal;
use crate::sat::pooled::PooledCnf;
use crate::sat::report::ResultFile;
use crate::sat::solver::{SolveReport, SolverOptions, Status};
use crate::sat::verify::{verify, Verdict};
use crate::sudoku::error::SudokuError;
use crate::sudoku::grid::Grid;
use crate::sudoku::houses::{House, SIZE};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Number of boolean variables in the encoding.
pub const NUM_VARIABLES: u32 = 729;

/// Clauses produced for a grid without givens.
pub const BASE_CLAUSES: usize = 12_987;

/// Time budget used for sudoku solving unless overridden, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// [`DEFAULT_TIMEOUT_MS`] as a duration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);

/// Comment line written above the header of an exported encoding.
pub const CNF_COMMENT: &str = "c Percent Sudoku SAT problem";

/// "Cell `(row, col)` holds `num`", all 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    /// Row, `1..=9`.
    pub row: usize,
    /// Column, `1..=9`.
    pub col: usize,
    /// Digit, `1..=9`.
    pub num: usize,
}

impl Variable {
    /// Builds the variable from 1-based coordinates.
    #[must_use]
    pub const fn new(row: usize, col: usize, num: usize) -> Self {
        Self { row, col, num }
    }

    /// Builds the variable for a 0-based cell.
    #[must_use]
    pub const fn at((row, col): (usize, usize), num: usize) -> Self {
        Self::new(row + 1, col + 1, num)
    }

    /// The positive literal of this variable.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub const fn encode(&self) -> Literal {
        ((self.row - 1) * SIZE * SIZE + (self.col - 1) * SIZE + self.num) as Literal
    }

    /// Inverse of [`Self::encode`] for ids in `1..=729`.
    #[must_use]
    pub const fn decode(id: u32) -> Option<Self> {
        if id == 0 || id > NUM_VARIABLES {
            return None;
        }
        let zero = (id - 1) as usize;
        Some(Self::new(
            zero / (SIZE * SIZE) + 1,
            zero / SIZE % SIZE + 1,
            zero % SIZE + 1,
        ))
    }
}

/// Accumulates clauses in a pooled store.
#[derive(Debug, Clone)]
pub struct Encoder {
    cnf: PooledCnf,
}

impl Encoder {
    /// # Errors
    ///
    /// If the initial buffers cannot be allocated.
    pub fn new() -> Result<Self, AllocError> {
        Ok(Self {
            cnf: PooledCnf::with_vars(NUM_VARIABLES)?,
        })
    }

    /// Appends one clause.
    ///
    /// # Errors
    ///
    /// If the pool or span table cannot grow.
    pub fn add_clause(&mut self, literals: &[Literal]) -> Result<(), AllocError> {
        self.cnf.push_clause(literals)
    }

    /// At-least-one over `literals`, then at-most-one as pairwise exclusions.
    fn exactly_one(&mut self, literals: &[Literal]) -> Result<(), AllocError> {
        self.add_clause(literals)?;
        for (a, b) in literals.iter().tuple_combinations() {
            self.add_clause(&[-a, -b])?;
        }
        Ok(())
    }

    /// Cell coverage for every cell, then cell uniqueness for every cell.
    ///
    /// # Errors
    ///
    /// If the store cannot grow.
    pub fn add_cell_constraints(&mut self) -> Result<(), AllocError> {
        let cells = || (1..=SIZE).cartesian_product(1..=SIZE);

        for (row, col) in cells() {
            let digits: SmallVec<[Literal; SIZE]> = (1..=SIZE)
                .map(|num| Variable::new(row, col, num).encode())
                .collect();
            self.add_clause(&digits)?;
        }

        for (row, col) in cells() {
            for (k1, k2) in (1..=SIZE).tuple_combinations() {
                self.add_clause(&[
                    -Variable::new(row, col, k1).encode(),
                    -Variable::new(row, col, k2).encode(),
                ])?;
            }
        }
        Ok(())
    }

    /// Exactly one of each digit across the nine cells of `house`.
    ///
    /// # Errors
    ///
    /// If the store cannot grow.
    pub fn add_house(&mut self, house: House) -> Result<(), AllocError> {
        let cells = house.cells();
        for num in 1..=SIZE {
            let literals: SmallVec<[Literal; SIZE]> = cells
                .iter()
                .map(|&cell| Variable::at(cell, num).encode())
                .collect();
            self.exactly_one(&literals)?;
        }
        Ok(())
    }

    /// One unit clause per filled cell, row-major.
    ///
    /// # Errors
    ///
    /// If the store cannot grow.
    pub fn add_givens(&mut self, grid: &Grid) -> Result<(), AllocError> {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = grid.get(row, col);
                if value != 0 {
                    self.add_clause(&[Variable::at((row, col), usize::from(value)).encode()])?;
                }
            }
        }
        Ok(())
    }

    /// The finished clause store.
    #[must_use]
    pub fn finish(self) -> PooledCnf {
        self.cnf
    }
}

/// Encodes `grid`, with every filled cell pinned to its value.
///
/// # Errors
///
/// If a buffer cannot grow; no partial store is returned.
pub fn encode(grid: &Grid) -> Result<PooledCnf, AllocError> {
    let mut encoder = Encoder::new()?;
    encoder.add_cell_constraints()?;
    for house in House::all() {
        encoder.add_house(house)?;
    }
    encoder.add_givens(grid)?;
    let cnf = encoder.finish();
    debug!(
        clauses = cnf.num_clauses(),
        literals = cnf.num_literals(),
        givens = grid.given_count(),
        "encoded puzzle"
    );
    Ok(cnf)
}

/// Reads the digits of the empty cells of `grid` out of `model`, without
/// touching the grid.
///
/// # Errors
///
/// [`SudokuError::Inconsistent`] if an empty cell has no true digit variable.
pub fn decode(grid: &Grid, model: &Assignment) -> Result<Vec<(usize, usize, u8)>, SudokuError> {
    grid.empty_cells()
        .map(|(row, col)| {
            (1..=SIZE)
                .find(|&num| model.literal_value(Variable::at((row, col), num).encode()) == Some(true))
                .and_then(|num| u8::try_from(num).ok())
                .map(|digit| (row, col, digit))
                .ok_or(SudokuError::Inconsistent { row, col })
        })
        .collect()
}

/// The encoding of a puzzle together with what the solver made of it.
///
/// Returned on success, and carried by [`SudokuError::attempt`] when the
/// search ends without a model.
#[derive(Debug, Clone)]
pub struct SudokuSolution {
    /// The encoded puzzle.
    pub cnf: PooledCnf,
    /// Outcome, timing and statistics of the search.
    pub report: SolveReport,
}

impl SudokuSolution {
    /// The model, when the search found one.
    #[must_use]
    pub fn model(&self) -> Option<&Assignment> {
        self.report.status.model()
    }

    /// The encoding in DIMACS form, with a comment line above the header.
    #[must_use]
    pub fn dimacs(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{CNF_COMMENT}");
        let _ = write_dimacs(&self.cnf, &mut out);
        out
    }

    /// Writes `<prefix>.cnf` and `<prefix>.res`, returning both paths.
    ///
    /// # Errors
    ///
    /// If either file cannot be written.
    pub fn export<P: AsRef<Path>>(&self, prefix: P) -> std::io::Result<(PathBuf, PathBuf)> {
        let prefix = prefix.as_ref().as_os_str();
        let mut cnf_path = prefix.to_owned();
        cnf_path.push(".cnf");
        let mut res_path = prefix.to_owned();
        res_path.push(".res");
        let (cnf_path, res_path) = (PathBuf::from(cnf_path), PathBuf::from(res_path));

        std::fs::write(&cnf_path, self.dimacs())?;
        ResultFile::from(&self.report).save(&res_path)?;
        Ok((cnf_path, res_path))
    }
}

/// Encodes, solves, verifies and decodes `grid`, filling its empty cells.
///
/// The grid is only written once a verified model has been decoded for every
/// empty cell; on any error it is left exactly as it was.
///
/// # Errors
///
/// Any [`SudokuError`] raised along the pipeline. UNSAT, TIMEOUT and ERROR
/// map to [`SudokuError::Unsatisfiable`], [`SudokuError::TimedOut`] and
/// [`SudokuError::Solver`], each carrying the attempt.
pub fn solve_grid(grid: &mut Grid, options: &SolverOptions) -> Result<SudokuSolution, SudokuError> {
    let cnf = encode(grid)?;
    let report = Dpll::with_options(&cnf, *options).solve();

    let model = match &report.status {
        Status::Sat(model) => model,
        Status::Unsat => {
            return Err(SudokuError::Unsatisfiable(Box::new(SudokuSolution { cnf, report })));
        }
        Status::Timeout => {
            return Err(SudokuError::TimedOut(Box::new(SudokuSolution { cnf, report })));
        }
        Status::Error(e) => {
            return Err(SudokuError::Solver {
                source: e.clone(),
                attempt: Box::new(SudokuSolution { cnf, report }),
            });
        }
    };

    if let Verdict::Violated { clause } = verify(&cnf, model)? {
        return Err(SudokuError::ModelViolates { clause });
    }

    let filled = decode(grid, model)?;
    debug!(
        filled = filled.len(),
        elapsed_ms = report.elapsed_ms(),
        decisions = report.stats.decisions,
        "puzzle solved"
    );
    for (row, col, digit) in filled {
        grid.fill(row, col, digit);
    }

    Ok(SudokuSolution { cnf, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::grid::tests::{solved_line, SOLVED};

    #[test]
    fn test_variable_numbering() {
        assert_eq!(Variable::new(1, 1, 1).encode(), 1);
        assert_eq!(Variable::new(1, 1, 9).encode(), 9);
        assert_eq!(Variable::new(1, 2, 1).encode(), 10);
        assert_eq!(Variable::new(2, 1, 1).encode(), 82);
        assert_eq!(Variable::new(9, 9, 9).encode(), 729);
        assert_eq!(Variable::at((0, 8), 3).encode(), 75);
    }

    #[test]
    fn test_decode_inverts_encode() {
        for id in 1..=NUM_VARIABLES {
            let var = Variable::decode(id).unwrap();
            assert_eq!(var.encode(), i32::try_from(id).unwrap());
        }
        assert_eq!(Variable::decode(0), None);
        assert_eq!(Variable::decode(730), None);
    }

    #[test]
    fn test_empty_grid_clause_count() {
        let cnf = encode(&Grid::empty()).unwrap();
        assert_eq!(cnf.num_vars(), NUM_VARIABLES);
        assert_eq!(cnf.num_clauses(), BASE_CLAUSES);
        assert_eq!(BASE_CLAUSES, 81 + 81 * 36 + 30 * 9 * 37);
    }

    #[test]
    fn test_one_unit_clause_per_given() {
        let grid = Grid::from_rows(SOLVED).unwrap();
        let cnf = encode(&grid).unwrap();
        assert_eq!(cnf.num_clauses(), BASE_CLAUSES + 81);
        assert_eq!(cnf.clause(BASE_CLAUSES), &[Variable::new(1, 1, 6).encode()]);
        assert_eq!(cnf.clause(BASE_CLAUSES + 80), &[Variable::new(9, 9, 5).encode()]);
    }

    #[test]
    fn test_clause_order() {
        let cnf = encode(&Grid::empty()).unwrap();
        // Cell coverage.
        assert_eq!(cnf.clause(0), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        // Cell uniqueness starts right after.
        assert_eq!(cnf.clause(81), &[-1, -2]);
        assert_eq!(cnf.clause(81 + 35), &[-8, -9]);
        // First row, digit 1.
        let rows = 81 + 81 * 36;
        assert_eq!(cnf.clause(rows), &[1, 10, 19, 28, 37, 46, 55, 64, 73]);
        assert_eq!(cnf.clause(rows + 1), &[-1, -10]);
        // Anti-diagonal, digit 1, starts at the top-right cell.
        let diagonal = rows + 27 * 9 * 37;
        assert_eq!(cnf.clause(diagonal)[0], Variable::at((0, 8), 1).encode());
        assert_eq!(cnf.clause(diagonal)[8], Variable::at((8, 0), 1).encode());
        // Upper window, digit 1.
        let upper = diagonal + 9 * 37;
        assert_eq!(cnf.clause(upper)[0], Variable::new(2, 2, 1).encode());
        // Lower window, digit 1.
        let lower = upper + 9 * 37;
        assert_eq!(cnf.clause(lower)[0], Variable::new(6, 6, 1).encode());
        assert_eq!(cnf.clause(lower)[8], Variable::new(8, 8, 1).encode());
    }

    #[test]
    fn test_given_cells_survive_solving() {
        let mut grid = Grid::from_rows(SOLVED).unwrap();
        let solution = solve_grid(&mut grid, &SolverOptions::default()).unwrap();
        assert_eq!(grid.cells(), SOLVED);
        assert!(solution.report.status.is_sat());
    }

    #[test]
    fn test_solves_puzzle_with_holes() {
        let mut line = solved_line().into_bytes();
        for pos in (0..81).step_by(2) {
            line[pos] = b'.';
        }
        let line = String::from_utf8(line).unwrap();
        let mut grid = Grid::from_line(&line).unwrap();
        let before = grid.clone();

        solve_grid(&mut grid, &SolverOptions::default().with_timeout(DEFAULT_TIMEOUT)).unwrap();

        assert_eq!(grid.check_rules(), Ok(()));
        for row in 0..SIZE {
            for col in 0..SIZE {
                if before.is_given(row, col) {
                    assert_eq!(grid.get(row, col), before.get(row, col));
                }
            }
        }
    }

    #[test]
    fn test_solves_empty_grid() {
        let mut grid = Grid::empty();
        solve_grid(&mut grid, &SolverOptions::default()).unwrap();
        assert_eq!(grid.check_rules(), Ok(()));
        assert_eq!(grid.given_count(), 0);
    }

    #[test]
    fn test_conflicting_givens_leave_grid_untouched() {
        let line = format!("11{}", ".".repeat(79));
        let mut grid = Grid::from_line(&line).unwrap();
        let before = grid.clone();
        let result = solve_grid(&mut grid, &SolverOptions::default());
        assert!(matches!(result, Err(SudokuError::Unsatisfiable(_))));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_failed_solve_keeps_encoding_and_report() {
        let line = format!("11{}", ".".repeat(79));
        let mut grid = Grid::from_line(&line).unwrap();
        let err = solve_grid(&mut grid, &SolverOptions::default()).unwrap_err();

        let attempt = err.attempt().unwrap();
        assert_eq!(attempt.cnf.num_clauses(), BASE_CLAUSES + 2);
        assert_eq!(attempt.report.status, Status::Unsat);
        assert!(attempt.model().is_none());

        let res = ResultFile::from(&attempt.report).render();
        assert!(res.starts_with("s 0\nt "), "{res}");
        assert_eq!(res.lines().count(), 2);
    }

    #[test]
    fn test_timeout_keeps_attempt() {
        let mut grid = Grid::empty();
        let options = SolverOptions {
            timeout: Some(Duration::from_nanos(1)),
        };
        match solve_grid(&mut grid, &options) {
            Err(SudokuError::TimedOut(attempt)) => {
                assert_eq!(attempt.report.status, Status::Timeout);
                assert!(ResultFile::from(&attempt.report).render().starts_with("s -1\n"));
            }
            Ok(_) => assert_eq!(grid.check_rules(), Ok(())),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_decode_reports_missing_digit() {
        let grid = Grid::empty();
        let model = Assignment::new(NUM_VARIABLES).unwrap();
        assert!(matches!(
            decode(&grid, &model),
            Err(SudokuError::Inconsistent { row: 0, col: 0 })
        ));
    }

    #[test]
    fn test_dimacs_export_has_comment_header() {
        let mut grid = Grid::from_rows(SOLVED).unwrap();
        let solution = solve_grid(&mut grid, &SolverOptions::default()).unwrap();
        let text = solution.dimacs();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CNF_COMMENT));
        assert_eq!(lines.next(), Some("p cnf 729 13068"));
    }
}
