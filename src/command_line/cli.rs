#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand, ValueEnum};
use percent_sat::sat::clause_storage::ClauseStore;
use percent_sat::sat::dimacs::{parse_file, parse_file_pooled};
use percent_sat::sat::dpll::Dpll;
use percent_sat::sat::report::{result_path, ResultFile};
use percent_sat::sat::solver::{SolveReport, SolverOptions, Status};
use percent_sat::sat::verify::{verify, Verdict};
use percent_sat::sudoku::grid::Grid;
use percent_sat::sudoku::solver::{solve_grid, DEFAULT_TIMEOUT_MS};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{debug, warn};

/// Defines the command-line interface for the percent-sat application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "percent-sat",
    version,
    about = "A DPLL SAT solver and percent sudoku solver"
)]
pub(crate) struct Cli {
    /// Specifies the subcommand to execute (`sat`, `dir`, `sudoku`, `completions`).
    #[clap(subcommand)]
    pub command: Commands,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true, default_value_t = false)]
    pub debug: bool,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format and write `<file>.res` next to it.
    Sat {
        /// Path to the DIMACS .cnf file.
        path: PathBuf,

        /// Print the parsed formula back in DIMACS form.
        #[arg(long, default_value_t = false)]
        print: bool,

        /// Print the model (terminated by `0`) when the formula is satisfiable.
        #[arg(long, default_value_t = false)]
        model: bool,

        /// Re-check the model against the formula.
        #[arg(long, default_value_t = false)]
        check: bool,

        /// Which clause layout the solver runs on.
        #[arg(long, value_enum, default_value_t = Layout::Direct)]
        layout: Layout,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.cnf` file below a directory.
    Dir {
        path: PathBuf,

        /// Which clause layout the solver runs on.
        #[arg(long, value_enum, default_value_t = Layout::Direct)]
        layout: Layout,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve percent sudoku puzzles from a puzzle file (one 81-character
    /// puzzle per line, `.` or `0` for empty cells, `//` comments).
    Sudoku {
        path: PathBuf,

        /// Zero-based index of the puzzle to solve.
        #[arg(short, long, default_value_t = 0)]
        index: usize,

        /// Solve every puzzle in the file.
        #[arg(short, long, default_value_t = false, conflicts_with = "index")]
        all: bool,

        /// Prefix of the exported `<prefix>.cnf` and `<prefix>.res` files.
        /// With `--all`, the puzzle index is appended to it.
        #[arg(short, long, default_value = "sudoku")]
        output: String,

        /// Time budget in milliseconds; 0 disables it.
        #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout: u64,

        /// Print performance statistics.
        #[arg(short, long, default_value_t = false)]
        stats: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by the CNF-solving subcommands.
#[derive(Args, Debug, Default, Clone, Copy)]
pub(crate) struct CommonOptions {
    /// Time budget in milliseconds; 0 disables it.
    #[arg(short, long, default_value_t = 0)]
    pub(crate) timeout: u64,

    /// Print performance and problem statistics after solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,
}

impl CommonOptions {
    pub(crate) fn solver_options(self) -> SolverOptions {
        SolverOptions::default().with_timeout_ms(self.timeout)
    }
}

/// Clause layout selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum Layout {
    /// One heap array per clause.
    #[default]
    Direct,
    /// All literals in one contiguous pool.
    Pooled,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Pooled => write!(f, "pooled"),
        }
    }
}

/// What to do with a solved CNF file besides writing the result file.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct SatOutput {
    pub print: bool,
    pub model: bool,
    pub check: bool,
    pub stats: bool,
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Solves one CNF file.
///
/// Both parsers are run and timed so their speed can be compared; the solver
/// then runs on the store selected by `layout`.
///
/// # Errors
///
/// If the file cannot be parsed or the result file cannot be written.
pub(crate) fn solve_file(
    path: &Path,
    layout: Layout,
    options: SolverOptions,
    output: SatOutput,
) -> Result<Status, String> {
    let time = Instant::now();
    let cnf = parse_file(path).map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    if output.print {
        print!("{cnf}");
    }

    let time = Instant::now();
    let pooled = parse_file_pooled(path);
    let parse_opt_time = time.elapsed();

    let pooled = match pooled {
        Ok(pooled) => Some(pooled),
        Err(e) => {
            warn!("pooled parser failed on {}: {e}", path.display());
            None
        }
    };

    let report = match (layout, &pooled) {
        (Layout::Pooled, Some(pooled)) => run(pooled, options),
        (Layout::Pooled, None) => {
            return Err(format!("Pooled parser failed on {}", path.display()));
        }
        (Layout::Direct, _) => run(&cnf, options),
    };

    let res_path = result_path(path);
    ResultFile::from(&report)
        .save(&res_path)
        .map_err(|e| format!("Failed to write result file {}: {e}", res_path.display()))?;

    match &report.status {
        Status::Error(e) => println!("ERROR -> {} ({e})", res_path.display()),
        status => println!(
            "{status} ({:.0} ms) -> {}",
            report.elapsed_ms(),
            res_path.display()
        ),
    }

    if let Some(model) = report.status.model() {
        if output.model {
            println!("{model} 0");
        }
        if output.check {
            let verdict = match verify(&cnf, model) {
                Ok(Verdict::Satisfied) => "OK",
                Ok(Verdict::Violated { .. }) => "FAIL",
                Err(_) => "ERROR",
            };
            println!("check: {verdict}");
        }
    }

    let parse_ms = millis(parse_time);
    if pooled.is_some() {
        let parse_opt_ms = millis(parse_opt_time);
        print!("parse_ms={parse_ms:.0} parse_opt_ms={parse_opt_ms:.0}");
        if parse_ms > 0.0 {
            let rate = (parse_ms - parse_opt_ms) / parse_ms * 100.0;
            println!(" optimize={rate:.2}%");
        } else {
            println!();
        }
    } else {
        println!("parse_ms={parse_ms:.0}");
    }

    if output.stats {
        print_stats(parse_time, &cnf, &report);
    }

    Ok(report.status)
}

fn run<S: ClauseStore>(store: &S, options: SolverOptions) -> SolveReport {
    Dpll::with_options(store, options).solve()
}

/// Solves every `.cnf` file below `path`.
///
/// Files that fail to parse are reported and skipped.
///
/// # Errors
///
/// If `path` is not a directory.
pub(crate) fn solve_dir(
    path: &Path,
    layout: Layout,
    options: SolverOptions,
    output: SatOutput,
) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    let mut counts = [0_usize; 4];
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() || file_path.extension().is_none_or(|ext| ext != "cnf") {
            debug!("skipping {}", file_path.display());
            continue;
        }

        println!("Solving: {}", file_path.display());
        match solve_file(file_path, layout, options, output) {
            Ok(Status::Sat(_)) => counts[0] += 1,
            Ok(Status::Unsat) => counts[1] += 1,
            Ok(Status::Timeout) => counts[2] += 1,
            Ok(Status::Error(_)) => counts[3] += 1,
            Err(e) => {
                eprintln!("{e}");
                counts[3] += 1;
            }
        }
    }

    println!(
        "\nSAT: {}  UNSAT: {}  TIMEOUT: {}  ERROR: {}",
        counts[0], counts[1], counts[2], counts[3]
    );
    Ok(())
}

/// Solves one or all puzzles of a puzzle file, exporting the encoding and
/// the result file of each solve.
///
/// # Errors
///
/// If the file holds no puzzle, the index is out of range, or a solve fails.
pub(crate) fn solve_sudoku(
    path: &Path,
    index: Option<usize>,
    prefix: &str,
    options: SolverOptions,
    show_stats: bool,
) -> Result<(), String> {
    let puzzles = Grid::load_puzzles(path)
        .map_err(|e| format!("Error loading puzzles from {}: {e}", path.display()))?;
    println!("Loaded {} puzzle(s) from {}", puzzles.len(), path.display());

    let selected: Vec<(usize, Grid)> = match index {
        Some(i) => {
            let grid = puzzles
                .get(i)
                .cloned()
                .ok_or_else(|| format!("Puzzle index {i} out of range (0..{})", puzzles.len()))?;
            vec![(i, grid)]
        }
        None => puzzles.into_iter().enumerate().collect(),
    };
    let numbered = selected.len() > 1;

    let mut failures = 0_usize;
    for (i, mut grid) in selected {
        println!("\nPuzzle {i} ({} givens):\n{grid}", grid.given_count());

        let output = if numbered {
            format!("{prefix}_{i}")
        } else {
            prefix.to_owned()
        };

        match solve_grid(&mut grid, &options) {
            Ok(solution) => {
                let (cnf_path, res_path) = solution
                    .export(&output)
                    .map_err(|e| format!("Failed to export {output}: {e}"))?;

                println!(
                    "SAT ({:.0} ms) -> {}, {}",
                    solution.report.elapsed_ms(),
                    cnf_path.display(),
                    res_path.display()
                );
                println!("Solution:\n{grid}");

                match grid.check_rules() {
                    Ok(()) => println!("check: OK"),
                    Err(house) => println!("check: FAIL ({house})"),
                }

                if show_stats {
                    print_stats(Duration::ZERO, &solution.cnf, &solution.report);
                }
            }
            Err(e) => {
                println!("No solution: {e}");
                if let Some(attempt) = e.attempt() {
                    let (cnf_path, res_path) = attempt
                        .export(&output)
                        .map_err(|e| format!("Failed to export {output}: {e}"))?;
                    println!(
                        "{} ({:.0} ms) -> {}, {}",
                        attempt.report.status,
                        attempt.report.elapsed_ms(),
                        cnf_path.display(),
                        res_path.display()
                    );
                    if show_stats {
                        print_stats(Duration::ZERO, &attempt.cnf, &attempt.report);
                    }
                }
                failures += 1;
            }
        }
    }

    if failures > 0 && !numbered {
        return Err("Puzzle could not be solved".to_owned());
    }
    Ok(())
}

/// Allocated and resident memory in MiB, if jemalloc can report them.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats<S: ClauseStore>(parse_time: Duration, store: &S, report: &SolveReport) {
    let elapsed_secs = report.elapsed.as_secs_f64();
    let s = &report.stats;

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", store.num_vars());
    stat_line("Clauses", store.num_clauses());
    stat_line("Literals", store.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line("Nodes", s.nodes);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    if let Some((allocated, resident)) = memory_usage() {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    match report.status {
        Status::Sat(_) => println!("\nSATISFIABLE"),
        Status::Unsat => println!("\nUNSATISFIABLE"),
        Status::Timeout => println!("\nINDETERMINATE (timeout)"),
        Status::Error(_) => println!("\nINDETERMINATE (error)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sat_command() {
        let cli = Cli::try_parse_from([
            "percent-sat",
            "sat",
            "input.cnf",
            "--model",
            "--check",
            "--timeout",
            "500",
            "--layout",
            "pooled",
        ])
        .unwrap();
        match cli.command {
            Commands::Sat {
                path,
                model,
                check,
                print,
                layout,
                common,
            } => {
                assert_eq!(path, PathBuf::from("input.cnf"));
                assert!(model && check && !print);
                assert_eq!(layout, Layout::Pooled);
                assert_eq!(
                    common.solver_options().timeout,
                    Some(Duration::from_millis(500))
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_sudoku_defaults() {
        let cli = Cli::try_parse_from(["percent-sat", "sudoku", "puzzles.txt"]).unwrap();
        match cli.command {
            Commands::Sudoku {
                index,
                all,
                output,
                timeout,
                ..
            } => {
                assert_eq!(index, 0);
                assert!(!all);
                assert_eq!(output, "sudoku");
                assert_eq!(timeout, 30_000);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_zero_timeout_disables_budget() {
        let common = CommonOptions::default();
        assert_eq!(common.solver_options().timeout, None);
    }
}
