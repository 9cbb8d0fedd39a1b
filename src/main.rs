//! # percent-sat
//!
//! `percent-sat` is a command-line DPLL SAT solver for DIMACS CNF files, with
//! a percent sudoku front end that encodes puzzles as CNF and solves them with
//! the same engine.
//!
//! ## Usage
//!
//! ```sh
//! percent-sat [--debug] <SUBCOMMAND>
//! ```
//!
//! 1.  **`sat`**: Solve one DIMACS file and write `<file>.res`.
//!     ```sh
//!     percent-sat sat problem.cnf [--print] [--model] [--check] [--timeout MS] [--layout direct|pooled] [--stats]
//!     ```
//!
//! 2.  **`dir`**: Solve every `.cnf` file below a directory.
//!     ```sh
//!     percent-sat dir benchmarks/ --timeout 10000
//!     ```
//!
//! 3.  **`sudoku`**: Solve puzzles from a puzzle file and export
//!     `<prefix>.cnf` and `<prefix>.res`.
//!     ```sh
//!     percent-sat sudoku puzzles.txt --index 3 --output out/puzzle3
//!     percent-sat sudoku puzzles.txt --all
//!     ```
//!
//! 4.  **`completions`**: Print a shell completion script.
//!
//! Logging goes through `tracing`; set `RUST_LOG` (e.g. `RUST_LOG=trace`) to
//! see parser, encoder and search events.

mod command_line;

use clap::{CommandFactory, Parser};
use command_line::cli::{solve_dir, solve_file, solve_sudoku, Cli, Commands, SatOutput};
use percent_sat::sat::solver::SolverOptions;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Global allocator using `tikv-jemallocator` for potentially better performance
/// and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Sat {
            path,
            print,
            model,
            check,
            layout,
            common,
        } => {
            let output = SatOutput {
                print,
                model,
                check,
                stats: common.stats,
            };
            solve_file(&path, layout, common.solver_options(), output)
                .map(|_| ())
        }
        Commands::Dir {
            path,
            layout,
            common,
        } => {
            let output = SatOutput {
                stats: common.stats,
                ..SatOutput::default()
            };
            solve_dir(&path, layout, common.solver_options(), output)
        }
        Commands::Sudoku {
            path,
            index,
            all,
            output,
            timeout,
            stats,
        } => {
            let options = SolverOptions::default().with_timeout_ms(timeout);
            solve_sudoku(&path, (!all).then_some(index), &output, options, stats)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Main entry point of the percent-sat application.
///
/// Parses command-line arguments, installs the log subscriber and dispatches
/// to the selected subcommand.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
