//! # cdcl-sat
//!
//! `cdcl-sat` is a command-line SAT (Satisfiability) solver built on
//! conflict-driven clause learning. It reads problems in CNF (Conjunctive Normal
//! Form) DIMACS format, or as plain text, and reports whether they are
//! satisfiable.
//!
//! ## Features
//!
//! -   **Multiple Input Sources**:
//!     -   DIMACS CNF files (`.cnf`)
//!     -   Directories, searched recursively for `.cnf` files
//!     -   Plain text CNF
//!     -   DIMACS piped in on stdin
//! -   **Configurable Solver**: Choose the clause representation (`array` or `map`)
//!     and how a decision literal is picked (`first` or seeded `random`).
//! -   **Logging**: Diagnostics go through `log` and are printed by `env_logger`.
//!     `--debug` raises the default filter, and `RUST_LOG` overrides it.
//! -   **Verification**: A satisfying assignment is checked against every input
//!     clause (on by default).
//! -   **Statistics**: Parse time, solve time, conflicts, decisions, propagations,
//!     learnt clauses, and memory usage as reported by jemalloc.
//! -   **Solution Printing**: Option to print the satisfying assignment.
//!
//! ## Usage
//!
//! ```sh
//! cdcl-sat [OPTIONS] [PATH]
//! cdcl-sat [SUBCOMMAND]
//! ```
//!
//! ### Subcommands
//!
//! 1.  **`file`**: Solve a CNF file in DIMACS format.
//!     ```sh
//!     cdcl-sat file --path <path_to_cnf_file> [OPTIONS]
//!     ```
//!
//! 2.  **`text`**: Solve a CNF formula provided as plain text.
//!     ```sh
//!     cdcl-sat text --input "1 -2 0\n2 3 0" [OPTIONS]
//!     ```
//!     A typed `\n` separates clause lines just like a real line break.
//!
//! 3.  **`completions`**: Print a shell completion script.
//!     ```sh
//!     cdcl-sat completions bash > cdcl-sat.bash
//!     ```
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Default log filter `debug` instead of `info`.
//! -   `--verify <BOOL>`: Verify a satisfying assignment (default: `true`).
//! -   `-s, --stats`: Print statistics (default: `false`).
//! -   `-p, --print-solution`: Print the satisfying assignment (default: `false`).
//! -   `-r, --representation <array|map>`: Clause representation (default: `array`).
//! -   `--selection <first|random>`: Decision literal policy (default: `first`).
//! -   `--seed <N>`: Seed for random selection (default: `0`).
//!
//! ## Example Invocations
//!
//! ```sh
//! # Solve a DIMACS file
//! cdcl-sat problem.cnf
//!
//! # Solve every .cnf file under a directory with statistics
//! cdcl-sat benchmarks/ --stats
//!
//! # Pipe a problem in
//! cat problem.cnf | cdcl-sat --representation map
//!
//! # Trace conflict analysis only
//! RUST_LOG=analysis=trace cdcl-sat problem.cnf
//! ```
//!
//! The process exits non-zero if the input cannot be read, if a model fails
//! verification, or if the search stops on an internal failure.

use crate::command_line::cli::{Cli, Commands, solve_file, solve_path, solve_stdin, solve_text};
use cdcl_sat::sat::error::report;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;

mod command_line;

/// Global allocator using `tikv-jemallocator` for potentially better performance
/// and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Installs `env_logger`, defaulting to `info`, or `debug` when asked.
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Main entry point.
///
/// Parses command-line arguments, dispatches to the appropriate handler, and
/// turns the outcome into an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.effective_common().debug);

    let outcome = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            return ExitCode::SUCCESS;
        }
        Some(Commands::File { path, common }) => solve_file(&path, &common),
        Some(Commands::Text { input, common }) => solve_text(&input, &common),
        None => match &cli.path {
            Some(path) => solve_path(path, &cli.common),
            None => solve_stdin(&cli.common),
        },
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", report(&e));
            ExitCode::FAILURE
        }
    }
}
