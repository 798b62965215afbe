#![allow(clippy::cast_precision_loss)]

use cdcl_sat::sat::cnf::Cnf;
use cdcl_sat::sat::config::{RepresentationType, SolverOptions};
use cdcl_sat::sat::dimacs::{cnf_files, parse_dimacs, parse_file};
use cdcl_sat::sat::error::{InputError, report};
use cdcl_sat::sat::literal_selection::LiteralSelectionType;
use cdcl_sat::sat::solver::{Solution, SolutionStats, Solutions, Solver, SolverImpls};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::info;
use std::io::{self, Cursor, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "cdcl-sat",
    version,
    about = "A conflict-driven clause learning SAT solver",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// A DIMACS .cnf file, or a directory searched recursively for .cnf files.
    /// Without a path or a subcommand the problem is read from piped stdin.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `completions`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// Literal CNF input as a string (e.g. "1 -2 0\n2 3 0"). A typed `\n` is
        /// read as a line break.
        /// With a `p cnf` line the text is read as DIMACS. Otherwise each line is
        /// one clause, literals are space-separated, and 0 ends the clause.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Raise the default log filter to `debug`. `RUST_LOG` takes precedence.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check a satisfying assignment against every input clause.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Print the satisfying assignment if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// How clauses and the formula are represented.
    #[arg(short, long, value_enum, default_value_t = RepresentationType::Array)]
    pub(crate) representation: RepresentationType,

    /// How a decision literal is chosen from a clause.
    #[arg(long, value_enum, default_value_t = LiteralSelectionType::First)]
    pub(crate) selection: LiteralSelectionType,

    /// Seed for `--selection random`.
    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,
}

impl CommonOptions {
    pub(crate) const fn solver_options(&self) -> SolverOptions {
        SolverOptions::new(self.representation, self.selection).with_seed(self.seed)
    }
}

impl Cli {
    /// The options in effect, whether given before or after a subcommand.
    pub(crate) fn effective_common(&self) -> &CommonOptions {
        match &self.command {
            Some(Commands::File { common, .. } | Commands::Text { common, .. }) => common,
            _ => &self.common,
        }
    }
}

/// Solves `path` if it is a file, or every `.cnf` file beneath it if it is a
/// directory.
///
/// Returns `false` if any problem failed verification or ended unknown.
///
/// # Errors
///
/// The first [`InputError`] met while listing or reading the problems.
pub(crate) fn solve_path(path: &Path, common: &CommonOptions) -> Result<bool, InputError> {
    if !path.is_dir() {
        return solve_file(path, common);
    }

    let mut all_ok = true;
    for file in cnf_files(path)? {
        all_ok &= solve_file(&file, common)?;
    }
    Ok(all_ok)
}

/// Reads and solves one DIMACS file.
///
/// # Errors
///
/// Any [`InputError`] from reading the file.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<bool, InputError> {
    let time = Instant::now();
    let cnf = parse_file(path)?;
    let elapsed = time.elapsed();

    Ok(solve_and_report(&cnf, common, Some(path), elapsed))
}

/// Reads and solves a problem piped in on stdin.
///
/// # Errors
///
/// [`InputError::NoInput`] if stdin is a terminal, otherwise any failure
/// reading the stream.
pub(crate) fn solve_stdin(common: &CommonOptions) -> Result<bool, InputError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(InputError::NoInput);
    }

    let time = Instant::now();
    let cnf = parse_dimacs(stdin.lock())?;
    let elapsed = time.elapsed();

    Ok(solve_and_report(&cnf, common, None, elapsed))
}

/// Solves a formula given as text on the command line.
///
/// # Errors
///
/// Any [`InputError`] from [`parse_text`].
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<bool, InputError> {
    let time = Instant::now();
    let cnf = parse_text(input)?;
    let elapsed = time.elapsed();

    Ok(solve_and_report(&cnf, common, None, elapsed))
}

/// Parses text as DIMACS if it has a problem line, and as one clause per line
/// otherwise. Without a problem line the atom count is the largest atom named.
///
/// A literal `\n` (backslash, n) also separates lines, so the text can be
/// written on one shell line. Blank and `c` lines are skipped, and a line that
/// is just `0` is the empty clause.
///
/// # Errors
///
/// [`InputError::InvalidLiteral`] for a token that is not a 32-bit integer,
/// [`InputError::LiteralOutOfRange`] for `i32::MIN`, otherwise as
/// [`parse_dimacs`].
pub(crate) fn parse_text(input: &str) -> Result<Cnf, InputError> {
    let input = input.replace("\\n", "\n");
    if input.lines().any(|line| line.trim_start().starts_with('p')) {
        return parse_dimacs(Cursor::new(input));
    }

    let clauses = input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('c')
        })
        .map(|(idx, line)| {
            line.split_whitespace()
                .map(|token| text_literal(idx + 1, token))
                .take_while(|value| !matches!(value, Ok(0)))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Cnf::try_from_clauses(clauses)
}

/// One token of a text clause. `0` is passed through as the terminator.
fn text_literal(line: usize, token: &str) -> Result<i32, InputError> {
    let value = token
        .parse::<i32>()
        .map_err(|source| InputError::InvalidLiteral {
            line,
            token: token.to_string(),
            source,
        })?;
    if value == i32::MIN {
        return Err(InputError::LiteralOutOfRange {
            line,
            literal: i64::from(value),
            atom_count: i32::MAX.unsigned_abs() as usize,
        });
    }
    Ok(value)
}

/// Checks a model against the problem, printing the outcome.
///
/// Returns `false` when the model falsifies some clause.
pub(crate) fn verify_solution(cnf: &Cnf, solutions: Option<&Solutions>) -> bool {
    let Some(model) = solutions else {
        return true;
    };
    let ok = cnf.verify(model);
    println!("Verified: {ok:?}");
    if !ok {
        eprintln!("error: the assignment found does not satisfy the formula");
    }
    ok
}

/// Allocated and resident memory in MiB, or zeros if jemalloc cannot report.
fn memory_usage() -> (f64, f64) {
    let read = || -> Result<(usize, usize), tikv_jemalloc_ctl::Error> {
        epoch::advance()?;
        Ok((stats::allocated::read()?, stats::resident::read()?))
    };
    read().map_or((0.0, 0.0), |(allocated, resident)| {
        (
            allocated as f64 / (1024.0 * 1024.0),
            resident as f64 / (1024.0 * 1024.0),
        )
    })
}

/// Solves a CNF formula and reports results including stats and verification.
///
/// Returns `false` if the model failed verification or the solve ended unknown.
///
/// # Arguments
/// * `cnf` - The CNF formula, typically parsed from a file or text.
/// * `common` - `CommonOptions` providing solver configuration and output flags.
/// * `label` - An optional label for the problem (e.g. file path).
/// * `parse_time` - The time taken to parse the CNF input.
pub(crate) fn solve_and_report(
    cnf: &Cnf,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> bool {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    let options = common.solver_options();
    info!("{} atoms, {} clauses; {options}", cnf.atom_count, cnf.len());

    let time = Instant::now();
    let mut solver = SolverImpls::new(cnf, &options);
    let solution = solver.solve();
    let elapsed = time.elapsed();

    let (allocated, resident) = memory_usage();
    let solutions = solver.solutions();

    let verified = !common.verify || verify_solution(cnf, solutions.as_ref());

    if common.stats {
        print_stats(
            parse_time,
            elapsed,
            cnf,
            &solver.stats(),
            allocated,
            resident,
        );
    }

    if common.print_solution {
        if let Some(model) = &solutions {
            println!("Solutions: {model}");
        }
    }
    println!("{solution}");

    if let Some(failure) = solver.failure() {
        eprintln!("error: {}", report(failure));
    }
    verified && solution != Solution::Unknown
}

/// Helper function to print a single statistic line in a formatted table row.
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The value of the statistic, implementing `std::fmt::Display`.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The raw count for the statistic.
/// * `elapsed` - The elapsed time in seconds, used to calculate the rate.
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
///
/// # Arguments
/// * `parse_time` - Duration spent parsing the input.
/// * `elapsed` - Duration spent by the solver.
/// * `cnf` - The CNF formula.
/// * `s` - `SolutionStats` collected by the solver.
/// * `allocated` - Allocated memory in MiB.
/// * `resident` - Resident memory in MiB.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    cnf: &Cnf,
    s: &SolutionStats,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.atom_count);
    stat_line("Clauses (original)", cnf.len());
    stat_line("Literals (original)", cnf.literal_count());

    println!("========================[ Search Statistics ]========================");
    stat_line("Learnt clauses", s.learnt_clauses);
    stat_line("Total clauses (incl. learnt)", cnf.len() + s.learnt_clauses);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Resolutions", s.resolutions, elapsed_secs);
    stat_line("Restarts", s.restarts);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn as_ints(cnf: &Cnf) -> Vec<Vec<i32>> {
        cnf.iter()
            .map(|c| c.iter().map(|l| l.to_i32()).collect())
            .collect()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from(["cdcl-sat", "problem.cnf", "--stats", "-r", "map"]);
        assert_eq!(cli.path, Some(PathBuf::from("problem.cnf")));
        assert!(cli.command.is_none());
        let common = cli.effective_common();
        assert!(common.stats);
        assert!(common.verify);
        assert_eq!(common.representation, RepresentationType::Map);

        let cli = Cli::parse_from([
            "cdcl-sat",
            "text",
            "--input",
            "1 0",
            "--verify",
            "false",
            "--selection",
            "random",
            "--seed",
            "9",
        ]);
        let options = cli.effective_common().solver_options();
        assert!(!cli.effective_common().verify);
        assert_eq!(options.selection, LiteralSelectionType::Random);
        assert_eq!(options.seed, 9);
    }

    #[test]
    fn test_parse_text_simple() {
        let cnf = parse_text("1 -2 0\n3 4 0").unwrap();
        assert_eq!(as_ints(&cnf), vec![vec![1, -2], vec![3, 4]]);
        assert_eq!(cnf.atom_count, 4);
    }

    #[test]
    fn test_parse_text_with_problem_line_is_dimacs() {
        let cnf = parse_text("c comment\np cnf 5 2\n1 0\n-2 0").unwrap();
        assert_eq!(as_ints(&cnf), vec![vec![1], vec![-2]]);
        assert_eq!(cnf.atom_count, 5);
    }

    #[test]
    fn test_parse_text_skips_blank_lines() {
        let cnf = parse_text("1 -2 0\n\n  \n2 3 0").unwrap();
        assert_eq!(as_ints(&cnf), vec![vec![1, -2], vec![2, 3]]);
        let options = SolverOptions::default();
        assert_eq!(SolverImpls::new(&cnf, &options).solve(), Solution::Satisfiable);
    }

    #[test]
    fn test_parse_text_zero_line_is_empty_clause() {
        let cnf = parse_text("1 0\n0\n-2 0").unwrap();
        assert_eq!(as_ints(&cnf), vec![vec![1], vec![], vec![-2]]);
    }

    #[test]
    fn test_parse_text_rejects_unrepresentable_literal() {
        assert!(matches!(
            parse_text("3 0\n-2147483648 0"),
            Err(InputError::LiteralOutOfRange { line: 2, literal: -2_147_483_648, .. })
        ));
        assert!(matches!(
            parse_text("2147483648 0"),
            Err(InputError::InvalidLiteral { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_text_accepts_escaped_newlines() {
        let cnf = parse_text(r"1 -2 0\n2 3 0").unwrap();
        assert_eq!(as_ints(&cnf), vec![vec![1, -2], vec![2, 3]]);
        let dimacs = parse_text(r"p cnf 3 1\n1 -3 0").unwrap();
        assert_eq!(as_ints(&dimacs), vec![vec![1, -3]]);
        assert_eq!(dimacs.atom_count, 3);
    }

    #[test]
    fn test_parse_text_stops_at_first_zero() {
        let cnf = parse_text("  1 2 0 3 4 0").unwrap();
        assert_eq!(as_ints(&cnf), vec![vec![1, 2]]);
        assert!(parse_text("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_text_rejects_garbage() {
        assert!(matches!(
            parse_text("1 0\n2 x 0"),
            Err(InputError::InvalidLiteral { line: 2, .. })
        ));
    }

    #[test]
    fn test_verify_solution() {
        let cnf = Cnf::from(vec![vec![1, 2]]);
        assert!(verify_solution(&cnf, None));
        let model = Solutions::new([cdcl_sat::sat::literal::Literal::try_from(-1).unwrap()]);
        assert!(!verify_solution(&cnf, Some(&model)));
    }
}
