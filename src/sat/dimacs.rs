#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A reader for the DIMACS CNF format.
//!
//! The format:
//! - Comment lines start with `c`.
//! - The problem line `p cnf <atoms> <clauses>` comes before any clause.
//! - Clauses are whitespace-separated non-zero integers ended by `0`. A clause
//!   may span several lines, and a bare `0` is the empty clause.
//! - A line starting with `%` ends the data. Anything after it is ignored.
//!
//! Every literal is checked against the declared atom count, so a formula that
//! reaches the solver never names an atom outside `1..=atoms`. The declared
//! clause count is informational only.

use crate::sat::clause::Disjunction;
use crate::sat::cnf::Cnf;
use crate::sat::error::InputError;
use crate::sat::literal::Literal;
use crate::sat::logging::targets;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Parses `(atoms, clauses)` from the tokens after `p`.
fn problem_line(line: usize, content: &str) -> Result<(usize, usize), InputError> {
    let malformed = || InputError::MalformedProblemLine {
        line,
        content: content.to_string(),
    };
    let mut tokens = content.split_whitespace().skip(1);
    if tokens.next() != Some("cnf") {
        return Err(malformed());
    }
    let atoms = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(malformed)?;
    let clauses = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(malformed)?;
    if tokens.next().is_some() {
        return Err(malformed());
    }
    Ok((atoms, clauses))
}

fn literal(line: usize, token: &str, atom_count: usize) -> Result<Option<Literal>, InputError> {
    let value: i64 = token.parse().map_err(|source| InputError::InvalidLiteral {
        line,
        token: token.to_string(),
        source,
    })?;
    if value == 0 {
        return Ok(None);
    }
    let out_of_range = InputError::LiteralOutOfRange {
        line,
        literal: value,
        atom_count,
    };
    if usize::try_from(value.unsigned_abs()).map_or(true, |atom| atom > atom_count) {
        return Err(out_of_range);
    }
    i32::try_from(value)
        .ok()
        .and_then(Literal::from_dimacs)
        .map(Some)
        .ok_or(out_of_range)
}

/// Reads a DIMACS problem from `reader`.
///
/// # Errors
///
/// - [`InputError::Stream`] if reading fails.
/// - [`InputError::MissingProblemLine`] for a clause before the `p` line.
/// - [`InputError::MalformedProblemLine`] for a bad or repeated `p` line.
/// - [`InputError::InvalidLiteral`] for a token that is not an integer.
/// - [`InputError::LiteralOutOfRange`] for an atom above the declared count.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf, InputError> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses: Vec<Disjunction> = Vec::new();
    let mut current = Disjunction::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let number = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        if trimmed.starts_with('%') {
            break;
        }
        if trimmed.starts_with('p') {
            if header.is_some() {
                return Err(InputError::MalformedProblemLine {
                    line: number,
                    content: trimmed.to_string(),
                });
            }
            header = Some(problem_line(number, trimmed)?);
            continue;
        }

        let Some((atom_count, _)) = header else {
            return Err(InputError::MissingProblemLine { line: number });
        };
        for token in trimmed.split_whitespace() {
            match literal(number, token, atom_count)? {
                Some(lit) => current.push(lit),
                None => clauses.push(std::mem::take(&mut current)),
            }
        }
    }

    if !current.is_empty() {
        debug!(target: targets::PARSE, "accepting final clause without terminating 0");
        clauses.push(current);
    }

    let (atom_count, declared) = header.unwrap_or_default();
    if declared != clauses.len() {
        warn!(
            target: targets::PARSE,
            "problem line declares {declared} clauses, found {}",
            clauses.len()
        );
    }
    debug!(
        target: targets::PARSE,
        "read {} clauses over {atom_count} atoms",
        clauses.len()
    );
    Ok(Cnf {
        atom_count,
        clauses,
    })
}

/// Reads a DIMACS problem from a file.
///
/// # Errors
///
/// [`InputError::Io`] if the file cannot be opened, otherwise as [`parse_dimacs`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Cnf, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dimacs(BufReader::new(file))
}

/// Every `.cnf` file under `dir`, recursively, in sorted order.
///
/// # Errors
///
/// [`InputError::Io`] if the directory or one of its entries cannot be read.
pub fn cnf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, InputError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
        let entry = entry.map_err(|err| InputError::Io {
            path: err
                .path()
                .map_or_else(|| dir.as_ref().to_path_buf(), Path::to_path_buf),
            source: err.into(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "cnf") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
