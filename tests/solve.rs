use cdcl_sat::sat::cnf::Cnf;
use cdcl_sat::sat::config::{RepresentationType, SolverOptions};
use cdcl_sat::sat::dimacs::{cnf_files, parse_dimacs, parse_file};
use cdcl_sat::sat::literal_selection::LiteralSelectionType;
use cdcl_sat::sat::solver::{Solution, Solver, SolverImpls};
use std::io::Cursor;
use std::path::{Path, PathBuf};

const REPRESENTATIONS: [RepresentationType; 2] = [RepresentationType::Array, RepresentationType::Map];

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn all_options() -> Vec<SolverOptions> {
    let mut options = Vec::new();
    for representation in REPRESENTATIONS {
        options.push(SolverOptions::new(representation, LiteralSelectionType::First));
        for seed in [1, 2, 3] {
            options.push(
                SolverOptions::new(representation, LiteralSelectionType::Random).with_seed(seed),
            );
        }
    }
    options
}

fn solve(cnf: &Cnf, options: &SolverOptions) -> (Solution, SolverImpls) {
    let mut solver = SolverImpls::new(cnf, options);
    let solution = solver.solve();
    (solution, solver)
}

/// Exhaustive satisfiability check for small formulas.
fn brute_force(cnf: &Cnf) -> bool {
    let atoms = cnf.atom_count;
    (0u32..1 << atoms).any(|bits| {
        cnf.iter().all(|clause| {
            clause
                .iter()
                .any(|lit| (bits >> (lit.atom() - 1) & 1 == 1) == lit.polarity())
        })
    })
}

fn random_cnf(rng: &mut fastrand::Rng, atoms: i32, clauses: usize, width: usize) -> Cnf {
    let clauses = (0..clauses)
        .map(|_| {
            (0..rng.usize(1..=width))
                .map(|_| {
                    let atom = rng.i32(1..=atoms);
                    if rng.bool() { atom } else { -atom }
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    Cnf::from(clauses)
}

#[test]
fn test_sample_file_is_satisfiable() {
    let cnf = parse_file(data_dir().join("sample.cnf")).unwrap();
    assert_eq!(cnf.atom_count, 7);
    assert_eq!(cnf.len(), 8);

    for options in all_options() {
        let (solution, solver) = solve(&cnf, &options);
        assert_eq!(solution, Solution::Satisfiable, "{options}");
        assert!(cnf.verify(&solver.solutions().unwrap()), "{options}");
        assert!(solver.failure().is_none());
    }
}

#[test]
fn test_pigeonhole_file_is_unsatisfiable() {
    let cnf = parse_file(data_dir().join("nested").join("php3.cnf")).unwrap();
    for options in all_options() {
        let (solution, solver) = solve(&cnf, &options);
        assert_eq!(solution, Solution::Unsatisfiable, "{options}");
        assert!(solver.solutions().is_none());
        assert!(solver.stats().conflicts > 0);
        assert!(solver.stats().learnt_clauses > 0);
    }
}

#[test]
fn test_directory_listing_finds_cnf_files_only() {
    let dir = data_dir();
    let files = cnf_files(&dir).unwrap();
    assert_eq!(
        files,
        vec![dir.join("nested").join("php3.cnf"), dir.join("sample.cnf")]
    );
}

#[test]
fn test_dimacs_rendering_reads_back() {
    let cnf = parse_file(data_dir().join("sample.cnf")).unwrap();
    let reread = parse_dimacs(Cursor::new(cnf.to_string())).unwrap();
    assert_eq!(reread, cnf);
}

#[test]
fn test_empty_clause_is_unsatisfiable() {
    let cnf = parse_dimacs(Cursor::new("p cnf 2 2\n1 2 0\n0\n")).unwrap();
    for representation in REPRESENTATIONS {
        let options = SolverOptions::new(representation, LiteralSelectionType::First);
        let (solution, solver) = solve(&cnf, &options);
        assert_eq!(solution, Solution::Unsatisfiable);
        assert_eq!(solver.stats().decisions, 0);
    }
}

#[test]
fn test_agrees_with_brute_force() {
    let mut rng = fastrand::Rng::with_seed(2024);
    for round in 0..300 {
        let atoms = rng.i32(1..=8);
        let clauses = rng.usize(1..=30);
        let cnf = random_cnf(&mut rng, atoms, clauses, 3);
        let expected = brute_force(&cnf);

        for options in all_options() {
            let (solution, solver) = solve(&cnf, &options);
            assert_eq!(
                solution.is_sat(),
                expected,
                "round {round} with {options}:\n{cnf}"
            );
            assert!(!solution.is_unsat() || !expected);
            if expected {
                assert!(cnf.verify(&solver.solutions().unwrap()), "round {round}:\n{cnf}");
            }
        }
    }
}

#[test]
fn test_solving_is_deterministic() {
    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..50 {
        let cnf = random_cnf(&mut rng, 10, 40, 3);
        for options in all_options() {
            let (first, first_solver) = solve(&cnf, &options);
            let (second, second_solver) = solve(&cnf, &options);
            assert_eq!(first, second);
            assert_eq!(first_solver.solutions(), second_solver.solutions());
            assert_eq!(first_solver.stats(), second_solver.stats());
        }
    }
}

#[test]
fn test_resolving_keeps_the_answer() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..50 {
        let cnf = random_cnf(&mut rng, 9, 35, 3);
        for representation in REPRESENTATIONS {
            let options = SolverOptions::new(representation, LiteralSelectionType::First);
            let mut solver = SolverImpls::new(&cnf, &options);
            let first = solver.solve();
            let second = solver.solve();
            assert_eq!(first, second);
            assert_eq!(solver.stats().restarts, 1);
            if second.is_sat() {
                assert!(cnf.verify(&solver.solutions().unwrap()));
            }
        }
    }
}
