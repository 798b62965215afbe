//! A conflict-driven clause learning SAT solver.
//!
//! Problems are read from DIMACS ([`sat::dimacs`]) into a [`sat::cnf::Cnf`] and
//! solved by [`sat::cdcl::Cdcl`], which is generic over how clauses track the
//! current assignment. [`sat::solver::SolverImpls`] picks one of the two
//! representations at runtime.
//!
//! ```
//! use cdcl_sat::sat::cnf::Cnf;
//! use cdcl_sat::sat::config::SolverOptions;
//! use cdcl_sat::sat::solver::{Solution, Solver, SolverImpls};
//!
//! let cnf = Cnf::from(vec![vec![1, 2], vec![-1], vec![-2, 3]]);
//! let mut solver = SolverImpls::new(&cnf, &SolverOptions::default());
//! assert_eq!(solver.solve(), Solution::Satisfiable);
//! assert!(cnf.verify(&solver.solutions().unwrap()));
//! ```

/// The solver, its data structures and the DIMACS reader.
pub mod sat;
