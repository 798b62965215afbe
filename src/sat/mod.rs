#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod assignment;
pub mod cdcl;
pub mod clause;
pub mod cnf;
pub mod config;
pub mod conflict_analysis;
pub mod dimacs;
pub mod error;
pub mod formula;
pub mod literal;
pub mod literal_selection;
pub mod logging;
pub mod solver;
pub mod trail;
