//! Constrained squad selection: problem formulation and solving.
//!
//! - `problem`: the solver-agnostic 0/1 problem data structure
//! - `builder`: turns a canonical roster plus squad rules into a problem
//! - `solver`: the `SquadSolver` contract and the default exact solver

pub mod builder;
pub mod problem;
pub mod solver;

pub use builder::{GroupLimit, SquadRules, build_selection_problem};
pub use problem::{Bounds, LinearConstraint, Selection, SelectionProblem};
pub use solver::{BranchBoundSolver, SolveOutcome, SquadSolver};
