//! Fantasy Squad Optimizer Library
//!
//! This library merges player records from two independently sourced feeds
//! (real-world market valuations and in-game fantasy costs) into a single
//! canonical roster, then selects the squad with the highest total market
//! value under budget, position-quota and group-quota constraints.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::time::Duration;
//!
//! use squad_optimizer::roster::{PlayerRecord, Position, merge_sources};
//! use squad_optimizer::selection::{
//!     BranchBoundSolver, SolveOutcome, SquadRules, SquadSolver, build_selection_problem,
//! };
//!
//! // One valuation record and one fantasy record for the same player.
//! let mut valuation = PlayerRecord::named("Manuel Neuer");
//! valuation.market_value = Some(18_000_000);
//! let mut fantasy = PlayerRecord::named("M. Neuer");
//! fantasy.position = Some(Position::Goalkeeper);
//! fantasy.ingame_cost = Some(6_000_000);
//!
//! // Merge the feeds into a canonical roster.
//! let merge = merge_sources(vec![valuation], vec![fantasy], &HashMap::new());
//! assert_eq!(merge.roster.len(), 1);
//!
//! // Build and solve the selection problem.
//! let rules = SquadRules {
//!     squad_size: 1,
//!     budget_cap: 10_000_000.0,
//!     position_quotas: [(Position::Goalkeeper, 1)].into_iter().collect(),
//!     group_quotas: Default::default(),
//!     default_group_limit: None,
//! };
//! let problem = build_selection_problem(&merge.roster, &rules).unwrap();
//! let outcome = BranchBoundSolver.solve(&problem, Duration::from_secs(5));
//! assert!(matches!(outcome, SolveOutcome::Optimal(_)));
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod report;
pub mod roster;
pub mod selection;
pub mod sources;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use report::SquadReport;
pub use roster::{CanonicalRoster, MergeOutcome, PlayerRecord, Position, merge_sources};
pub use selection::{
    BranchBoundSolver, Selection, SelectionProblem, SolveOutcome, SquadRules, SquadSolver,
    build_selection_problem,
};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
