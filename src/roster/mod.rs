//! Entity resolution: two partial player feeds in, one canonical roster out.
//!
//! The submodules split the work the way the data flows:
//! - `names`: deterministic name normalization shared by everything
//! - `models`: record types, the field-merge invariant and the roster
//! - `merge`: the matching pipeline with its shrinking candidate pool

pub mod merge;
pub mod models;
pub mod names;

pub use merge::{MergeOutcome, MergeReport, merge_sources};
pub use models::{CanonicalRoster, MergeConflict, PlayerRecord, Position};
