//! Planner module - builds new workouts from the catalog and history
//!
//! Features:
//! - Last-used weight lookup for progression hints
//! - Novelty bias against the previous session
//! - Full-body circuit generation per training goal

pub mod generator;
pub mod history;
pub mod random;

pub use generator::{COVERAGE_RULES, CoverageRule, WorkoutGenerator};
pub use history::HistoryLookup;
pub use random::{Randomness, RngSource};
