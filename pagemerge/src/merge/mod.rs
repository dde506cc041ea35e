//! Merge planning and execution.

pub mod executor;
pub mod metadata;
pub mod planner;

pub use executor::{MergeOptions, MergeStatistics, ResolvedPage, execute};
pub use metadata::MetadataManager;
pub use planner::{MergePlan, PlannedSource, SourceSpec, effective_orientation};
