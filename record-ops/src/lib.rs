//! Record Operations Crate
//!
//! Pure, synchronous algorithms that keep CRM records tidy. Nothing in this
//! crate performs I/O; callers fetch records, hand them in, and persist
//! whatever comes back.
//!
//! # Modules
//!
//! - `name_matcher`: confidence score between two name/contact tuples
//! - `duplicates`: ranks approved candidates against a target record
//! - `merge`: fills gaps on a target contact from a duplicate
//! - `propagation`: rewrites stored references when a name changes
//! - `task_view`: filtering, sorting and counters for the to-do list
//!
//! # Example
//!
//! ```rust,ignore
//! use record_ops::{find_duplicates, NameProfile};
//!
//! let target = NameProfile::new("Jake Ryan", None, Some("OmniScope"));
//! let matches = find_duplicates(&target, &contacts);
//! ```

pub mod duplicates;
pub mod merge;
pub mod name_matcher;
pub mod propagation;
pub mod task_view;

pub use duplicates::{find_duplicates, find_duplicates_excluding, Candidate, MAX_DUPLICATE_RESULTS};
pub use merge::{reconcile, MergeableField};
pub use name_matcher::{score, MatchRuleKind, MatchScore, NameProfile};
pub use propagation::{
    propagate, propagate_all, FieldOutcome, PropagationError, PropagationReport, SkippedField,
};
pub use task_view::{build_task_view, filter_tasks, sort_tasks, task_stats};
