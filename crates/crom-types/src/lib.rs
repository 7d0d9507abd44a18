//! Stable names, intervals and IDs used across the crom workspace.
//!
//! This crate is intentionally boring:
//! - opaque names for schema types and instance objects
//! - cardinality intervals (`1..*`)
//! - stable string IDs for every named check
//! - serializable check outcomes and an explain registry

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod interval;
pub mod name;
pub mod outcome;

pub use explain::{Explanation, lookup_explanation};
pub use interval::{Bound, Interval, IntervalError};
pub use name::{ObjectId, TypeName};
pub use outcome::{CheckOutcome, Verdict};
