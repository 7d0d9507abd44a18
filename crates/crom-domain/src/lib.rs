//! Pure model checking (no IO).
//!
//! Input: a type schema, a constraint model and instances constructed elsewhere.
//! Output: well-formedness / compliance / validity verdicts, per-check outcomes, and
//! persistence projections of schemas, constraint models and instances.
//!
//! Every check is direct evaluation over finite sets. Role expressions nest thresholds and
//! quantifications, so evaluation cost grows exponentially with expression depth times the
//! number of objects and compartments; nothing here memoizes it.

#![forbid(unsafe_code)]

pub mod closure;
pub mod constraint;
pub mod error;
pub mod expr;
pub mod instance;
pub mod persistence;
pub mod relation;
pub mod report;
pub mod schema;

mod canonical;
mod checks;
mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use constraint::ConstraintModel;
pub use engine::{diagnose_instance, diagnose_model, diagnose_schema, diagnose_validity};
pub use expr::{Evaluator, RoleExpression, evaluate};
pub use instance::Instance;
pub use persistence::{PersistenceAnnotation, Projection, restriction, transformation};
pub use schema::TypeSchema;
