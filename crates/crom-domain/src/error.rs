//! Construction-time errors.
//!
//! Checks never fail: non-compliance is a `false`, not an error. These errors only come out of
//! constructors (and [`crate::Instance::player`]).

use crom_types::{IntervalError, ObjectId, TypeName};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("type `{0}` is declared in more than one of the natural, role, compartment and relationship type sets")]
    NotDisjoint(TypeName),

    #[error("fulfillment ({filler}, {compartment}, {role}) is ill-typed")]
    IllTypedFulfillment {
        filler: TypeName,
        compartment: TypeName,
        role: TypeName,
    },

    #[error("relationship mapping ({relationship}, {compartment}) -> ({source_role}, {target_role}) is ill-typed")]
    IllTypedRelationship {
        relationship: TypeName,
        compartment: TypeName,
        source_role: TypeName,
        target_role: TypeName,
    },

    #[error("inheritance edge ({sub}, {sup}) is not between {kind} types")]
    IllTypedInheritance {
        sub: TypeName,
        sup: TypeName,
        kind: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("object `{0}` is declared in more than one of the natural, role and compartment sets")]
    NotDisjoint(ObjectId),

    #[error("object `{0}` has no type")]
    MissingType(ObjectId),

    #[error("type assignment mentions unknown object `{0}`")]
    UnknownTypedObject(ObjectId),

    #[error("plays triple ({player}, {compartment}, {role}) is not in (N ∪ C) × C × R")]
    IllTypedPlay {
        player: ObjectId,
        compartment: ObjectId,
        role: ObjectId,
    },

    #[error("links of `{relationship}` refer to unknown compartment `{compartment}`")]
    UnknownLinkCompartment {
        relationship: TypeName,
        compartment: ObjectId,
    },

    #[error("links of ({relationship}, {compartment}) refer to unknown role `{role}`")]
    UnknownLinkRole {
        relationship: TypeName,
        compartment: ObjectId,
        role: ObjectId,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("invalid bounds: {0}")]
    Bounds(#[from] IntervalError),
}

/// A role object that is not played by anything.
///
/// Signals a bug in how the instance was put together rather than a non-compliant instance.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("role `{0}` is not played in the instance")]
pub struct LookupError(pub ObjectId);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("annotation anchors unknown {kind} `{name}`")]
    UnknownAnchor { kind: &'static str, name: String },

    #[error("precondition violated: {0}")]
    Precondition(&'static str),

    #[error("projected schema is ill-typed: {0}")]
    Schema(#[from] SchemaError),

    #[error("projected instance is ill-typed: {0}")]
    Instance(#[from] InstanceError),
}
