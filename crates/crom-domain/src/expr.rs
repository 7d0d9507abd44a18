//! Role expressions and their evaluation against an instance.
//!
//! An expression is a tree of thresholds over role types. `Leaf(rt)` asks whether an object plays
//! a role of type `rt` in a compartment; `Threshold` counts how many children hold; `Quantified`
//! counts over the compartments of a given type the object participates in.
//!
//! Evaluation is a plain recursive fold with no memoization. Its cost grows with expression depth
//! times the number of objects and compartments, exponentially in the worst case.

use crate::error::ExpressionError;
use crate::instance::Instance;
use crate::schema::TypeSchema;
use crom_types::{Bound, Interval, ObjectId, TypeName};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleExpression {
    Leaf(TypeName),
    Threshold {
        children: Vec<RoleExpression>,
        bounds: Interval,
    },
    Quantified {
        compartment_type: TypeName,
        bounds: Interval,
        inner: Box<RoleExpression>,
    },
}

impl RoleExpression {
    pub fn leaf(rt: impl Into<TypeName>) -> Self {
        Self::Leaf(rt.into())
    }

    pub fn threshold(
        children: Vec<RoleExpression>,
        lower: u64,
        upper: Bound,
    ) -> Result<Self, ExpressionError> {
        Ok(Self::Threshold {
            children,
            bounds: Interval::new(lower, upper)?,
        })
    }

    pub fn quantified(
        compartment_type: impl Into<TypeName>,
        lower: u64,
        upper: Bound,
        inner: RoleExpression,
    ) -> Result<Self, ExpressionError> {
        Ok(Self::Quantified {
            compartment_type: compartment_type.into(),
            bounds: Interval::new(lower, upper)?,
            inner: Box::new(inner),
        })
    }

    /// Every role type named by a leaf.
    pub fn atoms(&self) -> BTreeSet<&TypeName> {
        let mut out = BTreeSet::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms<'a>(&'a self, out: &mut BTreeSet<&'a TypeName>) {
        match self {
            Self::Leaf(rt) => {
                out.insert(rt);
            }
            Self::Threshold { children, .. } => {
                for child in children {
                    child.collect_atoms(out);
                }
            }
            Self::Quantified { inner, .. } => inner.collect_atoms(out),
        }
    }

    /// True when every leaf sits under a `Quantified` node.
    ///
    /// `owns(ct, rt)` decides whether the quantified compartment type `ct` may host `rt`.
    pub fn is_quantified_closed(&self, owns: &impl Fn(&TypeName, &TypeName) -> bool) -> bool {
        match self {
            Self::Leaf(_) => false,
            Self::Threshold { children, .. } => {
                children.iter().all(|c| c.is_quantified_closed(owns))
            }
            Self::Quantified {
                compartment_type,
                inner,
                ..
            } => inner.atoms().into_iter().all(|rt| owns(compartment_type, rt)),
        }
    }
}

impl fmt::Display for RoleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(rt) => write!(f, "{rt}"),
            Self::Threshold { children, bounds } => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, "; {bounds})")
            }
            Self::Quantified {
                compartment_type,
                bounds,
                inner,
            } => write!(f, "Q({compartment_type}; {bounds}; {inner})"),
        }
    }
}

/// Evaluates expressions against one instance.
///
/// Without a schema, `Quantified` matches compartment types exactly; with one it also counts
/// compartments whose type specializes the quantified type.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator<'a> {
    instance: &'a Instance,
    schema: Option<&'a TypeSchema>,
}

impl<'a> Evaluator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            schema: None,
        }
    }

    pub fn with_schema(instance: &'a Instance, schema: &'a TypeSchema) -> Self {
        Self {
            instance,
            schema: Some(schema),
        }
    }

    /// 0 or 1. A leaf evaluated without a compartment is 0.
    pub fn evaluate(
        &self,
        expr: &RoleExpression,
        object: &ObjectId,
        compartment: Option<&ObjectId>,
    ) -> u64 {
        match expr {
            RoleExpression::Leaf(rt) => match compartment {
                Some(c) => u64::from(self.instance.plays_role_of_type(object, c, rt)),
                None => 0,
            },
            RoleExpression::Threshold { children, bounds } => {
                let sum: u64 = children
                    .iter()
                    .map(|child| self.evaluate(child, object, compartment))
                    .sum();
                u64::from(bounds.contains(sum))
            }
            RoleExpression::Quantified {
                compartment_type,
                bounds,
                inner,
            } => {
                let sum: u64 = self
                    .instance
                    .compartments_of(object)
                    .into_iter()
                    .filter(|c| self.is_of_type(c, compartment_type))
                    .map(|c| self.evaluate(inner, object, Some(c)))
                    .sum();
                u64::from(bounds.contains(sum))
            }
        }
    }

    pub fn holds(
        &self,
        expr: &RoleExpression,
        object: &ObjectId,
        compartment: Option<&ObjectId>,
    ) -> bool {
        self.evaluate(expr, object, compartment) == 1
    }

    fn is_of_type(&self, c: &ObjectId, ct: &TypeName) -> bool {
        let Some(actual) = self.instance.type_of(c) else {
            return false;
        };
        match self.schema {
            Some(schema) => schema.preceq_ct().contains(actual, ct),
            None => actual == ct,
        }
    }
}

/// Schema-less evaluation of `expr` for `object` in `compartment`.
pub fn evaluate(
    expr: &RoleExpression,
    instance: &Instance,
    object: &ObjectId,
    compartment: Option<&ObjectId>,
) -> u64 {
    Evaluator::new(instance).evaluate(expr, object, compartment)
}
