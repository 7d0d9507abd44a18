//! Business-rule constraints declared over a type schema.

use crate::canonical::braced;
use crate::expr::RoleExpression;
use crate::relation::IntraPredicate;
use crate::schema::RelationshipKey;
use crom_types::{Interval, TypeName};
use std::collections::BTreeMap;
use std::fmt;

/// `interval` bounds how many participants of a compartment satisfy `expr`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoleConstraint {
    pub cardinality: Interval,
    pub expr: RoleExpression,
}

impl RoleConstraint {
    pub fn new(cardinality: Interval, expr: RoleExpression) -> Self {
        Self { cardinality, expr }
    }
}

impl fmt::Display for RoleConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.cardinality, self.expr)
    }
}

/// Number of predecessors each target role may have, and successors each source role may have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelationshipCardinality {
    pub pred: Interval,
    pub succ: Interval,
}

impl RelationshipCardinality {
    pub fn new(pred: Interval, succ: Interval) -> Self {
        Self { pred, succ }
    }

    pub fn is_mandatory(&self) -> bool {
        self.pred.is_mandatory() || self.succ.is_mandatory()
    }
}

impl fmt::Display for RelationshipCardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.pred, self.succ)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntraConstraint {
    pub relationship: TypeName,
    pub compartment_type: TypeName,
    pub predicate: IntraPredicate,
}

impl IntraConstraint {
    pub fn new(
        relationship: impl Into<TypeName>,
        compartment_type: impl Into<TypeName>,
        predicate: IntraPredicate,
    ) -> Self {
        Self {
            relationship: relationship.into(),
            compartment_type: compartment_type.into(),
            predicate,
        }
    }

    pub fn key(&self) -> RelationshipKey {
        (self.relationship.clone(), self.compartment_type.clone())
    }
}

impl fmt::Display for IntraConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.relationship, self.compartment_type, self.predicate
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InterOperator {
    /// Player-level edges of the two relationships are disjoint.
    Exclusion,
    /// Player-level edges of the first are contained in the second.
    Implication,
}

impl InterOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Exclusion => ">-<",
            Self::Implication => "-|>",
        }
    }

    /// Accepts the symbol or the word (`exclusion`, `implication`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ">-<" | "exclusion" => Some(Self::Exclusion),
            "-|>" | "implication" => Some(Self::Implication),
            _ => None,
        }
    }
}

impl fmt::Display for InterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterConstraint {
    pub first: TypeName,
    pub compartment_type: TypeName,
    pub op: InterOperator,
    pub second: TypeName,
}

impl InterConstraint {
    pub fn new(
        first: impl Into<TypeName>,
        compartment_type: impl Into<TypeName>,
        op: InterOperator,
        second: impl Into<TypeName>,
    ) -> Self {
        Self {
            first: first.into(),
            compartment_type: compartment_type.into(),
            op,
            second: second.into(),
        }
    }
}

impl fmt::Display for InterConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.first, self.compartment_type, self.op, self.second
        )
    }
}

/// Role cardinalities, relationship cardinalities, intra and inter relationship constraints,
/// and global role constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintModel {
    pub role_constraints: BTreeMap<TypeName, Vec<RoleConstraint>>,
    pub cardinalities: BTreeMap<RelationshipKey, RelationshipCardinality>,
    pub intra: Vec<IntraConstraint>,
    pub inter: Vec<InterConstraint>,
    pub global: Vec<RoleExpression>,
}

impl ConstraintModel {
    pub fn is_empty(&self) -> bool {
        self.role_constraints.values().all(Vec::is_empty)
            && self.cardinalities.is_empty()
            && self.intra.is_empty()
            && self.inter.is_empty()
            && self.global.is_empty()
    }

    /// `rolec(ct)`; empty when `ct` has no entry.
    pub fn role_constraints_of(&self, ct: &TypeName) -> &[RoleConstraint] {
        self.role_constraints
            .get(ct)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl fmt::Display for ConstraintModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ConstraintModel")?;
        let rolec = self
            .role_constraints
            .iter()
            .map(|(ct, list)| format!("{ct} -> {}", braced(list)));
        writeln!(f, "  rolec: {}", braced(rolec))?;
        let card = self
            .cardinalities
            .iter()
            .map(|((rst, ct), c)| format!("({rst}, {ct}) -> {c}"));
        writeln!(f, "  card: {}", braced(card))?;
        writeln!(f, "  intra: {}", braced(&self.intra))?;
        writeln!(f, "  inter: {}", braced(&self.inter))?;
        write!(f, "  grolec: {}", braced(&self.global))
    }
}
