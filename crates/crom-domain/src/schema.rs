//! The typed vocabulary of a compartment role object model.

use crate::canonical::braced;
use crate::closure::Preorder;
use crate::error::SchemaError;
use crom_types::TypeName;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// `filler` may play `role` inside `compartment`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fulfillment {
    pub filler: TypeName,
    pub compartment: TypeName,
    pub role: TypeName,
}

impl Fulfillment {
    pub fn new(
        filler: impl Into<TypeName>,
        compartment: impl Into<TypeName>,
        role: impl Into<TypeName>,
    ) -> Self {
        Self {
            filler: filler.into(),
            compartment: compartment.into(),
            role: role.into(),
        }
    }
}

impl fmt::Display for Fulfillment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.filler, self.compartment, self.role)
    }
}

/// The two role types a relationship connects inside one compartment type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationshipEnds {
    pub source: TypeName,
    pub target: TypeName,
}

impl RelationshipEnds {
    pub fn new(source: impl Into<TypeName>, target: impl Into<TypeName>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// `(relationship type, compartment type)`
pub type RelationshipKey = (TypeName, TypeName);

/// Inheritance edges, `(sub, super)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inheritance {
    pub natural: BTreeSet<(TypeName, TypeName)>,
    pub compartment: BTreeSet<(TypeName, TypeName)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Base,
    Inheritance,
}

/// Everything a [`TypeSchema`] is built from.
#[derive(Clone, Debug, Default)]
pub struct SchemaDecl {
    pub natural_types: BTreeSet<TypeName>,
    pub role_types: BTreeSet<TypeName>,
    pub compartment_types: BTreeSet<TypeName>,
    pub relationship_types: BTreeSet<TypeName>,
    pub fills: BTreeSet<Fulfillment>,
    pub relationships: BTreeMap<RelationshipKey, RelationshipEnds>,

    /// `Some` selects the inheritance variant, even with no edges.
    pub inheritance: Option<Inheritance>,
}

/// A validated schema. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSchema {
    natural_types: BTreeSet<TypeName>,
    role_types: BTreeSet<TypeName>,
    compartment_types: BTreeSet<TypeName>,
    relationship_types: BTreeSet<TypeName>,
    fills: BTreeSet<Fulfillment>,
    relationships: BTreeMap<RelationshipKey, RelationshipEnds>,
    inheritance: Option<Inheritance>,

    preceq_nt: Preorder,
    preceq_ct: Preorder,
    preceq_t: Preorder,
}

impl TypeSchema {
    pub fn new(decl: SchemaDecl) -> Result<Self, SchemaError> {
        let SchemaDecl {
            natural_types,
            role_types,
            compartment_types,
            relationship_types,
            fills,
            relationships,
            inheritance,
        } = decl;

        let mut seen = BTreeSet::new();
        for name in natural_types
            .iter()
            .chain(&role_types)
            .chain(&compartment_types)
            .chain(&relationship_types)
        {
            if !seen.insert(name) {
                return Err(SchemaError::NotDisjoint(name.clone()));
            }
        }

        for f in &fills {
            let filler_ok =
                natural_types.contains(&f.filler) || compartment_types.contains(&f.filler);
            if !filler_ok
                || !compartment_types.contains(&f.compartment)
                || !role_types.contains(&f.role)
            {
                return Err(SchemaError::IllTypedFulfillment {
                    filler: f.filler.clone(),
                    compartment: f.compartment.clone(),
                    role: f.role.clone(),
                });
            }
        }

        for ((rst, ct), ends) in &relationships {
            if !relationship_types.contains(rst)
                || !compartment_types.contains(ct)
                || !role_types.contains(&ends.source)
                || !role_types.contains(&ends.target)
            {
                return Err(SchemaError::IllTypedRelationship {
                    relationship: rst.clone(),
                    compartment: ct.clone(),
                    source_role: ends.source.clone(),
                    target_role: ends.target.clone(),
                });
            }
        }

        let (preceq_nt, preceq_ct) = match &inheritance {
            Some(inh) => {
                check_edges(&inh.natural, &natural_types, "natural")?;
                check_edges(&inh.compartment, &compartment_types, "compartment")?;
                (
                    Preorder::from_edges(&inh.natural, &natural_types),
                    Preorder::from_edges(&inh.compartment, &compartment_types),
                )
            }
            None => (
                Preorder::identity(&natural_types),
                Preorder::identity(&compartment_types),
            ),
        };
        let preceq_t = preceq_nt.union(&preceq_ct);

        Ok(Self {
            natural_types,
            role_types,
            compartment_types,
            relationship_types,
            fills,
            relationships,
            inheritance,
            preceq_nt,
            preceq_ct,
            preceq_t,
        })
    }

    /// Builds an inheritance-variant schema, replacing whatever `decl.inheritance` held.
    pub fn with_inheritance(
        decl: SchemaDecl,
        inheritance: Inheritance,
    ) -> Result<Self, SchemaError> {
        Self::new(SchemaDecl {
            inheritance: Some(inheritance),
            ..decl
        })
    }

    pub fn variant(&self) -> Variant {
        match self.inheritance {
            Some(_) => Variant::Inheritance,
            None => Variant::Base,
        }
    }

    pub fn natural_types(&self) -> &BTreeSet<TypeName> {
        &self.natural_types
    }

    pub fn role_types(&self) -> &BTreeSet<TypeName> {
        &self.role_types
    }

    pub fn compartment_types(&self) -> &BTreeSet<TypeName> {
        &self.compartment_types
    }

    pub fn relationship_types(&self) -> &BTreeSet<TypeName> {
        &self.relationship_types
    }

    pub fn fills(&self) -> &BTreeSet<Fulfillment> {
        &self.fills
    }

    pub fn relationships(&self) -> &BTreeMap<RelationshipKey, RelationshipEnds> {
        &self.relationships
    }

    pub fn inheritance(&self) -> Option<&Inheritance> {
        self.inheritance.as_ref()
    }

    pub fn relationship(&self, rst: &TypeName, ct: &TypeName) -> Option<&RelationshipEnds> {
        self.relationships.get(&(rst.clone(), ct.clone()))
    }

    pub fn is_compartment_type(&self, t: &TypeName) -> bool {
        self.compartment_types.contains(t)
    }

    /// `parts(ct)`: the role types fulfilled inside `ct`.
    pub fn parts(&self, ct: &TypeName) -> BTreeSet<&TypeName> {
        self.fills
            .iter()
            .filter(|f| &f.compartment == ct)
            .map(|f| &f.role)
            .collect()
    }

    /// Role types of `ct` and of every compartment type `ct` specializes.
    pub fn owned_roles(&self, ct: &TypeName) -> BTreeSet<&TypeName> {
        let mut roles = BTreeSet::new();
        for sup in self.preceq_ct.supertypes(ct) {
            roles.extend(self.parts(sup));
        }
        roles
    }

    /// Some fulfillment `(t, compartment, role)` exists with `player ⪯_T t`.
    pub fn admits_play(&self, player: &TypeName, compartment: &TypeName, role: &TypeName) -> bool {
        self.fills.iter().any(|f| {
            &f.compartment == compartment
                && &f.role == role
                && self.preceq_t.contains(player, &f.filler)
        })
    }

    /// Compartment types that contain `rt`.
    pub fn owners(&self, rt: &TypeName) -> BTreeSet<&TypeName> {
        self.fills
            .iter()
            .filter(|f| &f.role == rt)
            .map(|f| &f.compartment)
            .collect()
    }

    pub fn preceq_nt(&self) -> &Preorder {
        &self.preceq_nt
    }

    pub fn preceq_ct(&self) -> &Preorder {
        &self.preceq_ct
    }

    /// `⪯_NT ∪ ⪯_CT`
    pub fn preceq_t(&self) -> &Preorder {
        &self.preceq_t
    }
}

fn check_edges(
    edges: &BTreeSet<(TypeName, TypeName)>,
    ground: &BTreeSet<TypeName>,
    kind: &'static str,
) -> Result<(), SchemaError> {
    for (sub, sup) in edges {
        if !ground.contains(sub) || !ground.contains(sup) {
            return Err(SchemaError::IllTypedInheritance {
                sub: sub.clone(),
                sup: sup.clone(),
                kind,
            });
        }
    }
    Ok(())
}

impl fmt::Display for TypeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CROM")?;
        writeln!(f, "  NT: {}", braced(&self.natural_types))?;
        writeln!(f, "  RT: {}", braced(&self.role_types))?;
        writeln!(f, "  CT: {}", braced(&self.compartment_types))?;
        writeln!(f, "  RST: {}", braced(&self.relationship_types))?;
        writeln!(f, "  fills: {}", braced(&self.fills))?;
        let rel = self.relationships.iter().map(|((rst, ct), ends)| {
            format!("({rst}, {ct}) -> ({}, {})", ends.source, ends.target)
        });
        write!(f, "  rel: {}", braced(rel))?;
        if let Some(inh) = &self.inheritance {
            let pairs = |edges: &BTreeSet<(TypeName, TypeName)>| {
                braced(edges.iter().map(|(a, b)| format!("({a}, {b})")))
            };
            writeln!(f)?;
            writeln!(f, "  prec_NT: {}", pairs(&inh.natural))?;
            write!(f, "  prec_CT: {}", pairs(&inh.compartment))?;
        }
        Ok(())
    }
}
