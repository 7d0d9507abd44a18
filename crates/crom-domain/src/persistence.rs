//! Projection of a schema and its constraint model onto a persisted sub-vocabulary.
//!
//! A [`PersistenceAnnotation`] anchors the types and relationship mappings that must be stored.
//! [`transformation`] closes the anchors under the guaranteed-existence rules of the constraint
//! model and builds the derived schema and constraint model; [`restriction`] projects an
//! instance onto any schema. Restricting onto the derived schema persists an instance; restricting
//! the result onto the original schema lifts it back.

use crate::canonical::braced;
use crate::closure::Preorder;
use crate::constraint::{ConstraintModel, RelationshipCardinality, RoleConstraint};
use crate::error::PersistenceError;
use crate::instance::{Instance, InstanceDecl, Link, LinkKey, Play};
use crate::schema::{
    Fulfillment, Inheritance, RelationshipEnds, RelationshipKey, SchemaDecl, TypeSchema,
};
use crom_types::{ObjectId, TypeName};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, trace};

/// Role types guaranteed to exist in every compartment of a type.
pub type GuaranteedRoles = BTreeMap<TypeName, BTreeSet<TypeName>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistenceAnnotation {
    nt: BTreeSet<TypeName>,
    rt: BTreeSet<TypeName>,
    ct: BTreeSet<TypeName>,
    rel: BTreeSet<RelationshipKey>,
}

impl PersistenceAnnotation {
    pub fn new(
        schema: &TypeSchema,
        nt: BTreeSet<TypeName>,
        rt: BTreeSet<TypeName>,
        ct: BTreeSet<TypeName>,
        rel: BTreeSet<RelationshipKey>,
    ) -> Result<Self, PersistenceError> {
        anchored_in(&nt, schema.natural_types(), "natural type")?;
        anchored_in(&rt, schema.role_types(), "role type")?;
        anchored_in(&ct, schema.compartment_types(), "compartment type")?;
        if let Some((rst, c)) = rel.iter().find(|k| !schema.relationships().contains_key(*k)) {
            return Err(PersistenceError::UnknownAnchor {
                kind: "relationship mapping",
                name: format!("({rst}, {c})"),
            });
        }
        Ok(Self { nt, rt, ct, rel })
    }

    pub fn nt(&self) -> &BTreeSet<TypeName> {
        &self.nt
    }

    pub fn rt(&self) -> &BTreeSet<TypeName> {
        &self.rt
    }

    pub fn ct(&self) -> &BTreeSet<TypeName> {
        &self.ct
    }

    pub fn rel(&self) -> &BTreeSet<RelationshipKey> {
        &self.rel
    }

    /// Least set of fulfillments containing the anchored ones and closed under the extension
    /// rules.
    pub fn compute_fills(
        &self,
        schema: &TypeSchema,
        model: &ConstraintModel,
        ext: &GuaranteedRoles,
    ) -> BTreeSet<Fulfillment> {
        let fills = schema.fills();
        let mut result: BTreeSet<Fulfillment> = BTreeSet::new();

        // CTSel
        result.extend(fills.iter().filter(|f| self.ct.contains(&f.compartment)).cloned());
        // RTSel
        result.extend(fills.iter().filter(|f| self.rt.contains(&f.role)).cloned());
        // RSTSelLeft, RSTSelRight
        for (rst, ct) in &self.rel {
            if let Some(ends) = schema.relationship(rst, ct) {
                result.extend(
                    fills
                        .iter()
                        .filter(|f| {
                            &f.compartment == ct && (f.role == ends.source || f.role == ends.target)
                        })
                        .cloned(),
                );
            }
        }

        let guaranteed =
            |ct: &TypeName, rt: &TypeName| ext.get(ct).is_some_and(|s| s.contains(rt));
        let order = schema.preceq_ct();
        let below = |sub: &TypeName, sup: &TypeName| sub != sup && order.contains(sub, sup);
        let mut rounds = 0usize;
        loop {
            let additions: Vec<Fulfillment> = {
                let kept_cts: BTreeSet<&TypeName> =
                    result.iter().map(|f| &f.compartment).collect();
                let kept_groups: BTreeSet<(&TypeName, &TypeName)> =
                    result.iter().map(|f| (&f.compartment, &f.role)).collect();
                let ct_fillers: BTreeSet<&TypeName> = result
                    .iter()
                    .map(|f| &f.filler)
                    .filter(|t| schema.is_compartment_type(t))
                    .collect();
                fills
                    .iter()
                    .filter(|f| !result.contains(*f))
                    .filter(|f| {
                        let (ct, rt) = (&f.compartment, &f.role);
                        // CTExt: a compartment type kept as a filler keeps its guaranteed roles,
                        // and so does every compartment type below it.
                        let ct_ext = guaranteed(ct, rt)
                            && ct_fillers.iter().any(|&x| order.contains(ct, x));
                        // OccurExt: a compartment type with a kept part keeps its guaranteed roles.
                        let occur_ext = guaranteed(ct, rt) && kept_cts.contains(&ct);
                        let rel_ext = kept_groups.iter().any(|&(c, kept)| {
                            c == ct && mandatory_partner(schema, model, ct, kept, rt)
                        });
                        // A role kept in a compartment type is kept in every owner above it.
                        let inherit_up =
                            kept_groups.iter().any(|&(c, kept)| kept == rt && below(c, ct));
                        // ...and in every retained compartment type below it. Subtypes of a
                        // retained compartment-type filler count as retained.
                        let retained = kept_cts.contains(&ct)
                            || ct_fillers.iter().any(|&x| kept_cts.contains(&x) && below(ct, x));
                        let inherit_down = retained
                            && kept_groups.iter().any(|&(c, kept)| kept == rt && below(ct, c));
                        // A compartment-type filler above a retained compartment type is kept
                        // whole.
                        let filler_up =
                            ct_fillers.contains(&ct) && kept_cts.iter().any(|&c| below(c, ct));
                        ct_ext || occur_ext || rel_ext || inherit_up || inherit_down || filler_up
                    })
                    .cloned()
                    .collect()
            };
            rounds += 1;
            if additions.is_empty() {
                trace!(rounds, size = result.len(), "fills reached fixpoint");
                return result;
            }
            result.extend(additions);
        }
    }

    /// Relationship mappings of the projection.
    ///
    /// A retained compartment type inherits the kept mappings of the compartment types above it.
    pub fn compute_rel(
        &self,
        schema: &TypeSchema,
        model: &ConstraintModel,
        fills: &BTreeSet<Fulfillment>,
    ) -> BTreeMap<RelationshipKey, RelationshipEnds> {
        let present = |ct: &TypeName, rt: &TypeName| {
            fills.iter().any(|f| &f.compartment == ct && &f.role == rt)
        };
        let mut rel: BTreeMap<RelationshipKey, RelationshipEnds> = schema
            .relationships()
            .iter()
            .filter(|(key, ends)| {
                let (_, ct) = key;
                // RelSel, RelInCT
                let anchored = self.rel.contains(*key) || self.ct.contains(ct);
                // RelExt; `fills` is already closed, so one pass suffices.
                let extended = model.cardinalities.get(*key).is_some_and(|card| {
                    card.is_mandatory() && present(ct, &ends.source) && present(ct, &ends.target)
                });
                anchored || extended
            })
            .map(|(key, ends)| (key.clone(), ends.clone()))
            .collect();

        let retained: BTreeSet<&TypeName> = fills.iter().map(|f| &f.compartment).collect();
        let inherited: Vec<(RelationshipKey, RelationshipEnds)> = schema
            .relationships()
            .iter()
            .filter(|((rst, sub), _)| {
                retained.contains(sub)
                    && rel.keys().any(|(kept, sup)| {
                        kept == rst && sup != sub && schema.preceq_ct().contains(sub, sup)
                    })
            })
            .map(|(key, ends)| (key.clone(), ends.clone()))
            .collect();
        rel.extend(inherited);
        rel
    }

    /// Role constraints whose compartment type is kept and whose atoms are all kept parts of it.
    pub fn compute_occur(
        &self,
        model: &ConstraintModel,
        fills: &BTreeSet<Fulfillment>,
    ) -> BTreeMap<TypeName, Vec<RoleConstraint>> {
        let mut occur = BTreeMap::new();
        for (ct, list) in &model.role_constraints {
            let parts: BTreeSet<&TypeName> = fills
                .iter()
                .filter(|f| &f.compartment == ct)
                .map(|f| &f.role)
                .collect();
            if parts.is_empty() {
                continue;
            }
            let kept: Vec<RoleConstraint> = list
                .iter()
                .filter(|rc| rc.expr.atoms().is_subset(&parts))
                .cloned()
                .collect();
            if !kept.is_empty() {
                occur.insert(ct.clone(), kept);
            }
        }
        occur
    }

    pub fn compute_card(
        &self,
        model: &ConstraintModel,
        rel: &BTreeMap<RelationshipKey, RelationshipEnds>,
    ) -> BTreeMap<RelationshipKey, RelationshipCardinality> {
        model
            .cardinalities
            .iter()
            .filter(|(key, _)| rel.contains_key(*key))
            .map(|(key, card)| (key.clone(), *card))
            .collect()
    }
}

fn anchored_in(
    anchors: &BTreeSet<TypeName>,
    declared: &BTreeSet<TypeName>,
    kind: &'static str,
) -> Result<(), PersistenceError> {
    match anchors.difference(declared).next() {
        Some(name) => Err(PersistenceError::UnknownAnchor {
            kind,
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}

/// Keeping `(_, ct, kept)` forces keeping `(_, ct, other)`: some relationship of `ct` links the
/// two with a mandatory bound on the side of `kept`.
fn mandatory_partner(
    schema: &TypeSchema,
    model: &ConstraintModel,
    ct: &TypeName,
    kept: &TypeName,
    other: &TypeName,
) -> bool {
    model
        .cardinalities
        .iter()
        .filter(|((_, key_ct), _)| key_ct == ct)
        .any(|((rst, _), card)| match schema.relationship(rst, ct) {
            // RelExtLeft: every source needs a successor.
            Some(ends) if &ends.source == kept && &ends.target == other => {
                card.succ.is_mandatory()
            }
            // RelExtRight: every target needs a predecessor.
            Some(ends) if &ends.target == kept && &ends.source == other => {
                card.pred.is_mandatory()
            }
            _ => false,
        })
}

impl fmt::Display for PersistenceAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PersistenceAnnotation")?;
        writeln!(f, "  NT: {}", braced(&self.nt))?;
        writeln!(f, "  RT: {}", braced(&self.rt))?;
        writeln!(f, "  CT: {}", braced(&self.ct))?;
        let rel = self.rel.iter().map(|(rst, ct)| format!("({rst}, {ct})"));
        write!(f, "  rel: {}", braced(rel))
    }
}

/// `ct ↦ {rt ∈ parts(ct) | rt occurs in some (i..j, e) ∈ rolec(ct') with ct ⪯_CT ct', i ≥ 1}`
///
/// Every atom of a mandatory group counts, even though one of them may be enough to satisfy it.
pub fn compute_ext(schema: &TypeSchema, model: &ConstraintModel) -> GuaranteedRoles {
    schema
        .compartment_types()
        .iter()
        .map(|ct| {
            let parts = schema.parts(ct);
            let roles = schema
                .preceq_ct()
                .supertypes(ct)
                .flat_map(|sup| model.role_constraints_of(sup))
                .filter(|rc| rc.cardinality.is_mandatory())
                .flat_map(|rc| rc.expr.atoms())
                .filter(|rt| parts.contains(rt))
                .cloned()
                .collect();
            (ct.clone(), roles)
        })
        .collect()
}

/// The derived schema and constraint model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pub schema: TypeSchema,
    pub constraints: ConstraintModel,
}

/// Projects `schema` and `model` onto what `annotation` anchors.
///
/// The derived schema keeps the variant of `schema`, with `⪯` restricted to the retained types.
/// Global constraints are not carried over.
pub fn transformation(
    schema: &TypeSchema,
    model: &ConstraintModel,
    annotation: &PersistenceAnnotation,
) -> Result<Projection, PersistenceError> {
    if !schema.wellformed() {
        return Err(PersistenceError::Precondition("schema is not well-formed"));
    }
    if !model.compliant(schema) {
        return Err(PersistenceError::Precondition(
            "constraint model is not compliant with the schema",
        ));
    }

    let ext = compute_ext(schema, model);
    let fills = annotation.compute_fills(schema, model, &ext);
    let rel = annotation.compute_rel(schema, model, &fills);

    let compartment_types: BTreeSet<TypeName> =
        fills.iter().map(|f| f.compartment.clone()).collect();
    let role_types: BTreeSet<TypeName> = fills.iter().map(|f| f.role.clone()).collect();
    // Fillers that are not retained compartment types, with everything below them.
    let mut natural_types = annotation.nt.clone();
    for f in &fills {
        natural_types.extend(
            schema
                .preceq_t()
                .subtypes(&f.filler)
                .filter(|t| !compartment_types.contains(*t))
                .cloned(),
        );
    }
    let relationship_types: BTreeSet<TypeName> = rel.keys().map(|(rst, _)| rst.clone()).collect();

    let constraints = ConstraintModel {
        role_constraints: annotation.compute_occur(model, &fills),
        cardinalities: annotation.compute_card(model, &rel),
        intra: model
            .intra
            .iter()
            .filter(|ic| rel.contains_key(&ic.key()))
            .cloned()
            .collect(),
        inter: model
            .inter
            .iter()
            .filter(|ic| {
                rel.contains_key(&(ic.first.clone(), ic.compartment_type.clone()))
                    && rel.contains_key(&(ic.second.clone(), ic.compartment_type.clone()))
            })
            .cloned()
            .collect(),
        global: Vec::new(),
    };

    debug!(
        fills = fills.len(),
        rel = rel.len(),
        natural_types = natural_types.len(),
        compartment_types = compartment_types.len(),
        "persistence projection computed"
    );

    let inheritance = schema.inheritance().map(|_| Inheritance {
        natural: restricted(schema.preceq_t(), &natural_types),
        compartment: restricted(schema.preceq_ct(), &compartment_types),
    });
    let schema = TypeSchema::new(SchemaDecl {
        natural_types,
        role_types,
        compartment_types,
        relationship_types,
        fills,
        relationships: rel,
        inheritance,
    })?;

    Ok(Projection {
        schema,
        constraints,
    })
}

/// Non-reflexive pairs of `order` between members of `kept`.
fn restricted(order: &Preorder, kept: &BTreeSet<TypeName>) -> BTreeSet<(TypeName, TypeName)> {
    order
        .pairs()
        .iter()
        .filter(|(sub, sup)| sub != sup && kept.contains(sub) && kept.contains(sup))
        .cloned()
        .collect()
}

/// Projects `instance` onto `schema`.
///
/// Keeps the plays `schema` types and the links whose key is mapped in `schema` and whose
/// non-empty ends are kept roles of the mapped types. Players of a compartment type of `schema`
/// become compartments, every other player a natural.
pub fn restriction(schema: &TypeSchema, instance: &Instance) -> Result<Instance, PersistenceError> {
    let plays: BTreeSet<Play> = instance
        .plays()
        .iter()
        .filter(|p| {
            match (
                instance.type_of(&p.player),
                instance.type_of(&p.compartment),
                instance.type_of(&p.role),
            ) {
                (Some(to), Some(tc), Some(tr)) => schema.admits_play(to, tc, tr),
                _ => false,
            }
        })
        .cloned()
        .collect();

    let roles: BTreeSet<ObjectId> = plays.iter().map(|p| p.role.clone()).collect();
    let mut compartments: BTreeSet<ObjectId> =
        plays.iter().map(|p| p.compartment.clone()).collect();
    compartments.extend(
        plays
            .iter()
            .filter(|p| {
                instance
                    .type_of(&p.player)
                    .is_some_and(|t| schema.is_compartment_type(t))
            })
            .map(|p| p.player.clone()),
    );
    let naturals: BTreeSet<ObjectId> = plays
        .iter()
        .map(|p| &p.player)
        .filter(|o| !compartments.contains(*o))
        .cloned()
        .collect();

    let mut links: BTreeMap<LinkKey, BTreeSet<Link>> = BTreeMap::new();
    for ((rst, c), set) in instance.all_links() {
        if !compartments.contains(c) {
            continue;
        }
        let Some(ends) = instance.type_of(c).and_then(|ct| schema.relationship(rst, ct)) else {
            continue;
        };
        let keeps = |end: Option<&ObjectId>, rt: &TypeName| match end {
            None => true,
            Some(r) => roles.contains(r) && instance.type_of(r) == Some(rt),
        };
        let kept: BTreeSet<Link> = set
            .iter()
            .filter(|l| {
                keeps(l.source.as_ref(), &ends.source) && keeps(l.target.as_ref(), &ends.target)
            })
            .cloned()
            .collect();
        if !kept.is_empty() {
            links.insert((rst.clone(), c.clone()), kept);
        }
    }

    let types: BTreeMap<ObjectId, TypeName> = instance
        .types()
        .iter()
        .filter(|(o, _)| naturals.contains(*o) || roles.contains(*o) || compartments.contains(*o))
        .map(|(o, t)| (o.clone(), t.clone()))
        .collect();

    trace!(
        plays = plays.len(),
        dropped = instance.plays().len() - plays.len(),
        "instance restricted"
    );

    Ok(Instance::new(InstanceDecl {
        naturals,
        roles,
        compartments,
        types,
        plays,
        links,
    })?)
}
