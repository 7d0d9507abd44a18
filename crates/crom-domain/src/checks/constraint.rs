//! Compliance of a constraint model with a schema, and validity of instances against it.

use crate::constraint::{ConstraintModel, InterOperator};
use crate::error::LookupError;
use crate::expr::Evaluator;
use crate::instance::Instance;
use crate::schema::TypeSchema;
use crom_types::{ObjectId, TypeName, ids};
use std::collections::BTreeSet;
use tracing::debug;

impl ConstraintModel {
    /// Role constraints sit on compartment types and only name roles those types own.
    pub fn check_role_constraint_atoms(&self, schema: &TypeSchema) -> bool {
        self.role_constraints.iter().all(|(ct, list)| {
            if !schema.is_compartment_type(ct) {
                return false;
            }
            let owned = schema.owned_roles(ct);
            list.iter()
                .all(|rc| rc.expr.atoms().iter().all(|rt| owned.contains(*rt)))
        })
    }

    pub fn check_cardinality_domain(&self, schema: &TypeSchema) -> bool {
        self.cardinalities
            .keys()
            .all(|key| schema.relationships().contains_key(key))
    }

    pub fn check_intra_domain(&self, schema: &TypeSchema) -> bool {
        self.intra
            .iter()
            .all(|ic| schema.relationships().contains_key(&ic.key()))
    }

    pub fn check_inter_domain(&self, schema: &TypeSchema) -> bool {
        self.inter.iter().all(|ic| {
            ic.first != ic.second
                && schema.relationship(&ic.first, &ic.compartment_type).is_some()
                && schema.relationship(&ic.second, &ic.compartment_type).is_some()
        })
    }

    /// Global expressions only reach roles through a quantifier over a compartment type owning
    /// them.
    pub fn check_global_constraints_quantified(&self, schema: &TypeSchema) -> bool {
        let owns = |ct: &TypeName, rt: &TypeName| {
            schema.is_compartment_type(ct) && schema.owned_roles(ct).contains(rt)
        };
        self.global.iter().all(|g| g.is_quantified_closed(&owns))
    }

    pub fn model_axioms(&self, schema: &TypeSchema) -> Vec<(&'static str, bool)> {
        vec![
            (
                ids::CHECK_MODEL_ROLE_CONSTRAINT_ATOMS,
                self.check_role_constraint_atoms(schema),
            ),
            (
                ids::CHECK_MODEL_CARDINALITY_DOMAIN,
                self.check_cardinality_domain(schema),
            ),
            (ids::CHECK_MODEL_INTRA_DOMAIN, self.check_intra_domain(schema)),
            (ids::CHECK_MODEL_INTER_DOMAIN, self.check_inter_domain(schema)),
            (
                ids::CHECK_MODEL_GLOBAL_QUANTIFIED,
                self.check_global_constraints_quantified(schema),
            ),
        ]
    }

    /// The schema is well-formed and this model only refers to what the schema declares.
    pub fn compliant(&self, schema: &TypeSchema) -> bool {
        schema.wellformed() && super::all_hold("constraint model", self.model_axioms(schema))
    }

    pub fn check_role_cardinality(&self, schema: &TypeSchema, instance: &Instance) -> bool {
        let eval = Evaluator::with_schema(instance, schema);
        instance.compartments().iter().all(|c| {
            let participants = instance.participants(c);
            supertypes_of(schema, instance, c).into_iter().all(|ct| {
                self.role_constraints_of(ct).iter().all(|rc| {
                    let count = participants
                        .iter()
                        .filter(|o| eval.holds(&rc.expr, o, Some(c)))
                        .count() as u64;
                    rc.cardinality.contains(count)
                })
            })
        })
    }

    /// A player of an atom of a role constraint satisfies that constraint itself.
    pub fn check_role_implication(&self, schema: &TypeSchema, instance: &Instance) -> bool {
        let eval = Evaluator::with_schema(instance, schema);
        instance.plays().iter().all(|p| {
            let Some(rt) = instance.type_of(&p.role) else {
                return false;
            };
            supertypes_of(schema, instance, &p.compartment)
                .into_iter()
                .all(|ct| {
                    self.role_constraints_of(ct)
                        .iter()
                        .filter(|rc| rc.expr.atoms().contains(rt))
                        .all(|rc| eval.holds(&rc.expr, &p.player, Some(&p.compartment)))
                })
        })
    }

    pub fn check_relationship_cardinality(
        &self,
        schema: &TypeSchema,
        instance: &Instance,
    ) -> bool {
        instance.compartments().iter().all(|c| {
            supertypes_of(schema, instance, c).into_iter().all(|ct| {
                self.cardinalities
                    .iter()
                    .filter(|((_, key_ct), _)| key_ct == ct)
                    .all(|((rst, _), card)| {
                        let Some(ends) = schema.relationship(rst, ct) else {
                            return true;
                        };
                        let preds_ok = instance
                            .roles_of_type(c, &ends.target)
                            .into_iter()
                            .all(|r| card.pred.contains(instance.pred(rst, c, r).len() as u64));
                        let succs_ok = instance
                            .roles_of_type(c, &ends.source)
                            .into_iter()
                            .all(|r| card.succ.contains(instance.succ(rst, c, r).len() as u64));
                        preds_ok && succs_ok
                    })
            })
        })
    }

    pub fn check_intra_constraints(&self, schema: &TypeSchema, instance: &Instance) -> bool {
        instance.all_links().keys().all(|(rst, c)| {
            supertypes_of(schema, instance, c).into_iter().all(|ct| {
                self.intra
                    .iter()
                    .filter(|ic| &ic.relationship == rst && &ic.compartment_type == ct)
                    .all(|ic| {
                        let Some(ends) = schema.relationship(rst, ct) else {
                            return false;
                        };
                        let sources = owned(instance.participants_of_type(c, &ends.source));
                        let targets = owned(instance.participants_of_type(c, &ends.target));
                        match instance.player_edges(rst, c) {
                            Ok(edges) => ic.predicate.holds(&sources, &targets, &edges),
                            Err(err) => unplayed(err),
                        }
                    })
            })
        })
    }

    pub fn check_inter_exclusion(&self, schema: &TypeSchema, instance: &Instance) -> bool {
        self.check_inter(schema, instance, InterOperator::Exclusion)
    }

    pub fn check_inter_implication(&self, schema: &TypeSchema, instance: &Instance) -> bool {
        self.check_inter(schema, instance, InterOperator::Implication)
    }

    // Only complete player pairs take part; links with an empty end are ignored on both sides.
    fn check_inter(&self, schema: &TypeSchema, instance: &Instance, op: InterOperator) -> bool {
        instance.compartments().iter().all(|c| {
            supertypes_of(schema, instance, c).into_iter().all(|ct| {
                self.inter
                    .iter()
                    .filter(|ic| ic.op == op && &ic.compartment_type == ct)
                    .all(|ic| {
                        let edges = instance
                            .player_edges(&ic.first, c)
                            .and_then(|first| Ok((first, instance.player_edges(&ic.second, c)?)));
                        match edges {
                            Ok((first, second)) => match op {
                                InterOperator::Exclusion => first.is_disjoint(&second),
                                InterOperator::Implication => first.is_subset(&second),
                            },
                            Err(err) => unplayed(err),
                        }
                    })
            })
        })
    }

    /// Every global expression holds for every natural and compartment object.
    pub fn check_global_constraints(&self, schema: &TypeSchema, instance: &Instance) -> bool {
        let eval = Evaluator::with_schema(instance, schema);
        instance
            .objects()
            .into_iter()
            .all(|o| self.global.iter().all(|g| eval.holds(g, o, None)))
    }

    pub fn validity_axioms(
        &self,
        schema: &TypeSchema,
        instance: &Instance,
    ) -> Vec<(&'static str, bool)> {
        vec![
            (
                ids::CHECK_VALIDITY_ROLE_CARDINALITY,
                self.check_role_cardinality(schema, instance),
            ),
            (
                ids::CHECK_VALIDITY_ROLE_IMPLICATION,
                self.check_role_implication(schema, instance),
            ),
            (
                ids::CHECK_VALIDITY_RELATIONSHIP_CARDINALITY,
                self.check_relationship_cardinality(schema, instance),
            ),
            (
                ids::CHECK_VALIDITY_INTRA,
                self.check_intra_constraints(schema, instance),
            ),
            (
                ids::CHECK_VALIDITY_INTER_EXCLUSION,
                self.check_inter_exclusion(schema, instance),
            ),
            (
                ids::CHECK_VALIDITY_INTER_IMPLICATION,
                self.check_inter_implication(schema, instance),
            ),
            (
                ids::CHECK_VALIDITY_GLOBAL,
                self.check_global_constraints(schema, instance),
            ),
        ]
    }

    /// This model is compliant, the instance is compliant, and every validity axiom holds.
    pub fn validity(&self, schema: &TypeSchema, instance: &Instance) -> bool {
        self.compliant(schema)
            && instance.compliant(schema)
            && super::all_hold("validity", self.validity_axioms(schema, instance))
    }
}

/// `{ct | type(c) ⪯_CT ct}`
fn supertypes_of<'a>(
    schema: &'a TypeSchema,
    instance: &'a Instance,
    c: &ObjectId,
) -> BTreeSet<&'a TypeName> {
    match instance.type_of(c) {
        Some(t) => schema.preceq_ct().supertypes(t).collect(),
        None => BTreeSet::new(),
    }
}

fn owned(players: BTreeSet<&ObjectId>) -> BTreeSet<ObjectId> {
    players.into_iter().cloned().collect()
}

fn unplayed(err: LookupError) -> bool {
    debug!(%err, "link end has no player; check fails");
    false
}
