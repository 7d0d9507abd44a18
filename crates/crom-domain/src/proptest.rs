//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Reflexive transitive closure of inheritance edges
//! - Threshold evaluation of role groups
//! - Monotonicity and soundness of persistence projections

use crate::closure::Preorder;
use crate::constraint::{ConstraintModel, RelationshipCardinality, RoleConstraint};
use crate::expr::{RoleExpression, evaluate};
use crate::instance::{Instance, InstanceDecl};
use crate::persistence::{PersistenceAnnotation, compute_ext, restriction, transformation};
use crate::test_support::{
    fire_alarm_constraints, fire_alarm_decl, fire_alarm_instance, fire_alarm_schema, ids, leaf,
    plays, typing,
};
use crom_types::{Bound, Interval, ObjectId, TypeName};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies
// ============================================================================

const GROUND: [&str; 5] = ["A", "B", "C", "D", "E"];

fn arb_edges() -> impl Strategy<Value = BTreeSet<(TypeName, TypeName)>> {
    prop::collection::btree_set((0..GROUND.len(), 0..GROUND.len()), 0..8).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(a, b)| (GROUND[a].into(), GROUND[b].into()))
            .collect()
    })
}

fn ground() -> BTreeSet<TypeName> {
    GROUND.iter().map(|s| TypeName::from(*s)).collect()
}

/// Any subset of `universe`.
fn arb_subset(universe: &'static [&'static str]) -> impl Strategy<Value = BTreeSet<TypeName>> {
    prop::collection::vec(any::<bool>(), universe.len()).prop_map(move |mask| {
        universe
            .iter()
            .zip(mask)
            .filter(|(_, keep)| *keep)
            .map(|(name, _)| TypeName::from(*name))
            .collect()
    })
}

const FA_NATURALS: &[&str] = &["SD", "C", "P", "S"];
const FA_ROLES: &[&str] = &["FD", "AP", "A", "FBS", "Sensor", "Actuator"];
const FA_COMPARTMENTS: &[&str] = &["FA", "R"];
const FA_RELATIONSHIPS: &[&str] = &["detectors", "announcers", "feedback"];

#[derive(Clone, Debug)]
struct Anchors {
    nt: BTreeSet<TypeName>,
    rt: BTreeSet<TypeName>,
    ct: BTreeSet<TypeName>,
    rel: BTreeSet<TypeName>,
}

impl Anchors {
    fn union(&self, other: &Anchors) -> Anchors {
        Anchors {
            nt: self.nt.union(&other.nt).cloned().collect(),
            rt: self.rt.union(&other.rt).cloned().collect(),
            ct: self.ct.union(&other.ct).cloned().collect(),
            rel: self.rel.union(&other.rel).cloned().collect(),
        }
    }

    fn annotate(&self) -> PersistenceAnnotation {
        // every fire alarm relationship lives in FA
        let rel = self
            .rel
            .iter()
            .map(|rst| (rst.clone(), TypeName::from("FA")))
            .collect();
        PersistenceAnnotation::new(
            &fire_alarm_schema(),
            self.nt.clone(),
            self.rt.clone(),
            self.ct.clone(),
            rel,
        )
        .expect("fire alarm anchors")
    }
}

fn arb_anchors() -> impl Strategy<Value = Anchors> {
    (
        arb_subset(FA_NATURALS),
        arb_subset(FA_ROLES),
        arb_subset(FA_COMPARTMENTS),
        arb_subset(FA_RELATIONSHIPS),
    )
        .prop_map(|(nt, rt, ct, rel)| Anchors { nt, rt, ct, rel })
}

fn arb_interval() -> impl Strategy<Value = Interval> {
    (0u64..4, prop::option::of(0u64..4)).prop_map(|(lower, extra)| match extra {
        Some(extra) => Interval::new(lower, Bound::Finite(lower + extra)).expect("ordered"),
        None => Interval::at_least(lower),
    })
}

/// Fire alarm where every `R` needs a participant playing exactly one of `Sensor`, `Actuator`.
/// The empty `r2` is dropped so the instance stays valid.
fn grouped_fire_alarm() -> (ConstraintModel, Instance) {
    let mut model = fire_alarm_constraints();
    let either = RoleExpression::threshold(
        vec![leaf("Sensor"), leaf("Actuator")],
        1,
        Bound::Finite(1),
    )
    .expect("group");
    model.role_constraints.insert(
        "R".into(),
        vec![RoleConstraint::new(Interval::at_least(1), either)],
    );

    let mut decl = fire_alarm_decl();
    decl.compartments.remove(&ObjectId::from("r2"));
    decl.types.remove(&ObjectId::from("r2"));
    (model, Instance::new(decl).expect("grouped fire alarm"))
}

const GROUP: [&str; 4] = ["R1", "R2", "R3", "R4"];

/// `o` plays one role of each chosen type inside `c`.
fn player_of(chosen: &[bool]) -> Instance {
    let mut decl = InstanceDecl {
        naturals: ids(["o"]),
        compartments: ids(["c"]),
        types: typing(&[("o", "N"), ("c", "C")]),
        ..InstanceDecl::default()
    };
    for (rt, _) in GROUP.iter().zip(chosen).filter(|(_, on)| **on) {
        let role = format!("r.{rt}");
        decl.roles.insert(ObjectId::from(role.as_str()));
        decl.types.insert(ObjectId::from(role.as_str()), TypeName::from(*rt));
        decl.plays.extend(plays(&[("o", "c", role.as_str())]));
    }
    Instance::new(decl).expect("player instance")
}

// ============================================================================
// Closure laws
// ============================================================================

proptest! {
    #[test]
    fn closure_is_reflexive_and_contains_edges(edges in arb_edges()) {
        let order = Preorder::from_edges(&edges, &ground());
        for t in ground() {
            prop_assert!(order.contains(&t, &t));
        }
        for (a, b) in &edges {
            prop_assert!(order.contains(a, b));
        }
    }

    #[test]
    fn closure_is_transitive(edges in arb_edges()) {
        let order = Preorder::from_edges(&edges, &ground());
        for (a, b) in order.pairs() {
            for (b2, c) in order.pairs() {
                if b == b2 {
                    prop_assert!(order.contains(a, c), "missing ({a}, {c})");
                }
            }
        }
    }

    #[test]
    fn closure_is_idempotent(edges in arb_edges()) {
        let once = Preorder::from_edges(&edges, &ground());
        let twice = Preorder::from_edges(once.pairs(), &ground());
        prop_assert_eq!(once.pairs(), twice.pairs());
    }
}

// ============================================================================
// Role expressions
// ============================================================================

proptest! {
    /// A group of leaves holds exactly when the number of played children is within bounds.
    #[test]
    fn threshold_counts_played_children(
        chosen in prop::collection::vec(any::<bool>(), GROUP.len()),
        lower in 0u64..5,
        extra in 0u64..3,
    ) {
        let instance = player_of(&chosen);
        let expr = RoleExpression::threshold(
            GROUP.iter().map(|rt| RoleExpression::leaf(*rt)).collect(),
            lower,
            Bound::Finite(lower + extra),
        )
        .expect("group");

        let played = chosen.iter().filter(|on| **on).count() as u64;
        let expected = u64::from(lower <= played && played <= lower + extra);
        let o = ObjectId::from("o");
        prop_assert_eq!(evaluate(&expr, &instance, &o, Some(&ObjectId::from("c"))), expected);
        // leaves see nothing outside a compartment
        prop_assert_eq!(evaluate(&expr, &instance, &o, None), u64::from(lower == 0));
    }

    /// Negation through a `0..0` group flips the inner result.
    #[test]
    fn zero_group_negates(chosen in prop::collection::vec(any::<bool>(), GROUP.len())) {
        let instance = player_of(&chosen);
        let inner = RoleExpression::leaf("R1");
        let negated = RoleExpression::threshold(vec![inner.clone()], 0, Bound::Finite(0))
            .expect("negation");
        let o = ObjectId::from("o");
        let c = ObjectId::from("c");
        prop_assert_eq!(
            evaluate(&inner, &instance, &o, Some(&c)) + evaluate(&negated, &instance, &o, Some(&c)),
            1
        );
    }
}

// ============================================================================
// Validity and persistence
// ============================================================================

proptest! {
    /// Nothing to count, so no bound can be violated.
    #[test]
    fn empty_instance_is_valid_under_any_bounds(
        fd in arb_interval(),
        ap in arb_interval(),
        pred in arb_interval(),
        succ in arb_interval(),
    ) {
        let schema = fire_alarm_schema();
        let mut model: ConstraintModel = fire_alarm_constraints();
        if let Some(list) = model.role_constraints.get_mut(&TypeName::from("FA")) {
            list[0].cardinality = fd;
            list[1].cardinality = ap;
        }
        model.cardinalities.insert(
            ("detectors".into(), "FA".into()),
            RelationshipCardinality::new(pred, succ),
        );
        prop_assert!(model.validity(&schema, &Instance::empty()));
    }

    /// Anchoring more never keeps fewer fulfillments.
    #[test]
    fn compute_fills_is_monotone(a in arb_anchors(), b in arb_anchors()) {
        let schema = fire_alarm_schema();
        let model = fire_alarm_constraints();
        let ext = compute_ext(&schema, &model);

        let small = a.annotate().compute_fills(&schema, &model, &ext);
        let large = a.union(&b).annotate().compute_fills(&schema, &model, &ext);
        prop_assert!(small.is_subset(&large));
    }

    /// The persisted part of a valid instance is valid for the projection, and lifting it back
    /// is valid for the full schema. The grouped model guarantees `R` roles through a group
    /// rather than a single leaf.
    #[test]
    fn projection_preserves_validity(anchors in arb_anchors(), grouped in any::<bool>()) {
        let schema = fire_alarm_schema();
        let (model, instance) = if grouped {
            grouped_fire_alarm()
        } else {
            (fire_alarm_constraints(), fire_alarm_instance())
        };
        prop_assert!(model.validity(&schema, &instance));
        let annotation = anchors.annotate();

        let projection = transformation(&schema, &model, &annotation).expect("projection");
        prop_assert!(projection.schema.wellformed(), "{}", annotation);
        prop_assert!(projection.constraints.compliant(&projection.schema), "{}", annotation);

        let persisted = restriction(&projection.schema, &instance).expect("restricted");
        prop_assert!(
            projection.constraints.validity(&projection.schema, &persisted),
            "{}",
            annotation
        );

        let lifted = restriction(&schema, &persisted).expect("lifted");
        prop_assert!(model.validity(&schema, &lifted), "{}", annotation);
    }
}
