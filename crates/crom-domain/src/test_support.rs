use crate::constraint::{
    ConstraintModel, InterConstraint, InterOperator, IntraConstraint, RelationshipCardinality,
    RoleConstraint,
};
use crate::expr::RoleExpression;
use crate::instance::{Instance, InstanceDecl, Link, Play};
use crate::relation::IntraPredicate;
use crate::schema::{Fulfillment, Inheritance, RelationshipEnds, SchemaDecl, TypeSchema};
use crom_types::{Bound, Interval, ObjectId, TypeName};
use std::collections::{BTreeMap, BTreeSet};

pub fn names<'a>(xs: impl IntoIterator<Item = &'a str>) -> BTreeSet<TypeName> {
    xs.into_iter().map(TypeName::from).collect()
}

pub fn ids<'a>(xs: impl IntoIterator<Item = &'a str>) -> BTreeSet<ObjectId> {
    xs.into_iter().map(ObjectId::from).collect()
}

pub fn fills(triples: &[(&str, &str, &str)]) -> BTreeSet<Fulfillment> {
    triples
        .iter()
        .map(|(t, ct, rt)| Fulfillment::new(*t, *ct, *rt))
        .collect()
}

pub fn rel(
    entries: &[(&str, &str, &str, &str)],
) -> BTreeMap<(TypeName, TypeName), RelationshipEnds> {
    entries
        .iter()
        .map(|(rst, ct, s, t)| (((*rst).into(), (*ct).into()), RelationshipEnds::new(*s, *t)))
        .collect()
}

pub fn edges(pairs: &[(&str, &str)]) -> BTreeSet<(TypeName, TypeName)> {
    pairs
        .iter()
        .map(|(a, b)| ((*a).into(), (*b).into()))
        .collect()
}

pub fn typing(entries: &[(&str, &str)]) -> BTreeMap<ObjectId, TypeName> {
    entries
        .iter()
        .map(|(o, t)| ((*o).into(), (*t).into()))
        .collect()
}

pub fn plays(triples: &[(&str, &str, &str)]) -> BTreeSet<Play> {
    triples
        .iter()
        .map(|(o, c, r)| Play::new(*o, *c, *r))
        .collect()
}

/// `""` is an empty end.
pub fn links(pairs: &[(&str, &str)]) -> BTreeSet<Link> {
    let end = |s: &str| (!s.is_empty()).then(|| ObjectId::from(s));
    pairs
        .iter()
        .map(|(s, t)| Link {
            source: end(*s),
            target: end(*t),
        })
        .collect()
}

pub fn at_least(n: u64) -> Interval {
    Interval::at_least(n)
}

pub fn between(lower: u64, upper: u64) -> Interval {
    Interval::new(lower, Bound::Finite(upper)).expect("interval")
}

pub fn leaf(rt: &str) -> RoleExpression {
    RoleExpression::leaf(rt)
}

pub fn group(children: Vec<RoleExpression>, lower: u64, upper: u64) -> RoleExpression {
    RoleExpression::threshold(children, lower, Bound::Finite(upper)).expect("group")
}

pub fn role_constraint(card: Interval, expr: RoleExpression) -> RoleConstraint {
    RoleConstraint::new(card, expr)
}

// ============================================================================
// Fire alarm (base variant)
// ============================================================================

pub fn fire_alarm_schema() -> TypeSchema {
    TypeSchema::new(SchemaDecl {
        natural_types: names(["SD", "C", "P", "S"]),
        role_types: names(["FD", "AP", "A", "FBS", "Sensor", "Actuator"]),
        compartment_types: names(["FA", "R"]),
        relationship_types: names(["detectors", "announcers", "feedback"]),
        fills: fills(&[
            ("SD", "R", "Sensor"),
            ("C", "R", "Sensor"),
            ("P", "R", "Actuator"),
            ("S", "R", "Actuator"),
            ("SD", "FA", "FD"),
            ("SD", "FA", "FBS"),
            ("C", "FA", "FD"),
            ("P", "FA", "A"),
            ("S", "FA", "A"),
            ("R", "FA", "AP"),
        ]),
        relationships: rel(&[
            ("detectors", "FA", "FD", "AP"),
            ("announcers", "FA", "AP", "A"),
            ("feedback", "FA", "AP", "FBS"),
        ]),
        inheritance: None,
    })
    .expect("fire alarm schema")
}

pub fn fire_alarm_constraints() -> ConstraintModel {
    let mut cm = ConstraintModel::default();
    cm.role_constraints.insert(
        "R".into(),
        vec![
            role_constraint(Interval::ANY, leaf("Sensor")),
            role_constraint(Interval::ANY, leaf("Actuator")),
        ],
    );
    cm.role_constraints.insert(
        "FA".into(),
        vec![
            role_constraint(at_least(1), leaf("FD")),
            role_constraint(at_least(1), leaf("AP")),
            role_constraint(at_least(1), leaf("A")),
            role_constraint(Interval::ANY, leaf("FBS")),
        ],
    );
    cm.cardinalities.insert(
        ("detectors".into(), "FA".into()),
        RelationshipCardinality::new(at_least(1), between(1, 1)),
    );
    cm.cardinalities.insert(
        ("announcers".into(), "FA".into()),
        RelationshipCardinality::new(between(1, 1), at_least(1)),
    );
    cm.cardinalities.insert(
        ("feedback".into(), "FA".into()),
        RelationshipCardinality::new(between(1, 1), Interval::ANY),
    );
    cm
}

pub fn fire_alarm_decl() -> InstanceDecl {
    InstanceDecl {
        naturals: ids(["sd1", "c1", "c2", "s1", "p1", "p2"]),
        roles: ids([
            "r1.s1", "r1.s2", "r1.s3", "r1.a1", "r1.a2", "r1.a3", "fa1.fd1", "fa1.fd2", "fa1.ap1",
            "fa1.a1", "fa1.a2", "fa1.fbs1",
        ]),
        compartments: ids(["r1", "r2", "fa1"]),
        types: typing(&[
            ("sd1", "SD"),
            ("c1", "C"),
            ("c2", "C"),
            ("s1", "S"),
            ("p1", "P"),
            ("p2", "P"),
            ("r1", "R"),
            ("r2", "R"),
            ("fa1", "FA"),
            ("r1.s1", "Sensor"),
            ("r1.s2", "Sensor"),
            ("r1.s3", "Sensor"),
            ("r1.a1", "Actuator"),
            ("r1.a2", "Actuator"),
            ("r1.a3", "Actuator"),
            ("fa1.fd1", "FD"),
            ("fa1.fd2", "FD"),
            ("fa1.ap1", "AP"),
            ("fa1.a1", "A"),
            ("fa1.a2", "A"),
            ("fa1.fbs1", "FBS"),
        ]),
        plays: plays(&[
            ("sd1", "r1", "r1.s1"),
            ("c1", "r1", "r1.s2"),
            ("c2", "r1", "r1.s3"),
            ("s1", "r1", "r1.a1"),
            ("p1", "r1", "r1.a2"),
            ("p2", "r1", "r1.a3"),
            ("sd1", "fa1", "fa1.fd1"),
            ("c1", "fa1", "fa1.fd2"),
            ("r1", "fa1", "fa1.ap1"),
            ("s1", "fa1", "fa1.a1"),
            ("p1", "fa1", "fa1.a2"),
            ("sd1", "fa1", "fa1.fbs1"),
        ]),
        links: [
            (
                ("detectors".into(), "fa1".into()),
                links(&[("fa1.fd1", "fa1.ap1"), ("fa1.fd2", "fa1.ap1")]),
            ),
            (
                ("announcers".into(), "fa1".into()),
                links(&[("fa1.ap1", "fa1.a1"), ("fa1.ap1", "fa1.a2")]),
            ),
            (
                ("feedback".into(), "fa1".into()),
                links(&[("fa1.ap1", "fa1.fbs1")]),
            ),
        ]
        .into(),
    }
}

pub fn fire_alarm_instance() -> Instance {
    Instance::new(fire_alarm_decl()).expect("fire alarm instance")
}

// ============================================================================
// Bank (inheritance variant)
// ============================================================================

pub fn bank_decl() -> SchemaDecl {
    SchemaDecl {
        natural_types: names(["Person", "Male", "Female", "Company", "Account"]),
        role_types: names([
            "Customer",
            "Consultant",
            "CA",
            "SA",
            "Source",
            "Target",
            "MoneyTransfer",
            "CC",
            "PremiumCustomer",
        ]),
        compartment_types: names(["Bank", "Transaction", "RetailBank", "BusinessBank"]),
        relationship_types: names(["own_ca", "own_sa", "advises", "trans", "own_cc"]),
        fills: fills(&[
            ("Person", "Bank", "Consultant"),
            ("Person", "Bank", "Customer"),
            ("Company", "Bank", "Customer"),
            ("Bank", "Bank", "Customer"),
            ("Account", "Bank", "CA"),
            ("Account", "Bank", "SA"),
            ("Transaction", "Bank", "MoneyTransfer"),
            ("Account", "Transaction", "Source"),
            ("Account", "Transaction", "Target"),
            ("Person", "RetailBank", "Customer"),
            ("Account", "RetailBank", "CC"),
            ("Account", "RetailBank", "SA"),
            ("Account", "RetailBank", "CA"),
            ("Person", "RetailBank", "Consultant"),
            ("Transaction", "RetailBank", "MoneyTransfer"),
            ("Company", "BusinessBank", "PremiumCustomer"),
            ("Company", "BusinessBank", "Customer"),
            ("Bank", "BusinessBank", "PremiumCustomer"),
            ("Bank", "BusinessBank", "Customer"),
            ("Account", "BusinessBank", "SA"),
            ("Account", "BusinessBank", "CA"),
            ("Person", "BusinessBank", "Consultant"),
            ("Transaction", "BusinessBank", "MoneyTransfer"),
        ]),
        relationships: rel(&[
            ("own_sa", "Bank", "Customer", "SA"),
            ("own_ca", "Bank", "Customer", "CA"),
            ("advises", "Bank", "Consultant", "Customer"),
            ("trans", "Transaction", "Source", "Target"),
            ("own_cc", "RetailBank", "Customer", "CC"),
            ("own_sa", "RetailBank", "Customer", "SA"),
            ("own_ca", "RetailBank", "Customer", "CA"),
            ("advises", "RetailBank", "Consultant", "Customer"),
            ("own_sa", "BusinessBank", "Customer", "SA"),
            ("own_ca", "BusinessBank", "Customer", "CA"),
            ("advises", "BusinessBank", "Consultant", "Customer"),
        ]),
        inheritance: None,
    }
}

pub fn bank_inheritance() -> Inheritance {
    Inheritance {
        natural: edges(&[("Male", "Person"), ("Female", "Person")]),
        compartment: edges(&[("RetailBank", "Bank"), ("BusinessBank", "Bank")]),
    }
}

pub fn bank_schema() -> TypeSchema {
    TypeSchema::with_inheritance(bank_decl(), bank_inheritance()).expect("bank schema")
}

/// Someone involved in a transaction holds an account at some bank.
pub fn existential_implication() -> RoleExpression {
    let pa = group(vec![leaf("Source"), leaf("Target")], 1, 1);
    let ba = group(vec![leaf("CA"), leaf("SA")], 1, 1);
    let l = RoleExpression::quantified("Transaction", 1, Bound::Unbounded, pa).expect("l");
    let r = RoleExpression::quantified("Bank", 1, Bound::Unbounded, ba).expect("r");
    group(vec![group(vec![l], 0, 0), r], 1, 2)
}

pub fn bank_constraints() -> ConstraintModel {
    let bank_accounts = group(vec![leaf("CA"), leaf("SA")], 1, 1);
    let participants = group(vec![leaf("Source"), leaf("Target")], 1, 1);
    let retail_accounts = group(vec![leaf("CC"), leaf("CA"), leaf("SA")], 1, 1);
    let premium = group(vec![group(vec![leaf("PremiumCustomer")], 0, 0), leaf("Customer")], 1, 2);

    let mut cm = ConstraintModel::default();
    cm.role_constraints.insert(
        "Bank".into(),
        vec![
            role_constraint(at_least(1), leaf("Consultant")),
            role_constraint(Interval::ANY, bank_accounts),
        ],
    );
    cm.role_constraints
        .insert("Transaction".into(), vec![role_constraint(between(2, 2), participants)]);
    cm.role_constraints
        .insert("RetailBank".into(), vec![role_constraint(Interval::ANY, retail_accounts)]);
    cm.role_constraints
        .insert("BusinessBank".into(), vec![role_constraint(Interval::ANY, premium)]);

    for (rst, ct, pred, succ) in [
        ("own_ca", "Bank", between(1, 1), Interval::ANY),
        ("own_sa", "Bank", at_least(1), Interval::ANY),
        ("advises", "Bank", Interval::ANY, at_least(1)),
        ("trans", "Transaction", between(1, 1), between(1, 1)),
        ("own_cc", "RetailBank", between(1, 1), between(0, 1)),
        ("advises", "BusinessBank", between(1, 1), at_least(1)),
    ] {
        cm.cardinalities.insert(
            (rst.into(), ct.into()),
            RelationshipCardinality::new(pred, succ),
        );
    }

    cm.intra.push(IntraConstraint::new(
        "advises",
        "Bank",
        IntraPredicate::Irreflexive,
    ));
    cm.inter.push(InterConstraint::new(
        "own_ca",
        "Bank",
        InterOperator::Exclusion,
        "own_sa",
    ));
    cm.global.push(existential_implication());
    cm
}

fn bank_typing(extra: &[(&str, &str)]) -> BTreeMap<ObjectId, TypeName> {
    let mut types = typing(&[
        ("Peter", "Person"),
        ("Klaus", "Person"),
        ("Google", "Company"),
        ("Account_1", "Account"),
        ("Account_2", "Account"),
        ("bank", "Bank"),
        ("transaction", "Transaction"),
    ]);
    types.extend(typing(extra));
    types
}

/// Compliant but invalid: Account_2 is both source and target of one transaction, `Con1`
/// advises nobody, and Klaus advises himself.
pub fn first_bank_decl() -> InstanceDecl {
    InstanceDecl {
        naturals: ids(["Peter", "Klaus", "Google", "Account_1", "Account_2"]),
        roles: ids(["Cu_1", "Cu_2", "Cu_3", "Ca", "Sa", "S", "T", "M", "Con", "Con1"]),
        compartments: ids(["bank", "transaction"]),
        types: bank_typing(&[
            ("Cu_1", "Customer"),
            ("Cu_2", "Customer"),
            ("Cu_3", "Customer"),
            ("Ca", "CA"),
            ("Sa", "SA"),
            ("S", "Source"),
            ("T", "Target"),
            ("M", "MoneyTransfer"),
            ("Con", "Consultant"),
            ("Con1", "Consultant"),
        ]),
        plays: plays(&[
            ("Klaus", "bank", "Cu_1"),
            ("Google", "bank", "Cu_2"),
            ("Peter", "bank", "Cu_3"),
            ("Account_2", "bank", "Ca"),
            ("Account_1", "bank", "Sa"),
            ("transaction", "bank", "M"),
            ("Klaus", "bank", "Con"),
            ("Peter", "bank", "Con1"),
            ("Account_2", "transaction", "S"),
            ("Account_2", "transaction", "T"),
        ]),
        links: [
            (("own_ca".into(), "bank".into()), links(&[("Cu_1", "Ca")])),
            (("own_sa".into(), "bank".into()), links(&[("Cu_2", "Sa")])),
            (("advises".into(), "bank".into()), links(&[("Con", "Cu_1")])),
            (("trans".into(), "transaction".into()), links(&[("S", "T")])),
        ]
        .into(),
    }
}

pub fn first_bank() -> Instance {
    Instance::new(first_bank_decl()).expect("first bank")
}

/// Compliant and valid.
pub fn second_bank_decl() -> InstanceDecl {
    InstanceDecl {
        naturals: ids(["Peter", "Klaus", "Google", "Account_1", "Account_2"]),
        roles: ids(["Con", "Cu_1", "Cu_2", "Ca", "Sa", "S", "T", "M"]),
        compartments: ids(["bank", "transaction"]),
        types: bank_typing(&[
            ("Con", "Consultant"),
            ("Cu_1", "Customer"),
            ("Cu_2", "Customer"),
            ("Ca", "CA"),
            ("Sa", "SA"),
            ("S", "Source"),
            ("T", "Target"),
            ("M", "MoneyTransfer"),
        ]),
        plays: plays(&[
            ("Klaus", "bank", "Cu_1"),
            ("Google", "bank", "Cu_2"),
            ("Peter", "bank", "Con"),
            ("Account_2", "bank", "Ca"),
            ("Account_1", "bank", "Sa"),
            ("transaction", "bank", "M"),
            ("Account_1", "transaction", "S"),
            ("Account_2", "transaction", "T"),
        ]),
        links: [
            (("own_ca".into(), "bank".into()), links(&[("Cu_1", "Ca")])),
            (("own_sa".into(), "bank".into()), links(&[("Cu_2", "Sa")])),
            (("advises".into(), "bank".into()), links(&[("Con", "Cu_2")])),
            (("trans".into(), "transaction".into()), links(&[("S", "T")])),
        ]
        .into(),
    }
}

pub fn second_bank() -> Instance {
    Instance::new(second_bank_decl()).expect("second bank")
}
