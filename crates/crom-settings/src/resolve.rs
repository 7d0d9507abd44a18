use crate::model::{
    AnnotationConfig, ConstraintsConfig, CromModelV1, ExprConfig, InstanceConfig, SchemaConfig,
};
use anyhow::Context;
use crom_domain::constraint::{
    ConstraintModel, InterConstraint, InterOperator, IntraConstraint, RelationshipCardinality,
    RoleConstraint,
};
use crom_domain::instance::{InstanceDecl, Link, Play};
use crom_domain::relation::IntraPredicate;
use crom_domain::schema::{Fulfillment, Inheritance, RelationshipEnds, SchemaDecl};
use crom_domain::{Instance, PersistenceAnnotation, RoleExpression, TypeSchema};
use crom_types::{Interval, ObjectId, TypeName};
use std::collections::{BTreeMap, BTreeSet};

pub const SCHEMA_ID: &str = "crom.model.v1";

/// Everything a document declares, validated against its schema.
#[derive(Clone, Debug)]
pub struct ResolvedModel {
    pub schema: TypeSchema,
    pub constraints: ConstraintModel,
    pub instances: BTreeMap<String, Instance>,
    pub annotations: BTreeMap<String, PersistenceAnnotation>,
}

pub fn resolve_model(doc: CromModelV1) -> anyhow::Result<ResolvedModel> {
    if let Some(id) = doc.schema.as_deref()
        && id != SCHEMA_ID
    {
        anyhow::bail!("unsupported document schema: {id} (expected {SCHEMA_ID})");
    }

    let decl = schema_decl(doc.model).context("invalid model")?;
    let schema = TypeSchema::new(decl).context("invalid model")?;
    let constraints = constraint_model(doc.constraints).context("invalid constraints")?;

    let mut instances = BTreeMap::new();
    for (name, cfg) in doc.instances {
        let instance =
            Instance::new(instance_decl(cfg)).with_context(|| format!("invalid instance {name}"))?;
        instances.insert(name, instance);
    }

    let mut annotations = BTreeMap::new();
    for (name, cfg) in doc.persistence {
        let annotation = annotation(&schema, cfg)
            .with_context(|| format!("invalid persistence annotation {name}"))?;
        annotations.insert(name, annotation);
    }

    Ok(ResolvedModel {
        schema,
        constraints,
        instances,
        annotations,
    })
}

fn schema_decl(cfg: SchemaConfig) -> anyhow::Result<SchemaDecl> {
    let mut relationships = BTreeMap::new();
    for r in cfg.relationships {
        let key = (TypeName::from(r.name), TypeName::from(r.compartment));
        if relationships.contains_key(&key) {
            anyhow::bail!("duplicate relationship mapping ({}, {})", key.0, key.1);
        }
        relationships.insert(key, RelationshipEnds::new(r.source, r.target));
    }

    Ok(SchemaDecl {
        natural_types: type_names(cfg.natural_types),
        role_types: type_names(cfg.role_types),
        compartment_types: type_names(cfg.compartment_types),
        relationship_types: type_names(cfg.relationship_types),
        fills: cfg
            .fills
            .into_iter()
            .map(|(filler, ct, rt)| Fulfillment::new(filler, ct, rt))
            .collect(),
        relationships,
        inheritance: cfg.inheritance.map(|inh| Inheritance {
            natural: edges(inh.natural),
            compartment: edges(inh.compartment),
        }),
    })
}

fn constraint_model(cfg: ConstraintsConfig) -> anyhow::Result<ConstraintModel> {
    let mut model = ConstraintModel::default();

    for rc in cfg.roles {
        let card = parse_interval(&rc.card)
            .with_context(|| format!("invalid role cardinality for {}", rc.compartment))?;
        let expr = parse_expr(&rc.expr)
            .with_context(|| format!("invalid role expression for {}", rc.compartment))?;
        model
            .role_constraints
            .entry(rc.compartment.into())
            .or_default()
            .push(RoleConstraint::new(card, expr));
    }

    for c in cfg.cardinalities {
        let what = || format!("invalid cardinality for ({}, {})", c.relationship, c.compartment);
        let pred = parse_interval(&c.pred).with_context(what)?;
        let succ = parse_interval(&c.succ).with_context(what)?;
        let key = (TypeName::from(c.relationship), TypeName::from(c.compartment));
        if model.cardinalities.contains_key(&key) {
            anyhow::bail!("duplicate cardinality for ({}, {})", key.0, key.1);
        }
        model
            .cardinalities
            .insert(key, RelationshipCardinality::new(pred, succ));
    }

    for ic in cfg.intra {
        let Some(predicate) = IntraPredicate::from_name(&ic.predicate) else {
            anyhow::bail!(
                "unknown intra-relationship predicate: {} (expected one of {})",
                ic.predicate,
                IntraPredicate::BUILTIN_NAMES.join("|")
            );
        };
        model
            .intra
            .push(IntraConstraint::new(ic.relationship, ic.compartment, predicate));
    }

    for ic in cfg.inter {
        let Some(op) = InterOperator::parse(&ic.op) else {
            anyhow::bail!(
                "unknown inter-relationship operator: {} (expected exclusion|implication)",
                ic.op
            );
        };
        model
            .inter
            .push(InterConstraint::new(ic.first, ic.compartment, op, ic.second));
    }

    for g in &cfg.global {
        model
            .global
            .push(parse_expr(g).context("invalid global role constraint")?);
    }

    Ok(model)
}

fn instance_decl(cfg: InstanceConfig) -> InstanceDecl {
    // Tables naming the same (relationship, compartment) pool their pairs.
    let mut links: BTreeMap<_, BTreeSet<Link>> = BTreeMap::new();
    for l in cfg.links {
        links
            .entry((TypeName::from(l.relationship), ObjectId::from(l.compartment)))
            .or_default()
            .extend(l.pairs.into_iter().map(|(s, t)| Link {
                source: end(s),
                target: end(t),
            }));
    }

    InstanceDecl {
        naturals: object_ids(cfg.naturals),
        roles: object_ids(cfg.roles),
        compartments: object_ids(cfg.compartments),
        types: cfg
            .types
            .into_iter()
            .map(|(o, t)| (ObjectId::from(o), TypeName::from(t)))
            .collect(),
        plays: cfg
            .plays
            .into_iter()
            .map(|(o, c, r)| Play::new(o, c, r))
            .collect(),
        links,
    }
}

fn annotation(
    schema: &TypeSchema,
    cfg: AnnotationConfig,
) -> anyhow::Result<PersistenceAnnotation> {
    let rel = cfg
        .relationships
        .into_iter()
        .map(|(rst, ct)| (TypeName::from(rst), TypeName::from(ct)))
        .collect();
    Ok(PersistenceAnnotation::new(
        schema,
        type_names(cfg.natural_types),
        type_names(cfg.role_types),
        type_names(cfg.compartment_types),
        rel,
    )?)
}

/// Role name, `{ group, card }` or `{ quantify, card, expr }`.
pub fn parse_expr(cfg: &ExprConfig) -> anyhow::Result<RoleExpression> {
    match cfg {
        ExprConfig::Role(rt) => {
            if rt.is_empty() {
                anyhow::bail!("empty role type name in expression");
            }
            Ok(RoleExpression::leaf(rt.as_str()))
        }
        ExprConfig::Group { group, card } => {
            let bounds = parse_interval(card)?;
            let children = group
                .iter()
                .map(parse_expr)
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(RoleExpression::Threshold { children, bounds })
        }
        ExprConfig::Quantify {
            quantify,
            card,
            expr,
        } => {
            let bounds = parse_interval(card)
                .with_context(|| format!("invalid quantifier bounds over {quantify}"))?;
            Ok(RoleExpression::Quantified {
                compartment_type: quantify.as_str().into(),
                bounds,
                inner: Box::new(parse_expr(expr)?),
            })
        }
    }
}

fn parse_interval(v: &str) -> anyhow::Result<Interval> {
    v.parse::<Interval>()
        .with_context(|| format!("invalid interval: {v}"))
}

fn end(s: String) -> Option<ObjectId> {
    (!s.is_empty()).then(|| ObjectId::from(s))
}

fn type_names(v: Vec<String>) -> BTreeSet<TypeName> {
    v.into_iter().map(TypeName::from).collect()
}

fn object_ids(v: Vec<String>) -> BTreeSet<ObjectId> {
    v.into_iter().map(ObjectId::from).collect()
}

fn edges(v: Vec<(String, String)>) -> BTreeSet<(TypeName, TypeName)> {
    v.into_iter()
        .map(|(sub, sup)| (TypeName::from(sub), TypeName::from(sup)))
        .collect()
}
