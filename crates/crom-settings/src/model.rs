use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `crom.model.v1` document.
///
/// This is a *user-facing* model: names are plain strings and intervals are UML multiplicities
/// (`"1..*"`). Typing and bounds are checked when the document is resolved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CromModelV1 {
    /// Optional schema string for tooling (`crom.model.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub model: SchemaConfig,

    #[serde(default)]
    pub constraints: ConstraintsConfig,

    /// Named instances of `model`.
    #[serde(default)]
    pub instances: BTreeMap<String, InstanceConfig>,

    /// Named persistence annotations over `model`.
    #[serde(default)]
    pub persistence: BTreeMap<String, AnnotationConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaConfig {
    #[serde(default)]
    pub natural_types: Vec<String>,
    #[serde(default)]
    pub role_types: Vec<String>,
    #[serde(default)]
    pub compartment_types: Vec<String>,
    #[serde(default)]
    pub relationship_types: Vec<String>,

    /// `[filler, compartment type, role type]`
    #[serde(default)]
    pub fills: Vec<(String, String, String)>,

    #[serde(default)]
    pub relationships: Vec<RelationshipConfig>,

    /// Presence selects the inheritance variant, even when both lists are empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance: Option<InheritanceConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelationshipConfig {
    pub name: String,
    pub compartment: String,
    pub source: String,
    pub target: String,
}

/// `[sub, super]` edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InheritanceConfig {
    #[serde(default)]
    pub natural: Vec<(String, String)>,
    #[serde(default)]
    pub compartment: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConstraintsConfig {
    #[serde(default)]
    pub roles: Vec<RoleConstraintConfig>,
    #[serde(default)]
    pub cardinalities: Vec<CardinalityConfig>,
    #[serde(default)]
    pub intra: Vec<IntraConfig>,
    #[serde(default)]
    pub inter: Vec<InterConfig>,
    #[serde(default)]
    pub global: Vec<ExprConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoleConstraintConfig {
    pub compartment: String,
    pub card: String,
    pub expr: ExprConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CardinalityConfig {
    pub relationship: String,
    pub compartment: String,
    pub pred: String,
    pub succ: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IntraConfig {
    pub relationship: String,
    pub compartment: String,
    /// `irreflexive`, `reflexive`, `acyclic`, `cyclic` or `total`.
    pub predicate: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InterConfig {
    pub first: String,
    pub compartment: String,
    /// `exclusion` (`>-<`) or `implication` (`-|>`).
    pub op: String,
    pub second: String,
}

/// A role type name, a counted group, or a quantification over compartments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ExprConfig {
    Role(String),
    Group {
        group: Vec<ExprConfig>,
        card: String,
    },
    Quantify {
        quantify: String,
        card: String,
        expr: Box<ExprConfig>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InstanceConfig {
    #[serde(default)]
    pub naturals: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub compartments: Vec<String>,

    /// object -> type
    #[serde(default)]
    pub types: BTreeMap<String, String>,

    /// `[player, compartment, role]`
    #[serde(default)]
    pub plays: Vec<(String, String, String)>,

    #[serde(default)]
    pub links: Vec<LinksConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LinksConfig {
    pub relationship: String,
    pub compartment: String,
    /// `[source, target]`; `""` is an empty end.
    #[serde(default)]
    pub pairs: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationConfig {
    #[serde(default)]
    pub natural_types: Vec<String>,
    #[serde(default)]
    pub role_types: Vec<String>,
    #[serde(default)]
    pub compartment_types: Vec<String>,
    /// `[relationship type, compartment type]`
    #[serde(default)]
    pub relationships: Vec<(String, String)>,
}
