//! TOML model documents.
//!
//! This crate is intentionally IO-free: it parses and resolves documents provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{
    AnnotationConfig, CardinalityConfig, ConstraintsConfig, CromModelV1, ExprConfig,
    InheritanceConfig, InstanceConfig, InterConfig, IntraConfig, LinksConfig,
    RelationshipConfig, RoleConstraintConfig, SchemaConfig,
};
pub use resolve::{ResolvedModel, SCHEMA_ID, parse_expr};

/// Parse a `crom.model.v1` document into its typed, unvalidated form.
pub fn parse_model_toml(input: &str) -> anyhow::Result<CromModelV1> {
    let doc: CromModelV1 = toml::from_str(input)?;
    Ok(doc)
}

/// Build the schema, constraint model, instances and annotations a document declares.
pub fn resolve_model(doc: CromModelV1) -> anyhow::Result<ResolvedModel> {
    resolve::resolve_model(doc)
}

/// JSON schema of the document format, for editors and tooling.
pub fn model_json_schema() -> schemars::Schema {
    schemars::schema_for!(CromModelV1)
}
