//! Stable identifiers for the named checks.
//!
//! `check_id` is a dotted namespace: the first segment names the entity being checked.

// Schema well-formedness
pub const CHECK_SCHEMA_ROLES_FULFILLED: &str = "schema.roles_fulfilled";
pub const CHECK_SCHEMA_COMPARTMENTS_NONEMPTY: &str = "schema.compartments_nonempty";
pub const CHECK_SCHEMA_RELATIONSHIP_ENDPOINTS_DISTINCT: &str =
    "schema.relationship_endpoints_distinct";
pub const CHECK_SCHEMA_RELATIONSHIP_ENDPOINTS_OWNED: &str = "schema.relationship_endpoints_owned";
pub const CHECK_SCHEMA_ROLE_OWNERSHIP_UNIQUE: &str = "schema.role_ownership_unique";
pub const CHECK_SCHEMA_COMPARTMENT_COVARIANCE: &str = "schema.compartment_covariance";
pub const CHECK_SCHEMA_RELATIONSHIP_INHERITANCE: &str = "schema.relationship_inheritance";
pub const CHECK_SCHEMA_FILLER_COVARIANCE: &str = "schema.filler_covariance";

// Instance compliance
pub const CHECK_INSTANCE_PLAY_TYPING: &str = "instance.play_typing";
pub const CHECK_INSTANCE_ROLE_UNIQUENESS: &str = "instance.role_uniqueness";
pub const CHECK_INSTANCE_ROLE_OWNERSHIP: &str = "instance.role_ownership";
pub const CHECK_INSTANCE_LINK_TYPING: &str = "instance.link_typing";
pub const CHECK_INSTANCE_NO_EMPTY_LINKS: &str = "instance.no_empty_links";
pub const CHECK_INSTANCE_LINK_COMPLETENESS: &str = "instance.link_completeness";
pub const CHECK_INSTANCE_NO_REDUNDANT_EMPTY_ENDS: &str = "instance.no_redundant_empty_ends";

// Constraint model compliance
pub const CHECK_MODEL_ROLE_CONSTRAINT_ATOMS: &str = "model.role_constraint_atoms";
pub const CHECK_MODEL_CARDINALITY_DOMAIN: &str = "model.cardinality_domain";
pub const CHECK_MODEL_INTRA_DOMAIN: &str = "model.intra_domain";
pub const CHECK_MODEL_INTER_DOMAIN: &str = "model.inter_domain";
pub const CHECK_MODEL_GLOBAL_QUANTIFIED: &str = "model.global_quantified";

// Validity
pub const CHECK_VALIDITY_ROLE_CARDINALITY: &str = "validity.role_cardinality";
pub const CHECK_VALIDITY_ROLE_IMPLICATION: &str = "validity.role_implication";
pub const CHECK_VALIDITY_RELATIONSHIP_CARDINALITY: &str = "validity.relationship_cardinality";
pub const CHECK_VALIDITY_INTRA: &str = "validity.intra";
pub const CHECK_VALIDITY_INTER_EXCLUSION: &str = "validity.inter_exclusion";
pub const CHECK_VALIDITY_INTER_IMPLICATION: &str = "validity.inter_implication";
pub const CHECK_VALIDITY_GLOBAL: &str = "validity.global";
