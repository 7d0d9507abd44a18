//! Explain registry for checks.
//!
//! Maps check IDs to the statement each check verifies, for diagnostic layers that want to say
//! more than "check failed".

use crate::ids;

/// Explanation entry for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explanation {
    /// Short description of the check.
    pub title: &'static str,
    /// The statement that must hold, in plain words.
    pub statement: &'static str,
}

/// Look up an explanation by check_id.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(check_id: &str) -> Option<Explanation> {
    let (title, statement) = match check_id {
        ids::CHECK_SCHEMA_ROLES_FULFILLED => (
            "Every role type is fulfilled",
            "Each role type is played by some natural or compartment type inside some compartment type.",
        ),
        ids::CHECK_SCHEMA_COMPARTMENTS_NONEMPTY => (
            "Every compartment type has parts",
            "Each compartment type contains at least one role type.",
        ),
        ids::CHECK_SCHEMA_RELATIONSHIP_ENDPOINTS_DISTINCT => (
            "Relationship endpoints differ",
            "A relationship type connects two different role types.",
        ),
        ids::CHECK_SCHEMA_RELATIONSHIP_ENDPOINTS_OWNED => (
            "Relationship endpoints are parts",
            "Both role types of a relationship mapping are parts of the mapping's compartment type.",
        ),
        ids::CHECK_SCHEMA_ROLE_OWNERSHIP_UNIQUE => (
            "Role ownership is unique",
            "All compartment types containing a role type specialize one owning compartment type.",
        ),
        ids::CHECK_SCHEMA_COMPARTMENT_COVARIANCE => (
            "Compartment inheritance is covariant",
            "A compartment subtype contains every role type of its supertypes.",
        ),
        ids::CHECK_SCHEMA_RELATIONSHIP_INHERITANCE => (
            "Relationships are inherited",
            "A compartment subtype maps every relationship of its supertypes to the same role types.",
        ),
        ids::CHECK_SCHEMA_FILLER_COVARIANCE => (
            "Fillers are covariant",
            "Every filler of a role in a compartment subtype specializes a filler of that role in the supertype.",
        ),
        ids::CHECK_INSTANCE_PLAY_TYPING => (
            "Plays are fulfillment-typed",
            "Each (player, compartment, role) triple is typed by a fulfillment of the schema.",
        ),
        ids::CHECK_INSTANCE_ROLE_UNIQUENESS => (
            "One role per type and compartment",
            "An object plays at most one role of each role type inside one compartment.",
        ),
        ids::CHECK_INSTANCE_ROLE_OWNERSHIP => (
            "Roles have exactly one player",
            "Each role object is played by exactly one object in exactly one compartment.",
        ),
        ids::CHECK_INSTANCE_LINK_TYPING => (
            "Links are well-typed",
            "Linked roles have the mapped role types and are played inside the linking compartment.",
        ),
        ids::CHECK_INSTANCE_NO_EMPTY_LINKS => (
            "No empty links",
            "No link has both ends empty.",
        ),
        ids::CHECK_INSTANCE_LINK_COMPLETENESS => (
            "Links are complete",
            "A role occurs as the source (target) of some link exactly when it has the mapped source (target) role type.",
        ),
        ids::CHECK_INSTANCE_NO_REDUNDANT_EMPTY_ENDS => (
            "No redundant empty ends",
            "A role that is linked to another role does not also occur in a link with an empty end.",
        ),
        ids::CHECK_MODEL_ROLE_CONSTRAINT_ATOMS => (
            "Role constraints reference owned roles",
            "Role expressions attached to a compartment type only mention role types it contains.",
        ),
        ids::CHECK_MODEL_CARDINALITY_DOMAIN => (
            "Cardinalities constrain mapped relationships",
            "Every relationship cardinality refers to a mapped relationship of the schema.",
        ),
        ids::CHECK_MODEL_INTRA_DOMAIN => (
            "Intra-relationship constraints are mapped",
            "Every intra-relationship constraint refers to a mapped relationship of the schema.",
        ),
        ids::CHECK_MODEL_INTER_DOMAIN => (
            "Inter-relationship constraints are mapped",
            "Both relationships of an inter-relationship constraint are mapped and distinct.",
        ),
        ids::CHECK_MODEL_GLOBAL_QUANTIFIED => (
            "Global constraints are quantified",
            "Every role type in a global constraint is reached through a quantification over a compartment type containing it.",
        ),
        ids::CHECK_VALIDITY_ROLE_CARDINALITY => (
            "Role cardinality",
            "Per compartment, the number of participants satisfying each role constraint lies in its interval.",
        ),
        ids::CHECK_VALIDITY_ROLE_IMPLICATION => (
            "Role implication",
            "A participant playing a role mentioned by a role constraint satisfies that constraint.",
        ),
        ids::CHECK_VALIDITY_RELATIONSHIP_CARDINALITY => (
            "Relationship cardinality",
            "Per compartment, predecessor and successor counts of linked roles lie in the declared intervals.",
        ),
        ids::CHECK_VALIDITY_INTRA => (
            "Intra-relationship constraints",
            "Per compartment, each constrained relationship satisfies its predicate at player level.",
        ),
        ids::CHECK_VALIDITY_INTER_EXCLUSION => (
            "Relationship exclusion",
            "Per compartment, excluded relationships never connect the same pair of players.",
        ),
        ids::CHECK_VALIDITY_INTER_IMPLICATION => (
            "Relationship implication",
            "Per compartment, every player pair of the first relationship is also a pair of the second.",
        ),
        ids::CHECK_VALIDITY_GLOBAL => (
            "Global role constraints",
            "Every object satisfies every global role constraint across its compartments.",
        ),
        _ => return None,
    };
    Some(Explanation { title, statement })
}
