//! Well-formedness of a type schema.

use crate::schema::{TypeSchema, Variant};
use crom_types::ids;

impl TypeSchema {
    /// Every role type is filled by something in some compartment type.
    pub fn check_roles_fulfilled(&self) -> bool {
        self.role_types()
            .iter()
            .all(|rt| self.fills().iter().any(|f| &f.role == rt))
    }

    /// Every compartment type has at least one part.
    pub fn check_compartments_nonempty(&self) -> bool {
        self.compartment_types()
            .iter()
            .all(|ct| !self.parts(ct).is_empty())
    }

    pub fn check_relationship_endpoints_distinct(&self) -> bool {
        self.relationships()
            .values()
            .all(|ends| ends.source != ends.target)
    }

    /// Both endpoints of a mapping are parts of the mapping's compartment type.
    pub fn check_relationship_endpoints_owned(&self) -> bool {
        self.relationships().iter().all(|((_, ct), ends)| {
            let parts = self.parts(ct);
            parts.contains(&ends.source) && parts.contains(&ends.target)
        })
    }

    /// The owners of each role type have exactly one `⪯_CT`-maximal element above all of them.
    ///
    /// With the identity order this is "exactly one owner".
    pub fn check_role_ownership_unique(&self) -> bool {
        let order = self.preceq_ct();
        self.role_types().iter().all(|rt| {
            let owners = self.owners(rt);
            let maximal = owners
                .iter()
                .filter(|m| owners.iter().all(|o| order.contains(o, m)))
                .count();
            maximal == 1
        })
    }

    /// A sub-compartment type has at least the parts of its super type.
    pub fn check_compartment_covariance(&self) -> bool {
        self.preceq_ct()
            .pairs()
            .iter()
            .all(|(sub, sup)| self.parts(sup).is_subset(&self.parts(sub)))
    }

    /// A sub-compartment type maps every relationship of its super type to the same role pair.
    pub fn check_relationship_inheritance(&self) -> bool {
        self.preceq_ct().pairs().iter().all(|(sub, sup)| {
            self.relationships()
                .iter()
                .filter(|((_, ct), _)| ct == sup)
                .all(|((rst, _), ends)| self.relationship(rst, sub) == Some(ends))
        })
    }

    /// Every filler of a role in a sub-compartment type specializes a filler of that role in
    /// the super type.
    pub fn check_filler_covariance(&self) -> bool {
        let t = self.preceq_t();
        self.preceq_ct().pairs().iter().all(|(sub, sup)| {
            self.parts(sup).into_iter().all(|rt| {
                self.fills()
                    .iter()
                    .filter(|s| &s.compartment == sub && &s.role == rt)
                    .all(|s| {
                        self.fills().iter().any(|f| {
                            &f.compartment == sup && &f.role == rt && t.contains(&s.filler, &f.filler)
                        })
                    })
            })
        })
    }

    /// Named outcomes of every axiom of this schema's variant, in declaration order.
    pub fn axioms(&self) -> Vec<(&'static str, bool)> {
        let mut out = vec![
            (ids::CHECK_SCHEMA_ROLES_FULFILLED, self.check_roles_fulfilled()),
            (
                ids::CHECK_SCHEMA_COMPARTMENTS_NONEMPTY,
                self.check_compartments_nonempty(),
            ),
            (
                ids::CHECK_SCHEMA_RELATIONSHIP_ENDPOINTS_DISTINCT,
                self.check_relationship_endpoints_distinct(),
            ),
            (
                ids::CHECK_SCHEMA_RELATIONSHIP_ENDPOINTS_OWNED,
                self.check_relationship_endpoints_owned(),
            ),
        ];
        if self.variant() == Variant::Inheritance {
            out.extend([
                (
                    ids::CHECK_SCHEMA_ROLE_OWNERSHIP_UNIQUE,
                    self.check_role_ownership_unique(),
                ),
                (
                    ids::CHECK_SCHEMA_COMPARTMENT_COVARIANCE,
                    self.check_compartment_covariance(),
                ),
                (
                    ids::CHECK_SCHEMA_RELATIONSHIP_INHERITANCE,
                    self.check_relationship_inheritance(),
                ),
                (
                    ids::CHECK_SCHEMA_FILLER_COVARIANCE,
                    self.check_filler_covariance(),
                ),
            ]);
        }
        out
    }

    pub fn wellformed(&self) -> bool {
        super::all_hold("schema", self.axioms())
    }
}
