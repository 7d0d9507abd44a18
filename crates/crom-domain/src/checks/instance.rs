//! Compliance of an instance with a type schema.

use crate::instance::{Instance, Link};
use crate::schema::{TypeSchema, Variant};
use crom_types::{ObjectId, TypeName, ids};
use std::collections::BTreeSet;

impl Instance {
    /// Every play is backed by a fulfillment whose filler the player's type specializes.
    pub fn check_play_typing(&self, schema: &TypeSchema) -> bool {
        self.plays().iter().all(|p| {
            match (
                self.type_of(&p.player),
                self.type_of(&p.compartment),
                self.type_of(&p.role),
            ) {
                (Some(to), Some(tc), Some(tr)) => schema.admits_play(to, tc, tr),
                _ => false,
            }
        })
    }

    /// A player holds at most one role of each type per compartment.
    pub fn check_role_uniqueness(&self, _schema: &TypeSchema) -> bool {
        let mut seen = BTreeSet::new();
        self.plays().iter().all(|p| {
            seen.insert((&p.player, &p.compartment, self.type_of(&p.role)))
        })
    }

    /// Every role object is played by exactly one `(player, compartment)` pair.
    pub fn check_role_ownership(&self, _schema: &TypeSchema) -> bool {
        self.roles().iter().all(|r| {
            let holders: BTreeSet<_> = self
                .plays()
                .iter()
                .filter(|p| &p.role == r)
                .map(|p| (&p.player, &p.compartment))
                .collect();
            holders.len() == 1
        })
    }

    /// Link ends are roles of the mapped endpoint types, played in the link's compartment.
    pub fn check_link_typing(&self, schema: &TypeSchema) -> bool {
        self.all_links().iter().all(|((rst, c), links)| {
            let Some(ends) = self
                .type_of(c)
                .and_then(|ct| schema.relationship(rst, ct))
            else {
                return false;
            };
            let played = self.roles_in(c);
            let fits = |end: Option<&ObjectId>, rt: &TypeName| match end {
                None => true,
                Some(r) => played.contains(r) && self.type_of(r) == Some(rt),
            };
            links.iter().all(|l| {
                fits(l.source.as_ref(), &ends.source) && fits(l.target.as_ref(), &ends.target)
            })
        })
    }

    /// No link has two empty ends.
    pub fn check_no_empty_links(&self, _schema: &TypeSchema) -> bool {
        self.all_links()
            .values()
            .flatten()
            .all(|l| !l.is_empty())
    }

    /// For every linked `(rst, c)`, the roles of the mapped endpoint types played in `c` are
    /// exactly the link sources and targets.
    pub fn check_link_completeness(&self, schema: &TypeSchema) -> bool {
        self.all_links().iter().all(|((rst, c), links)| {
            let Some(ends) = self
                .type_of(c)
                .and_then(|ct| schema.relationship(rst, ct))
            else {
                return true;
            };
            let sources: BTreeSet<_> = links.iter().filter_map(|l| l.source.as_ref()).collect();
            let targets: BTreeSet<_> = links.iter().filter_map(|l| l.target.as_ref()).collect();
            self.roles_in(c).into_iter().all(|r| {
                let ty = self.type_of(r);
                (ty == Some(&ends.source)) == sources.contains(r)
                    && (ty == Some(&ends.target)) == targets.contains(r)
            })
        })
    }

    /// A complete link `(r1, r2)` excludes `(r1, ε)` and `(ε, r2)` under the same key.
    pub fn check_no_redundant_empty_ends(&self, _schema: &TypeSchema) -> bool {
        self.all_links().values().all(|links| {
            links.iter().filter(|l| l.is_complete()).all(|l| {
                let dangling_source = Link {
                    source: l.source.clone(),
                    target: None,
                };
                let dangling_target = Link {
                    source: None,
                    target: l.target.clone(),
                };
                !links.contains(&dangling_source) && !links.contains(&dangling_target)
            })
        })
    }

    pub fn axioms(&self, schema: &TypeSchema) -> Vec<(&'static str, bool)> {
        let mut out = vec![
            (ids::CHECK_INSTANCE_PLAY_TYPING, self.check_play_typing(schema)),
            (
                ids::CHECK_INSTANCE_ROLE_UNIQUENESS,
                self.check_role_uniqueness(schema),
            ),
            (
                ids::CHECK_INSTANCE_ROLE_OWNERSHIP,
                self.check_role_ownership(schema),
            ),
            (ids::CHECK_INSTANCE_LINK_TYPING, self.check_link_typing(schema)),
        ];
        if schema.variant() == Variant::Base {
            out.extend([
                (
                    ids::CHECK_INSTANCE_NO_EMPTY_LINKS,
                    self.check_no_empty_links(schema),
                ),
                (
                    ids::CHECK_INSTANCE_LINK_COMPLETENESS,
                    self.check_link_completeness(schema),
                ),
                (
                    ids::CHECK_INSTANCE_NO_REDUNDANT_EMPTY_ENDS,
                    self.check_no_redundant_empty_ends(schema),
                ),
            ]);
        }
        out
    }

    /// The schema is well-formed and every instance axiom of its variant holds.
    pub fn compliant(&self, schema: &TypeSchema) -> bool {
        schema.wellformed() && super::all_hold("instance", self.axioms(schema))
    }
}
