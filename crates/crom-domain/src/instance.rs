//! Compartment role object instances.

use crate::canonical::{End, braced};
use crate::error::{InstanceError, LookupError};
use crom_types::{ObjectId, TypeName};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// `player` plays `role` inside `compartment`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Play {
    pub player: ObjectId,
    pub compartment: ObjectId,
    pub role: ObjectId,
}

impl Play {
    pub fn new(
        player: impl Into<ObjectId>,
        compartment: impl Into<ObjectId>,
        role: impl Into<ObjectId>,
    ) -> Self {
        Self {
            player: player.into(),
            compartment: compartment.into(),
            role: role.into(),
        }
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.player, self.compartment, self.role)
    }
}

/// A link between two role objects. `None` is the empty end (`ε`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Link {
    pub source: Option<ObjectId>,
    pub target: Option<ObjectId>,
}

impl Link {
    pub fn new(source: impl Into<ObjectId>, target: impl Into<ObjectId>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
        }
    }

    pub fn source_only(source: impl Into<ObjectId>) -> Self {
        Self {
            source: Some(source.into()),
            target: None,
        }
    }

    pub fn target_only(target: impl Into<ObjectId>) -> Self {
        Self {
            source: None,
            target: Some(target.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.target.is_none()
    }

    pub fn ends(&self) -> impl Iterator<Item = &ObjectId> {
        self.source.iter().chain(self.target.iter())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            End(self.source.as_ref()),
            End(self.target.as_ref())
        )
    }
}

/// `(relationship type, compartment)`
pub type LinkKey = (TypeName, ObjectId);

/// A player-level edge; either end may be empty.
pub type PlayerEdge = (Option<ObjectId>, Option<ObjectId>);

#[derive(Clone, Debug, Default)]
pub struct InstanceDecl {
    pub naturals: BTreeSet<ObjectId>,
    pub roles: BTreeSet<ObjectId>,
    pub compartments: BTreeSet<ObjectId>,
    pub types: BTreeMap<ObjectId, TypeName>,
    pub plays: BTreeSet<Play>,
    pub links: BTreeMap<LinkKey, BTreeSet<Link>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instance {
    naturals: BTreeSet<ObjectId>,
    roles: BTreeSet<ObjectId>,
    compartments: BTreeSet<ObjectId>,
    types: BTreeMap<ObjectId, TypeName>,
    plays: BTreeSet<Play>,
    links: BTreeMap<LinkKey, BTreeSet<Link>>,

    // role -> first (player, compartment) playing it
    played_by: BTreeMap<ObjectId, (ObjectId, ObjectId)>,
}

impl Instance {
    pub fn new(decl: InstanceDecl) -> Result<Self, InstanceError> {
        let InstanceDecl {
            naturals,
            roles,
            compartments,
            types,
            plays,
            links,
        } = decl;

        let mut seen = BTreeSet::new();
        for o in naturals.iter().chain(&roles).chain(&compartments) {
            if !seen.insert(o) {
                return Err(InstanceError::NotDisjoint(o.clone()));
            }
            if !types.contains_key(o) {
                return Err(InstanceError::MissingType(o.clone()));
            }
        }
        if let Some(stray) = types.keys().find(|o| !seen.contains(o)) {
            return Err(InstanceError::UnknownTypedObject(stray.clone()));
        }

        for p in &plays {
            let player_ok = naturals.contains(&p.player) || compartments.contains(&p.player);
            if !player_ok || !compartments.contains(&p.compartment) || !roles.contains(&p.role) {
                return Err(InstanceError::IllTypedPlay {
                    player: p.player.clone(),
                    compartment: p.compartment.clone(),
                    role: p.role.clone(),
                });
            }
        }

        for ((rst, c), set) in &links {
            if !compartments.contains(c) {
                return Err(InstanceError::UnknownLinkCompartment {
                    relationship: rst.clone(),
                    compartment: c.clone(),
                });
            }
            if let Some(stray) = set.iter().flat_map(Link::ends).find(|r| !roles.contains(*r)) {
                return Err(InstanceError::UnknownLinkRole {
                    relationship: rst.clone(),
                    compartment: c.clone(),
                    role: stray.clone(),
                });
            }
        }

        let mut played_by = BTreeMap::new();
        for p in &plays {
            played_by
                .entry(p.role.clone())
                .or_insert_with(|| (p.player.clone(), p.compartment.clone()));
        }

        Ok(Self {
            naturals,
            roles,
            compartments,
            types,
            plays,
            links,
            played_by,
        })
    }

    /// The instance with no objects. Compliant with every well-formed schema.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn naturals(&self) -> &BTreeSet<ObjectId> {
        &self.naturals
    }

    pub fn roles(&self) -> &BTreeSet<ObjectId> {
        &self.roles
    }

    pub fn compartments(&self) -> &BTreeSet<ObjectId> {
        &self.compartments
    }

    pub fn types(&self) -> &BTreeMap<ObjectId, TypeName> {
        &self.types
    }

    pub fn plays(&self) -> &BTreeSet<Play> {
        &self.plays
    }

    pub fn all_links(&self) -> &BTreeMap<LinkKey, BTreeSet<Link>> {
        &self.links
    }

    pub fn type_of(&self, o: &ObjectId) -> Option<&TypeName> {
        self.types.get(o)
    }

    fn has_type(&self, o: &ObjectId, t: &TypeName) -> bool {
        self.types.get(o) == Some(t)
    }

    /// `o()`: every natural and compartment object, the possible players.
    pub fn objects(&self) -> BTreeSet<&ObjectId> {
        self.naturals.iter().chain(&self.compartments).collect()
    }

    /// `O^c`: objects playing some role in `c`.
    pub fn participants(&self, c: &ObjectId) -> BTreeSet<&ObjectId> {
        self.plays
            .iter()
            .filter(|p| &p.compartment == c)
            .map(|p| &p.player)
            .collect()
    }

    /// `O^c_rt`: objects playing a role of type `rt` in `c`.
    pub fn participants_of_type(&self, c: &ObjectId, rt: &TypeName) -> BTreeSet<&ObjectId> {
        self.plays
            .iter()
            .filter(|p| &p.compartment == c && self.has_type(&p.role, rt))
            .map(|p| &p.player)
            .collect()
    }

    /// `R^c_rt`: roles of type `rt` played in `c`.
    pub fn roles_of_type(&self, c: &ObjectId, rt: &TypeName) -> BTreeSet<&ObjectId> {
        self.plays
            .iter()
            .filter(|p| &p.compartment == c && self.has_type(&p.role, rt))
            .map(|p| &p.role)
            .collect()
    }

    /// Roles played in `c`, whatever their type.
    pub fn roles_in(&self, c: &ObjectId) -> BTreeSet<&ObjectId> {
        self.plays
            .iter()
            .filter(|p| &p.compartment == c)
            .map(|p| &p.role)
            .collect()
    }

    pub fn plays_role_of_type(&self, o: &ObjectId, c: &ObjectId, rt: &TypeName) -> bool {
        self.plays
            .iter()
            .any(|p| &p.player == o && &p.compartment == c && self.has_type(&p.role, rt))
    }

    /// Compartments in which `o` plays at least one role.
    pub fn compartments_of(&self, o: &ObjectId) -> BTreeSet<&ObjectId> {
        self.plays
            .iter()
            .filter(|p| &p.player == o)
            .map(|p| &p.compartment)
            .collect()
    }

    pub fn links(&self, rst: &TypeName, c: &ObjectId) -> Option<&BTreeSet<Link>> {
        self.links.get(&(rst.clone(), c.clone()))
    }

    /// Non-empty sources linked to `r`.
    pub fn pred(&self, rst: &TypeName, c: &ObjectId, r: &ObjectId) -> BTreeSet<&ObjectId> {
        self.links(rst, c)
            .into_iter()
            .flatten()
            .filter(|l| l.target.as_ref() == Some(r))
            .filter_map(|l| l.source.as_ref())
            .collect()
    }

    /// Non-empty targets linked from `r`.
    pub fn succ(&self, rst: &TypeName, c: &ObjectId, r: &ObjectId) -> BTreeSet<&ObjectId> {
        self.links(rst, c)
            .into_iter()
            .flatten()
            .filter(|l| l.source.as_ref() == Some(r))
            .filter_map(|l| l.target.as_ref())
            .collect()
    }

    /// Inverts Plays for one link end.
    pub fn player(&self, end: Option<&ObjectId>) -> Result<Option<&ObjectId>, LookupError> {
        match end {
            None => Ok(None),
            Some(r) => self
                .played_by
                .get(r)
                .map(|(player, _)| Some(player))
                .ok_or_else(|| LookupError(r.clone())),
        }
    }

    /// Links of `(rst, c)` lifted to their players. A missing key yields the empty set.
    pub fn overline_links(
        &self,
        rst: &TypeName,
        c: &ObjectId,
    ) -> Result<BTreeSet<PlayerEdge>, LookupError> {
        let mut out = BTreeSet::new();
        for link in self.links(rst, c).into_iter().flatten() {
            let source = self.player(link.source.as_ref())?.cloned();
            let target = self.player(link.target.as_ref())?.cloned();
            out.insert((source, target));
        }
        Ok(out)
    }

    /// Complete player-level edges of `(rst, c)`; pairs with an empty end are dropped.
    pub fn player_edges(
        &self,
        rst: &TypeName,
        c: &ObjectId,
    ) -> Result<BTreeSet<(ObjectId, ObjectId)>, LookupError> {
        Ok(self
            .overline_links(rst, c)?
            .into_iter()
            .filter_map(|(s, t)| Some((s?, t?)))
            .collect())
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CROI")?;
        writeln!(f, "  N: {}", braced(&self.naturals))?;
        writeln!(f, "  R: {}", braced(&self.roles))?;
        writeln!(f, "  C: {}", braced(&self.compartments))?;
        let types = self.types.iter().map(|(o, t)| format!("{o}: {t}"));
        writeln!(f, "  type: {}", braced(types))?;
        writeln!(f, "  plays: {}", braced(&self.plays))?;
        let links = self
            .links
            .iter()
            .map(|((rst, c), set)| format!("({rst}, {c}) -> {}", braced(set)));
        write!(f, "  links: {}", braced(links))
    }
}
