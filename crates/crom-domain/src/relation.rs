//! Predicates over the player-level edges of one relationship in one compartment.

use crate::closure::transitive_closure;
use crom_types::ObjectId;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A user-supplied intra-relationship predicate.
///
/// `sources` and `targets` are the players of the relationship's two role types in the
/// compartment; `edges` are the complete player pairs of its links.
pub trait RelationPredicate: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn holds(
        &self,
        sources: &BTreeSet<ObjectId>,
        targets: &BTreeSet<ObjectId>,
        edges: &BTreeSet<(ObjectId, ObjectId)>,
    ) -> bool;
}

#[derive(Clone, Debug)]
pub enum IntraPredicate {
    /// No `(x, x)`.
    Irreflexive,
    /// `(x, x)` for every `x` on both sides.
    Reflexive,
    Acyclic,
    Cyclic,
    /// Every source has a successor and every target a predecessor.
    Total,
    Custom(Arc<dyn RelationPredicate>),
}

impl IntraPredicate {
    pub const BUILTIN_NAMES: [&'static str; 5] =
        ["irreflexive", "reflexive", "acyclic", "cyclic", "total"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "irreflexive" => Some(Self::Irreflexive),
            "reflexive" => Some(Self::Reflexive),
            "acyclic" => Some(Self::Acyclic),
            "cyclic" => Some(Self::Cyclic),
            "total" => Some(Self::Total),
            _ => None,
        }
    }

    pub fn custom(predicate: impl RelationPredicate + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Irreflexive => "irreflexive",
            Self::Reflexive => "reflexive",
            Self::Acyclic => "acyclic",
            Self::Cyclic => "cyclic",
            Self::Total => "total",
            Self::Custom(p) => p.name(),
        }
    }

    pub fn holds(
        &self,
        sources: &BTreeSet<ObjectId>,
        targets: &BTreeSet<ObjectId>,
        edges: &BTreeSet<(ObjectId, ObjectId)>,
    ) -> bool {
        match self {
            Self::Irreflexive => edges.iter().all(|(x, y)| x != y),
            Self::Reflexive => sources
                .intersection(targets)
                .all(|x| edges.contains(&(x.clone(), x.clone()))),
            Self::Acyclic => !has_cycle(edges),
            Self::Cyclic => has_cycle(edges),
            Self::Total => {
                sources.iter().all(|x| edges.iter().any(|(s, _)| s == x))
                    && targets.iter().all(|y| edges.iter().any(|(_, t)| t == y))
            }
            Self::Custom(p) => p.holds(sources, targets, edges),
        }
    }
}

fn has_cycle(edges: &BTreeSet<(ObjectId, ObjectId)>) -> bool {
    transitive_closure(edges).iter().any(|(x, y)| x == y)
}

// Custom predicates have no structural equality; they compare by name.
impl PartialEq for IntraPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for IntraPredicate {}

impl fmt::Display for IntraPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
