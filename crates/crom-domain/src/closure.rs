//! Reflexive-transitive closure of inheritance edges.
//!
//! Pairs are `(sub, super)`: `(RetailBank, Bank)` reads "RetailBank ⪯ Bank".

use crom_types::TypeName;
use std::collections::BTreeSet;
use tracing::trace;

/// Least transitive relation containing `edges`.
///
/// Iterates `R ∪ {(x, z) | (x, y), (y, z) ∈ R}` until nothing new appears. The ground set is
/// finite and the step is monotone, so this terminates.
pub fn transitive_closure<T: Ord + Clone>(edges: &BTreeSet<(T, T)>) -> BTreeSet<(T, T)> {
    let mut closure = edges.clone();
    let mut rounds = 0usize;
    loop {
        let mut additions = Vec::new();
        for (x, y) in &closure {
            for (y2, z) in &closure {
                if y == y2 {
                    let pair = (x.clone(), z.clone());
                    if !closure.contains(&pair) {
                        additions.push(pair);
                    }
                }
            }
        }
        rounds += 1;
        if additions.is_empty() {
            trace!(rounds, size = closure.len(), "transitive closure reached fixpoint");
            return closure;
        }
        closure.extend(additions);
    }
}

/// Reflexive-transitive closure of `edges` over `ground`.
pub fn reflexive_transitive_closure<'a, T: Ord + Clone + 'a>(
    edges: &BTreeSet<(T, T)>,
    ground: impl IntoIterator<Item = &'a T>,
) -> BTreeSet<(T, T)> {
    let mut closure = transitive_closure(edges);
    closure.extend(ground.into_iter().map(|x| (x.clone(), x.clone())));
    closure
}

/// A specialization preorder (`⪯`) over type names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preorder {
    pairs: BTreeSet<(TypeName, TypeName)>,
}

impl Preorder {
    pub fn from_edges<'a>(
        edges: &BTreeSet<(TypeName, TypeName)>,
        ground: impl IntoIterator<Item = &'a TypeName>,
    ) -> Self {
        Self {
            pairs: reflexive_transitive_closure(edges, ground),
        }
    }

    /// The identity order: what the base variant uses.
    pub fn identity<'a>(ground: impl IntoIterator<Item = &'a TypeName>) -> Self {
        Self::from_edges(&BTreeSet::new(), ground)
    }

    pub fn union(&self, other: &Preorder) -> Self {
        Self {
            pairs: self.pairs.union(&other.pairs).cloned().collect(),
        }
    }

    /// `sub ⪯ sup`
    pub fn contains(&self, sub: &TypeName, sup: &TypeName) -> bool {
        self.pairs.contains(&(sub.clone(), sup.clone()))
    }

    /// Every `y` with `t ⪯ y`, including `t` itself when `t` is in the ground set.
    pub fn supertypes<'a>(&'a self, t: &'a TypeName) -> impl Iterator<Item = &'a TypeName> + 'a {
        self.pairs
            .iter()
            .filter(move |(sub, _)| sub == t)
            .map(|(_, sup)| sup)
    }

    /// Every `x` with `x ⪯ t`.
    pub fn subtypes<'a>(&'a self, t: &'a TypeName) -> impl Iterator<Item = &'a TypeName> + 'a {
        self.pairs
            .iter()
            .filter(move |(_, sup)| sup == t)
            .map(|(sub, _)| sub)
    }

    pub fn pairs(&self) -> &BTreeSet<(TypeName, TypeName)> {
        &self.pairs
    }
}
