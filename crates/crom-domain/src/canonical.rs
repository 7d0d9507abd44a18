//! Helpers for the canonical textual rendering of model entities.
//!
//! Everything rendered here comes out of `BTreeSet`/`BTreeMap` iteration, so the output is stable.

use crom_types::ObjectId;
use std::fmt;

pub(crate) fn braced<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    let items: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    format!("{{{}}}", items.join(", "))
}

/// A link end; the empty end renders as `ε`.
pub(crate) struct End<'a>(pub Option<&'a ObjectId>);

impl fmt::Display for End<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("ε"),
        }
    }
}
