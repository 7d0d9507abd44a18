//! Named axioms as methods on the checked entities.
//!
//! Each `check_*` method is independently callable. The conjunctions (`wellformed`, `compliant`,
//! `validity`) evaluate every axiom of their group and log the ones that fail.

use crom_types::CheckOutcome;
use tracing::debug;

mod constraint;
mod instance;
mod schema;


pub(crate) fn all_hold(group: &str, axioms: Vec<(&'static str, bool)>) -> bool {
    let mut holds = true;
    for (check_id, ok) in axioms {
        if !ok {
            debug!(group, check_id, "axiom violated");
            holds = false;
        }
    }
    holds
}

pub(crate) fn push_outcomes(axioms: Vec<(&'static str, bool)>, out: &mut Vec<CheckOutcome>) {
    out.extend(
        axioms
            .into_iter()
            .map(|(check_id, holds)| CheckOutcome::new(check_id, holds)),
    );
}
