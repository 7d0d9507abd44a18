use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result of one named check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckOutcome {
    pub check_id: String,
    pub holds: bool,
}

impl CheckOutcome {
    pub fn new(check_id: &str, holds: bool) -> Self {
        Self {
            check_id: check_id.to_string(),
            holds,
        }
    }
}

/// Non-compliance is a normal outcome, so the verdict is just pass or fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_outcomes(outcomes: &[CheckOutcome]) -> Self {
        if outcomes.iter().all(|o| o.holds) {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}
