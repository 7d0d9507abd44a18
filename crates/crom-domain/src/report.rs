use crom_types::{CheckOutcome, Explanation, Verdict, lookup_explanation};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub passed: u32,
    pub failed: u32,
}

impl OutcomeCounts {
    pub fn from_outcomes(outcomes: &[CheckOutcome]) -> Self {
        let mut counts = OutcomeCounts::default();
        for o in outcomes {
            if o.holds {
                counts.passed += 1;
            } else {
                counts.failed += 1;
            }
        }
        counts
    }
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub outcomes: Vec<CheckOutcome>,
    pub counts: OutcomeCounts,
}

impl DomainReport {
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.holds)
    }

    /// Failed outcomes paired with the statement each check verifies.
    pub fn explained_failures(
        &self,
    ) -> impl Iterator<Item = (&CheckOutcome, Option<Explanation>)> {
        self.failures().map(|o| (o, lookup_explanation(&o.check_id)))
    }

    pub fn holds(&self, check_id: &str) -> Option<bool> {
        self.outcomes
            .iter()
            .find(|o| o.check_id == check_id)
            .map(|o| o.holds)
    }
}
