use crate::checks::push_outcomes;
use crate::constraint::ConstraintModel;
use crate::instance::Instance;
use crate::report::{DomainReport, OutcomeCounts};
use crate::schema::TypeSchema;
use crom_types::{CheckOutcome, Verdict};
use tracing::debug;

/// Every well-formedness axiom of the schema's variant.
pub fn diagnose_schema(schema: &TypeSchema) -> DomainReport {
    let mut outcomes = Vec::new();
    push_outcomes(schema.axioms(), &mut outcomes);
    finish("schema", outcomes)
}

/// Schema axioms plus instance compliance axioms.
pub fn diagnose_instance(schema: &TypeSchema, instance: &Instance) -> DomainReport {
    let mut outcomes = Vec::new();
    push_outcomes(schema.axioms(), &mut outcomes);
    push_outcomes(instance.axioms(schema), &mut outcomes);
    finish("instance", outcomes)
}

/// Schema axioms plus constraint model compliance axioms.
pub fn diagnose_model(schema: &TypeSchema, model: &ConstraintModel) -> DomainReport {
    let mut outcomes = Vec::new();
    push_outcomes(schema.axioms(), &mut outcomes);
    push_outcomes(model.model_axioms(schema), &mut outcomes);
    finish("model", outcomes)
}

/// Everything `validity` conjoins, one outcome per axiom.
pub fn diagnose_validity(
    schema: &TypeSchema,
    model: &ConstraintModel,
    instance: &Instance,
) -> DomainReport {
    let mut outcomes = Vec::new();
    push_outcomes(schema.axioms(), &mut outcomes);
    push_outcomes(model.model_axioms(schema), &mut outcomes);
    push_outcomes(instance.axioms(schema), &mut outcomes);
    push_outcomes(model.validity_axioms(schema, instance), &mut outcomes);
    finish("validity", outcomes)
}

fn finish(scope: &str, mut outcomes: Vec<CheckOutcome>) -> DomainReport {
    // Deterministic ordering: failures first, then by id.
    outcomes.sort_by(compare_outcomes);

    let verdict = Verdict::from_outcomes(&outcomes);
    let counts = OutcomeCounts::from_outcomes(&outcomes);
    debug!(
        scope,
        passed = counts.passed,
        failed = counts.failed,
        "diagnosis complete"
    );

    let report = DomainReport {
        verdict,
        outcomes,
        counts,
    };
    for (outcome, explanation) in report.explained_failures() {
        debug!(
            scope,
            check_id = %outcome.check_id,
            statement = explanation.map_or("", |e| e.statement),
            "check failed"
        );
    }
    report
}

fn compare_outcomes(a: &CheckOutcome, b: &CheckOutcome) -> std::cmp::Ordering {
    a.holds
        .cmp(&b.holds)
        .then_with(|| a.check_id.cmp(&b.check_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bank_constraints, bank_schema, first_bank, second_bank};
    use crom_types::ids;

    #[test]
    fn failures_sort_first() {
        let schema = bank_schema();
        let report = diagnose_validity(&schema, &bank_constraints(), &first_bank());
        assert_eq!(report.verdict, Verdict::Fail);

        let failed: Vec<&str> = report.failures().map(|o| o.check_id.as_str()).collect();
        assert_eq!(
            failed,
            vec![
                ids::CHECK_VALIDITY_INTRA,
                ids::CHECK_VALIDITY_RELATIONSHIP_CARDINALITY,
                ids::CHECK_VALIDITY_ROLE_CARDINALITY,
                ids::CHECK_VALIDITY_ROLE_IMPLICATION,
            ]
        );
        assert!(!report.outcomes[0].holds);
        assert_eq!(report.counts.failed, 4);
        assert_eq!(report.holds(ids::CHECK_VALIDITY_INTER_EXCLUSION), Some(true));

        let titles: Vec<&str> = report
            .explained_failures()
            .map(|(_, explanation)| explanation.expect("registered check").title)
            .collect();
        assert_eq!(titles[0], "Intra-relationship constraints");
        assert_eq!(titles.len(), 4);
    }

    #[test]
    fn inheritance_variant_reports_all_schema_axioms() {
        let report = diagnose_schema(&bank_schema());
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.outcomes.len(), 8);
    }

    #[test]
    fn valid_instance_passes_every_axiom() {
        let schema = bank_schema();
        let report = diagnose_validity(&schema, &bank_constraints(), &second_bank());
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.counts.failed, 0);
        // base-only instance axioms are skipped in the inheritance variant
        assert_eq!(report.holds(ids::CHECK_INSTANCE_LINK_COMPLETENESS), None);
    }

    #[test]
    fn model_diagnosis_flags_foreign_atoms() {
        let schema = bank_schema();
        let mut model = bank_constraints();
        model
            .role_constraints
            .entry("Transaction".into())
            .or_default()
            .push(crate::constraint::RoleConstraint::new(
                crom_types::Interval::ANY,
                crate::RoleExpression::leaf("Customer"),
            ));
        let report = diagnose_model(&schema, &model);
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.holds(ids::CHECK_MODEL_ROLE_CONSTRAINT_ATOMS), Some(false));
    }

    #[test]
    fn instance_diagnosis_runs_base_axioms_for_base_schema() {
        let schema = crate::test_support::fire_alarm_schema();
        let report = diagnose_instance(&schema, &crate::test_support::fire_alarm_instance());
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.outcomes.len(), 4 + 7);
    }
}
