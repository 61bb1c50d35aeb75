//! Generation pipeline: technique generators produce drafts, constraints
//! reclassify them, the merger collapses duplicates and the limiter caps
//! the result. The whole pipeline is deterministic for equal inputs.

use crate::catalog::{SystemType, TechniqueId};
use crate::constraints::apply_constraints;
use crate::generators::{
    build_error_guessing_cases, generate_decision_table, generate_numeric_ep_bva,
    generate_placeholder, generate_state_transition, generate_text_ep_bva, EgMode,
};
use crate::limit::limit_cases;
use crate::merge::merge_cases;
use crate::types::{
    DraftCase, GenerationOutputs, GenerationSettings, LogicalConstraint, TechniqueConfigs,
    TechniqueOutput, TechniqueSelections, TestCase, WizardContext,
};

/// Everything one generation run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub cases: Vec<TestCase>,
    pub outputs: GenerationOutputs,
}

/// Run the full pipeline for the given wizard configuration.
///
/// Technique order is fixed (EP/BVA by system type, then decision table,
/// state transitions, planning placeholders, standalone error guessing)
/// so identical inputs always yield identical cases and identifiers.
///
/// Precondition checks live in [`crate::validate`]; callers run them
/// before invoking the pipeline.
#[must_use]
pub fn generate_all(
    context: &WizardContext,
    selections: &TechniqueSelections,
    configs: &TechniqueConfigs,
    constraints: &[LogicalConstraint],
    settings: &GenerationSettings,
) -> GenerationResult {
    let mut outputs = GenerationOutputs::default();
    let mut drafts: Vec<DraftCase> = Vec::new();
    let error_guessing = selections
        .error_guessing
        .then_some(&configs.error_guessing);

    if context.system_type == SystemType::CampoNumerico {
        log::debug!("generating numeric EP/BVA cases");
        let res = generate_numeric_ep_bva(
            context,
            selections,
            &configs.ep.numeric,
            &configs.bva.numeric,
            error_guessing,
        );
        record_outputs(&mut outputs, res.outputs);
        drafts.extend(res.cases);
    }

    if context.system_type == SystemType::CampoTexto {
        log::debug!("generating text EP/BVA cases");
        let res = generate_text_ep_bva(
            context,
            selections,
            &configs.ep.text,
            &configs.bva.text,
            error_guessing,
        );
        record_outputs(&mut outputs, res.outputs);
        drafts.extend(res.cases);
    }

    if selections.decision_table {
        log::debug!("generating decision-table cases");
        let (out, cases) =
            generate_decision_table(context, &configs.decision_table, &mut outputs.warnings);
        outputs.by_technique.insert(out.technique, out);
        drafts.extend(cases);
    }

    if selections.state_transition {
        log::debug!("generating state-transition cases");
        let (out, cases) = generate_state_transition(
            context,
            &configs.state_transition,
            settings.max_invalid_transitions,
        );
        outputs.by_technique.insert(out.technique, out);
        drafts.extend(cases);
    }

    if selections.use_case {
        let out = generate_placeholder(TechniqueId::UseCase);
        outputs.by_technique.insert(out.technique, out);
    }
    if selections.cause_effect {
        let out = generate_placeholder(TechniqueId::CauseEffect);
        outputs.by_technique.insert(out.technique, out);
    }

    // Standalone error guessing; on numeric/text systems the EP/BVA
    // generator already embedded it.
    if selections.error_guessing
        && context.system_type != SystemType::CampoNumerico
        && context.system_type != SystemType::CampoTexto
    {
        log::debug!("generating standalone error-guessing cases");
        let mut out = TechniqueOutput::new(TechniqueId::ErrorGuessing);
        let built = build_error_guessing_cases(context, &configs.error_guessing, EgMode::Generic);
        out.risks.extend(built.risks);
        out.suggested_cases.extend(built.suggested_cases);
        outputs.by_technique.insert(out.technique, out);
        drafts.extend(built.cases);
    }

    let constrained = apply_constraints(drafts, constraints, settings, &mut outputs.warnings);
    let mut cases = merge_cases(constrained);
    outputs.limit_applied = limit_cases(&mut cases, settings, &mut outputs.warnings);

    log::debug!(
        "generation complete: {} cases, {} warnings",
        cases.len(),
        outputs.warnings.len()
    );
    GenerationResult { cases, outputs }
}

fn record_outputs(outputs: &mut GenerationOutputs, produced: Vec<TechniqueOutput>) {
    for out in produced {
        outputs.by_technique.insert(out.technique, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CaseType, ConstraintEffect, LogicalClause, LogicalOp};
    use pretty_assertions::assert_eq;

    fn defaults() -> (
        WizardContext,
        TechniqueSelections,
        TechniqueConfigs,
        GenerationSettings,
    ) {
        (
            WizardContext::default(),
            TechniqueSelections {
                ep: true,
                bva: true,
                error_guessing: false,
                ..TechniqueSelections::default()
            },
            TechniqueConfigs::default(),
            GenerationSettings::default(),
        )
    }

    #[test]
    fn test_numeric_default_run() {
        let (context, selections, configs, settings) = defaults();
        let res = generate_all(&context, &selections, &configs, &[], &settings);
        assert_eq!(res.cases.len(), 5);
        assert!(res.outputs.by_technique.contains_key(&TechniqueId::Ep));
        assert!(res.outputs.by_technique.contains_key(&TechniqueId::Bva));
        assert!(res.outputs.limit_applied.is_none());
        for case in &res.cases {
            assert!(case.id.starts_with("CT-"));
            assert_eq!(case.id, format!("CT-{}", case.logical_hash));
        }
    }

    #[test]
    fn test_determinism() {
        let (context, selections, configs, settings) = defaults();
        let a = generate_all(&context, &selections, &configs, &[], &settings);
        let b = generate_all(&context, &selections, &configs, &[], &settings);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_duplicate_fingerprints() {
        let (context, mut selections, configs, settings) = defaults();
        selections.error_guessing = true;
        let res = generate_all(&context, &selections, &configs, &[], &settings);
        let mut fingerprints: Vec<&str> =
            res.cases.iter().map(|c| c.fingerprint.as_str()).collect();
        fingerprints.sort_unstable();
        let before = fingerprints.len();
        fingerprints.dedup();
        assert_eq!(fingerprints.len(), before);
    }

    #[test]
    fn test_constraint_marks_minimum_case_negative() {
        let (context, selections, configs, settings) = defaults();
        let constraints = vec![LogicalConstraint {
            id: "c1".into(),
            name: "Valor mínimo bloqueado".into(),
            effect: ConstraintEffect::Proibida,
            clauses: vec![LogicalClause {
                left: "value".into(),
                op: LogicalOp::Eq,
                right: "10".into(),
            }],
            message: "Valor mínimo não pode ser usado".into(),
        }];
        let res = generate_all(&context, &selections, &configs, &constraints, &settings);
        let min_case = res
            .cases
            .iter()
            .find(|c| c.title.contains("limite mínimo"))
            .unwrap();
        assert_eq!(min_case.case_type, CaseType::Negativo);
        assert!(min_case
            .rationale
            .iter()
            .any(|r| r.contains("Valor mínimo bloqueado")));
    }

    #[test]
    fn test_uncovered_mandatory_adds_case_and_warning() {
        let (context, selections, configs, settings) = defaults();
        let constraints = vec![LogicalConstraint {
            id: "c2".into(),
            name: "Teto do sistema".into(),
            effect: ConstraintEffect::Obrigatoria,
            clauses: vec![LogicalClause {
                left: "value".into(),
                op: LogicalOp::Eq,
                right: "9999".into(),
            }],
            message: "Sistema deve recusar o teto".into(),
        }];
        let res = generate_all(&context, &selections, &configs, &constraints, &settings);
        assert!(res
            .outputs
            .warnings
            .iter()
            .any(|w| w.contains("Restrição obrigatória não coberta")));
        assert!(res
            .cases
            .iter()
            .any(|c| c.fingerprint.starts_with("mandatory|")));
    }

    #[test]
    fn test_limiter_engages() {
        let (context, selections, configs, mut settings) = defaults();
        settings.max_cases = 2;
        let res = generate_all(&context, &selections, &configs, &[], &settings);
        assert_eq!(res.cases.len(), 2);
        let applied = res.outputs.limit_applied.unwrap();
        assert_eq!((applied.before, applied.after), (5, 2));
        assert!(res
            .outputs
            .warnings
            .iter()
            .any(|w| w.contains("Limite de casos aplicado")));
    }

    #[test]
    fn test_placeholders_produce_no_cases() {
        let (context, _, configs, settings) = defaults();
        let selections = TechniqueSelections {
            ep: false,
            bva: false,
            error_guessing: false,
            use_case: true,
            cause_effect: true,
            ..TechniqueSelections::default()
        };
        let res = generate_all(&context, &selections, &configs, &[], &settings);
        assert!(res.cases.is_empty());
        assert!(res.outputs.by_technique.contains_key(&TechniqueId::UseCase));
        assert!(res
            .outputs
            .by_technique
            .contains_key(&TechniqueId::CauseEffect));
    }

    #[test]
    fn test_preconditions_stay_with_the_caller() {
        let (mut context, selections, configs, settings) = defaults();
        context.feature_name.clear();
        // validate rejects the incomplete context; the pipeline itself
        // stays total and still produces a deterministic result
        assert!(crate::validate::validate(&context, &selections, &configs).is_err());
        let res = generate_all(&context, &selections, &configs, &[], &settings);
        assert_eq!(res, generate_all(&context, &selections, &configs, &[], &settings));
    }
}
