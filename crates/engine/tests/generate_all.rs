//! End-to-end pipeline runs against the default wizard configuration.

use caseforge_engine::{generate_all, stable_hash36};
use caseforge_engine::types::{
    CaseType, ConstraintEffect, GenerationSettings, Impact, LogicalClause, LogicalConstraint,
    LogicalOp, Probability, Severity, TechniqueConfigs, TechniqueSelections, WizardContext,
};
use proptest::prelude::*;

fn ep_bva_selections() -> TechniqueSelections {
    TechniqueSelections {
        ep: true,
        bva: true,
        error_guessing: false,
        ..TechniqueSelections::default()
    }
}

#[test]
fn default_numeric_run_yields_five_identified_cases() {
    let res = generate_all(
        &WizardContext::default(),
        &ep_bva_selections(),
        &TechniqueConfigs::default(),
        &[],
        &GenerationSettings::default(),
    );

    assert_eq!(res.cases.len(), 5);
    for case in &res.cases {
        assert_eq!(case.id, format!("CT-{}", case.logical_hash));
        assert_eq!(case.logical_hash, stable_hash36(&case.fingerprint));
        assert_eq!(
            case.severity,
            Severity::derive(case.impact, case.probability)
        );
        assert!(!case.steps.is_empty());
        assert!(!case.expected.is_empty());
    }
    // Export order is stable: titles ascending
    let titles: Vec<&str> = res.cases.iter().map(|c| c.title.as_str()).collect();
    let mut sorted = titles.clone();
    sorted.sort_unstable();
    assert_eq!(titles, sorted);
}

#[test]
fn error_guessing_heuristics_pass_through() {
    let mut selections = ep_bva_selections();
    selections.error_guessing = true;
    let res = generate_all(
        &WizardContext::default(),
        &selections,
        &TechniqueConfigs::default(),
        &[],
        &GenerationSettings::default(),
    );

    let eg_cases: Vec<_> = res
        .cases
        .iter()
        .filter(|c| c.fingerprint.starts_with("eg|"))
        .collect();
    assert!(!eg_cases.is_empty());
    for case in eg_cases {
        assert_eq!(case.case_type, CaseType::Risco);
    }
}

#[test]
fn prohibited_minimum_becomes_negative_and_mandatory_warns() {
    let constraints = vec![
        LogicalConstraint {
            id: "proibida".into(),
            name: "Valor mínimo proibido".into(),
            effect: ConstraintEffect::Proibida,
            clauses: vec![LogicalClause {
                left: "value".into(),
                op: LogicalOp::Eq,
                right: "10".into(),
            }],
            message: "O valor mínimo deve ser recusado".into(),
        },
        LogicalConstraint {
            id: "obrigatoria".into(),
            name: "Teto extremo".into(),
            effect: ConstraintEffect::Obrigatoria,
            clauses: vec![LogicalClause {
                left: "value".into(),
                op: LogicalOp::Eq,
                right: "9999".into(),
            }],
            message: "Teto extremo deve ser coberto".into(),
        },
    ];
    let res = generate_all(
        &WizardContext::default(),
        &ep_bva_selections(),
        &TechniqueConfigs::default(),
        &constraints,
        &GenerationSettings::default(),
    );

    let min_case = res
        .cases
        .iter()
        .find(|c| c.title.contains("limite mínimo"))
        .expect("minimum boundary case");
    assert_eq!(min_case.case_type, CaseType::Negativo);

    assert!(res
        .outputs
        .warnings
        .iter()
        .any(|w| w == "Restrição obrigatória não coberta por nenhum caso: Teto extremo"));
    assert!(res
        .cases
        .iter()
        .any(|c| c.title == "Cenário obrigatório: Teto extremo"));
}

#[test]
fn repeated_runs_are_bit_identical() {
    let run = || {
        let res = generate_all(
            &WizardContext::default(),
            &ep_bva_selections(),
            &TechniqueConfigs::default(),
            &[],
            &GenerationSettings::default(),
        );
        serde_json::to_string(&res.cases).expect("serialize")
    };
    assert_eq!(run(), run());
}

proptest! {
    #[test]
    fn case_count_never_exceeds_cap(max_cases in 1u32..10) {
        let settings = GenerationSettings { max_cases, ..GenerationSettings::default() };
        let mut selections = ep_bva_selections();
        selections.error_guessing = true;
        let res = generate_all(
            &WizardContext::default(),
            &selections,
            &TechniqueConfigs::default(),
            &[],
            &settings,
        );
        prop_assert!(res.cases.len() <= max_cases as usize);
    }

    #[test]
    fn severity_follows_combined_score(
        impact in prop_oneof![Just(Impact::Alto), Just(Impact::Medio), Just(Impact::Baixo)],
        probability in prop_oneof![
            Just(Probability::Alta),
            Just(Probability::Media),
            Just(Probability::Baixa),
        ],
    ) {
        let severity = Severity::derive(impact, probability);
        let score = impact.score() + probability.score();
        let expected = if score >= 3 {
            Severity::Alta
        } else if score == 2 {
            Severity::Media
        } else {
            Severity::Baixa
        };
        prop_assert_eq!(severity, expected);
    }

    #[test]
    fn hash_is_deterministic_and_base36(input in ".*") {
        let a = stable_hash36(&input);
        let b = stable_hash36(&input);
        prop_assert_eq!(&a, &b);
        prop_assert!(a.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        prop_assert!(!a.is_empty());
    }
}
