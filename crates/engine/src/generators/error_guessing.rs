//! Error-guessing generator: turns selected heuristics (plus free-text
//! custom ones) into risk-class cases via an explicit heuristic → template
//! mapping.

use crate::canon::{normalize_key, normalize_value, parse_csv};
use crate::catalog::{Heuristic, TechniqueId};
use crate::types::{
    unique_strings, CaseType, DataMap, DataValue, DraftCase, ErrorGuessingConfig, Impact,
    Priority, Probability, SuggestedCase, WizardContext,
};

/// Which pass produced the cases; keeps fingerprints distinct when the
/// numeric/text generators embed error guessing internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EgMode {
    Numeric,
    Text,
    Generic,
}

impl EgMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "num",
            Self::Text => "txt",
            Self::Generic => "generic",
        }
    }
}

pub struct ErrorGuessingBuild {
    pub cases: Vec<DraftCase>,
    pub risks: Vec<String>,
    pub suggested_cases: Vec<SuggestedCase>,
}

pub fn build_error_guessing_cases(
    context: &WizardContext,
    cfg: &ErrorGuessingConfig,
    mode: EgMode,
) -> ErrorGuessingBuild {
    let subject = context.subject_or("Campo");
    let base_pre = context.preconditions.trim().to_string();
    let mut risks: Vec<String> = Vec::new();
    let mut suggested_cases = Vec::new();
    let mut cases = Vec::new();

    // Selected catalog heuristics first, then free-text customs; dedup by label
    let mut heuristics: Vec<Heuristic> = cfg.selected.clone();
    let custom_lines = cfg.custom_notes.replace('\n', ",");
    heuristics.extend(parse_csv(&custom_lines).into_iter().map(Heuristic::Custom));

    let mut seen = std::collections::HashSet::new();
    for heuristic in heuristics {
        let label = heuristic.label().trim().to_string();
        if label.is_empty() || !seen.insert(label.clone()) {
            continue;
        }
        suggested_cases.push(SuggestedCase::new(format!("Heurística: {label}")));
        if let Some(risk) = heuristic.risk() {
            risks.push(risk.to_string());
        }

        let risk_covered = {
            let mut pool = vec!["Falhas comuns e erros de uso".to_string()];
            pool.extend(risks.iter().cloned());
            unique_strings(pool)
                .into_iter()
                .take(2)
                .collect::<Vec<_>>()
                .join("; ")
        };

        let mut data = DataMap::new();
        data.insert("subject".into(), DataValue::Text(subject.clone()));
        data.insert("heuristic".into(), DataValue::Text(label.clone()));

        cases.push(
            DraftCase::new(
                format!(
                    "eg|{}|{}|{}",
                    mode.as_str(),
                    normalize_key(&subject),
                    normalize_value(&label)
                ),
                format!("{subject} — {label}"),
                CaseType::Risco,
            )
            .preconditions(base_pre.clone())
            .steps(heuristic.steps(&subject))
            .expected("Sistema lida corretamente, sem falhar ou corromper estado")
            .techniques(vec![TechniqueId::ErrorGuessing])
            .priority(Priority::Media)
            .impact(Impact::Medio)
            .probability(Probability::Media)
            .risk_category("Error Guessing")
            .risk_covered(risk_covered)
            .justification(format!("Heurística aplicada: {label}"))
            .data_used(data)
            .rationale(vec!["Error Guessing: mutação de risco".into()])
            .observations(cfg.custom_notes.trim()),
        );
    }

    ErrorGuessingBuild {
        cases,
        risks: unique_strings(risks),
        suggested_cases,
    }
}
