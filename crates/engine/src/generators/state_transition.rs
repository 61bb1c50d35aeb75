//! State-transition generator: positive cases for authored transitions,
//! a bounded sample of negative cases from the state×event complement,
//! and a BFS reachability report.

use std::collections::{HashSet, VecDeque};

use crate::canon::{normalize_key, normalize_value, parse_csv};
use crate::catalog::TechniqueId;
use crate::types::{
    CaseType, Combination, DataMap, DataValue, DraftCase, Priority, StateTransitionConfig,
    SuggestedCase, TechniqueOutput, WizardContext,
};

pub fn generate_state_transition(
    context: &WizardContext,
    cfg: &StateTransitionConfig,
    max_invalid_transitions: u32,
) -> (TechniqueOutput, Vec<DraftCase>) {
    let mut out = TechniqueOutput::new(TechniqueId::StateTransition);
    let states = parse_csv(&cfg.states_csv);
    let events = parse_csv(&cfg.events_csv);
    let transitions: Vec<_> = cfg
        .transitions
        .iter()
        .filter(|t| {
            !t.from.trim().is_empty() && !t.event.trim().is_empty() && !t.to.trim().is_empty()
        })
        .collect();

    out.combinations.push(Combination {
        label: "Estados".into(),
        items: states.clone(),
    });
    out.combinations.push(Combination {
        label: "Eventos".into(),
        items: events.clone(),
    });
    out.combinations.push(Combination {
        label: "Transições".into(),
        items: transitions
            .iter()
            .map(|t| format!("{} --{}--> {}", t.from, t.event, t.to))
            .collect(),
    });

    let mut drafts = Vec::new();
    let base_pre = context.preconditions.trim().to_string();
    let subject = context.subject_or_feature("Fluxo");

    if states.is_empty() || events.is_empty() {
        out.risks
            .push("Preencha estados e eventos para gerar transições".into());
        return (out, drafts);
    }

    let valid_pairs: HashSet<String> = transitions
        .iter()
        .map(|t| format!("{}|{}", t.from, t.event))
        .collect();

    // Complement of the authored pairs, in state-then-event list order
    let mut invalid_pairs: Vec<(&str, &str)> = Vec::new();
    for s in &states {
        for e in &events {
            if !valid_pairs.contains(&format!("{s}|{e}")) {
                invalid_pairs.push((s, e));
            }
        }
    }

    // Reachability from the declared (or first) initial state
    let initial = if cfg.initial_state.trim().is_empty() {
        states.first().cloned().unwrap_or_default()
    } else {
        cfg.initial_state.trim().to_string()
    };
    let mut reachable: HashSet<String> = HashSet::new();
    let mut queue = VecDeque::new();
    if !initial.is_empty() {
        reachable.insert(initial.clone());
        queue.push_back(initial);
    }
    while let Some(cur) = queue.pop_front() {
        for t in &transitions {
            if t.from == cur && reachable.insert(t.to.clone()) {
                queue.push_back(t.to.clone());
            }
        }
    }
    let unreachable: Vec<&str> = states
        .iter()
        .filter(|s| !reachable.contains(*s))
        .map(String::as_str)
        .collect();
    if !unreachable.is_empty() {
        out.risks.push(format!(
            "Estados possivelmente inalcançáveis: {}",
            unreachable.join(", ")
        ));
    }

    for t in &transitions {
        let mut data = DataMap::new();
        data.insert("subject".into(), DataValue::Text(subject.clone()));
        data.insert("from".into(), DataValue::Text(t.from.clone()));
        data.insert("event".into(), DataValue::Text(t.event.clone()));
        data.insert("to".into(), DataValue::Text(t.to.clone()));
        data.insert("valid".into(), DataValue::Bool(true));
        drafts.push(
            DraftCase::new(
                format!(
                    "st|{}|valid|{}|{}|{}",
                    normalize_key(&subject),
                    normalize_value(&t.from),
                    normalize_value(&t.event),
                    normalize_value(&t.to)
                ),
                format!("{subject}: {} → {} ({})", t.from, t.to, t.event),
                CaseType::Positivo,
            )
            .preconditions(base_pre.clone())
            .steps(vec![
                format!("Colocar o sistema em estado \"{}\"", t.from),
                format!("Executar evento \"{}\"", t.event),
            ])
            .expected(format!("Sistema transita para \"{}\"", t.to))
            .techniques(vec![TechniqueId::StateTransition])
            .data_used(data)
            .justification("Transição de estado válida")
            .rationale(vec!["Transição de Estados: transição válida".into()]),
        );
    }

    for (from, event) in invalid_pairs
        .into_iter()
        .take(max_invalid_transitions as usize)
    {
        let mut data = DataMap::new();
        data.insert("subject".into(), DataValue::Text(subject.clone()));
        data.insert("from".into(), DataValue::Text(from.to_string()));
        data.insert("event".into(), DataValue::Text(event.to_string()));
        data.insert("valid".into(), DataValue::Bool(false));
        drafts.push(
            DraftCase::new(
                format!(
                    "st|{}|invalid|{}|{}",
                    normalize_key(&subject),
                    normalize_value(from),
                    normalize_value(event)
                ),
                format!("{subject}: transição inválida a partir de \"{from}\" com \"{event}\""),
                CaseType::Negativo,
            )
            .preconditions(base_pre.clone())
            .steps(vec![
                format!("Colocar o sistema em estado \"{from}\""),
                format!("Executar evento \"{event}\""),
            ])
            .expected("Sistema bloqueia a transição e mantém estado consistente")
            .techniques(vec![TechniqueId::StateTransition])
            .priority(Priority::Alta)
            .data_used(data)
            .risk_category("Transição inválida")
            .justification("Transição não permitida pela máquina de estados")
            .rationale(vec!["Transição de Estados: transição inválida".into()]),
        );
    }

    out.suggested_cases
        .push(SuggestedCase::new("Transições válidas"));
    out.suggested_cases
        .push(SuggestedCase::new("Transições inválidas (amostra)"));
    out.suggested_cases
        .push(SuggestedCase::new("Estados inalcançáveis (se houver)"));

    (out, drafts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> WizardContext {
        WizardContext {
            subject_name: "Fatura".into(),
            preconditions: String::new(),
            ..WizardContext::default()
        }
    }

    #[test]
    fn test_valid_and_invalid_cases() {
        let cfg = StateTransitionConfig::default();
        let (out, drafts) = generate_state_transition(&context(), &cfg, 12);
        // 3 authored transitions; 4 states × 3 events = 12 pairs, 3 valid → 9 invalid
        let valid: Vec<_> = drafts
            .iter()
            .filter(|d| d.case_type == CaseType::Positivo)
            .collect();
        let invalid: Vec<_> = drafts
            .iter()
            .filter(|d| d.case_type == CaseType::Negativo)
            .collect();
        assert_eq!(valid.len(), 3);
        assert_eq!(invalid.len(), 9);
        assert_eq!(
            valid[0].title,
            "Fatura: Aberta → Processando (Confirmar)"
        );
        assert!(out.risks.is_empty());
    }

    #[test]
    fn test_invalid_sample_is_bounded_and_ordered() {
        let cfg = StateTransitionConfig::default();
        let (_, drafts) = generate_state_transition(&context(), &cfg, 2);
        let invalid: Vec<_> = drafts
            .iter()
            .filter(|d| d.case_type == CaseType::Negativo)
            .collect();
        assert_eq!(invalid.len(), 2);
        // First-N in state-list then event-list order: Aberta misses Pagar first
        assert!(invalid[0].title.contains("\"Aberta\" com \"Pagar\""));
        assert!(invalid[1].title.contains("\"Aberta\" com \"Cancelar\""));
    }

    #[test]
    fn test_unreachable_states_reported_as_risk() {
        let mut cfg = StateTransitionConfig::default();
        cfg.states_csv = "Aberta, Processando, Paga, Fechada, Arquivada".into();
        let (out, _) = generate_state_transition(&context(), &cfg, 0);
        assert!(out
            .risks
            .iter()
            .any(|r| r.contains("inalcançáveis") && r.contains("Arquivada")));
    }

    #[test]
    fn test_empty_model_yields_note_only() {
        let cfg = StateTransitionConfig {
            states_csv: String::new(),
            events_csv: String::new(),
            initial_state: String::new(),
            transitions: vec![],
        };
        let (out, drafts) = generate_state_transition(&context(), &cfg, 12);
        assert!(drafts.is_empty());
        assert_eq!(
            out.risks,
            vec!["Preencha estados e eventos para gerar transições"]
        );
    }

    #[test]
    fn test_first_state_is_default_initial() {
        let mut cfg = StateTransitionConfig::default();
        cfg.initial_state = String::new();
        let (out, _) = generate_state_transition(&context(), &cfg, 0);
        // BFS from "Aberta" still reaches every state
        assert!(out.risks.is_empty());
    }
}
