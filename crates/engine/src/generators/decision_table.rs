//! Decision-table generator: one positive case per authored rule, plus
//! data-quality warnings for spelling-ambiguous labels, duplicate rules
//! and wildcard overlaps with diverging actions.

use crate::canon::{normalize_key, parse_csv};
use crate::catalog::TechniqueId;
use crate::types::{
    CaseType, Combination, DataMap, DataValue, DraftCase, DecisionTableConfig, SuggestedCase,
    TechniqueOutput, TriState, WizardContext,
};

struct NormalizedRule {
    idx: usize,
    name: String,
    when: Vec<TriState>,
    then: Vec<bool>,
}

pub fn generate_decision_table(
    context: &WizardContext,
    cfg: &DecisionTableConfig,
    warnings: &mut Vec<String>,
) -> (TechniqueOutput, Vec<DraftCase>) {
    let mut out = TechniqueOutput::new(TechniqueId::DecisionTable);
    let conditions = parse_csv(&cfg.conditions_csv);
    let actions = parse_csv(&cfg.actions_csv);
    out.combinations.push(Combination {
        label: "Condições".into(),
        items: conditions.clone(),
    });
    out.combinations.push(Combination {
        label: "Ações".into(),
        items: actions.clone(),
    });

    warn_spelling_ambiguity(&conditions, "condição", warnings);
    warn_spelling_ambiguity(&actions, "ação", warnings);

    let mut drafts = Vec::new();
    let base_pre = context.preconditions.trim().to_string();
    let subject = context.subject_or_feature("Regra");

    if conditions.is_empty() || actions.is_empty() {
        out.risks
            .push("Preencha condições e ações para gerar casos de tabela de decisão".into());
        return (out, drafts);
    }

    // Pad/truncate authored vectors to the declared condition/action counts
    let rules: Vec<NormalizedRule> = cfg
        .rules
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let when = (0..conditions.len())
                .map(|i| r.when.get(i).copied().unwrap_or(TriState::Qualquer))
                .collect();
            let then = (0..actions.len())
                .map(|i| r.then.get(i).copied().unwrap_or(false))
                .collect();
            let name = if r.name.trim().is_empty() {
                format!("Regra {}", idx + 1)
            } else {
                r.name.trim().to_string()
            };
            NormalizedRule {
                idx,
                name,
                when,
                then,
            }
        })
        .collect();

    for i in 0..rules.len() {
        for j in (i + 1)..rules.len() {
            let (a, b) = (&rules[i], &rules[j]);
            let exact_same = a.when == b.when;
            if exact_same && a.then == b.then {
                warnings.push(format!(
                    "Tabela de decisão: regras duplicadas ({} e {})",
                    a.name, b.name
                ));
                continue;
            }
            let overlaps = a
                .when
                .iter()
                .zip(&b.when)
                .all(|(x, y)| x.overlaps(*y));
            if overlaps && a.then != b.then {
                warnings.push(format!(
                    "Tabela de decisão: regras potencialmente ambíguas ({} ↔ {})",
                    a.name, b.name
                ));
            }
        }
    }

    for rule in &rules {
        let when_pairs: Vec<String> = conditions
            .iter()
            .zip(&rule.when)
            .map(|(c, v)| format!("{c}: {}", v.label()))
            .collect();
        let then_actions: Vec<&str> = actions
            .iter()
            .zip(&rule.then)
            .filter(|(_, on)| **on)
            .map(|(a, _)| a.as_str())
            .collect();

        let expected = if then_actions.is_empty() {
            "Resultado esperado: sem ação".to_string()
        } else {
            format!("Resultado esperado: {}", then_actions.join("; "))
        };
        out.suggested_cases
            .push(SuggestedCase::new(format!("{subject} — {}", rule.name)));

        let mut data = DataMap::new();
        data.insert("subject".into(), DataValue::Text(subject.clone()));
        data.insert("rule".into(), DataValue::Text(rule.name.clone()));
        for (c, v) in conditions.iter().zip(&rule.when) {
            data.insert(normalize_key(c), DataValue::Text(v.as_str().to_string()));
        }
        data.insert(
            "conditions".into(),
            DataValue::Text(when_pairs.join("; ")),
        );
        data.insert("actions".into(), DataValue::Text(then_actions.join("; ")));

        let mut steps = vec!["Configurar condições:".to_string()];
        steps.extend(when_pairs.iter().map(|x| format!("- {x}")));
        steps.push("Executar o cenário e observar o resultado".into());

        drafts.push(
            DraftCase::new(
                format!(
                    "dt|{}|{}|{}|{}",
                    normalize_key(&subject),
                    rule.idx,
                    when_pairs.join("|"),
                    then_actions.join("|")
                ),
                format!("{subject} — {}", rule.name),
                CaseType::Positivo,
            )
            .preconditions(base_pre.clone())
            .steps(steps)
            .expected(expected)
            .techniques(vec![TechniqueId::DecisionTable])
            .data_used(data)
            .justification(format!("Tabela de decisão: {}", rule.name))
            .rationale(vec!["Tabela de Decisão: regra explícita".into()]),
        );
    }

    (out, drafts)
}

/// Two labels that normalize identically but are spelled differently are
/// almost certainly the same condition/action typed twice.
fn warn_spelling_ambiguity(labels: &[String], kind: &str, warnings: &mut Vec<String>) {
    let mut seen: std::collections::HashMap<String, &String> = std::collections::HashMap::new();
    for label in labels {
        let key = normalize_key(label);
        if let Some(prev) = seen.get(&key) {
            if *prev != label {
                warnings.push(format!(
                    "Tabela de decisão: {kind} ambígua por variação de escrita ({prev} vs {label})"
                ));
            }
        } else {
            seen.insert(key, label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecisionTableRule;
    use pretty_assertions::assert_eq;

    fn context() -> WizardContext {
        WizardContext {
            subject_name: String::new(),
            feature_name: "Oferta".into(),
            preconditions: String::new(),
            ..WizardContext::default()
        }
    }

    #[test]
    fn test_one_case_per_rule() {
        let cfg = DecisionTableConfig::default();
        let mut warnings = Vec::new();
        let (out, drafts) = generate_decision_table(&context(), &cfg, &mut warnings);
        assert_eq!(drafts.len(), 3);
        assert!(warnings.is_empty());
        assert_eq!(out.combinations[0].items.len(), 2);
        assert_eq!(drafts[0].title, "Oferta — Cliente antigo sem dívida");
        assert_eq!(drafts[0].expected, "Resultado esperado: Oferta X");
        assert_eq!(drafts[1].expected, "Resultado esperado: sem ação");
    }

    #[test]
    fn test_condition_values_land_in_data_used() {
        let cfg = DecisionTableConfig::default();
        let mut warnings = Vec::new();
        let (_, drafts) = generate_decision_table(&context(), &cfg, &mut warnings);
        assert_eq!(
            drafts[0].data_used.get("cliente antigo"),
            Some(&DataValue::Text("sim".into()))
        );
        assert_eq!(
            drafts[0].data_used.get("possui divida"),
            Some(&DataValue::Text("nao".into()))
        );
    }

    #[test]
    fn test_empty_table_yields_risk_note() {
        let cfg = DecisionTableConfig {
            conditions_csv: String::new(),
            actions_csv: String::new(),
            rules: vec![],
        };
        let mut warnings = Vec::new();
        let (out, drafts) = generate_decision_table(&context(), &cfg, &mut warnings);
        assert!(drafts.is_empty());
        assert_eq!(out.risks.len(), 1);
    }

    #[test]
    fn test_duplicate_rules_warn_without_suppression() {
        let rule = DecisionTableRule {
            name: "R".into(),
            when: vec![TriState::Sim, TriState::Sim],
            then: vec![true, false],
        };
        let cfg = DecisionTableConfig {
            rules: vec![rule.clone(), rule],
            ..DecisionTableConfig::default()
        };
        let mut warnings = Vec::new();
        let (_, drafts) = generate_decision_table(&context(), &cfg, &mut warnings);
        assert_eq!(drafts.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("regras duplicadas")));
    }

    #[test]
    fn test_wildcard_overlap_with_diverging_actions_warns() {
        let cfg = DecisionTableConfig {
            rules: vec![
                DecisionTableRule {
                    name: "A".into(),
                    when: vec![TriState::Sim, TriState::Qualquer],
                    then: vec![true, false],
                },
                DecisionTableRule {
                    name: "B".into(),
                    when: vec![TriState::Sim, TriState::Nao],
                    then: vec![false, true],
                },
            ],
            ..DecisionTableConfig::default()
        };
        let mut warnings = Vec::new();
        generate_decision_table(&context(), &cfg, &mut warnings);
        assert!(warnings
            .iter()
            .any(|w| w.contains("potencialmente ambíguas")));
    }

    #[test]
    fn test_spelling_variation_warns() {
        let cfg = DecisionTableConfig {
            conditions_csv: "Cliente Antigo, cliente antigo".into(),
            ..DecisionTableConfig::default()
        };
        let mut warnings = Vec::new();
        generate_decision_table(&context(), &cfg, &mut warnings);
        assert!(warnings
            .iter()
            .any(|w| w.contains("variação de escrita")));
    }

    #[test]
    fn test_short_rule_vectors_pad_with_wildcard_and_false() {
        let cfg = DecisionTableConfig {
            rules: vec![DecisionTableRule {
                name: String::new(),
                when: vec![TriState::Sim],
                then: vec![],
            }],
            ..DecisionTableConfig::default()
        };
        let mut warnings = Vec::new();
        let (_, drafts) = generate_decision_table(&context(), &cfg, &mut warnings);
        assert_eq!(drafts[0].title, "Oferta — Regra 1");
        assert!(drafts[0]
            .steps
            .iter()
            .any(|s| s.contains("Possui dívida: Qualquer")));
        assert_eq!(drafts[0].expected, "Resultado esperado: sem ação");
    }
}
