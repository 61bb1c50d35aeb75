//! Logical-constraint engine: evaluates authored AND-clause rules against
//! each draft's recorded input data, reclassifies or drops prohibited
//! matches, and synthesizes coverage cases for uncovered mandatory rules.

use std::collections::HashMap;

use crate::canon::{normalize_key, normalize_value, stable_hash36};
use crate::types::{
    unique_join, unique_strings, CaseType, ConstraintEffect, DataMap, DataValue, DraftCase,
    GenerationSettings, Impact, LogicalClause, LogicalConstraint, LogicalOp, Priority,
    Probability, ProhibitedHandling,
};

/// Evaluate one clause against a case's data. String operators compare
/// the (optionally normalized) rendered value; ordering operators require
/// both sides to parse as numbers (comma-as-decimal tolerated, the empty
/// string coerces to zero) and are false otherwise. A missing or null key
/// compares as the empty string, so ordering clauses treat it as zero.
pub fn evaluate_clause(data: &DataMap, clause: &LogicalClause, normalize: bool) -> bool {
    let key = if normalize {
        normalize_key(&clause.left)
    } else {
        clause.left.trim().to_string()
    };
    let actual = data.get(&key).map_or_else(String::new, DataValue::comparable);
    let a = if normalize {
        normalize_value(&actual)
    } else {
        actual
    };
    let b = if normalize {
        normalize_value(&clause.right)
    } else {
        clause.right.clone()
    };

    match clause.op {
        LogicalOp::Eq => a == b,
        LogicalOp::Ne => a != b,
        LogicalOp::Contains => a.contains(&b),
        LogicalOp::Lt | LogicalOp::Le | LogicalOp::Gt | LogicalOp::Ge => {
            let an = parse_number(&a);
            let bn = parse_number(&b);
            match (an, bn) {
                (Some(x), Some(y)) => match clause.op {
                    LogicalOp::Lt => x < y,
                    LogicalOp::Le => x <= y,
                    LogicalOp::Gt => x > y,
                    LogicalOp::Ge => x >= y,
                    _ => unreachable!(),
                },
                _ => false,
            }
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn matches_all(case: &DraftCase, constraint: &LogicalConstraint, normalize: bool) -> bool {
    !constraint.clauses.is_empty()
        && constraint
            .clauses
            .iter()
            .all(|cl| evaluate_clause(&case.data_used, cl, normalize))
}

fn clause_signature(constraint: &LogicalConstraint, normalize: bool) -> String {
    let mut parts: Vec<String> = constraint
        .clauses
        .iter()
        .map(|cl| {
            let key = if normalize {
                normalize_key(&cl.left)
            } else {
                cl.left.trim().to_string()
            };
            let val = if normalize {
                normalize_value(&cl.right)
            } else {
                cl.right.clone()
            };
            format!("{key}{}{val}", cl.op)
        })
        .collect();
    parts.sort();
    parts.join("&")
}

/// Run the constraint pass over the pooled drafts. Returns the surviving
/// (possibly reclassified) drafts plus any synthesized mandatory cases;
/// data-quality findings are appended to `warnings`.
pub fn apply_constraints(
    drafts: Vec<DraftCase>,
    constraints: &[LogicalConstraint],
    settings: &GenerationSettings,
    warnings: &mut Vec<String>,
) -> Vec<DraftCase> {
    if constraints.is_empty() {
        return drafts;
    }
    let normalize = settings.normalize;

    // Same condition set authored twice with different effects is a
    // contradiction the caller has to resolve; warn, last one wins.
    let mut sig_to_effect: HashMap<String, ConstraintEffect> = HashMap::new();
    for c in constraints {
        let sig = clause_signature(c, normalize);
        if let Some(prev) = sig_to_effect.get(&sig) {
            if *prev != c.effect {
                warnings.push(format!(
                    "Conflito de restrições: mesma condição marcada como {prev} e {} ({})",
                    c.effect, c.name
                ));
            }
        }
        sig_to_effect.insert(sig, c.effect);
    }

    let mut updated: Vec<DraftCase> = Vec::new();
    for mut draft in drafts {
        let matches: Vec<&LogicalConstraint> = constraints
            .iter()
            .filter(|c| matches_all(&draft, c, normalize))
            .collect();

        let has_prohibited = matches
            .iter()
            .any(|m| m.effect == ConstraintEffect::Proibida);
        if has_prohibited && settings.prohibited_handling == ProhibitedHandling::Excluir {
            continue;
        }

        for c in matches {
            if c.effect != ConstraintEffect::Proibida {
                continue;
            }
            draft.case_type = draft.case_type.merge(CaseType::Negativo);
            draft.priority = Priority::Alta;
            draft.risk_category = unique_join(&[&draft.risk_category, "Restrição lógica"]);
            let mut rationale = draft.rationale.clone();
            rationale.push(format!("Restrição lógica: {}", c.name));
            draft.rationale = unique_strings(rationale);
            draft.risk_covered = unique_join(&[&draft.risk_covered, &c.message]);
            if draft.justification.is_empty() {
                draft.justification =
                    format!("Cenário marcado como negativo por restrição: {}", c.name);
            }
        }

        updated.push(draft);
    }

    for c in constraints {
        if c.effect != ConstraintEffect::Obrigatoria {
            continue;
        }
        let covered = updated.iter().any(|d| {
            c.clauses
                .iter()
                .all(|cl| evaluate_clause(&d.data_used, cl, normalize))
        });
        if covered {
            continue;
        }
        warnings.push(format!(
            "Restrição obrigatória não coberta por nenhum caso: {}",
            c.name
        ));
        if !settings.create_missing_mandatory_cases {
            continue;
        }
        updated.push(synthesize_mandatory_case(c, normalize));
    }

    updated
}

/// Build the placeholder case guaranteeing an uncovered mandatory rule
/// still shows up in the exported artifact.
fn synthesize_mandatory_case(c: &LogicalConstraint, normalize: bool) -> DraftCase {
    let clause_descr = c
        .clauses
        .iter()
        .map(|cl| format!("{}{}{}", cl.left, cl.op, cl.right))
        .collect::<Vec<_>>()
        .join("&");
    let fingerprint = format!(
        "mandatory|{}",
        stable_hash36(&format!("{}|{clause_descr}", c.name))
    );

    let mut steps = vec!["Preparar condições:".to_string()];
    steps.extend(
        c.clauses
            .iter()
            .map(|cl| format!("- {} {} {}", cl.left, cl.op, cl.right)),
    );
    steps.push("Executar o cenário".into());

    let expected = if c.message.trim().is_empty() {
        "Validar resultado esperado conforme regra obrigatória".to_string()
    } else {
        c.message.trim().to_string()
    };

    let mut data = DataMap::new();
    for cl in &c.clauses {
        let key = if normalize {
            normalize_key(&cl.left)
        } else {
            cl.left.trim().to_string()
        };
        data.insert(key, DataValue::Text(cl.right.clone()));
    }

    DraftCase::new(
        fingerprint,
        format!("Cenário obrigatório: {}", c.name),
        CaseType::Risco,
    )
    .steps(steps)
    .expected(expected)
    .priority(Priority::Alta)
    .impact(Impact::Alto)
    .probability(Probability::Media)
    .risk_category("Obrigatório")
    .risk_covered(c.name.clone())
    .justification("Cenário não foi gerado por técnicas; criado para garantir cobertura")
    .data_used(data)
    .rationale(vec!["Restrição obrigatória: criado pelo motor".into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn clause(left: &str, op: LogicalOp, right: &str) -> LogicalClause {
        LogicalClause {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    fn constraint(
        name: &str,
        effect: ConstraintEffect,
        clauses: Vec<LogicalClause>,
    ) -> LogicalConstraint {
        LogicalConstraint {
            id: name.into(),
            name: name.into(),
            effect,
            clauses,
            message: format!("mensagem de {name}"),
        }
    }

    fn draft_with(key: &str, value: DataValue) -> DraftCase {
        let mut data = DataMap::new();
        data.insert(key.into(), value);
        DraftCase::new("fp", "caso", CaseType::Positivo).data_used(data)
    }

    #[test]
    fn test_string_operators() {
        let data = {
            let mut d = DataMap::new();
            d.insert("value".into(), DataValue::Text("Abc Def".into()));
            d
        };
        assert!(evaluate_clause(&data, &clause("value", LogicalOp::Eq, "abc def"), true));
        assert!(!evaluate_clause(&data, &clause("value", LogicalOp::Eq, "abc def"), false));
        assert!(evaluate_clause(&data, &clause("value", LogicalOp::Contains, "def"), true));
        assert!(evaluate_clause(&data, &clause("value", LogicalOp::Ne, "xyz"), true));
    }

    #[test]
    fn test_numeric_operators_tolerate_comma() {
        let data = {
            let mut d = DataMap::new();
            d.insert("value".into(), DataValue::Number(9.99));
            d
        };
        assert!(evaluate_clause(&data, &clause("value", LogicalOp::Lt, "10"), true));
        assert!(evaluate_clause(&data, &clause("value", LogicalOp::Ge, "9,99"), true));
        // Either side failing to parse makes the comparison false, not an error
        assert!(!evaluate_clause(&data, &clause("value", LogicalOp::Lt, "dez"), true));
    }

    #[test]
    fn test_missing_key_compares_as_empty() {
        let data = DataMap::new();
        assert!(evaluate_clause(&data, &clause("value", LogicalOp::Eq, ""), true));
        assert!(!evaluate_clause(&data, &clause("value", LogicalOp::Gt, "0"), true));
    }

    #[test]
    fn test_missing_key_orders_as_zero() {
        let data = DataMap::new();
        assert!(evaluate_clause(&data, &clause("divida", LogicalOp::Lt, "5"), true));
        assert!(evaluate_clause(&data, &clause("divida", LogicalOp::Le, "0"), true));
        assert!(evaluate_clause(&data, &clause("divida", LogicalOp::Ge, "-1"), true));
        assert!(!evaluate_clause(&data, &clause("divida", LogicalOp::Gt, "0"), true));
    }

    #[test]
    fn test_normalized_key_lookup_ignores_accents() {
        let mut data = DataMap::new();
        data.insert("possui divida".into(), DataValue::Text("sim".into()));
        assert!(evaluate_clause(
            &data,
            &clause("Possui Dívida", LogicalOp::Eq, "sim"),
            true
        ));
    }

    #[test]
    fn test_prohibited_marks_negative() {
        let drafts = vec![draft_with("value", DataValue::Number(10.0))];
        let constraints = vec![constraint(
            "Bloqueio do mínimo",
            ConstraintEffect::Proibida,
            vec![clause("value", LogicalOp::Eq, "10")],
        )];
        let mut warnings = Vec::new();
        let out = apply_constraints(
            drafts,
            &constraints,
            &GenerationSettings::default(),
            &mut warnings,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].case_type, CaseType::Negativo);
        assert_eq!(out[0].priority, Priority::Alta);
        assert_eq!(out[0].risk_category, "Restrição lógica");
        assert!(out[0]
            .rationale
            .contains(&"Restrição lógica: Bloqueio do mínimo".to_string()));
        assert!(out[0].justification.contains("marcado como negativo"));
    }

    #[test]
    fn test_prohibited_exclusion_policy() {
        let drafts = vec![
            draft_with("value", DataValue::Number(10.0)),
            draft_with("value", DataValue::Number(50.0)),
        ];
        let constraints = vec![constraint(
            "Bloqueio",
            ConstraintEffect::Proibida,
            vec![clause("value", LogicalOp::Eq, "10")],
        )];
        let settings = GenerationSettings {
            prohibited_handling: ProhibitedHandling::Excluir,
            ..GenerationSettings::default()
        };
        let mut warnings = Vec::new();
        let out = apply_constraints(drafts, &constraints, &settings, &mut warnings);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].data_used.get("value"), Some(&DataValue::Number(50.0)));
    }

    #[test]
    fn test_uncovered_mandatory_warns_and_synthesizes() {
        let drafts = vec![draft_with("value", DataValue::Number(10.0))];
        let constraints = vec![constraint(
            "Valor máximo atingido",
            ConstraintEffect::Obrigatoria,
            vec![clause("value", LogicalOp::Eq, "9999")],
        )];
        let mut warnings = Vec::new();
        let out = apply_constraints(
            drafts,
            &constraints,
            &GenerationSettings::default(),
            &mut warnings,
        );
        assert!(warnings
            .iter()
            .any(|w| w.contains("Restrição obrigatória não coberta")));
        assert_eq!(out.len(), 2);
        let synthetic = &out[1];
        assert!(synthetic.fingerprint.starts_with("mandatory|"));
        assert_eq!(synthetic.case_type, CaseType::Risco);
        assert_eq!(synthetic.impact, Impact::Alto);
        assert_eq!(
            synthetic.data_used.get("value"),
            Some(&DataValue::Text("9999".into()))
        );
        assert!(synthetic.techniques.is_empty());
    }

    #[test]
    fn test_covered_mandatory_is_silent() {
        let drafts = vec![draft_with("value", DataValue::Number(9999.0))];
        let constraints = vec![constraint(
            "Cobertura",
            ConstraintEffect::Obrigatoria,
            vec![clause("value", LogicalOp::Eq, "9999")],
        )];
        let mut warnings = Vec::new();
        let out = apply_constraints(
            drafts,
            &constraints,
            &GenerationSettings::default(),
            &mut warnings,
        );
        assert!(warnings.is_empty());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_no_synthesis_when_disabled() {
        let constraints = vec![constraint(
            "Sem cobertura",
            ConstraintEffect::Obrigatoria,
            vec![clause("value", LogicalOp::Eq, "1")],
        )];
        let settings = GenerationSettings {
            create_missing_mandatory_cases: false,
            ..GenerationSettings::default()
        };
        let mut warnings = Vec::new();
        let out = apply_constraints(vec![], &constraints, &settings, &mut warnings);
        assert!(out.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_conflicting_effects_warn() {
        let clauses = vec![clause("Valor", LogicalOp::Eq, "10")];
        let constraints = vec![
            constraint("A", ConstraintEffect::Proibida, clauses.clone()),
            constraint("B", ConstraintEffect::Obrigatoria, clauses),
        ];
        let mut warnings = Vec::new();
        apply_constraints(
            vec![],
            &constraints,
            &GenerationSettings::default(),
            &mut warnings,
        );
        assert!(warnings
            .iter()
            .any(|w| w.contains("Conflito de restrições")));
    }

    #[test]
    fn test_multiple_prohibited_apply_cumulatively() {
        let drafts = vec![draft_with("value", DataValue::Number(10.0))];
        let constraints = vec![
            constraint(
                "Primeira",
                ConstraintEffect::Proibida,
                vec![clause("value", LogicalOp::Eq, "10")],
            ),
            constraint(
                "Segunda",
                ConstraintEffect::Proibida,
                vec![clause("value", LogicalOp::Le, "10")],
            ),
        ];
        let mut warnings = Vec::new();
        let out = apply_constraints(
            drafts,
            &constraints,
            &GenerationSettings::default(),
            &mut warnings,
        );
        assert_eq!(
            out[0].risk_covered,
            "mensagem de Primeira; mensagem de Segunda"
        );
        assert_eq!(out[0].rationale.len(), 2);
    }
}
