//! Text EP+BVA generator: same bounded-domain model as the numeric
//! generator, over character lengths instead of values.

use super::error_guessing::{build_error_guessing_cases, EgMode};
use super::GeneratorResult;
use crate::canon::{normalize_key, normalize_value, parse_csv};
use crate::catalog::TechniqueId;
use crate::types::{
    BoundaryValue, CaseType, DataMap, DataValue, DraftCase, EquivalenceClass, ErrorGuessingConfig,
    Priority, SuggestedCase, TechniqueOutput, TechniqueSelections, TextBvaConfig, TextEpConfig,
    WizardContext,
};

struct BvaText {
    values: [i64; 6],
    below_min: i64,
    at_min: i64,
    at_max: i64,
    above_max: i64,
}

fn compute_bva_text(min_len: i64, max_len: i64) -> BvaText {
    BvaText {
        values: [
            min_len - 1,
            min_len,
            min_len + 1,
            max_len - 1,
            max_len,
            max_len + 1,
        ],
        below_min: min_len - 1,
        at_min: min_len,
        at_max: max_len,
        above_max: max_len + 1,
    }
}

pub fn generate_text_ep_bva(
    context: &WizardContext,
    selections: &TechniqueSelections,
    ep: &TextEpConfig,
    bva: &TextBvaConfig,
    error_guessing: Option<&ErrorGuessingConfig>,
) -> GeneratorResult {
    let mut result = GeneratorResult::default();
    let forbidden = parse_csv(&ep.forbidden_values_csv);
    let has_ep = selections.ep;
    let has_bva = selections.bva;
    let base_min = if has_ep { ep.min_len } else { bva.min_len };
    let base_max = if has_ep { ep.max_len } else { bva.max_len };
    let computed = compute_bva_text(base_min, base_max);

    if has_ep {
        let mut out = TechniqueOutput::new(TechniqueId::Ep);
        out.classes.push(EquivalenceClass {
            key: "valid".into(),
            class_label: "Válida".into(),
            example: format!("{}–{} caracteres", base_min.max(1), base_max),
        });
        out.classes.push(EquivalenceClass {
            key: "below_min".into(),
            class_label: "Inválida - abaixo do mínimo".into(),
            example: format!("{} caracteres", (base_min - 1).max(0)),
        });
        out.classes.push(EquivalenceClass {
            key: "above_max".into(),
            class_label: "Inválida - acima do máximo".into(),
            example: format!("{} caracteres", base_max + 1),
        });
        for v in &forbidden {
            out.classes.push(EquivalenceClass {
                key: format!("forbidden:{v}"),
                class_label: "Inválida - valor proibido".into(),
                example: v.clone(),
            });
        }
        if ep.required {
            out.classes.push(EquivalenceClass {
                key: "required_empty".into(),
                class_label: "Inválida - campo obrigatório".into(),
                example: "(vazio)".into(),
            });
        }
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Texto válido com tamanho dentro do intervalo ({base_min}–{base_max})"
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Texto inválido abaixo do mínimo ({base_min})"
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Texto inválido acima do máximo ({base_max})"
        )));
        result.outputs.push(out);
    }

    if has_bva {
        let mut out = TechniqueOutput::new(TechniqueId::Bva);
        for v in computed.values {
            out.values.push(BoundaryValue {
                label: "Tamanho (caracteres)".into(),
                value: v.to_string(),
            });
        }
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Texto com tamanho mínimo ({})",
            computed.at_min
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Texto com tamanho máximo ({})",
            computed.at_max
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Texto abaixo do mínimo ({})",
            computed.below_min
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Texto acima do máximo ({})",
            computed.above_max
        )));
        result.outputs.push(out);
    }

    let subject = context.subject_or("Campo");
    let base_pre = context.preconditions.trim().to_string();

    let min_len = if has_bva { computed.at_min } else { base_min };
    let max_len = if has_bva { computed.at_max } else { base_max };
    let below_len = if has_bva {
        computed.below_min
    } else {
        base_min - 1
    };
    let above_len = if has_bva {
        computed.above_max
    } else {
        base_max + 1
    };

    if has_ep || has_bva {
        let mut techs = Vec::new();
        if has_ep {
            techs.push(TechniqueId::Ep);
        }
        if has_bva {
            techs.push(TechniqueId::Bva);
        }
        let subj_key = normalize_key(&subject);
        let bounds = format!("{base_min}|{base_max}");

        let length_data = |value: i64| -> DataMap {
            let mut data = DataMap::new();
            data.insert("subject".into(), DataValue::Text(subject.clone()));
            data.insert("minLen".into(), DataValue::Number(min_len as f64));
            data.insert("maxLen".into(), DataValue::Number(max_len as f64));
            data.insert("value".into(), DataValue::Number(value as f64));
            data
        };

        result.cases.push(
            DraftCase::new(
                format!("txt|{subj_key}|valid|min|{bounds}"),
                format!("{subject} válido no tamanho mínimo ({min_len})"),
                CaseType::Positivo,
            )
            .preconditions(base_pre.clone())
            .steps(vec![
                format!("Informar {subject} com {min_len} caracteres"),
                "Submeter".into(),
            ])
            .expected("Sistema aceita o texto e prossegue sem erro")
            .techniques(techs.clone())
            .data_used(length_data(min_len))
            .rationale(collect_rationale(
                has_ep.then_some("EP: classe válida"),
                has_bva.then_some("BVA: limite mínimo (tamanho)"),
            )),
        );
        result.cases.push(
            DraftCase::new(
                format!("txt|{subj_key}|valid|max|{bounds}"),
                format!("{subject} válido no tamanho máximo ({max_len})"),
                CaseType::Positivo,
            )
            .preconditions(base_pre.clone())
            .steps(vec![
                format!("Informar {subject} com {max_len} caracteres"),
                "Submeter".into(),
            ])
            .expected("Sistema aceita o texto e prossegue sem erro")
            .techniques(techs.clone())
            .data_used(length_data(max_len))
            .rationale(collect_rationale(
                has_ep.then_some("EP: classe válida"),
                has_bva.then_some("BVA: limite máximo (tamanho)"),
            )),
        );
        result.cases.push(
            DraftCase::new(
                format!("txt|{subj_key}|invalid|below_min|{bounds}"),
                format!("{subject} inválido abaixo do mínimo ({below_len})"),
                CaseType::Negativo,
            )
            .preconditions(base_pre.clone())
            .steps(vec![
                format!("Informar {subject} com {below_len} caracteres"),
                "Submeter".into(),
            ])
            .expected("Sistema rejeita o texto e informa erro de validação")
            .techniques(techs.clone())
            .priority(Priority::Alta)
            .data_used(length_data(below_len))
            .rationale(collect_rationale(
                has_ep.then_some("EP: classe inválida (abaixo do mínimo)"),
                has_bva.then_some("BVA: abaixo do limite"),
            )),
        );
        result.cases.push(
            DraftCase::new(
                format!("txt|{subj_key}|invalid|above_max|{bounds}"),
                format!("{subject} inválido acima do máximo ({above_len})"),
                CaseType::Negativo,
            )
            .preconditions(base_pre.clone())
            .steps(vec![
                format!("Informar {subject} com {above_len} caracteres"),
                "Submeter".into(),
            ])
            .expected("Sistema rejeita o texto e informa erro de validação")
            .techniques(techs)
            .priority(Priority::Alta)
            .data_used(length_data(above_len))
            .rationale(collect_rationale(
                has_ep.then_some("EP: classe inválida (acima do máximo)"),
                has_bva.then_some("BVA: acima do limite"),
            )),
        );

        for v in &forbidden {
            let mut data = DataMap::new();
            data.insert("subject".into(), DataValue::Text(subject.clone()));
            data.insert("value".into(), DataValue::Text(v.clone()));
            result.cases.push(
                DraftCase::new(
                    format!("txt|{subj_key}|invalid|forbidden|{}", normalize_value(v)),
                    format!("{subject} inválido (valor proibido: {v})"),
                    CaseType::Negativo,
                )
                .preconditions(base_pre.clone())
                .steps(vec![format!("Informar {subject} = {v}"), "Submeter".into()])
                .expected("Sistema rejeita o valor e informa regra específica (se aplicável)")
                .techniques(vec![TechniqueId::Ep])
                .priority(Priority::Alta)
                .data_used(data)
                .rationale(vec!["EP: valor proibido".into()]),
            );
        }

        if ep.required {
            let mut data = DataMap::new();
            data.insert("subject".into(), DataValue::Text(subject.clone()));
            data.insert("value".into(), DataValue::Null);
            data.insert("required".into(), DataValue::Bool(true));
            result.cases.push(
                DraftCase::new(
                    format!("txt|{subj_key}|invalid|required_empty"),
                    format!("{subject} obrigatório não informado"),
                    CaseType::Erro,
                )
                .preconditions(base_pre.clone())
                .steps(vec!["Deixar o campo vazio".into(), "Submeter".into()])
                .expected("Sistema bloqueia o envio e destaca o campo obrigatório")
                .techniques(vec![TechniqueId::Ep])
                .priority(Priority::Alta)
                .risk_category("Validação")
                .justification("Falha de validação: campo obrigatório ausente")
                .data_used(data)
                .rationale(vec!["EP: campo obrigatório".into()]),
            );
        }
    }

    if let Some(cfg) = error_guessing {
        let mut out = TechniqueOutput::new(TechniqueId::ErrorGuessing);
        let built = build_error_guessing_cases(context, cfg, EgMode::Text);
        out.risks.extend(built.risks);
        out.suggested_cases.extend(built.suggested_cases);
        result.outputs.push(out);
        result.cases.extend(built.cases);
    }

    result
}

fn collect_rationale(ep: Option<&str>, bva: Option<&str>) -> Vec<String> {
    ep.into_iter().chain(bva).map(ToOwned::to_owned).collect()
}
