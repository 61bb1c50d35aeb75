//! Numeric EP+BVA generator. The two techniques share one bounded-domain
//! model: EP's min/max define the domain when EP is selected, otherwise
//! BVA's; BVA's step sizes the "just outside" boundary probes.

use super::error_guessing::{build_error_guessing_cases, EgMode};
use super::GeneratorResult;
use crate::canon::{format_money_like, format_num, normalize_key, normalize_value, parse_csv};
use crate::catalog::TechniqueId;
use crate::types::{
    BoundaryValue, CaseType, DataMap, DataValue, DraftCase, EquivalenceClass, ErrorGuessingConfig,
    NumericBvaConfig, NumericEpConfig, Priority, SuggestedCase, TechniqueOutput,
    TechniqueSelections, WizardContext,
};

struct BvaNumeric {
    values: [f64; 6],
    below_min: f64,
    at_min: f64,
    at_max: f64,
    above_max: f64,
}

fn compute_bva_numeric(min: f64, max: f64, step: f64) -> BvaNumeric {
    let s = if step <= 0.0 { 1.0 } else { step };
    BvaNumeric {
        values: [min - s, min, min + s, max - s, max, max + s],
        below_min: min - s,
        at_min: min,
        at_max: max,
        above_max: max + s,
    }
}

pub fn generate_numeric_ep_bva(
    context: &WizardContext,
    selections: &TechniqueSelections,
    ep: &NumericEpConfig,
    bva: &NumericBvaConfig,
    error_guessing: Option<&ErrorGuessingConfig>,
) -> GeneratorResult {
    let mut result = GeneratorResult::default();
    let forbidden = parse_csv(&ep.forbidden_values_csv);
    let money = ep.currency;
    let has_ep = selections.ep;
    let has_bva = selections.bva;
    let base_min = if has_ep { ep.min } else { bva.min };
    let base_max = if has_ep { ep.max } else { bva.max };
    let step = if has_bva {
        bva.step
    } else if ep.allow_decimals || ep.currency {
        0.01
    } else {
        1.0
    };
    let computed = compute_bva_numeric(base_min, base_max, step);

    if has_ep {
        let mut out = TechniqueOutput::new(TechniqueId::Ep);
        out.classes.push(EquivalenceClass {
            key: "valid".into(),
            class_label: "Válida".into(),
            example: format_money_like((base_min + base_max) / 2.0, money),
        });
        out.classes.push(EquivalenceClass {
            key: "below_min".into(),
            class_label: "Inválida - abaixo do mínimo".into(),
            example: format_money_like(computed.below_min, money),
        });
        out.classes.push(EquivalenceClass {
            key: "above_max".into(),
            class_label: "Inválida - acima do máximo".into(),
            example: format_money_like(computed.above_max, money),
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
            "Valor válido dentro do intervalo ({}–{})",
            format_money_like(base_min, money),
            format_money_like(base_max, money)
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Valor inválido abaixo do mínimo ({})",
            format_money_like(base_min, money)
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Valor inválido acima do máximo ({})",
            format_money_like(base_max, money)
        )));
        if !forbidden.is_empty() {
            out.risks.push(
                "Valores proibidos podem ter regras específicas (mensagens/erros diferentes)"
                    .into(),
            );
        }
        if ep.allow_decimals || ep.currency {
            out.risks
                .push("Cuidado com arredondamento e formatação (vírgula/ponto)".into());
        }
        result.outputs.push(out);
    }

    if has_bva {
        let mut out = TechniqueOutput::new(TechniqueId::Bva);
        for v in computed.values {
            out.values.push(BoundaryValue {
                label: "Valor limite".into(),
                value: format_money_like(v, money),
            });
        }
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Valor no mínimo ({})",
            format_money_like(computed.at_min, money)
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Valor no máximo ({})",
            format_money_like(computed.at_max, money)
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Valor logo abaixo do mínimo ({})",
            format_money_like(computed.below_min, money)
        )));
        out.suggested_cases.push(SuggestedCase::new(format!(
            "Valor logo acima do máximo ({})",
            format_money_like(computed.above_max, money)
        )));
        result.outputs.push(out);
    }

    let subject = context.subject_or("Campo");
    let base_pre = context.preconditions.trim().to_string();

    if has_ep || has_bva {
        let midpoint = (base_min + base_max) / 2.0;
        let valid_min = if has_bva { computed.at_min } else { midpoint };
        let valid_max = if has_bva { computed.at_max } else { midpoint };
        let below_min = if has_bva {
            computed.below_min
        } else {
            base_min - step
        };
        let above_max = if has_bva {
            computed.above_max
        } else {
            base_max + step
        };

        let mut techs = Vec::new();
        if has_ep {
            techs.push(TechniqueId::Ep);
        }
        if has_bva {
            techs.push(TechniqueId::Bva);
        }
        let subj_key = normalize_key(&subject);
        let bounds = format!("{}|{}", format_num(base_min), format_num(base_max));

        let numeric_data = |value: f64| -> DataMap {
            let mut data = DataMap::new();
            data.insert(subj_key.clone(), DataValue::Number(value));
            data.insert("value".into(), DataValue::Number(value));
            data.insert("min".into(), DataValue::Number(base_min));
            data.insert("max".into(), DataValue::Number(base_max));
            data
        };

        result.cases.push(
            DraftCase::new(
                format!("num|{subj_key}|valid|min|{bounds}"),
                format!(
                    "{subject} válido no limite mínimo ({})",
                    format_money_like(valid_min, money)
                ),
                CaseType::Positivo,
            )
            .preconditions(&base_pre)
            .steps(vec![
                format!("Informar {subject} = {}", format_money_like(valid_min, money)),
                "Submeter".into(),
            ])
            .expected("Sistema aceita o valor e prossegue sem erro")
            .techniques(techs.clone())
            .data_used(numeric_data(valid_min))
            .rationale(rationale_pair(
                has_ep.then_some("EP: classe válida"),
                has_bva.then_some("BVA: limite mínimo"),
            )),
        );
        result.cases.push(
            DraftCase::new(
                format!("num|{subj_key}|valid|max|{bounds}"),
                format!(
                    "{subject} válido no limite máximo ({})",
                    format_money_like(valid_max, money)
                ),
                CaseType::Positivo,
            )
            .preconditions(&base_pre)
            .steps(vec![
                format!("Informar {subject} = {}", format_money_like(valid_max, money)),
                "Submeter".into(),
            ])
            .expected("Sistema aceita o valor e prossegue sem erro")
            .techniques(techs.clone())
            .data_used(numeric_data(valid_max))
            .rationale(rationale_pair(
                has_ep.then_some("EP: classe válida"),
                has_bva.then_some("BVA: limite máximo"),
            )),
        );
        result.cases.push(
            DraftCase::new(
                format!("num|{subj_key}|invalid|below_min|{bounds}"),
                format!(
                    "{subject} inválido abaixo do mínimo ({})",
                    format_money_like(below_min, money)
                ),
                CaseType::Negativo,
            )
            .preconditions(&base_pre)
            .steps(vec![
                format!("Informar {subject} = {}", format_money_like(below_min, money)),
                "Submeter".into(),
            ])
            .expected("Sistema rejeita o valor e informa erro de validação")
            .techniques(techs.clone())
            .priority(Priority::Alta)
            .data_used(numeric_data(below_min))
            .rationale(rationale_pair(
                has_ep.then_some("EP: classe inválida (abaixo do mínimo)"),
                has_bva.then_some("BVA: valor logo abaixo do mínimo"),
            )),
        );
        result.cases.push(
            DraftCase::new(
                format!("num|{subj_key}|invalid|above_max|{bounds}"),
                format!(
                    "{subject} inválido acima do máximo ({})",
                    format_money_like(above_max, money)
                ),
                CaseType::Negativo,
            )
            .preconditions(&base_pre)
            .steps(vec![
                format!("Informar {subject} = {}", format_money_like(above_max, money)),
                "Submeter".into(),
            ])
            .expected("Sistema rejeita o valor e informa erro de validação")
            .techniques(techs)
            .priority(Priority::Alta)
            .data_used(numeric_data(above_max))
            .rationale(rationale_pair(
                has_ep.then_some("EP: classe inválida (acima do máximo)"),
                has_bva.then_some("BVA: valor logo acima do máximo"),
            )),
        );

        for v in &forbidden {
            let mut data = DataMap::new();
            data.insert(subj_key.clone(), DataValue::Text(v.clone()));
            data.insert("value".into(), DataValue::Text(v.clone()));
            result.cases.push(
                DraftCase::new(
                    format!("num|{subj_key}|invalid|forbidden|{}", normalize_value(v)),
                    format!("{subject} inválido (valor proibido: {v})"),
                    CaseType::Negativo,
                )
                .preconditions(&base_pre)
                .steps(vec![format!("Informar {subject} = {v}"), "Submeter".into()])
                .expected("Sistema rejeita o valor e informa regra específica (se aplicável)")
                .techniques(vec![TechniqueId::Ep])
                .priority(Priority::Alta)
                .risks(vec!["Mensagens de erro podem variar por valor proibido".into()])
                .data_used(data)
                .rationale(vec!["EP: valor proibido".into()]),
            );
        }

        if ep.required {
            let mut data = DataMap::new();
            data.insert(subj_key.clone(), DataValue::Null);
            data.insert("value".into(), DataValue::Null);
            data.insert("required".into(), DataValue::Bool(true));
            result.cases.push(
                DraftCase::new(
                    format!("num|{subj_key}|invalid|required_empty"),
                    format!("{subject} obrigatório não informado"),
                    CaseType::Erro,
                )
                .preconditions(&base_pre)
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
        let built = build_error_guessing_cases(context, cfg, EgMode::Numeric);
        out.risks.extend(built.risks);
        out.suggested_cases.extend(built.suggested_cases);
        result.outputs.push(out);
        result.cases.extend(built.cases);
    }

    result
}

fn rationale_pair(ep: Option<&str>, bva: Option<&str>) -> Vec<String> {
    ep.into_iter()
        .chain(bva)
        .map(ToOwned::to_owned)
        .collect()
}
