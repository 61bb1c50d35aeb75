//! Spreadsheet export as a serializable workbook model: named sheets of
//! header + rows, ready for any xlsx/ods writer or a JSON consumer.

use std::collections::BTreeMap;

use caseforge_engine::types::{DataMap, TestCase, WizardContext};
use serde::{Deserialize, Serialize};

/// A single sheet: one header row plus data rows, column-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// Sheet names follow spreadsheet rules: no `\ / ? * [ ]`, at most 31
/// characters, never empty.
#[must_use]
pub fn safe_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if matches!(c, '\\' | '/' | '?' | '*' | '[' | ']') {
                ' '
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.chars().take(31).collect()
    }
}

fn steps_cell(steps: &[String]) -> String {
    steps
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn data_used_cell(data: &DataMap) -> String {
    data.iter()
        .filter(|(k, _)| !k.is_empty() && k.as_str() != "min" && k.as_str() != "max")
        .map(|(k, v)| format!("{k}={}", v.render()))
        .collect::<Vec<_>>()
        .join("; ")
}

fn observations_cell(c: &TestCase) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !c.observations.trim().is_empty() {
        parts.push(c.observations.trim().to_string());
    }
    parts.extend(c.risks.iter().filter(|r| !r.is_empty()).cloned());
    parts.join("\n")
}

fn cases_sheet(cases: &[TestCase]) -> Sheet {
    let header = [
        "ID",
        "Título",
        "Tipo",
        "Prioridade",
        "Severidade",
        "Técnicas",
        "Pré_condições",
        "Dados_entrada",
        "Passos",
        "Resultado_esperado",
        "Observações",
        "Risco_coberto",
        "Justificativa",
        "Hash_lógico",
        "Rastreabilidade",
    ];
    let rows = cases
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                c.title.clone(),
                c.case_type.as_str().to_string(),
                c.priority.as_str().to_string(),
                c.severity.as_str().to_string(),
                c.techniques
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(" + "),
                c.preconditions.clone(),
                data_used_cell(&c.data_used),
                steps_cell(&c.steps),
                c.expected.clone(),
                observations_cell(c),
                c.risk_covered.clone(),
                c.justification.clone(),
                c.logical_hash.clone(),
                c.rationale.join(" • "),
            ]
        })
        .collect();
    Sheet {
        name: safe_sheet_name("Casos_de_Teste"),
        header: header.iter().map(ToString::to_string).collect(),
        rows,
    }
}

fn summary_sheet(cases: &[TestCase]) -> Sheet {
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_technique: BTreeMap<&str, usize> = BTreeMap::new();
    for c in cases {
        *by_type.entry(c.case_type.as_str()).or_default() += 1;
        for t in &c.techniques {
            *by_technique.entry(t.as_str()).or_default() += 1;
        }
    }

    let mut rows = vec![
        vec!["Total".to_string(), cases.len().to_string()],
        vec!["—".to_string(), "—".to_string()],
        vec!["Por tipo".to_string(), String::new()],
    ];
    rows.extend(
        by_type
            .into_iter()
            .map(|(k, v)| vec![k.to_string(), v.to_string()]),
    );
    rows.push(vec!["—".to_string(), "—".to_string()]);
    rows.push(vec!["Por técnica".to_string(), String::new()]);
    rows.extend(
        by_technique
            .into_iter()
            .map(|(k, v)| vec![k.to_string(), v.to_string()]),
    );

    Sheet {
        name: safe_sheet_name("Resumo"),
        header: vec!["Métrica".to_string(), "Valor".to_string()],
        rows,
    }
}

fn config_sheet(context: &WizardContext) -> Sheet {
    let rows = vec![
        vec!["featureName".to_string(), context.feature_name.clone()],
        vec!["subjectName".to_string(), context.subject_name.clone()],
        vec![
            "systemType".to_string(),
            context.system_type.as_str().to_string(),
        ],
        vec!["description".to_string(), context.description.clone()],
        vec!["inputs".to_string(), context.inputs.clone()],
        vec!["outputs".to_string(), context.outputs.clone()],
        vec!["constraints".to_string(), context.constraints.clone()],
        vec!["preconditions".to_string(), context.preconditions.clone()],
    ];
    Sheet {
        name: safe_sheet_name("Configuração"),
        header: vec!["Campo".to_string(), "Valor".to_string()],
        rows,
    }
}

/// Build the workbook: cases sheet, summary sheet, and when a context is
/// given, a configuration sheet.
#[must_use]
pub fn build_workbook(cases: &[TestCase], context: Option<&WizardContext>) -> Workbook {
    let mut sheets = vec![cases_sheet(cases), summary_sheet(cases)];
    if let Some(ctx) = context {
        sheets.push(config_sheet(ctx));
    }
    Workbook { sheets }
}
