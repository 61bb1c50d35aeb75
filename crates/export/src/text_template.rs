//! Plain-text export driven by a `{{placeholder}}` template. Each case
//! renders one block; blocks are joined by a `---` separator line.

use caseforge_engine::types::{CaseType, DataMap, TestCase, WizardContext};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Template used when the caller does not supply one.
pub const DEFAULT_TXT_TEMPLATE: &str = "\
Caso de Teste: {{id}}
Título: {{titulo}}

Técnicas Utilizadas:
{{tecnicas}}

Objetivo:
Validar o comportamento do sistema quando {{objetivo}}

Pré-condições:
- Sistema disponível
- Usuário com perfil válido
{{preCondicoes}}

Dados de Entrada:
{{dadosEntrada}}

Passos:
{{passos}}

Resultado Esperado:
{{resultadoEsperado}}

Tipo de Teste:
{{tipo}}

Observações:
{{observacoes}}

Rastreabilidade:
{{rastreabilidade}}
";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([a-zA-Z0-9_]+)\s*\}\}").unwrap());

fn lines_from_text(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn format_bullets(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| format!("- {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_steps(steps: &[String]) -> String {
    if steps.is_empty() {
        return "—".to_string();
    }
    steps
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

// "min"/"max" are generator bookkeeping, not user-facing input data.
fn format_data_used(data: &DataMap) -> String {
    let entries: Vec<String> = data
        .iter()
        .filter(|(k, _)| !k.is_empty() && k.as_str() != "min" && k.as_str() != "max")
        .map(|(k, v)| format!("- {k}: {}", v.render()))
        .collect();
    if entries.is_empty() {
        "—".to_string()
    } else {
        entries.join("\n")
    }
}

fn title_case_tipo(tipo: CaseType) -> &'static str {
    match tipo {
        CaseType::Positivo => "Positivo",
        CaseType::Negativo => "Negativo",
        CaseType::Erro => "Erro",
        CaseType::Risco => "Risco",
    }
}

fn build_rastreabilidade(c: &TestCase) -> String {
    let mut parts = vec![format!("Hash lógico: {}", c.logical_hash)];
    if !c.techniques.is_empty() {
        let names: Vec<&str> = c.techniques.iter().map(|t| t.as_str()).collect();
        parts.push(format!("Gerado por técnicas: {}", names.join(", ")));
    }
    if !c.rationale.is_empty() {
        parts.push(format!("Racional: {}", c.rationale.join(" • ")));
    }
    if !c.risk_covered.trim().is_empty() {
        parts.push(format!("Risco coberto: {}", c.risk_covered.trim()));
    }
    if !c.risk_category.trim().is_empty() {
        parts.push(format!("Categoria: {}", c.risk_category.trim()));
    }
    parts.join("\n")
}

fn render_case(template: &str, c: &TestCase, context: Option<&WizardContext>) -> String {
    let objetivo = if c.justification.trim().is_empty() {
        context
            .map(|ctx| ctx.description.trim())
            .filter(|d| !d.is_empty())
            .map_or_else(|| c.title.clone(), ToString::to_string)
    } else {
        c.justification.trim().to_string()
    };

    let tecnicas = if c.techniques.is_empty() {
        "- (nenhuma)".to_string()
    } else {
        c.techniques
            .iter()
            .map(|t| format!("- {}", t.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let pre_condicoes = {
        let bullets = format_bullets(&lines_from_text(&c.preconditions));
        if bullets.is_empty() {
            String::new()
        } else {
            format!("\n{bullets}")
        }
    };

    let observacoes = {
        let mut parts: Vec<String> = Vec::new();
        if !c.observations.trim().is_empty() {
            parts.push(c.observations.trim().to_string());
        }
        parts.extend(c.risks.iter().filter(|r| !r.is_empty()).cloned());
        if parts.is_empty() {
            "—".to_string()
        } else {
            format_bullets(&parts)
        }
    };

    let expected = if c.expected.is_empty() {
        "—"
    } else {
        c.expected.as_str()
    };

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "id" => c.id.clone(),
            "titulo" => c.title.clone(),
            "tecnicas" => tecnicas.clone(),
            "objetivo" => objetivo.clone(),
            "preCondicoes" => pre_condicoes.clone(),
            "dadosEntrada" => format_data_used(&c.data_used),
            "passos" => format_steps(&c.steps),
            "resultadoEsperado" => expected.to_string(),
            "tipo" => title_case_tipo(c.case_type).to_string(),
            "observacoes" => observacoes.clone(),
            "rastreabilidade" => build_rastreabilidade(c),
            "prioridade" => c.priority.as_str().to_string(),
            "severidade" => c.severity.as_str().to_string(),
            "hash" => c.logical_hash.clone(),
            _ => String::new(),
        })
        .into_owned()
}

/// Render all cases with the given template (or [`DEFAULT_TXT_TEMPLATE`]).
/// Unknown placeholders render as the empty string.
#[must_use]
pub fn render_cases_txt(
    cases: &[TestCase],
    template: Option<&str>,
    context: Option<&WizardContext>,
) -> String {
    let tpl = template.unwrap_or(DEFAULT_TXT_TEMPLATE).trim_end();
    let blocks: Vec<String> = cases
        .iter()
        .map(|c| render_case(tpl, c, context).trim_end().to_string())
        .collect();
    format!("{}\n", blocks.join("\n\n---\n\n"))
}
