use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Black-box testing technique families the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechniqueId {
    /// Equivalence partitioning
    Ep,
    /// Boundary value analysis
    Bva,
    /// Decision table
    DecisionTable,
    /// State transition testing
    StateTransition,
    /// Use case (placeholder)
    UseCase,
    /// Cause-effect graph (placeholder)
    CauseEffect,
    /// Error guessing heuristics
    ErrorGuessing,
}

impl TechniqueId {
    /// All techniques in catalog order
    pub const ALL: [Self; 7] = [
        Self::Ep,
        Self::Bva,
        Self::DecisionTable,
        Self::StateTransition,
        Self::UseCase,
        Self::CauseEffect,
        Self::ErrorGuessing,
    ];

    /// Stable wire identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ep => "ep",
            Self::Bva => "bva",
            Self::DecisionTable => "decision_table",
            Self::StateTransition => "state_transition",
            Self::UseCase => "use_case",
            Self::CauseEffect => "cause_effect",
            Self::ErrorGuessing => "error_guessing",
        }
    }

    /// Human-readable label (Portuguese, matches the authoring UI)
    #[must_use]
    pub fn label(self) -> &'static str {
        TECHNIQUES
            .iter()
            .find(|t| t.id == self)
            .map_or(self.as_str(), |t| t.label)
    }
}

impl std::fmt::Display for TechniqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared shape of the feature under test. Drives which generators run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    /// Numeric input field
    CampoNumerico,
    /// Text input field
    CampoTexto,
    /// Business rule set
    RegrasNegocio,
    /// State machine flow
    FluxoEstados,
    /// End-user process
    ProcessoUsuario,
}

impl SystemType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CampoNumerico => "campo_numerico",
            Self::CampoTexto => "campo_texto",
            Self::RegrasNegocio => "regras_negocio",
            Self::FluxoEstados => "fluxo_estados",
            Self::ProcessoUsuario => "processo_usuario",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CampoNumerico => "Campo numérico",
            Self::CampoTexto => "Campo texto",
            Self::RegrasNegocio => "Regras de negócio",
            Self::FluxoEstados => "Fluxo de estados",
            Self::ProcessoUsuario => "Processo do usuário",
        }
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry describing a technique for pickers and reports.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TechniqueInfo {
    pub id: TechniqueId,
    pub label: &'static str,
    pub blurb: &'static str,
}

/// Static technique catalog, in presentation order.
pub static TECHNIQUES: Lazy<Vec<TechniqueInfo>> = Lazy::new(|| {
    vec![
        TechniqueInfo {
            id: TechniqueId::Ep,
            label: "Particionamento de Equivalência",
            blurb: "Define classes válidas e inválidas para reduzir a quantidade de testes sem perder cobertura.",
        },
        TechniqueInfo {
            id: TechniqueId::Bva,
            label: "Análise de Valor Limite",
            blurb: "Gera valores nos limites (mínimo/máximo e vizinhanças) para encontrar bugs de fronteira.",
        },
        TechniqueInfo {
            id: TechniqueId::DecisionTable,
            label: "Tabela de Decisão",
            blurb: "Modela condições e ações e gera casos por regra (quando cada resultado deve ocorrer).",
        },
        TechniqueInfo {
            id: TechniqueId::StateTransition,
            label: "Transição de Estados",
            blurb: "Gera testes de transições válidas/ inválidas, estados inalcançáveis e eventos não tratados.",
        },
        TechniqueInfo {
            id: TechniqueId::UseCase,
            label: "Caso de Uso",
            blurb: "Estrutura cenários (fluxo principal e alternativos) em passos claros e verificáveis.",
        },
        TechniqueInfo {
            id: TechniqueId::CauseEffect,
            label: "Grafo Causa-Efeito",
            blurb: "Relaciona causas (entradas) e efeitos (saídas) e deriva combinações relevantes.",
        },
        TechniqueInfo {
            id: TechniqueId::ErrorGuessing,
            label: "Error Guessing",
            blurb: "Sugere riscos e casos heurísticos (nulo, vazio, caracteres especiais, duplo clique...).",
        },
    ]
});

/// Error-guessing heuristic. Each catalog variant carries a canned step
/// template and risk note; free-text heuristics fall back to the generic
/// "apply and observe" template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    EmptyField,
    NullValue,
    SpecialCharacters,
    ExcessiveRepetition,
    Timeout,
    DoubleClick,
    FormResubmission,
    /// Unclassified free-text heuristic
    Custom(String),
}

impl Heuristic {
    /// The seven catalog heuristics, in presentation order.
    pub const CATALOG: [Self; 7] = [
        Self::EmptyField,
        Self::NullValue,
        Self::SpecialCharacters,
        Self::ExcessiveRepetition,
        Self::Timeout,
        Self::DoubleClick,
        Self::FormResubmission,
    ];

    /// Human-readable label, used in titles and `dataUsed`.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::EmptyField => "Campo vazio",
            Self::NullValue => "Valor nulo",
            Self::SpecialCharacters => "Caracteres especiais",
            Self::ExcessiveRepetition => "Repetição excessiva",
            Self::Timeout => "Timeout",
            Self::DoubleClick => "Duplo clique",
            Self::FormResubmission => "Reenvio de formulário",
            Self::Custom(s) => s,
        }
    }

    /// Canned interaction steps for this heuristic.
    #[must_use]
    pub fn steps(&self, subject: &str) -> Vec<String> {
        match self {
            Self::EmptyField => vec!["Deixar o campo vazio".into(), "Submeter".into()],
            Self::NullValue => vec!["Enviar valor nulo/ausente".into(), "Submeter".into()],
            Self::SpecialCharacters => vec![
                format!("Informar {subject} com caracteres especiais (ex.: !@#)"),
                "Submeter".into(),
            ],
            Self::ExcessiveRepetition => vec![
                format!("Informar {subject} com repetição excessiva"),
                "Submeter".into(),
            ],
            Self::Timeout => vec![
                "Simular lentidão/timeout na requisição".into(),
                "Observar comportamento".into(),
            ],
            Self::DoubleClick => vec![
                "Acionar o botão de submissão duas vezes rapidamente".into(),
                "Observar duplicidade".into(),
            ],
            Self::FormResubmission => vec![
                "Submeter".into(),
                "Voltar e reenviar o formulário".into(),
                "Observar duplicidade".into(),
            ],
            Self::Custom(s) => vec![
                format!("Aplicar heurística: {s}"),
                "Observar comportamento".into(),
            ],
        }
    }

    /// Risk note attached to the technique output, when the heuristic has one.
    #[must_use]
    pub const fn risk(&self) -> Option<&'static str> {
        match self {
            Self::EmptyField => Some("Validação de campo vazio pode diferir de nulo/ausente"),
            Self::NullValue => Some("Backend e frontend podem tratar nulo de forma diferente"),
            Self::SpecialCharacters => Some("Sanitização e encoding podem falhar"),
            Self::ExcessiveRepetition => {
                Some("Pode expor problemas de performance e limites de tamanho")
            }
            Self::Timeout => Some("Tratamento de timeout pode gerar estados inconsistentes"),
            Self::DoubleClick => Some("Pode gerar requisições duplicadas e efeitos colaterais"),
            Self::FormResubmission => Some("Pode gerar duplicidade por falta de idempotência"),
            Self::Custom(_) => None,
        }
    }
}
