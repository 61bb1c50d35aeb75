use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Heuristic, SystemType, TechniqueId};

/// Free-text description of the feature under test. Immutable input to
/// generation; carries no identity beyond value equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardContext {
    pub feature_name: String,
    pub subject_name: String,
    pub system_type: SystemType,
    pub description: String,
    pub inputs: String,
    pub outputs: String,
    pub constraints: String,
    pub preconditions: String,
}

impl Default for WizardContext {
    fn default() -> Self {
        Self {
            feature_name: "Recarga".into(),
            subject_name: "Valor de recarga".into(),
            system_type: SystemType::CampoNumerico,
            description: "Gerar testes para validação do valor de recarga.".into(),
            inputs: "min=10, max=100, campo obrigatório".into(),
            outputs: "Mensagem de erro/sucesso".into(),
            constraints: String::new(),
            preconditions: "Usuário logado".into(),
        }
    }
}

impl WizardContext {
    /// Subject label with the generic fallback used in case titles.
    #[must_use]
    pub fn subject_or(&self, fallback: &str) -> String {
        if self.subject_name.is_empty() {
            fallback.to_string()
        } else {
            self.subject_name.clone()
        }
    }

    /// Subject falling back to the feature name, then a generic label.
    #[must_use]
    pub fn subject_or_feature(&self, fallback: &str) -> String {
        if !self.subject_name.is_empty() {
            self.subject_name.clone()
        } else if !self.feature_name.is_empty() {
            self.feature_name.clone()
        } else {
            fallback.to_string()
        }
    }
}

/// Which techniques the user turned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechniqueSelections {
    pub ep: bool,
    pub bva: bool,
    pub decision_table: bool,
    pub state_transition: bool,
    pub use_case: bool,
    pub cause_effect: bool,
    pub error_guessing: bool,
}

impl Default for TechniqueSelections {
    fn default() -> Self {
        Self {
            ep: true,
            bva: true,
            decision_table: false,
            state_transition: false,
            use_case: false,
            cause_effect: false,
            error_guessing: true,
        }
    }
}

impl TechniqueSelections {
    #[must_use]
    pub const fn is_selected(&self, id: TechniqueId) -> bool {
        match id {
            TechniqueId::Ep => self.ep,
            TechniqueId::Bva => self.bva,
            TechniqueId::DecisionTable => self.decision_table,
            TechniqueId::StateTransition => self.state_transition,
            TechniqueId::UseCase => self.use_case,
            TechniqueId::CauseEffect => self.cause_effect,
            TechniqueId::ErrorGuessing => self.error_guessing,
        }
    }

    pub fn set(&mut self, id: TechniqueId, on: bool) {
        match id {
            TechniqueId::Ep => self.ep = on,
            TechniqueId::Bva => self.bva = on,
            TechniqueId::DecisionTable => self.decision_table = on,
            TechniqueId::StateTransition => self.state_transition = on,
            TechniqueId::UseCase => self.use_case = on,
            TechniqueId::CauseEffect => self.cause_effect = on,
            TechniqueId::ErrorGuessing => self.error_guessing = on,
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        TechniqueId::ALL.iter().any(|id| self.is_selected(*id))
    }
}

/// Equivalence-partitioning bounds for a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumericEpConfig {
    pub min: f64,
    pub max: f64,
    pub allow_decimals: bool,
    pub currency: bool,
    pub required: bool,
    pub forbidden_values_csv: String,
}

impl Default for NumericEpConfig {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 100.0,
            allow_decimals: true,
            currency: true,
            required: true,
            forbidden_values_csv: String::new(),
        }
    }
}

/// Equivalence-partitioning length bounds for a text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextEpConfig {
    pub min_len: i64,
    pub max_len: i64,
    pub required: bool,
    pub forbidden_values_csv: String,
}

impl Default for TextEpConfig {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 50,
            required: true,
            forbidden_values_csv: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EpConfig {
    pub numeric: NumericEpConfig,
    pub text: TextEpConfig,
}

/// Boundary-value-analysis bounds and step for a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericBvaConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for NumericBvaConfig {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 100.0,
            step: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextBvaConfig {
    pub min_len: i64,
    pub max_len: i64,
}

impl Default for TextBvaConfig {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BvaConfig {
    pub numeric: NumericBvaConfig,
    pub text: TextBvaConfig,
}

/// Condition value in a decision-table rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    Sim,
    Nao,
    /// Wildcard: matches both answers
    Qualquer,
}

impl TriState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sim => "sim",
            Self::Nao => "nao",
            Self::Qualquer => "qualquer",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sim => "Sim",
            Self::Nao => "Não",
            Self::Qualquer => "Qualquer",
        }
    }

    /// Wildcard-aware overlap: equal values or either side wildcard.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self == other || self == Self::Qualquer || other == Self::Qualquer
    }
}

/// One authored decision-table rule: condition vector over the declared
/// conditions and action booleans over the declared actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DecisionTableRule {
    pub name: String,
    pub when: Vec<TriState>,
    pub then: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionTableConfig {
    pub conditions_csv: String,
    pub actions_csv: String,
    pub rules: Vec<DecisionTableRule>,
}

impl Default for DecisionTableConfig {
    fn default() -> Self {
        Self {
            conditions_csv: "Cliente antigo, Possui dívida".into(),
            actions_csv: "Oferta X, Oferta Y".into(),
            rules: vec![
                DecisionTableRule {
                    name: "Cliente antigo sem dívida".into(),
                    when: vec![TriState::Sim, TriState::Nao],
                    then: vec![true, false],
                },
                DecisionTableRule {
                    name: "Cliente antigo com dívida".into(),
                    when: vec![TriState::Sim, TriState::Sim],
                    then: vec![false, false],
                },
                DecisionTableRule {
                    name: "Cliente novo".into(),
                    when: vec![TriState::Nao, TriState::Qualquer],
                    then: vec![false, true],
                },
            ],
        }
    }
}

/// Authored state-machine transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StateTransitionRow {
    pub from: String,
    pub event: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateTransitionConfig {
    pub states_csv: String,
    pub events_csv: String,
    pub initial_state: String,
    pub transitions: Vec<StateTransitionRow>,
}

impl Default for StateTransitionConfig {
    fn default() -> Self {
        Self {
            states_csv: "Aberta, Processando, Paga, Fechada".into(),
            events_csv: "Pagar, Confirmar, Cancelar".into(),
            initial_state: "Aberta".into(),
            transitions: vec![
                StateTransitionRow {
                    from: "Aberta".into(),
                    event: "Confirmar".into(),
                    to: "Processando".into(),
                },
                StateTransitionRow {
                    from: "Processando".into(),
                    event: "Pagar".into(),
                    to: "Paga".into(),
                },
                StateTransitionRow {
                    from: "Processando".into(),
                    event: "Cancelar".into(),
                    to: "Fechada".into(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorGuessingConfig {
    pub selected: Vec<Heuristic>,
    /// Free-text heuristics, newline- or comma-separated
    pub custom_notes: String,
}

impl Default for ErrorGuessingConfig {
    fn default() -> Self {
        Self {
            selected: Heuristic::CATALOG.to_vec(),
            custom_notes: String::new(),
        }
    }
}

/// Placeholder configuration (technique not implemented yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UseCaseConfig {
    pub actors_csv: String,
    pub main_flow: String,
    pub alternates: String,
}

impl Default for UseCaseConfig {
    fn default() -> Self {
        Self {
            actors_csv: "Usuário".into(),
            main_flow: String::new(),
            alternates: String::new(),
        }
    }
}

/// Placeholder configuration (technique not implemented yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CauseEffectConfig {
    pub causes_csv: String,
    pub effects_csv: String,
    pub notes: String,
}

/// Per-technique configuration, one payload per technique id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TechniqueConfigs {
    pub ep: EpConfig,
    pub bva: BvaConfig,
    pub decision_table: DecisionTableConfig,
    pub state_transition: StateTransitionConfig,
    pub error_guessing: ErrorGuessingConfig,
    pub use_case: UseCaseConfig,
    pub cause_effect: CauseEffectConfig,
}

/// Comparison operator in a constraint clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "contains")]
    Contains,
}

impl LogicalOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Contains => "contains",
        }
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One AND-ed clause: `left op right` against the case's `dataUsed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalClause {
    pub left: String,
    pub op: LogicalOp,
    pub right: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintEffect {
    Proibida,
    Obrigatoria,
}

impl ConstraintEffect {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proibida => "proibida",
            Self::Obrigatoria => "obrigatoria",
        }
    }
}

impl std::fmt::Display for ConstraintEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-authored logical rule over generated input data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicalConstraint {
    pub id: String,
    pub name: String,
    pub effect: ConstraintEffect,
    pub clauses: Vec<LogicalClause>,
    pub message: String,
}

impl Default for LogicalConstraint {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            effect: ConstraintEffect::Proibida,
            clauses: Vec::new(),
            message: String::new(),
        }
    }
}

/// What to do with a case matched by a prohibited constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProhibitedHandling {
    /// Keep the case, reclassified as negative
    MarcarNegativo,
    /// Drop the case from the result set
    Excluir,
}

/// Process-wide generation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    pub max_cases: u32,
    pub max_invalid_transitions: u32,
    /// Normalize clause keys/values before comparison
    pub normalize: bool,
    /// UI-only flag; carried but not engine-semantic
    pub learning_mode: bool,
    pub prohibited_handling: ProhibitedHandling,
    pub create_missing_mandatory_cases: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_cases: 80,
            max_invalid_transitions: 12,
            normalize: true,
            learning_mode: true,
            prohibited_handling: ProhibitedHandling::MarcarNegativo,
            create_missing_mandatory_cases: true,
        }
    }
}

/// Case classification, ascending severity: positivo < risco < negativo < erro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Positivo,
    Negativo,
    Erro,
    Risco,
}

impl CaseType {
    /// Severity rank used by merging and the limiter.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Erro => 3,
            Self::Negativo => 2,
            Self::Risco => 1,
            Self::Positivo => 0,
        }
    }

    /// The more severe of two types; keeps `self` on ties.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        if self.rank() >= other.rank() {
            self
        } else {
            other
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positivo => "positivo",
            Self::Negativo => "negativo",
            Self::Erro => "erro",
            Self::Risco => "risco",
        }
    }

    /// Title-cased presentation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positivo => "Positivo",
            Self::Negativo => "Negativo",
            Self::Erro => "Erro",
            Self::Risco => "Risco",
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Alta,
    Media,
    Baixa,
}

impl Priority {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Alta => 2,
            Self::Media => 1,
            Self::Baixa => 0,
        }
    }

    /// Worst-level promotion used by the merger.
    #[must_use]
    pub const fn promote(self, other: Self) -> Self {
        if self.rank() >= other.rank() {
            self
        } else {
            other
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alta => "alta",
            Self::Media => "media",
            Self::Baixa => "baixa",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Alto,
    Medio,
    Baixo,
}

impl Impact {
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Alto => 2,
            Self::Medio => 1,
            Self::Baixo => 0,
        }
    }

    #[must_use]
    pub const fn promote(self, other: Self) -> Self {
        if self.score() >= other.score() {
            self
        } else {
            other
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alto => "alto",
            Self::Medio => "medio",
            Self::Baixo => "baixo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Probability {
    Alta,
    Media,
    Baixa,
}

impl Probability {
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Alta => 2,
            Self::Media => 1,
            Self::Baixa => 0,
        }
    }

    #[must_use]
    pub const fn promote(self, other: Self) -> Self {
        if self.score() >= other.score() {
            self
        } else {
            other
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alta => "alta",
            Self::Media => "media",
            Self::Baixa => "baixa",
        }
    }
}

/// Derived criticality class. Never set directly: always computed from
/// impact × probability, at merge time and after any case edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Alta,
    Media,
    Baixa,
}

impl Severity {
    /// score = impact + probability; >=3 alta, ==2 media, else baixa.
    #[must_use]
    pub const fn derive(impact: Impact, probability: Probability) -> Self {
        let score = impact.score() + probability.score();
        if score >= 3 {
            Self::Alta
        } else if score == 2 {
            Self::Media
        } else {
            Self::Baixa
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alta => "alta",
            Self::Media => "media",
            Self::Baixa => "baixa",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed scalar type for `dataUsed` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl DataValue {
    /// Rendering used by exports; null shows as "(nulo)".
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => "(nulo)".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format!("{n}"),
            Self::Text(s) => s.clone(),
        }
    }

    /// Rendering used by clause evaluation; null and missing compare as "".
    #[must_use]
    pub fn comparable(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format!("{n}"),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Insertion-ordered mapping of input names to the concrete values a
/// case exercises. Keys land already normalized by the generators.
pub type DataMap = IndexMap<String, DataValue>;

/// One equivalence class in a technique summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceClass {
    pub key: String,
    #[serde(rename = "classe")]
    pub class_label: String,
    #[serde(rename = "exemplo")]
    pub example: String,
}

/// One boundary value in a technique summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryValue {
    pub label: String,
    pub value: String,
}

/// Labeled item list (conditions, actions, states, transitions...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub label: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedCase {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SuggestedCase {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            note: None,
        }
    }
}

/// Human-readable summary a technique produces for display, alongside
/// its draft cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueOutput {
    pub technique: TechniqueId,
    pub label: String,
    pub classes: Vec<EquivalenceClass>,
    pub values: Vec<BoundaryValue>,
    pub combinations: Vec<Combination>,
    pub suggested_cases: Vec<SuggestedCase>,
    pub risks: Vec<String>,
}

impl TechniqueOutput {
    /// Empty summary shell for a technique.
    #[must_use]
    pub fn new(technique: TechniqueId) -> Self {
        Self {
            technique,
            label: technique.label().to_string(),
            classes: Vec::new(),
            values: Vec::new(),
            combinations: Vec::new(),
            suggested_cases: Vec::new(),
            risks: Vec::new(),
        }
    }
}

/// Record of a truncation applied by the limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitApplied {
    pub max_cases: usize,
    pub before: usize,
    pub after: usize,
}

/// Per-technique summaries plus accumulated warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutputs {
    pub by_technique: std::collections::BTreeMap<TechniqueId, TechniqueOutput>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_applied: Option<LimitApplied>,
}

/// An unidentified candidate case. The fingerprint is the deduplication
/// key: drafts sharing one describe the same logical scenario and merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftCase {
    pub fingerprint: String,
    pub title: String,
    pub preconditions: String,
    pub steps: Vec<String>,
    pub expected: String,
    pub case_type: CaseType,
    pub priority: Priority,
    pub impact: Impact,
    pub probability: Probability,
    pub justification: String,
    pub risk_covered: String,
    pub risk_category: String,
    pub rationale: Vec<String>,
    pub data_used: DataMap,
    pub techniques: Vec<TechniqueId>,
    pub risks: Vec<String>,
    pub observations: String,
}

impl DraftCase {
    /// New draft; priority defaults by case type (negativo/erro get alta),
    /// impact and probability default to the middle level.
    #[must_use]
    pub fn new(
        fingerprint: impl Into<String>,
        title: impl Into<String>,
        case_type: CaseType,
    ) -> Self {
        let priority = match case_type {
            CaseType::Negativo | CaseType::Erro => Priority::Alta,
            CaseType::Risco | CaseType::Positivo => Priority::Media,
        };
        Self {
            fingerprint: fingerprint.into(),
            title: title.into(),
            preconditions: String::new(),
            steps: Vec::new(),
            expected: String::new(),
            case_type,
            priority,
            impact: Impact::Medio,
            probability: Probability::Media,
            justification: String::new(),
            risk_covered: String::new(),
            risk_category: String::new(),
            rationale: Vec::new(),
            data_used: DataMap::new(),
            techniques: Vec::new(),
            risks: Vec::new(),
            observations: String::new(),
        }
    }

    /// Builder: set preconditions
    #[must_use]
    pub fn preconditions(mut self, value: impl Into<String>) -> Self {
        self.preconditions = value.into();
        self
    }

    /// Builder: set ordered steps
    #[must_use]
    pub fn steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Builder: set expected result
    #[must_use]
    pub fn expected(mut self, value: impl Into<String>) -> Self {
        self.expected = value.into();
        self
    }

    /// Builder: set producing techniques
    #[must_use]
    pub fn techniques(mut self, techniques: Vec<TechniqueId>) -> Self {
        self.techniques = techniques;
        self
    }

    /// Builder: set exercised input data
    #[must_use]
    pub fn data_used(mut self, data: DataMap) -> Self {
        self.data_used = data;
        self
    }

    /// Builder: set rationale notes
    #[must_use]
    pub fn rationale(mut self, rationale: Vec<String>) -> Self {
        self.rationale = rationale;
        self
    }

    /// Builder: override priority
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: override impact
    #[must_use]
    pub const fn impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    /// Builder: override probability
    #[must_use]
    pub const fn probability(mut self, probability: Probability) -> Self {
        self.probability = probability;
        self
    }

    /// Builder: set justification
    #[must_use]
    pub fn justification(mut self, value: impl Into<String>) -> Self {
        self.justification = value.into();
        self
    }

    /// Builder: set covered risk text
    #[must_use]
    pub fn risk_covered(mut self, value: impl Into<String>) -> Self {
        self.risk_covered = value.into();
        self
    }

    /// Builder: set risk category
    #[must_use]
    pub fn risk_category(mut self, value: impl Into<String>) -> Self {
        self.risk_category = value.into();
        self
    }

    /// Builder: set free-text risks
    #[must_use]
    pub fn risks(mut self, risks: Vec<String>) -> Self {
        self.risks = risks;
        self
    }

    /// Builder: set observations
    #[must_use]
    pub fn observations(mut self, value: impl Into<String>) -> Self {
        self.observations = value.into();
        self
    }
}

/// A merged, identified test case. `id`, `fingerprint` and `logical_hash`
/// are generation-time invariants; `severity` is always derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub logical_hash: String,
    pub title: String,
    pub preconditions: String,
    pub steps: Vec<String>,
    pub expected: String,
    pub case_type: CaseType,
    pub priority: Priority,
    pub impact: Impact,
    pub probability: Probability,
    pub severity: Severity,
    pub justification: String,
    pub risk_covered: String,
    pub risk_category: String,
    pub rationale: Vec<String>,
    pub data_used: DataMap,
    pub techniques: Vec<TechniqueId>,
    pub risks: Vec<String>,
    pub observations: String,
    pub fingerprint: String,
}

/// External edit to a generated case. Identity fields and severity are
/// absent on purpose: they cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CasePatch {
    pub title: Option<String>,
    pub preconditions: Option<String>,
    pub steps: Option<Vec<String>>,
    pub expected: Option<String>,
    pub case_type: Option<CaseType>,
    pub priority: Option<Priority>,
    pub impact: Option<Impact>,
    pub probability: Option<Probability>,
    pub justification: Option<String>,
    pub risk_covered: Option<String>,
    pub risk_category: Option<String>,
    pub rationale: Option<Vec<String>>,
    pub data_used: Option<DataMap>,
    pub techniques: Option<Vec<TechniqueId>>,
    pub risks: Option<Vec<String>>,
    pub observations: Option<String>,
}

impl TestCase {
    /// Apply a narrative edit, re-deriving severity from the (possibly
    /// patched) impact and probability. Never touches id, fingerprint or
    /// logical hash.
    pub fn apply_patch(&mut self, patch: CasePatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.preconditions {
            self.preconditions = v;
        }
        if let Some(v) = patch.steps {
            self.steps = v;
        }
        if let Some(v) = patch.expected {
            self.expected = v;
        }
        if let Some(v) = patch.case_type {
            self.case_type = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.impact {
            self.impact = v;
        }
        if let Some(v) = patch.probability {
            self.probability = v;
        }
        if let Some(v) = patch.justification {
            self.justification = v;
        }
        if let Some(v) = patch.risk_covered {
            self.risk_covered = v;
        }
        if let Some(v) = patch.risk_category {
            self.risk_category = v;
        }
        if let Some(v) = patch.rationale {
            self.rationale = v;
        }
        if let Some(v) = patch.data_used {
            self.data_used = v;
        }
        if let Some(v) = patch.techniques {
            self.techniques = v;
        }
        if let Some(v) = patch.risks {
            self.risks = v;
        }
        if let Some(v) = patch.observations {
            self.observations = v;
        }
        self.severity = Severity::derive(self.impact, self.probability);
    }
}

/// Trim strings, drop empties and exact duplicates, preserving first-seen
/// order. Shared by merging, constraint bookkeeping and error guessing.
#[must_use]
pub fn unique_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let k = item.as_ref().trim();
        if k.is_empty() || !seen.insert(k.to_string()) {
            continue;
        }
        out.push(k.to_string());
    }
    out
}

/// Deduplicate two narrative fragments and join survivors with "; ".
#[must_use]
pub fn unique_join(parts: &[&str]) -> String {
    unique_strings(parts.iter().copied()).join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_type_ordering() {
        assert!(CaseType::Erro.rank() > CaseType::Negativo.rank());
        assert!(CaseType::Negativo.rank() > CaseType::Risco.rank());
        assert!(CaseType::Risco.rank() > CaseType::Positivo.rank());
        assert_eq!(CaseType::Positivo.merge(CaseType::Negativo), CaseType::Negativo);
        assert_eq!(CaseType::Erro.merge(CaseType::Risco), CaseType::Erro);
    }

    #[test]
    fn test_severity_table() {
        use Impact::*;
        use Probability as P;
        assert_eq!(Severity::derive(Alto, P::Alta), Severity::Alta);
        assert_eq!(Severity::derive(Alto, P::Media), Severity::Alta);
        assert_eq!(Severity::derive(Alto, P::Baixa), Severity::Media);
        assert_eq!(Severity::derive(Medio, P::Alta), Severity::Alta);
        assert_eq!(Severity::derive(Medio, P::Media), Severity::Media);
        assert_eq!(Severity::derive(Medio, P::Baixa), Severity::Baixa);
        assert_eq!(Severity::derive(Baixo, P::Alta), Severity::Media);
        assert_eq!(Severity::derive(Baixo, P::Media), Severity::Baixa);
        assert_eq!(Severity::derive(Baixo, P::Baixa), Severity::Baixa);
    }

    #[test]
    fn test_draft_priority_defaults_by_type() {
        assert_eq!(DraftCase::new("f", "t", CaseType::Negativo).priority, Priority::Alta);
        assert_eq!(DraftCase::new("f", "t", CaseType::Erro).priority, Priority::Alta);
        assert_eq!(DraftCase::new("f", "t", CaseType::Risco).priority, Priority::Media);
        assert_eq!(DraftCase::new("f", "t", CaseType::Positivo).priority, Priority::Media);
    }

    #[test]
    fn test_apply_patch_rederives_severity_and_keeps_identity() {
        let mut case = TestCase {
            id: "CT-x".into(),
            logical_hash: "x".into(),
            title: "t".into(),
            preconditions: String::new(),
            steps: vec![],
            expected: String::new(),
            case_type: CaseType::Positivo,
            priority: Priority::Media,
            impact: Impact::Medio,
            probability: Probability::Media,
            severity: Severity::Media,
            justification: String::new(),
            risk_covered: String::new(),
            risk_category: String::new(),
            rationale: vec![],
            data_used: DataMap::new(),
            techniques: vec![],
            risks: vec![],
            observations: String::new(),
            fingerprint: "fp".into(),
        };
        case.apply_patch(CasePatch {
            title: Some("editado".into()),
            impact: Some(Impact::Alto),
            probability: Some(Probability::Alta),
            ..Default::default()
        });
        assert_eq!(case.title, "editado");
        assert_eq!(case.severity, Severity::Alta);
        assert_eq!(case.id, "CT-x");
        assert_eq!(case.fingerprint, "fp");
        assert_eq!(case.logical_hash, "x");
    }

    #[test]
    fn test_unique_strings() {
        assert_eq!(
            unique_strings(["a", " a ", "", "b", "a"]),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(unique_join(&["x", "", "x", "y"]), "x; y");
    }

    #[test]
    fn test_data_value_rendering() {
        assert_eq!(DataValue::Null.render(), "(nulo)");
        assert_eq!(DataValue::Null.comparable(), "");
        assert_eq!(DataValue::Number(10.0).render(), "10");
        assert_eq!(DataValue::Number(9.99).comparable(), "9.99");
        assert_eq!(DataValue::Bool(true).render(), "true");
    }

    #[test]
    fn test_settings_defaults() {
        let s = GenerationSettings::default();
        assert_eq!(s.max_cases, 80);
        assert_eq!(s.max_invalid_transitions, 12);
        assert!(s.normalize);
        assert_eq!(s.prohibited_handling, ProhibitedHandling::MarcarNegativo);
        assert!(s.create_missing_mandatory_cases);
    }

    #[test]
    fn test_test_case_serde_field_names() {
        let case = DraftCase::new("fp", "t", CaseType::Positivo);
        let json = serde_json::to_value(&case).unwrap();
        assert!(json.get("caseType").is_some());
        assert!(json.get("dataUsed").is_some());
        assert!(json.get("riskCovered").is_some());
    }
}
