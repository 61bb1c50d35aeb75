//! Wizard session state and the edit operations that keep it coherent.

use caseforge_engine::catalog::{SystemType, TechniqueId};
use caseforge_engine::types::{
    CasePatch, ConstraintEffect, GenerationOutputs, GenerationSettings, LogicalClause,
    LogicalConstraint, LogicalOp, NumericEpConfig, TechniqueConfigs, TechniqueSelections,
    TestCase, TextEpConfig, WizardContext,
};
use caseforge_export::DEFAULT_TXT_TEMPLATE;
use serde::{Deserialize, Serialize};

/// The durable part of a session: everything the wizard needs to rebuild
/// its screens. Generated cases are not persisted; they are recomputed
/// deterministically from this state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    pub step: u8,
    pub context: WizardContext,
    pub selections: TechniqueSelections,
    pub active_technique: TechniqueId,
    pub configs: TechniqueConfigs,
    pub constraints: Vec<LogicalConstraint>,
    pub settings: GenerationSettings,
    pub txt_template: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            step: 1,
            context: WizardContext::default(),
            selections: TechniqueSelections::default(),
            active_technique: TechniqueId::Ep,
            configs: TechniqueConfigs::default(),
            constraints: default_constraints(),
            settings: GenerationSettings::default(),
            txt_template: DEFAULT_TXT_TEMPLATE.to_string(),
        }
    }
}

fn default_constraints() -> Vec<LogicalConstraint> {
    vec![LogicalConstraint {
        id: "c1".into(),
        name: "Cliente novo não pode ter dívida".into(),
        effect: ConstraintEffect::Proibida,
        clauses: vec![
            LogicalClause {
                left: "Cliente antigo".into(),
                op: LogicalOp::Eq,
                right: "nao".into(),
            },
            LogicalClause {
                left: "Possui dívida".into(),
                op: LogicalOp::Eq,
                right: "sim".into(),
            },
        ],
        message: "Combinação inválida: cliente novo com dívida".into(),
    }]
}

/// A live session: durable state plus the (recomputable) generation
/// results.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: SessionState,
    pub outputs: Option<GenerationOutputs>,
    pub cases: Vec<TestCase>,
}

impl Session {
    #[must_use]
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            outputs: None,
            cases: Vec::new(),
        }
    }

    pub fn set_step(&mut self, step: u8) {
        self.state.step = step;
    }

    pub fn set_context(&mut self, context: WizardContext) {
        self.state.context = context;
    }

    pub fn set_system_type(&mut self, system_type: SystemType) {
        self.state.context.system_type = system_type;
    }

    /// Flip a technique on or off. The active technique follows the
    /// selection: when it gets deselected the first still-selected
    /// technique (EP as a last resort) becomes active.
    pub fn toggle_technique(&mut self, id: TechniqueId) {
        let on = self.state.selections.is_selected(id);
        self.state.selections.set(id, !on);
        if !self.state.selections.is_selected(self.state.active_technique) {
            self.state.active_technique = TechniqueId::ALL
                .iter()
                .copied()
                .find(|t| self.state.selections.is_selected(*t))
                .unwrap_or(TechniqueId::Ep);
        }
    }

    pub fn set_active_technique(&mut self, id: TechniqueId) {
        self.state.active_technique = id;
    }

    /// Update the numeric EP config, echoing its bounds into the numeric
    /// BVA config so the two techniques keep analyzing the same domain.
    pub fn set_ep_numeric(&mut self, cfg: NumericEpConfig) {
        self.state.configs.bva.numeric.min = cfg.min;
        self.state.configs.bva.numeric.max = cfg.max;
        self.state.configs.ep.numeric = cfg;
    }

    /// Text counterpart of [`Session::set_ep_numeric`]: length bounds
    /// echo into the text BVA config.
    pub fn set_ep_text(&mut self, cfg: TextEpConfig) {
        self.state.configs.bva.text.min_len = cfg.min_len;
        self.state.configs.bva.text.max_len = cfg.max_len;
        self.state.configs.ep.text = cfg;
    }

    /// Insert the constraint, or replace the existing one with the same id.
    pub fn upsert_constraint(&mut self, constraint: LogicalConstraint) {
        match self
            .state
            .constraints
            .iter_mut()
            .find(|c| c.id == constraint.id)
        {
            Some(slot) => *slot = constraint,
            None => self.state.constraints.push(constraint),
        }
    }

    pub fn remove_constraint(&mut self, id: &str) {
        self.state.constraints.retain(|c| c.id != id);
    }

    pub fn set_settings(&mut self, settings: GenerationSettings) {
        self.state.settings = settings;
    }

    pub fn set_txt_template(&mut self, template: impl Into<String>) {
        self.state.txt_template = template.into();
    }

    /// Check preconditions, run the generation pipeline with the session's
    /// current state and store the results on the session.
    pub fn generate(&mut self) -> caseforge_engine::Result<()> {
        caseforge_engine::validate(
            &self.state.context,
            &self.state.selections,
            &self.state.configs,
        )?;
        let res = caseforge_engine::generate_all(
            &self.state.context,
            &self.state.selections,
            &self.state.configs,
            &self.state.constraints,
            &self.state.settings,
        );
        self.outputs = Some(res.outputs);
        self.cases = res.cases;
        Ok(())
    }

    /// Apply a narrative patch to the identified case. Returns false when
    /// no case carries the id.
    pub fn update_case(&mut self, id: &str, patch: CasePatch) -> bool {
        match self.cases.iter_mut().find(|c| c.id == id) {
            Some(case) => {
                case.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    pub fn remove_case(&mut self, id: &str) -> bool {
        let before = self.cases.len();
        self.cases.retain(|c| c.id != id);
        self.cases.len() != before
    }

    /// Back to a pristine wizard. The text template survives the reset;
    /// everything else returns to defaults.
    pub fn reset(&mut self) {
        let template = std::mem::take(&mut self.state.txt_template);
        self.state = SessionState {
            txt_template: template,
            ..SessionState::default()
        };
        self.outputs = None;
        self.cases.clear();
    }

    /// Step-1 gate: context essentials are filled in.
    #[must_use]
    pub fn has_required_context(&self) -> bool {
        caseforge_engine::validate_context(&self.state.context).is_ok()
    }

    /// Can the generate button be pressed: context complete, at least one
    /// technique selected and the selected configs valid.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        caseforge_engine::validate(
            &self.state.context,
            &self.state.selections,
            &self.state.configs,
        )
        .is_ok()
    }
}
