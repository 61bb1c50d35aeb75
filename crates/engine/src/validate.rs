//! Caller-side precondition checks. `generate_all` assumes valid inputs
//! and never re-validates; run this before invoking generation with
//! user-authored configuration.

use crate::canon::parse_csv;
use crate::catalog::SystemType;
use crate::error::{EngineError, Result};
use crate::types::{TechniqueConfigs, TechniqueSelections, WizardContext};

/// Check that the context description step is complete.
pub fn validate_context(context: &WizardContext) -> Result<()> {
    if context.feature_name.trim().is_empty() {
        return Err(EngineError::IncompleteContext("feature name"));
    }
    if context.subject_name.trim().is_empty() {
        return Err(EngineError::IncompleteContext("subject name"));
    }
    if context.description.trim().is_empty() {
        return Err(EngineError::IncompleteContext("description"));
    }
    Ok(())
}

/// Full precondition check: context completeness, technique selection and
/// per-technique config consistency for whatever is selected.
pub fn validate(
    context: &WizardContext,
    selections: &TechniqueSelections,
    configs: &TechniqueConfigs,
) -> Result<()> {
    validate_context(context)?;
    if !selections.any() {
        return Err(EngineError::NoTechniqueSelected);
    }

    if context.system_type == SystemType::CampoNumerico {
        if selections.ep {
            let n = &configs.ep.numeric;
            if !(n.min.is_finite() && n.max.is_finite() && n.min < n.max) {
                return Err(EngineError::InvalidNumericBounds {
                    min: n.min,
                    max: n.max,
                });
            }
        }
        if selections.bva {
            let n = &configs.bva.numeric;
            if !(n.min.is_finite() && n.max.is_finite() && n.min < n.max) {
                return Err(EngineError::InvalidNumericBounds {
                    min: n.min,
                    max: n.max,
                });
            }
            if n.step <= 0.0 || !n.step.is_finite() {
                return Err(EngineError::InvalidStep(n.step));
            }
        }
    }

    if context.system_type == SystemType::CampoTexto {
        if selections.ep {
            let t = &configs.ep.text;
            if !(t.min_len >= 0 && t.max_len >= t.min_len) {
                return Err(EngineError::InvalidTextBounds {
                    min_len: t.min_len,
                    max_len: t.max_len,
                });
            }
        }
        if selections.bva {
            let t = &configs.bva.text;
            if !(t.min_len >= 0 && t.max_len >= t.min_len) {
                return Err(EngineError::InvalidTextBounds {
                    min_len: t.min_len,
                    max_len: t.max_len,
                });
            }
        }
    }

    if selections.decision_table {
        let dt = &configs.decision_table;
        if parse_csv(&dt.conditions_csv).is_empty() {
            return Err(EngineError::IncompleteDecisionTable("no conditions"));
        }
        if parse_csv(&dt.actions_csv).is_empty() {
            return Err(EngineError::IncompleteDecisionTable("no actions"));
        }
        if dt.rules.is_empty() {
            return Err(EngineError::IncompleteDecisionTable("no rules"));
        }
    }

    if selections.state_transition {
        let st = &configs.state_transition;
        if parse_csv(&st.states_csv).is_empty() {
            return Err(EngineError::IncompleteStateMachine("no states"));
        }
        if parse_csv(&st.events_csv).is_empty() {
            return Err(EngineError::IncompleteStateMachine("no events"));
        }
    }

    Ok(())
}
