//! Versioned session persistence. Sessions are stored as a JSON envelope
//! `{ "name": ..., "version": 1, "state": {...} }`; loading tolerates
//! partial state from older runs by merging it over today's defaults.

use std::fs;
use std::path::Path;

use caseforge_engine::types::{
    GenerationSettings, LogicalConstraint, TechniqueConfigs, TechniqueSelections, WizardContext,
};
use caseforge_engine::catalog::TechniqueId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::SessionState;

/// Storage name embedded in the envelope; a sanity check on load.
pub const SESSION_NAME: &str = "qa-testcase-wizard";
/// Current on-disk format version.
pub const SESSION_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed session file: {0}")]
    Format(#[from] serde_json::Error),
    #[error("unsupported session version {found} (supported up to {SESSION_VERSION})")]
    UnsupportedVersion { found: u32 },
    #[error("not a session file (name {found:?})")]
    WrongName { found: String },
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    name: String,
    version: u32,
    state: PartialState,
}

/// Mirror of [`SessionState`] with every field optional; missing fields
/// fall back to defaults on load so old files keep working after new
/// fields appear.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PartialState {
    step: Option<u8>,
    context: Option<WizardContext>,
    selections: Option<TechniqueSelections>,
    active_technique: Option<TechniqueId>,
    configs: Option<TechniqueConfigs>,
    constraints: Option<Vec<LogicalConstraint>>,
    settings: Option<PartialSettings>,
    txt_template: Option<String>,
}

// Settings merge field-by-field, not wholesale: a file written before a
// settings knob existed must not reset that knob.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PartialSettings {
    max_cases: Option<u32>,
    max_invalid_transitions: Option<u32>,
    normalize: Option<bool>,
    learning_mode: Option<bool>,
    prohibited_handling: Option<caseforge_engine::types::ProhibitedHandling>,
    create_missing_mandatory_cases: Option<bool>,
}

fn merge_settings(base: GenerationSettings, p: PartialSettings) -> GenerationSettings {
    GenerationSettings {
        max_cases: p.max_cases.unwrap_or(base.max_cases),
        max_invalid_transitions: p
            .max_invalid_transitions
            .unwrap_or(base.max_invalid_transitions),
        normalize: p.normalize.unwrap_or(base.normalize),
        learning_mode: p.learning_mode.unwrap_or(base.learning_mode),
        prohibited_handling: p.prohibited_handling.unwrap_or(base.prohibited_handling),
        create_missing_mandatory_cases: p
            .create_missing_mandatory_cases
            .unwrap_or(base.create_missing_mandatory_cases),
    }
}

fn merge_state(partial: PartialState) -> SessionState {
    let defaults = SessionState::default();
    SessionState {
        step: partial.step.unwrap_or(defaults.step),
        context: partial.context.unwrap_or(defaults.context),
        selections: partial.selections.unwrap_or(defaults.selections),
        active_technique: partial.active_technique.unwrap_or(defaults.active_technique),
        configs: partial.configs.unwrap_or(defaults.configs),
        constraints: partial.constraints.unwrap_or(defaults.constraints),
        settings: match partial.settings {
            Some(p) => merge_settings(defaults.settings, p),
            None => defaults.settings,
        },
        txt_template: partial.txt_template.unwrap_or(defaults.txt_template),
    }
}

/// Parse a session blob. Unknown newer versions are refused rather than
/// silently misread.
pub fn parse_session(json: &str) -> Result<SessionState> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if envelope.name != SESSION_NAME {
        return Err(SessionError::WrongName {
            found: envelope.name,
        });
    }
    if envelope.version > SESSION_VERSION {
        return Err(SessionError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    Ok(merge_state(envelope.state))
}

/// Serialize the state into the current envelope format.
pub fn render_session(state: &SessionState) -> Result<String> {
    let value = serde_json::json!({
        "name": SESSION_NAME,
        "version": SESSION_VERSION,
        "state": state,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Load a session file; a missing file is a fresh session, not an error.
pub fn load_session(path: &Path) -> Result<SessionState> {
    if !path.exists() {
        log::debug!("no session at {}, starting fresh", path.display());
        return Ok(SessionState::default());
    }
    let json = fs::read_to_string(path)?;
    parse_session(&json)
}

/// Write the session, creating parent directories as needed.
pub fn save_session(path: &Path, state: &SessionState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_session(state)?)?;
    log::debug!("session saved to {}", path.display());
    Ok(())
}
