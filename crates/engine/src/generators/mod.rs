//! Per-technique case builders. Each generator is a pure function from
//! context + configuration to a technique summary and a list of draft
//! cases; drafts from all generators are pooled before constraints,
//! merging and limiting.

mod decision_table;
mod error_guessing;
mod numeric;
mod placeholder;
mod state_transition;
mod text;

pub use decision_table::generate_decision_table;
pub use error_guessing::{build_error_guessing_cases, EgMode, ErrorGuessingBuild};
pub use numeric::generate_numeric_ep_bva;
pub use placeholder::generate_placeholder;
pub use state_transition::generate_state_transition;
pub use text::generate_text_ep_bva;

use crate::types::{DraftCase, TechniqueOutput};

/// What a generator hands back to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct GeneratorResult {
    pub outputs: Vec<TechniqueOutput>,
    pub cases: Vec<DraftCase>,
}
