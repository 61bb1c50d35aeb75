//! Deterministic test-case generation engine.
//!
//! Black-box test-design techniques (equivalence partitioning, boundary
//! value analysis, decision tables, state transitions, error guessing)
//! turn a wizard configuration into identified test cases:
//!
//! ```text
//! WizardContext + TechniqueSelections + TechniqueConfigs
//!     │
//!     ├──> technique generators ──> DraftCase pool (fingerprinted)
//!     ├──> constraint engine    ──> reclassified / excluded drafts
//!     ├──> fingerprint merge    ──> TestCase (CT-<hash36> identity)
//!     └──> limiter              ──> capped, severity-ordered result
//! ```
//!
//! Equal inputs always produce equal cases, identifiers included: the
//! `CT-` id is a content hash of the case fingerprint, never a counter.

pub mod canon;
pub mod catalog;
pub mod types;

mod constraints;
mod error;
mod generate;
mod generators;
mod limit;
mod merge;
mod validate;

pub use canon::{parse_csv, stable_hash36};
pub use constraints::{apply_constraints, evaluate_clause};
pub use error::{EngineError, Result};
pub use generate::{generate_all, GenerationResult};
pub use generators::{
    build_error_guessing_cases, generate_decision_table, generate_numeric_ep_bva,
    generate_placeholder, generate_state_transition, generate_text_ep_bva, EgMode,
    ErrorGuessingBuild, GeneratorResult,
};
pub use limit::{limit_cases, severity_order};
pub use merge::merge_cases;
pub use validate::{validate, validate_context};
