use thiserror::Error;

/// Result type for engine precondition checks
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors from validating generation inputs. Generation itself never
/// fails: data-quality findings surface as warnings on the outputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A required context field is blank
    #[error("Incomplete context: {0} is required")]
    IncompleteContext(&'static str),

    /// No technique selected
    #[error("At least one technique must be selected")]
    NoTechniqueSelected,

    /// Numeric bounds do not form a valid domain
    #[error("Invalid numeric bounds: min={min}, max={max}")]
    InvalidNumericBounds { min: f64, max: f64 },

    /// BVA step must be positive
    #[error("Invalid BVA step: {0}")]
    InvalidStep(f64),

    /// Text length bounds do not form a valid domain
    #[error("Invalid text length bounds: minLen={min_len}, maxLen={max_len}")]
    InvalidTextBounds { min_len: i64, max_len: i64 },

    /// Decision table missing conditions, actions or rules
    #[error("Decision table is incomplete: {0}")]
    IncompleteDecisionTable(&'static str),

    /// State machine missing states or events
    #[error("State machine is incomplete: {0}")]
    IncompleteStateMachine(&'static str),
}
