//! Placeholder outputs for techniques that are selectable for planning
//! but generate no cases yet (use case, cause-effect graph).

use crate::catalog::TechniqueId;
use crate::types::{SuggestedCase, TechniqueOutput};

pub fn generate_placeholder(technique: TechniqueId) -> TechniqueOutput {
    let mut out = TechniqueOutput::new(technique);
    out.risks
        .push("Técnica ainda não implementada no MVP (selecionável para planejamento)".into());
    out.suggested_cases
        .push(SuggestedCase::new("Defina a modelagem e gere casos específicos"));
    out
}
