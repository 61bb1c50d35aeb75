//! Case-count cap. When the merged pool exceeds the configured maximum the
//! least interesting cases are dropped, never the most severe ones.

use std::cmp::Ordering;

use crate::types::{GenerationSettings, LimitApplied, TestCase};

const DEFAULT_MAX_CASES: u32 = 80;

/// Enforce `settings.max_cases` over the merged pool. A configured zero
/// falls back to the default cap; the effective cap is never below one.
/// Returns the limit record when cases were actually dropped, pushing a
/// warning so the cut is visible to the caller.
pub fn limit_cases(
    cases: &mut Vec<TestCase>,
    settings: &GenerationSettings,
    warnings: &mut Vec<String>,
) -> Option<LimitApplied> {
    let max = if settings.max_cases == 0 {
        DEFAULT_MAX_CASES
    } else {
        settings.max_cases
    }
    .max(1) as usize;

    let before = cases.len();
    if before <= max {
        return None;
    }

    cases.sort_by(|a, b| {
        b.case_type
            .rank()
            .cmp(&a.case_type.rank())
            .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
            .then_with(|| a.title.cmp(&b.title))
    });
    cases.truncate(max);

    warnings.push(format!("Limite de casos aplicado: {max}/{before}"));
    Some(LimitApplied {
        max_cases: max,
        before,
        after: max,
    })
}

/// Ordering used by the limiter, exposed for callers that want to present
/// cases most-severe-first without enforcing a cap.
#[must_use]
pub fn severity_order(a: &TestCase, b: &TestCase) -> Ordering {
    b.case_type
        .rank()
        .cmp(&a.case_type.rank())
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| a.title.cmp(&b.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_cases;
    use crate::types::{CaseType, DraftCase, Priority};
    use pretty_assertions::assert_eq;

    fn case(fp: &str, title: &str, case_type: CaseType, priority: Priority) -> TestCase {
        let drafts = vec![DraftCase::new(fp, title, case_type).priority(priority)];
        merge_cases(drafts).remove(0)
    }

    #[test]
    fn test_under_limit_is_untouched() {
        let mut cases = vec![case("a", "Um", CaseType::Positivo, Priority::Media)];
        let mut warnings = Vec::new();
        let applied = limit_cases(&mut cases, &GenerationSettings::default(), &mut warnings);
        assert!(applied.is_none());
        assert!(warnings.is_empty());
        assert_eq!(cases.len(), 1);
    }

    #[test]
    fn test_cut_keeps_most_severe() {
        let mut cases = vec![
            case("a", "Positivo comum", CaseType::Positivo, Priority::Baixa),
            case("b", "Erro grave", CaseType::Erro, Priority::Alta),
            case("c", "Negativo relevante", CaseType::Negativo, Priority::Alta),
        ];
        let settings = GenerationSettings {
            max_cases: 2,
            ..GenerationSettings::default()
        };
        let mut warnings = Vec::new();
        let applied = limit_cases(&mut cases, &settings, &mut warnings).unwrap();
        assert_eq!((applied.before, applied.after), (3, 2));
        assert_eq!(cases[0].case_type, CaseType::Erro);
        assert_eq!(cases[1].case_type, CaseType::Negativo);
        assert_eq!(warnings, vec!["Limite de casos aplicado: 2/3".to_string()]);
    }

    #[test]
    fn test_ties_break_by_title() {
        let mut cases = vec![
            case("a", "Zebra", CaseType::Positivo, Priority::Media),
            case("b", "Alfa", CaseType::Positivo, Priority::Media),
        ];
        let settings = GenerationSettings {
            max_cases: 1,
            ..GenerationSettings::default()
        };
        let mut warnings = Vec::new();
        limit_cases(&mut cases, &settings, &mut warnings);
        assert_eq!(cases[0].title, "Alfa");
    }

    #[test]
    fn test_zero_max_uses_default() {
        let mut cases: Vec<TestCase> = (0..90)
            .map(|i| {
                case(
                    &format!("fp{i}"),
                    &format!("Caso {i:03}"),
                    CaseType::Positivo,
                    Priority::Media,
                )
            })
            .collect();
        let settings = GenerationSettings {
            max_cases: 0,
            ..GenerationSettings::default()
        };
        let mut warnings = Vec::new();
        let applied = limit_cases(&mut cases, &settings, &mut warnings).unwrap();
        assert_eq!(applied.after, 80);
        assert_eq!(cases.len(), 80);
    }
}
