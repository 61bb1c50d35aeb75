//! Fingerprint merge: drafts produced by different techniques that describe
//! the same logical scenario collapse into one identified case.

use std::collections::HashMap;

use crate::canon::stable_hash36;
use crate::types::{unique_join, DraftCase, Severity, TestCase};

/// Collapse drafts sharing a fingerprint into single cases, assign the
/// content-derived `CT-` identifier, derive severity, and return the result
/// sorted by title for a stable export order.
///
/// Within a fingerprint group the longer narrative string wins,
/// classification fields take the most severe value across the group,
/// and list fields union in first-seen order. Data keys from a later
/// draft overwrite earlier ones.
#[must_use]
pub fn merge_cases(drafts: Vec<DraftCase>) -> Vec<TestCase> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, DraftCase> = HashMap::new();

    for draft in drafts {
        match groups.get_mut(&draft.fingerprint) {
            None => {
                order.push(draft.fingerprint.clone());
                groups.insert(draft.fingerprint.clone(), draft);
            }
            Some(base) => merge_into(base, draft),
        }
    }

    let mut cases: Vec<TestCase> = order
        .into_iter()
        .map(|fp| {
            let draft = groups.remove(&fp).unwrap_or_else(|| unreachable!());
            finalize(draft)
        })
        .collect();
    cases.sort_by(|a, b| a.title.cmp(&b.title));
    cases
}

fn merge_into(base: &mut DraftCase, other: DraftCase) {
    base.case_type = base.case_type.merge(other.case_type);
    base.priority = base.priority.promote(other.priority);
    base.impact = base.impact.promote(other.impact);
    base.probability = base.probability.promote(other.probability);

    if other.title.len() > base.title.len() {
        base.title = other.title;
    }
    keep_longer(&mut base.preconditions, other.preconditions);
    keep_longer(&mut base.expected, other.expected);
    keep_longer(&mut base.justification, other.justification);
    base.risk_covered = unique_join(&[&base.risk_covered, &other.risk_covered]);
    base.risk_category = unique_join(&[&base.risk_category, &other.risk_category]);
    keep_longer(&mut base.observations, other.observations);
    if other.steps.len() > base.steps.len() {
        base.steps = other.steps;
    }

    for technique in other.techniques {
        if !base.techniques.contains(&technique) {
            base.techniques.push(technique);
        }
    }
    for note in other.rationale {
        if !base.rationale.contains(&note) {
            base.rationale.push(note);
        }
    }
    for risk in other.risks {
        if !base.risks.contains(&risk) {
            base.risks.push(risk);
        }
    }
    // Later draft's keys overwrite earlier ones
    for (key, value) in other.data_used {
        base.data_used.insert(key, value);
    }
}

fn keep_longer(base: &mut String, other: String) {
    if other.len() > base.len() {
        *base = other;
    }
}

fn finalize(draft: DraftCase) -> TestCase {
    let hash = stable_hash36(&draft.fingerprint);
    let severity = Severity::derive(draft.impact, draft.probability);
    TestCase {
        id: format!("CT-{hash}"),
        logical_hash: hash,
        title: draft.title,
        preconditions: draft.preconditions,
        steps: draft.steps,
        expected: draft.expected,
        case_type: draft.case_type,
        priority: draft.priority,
        impact: draft.impact,
        probability: draft.probability,
        severity,
        justification: draft.justification,
        risk_covered: draft.risk_covered,
        risk_category: draft.risk_category,
        rationale: draft.rationale,
        data_used: draft.data_used,
        techniques: draft.techniques,
        risks: draft.risks,
        observations: draft.observations,
        fingerprint: draft.fingerprint,
    }
}
