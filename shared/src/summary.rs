//! Display-oriented views over an [`InsightResult`].

use serde::Serialize;

use crate::models::InsightResult;

const MAX_KEY_FINDINGS: usize = 3;
const FINDING_DESCRIPTION_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    pub pattern_count: usize,
    pub recommendation_count: usize,
    pub medical_advice_count: usize,
    pub key_findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationGroup {
    pub category: String,
    pub suggestions: Vec<String>,
}

pub fn summarize(result: &InsightResult) -> InsightSummary {
    let key_findings = result
        .patterns
        .iter()
        .take(MAX_KEY_FINDINGS)
        .map(|pattern| {
            let mut description: String = pattern
                .description
                .chars()
                .take(FINDING_DESCRIPTION_CHARS)
                .collect();
            if pattern.description.chars().count() > FINDING_DESCRIPTION_CHARS {
                description.push_str("...");
            }
            format!("{}: {}", pattern.kind, description)
        })
        .collect();

    InsightSummary {
        pattern_count: result.patterns.len(),
        recommendation_count: result.recommendations.len(),
        medical_advice_count: result.medical_advice.len(),
        key_findings,
    }
}

/// Group recommendations by category, in order of first appearance.
pub fn group_recommendations(result: &InsightResult) -> Vec<RecommendationGroup> {
    let mut groups: Vec<RecommendationGroup> = Vec::new();
    for rec in &result.recommendations {
        match groups.iter_mut().find(|g| g.category == rec.category) {
            Some(group) => group.suggestions.push(rec.suggestion.clone()),
            None => groups.push(RecommendationGroup {
                category: rec.category.clone(),
                suggestions: vec![rec.suggestion.clone()],
            }),
        }
    }
    groups
}
