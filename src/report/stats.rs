//! Value counts over step results

use crate::analysis::StepResult;
use serde::Serialize;
use std::collections::HashMap;

/// Label/count pairs, most frequent first
pub type Distribution = Vec<(String, usize)>;

/// Counts occurrences of each value. Ties are ordered by label.
pub fn count_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Distribution {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut distribution: Distribution = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    distribution
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatistics {
    pub feasibility: Distribution,
    pub tools: Distribution,
    pub primary_tools: Distribution,
    pub failed_steps: usize,
}

impl StepStatistics {
    pub fn from_steps<'a>(steps: impl IntoIterator<Item = &'a StepResult> + Clone) -> Self {
        Self {
            feasibility: count_values(steps.clone().into_iter().map(|s| s.feasibility.as_str())),
            tools: count_values(
                steps
                    .clone()
                    .into_iter()
                    .flat_map(|s| s.recommended_tools.iter().map(String::as_str)),
            ),
            primary_tools: count_values(steps.clone().into_iter().map(|s| s.primary_tool.as_str())),
            failed_steps: steps.into_iter().filter(|s| s.is_error()).count(),
        }
    }
}
