//! Case-level verdicts from step results

use super::types::{CaseVerdict, Feasibility, StepResult, TestCase, NOT_APPLICABLE};

/// Derives the case feasibility from its step results.
///
/// Uniformly Automatable or uniformly Not Automatable steps keep that verdict;
/// every other mix is Partially Automatable, including mixes containing Error
/// or Unknown steps. An empty collection is Unknown.
pub fn case_feasibility(results: &[StepResult]) -> Feasibility {
    if results.is_empty() {
        return Feasibility::Unknown;
    }
    if results
        .iter()
        .all(|r| r.feasibility == Feasibility::Automatable)
    {
        Feasibility::Automatable
    } else if results
        .iter()
        .all(|r| r.feasibility == Feasibility::NotAutomatable)
    {
        Feasibility::NotAutomatable
    } else {
        Feasibility::PartiallyAutomatable
    }
}

/// Builds the verdict for `case`. `results` must already be in step order:
/// the first result's primary tool represents the case.
pub fn aggregate(case: &TestCase, results: &[StepResult]) -> CaseVerdict {
    CaseVerdict {
        id: case.id.clone(),
        description: case.description.clone(),
        total_steps: results.len(),
        feasibility: case_feasibility(results),
        primary_tool: results
            .first()
            .map(|r| r.primary_tool.clone())
            .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(text: &str, feasibility: Feasibility, tool: &str) -> StepResult {
        StepResult {
            step: text.to_string(),
            feasibility,
            recommended_tools: vec![tool.to_string()],
            primary_tool: tool.to_string(),
            confidence: 80,
            rationale: String::new(),
        }
    }

    fn case() -> TestCase {
        TestCase::from_cells("TC-1", "Login", "1. a\n2. b", "ok", "ok")
    }

    #[test]
    fn test_all_automatable() {
        let results = vec![
            step("1. a", Feasibility::Automatable, "Selenium"),
            step("2. b", Feasibility::Automatable, "Cypress"),
        ];
        let verdict = aggregate(&case(), &results);
        assert_eq!(verdict.feasibility, Feasibility::Automatable);
        assert_eq!(verdict.primary_tool, "Selenium");
        assert_eq!(verdict.total_steps, 2);
        assert_eq!(verdict.id, "TC-1");
    }

    #[test]
    fn test_all_not_automatable() {
        let results = vec![
            step("1. a", Feasibility::NotAutomatable, "Manual"),
            step("2. b", Feasibility::NotAutomatable, "Manual"),
        ];
        assert_eq!(case_feasibility(&results), Feasibility::NotAutomatable);
    }

    #[test]
    fn test_mixed_is_partial() {
        let results = vec![
            step("1. a", Feasibility::Automatable, "Selenium"),
            step("2. b", Feasibility::NotAutomatable, "Manual"),
        ];
        assert_eq!(case_feasibility(&results), Feasibility::PartiallyAutomatable);
    }

    #[test]
    fn test_error_step_makes_otherwise_automatable_case_partial() {
        let results = vec![
            step("1. a", Feasibility::Automatable, "Selenium"),
            StepResult::failed("2. b", "timeout"),
            step("3. c", Feasibility::Automatable, "Selenium"),
        ];
        assert_eq!(case_feasibility(&results), Feasibility::PartiallyAutomatable);
    }

    #[test]
    fn test_unknown_steps_are_partial() {
        let results = vec![step("1. a", Feasibility::Unknown, "Unknown")];
        assert_eq!(case_feasibility(&results), Feasibility::PartiallyAutomatable);
    }

    #[test]
    fn test_primary_tool_comes_from_first_step() {
        let results = vec![
            step("1. a", Feasibility::NotAutomatable, "Manual"),
            step("2. b", Feasibility::Automatable, "Selenium"),
            step("3. c", Feasibility::Automatable, "Selenium"),
        ];
        assert_eq!(aggregate(&case(), &results).primary_tool, "Manual");
    }

    #[test]
    fn test_empty_case() {
        let verdict = aggregate(&case(), &[]);
        assert_eq!(verdict.feasibility, Feasibility::Unknown);
        assert_eq!(verdict.primary_tool, "N/A");
        assert_eq!(verdict.total_steps, 0);
    }
}
