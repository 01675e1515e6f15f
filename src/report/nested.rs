//! Nested JSON report: step results grouped under their test case

use crate::analysis::{AnalysisReport, Feasibility, StepResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCase {
    #[serde(rename = "Test Case ID")]
    pub id: String,
    #[serde(rename = "Test Description")]
    pub description: String,
    #[serde(rename = "Expected Result", default)]
    pub expected_result: String,
    #[serde(rename = "Actual Result", default)]
    pub actual_result: String,
    #[serde(rename = "Total Steps", default)]
    pub total_steps: usize,
    #[serde(rename = "Feasibility", default = "unknown_feasibility")]
    pub feasibility: Feasibility,
    #[serde(rename = "Recommended Primary Tool", default)]
    pub primary_tool: String,
    #[serde(rename = "Steps")]
    pub steps: Vec<StepResult>,
}

fn unknown_feasibility() -> Feasibility {
    Feasibility::Unknown
}

pub fn nest_report(report: &AnalysisReport) -> Vec<ReportCase> {
    report
        .cases
        .iter()
        .map(|analysis| ReportCase {
            id: analysis.case.id.clone(),
            description: analysis.case.description.clone(),
            expected_result: analysis.case.expected_result.clone(),
            actual_result: analysis.case.actual_result.clone(),
            total_steps: analysis.verdict.total_steps,
            feasibility: analysis.verdict.feasibility.clone(),
            primary_tool: analysis.verdict.primary_tool.clone(),
            steps: analysis.steps.clone(),
        })
        .collect()
}

pub fn write_json_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&nest_report(report))
        .context("Failed to serialize JSON report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON report: {}", path.display()))
}

pub fn load_json_report(path: &Path) -> Result<Vec<ReportCase>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON report: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON report: {}", path.display()))
}
