//! Step-level and case-level CSV exports

use crate::analysis::{AnalysisReport, Feasibility};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// One row of the step-level export
#[derive(Debug, Clone, Serialize)]
pub struct StepRow<'a> {
    #[serde(rename = "Test Case ID")]
    pub id: &'a str,
    #[serde(rename = "Test Description")]
    pub description: &'a str,
    #[serde(rename = "Step")]
    pub step: &'a str,
    #[serde(rename = "Feasibility")]
    pub feasibility: &'a Feasibility,
    #[serde(rename = "Recommended Tools")]
    pub recommended_tools: String,
    #[serde(rename = "Recommended Primary Tool")]
    pub primary_tool: &'a str,
    #[serde(rename = "Confidence Score")]
    pub confidence: i64,
    #[serde(rename = "Rationale")]
    pub rationale: &'a str,
    #[serde(rename = "Expected Result")]
    pub expected_result: &'a str,
    #[serde(rename = "Actual Result")]
    pub actual_result: &'a str,
}

/// One row of the case-level export
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow<'a> {
    #[serde(rename = "Test Case ID")]
    pub id: &'a str,
    #[serde(rename = "Test Description")]
    pub description: &'a str,
    #[serde(rename = "Total Steps")]
    pub total_steps: usize,
    #[serde(rename = "Feasibility")]
    pub feasibility: &'a Feasibility,
    #[serde(rename = "Recommended Primary Tool")]
    pub primary_tool: &'a str,
}

pub fn write_steps_csv<W: Write>(report: &AnalysisReport, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for analysis in &report.cases {
        for step in &analysis.steps {
            csv.serialize(StepRow {
                id: &analysis.case.id,
                description: &analysis.case.description,
                step: &step.step,
                feasibility: &step.feasibility,
                recommended_tools: step.tools_joined(),
                primary_tool: &step.primary_tool,
                confidence: step.confidence,
                rationale: &step.rationale,
                expected_result: &analysis.case.expected_result,
                actual_result: &analysis.case.actual_result,
            })
            .context("Failed to write step-level row")?;
        }
    }
    csv.flush().context("Failed to flush step-level CSV")?;
    Ok(())
}

pub fn write_summary_csv<W: Write>(report: &AnalysisReport, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for analysis in &report.cases {
        let verdict = &analysis.verdict;
        csv.serialize(SummaryRow {
            id: &verdict.id,
            description: &verdict.description,
            total_steps: verdict.total_steps,
            feasibility: &verdict.feasibility,
            primary_tool: &verdict.primary_tool,
        })
        .context("Failed to write summary row")?;
    }
    csv.flush().context("Failed to flush summary CSV")?;
    Ok(())
}
