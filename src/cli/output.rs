//! Output formatting for multiple formats
//!
//! Renders analysis results, stored reports and configuration as JSON, YAML
//! or human-readable text.
//!
//! # Example
//!
//! ```ignore
//! use qa_feasibility::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_analysis(&report)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::{AnalysisReport, StepResult};
use crate::config::FeasibilityConfig;
use crate::report::{nest_report, Distribution, ReportCase, StepStatistics};

const RULE_WIDTH: usize = 42;
const STEP_COLUMN_WIDTH: usize = 40;
const RATIONALE_COLUMN_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

#[derive(Serialize)]
struct AnalysisView<'a> {
    generated_at: String,
    model: &'a str,
    total_cases: usize,
    total_steps: usize,
    failed_steps: usize,
    statistics: StepStatistics,
    cases: Vec<ReportCase>,
}

#[derive(Serialize)]
struct CaseView<'a> {
    case: &'a ReportCase,
    statistics: StepStatistics,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of an `analyze` run
    pub fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let view = AnalysisView {
            generated_at: report.generated_at.to_rfc3339(),
            model: &report.model,
            total_cases: report.cases.len(),
            total_steps: report.total_steps(),
            failed_steps: report.failed_steps(),
            statistics: StepStatistics::from_steps(report.cases.iter().flat_map(|c| &c.steps)),
            cases: nest_report(report),
        };

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&view)
                .context("Failed to serialize analysis to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&view).context("Failed to serialize analysis to YAML")
            }
            OutputFormat::Human => Ok(self.format_analysis_human(&view)),
        }
    }

    /// Lists the test cases contained in a stored report
    pub fn format_report_index(&self, cases: &[ReportCase]) -> Result<String> {
        let ids: Vec<&str> = cases.iter().map(|c| c.id.as_str()).collect();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&ids).context("Failed to serialize case list to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(&ids).context("Failed to serialize case list to YAML")
            }
            OutputFormat::Human => {
                let mut output = String::new();
                output.push_str(&format!("Test Cases ({})\n", ids.len()));
                output.push_str(&rule());
                for case in cases {
                    output.push_str(&format!(
                        "  {:<16} {:<24} {}\n",
                        case.id,
                        case.feasibility.as_str(),
                        truncate(&case.description, STEP_COLUMN_WIDTH)
                    ));
                }
                output.push_str("\nSelect one with --case <ID>\n");
                Ok(output)
            }
        }
    }

    /// Formats the statistics and step table for one stored test case
    pub fn format_report_case(&self, case: &ReportCase) -> Result<String> {
        let view = CaseView {
            case,
            statistics: StepStatistics::from_steps(case.steps.iter()),
        };

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&view)
                .context("Failed to serialize test case to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&view).context("Failed to serialize test case to YAML")
            }
            OutputFormat::Human => Ok(self.format_case_human(&view)),
        }
    }

    pub fn format_config(&self, config: &FeasibilityConfig) -> Result<String> {
        let config_map = config.to_display_map();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config_map).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_analysis_human(&self, view: &AnalysisView<'_>) -> String {
        let mut output = String::new();

        if view.failed_steps == 0 {
            output.push_str("\u{2713} Automation Feasibility Analysis\n");
        } else {
            output.push_str("\u{26A0} Automation Feasibility Analysis (with failed steps)\n");
        }
        output.push_str(&rule());
        output.push('\n');

        output.push_str(&format!("Model:        {}\n", view.model));
        output.push_str(&format!("Generated:    {}\n", view.generated_at));
        output.push_str(&format!("Test Cases:   {}\n", view.total_cases));
        output.push_str(&format!("Steps:        {}\n", view.total_steps));
        output.push_str(&format!("Failed Steps: {}\n\n", view.failed_steps));

        output.push_str("Summary:\n");
        output.push_str(&format!(
            "  {:<16} {:<40} {:>5}  {:<24} {}\n",
            "Test Case ID", "Test Description", "Steps", "Feasibility", "Primary Tool"
        ));
        for case in &view.cases {
            output.push_str(&format!(
                "  {:<16} {:<40} {:>5}  {:<24} {}\n",
                case.id,
                truncate(&case.description, STEP_COLUMN_WIDTH),
                case.total_steps,
                case.feasibility.as_str(),
                case.primary_tool
            ));
        }
        output.push('\n');

        push_statistics(&mut output, &view.statistics);

        output.push_str("Detailed Analysis:\n");
        for case in &view.cases {
            output.push_str(&format!("\n{} - {}\n", case.id, case.description));
            push_step_table(&mut output, &case.steps);
        }

        output
    }

    fn format_case_human(&self, view: &CaseView<'_>) -> String {
        let case = view.case;
        let mut output = String::new();

        output.push_str(&format!("Test Case {}\n", case.id));
        output.push_str(&rule());
        output.push('\n');
        output.push_str(&format!("Description:  {}\n", case.description));
        output.push_str(&format!("Expected:     {}\n", case.expected_result));
        output.push_str(&format!("Actual:       {}\n", case.actual_result));
        output.push_str(&format!("Total Steps:  {}\n", case.total_steps));
        output.push_str(&format!("Feasibility:  {}\n", case.feasibility));
        output.push_str(&format!("Primary Tool: {}\n\n", case.primary_tool));

        push_statistics(&mut output, &view.statistics);

        output.push_str("Confidence Scores:\n");
        for step in &case.steps {
            output.push_str(&format!(
                "  {:<40} {}\n",
                truncate(&step.step, STEP_COLUMN_WIDTH),
                confidence_bar(step.confidence)
            ));
        }
        output.push('\n');

        output.push_str("Detailed Analysis:\n");
        push_step_table(&mut output, &case.steps);

        output
    }
}

fn rule() -> String {
    let mut line = "\u{2501}".repeat(RULE_WIDTH);
    line.push('\n');
    line
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

fn confidence_bar(confidence: i64) -> String {
    let clamped = confidence.clamp(0, 100);
    let filled = (clamped / 10) as usize;
    format!(
        "{}{} {}%",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(10 - filled),
        confidence
    )
}

fn push_distribution(output: &mut String, title: &str, distribution: &Distribution) {
    output.push_str(&format!("{}:\n", title));
    if distribution.is_empty() {
        output.push_str("  (none)\n");
    }
    for (i, (label, count)) in distribution.iter().enumerate() {
        let connector = if i == distribution.len() - 1 {
            "\u{2514}\u{2500}"
        } else {
            "\u{251C}\u{2500}"
        };
        output.push_str(&format!("{} {:<24} {}\n", connector, label, count));
    }
    output.push('\n');
}

fn push_statistics(output: &mut String, statistics: &StepStatistics) {
    push_distribution(output, "Step Feasibility", &statistics.feasibility);
    push_distribution(output, "Recommended Tools", &statistics.tools);
    push_distribution(output, "Primary Tools", &statistics.primary_tools);
}

fn push_step_table(output: &mut String, steps: &[StepResult]) {
    output.push_str(&format!(
        "  {:<40} {:<24} {:<24} {:<10} {:>4}  {}\n",
        "Step", "Feasibility", "Tools", "Primary", "Conf", "Rationale"
    ));
    for step in steps {
        output.push_str(&format!(
            "  {:<40} {:<24} {:<24} {:<10} {:>4}  {}\n",
            truncate(&step.step, STEP_COLUMN_WIDTH),
            step.feasibility.as_str(),
            truncate(&step.tools_joined(), 24),
            step.primary_tool,
            step.confidence,
            truncate(&step.rationale, RATIONALE_COLUMN_WIDTH)
        ));
    }
}
