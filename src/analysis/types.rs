//! Core data types for feasibility analysis

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Tool names the model is asked to choose from.
pub const TOOL_VOCABULARY: [&str; 4] = ["Selenium", "Cypress", "Appium", "Manual"];

/// Placeholder tool used by failed classifications.
pub const NOT_APPLICABLE: &str = "N/A";

/// Primary tool reported when the model omits one.
pub const UNKNOWN_TOOL: &str = "Unknown";

pub fn is_known_tool(name: &str) -> bool {
    TOOL_VOCABULARY.contains(&name)
}

/// How amenable a test step (or a whole test case) is to automation.
///
/// Values outside the canonical set are preserved verbatim in `Other` so a
/// misbehaving model stays visible in the report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feasibility {
    Automatable,
    PartiallyAutomatable,
    NotAutomatable,
    Error,
    Unknown,
    Other(String),
}

impl Feasibility {
    pub fn as_str(&self) -> &str {
        match self {
            Feasibility::Automatable => "Automatable",
            Feasibility::PartiallyAutomatable => "Partially Automatable",
            Feasibility::NotAutomatable => "Not Automatable",
            Feasibility::Error => "Error",
            Feasibility::Unknown => "Unknown",
            Feasibility::Other(raw) => raw,
        }
    }

    /// Maps a model-provided label onto the enum without altering unknown text.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Automatable" => Feasibility::Automatable,
            "Partially Automatable" => Feasibility::PartiallyAutomatable,
            "Not Automatable" => Feasibility::NotAutomatable,
            "Error" => Feasibility::Error,
            "Unknown" => Feasibility::Unknown,
            other => Feasibility::Other(other.to_string()),
        }
    }

    /// True for the three verdicts the model is allowed to return.
    pub fn is_verdict(&self) -> bool {
        matches!(
            self,
            Feasibility::Automatable
                | Feasibility::PartiallyAutomatable
                | Feasibility::NotAutomatable
        )
    }
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Feasibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Feasibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Feasibility::from_label(&label))
    }
}

/// One manual test case as read from the input sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected_result: String,
    pub actual_result: String,
}

impl TestCase {
    /// Builds a test case from raw cell values, splitting the steps cell into
    /// one trimmed entry per non-empty line.
    pub fn from_cells(
        id: impl Into<String>,
        description: impl Into<String>,
        steps_cell: &str,
        expected_result: impl Into<String>,
        actual_result: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            steps: split_steps(steps_cell),
            expected_result: expected_result.into(),
            actual_result: actual_result.into(),
        }
    }
}

/// Splits a multi-line steps cell into trimmed, non-empty lines.
pub fn split_steps(cell: &str) -> Vec<String> {
    cell.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classification of a single test step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    #[serde(rename = "Step")]
    pub step: String,
    #[serde(rename = "Feasibility")]
    pub feasibility: Feasibility,
    #[serde(rename = "Recommended Tools", default)]
    pub recommended_tools: Vec<String>,
    // Older reports carried a single "Recommended Tool" per step.
    #[serde(rename = "Recommended Primary Tool", alias = "Recommended Tool")]
    pub primary_tool: String,
    #[serde(rename = "Confidence Score")]
    pub confidence: i64,
    #[serde(rename = "Rationale")]
    pub rationale: String,
}

impl StepResult {
    /// Sentinel record for a step whose classification failed.
    pub fn failed(step: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            step: step.into(),
            feasibility: Feasibility::Error,
            recommended_tools: vec![NOT_APPLICABLE.to_string()],
            primary_tool: NOT_APPLICABLE.to_string(),
            confidence: 0,
            rationale: format!("Failed to analyze: {}", reason),
        }
    }

    pub fn is_error(&self) -> bool {
        self.feasibility == Feasibility::Error
    }

    /// Tool names (recommended or primary) outside [`TOOL_VOCABULARY`].
    /// The "Unknown" and "N/A" placeholders are not reported.
    pub fn unknown_tools(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = Vec::new();
        let names = self
            .recommended_tools
            .iter()
            .chain(std::iter::once(&self.primary_tool));
        for name in names {
            if is_known_tool(name) || name == UNKNOWN_TOOL || name == NOT_APPLICABLE {
                continue;
            }
            if !unknown.contains(&name.as_str()) {
                unknown.push(name);
            }
        }
        unknown
    }

    /// Recommended tools joined the way the tabular exports render them.
    pub fn tools_joined(&self) -> String {
        self.recommended_tools.join(", ")
    }
}

/// Case-level summary derived from a test case's step results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseVerdict {
    #[serde(rename = "Test Case ID")]
    pub id: String,
    #[serde(rename = "Test Description")]
    pub description: String,
    #[serde(rename = "Total Steps")]
    pub total_steps: usize,
    #[serde(rename = "Feasibility")]
    pub feasibility: Feasibility,
    #[serde(rename = "Recommended Primary Tool")]
    pub primary_tool: String,
}

/// Everything known about one analyzed test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAnalysis {
    pub case: TestCase,
    pub steps: Vec<StepResult>,
    pub verdict: CaseVerdict,
}
