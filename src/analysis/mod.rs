//! Step classification, fan-out and aggregation

pub mod aggregate;
pub mod analyzer;
pub mod classifier;
pub mod executor;
pub mod prompt;
pub mod response;
pub mod types;

pub use aggregate::{aggregate, case_feasibility};
pub use analyzer::{AnalysisReport, FeasibilityAnalyzer};
pub use classifier::StepClassifier;
pub use executor::{sort_by_step_number, step_number, FanOutExecutor, UNNUMBERED_STEP_ORDINAL};
pub use prompt::build_step_prompt;
pub use response::{decode_step_response, ParseError};
pub use types::{
    CaseAnalysis, CaseVerdict, Feasibility, StepResult, TestCase, TOOL_VOCABULARY,
};
