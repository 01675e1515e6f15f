//! qa-feasibility - LLM-assisted automation feasibility analysis
//!
//! Reads a spreadsheet of manual QA test cases, asks a language model whether
//! each test step can be automated and with which tool, and derives a verdict
//! per test case from the step answers.
//!
//! # Core Concepts
//!
//! - **Step classification**: one model exchange per step, decoded into a
//!   [`StepResult`]. Any failure becomes an `Error` record instead of aborting
//!   the run.
//! - **Fan-out**: steps of one test case are classified concurrently on a
//!   bounded pool and re-ordered by their numeric prefix afterwards.
//! - **Aggregation**: the step feasibilities collapse into Automatable,
//!   Not Automatable or Partially Automatable; the primary tool comes from the
//!   first step.
//!
//! # Example Usage
//!
//! ```no_run
//! use qa_feasibility::{FeasibilityAnalyzer, FeasibilityConfig, StepClassifier};
//! use std::path::Path;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = FeasibilityConfig::default();
//! let cases = qa_feasibility::sheet::read_test_cases(Path::new("cases.xlsx"), &config.sheet)?;
//!
//! let classifier = StepClassifier::new(config.create_client()?);
//! let report = FeasibilityAnalyzer::new(classifier, config.pool_size)
//!     .analyze(&cases)
//!     .await;
//!
//! for case in &report.cases {
//!     println!("{}: {}", case.verdict.id, case.verdict.feasibility);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`llm`]: model client abstraction, genai client and mock client
//! - [`analysis`]: prompt, response decoding, classifier, fan-out and aggregation
//! - [`sheet`]: spreadsheet intake
//! - [`report`]: CSV and JSON exports, statistics
//! - [`cache`]: on-disk result cache
//! - [`progress`]: progress reporting

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod llm;
pub mod progress;
pub mod report;
pub mod sheet;
pub mod util;

pub use analysis::{
    AnalysisReport, CaseAnalysis, CaseVerdict, FeasibilityAnalyzer, Feasibility, StepClassifier,
    StepResult, TestCase,
};
pub use cache::{CacheKey, ResultCache};
pub use config::{ConfigError, FeasibilityConfig};
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient, MockResponse};
pub use sheet::{read_test_cases, SheetError};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
