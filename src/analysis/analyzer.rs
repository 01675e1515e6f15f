//! Batch driver: one fan-out per test case, cases processed in order

use super::aggregate::aggregate;
use super::classifier::StepClassifier;
use super::executor::FanOutExecutor;
use super::types::{CaseAnalysis, TestCase};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Result of analyzing a whole input sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub cases: Vec<CaseAnalysis>,
}

impl AnalysisReport {
    pub fn total_steps(&self) -> usize {
        self.cases.iter().map(|c| c.steps.len()).sum()
    }

    pub fn failed_steps(&self) -> usize {
        self.cases
            .iter()
            .flat_map(|c| c.steps.iter())
            .filter(|s| s.is_error())
            .count()
    }
}

pub struct FeasibilityAnalyzer {
    executor: FanOutExecutor,
    model: String,
    progress: Arc<dyn ProgressHandler>,
}

impl FeasibilityAnalyzer {
    pub fn new(classifier: StepClassifier, pool_size: usize) -> Self {
        let model = classifier
            .client()
            .model_info()
            .unwrap_or_else(|| classifier.client().name().to_string());
        Self {
            executor: FanOutExecutor::new(classifier, pool_size),
            model,
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.executor = self.executor.with_progress(progress.clone());
        self.progress = progress;
        self
    }

    pub async fn analyze(&self, cases: &[TestCase]) -> AnalysisReport {
        let start = Instant::now();
        let total_steps = cases.iter().map(|c| c.steps.len()).sum();
        self.progress.on_progress(&ProgressEvent::Started {
            total_cases: cases.len(),
            total_steps,
        });

        let mut analyses = Vec::with_capacity(cases.len());
        for (index, case) in cases.iter().enumerate() {
            analyses.push(self.analyze_case(case, index + 1, cases.len()).await);
        }

        let report = AnalysisReport {
            generated_at: Utc::now(),
            model: self.model.clone(),
            cases: analyses,
        };

        self.progress.on_progress(&ProgressEvent::Completed {
            total_cases: cases.len(),
            failed_steps: report.failed_steps(),
            total_time: start.elapsed(),
        });
        info!(
            cases = cases.len(),
            steps = report.total_steps(),
            "Feasibility analysis finished in {:?}",
            start.elapsed()
        );

        report
    }

    async fn analyze_case(&self, case: &TestCase, index: usize, total: usize) -> CaseAnalysis {
        let start = Instant::now();
        self.progress.on_progress(&ProgressEvent::CaseStarted {
            case_id: case.id.clone(),
            index,
            total,
            steps: case.steps.len(),
        });

        let steps = self.executor.run(&case.id, &case.steps).await;
        let verdict = aggregate(case, &steps);

        self.progress.on_progress(&ProgressEvent::CaseCompleted {
            case_id: case.id.clone(),
            feasibility: verdict.feasibility.clone(),
            duration: start.elapsed(),
        });

        CaseAnalysis {
            case: case.clone(),
            steps,
            verdict,
        }
    }
}

impl std::fmt::Debug for FeasibilityAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeasibilityAnalyzer")
            .field("executor", &self.executor)
            .field("model", &self.model)
            .finish()
    }
}
