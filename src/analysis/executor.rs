//! Bounded fan-out of step classification

use super::classifier::StepClassifier;
use super::types::StepResult;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error};

/// Ordinal given to steps without a leading number; they sort last.
pub const UNNUMBERED_STEP_ORDINAL: i64 = 9999;

/// Default number of concurrent model requests per test case.
pub const DEFAULT_POOL_SIZE: usize = 2;

/// Parses the number before the first `.` of a step label, e.g. `12` for
/// `"12. Click submit"`. Returns [`UNNUMBERED_STEP_ORDINAL`] when there is none.
pub fn step_number(step: &str) -> i64 {
    step.split('.')
        .next()
        .and_then(|prefix| prefix.trim().parse::<i64>().ok())
        .unwrap_or(UNNUMBERED_STEP_ORDINAL)
}

/// Stable sort by step number; unnumbered steps keep their relative order.
pub fn sort_by_step_number(results: &mut [StepResult]) {
    results.sort_by_key(|result| step_number(&result.step));
}

/// Runs the classifier over every step of one test case with at most
/// `pool_size` requests in flight, then waits for all of them.
pub struct FanOutExecutor {
    classifier: StepClassifier,
    pool_size: usize,
    progress: Arc<dyn ProgressHandler>,
}

impl FanOutExecutor {
    pub fn new(classifier: StepClassifier, pool_size: usize) -> Self {
        Self {
            classifier,
            pool_size: pool_size.max(1),
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Classifies `steps` and returns one result per step, sorted by step number.
    ///
    /// A fresh pool is used per call. Every submitted request runs to
    /// completion; a failing or panicking request yields an "Error" record
    /// for its step and does not affect the others.
    pub async fn run(&self, case_id: &str, steps: &[String]) -> Vec<StepResult> {
        let semaphore = Arc::new(Semaphore::new(self.pool_size));
        debug!(
            case = case_id,
            steps = steps.len(),
            pool_size = self.pool_size,
            "Submitting steps"
        );

        let mut handles = Vec::with_capacity(steps.len());
        for step in steps {
            let classifier = self.classifier.clone();
            let semaphore = semaphore.clone();
            let progress = self.progress.clone();
            let case_id = case_id.to_string();
            let task_step = step.clone();

            let handle = tokio::spawn(async move {
                let result = match semaphore.acquire().await {
                    Ok(_permit) => classifier.classify(&task_step).await,
                    Err(e) => StepResult::failed(&task_step, e),
                };
                progress.on_progress(&ProgressEvent::StepClassified {
                    case_id,
                    step: result.step.clone(),
                    feasibility: result.feasibility.clone(),
                });
                result
            });
            handles.push((step.clone(), handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (step, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!(case = case_id, step = %step, "Classification task failed: {}", e);
                    results.push(StepResult::failed(step, format!("worker task failed: {}", e)));
                }
            }
        }

        sort_by_step_number(&mut results);
        results
    }
}

impl std::fmt::Debug for FanOutExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutExecutor")
            .field("classifier", &self.classifier)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}
