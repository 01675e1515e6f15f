//! Progress handler trait and events

use crate::analysis::Feasibility;
use std::time::Duration;

/// Events emitted while a batch of test cases is analyzed
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Batch started
    Started { total_cases: usize, total_steps: usize },

    /// Fan-out for one test case started
    CaseStarted {
        case_id: String,
        index: usize,
        total: usize,
        steps: usize,
    },

    /// One step finished classification (in completion order)
    StepClassified {
        case_id: String,
        step: String,
        feasibility: Feasibility,
    },

    /// All steps of a test case finished
    CaseCompleted {
        case_id: String,
        feasibility: Feasibility,
        duration: Duration,
    },

    /// Batch finished
    Completed {
        total_cases: usize,
        failed_steps: usize,
        total_time: Duration,
    },
}

/// Trait for handling progress events during analysis
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
