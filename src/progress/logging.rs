//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use crate::analysis::Feasibility;
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started {
                total_cases,
                total_steps,
            } => {
                info!(
                    cases = total_cases,
                    steps = total_steps,
                    "Starting feasibility analysis"
                );
            }
            ProgressEvent::CaseStarted {
                case_id,
                index,
                total,
                steps,
            } => {
                info!(
                    case = %case_id,
                    progress = format!("{}/{}", index, total),
                    steps,
                    "Analyzing test case"
                );
            }
            ProgressEvent::StepClassified {
                case_id,
                step,
                feasibility,
            } => {
                if *feasibility == Feasibility::Error {
                    warn!(case = %case_id, step = %step, "Step classification failed");
                } else {
                    debug!(
                        case = %case_id,
                        step = %step,
                        feasibility = %feasibility,
                        "Step classified"
                    );
                }
            }
            ProgressEvent::CaseCompleted {
                case_id,
                feasibility,
                duration,
            } => {
                info!(
                    case = %case_id,
                    feasibility = %feasibility,
                    duration_ms = duration.as_millis(),
                    "Test case complete"
                );
            }
            ProgressEvent::Completed {
                total_cases,
                failed_steps,
                total_time,
            } => {
                if *failed_steps > 0 {
                    warn!(
                        cases = total_cases,
                        failed_steps,
                        total_time_ms = total_time.as_millis(),
                        "Analysis complete with failed steps"
                    );
                } else {
                    info!(
                        cases = total_cases,
                        total_time_ms = total_time.as_millis(),
                        "Analysis complete"
                    );
                }
            }
        }
    }
}
