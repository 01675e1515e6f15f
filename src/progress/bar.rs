//! Terminal progress bar handler

use super::{ProgressEvent, ProgressHandler};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str = "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} steps {msg}";

/// Renders one bar across all steps of the batch on stderr.
#[derive(Debug, Clone)]
pub struct ProgressBarHandler {
    bar: ProgressBar,
}

impl ProgressBarHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target);
        let style =
            ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for ProgressBarHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHandler for ProgressBarHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { total_steps, .. } => {
                self.bar.set_length(*total_steps as u64);
                self.bar.set_position(0);
            }
            ProgressEvent::CaseStarted { case_id, .. } => {
                self.bar.set_message(case_id.clone());
            }
            ProgressEvent::StepClassified { .. } => self.bar.inc(1),
            ProgressEvent::CaseCompleted { .. } => {}
            ProgressEvent::Completed { .. } => self.bar.finish_and_clear(),
        }
    }
}
