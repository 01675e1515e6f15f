//! Single-step feasibility classification

use super::prompt::build_step_prompt;
use super::response::decode_step_response;
use super::types::StepResult;
use crate::llm::{LLMClient, LLMRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Classifies one test step with one model request.
///
/// Never fails: transport and decoding problems are turned into an "Error"
/// [`StepResult`] carrying the failure text as its rationale.
#[derive(Clone)]
pub struct StepClassifier {
    client: Arc<dyn LLMClient>,
    strict_vocabulary: bool,
}

impl StepClassifier {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            strict_vocabulary: false,
        }
    }

    /// Rejects feasibility labels and tool names outside the fixed vocabulary
    /// instead of passing them through.
    pub fn with_strict_vocabulary(mut self, strict: bool) -> Self {
        self.strict_vocabulary = strict;
        self
    }

    pub fn client(&self) -> &Arc<dyn LLMClient> {
        &self.client
    }

    pub async fn classify(&self, step: &str) -> StepResult {
        let request = LLMRequest::new(build_step_prompt(step));

        let response = match self.client.chat(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(step, error = %e, "Model request failed");
                return StepResult::failed(step, e);
            }
        };

        debug!(
            step,
            response_time_ms = response.response_time.as_millis() as u64,
            "Received model response"
        );

        let result = match decode_step_response(step, &response.content) {
            Ok(result) => result,
            Err(e) => {
                warn!(step, error = %e, "Could not decode model response");
                return StepResult::failed(step, e);
            }
        };

        self.check_vocabulary(result)
    }

    fn check_vocabulary(&self, result: StepResult) -> StepResult {
        let mut problems = Vec::new();
        if !result.feasibility.is_verdict() {
            problems.push(format!("feasibility \"{}\"", result.feasibility));
        }
        let unknown_tools = result.unknown_tools();
        if !unknown_tools.is_empty() {
            problems.push(format!("tools [{}]", unknown_tools.join(", ")));
        }

        if problems.is_empty() {
            return result;
        }

        let summary = problems.join(", ");
        if self.strict_vocabulary {
            warn!(step = %result.step, "Rejecting out-of-vocabulary values: {}", summary);
            StepResult::failed(
                result.step,
                format!("out-of-vocabulary values: {}", summary),
            )
        } else {
            warn!(step = %result.step, "Model returned out-of-vocabulary values: {}", summary);
            result
        }
    }
}

impl std::fmt::Debug for StepClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepClassifier")
            .field("client", &self.client.name())
            .field("strict_vocabulary", &self.strict_vocabulary)
            .finish()
    }
}
