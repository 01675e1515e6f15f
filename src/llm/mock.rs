use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const MOCK_NAME: &str = "MockLLM";

/// Scriptable client for tests.
///
/// Keyed responses are matched against the last user message (first key
/// contained in it wins) and may be served any number of times. Requests that
/// match no key consume the FIFO queue.
pub struct MockLLMClient {
    keyed: Mutex<Vec<(String, MockResponse)>>,
    responses: Mutex<VecDeque<MockResponse>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub content: String,
    pub error: Option<BackendError>,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
            delay: None,
        }
    }

    pub fn error(error: BackendError) -> Self {
        Self {
            content: String::new(),
            error: Some(error),
            delay: None,
        }
    }

    /// Step verdict in the JSON shape the classifier expects.
    pub fn verdict(feasibility: &str, primary_tool: &str, confidence: i64) -> Self {
        Self::text(
            serde_json::json!({
                "Feasibility": feasibility,
                "Recommended Tools": [primary_tool],
                "Recommended Primary Tool": primary_tool,
                "Confidence Score": confidence,
                "Rationale": format!("{} via {}", feasibility, primary_tool),
            })
            .to_string(),
        )
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self {
            keyed: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
    }

    /// Serves `response` whenever the prompt contains `key`.
    pub fn respond_to(&self, key: impl Into<String>, response: MockResponse) {
        self.keyed.lock().unwrap().push((key.into(), response));
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of requests observed running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_response(&self, request: &LLMRequest) -> Option<MockResponse> {
        let prompt = request.last_user_content().unwrap_or_default();
        let keyed = self
            .keyed
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, response)| response.clone());

        keyed.or_else(|| self.responses.lock().unwrap().pop_front())
    }
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .next_response(&request)
            .ok_or_else(|| BackendError::Other {
                message: "MockLLMClient: No more responses in queue".to_string(),
            })?;

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        // Yield at least once so concurrently spawned requests overlap.
        match response.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = response.error {
            return Err(error);
        }

        Ok(LLMResponse::text(response.content, Duration::from_millis(10)))
    }

    fn name(&self) -> &str {
        MOCK_NAME
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

impl std::fmt::Debug for MockLLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLLMClient")
            .field("calls", &self.call_count())
            .field("remaining_responses", &self.remaining_responses())
            .finish()
    }
}
