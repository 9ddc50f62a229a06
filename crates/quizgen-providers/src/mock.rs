//! Mock generator for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizgen_core::traits::{GenerateRequest, GenerateResponse, TextGenerator};

/// A mock text generator for exercising the engine without real API
/// calls.
///
/// Returns configurable responses based on prompt content matching.
pub struct MockGenerator {
    /// Map of prompt substring → response text.
    responses: HashMap<String, String>,
    /// Default response if no prompt matches.
    default_response: String,
    /// Error message to return instead of a response, if set.
    failure: Option<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last prompt received.
    last_prompt: Mutex<Option<String>>,
}

impl MockGenerator {
    /// Create a mock with the given prompt→response mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: "[]".to_string(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: response.to_string(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Create a mock that fails every call with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: String::new(),
            failure: Some(message.to_string()),
            call_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last prompt this generator received.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());

        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }

        let text = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        Ok(GenerateResponse {
            text,
            model: request.model.clone(),
            latency_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: "mock".into(),
            prompt: prompt.into(),
            temperature: 0.0,
            max_output_tokens: 100,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let generator = MockGenerator::with_fixed_response("[{\"prompt\": \"q\"}]");
        let response = generator.generate(&request("anything")).await.unwrap();
        assert_eq!(response.text, "[{\"prompt\": \"q\"}]");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_matching() {
        let mut responses = HashMap::new();
        responses.insert("exam".to_string(), "[\"exam json\"]".to_string());
        responses.insert("lessons".to_string(), "[\"lesson json\"]".to_string());

        let generator = MockGenerator::new(responses);

        let resp = generator
            .generate(&request("Generate an exam of 10 questions"))
            .await
            .unwrap();
        assert!(resp.text.contains("exam json"));

        let resp = generator
            .generate(&request("Split into progressive lessons"))
            .await
            .unwrap();
        assert!(resp.text.contains("lesson json"));
        assert_eq!(generator.call_count(), 2);
        assert!(generator.last_prompt().unwrap().contains("lessons"));
    }

    #[tokio::test]
    async fn failing_mock_errors() {
        let generator = MockGenerator::failing("rate limited, retry after 100ms");
        let err = generator.generate(&request("x")).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
        assert_eq!(generator.call_count(), 1);
    }
}
