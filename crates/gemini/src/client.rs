use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::backend::ReasoningBackend;
use crate::error::{GeminiError, Result};
use crate::retry::RetryPolicy;
use crate::types::{
    GenerateContentRequest, GenerateContentResponse, InferenceRequest, InferenceResponse,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    retry: RetryPolicy,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let send_result = self
                .client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(body)
                .send()
                .await;

            let response = match send_result {
                Ok(response) => response,
                Err(e) => {
                    if (e.is_connect() || e.is_timeout()) && attempt < self.retry.attempts {
                        let delay = self.retry.delay_for(attempt);
                        warn!(
                            attempt = attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Transport error, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(GeminiError::Request(e));
                }
            };

            let status = response.status();
            if status.is_success() {
                debug!(model = %self.model, attempt = attempt, "Inference succeeded");
                return Ok(response.json().await?);
            }

            let code = status.as_u16();
            if self.retry.is_retryable(code) {
                if attempt < self.retry.attempts {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        status = code,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Retryable API error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(GeminiError::RetriesExhausted {
                    attempts: self.retry.attempts,
                    status: code,
                });
            }

            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: code,
                message,
            });
        }
    }
}

#[async_trait]
impl ReasoningBackend for GeminiClient {
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse> {
        let body = GenerateContentRequest::from_inference(request);
        let response = self.generate(&body).await?;
        response.into_inference().ok_or(GeminiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_overrides() {
        let client = GeminiClient::new("test-key")
            .with_model("gemini-2.5-pro")
            .with_base_url("http://localhost:9999/v1beta")
            .with_retry(RetryPolicy::new().with_attempts(2));

        assert_eq!(client.model(), "gemini-2.5-pro");
        assert_eq!(client.base_url, "http://localhost:9999/v1beta");
        assert_eq!(client.retry.attempts, 2);
    }
}
