mod client;
pub(crate) mod schema;
pub(crate) mod types;

pub use schema::StructuredOutput;

use std::time::Duration;

use anyhow::{anyhow, Result};

use client::OpenAiClient;

/// Default per-request timeout. Analysis calls must never hold a search
/// open indefinitely; on timeout the caller takes its fallback path.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI-compatible structured-extraction agent.
///
/// Cheap to clone; the underlying HTTP client is created per request with
/// the configured timeout applied.
#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    base_url: Option<String>,
    timeout: Duration,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key, self.timeout);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Type-safe structured output extraction.
    pub async fn extract<T: StructuredOutput>(
        &self,
        model: &str,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let schema = T::openai_schema();

        let request = types::StructuredRequest {
            model: model.to_string(),
            messages: vec![
                types::WireMessage::system(system_prompt),
                types::WireMessage::user(user_prompt),
            ],
            temperature: Some(0.0),
            response_format: types::ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: types::JsonSchemaFormat {
                    name: "structured_response".to_string(),
                    strict: true,
                    schema,
                },
            },
        };

        let json_str = self.client().structured_output(&request).await?;

        serde_json::from_str(&json_str)
            .map_err(|e| anyhow!("Failed to deserialize response: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_new() {
        let ai = OpenAi::new("sk-test");
        assert_eq!(ai.api_key, "sk-test");
        assert_eq!(ai.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_openai_with_base_url() {
        let ai = OpenAi::new("sk-test").with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[test]
    fn test_openai_with_timeout() {
        let ai = OpenAi::new("sk-test").with_timeout(Duration::from_secs(5));
        assert_eq!(ai.timeout, Duration::from_secs(5));
    }
}
