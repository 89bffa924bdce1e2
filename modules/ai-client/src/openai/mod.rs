mod client;
pub mod types;

pub use types::{ContentPart, SamplingOptions};

use crate::error::Result;

use client::OpenAiClient;
use types::*;

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Single-shot multimodal completion: a system instruction plus one user
    /// turn of typed parts. Returns the primary text of the reply, which is
    /// empty when the provider sent no text.
    pub async fn respond(
        &self,
        system: impl Into<String>,
        parts: Vec<ContentPart>,
        options: SamplingOptions,
    ) -> Result<String> {
        let mut request = ResponsesRequest::new(&self.model)
            .message(InputMessage::system(system))
            .message(InputMessage::user(parts));

        if let Some(temp) = options.temperature {
            if supports_temperature(&self.model) {
                request = request.temperature(temp);
            }
        }
        if let Some(max) = options.max_output_tokens {
            request = request.max_output_tokens(max);
        }

        let response = self.client().responses(&request).await?;
        Ok(response.primary_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;

    #[test]
    fn test_openai_new() {
        let ai = OpenAi::new("sk-test", "gpt-4.1-mini");
        assert_eq!(ai.model(), "gpt-4.1-mini");
        assert_eq!(ai.api_key, "sk-test");
        assert!(ai.base_url.is_none());
    }

    #[test]
    fn test_openai_with_base_url() {
        let ai = OpenAi::new("sk-test", "gpt-4.1-mini").with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[tokio::test]
    async fn test_respond_without_key_is_config_error() {
        let ai = OpenAi::new("", "gpt-4.1-mini").with_base_url("http://127.0.0.1:1");
        let err = ai
            .respond("system", vec![ContentPart::text("hi")], SamplingOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Config(_)));
    }
}
