use ai_client::{AiError, ContentPart, OpenAi, SamplingOptions};
use async_trait::async_trait;
use tracing::debug;

use crate::prompt::{PromptBlock, PromptInput, SYSTEM_PROMPT};
use crate::traits::Inference;

/// Conservative sampling for a classification task.
pub const TEMPERATURE: f32 = 0.2;
pub const MAX_OUTPUT_TOKENS: u32 = 700;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceOutcome {
    Success { raw_text: String },
    AuthFailure,
    RateLimited,
    UpstreamError { detail: String },
}

/// Map a provider result onto an outcome. An empty reply is still a
/// success; the parser deals with it.
pub fn classify(result: ai_client::Result<String>) -> InferenceOutcome {
    match result {
        Ok(raw_text) => InferenceOutcome::Success { raw_text },
        Err(AiError::Config(_)) | Err(AiError::Unauthorized(_)) => InferenceOutcome::AuthFailure,
        Err(AiError::RateLimited(_)) => InferenceOutcome::RateLimited,
        Err(AiError::Api { status, message }) => InferenceOutcome::UpstreamError {
            detail: format!("status {status}: {message}"),
        },
        Err(e @ AiError::Network(_)) | Err(e @ AiError::Parse(_)) => {
            InferenceOutcome::UpstreamError {
                detail: e.to_string(),
            }
        }
    }
}

fn to_content_part(block: &PromptBlock) -> ContentPart {
    match block {
        PromptBlock::Text { text } => ContentPart::text(text),
        PromptBlock::Image { data } => ContentPart::image(data),
    }
}

/// Inference backed by the OpenAI Responses API.
pub struct OpenAiInvoker {
    agent: OpenAi,
}

impl OpenAiInvoker {
    pub fn new(agent: OpenAi) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl Inference for OpenAiInvoker {
    async fn invoke(&self, prompt: &PromptInput) -> InferenceOutcome {
        let parts: Vec<ContentPart> = prompt.blocks().iter().map(to_content_part).collect();
        let options = SamplingOptions {
            temperature: Some(TEMPERATURE),
            max_output_tokens: Some(MAX_OUTPUT_TOKENS),
        };

        debug!(
            model = %self.agent.model(),
            blocks = parts.len(),
            has_image = prompt.has_image(),
            "inference: invoking"
        );

        classify(self.agent.respond(SYSTEM_PROMPT, parts, options).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::assemble;

    #[test]
    fn test_classify_success_keeps_text() {
        assert_eq!(
            classify(Ok("{}".to_string())),
            InferenceOutcome::Success {
                raw_text: "{}".to_string()
            }
        );
        assert_eq!(
            classify(Ok(String::new())),
            InferenceOutcome::Success {
                raw_text: String::new()
            }
        );
    }

    #[test]
    fn test_classify_auth_class() {
        assert_eq!(
            classify(Err(AiError::Unauthorized("Incorrect API key".into()))),
            InferenceOutcome::AuthFailure
        );
        assert_eq!(
            classify(Err(AiError::Config("OPENAI_API_KEY is not set".into()))),
            InferenceOutcome::AuthFailure
        );
    }

    #[test]
    fn test_classify_rate_limited() {
        assert_eq!(
            classify(Err(AiError::RateLimited("quota".into()))),
            InferenceOutcome::RateLimited
        );
    }

    #[test]
    fn test_classify_everything_else_is_upstream() {
        match classify(Err(AiError::Api {
            status: 500,
            message: "server_error".into(),
        })) {
            InferenceOutcome::UpstreamError { detail } => {
                assert_eq!(detail, "status 500: server_error")
            }
            other => panic!("expected UpstreamError, got {other:?}"),
        }
        assert!(matches!(
            classify(Err(AiError::Network("connection reset".into()))),
            InferenceOutcome::UpstreamError { .. }
        ));
        assert!(matches!(
            classify(Err(AiError::Parse("expected value".into()))),
            InferenceOutcome::UpstreamError { .. }
        ));
    }

    #[test]
    fn test_blocks_map_to_content_parts() {
        let prompt = assemble(Some("https://x.test"), None, Some("data:image/png;base64,AA"), None);
        let parts: Vec<ContentPart> = prompt.blocks().iter().map(to_content_part).collect();
        assert_eq!(
            parts,
            vec![
                ContentPart::text("page_url: https://x.test"),
                ContentPart::image("data:image/png;base64,AA"),
            ]
        );
    }

    #[tokio::test]
    async fn test_invoker_without_key_is_auth_failure() {
        let invoker = OpenAiInvoker::new(
            OpenAi::new("", "gpt-4.1-mini").with_base_url("http://127.0.0.1:1"),
        );
        let prompt = assemble(None, Some("listing text"), None, None);
        assert_eq!(invoker.invoke(&prompt).await, InferenceOutcome::AuthFailure);
    }
}
