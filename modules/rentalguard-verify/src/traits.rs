// Collaborator seams of the verify pipeline.
//
// PageFetcher is the raw network fetch of a listing page; Inference is the
// LLM call. Both are injected into VerifyOrchestrator so tests can script
// them with MockPageFetcher and ScriptedInference: no network, no API key.

use anyhow::Result;
use async_trait::async_trait;

use crate::inference::InferenceOutcome;
use crate::prompt::PromptInput;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its raw markup.
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait Inference: Send + Sync {
    /// Run the model over the assembled prompt. Failures are classified into
    /// the outcome rather than returned as errors.
    async fn invoke(&self, prompt: &PromptInput) -> InferenceOutcome;
}
