pub mod coerce;
pub mod error;
pub mod inference;
pub mod orchestrator;
pub mod page_text;
pub mod parse;
pub mod prompt;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use coerce::coerce;
pub use error::VerifyError;
pub use inference::{InferenceOutcome, OpenAiInvoker};
pub use orchestrator::VerifyOrchestrator;
pub use page_text::{HttpPageFetcher, PageText, PageTextExtractor};
pub use parse::parse_model_json;
pub use prompt::{assemble, PromptBlock, PromptInput};
pub use traits::{Inference, PageFetcher};
