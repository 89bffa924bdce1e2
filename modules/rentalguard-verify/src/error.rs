use thiserror::Error;

/// Terminal failures of a verification. Extraction trouble and unparsable
/// model output are absorbed by the pipeline and never show up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Provide 'url' or 'imageDataUrl' in JSON body.")]
    MissingInput,

    #[error("AI service credential missing or rejected")]
    InferenceAuth,

    #[error("AI service rate limited")]
    InferenceRateLimited,

    #[error("AI service error: {0}")]
    InferenceUpstream(String),
}

impl VerifyError {
    /// Stable label carried on log events.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::MissingInput => "input_validation",
            VerifyError::InferenceAuth => "inference_auth",
            VerifyError::InferenceRateLimited => "inference_rate_limited",
            VerifyError::InferenceUpstream(_) => "inference_upstream",
        }
    }
}
