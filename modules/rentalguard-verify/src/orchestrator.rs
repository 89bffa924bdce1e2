use std::sync::Arc;

use rentalguard_common::{Verdict, VerifyRequest, VerifyResult};
use tracing::{debug, error, info, warn};

use crate::coerce::coerce;
use crate::error::VerifyError;
use crate::inference::InferenceOutcome;
use crate::page_text::{PageText, PageTextExtractor};
use crate::parse::parse_model_json;
use crate::prompt::assemble;
use crate::traits::{Inference, PageFetcher};

const FAST_PATH_SCORE: u8 = 50;

const FAST_PATH_SIGNALS: [&str; 3] = [
    "The listing page could not be read; it may be login-gated or block automated access.",
    "No listing text or screenshot was available to analyze.",
    "Without content, scam signals can be neither confirmed nor ruled out.",
];

const FAST_PATH_ADVICE: [&str; 3] = [
    "Upload a screenshot of the listing so it can be analyzed.",
    "Ask for a live video tour or view the property in person before committing.",
    "Never pay a deposit, fee, or rent upfront before viewing and signing a lease.",
];

const FAST_PATH_NOTES: &str = "Listing content was unavailable for analysis.";
const FAST_PATH_EXPLANATION: &str =
    "We couldn't access the listing content. Upload a screenshot of the listing for a full scam check.";
const FAST_PATH_RECOMMENDATION: &str =
    "Upload a screenshot of the listing and verify the landlord before sending any money.";

/// Canned answer for requests with nothing the model could analyze.
pub fn fast_path_result(failure: Option<&str>) -> VerifyResult {
    let notes = match failure {
        Some(reason) => format!("Could not read the listing page: {reason}"),
        None => FAST_PATH_NOTES.to_string(),
    };
    VerifyResult {
        score: FAST_PATH_SCORE,
        verdict: Verdict::Uncertain.to_string(),
        top_signals: FAST_PATH_SIGNALS.iter().map(|s| s.to_string()).collect(),
        advice: FAST_PATH_ADVICE.iter().map(|s| s.to_string()).collect(),
        notes,
        explanation: FAST_PATH_EXPLANATION.to_string(),
        red_flags: Vec::new(),
        recommendation: FAST_PATH_RECOMMENDATION.to_string(),
    }
}

/// Runs one verification: validate, extract page text, short-circuit when
/// there is nothing to analyze, otherwise assemble, invoke, parse, coerce.
pub struct VerifyOrchestrator {
    extractor: PageTextExtractor,
    inference: Arc<dyn Inference>,
}

impl VerifyOrchestrator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, inference: Arc<dyn Inference>) -> Self {
        Self {
            extractor: PageTextExtractor::new(fetcher),
            inference,
        }
    }

    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResult, VerifyError> {
        if !request.has_input() {
            let err = VerifyError::MissingInput;
            warn!(error_kind = err.kind(), "verify: rejected request without url or image");
            return Err(err);
        }

        let page = match request.url.as_deref() {
            Some(url) => self.extractor.extract(url).await,
            None => PageText::default(),
        };

        if page.text.is_empty() && request.image_data.is_none() {
            info!(
                has_url = request.url.is_some(),
                fetch_failed = page.failure.is_some(),
                "verify: no analyzable content, returning fast-path result"
            );
            return Ok(fast_path_result(page.failure.as_deref()));
        }

        let prompt = assemble(
            request.url.as_deref(),
            Some(page.text.as_str()),
            request.image_data.as_deref(),
            request.notes.as_deref(),
        );

        let raw_text = match self.inference.invoke(&prompt).await {
            InferenceOutcome::Success { raw_text } => raw_text,
            InferenceOutcome::AuthFailure => {
                let err = VerifyError::InferenceAuth;
                error!(error_kind = err.kind(), "verify: AI credential missing or rejected");
                return Err(err);
            }
            InferenceOutcome::RateLimited => {
                let err = VerifyError::InferenceRateLimited;
                warn!(error_kind = err.kind(), "verify: AI rate limited");
                return Err(err);
            }
            InferenceOutcome::UpstreamError { detail } => {
                let err = VerifyError::InferenceUpstream(detail);
                error!(error_kind = err.kind(), error = %err, "verify: AI upstream error");
                return Err(err);
            }
        };

        let parsed = parse_model_json(&raw_text);
        if parsed.is_none() {
            warn!(
                error_kind = "model_output_unparsable",
                chars = raw_text.chars().count(),
                "verify: model reply was not JSON, using fallback"
            );
            debug!(raw = %raw_text, "verify: raw model output");
        }

        let result = coerce(parsed.as_ref());
        info!(score = result.score, verdict = %result.verdict, "verify: complete");
        Ok(result)
    }
}
