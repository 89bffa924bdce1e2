pub mod checks;
pub mod verify;

use std::any::Any;

use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

use rentalguard_common::RentalGuardError;
use rentalguard_verify::VerifyError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Everything a handler can fail with, rendered as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RentalGuardError> for ApiError {
    fn from(err: RentalGuardError) -> Self {
        match err {
            RentalGuardError::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Verify(err) => match err {
                VerifyError::MissingInput => (StatusCode::BAD_REQUEST, err.to_string()),
                VerifyError::InferenceAuth => (
                    StatusCode::BAD_GATEWAY,
                    "AI service is misconfigured (missing or invalid API key).".to_string(),
                ),
                VerifyError::InferenceRateLimited => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI temporarily unavailable (quota/rate limit). Please try again soon."
                        .to_string(),
                ),
                VerifyError::InferenceUpstream(_) => {
                    (StatusCode::BAD_GATEWAY, "Upstream AI error.".to_string())
                }
            },
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            let chain = format!("{err:#}");
            error!(error_kind = "internal", error = %chain, "request failed");
        }
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// --- Shared handlers ---

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "Method not allowed"})),
    )
}

/// Renders a caught handler panic as a generic 500 JSON body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(error_kind = "panic", detail = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

/// Lenient JSON body: blank is `{}`, anything unparsable is a 400.
pub fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!(error_kind = "input_validation", error = %e, "rejected malformed JSON body");
        ApiError::BadRequest("Invalid JSON body.".to_string())
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, HeaderMap, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use rentalguard_verify::testing::{MockPageFetcher, ScriptedInference};
    use rentalguard_verify::VerifyOrchestrator;

    use crate::store::{CheckStore, MemoryCheckStore};
    use crate::{build_router, AppState};

    pub fn app(fetcher: MockPageFetcher, inference: ScriptedInference) -> Router {
        app_with_store(fetcher, inference, Arc::new(MemoryCheckStore::new()))
    }

    pub fn app_with_store(
        fetcher: MockPageFetcher,
        inference: ScriptedInference,
        store: Arc<dyn CheckStore>,
    ) -> Router {
        build_router(Arc::new(AppState {
            orchestrator: VerifyOrchestrator::new(Arc::new(fetcher), Arc::new(inference)),
            store,
        }))
    }

    /// Sends one request; the body comes back as JSON, or as a JSON string
    /// when it is not JSON, or `Null` when empty.
    pub async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: &str,
    ) -> (StatusCode, HeaderMap, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, headers, json)
    }
}
