use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{post, MethodRouter},
};
use serde::Deserialize;
use tracing::warn;

use rentalguard_common::{VerifyRequest, VerifyResult};

use super::{method_not_allowed, parse_json_body, ApiError};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyBody {
    url: Option<String>,
    image_data_url: Option<String>,
    meta: Option<VerifyMeta>,
}

#[derive(Debug, Default, Deserialize)]
struct VerifyMeta {
    notes: Option<String>,
}

pub fn route() -> MethodRouter<Arc<AppState>> {
    post(api_verify).fallback(method_not_allowed)
}

fn parse_request(body: &Bytes) -> Result<VerifyRequest, ApiError> {
    let value = parse_json_body(body)?;
    if !value.is_object() {
        warn!(error_kind = "input_validation", "verify: body is not a JSON object");
        return Err(ApiError::BadRequest("Request body must be a JSON object.".to_string()));
    }
    let body: VerifyBody = serde_json::from_value(value).map_err(|e| {
        warn!(error_kind = "input_validation", error = %e, "verify: bad field types");
        ApiError::BadRequest(format!("Invalid request body: {e}"))
    })?;
    Ok(VerifyRequest::new(
        body.url,
        body.image_data_url,
        body.meta.and_then(|m| m.notes),
    ))
}

pub async fn api_verify(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<VerifyResult>, ApiError> {
    let request = parse_request(&body)?;
    let result = state.orchestrator.verify(&request).await?;
    Ok(Json(result))
}
