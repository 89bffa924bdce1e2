use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::Json};
use serde_json::{json, Value};
use tracing::{info, warn};

use rentalguard_common::NewCheck;

use super::{parse_json_body, ApiError};
use crate::AppState;

/// Accepts a JSON number or a string holding a finite number.
fn numeric_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    score.is_finite().then_some(score)
}

fn parse_check(body: &Bytes) -> Result<NewCheck, ApiError> {
    let mut value = parse_json_body(body)?;

    let score = value.get("score").and_then(numeric_score);
    let (Some(score), Some(fields)) = (score, value.as_object_mut()) else {
        warn!(error_kind = "input_validation", "checks: missing or non-numeric score");
        return Err(ApiError::BadRequest("score must be a number".to_string()));
    };

    // Explicit nulls fall back to the column defaults.
    fields.retain(|_, v| !v.is_null());
    fields.insert("score".to_string(), json!(score));

    serde_json::from_value(value).map_err(|e| {
        warn!(error_kind = "input_validation", error = %e, "checks: bad field types");
        ApiError::BadRequest(format!("Invalid check body: {e}"))
    })
}

pub async fn api_checks_new(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let check = parse_check(&body)?;
    let record = state.store.insert(check).await?;

    info!(
        id = %record.id,
        score = record.score,
        risk_level = %record.risk_level,
        "checks: recorded"
    );

    Ok(Json(json!({ "ok": true, "row": record.summary() })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use chrono::DateTime;
    use serde_json::json;
    use uuid::Uuid;

    use rentalguard_common::Verdict;
    use rentalguard_verify::testing::{MockPageFetcher, ScriptedInference};

    use super::*;
    use crate::rest::test_support::{app, app_with_store, send};
    use crate::store::MemoryCheckStore;

    fn idle_app() -> axum::Router {
        app(MockPageFetcher::new(), ScriptedInference::replying("{}"))
    }

    #[test]
    fn test_numeric_score() {
        assert_eq!(numeric_score(&json!(72)), Some(72.0));
        assert_eq!(numeric_score(&json!(33.5)), Some(33.5));
        assert_eq!(numeric_score(&json!(" 81 ")), Some(81.0));
        assert_eq!(numeric_score(&json!("NaN")), None);
        assert_eq!(numeric_score(&json!("high")), None);
        assert_eq!(numeric_score(&json!(true)), None);
        assert_eq!(numeric_score(&Value::Null), None);
    }

    #[test]
    fn test_parse_check_nulls_use_defaults() {
        let body = Bytes::from(json!({"score": "64", "notes": null, "advice": ["Call the agency"]}).to_string());
        let check = parse_check(&body).unwrap();
        assert_eq!(check.score, 64.0);
        assert_eq!(check.notes, "");
        assert_eq!(check.advice, vec!["Call the agency".to_string()]);
    }

    #[tokio::test]
    async fn records_check_and_echoes_row() {
        let store = Arc::new(MemoryCheckStore::new());
        let app = app_with_store(
            MockPageFetcher::new(),
            ScriptedInference::replying("{}"),
            store.clone(),
        );

        let (status, _, body) = send(
            app,
            Method::POST,
            "/api/checks/new",
            &json!({
                "score": 86,
                "red_flags": [{"text": "Deposit before viewing", "severity": "high"}],
                "top_signals": ["Owner abroad"],
                "recommendation": "Walk away."
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        let row = &body["row"];
        assert_eq!(row["score"], 86.0);
        assert_eq!(row["risk_level"], "scam");
        assert!(Uuid::parse_str(row["id"].as_str().unwrap()).is_ok());
        assert!(DateTime::parse_from_rfc3339(row["created_at"].as_str().unwrap()).is_ok());

        let rows = store.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].risk_level, Verdict::Scam);
        assert_eq!(rows[0].red_flags[0].text, "Deposit before viewing");
        assert_eq!(rows[0].recommendation, "Walk away.");
    }

    #[tokio::test]
    async fn non_numeric_score_is_400() {
        for raw in [r#"{"score": "very risky"}"#, r#"{"notes": "no score"}"#, "", "[80]"] {
            let (status, _, body) = send(idle_app(), Method::POST, "/api/checks/new", raw).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {raw}");
            assert_eq!(body, json!({"error": "score must be a number"}));
        }
    }

    #[tokio::test]
    async fn wrong_field_types_are_400() {
        let (status, _, body) = send(
            idle_app(),
            Method::POST,
            "/api/checks/new",
            r#"{"score": 10, "advice": "not a list"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid check body"));
    }

    #[tokio::test]
    async fn oversized_check_is_rejected() {
        let store = Arc::new(MemoryCheckStore::new());
        let app = app_with_store(
            MockPageFetcher::new(),
            ScriptedInference::replying("{}"),
            store.clone(),
        );
        let body = json!({"score": 40, "notes": "x".repeat(200 * 1024)}).to_string();

        let (status, _, _) = send(app, Method::POST, "/api/checks/new", &body).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(store.rows().await.is_empty());
    }

    #[tokio::test]
    async fn get_is_405() {
        let (status, _, body) = send(idle_app(), Method::GET, "/api/checks/new", "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed"}));
    }
}
