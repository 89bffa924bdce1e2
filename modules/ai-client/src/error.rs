use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiError>;

const MAX_DETAIL_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl AiError {
    /// Classify a non-success provider response by status code.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body);
        match status {
            401 | 403 => AiError::Unauthorized(message),
            429 => AiError::RateLimited(message),
            _ => AiError::Api { status, message },
        }
    }
}

/// Pull `error.message` out of a provider error body, falling back to a
/// clipped copy of the raw body.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(|m| m.as_str())
        .unwrap_or(body)
        .trim();
    crate::util::truncate_chars(message, MAX_DETAIL_CHARS).to_string()
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        AiError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_and_403_are_unauthorized() {
        assert!(matches!(AiError::from_status(401, ""), AiError::Unauthorized(_)));
        assert!(matches!(AiError::from_status(403, ""), AiError::Unauthorized(_)));
    }

    #[test]
    fn test_429_is_rate_limited() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#;
        match AiError::from_status(429, body) {
            AiError::RateLimited(msg) => assert_eq!(msg, "You exceeded your current quota"),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_other_status_keeps_code() {
        match AiError::from_status(500, "boom") {
            AiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn test_long_body_is_clipped() {
        let body = "x".repeat(5_000);
        match AiError::from_status(502, &body) {
            AiError::Api { message, .. } => assert_eq!(message.chars().count(), MAX_DETAIL_CHARS),
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
