use serde_json::Value;

/// Recover a JSON value from a model reply.
///
/// Tries the whole reply first, then the widest `{...}` span (first `{` to
/// last `}`), which covers replies wrapped in prose or code fences. Returns
/// `None` when neither parses; never panics.
pub fn parse_model_json(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}
