use rentalguard_common::{RedFlag, Verdict, VerifyResult};
use serde_json::{Map, Value};

pub const DEFAULT_NOTES: &str = "Limited information available; proceed cautiously.";
pub const DEFAULT_EXPLANATION: &str =
    "Insufficient or blocked page content. Provided general safety guidance.";
pub const DEFAULT_RECOMMENDATION: &str =
    "Do not send money or documents until you have viewed the property and verified the landlord.";
pub const DEFAULT_SEVERITY: &str = "unknown";

const SIGNAL_SEPARATOR: &str = " • ";

pub const DEFAULT_ADVICE: [&str; 3] = [
    "Request an in-person or live video tour before paying anything.",
    "Never send deposits or ID documents before viewing.",
    "Use secure, traceable payment methods; avoid crypto or wire.",
];

/// Alternate spellings seen in model replies, mapped to canonical keys.
const FIELD_ALIASES: [(&str, &str); 2] = [("topSignals", "top_signals"), ("redFlags", "red_flags")];
const VERDICT_ALIASES: [&str; 2] = ["risk_level", "riskLevel"];

/// The answer given when the model reply could not be used at all.
pub fn fallback_result() -> VerifyResult {
    VerifyResult {
        score: 0,
        verdict: Verdict::Uncertain.to_string(),
        top_signals: Vec::new(),
        advice: default_advice(),
        notes: DEFAULT_NOTES.to_string(),
        explanation: DEFAULT_EXPLANATION.to_string(),
        red_flags: Vec::new(),
        recommendation: DEFAULT_RECOMMENDATION.to_string(),
    }
}

fn default_advice() -> Vec<String> {
    DEFAULT_ADVICE.iter().map(|s| s.to_string()).collect()
}

/// Force an untrusted model value into a complete `VerifyResult`.
///
/// Anything that is not a JSON object yields [`fallback_result`]. For an
/// object, each field is taken when it has a usable shape and defaulted
/// otherwise, so no input can produce a missing or mistyped field.
pub fn coerce(raw: Option<&Value>) -> VerifyResult {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return fallback_result();
    };
    let obj = normalize(obj);

    let top_signals = string_list(obj.get("top_signals")).unwrap_or_default();
    let explanation = text_or(obj.get("explanation"), || {
        if top_signals.is_empty() {
            DEFAULT_EXPLANATION.to_string()
        } else {
            top_signals.join(SIGNAL_SEPARATOR)
        }
    });

    VerifyResult {
        score: score(obj.get("score")),
        verdict: text_or(obj.get("verdict"), || Verdict::Uncertain.to_string()),
        advice: string_list(obj.get("advice")).unwrap_or_else(default_advice),
        notes: text_or(obj.get("notes"), || DEFAULT_NOTES.to_string()),
        explanation,
        red_flags: red_flags(obj.get("red_flags")),
        recommendation: text_or(obj.get("recommendation"), || DEFAULT_RECOMMENDATION.to_string()),
        top_signals,
    }
}

/// Fold alias keys into canonical ones. Canonical keys win when both exist.
fn normalize(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut map = obj.clone();

    for (alias, canonical) in FIELD_ALIASES {
        if !map.contains_key(canonical) {
            if let Some(value) = obj.get(alias) {
                map.insert(canonical.to_string(), value.clone());
            }
        }
    }

    if non_blank(map.get("verdict")).is_none() {
        let alias = VERDICT_ALIASES
            .iter()
            .find_map(|key| non_blank(obj.get(*key)));
        if let Some(verdict) = alias {
            map.insert("verdict".to_string(), Value::String(verdict.to_string()));
        }
    }

    map
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn text_or(value: Option<&Value>, default: impl FnOnce() -> String) -> String {
    non_blank(value).map(str::to_string).unwrap_or_else(default)
}

/// Numbers and numeric strings, clamped to 0-100 and rounded. Anything
/// non-finite or non-numeric is 0.
fn score(value: Option<&Value>) -> u8 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(v) if v.is_finite() => v.clamp(0.0, 100.0).round() as u8,
        _ => 0,
    }
}

/// Render one array element as text. `None` for null and blank entries.
fn stringify(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// `None` when the value is not an array.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(items.iter().filter_map(stringify).collect())
}

fn red_flags(value: Option<&Value>) -> Vec<RedFlag> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items.iter().filter_map(red_flag).collect()
}

fn red_flag(value: &Value) -> Option<RedFlag> {
    match value {
        Value::Object(obj) => Some(RedFlag {
            text: stringify(obj.get("text")?)?,
            severity: non_blank(obj.get("severity"))
                .unwrap_or(DEFAULT_SEVERITY)
                .to_string(),
        }),
        other => Some(RedFlag {
            text: stringify(other)?,
            severity: DEFAULT_SEVERITY.to_string(),
        }),
    }
}
