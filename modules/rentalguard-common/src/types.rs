use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Verdict ---

/// Categorical risk label, ordered from safest to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    NoScam,
    LikelyNoScam,
    Uncertain,
    LikelyScam,
    Scam,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::NoScam => "no-scam",
            Verdict::LikelyNoScam => "likely-no-scam",
            Verdict::Uncertain => "uncertain",
            Verdict::LikelyScam => "likely-scam",
            Verdict::Scam => "scam",
        }
    }

    /// Band a 0-100 score using the scoring rubric given to the model.
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 };
        match score {
            s if s < 20.0 => Verdict::NoScam,
            s if s < 40.0 => Verdict::LikelyNoScam,
            s if s < 60.0 => Verdict::Uncertain,
            s if s < 80.0 => Verdict::LikelyScam,
            _ => Verdict::Scam,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Verify ---

/// One inbound verification call. Blank values are normalized to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyRequest {
    pub url: Option<String>,
    pub image_data: Option<String>,
    pub notes: Option<String>,
}

impl VerifyRequest {
    pub fn new(url: Option<String>, image_data: Option<String>, notes: Option<String>) -> Self {
        Self {
            url: url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
            image_data: image_data.filter(|d| !d.trim().is_empty()),
            notes: notes.filter(|n| !n.trim().is_empty()),
        }
    }

    /// At least one of `url` or `image_data` must be present.
    pub fn has_input(&self) -> bool {
        self.url.is_some() || self.image_data.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlag {
    pub text: String,
    pub severity: String,
}

/// The committed output contract of `/verify`. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResult {
    pub score: u8,
    pub verdict: String,
    pub top_signals: Vec<String>,
    pub advice: Vec<String>,
    pub notes: String,
    pub explanation: String,
    pub red_flags: Vec<RedFlag>,
    pub recommendation: String,
}

// --- Checks ---

/// A check submitted for persistence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCheck {
    pub score: f64,
    #[serde(default)]
    pub red_flags: Vec<RedFlag>,
    #[serde(default)]
    pub top_signals: Vec<String>,
    #[serde(default)]
    pub advice: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub score: f64,
    pub risk_level: Verdict,
    pub red_flags: Vec<RedFlag>,
    pub top_signals: Vec<String>,
    pub advice: Vec<String>,
    pub recommendation: String,
    pub notes: String,
}

impl CheckRecord {
    pub fn from_new(check: NewCheck) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            risk_level: Verdict::from_score(check.score),
            score: check.score,
            red_flags: check.red_flags,
            top_signals: check.top_signals,
            advice: check.advice,
            recommendation: check.recommendation,
            notes: check.notes,
        }
    }

    pub fn summary(&self) -> CheckSummary {
        CheckSummary {
            id: self.id,
            created_at: self.created_at,
            score: self.score,
            risk_level: self.risk_level,
        }
    }
}

/// The columns echoed back after a check is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub score: f64,
    pub risk_level: Verdict,
}
