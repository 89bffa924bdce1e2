use serde::{Deserialize, Serialize};

// =============================================================================
// Input
// =============================================================================

/// One typed block of model input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputText { text: String },
    InputImage { image_url: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::InputText { text: text.into() }
    }

    pub fn image(image_url: impl Into<String>) -> Self {
        ContentPart::InputImage {
            image_url: image_url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct InputMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl InputMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![ContentPart::text(text)],
        }
    }

    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}

/// Sampling knobs applied to a single call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SamplingOptions {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

// =============================================================================
// Responses Request
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: Vec::new(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn message(mut self, message: InputMessage) -> Self {
        self.input.push(message);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

// =============================================================================
// Responses Response
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ResponsesResponse {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub content: Vec<OutputContent>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OutputItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OutputContent {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl ResponsesResponse {
    /// The primary text payload: `output_text`, else the first text of the
    /// first `message` output item, else the first top-level content text.
    /// Empty when none of those carry text.
    pub fn primary_text(&self) -> String {
        let non_empty = |t: &Option<String>| {
            t.as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        non_empty(&self.output_text)
            .or_else(|| {
                self.output
                    .iter()
                    .find(|item| item.item_type == "message")
                    .and_then(|item| item.content.iter().find_map(|c| non_empty(&c.text)))
            })
            .or_else(|| self.content.first().and_then(|c| non_empty(&c.text)))
            .unwrap_or_default()
    }
}

// =============================================================================
// Utilities
// =============================================================================

/// Reasoning models reject a sampling temperature.
pub(crate) fn supports_temperature(model: &str) -> bool {
    !(model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
        || model.starts_with("gpt-5"))
}
