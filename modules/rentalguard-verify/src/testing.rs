//! Scripted collaborators for tests: no network, no API key.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::inference::InferenceOutcome;
use crate::prompt::PromptInput;
use crate::traits::{Inference, PageFetcher};

/// Serves canned HTML or canned failures per URL and records every call.
/// Unregistered URLs fail.
#[derive(Default)]
pub struct MockPageFetcher {
    pages: HashMap<String, std::result::Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn with_failure(mut self, url: &str, reason: &str) -> Self {
        self.pages.insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(reason)) => Err(anyhow!("{reason}")),
            None => Err(anyhow!("no page registered for {url}")),
        }
    }
}

/// Returns the same outcome on every call and records the prompts it saw.
pub struct ScriptedInference {
    outcome: InferenceOutcome,
    prompts: Mutex<Vec<PromptInput>>,
}

impl ScriptedInference {
    pub fn new(outcome: InferenceOutcome) -> Self {
        Self {
            outcome,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(raw_text: &str) -> Self {
        Self::new(InferenceOutcome::Success {
            raw_text: raw_text.to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<PromptInput> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Inference for ScriptedInference {
    async fn invoke(&self, prompt: &PromptInput) -> InferenceOutcome {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.outcome.clone()
    }
}
