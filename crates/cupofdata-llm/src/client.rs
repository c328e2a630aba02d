//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use cupofdata_core::{DrinkStat, Segment};
use cupofdata_extract::{
    Capability, ClassifierError, EntityExtractor, OpinionClassifier, ProseSummarizer,
    RelevanceClassifier, Segmenter,
};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::LlmConfig;
use crate::decode;
use crate::error::LlmError;
use crate::prompt;

/// Error bodies longer than this are cut before they reach logs.
const ERROR_BODY_CHARS: usize = 200;

/// Per-request knobs.
#[derive(Debug, Clone, Copy)]
struct Request {
    json_object: bool,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl Request {
    const fn classify() -> Self {
        Self {
            json_object: false,
            temperature: 0.0,
            max_tokens: Some(3),
        }
    }

    const fn structured() -> Self {
        Self {
            json_object: true,
            temperature: 0.0,
            max_tokens: None,
        }
    }
}

/// Classifier backed by a chat completions endpoint.
///
/// One instance serves every capability trait; each trait method is a single
/// request whose reply is decoded strictly.
pub struct OpenAiClassifier {
    http: Client,
    config: LlmConfig,
}

impl OpenAiClassifier {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: String, request: Request) -> Result<String, LlmError> {
        let mut body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": request.temperature,
        });
        if request.json_object {
            body["response_format"] = json!({ "type": "json_object" });
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = Value::from(max_tokens);
        }

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        decode::chat_content(&text)
    }

    async fn ask<T>(
        &self,
        capability: Capability,
        prompt: String,
        request: Request,
        parse: impl FnOnce(&str) -> Result<T, LlmError>,
    ) -> Result<T, ClassifierError> {
        let result = self.complete(prompt, request).await;
        result.and_then(|content| parse(&content)).map_err(|e| {
            tracing::debug!(
                %capability,
                model = %self.config.model,
                error = %e,
                "completion failed"
            );
            e.into_classifier(capability)
        })
    }
}

#[async_trait]
impl EntityExtractor for OpenAiClassifier {
    async fn extract_drinks(&self, text: &str) -> Result<Vec<String>, ClassifierError> {
        self.ask(
            Capability::EntityExtraction,
            prompt::extract_drinks(text),
            Request::structured(),
            decode::decode_drinks,
        )
        .await
    }
}

#[async_trait]
impl RelevanceClassifier for OpenAiClassifier {
    async fn is_relevant(&self, brand: &str, text: &str) -> Result<bool, ClassifierError> {
        self.ask(
            Capability::Relevance,
            prompt::relevance(brand, text),
            Request::classify(),
            decode::decode_yes_no,
        )
        .await
    }
}

#[async_trait]
impl Segmenter for OpenAiClassifier {
    async fn segment(&self, text: &str) -> Result<Vec<Segment>, ClassifierError> {
        self.ask(
            Capability::Segmentation,
            prompt::segment(text),
            Request {
                temperature: 0.1,
                ..Request::structured()
            },
            decode::decode_segments,
        )
        .await
    }
}

#[async_trait]
impl OpinionClassifier for OpenAiClassifier {
    async fn is_opinion(&self, text: &str) -> Result<bool, ClassifierError> {
        self.ask(
            Capability::Opinion,
            prompt::opinion(text),
            Request::classify(),
            decode::decode_true_false,
        )
        .await
    }
}

#[async_trait]
impl ProseSummarizer for OpenAiClassifier {
    async fn summarize(&self, brand: &str, stats: &[DrinkStat]) -> Result<String, ClassifierError> {
        self.ask(
            Capability::Summary,
            prompt::summarize(brand, stats),
            Request {
                json_object: false,
                temperature: 0.7,
                max_tokens: Some(200),
            },
            decode::decode_summary,
        )
        .await
    }
}
