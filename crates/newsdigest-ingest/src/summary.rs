//! Topic summarizers.
//!
//! [`LeadSummarizer`] works offline from the cleaned content itself.
//! [`ChatSummarizer`] calls an OpenAI-compatible chat-completions endpoint.
//! Either way the result gets [`polish_summary`].

use std::future::Future;
use std::time::Duration;

use newsdigest_core::AppConfig;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::IngestError;
use crate::normalize::{polish_summary, Normalizer};

const MAX_PROMPT_CHARS: usize = 12_000;

const SYSTEM_PROMPT: &str = "You summarise weekly chemical-industry news for an executive \
digest. Write one short factual paragraph. Do not invent facts.";

/// Turns a topic's concatenated clean content into a short paragraph.
pub trait Summarizer: Send + Sync {
    fn summarize(
        &self,
        topic: &str,
        text: &str,
    ) -> impl Future<Output = Result<String, IngestError>> + Send;
}

/// Offline summary: the lead of the concatenated content, cut at the
/// normalizer's truncation window.
#[derive(Debug, Clone)]
pub struct LeadSummarizer {
    normalizer: Normalizer,
}

impl LeadSummarizer {
    #[must_use]
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Synchronous form of [`Summarizer::summarize`]; never fails.
    #[must_use]
    pub fn lead(&self, text: &str) -> String {
        polish_summary(&self.normalizer.clean(text))
    }
}

impl Summarizer for LeadSummarizer {
    async fn summarize(&self, _topic: &str, text: &str) -> Result<String, IngestError> {
        Ok(self.lead(text))
    }
}

/// OpenAI-compatible chat-completions client.
pub struct ChatSummarizer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for ChatSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSummarizer")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatSummarizer {
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

impl Summarizer for ChatSummarizer {
    async fn summarize(&self, topic: &str, text: &str) -> Result<String, IngestError> {
        let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Summarise this week's news about {topic} in at most four sentences.\n\n{excerpt}"
                    )
                }
            ],
            "temperature": 0.2
        });

        let url = self.completions_url();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let payload: Value = response.json().await?;
        let content = payload
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| IngestError::Summarizer("response has no message content".to_string()))?;

        let polished = polish_summary(content);
        if polished.is_empty() {
            return Err(IngestError::Summarizer(
                "model returned an empty summary".to_string(),
            ));
        }
        Ok(polished)
    }
}

/// Summarizer chosen at startup from configuration.
#[derive(Debug)]
pub enum DigestSummarizer {
    Lead(LeadSummarizer),
    Chat(ChatSummarizer),
}

impl DigestSummarizer {
    /// Chat when `OPENAI_API_KEY` is configured, lead otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the chat client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, IngestError> {
        match config.openai_api_key.as_deref() {
            Some(key) => Ok(Self::Chat(ChatSummarizer::new(
                &config.openai_base_url,
                key,
                &config.summary_model,
                config.listing_timeout_secs,
                &config.user_agent,
            )?)),
            None => Ok(Self::Lead(LeadSummarizer::new(Normalizer::from_config(
                config,
            )))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lead(_) => "lead",
            Self::Chat(_) => "chat",
        }
    }
}

impl Summarizer for DigestSummarizer {
    async fn summarize(&self, topic: &str, text: &str) -> Result<String, IngestError> {
        match self {
            Self::Lead(inner) => inner.summarize(topic, text).await,
            Self::Chat(inner) => inner.summarize(topic, text).await,
        }
    }
}
