// services/claude.rs
//
// Thin client for the Anthropic Messages API. The call is the dominant
// latency source of the whole pipeline, so it carries the only timeout.
// Any failure here degrades to a fixed fallback string - a provider error
// must never reach the end user.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::errors::AppError;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ANALYSIS_MAX_TOKENS: u32 = 1000;
pub const CONVERSATIONAL_MAX_TOKENS: u32 = 800;

/// Canned reply when the data-backed analysis call fails.
pub const FALLBACK_ANALYSIS: &str = "I'm your AI betting assistant!\n\n\
I can help you with:\n\
• Match analysis using real ELO ratings and xG data\n\
• Team performance breakdowns\n\
• Value betting opportunities\n\
• Risk assessment and recommendations\n\n\
I couldn't finish that analysis just now - please try again in a moment.";

/// Canned reply when the small-talk call fails.
pub const FALLBACK_GENERAL: &str = "I'm your AI betting assistant!\n\n\
Ask me about today's matches, the odds on a fixture, or say something like \
\"build me an accumulator for the weekend\" and I'll put real data behind it.";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClaudeService {
    client: Client,
    api_key: String,
    model: String,
}

impl ClaudeService {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        ClaudeService {
            client,
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One system/user round trip. Errors are returned so the orchestrator
    /// can substitute the fallback text - callers never surface them raw.
    pub async fn generate(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, AppError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        };

        info!("🤖 Calling Claude API (model: {})", self.model);

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("❌ Claude API returned {}: {}", status, body);
            return Err(AppError::claude(format!("status {}", status)));
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| AppError::claude("empty completion"))?;

        info!("✅ Claude API response received");
        Ok(text)
    }
}
