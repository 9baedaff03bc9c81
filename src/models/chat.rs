// src/models/chat.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::intent::{QueryIntent, TeamMatchOperator};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub match_count: i64,
    pub query_info: QueryIntent,
    pub source: String,
    pub timestamp: String,
}

// Generic response wrapper for the match endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// One record per answered chat request, kept in a bounded in-memory ring.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub message: String,
    pub response_preview: String,
    pub match_count: i64,
    pub success: bool,
}

// Per-conversation usage counters. Process memory only, lost on restart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub message_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub team: Option<String>,
    pub league: Option<String>,
    pub country: Option<String>,
    pub date: Option<String>,
    pub operator: Option<TeamMatchOperator>,
    #[serde(rename = "includeFinished")]
    pub include_finished: Option<bool>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}
