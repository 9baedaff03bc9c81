use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::chat::{ApiResponse, ChatLogEntry, ChatRequest, ChatResponse, LogsQuery};
use crate::services::orchestrator;
use crate::state::AppState;

const RESPONSE_PREVIEW_CHARS: usize = 120;

// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = payload.message.trim();

    // Boundary validation: the core never sees an empty message
    if message.is_empty() {
        return Err(AppError::invalid_data("Message is required"));
    }

    let source = detect_source(&headers, payload.context.as_deref());
    println!("📨 Chat request from {}: \"{}\"", source, message);

    if let Some(user_id) = payload.user_id.as_deref() {
        let session = state.sessions.touch(user_id);
        println!("👤 Session {}: {} messages", user_id, session.message_count);
    }

    let outcome = orchestrator::handle_chat(&state, message, payload.context.as_deref()).await;

    state.chat_log.record(ChatLogEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        source: source.clone(),
        message: message.to_string(),
        response_preview: preview(&outcome.response),
        match_count: outcome.match_count,
        success: true,
    });

    println!("✅ Chat response sent ({} matches)", outcome.match_count);

    Ok(Json(ChatResponse {
        success: true,
        response: outcome.response,
        match_count: outcome.match_count,
        query_info: outcome.intent,
        source,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

// GET /api/chat-logs?limit=N
pub async fn chat_logs(
    State(state): State<AppState>,
    Query(params): Query<LogsQuery>,
) -> Json<ApiResponse<serde_json::Value>> {
    let limit = params.limit.unwrap_or(20).min(100);
    let entries = state.chat_log.recent(limit);
    let count = entries.len();

    Json(ApiResponse::success(serde_json::json!({
        "logs": entries,
        "count": count,
    })))
}

// Widget source, from the explicit header first, then the context field
fn detect_source(headers: &HeaderMap, context: Option<&str>) -> String {
    if let Some(source) = headers
        .get("x-widget-source")
        .and_then(|value| value.to_str().ok())
    {
        return source.to_string();
    }
    match context {
        Some(ctx) if !ctx.is_empty() => ctx.to_string(),
        _ => "direct_api".to_string(),
    }
}

fn preview(response: &str) -> String {
    if response.chars().count() > RESPONSE_PREVIEW_CHARS {
        let truncated: String = response.chars().take(RESPONSE_PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    } else {
        response.to_string()
    }
}
