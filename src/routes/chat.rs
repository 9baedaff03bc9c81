// src/routes/chat.rs
use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::chat;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Main chat endpoint used by the widgets and the Telegram bot
        .route("/chat", post(chat::chat))
        // Recent request history for debugging widget integrations
        .route("/chat-logs", get(chat::chat_logs))
}
