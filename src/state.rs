use std::sync::Arc;

use sqlx::MySqlPool;

use crate::services::chat_log::{ChatLogStore, InMemoryChatLog, SessionStore};
use crate::services::claude::ClaudeService;

#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
    pub claude: Option<Arc<ClaudeService>>,
    pub chat_log: Arc<dyn ChatLogStore>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(pool: MySqlPool) -> Self {
        AppState {
            pool,
            claude: None,
            chat_log: Arc::new(InMemoryChatLog::default()),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    pub fn with_claude(mut self, claude: Arc<ClaudeService>) -> Self {
        self.claude = Some(claude);
        self
    }
}
