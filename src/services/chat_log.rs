// services/chat_log.rs
//
// Request history and session counters live behind injected stores instead of
// process globals. Only in-memory implementations ship; both are lost on
// restart and are display-only, never authoritative.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::Utc;

use crate::models::chat::{ChatLogEntry, Session};

pub const DEFAULT_LOG_CAPACITY: usize = 200;

pub trait ChatLogStore: Send + Sync {
    fn record(&self, entry: ChatLogEntry);
    fn recent(&self, limit: usize) -> Vec<ChatLogEntry>;
}

pub struct InMemoryChatLog {
    capacity: usize,
    entries: Mutex<VecDeque<ChatLogEntry>>,
}

impl InMemoryChatLog {
    pub fn new(capacity: usize) -> Self {
        InMemoryChatLog {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }
}

impl Default for InMemoryChatLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl ChatLogStore for InMemoryChatLog {
    fn record(&self, entry: ChatLogEntry) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    // Newest first
    fn recent(&self, limit: usize) -> Vec<ChatLogEntry> {
        let entries = self.entries.lock().unwrap();
        entries.iter().rev().take(limit).cloned().collect()
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps the message counter for the conversation, creating it on first use.
    pub fn touch(&self, user_id: &str) -> Session {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.entry(user_id.to_string()).or_insert_with(|| Session {
            user_id: user_id.to_string(),
            started_at: Utc::now(),
            message_count: 0,
        });
        session.message_count += 1;
        session.clone()
    }

    pub fn get(&self, user_id: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> ChatLogEntry {
        ChatLogEntry {
            id: id.to_string(),
            timestamp: Utc::now(),
            source: "test".to_string(),
            message: "hello".to_string(),
            response_preview: "hi".to_string(),
            match_count: 0,
            success: true,
        }
    }

    #[test]
    fn ring_never_exceeds_capacity() {
        let log = InMemoryChatLog::new(3);
        for i in 0..10 {
            log.record(entry(&i.to_string()));
        }
        let recent = log.recent(10);
        assert_eq!(recent.len(), 3);
        // Newest first, oldest evicted
        assert_eq!(recent[0].id, "9");
        assert_eq!(recent[2].id, "7");
    }

    #[test]
    fn session_counter_increments() {
        let store = SessionStore::new();
        store.touch("42");
        store.touch("42");
        let session = store.touch("42");
        assert_eq!(session.message_count, 3);
        assert!(store.get("unknown").is_none());
    }
}
