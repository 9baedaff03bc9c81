// Telegram adapter: long-polls the Bot API and forwards everything that is
// not a command to the chat endpoint. Pure I/O marshalling - all parsing,
// data access and text generation stay behind the HTTP API.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

// Telegram hard limit is 4096; keep headroom for formatting
const CHUNK_SIZE: usize = 4000;
const POLL_TIMEOUT_SECS: u64 = 30;

const CONNECTION_ERROR: &str = "🔴 CONNECTION ERROR: Cannot reach the API server. The betting analysis service appears to be offline.";
const SERVER_ERROR: &str = "🔴 API ERROR: The analysis engine encountered a problem. Please try again later.";

const WELCOME: &str = "🎯 Welcome to Touchline Betting Assistant!\n\n\
I'm your AI-powered betting analysis bot. I can help you with:\n\n\
🏈 Match Analysis - detailed insights on upcoming matches\n\
🎲 Accumulator Building - smart multi-bet recommendations\n\
⭐ High Confidence Bets - best value opportunities\n\
📊 Live Odds Analysis - real-time market insights\n\n\
Quick commands:\n\
/help - show all commands\n\
/upcoming - interesting upcoming matches\n\
/accumulator - build a smart accumulator\n\
/confidence - high confidence bets today\n\
/stats - your usage statistics\n\n\
Or just ask me anything about football betting!";

const HELP: &str = "🤖 Touchline Betting Assistant Commands\n\n\
/upcoming - upcoming matches with the best opportunities\n\
/accumulator - build a smart accumulator bet\n\
/confidence - high confidence recommendations\n\
/analyze <team1> vs <team2> - analyze a specific match\n\
/stats - your usage statistics\n\n\
Chat examples:\n\
• \"Show me today's best bets\"\n\
• \"Build an accumulator for Premier League\"\n\
• \"Analyze Manchester United vs Arsenal\"\n\n\
💡 Tip: be specific about leagues, dates or bet types for better recommendations.";

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    from: Option<User>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
    first_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatApiResponse {
    #[serde(default)]
    response: String,
}

struct Session {
    started_at: DateTime<Utc>,
    message_count: u64,
}

struct Bot {
    client: reqwest::Client,
    token: String,
    api_base_url: String,
    sessions: HashMap<i64, Session>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let token = match std::env::var("TELEGRAM_BOT_TOKEN") {
        Ok(token) if !token.is_empty() => token,
        _ => {
            eprintln!("❌ TELEGRAM_BOT_TOKEN not found in environment variables");
            eprintln!("📝 To create a bot:");
            eprintln!("1. Message @BotFather on Telegram");
            eprintln!("2. Use /newbot and follow the instructions");
            eprintln!("3. Add TELEGRAM_BOT_TOKEN=your_token to your .env file");
            std::process::exit(1);
        }
    };

    let api_base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    let mut bot = Bot {
        client: reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()
            .context("failed to build HTTP client")?,
        token,
        api_base_url,
        sessions: HashMap::new(),
    };

    tracing::info!("🤖 Touchline Betting Bot started successfully!");
    tracing::info!("🌐 API Base URL: {}", bot.api_base_url);

    if bot.api_healthy().await {
        tracing::info!("✅ API health check passed");
    } else {
        tracing::warn!("❌ API health check failed - continuing anyway");
    }

    bot.poll_forever().await
}

impl Bot {
    fn telegram_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.token, method)
    }

    async fn api_healthy(&self) -> bool {
        let url = format!("{}/health", self.api_base_url);
        match self.client.get(&url).timeout(Duration::from_secs(5)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn poll_forever(&mut self) -> Result<()> {
        let mut offset: i64 = 0;

        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(err) => {
                    tracing::error!("❌ Polling error: {}", err);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                if let Some(message) = update.message {
                    if let Err(err) = self.handle_message(message).await {
                        tracing::error!("❌ Error handling message: {}", err);
                    }
                }
            }
        }
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let response: UpdatesResponse = self
            .client
            .get(self.telegram_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", POLL_TIMEOUT_SECS.to_string()),
            ])
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            anyhow::bail!("getUpdates returned ok=false");
        }
        Ok(response.result)
    }

    async fn handle_message(&mut self, message: Message) -> Result<()> {
        let chat_id = message.chat.id;
        let Some(text) = message.text else {
            return Ok(());
        };
        let user_id = message.from.as_ref().map(|u| u.id).unwrap_or(chat_id);
        let user_name = message
            .from
            .as_ref()
            .and_then(|u| u.first_name.clone())
            .unwrap_or_else(|| "there".to_string());

        tracing::info!("📨 Message from {} ({}): \"{}\"", user_name, chat_id, text);

        let session = self.sessions.entry(chat_id).or_insert_with(|| Session {
            started_at: Utc::now(),
            message_count: 0,
        });
        session.message_count += 1;

        if let Some(command) = text.strip_prefix('/') {
            return self.handle_command(chat_id, user_id, command).await;
        }

        self.send_chat_action(chat_id).await;
        let reply = self.call_betting_api(&text, user_id).await;
        self.send_chunked(chat_id, &format_telegram_message(&reply)).await
    }

    async fn handle_command(&mut self, chat_id: i64, user_id: i64, command: &str) -> Result<()> {
        let (name, args) = match command.split_once(' ') {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "start" => self.send_chunked(chat_id, WELCOME).await,
            "help" => self.send_chunked(chat_id, HELP).await,
            "stats" => {
                let stats = match self.sessions.get(&chat_id) {
                    Some(session) => {
                        let minutes = (Utc::now() - session.started_at).num_minutes();
                        format!(
                            "📊 Your Session Statistics\n\n\
⏰ Session started: {}\n\
🕐 Session duration: {} minutes\n\
💬 Messages sent: {}",
                            session.started_at.format("%H:%M %d/%m/%Y"),
                            minutes,
                            session.message_count
                        )
                    }
                    None => "📊 No session data found. Send /start to begin!".to_string(),
                };
                self.send_chunked(chat_id, &stats).await
            }
            "upcoming" => {
                self.forward_canned(
                    chat_id,
                    user_id,
                    "🔍 Analyzing upcoming matches... This may take a moment.",
                    "Show me the most interesting upcoming matches for betting",
                )
                .await
            }
            "accumulator" => {
                self.forward_canned(
                    chat_id,
                    user_id,
                    "🎲 Building a smart accumulator... Please wait.",
                    "Help me build an accumulator with 3-4 matches",
                )
                .await
            }
            "confidence" => {
                self.forward_canned(
                    chat_id,
                    user_id,
                    "⭐ Finding high confidence betting opportunities...",
                    "Show me high confidence bets for today",
                )
                .await
            }
            "analyze" => {
                if args.is_empty() {
                    self.send_chunked(chat_id, "Usage: /analyze <team1> vs <team2>").await
                } else {
                    let prompt = format!("Analyze this match: {}", args);
                    self.forward_canned(
                        chat_id,
                        user_id,
                        &format!("🔬 Analyzing \"{}\"... Getting detailed insights.", args),
                        &prompt,
                    )
                    .await
                }
            }
            _ => Ok(()),
        }
    }

    async fn forward_canned(
        &self,
        chat_id: i64,
        user_id: i64,
        ack: &str,
        query: &str,
    ) -> Result<()> {
        self.send_chunked(chat_id, ack).await?;
        self.send_chat_action(chat_id).await;
        let reply = self.call_betting_api(query, user_id).await;
        self.send_chunked(chat_id, &format_telegram_message(&reply)).await
    }

    // Failures map to plain-language error strings, never a stack trace
    async fn call_betting_api(&self, message: &str, user_id: i64) -> String {
        let url = format!("{}/api/chat", self.api_base_url);
        let body = json!({
            "message": message,
            "userId": user_id.to_string(),
            "context": "telegram_bot",
        });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("❌ API call failed: {}", err);
                return CONNECTION_ERROR.to_string();
            }
        };

        if !response.status().is_success() {
            tracing::error!("❌ API returned error status: {}", response.status());
            return SERVER_ERROR.to_string();
        }

        match response.json::<ChatApiResponse>().await {
            Ok(parsed) if !parsed.response.is_empty() => parsed.response,
            _ => SERVER_ERROR.to_string(),
        }
    }

    async fn send_chat_action(&self, chat_id: i64) {
        let _ = self
            .client
            .post(self.telegram_url("sendChatAction"))
            .json(&json!({ "chat_id": chat_id, "action": "typing" }))
            .send()
            .await;
    }

    async fn send_chunked(&self, chat_id: i64, text: &str) -> Result<()> {
        let chunks = chunk_message(text, CHUNK_SIZE);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            self.client
                .post(self.telegram_url("sendMessage"))
                .json(&json!({
                    "chat_id": chat_id,
                    "text": chunk,
                    "parse_mode": "Markdown",
                }))
                .send()
                .await
                .context("sendMessage failed")?;

            if i < last {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
        Ok(())
    }
}

// Decorate odds and percentages the way the bot always has
fn format_telegram_message(text: &str) -> String {
    let mut formatted = text.replace("@ ", "💰 ");
    // Collapse runs of blank lines left over from table rendering
    while formatted.contains("\n\n\n") {
        formatted = formatted.replace("\n\n\n", "\n\n");
    }
    formatted.trim().to_string()
}

fn chunk_message(text: &str, size: usize) -> Vec<String> {
    if text.len() <= size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if current.len() + line.len() + 1 > size && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_are_single_chunk() {
        assert_eq!(chunk_message("hello", 4000), vec!["hello".to_string()]);
    }

    #[test]
    fn long_messages_split_on_line_boundaries() {
        let text = (0..100).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let chunks = chunk_message(&text, 100);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 100));
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn blank_line_runs_are_collapsed() {
        assert_eq!(format_telegram_message("a\n\n\n\nb"), "a\n\nb");
    }
}
