//! Request pipeline: parse -> filter -> fetch -> format -> generate.
//!
//! Two early exits skip the data fetch: the widget initialization handshake
//! gets a fixed welcome, and short small talk goes straight to a lightweight
//! generation call. Both failure edges (storage, text generation) degrade to
//! canned text inside the pipeline - this function cannot fail.

use chrono::Local;

use crate::models::intent::QueryIntent;
use crate::services::claude::{self, ANALYSIS_MAX_TOKENS, CONVERSATIONAL_MAX_TOKENS};
use crate::services::filter_builder::{build_filter, fetch_matches};
use crate::services::formatter::format_context;
use crate::services::intent_parser;
use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "🎯 Welcome to the Touchline Betting Assistant!\n\n\
I can help you with:\n\
🏈 Match analysis - detailed insights on upcoming fixtures\n\
🎲 Accumulator building - smart multi-bet recommendations\n\
⭐ High confidence bets - best value opportunities\n\
📊 Odds analysis - where the market looks wrong\n\n\
Try \"Show me matches today\" or \"Build an accumulator for the weekend\".";

pub const ANALYST_SYSTEM_PROMPT: &str = "You are an expert football betting analyst. You are \
given a table of real fixtures with bookmaker odds, ELO ratings, xG estimates and model \
score predictions, plus instructions on which angle to take. Use only the data provided. \
Be conversational, insightful, and focus on actionable advice.";

const CONVERSATIONAL_SYSTEM_PROMPT: &str = "You are a friendly football betting assistant. \
Respond conversationally: suggest matches to look at, explain betting concepts, or ask \
what the user wants to bet on. Keep it short.";

const SMALL_TALK: &[&str] = &[
    "hi", "hello", "hey", "yo", "thanks", "thank you", "good morning", "good evening",
    "how are you", "who are you", "what can you do",
];

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: String,
    pub match_count: i64,
    pub intent: QueryIntent,
}

pub async fn handle_chat(state: &AppState, message: &str, context: Option<&str>) -> ChatOutcome {
    // Widget handshake: fixed welcome, no parsing, no data fetch
    if context == Some("initialization") {
        return ChatOutcome {
            response: WELCOME_MESSAGE.to_string(),
            match_count: 0,
            intent: QueryIntent::default(),
        };
    }

    if is_small_talk(message) {
        let response = generate_or_fallback(
            state,
            CONVERSATIONAL_SYSTEM_PROMPT,
            message,
            CONVERSATIONAL_MAX_TOKENS,
            claude::FALLBACK_GENERAL,
        )
        .await;
        return ChatOutcome {
            response,
            match_count: 0,
            intent: QueryIntent::default(),
        };
    }

    let today = Local::now().date_naive();
    let intent = intent_parser::parse_with_today(message, today);
    let filter = build_filter(&intent, today);
    let outcome = fetch_matches(&state.pool, &filter).await;
    let formatted = format_context(&outcome, &intent);

    println!(
        "🔍 Query parsed: {} matches (degraded: {})",
        formatted.match_count, outcome.degraded
    );

    let user_prompt = format!(
        "{}\n\nUser Query: \"{}\"\n\nAnswer the user's query using the data and \
instructions above.",
        formatted.as_prompt_block(),
        message
    );

    let response = generate_or_fallback(
        state,
        ANALYST_SYSTEM_PROMPT,
        &user_prompt,
        ANALYSIS_MAX_TOKENS,
        claude::FALLBACK_ANALYSIS,
    )
    .await;

    ChatOutcome {
        response,
        match_count: formatted.match_count as i64,
        intent,
    }
}

async fn generate_or_fallback(
    state: &AppState,
    system: &str,
    user: &str,
    max_tokens: u32,
    fallback: &str,
) -> String {
    let Some(claude) = state.claude.as_ref() else {
        return fallback.to_string();
    };

    match claude.generate(system, user, max_tokens).await {
        Ok(text) => text,
        Err(err) => {
            eprintln!("❌ Text generation failed: {}", err);
            fallback.to_string()
        }
    }
}

fn is_small_talk(message: &str) -> bool {
    let trimmed = message.trim().to_lowercase();
    if trimmed.len() > 40 {
        return false;
    }
    let stripped: String = trimmed
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    SMALL_TALK
        .iter()
        .any(|phrase| stripped == *phrase || stripped.starts_with(&format!("{} ", phrase)))
}

/// Prompt pair for the single-match analysis endpoint.
pub fn single_match_prompt(record: &crate::models::fixture::MatchRecord) -> String {
    format!(
        "Match ID {}: {} ({})\n\
- Date: {} {}\n\
- ELO: {} vs {}\n\
- xG: {} vs {}\n\
- Odds: Home {}, Draw {}, Away {}\n\
- Score predictions: {} vs {}\n\n\
Provide statistical analysis, value betting opportunities, risk assessment \
and a specific recommendation with reasoning.",
        record.match_id,
        record.matchup(),
        record.league,
        record.date,
        record.time,
        fmt_opt(record.elo_home),
        fmt_opt(record.elo_away),
        fmt_opt(record.xg_home),
        fmt_opt(record.xg_away),
        fmt_opt(record.ph),
        fmt_opt(record.pd),
        fmt_opt(record.pa),
        fmt_opt(record.score_home),
        fmt_opt(record.score_away),
    )
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_are_small_talk() {
        assert!(is_small_talk("hi"));
        assert!(is_small_talk("Hello!"));
        assert!(is_small_talk("hey there"));
        assert!(is_small_talk("thanks a lot"));
    }

    #[test]
    fn data_queries_are_not_small_talk() {
        assert!(!is_small_talk("Show me matches today"));
        assert!(!is_small_talk("hi confidence picks for the bundesliga this weekend please"));
        assert!(!is_small_talk("what are the odds for Arsenal"));
    }
}
