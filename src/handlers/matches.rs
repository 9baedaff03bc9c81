use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, Local, NaiveDate, Utc};

use crate::errors::{AppError, Result};
use crate::models::chat::{ApiResponse, SearchQuery};
use crate::models::intent::TeamMatchOperator;
use crate::services::claude::{self, ANALYSIS_MAX_TOKENS};
use crate::services::filter_builder::{
    fetch_match_by_id, fetch_matches, DatePredicate, SearchFilter, MAX_LIMIT,
};
use crate::services::orchestrator::{single_match_prompt, ANALYST_SYSTEM_PROMPT};
use crate::state::AppState;

// GET /api/matches - upcoming fixtures for the next 7 days
pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let today = Local::now().date_naive();
    let filter = SearchFilter {
        team: None,
        league: None,
        country: None,
        date: DatePredicate::Between(today, today + Duration::days(7)),
        include_finished: false,
        limit: 100,
    };

    println!("📅 Querying upcoming matches for next 7 days...");
    let outcome = fetch_matches(&state.pool, &filter).await;

    if outcome.degraded {
        return Err(AppError::ServiceUnavailable(
            "match database is unreachable".to_string(),
        ));
    }

    println!("✅ Found {} upcoming matches", outcome.matches.len());
    let count = outcome.matches.len();

    Ok(Json(ApiResponse::success(serde_json::json!({
        "matches": outcome.matches,
        "count": count,
        "timestamp": Utc::now().to_rfc3339(),
    }))))
}

// GET /api/matches/search?team=&league=&country=&date=&operator=&limit=
pub async fn search_matches(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let today = Local::now().date_naive();

    let filter = SearchFilter {
        team: params
            .team
            .as_ref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| {
                (
                    t.trim().to_string(),
                    params.operator.unwrap_or(TeamMatchOperator::Contains),
                )
            }),
        league: params.league.clone(),
        country: params.country.clone(),
        date: parse_date_param(params.date.as_deref(), today),
        include_finished: params.include_finished.unwrap_or(false),
        limit: params.limit.unwrap_or(50).min(MAX_LIMIT),
    };

    println!("🔍 Flexible search: {:?}", filter);
    let outcome = fetch_matches(&state.pool, &filter).await;

    if outcome.degraded {
        return Err(AppError::ServiceUnavailable(
            "match database is unreachable".to_string(),
        ));
    }

    let count = outcome.matches.len();
    Ok(Json(ApiResponse::success(serde_json::json!({
        "matches": outcome.matches,
        "count": count,
    }))))
}

// GET /api/matches/:match_id/analysis
pub async fn match_analysis(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    println!("🔬 Analysis requested for match {}", match_id);

    let record = fetch_match_by_id(&state.pool, &match_id)
        .await?
        .ok_or_else(|| AppError::MatchNotFound(match_id.clone()))?;

    let analysis = match state.claude.as_ref() {
        Some(service) => service
            .generate(
                ANALYST_SYSTEM_PROMPT,
                &single_match_prompt(&record),
                ANALYSIS_MAX_TOKENS,
            )
            .await
            .unwrap_or_else(|err| {
                eprintln!("❌ Analysis generation failed: {}", err);
                claude::FALLBACK_ANALYSIS.to_string()
            }),
        None => claude::FALLBACK_ANALYSIS.to_string(),
    };

    Ok(Json(ApiResponse::success(serde_json::json!({
        "matchId": record.match_id,
        "analysis": analysis,
    }))))
}

// "today" / "tomorrow" / "upcoming" / explicit YYYY-MM-DD, anything else = upcoming
fn parse_date_param(date: Option<&str>, today: NaiveDate) -> DatePredicate {
    match date {
        Some("today") => DatePredicate::On(today),
        Some("tomorrow") => DatePredicate::On(today + Duration::days(1)),
        Some("upcoming") | None => DatePredicate::From(today),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => DatePredicate::On(date),
            Err(_) => DatePredicate::From(today),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_param_resolves_keywords_and_iso() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 13).unwrap();
        assert_eq!(parse_date_param(Some("today"), today), DatePredicate::On(today));
        assert_eq!(
            parse_date_param(Some("tomorrow"), today),
            DatePredicate::On(today + Duration::days(1))
        );
        assert_eq!(parse_date_param(None, today), DatePredicate::From(today));
        assert_eq!(
            parse_date_param(Some("2025-08-15"), today),
            DatePredicate::On(NaiveDate::from_ymd_opt(2025, 8, 15).unwrap())
        );
        assert_eq!(parse_date_param(Some("garbage"), today), DatePredicate::From(today));
    }
}
