use chrono::NaiveDate;

use touchline_api::models::fixture::MatchRecord;
use touchline_api::models::intent::{QueryIntent, QueryPurpose};
use touchline_api::services::filter_builder::FetchOutcome;
use touchline_api::services::formatter::{format_context, MAX_TABLE_ROWS};

fn record(id: u32, status: Option<&str>) -> MatchRecord {
    MatchRecord {
        match_id: id.to_string(),
        home: "Flamengo".to_string(),
        away: "Corinthians".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 8, 12).unwrap(),
        time: "19:00".to_string(),
        league: "BRA".to_string(),
        country: Some("Brazil".to_string()),
        status: status.map(String::from),
        ph: Some(1.95),
        pd: Some(3.60),
        pa: Some(3.80),
        elo_home: Some(88.75),
        elo_away: Some(75.20),
        xg_home: Some(1.68),
        xg_away: Some(1.12),
        score_home: Some(1.9),
        score_away: Some(1.1),
        ft_home: None,
        ft_away: None,
    }
}

fn live_outcome(matches: Vec<MatchRecord>) -> FetchOutcome {
    FetchOutcome {
        matches,
        degraded: false,
    }
}

#[test]
fn zero_records_produce_a_short_honest_context() {
    let ctx = format_context(&live_outcome(vec![]), &QueryIntent::default());
    assert!(ctx.instructions.len() < 200);
    assert_eq!(ctx.match_count, 0);
    // Nothing that looks like a fabricated fixture
    assert!(!ctx.instructions.contains("Flamengo"));
    assert!(ctx.table.is_empty());
}

#[test]
fn degraded_source_is_disclosed_not_hidden() {
    let ctx = format_context(&FetchOutcome::degraded(), &QueryIntent::default());
    assert!(ctx.instructions.contains("unreachable"));
    assert_eq!(ctx.match_count, 0);
}

#[test]
fn prompt_table_is_bounded() {
    let matches: Vec<MatchRecord> = (0..100).map(|i| record(i, None)).collect();
    let ctx = format_context(&live_outcome(matches), &QueryIntent::default());

    let rendered_rows = ctx
        .table
        .lines()
        .filter(|line| line.contains("Flamengo vs Corinthians"))
        .count();
    assert_eq!(rendered_rows, MAX_TABLE_ROWS);
    assert!(ctx.table.contains("100 matches found"));
}

#[test]
fn instruction_block_reflects_the_purpose_tag() {
    let matches = vec![record(1, Some("NS")), record(2, Some("LIVE"))];

    let odds = QueryIntent {
        purpose: QueryPurpose::Odds,
        ..QueryIntent::default()
    };
    let ctx = format_context(&live_outcome(matches.clone()), &odds);
    assert!(ctx.instructions.contains("odds"));
    assert!(ctx.instructions.contains("(1 not started, 1 live)"));

    let score = QueryIntent {
        purpose: QueryPurpose::Score,
        ..QueryIntent::default()
    };
    let ctx = format_context(&live_outcome(matches), &score);
    assert!(ctx.instructions.contains("final scores"));
}
