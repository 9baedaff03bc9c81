use chrono::NaiveDate;

use touchline_api::models::intent::{DateContext, QueryIntent, QueryPurpose, TeamMatchOperator};
use touchline_api::services::intent_parser::parse_with_today;

fn wednesday() -> NaiveDate {
    // 2025-08-13 was a Wednesday
    NaiveDate::from_ymd_opt(2025, 8, 13).unwrap()
}

#[test]
fn show_me_matches_today() {
    let intent = parse_with_today("Show me matches today", wednesday());
    assert_eq!(intent.date_context, DateContext::Today);
    assert_eq!(intent.team, None);
    assert!(!intent.include_finished);
}

#[test]
fn bundesliga_fixtures_resolve_to_d1() {
    let intent = parse_with_today("Bundesliga fixtures", wednesday());
    assert_eq!(intent.league.as_deref(), Some("D1"));
}

#[test]
fn league_codes_follow_football_data_convention() {
    let cases = [
        ("premier league games", "E0"),
        ("la liga tonight", "SP1"),
        ("serie a odds", "I1"),
        ("ligue 1 this week", "F1"),
    ];
    for (text, code) in cases {
        let intent = parse_with_today(text, wednesday());
        assert_eq!(intent.league.as_deref(), Some(code), "for input {:?}", text);
    }
}

#[test]
fn parser_never_fails_on_arbitrary_input() {
    let inputs = [
        "",
        "    ",
        "💥💥💥",
        "SELECT * FROM users; --",
        "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        "Wann spielt der BVB???",
        "1234567890",
    ];
    for input in inputs {
        // A well-formed intent comes back for every input, no panics
        let intent = parse_with_today(input, wednesday());
        assert!(matches!(
            intent.purpose,
            QueryPurpose::Score
                | QueryPurpose::Odds
                | QueryPurpose::Analysis
                | QueryPurpose::Accumulator
                | QueryPurpose::HeadToHead
                | QueryPurpose::Live
                | QueryPurpose::Finished
                | QueryPurpose::General
        ));
    }
}

#[test]
fn no_constraints_produces_the_default_intent() {
    let intent = parse_with_today("anything interesting?", wednesday());
    assert_eq!(intent, QueryIntent::default());
}

#[test]
fn score_queries_include_finished_matches() {
    let intent = parse_with_today("final score for Santos", wednesday());
    assert_eq!(intent.purpose, QueryPurpose::Score);
    assert!(intent.include_finished);
    assert_eq!(intent.team.as_deref(), Some("Santos"));
    assert_eq!(intent.operator, TeamMatchOperator::Contains);
}

#[test]
fn intent_serializes_with_camel_case_wire_names() {
    let intent = parse_with_today("Show me matches today", wednesday());
    let json = serde_json::to_value(&intent).unwrap();
    assert_eq!(json["dateContext"], "today");
    assert_eq!(json["includeFinished"], false);
    assert!(json.get("date_context").is_none());
}
