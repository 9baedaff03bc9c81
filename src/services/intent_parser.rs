//! Free-text query parsing.
//!
//! Heuristic keyword and pattern matching over the raw message - no gazetteer
//! of real team names, no grammar. Any capitalized phrase that survives the
//! stoplist is treated as a possible team, so false positives are expected and
//! accepted. Parsing never fails: a message that matches nothing produces the
//! all-default "upcoming, general" intent.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::intent::{DateContext, QueryIntent, QueryPurpose, TeamMatchOperator};

// League keyword -> short internal code (football-data style)
static LEAGUE_CODES: &[(&str, &str)] = &[
    ("premier league", "E0"),
    ("epl", "E0"),
    ("championship", "E1"),
    ("bundesliga 2", "D2"),
    ("2. bundesliga", "D2"),
    ("bundesliga", "D1"),
    ("la liga", "SP1"),
    ("laliga", "SP1"),
    ("serie b", "I2"),
    ("serie a", "I1"),
    ("ligue 1", "F1"),
    ("ligue 2", "F2"),
    ("eredivisie", "N1"),
    ("primeira liga", "P1"),
    ("super lig", "T1"),
    ("scottish premiership", "SC0"),
];

// Country adjectives and names -> Country column value
static COUNTRIES: &[(&str, &str)] = &[
    ("english", "England"),
    ("england", "England"),
    ("german", "Germany"),
    ("germany", "Germany"),
    ("spanish", "Spain"),
    ("spain", "Spain"),
    ("italian", "Italy"),
    ("italy", "Italy"),
    ("french", "France"),
    ("france", "France"),
    ("dutch", "Netherlands"),
    ("netherlands", "Netherlands"),
    ("portuguese", "Portugal"),
    ("portugal", "Portugal"),
    ("scottish", "Scotland"),
    ("scotland", "Scotland"),
    ("turkish", "Turkey"),
    ("turkey", "Turkey"),
    ("brazilian", "Brazil"),
    ("brazil", "Brazil"),
    ("mexican", "Mexico"),
    ("mexico", "Mexico"),
    ("argentine", "Argentina"),
    ("argentinian", "Argentina"),
    ("chilean", "Chile"),
];

// Keyword families for purpose classification. Scanned in this order and the
// last family with a hit wins - historical behavior, kept as-is.
static PURPOSE_FAMILIES: &[(QueryPurpose, &[&str])] = &[
    (QueryPurpose::Score, &["score", "result", "who won", "final"]),
    (
        QueryPurpose::Odds,
        &["odds", "price", "bookmaker", "value bet", "best bet", "betting line"],
    ),
    (
        QueryPurpose::Analysis,
        &["analysis", "analyze", "analyse", "predict", "insight", "breakdown", "recommend"],
    ),
    (
        QueryPurpose::Accumulator,
        &["accumulator", "acca", "parlay", "multi bet", "combo"],
    ),
    (QueryPurpose::HeadToHead, &["head to head", "h2h", " vs ", " versus "]),
    (QueryPurpose::Live, &["live", "in-play", "playing now"]),
    (
        QueryPurpose::Finished,
        &["finished", "full time", "full-time", "ended", "completed"],
    ),
];

// Capitalized words that are never team names: command verbs, calendar words,
// competition words, filler.
static STOPLIST: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december",
    "show", "tell", "give", "list", "find", "get", "what", "what's", "whats",
    "who", "who's", "when", "where", "where's", "which", "how", "let's",
    "analyze", "analyse", "build", "help", "compare",
    "premier", "league", "bundesliga", "liga", "la", "serie", "ligue", "eredivisie",
    "championship", "champions", "europa", "cup", "mx", "epl", "laliga",
    "today", "tomorrow", "yesterday", "weekend", "week", "upcoming", "next",
    "match", "matches", "fixture", "fixtures", "game", "games", "odds", "bet",
    "bets", "betting", "best", "score", "scores", "results", "analysis",
    "accumulator", "live", "the", "i", "me", "my", "a", "an", "please", "can",
    "could", "do", "does", "is", "are", "for", "of", "on", "in", "at", "and",
    "this", "that", "any", "all",
];

static MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december",
];

static TEAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][A-Za-z']+(?:\s+[A-Z][A-Za-z']+)*").unwrap());
static QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());
static DMY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[./](\d{1,2})(?:[./](\d{2,4}))?\b").unwrap());
static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})\b",
    )
    .unwrap()
});
static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?(january|february|march|april|may|june|july|august|september|october|november|december)\b",
    )
    .unwrap()
});

/// Parse a user message into a structured intent using the wall clock.
pub fn parse(text: &str) -> QueryIntent {
    parse_with_today(text, Local::now().date_naive())
}

/// Clock-injected variant so date resolution is deterministic under test.
pub fn parse_with_today(text: &str, today: NaiveDate) -> QueryIntent {
    let lower = text.to_lowercase();

    let league = detect_league(&lower);
    let country = detect_country(&lower);
    let purpose = classify_purpose(&lower);
    let date_context = detect_date_context(&lower, today);
    let (team, operator) = extract_team(text);

    let include_finished =
        purpose == QueryPurpose::Score || date_context == DateContext::Yesterday;

    QueryIntent {
        team,
        league,
        country,
        date_context,
        purpose,
        operator,
        include_finished,
    }
}

fn detect_league(lower: &str) -> Option<String> {
    LEAGUE_CODES
        .iter()
        .find(|&&(keyword, _)| lower.contains(keyword))
        .map(|&(_, code)| code.to_string())
}

fn detect_country(lower: &str) -> Option<String> {
    COUNTRIES
        .iter()
        .find(|&&(keyword, _)| contains_word(lower, keyword))
        .map(|&(_, name)| name.to_string())
}

// Whole-word containment, so "spain" does not fire inside "despair"
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.split(|c: char| !c.is_alphanumeric()).any(|w| w == word)
}

fn classify_purpose(lower: &str) -> QueryPurpose {
    let mut purpose = QueryPurpose::General;
    for (candidate, keywords) in PURPOSE_FAMILIES {
        if keywords.iter().any(|k| lower.contains(k)) {
            purpose = *candidate;
        }
    }
    purpose
}

fn detect_date_context(lower: &str, today: NaiveDate) -> DateContext {
    // "this weekend" contains "this week", so weekend goes first
    if lower.contains("weekend") {
        return DateContext::Weekend;
    }
    if lower.contains("today") || lower.contains("tonight") {
        return DateContext::Today;
    }
    if lower.contains("tomorrow") {
        return DateContext::Tomorrow;
    }
    if lower.contains("yesterday") {
        return DateContext::Yesterday;
    }
    if lower.contains("this week") {
        return DateContext::ThisWeek;
    }

    if let Some(caps) = ISO_DATE_RE.captures(lower) {
        if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
            return DateContext::On(date);
        }
    }
    if let Some(caps) = MONTH_DAY_RE.captures(lower) {
        if let Some(date) = month_day(&caps[1], &caps[2], today) {
            return DateContext::On(date);
        }
    }
    if let Some(caps) = DAY_MONTH_RE.captures(lower) {
        if let Some(date) = month_day(&caps[2], &caps[1], today) {
            return DateContext::On(date);
        }
    }
    if let Some(caps) = DMY_RE.captures(lower) {
        let year = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| today.year().to_string());
        if let Some(date) = ymd(&year, &caps[2], &caps[1]) {
            return DateContext::On(date);
        }
    }

    DateContext::Upcoming
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn month_day(month_name: &str, day: &str, today: NaiveDate) -> Option<NaiveDate> {
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month_name))? as u32
        + 1;
    NaiveDate::from_ymd_opt(today.year(), month, day.parse().ok()?)
}

// Candidate teams are capitalized word runs with stoplisted words trimmed off
// both ends. First survivor wins. A double-quoted phrase is taken verbatim
// with an exact-match operator instead.
fn extract_team(text: &str) -> (Option<String>, TeamMatchOperator) {
    if let Some(caps) = QUOTED_RE.captures(text) {
        let quoted = caps[1].trim();
        if !quoted.is_empty() {
            return (Some(quoted.to_string()), TeamMatchOperator::Equals);
        }
    }

    for m in TEAM_RE.find_iter(text) {
        let words: Vec<&str> = m.as_str().split_whitespace().collect();

        let mut start = 0;
        let mut end = words.len();
        while start < end && is_stopword(words[start]) {
            start += 1;
        }
        while end > start && is_stopword(words[end - 1]) {
            end -= 1;
        }

        if start < end {
            return (Some(words[start..end].join(" ")), TeamMatchOperator::Contains);
        }
    }

    (None, TeamMatchOperator::Contains)
}

fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPLIST.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wednesday() -> NaiveDate {
        // 2025-08-13 was a Wednesday
        NaiveDate::from_ymd_opt(2025, 8, 13).unwrap()
    }

    #[test]
    fn today_query_has_no_team() {
        let intent = parse_with_today("Show me matches today", wednesday());
        assert_eq!(intent.date_context, DateContext::Today);
        assert_eq!(intent.team, None);
    }

    #[test]
    fn bundesliga_resolves_to_d1() {
        let intent = parse_with_today("Bundesliga fixtures", wednesday());
        assert_eq!(intent.league.as_deref(), Some("D1"));
        assert_eq!(intent.team, None);
    }

    #[test]
    fn premier_league_resolves_to_e0() {
        let intent = parse_with_today("best bets in the Premier League tomorrow", wednesday());
        assert_eq!(intent.league.as_deref(), Some("E0"));
        assert_eq!(intent.date_context, DateContext::Tomorrow);
    }

    #[test]
    fn country_adjective_detected() {
        let intent = parse_with_today("any german matches this week?", wednesday());
        assert_eq!(intent.country.as_deref(), Some("Germany"));
        assert_eq!(intent.date_context, DateContext::ThisWeek);
    }

    #[test]
    fn team_extracted_from_capitalized_phrase() {
        let intent = parse_with_today("Analyze Manchester United vs Arsenal", wednesday());
        assert_eq!(intent.team.as_deref(), Some("Manchester United"));
        assert_eq!(intent.purpose, QueryPurpose::HeadToHead);
    }

    #[test]
    fn quoted_team_uses_equals_operator() {
        let intent = parse_with_today(r#"odds for "Santos" please"#, wednesday());
        assert_eq!(intent.team.as_deref(), Some("Santos"));
        assert_eq!(intent.operator, TeamMatchOperator::Equals);
    }

    #[test]
    fn last_matching_purpose_family_wins() {
        // Both score and odds keywords present: odds family is scanned later
        let intent = parse_with_today("score and odds for today", wednesday());
        assert_eq!(intent.purpose, QueryPurpose::Odds);
    }

    #[test]
    fn score_purpose_includes_finished() {
        let intent = parse_with_today("what was the score", wednesday());
        assert_eq!(intent.purpose, QueryPurpose::Score);
        assert!(intent.include_finished);
    }

    #[test]
    fn yesterday_includes_finished() {
        let intent = parse_with_today("matches yesterday", wednesday());
        assert_eq!(intent.date_context, DateContext::Yesterday);
        assert!(intent.include_finished);
    }

    #[test]
    fn weekend_detected_before_this_week() {
        let intent = parse_with_today("fixtures this weekend", wednesday());
        assert_eq!(intent.date_context, DateContext::Weekend);
    }

    #[test]
    fn explicit_iso_date() {
        let intent = parse_with_today("matches on 2025-08-15", wednesday());
        assert_eq!(
            intent.date_context,
            DateContext::On(NaiveDate::from_ymd_opt(2025, 8, 15).unwrap())
        );
    }

    #[test]
    fn explicit_dmy_date_without_year() {
        let intent = parse_with_today("fixtures on 15.08", wednesday());
        assert_eq!(
            intent.date_context,
            DateContext::On(NaiveDate::from_ymd_opt(2025, 8, 15).unwrap())
        );
    }

    #[test]
    fn month_day_pattern() {
        let intent = parse_with_today("what's on august 15", wednesday());
        assert_eq!(
            intent.date_context,
            DateContext::On(NaiveDate::from_ymd_opt(2025, 8, 15).unwrap())
        );
    }

    #[test]
    fn nonsense_input_falls_back_to_defaults() {
        let intent = parse_with_today("qwerty asdf 123", wednesday());
        assert_eq!(intent, QueryIntent::default());
    }

    #[test]
    fn empty_input_never_panics() {
        let intent = parse_with_today("", wednesday());
        assert_eq!(intent.date_context, DateContext::Upcoming);
        assert_eq!(intent.purpose, QueryPurpose::General);
    }

    #[test]
    fn invalid_explicit_date_is_ignored() {
        let intent = parse_with_today("matches on 45.19", wednesday());
        assert_eq!(intent.date_context, DateContext::Upcoming);
    }
}
