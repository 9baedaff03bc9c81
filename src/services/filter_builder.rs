//! Intent -> SQL projection and execution against the Rawdata_Total table.
//!
//! Every user-supplied value is bound through `push_bind`, never concatenated
//! into the query text. Hard invariant.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use sqlx::mysql::MySql;
use sqlx::{MySqlPool, QueryBuilder};
use std::collections::HashSet;

use crate::models::fixture::MatchRecord;
use crate::models::intent::{DateContext, QueryIntent, TeamMatchOperator};

pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 200;

const SELECT_COLUMNS: &str = "SELECT MATCH_ID, Home, Away, Date, Time, League, Country, STATUS, \
     PH, PD, PA, ELO_Home, ELO_Away, xG_Home, xG_Away, \
     Score_Home, Score_Away, FT_Home, FT_Away FROM Rawdata_Total WHERE 1=1";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatePredicate {
    On(NaiveDate),
    Between(NaiveDate, NaiveDate),
    From(NaiveDate),
    Any,
}

/// SQL-shaped projection of a QueryIntent. One-way derived, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    pub team: Option<(String, TeamMatchOperator)>,
    pub league: Option<String>,
    pub country: Option<String>,
    pub date: DatePredicate,
    pub include_finished: bool,
    pub limit: u32,
}

/// Query result carrying the degraded-data flag alongside the rows, so the
/// orchestrator can tell "zero matches" apart from "could not query".
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub matches: Vec<MatchRecord>,
    pub degraded: bool,
}

impl FetchOutcome {
    pub fn degraded() -> Self {
        FetchOutcome {
            matches: Vec::new(),
            degraded: true,
        }
    }
}

pub fn build_filter(intent: &QueryIntent, today: NaiveDate) -> SearchFilter {
    SearchFilter {
        team: intent
            .team
            .as_ref()
            .map(|t| (t.clone(), intent.operator)),
        league: intent.league.clone(),
        country: intent.country.clone(),
        date: resolve_date(intent.date_context, today),
        include_finished: intent.include_finished,
        limit: DEFAULT_LIMIT,
    }
}

fn resolve_date(context: DateContext, today: NaiveDate) -> DatePredicate {
    match context {
        DateContext::Today => DatePredicate::On(today),
        DateContext::Tomorrow => DatePredicate::On(today + Duration::days(1)),
        DateContext::Yesterday => DatePredicate::On(today - Duration::days(1)),
        DateContext::ThisWeek => DatePredicate::Between(today, today + Duration::days(6)),
        DateContext::Weekend => {
            let (saturday, sunday) = upcoming_weekend(today);
            DatePredicate::Between(saturday, sunday)
        }
        DateContext::On(date) => DatePredicate::On(date),
        DateContext::Upcoming => DatePredicate::From(today),
    }
}

// Upcoming Saturday/Sunday pair relative to the local day-of-week. On a
// Saturday the pair starts today; on a Sunday it rolls to next weekend.
pub fn upcoming_weekend(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_until_saturday =
        (Weekday::Sat.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    let saturday = today + Duration::days(days_until_saturday as i64);
    (saturday, saturday + Duration::days(1))
}

impl SearchFilter {
    /// Builds the full parameterized SELECT for this filter.
    pub fn to_query(&self) -> QueryBuilder<'_, MySql> {
        let mut qb = QueryBuilder::new(SELECT_COLUMNS);

        if let Some((team, operator)) = &self.team {
            let pattern = match operator {
                TeamMatchOperator::Equals => {
                    qb.push(" AND (Home = ").push_bind(team.clone());
                    qb.push(" OR Away = ").push_bind(team.clone());
                    qb.push(")");
                    None
                }
                TeamMatchOperator::Contains => Some(format!("%{}%", escape_like(team))),
                TeamMatchOperator::StartsWith => Some(format!("{}%", escape_like(team))),
                TeamMatchOperator::EndsWith => Some(format!("%{}", escape_like(team))),
            };
            if let Some(pattern) = pattern {
                qb.push(" AND (Home LIKE ").push_bind(pattern.clone());
                qb.push(" OR Away LIKE ").push_bind(pattern);
                qb.push(")");
            }
        }

        if let Some(league) = &self.league {
            qb.push(" AND League = ").push_bind(league.clone());
        }

        if let Some(country) = &self.country {
            qb.push(" AND Country = ").push_bind(country.clone());
        }

        match self.date {
            DatePredicate::On(date) => {
                qb.push(" AND Date = ").push_bind(date);
            }
            DatePredicate::Between(from, to) => {
                qb.push(" AND Date BETWEEN ").push_bind(from);
                qb.push(" AND ").push_bind(to);
            }
            DatePredicate::From(from) => {
                qb.push(" AND Date >= ").push_bind(from);
            }
            DatePredicate::Any => {}
        }

        if !self.include_finished {
            qb.push(" AND (STATUS IS NULL OR STATUS != 'FT')");
        }

        qb.push(" ORDER BY Date ASC, Time ASC LIMIT ")
            .push_bind(self.limit.min(MAX_LIMIT) as i64);

        qb
    }
}

// LIKE wildcards in a team fragment would silently widen the match
fn escape_like(value: &str) -> String {
    value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Runs the filter against the pool. A storage error is not propagated: it
/// degrades to an empty outcome the formatter will disclose to the user.
pub async fn fetch_matches(pool: &MySqlPool, filter: &SearchFilter) -> FetchOutcome {
    let mut qb = filter.to_query();

    match qb.build_query_as::<MatchRecord>().fetch_all(pool).await {
        Ok(rows) => {
            let matches = dedup_matches(rows);
            FetchOutcome {
                matches,
                degraded: false,
            }
        }
        Err(err) => {
            eprintln!("❌ Match query failed: {}", err);
            tracing::warn!("match query failed, serving degraded response: {}", err);
            FetchOutcome::degraded()
        }
    }
}

pub async fn fetch_match_by_id(
    pool: &MySqlPool,
    match_id: &str,
) -> Result<Option<MatchRecord>, sqlx::Error> {
    let mut qb = QueryBuilder::new(SELECT_COLUMNS);
    qb.push(" AND MATCH_ID = ").push_bind(match_id.to_string());
    qb.push(" LIMIT 1");
    qb.build_query_as::<MatchRecord>().fetch_optional(pool).await
}

// Upstream predicate composition can produce overlapping result sets
pub fn dedup_matches(rows: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.match_id.clone()))
        .collect()
}
