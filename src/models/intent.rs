use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the user is asking for, derived fresh from every incoming message.
/// Consumed by the filter builder and echoed back to the caller as `queryInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryIntent {
    pub team: Option<String>,
    /// Short league code, e.g. "D1" for the Bundesliga
    pub league: Option<String>,
    pub country: Option<String>,
    pub date_context: DateContext,
    pub purpose: QueryPurpose,
    pub operator: TeamMatchOperator,
    pub include_finished: bool,
}

impl Default for QueryIntent {
    fn default() -> Self {
        QueryIntent {
            team: None,
            league: None,
            country: None,
            date_context: DateContext::Upcoming,
            purpose: QueryPurpose::General,
            operator: TeamMatchOperator::Contains,
            include_finished: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateContext {
    Today,
    Tomorrow,
    Yesterday,
    ThisWeek,
    Weekend,
    On(NaiveDate),
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryPurpose {
    Score,
    Odds,
    Analysis,
    Accumulator,
    HeadToHead,
    Live,
    Finished,
    General,
}

// Wire names match the operator values the search endpoint has always accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamMatchOperator {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
}

impl Default for TeamMatchOperator {
    fn default() -> Self {
        TeamMatchOperator::Contains
    }
}
