use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One row of the Rawdata_Total table - column names match the feed EXACTLY.
// STATUS is written by the external data feed only (NS -> LIVE -> FT),
// this service never updates it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchRecord {
    #[serde(rename = "MATCH_ID")]
    #[sqlx(rename = "MATCH_ID")]
    pub match_id: String,

    #[serde(rename = "Home")]
    #[sqlx(rename = "Home")]
    pub home: String,

    #[serde(rename = "Away")]
    #[sqlx(rename = "Away")]
    pub away: String,

    #[serde(rename = "Date")]
    #[sqlx(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "Time")]
    #[sqlx(rename = "Time")]
    pub time: String,

    #[serde(rename = "League")]
    #[sqlx(rename = "League")]
    pub league: String,

    #[serde(rename = "Country", skip_serializing_if = "Option::is_none")]
    #[sqlx(rename = "Country")]
    pub country: Option<String>,

    // NULL in the feed means the fixture has not started yet
    #[serde(rename = "STATUS")]
    #[sqlx(rename = "STATUS")]
    pub status: Option<String>,

    // Bookmaker decimal prices: home / draw / away
    #[serde(rename = "PH")]
    #[sqlx(rename = "PH")]
    pub ph: Option<f64>,

    #[serde(rename = "PD")]
    #[sqlx(rename = "PD")]
    pub pd: Option<f64>,

    #[serde(rename = "PA")]
    #[sqlx(rename = "PA")]
    pub pa: Option<f64>,

    #[serde(rename = "ELO_Home")]
    #[sqlx(rename = "ELO_Home")]
    pub elo_home: Option<f64>,

    #[serde(rename = "ELO_Away")]
    #[sqlx(rename = "ELO_Away")]
    pub elo_away: Option<f64>,

    #[serde(rename = "xG_Home")]
    #[sqlx(rename = "xG_Home")]
    pub xg_home: Option<f64>,

    #[serde(rename = "xG_Away")]
    #[sqlx(rename = "xG_Away")]
    pub xg_away: Option<f64>,

    // Model score predictions
    #[serde(rename = "Score_Home")]
    #[sqlx(rename = "Score_Home")]
    pub score_home: Option<f64>,

    #[serde(rename = "Score_Away")]
    #[sqlx(rename = "Score_Away")]
    pub score_away: Option<f64>,

    // Actual full-time scores, present once STATUS = FT
    #[serde(rename = "FT_Home", skip_serializing_if = "Option::is_none")]
    #[sqlx(rename = "FT_Home")]
    pub ft_home: Option<i32>,

    #[serde(rename = "FT_Away", skip_serializing_if = "Option::is_none")]
    #[sqlx(rename = "FT_Away")]
    pub ft_away: Option<i32>,
}

impl MatchRecord {
    pub fn is_finished(&self) -> bool {
        self.status.as_deref() == Some("FT")
    }

    pub fn is_live(&self) -> bool {
        self.status.as_deref() == Some("LIVE")
    }

    pub fn is_not_started(&self) -> bool {
        !self.is_finished() && !self.is_live()
    }

    pub fn matchup(&self) -> String {
        format!("{} vs {}", self.home, self.away)
    }
}
