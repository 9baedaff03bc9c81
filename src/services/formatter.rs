//! Renders fetched matches into the prompt context for the text-generation
//! call: a bounded markdown table plus a short instruction block telling the
//! model which analytical angle to take.

use std::fmt::Write;

use crate::models::fixture::MatchRecord;
use crate::models::intent::{QueryIntent, QueryPurpose};
use crate::services::filter_builder::FetchOutcome;

/// Table rows are capped to keep the prompt bounded.
pub const MAX_TABLE_ROWS: usize = 15;

#[derive(Debug, Clone)]
pub struct FormattedContext {
    pub table: String,
    pub instructions: String,
    pub match_count: usize,
    pub not_started: usize,
    pub live: usize,
}

impl FormattedContext {
    /// Single block handed to the prompt builder.
    pub fn as_prompt_block(&self) -> String {
        if self.table.is_empty() {
            self.instructions.clone()
        } else {
            format!("{}\n\n{}", self.table, self.instructions)
        }
    }
}

pub fn format_context(outcome: &FetchOutcome, intent: &QueryIntent) -> FormattedContext {
    if outcome.degraded {
        return FormattedContext {
            table: String::new(),
            instructions: "The match database is currently unreachable, so no real fixture \
                data is available. Tell the user plainly that live data is down and that \
                nothing can be analyzed right now. Do not invent matches, odds or results."
                .to_string(),
            match_count: 0,
            not_started: 0,
            live: 0,
        };
    }

    if outcome.matches.is_empty() {
        // Deliberately terse: the user gets a short "nothing found", not an essay
        return FormattedContext {
            table: String::new(),
            instructions: "No matches found for this request. Say so directly, in one or \
                two sentences, and suggest widening the search. Do not invent fixtures."
                .to_string(),
            match_count: 0,
            not_started: 0,
            live: 0,
        };
    }

    let not_started = outcome.matches.iter().filter(|m| m.is_not_started()).count();
    let live = outcome.matches.iter().filter(|m| m.is_live()).count();

    FormattedContext {
        table: render_table(&outcome.matches),
        instructions: render_instructions(outcome.matches.len(), not_started, live, intent),
        match_count: outcome.matches.len(),
        not_started,
        live,
    }
}

fn render_table(matches: &[MatchRecord]) -> String {
    let mut table = String::new();
    table.push_str("| Date | Time | Match | PH | PD | PA | League | Country |\n");
    table.push_str("|------|------|-------|----|----|----|--------|--------|\n");

    for m in matches.iter().take(MAX_TABLE_ROWS) {
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            m.date,
            m.time,
            m.matchup(),
            price(m.ph),
            price(m.pd),
            price(m.pa),
            m.league,
            m.country.as_deref().unwrap_or("-"),
        );
    }

    if matches.len() > MAX_TABLE_ROWS {
        let _ = writeln!(table, "... and {} more matches", matches.len() - MAX_TABLE_ROWS);
    }

    let _ = write!(
        table,
        "\n📊 {} matches found. PH=Home Win, PD=Draw, PA=Away Win odds.",
        matches.len()
    );

    table
}

fn price(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "N/A".to_string())
}

fn render_instructions(total: usize, not_started: usize, live: usize, intent: &QueryIntent) -> String {
    let angle = match intent.purpose {
        QueryPurpose::Score | QueryPurpose::Finished => {
            "Recap the results: final scores where available, and how they compare to the model's score predictions."
        }
        QueryPurpose::Odds => {
            "Focus on the odds: point out where the bookmaker prices look out of line with the ELO and xG numbers."
        }
        QueryPurpose::Analysis | QueryPurpose::HeadToHead => {
            "Give a deep statistical read using the ELO ratings, xG estimates and score predictions, with confidence levels."
        }
        QueryPurpose::Accumulator => {
            "Propose a 3-4 leg accumulator from these fixtures, with the combined price and the reasoning per leg."
        }
        QueryPurpose::Live => {
            "Lead with the matches currently in play and what the pre-match numbers suggested."
        }
        QueryPurpose::General => {
            "Summarize the most interesting fixtures and invite a follow-up question."
        }
    };

    format!(
        "{} matches found ({} not started, {} live). {}",
        total, not_started, live, angle
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixture::MatchRecord;
    use chrono::NaiveDate;

    fn record(id: &str, status: Option<&str>) -> MatchRecord {
        MatchRecord {
            match_id: id.to_string(),
            home: "Cruz Azul".to_string(),
            away: "San Luis".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 8, 11).unwrap(),
            time: "02:30".to_string(),
            league: "MX1".to_string(),
            country: Some("Mexico".to_string()),
            status: status.map(String::from),
            ph: Some(1.65),
            pd: Some(3.80),
            pa: Some(4.50),
            elo_home: Some(95.22),
            elo_away: Some(72.51),
            xg_home: Some(1.85),
            xg_away: Some(0.95),
            score_home: Some(2.1),
            score_away: Some(0.9),
            ft_home: None,
            ft_away: None,
        }
    }

    fn outcome(matches: Vec<MatchRecord>) -> FetchOutcome {
        FetchOutcome {
            matches,
            degraded: false,
        }
    }

    #[test]
    fn zero_matches_is_short_and_fabricates_nothing() {
        let ctx = format_context(&outcome(vec![]), &QueryIntent::default());
        assert!(ctx.table.is_empty());
        assert!(ctx.instructions.len() < 200);
        assert_eq!(ctx.match_count, 0);
        assert!(!ctx.instructions.contains("vs"));
    }

    #[test]
    fn degraded_outcome_discloses_missing_data() {
        let ctx = format_context(&FetchOutcome::degraded(), &QueryIntent::default());
        assert!(ctx.table.is_empty());
        assert!(ctx.instructions.contains("unreachable"));
        assert!(ctx.instructions.contains("Do not invent"));
    }

    #[test]
    fn table_is_capped_at_max_rows() {
        let matches: Vec<MatchRecord> = (0..40).map(|i| record(&i.to_string(), None)).collect();
        let ctx = format_context(&outcome(matches), &QueryIntent::default());

        let data_rows = ctx
            .table
            .lines()
            .filter(|l| l.starts_with("| 2025"))
            .count();
        assert_eq!(data_rows, MAX_TABLE_ROWS);
        assert!(ctx.table.contains("and 25 more matches"));
        assert!(ctx.table.contains("40 matches found"));
    }

    #[test]
    fn status_split_counts_not_started_and_live() {
        let matches = vec![
            record("1", None),
            record("2", Some("NS")),
            record("3", Some("LIVE")),
            record("4", Some("FT")),
        ];
        let ctx = format_context(&outcome(matches), &QueryIntent::default());
        assert_eq!(ctx.match_count, 4);
        assert_eq!(ctx.not_started, 2);
        assert_eq!(ctx.live, 1);
        assert!(ctx.instructions.starts_with("4 matches found (2 not started, 1 live)."));
    }

    #[test]
    fn accumulator_purpose_steers_the_instruction() {
        let intent = QueryIntent {
            purpose: QueryPurpose::Accumulator,
            ..QueryIntent::default()
        };
        let ctx = format_context(&outcome(vec![record("1", None)]), &intent);
        assert!(ctx.instructions.contains("accumulator"));
    }

    #[test]
    fn missing_odds_render_as_na() {
        let mut m = record("1", None);
        m.ph = None;
        let ctx = format_context(&outcome(vec![m]), &QueryIntent::default());
        assert!(ctx.table.contains("N/A"));
    }
}
