// src/routes/matches.rs
use axum::{routing::get, Router};

use crate::handlers::matches;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches", get(matches::list_matches))
        .route("/matches/search", get(matches::search_matches))
        .route("/matches/:match_id/analysis", get(matches::match_analysis))
}
