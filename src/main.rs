use axum::extract::State;
use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use touchline_api::config::AppConfig;
use touchline_api::database::connection::{get_db_pool, ping};
use touchline_api::routes;
use touchline_api::services::claude::ClaudeService;
use touchline_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();

    let pool = get_db_pool(&config.database_url).await;
    let app_state = initialize_app_state(pool, &config);

    let app = build_router(app_state);
    start_server(app, &config).await;
}

fn initialize_app_state(pool: sqlx::MySqlPool, config: &AppConfig) -> AppState {
    let mut app_state = AppState::new(pool);

    tracing::info!("🔧 Attempting to initialize Claude service...");
    match &config.claude_api_key {
        Some(api_key) => {
            let service = ClaudeService::new(api_key.clone(), config.claude_model.clone());
            tracing::info!("✅ Claude service initialized (model: {})", service.model());
            app_state = app_state.with_claude(Arc::new(service));
        }
        None => {
            tracing::warn!("⚠️ Claude service disabled - fallback responses will be used");
        }
    }

    app_state
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/health", get(api_health_check))
        .nest("/api", routes::chat::routes())
        .nest("/api", routes::matches::routes())
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(app: Router, config: &AppConfig) {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("🚀 Touchline Betting Assistant API starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            axum::serve(listener, app).await.unwrap();
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "🎯 Touchline Betting Assistant API"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = if ping(&state.pool).await {
        "connected"
    } else {
        "disconnected"
    };

    Json(json!({
        "status": "running",
        "database": db_status,
        "claude_api_configured": state.claude.is_some(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
