use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;

// Bounded pool, same ceiling the deployment has always run with
const MAX_CONNECTIONS: u32 = 10;

pub async fn get_db_pool(database_url: &str) -> MySqlPool {
    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .expect("Failed to connect to MySQL");

    // Verify the connection actually works before serving traffic
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => {
            println!("✅ MySQL database connected successfully");
        }
        Err(e) => {
            eprintln!("⚠️ MySQL ping failed: {}", e);
        }
    }

    pool
}

/// Liveness probe used by the health endpoints.
pub async fn ping(pool: &MySqlPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
