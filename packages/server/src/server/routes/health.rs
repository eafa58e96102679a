use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

const DB_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct HealthReport {
    status: &'static str,
    database: DatabaseProbe,
    pool: PoolUsage,
}

#[derive(Debug, Serialize)]
pub struct DatabaseProbe {
    reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PoolUsage {
    open: u32,
    idle: usize,
    max: u32,
}

async fn probe_database(pool: &sqlx::PgPool) -> DatabaseProbe {
    let error = match tokio::time::timeout(DB_PROBE_TIMEOUT, sqlx::query("SELECT 1").execute(pool))
        .await
    {
        Ok(Ok(_)) => None,
        Ok(Err(e)) => Some(format!("query failed: {}", e)),
        Err(_) => Some(format!("no answer within {}s", DB_PROBE_TIMEOUT.as_secs())),
    };

    DatabaseProbe {
        reachable: error.is_none(),
        error,
    }
}

/// `GET /health`: 200 while the database answers, 503 otherwise
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthReport>) {
    let pool = state.pool();
    let database = probe_database(pool).await;

    let (code, status) = if database.reachable {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let report = HealthReport {
        status,
        database,
        pool: PoolUsage {
            open: pool.size(),
            idle: pool.num_idle(),
            max: pool.options().get_max_connections(),
        },
    };
    (code, Json(report))
}
