use axum::{http::StatusCode, Extension};
use serde_json::{json, Value};

use crate::database::{DatabaseManager, DbPool};
use crate::middleware::ApiResponse;

/// GET /health - liveness plus a database ping
pub async fn health(Extension(DbPool(pool)): Extension<DbPool>) -> ApiResponse<Value> {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&pool).await {
        Ok(_) => ApiResponse::raw(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            ApiResponse::raw(json!({
                "status": "degraded",
                "timestamp": now,
                "database": "unavailable"
            }))
            .with_status(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
