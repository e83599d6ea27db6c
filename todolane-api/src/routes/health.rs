/// Health check endpoint
///
/// Verifies that the server is running and the database answers a query.
/// The database's own clock is returned so a reachable-but-skewed store is
/// visible from the outside.
///
/// # Endpoint
///
/// ```text
/// GET /api/healthcheck
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "OK",
///   "db_time": "2025-01-10 09:00:00"
/// }
/// ```
///
/// An unreachable store surfaces as a 500 with a safe generic message.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Current time as reported by the database, server-local
    pub db_time: String,
}

/// Health check handler
pub async fn healthcheck(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(HealthResponse {
        status: "OK".to_string(),
        db_time: now
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    }))
}
