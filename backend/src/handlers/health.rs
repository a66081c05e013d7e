//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub database: String,
    /// PostGIS version, when the extension is installed
    pub postgis: Option<String>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let postgis = sqlx::query_scalar::<_, String>("SELECT PostGIS_Lib_Version()")
        .fetch_one(&state.db)
        .await;

    let (status, database, postgis) = match postgis {
        Ok(version) => ("healthy", "connected", Some(version)),
        Err(e) => {
            tracing::warn!("Health check query failed: {}", e);
            match sqlx::query("SELECT 1").execute(&state.db).await {
                Ok(_) => ("degraded", "connected", None),
                Err(_) => ("unhealthy", "disconnected", None),
            }
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        database: database.to_string(),
        postgis,
    })
}
