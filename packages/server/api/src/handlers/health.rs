use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match &state.db {
        Some(db) => match db.health_check().await {
            Ok(_) => (
                StatusCode::OK,
                Json(json!({ "status": "ok", "database": "connected" })),
            ),
            Err(e) => {
                tracing::error!("Health check failed: {:#}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "status": "error", "database": e.to_string() })),
                )
            }
        },
        None => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "in-memory" })),
        ),
    }
}
