use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::router::AppState;
use crate::service::snapshot;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Value, json};

/// GET /api/student-data -> the full aggregated snapshot.
pub async fn student_data(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    // Users only exist bound to the singleton student, so an authenticated
    // request implies the row is present.
    let student = state
        .store
        .find_student()
        .await?
        .ok_or_else(|| ApiError::internal("authenticated session without student row"))?;
    let snapshot = snapshot::student_snapshot(&state.store, &student).await?;
    Ok(Json(snapshot))
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
