use crate::domain::{DomainSpec, EMERGENCY_FUND, SETTINGS, domain_for_route, validate};
use crate::error::ApiError;
use crate::middleware::auth::{CurrentUser, StudentUser};
use crate::router::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Map, Value};

fn resolve_domain(route: &str) -> Result<&'static DomainSpec, ApiError> {
    domain_for_route(route).ok_or_else(|| ApiError::not_found(format!("unknown domain `{route}`")))
}

fn payload_object(payload: Value) -> Result<Map<String, Value>, ApiError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::validation("payload must be a JSON object")),
    }
}

/// GET /api/{domain} -> every record of that domain, oldest first.
pub async fn list_records(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let spec = resolve_domain(&domain)?;
    let records = state.store.list_records(spec, &user.student_id).await?;
    Ok(Json(records))
}

/// POST /api/{domain} -> 201 + the stored record.
pub async fn create_record(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    StudentUser(user): StudentUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let spec = resolve_domain(&domain)?;
    let payload = payload_object(payload)?;
    let values = validate::for_create(spec.fields, &payload)?;
    let record = state
        .store
        .insert_record(spec, &user.student_id, &values)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /api/{domain}/{id} -> 200 + the merged record.
pub async fn update_record(
    State(state): State<AppState>,
    Path((domain, id)): Path<(String, String)>,
    StudentUser(user): StudentUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let spec = resolve_domain(&domain)?;
    let payload = payload_object(payload)?;
    let values = validate::for_update(spec.fields, &payload)?;
    let record = state
        .store
        .update_record(spec, &user.student_id, &id, &values)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no `{domain}` record with id `{id}`")))?;
    Ok(Json(record))
}

/// DELETE /api/{domain}/{id} -> 204. A second delete of the same id is 404.
pub async fn delete_record(
    State(state): State<AppState>,
    Path((domain, id)): Path<(String, String)>,
    StudentUser(user): StudentUser,
) -> Result<impl IntoResponse, ApiError> {
    let spec = resolve_domain(&domain)?;
    if !state
        .store
        .delete_record(spec, &user.student_id, &id)
        .await?
    {
        return Err(ApiError::not_found(format!(
            "no `{domain}` record with id `{id}`"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/settings -> partial upsert of the goal configuration row.
pub async fn update_settings(
    State(state): State<AppState>,
    StudentUser(user): StudentUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload_object(payload)?;
    let values = validate::for_update(SETTINGS.fields, &payload)?;
    let row = state
        .store
        .upsert_singleton(&SETTINGS, &user.student_id, &values)
        .await?;
    Ok(Json(row))
}

/// PATCH /api/emergency-fund -> partial upsert of the fund goal row.
pub async fn update_emergency_fund(
    State(state): State<AppState>,
    StudentUser(user): StudentUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload_object(payload)?;
    let values = validate::for_update(EMERGENCY_FUND.fields, &payload)?;
    let row = state
        .store
        .upsert_singleton(&EMERGENCY_FUND, &user.student_id, &values)
        .await?;
    Ok(Json(row))
}
