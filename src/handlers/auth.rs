use crate::db::models::UserRow;
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::router::AppState;
use crate::service::session::{SESSION_COOKIE, SESSION_TTL_DAYS};
use crate::service::{identity, session};
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use time::Duration;
use tracing::info;

/// Missing keys deserialize to empty strings and fail validation in
/// `identity::login`, keeping malformed logins on the 400 path.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub name: String,
    pub role: String,
}

/// POST /api/auth/login -> signs in (creating student/user as needed) and
/// sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = identity::login(&state.store, &req.name, &req.role).await?;
    let session = session::open_session(&state.store, &user.id).await?;
    info!(user = %user.name, role = %user.role, "login");
    let jar = jar.add(session_cookie(session.id, state.insecure_cookie));
    Ok((jar, Json(user)))
}

/// GET /api/auth/user -> the session's user, sliding its expiry.
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserRow> {
    Json(user)
}

/// POST /api/auth/logout -> drops the session row and clears the cookie.
/// Succeeds with or without a live session.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        session::close_session(&state.store, cookie.value()).await?;
    }
    let jar = jar.remove(clear_session_cookie());
    Ok((jar, Json(json!({"status": "ok"}))))
}

fn session_cookie(session_id: String, insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::None)
        .secure(!insecure)
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::None)
        .build()
}
