use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::db::StudentStore;
use crate::db::models::UserRow;
use crate::error::ApiError;
use crate::service::session::{self, SESSION_COOKIE};

/// The signed-in user behind the request's session cookie.
/// Resolution slides the session expiry; no cookie, an expired session, or a
/// dangling user all reject with `Unauthenticated`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRow);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    StudentStore: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(ApiError::Unauthenticated);
        };
        let store = StudentStore::from_ref(state);
        let user = session::resolve_session(&store, cookie.value()).await?;
        Ok(Self(user))
    }
}

/// `CurrentUser` plus the write gate: every mutation route extracts this,
/// so parents are rejected before any payload or id is looked at.
#[derive(Debug, Clone)]
pub struct StudentUser(pub UserRow);

impl<S> FromRequestParts<S> for StudentUser
where
    S: Send + Sync,
    StudentStore: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_student() {
            return Err(ApiError::Forbidden);
        }
        Ok(Self(user))
    }
}
