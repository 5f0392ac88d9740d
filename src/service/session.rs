use crate::db::StudentStore;
use crate::db::models::{SessionRow, UserRow};
use crate::db::sqlite::now_rfc3339;
use crate::error::ApiError;
use chrono::{Duration, SecondsFormat, Utc};
use tracing::{info, warn};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "lifeboard_session";
pub const SESSION_TTL_DAYS: i64 = 7;

const PURGE_INTERVAL_SECS: u64 = 60 * 60;

fn expiry_from_now() -> String {
    (Utc::now() + Duration::days(SESSION_TTL_DAYS)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Mint a durable session for `user_id`.
pub async fn open_session(store: &StudentStore, user_id: &str) -> Result<SessionRow, ApiError> {
    let session = SessionRow {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        created_at: now_rfc3339(),
        expires_at: expiry_from_now(),
    };
    store.insert_session(&session).await?;
    Ok(session)
}

/// Resolve a cookie value to its user row. Expired or dangling sessions are
/// deleted on sight; a live session gets its expiry pushed out so active
/// users never fall off mid-use.
pub async fn resolve_session(store: &StudentStore, session_id: &str) -> Result<UserRow, ApiError> {
    let Some(session) = store.get_session(session_id).await? else {
        return Err(ApiError::Unauthenticated);
    };
    if session.expires_at <= now_rfc3339() {
        store.delete_session(&session.id).await?;
        return Err(ApiError::Unauthenticated);
    }
    let Some(user) = store.get_user(&session.user_id).await? else {
        // user_id carries no FOREIGN KEY, so a dangling session is possible
        store.delete_session(&session.id).await?;
        return Err(ApiError::Unauthenticated);
    };
    store.touch_session(&session.id, &expiry_from_now()).await?;
    Ok(user)
}

/// Idempotent: deleting an unknown session id is a successful no-op.
pub async fn close_session(store: &StudentStore, session_id: &str) -> Result<(), ApiError> {
    store.delete_session(session_id).await
}

/// Hourly sweep deleting sessions whose expiry has passed. Expired sessions
/// already fail `resolve_session`; the sweep just keeps the table small.
pub fn spawn_purge_task(store: StudentStore) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(PURGE_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            match store.purge_expired_sessions(&now_rfc3339()).await {
                Ok(0) => {}
                Ok(n) => info!(purged = n, "removed expired sessions"),
                Err(e) => warn!(error = %e, "session purge failed"),
            }
        }
    });
}
