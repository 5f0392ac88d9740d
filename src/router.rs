use crate::db::StudentStore;
use crate::handlers::{auth, records, student_data};
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, patch, post};

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: StudentStore,
    pub insecure_cookie: bool,
}

impl AppState {
    pub fn new(store: StudentStore, insecure_cookie: bool) -> Self {
        Self {
            store,
            insecure_cookie,
        }
    }
}

impl FromRef<AppState> for StudentStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

/// The full API surface. Static segments (`settings`, `emergency-fund`,
/// `auth/*`) are matched before the `{domain}` captures.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(student_data::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/user", get(auth::current_user))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/student-data", get(student_data::student_data))
        .route("/api/settings", patch(records::update_settings))
        .route("/api/emergency-fund", patch(records::update_emergency_fund))
        .route(
            "/api/{domain}",
            get(records::list_records).post(records::create_record),
        )
        .route(
            "/api/{domain}/{id}",
            patch(records::update_record).delete(records::delete_record),
        )
        .with_state(state)
}
