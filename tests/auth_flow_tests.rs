use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use lifeboard::db::{SessionRow, sqlite::now_rfc3339};
use lifeboard::router::{AppState, api_router};

fn rfc3339_days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn temp_db_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "lifeboard-{}-{}-{}.sqlite",
        name,
        std::process::id(),
        nanos
    ));
    path
}

async fn spawn_app(name: &str) -> (Router, PathBuf) {
    let path = temp_db_path(name);
    let database_url = format!("sqlite:{}", path.display());
    let store = lifeboard::db::spawn(&database_url)
        .await
        .expect("failed to open sqlite store");
    (api_router(AppState::new(store, true)), path)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");
    app.clone().oneshot(request).await.expect("request failed")
}

async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not json")
}

async fn login(app: &Router, name: &str, role: &str) -> (String, Value) {
    let resp = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "name": name, "role": role })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("login did not set a session cookie")
        .to_str()
        .expect("set-cookie was not valid ascii")
        .split(';')
        .next()
        .expect("empty set-cookie header")
        .to_string();
    (cookie, body_json(resp).await)
}

#[tokio::test]
async fn first_student_login_provisions_the_tracked_student() {
    let (app, db_path) = spawn_app("auth-first-login").await;

    let (cookie, user) = login(&app, "Avery Quinn", "student").await;
    assert!(cookie.starts_with("lifeboard_session="));
    assert_eq!(user["name"].as_str(), Some("Avery Quinn"));
    assert_eq!(user["role"].as_str(), Some("student"));
    let student_id = user["studentId"].as_str().expect("studentId").to_string();
    assert!(!student_id.is_empty());

    let resp = send(&app, "GET", "/api/auth/user", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["id"], user["id"]);
    assert_eq!(me["studentId"].as_str(), Some(student_id.as_str()));

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn parent_cannot_sign_in_before_the_student_exists() {
    let (app, db_path) = spawn_app("auth-parent-first").await;

    let resp = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "name": "Jordan Quinn", "role": "parent" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err = body_json(resp).await;
    assert_eq!(err["error"]["code"].as_str(), Some("VALIDATION"));
    assert!(
        err["error"]["message"]
            .as_str()
            .unwrap_or_default()
            .contains("student must register"),
        "unexpected message: {err}"
    );

    let (_, student) = login(&app, "Avery Quinn", "student").await;
    let (_, parent) = login(&app, "Jordan Quinn", "parent").await;
    assert_eq!(parent["role"].as_str(), Some("parent"));
    assert_eq!(parent["studentId"], student["studentId"]);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn requests_without_a_live_session_are_unauthorized() {
    let (app, db_path) = spawn_app("auth-no-session").await;

    for uri in ["/api/auth/user", "/api/student-data", "/api/expenses"] {
        let resp = send(&app, "GET", uri, None, None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "GET {uri}");
        let err = body_json(resp).await;
        assert_eq!(err["error"]["code"].as_str(), Some("UNAUTHENTICATED"));
    }

    let resp = send(
        &app,
        "GET",
        "/api/auth/user",
        Some("lifeboard_session=not-a-real-session"),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (app, db_path) = spawn_app("auth-logout").await;
    let (cookie, _) = login(&app, "Avery Quinn", "student").await;

    let resp = send(&app, "GET", "/api/auth/user", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"].as_str(), Some("ok"));

    let resp = send(&app, "GET", "/api/auth/user", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Logging out twice is still a success.
    let resp = send(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn login_validates_name_and_role() {
    let (app, db_path) = spawn_app("auth-login-validation").await;

    let resp = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "name": "A", "role": "student" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err = body_json(resp).await;
    assert!(
        err["error"]["message"]
            .as_str()
            .unwrap_or_default()
            .contains("at least 2 characters"),
        "unexpected message: {err}"
    );

    let resp = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "name": "Avery Quinn", "role": "admin" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Missing keys behave like empty strings.
    let resp = send(&app, "POST", "/api/auth/login", None, Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Whitespace around the name never reaches storage.
    let (_, user) = login(&app, "  Avery Quinn  ", "student").await;
    assert_eq!(user["name"].as_str(), Some("Avery Quinn"));

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn sessions_survive_a_store_reopen() {
    let path = temp_db_path("auth-durable-session");
    let database_url = format!("sqlite:{}", path.display());
    let store = lifeboard::db::spawn(&database_url)
        .await
        .expect("failed to open sqlite store");
    let app = api_router(AppState::new(store, true));
    let (cookie, _) = login(&app, "Avery Quinn", "student").await;
    drop(app);

    // A second store over the same file stands in for a restarted process.
    let store = lifeboard::db::spawn(&database_url)
        .await
        .expect("failed to reopen sqlite store");
    let app = api_router(AppState::new(store, true));
    let resp = send(&app, "GET", "/api/auth/user", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["name"].as_str(), Some("Avery Quinn"));

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn expired_sessions_are_rejected_and_deleted() {
    let path = temp_db_path("auth-expired-session");
    let database_url = format!("sqlite:{}", path.display());
    let store = lifeboard::db::spawn(&database_url)
        .await
        .expect("failed to open sqlite store");
    let app = api_router(AppState::new(store.clone(), true));
    let (_, user) = login(&app, "Avery Quinn", "student").await;

    // A session whose week ran out yesterday.
    let stale = SessionRow {
        id: "stale-session".to_string(),
        user_id: user["id"].as_str().expect("user id").to_string(),
        created_at: rfc3339_days_from_now(-8),
        expires_at: rfc3339_days_from_now(-1),
    };
    store.insert_session(&stale).await.expect("insert session");

    let resp = send(
        &app,
        "GET",
        "/api/auth/user",
        Some("lifeboard_session=stale-session"),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err = body_json(resp).await;
    assert_eq!(err["error"]["code"].as_str(), Some("UNAUTHENTICATED"));

    // Rejection dropped the row on sight.
    let gone = store.get_session("stale-session").await.expect("get session");
    assert!(gone.is_none());

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn live_sessions_slide_forward_on_use() {
    let path = temp_db_path("auth-sliding-session");
    let database_url = format!("sqlite:{}", path.display());
    let store = lifeboard::db::spawn(&database_url)
        .await
        .expect("failed to open sqlite store");
    let app = api_router(AppState::new(store.clone(), true));
    let (_, user) = login(&app, "Avery Quinn", "student").await;

    // Mid-TTL session: three of the seven days left on the clock.
    let midway = rfc3339_days_from_now(3);
    let session = SessionRow {
        id: "midway-session".to_string(),
        user_id: user["id"].as_str().expect("user id").to_string(),
        created_at: rfc3339_days_from_now(-4),
        expires_at: midway.clone(),
    };
    store.insert_session(&session).await.expect("insert session");

    let resp = send(
        &app,
        "GET",
        "/api/auth/user",
        Some("lifeboard_session=midway-session"),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let touched = store
        .get_session("midway-session")
        .await
        .expect("get session")
        .expect("session row");
    // Resolution reset the expiry to a full week out, not a token bump.
    assert!(
        touched.expires_at > midway,
        "expiry did not slide: {}",
        touched.expires_at
    );
    assert!(touched.expires_at > rfc3339_days_from_now(6));

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn purge_sweeps_only_expired_sessions() {
    let path = temp_db_path("auth-purge");
    let database_url = format!("sqlite:{}", path.display());
    let store = lifeboard::db::spawn(&database_url)
        .await
        .expect("failed to open sqlite store");

    let expired = SessionRow {
        id: "expired-session".to_string(),
        user_id: "user-a".to_string(),
        created_at: rfc3339_days_from_now(-9),
        expires_at: rfc3339_days_from_now(-2),
    };
    let live = SessionRow {
        id: "live-session".to_string(),
        user_id: "user-b".to_string(),
        created_at: now_rfc3339(),
        expires_at: rfc3339_days_from_now(7),
    };
    store.insert_session(&expired).await.expect("insert expired");
    store.insert_session(&live).await.expect("insert live");

    let purged = store
        .purge_expired_sessions(&now_rfc3339())
        .await
        .expect("purge");
    assert_eq!(purged, 1);
    assert!(
        store
            .get_session("expired-session")
            .await
            .expect("get session")
            .is_none()
    );
    assert!(
        store
            .get_session("live-session")
            .await
            .expect("get session")
            .is_some()
    );

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn second_student_login_reuses_the_singleton_student() {
    let (app, db_path) = spawn_app("auth-second-student").await;

    let (_, first) = login(&app, "Avery Quinn", "student").await;
    let (_, second) = login(&app, "Sam Rivera", "student").await;
    assert_ne!(second["id"], first["id"]);
    assert_eq!(second["studentId"], first["studentId"]);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn relogin_under_the_other_role_rebinds_the_account() {
    let (app, db_path) = spawn_app("auth-role-switch").await;

    let (_, first) = login(&app, "Avery Quinn", "student").await;
    let (cookie, second) = login(&app, "Avery Quinn", "parent").await;
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["role"].as_str(), Some("parent"));

    let resp = send(&app, "GET", "/api/auth/user", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["role"].as_str(), Some("parent"));

    let _ = fs::remove_file(&db_path);
}
