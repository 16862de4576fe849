// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_finder::config::Config;
use activity_finder::middleware::session::SESSION_COOKIE;
use activity_finder::models::Activity;
use activity_finder::routes::create_router;
use activity_finder::services::{ActivitiesClient, SearchService, SessionStore};
use activity_finder::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// One request as seen by the fake backend.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct BackendRequest {
    pub keyword: String,
    pub offset: usize,
    pub count: usize,
}

#[derive(Default)]
struct BackendState {
    records: Vec<Activity>,
    hits: AtomicUsize,
    fail: AtomicBool,
    requests: Mutex<Vec<BackendRequest>>,
    /// Responses for this keyword are delayed
    slow_keyword: Option<String>,
    delay: Duration,
}

/// In-process stand-in for the activities backend.
///
/// Matches keywords case-insensitively against id, summary, project and
/// user, then applies offset/count.
#[derive(Clone)]
pub struct FakeBackend {
    pub url: String,
    state: Arc<BackendState>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<BackendRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }
}

#[derive(Deserialize)]
struct ActivitiesParams {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    offset: usize,
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    100
}

async fn list_activities(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<ActivitiesParams>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(BackendRequest {
        keyword: params.keyword.clone(),
        offset: params.offset,
        count: params.count,
    });

    if state.slow_keyword.as_deref() == Some(params.keyword.as_str()) {
        tokio::time::sleep(state.delay).await;
    }

    if state.fail.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "backend down").into_response();
    }

    let needle = params.keyword.to_lowercase();
    let matches: Vec<&Activity> = state
        .records
        .iter()
        .filter(|a| {
            needle.is_empty()
                || [
                    a.id.to_string(),
                    a.summary.clone().unwrap_or_default(),
                    a.project_name.clone(),
                    a.user_name.clone(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect();

    let page: Vec<Activity> = matches
        .into_iter()
        .skip(params.offset)
        .take(params.count)
        .cloned()
        .collect();

    Json(page).into_response()
}

/// Start a fake backend serving `records`.
#[allow(dead_code)]
pub async fn spawn_backend(records: Vec<Activity>) -> FakeBackend {
    start_backend(BackendState {
        records,
        ..Default::default()
    })
    .await
}

/// Start a fake backend that answers `slow_keyword` searches after `delay`.
#[allow(dead_code)]
pub async fn spawn_slow_backend(
    records: Vec<Activity>,
    slow_keyword: &str,
    delay: Duration,
) -> FakeBackend {
    start_backend(BackendState {
        records,
        slow_keyword: Some(slow_keyword.to_string()),
        delay,
        ..Default::default()
    })
    .await
}

async fn start_backend(state: BackendState) -> FakeBackend {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/activities", get(list_activities))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeBackend {
        url: format!("http://{addr}"),
        state,
    }
}

/// Build an activity with a predictable summary.
#[allow(dead_code)]
pub fn activity(id: u64, project: &str, summary: &str) -> Activity {
    Activity {
        id,
        project_name: project.to_string(),
        summary: Some(summary.to_string()),
        user_name: "tester".to_string(),
        activity_type: 2,
        type_label: Some("Issue updated".to_string()),
        created: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
    }
}

/// `count` activities with ids starting at `first`, all mentioning `word`.
#[allow(dead_code)]
pub fn activities(first: u64, count: u64, word: &str) -> Vec<Activity> {
    (first..first + count)
        .map(|id| activity(id, "Project", &format!("{word} #{id}")))
        .collect()
}

/// Create a test app talking to the given backend.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(backend: &FakeBackend) -> (Router, Arc<AppState>) {
    let config = Config {
        activities_api_url: backend.url.clone(),
        fetch_timeout_secs: 5,
        ..Config::default()
    };

    let client = ActivitiesClient::new(config.activities_api_url.clone(), config.fetch_timeout())
        .expect("Failed to build client");
    let sessions = Arc::new(SessionStore::new(config.session_idle_ttl()));

    let state = Arc::new(AppState {
        config,
        search: SearchService::new(client, sessions),
    });

    (create_router(state.clone()), state)
}

/// Send one request through the router.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// The `name=value` pair of the session cookie set by a response.
#[allow(dead_code)]
pub fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .find(|value| value.starts_with(&format!("{SESSION_COOKIE}=")))
        .and_then(|value| value.split(';').next().map(str::to_string))
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {SESSION_COOKIE}"))
}

/// Open a session and return its cookie.
#[allow(dead_code)]
pub async fn open_session(app: &Router) -> String {
    let response = send(
        app,
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

/// POST a urlencoded form with the session cookie.
#[allow(dead_code)]
pub async fn post_form(app: &Router, cookie: &str, uri: &str, body: &str) -> Response {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Submit a keyword search.
#[allow(dead_code)]
pub async fn search(app: &Router, cookie: &str, keyword: &str) {
    let body = format!("keyword={}", urlencoding::encode(keyword));
    let response = post_form(app, cookie, "/search", &body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

/// Navigate to a page.
#[allow(dead_code)]
pub async fn goto_page(app: &Router, cookie: &str, page: usize) {
    let response = post_form(app, cookie, "/page", &format!("page={page}")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

/// Toggle a favorite.
#[allow(dead_code)]
pub async fn toggle_favorite(app: &Router, cookie: &str, id: u64) {
    let response = post_form(app, cookie, &format!("/favorites/{id}"), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

/// Fetch the JSON view for a session.
#[allow(dead_code)]
pub async fn view(app: &Router, cookie: &str) -> serde_json::Value {
    let response = send(
        app,
        Request::builder()
            .uri("/api/view")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Fetch the rendered HTML page for a session.
#[allow(dead_code)]
pub async fn page_html(app: &Router, cookie: &str) -> String {
    let response = send(
        app,
        Request::builder()
            .uri("/")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Ids of the result rows in a JSON view.
#[allow(dead_code)]
pub fn result_ids(view: &serde_json::Value) -> Vec<u64> {
    view["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_u64().unwrap())
        .collect()
}

/// Ids of the favorite rows in a JSON view, across project groups.
#[allow(dead_code)]
pub fn favorite_row_ids(view: &serde_json::Value) -> Vec<u64> {
    view["favorite_groups"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|group| group["rows"].as_array().unwrap().iter())
        .map(|row| row["id"].as_u64().unwrap())
        .collect()
}
