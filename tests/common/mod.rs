#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use notehub::{
    AppState,
    app::router::build_router,
    config::AppConfig,
    notes::model::{Note, Tag},
};
use serde_json::{Value, json};
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const TEST_API_TOKEN: &str = "integration-test-notehub-token";
pub const TEST_SITE_URL: &str = "https://notehub.test";

/// In-process stand-in for the remote notes service.
#[derive(Default)]
pub struct MockState {
    pub notes: Mutex<Vec<Note>>,
    pub list_requests: Mutex<Vec<HashMap<String, String>>>,
    pub create_requests: Mutex<Vec<Value>>,
    pub authorization: Mutex<Vec<Option<String>>>,
    pub fail_list: AtomicBool,
    pub fail_create: AtomicBool,
    pub create_delay_ms: AtomicU64,
}

pub struct MockNotesService {
    pub state: Arc<MockState>,
    pub base_url: String,
}

impl MockNotesService {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/notes", get(mock_list_notes).post(mock_create_note))
            .route("/notes/{id}", get(mock_get_note))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock notes service");
        let addr = listener.local_addr().expect("mock service has no address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock notes service failed");
        });

        Self {
            state,
            base_url: format!("http://{addr}"),
        }
    }

    pub fn seed(&self, title: &str, content: &str, tag: Tag) -> Note {
        let mut notes = self.state.notes.lock().unwrap();
        let note = Note {
            id: format!("seed-{}", notes.len() + 1),
            title: title.to_string(),
            content: content.to_string(),
            tag,
            created_at: Some(OffsetDateTime::now_utc()),
            updated_at: Some(OffsetDateTime::now_utc()),
        };
        notes.push(note.clone());
        note
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_requests.lock().unwrap().len()
    }

    pub fn list_requests(&self) -> Vec<HashMap<String, String>> {
        self.state.list_requests.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.state.create_requests.lock().unwrap().len()
    }

    pub fn create_requests(&self) -> Vec<Value> {
        self.state.create_requests.lock().unwrap().clone()
    }

    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        self.state.authorization.lock().unwrap().clone()
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn delay_create(&self, delay: Duration) {
        self.state
            .create_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

fn record_authorization(state: &MockState, headers: &HeaderMap) {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.authorization.lock().unwrap().push(value);
}

async fn mock_list_notes(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    record_authorization(&state, &headers);
    state.list_requests.lock().unwrap().push(q.clone());
    if state.fail_list.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "list failed").into_response();
    }

    let page: usize = q.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let per_page: usize = q.get("perPage").and_then(|v| v.parse().ok()).unwrap_or(12);
    let notes: Vec<Note> = state
        .notes
        .lock()
        .unwrap()
        .iter()
        .filter(|note| q.get("tag").is_none_or(|tag| note.tag.as_str() == tag.as_str()))
        .filter(|note| {
            q.get("search")
                .is_none_or(|search| note.title.contains(search.as_str()))
        })
        .cloned()
        .collect();

    let total_pages = notes.len().div_ceil(per_page.max(1));
    let notes: Vec<Note> = notes
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Json(json!({ "notes": notes, "totalPages": total_pages })).into_response()
}

async fn mock_create_note(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_authorization(&state, &headers);
    state.create_requests.lock().unwrap().push(body.clone());

    let delay = state.create_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if state.fail_create.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "create failed").into_response();
    }

    let tag: Tag = match body["tag"].as_str().and_then(|t| t.parse().ok()) {
        Some(tag) => tag,
        None => return (StatusCode::BAD_REQUEST, "bad tag").into_response(),
    };
    let mut notes = state.notes.lock().unwrap();
    let note = Note {
        id: format!("created-{}", notes.len() + 1),
        title: body["title"].as_str().unwrap_or_default().to_string(),
        content: body["content"].as_str().unwrap_or_default().to_string(),
        tag,
        created_at: Some(OffsetDateTime::now_utc()),
        updated_at: Some(OffsetDateTime::now_utc()),
    };
    notes.push(note.clone());

    (StatusCode::CREATED, Json(note)).into_response()
}

async fn mock_get_note(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    let notes = state.notes.lock().unwrap();
    match notes.iter().find(|note| note.id == id) {
        Some(note) => Json(note.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "no such note").into_response(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response is not valid utf-8 text")
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response is not valid json")
    }

    /// Parsed body, or `Value::Null` when the body is empty or not JSON.
    pub fn json_or_null(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn location(&self) -> Option<String> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// `name=value` of the session cookie set by this response.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("notehub_session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }
}

pub struct TestApp {
    app: Router,
    pub notes_service: MockNotesService,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_notes_api_path("").await
    }

    /// App whose notes API base URL has `path` appended to the mock's address.
    pub async fn with_notes_api_path(path: &str) -> Self {
        let notes_service = MockNotesService::start().await;
        let base_url = format!("{}{path}", notes_service.base_url);
        let config = AppConfig::from_lookup(|name| match name {
            "NOTEHUB_API_URL" => Some(base_url.clone()),
            "NOTEHUB_API_TOKEN" => Some(TEST_API_TOKEN.to_string()),
            "NOTEHUB_SITE_URL" => Some(TEST_SITE_URL.to_string()),
            "NOTEHUB_API_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .expect("failed to build test config");
        let state = AppState::new(config).expect("failed to build app state");

        Self {
            app: build_router(state),
            notes_service,
        }
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, path, None, cookie).await
    }

    pub async fn get_text(&self, path: &str, cookie: Option<&str>) -> (StatusCode, String) {
        let response = self.get(path, cookie).await;
        (response.status, response.text())
    }

    pub async fn get_json(&self, path: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let response = self.get(path, cookie).await;
        (response.status, response.json_or_null())
    }

    pub async fn put_json(&self, path: &str, body: Value, cookie: Option<&str>) -> (StatusCode, Value) {
        let bytes = serde_json::to_vec(&body).expect("failed to serialize request body");
        let response = self
            .request(Method::PUT, path, Some(("application/json", bytes)), cookie)
            .await;
        (response.status, response.json_or_null())
    }

    pub async fn delete(&self, path: &str, cookie: Option<&str>) -> StatusCode {
        self.request(Method::DELETE, path, None, cookie).await.status
    }

    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> TestResponse {
        let body = form_body(fields).into_bytes();
        self.request(
            Method::POST,
            path,
            Some(("application/x-www-form-urlencoded", body)),
            cookie,
        )
        .await
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<(&str, Vec<u8>)>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut req_builder = Request::builder().method(method).uri(path);

        if let Some(cookie) = cookie {
            req_builder = req_builder.header(header::COOKIE, cookie);
        }

        let body = match body {
            Some((content_type, bytes)) => {
                req_builder = req_builder.header(header::CONTENT_TYPE, content_type);
                Body::from(bytes)
            }
            None => Body::empty(),
        };

        let req = req_builder.body(body).expect("failed to build request");
        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("request execution failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("failed to read response body");

        TestResponse {
            status,
            headers,
            body: bytes.to_vec(),
        }
    }

    /// Opens the create form and returns the session cookie it hands out.
    pub async fn start_session(&self) -> String {
        let response = self.get("/notes/action/create", None).await;
        assert_eq!(response.status, StatusCode::OK);
        response
            .session_cookie()
            .expect("create form did not start a session")
    }
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).expect("form fields encode")
}

/// The dehydrated query state embedded in a rendered filter page.
pub fn embedded_state(html: &str) -> Value {
    let marker = r#"<script id="__NOTEHUB_STATE__" type="application/json">"#;
    let start = html.find(marker).expect("page has no embedded state") + marker.len();
    let end = html[start..]
        .find("</script>")
        .expect("embedded state is not closed")
        + start;
    serde_json::from_str(&html[start..end]).expect("embedded state is not valid json")
}
