//! End-to-end tests against a throwaway axum backend
//!
//! The fake backend speaks the CMS envelope format and records the
//! `Authorization` header of every request it sees.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use workdesk::client::rest::SettingsService;
use workdesk::core::auth::FileTokenStore;
use workdesk::core::error::GENERIC_FAILURE_MESSAGE;
use workdesk::prelude::*;

// ============================================================================
// Fake backend
// ============================================================================

const TOKEN: &str = "tok-1";

#[derive(Clone)]
struct Backend {
    tasks: Arc<Mutex<Vec<Value>>>,
    authorizations: Arc<Mutex<Vec<Option<String>>>>,
    announcement_calls: Arc<AtomicUsize>,
    project_task_calls: Arc<AtomicUsize>,
    login_calls: Arc<AtomicUsize>,
}

impl Backend {
    fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(vec![
                json!({"_id": "t-1", "title": "B", "status": "todo", "project": "p1"}),
                json!({"_id": "t-2", "title": "A", "status": "completed", "project": "p2"}),
                json!({"_id": "t-locked", "title": "C", "status": "todo", "project": "p1"}),
            ])),
            authorizations: Arc::new(Mutex::new(Vec::new())),
            announcement_calls: Arc::new(AtomicUsize::new(0)),
            project_task_calls: Arc::new(AtomicUsize::new(0)),
            login_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn record(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorizations.lock().unwrap().push(value);
    }

    fn last_authorization(&self) -> Option<String> {
        self.authorizations.lock().unwrap().last().cloned().flatten()
    }

    fn task_status(&self, id: &str) -> Option<String> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t["_id"] == id)
            .and_then(|t| t["status"].as_str().map(str::to_string))
    }
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({"success": true, "data": data}))
}

async fn list_tasks(State(backend): State<Backend>, headers: HeaderMap) -> Json<Value> {
    backend.record(&headers);
    let tasks = backend.tasks.lock().unwrap().clone();
    ok(Value::Array(tasks))
}

async fn list_project_tasks(
    State(backend): State<Backend>,
    Path(project_id): Path<String>,
) -> Json<Value> {
    backend.project_task_calls.fetch_add(1, Ordering::SeqCst);
    let tasks: Vec<Value> = backend
        .tasks
        .lock()
        .unwrap()
        .iter()
        .filter(|t| t["project"] == project_id.as_str())
        .cloned()
        .collect();
    ok(Value::Array(tasks))
}

async fn update_task(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    if id == "t-locked" {
        return Json(json!({"success": false, "message": "Task is locked"}));
    }
    let mut tasks = backend.tasks.lock().unwrap();
    let Some(task) = tasks.iter_mut().find(|t| t["_id"] == id.as_str()) else {
        return Json(json!({"success": false, "message": "Task not found"}));
    };
    if let (Some(task), Some(body)) = (task.as_object_mut(), body.as_object()) {
        for (key, value) in body {
            task.insert(key.clone(), value.clone());
        }
    }
    ok(task.clone())
}

async fn delete_task(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    if id == "t-2" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "Database unavailable"})),
        )
            .into_response();
    }
    backend.tasks.lock().unwrap().retain(|t| t["_id"] != id.as_str());
    Json(json!({"success": true})).into_response()
}

async fn list_announcements(State(backend): State<Backend>) -> Json<Value> {
    if backend.announcement_calls.fetch_add(1, Ordering::SeqCst) == 0 {
        ok(json!([{"_id": "a-1", "title": "Office move", "content": "<p>Friday</p>", "category": "general"}]))
    } else {
        Json(json!({"success": false, "message": "Announcements are offline"}))
    }
}

async fn list_employees() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response()
}

async fn login(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    backend.login_calls.fetch_add(1, Ordering::SeqCst);
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid credentials"})),
        )
            .into_response();
    }
    ok(json!({
        "token": TOKEN,
        "user": {"_id": "u-1", "name": "Ada", "email": body["email"], "role": "admin"},
    }))
    .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {}", TOKEN);
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Session expired"})))
            .into_response();
    }
    ok(json!({"_id": "u-1", "fullName": "Ada Lovelace", "email": "ada@example.com", "role": "admin"}))
        .into_response()
}

async fn get_settings() -> Json<Value> {
    ok(json!({"companyName": "Acme", "timezone": "Europe/Paris", "workingDays": [1, 2, 3, 4, 5]}))
}

async fn put_settings(Json(body): Json<Value>) -> Json<Value> {
    ok(body)
}

async fn start_backend(backend: Backend) -> WorkdeskConfig {
    let app = Router::new()
        .route("/api/tasks", get(list_tasks))
        .route("/api/tasks/{id}", put(update_task).delete(delete_task))
        .route("/api/projects/{project_id}/tasks", get(list_project_tasks))
        .route("/api/announcements", get(list_announcements))
        .route("/api/employees", get(list_employees))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/settings", get(get_settings).put(put_settings))
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut config = WorkdeskConfig::default();
    config.api.base_url = format!("http://{}/api", addr);
    config
}

async fn setup() -> (Backend, ApiClient) {
    let backend = Backend::new();
    let config = start_backend(backend.clone()).await;
    let client = ApiClient::new(&config, SessionContext::new()).unwrap();
    (backend, client)
}

fn task_view(client: &ApiClient) -> (ListView<Task>, Arc<NotificationCenter>) {
    let center = Arc::new(NotificationCenter::default());
    let view = ListView::new(Arc::new(RestService::<Task>::new(client.clone())), center.clone());
    (view, center)
}

fn titles(view: &ListView<Task>) -> Vec<String> {
    view.view().iter().map(|t| t.title.clone()).collect()
}

// ============================================================================
// Lists
// ============================================================================

#[tokio::test]
async fn test_load_then_sort_and_filter_locally() {
    let (backend, client) = setup().await;
    let (mut view, center) = task_view(&client);

    assert!(view.refresh().await);
    assert_eq!(view.items().len(), 3);
    assert_eq!(center.messages(), vec!["Loaded 3 tasks"]);
    assert_eq!(backend.last_authorization(), None);

    view.toggle_sort("title");
    assert_eq!(titles(&view), vec!["A", "B", "C"]);
    view.toggle_sort("title");
    assert_eq!(titles(&view), vec!["C", "B", "A"]);

    view.clear_sort();
    view.set_enum_filter("status", "done");
    assert_eq!(titles(&view), vec!["A"]);

    // filtering and sorting never hit the network
    assert_eq!(backend.authorizations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_envelope_keeps_previous_rows() {
    let (_backend, client) = setup().await;
    let center = Arc::new(NotificationCenter::default());
    let mut view = ListView::new(
        Arc::new(RestService::<Announcement>::new(client)),
        center.clone(),
    );

    assert!(view.refresh().await);
    assert!(!view.refresh().await);

    assert_eq!(view.state(), LoadState::Failed);
    assert_eq!(
        center.messages(),
        vec!["Loaded 1 announcements", "Announcements are offline"]
    );
    assert_eq!(view.items().len(), 1);
    assert_eq!(view.presentation().rows().len(), 1);
}

#[tokio::test]
async fn test_unreadable_error_body_falls_back_to_generic_message() {
    let (_backend, client) = setup().await;
    let center = Arc::new(NotificationCenter::default());
    let mut view = ListView::new(Arc::new(RestService::<Employee>::new(client)), center.clone());

    assert!(!view.refresh().await);
    match view.presentation() {
        ListPresentation::Error(message) => assert_eq!(message, GENERIC_FAILURE_MESSAGE),
        other => panic!("expected error placeholder, got {:?}", other),
    }
    assert_eq!(center.messages(), vec![GENERIC_FAILURE_MESSAGE]);
}

#[tokio::test]
async fn test_project_endpoint_waits_for_its_parameter() {
    let (backend, client) = setup().await;
    let service = RestService::<Task>::new(client)
        .with_endpoint(Endpoint::new("/projects/{project_id}/tasks"));
    let center = Arc::new(NotificationCenter::default());
    let mut view = ListView::new(Arc::new(service), center.clone());

    assert!(!view.refresh().await);
    assert_eq!(view.state(), LoadState::Idle);
    assert_eq!(backend.project_task_calls.load(Ordering::SeqCst), 0);

    view.set_param("project_id", "p1");
    assert!(view.refresh().await);
    assert_eq!(titles(&view), vec!["B", "C"]);
    assert_eq!(backend.project_task_calls.load(Ordering::SeqCst), 1);
    assert_eq!(center.messages(), vec!["Loaded 2 tasks"]);
}

#[tokio::test]
async fn test_background_refresh_is_applied_by_wait() {
    let (_backend, client) = setup().await;
    let (mut view, _) = task_view(&client);

    assert!(view.spawn_refresh());
    assert!(view.is_loading());
    assert!(view.wait().await);
    assert_eq!(view.state(), LoadState::Loaded);
    assert_eq!(view.items().len(), 3);
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_toggle_status_round_trip() {
    let (backend, client) = setup().await;
    let (mut view, center) = task_view(&client);
    view.refresh().await;
    center.drain();

    assert!(view.toggle_status(&RecordId::new("t-1")).await);
    assert_eq!(backend.task_status("t-1").as_deref(), Some("in_progress"));
    let task = view.items().iter().find(|t| t.id.as_str() == "t-1").unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);

    assert!(!view.toggle_status(&RecordId::new("t-locked")).await);
    let locked = view.items().iter().find(|t| t.id.as_str() == "t-locked").unwrap();
    assert_eq!(locked.status, TaskStatus::Todo);

    assert_eq!(center.messages(), vec!["Task updated", "Task is locked"]);
}

#[tokio::test]
async fn test_delete_failure_keeps_row() {
    let (backend, client) = setup().await;
    let (mut view, center) = task_view(&client);
    view.refresh().await;
    center.drain();

    assert!(!view.delete_row(&RecordId::new("t-2")).await);
    assert_eq!(view.items().len(), 3);

    assert!(view.delete_row(&RecordId::new("t-1")).await);
    assert_eq!(view.items().len(), 2);
    assert_eq!(backend.tasks.lock().unwrap().len(), 2);

    assert_eq!(center.messages(), vec!["Database unavailable", "Task deleted"]);
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_login_persists_token_and_authenticates_requests() {
    let (backend, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("session.json");
    let flow = AuthFlow::new(client.clone(), Arc::new(FileTokenStore::new(&token_path)));

    let session = flow
        .login(LoginForm {
            email: " Ada@Example.com ".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.token, TOKEN);
    assert_eq!(session.user.as_ref().unwrap().email, "ada@example.com");
    assert!(flow.cookie().starts_with("token=tok-1"));

    let (mut view, _) = task_view(&client);
    view.refresh().await;
    assert_eq!(backend.last_authorization().as_deref(), Some("Bearer tok-1"));

    let user = flow.current_user().await.unwrap();
    assert_eq!(user.name, "Ada Lovelace");
    assert!(user.is_admin());

    // a fresh process picks the session up from disk
    let restored = AuthFlow::new(
        ApiClient::new(&WorkdeskConfig::default(), SessionContext::new()).unwrap(),
        Arc::new(FileTokenStore::new(&token_path)),
    );
    assert!(restored.restore().unwrap());
    assert_eq!(restored.session().token().as_deref(), Some(TOKEN));

    flow.logout().unwrap();
    assert!(!flow.session().is_authenticated());
    assert!(!restored.restore().unwrap());
}

#[tokio::test]
async fn test_login_failure_reports_backend_message() {
    let (_backend, client) = setup().await;
    let flow = AuthFlow::new(client, Arc::new(MemoryTokenStore::new()));

    let err = flow
        .login(LoginForm {
            email: "ada@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!flow.session().is_authenticated());
}

#[tokio::test]
async fn test_invalid_login_form_never_reaches_backend() {
    let (backend, client) = setup().await;
    let flow = AuthFlow::new(client, Arc::new(MemoryTokenStore::new()));

    let err = flow
        .login(LoginForm {
            email: "not-an-email".to_string(),
            password: String::new(),
        })
        .await
        .unwrap_err();
    let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["email", "password"]);
    assert_eq!(backend.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expired_session_message() {
    let (_backend, client) = setup().await;
    let store = MemoryTokenStore::new();
    store
        .save(&Session {
            token: "stale".to_string(),
            user: None,
        })
        .unwrap();
    let flow = AuthFlow::new(client, Arc::new(store));
    assert!(flow.restore().unwrap());

    let err = flow.current_user().await.unwrap_err();
    assert_eq!(err.user_message(), "Session expired");
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_settings_load_and_save() {
    let (_backend, client) = setup().await;
    let service = SettingsService::new(client);

    let settings = service.load().await.unwrap();
    assert_eq!(settings.company_name, "Acme");
    assert!(settings.email_notifications);

    let mut form = SettingsForm::from(&settings);
    form.company_name = "  Acme   Corp ".to_string();
    form.working_days = vec![5, 1, 3];
    let saved = service.save(form).await.unwrap();
    assert_eq!(saved.company_name, "Acme Corp");
    assert_eq!(saved.working_days, vec![1, 3, 5]);

    let mut invalid = SettingsForm::from(&settings);
    invalid.timezone = "somewhere".to_string();
    let err = service.save(invalid).await.unwrap_err();
    assert_eq!(err.field_errors()[0].field, "timezone");
}
