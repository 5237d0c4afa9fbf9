#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{json, Value};
use url::Url;

use savesync::Dashboard;
use savesync::api::client::ApiClientBuilder;
use savesync::session::TokenStore;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const TIMESTAMP: &str = "2024-05-01T12:00:00Z";
pub const MANIFEST: &[u8] = br#"{"files":["/srv/docs/a.txt"]}"#;

#[derive(Default)]
pub struct Store {
    next_id: i64,
    pub tokens: HashMap<String, i64>,
    pub users: BTreeMap<i64, Value>,
    pub sources: BTreeMap<i64, Value>,
    pub targets: BTreeMap<i64, Value>,
    pub jobs: Vec<Value>,
    pub snapshots: Vec<Value>,
    pub settings: BTreeMap<String, String>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct Backend {
    pub store: Mutex<Store>,
    hits: Mutex<BTreeMap<String, usize>>,
    pub registration_open: AtomicBool,
}

impl Backend {
    fn hit(&self, route: &str) {
        let mut hits = self.hits.lock().unwrap();

        *hits.entry(route.to_owned()).or_default() += 1;
    }

    /// number of requests seen for a route, e.g. `"GET sources/:id"`
    pub fn hits(&self, route: &str) -> usize {
        self.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }

    /// drops every issued token, any following request gets a 401
    pub fn expire_tokens(&self) {
        self.store.lock().unwrap().tokens.clear();
    }

    pub fn insert_token(&self, token: &str) {
        self.store.lock().unwrap().tokens.insert(token.to_owned(), 1);
    }

    pub fn insert_source(&self, name: &str, target_id: Option<i64>) -> i64 {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();

        store.sources.insert(id, json!({
            "id": id,
            "name": name,
            "path": format!("/srv/{}", name),
            "exclusions": [],
            "target_id": target_id,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        }));

        id
    }

    pub fn insert_target(&self, name: &str) -> i64 {
        self.insert_target_record(json!({
            "name": name,
            "type": "local",
            "config": { "path": format!("/mnt/{}", name) },
        }))
    }

    /// stores the record as given apart from the id and timestamps, so
    /// types and configs the client does not know can be served
    pub fn insert_target_record(&self, mut record: Value) -> i64 {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();

        record["id"] = json!(id);
        record["created_at"] = json!(TIMESTAMP);
        record["updated_at"] = json!(TIMESTAMP);

        store.targets.insert(id, record);

        id
    }

    pub fn insert_snapshot(&self, source_id: i64) -> i64 {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();

        store.snapshots.push(snapshot(id, source_id));

        id
    }
}

pub struct Server {
    pub backend: Arc<Backend>,
    pub url: Url,
}

impl Server {
    pub async fn start() -> Self {
        let backend = Arc::new(Backend::default());

        {
            let mut store = backend.store.lock().unwrap();
            let id = store.next_id();

            store.users.insert(id, user(id, ADMIN_EMAIL, true));
            store.settings.insert(String::from("registration_enabled"), String::from("false"));
        }

        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/me", get(whoami))
            .route("/api/sources", get(list_sources).post(create_source))
            .route(
                "/api/sources/:id",
                get(retrieve_source).put(update_source).delete(delete_source)
            )
            .route("/api/sources/:id/run", post(run_source))
            .route("/api/targets", get(list_targets).post(create_target))
            .route(
                "/api/targets/:id",
                get(retrieve_target).put(update_target).delete(delete_target)
            )
            .route("/api/jobs", get(list_jobs))
            .route("/api/snapshots", get(list_snapshots))
            .route("/api/snapshots/:id/files", get(retrieve_files))
            .route("/api/snapshots/:id/manifest", get(manifest))
            .route("/api/snapshots/:id/restore", post(restore))
            .route("/api/users", get(list_users))
            .route("/api/users/:id", axum::routing::delete(delete_user))
            .route("/api/settings", get(retrieve_settings).put(update_setting))
            .route("/api/system/files", get(list_directory))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Server {
            backend,
            url: Url::parse(&format!("http://{}/api/", addr)).unwrap(),
        }
    }

    pub fn dashboard(&self, store: Arc<dyn TokenStore>) -> Dashboard {
        let mut builder = ApiClientBuilder::default();
        builder.url(self.url.clone());

        Dashboard::new(builder, store).unwrap()
    }
}

pub fn user(id: i64, email: &str, is_admin: bool) -> Value {
    json!({
        "id": id,
        "email": email,
        "is_admin": is_admin,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

fn snapshot(id: i64, source_id: i64) -> Value {
    json!({
        "id": id,
        "source_id": source_id,
        "target_id": 1,
        "status": "pending",
        "created_at": TIMESTAMP,
    })
}

fn data<T>(status: StatusCode, value: T) -> Response
where
    T: serde::Serialize
{
    (status, Json(json!({ "data": value }))).into_response()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message } }))).into_response()
}

fn authorized(backend: &Backend, headers: &HeaderMap) -> Result<i64, Response> {
    let token = headers.get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let store = backend.store.lock().unwrap();

    match token.and_then(|t| store.tokens.get(t)) {
        Some(user_id) => Ok(*user_id),
        None => Err(error(StatusCode::UNAUTHORIZED, "invalid or expired token")),
    }
}

macro_rules! check_auth {
    ($backend:expr, $headers:expr) => {
        match authorized(&$backend, &$headers) {
            Ok(id) => id,
            Err(res) => return res,
        }
    };
}

async fn login(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    backend.hit("POST auth/login");

    if body["email"] != ADMIN_EMAIL || body["password"] != ADMIN_PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "invalid credentials");
    }

    let mut store = backend.store.lock().unwrap();
    let token = format!("tok-{}", store.next_id());

    store.tokens.insert(token.clone(), 1);

    let admin = store.users[&1].clone();

    data(StatusCode::OK, json!({ "token": token, "user": admin }))
}

async fn register(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    backend.hit("POST auth/register");

    if !backend.registration_open.load(Ordering::SeqCst) {
        return error(StatusCode::FORBIDDEN, "registration is disabled");
    }

    let mut store = backend.store.lock().unwrap();
    let id = store.next_id();
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    let token = format!("tok-{}", id);
    let created = user(id, &email, false);

    store.users.insert(id, created.clone());
    store.tokens.insert(token.clone(), id);

    data(StatusCode::CREATED, json!({ "token": token, "user": created }))
}

async fn whoami(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.hit("GET auth/me");

    let user_id = check_auth!(backend, headers);
    let store = backend.store.lock().unwrap();

    data(StatusCode::OK, store.users[&user_id].clone())
}

async fn list_sources(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.hit("GET sources");

    check_auth!(backend, headers);

    let store = backend.store.lock().unwrap();
    let list: Vec<Value> = store.sources.values().cloned().collect();

    data(StatusCode::OK, list)
}

async fn create_source(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    backend.hit("POST sources");

    check_auth!(backend, headers);

    let mut store = backend.store.lock().unwrap();
    let id = store.next_id();

    body["id"] = json!(id);
    body["created_at"] = json!(TIMESTAMP);
    body["updated_at"] = json!(TIMESTAMP);

    store.sources.insert(id, body.clone());

    data(StatusCode::CREATED, body)
}

async fn retrieve_source(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("GET sources/:id");

    check_auth!(backend, headers);

    // keeps the request open long enough for concurrent readers to overlap
    tokio::time::sleep(std::time::Duration::from_millis(25)).await;

    let store = backend.store.lock().unwrap();

    match store.sources.get(&id) {
        Some(found) => data(StatusCode::OK, found.clone()),
        None => error(StatusCode::NOT_FOUND, "source not found"),
    }
}

async fn update_source(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    backend.hit("PUT sources/:id");

    check_auth!(backend, headers);

    let mut store = backend.store.lock().unwrap();

    if store.sources.values().any(|s| s["id"] != id && s["name"] == body["name"]) {
        return error(StatusCode::CONFLICT, "a source with that name already exists");
    }

    let Some(found) = store.sources.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "source not found");
    };

    for key in ["name", "path", "exclusions", "target_id", "schedule_id"] {
        if let Some(value) = body.get(key) {
            found[key] = value.clone();
        }
    }

    data(StatusCode::OK, found.clone())
}

async fn delete_source(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("DELETE sources/:id");

    check_auth!(backend, headers);

    match backend.store.lock().unwrap().sources.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error(StatusCode::NOT_FOUND, "source not found"),
    }
}

async fn run_source(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("POST sources/:id/run");

    check_auth!(backend, headers);

    let mut store = backend.store.lock().unwrap();

    if !store.sources.contains_key(&id) {
        return error(StatusCode::NOT_FOUND, "source not found");
    }

    let job_id = store.next_id();
    let snapshot_id = store.next_id();

    store.jobs.push(json!({
        "id": job_id,
        "type": "backup",
        "source_id": id,
        "snapshot_id": snapshot_id,
        "status": "running",
        "started_at": TIMESTAMP,
    }));
    store.snapshots.push(snapshot(snapshot_id, id));

    data(StatusCode::ACCEPTED, json!({ "job_id": job_id, "status": "pending" }))
}

async fn list_targets(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.hit("GET targets");

    check_auth!(backend, headers);

    let list: Vec<Value> = backend.store.lock().unwrap().targets.values().cloned().collect();

    data(StatusCode::OK, list)
}

async fn create_target(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.hit("POST targets");

    check_auth!(backend, headers);

    let id = backend.insert_target_record(body);
    let created = backend.store.lock().unwrap().targets[&id].clone();

    data(StatusCode::CREATED, created)
}

async fn update_target(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    backend.hit("PUT targets/:id");

    check_auth!(backend, headers);

    let mut store = backend.store.lock().unwrap();

    let Some(found) = store.targets.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "target not found");
    };

    for key in ["name", "type", "config"] {
        if let Some(value) = body.get(key) {
            found[key] = value.clone();
        }
    }

    data(StatusCode::OK, found.clone())
}

async fn delete_target(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("DELETE targets/:id");

    check_auth!(backend, headers);

    match backend.store.lock().unwrap().targets.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error(StatusCode::NOT_FOUND, "target not found"),
    }
}

async fn retrieve_target(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("GET targets/:id");

    check_auth!(backend, headers);

    match backend.store.lock().unwrap().targets.get(&id) {
        Some(found) => data(StatusCode::OK, found.clone()),
        None => error(StatusCode::NOT_FOUND, "target not found"),
    }
}

async fn list_jobs(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.hit("GET jobs");

    check_auth!(backend, headers);

    data(StatusCode::OK, backend.store.lock().unwrap().jobs.clone())
}

async fn list_snapshots(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.hit("GET snapshots");

    check_auth!(backend, headers);

    data(StatusCode::OK, backend.store.lock().unwrap().snapshots.clone())
}

async fn retrieve_files(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("GET snapshots/:id/files");

    check_auth!(backend, headers);

    tokio::time::sleep(std::time::Duration::from_millis(25)).await;

    data(StatusCode::OK, json!({
        "name": format!("snapshot-{}", id),
        "path": "/",
        "is_dir": true,
        "children": [
            {
                "name": "docs",
                "path": "/docs",
                "is_dir": true,
                "children": [
                    { "name": "a.txt", "path": "/docs/a.txt", "is_dir": false, "size": 1536 },
                ],
            },
            { "name": "notes.md", "path": "/notes.md", "is_dir": false, "size": 12 },
        ],
    }))
}

async fn manifest(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("GET snapshots/:id/manifest");

    check_auth!(backend, headers);

    let disposition = format!("attachment; filename=\"manifest-{}.json\"", id);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, String::from("application/octet-stream")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        MANIFEST,
    ).into_response()
}

async fn restore(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("POST snapshots/:id/restore");

    check_auth!(backend, headers);

    let mut store = backend.store.lock().unwrap();
    let job_id = store.next_id();

    store.jobs.push(json!({
        "id": job_id,
        "type": "restore",
        "snapshot_id": id,
        "status": "pending",
        "started_at": TIMESTAMP,
    }));

    StatusCode::ACCEPTED.into_response()
}

async fn list_users(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.hit("GET users");

    check_auth!(backend, headers);

    let list: Vec<Value> = backend.store.lock().unwrap().users.values().cloned().collect();

    data(StatusCode::OK, list)
}

async fn delete_user(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.hit("DELETE users/:id");

    check_auth!(backend, headers);

    backend.store.lock().unwrap().users.remove(&id);

    StatusCode::NO_CONTENT.into_response()
}

async fn retrieve_settings(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.hit("GET settings");

    check_auth!(backend, headers);

    data(StatusCode::OK, backend.store.lock().unwrap().settings.clone())
}

async fn update_setting(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.hit("PUT settings");

    check_auth!(backend, headers);

    let (Some(key), Some(value)) = (body["key"].as_str(), body["value"].as_str()) else {
        return error(StatusCode::BAD_REQUEST, "key and value are required");
    };

    if key == "registration_enabled" {
        backend.registration_open.store(value == "true", Ordering::SeqCst);
    }

    backend.store.lock().unwrap().settings.insert(key.to_owned(), value.to_owned());

    StatusCode::NO_CONTENT.into_response()
}

/// answers with a plain text body like a proxy in front of the backend would
async fn list_directory(State(backend): State<Arc<Backend>>) -> Response {
    backend.hit("GET system/files");

    (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
}
