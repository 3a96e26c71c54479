#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use machines_backend::db::models::{Machine, MachineId, NewMachine};
use machines_backend::db::repositories::LocalRepository;
use machines_backend::db::repository::{MachineRepository, RepositoryError, RepositoryResult};
use machines_backend::http::{create_router, AppState};
use machines_backend::templates::{self, Templates};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Pages used by the HTTP tests.
pub fn test_templates() -> Templates {
    Templates::from_pages([
        (templates::INDEX, "<h1>home</h1>"),
        (templates::CREATE_MACHINE, "<h1>create</h1>"),
        (templates::UPDATE_MACHINE, "<h1>update</h1>"),
    ])
}

/// Router over an in-memory repository the caller can inspect.
pub fn test_app() -> (Router, LocalRepository) {
    let repo = LocalRepository::new();
    let state = AppState::new(Arc::new(repo.clone()), test_templates());
    (create_router(state), repo)
}

pub fn app_with(repository: Arc<dyn MachineRepository>, templates: Templates) -> Router {
    create_router(AppState::new(repository, templates))
}

pub fn lathe_json() -> &'static str {
    r#"{"name":"Lathe","brand":"Acme","description":"CNC lathe","serial_number":123456,"installation_location":"Bay 3"}"#
}

pub async fn send(app: &Router, method: Method, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn post_json(app: &Router, uri: &str, json: &str) -> Response<Body> {
    send(app, Method::POST, uri, json.to_string()).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn status_and_text(response: Response<Body>) -> (StatusCode, String) {
    let status = response.status();
    (status, body_text(response).await)
}

/// Repository whose insert always fails with a fixed error kind.
pub struct FailingRepository {
    pub kind: FailureKind,
}

#[derive(Debug, Clone, Copy)]
pub enum FailureKind {
    Connection,
    Statement,
    Query,
    GeneratedId,
}

impl FailingRepository {
    pub fn new(kind: FailureKind) -> Self {
        Self { kind }
    }

    fn error(&self) -> RepositoryError {
        match self.kind {
            FailureKind::Connection => RepositoryError::connection("connection refused"),
            FailureKind::Statement => RepositoryError::statement("could not bind"),
            FailureKind::Query => RepositoryError::query("relation \"machines\" does not exist"),
            FailureKind::GeneratedId => RepositoryError::generated_id_with_context(
                "insert returned no id",
                Default::default(),
            ),
        }
    }
}

#[async_trait]
impl MachineRepository for FailingRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Err(self.error())
    }

    async fn insert_machine(&self, _machine: &NewMachine) -> RepositoryResult<MachineId> {
        Err(self.error())
    }

    async fn list_machines(&self) -> RepositoryResult<Vec<Machine>> {
        Err(self.error())
    }

    async fn get_machine(&self, _id: MachineId) -> RepositoryResult<Machine> {
        Err(self.error())
    }
}
