use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::FormRejection, Form, Path, State},
    http::StatusCode,
    response::Html,
    routing::{delete, get, patch, post},
    Router,
};
use serde::Deserialize;
use tokio::net;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::adapters::render::Templates;
use crate::config::TlsPaths;
use crate::core::{TodoError, TodoService};
use crate::storage::TodoRepository;
use crate::transport::{configure_tls, shutdown_signal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig {
    pub bind_addr: SocketAddr,
    pub public_dir: PathBuf,
    pub tls: Option<TlsPaths>,
}

pub struct AppState<R: TodoRepository> {
    pub todo_service: Arc<TodoService<R>>,
    pub templates: Arc<Templates>,
}

impl<R: TodoRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            todo_service: self.todo_service.clone(),
            templates: self.templates.clone(),
        }
    }
}

impl<R: TodoRepository> AppState<R> {
    pub fn new(todo_service: TodoService<R>, templates: Templates) -> Self {
        Self {
            todo_service: Arc::new(todo_service),
            templates: Arc::new(templates),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct TaskNameForm {
    #[serde(rename = "taskName", default)]
    pub task_name: String,
}

#[derive(Deserialize, Default)]
pub struct CompletedForm {
    #[serde(default)]
    pub completed: String,
}

/// An unreadable body (no form content type, bad encoding) counts as an empty
/// form so the request still goes through service validation.
fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Treating unreadable form body as empty");
            T::default()
        }
    }
}

pub async fn home_page<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
) -> Result<Html<String>, TodoError> {
    let todos = state.todo_service.list_todos().await;
    Ok(Html(state.templates.render_page(&todos)?))
}

pub async fn add_todo<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
    form: Result<Form<TaskNameForm>, FormRejection>,
) -> Result<Html<String>, TodoError> {
    let form = form_or_default(form);
    let todo = state.todo_service.add_todo(&form.task_name).await?;
    tracing::info!(id = %todo.id, "Todo added");
    Ok(Html(state.templates.render_todo(&todo)?))
}

pub async fn update_completed<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    form: Result<Form<CompletedForm>, FormRejection>,
) -> Result<Html<String>, TodoError> {
    let completed = form_or_default(form).completed == "true";
    let todo = state.todo_service.set_completed(&id, completed).await?;
    Ok(Html(state.templates.render_todo(&todo)?))
}

pub async fn update_task_name<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    form: Result<Form<TaskNameForm>, FormRejection>,
) -> Result<Html<String>, TodoError> {
    let form = form_or_default(form);
    let todo = state.todo_service.rename_todo(&id, &form.task_name).await?;
    Ok(Html(state.templates.render_todo(&todo)?))
}

pub async fn delete_todo<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Html<&'static str>, TodoError> {
    let removed = state.todo_service.delete_todo(&id).await?;
    tracing::info!(id = %id, removed, "Todo delete handled");
    Ok(Html(""))
}

async fn health_route() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

fn todo_routes<R: TodoRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/add", post(add_todo::<R>))
        .route("/update-completed/{id}", patch(update_completed::<R>))
        .route("/update-taskname/{id}", patch(update_task_name::<R>))
        .route("/delete/{id}", delete(delete_todo::<R>))
}

/// Full application router: pages, htmx fragments, health and static files.
pub fn router<R: TodoRepository + 'static>(state: AppState<R>, public_dir: PathBuf) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        });

    Router::new()
        .route("/", get(home_page::<R>))
        .route("/health", get(health_route))
        .nest("/todo", todo_routes::<R>())
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(trace_layer)
        .with_state(state)
}

pub struct HttpServer {
    router: Router,
    config: HttpServerConfig,
}

impl HttpServer {
    pub fn new<R: TodoRepository + 'static>(state: AppState<R>, config: HttpServerConfig) -> Self {
        let router = router(state, config.public_dir.clone());
        Self { router, config }
    }

    /// Serves until ctrl-c, over TLS when certificate paths are configured.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.bind_addr;
        match &self.config.tls {
            Some(paths) => {
                let tls = configure_tls(paths.cert.clone(), paths.key.clone()).await?;
                let handle = axum_server::Handle::new();
                tokio::spawn({
                    let handle = handle.clone();
                    async move {
                        shutdown_signal().await;
                        handle.graceful_shutdown(None);
                    }
                });
                tracing::info!(addr = %addr, "Listening over TLS");
                axum_server::bind_rustls(addr, tls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await
                    .context("received error from running TLS server")?;
            }
            None => {
                let listener = net::TcpListener::bind(addr)
                    .await
                    .with_context(|| format!("failed to listen on {}", addr))?;
                tracing::info!(addr = %addr, "Listening");
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(shutdown_signal())
                    .await
                    .context("received error from running server")?;
            }
        }
        Ok(())
    }
}
