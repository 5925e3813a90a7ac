//! HTTP REST API for tasks.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderValue, StatusCode},
    routing::get,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    db::{SharedStore, TaskStore},
    error::ApiError,
    model::{Task, TaskIn},
};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Run `op` against the store on the blocking pool.
    ///
    /// The lock is taken inside the closure and released when it returns,
    /// whether `op` succeeded or not.
    async fn session<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&TaskStore) -> Result<T, ApiError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let session = store.lock();
            op(&session)
        })
        .await?
    }
}

fn task_input(payload: Result<Json<TaskIn>, JsonRejection>) -> Result<TaskIn, ApiError> {
    let Json(input) = payload?;
    input.validate().map_err(ApiError::Validation)?;
    Ok(input)
}

/// GET /tasks - List all tasks
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.session(|store| Ok(store.list()?)).await?;
    Ok(Json(tasks))
}

/// GET /tasks/{id} - Get single task
async fn get_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path(id) = id?;
    let task = state.session(move |store| store.get(id)?.ok_or(ApiError::NotFound)).await?;
    Ok(Json(task))
}

/// POST /tasks - Create a task
async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskIn>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input = task_input(payload)?;
    let task = state.session(move |store| Ok(store.create(&input)?)).await?;

    tracing::info!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /tasks/{id} - Replace a task's fields
async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskIn>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path(id) = id?;
    let input = task_input(payload)?;
    let task = state
        .session(move |store| store.update(id, &input)?.ok_or(ApiError::NotFound))
        .await?;
    Ok(Json(task))
}

/// DELETE /tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state
        .session(move |store| if store.delete(id)? { Ok(()) } else { Err(ApiError::NotFound) })
        .await?;

    tracing::info!(id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Create the HTTP router
pub fn create_router(store: SharedStore, cors_origins: Vec<HeaderValue>) -> Router {
    let state = AppState::new(store);

    // Credentials rule out `Any`, so preflight method and headers are echoed back.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(cors_origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health_check))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", get(get_task).put(update_task).delete(delete_task))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
