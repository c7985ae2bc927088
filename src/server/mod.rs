pub mod lifecycle;
pub mod status;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::task::TaskResult;
use crate::task_runner::TaskRunner;
use crate::task_store::TaskStore;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use lifecycle::{ExitReason, LifecycleController};
use status::{HealthResponse, ServiceStatus, StatusReporter};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

#[derive(Clone)]
struct ApiState {
    runner: Arc<TaskRunner>,
    store: Arc<TaskStore>,
    reporter: Arc<StatusReporter>,
}

/// The HTTP status/history server hosting the task lifecycle.
pub struct ApiServer {
    ctx: AppContext,
}

impl ApiServer {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Bind the configured address and serve until shutdown is requested.
    pub async fn serve(self) -> anyhow::Result<ExitReason> {
        let server_config = &self.ctx.config().server;
        let addr = format!("{}:{}", server_config.host, server_config.port);
        let listener = TcpListener::bind(&addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already-bound listener.
    ///
    /// Returns once the lifecycle controller requests shutdown (after the
    /// auto-run) or on Ctrl-C, with the reason the process should exit.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<ExitReason> {
        let runner = Arc::new(TaskRunner::new(&self.ctx));
        let reporter = Arc::new(StatusReporter::new(&self.ctx));
        let state = ApiState {
            runner: runner.clone(),
            store: self.ctx.store(),
            reporter: reporter.clone(),
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(None::<ExitReason>);
        let controller = Arc::new(LifecycleController::new(&self.ctx, runner, shutdown_tx));

        let local_addr = listener.local_addr()?;
        info!("Runbeat listening on http://{local_addr}");
        info!("Application started at: {}", self.ctx.start_time());

        // The listener is bound, so the warm-up delay only has to cover the
        // serve loop spinning up.
        let driver = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.drive().await })
        };

        let mut wait_rx = shutdown_rx.clone();
        let shutdown = async move {
            tokio::select! {
                _ = wait_rx.wait_for(|reason| reason.is_some()) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, shutting down");
                }
            }
        };

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown)
            .await?;

        // On an interrupt the driver may still be mid-delay or mid-run; the
        // in-flight run is abandoned without a record.
        driver.abort();

        let reason = (*shutdown_rx.borrow()).unwrap_or(ExitReason::Clean);
        info!("Total uptime: {:.2} seconds", reporter.uptime_seconds());
        Ok(reason)
    }
}

fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/run-task", post(run_task))
        .route("/tasks", get(list_tasks))
        .route("/tasks/{task_id}", get(get_task))
        .with_state(state)
}

async fn root(State(state): State<ApiState>) -> Json<ServiceStatus> {
    Json(state.reporter.service_status())
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(state.reporter.health())
}

/// Trigger a task run on demand. Failures surface as a 500 with the same
/// message the store records; they never terminate the process.
async fn run_task(State(state): State<ApiState>) -> Result<Json<TaskResult>, ApiError> {
    let result = state.runner.run().await?;
    Ok(Json(result))
}

async fn list_tasks(State(state): State<ApiState>) -> Json<Vec<TaskResult>> {
    Json(state.store.list().await)
}

async fn get_task(
    State(state): State<ApiState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResult>, ApiError> {
    state
        .store
        .get(&task_id)
        .await
        .map(Json)
        .ok_or(ApiError::TaskNotFound)
}
