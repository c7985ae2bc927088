use crate::context::AppContext;
use crate::context::clock::Clock;
use crate::error::TaskRunError;
use crate::task::TaskResult;
use crate::task_store::TaskStore;
use crate::work::WorkUnit;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Executes one task run: times the work unit, records the outcome, and
/// propagates failures.
///
/// Every invocation appends exactly one `TaskResult` to the store, on both
/// the success and the failure path. A failed run is recorded first and then
/// returned as an error, so the record and the propagated failure always
/// exist together.
pub struct TaskRunner {
    store: Arc<TaskStore>,
    work: Arc<dyn WorkUnit>,
    clock: Arc<dyn Clock>,
    /// Serializes id generation, the work itself, and the append. At most
    /// one run is in flight, so ids stay unique and append order equals
    /// completion order.
    run_lock: Mutex<()>,
}

impl TaskRunner {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            store: ctx.store(),
            work: ctx.work(),
            clock: ctx.clock(),
            run_lock: Mutex::new(()),
        }
    }

    /// Run the work unit once and record the outcome.
    ///
    /// Returns the completed `TaskResult`, or a `TaskRunError` whose message
    /// matches the `failed` record appended to the store.
    pub async fn run(&self) -> Result<TaskResult, TaskRunError> {
        let _guard = self.run_lock.lock().await;

        let task_id = format!("task_{}", self.store.len().await + 1);
        let task_start = self.clock.now();

        info!("Starting task: {task_id}");

        match self.work.perform().await {
            Ok(()) => {
                let finished = self.clock.now();
                let duration = elapsed_seconds(task_start, finished);
                let result = TaskResult::completed(task_id.clone(), finished, duration);
                self.store.append(result.clone()).await;

                info!("Task {task_id} completed successfully in {duration:.2} seconds");
                Ok(result)
            }
            Err(e) => {
                let finished = self.clock.now();
                let duration = elapsed_seconds(task_start, finished);
                let message = format!("Task failed: {e}");
                self.store
                    .append(TaskResult::failed(
                        task_id.clone(),
                        message.clone(),
                        finished,
                        duration,
                    ))
                    .await;

                error!("Task {task_id} failed: {e}");
                Err(TaskRunError::from(message))
            }
        }
    }
}

/// Span between two wall-clock instants, clamped at zero against skew.
fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds().max(0) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use crate::test_utils::{FailingWork, InstantWork};
    use std::time::Duration;

    fn runner_with_work(work: Arc<dyn WorkUnit>) -> (TaskRunner, Arc<TaskStore>) {
        let store = Arc::new(TaskStore::new());
        let ctx = AppContext::builder()
            .with_store(store.clone())
            .with_work(work)
            .build();
        (TaskRunner::new(&ctx), store)
    }

    #[tokio::test]
    async fn test_run_appends_completed_result() {
        let (runner, store) = runner_with_work(Arc::new(InstantWork));

        let result = runner.run().await.unwrap();
        assert_eq!(result.task_id, "task_1");
        assert_eq!(result.status, TaskStatus::Completed);
        assert_eq!(result.message, "Task completed successfully");
        assert!(result.duration_seconds >= 0.0);

        let stored = store.get("task_1").await.unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_sequential_runs_get_increasing_ids() {
        let (runner, store) = runner_with_work(Arc::new(InstantWork));

        runner.run().await.unwrap();
        let second = runner.run().await.unwrap();

        assert_eq!(second.task_id, "task_2");
        assert_eq!(store.len().await, 2);
        let ids: Vec<String> = store.list().await.into_iter().map(|r| r.task_id).collect();
        assert_eq!(ids, vec!["task_1", "task_2"]);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_propagated() {
        let (runner, store) = runner_with_work(Arc::new(FailingWork::new("disk on fire")));

        let err = runner.run().await.unwrap_err();
        assert_eq!(err.message, "Task failed: disk on fire");

        // The failed record and the surfaced error exist together.
        let stored = store.get("task_1").await.unwrap();
        assert_eq!(stored.status, TaskStatus::Failed);
        assert_eq!(stored.message, "Task failed: disk on fire");
        assert!(stored.duration_seconds >= 0.0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_runs() {
        let store = Arc::new(TaskStore::new());
        let failing_ctx = AppContext::builder()
            .with_store(store.clone())
            .with_work(Arc::new(FailingWork::new("boom")))
            .build();
        TaskRunner::new(&failing_ctx).run().await.unwrap_err();

        let ok_ctx = AppContext::builder()
            .with_store(store.clone())
            .with_work(Arc::new(InstantWork))
            .build();
        let result = TaskRunner::new(&ok_ctx).run().await.unwrap();

        // The id sequence keeps counting past the failed run.
        assert_eq!(result.task_id, "task_2");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_runs_produce_distinct_ids() {
        let store = Arc::new(TaskStore::new());
        let ctx = AppContext::builder()
            .with_store(store.clone())
            .with_work(Arc::new(crate::test_utils::SlowWork::new(
                Duration::from_millis(20),
            )))
            .build();
        let runner = Arc::new(TaskRunner::new(&ctx));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let runner = runner.clone();
            handles.push(tokio::spawn(async move { runner.run().await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<String> = store.list().await.into_iter().map(|r| r.task_id).collect();
        assert_eq!(ids, vec!["task_1", "task_2", "task_3", "task_4"]);
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn test_duration_reflects_work_time() {
        let store = Arc::new(TaskStore::new());
        let ctx = AppContext::builder()
            .with_store(store)
            .with_work(Arc::new(crate::test_utils::SlowWork::new(
                Duration::from_millis(50),
            )))
            .build();

        let result = TaskRunner::new(&ctx).run().await.unwrap();
        assert!(result.duration_seconds >= 0.05);
    }
}
