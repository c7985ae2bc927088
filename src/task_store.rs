use crate::task::TaskResult;
use tokio::sync::Mutex;

/// Append-only, in-memory history of task runs.
///
/// Entries are never mutated or removed after `append`; the store lives
/// exactly as long as the process. Readers see an appended entry as soon as
/// `append` returns.
pub struct TaskStore {
    results: Mutex<Vec<TaskResult>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(Vec::new()),
        }
    }

    pub async fn append(&self, result: TaskResult) {
        self.results.lock().await.push(result);
    }

    /// All results in insertion order.
    pub async fn list(&self) -> Vec<TaskResult> {
        self.results.lock().await.clone()
    }

    /// Linear scan by id. An unknown id is a reportable miss, not an error.
    pub async fn get(&self, task_id: &str) -> Option<TaskResult> {
        self.results
            .lock()
            .await
            .iter()
            .find(|r| r.task_id == task_id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.results.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.results.lock().await.is_empty()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
