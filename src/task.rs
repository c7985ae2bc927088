use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
}

/// Record of one task run. Immutable once appended to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// Sequential identifier, `task_<n>`, unique within the process lifetime.
    pub task_id: String,
    pub status: TaskStatus,
    /// Outcome description; failure messages embed the underlying error text.
    pub message: String,
    /// Completion time (success or failure).
    pub timestamp: DateTime<Utc>,
    /// Wall-clock span between run start and completion, never negative.
    pub duration_seconds: f64,
}

impl TaskResult {
    pub fn completed(task_id: String, timestamp: DateTime<Utc>, duration_seconds: f64) -> Self {
        Self {
            task_id,
            status: TaskStatus::Completed,
            message: "Task completed successfully".to_string(),
            timestamp,
            duration_seconds,
        }
    }

    pub fn failed(
        task_id: String,
        message: String,
        timestamp: DateTime<Utc>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            task_id,
            status: TaskStatus::Failed,
            message,
            timestamp,
            duration_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = TaskResult::completed("task_1".to_string(), Utc::now(), 1.5);
        let json = serde_json::to_string(&result).unwrap();
        let parsed: TaskResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.task_id, "task_1");
        assert_eq!(parsed.status, TaskStatus::Completed);
        assert_eq!(parsed.duration_seconds, 1.5);
    }
}
