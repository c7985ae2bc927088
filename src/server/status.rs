use crate::context::AppContext;
use crate::context::clock::Clock;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Health check payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
}

/// Root endpoint payload.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub message: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub uptime_seconds: f64,
}

/// Derives uptime and health from the fixed process start time.
///
/// Purely read-only and independent of task execution; it has no failure
/// modes.
pub struct StatusReporter {
    start_time: DateTime<Utc>,
    clock: Arc<dyn Clock>,
}

impl StatusReporter {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            start_time: ctx.start_time(),
            clock: ctx.clock(),
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        (self.clock.now() - self.start_time)
            .num_milliseconds()
            .max(0) as f64
            / 1000.0
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            timestamp: self.clock.now(),
            uptime_seconds: self.uptime_seconds(),
        }
    }

    pub fn service_status(&self) -> ServiceStatus {
        ServiceStatus {
            message: "Runbeat Scheduled Runner".to_string(),
            status: "running".to_string(),
            start_time: self.start_time,
            uptime_seconds: self.uptime_seconds(),
        }
    }
}
