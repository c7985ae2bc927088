pub mod clock;

use crate::config::RunbeatConfig;
use crate::task_store::TaskStore;
use crate::work::{SimulatedWork, WorkUnit};
use chrono::{DateTime, Utc};
use clock::{Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Shared application wiring: clock, work unit, result store, and config.
///
/// Built once at startup and cloned into whatever needs it. The builder
/// exists so tests can substitute the clock or the work unit.
#[derive(Clone)]
pub struct AppContext {
    clock: Arc<dyn Clock>,
    work: Arc<dyn WorkUnit>,
    store: Arc<TaskStore>,
    config: Arc<RunbeatConfig>,
    start_time: DateTime<Utc>,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn work(&self) -> Arc<dyn WorkUnit> {
        Arc::clone(&self.work)
    }

    pub fn store(&self) -> Arc<TaskStore> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &RunbeatConfig {
        &self.config
    }

    /// Process start time, fixed when the context is built.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

pub struct AppContextBuilder {
    clock: Option<Arc<dyn Clock>>,
    work: Option<Arc<dyn WorkUnit>>,
    store: Option<Arc<TaskStore>>,
    config: Option<RunbeatConfig>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self {
            clock: None,
            work: None,
            store: None,
            config: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_work(mut self, work: Arc<dyn WorkUnit>) -> Self {
        self.work = Some(work);
        self
    }

    pub fn with_store(mut self, store: Arc<TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_config(mut self, config: RunbeatConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> AppContext {
        let config = Arc::new(self.config.unwrap_or_default());
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let start_time = clock.now();

        AppContext {
            work: self.work.unwrap_or_else(|| {
                Arc::new(SimulatedWork::new(Duration::from_millis(
                    config.runner.step_unit_ms,
                )))
            }),
            store: self.store.unwrap_or_else(|| Arc::new(TaskStore::new())),
            clock,
            config,
            start_time,
        }
    }
}

impl Default for AppContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
