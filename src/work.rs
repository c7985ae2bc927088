use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// The unit of work a task run performs.
///
/// The runner only observes completes-or-fails; everything else (steps,
/// timing, side effects) is internal to the implementation.
#[async_trait::async_trait]
pub trait WorkUnit: Send + Sync {
    async fn perform(&self) -> anyhow::Result<()>;
}

/// Default work unit: a fixed sequence of named maintenance steps, each
/// sleeping its weight times `step_unit` to stand in for real work.
pub struct SimulatedWork {
    step_unit: Duration,
}

const STEPS: &[(&str, u32)] = &[
    ("Database cleanup", 2),
    ("Data processing", 5),
    ("Report generation", 3),
    ("Email notifications", 1),
    ("File maintenance", 2),
];

impl SimulatedWork {
    pub fn new(step_unit: Duration) -> Self {
        Self { step_unit }
    }
}

#[async_trait::async_trait]
impl WorkUnit for SimulatedWork {
    async fn perform(&self) -> anyhow::Result<()> {
        info!("Performing automation work...");

        for (name, weight) in STEPS {
            info!("Executing: {name}");
            sleep(self.step_unit * *weight).await;
            info!("Completed: {name}");
        }

        info!("All automation work completed");
        Ok(())
    }
}
