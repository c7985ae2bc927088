use crate::context::AppContext;
use crate::task_runner::TaskRunner;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::time::sleep;
use tracing::{error, info};

/// Phases of the scheduled-run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Initializing,
    AwaitingAutoRun,
    Running,
    Completed,
    ShuttingDown,
    Failed,
}

/// Why the server stopped serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Graceful stop: successful auto-run plus flush delay, or an interrupt.
    Clean,
    /// The scheduled auto-run failed; the process must exit non-zero.
    AutoRunFailure,
}

/// Drives the startup sequence: warm-up delay, one automatic task run, and
/// the optional self-shutdown afterwards.
///
/// Auto-run failure is the only path where a task failure becomes fatal.
/// Manual runs through the HTTP surface report their error to the caller
/// and leave the process serving.
pub struct LifecycleController {
    runner: Arc<TaskRunner>,
    phase: Mutex<LifecyclePhase>,
    shutdown_tx: watch::Sender<Option<ExitReason>>,
    auto_run: bool,
    warmup_delay: Duration,
    flush_delay: Duration,
    exit_after_run: bool,
}

impl LifecycleController {
    pub fn new(
        ctx: &AppContext,
        runner: Arc<TaskRunner>,
        shutdown_tx: watch::Sender<Option<ExitReason>>,
    ) -> Self {
        let runner_config = &ctx.config().runner;
        Self {
            runner,
            phase: Mutex::new(LifecyclePhase::Initializing),
            shutdown_tx,
            auto_run: runner_config.auto_run,
            warmup_delay: Duration::from_secs(runner_config.warmup_delay_secs),
            flush_delay: Duration::from_secs(runner_config.flush_delay_secs),
            exit_after_run: runner_config.exit_after_run,
        }
    }

    pub async fn phase(&self) -> LifecyclePhase {
        *self.phase.lock().await
    }

    async fn set_phase(&self, phase: LifecyclePhase) {
        *self.phase.lock().await = phase;
    }

    /// Ask the hosting server to stop accepting requests and drain.
    pub fn request_shutdown(&self, reason: ExitReason) {
        let _ = self.shutdown_tx.send(Some(reason));
    }

    /// Run the startup sequence to completion.
    ///
    /// Called once after the listener has bound. Does nothing when auto-run
    /// is disabled; the server then stays up until interrupted.
    pub async fn drive(&self) {
        if !self.auto_run {
            info!("Auto-run disabled, serving until interrupted");
            self.set_phase(LifecyclePhase::Running).await;
            return;
        }

        self.set_phase(LifecyclePhase::AwaitingAutoRun).await;
        sleep(self.warmup_delay).await;

        self.set_phase(LifecyclePhase::Running).await;
        info!("Auto-executing main task");

        match self.runner.run().await {
            Ok(result) => {
                self.set_phase(LifecyclePhase::Completed).await;

                if self.exit_after_run {
                    info!(
                        "Main task {} completed, scheduling shutdown...",
                        result.task_id
                    );
                    sleep(self.flush_delay).await;
                    self.set_phase(LifecyclePhase::ShuttingDown).await;
                    self.request_shutdown(ExitReason::Clean);
                }
            }
            Err(e) => {
                error!("Auto-task execution failed: {}", e.message);
                self.set_phase(LifecyclePhase::Failed).await;
                self.request_shutdown(ExitReason::AutoRunFailure);
            }
        }
    }
}
