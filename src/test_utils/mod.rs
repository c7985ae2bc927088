//! Test utilities for runbeat tests.
//!
//! Mock work units (InstantWork, SlowWork, FailingWork, CountingWork) and a
//! manually advanced clock for deterministic timestamps.

use crate::context::clock::Clock;
use crate::work::WorkUnit;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Work unit that completes immediately.
pub struct InstantWork;

#[async_trait]
impl WorkUnit for InstantWork {
    async fn perform(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Work unit that sleeps for a fixed duration before completing.
pub struct SlowWork {
    delay: Duration,
}

impl SlowWork {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl WorkUnit for SlowWork {
    async fn perform(&self) -> anyhow::Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Work unit that always fails with a fixed message.
pub struct FailingWork {
    message: String,
}

impl FailingWork {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl WorkUnit for FailingWork {
    async fn perform(&self) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("{}", self.message))
    }
}

/// Work unit that counts how many times it was performed.
pub struct CountingWork {
    count: AtomicUsize,
}

impl CountingWork {
    pub fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Default for CountingWork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkUnit for CountingWork {
    async fn perform(&self) -> anyhow::Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Clock that only moves when the test advances it.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: ChronoDuration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
