// SPDX-License-Identifier: MPL-2.0
//! Periodic slideshow trigger.
//!
//! The timer never touches gallery state. It only queues ticks; the owning
//! controller drains them and advances the gallery itself, so state stays in
//! a single place.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::debug;

/// At most one running tick task plus the channel it feeds.
#[derive(Debug, Default)]
pub struct AutoplayTimer {
    task: Option<JoinHandle<()>>,
    ticks: Option<mpsc::UnboundedReceiver<()>>,
}

impl AutoplayTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ticking every `delay`, replacing any running schedule.
    ///
    /// The first tick arrives one full `delay` after the call. Must be called
    /// from within a Tokio runtime.
    pub fn start(&mut self, delay: Duration) {
        self.stop();

        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + delay, delay);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if sender.send(()).is_err() {
                    break;
                }
            }
        });

        debug!(delay_ms = delay.as_millis() as u64, "autoplay started");
        self.task = Some(task);
        self.ticks = Some(receiver);
    }

    /// Cancels the schedule and discards ticks not yet consumed.
    ///
    /// Returns `true` if a schedule was running.
    pub fn stop(&mut self) -> bool {
        self.ticks = None;
        match self.task.take() {
            Some(task) => {
                task.abort();
                debug!("autoplay stopped");
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Consumes one queued tick without waiting.
    pub fn try_tick(&mut self) -> bool {
        self.ticks
            .as_mut()
            .is_some_and(|ticks| ticks.try_recv().is_ok())
    }

    /// Waits for the next tick. Returns `false` at once when stopped.
    pub async fn tick(&mut self) -> bool {
        match self.ticks.as_mut() {
            Some(ticks) => ticks.recv().await.is_some(),
            None => false,
        }
    }
}

impl Drop for AutoplayTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
