use std::time::Duration;

use relay_logging::relay_debug;
use tokio_util::sync::CancellationToken;

use crate::client::AgentApi;
use crate::types::{EngineEvent, PollOutcome, TaskStatus};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    /// Ceiling on status checks; exhausting it yields `PollOutcome::TimedOut`
    /// instead of polling forever.
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 90,
        }
    }
}

/// Sink for engine events emitted while a job runs.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone)]
pub struct Poller {
    settings: PollSettings,
}

impl Poller {
    pub fn new(settings: PollSettings) -> Self {
        Self { settings }
    }

    /// Polls the task until it reaches a terminal status, a status check
    /// fails, the attempt ceiling is hit, or the token is cancelled.
    ///
    /// Waits one full interval before the first request; non-terminal
    /// statuses (`pending`, `in_progress`, `not_found`) keep the loop going.
    pub async fn run(
        &self,
        api: &dyn AgentApi,
        task_id: &str,
        cancel: &CancellationToken,
        sink: &dyn EventSink,
    ) -> PollOutcome {
        let mut attempt = 0;
        while attempt < self.settings.max_attempts {
            attempt += 1;
            tokio::select! {
                _ = cancel.cancelled() => return PollOutcome::Cancelled,
                _ = tokio::time::sleep(self.settings.interval) => {}
            }
            match api.task_status(task_id).await {
                Ok(TaskStatus::Completed) => return PollOutcome::Completed,
                Ok(TaskStatus::Failed) => return PollOutcome::Failed,
                Ok(status) => {
                    relay_debug!("task {} still {} (attempt {})", task_id, status, attempt);
                    sink.emit(EngineEvent::PollProgress { status, attempt });
                }
                Err(err) => return PollOutcome::Aborted(err),
            }
        }
        PollOutcome::TimedOut {
            attempts: self.settings.max_attempts,
        }
    }
}
