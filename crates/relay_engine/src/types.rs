use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend task lifecycle states. The enumeration is closed: any other wire
/// value is a decode error, never a state to keep polling on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    NotFound,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::NotFound => "not_found",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessVideoRequest<'a> {
    pub video_path: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessVideoResponse {
    pub task_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
}

/// Chat request body; `video_path` serializes as `null` before any upload
/// has completed.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub video_path: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Typed failures for one API call. The `Display` texts for `Status` and
/// `Network` are the lines shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Error communicating with API: {0}")]
    Network(String),
    #[error("request to the API timed out: {0}")]
    Timeout(String),
    #[error("Error from API: {body}")]
    Status { code: u16, body: String },
    #[error("unexpected response from API: {0}")]
    Decode(String),
}

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed,
    Failed,
    Aborted(ApiError),
    TimedOut { attempts: u32 },
    Cancelled,
}

/// Events emitted by the engine back to the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Staged { video_path: String },
    StagingFailed { reason: String },
    SubmissionAccepted { task_id: String },
    SubmissionFailed { error: ApiError },
    PollProgress { status: TaskStatus, attempt: u32 },
    PollFinished { outcome: PollOutcome },
    ChatReply { text: String },
    ChatFailed { error: ApiError },
}
