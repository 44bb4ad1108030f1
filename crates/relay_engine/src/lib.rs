//! Relay engine: agent-API client, upload staging, and the polling driver.
mod client;
mod engine;
mod poll;
mod staging;
mod types;

pub use client::{AgentApi, ClientSettings, HttpAgentClient};
pub use engine::{EngineConfig, EngineHandle};
pub use poll::{ChannelEventSink, EventSink, PollSettings, Poller};
pub use staging::{StagingError, StagingSettings, VideoStager, MAX_UPLOAD_BYTES};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    ApiError, ChatRequest, ChatResponse, EngineEvent, PollOutcome, ProcessVideoRequest,
    ProcessVideoResponse, TaskStatus, TaskStatusResponse,
};
