use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::types::{
    ApiError, ChatRequest, ChatResponse, ProcessVideoRequest, ProcessVideoResponse, TaskStatus,
    TaskStatusResponse,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://agent-api:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The agent-API contract the front-end depends on.
#[async_trait::async_trait]
pub trait AgentApi: Send + Sync {
    /// POST `/process-video` with the staged path; returns the assigned task.
    async fn process_video(&self, video_path: &str) -> Result<ProcessVideoResponse, ApiError>;
    /// GET `/task-status/{task_id}`.
    async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ApiError>;
    /// POST `/chat` with one message and the session's staged path, if any.
    async fn chat(&self, message: &str, video_path: Option<&str>)
        -> Result<ChatResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAgentClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl AgentApi for HttpAgentClient {
    async fn process_video(&self, video_path: &str) -> Result<ProcessVideoResponse, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/process-video"))
            .json(&ProcessVideoRequest { video_path })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_success(response).await
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("/task-status/{task_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let parsed: TaskStatusResponse = read_success(response).await?;
        Ok(parsed.status)
    }

    async fn chat(
        &self,
        message: &str,
        video_path: Option<&str>,
    ) -> Result<ChatResponse, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/chat"))
            .json(&ChatRequest {
                message,
                video_path,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_success(response).await
    }
}

/// Non-200 surfaces the raw body verbatim; 200 must decode to `T`.
async fn read_success<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        return Err(ApiError::Status {
            code: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    ApiError::Network(err.to_string())
}
