use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use relay_logging::{relay_error, relay_info};
use tokio_util::sync::CancellationToken;

use crate::client::{AgentApi, ClientSettings, HttpAgentClient};
use crate::poll::{ChannelEventSink, PollSettings, Poller};
use crate::staging::{StagingSettings, VideoStager};
use crate::types::EngineEvent;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub client: ClientSettings,
    pub poll: PollSettings,
    pub staging: StagingSettings,
}

impl EngineConfig {
    pub fn default_with_staging(dir: PathBuf) -> Self {
        Self {
            client: ClientSettings::default(),
            poll: PollSettings::default(),
            staging: StagingSettings::new(dir),
        }
    }
}

enum EngineCommand {
    Submit { source_path: PathBuf },
    Chat {
        message: String,
        video_path: Option<String>,
    },
    CancelProcessing,
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Spawns the engine thread with its own tokio runtime. Events for the
    /// front-end arrive on the returned receiver.
    pub fn new(config: EngineConfig) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let client = match HttpAgentClient::new(config.client) {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    relay_error!("failed to build API client: {}", err);
                    return;
                }
            };
            let stager = Arc::new(VideoStager::new(config.staging));
            let poller = Poller::new(config.poll);
            // Token for the submit job currently in flight, if any.
            let mut active_cancel: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Submit { source_path } => {
                        let cancel = CancellationToken::new();
                        active_cancel = Some(cancel.clone());
                        let client = client.clone();
                        let stager = stager.clone();
                        let poller = poller.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_submit_job(client, stager, poller, source_path, cancel, event_tx)
                                .await;
                        });
                    }
                    EngineCommand::Chat {
                        message,
                        video_path,
                    } => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let event = match client.chat(&message, video_path.as_deref()).await {
                                Ok(reply) => EngineEvent::ChatReply {
                                    text: reply.response,
                                },
                                Err(error) => EngineEvent::ChatFailed { error },
                            };
                            let _ = event_tx.send(event);
                        });
                    }
                    EngineCommand::CancelProcessing => {
                        if let Some(cancel) = active_cancel.take() {
                            cancel.cancel();
                        }
                    }
                }
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn submit(&self, source_path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            source_path: source_path.into(),
        });
    }

    pub fn chat(&self, message: impl Into<String>, video_path: Option<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Chat {
            message: message.into(),
            video_path,
        });
    }

    pub fn cancel_processing(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelProcessing);
    }
}

/// One upload flow: stage the file, submit it, then poll to a terminal
/// outcome. A failed submission never issues a poll request.
async fn run_submit_job(
    client: Arc<HttpAgentClient>,
    stager: Arc<VideoStager>,
    poller: Poller,
    source_path: PathBuf,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let staged = tokio::task::spawn_blocking(move || stager.stage(&source_path)).await;
    let staged = match staged {
        Ok(Ok(path)) => path,
        Ok(Err(err)) => {
            let _ = event_tx.send(EngineEvent::StagingFailed {
                reason: err.to_string(),
            });
            return;
        }
        Err(err) => {
            let _ = event_tx.send(EngineEvent::StagingFailed {
                reason: err.to_string(),
            });
            return;
        }
    };
    let video_path = staged.display().to_string();
    let _ = event_tx.send(EngineEvent::Staged {
        video_path: video_path.clone(),
    });

    let task_id = match client.process_video(&video_path).await {
        Ok(accepted) => accepted.task_id,
        Err(error) => {
            let _ = event_tx.send(EngineEvent::SubmissionFailed { error });
            return;
        }
    };
    relay_info!("video {} submitted as task {}", video_path, task_id);
    let _ = event_tx.send(EngineEvent::SubmissionAccepted {
        task_id: task_id.clone(),
    });

    let sink = ChannelEventSink::new(event_tx.clone());
    let outcome = poller.run(client.as_ref(), &task_id, &cancel, &sink).await;
    let _ = event_tx.send(EngineEvent::PollFinished { outcome });
}
