use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use relay_core::{Effect, Msg};
use relay_engine::{EngineConfig, EngineEvent, EngineHandle, PollOutcome};
use relay_logging::{relay_info, relay_warn};

/// Executes core effects on the engine and pumps engine events back into the
/// message loop.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>, base_url: Option<String>) -> Self {
        let staging_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("videos");

        let mut config = EngineConfig::default_with_staging(staging_dir);
        if let Some(base_url) = base_url {
            config.client.base_url = base_url;
        }

        let (engine, event_rx) = EngineHandle::new(config);
        spawn_event_loop(event_rx, msg_tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitVideo { source_path } => {
                    relay_info!("SubmitVideo source={}", source_path);
                    self.engine.submit(source_path);
                }
                Effect::SendChat {
                    message,
                    video_path,
                } => {
                    relay_info!(
                        "SendChat len={} with_video={}",
                        message.len(),
                        video_path.is_some()
                    );
                    self.engine.chat(message, video_path);
                }
                Effect::CancelProcessing => {
                    relay_info!("CancelProcessing");
                    self.engine.cancel_processing();
                }
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Staged { video_path } => Msg::StagingDone { video_path },
        EngineEvent::StagingFailed { reason } => {
            relay_warn!("staging failed: {}", reason);
            Msg::StagingFailed { reason }
        }
        EngineEvent::SubmissionAccepted { task_id } => Msg::SubmissionAccepted { task_id },
        EngineEvent::SubmissionFailed { error } => {
            relay_warn!("submission failed: {}", error);
            Msg::SubmissionFailed {
                reason: error.to_string(),
            }
        }
        EngineEvent::PollProgress { status, attempt } => Msg::ProcessingProgress {
            status_label: status.to_string(),
            attempt,
        },
        EngineEvent::PollFinished { outcome } => match outcome {
            PollOutcome::Completed => Msg::ProcessingCompleted,
            PollOutcome::Failed => Msg::ProcessingFailed,
            PollOutcome::Aborted(error) => Msg::PollAborted {
                reason: error.to_string(),
            },
            PollOutcome::TimedOut { attempts } => Msg::PollTimedOut { attempts },
            PollOutcome::Cancelled => Msg::PollCancelled,
        },
        EngineEvent::ChatReply { text } => Msg::ChatReply { text },
        EngineEvent::ChatFailed { error } => Msg::ChatFailed {
            reason: error.to_string(),
        },
    }
}
