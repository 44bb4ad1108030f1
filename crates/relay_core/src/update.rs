use crate::state::SessionPhase;
use crate::view_model::LineKind;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UploadRequested(path) => {
            let path = path.trim().to_string();
            if path.is_empty() {
                return (state, Vec::new());
            }
            match state.phase() {
                // One upload flow at a time; re-upload is allowed once the
                // previous one has reached a terminal outcome.
                SessionPhase::Staging { .. }
                | SessionPhase::Submitting { .. }
                | SessionPhase::Processing { .. } => {
                    return (state, Vec::new());
                }
                SessionPhase::AwaitingUpload | SessionPhase::Chatting { .. } => {}
            }
            state.push_line(LineKind::Notice, format!("Uploading {path}"));
            // A new flow supersedes any earlier upload's association.
            state.clear_session_video();
            state.set_phase(SessionPhase::Staging {
                source_path: path.clone(),
            });
            vec![Effect::SubmitVideo { source_path: path }]
        }
        Msg::StagingDone { video_path } => {
            if !matches!(state.phase(), SessionPhase::Staging { .. }) {
                return (state, Vec::new());
            }
            state.push_line(LineKind::Notice, format!("Staged video at {video_path}"));
            state.set_phase(SessionPhase::Submitting { video_path });
            Vec::new()
        }
        Msg::StagingFailed { reason } => {
            state.push_line(LineKind::Error, reason);
            state.set_phase(SessionPhase::AwaitingUpload);
            Vec::new()
        }
        Msg::SubmissionAccepted { task_id } => {
            let video_path = match state.phase() {
                SessionPhase::Submitting { video_path } => video_path.clone(),
                _ => return (state, Vec::new()),
            };
            state.push_line(
                LineKind::Notice,
                "Your video is being processed, please wait...",
            );
            state.set_phase(SessionPhase::Processing {
                video_path,
                task_id,
            });
            Vec::new()
        }
        Msg::SubmissionFailed { reason } => {
            state.push_line(LineKind::Error, reason);
            state.set_phase(SessionPhase::AwaitingUpload);
            Vec::new()
        }
        Msg::ProcessingProgress {
            status_label,
            attempt,
        } => {
            state.set_last_poll(status_label, attempt);
            Vec::new()
        }
        Msg::ProcessingCompleted => {
            let video_path = match state.phase() {
                SessionPhase::Processing { video_path, .. } => video_path.clone(),
                _ => return (state, Vec::new()),
            };
            state.push_line(
                LineKind::Notice,
                format!("Video processed successfully! ({video_path})"),
            );
            state.keep_session_video(video_path.clone());
            state.set_phase(SessionPhase::Chatting { video_path });
            Vec::new()
        }
        Msg::ProcessingFailed => {
            // The staged path stays associated with the session: the upload
            // was accepted even though processing it failed.
            end_processing(&mut state);
            state.push_line(LineKind::Error, "Video processing failed.");
            state.set_phase(SessionPhase::AwaitingUpload);
            Vec::new()
        }
        Msg::PollAborted { reason } => {
            end_processing(&mut state);
            state.push_line(
                LineKind::Error,
                format!("Error checking task status: {reason}"),
            );
            state.set_phase(SessionPhase::AwaitingUpload);
            Vec::new()
        }
        Msg::PollTimedOut { attempts } => {
            end_processing(&mut state);
            state.push_line(
                LineKind::Error,
                format!("Gave up waiting for the video after {attempts} status checks."),
            );
            state.set_phase(SessionPhase::AwaitingUpload);
            Vec::new()
        }
        Msg::PollCancelled => {
            end_processing(&mut state);
            state.push_line(LineKind::Notice, "Processing cancelled.");
            state.set_phase(SessionPhase::AwaitingUpload);
            Vec::new()
        }
        Msg::ChatSubmitted(text) => {
            let text = text.trim().to_string();
            if text.is_empty() || state.chat_in_flight() {
                return (state, Vec::new());
            }
            // Carries the staged path once a submitted task has reached any
            // outcome; before that the relay sends a null video_path.
            let video_path = state.chat_video_path().map(ToOwned::to_owned);
            state.push_line(LineKind::User, text.clone());
            state.set_chat_in_flight(true);
            vec![Effect::SendChat {
                message: text,
                video_path,
            }]
        }
        Msg::ChatReply { text } => {
            state.set_chat_in_flight(false);
            state.push_line(LineKind::Agent, text);
            Vec::new()
        }
        Msg::ChatFailed { reason } => {
            state.set_chat_in_flight(false);
            state.push_line(LineKind::Error, reason);
            Vec::new()
        }
        Msg::CancelRequested => {
            if matches!(state.phase(), SessionPhase::Processing { .. }) {
                vec![Effect::CancelProcessing]
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// The poll loop for a submitted video ended: keep its staged path as the
/// session's video association, whatever the outcome was.
fn end_processing(state: &mut AppState) {
    if let SessionPhase::Processing { video_path, .. } = state.phase() {
        let video_path = video_path.clone();
        state.keep_session_video(video_path);
    }
}
