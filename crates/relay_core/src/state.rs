use crate::view_model::{AppViewModel, LineKind, PhaseView, TranscriptLine};

/// Where the session currently is in the upload → process → chat flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    AwaitingUpload,
    Staging {
        source_path: String,
    },
    Submitting {
        video_path: String,
    },
    Processing {
        video_path: String,
        task_id: String,
    },
    Chatting {
        video_path: String,
    },
}

impl SessionPhase {
    /// Staged path known to the current flow, regardless of task outcome.
    pub fn staged_video_path(&self) -> Option<&str> {
        match self {
            SessionPhase::Submitting { video_path }
            | SessionPhase::Processing { video_path, .. }
            | SessionPhase::Chatting { video_path } => Some(video_path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: SessionPhase,
    transcript: Vec<TranscriptLine>,
    chat_in_flight: bool,
    last_poll: Option<(String, u32)>,
    session_video_path: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn chat_in_flight(&self) -> bool {
        self.chat_in_flight
    }

    /// Staged path attached to chat requests. Set once the poll loop for a
    /// successfully submitted video ends, whatever its outcome; chats before
    /// that (or mid-poll) carry no video.
    pub fn chat_video_path(&self) -> Option<&str> {
        self.session_video_path.as_deref()
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let phase = match &self.phase {
            SessionPhase::AwaitingUpload => PhaseView::AwaitingUpload,
            SessionPhase::Staging { .. } => PhaseView::Staging,
            SessionPhase::Submitting { .. } => PhaseView::Submitting,
            SessionPhase::Processing { .. } => PhaseView::Processing,
            SessionPhase::Chatting { .. } => PhaseView::Chatting,
        };
        let status_line = self
            .last_poll
            .as_ref()
            .map(|(label, attempt)| format!("{label} (attempt {attempt})"));
        AppViewModel {
            phase,
            video_path: self
                .phase
                .staged_video_path()
                .map(ToOwned::to_owned)
                .or_else(|| self.session_video_path.clone()),
            status_line,
            chat_in_flight: self.chat_in_flight,
            transcript: self.transcript.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn set_phase(&mut self, phase: SessionPhase) {
        if !matches!(phase, SessionPhase::Processing { .. }) {
            self.last_poll = None;
        }
        self.phase = phase;
        self.dirty = true;
    }

    pub(crate) fn push_line(&mut self, kind: LineKind, text: impl Into<String>) {
        self.transcript.push(TranscriptLine {
            kind,
            text: text.into(),
        });
        self.dirty = true;
    }

    pub(crate) fn set_last_poll(&mut self, status_label: String, attempt: u32) {
        self.last_poll = Some((status_label, attempt));
        self.dirty = true;
    }

    pub(crate) fn keep_session_video(&mut self, video_path: String) {
        self.session_video_path = Some(video_path);
        self.dirty = true;
    }

    pub(crate) fn clear_session_video(&mut self) {
        self.session_video_path = None;
    }

    pub(crate) fn set_chat_in_flight(&mut self, in_flight: bool) {
        self.chat_in_flight = in_flight;
        self.dirty = true;
    }
}
