#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: PhaseView,
    /// Staged path known to the session, if any.
    pub video_path: Option<String>,
    /// Last observed non-terminal poll status, rendered for display.
    pub status_line: Option<String>,
    pub chat_in_flight: bool,
    pub transcript: Vec<TranscriptLine>,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseView {
    #[default]
    AwaitingUpload,
    Staging,
    Submitting,
    Processing,
    Chatting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    User,
    Agent,
    Notice,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub text: String,
}
